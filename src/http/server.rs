//! Servidor HTTP do Abacus.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;

use crate::cache::CalculationCache;
use crate::types::config::ServerConfig;
use crate::AbacusResult;

use super::handlers::AppState;
use super::routes;

/// Servidor HTTP: liga o router ao listener TCP.
pub struct HttpServer {
    config: ServerConfig,
    cache: Arc<CalculationCache>,
}

impl HttpServer {
    /// Cria um novo servidor.
    pub fn new(config: ServerConfig, cache: Arc<CalculationCache>) -> Self {
        Self { config, cache }
    }

    /// Router com o estado do servidor (útil em testes).
    pub fn router(&self) -> axum::Router {
        let state = AppState::new(self.cache.clone(), self.config.service_name.clone());
        routes::router(state, Duration::from_secs(self.config.request_timeout_secs))
    }

    /// Faz bind e atende até receber Ctrl+C ou SIGTERM.
    pub async fn run(self) -> AbacusResult<()> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener).await
    }

    /// Atende em um listener já aberto.
    pub async fn serve(self, listener: TcpListener) -> AbacusResult<()> {
        let app = self.router();
        let local_addr = listener.local_addr()?;

        tracing::info!(
            addr = %local_addr,
            rounding = %self.cache.rounding(),
            backend = self.cache.store().backend(),
            "Abacus HTTP server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Abacus HTTP server stopped");
        Ok(())
    }
}

/// Resolve quando o processo recebe Ctrl+C ou SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
