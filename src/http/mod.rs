//! API HTTP do Abacus.
//!
//! ## Endpoints
//!
//! - `POST /calculate` - Calcula (ou devolve do cache) uma operação
//! - `GET /history?limit=N` - Operações mais recentes
//! - `GET /history/{id}` - Uma operação
//! - `DELETE /history/{id}` - Remove uma operação
//! - `DELETE /history` - Remove todo o histórico
//! - `GET /health` - Liveness probe
//!
//! Todas as respostas, exceto `/health`, usam o envelope
//! `{success, message, data}`.
//!
//! ## Exemplo de Uso
//!
//! ```ignore
//! use std::sync::Arc;
//! use abacus::cache::CalculationCache;
//! use abacus::http::HttpServer;
//! use abacus::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load("abacus.toml").unwrap_or_default();
//!     let cache = Arc::new(CalculationCache::from_config(&config).unwrap());
//!     HttpServer::new(config.server, cache).run().await.unwrap();
//! }
//! ```

mod handlers;
mod protocol;
mod routes;
mod server;

pub use handlers::AppState;
pub use protocol::{
    ApiResponse, CalculateRequest, CalculationView, ClearedView, DeletedView, HealthResponse,
    HistoryQuery, HistoryView, OperationView,
};
pub use routes::router;
pub use server::HttpServer;
