//! Implementação dos comandos CLI do Abacus.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::CalculationCache;
use crate::calc::Operator;
use crate::http::HttpServer;
use crate::store::{self, OperationRecord};
use crate::types::config::{Config, StoreBackend};
use crate::AbacusResult;

/// Entrada do `.gitignore` que esconde o banco local.
const IGNORE_ENTRY: &str = ".abacus/";

/// O que `init` fez com o `.gitignore` do projeto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IgnoreUpdate {
    Created,
    Appended,
    AlreadyIgnored,
}

/// Prepara um diretório para o Abacus: grava `abacus.toml`, cria o banco
/// com o schema e protege `.abacus/` no `.gitignore`.
///
/// Um `abacus.toml` existente só é sobrescrito com `force`.
pub async fn init(path: Option<PathBuf>, force: bool) -> AbacusResult<()> {
    let root = path.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&root)?;

    let config_path = root.join("abacus.toml");
    let config = if config_path.exists() && !force {
        println!("Keeping existing {} (use --force to reset it)", config_path.display());
        Config::load(&config_path)?
    } else {
        let config = Config::default_config();
        config.save(&config_path)?;
        println!("Wrote {}", config_path.display());
        config
    };

    // db_path é relativo ao diretório onde o servidor roda, não ao cwd do init
    if config.store.backend == StoreBackend::Sqlite {
        let mut store_config = config.store.clone();
        if store_config.db_path.is_relative() {
            store_config.db_path = root.join(&store_config.db_path);
        }
        let store = store::open(&store_config)?;
        println!(
            "Store ready at {} ({} operation(s))",
            store_config.db_path.display(),
            store.count().await?
        );
    }

    match ignore_database(&root)? {
        IgnoreUpdate::Created => println!("Created .gitignore ignoring {}", IGNORE_ENTRY),
        IgnoreUpdate::Appended => println!("Added {} to .gitignore", IGNORE_ENTRY),
        IgnoreUpdate::AlreadyIgnored => {}
    }

    println!();
    println!("Run 'abacus doctor' to check the setup, then 'abacus serve'.");
    Ok(())
}

/// Garante que `.abacus/` está no `.gitignore` de `root`.
fn ignore_database(root: &Path) -> AbacusResult<IgnoreUpdate> {
    let gitignore = root.join(".gitignore");

    let Some(current) = read_if_exists(&gitignore)? else {
        std::fs::write(&gitignore, format!("{}\n", IGNORE_ENTRY))?;
        return Ok(IgnoreUpdate::Created);
    };

    let ignored = current
        .lines()
        .map(|line| line.trim().trim_start_matches('/').trim_end_matches('/'))
        .any(|line| line == ".abacus");
    if ignored {
        return Ok(IgnoreUpdate::AlreadyIgnored);
    }

    let separator = if current.is_empty() || current.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    std::fs::write(&gitignore, format!("{}{}{}\n", current, separator, IGNORE_ENTRY))?;
    Ok(IgnoreUpdate::Appended)
}

fn read_if_exists(path: &Path) -> AbacusResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Inicia o servidor HTTP.
pub async fn serve(host: Option<String>, port: Option<u16>, config: &Config) -> AbacusResult<()> {
    let mut server_config = config.server.clone();
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    tracing::debug!(
        "Configuração carregada: rounding={}, backend={}, timeout={}s",
        config.calculator.rounding,
        config.store.backend,
        server_config.request_timeout_secs
    );

    if config.store.backend == StoreBackend::Memory {
        tracing::warn!("Memory store selected: history is lost when the server stops");
    }

    let cache = Arc::new(CalculationCache::from_config(config)?);
    HttpServer::new(server_config, cache).run().await
}

/// Calcula uma operação sem passar pelo HTTP.
pub async fn calculate(num1: f64, operator: &str, num2: f64, config: &Config) -> AbacusResult<()> {
    let operator: Operator = operator.parse()?;
    let cache = CalculationCache::from_config(config)?;

    let calculation = cache.calculate(num1, operator, num2).await?;

    println!("{}", calculation.record.expression());
    println!(
        "id: {}  ({})",
        calculation.record.id,
        if calculation.cached {
            "cached"
        } else {
            "computed"
        }
    );

    Ok(())
}

/// Mostra as operações mais recentes.
pub async fn history(limit: Option<usize>, config: &Config) -> AbacusResult<()> {
    let cache = CalculationCache::from_config(config)?;
    let records = cache.history(limit).await?;

    if records.is_empty() {
        println!("No operations recorded yet.");
        return Ok(());
    }

    println!("{} operation(s):\n", records.len());
    for record in &records {
        print_record(record);
    }

    Ok(())
}

/// Mostra uma operação.
pub async fn show(id: i64, config: &Config) -> AbacusResult<()> {
    let cache = CalculationCache::from_config(config)?;
    let record = cache.get(id).await?;
    print_record(&record);
    Ok(())
}

/// Remove uma operação.
pub async fn delete(id: i64, config: &Config) -> AbacusResult<()> {
    let cache = CalculationCache::from_config(config)?;
    cache.delete(id).await?;
    println!("Operation {} deleted.", id);
    Ok(())
}

/// Remove todo o histórico, pedindo confirmação se `yes` não foi passado.
pub async fn clear(yes: bool, config: &Config) -> AbacusResult<()> {
    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt("Delete the whole operation history? This cannot be undone")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let cache = CalculationCache::from_config(config)?;
    let removed = cache.clear().await?;
    println!("History cleared ({} operation(s) removed).", removed);
    Ok(())
}

fn print_record(record: &OperationRecord) {
    println!(
        "  #{:<6} {:<32} {}",
        record.id,
        record.expression(),
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

/// Configura opções interativamente.
pub async fn config_cmd(config_path: &Path) -> AbacusResult<()> {
    use super::interactive::{run_interactive_config, show_config_summary};

    // Mostra resumo antes de editar
    if config_path.exists() {
        let config = Config::load(config_path)?;
        show_config_summary(&config);
    }

    run_interactive_config(config_path)
}

/// Diagnostica problemas de configuração.
pub async fn doctor(config_path: &Path, config: &Config) -> AbacusResult<()> {
    println!("Diagnosing Abacus configuration...\n");

    let mut issues: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if config_path.exists() {
        match Config::load(config_path) {
            Ok(_) => println!("✓ Configuration loaded from {}", config_path.display()),
            Err(e) => issues.push(format!("Configuration file is invalid: {}", e)),
        }
    } else {
        warnings.push(format!(
            "{} not found, using defaults (run 'abacus init')",
            config_path.display()
        ));
    }

    println!("✓ Rounding policy: {}", config.calculator.rounding);

    match config.store.backend {
        StoreBackend::Memory => {
            warnings.push("Memory store selected - history is not persisted".to_string());
        }
        StoreBackend::Sqlite => {
            println!("✓ Database path: {}", config.store.db_path.display());
        }
    }

    match CalculationCache::from_config(config) {
        Ok(cache) => match cache.count().await {
            Ok(count) => println!("✓ Store reachable ({} operation(s) stored)", count),
            Err(e) => issues.push(format!("Store query failed: {}", e)),
        },
        Err(e) => issues.push(format!("Store could not be opened: {}", e)),
    }

    if config.history.default_limit == 0 || config.history.max_limit == 0 {
        issues.push("History limits must be at least 1".to_string());
    } else if config.history.default_limit > config.history.max_limit {
        warnings.push(format!(
            "history.default_limit ({}) is above history.max_limit ({}) and will be clamped",
            config.history.default_limit, config.history.max_limit
        ));
    }

    if config.server.request_timeout_secs == 0 {
        issues.push("server.request_timeout_secs must be at least 1".to_string());
    }

    println!();
    if issues.is_empty() && warnings.is_empty() {
        println!("✓ All good! Abacus is ready to serve.");
    } else {
        if !warnings.is_empty() {
            println!("Warnings:");
            for warning in warnings {
                println!("  ⚠ {}", warning);
            }
        }
        if !issues.is_empty() {
            println!("Problems:");
            for issue in issues {
                println!("  ✗ {}", issue);
            }
        }
    }

    Ok(())
}

/// Mostra versão.
pub fn version() {
    println!("abacus {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Memoizing calculator HTTP service");
}
