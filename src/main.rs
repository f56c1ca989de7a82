use abacus::cli::{commands, Cli, Commands};
use abacus::types::config::Config;
use abacus::AbacusResult;
use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> AbacusResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let (config, config_error) = if cli.config.exists() {
        match Config::load(&cli.config) {
            Ok(config) => (config, None),
            Err(e) => (Config::default_config(), Some(e)),
        }
    } else {
        (Config::default_config(), None)
    };

    // CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let directive = format!("abacus={}", log_level)
        .parse::<Directive>()
        .or_else(|_| "abacus=info".parse::<Directive>());
    let filter = match directive {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };

    let json = config.general.log_format == "json";
    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(json_layer)
        .with(text_layer)
        .with(filter)
        .init();

    if let Some(e) = config_error {
        tracing::warn!("Invalid configuration at {}, using defaults: {}", cli.config.display(), e);
    }
    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path, force } => {
            commands::init(path, force).await?;
        }
        Commands::Serve { host, port } => {
            commands::serve(host, port, &config).await?;
        }
        Commands::Calculate {
            num1,
            operator,
            num2,
        } => {
            commands::calculate(num1, &operator, num2, &config).await?;
        }
        Commands::History { limit } => {
            commands::history(limit, &config).await?;
        }
        Commands::Show { id } => {
            commands::show(id, &config).await?;
        }
        Commands::Delete { id } => {
            commands::delete(id, &config).await?;
        }
        Commands::Clear { yes } => {
            commands::clear(yes, &config).await?;
        }
        Commands::Config => {
            commands::config_cmd(&cli.config).await?;
        }
        Commands::Doctor => {
            commands::doctor(&cli.config, &config).await?;
        }
        Commands::Version => {
            commands::version();
        }
    }

    Ok(())
}
