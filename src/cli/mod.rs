//! Interface de linha de comando do Abacus.

pub mod commands;
pub mod interactive;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Abacus - calculadora HTTP com cache persistente de operações.
#[derive(Parser, Debug)]
#[command(name = "abacus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = "abacus.toml", env = "ABACUS_CONFIG")]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long)]
    pub quiet: bool,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cria `abacus.toml`, o banco local e a entrada no `.gitignore`.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Sobrescreve um `abacus.toml` existente com os valores padrão.
        #[arg(long)]
        force: bool,
    },

    /// Inicia o servidor HTTP.
    Serve {
        /// Endereço de bind (sobrescreve a configuração).
        #[arg(long, env = "ABACUS_HOST")]
        host: Option<String>,

        /// Porta (sobrescreve a configuração).
        #[arg(short, long, env = "ABACUS_PORT")]
        port: Option<u16>,
    },

    /// Calcula uma operação localmente, usando o mesmo cache do servidor.
    #[command(allow_negative_numbers = true)]
    Calculate {
        /// Primeiro operando.
        num1: f64,

        /// Operador (+, -, *, /).
        operator: String,

        /// Segundo operando.
        num2: f64,
    },

    /// Lista as operações mais recentes.
    History {
        /// Número máximo de operações.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Mostra uma operação.
    Show {
        /// Id da operação.
        id: i64,
    },

    /// Remove uma operação.
    Delete {
        /// Id da operação.
        id: i64,
    },

    /// Remove todo o histórico.
    Clear {
        /// Não pede confirmação.
        #[arg(short, long)]
        yes: bool,
    },

    /// Configura opções interativamente.
    Config,

    /// Diagnostica problemas de configuração.
    Doctor,

    /// Mostra versão.
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calculate_with_negative_operand() {
        let cli = Cli::try_parse_from(["abacus", "calculate", "-2.5", "*", "4"]).unwrap();
        match cli.command {
            Commands::Calculate {
                num1,
                operator,
                num2,
            } => {
                assert_eq!(num1, -2.5);
                assert_eq!(operator, "*");
                assert_eq!(num2, 4.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["abacus", "serve", "--host", "0.0.0.0", "-p", "9000"]).unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
