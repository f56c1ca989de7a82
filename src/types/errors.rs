//! Tipos de erro do Abacus.

use thiserror::Error;

/// Tipo de resultado padrão do Abacus.
pub type AbacusResult<T> = Result<T, AbacusError>;

/// Erros possíveis no Abacus.
#[derive(Error, Debug)]
pub enum AbacusError {
    /// Entrada malformada, fora do intervalo ou operador desconhecido.
    #[error("{0}")]
    Validation(String),

    #[error("Division by zero is not allowed")]
    DivisionByZero,

    #[error("Operation {0} not found")]
    NotFound(i64),

    #[error("Store error: {0}")]
    Store(String),

    #[cfg(feature = "sqlite")]
    #[error("Store error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "cli")]
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl AbacusError {
    /// Cria um erro de validação.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Cria um erro de armazenamento.
    pub fn store<S: Into<String>>(msg: S) -> Self {
        Self::Store(msg.into())
    }

    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Erros causados pelo cliente (entrada inválida ou id inexistente).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::DivisionByZero | Self::NotFound(_)
        )
    }

    /// Código HTTP correspondente ao erro.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::DivisionByZero => 400,
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AbacusError::validation("bad").status_code(), 400);
        assert_eq!(AbacusError::DivisionByZero.status_code(), 400);
        assert_eq!(AbacusError::NotFound(7).status_code(), 404);
        assert_eq!(AbacusError::store("down").status_code(), 500);
        assert_eq!(AbacusError::config("bad file").status_code(), 500);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AbacusError::DivisionByZero.to_string(),
            "Division by zero is not allowed"
        );
        assert_eq!(AbacusError::NotFound(999).to_string(), "Operation 999 not found");
        assert!(AbacusError::NotFound(1).is_client_error());
        assert!(!AbacusError::store("x").is_client_error());
    }
}
