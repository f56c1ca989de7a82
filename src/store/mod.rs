//! Armazenamento persistente das operações.
//!
//! O gateway de cache conversa apenas com o trait [`OperationStore`]; a
//! implementação concreta é injetada (SQLite em produção, memória em testes).
//!
//! ## Implementações
//!
//! - [`SqliteStore`] - Banco SQLite com índice único na tripla normalizada
//! - [`MemoryStore`] - Store em processo, usado em testes e com `backend = "memory"`

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calc::{Cents, OperationKey, Operator};
use crate::types::config::{StoreBackend, StoreConfig};
use crate::AbacusResult;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Registro persistido de uma operação. Imutável depois de inserido.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRecord {
    pub id: i64,
    pub operand1: Cents,
    pub operator: Operator,
    pub operand2: Cents,
    pub result: Cents,
    pub created_at: DateTime<Utc>,
}

impl OperationRecord {
    /// Chave de cache do registro.
    pub fn key(&self) -> OperationKey {
        OperationKey {
            operand1: self.operand1,
            operator: self.operator,
            operand2: self.operand2,
        }
    }

    /// Expressão legível, ex: `2.00 + 3.00 = 5.00`.
    pub fn expression(&self) -> String {
        format!("{} = {}", self.key(), self.result)
    }
}

/// Dados de um registro ainda não inserido.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewOperation {
    pub key: OperationKey,
    pub result: Cents,
}


/// Resultado de uma inserção.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// Registro novo criado.
    Created(OperationRecord),
    /// Outra requisição gravou a mesma chave antes; este é o registro existente.
    Existing(OperationRecord),
}

impl InsertOutcome {
    pub fn record(&self) -> &OperationRecord {
        match self {
            InsertOutcome::Created(record) | InsertOutcome::Existing(record) => record,
        }
    }

    pub fn into_record(self) -> OperationRecord {
        match self {
            InsertOutcome::Created(record) | InsertOutcome::Existing(record) => record,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, InsertOutcome::Created(_))
    }
}

/// Contrato do armazenamento de operações.
#[async_trait]
pub trait OperationStore: Send + Sync {
    /// Nome do backend (para logs e diagnóstico).
    fn backend(&self) -> &'static str;

    /// Busca por igualdade exata na chave normalizada. Havendo duplicatas,
    /// retorna a de menor id.
    async fn lookup(&self, key: &OperationKey) -> AbacusResult<Option<OperationRecord>>;

    /// Insere um registro, atribuindo id e timestamp.
    async fn insert(&self, operation: NewOperation) -> AbacusResult<InsertOutcome>;

    /// Registros mais recentes primeiro, no máximo `limit`.
    async fn list(&self, limit: usize) -> AbacusResult<Vec<OperationRecord>>;

    async fn get(&self, id: i64) -> AbacusResult<Option<OperationRecord>>;

    /// Remove um registro. Retorna `false` se o id não existe.
    async fn delete(&self, id: i64) -> AbacusResult<bool>;

    /// Remove todos os registros e retorna quantos foram removidos.
    async fn clear(&self) -> AbacusResult<usize>;

    async fn count(&self) -> AbacusResult<usize>;
}

/// Abre o store configurado.
pub fn open(config: &StoreConfig) -> AbacusResult<Arc<dyn OperationStore>> {
    match config.backend {
        #[cfg(feature = "sqlite")]
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(
                &config.db_path,
                std::time::Duration::from_millis(config.busy_timeout_ms),
            )?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreBackend::Sqlite => Err(crate::AbacusError::config(
            "SQLite backend requires the 'sqlite' feature",
        )),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
