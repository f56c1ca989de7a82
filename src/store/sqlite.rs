//! Store SQLite.
//!
//! Os valores decimais são gravados como inteiros (centésimos), então a
//! igualdade da chave de cache é exata. O índice único em
//! `(operand1, operator, operand2)` torna consulta+inserção seguras entre
//! requisições concorrentes: uma inserção conflitante vira uma releitura.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;

use crate::calc::{Cents, OperationKey, Operator};
use crate::{AbacusError, AbacusResult};

use super::{InsertOutcome, NewOperation, OperationRecord, OperationStore};

const SELECT_COLUMNS: &str = "SELECT id, operand1, operator, operand2, result, created_at FROM operations";

/// Store SQLite.
pub struct SqliteStore {
    // Mutex porque rusqlite::Connection não é Sync
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Abre ou cria o banco em `path`, criando o diretório pai se necessário.
    ///
    /// Ativa WAL e `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> AbacusResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        tracing::debug!(path = %path.display(), "SQLite store opened");
        Self::init(conn)
    }

    /// Abre um banco SQLite em memória.
    pub fn open_in_memory() -> AbacusResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> AbacusResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lookup_in(conn: &Connection, key: &OperationKey) -> AbacusResult<Option<OperationRecord>> {
        let record = conn
            .query_row(
                &format!(
                    "{} WHERE operand1 = ?1 AND operator = ?2 AND operand2 = ?3 ORDER BY id ASC LIMIT 1",
                    SELECT_COLUMNS
                ),
                params![
                    key.operand1.hundredths(),
                    key.operator.symbol(),
                    key.operand2.hundredths()
                ],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }
}

/// Converte uma linha em registro, falhando em dados que não respeitam o schema.
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<OperationRecord> {
    let operator: String = row.get(2)?;
    let operator: Operator = operator.parse().map_err(|e: AbacusError| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::other(e.to_string())),
        )
    })?;

    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(OperationRecord {
        id: row.get(0)?,
        operand1: Cents::from_hundredths(row.get(1)?),
        operator,
        operand2: Cents::from_hundredths(row.get(3)?),
        result: Cents::from_hundredths(row.get(4)?),
        created_at,
    })
}

#[async_trait]
impl OperationStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn lookup(&self, key: &OperationKey) -> AbacusResult<Option<OperationRecord>> {
        let conn = self.conn.lock().await;
        Self::lookup_in(&conn, key)
    }

    async fn insert(&self, operation: NewOperation) -> AbacusResult<InsertOutcome> {
        let conn = self.conn.lock().await;
        // Micros fixos: a ordem lexicográfica coincide com a cronológica
        let created_at = Utc::now();
        let key = operation.key;

        let inserted = conn.execute(
            "INSERT INTO operations (operand1, operator, operand2, result, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(operand1, operator, operand2) DO NOTHING",
            params![
                key.operand1.hundredths(),
                key.operator.symbol(),
                key.operand2.hundredths(),
                operation.result.hundredths(),
                created_at.to_rfc3339_opts(SecondsFormat::Micros, true)
            ],
        )?;

        if inserted == 0 {
            return match Self::lookup_in(&conn, &key)? {
                Some(existing) => Ok(InsertOutcome::Existing(existing)),
                None => Err(AbacusError::store(format!(
                    "insert of {} conflicted but no record was found",
                    key
                ))),
            };
        }

        let id = conn.last_insert_rowid();
        let record = conn.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            row_to_record,
        )?;

        Ok(InsertOutcome::Created(record))
    }

    async fn list(&self, limit: usize) -> AbacusResult<Vec<OperationRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC, id DESC LIMIT ?1",
            SELECT_COLUMNS
        ))?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    async fn get(&self, id: i64) -> AbacusResult<Option<OperationRecord>> {
        let conn = self.conn.lock().await;
        let record = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    async fn delete(&self, id: i64) -> AbacusResult<bool> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute("DELETE FROM operations WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    async fn clear(&self) -> AbacusResult<usize> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute("DELETE FROM operations", [])?;
        Ok(deleted)
    }

    async fn count(&self) -> AbacusResult<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM operations", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
