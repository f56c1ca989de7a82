//! Store em memória.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::calc::OperationKey;
use crate::AbacusResult;

use super::{InsertOutcome, NewOperation, OperationRecord, OperationStore};

#[derive(Debug)]
struct MemoryState {
    next_id: i64,
    records: Vec<OperationRecord>,
}

/// Store em processo. Consulta e inserção acontecem sob o mesmo lock, então
/// a chave normalizada nunca é duplicada.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 1,
                records: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn lookup(&self, key: &OperationKey) -> AbacusResult<Option<OperationRecord>> {
        let state = self.state.lock().await;
        Ok(state.records.iter().find(|r| r.key() == *key).cloned())
    }

    async fn insert(&self, operation: NewOperation) -> AbacusResult<InsertOutcome> {
        let mut state = self.state.lock().await;

        if let Some(existing) = state.records.iter().find(|r| r.key() == operation.key) {
            return Ok(InsertOutcome::Existing(existing.clone()));
        }

        let record = OperationRecord {
            id: state.next_id,
            operand1: operation.key.operand1,
            operator: operation.key.operator,
            operand2: operation.key.operand2,
            result: operation.result,
            created_at: Utc::now(),
        };
        state.next_id += 1;
        state.records.push(record.clone());

        Ok(InsertOutcome::Created(record))
    }

    async fn list(&self, limit: usize) -> AbacusResult<Vec<OperationRecord>> {
        let state = self.state.lock().await;
        // Inserção em ordem de id e timestamp, então basta inverter
        Ok(state.records.iter().rev().take(limit).cloned().collect())
    }

    async fn get(&self, id: i64) -> AbacusResult<Option<OperationRecord>> {
        let state = self.state.lock().await;
        Ok(state.records.iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> AbacusResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        Ok(state.records.len() < before)
    }

    async fn clear(&self) -> AbacusResult<usize> {
        let mut state = self.state.lock().await;
        let removed = state.records.len();
        state.records.clear();
        Ok(removed)
    }

    async fn count(&self) -> AbacusResult<usize> {
        Ok(self.state.lock().await.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{Cents, Operator};

    fn new_op(a: i64, operator: Operator, b: i64, result: i64) -> NewOperation {
        NewOperation {
            key: OperationKey {
                operand1: Cents::from_hundredths(a),
                operator,
                operand2: Cents::from_hundredths(b),
            },
            result: Cents::from_hundredths(result),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = MemoryStore::new();
        let op = new_op(200, Operator::Add, 300, 500);

        assert!(store.lookup(&op.key).await.unwrap().is_none());

        let outcome = store.insert(op).await.unwrap();
        assert!(outcome.was_created());
        assert_eq!(outcome.record().id, 1);

        let found = store.lookup(&op.key).await.unwrap().unwrap();
        assert_eq!(found.result.hundredths(), 500);
    }

    #[tokio::test]
    async fn test_duplicate_key_returns_existing() {
        let store = MemoryStore::new();
        let op = new_op(100, Operator::Divide, 300, 33);

        store.insert(op).await.unwrap();
        let second = store.insert(op).await.unwrap();

        assert!(!second.was_created());
        assert_eq!(second.record().id, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        store.insert(new_op(100, Operator::Add, 100, 200)).await.unwrap();
        store.insert(new_op(200, Operator::Add, 200, 400)).await.unwrap();
        store.insert(new_op(300, Operator::Add, 300, 600)).await.unwrap();

        let ids: Vec<i64> = store.list(2).await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = MemoryStore::new();
        store.insert(new_op(100, Operator::Add, 100, 200)).await.unwrap();
        store.insert(new_op(100, Operator::Subtract, 100, 0)).await.unwrap();

        assert!(store.delete(1).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
        assert!(store.get(1).await.unwrap().is_none());

        assert_eq!(store.clear().await.unwrap(), 1);
        assert!(store.list(50).await.unwrap().is_empty());

        // ids não são reutilizados
        let outcome = store.insert(new_op(100, Operator::Add, 100, 200)).await.unwrap();
        assert_eq!(outcome.record().id, 3);
    }
}
