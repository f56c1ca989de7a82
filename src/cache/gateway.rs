//! Gateway de cache das operações.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::calc::{Evaluator, Operator, RoundingMode};
use crate::store::{self, NewOperation, OperationRecord, OperationStore};
use crate::types::config::{Config, HistoryConfig};
use crate::{AbacusError, AbacusResult};

/// Resultado de um cálculo: o registro e se veio do cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub record: OperationRecord,
    pub cached: bool,
}

/// Orquestra normalização, consulta, cálculo e persistência.
///
/// O store é injetado, o que permite trocar o SQLite por um dublê em testes.
pub struct CalculationCache {
    evaluator: Evaluator,
    store: Arc<dyn OperationStore>,
    history: HistoryConfig,
}

impl CalculationCache {
    /// Cria um gateway sobre um store existente.
    pub fn new(store: Arc<dyn OperationStore>, rounding: RoundingMode, history: HistoryConfig) -> Self {
        Self {
            evaluator: Evaluator::new(rounding),
            store,
            history,
        }
    }

    /// Abre o store configurado e monta o gateway.
    pub fn from_config(config: &Config) -> AbacusResult<Self> {
        let store = store::open(&config.store)?;
        info!(
            backend = store.backend(),
            rounding = %config.calculator.rounding,
            "Calculation cache ready"
        );
        Ok(Self::new(
            store,
            config.calculator.rounding,
            config.history.clone(),
        ))
    }

    pub fn rounding(&self) -> RoundingMode {
        self.evaluator.mode()
    }

    pub fn store(&self) -> &Arc<dyn OperationStore> {
        &self.store
    }

    /// Calcula `operand1 operator operand2`, reutilizando o registro existente
    /// para a mesma tripla normalizada.
    ///
    /// Validação e divisão por zero falham antes de qualquer consulta ao store.
    #[instrument(skip(self))]
    pub async fn calculate(
        &self,
        operand1: f64,
        operator: Operator,
        operand2: f64,
    ) -> AbacusResult<Calculation> {
        let operation = self.evaluator.normalize(operand1, operator, operand2)?;

        if let Some(record) = self.store.lookup(&operation.key).await? {
            debug!(id = record.id, key = %operation.key, "Cache hit");
            return Ok(Calculation {
                record,
                cached: true,
            });
        }

        debug!(key = %operation.key, "Cache miss");

        let result = self.evaluator.compute(&operation)?;
        let outcome = self
            .store
            .insert(NewOperation {
                key: operation.key,
                result,
            })
            .await?;

        let cached = !outcome.was_created();
        let record = outcome.into_record();

        if cached {
            debug!(id = record.id, "Concurrent insert won, returning stored record");
        } else {
            info!(id = record.id, expression = %record.expression(), "Operation stored");
        }

        Ok(Calculation { record, cached })
    }

    /// Resolve o limite pedido: padrão quando ausente, mínimo 1, máximo configurado.
    pub fn resolve_limit(&self, limit: Option<usize>) -> AbacusResult<usize> {
        match limit {
            None => Ok(self.history.default_limit.min(self.history.max_limit)),
            Some(0) => Err(AbacusError::validation("The limit must be at least 1")),
            Some(n) => Ok(n.min(self.history.max_limit)),
        }
    }

    /// Registros mais recentes primeiro.
    pub async fn history(&self, limit: Option<usize>) -> AbacusResult<Vec<OperationRecord>> {
        let limit = self.resolve_limit(limit)?;
        self.store.list(limit).await
    }

    pub async fn get(&self, id: i64) -> AbacusResult<OperationRecord> {
        self.store
            .get(id)
            .await?
            .ok_or(AbacusError::NotFound(id))
    }

    pub async fn delete(&self, id: i64) -> AbacusResult<()> {
        if !self.store.delete(id).await? {
            return Err(AbacusError::NotFound(id));
        }
        info!(id, "Operation deleted");
        Ok(())
    }

    /// Remove todo o histórico. Irreversível.
    pub async fn clear(&self) -> AbacusResult<usize> {
        let removed = self.store.clear().await?;
        info!(removed, "History cleared");
        Ok(removed)
    }

    pub async fn count(&self) -> AbacusResult<usize> {
        self.store.count().await
    }
}
