//! Normalização, validação e cálculo das operações.

use serde::{Deserialize, Serialize};

use crate::{AbacusError, AbacusResult};

use super::rounding::{Cents, RoundingMode};

/// Maior magnitude aceita para um operando.
pub const OPERAND_LIMIT: f64 = 999.99;

/// Maior magnitude armazenável para um resultado (DECIMAL(8,2)).
pub const RESULT_LIMIT: Cents = Cents::from_hundredths(99_999_999);

/// Operador aritmético binário.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    /// Todos os operadores suportados.
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// Símbolo usado na API e no armazenamento.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    /// Aplica o operador em aritmética IEEE.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
            Operator::Multiply => a * b,
            Operator::Divide => a / b,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for Operator {
    type Err = AbacusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == s.trim())
            .ok_or_else(|| {
                AbacusError::validation(format!(
                    "The operator must be one of +, -, *, / (got '{}')",
                    s
                ))
            })
    }
}

/// Chave de cache: a tripla normalizada na representação de armazenamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationKey {
    pub operand1: Cents,
    pub operator: Operator,
    pub operand2: Cents,
}

impl std::fmt::Display for OperationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.operand1, self.operator, self.operand2)
    }
}

/// Operação validada, pronta para consulta no cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedOperation {
    /// Chave de cache (operandos arredondados).
    pub key: OperationKey,
    raw1: f64,
    raw2: f64,
}

impl NormalizedOperation {
    /// Operandos crus recebidos.
    pub fn raw_operands(&self) -> (f64, f64) {
        (self.raw1, self.raw2)
    }
}

/// Resultado de uma avaliação: chave normalizada e resultado arredondado.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub key: OperationKey,
    pub result: Cents,
}

/// Normalizador/avaliador puro, parametrizado pela política de arredondamento.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    mode: RoundingMode,
}

impl Evaluator {
    /// Cria um avaliador com a política informada.
    pub fn new(mode: RoundingMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> RoundingMode {
        self.mode
    }

    /// Valida os operandos, arredonda para a representação de armazenamento e
    /// rejeita divisão por zero.
    ///
    /// Nada é consultado nem calculado se esta etapa falhar.
    pub fn normalize(
        &self,
        operand1: f64,
        operator: Operator,
        operand2: f64,
    ) -> AbacusResult<NormalizedOperation> {
        let stored1 = self.normalize_operand("num1", operand1)?;
        let stored2 = self.normalize_operand("num2", operand2)?;

        if operator == Operator::Divide && stored2.is_zero() {
            return Err(AbacusError::DivisionByZero);
        }

        Ok(NormalizedOperation {
            key: OperationKey {
                operand1: stored1,
                operator,
                operand2: stored2,
            },
            raw1: operand1,
            raw2: operand2,
        })
    }

    fn normalize_operand(&self, field: &str, value: f64) -> AbacusResult<Cents> {
        if !value.is_finite() {
            return Err(AbacusError::validation(format!(
                "The {} field must be a finite number",
                field
            )));
        }

        if !(-OPERAND_LIMIT..=OPERAND_LIMIT).contains(&value) {
            return Err(AbacusError::validation(format!(
                "The {} field must be between -{} and {}",
                field, OPERAND_LIMIT, OPERAND_LIMIT
            )));
        }

        self.mode.round(value).ok_or_else(|| {
            AbacusError::validation(format!("The {} field cannot be represented", field))
        })
    }

    /// Calcula o resultado arredondado de uma operação já normalizada.
    pub fn compute(&self, operation: &NormalizedOperation) -> AbacusResult<Cents> {
        let key = &operation.key;

        let (a, b) = if self.mode.rounds_operands_before_compute() {
            (key.operand1.as_f64(), key.operand2.as_f64())
        } else {
            operation.raw_operands()
        };

        if key.operator == Operator::Divide && b == 0.0 {
            return Err(AbacusError::DivisionByZero);
        }

        let result = self
            .mode
            .round(key.operator.apply(a, b))
            .ok_or_else(|| AbacusError::validation("The result is not a finite number"))?;

        if result.hundredths().abs() > RESULT_LIMIT.hundredths() {
            return Err(AbacusError::validation(format!(
                "The result {} exceeds the storable range",
                result
            )));
        }

        Ok(result)
    }

    /// Normaliza e calcula em um só passo.
    pub fn evaluate(
        &self,
        operand1: f64,
        operator: Operator,
        operand2: f64,
    ) -> AbacusResult<Evaluation> {
        let operation = self.normalize(operand1, operator, operand2)?;
        let result = self.compute(&operation)?;
        Ok(Evaluation {
            key: operation.key,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_up() -> Evaluator {
        Evaluator::new(RoundingMode::HalfUp)
    }

    fn ceiling() -> Evaluator {
        Evaluator::new(RoundingMode::Ceiling)
    }

    #[test]
    fn test_simple_addition() {
        let eval = half_up().evaluate(2.0, Operator::Add, 3.0).unwrap();
        assert_eq!(eval.result.to_string(), "5.00");
        assert_eq!(eval.key.to_string(), "2.00 + 3.00");
    }

    #[test]
    fn test_all_operators() {
        let e = half_up();
        assert_eq!(e.evaluate(7.5, Operator::Subtract, 2.25).unwrap().result.hundredths(), 525);
        assert_eq!(e.evaluate(1.5, Operator::Multiply, 4.0).unwrap().result.hundredths(), 600);
        assert_eq!(e.evaluate(10.0, Operator::Divide, 3.0).unwrap().result.hundredths(), 333);
    }

    #[test]
    fn test_boundaries() {
        let e = half_up();
        assert!(e.evaluate(999.99, Operator::Add, -999.99).is_ok());
        assert!(matches!(
            e.evaluate(1000.0, Operator::Add, 1.0),
            Err(AbacusError::Validation(_))
        ));
        assert!(matches!(
            e.evaluate(1.0, Operator::Add, -1000.0),
            Err(AbacusError::Validation(_))
        ));
        assert!(matches!(
            e.evaluate(f64::NAN, Operator::Add, 1.0),
            Err(AbacusError::Validation(_))
        ));
    }

    #[test]
    fn test_largest_product_fits() {
        let eval = half_up()
            .evaluate(999.99, Operator::Multiply, 999.99)
            .unwrap();
        assert_eq!(eval.result.to_string(), "999980.00");
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            half_up().evaluate(10.0, Operator::Divide, 0.0),
            Err(AbacusError::DivisionByZero)
        ));
        // 0.004 vira 0.00 na representação de armazenamento
        assert!(matches!(
            half_up().evaluate(10.0, Operator::Divide, 0.004),
            Err(AbacusError::DivisionByZero)
        ));
        // teto de -0.001 também é 0.00
        assert!(matches!(
            ceiling().evaluate(10.0, Operator::Divide, -0.001),
            Err(AbacusError::DivisionByZero)
        ));
        // zero só é problema na divisão
        assert!(half_up().evaluate(10.0, Operator::Multiply, 0.0).is_ok());
    }

    #[test]
    fn test_half_up_computes_on_raw_operands() {
        // 1.004 + 1.004 = 2.008 -> 2.01, embora cada operando armazenado seja 1.00
        let eval = half_up().evaluate(1.004, Operator::Add, 1.004).unwrap();
        assert_eq!(eval.key.operand1.hundredths(), 100);
        assert_eq!(eval.key.operand2.hundredths(), 100);
        assert_eq!(eval.result.hundredths(), 201);
    }

    #[test]
    fn test_ceiling_rounds_operands_first() {
        // 1.001 -> 1.01; 1.01 + 1.01 = 2.02
        let eval = ceiling().evaluate(1.001, Operator::Add, 1.001).unwrap();
        assert_eq!(eval.key.operand1.hundredths(), 101);
        assert_eq!(eval.result.hundredths(), 202);

        // 10 / 3 = 3.333.. -> 3.34
        let eval = ceiling().evaluate(10.0, Operator::Divide, 3.0).unwrap();
        assert_eq!(eval.result.hundredths(), 334);
    }

    #[test]
    fn test_deterministic() {
        for mode in [RoundingMode::HalfUp, RoundingMode::Ceiling] {
            let e = Evaluator::new(mode);
            let a = e.evaluate(123.456, Operator::Divide, 7.89).unwrap();
            let b = e.evaluate(123.456, Operator::Divide, 7.89).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_operator_parsing() {
        assert_eq!("+".parse::<Operator>().unwrap(), Operator::Add);
        assert_eq!(" / ".parse::<Operator>().unwrap(), Operator::Divide);
        assert!(matches!("%".parse::<Operator>(), Err(AbacusError::Validation(_))));
        assert!(matches!("x".parse::<Operator>(), Err(AbacusError::Validation(_))));
    }

    #[test]
    fn test_operator_serde_symbols() {
        assert_eq!(serde_json::to_string(&Operator::Multiply).unwrap(), "\"*\"");
        let op: Operator = serde_json::from_str("\"-\"").unwrap();
        assert_eq!(op, Operator::Subtract);
    }
}
