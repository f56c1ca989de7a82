//! Normalizador/avaliador das operações aritméticas.
//!
//! Valida o intervalo dos operandos, aplica a política de arredondamento
//! (ver [`RoundingMode`]) e calcula o resultado. Não tem efeitos colaterais.

mod evaluator;
mod rounding;

pub use evaluator::{
    Evaluation, Evaluator, NormalizedOperation, OperationKey, Operator, OPERAND_LIMIT,
    RESULT_LIMIT,
};
pub use rounding::{Cents, RoundingMode};
