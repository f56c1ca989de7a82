//! Gateway de cache para operações calculadas.
//!
//! Cada tripla (operando, operador, operando) normalizada é calculada uma
//! única vez; pedidos repetidos devolvem o registro persistido.

mod gateway;

pub use gateway::{Calculation, CalculationCache};
