//! # Abacus
//!
//! Calculadora HTTP com cache persistente de operações.
//!
//! Cada operação (`num1 operador num2`) é normalizada para centésimos,
//! calculada uma única vez e guardada; pedidos repetidos são servidos
//! do armazenamento.
//!
//! ## Módulos
//!
//! - [`calc`] - Operadores, arredondamento e avaliação
//! - [`store`] - Armazenamento de operações (SQLite e memória)
//! - [`cache`] - Gateway de cálculo com memoização
//! - [`http`] - API HTTP (axum)
//! - [`cli`] - Interface de linha de comando
//! - [`types`] - Configuração e erros compartilhados

pub mod cache;
pub mod calc;
#[cfg(feature = "cli")]
pub mod cli;
pub mod http;
pub mod store;
pub mod types;

pub use types::config::Config;
pub use types::errors::{AbacusError, AbacusResult};
