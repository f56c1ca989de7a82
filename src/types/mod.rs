//! Tipos compartilhados do Abacus.

pub mod config;
pub mod errors;
