//! Error types for the QueryCraft crate
//!
//! This module contains all error types that can be returned by QueryCraft operations.

use config::ConfigError;
use diagnostics::DiagnosticsError;
use query_model::ModelError;
use sql_compiler::CompileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryCraftError {
    #[error("Compilation error: {0}")]
    Compile(#[from] CompileError),

    #[error("Query model error: {0}")]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Diagnostics error: {0}")]
    Diagnostics(#[from] DiagnosticsError),
}
