//! Convenience re-exports for common QueryCraft usage
//!
//! # Example
//!
//! ```rust
//! use querycraft::prelude::*;
//!
//! let query = QueryModel::new(1, "Cities", QueryType::Select).with_table("public", "city");
//! assert_eq!(query.tables.len(), 1);
//! ```

// Core QueryCraft components
pub use crate::core::QueryCompiler;
pub use crate::errors::QueryCraftError;

// Re-export centralized config
pub use config::{AppConfig, CompilerConfig, DiagnosticsConfig, DialectConfig};

// Model types
pub use query_model::{
    Join, JoinCondition, JoinType, QueryColumn, QueryModel, QuerySnapshot, QueryTable, QueryType,
    SetOperation, SetOperator, TableSelection, TableTemplate, Using,
};

// Compiler
pub use sql_compiler::{compile, compile_with, quote, CompiledQuery, ReservedKeywordSet};

// Diagnostics channel
pub use diagnostics::{CallbackId, Diagnostic, DiagnosticKind, DiagnosticManager};
