//! # QueryCraft
//!
//! Compiles UI-editable relational query models into PostgreSQL
//! SELECT/INSERT/UPDATE/DELETE statements, with out-of-band diagnostics.
//!
//! ## Quick Start
//!
//! ```rust
//! use querycraft::prelude::*;
//!
//! let compiler = QueryCompiler::new(AppConfig::default())?;
//! compiler.add_diagnostic_callback(|diagnostic| eprintln!("{}", diagnostic))?;
//!
//! let cities = QueryModel::new(1, "Cities", QueryType::Select)
//!     .with_table("public", "city")
//!     .with_column(QueryColumn::new(1, "name").with_filter("= 'X'"))?;
//!
//! let compiled = compiler.compile(1, &[cities])?;
//! assert_eq!(compiled.sql, "SELECT city.name\nFROM public.city\nWHERE city.name = 'X';");
//! # Ok::<(), querycraft::QueryCraftError>(())
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::QueryCompiler;
pub use errors::QueryCraftError;

// Re-export centralized config
pub use config::{AppConfig, CompilerConfig, DiagnosticsConfig, DialectConfig};

// Re-export member crates
pub use diagnostics;
pub use query_model;
pub use sql_compiler;
