//! SQL Compiler - turns editable query models into PostgreSQL statements
//!
//! The compiler is a pure function of an immutable [`QueryModel`] snapshot,
//! its sibling queries and the dialect's [`ReservedKeywordSet`]. It never
//! fails on malformed-but-parseable input: problems are reported as
//! diagnostics and best-effort SQL is still returned.
//!
//! ```rust
//! use query_model::{QueryColumn, QueryModel, QueryType};
//! use sql_compiler::{compile, ReservedKeywordSet};
//!
//! let query = QueryModel::new(1, "Cities", QueryType::Select).with_table("public", "city");
//! let query = query
//!     .with_column(QueryColumn::new(1, "name").with_filter("= 'X'"))
//!     .unwrap();
//!
//! let compiled = compile(&query, &[], &ReservedKeywordSet::postgres()).unwrap();
//! assert_eq!(compiled.sql, "SELECT city.name\nFROM public.city\nWHERE city.name = 'X';");
//! ```
//!
//! [`QueryModel`]: query_model::QueryModel

/// Conditional trace logging, compiled in only with the `debug-logging` feature
#[cfg(feature = "debug-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod clauses;
pub mod compiler;
pub mod condition;
pub mod context;
pub mod errors;
pub mod join;
pub mod prelude;
pub mod quoting;
pub mod references;
pub mod set_operation;
pub mod statements;
pub mod tokenizer;

#[cfg(test)]
mod tests;

pub use clauses::fields::AggregateFunction;
pub use clauses::ordering::SortOrder;
pub use compiler::{compile, compile_with, CompiledQuery};
pub use condition::compose;
pub use context::CompileContext;
pub use errors::CompileError;
pub use quoting::{quote, ReservedKeywordSet};
pub use tokenizer::{tokenize, LogicalOperator, Token};
