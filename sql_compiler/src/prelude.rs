//! Convenience re-exports for common sql-compiler usage

pub use crate::compiler::{compile, compile_with, CompiledQuery};
pub use crate::context::CompileContext;
pub use crate::errors::CompileError;
pub use crate::quoting::{quote, ReservedKeywordSet};
pub use crate::tokenizer::{tokenize, LogicalOperator, Token};

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use query_model::{
    Join, JoinCondition, JoinType, QueryColumn, QueryModel, QueryTable, QueryType, SetOperation,
    SetOperator, Using,
};
