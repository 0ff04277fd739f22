use query_model::{QueryId, QueryType};
use thiserror::Error;

/// Fatal preconditions; everything else degrades into diagnostics
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Query {0} has no tables: the anchor table is required")]
    MissingAnchorTable(QueryId),

    #[error("Query not found: {0}")]
    UnknownQuery(QueryId),

    #[error("Unsupported statement for this position: {0:?}")]
    UnsupportedStatement(QueryType),
}
