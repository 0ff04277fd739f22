//! Error types for query model updates and snapshot decoding

use thiserror::Error;

use crate::types::{ColumnId, QueryId, TableId};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Table not found in query: {0}")]
    TableNotFound(TableId),

    #[error("Column not found in query: {0}")]
    ColumnNotFound(ColumnId),

    #[error("Query not found in snapshot: {0}")]
    QueryNotFound(QueryId),

    #[error("Snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
