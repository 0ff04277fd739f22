//! Immutable query model shared by the editor and the SQL compiler
//!
//! Every type here is a plain value snapshot. Updates never mutate shared
//! state: the `with_*` functions on [`QueryModel`] build a new model from the
//! old one plus a delta.

pub mod column;
pub mod errors;
pub mod join;
pub mod query;
pub mod selection;
pub mod snapshot;
pub mod table;
pub mod types;

pub use column::QueryColumn;
pub use errors::ModelError;
pub use join::{random_color, Join, JoinCondition, SetOperation, Using};
pub use query::QueryModel;
pub use selection::{TableSelection, TableTemplate};
pub use snapshot::QuerySnapshot;
pub use table::QueryTable;
pub use types::{ColumnId, JoinType, QueryId, QueryType, SetOperator, TableId};
