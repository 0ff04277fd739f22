//! Typed table selection payload decoded once at the editor boundary

use serde::{Deserialize, Serialize};

use crate::types::TableId;

/// A catalog table the user picked to add to a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableTemplate {
    pub schema: String,
    pub name: String,
}

impl TableTemplate {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

/// What the table picker hands over when a table is added
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TableSelection {
    /// Another reference to a table already present in the query (self join)
    Existing {
        #[serde(rename = "tableId")]
        table_id: TableId,
    },
    /// A table taken from the catalog
    New(TableTemplate),
}
