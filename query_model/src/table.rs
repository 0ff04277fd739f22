//! Tables taking part in a query

use serde::{Deserialize, Serialize};

use crate::types::TableId;

fn default_schema() -> String {
    "public".to_string()
}

/// A table (or a repeated reference to one) inside a single query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTable {
    /// Unique within the owning query, correlates columns and joins
    pub id: TableId,
    #[serde(default = "default_schema")]
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl QueryTable {
    pub fn new(id: TableId, schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            schema: schema.into(),
            name: name.into(),
            alias: None,
        }
    }

    /// Add an alias for the table
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Alias if one is set and non-empty
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref().filter(|alias| !alias.is_empty())
    }

    /// Get the table reference (alias if present, otherwise table name)
    pub fn table_ref(&self) -> &str {
        self.alias().unwrap_or(&self.name)
    }

    /// Whether both tables point at the same `(schema, name)` pair
    pub fn same_source(&self, schema: &str, name: &str) -> bool {
        self.schema == schema && self.name == name
    }
}
