//! Columns selected, filtered, ordered or written by a query

use serde::{Deserialize, Serialize};

use crate::types::{ColumnId, QueryId, TableId};

/// One column slot of a query
///
/// `column_name` starts out equal to `column_name_original`. When the user
/// types something else into the name field the column becomes a raw
/// expression and is emitted verbatim, without a table qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryColumn {
    pub id: ColumnId,
    pub table_id: TableId,
    pub column_name: String,
    pub column_name_original: String,
    pub column_alias: Option<String>,
    /// Aggregate function (SUM, COUNT, ...); makes the column HAVING-eligible
    pub column_aggregate: Option<String>,
    /// Scalar function (LOWER, UPPER, ...)
    pub column_single_line_function: Option<String>,
    pub column_order: bool,
    pub column_order_dir_asc: bool,
    pub column_order_nr: Option<u32>,
    pub column_group_by: bool,
    pub display_in_query: bool,
    /// Free-text filter rows, positional across all columns of the query
    pub column_filters: Vec<String>,
    /// Per-row literal values for INSERT (and the SET value for UPDATE)
    pub column_values: Vec<String>,
    pub returning: bool,
    pub subquery_id: Option<QueryId>,
}

impl Default for QueryColumn {
    fn default() -> Self {
        Self {
            id: 0,
            table_id: 0,
            column_name: String::new(),
            column_name_original: String::new(),
            column_alias: None,
            column_aggregate: None,
            column_single_line_function: None,
            column_order: false,
            column_order_dir_asc: true,
            column_order_nr: None,
            column_group_by: false,
            display_in_query: true,
            column_filters: Vec::new(),
            column_values: Vec::new(),
            returning: false,
            subquery_id: None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl QueryColumn {
    pub fn new(table_id: TableId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table_id,
            column_name_original: name.clone(),
            column_name: name,
            ..Self::default()
        }
    }

    /// Replace the column name with a raw SQL expression
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.column_name = expression.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.column_alias = Some(alias.into());
        self
    }

    pub fn with_aggregate(mut self, aggregate: impl Into<String>) -> Self {
        self.column_aggregate = Some(aggregate.into());
        self
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.column_single_line_function = Some(function.into());
        self
    }

    /// Mark the column for ordering; `rank` of `None` sorts last
    pub fn ordered(mut self, ascending: bool, rank: Option<u32>) -> Self {
        self.column_order = true;
        self.column_order_dir_asc = ascending;
        self.column_order_nr = rank;
        self
    }

    pub fn grouped(mut self) -> Self {
        self.column_group_by = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.display_in_query = false;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.column_filters.push(filter.into());
        self
    }

    pub fn with_filters(mut self, filters: Vec<String>) -> Self {
        self.column_filters = filters;
        self
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.column_values = values;
        self
    }

    pub fn with_returning(mut self) -> Self {
        self.returning = true;
        self
    }

    pub fn linked_to(mut self, query_id: QueryId) -> Self {
        self.subquery_id = Some(query_id);
        self
    }

    pub fn alias(&self) -> Option<&str> {
        non_empty(&self.column_alias)
    }

    pub fn aggregate(&self) -> Option<&str> {
        non_empty(&self.column_aggregate)
    }

    pub fn scalar_function(&self) -> Option<&str> {
        non_empty(&self.column_single_line_function)
    }

    pub fn has_aggregate(&self) -> bool {
        self.aggregate().is_some()
    }

    /// The name slot holds a user-typed expression rather than the catalog name
    pub fn is_raw_expression(&self) -> bool {
        self.column_name != self.column_name_original
    }

    /// Included only in RETURNING, never in VALUES or SET
    pub fn is_returning_only(&self) -> bool {
        self.returning && !self.display_in_query
    }

    /// Rank used for ORDER BY sorting, unset ranks sort last
    pub fn order_rank(&self) -> u32 {
        self.column_order_nr.unwrap_or(u32::MAX)
    }
}
