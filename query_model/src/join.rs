//! Join edges, DELETE/UPDATE using rows and set operations

use serde::{Deserialize, Serialize};

use crate::types::{JoinType, QueryId, SetOperator, TableId};

/// Generate a random `#rrggbb` color used by the editor to tell joins apart
pub fn random_color() -> String {
    let value = rand::random::<u32>() & 0x00FF_FFFF;
    format!("#{:06x}", value)
}

/// One equality predicate `main.column = secondary.column`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinCondition {
    pub main_table: TableId,
    pub main_column: String,
    pub secondary_table: TableId,
    pub secondary_column: String,
}

impl JoinCondition {
    pub fn new(
        main_table: TableId,
        main_column: impl Into<String>,
        secondary_table: TableId,
        secondary_column: impl Into<String>,
    ) -> Self {
        Self {
            main_table,
            main_column: main_column.into(),
            secondary_table,
            secondary_column: secondary_column.into(),
        }
    }
}

/// One FROM/JOIN edge; its conditions are ANDed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    #[serde(default)]
    pub join_type: JoinType,
    /// Editor-only, ignored by the compiler
    #[serde(default)]
    pub color: String,
    pub main_table: TableId,
    #[serde(default)]
    pub conditions: Vec<JoinCondition>,
}

impl Join {
    pub fn new(join_type: JoinType, main_table: TableId) -> Self {
        Self {
            join_type,
            color: random_color(),
            main_table,
            conditions: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: JoinCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Secondary tables in first-appearance order
    pub fn secondary_tables(&self) -> Vec<TableId> {
        let mut tables = Vec::new();
        for condition in &self.conditions {
            if condition.secondary_table != self.main_table
                && !tables.contains(&condition.secondary_table)
            {
                tables.push(condition.secondary_table);
            }
        }
        tables
    }

    /// Main table followed by every secondary table
    pub fn tables(&self) -> Vec<TableId> {
        let mut tables = vec![self.main_table];
        tables.extend(self.secondary_tables());
        tables
    }

    pub fn touches(&self, table_id: TableId) -> bool {
        self.main_table == table_id
            || self
                .conditions
                .iter()
                .any(|condition| condition.secondary_table == table_id)
    }
}

/// DELETE/UPDATE auxiliary table, lowered to `USING` or `FROM`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Using {
    pub main_table: TableId,
    #[serde(default)]
    pub conditions: Vec<JoinCondition>,
}

impl Using {
    pub fn new(main_table: TableId) -> Self {
        Self {
            main_table,
            conditions: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: JoinCondition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// Right-hand operand of a UNION/INTERSECT/EXCEPT chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetOperation {
    #[serde(rename = "type")]
    pub operator: SetOperator,
    pub query_id: QueryId,
}

impl SetOperation {
    pub fn new(operator: SetOperator, query_id: QueryId) -> Self {
        Self { operator, query_id }
    }
}
