//! The query model and its immutable update functions

use serde::{Deserialize, Serialize};

use crate::column::QueryColumn;
use crate::errors::ModelError;
use crate::join::{Join, SetOperation, Using};
use crate::selection::TableSelection;
use crate::table::QueryTable;
use crate::types::{ColumnId, QueryId, QueryType, TableId};

/// One editable query tab
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryModel {
    pub id: QueryId,
    pub name: String,
    pub query_type: QueryType,
    /// The first table is the anchor of the FROM clause
    pub tables: Vec<QueryTable>,
    pub columns: Vec<QueryColumn>,
    pub joins: Vec<Join>,
    pub using: Vec<Using>,
    pub set_operations: Vec<SetOperation>,
    pub distinct: bool,
    /// Row count for `FETCH FIRST n ROWS`
    pub limit: Option<u64>,
    pub with_ties: bool,
    pub returning: bool,
    /// INSERT source query
    pub from_query: Option<QueryId>,
    /// Joins were drawn on the graph canvas instead of the join list
    pub is_drag_and_drop: bool,
}

impl QueryModel {
    pub fn new(id: QueryId, name: impl Into<String>, query_type: QueryType) -> Self {
        Self {
            id,
            name: name.into(),
            query_type,
            ..Self::default()
        }
    }

    /// First table of the query; never emitted as a JOIN
    pub fn anchor_table(&self) -> Option<&QueryTable> {
        self.tables.first()
    }

    pub fn table(&self, id: TableId) -> Option<&QueryTable> {
        self.tables.iter().find(|table| table.id == id)
    }

    pub fn column(&self, id: ColumnId) -> Option<&QueryColumn> {
        self.columns.iter().find(|column| column.id == id)
    }

    pub fn columns_of(&self, table_id: TableId) -> impl Iterator<Item = &QueryColumn> {
        self.columns
            .iter()
            .filter(move |column| column.table_id == table_id)
    }

    pub fn displayed_columns(&self) -> impl Iterator<Item = &QueryColumn> {
        self.columns.iter().filter(|column| column.display_in_query)
    }

    /// Any displayed column carries an aggregate, so GROUP BY is inferred
    pub fn has_aggregates(&self) -> bool {
        self.displayed_columns().any(QueryColumn::has_aggregate)
    }

    pub fn has_set_operations(&self) -> bool {
        !self.set_operations.is_empty()
    }

    fn next_table_id(&self) -> TableId {
        self.tables.iter().map(|table| table.id).max().unwrap_or(0) + 1
    }

    fn next_column_id(&self) -> ColumnId {
        self.columns.iter().map(|column| column.id).max().unwrap_or(0) + 1
    }

    /// Alias for a new reference to `(schema, name)`: none for the first one,
    /// then `name_1`, `name_2`, ... skipping suffixes already taken
    fn alias_for(&self, schema: &str, name: &str) -> Option<String> {
        let existing = self
            .tables
            .iter()
            .filter(|table| table.same_source(schema, name))
            .count();
        if existing == 0 {
            return None;
        }

        let mut suffix = existing;
        loop {
            let candidate = format!("{}_{}", name, suffix);
            if !self.tables.iter().any(|table| table.alias() == Some(&candidate)) {
                return Some(candidate);
            }
            suffix += 1;
        }
    }

    /// Add a table; repeated `(schema, name)` pairs get a suffixed alias once,
    /// at add time
    pub fn with_table(&self, schema: &str, name: &str) -> Self {
        let mut table = QueryTable::new(self.next_table_id(), schema, name);
        table.alias = self.alias_for(schema, name);

        #[cfg(feature = "debug-logging")]
        tracing::debug!(query_id = self.id, table = %name, alias = ?table.alias, "table added to query");

        let mut next = self.clone();
        next.tables.push(table);
        next
    }

    /// Add a table picked in the editor
    pub fn with_table_selection(&self, selection: &TableSelection) -> Result<Self, ModelError> {
        match selection {
            TableSelection::Existing { table_id } => {
                let table = self
                    .table(*table_id)
                    .ok_or(ModelError::TableNotFound(*table_id))?;
                Ok(self.with_table(&table.schema, &table.name))
            }
            TableSelection::New(template) => Ok(self.with_table(&template.schema, &template.name)),
        }
    }

    /// Remove a table together with its columns, joins and using rows
    pub fn without_table(&self, table_id: TableId) -> Result<Self, ModelError> {
        if self.table(table_id).is_none() {
            return Err(ModelError::TableNotFound(table_id));
        }

        let mut next = self.clone();
        next.tables.retain(|table| table.id != table_id);
        next.columns.retain(|column| column.table_id != table_id);
        next.joins.retain(|join| !join.touches(table_id));
        next.using.retain(|using| {
            using.main_table != table_id
                && using
                    .conditions
                    .iter()
                    .all(|condition| condition.secondary_table != table_id)
        });
        Ok(next)
    }

    /// Append a column bound to one of the query tables; assigns its id
    pub fn with_column(&self, column: QueryColumn) -> Result<Self, ModelError> {
        if self.table(column.table_id).is_none() {
            return Err(ModelError::TableNotFound(column.table_id));
        }

        let mut column = column;
        column.id = self.next_column_id();

        let mut next = self.clone();
        next.columns.push(column);
        Ok(next)
    }

    /// Replace the column carrying the same id
    pub fn replace_column(&self, column: QueryColumn) -> Result<Self, ModelError> {
        let position = self
            .columns
            .iter()
            .position(|existing| existing.id == column.id)
            .ok_or(ModelError::ColumnNotFound(column.id))?;

        let mut next = self.clone();
        next.columns[position] = column;
        Ok(next)
    }

    pub fn with_join(&self, join: Join) -> Result<Self, ModelError> {
        for table_id in join.tables() {
            if self.table(table_id).is_none() {
                return Err(ModelError::TableNotFound(table_id));
            }
        }

        let mut next = self.clone();
        next.joins.push(join);
        Ok(next)
    }

    pub fn with_using(&self, using: Using) -> Result<Self, ModelError> {
        if self.table(using.main_table).is_none() {
            return Err(ModelError::TableNotFound(using.main_table));
        }

        let mut next = self.clone();
        next.using.push(using);
        Ok(next)
    }

    pub fn with_set_operation(&self, operation: SetOperation) -> Self {
        let mut next = self.clone();
        next.set_operations.push(operation);
        next
    }

    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::JoinCondition;
    use crate::selection::TableTemplate;
    use crate::types::{JoinType, SetOperator};

    fn city_query() -> QueryModel {
        QueryModel::new(1, "Cities", QueryType::Select).with_table("public", "city")
    }

    #[test]
    fn test_first_table_is_anchor() {
        let query = city_query().with_table("public", "country");
        assert_eq!(query.anchor_table().map(|t| t.name.as_str()), Some("city"));
        assert_eq!(query.tables[1].id, 2);
    }

    #[test]
    fn test_repeated_table_gets_suffixed_alias() {
        let query = city_query()
            .with_table("public", "city")
            .with_table("public", "city");

        assert_eq!(query.tables[0].alias(), None);
        assert_eq!(query.tables[1].alias(), Some("city_1"));
        assert_eq!(query.tables[2].alias(), Some("city_2"));
    }

    #[test]
    fn test_alias_suffix_is_not_recomputed() {
        let query = city_query()
            .with_table("public", "city")
            .with_table("public", "city");
        let query = query.without_table(2).unwrap().with_table("public", "city");

        let aliases: Vec<_> = query.tables.iter().map(|t| t.alias()).collect();
        assert_eq!(aliases, vec![None, Some("city_2"), Some("city_3")]);
    }

    #[test]
    fn test_same_name_other_schema_has_no_alias() {
        let query = city_query().with_table("archive", "city");
        assert_eq!(query.tables[1].alias(), None);
    }

    #[test]
    fn test_table_selection() {
        let query = city_query()
            .with_table_selection(&TableSelection::New(TableTemplate::new("public", "country")))
            .unwrap()
            .with_table_selection(&TableSelection::Existing { table_id: 1 })
            .unwrap();

        assert_eq!(query.tables.len(), 3);
        assert_eq!(query.tables[2].name, "city");
        assert_eq!(query.tables[2].alias(), Some("city_1"));

        assert!(matches!(
            query.with_table_selection(&TableSelection::Existing { table_id: 42 }),
            Err(ModelError::TableNotFound(42))
        ));
    }

    #[test]
    fn test_updates_leave_original_untouched() {
        let original = city_query();
        let updated = original
            .with_column(QueryColumn::new(1, "name"))
            .unwrap();

        assert!(original.columns.is_empty());
        assert_eq!(updated.columns.len(), 1);
        assert_eq!(updated.columns[0].id, 1);
    }

    #[test]
    fn test_column_requires_known_table() {
        assert!(matches!(
            city_query().with_column(QueryColumn::new(5, "name")),
            Err(ModelError::TableNotFound(5))
        ));
    }

    #[test]
    fn test_replace_column() {
        let query = city_query()
            .with_column(QueryColumn::new(1, "name"))
            .unwrap();
        let edited = query.columns[0].clone().with_alias("city_name");
        let query = query.replace_column(edited).unwrap();

        assert_eq!(query.columns[0].alias(), Some("city_name"));
        assert!(matches!(
            query.replace_column(QueryColumn::new(1, "x")),
            Err(ModelError::ColumnNotFound(0))
        ));
    }

    #[test]
    fn test_without_table_drops_dependents() {
        let query = city_query()
            .with_table("public", "country")
            .with_column(QueryColumn::new(2, "name"))
            .unwrap()
            .with_join(
                Join::new(JoinType::Inner, 2)
                    .with_condition(JoinCondition::new(2, "id", 1, "country_id")),
            )
            .unwrap();

        let query = query.without_table(2).unwrap();
        assert_eq!(query.tables.len(), 1);
        assert!(query.columns.is_empty());
        assert!(query.joins.is_empty());
    }

    #[test]
    fn test_join_requires_known_tables() {
        let join = Join::new(JoinType::Left, 1).with_condition(JoinCondition::new(1, "id", 9, "x"));
        assert!(matches!(
            city_query().with_join(join),
            Err(ModelError::TableNotFound(9))
        ));
    }

    #[test]
    fn test_aggregate_detection_ignores_hidden_columns() {
        let query = city_query()
            .with_column(QueryColumn::new(1, "population").with_aggregate("SUM").hidden())
            .unwrap();
        assert!(!query.has_aggregates());

        let query = query
            .with_column(QueryColumn::new(1, "population").with_aggregate("MAX"))
            .unwrap();
        assert!(query.has_aggregates());
    }

    #[test]
    fn test_set_operation_and_rename() {
        let query = city_query()
            .with_set_operation(SetOperation::new(SetOperator::Union, 2))
            .renamed("All cities");

        assert!(query.has_set_operations());
        assert_eq!(query.name, "All cities");
    }
}
