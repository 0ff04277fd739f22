//! Consistent snapshot of every query tab, handed to the compiler

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::query::QueryModel;
use crate::types::QueryId;

/// The active query id plus all sibling queries, frozen for one compilation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySnapshot {
    pub active: QueryId,
    #[serde(default)]
    pub queries: Vec<QueryModel>,
}

impl QuerySnapshot {
    pub fn new(active: QueryId, queries: Vec<QueryModel>) -> Self {
        Self { active, queries }
    }

    /// Decode a snapshot sent by the editor as JSON
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn query(&self, id: QueryId) -> Option<&QueryModel> {
        self.queries.iter().find(|query| query.id == id)
    }

    pub fn active_query(&self) -> Result<&QueryModel, ModelError> {
        self.query(self.active)
            .ok_or(ModelError::QueryNotFound(self.active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QueryType;

    #[test]
    fn test_decode_snapshot() {
        let json = r#"{
            "active": 2,
            "queries": [
                {"id": 1, "name": "Cities", "queryType": "SELECT"},
                {"id": 2, "name": "Purge", "queryType": "DELETE",
                 "tables": [{"id": 1, "schema": "public", "name": "city"}]}
            ]
        }"#;

        let snapshot = QuerySnapshot::from_json(json).unwrap();
        let active = snapshot.active_query().unwrap();

        assert_eq!(active.name, "Purge");
        assert_eq!(active.query_type, QueryType::Delete);
        assert_eq!(active.tables.len(), 1);
    }

    #[test]
    fn test_missing_active_query() {
        let snapshot = QuerySnapshot::new(9, vec![QueryModel::new(1, "A", QueryType::Select)]);
        assert!(matches!(
            snapshot.active_query(),
            Err(ModelError::QueryNotFound(9))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            QuerySnapshot::from_json("{not json"),
            Err(ModelError::Decode(_))
        ));
    }
}
