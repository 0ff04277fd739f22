//! Diagnostic event types and definitions
//!
//! This module defines the non-fatal problems the compiler reports
//! while still producing best-effort SQL.

use query_model::QueryId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// Graph joins left over after the relaxation bound
    UnresolvedJoinOrder,
    /// Graph join whose tables were all introduced already; it was dropped
    AmbiguousJoin,
    /// Non-cross join without any ON condition
    EmptyJoinCondition,
    /// `{Name}` does not match any sibling query
    DanglingSubqueryReference,
    /// Sub-query, set member or INSERT source that is not in the snapshot
    MissingQuery,
    /// Referenced query exists but cannot be compiled (no tables)
    InvalidSubquery,
    /// A query references itself, directly or through other queries
    CyclicReference,
    /// Column, join or using row pointing at a table id not in the query
    UnknownTable,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedJoinOrder => "unresolved_join_order",
            DiagnosticKind::AmbiguousJoin => "ambiguous_join",
            DiagnosticKind::EmptyJoinCondition => "empty_join_condition",
            DiagnosticKind::DanglingSubqueryReference => "dangling_subquery_reference",
            DiagnosticKind::MissingQuery => "missing_query",
            DiagnosticKind::InvalidSubquery => "invalid_subquery",
            DiagnosticKind::CyclicReference => "cyclic_reference",
            DiagnosticKind::UnknownTable => "unknown_table",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal compiler diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Query being compiled when the problem was found
    pub query_id: QueryId,
    pub message: String,
    /// Event timestamp (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, query_id: QueryId, message: impl Into<String>) -> Self {
        Self {
            kind,
            query_id,
            message: message.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl PartialEq for Diagnostic {
    /// Timestamps are ignored so repeated compilations compare equal
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.query_id == other.query_id && self.message == other.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] query {}: {}", self.kind, self.query_id, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(DiagnosticKind::CyclicReference, 3, "A -> B -> A");
        assert_eq!(diagnostic.to_string(), "[cyclic_reference] query 3: A -> B -> A");
    }

    #[test]
    fn test_equality_ignores_timestamp() {
        let first = Diagnostic::new(DiagnosticKind::AmbiguousJoin, 1, "dropped");
        let mut second = first.clone();
        second.timestamp = second.timestamp + chrono::Duration::seconds(5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialize_kind() {
        let json = serde_json::to_string(&DiagnosticKind::MissingQuery).unwrap();
        assert_eq!(json, "\"missingQuery\"");
    }
}
