//! Identifier quoting
//!
//! Decides whether a table, column or alias name has to be delimited with
//! `"` for PostgreSQL and does so without ever double-quoting.

use std::collections::HashSet;

pub const QUOTE_CHAR: char = '"';

/// PostgreSQL reserved key words (the "reserved" column of the key word table)
const POSTGRES_RESERVED_KEYWORDS: &[&str] = &[
    "ALL",
    "ANALYSE",
    "ANALYZE",
    "AND",
    "ANY",
    "ARRAY",
    "AS",
    "ASC",
    "ASYMMETRIC",
    "AUTHORIZATION",
    "BINARY",
    "BOTH",
    "CASE",
    "CAST",
    "CHECK",
    "COLLATE",
    "COLLATION",
    "COLUMN",
    "CONCURRENTLY",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "CURRENT_CATALOG",
    "CURRENT_DATE",
    "CURRENT_ROLE",
    "CURRENT_SCHEMA",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "CURRENT_USER",
    "DEFAULT",
    "DEFERRABLE",
    "DESC",
    "DISTINCT",
    "DO",
    "ELSE",
    "END",
    "EXCEPT",
    "FALSE",
    "FETCH",
    "FOR",
    "FOREIGN",
    "FREEZE",
    "FROM",
    "FULL",
    "GRANT",
    "GROUP",
    "HAVING",
    "ILIKE",
    "IN",
    "INITIALLY",
    "INNER",
    "INTERSECT",
    "INTO",
    "IS",
    "ISNULL",
    "JOIN",
    "LATERAL",
    "LEADING",
    "LEFT",
    "LIKE",
    "LIMIT",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "NATURAL",
    "NOT",
    "NOTNULL",
    "NULL",
    "OFFSET",
    "ON",
    "ONLY",
    "OR",
    "ORDER",
    "OUTER",
    "OVERLAPS",
    "PLACING",
    "PRIMARY",
    "REFERENCES",
    "RETURNING",
    "RIGHT",
    "SELECT",
    "SESSION_USER",
    "SIMILAR",
    "SOME",
    "SYMMETRIC",
    "SYSTEM_USER",
    "TABLE",
    "TABLESAMPLE",
    "THEN",
    "TO",
    "TRAILING",
    "TRUE",
    "UNION",
    "UNIQUE",
    "USER",
    "USING",
    "VARIADIC",
    "VERBOSE",
    "WHEN",
    "WHERE",
    "WINDOW",
    "WITH",
];

/// Case-insensitive set of words that must be quoted when used as identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedKeywordSet {
    keywords: HashSet<String>,
}

impl ReservedKeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(keywords);
        set
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in PostgreSQL reserved key words
    pub fn postgres() -> Self {
        Self::new(POSTGRES_RESERVED_KEYWORDS)
    }

    pub fn extend<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords.extend(
            keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_ascii_uppercase())
                .filter(|keyword| !keyword.is_empty()),
        );
    }

    pub fn contains(&self, word: &str) -> bool {
        self.keywords.contains(&word.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Starts and ends with the quote character
pub fn is_delimited(identifier: &str) -> bool {
    identifier.len() >= 2
        && identifier.starts_with(QUOTE_CHAR)
        && identifier.ends_with(QUOTE_CHAR)
}

/// Lower-case letters, digits, `_` and `$`, not starting with a digit or `$`.
/// Upper-case letters need quoting too: PostgreSQL folds unquoted names.
fn is_plain_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
}

pub fn needs_quoting(identifier: &str, keywords: &ReservedKeywordSet) -> bool {
    if identifier.is_empty() || is_delimited(identifier) {
        return false;
    }
    !is_plain_identifier(identifier) || keywords.contains(identifier)
}

/// Quote an identifier if the dialect requires it
pub fn quote(identifier: &str, keywords: &ReservedKeywordSet) -> String {
    if !needs_quoting(identifier, keywords) {
        return identifier.to_string();
    }

    let escaped = identifier.replace(QUOTE_CHAR, "\"\"");
    format!("{}{}{}", QUOTE_CHAR, escaped, QUOTE_CHAR)
}
