// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Keyword vocabulary consumed by the tokenizer.
//!
//! The vocabulary is pure data: ordered lists of boundary symbols and
//! keyword phrases. Swapping the lists changes the recognized dialect
//! without touching tokenizer or formatter logic.

/// Boundary symbols recognized as punctuation/operator tokens.
const DEFAULT_BOUNDARIES: &[&str] = &[
    ",", ";", ":", ")", "(", ".", "=", "<", ">", "+", "-", "*", "/", "!", "^", "%", "|", "&", "#",
];

/// Phrases that open a major clause: newline before, indented body after.
const DEFAULT_RESERVED_TOP_LEVEL: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "SET",
    "ORDER BY",
    "GROUP BY",
    "LIMIT",
    "DROP",
    "VALUES",
    "UPDATE",
    "HAVING",
    "ADD",
    "AFTER",
    "ALTER TABLE",
    "DELETE FROM",
    "UNION ALL",
    "UNION",
    "EXCEPT",
    "INTERSECT",
];

/// Keywords that force a line break without changing indentation.
const DEFAULT_RESERVED_NEWLINE: &[&str] = &[
    "LEFT OUTER JOIN",
    "RIGHT OUTER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "OUTER JOIN",
    "INNER JOIN",
    "CROSS JOIN",
    "STRAIGHT_JOIN",
    "JOIN",
    "XOR",
    "OR",
    "AND",
];

/// Generic reserved words. Multi-word phrases precede their prefixes so
/// ordered matching picks the longest spelling first.
const DEFAULT_RESERVED: &[&str] = &[
    "ACCESSIBLE",
    "ACTION",
    "AGAINST",
    "AGGREGATE",
    "ALGORITHM",
    "ALL",
    "ALTER",
    "ANALYSE",
    "ANALYZE",
    "AS",
    "ASC",
    "AUTO_INCREMENT",
    "BEGIN",
    "BETWEEN",
    "BIGINT",
    "BINARY",
    "BOOLEAN",
    "BY",
    "CASCADE",
    "CASE",
    "CHARACTER SET",
    "CHECK",
    "COLLATE",
    "COLUMN",
    "COMMENT",
    "COMMIT",
    "CONSTRAINT",
    "CREATE",
    "CURRENT_TIMESTAMP",
    "DATABASE",
    "DECLARE",
    "DEFAULT",
    "DELETE",
    "DESC",
    "DESCRIBE",
    "DISTINCT",
    "DO",
    "ELSE",
    "END",
    "ENGINE",
    "ESCAPE",
    "EXISTS",
    "EXPLAIN",
    "FALSE",
    "FIRST",
    "FLOAT",
    "FOR",
    "FOREIGN KEY",
    "FOREIGN",
    "FULL",
    "FULLTEXT",
    "FUNCTION",
    "GRANT",
    "GROUP",
    "IDENTIFIED",
    "IF",
    "IN",
    "INDEX",
    "INNER",
    "INSERT",
    "INT",
    "INTEGER",
    "INTERVAL",
    "INTO",
    "IS NOT NULL",
    "IS NULL",
    "IS",
    "KEY",
    "LEFT",
    "LIKE",
    "MERGE",
    "MODIFY",
    "NOT NULL",
    "NOT",
    "NULL",
    "OFFSET",
    "ON DELETE",
    "ON UPDATE",
    "ON",
    "ORDER",
    "OUTER",
    "PRIMARY KEY",
    "PRIMARY",
    "PROCEDURE",
    "REFERENCES",
    "RENAME",
    "REPLACE",
    "RESTRICT",
    "RETURN",
    "RIGHT",
    "ROLLBACK",
    "ROW",
    "ROWS",
    "SHOW",
    "SMALLINT",
    "TABLE",
    "TEMPORARY",
    "THEN",
    "TO",
    "TOP",
    "TRANSACTION",
    "TRIGGER",
    "TRUE",
    "TRUNCATE",
    "UNIQUE",
    "UNSIGNED",
    "USE",
    "USING",
    "VARCHAR",
    "VIEW",
    "WHEN",
    "WITH",
];

/// Function names: classified as reserved only when a parenthesis follows.
const DEFAULT_FUNCTIONS: &[&str] = &[
    "ABS",
    "AVG",
    "CAST",
    "CEIL",
    "CEILING",
    "COALESCE",
    "CONCAT",
    "CONVERT",
    "COUNT",
    "CURDATE",
    "CURTIME",
    "DATE",
    "DATEDIFF",
    "DATE_ADD",
    "DATE_FORMAT",
    "DATE_SUB",
    "DAY",
    "EXTRACT",
    "FLOOR",
    "FORMAT",
    "GREATEST",
    "GROUP_CONCAT",
    "HOUR",
    "IFNULL",
    "LEAST",
    "LENGTH",
    "LOWER",
    "LPAD",
    "LTRIM",
    "MAX",
    "MIN",
    "MINUTE",
    "MOD",
    "MONTH",
    "NOW",
    "NULLIF",
    "POWER",
    "RAND",
    "ROUND",
    "RPAD",
    "RTRIM",
    "SECOND",
    "SUBSTR",
    "SUBSTRING",
    "SUM",
    "TRIM",
    "UPPER",
    "YEAR",
];

/// Ordered keyword lists for one SQL dialect.
///
/// Built once, read by every tokenize call; never mutated afterwards, so a
/// shared instance is safe across threads without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    boundaries: Vec<String>,
    reserved_top_level: Vec<String>,
    reserved_newline: Vec<String>,
    reserved: Vec<String>,
    functions: Vec<String>,
}

impl Vocabulary {
    pub fn new(
        boundaries: Vec<String>,
        reserved_top_level: Vec<String>,
        reserved_newline: Vec<String>,
        reserved: Vec<String>,
        functions: Vec<String>,
    ) -> Self {
        let mut boundaries = boundaries;
        // Longest symbol first, so prefix matching picks e.g. "<=" over "<".
        boundaries.sort_by(|a, b| b.len().cmp(&a.len()));
        Self {
            boundaries,
            reserved_top_level,
            reserved_newline,
            reserved,
            functions,
        }
    }

    pub fn reserved_top_level(&self) -> &[String] {
        &self.reserved_top_level
    }

    pub fn reserved_newline(&self) -> &[String] {
        &self.reserved_newline
    }

    pub fn reserved(&self) -> &[String] {
        &self.reserved
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    /// Byte length of the longest configured boundary symbol prefixing `rest`.
    pub fn match_boundary(&self, rest: &str) -> Option<usize> {
        self.boundaries
            .iter()
            .find(|symbol| rest.starts_with(symbol.as_str()))
            .map(|symbol| symbol.len())
    }

    pub fn is_boundary_start(&self, rest: &str) -> bool {
        self.match_boundary(rest).is_some()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|item| item.to_string()).collect();
        Self::new(
            owned(DEFAULT_BOUNDARIES),
            owned(DEFAULT_RESERVED_TOP_LEVEL),
            owned(DEFAULT_RESERVED_NEWLINE),
            owned(DEFAULT_RESERVED),
            owned(DEFAULT_FUNCTIONS),
        )
    }
}
