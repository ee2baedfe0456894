//! Fixed keyword classification tables.
//!
//! All lookups are against upper-cased lexemes. Multi-word entries are
//! canonical phrases the lexer merges into a single keyword token.

use phf::{phf_set, Set};

/// Every lexeme the lexer tags as a keyword (single words only; phrases
/// are assembled from these by the merge pass).
pub static KEYWORDS: Set<&'static str> = phf_set! {
    "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AVG", "BETWEEN", "BY",
    "CASE", "CAST", "CHECK", "COALESCE", "COUNT", "CREATE", "CROSS",
    "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXCEPT",
    "EXISTS", "FROM", "FULL", "GROUP", "HAVING", "IN", "INNER", "INSERT",
    "INTERSECT", "INTERVAL", "INTO", "IS", "JOIN", "LAG", "LEAD", "LEFT",
    "LIKE", "LIMIT", "MAX", "MIN", "NATURAL", "NOT", "NULL", "NULLIF",
    "OFFSET", "ON", "OR", "ORDER", "OUTER", "OVER", "PARTITION",
    "RECURSIVE", "RENAME", "RETURNING", "RIGHT", "ROW_NUMBER", "SELECT",
    "SET", "STRAIGHT_JOIN", "SUM", "THEN", "TRUNCATE", "UNION", "UPDATE",
    "USING", "VALUES", "WHEN", "WHERE", "WITH", "XOR",
};

/// Multi-word keyword phrases. The lexer merges consecutive keyword words
/// into one token when they spell one of these.
pub static PHRASES: Set<&'static str> = phf_set! {
    "GROUP BY", "ORDER BY", "PARTITION BY",
    "JOIN", "INNER JOIN", "CROSS JOIN", "NATURAL JOIN",
    "LEFT JOIN", "RIGHT JOIN", "FULL JOIN",
    "LEFT OUTER JOIN", "RIGHT OUTER JOIN", "FULL OUTER JOIN",
    "UNION ALL", "UNION DISTINCT",
    "IS NULL", "IS NOT", "IS NOT NULL", "NOT NULL",
    "NOT LIKE", "NOT IN", "NOT BETWEEN", "NOT EXISTS",
};

/// Clause-opening keywords that are candidates for river alignment.
pub static ROOT_CLAUSES: Set<&'static str> = phf_set! {
    "SELECT", "FROM", "WHERE", "GROUP BY", "HAVING", "ORDER BY", "LIMIT",
    "OFFSET", "VALUES", "SET", "INSERT", "UPDATE", "DELETE", "WITH",
    "PARTITION BY", "RETURNING", "UNION", "UNION ALL", "UNION DISTINCT",
};

/// Keywords that appear clause-like but never open an aligned line.
pub static NOT_ROOT_KEYWORDS: Set<&'static str> = phf_set! {
    "CHECK", "DESC", "INTO", "ON",
};

/// Join keyword phrases, including the multi-word forms.
pub static JOINS: Set<&'static str> = phf_set! {
    "JOIN", "INNER JOIN", "CROSS JOIN", "NATURAL JOIN", "STRAIGHT_JOIN",
    "LEFT JOIN", "RIGHT JOIN", "FULL JOIN",
    "LEFT OUTER JOIN", "RIGHT OUTER JOIN", "FULL OUTER JOIN",
};

/// Set-operation keywords that separate whole queries.
pub static UNIONS: Set<&'static str> = phf_set! {
    "UNION", "UNION ALL", "UNION DISTINCT",
};

/// Any of these anywhere in a batch suppresses formatting entirely.
pub static DDL_KEYWORDS: Set<&'static str> = phf_set! {
    "ALTER", "CREATE", "DROP", "RENAME", "TRUNCATE",
};

pub static LOGICAL_OPERATORS: Set<&'static str> = phf_set! {
    "AND", "NOT", "OR", "XOR",
};

/// The branch keywords of a CASE expression (THEN and END are handled
/// separately by the engine).
pub static CASE_CLAUSES: Set<&'static str> = phf_set! {
    "WHEN", "ELSE",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_are_never_root() {
        for join in JOINS.iter() {
            assert!(!ROOT_CLAUSES.contains(join), "{join} must not be a root clause");
        }
    }

    #[test]
    fn test_phrases_are_made_of_keywords() {
        for phrase in PHRASES.iter() {
            for word in phrase.split(' ') {
                assert!(KEYWORDS.contains(word), "{word} missing from KEYWORDS");
            }
        }
    }

    #[test]
    fn test_exclusion_set() {
        assert!(NOT_ROOT_KEYWORDS.contains("ON"));
        assert!(NOT_ROOT_KEYWORDS.contains("DESC"));
        assert!(NOT_ROOT_KEYWORDS.contains("INTO"));
        assert!(NOT_ROOT_KEYWORDS.contains("CHECK"));
        assert!(!NOT_ROOT_KEYWORDS.contains("WHERE"));
    }

    #[test]
    fn test_union_phrases_align_as_roots() {
        for union in UNIONS.iter() {
            assert!(ROOT_CLAUSES.contains(union));
        }
    }
}
