//! Statement splitting: decides which token ranges are safe to reformat.

use std::ops::Range;

use crate::token::Token;

/// Return the token ranges the engine may rewrite.
///
/// Conservative all-or-nothing rule: a single DDL keyword
/// (ALTER/CREATE/DROP/RENAME/TRUNCATE) anywhere in the batch suppresses
/// formatting of the whole batch, so a mixed DDL/DML file round-trips
/// byte-for-byte. A non-DDL batch is yielded as one range; river state
/// is seeded per range.
pub fn split(tokens: &[Token]) -> Vec<Range<usize>> {
    if tokens.is_empty() || tokens.iter().any(Token::is_ddl_keyword) {
        return Vec::new();
    }
    vec![0..tokens.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_plain_dml_is_formattable() {
        let tokens = tokenize("SELECT 1 FROM t");
        assert_eq!(split(&tokens), vec![0..tokens.len()]);
    }

    #[test]
    fn test_ddl_suppresses_whole_batch() {
        let tokens = tokenize("SELECT 1;\nCREATE TABLE t (id INT);\nSELECT 2;");
        assert!(split(&tokens).is_empty());
    }

    #[test]
    fn test_each_ddl_keyword_counts() {
        for sql in [
            "ALTER TABLE t ADD c INT",
            "CREATE TABLE t (c INT)",
            "DROP TABLE t",
            "RENAME TABLE a TO b",
            "TRUNCATE TABLE t",
        ] {
            assert!(split(&tokenize(sql)).is_empty(), "{sql} should not format");
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(split(&[]).is_empty());
    }
}
