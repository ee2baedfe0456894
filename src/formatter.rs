//! The formatter facade: lex, split, format, re-serialize.

use crate::engine;
use crate::error::Result;
use crate::lexer;
use crate::splitter;
use crate::token::Token;

/// Format a SQL string into the river style.
///
/// Pure function of its input: lexes, runs the engine over every
/// formattable statement range, and concatenates the (possibly
/// rewritten) token texts back into one string. Batches containing DDL
/// come back byte-for-byte unchanged.
pub fn format_string(source: &str) -> Result<String> {
    let mut tokens = lexer::tokenize(source);

    for range in splitter::split(&tokens) {
        engine::run(&mut tokens[range])?;
    }

    Ok(render(&tokens))
}

fn render(tokens: &[Token]) -> String {
    let capacity: usize = tokens.iter().map(|t| t.text().len()).sum();
    let mut out = String::with_capacity(capacity);
    for token in tokens {
        out.push_str(token.text());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_simple_select() {
        let result = format_string("SELECT 1, 2 ORDER BY 1").unwrap();
        assert_eq!(result, "SELECT 1, 2\n ORDER BY 1");
    }

    #[test]
    fn test_ddl_passes_through_unchanged() {
        let sql = "CREATE   TABLE t (id INT);\nSELECT   1;";
        assert_eq!(format_string(sql).unwrap(), sql);
    }

    #[test]
    fn test_empty_and_whitespace_only_input() {
        assert_eq!(format_string("").unwrap(), "");
        assert_eq!(format_string("\n").unwrap(), "\n");
    }

    #[test]
    fn test_trailing_newline_is_preserved() {
        assert_eq!(format_string("SELECT 1\n").unwrap(), "SELECT 1\n");
    }

    #[test]
    fn test_unbalanced_input_errors_and_leaves_caller_data_alone() {
        let sql = "SELECT a)";
        assert!(format_string(sql).is_err());
    }
}
