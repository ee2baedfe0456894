//! The token-stream formatting engine.
//!
//! A single left-to-right pass over the non-whitespace tokens of one
//! statement. Each token is classified into exactly one [`Rule`] (first
//! match in a fixed priority order wins); the rule decides which adjacent
//! whitespace tokens to rewrite and how the nesting state changes.
//! Casing normalization runs before rule dispatch and is independent of
//! which rule fires.
//!
//! Rewrites are returned from the per-token step as explicit
//! [`Rewrite`] values and applied by the driver immediately afterwards,
//! so a step never reads text a neighbor has already replaced under it.

use smallvec::SmallVec;

use crate::error::{Result, SqlRiverError};
use crate::river::RiverStack;
use crate::token::Token;

/// Logical operators inside a join condition indent this far past the
/// river.
const JOIN_CONTINUATION_OFFSET: usize = 4;

/// WHEN/ELSE bodies sit this far past the river, directly under the word
/// CASE.
const CASE_BODY_OFFSET: usize = 6;

/// Engine state threaded through the per-token step.
#[derive(Debug)]
pub struct FormatterState {
    rivers: RiverStack,
    /// One entry per open CASE expression; the innermost wins over the
    /// join continuation offset.
    case_offsets: SmallVec<[usize; 4]>,
    /// Set on JOIN/ON/USING, cleared when the WHERE clause is reached.
    join_offset: Option<usize>,
    /// Whether the most recent join phrase had two words; ON alignment
    /// follows the join it continues.
    last_join_two_words: bool,
    /// Whether the most recent keyword was BETWEEN; its AND stays inline.
    after_between: bool,
    /// Output column of the current token, recomputed from the text
    /// emitted so far.
    cursor_col: usize,
}

impl FormatterState {
    fn seeded(tokens: &[Token]) -> Self {
        let paren_initial = tokens
            .iter()
            .find(|t| !t.is_whitespace())
            .is_some_and(Token::is_open_parenthesis);
        Self {
            rivers: RiverStack::seeded(paren_initial),
            case_offsets: SmallVec::new(),
            join_offset: None,
            last_join_two_words: false,
            after_between: false,
            cursor_col: 0,
        }
    }

    fn river(&self) -> usize {
        self.rivers.top()
    }

    /// Indentation offset for logical operators, if any continuation
    /// context is open.
    fn continuation_offset(&self) -> Option<usize> {
        self.case_offsets.last().copied().or(self.join_offset)
    }
}

/// The ordered rule set. Selection order is priority order: the first
/// predicate that matches wins and later rules are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    OpenParenthesis,
    CloseParenthesis,
    CaseBlock,
    Union,
    Join,
    LogicalOperator,
    Alias,
    RootKeyword,
    Expression,
    Passthrough,
}

fn select_rule(token: &Token, next_non_ws: Option<&Token>) -> Rule {
    if token.is_open_parenthesis() {
        Rule::OpenParenthesis
    } else if token.is_close_parenthesis() {
        Rule::CloseParenthesis
    } else if token.is_case() || token.is_case_clause() || token.is_then() || token.is_end() {
        Rule::CaseBlock
    } else if token.is_union() {
        Rule::Union
    } else if token.is_join() || token.is_on() {
        Rule::Join
    } else if token.is_logical_operator() {
        Rule::LogicalOperator
    } else if token.is_alias() {
        Rule::Alias
    } else if token.is_root_keyword() {
        Rule::RootKeyword
    } else if token.is_scalar()
        || token.is_ambiguous()
        || token.is_name()
        || is_function_call(token, next_non_ws)
    {
        Rule::Expression
    } else {
        Rule::Passthrough
    }
}

/// A keyword used as a function name: COUNT(, LAG(, IN ( and friends.
fn is_function_call(token: &Token, next_non_ws: Option<&Token>) -> bool {
    token.is_keyword() && next_non_ws.is_some_and(Token::is_open_parenthesis)
}

/// One whitespace rewrite decided by a rule.
#[derive(Debug)]
struct Rewrite {
    index: usize,
    content: String,
}

type Rewrites = SmallVec<[Rewrite; 2]>;

/// Format one statement's token sequence in place.
pub fn run(tokens: &mut [Token]) -> Result<()> {
    let mut state = FormatterState::seeded(tokens);

    for i in 0..tokens.len() {
        if tokens[i].is_whitespace() {
            continue;
        }

        state.cursor_col = cursor_col(tokens, i);

        if tokens[i].is_keyword() {
            tokens[i].make_uppercase();
        }

        let mut rewrites = Rewrites::new();
        step(tokens, i, &mut state, &mut rewrites)?;
        for rewrite in rewrites {
            splice_whitespace(&mut tokens[rewrite.index], &rewrite.content);
        }

        let token = &tokens[i];
        if token.is_join() {
            state.last_join_two_words = token.has_two_words();
        }
        if token.is_keyword() {
            state.after_between = token.is_between();
        }
    }

    Ok(())
}

fn step(
    tokens: &[Token],
    i: usize,
    state: &mut FormatterState,
    out: &mut Rewrites,
) -> Result<()> {
    let token = &tokens[i];
    let prev = i.checked_sub(1);
    let next = (i + 1 < tokens.len()).then_some(i + 1);
    let prev_non_ws = nearest_back(tokens, i);
    let next_non_ws = nearest_ahead(tokens, i);

    // Join mode ends where the WHERE clause begins.
    if token.is_where() {
        state.join_offset = None;
    }

    match select_rule(token, next_non_ws.map(|j| &tokens[j])) {
        Rule::OpenParenthesis => {
            // Default: reuse the current river so function arguments and
            // plain groups stay inline. A sub-query gets its own river
            // anchored to the parenthesis's physical column.
            let mut base = state.river();
            if let Some(j) = next_non_ws {
                let after_union = prev_non_ws.is_some_and(|p| tokens[p].is_union());
                if starts_new_river(&tokens[j]) && !after_union {
                    base = state.cursor_col + tokens[j].first_word_length() + 1;
                }
            }
            state.rivers.push(base);
        }
        Rule::CloseParenthesis => {
            if let Some(p) = prev {
                out.push(Rewrite {
                    index: p,
                    content: String::new(),
                });
            }
            // The statement's base level is not a parenthesis level; a
            // close that would pop it has no matching open.
            if state.rivers.depth() <= 1 {
                return Err(SqlRiverError::RiverUnderflow);
            }
            let _ = state.rivers.pop();
        }
        Rule::CaseBlock => {
            if token.is_case() {
                state.case_offsets.push(CASE_BODY_OFFSET);
            } else if token.is_end() {
                // A stray END with no open CASE pops nothing.
                let _ = state.case_offsets.pop();
            }

            if token.is_then() {
                if let Some(p) = prev {
                    out.push(Rewrite {
                        index: p,
                        content: " ".to_string(),
                    });
                }
            } else {
                align_expression(tokens, i, state, out);
            }
        }
        Rule::Union => {
            if prev.is_some_and(|p| tokens[p].is_whitespace()) {
                let pad = state.river().saturating_sub(token.first_word_length());
                out.push(Rewrite {
                    index: i - 1,
                    content: format!("\n\n{}", " ".repeat(pad)),
                });
            }
            if let Some(n) = next {
                out.push(Rewrite {
                    index: n,
                    content: "\n\n".to_string(),
                });
            }
        }
        Rule::Join => {
            state.join_offset = Some(JOIN_CONTINUATION_OFFSET);
            if let Some(p) = prev.filter(|&p| tokens[p].is_whitespace()) {
                let follows_two_word_join = token.is_on() && state.last_join_two_words;
                if token.has_two_words() || follows_two_word_join {
                    out.push(Rewrite {
                        index: p,
                        content: body_side_content(&tokens[p], state.river()),
                    });
                } else {
                    align_character_boundary(tokens, i, p, state.river(), out);
                }
            }
        }
        Rule::LogicalOperator => {
            if let Some(p) = prev.filter(|&p| tokens[p].is_whitespace()) {
                if let Some(offset) = state.continuation_offset() {
                    out.push(Rewrite {
                        index: p,
                        content: format!("\n{}", " ".repeat(state.river() + offset)),
                    });
                } else if state.after_between {
                    out.push(Rewrite {
                        index: p,
                        content: " ".to_string(),
                    });
                } else {
                    align_character_boundary(tokens, i, p, state.river(), out);
                }
            }
            if let Some(n) = next {
                out.push(Rewrite {
                    index: n,
                    content: " ".to_string(),
                });
            }
        }
        Rule::Alias => {
            if let Some(p) = prev {
                out.push(Rewrite {
                    index: p,
                    content: " ".to_string(),
                });
            }
            if let Some(n) = next {
                out.push(Rewrite {
                    index: n,
                    content: " ".to_string(),
                });
            }
        }
        Rule::RootKeyword => {
            if let Some(p) = prev.filter(|&p| tokens[p].is_whitespace()) {
                if prev_non_ws.is_some_and(|j| tokens[j].is_open_parenthesis()) {
                    // A sub-query's first keyword starts flush against
                    // the parenthesis.
                    out.push(Rewrite {
                        index: p,
                        content: String::new(),
                    });
                } else {
                    align_character_boundary(tokens, i, p, state.river(), out);
                }
            }
            if let Some(n) = next {
                out.push(Rewrite {
                    index: n,
                    content: " ".to_string(),
                });
            }
        }
        Rule::Expression => align_expression(tokens, i, state, out),
        Rule::Passthrough => {}
    }

    Ok(())
}

/// True if the token opens a nesting level with its own river.
fn starts_new_river(token: &Token) -> bool {
    token.is_select() || token.is_partition_by()
}

/// One-token look-behind, skipping at most one whitespace token.
fn nearest_back(tokens: &[Token], i: usize) -> Option<usize> {
    let prev = i.checked_sub(1)?;
    if !tokens[prev].is_whitespace() {
        Some(prev)
    } else {
        i.checked_sub(2)
    }
}

/// One-token look-ahead, skipping at most one whitespace token.
fn nearest_ahead(tokens: &[Token], i: usize) -> Option<usize> {
    let next = i + 1;
    if next >= tokens.len() {
        None
    } else if !tokens[next].is_whitespace() {
        Some(next)
    } else if next + 1 < tokens.len() {
        Some(next + 1)
    } else {
        None
    }
}

/// Generic expression placement: flush after an opening parenthesis,
/// inline after a clause head / DISTINCT / an operator, otherwise
/// re-anchored to river + 1 when it already started a new line.
fn align_expression(tokens: &[Token], i: usize, state: &FormatterState, out: &mut Rewrites) {
    let Some(p) = i.checked_sub(1) else {
        return;
    };
    let prev_non_ws = nearest_back(tokens, i);

    if prev_non_ws.is_some_and(|j| tokens[j].is_open_parenthesis()) {
        out.push(Rewrite {
            index: p,
            content: String::new(),
        });
    } else if prev_non_ws.is_some_and(|j| {
        tokens[j].is_root_keyword() || tokens[j].is_distinct()
    }) || tokens[p].is_operator()
    {
        // First expression stays on the same line as the clause head;
        // an adjacent operator (comma, =, ...) gets a single space.
        out.push(Rewrite {
            index: p,
            content: " ".to_string(),
        });
    } else if tokens[p].has_line_break() {
        out.push(Rewrite {
            index: p,
            content: body_side_content(&tokens[p], state.river()),
        });
    }
}

/// Continuation content on the body side of the river: line break(s)
/// plus river + 1 columns. An existing blank line is preserved.
fn body_side_content(prev: &Token, river: usize) -> String {
    let mut content = String::with_capacity(river + 3);
    content.push('\n');
    if prev.has_two_line_breaks() {
        content.push('\n');
    }
    content.push_str(&" ".repeat(river + 1));
    content
}

/// Right-align `tokens[i]` so its first word ends one column before the
/// river. At the very start of a statement the padding is emitted
/// without a line break; elsewhere an existing blank line is preserved.
fn align_character_boundary(
    tokens: &[Token],
    i: usize,
    p: usize,
    river: usize,
    out: &mut Rewrites,
) {
    let pad = river.saturating_sub(tokens[i].first_word_length());
    let mut content = String::with_capacity(pad + 2);
    if nearest_back(tokens, i).is_some() {
        content.push('\n');
        if tokens[p].has_two_line_breaks() {
            content.push('\n');
        }
    }
    content.push_str(&" ".repeat(pad));
    out.push(Rewrite { index: p, content });
}

/// Replace a whitespace token's content. When the target is not a
/// whitespace token (the lexer produced no whitespace between two
/// tokens, e.g. "1,2"), the content is appended to the neighbor's
/// trimmed text instead, which is how missing separators get inserted.
fn splice_whitespace(token: &mut Token, content: &str) {
    let mut text = token.text().trim().to_string();
    text.push_str(content);
    token.replace_text(&text);
}

/// Zero-based output column of the token at `index`, recomputed from the
/// (possibly already rewritten) text before it.
fn cursor_col(tokens: &[Token], index: usize) -> usize {
    let mut col = 0;
    for token in tokens[..index].iter().rev() {
        let bytes = token.text().as_bytes();
        match memchr::memrchr(b'\n', bytes) {
            Some(pos) => return col + (bytes.len() - pos - 1),
            None => col += bytes.len(),
        }
    }
    col
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn format(sql: &str) -> String {
        let mut tokens = tokenize(sql);
        run(&mut tokens).unwrap();
        tokens.iter().map(Token::text).collect()
    }

    #[test]
    fn test_root_keywords_right_align() {
        assert_eq!(
            format("SELECT id FROM t WHERE x = 1"),
            "SELECT id\n  FROM t\n WHERE x = 1"
        );
    }

    #[test]
    fn test_missing_whitespace_is_spliced_in() {
        assert_eq!(format("SELECT 1,2"), "SELECT 1, 2");
    }

    #[test]
    fn test_keywords_uppercased() {
        assert_eq!(
            format("select id from t"),
            "SELECT id\n  FROM t"
        );
    }

    #[test]
    fn test_logical_operators_align_on_boundary() {
        assert_eq!(
            format("SELECT * FROM t WHERE a = 1 AND b = 2 OR c = 3"),
            "SELECT *\n  FROM t\n WHERE a = 1\n   AND b = 2\n    OR c = 3"
        );
    }

    #[test]
    fn test_between_keeps_and_inline() {
        assert_eq!(
            format("SELECT * FROM t WHERE x BETWEEN 1 AND 5"),
            "SELECT *\n  FROM t\n WHERE x BETWEEN 1 AND 5"
        );
    }

    #[test]
    fn test_function_arguments_collapse() {
        assert_eq!(format("SELECT LAG(\n    my_column\n)"), "SELECT LAG(my_column)");
    }

    #[test]
    fn test_alias_stays_inline() {
        assert_eq!(
            format("SELECT one AS first_column FROM t"),
            "SELECT one AS first_column\n  FROM t"
        );
    }

    #[test]
    fn test_join_mode_indents_logical_operators() {
        assert_eq!(
            format("SELECT a FROM t1 JOIN t2 ON t1.x = t2.x AND t1.y = t2.y WHERE a = 1"),
            concat!(
                "SELECT a\n",
                "  FROM t1\n",
                "  JOIN t2\n",
                "    ON t1.x = t2.x\n",
                "          AND t1.y = t2.y\n",
                " WHERE a = 1"
            )
        );
    }

    #[test]
    fn test_two_word_join_lands_past_the_river() {
        assert_eq!(
            format("SELECT a FROM t1 LEFT JOIN t2 ON t1.x = t2.x"),
            concat!(
                "SELECT a\n",
                "  FROM t1\n",
                "       LEFT JOIN t2\n",
                "       ON t1.x = t2.x"
            )
        );
    }

    #[test]
    fn test_union_forces_blank_lines() {
        assert_eq!(
            format("SELECT 1 UNION ALL SELECT 2"),
            "SELECT 1\n\n UNION ALL\n\nSELECT 2"
        );
    }

    #[test]
    fn test_subquery_gets_anchored_river() {
        assert_eq!(
            format("SELECT * FROM t WHERE id IN (SELECT id FROM u)"),
            concat!(
                "SELECT *\n",
                "  FROM t\n",
                " WHERE id IN (SELECT id\n",
                "                FROM u)"
            )
        );
    }

    #[test]
    fn test_nested_case_is_supported() {
        // The offset stack lets the inner CASE's operators indent
        // against its own offset instead of aborting.
        let out = format(
            "SELECT CASE WHEN a THEN CASE WHEN b THEN 1 ELSE 2 END ELSE 3 END FROM t",
        );
        assert!(out.contains("CASE"));
        assert!(out.ends_with("  FROM t"));
    }

    #[test]
    fn test_unbalanced_close_is_a_typed_error() {
        let mut tokens = tokenize("SELECT a)");
        let err = run(&mut tokens).unwrap_err();
        assert!(matches!(err, SqlRiverError::RiverUnderflow));
    }

    #[test]
    fn test_leading_whitespace_is_normalized() {
        assert_eq!(format("   SELECT 1"), "SELECT 1");
    }

    #[test]
    fn test_cursor_col() {
        let tokens = tokenize("SELECT a,\n       b");
        let last = tokens.len() - 1;
        assert_eq!(cursor_col(&tokens, last), 7);
        assert_eq!(cursor_col(&tokens, 0), 0);
    }

    #[test]
    fn test_rule_priority_is_stable() {
        let paren = Token::new(crate::token::TokenKind::Operator, "(");
        assert_eq!(select_rule(&paren, None), Rule::OpenParenthesis);

        // UNION is a root clause too; the union rule must win.
        let union = Token::keyword_phrase("UNION ALL", "UNION ALL");
        assert!(union.is_root_keyword());
        assert_eq!(select_rule(&union, None), Rule::Union);

        // OR is a logical operator before anything else.
        let or = Token::new(crate::token::TokenKind::Keyword, "OR");
        assert_eq!(select_rule(&or, None), Rule::LogicalOperator);

        // A keyword followed by "(" is an expression (function call).
        let count = Token::new(crate::token::TokenKind::Keyword, "COUNT");
        assert_eq!(select_rule(&count, Some(&paren)), Rule::Expression);
        assert_eq!(select_rule(&count, None), Rule::Passthrough);
    }
}
