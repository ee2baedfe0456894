use compact_str::CompactString;
use memchr::{memchr, memchr_iter};

use crate::keywords;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    QuotedName,
    Number,
    StringLiteral,
    BooleanLiteral,
    Operator,
    Whitespace,
    Comment,
    /// Input the lexer could not classify. Formatted generically as an
    /// expression, never an error.
    Ambiguous,
}

/// A classified lexical unit with mutable text content.
///
/// The token sequence owns the full source text: concatenating every
/// token's text reproduces the statement. Whitespace tokens carry all
/// formatting; the engine rewrites only their content (plus keyword
/// casing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: CompactString,
    /// Canonical upper-cased keyword phrase ("LEFT JOIN"); empty for
    /// non-keyword tokens.
    keyword: CompactString,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str) -> Self {
        let keyword = if kind == TokenKind::Keyword {
            CompactString::from(text.to_uppercase())
        } else {
            CompactString::const_new("")
        };
        Self {
            kind,
            text: CompactString::from(text),
            keyword,
        }
    }

    /// A keyword token whose raw text may differ from its canonical
    /// phrase (original casing, original interior whitespace).
    pub fn keyword_phrase(text: &str, canonical: &str) -> Self {
        Self {
            kind: TokenKind::Keyword,
            text: CompactString::from(text),
            keyword: CompactString::from(canonical),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Canonical upper-cased phrase for keywords, `""` otherwise.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn replace_text(&mut self, content: &str) {
        self.text = CompactString::from(content);
    }

    /// Normalize a keyword to its canonical upper-cased phrase; phrase
    /// tokens also lose any odd interior whitespace here. Non-keywords
    /// are upper-cased as-is.
    pub fn make_uppercase(&mut self) {
        if self.keyword.is_empty() {
            self.text = CompactString::from(self.text.to_uppercase());
        } else {
            self.text = self.keyword.clone();
        }
    }

    // --- Shape predicates ---

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    pub fn is_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword
    }

    pub fn is_ambiguous(&self) -> bool {
        self.kind == TokenKind::Ambiguous
    }

    /// Boolean, number, or string literal.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number | TokenKind::StringLiteral | TokenKind::BooleanLiteral
        )
    }

    /// Bare or quoted identifier.
    pub fn is_name(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier | TokenKind::QuotedName)
    }

    /// Any operator except the member-access dot.
    pub fn is_operator(&self) -> bool {
        self.kind == TokenKind::Operator && self.text.trim() != "."
    }

    // Trimmed comparison: a whitespace splice may have widened the raw
    // text of an adjacent parenthesis token (e.g. "( ").
    pub fn is_open_parenthesis(&self) -> bool {
        self.kind == TokenKind::Operator && self.text.trim() == "("
    }

    pub fn is_close_parenthesis(&self) -> bool {
        self.kind == TokenKind::Operator && self.text.trim() == ")"
    }

    // --- Keyword predicates ---

    /// A keyword that opens a top-level clause and right-aligns to the
    /// river: it must start a clause, must not be a join, and must not be
    /// in the fixed exclusion set (INTO, CHECK, ON, DESC).
    pub fn is_root_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword
            && !keywords::NOT_ROOT_KEYWORDS.contains(self.keyword.as_str())
            && !keywords::JOINS.contains(self.keyword.as_str())
            && keywords::ROOT_CLAUSES.contains(self.keyword.as_str())
    }

    pub fn is_select(&self) -> bool {
        self.keyword == "SELECT"
    }

    pub fn is_partition_by(&self) -> bool {
        self.keyword == "PARTITION BY"
    }

    pub fn is_union(&self) -> bool {
        keywords::UNIONS.contains(self.keyword.as_str())
    }

    pub fn is_join(&self) -> bool {
        keywords::JOINS.contains(self.keyword.as_str())
    }

    /// ON or USING, the join-condition continuations.
    pub fn is_on(&self) -> bool {
        self.keyword == "ON" || self.keyword == "USING"
    }

    pub fn is_where(&self) -> bool {
        self.keyword == "WHERE"
    }

    pub fn is_logical_operator(&self) -> bool {
        keywords::LOGICAL_OPERATORS.contains(self.keyword.as_str())
    }

    pub fn is_between(&self) -> bool {
        self.keyword == "BETWEEN" || self.keyword == "NOT BETWEEN"
    }

    pub fn is_alias(&self) -> bool {
        self.keyword == "AS"
    }

    pub fn is_distinct(&self) -> bool {
        self.keyword == "DISTINCT"
    }

    pub fn is_case(&self) -> bool {
        self.keyword == "CASE"
    }

    pub fn is_case_clause(&self) -> bool {
        keywords::CASE_CLAUSES.contains(self.keyword.as_str())
    }

    pub fn is_then(&self) -> bool {
        self.keyword == "THEN"
    }

    pub fn is_end(&self) -> bool {
        self.keyword == "END"
    }

    pub fn is_ddl_keyword(&self) -> bool {
        keywords::DDL_KEYWORDS.contains(self.keyword.as_str())
    }

    // --- Text shape ---

    /// Length of the first space-delimited word; "GROUP BY" aligns on
    /// "GROUP".
    pub fn first_word_length(&self) -> usize {
        self.text.split_whitespace().next().map_or(0, str::len)
    }

    pub fn has_two_words(&self) -> bool {
        self.text.split_whitespace().count() == 2
    }

    pub fn has_line_break(&self) -> bool {
        memchr(b'\n', self.text.as_bytes()).is_some()
    }

    /// True when the text already holds a blank line (two or more
    /// line breaks).
    pub fn has_two_line_breaks(&self) -> bool {
        memchr_iter(b'\n', self.text.as_bytes()).count() >= 2
    }
}
