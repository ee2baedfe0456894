//! Hand-rolled SQL lexer.
//!
//! Produces the classified token sequence the formatting engine consumes.
//! Lexing is best-effort and infallible: bytes that fit no rule become
//! ambiguous tokens and are passed through. Concatenating every token's
//! raw text reproduces the input exactly, with one deliberate exception:
//! multi-word keyword phrases ("GROUP BY", "LEFT OUTER JOIN") are merged
//! into a single keyword token whose raw text spans the original words,
//! interior whitespace included.

use memchr::{memchr, memmem};

use crate::keywords;
use crate::token::{Token, TokenKind};

/// Lex a SQL string into tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

fn is_sql_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c)
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            tokens: Vec::with_capacity(src.len() / 4 + 4),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if is_sql_whitespace(b) {
                self.whitespace();
            } else if b == b'-' && self.peek(1) == Some(b'-') {
                self.line_comment();
            } else if b == b'#' {
                self.line_comment();
            } else if b == b'/' && self.peek(1) == Some(b'*') {
                self.block_comment();
            } else if b == b'\'' {
                self.quoted(b'\'', TokenKind::StringLiteral);
            } else if b == b'"' {
                self.quoted(b'"', TokenKind::QuotedName);
            } else if b == b'`' {
                self.quoted(b'`', TokenKind::QuotedName);
            } else if b.is_ascii_digit() {
                self.number();
            } else if is_word_start(b) {
                self.word();
            } else if b == b'@' {
                self.variable();
            } else {
                self.operator_or_ambiguous();
            }
        }
        self.tokens
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn push(&mut self, kind: TokenKind, end: usize) {
        self.tokens.push(Token::new(kind, &self.src[self.pos..end]));
        self.pos = end;
    }

    fn whitespace(&mut self) {
        let mut end = self.pos;
        while end < self.bytes.len() && is_sql_whitespace(self.bytes[end]) {
            end += 1;
        }
        self.push(TokenKind::Whitespace, end);
    }

    /// `--` or `#` up to (not including) the line break.
    fn line_comment(&mut self) {
        let end = match memchr(b'\n', &self.bytes[self.pos..]) {
            Some(offset) => self.pos + offset,
            None => self.bytes.len(),
        };
        self.push(TokenKind::Comment, end);
    }

    /// `/* ... */`; an unterminated comment swallows the rest of the input.
    fn block_comment(&mut self) {
        let end = match memmem::find(&self.bytes[self.pos + 2..], b"*/") {
            Some(offset) => self.pos + 2 + offset + 2,
            None => self.bytes.len(),
        };
        self.push(TokenKind::Comment, end);
    }

    /// Quote-delimited literal or name, with doubled-quote and backslash
    /// escapes. Unterminated literals swallow the rest of the input.
    fn quoted(&mut self, quote: u8, kind: TokenKind) {
        let mut i = self.pos + 1;
        let end = loop {
            if i >= self.bytes.len() {
                break self.bytes.len();
            }
            match self.bytes[i] {
                b'\\' => i += 2,
                b if b == quote => {
                    if self.bytes.get(i + 1) == Some(&quote) {
                        i += 2;
                    } else {
                        break i + 1;
                    }
                }
                _ => i += 1,
            }
        };
        self.push(kind, end.min(self.bytes.len()));
    }

    fn number(&mut self) {
        let mut i = self.pos;
        while i < self.bytes.len() && self.bytes[i].is_ascii_digit() {
            i += 1;
        }
        if self.bytes.get(i) == Some(&b'.')
            && self.bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
        {
            i += 1;
            while i < self.bytes.len() && self.bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
        if matches!(self.bytes.get(i).copied(), Some(b'e' | b'E')) {
            let mut j = i + 1;
            if matches!(self.bytes.get(j).copied(), Some(b'+' | b'-')) {
                j += 1;
            }
            if self.bytes.get(j).is_some_and(u8::is_ascii_digit) {
                i = j;
                while i < self.bytes.len() && self.bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
        }
        self.push(TokenKind::Number, i);
    }

    /// `@name` session/user variables lex as ambiguous expression tokens.
    fn variable(&mut self) {
        let mut i = self.pos + 1;
        while i < self.bytes.len() && is_word_byte(self.bytes[i]) {
            i += 1;
        }
        self.push(TokenKind::Ambiguous, i.max(self.pos + 1));
    }

    fn word(&mut self) {
        let end = self.word_end(self.pos);
        let word = &self.src[self.pos..end];
        let upper = word.to_uppercase();

        if upper == "TRUE" || upper == "FALSE" {
            self.push(TokenKind::BooleanLiteral, end);
        } else if keywords::KEYWORDS.contains(upper.as_str()) {
            self.keyword(end, upper);
        } else {
            self.push(TokenKind::Identifier, end);
        }
    }

    /// Push a keyword token, merging it with the following words when they
    /// spell a known multi-word phrase. Longest phrase wins ("LEFT OUTER
    /// JOIN" before "LEFT JOIN" could match as two tokens).
    fn keyword(&mut self, first_end: usize, first_upper: String) {
        let mut spans = [(self.pos, first_end), (0, 0), (0, 0)];
        let mut uppers = [first_upper, String::new(), String::new()];
        let mut count = 1;

        let mut cursor = first_end;
        while count < 3 {
            let mut ws = cursor;
            while ws < self.bytes.len() && is_sql_whitespace(self.bytes[ws]) {
                ws += 1;
            }
            if ws == cursor || ws >= self.bytes.len() || !is_word_start(self.bytes[ws]) {
                break;
            }
            let word_end = self.word_end(ws);
            spans[count] = (ws, word_end);
            uppers[count] = self.src[ws..word_end].to_uppercase();
            count += 1;
            cursor = word_end;
        }

        for take in (2..=count).rev() {
            let canonical = uppers[..take].join(" ");
            if keywords::PHRASES.contains(canonical.as_str()) {
                let end = spans[take - 1].1;
                self.tokens
                    .push(Token::keyword_phrase(&self.src[self.pos..end], &canonical));
                self.pos = end;
                return;
            }
        }

        let end = spans[0].1;
        self.tokens
            .push(Token::keyword_phrase(&self.src[self.pos..end], &uppers[0]));
        self.pos = end;
    }

    fn word_end(&self, start: usize) -> usize {
        let mut end = start;
        while end < self.bytes.len() && is_word_byte(self.bytes[end]) {
            end += 1;
        }
        end
    }

    fn operator_or_ambiguous(&mut self) {
        const TWO_BYTE: [&[u8; 2]; 10] = [
            b"<=", b">=", b"<>", b"!=", b"||", b"&&", b"::", b":=", b"<<", b">>",
        ];
        if self.pos + 1 < self.bytes.len() {
            let pair = [self.bytes[self.pos], self.bytes[self.pos + 1]];
            if TWO_BYTE.iter().any(|op| **op == pair) {
                self.push(TokenKind::Operator, self.pos + 2);
                return;
            }
        }
        let b = self.bytes[self.pos];
        let kind = if b"+-*/%=<>,.;()[]:".contains(&b) {
            TokenKind::Operator
        } else {
            TokenKind::Ambiguous
        };
        // Never split a multi-byte UTF-8 sequence.
        let mut end = self.pos + 1;
        while end < self.bytes.len() && !self.src.is_char_boundary(end) {
            end += 1;
        }
        self.push(kind, end);
    }
}
