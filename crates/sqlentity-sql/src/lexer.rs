//! Clause tokenizer
//!
//! Splits one column clause into identifiers, quoted identifiers, string
//! literals, numbers and punctuation. Token text borrows from the clause.

/// Kind of a clause token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word: keyword or unquoted identifier
    Word,
    /// Identifier in backticks, double quotes or brackets
    QuotedIdent,
    /// Single-quoted string literal
    String,
    /// Numeric literal, optionally signed
    Number,
    LParen,
    RParen,
    Comma,
    /// Any other single character (`=`, `:`, `.` ...)
    Symbol,
}

/// A token and the text it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset in the clause
    pub start: usize,
}

impl<'a> Token<'a> {
    /// Whether this is the bare keyword `kw` (case-insensitive)
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(kw)
    }

    /// Identifier value with quoting removed, for words and quoted identifiers
    pub fn identifier(&self) -> Option<&'a str> {
        match self.kind {
            TokenKind::Word => Some(self.text),
            TokenKind::QuotedIdent => Some(unquote(self.text)),
            _ => None,
        }
    }
}

/// Tokenize a clause. Unterminated quotes run to the end of the input.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        let kind = match c {
            b if b.is_ascii_whitespace() => {
                i += 1;
                continue;
            }
            b'(' => {
                i += 1;
                TokenKind::LParen
            }
            b')' => {
                i += 1;
                TokenKind::RParen
            }
            b',' => {
                i += 1;
                TokenKind::Comma
            }
            b'\'' => {
                i = skip_quoted(bytes, i, b'\'');
                TokenKind::String
            }
            b'`' => {
                i = skip_quoted(bytes, i, b'`');
                TokenKind::QuotedIdent
            }
            b'"' => {
                i = skip_quoted(bytes, i, b'"');
                TokenKind::QuotedIdent
            }
            b'[' => {
                i = skip_quoted(bytes, i, b']');
                TokenKind::QuotedIdent
            }
            b if b.is_ascii_digit() => {
                i = skip_number(bytes, i);
                TokenKind::Number
            }
            b'-' | b'+' if bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit() || *n == b'.') => {
                i = skip_number(bytes, i + 1);
                TokenKind::Number
            }
            b'.' if bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit()) => {
                i = skip_number(bytes, i);
                TokenKind::Number
            }
            b if is_word_byte(b) => {
                while i < bytes.len() && is_word_byte(bytes[i]) {
                    i += 1;
                }
                TokenKind::Word
            }
            _ => {
                // Advance a whole UTF-8 character
                i += input[i..].chars().next().map_or(1, char::len_utf8);
                TokenKind::Symbol
            }
        };

        tokens.push(Token {
            kind,
            text: &input[start..i],
            start,
        });
    }

    tokens
}

/// Remove one level of identifier quoting (`name`, "name", [name])
pub fn unquote(ident: &str) -> &str {
    let trimmed = ident.trim();
    for (open, close) in [('`', '`'), ('"', '"'), ('[', ']')] {
        if let Some(inner) = trimmed.strip_prefix(open).and_then(|s| s.strip_suffix(close)) {
            return inner;
        }
    }
    trimmed
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Index just past the closing quote; a doubled quote is an escape, and so
/// is a backslash inside a string literal
fn skip_quoted(bytes: &[u8], open: usize, close: u8) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        if close == b'\'' && bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == close {
            if bytes.get(i + 1) == Some(&close) && close != b']' {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

fn skip_number(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    // Exponent, e.g. 1.5e10
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            i = j;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        tokenize(input).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn column_clause_tokens() {
        assert_eq!(
            kinds("price DECIMAL(10,2) NOT NULL"),
            vec![
                (TokenKind::Word, "price"),
                (TokenKind::Word, "DECIMAL"),
                (TokenKind::LParen, "("),
                (TokenKind::Number, "10"),
                (TokenKind::Comma, ","),
                (TokenKind::Number, "2"),
                (TokenKind::RParen, ")"),
                (TokenKind::Word, "NOT"),
                (TokenKind::Word, "NULL"),
            ]
        );
    }

    #[test]
    fn quoted_tokens() {
        assert_eq!(
            kinds("`first name` TEXT COMMENT 'it''s, here'"),
            vec![
                (TokenKind::QuotedIdent, "`first name`"),
                (TokenKind::Word, "TEXT"),
                (TokenKind::Word, "COMMENT"),
                (TokenKind::String, "'it''s, here'"),
            ]
        );
    }

    #[test]
    fn backslash_escape_in_string() {
        assert_eq!(
            kinds(r"note COMMENT 'user\'s, note' NOT NULL"),
            vec![
                (TokenKind::Word, "note"),
                (TokenKind::Word, "COMMENT"),
                (TokenKind::String, r"'user\'s, note'"),
                (TokenKind::Word, "NOT"),
                (TokenKind::Word, "NULL"),
            ]
        );
    }

    #[test]
    fn signed_and_fractional_numbers() {
        assert_eq!(
            kinds("DEFAULT -1.5 x .25 y 1e3"),
            vec![
                (TokenKind::Word, "DEFAULT"),
                (TokenKind::Number, "-1.5"),
                (TokenKind::Word, "x"),
                (TokenKind::Number, ".25"),
                (TokenKind::Word, "y"),
                (TokenKind::Number, "1e3"),
            ]
        );
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        let tokens = tokenize("name 'oops");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, "'oops");
    }

    #[test]
    fn unquote_identifiers() {
        assert_eq!(unquote("`users`"), "users");
        assert_eq!(unquote("\"Order Items\""), "Order Items");
        assert_eq!(unquote("[dbo]"), "dbo");
        assert_eq!(unquote(" plain "), "plain");
    }

    #[test]
    fn keyword_match_ignores_case_and_quotes() {
        let tokens = tokenize("not `null`");
        assert!(tokens[0].is_keyword("NOT"));
        assert!(!tokens[1].is_keyword("NULL"));
        assert_eq!(tokens[1].identifier(), Some("null"));
    }
}
