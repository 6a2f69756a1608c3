//! `CREATE TABLE` statement extraction
//!
//! Locates each statement header with a pattern, then takes the balanced
//! parenthesized span after the table name as the body. Table options after
//! the body (`ENGINE=...`, `DEFAULT CHARSET=...`, `COMMENT '...'`) are ignored.

use crate::lexer::unquote;
use regex::Regex;
use sqlentity_core::{Diagnostic, DiagnosticCode, Location};
use std::sync::LazyLock;

static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\bCREATE\s+(?:(?:GLOBAL\s+|LOCAL\s+)?(?:TEMPORARY|TEMP)\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:(?:`[^`]+`|"[^"]+"|\[[^\]]+\]|[\w$]+)\s*\.\s*)*(?P<name>`[^`]+`|"[^"]+"|\[[^\]]+\]|[\w$]+)"#,
    )
    .expect("create table pattern is valid")
});

/// One `CREATE TABLE` statement: the table name and its body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatement<'a> {
    /// Table name, quotes and schema qualifier removed
    pub name: String,

    /// Text between the outer parentheses, trimmed
    pub body: &'a str,

    /// Byte offset of the statement in the normalized text
    pub offset: usize,
}

/// Entry point for statement scanning
pub struct StatementExtractor;

impl StatementExtractor {
    /// Lazily scan normalized text for `CREATE TABLE` statements.
    ///
    /// Items come in source order. A header with no usable body yields an
    /// `Err` diagnostic and scanning goes on with the next header.
    pub fn scan(text: &str) -> Statements<'_> {
        Statements { text, pos: 0 }
    }

    /// Number of `CREATE TABLE` headers in the text
    pub fn count_headers(text: &str) -> usize {
        CREATE_TABLE.find_iter(text).count()
    }
}

/// Iterator over the statements of one text; not restartable
pub struct Statements<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Statements<'a> {
    type Item = Result<TableStatement<'a>, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }

        let caps = CREATE_TABLE.captures_at(self.text, self.pos)?;
        let header = caps.get(0)?;
        let name = unquote(&caps["name"]).to_string();
        let offset = header.start();

        let rest = &self.text[header.end()..];
        let open = header.end() + (rest.len() - rest.trim_start().len());

        if self.text.as_bytes().get(open) != Some(&b'(') {
            self.pos = header.end();
            return Some(Err(missing_body(&name)));
        }

        let Some(close) = find_closing_paren(self.text, open) else {
            self.pos = self.text.len();
            return Some(Err(Diagnostic::error(
                DiagnosticCode::StatementUnterminated,
                format!("Body of table '{}' is never closed", name),
            )
            .with_location(Location::table(&name))));
        };

        self.pos = close + 1;
        let body = self.text[open + 1..close].trim();
        if body.is_empty() {
            return Some(Err(missing_body(&name)));
        }

        Some(Ok(TableStatement { name, body, offset }))
    }
}

fn missing_body(name: &str) -> Diagnostic {
    Diagnostic::error(
        DiagnosticCode::StatementMissingBody,
        format!("Table '{}' has no column definitions, skipped", name),
    )
    .with_location(Location::table(name))
}

/// Index of the `)` matching the `(` at `open`, skipping quoted text
fn find_closing_paren(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(b'\'') if b == b'\\' => i += 1,
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'`' | b'"' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    None
}
