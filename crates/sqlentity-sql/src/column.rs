//! Column clause classification and resolution
//!
//! A clause is tokenized and matched by a small recursive-descent matcher:
//! name, then type words with an optional parameter group, then attributes
//! in any order. Unknown trailing tokens are skipped.

use crate::lexer::{tokenize, Token, TokenKind};
use sqlentity_core::{Column, Diagnostic, DiagnosticCode, JavaType, Location, TypeMapper};

/// Kind of table-level constraint clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    /// `KEY`, `INDEX`, `FULLTEXT`, `SPATIAL`
    Index,
    Unique,
    /// Named constraint (`CONSTRAINT fk_x FOREIGN KEY ...`)
    Named,
    Check,
}

/// What a top-level clause of a table body declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Column,
    Constraint(ConstraintKind),
}

impl ClauseKind {
    /// Classify by the clause's leading keyword(s).
    ///
    /// Only whole bare words count, so a column named `key_id` or a quoted
    /// `` `index` `` column is still a column.
    pub fn classify(clause: &str) -> Self {
        let tokens = tokenize(clause);
        let Some(first) = tokens.first() else {
            return Self::Column;
        };
        let second_is_key = tokens.get(1).is_some_and(|t| t.is_keyword("KEY"));

        let kind = if first.is_keyword("PRIMARY") && second_is_key {
            ConstraintKind::PrimaryKey
        } else if first.is_keyword("FOREIGN") && second_is_key {
            ConstraintKind::ForeignKey
        } else if ["KEY", "INDEX", "FULLTEXT", "SPATIAL"].iter().any(|kw| first.is_keyword(kw)) {
            ConstraintKind::Index
        } else if first.is_keyword("UNIQUE") {
            ConstraintKind::Unique
        } else if first.is_keyword("CONSTRAINT") {
            ConstraintKind::Named
        } else if first.is_keyword("CHECK") {
            ConstraintKind::Check
        } else {
            return Self::Column;
        };

        Self::Constraint(kind)
    }

    /// Whether the clause is a table-level constraint
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }
}

/// Inline `REFERENCES table(column)` on a column clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineReference {
    pub table: String,
    /// Empty when the clause names no column
    pub column: String,
}

/// A successfully resolved column clause
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub column: Column,
    pub reference: Option<InlineReference>,
}

/// Why a column clause could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    #[error("clause does not start with a column name")]
    MissingName,

    #[error("column '{name}' has no recognizable type")]
    MissingType { name: String },
}

impl ColumnError {
    /// Convert to a recoverable diagnostic
    pub fn to_diagnostic(&self, table: &str, clause: &str) -> Diagnostic {
        Diagnostic::warn(
            DiagnosticCode::ColumnUnparseable,
            format!("Could not parse column definition: {}", self),
        )
        .with_location(Location::table(table).with_clause(clause))
    }
}

/// Words that end the type and start the attribute list
const ATTRIBUTE_KEYWORDS: &[&str] = &[
    "NOT", "NULL", "AUTO_INCREMENT", "AUTOINCREMENT", "IDENTITY", "PRIMARY", "KEY", "DEFAULT",
    "COMMENT", "UNIQUE", "REFERENCES", "CHECK", "CONSTRAINT", "COLLATE", "CHARSET", "GENERATED",
    "ON", "AS",
];

/// Type qualifiers that are removed from the base type
const TYPE_QUALIFIERS: &[&str] = &["UNSIGNED", "SIGNED", "ZEROFILL"];

/// Types whose values the database generates
const SERIAL_TYPES: &[&str] = &["SERIAL", "SMALLSERIAL", "BIGSERIAL"];

/// Resolves column clauses against a type mapper
pub struct ColumnResolver<'m> {
    mapper: &'m TypeMapper,
}

impl<'m> ColumnResolver<'m> {
    /// Create a resolver using the given type table
    pub fn new(mapper: &'m TypeMapper) -> Self {
        Self { mapper }
    }

    /// Parse one column clause
    pub fn resolve(&self, clause: &str) -> Result<ResolvedColumn, ColumnError> {
        let tokens = tokenize(clause);
        let mut cursor = Cursor::new(clause, &tokens);

        let name = cursor
            .next()
            .and_then(|t| t.identifier())
            .ok_or(ColumnError::MissingName)?
            .to_string();

        let spec = cursor
            .type_spec()
            .ok_or_else(|| ColumnError::MissingType { name: name.clone() })?;

        let mapped = self.mapper.resolve(&spec.base, spec.unsigned);
        let mut column = Column::new(name, spec.base.clone(), mapped);
        column.raw_type = spec.raw;
        column.unsigned = spec.unsigned;
        column.is_auto_generated = SERIAL_TYPES.contains(&spec.base.as_str());
        apply_type_params(&mut column, &spec.params);

        let reference = cursor.attributes(&mut column);

        Ok(ResolvedColumn { column, reference })
    }
}

/// Parsed type portion of a column clause
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeSpec {
    base: String,
    raw: String,
    params: Vec<String>,
    unsigned: bool,
}

fn apply_type_params(column: &mut Column, params: &[String]) {
    let numbers: Vec<Option<u32>> = params.iter().map(|p| p.parse().ok()).collect();
    match column.mapped_type {
        JavaType::String => column.length = numbers.first().copied().flatten(),
        JavaType::BigDecimal => {
            column.precision = numbers.first().copied().flatten();
            column.scale = numbers.get(1).copied().flatten();
        }
        _ => {}
    }
}

/// Token cursor over one clause
struct Cursor<'a, 't> {
    clause: &'a str,
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'a, 't> Cursor<'a, 't> {
    fn new(clause: &'a str, tokens: &'t [Token<'a>]) -> Self {
        Self { clause, tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(kw)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_attribute(&self) -> bool {
        let Some(token) = self.peek() else {
            return true;
        };
        if token.kind != TokenKind::Word {
            return true;
        }
        if ATTRIBUTE_KEYWORDS.iter().any(|kw| token.is_keyword(kw)) {
            return true;
        }
        // CHARACTER SET / CHAR SET are attributes, CHARACTER VARYING is a type
        (token.is_keyword("CHARACTER") || token.is_keyword("CHAR"))
            && self.peek_at(1).is_some_and(|t| t.is_keyword("SET"))
    }

    /// Type words, each optionally followed by a parameter group
    fn type_spec(&mut self) -> Option<TypeSpec> {
        let mut base_words: Vec<String> = Vec::new();
        let mut raw = String::new();
        let mut params = Vec::new();
        let mut unsigned = false;
        let mut seen_params = false;

        while !self.at_attribute() {
            let word = self.next()?.text.to_uppercase();
            if !raw.is_empty() {
                raw.push(' ');
            }
            raw.push_str(&word);

            if TYPE_QUALIFIERS.contains(&word.as_str()) {
                unsigned |= word == "UNSIGNED";
            } else if !seen_params {
                base_words.push(word);
            }

            if self.peek().is_some_and(|t| t.kind == TokenKind::LParen) {
                let (group_params, text) = self.group();
                raw.push_str(&text);
                if !seen_params {
                    params = group_params;
                }
                seen_params = true;
            }
        }

        if base_words.is_empty() {
            return None;
        }

        Some(TypeSpec {
            base: base_words.join(" "),
            raw,
            params,
            unsigned,
        })
    }

    /// Consume a balanced `( ... )` group.
    ///
    /// Returns the top-level comma-separated items and the group text with
    /// whitespace removed outside string literals.
    fn group(&mut self) -> (Vec<String>, String) {
        let mut items = Vec::new();
        let mut current = String::new();
        let mut text = String::new();
        let mut depth = 0usize;

        while let Some(token) = self.next() {
            text.push_str(token.text);
            match token.kind {
                TokenKind::LParen => {
                    depth += 1;
                    if depth > 1 {
                        current.push('(');
                    }
                }
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                    current.push(')');
                }
                TokenKind::Comma if depth == 1 => {
                    items.push(std::mem::take(&mut current));
                }
                _ => current.push_str(token.text),
            }
        }
        if !current.is_empty() {
            items.push(current);
        }

        (items, text)
    }

    /// Raw text of a balanced group starting at the current `(`
    fn group_text(&mut self) -> &'a str {
        let Some(open) = self.peek().map(|t| t.start) else {
            return "";
        };
        let mut end = self.clause.len();
        let mut depth = 0usize;

        while let Some(token) = self.next() {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        end = token.start + token.text.len();
                        break;
                    }
                }
                _ => {}
            }
        }

        &self.clause[open..end]
    }

    fn skip_group(&mut self) {
        if self.peek().is_some_and(|t| t.kind == TokenKind::LParen) {
            self.group_text();
        }
    }

    /// Attribute list after the type; fills in the column
    fn attributes(&mut self, column: &mut Column) -> Option<InlineReference> {
        let mut reference = None;

        while let Some(token) = self.next() {
            if token.is_keyword("NOT") && self.eat_keyword("NULL") {
                column.nullable = false;
            } else if token.is_keyword("NULL") {
                column.nullable = true;
            } else if token.is_keyword("AUTO_INCREMENT") || token.is_keyword("AUTOINCREMENT") {
                column.is_auto_generated = true;
            } else if token.is_keyword("IDENTITY") {
                column.is_auto_generated = true;
                self.skip_group();
            } else if token.is_keyword("GENERATED") {
                self.generated(column);
            } else if token.is_keyword("PRIMARY") && self.eat_keyword("KEY") {
                column.is_primary_key = true;
            } else if token.is_keyword("UNIQUE") {
                self.eat_keyword("KEY");
                column.unique = true;
            } else if token.is_keyword("DEFAULT") {
                column.default_value = self.default_value();
            } else if token.is_keyword("COMMENT") {
                // Comments are not part of the model
                self.next();
            } else if token.is_keyword("REFERENCES") {
                reference = self.reference();
            } else if token.is_keyword("CHECK") {
                self.skip_group();
            } else if token.is_keyword("COLLATE") || token.is_keyword("CHARSET") {
                self.next();
            } else if (token.is_keyword("CHARACTER") || token.is_keyword("CHAR")) && self.eat_keyword("SET") {
                self.next();
            } else if token.is_keyword("ON") {
                self.on_clause();
            } else if token.is_keyword("CONSTRAINT") {
                self.next();
            } else if token.kind == TokenKind::LParen {
                self.pos -= 1;
                self.skip_group();
            }
        }

        reference
    }

    /// `GENERATED {ALWAYS | BY DEFAULT} AS IDENTITY [(...)]` or a computed column
    fn generated(&mut self, column: &mut Column) {
        while let Some(token) = self.peek().copied() {
            if token.is_keyword("IDENTITY") {
                self.pos += 1;
                column.is_auto_generated = true;
                self.skip_group();
                return;
            }
            if token.kind == TokenKind::LParen {
                // Computed expression
                self.skip_group();
                return;
            }
            if !["ALWAYS", "BY", "DEFAULT", "AS"].iter().any(|kw| token.is_keyword(kw)) {
                return;
            }
            self.pos += 1;
        }
    }

    /// `ON {DELETE | UPDATE} <action>` of a reference, or `ON UPDATE <expr>`
    fn on_clause(&mut self) {
        let on_delete = self.eat_keyword("DELETE");
        if !on_delete && !self.eat_keyword("UPDATE") {
            return;
        }

        if self.eat_keyword("CASCADE") || self.eat_keyword("RESTRICT") {
            return;
        }
        if self.eat_keyword("NO") {
            self.eat_keyword("ACTION");
            return;
        }
        if self.eat_keyword("SET") {
            if !self.eat_keyword("NULL") {
                self.eat_keyword("DEFAULT");
            }
            return;
        }
        if !on_delete {
            // ON UPDATE CURRENT_TIMESTAMP
            self.default_value();
        }
    }

    /// Value after `DEFAULT`
    fn default_value(&mut self) -> Option<String> {
        let token = *self.peek()?;
        let value = match token.kind {
            TokenKind::String | TokenKind::Number => {
                self.pos += 1;
                token.text.to_string()
            }
            TokenKind::LParen => self.group_text().to_string(),
            TokenKind::Word => {
                self.pos += 1;
                if self.peek().is_some_and(|t| t.kind == TokenKind::LParen) {
                    // Function call, e.g. now() or nextval('seq')
                    let args = self.group_text();
                    format!("{}{}", token.text, args)
                } else {
                    token.text.to_string()
                }
            }
            _ => return None,
        };
        Some(value)
    }

    /// `REFERENCES [schema.]table [(column)]`
    fn reference(&mut self) -> Option<InlineReference> {
        let mut table = self.next()?.identifier()?.to_string();
        while self.peek().is_some_and(|t| t.kind == TokenKind::Symbol && t.text == ".") {
            self.pos += 1;
            table = self.next()?.identifier()?.to_string();
        }

        let mut column = String::new();
        if self.peek().is_some_and(|t| t.kind == TokenKind::LParen) {
            let (items, _) = self.group();
            if let Some(first) = items.first() {
                column = crate::lexer::unquote(first).to_string();
            }
        }

        Some(InlineReference { table, column })
    }
}
