//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they appear in saved reports.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Statement extraction (1xxx)
    /// `CREATE TABLE <name>` not followed by a parenthesized body
    StatementMissingBody,

    /// Table body opened but never closed
    StatementUnterminated,

    /// Same table name defined twice in one input
    DuplicateTable,

    // Clause resolution (2xxx)
    /// Column clause whose name or type could not be matched
    ColumnUnparseable,

    /// Same column name declared twice in one table
    DuplicateColumn,

    // Constraint resolution (3xxx)
    /// Table-level PRIMARY KEY names a column that does not exist
    PrimaryKeyColumnMissing,

    /// FOREIGN KEY over more than one column (not generated)
    CompositeForeignKey,

    // General (9xxx)
    /// General informational message
    Info,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatementMissingBody => "STATEMENT_MISSING_BODY",
            Self::StatementUnterminated => "STATEMENT_UNTERMINATED",
            Self::DuplicateTable => "DUPLICATE_TABLE",
            Self::ColumnUnparseable => "COLUMN_UNPARSEABLE",
            Self::DuplicateColumn => "DUPLICATE_COLUMN",
            Self::PrimaryKeyColumnMissing => "PRIMARY_KEY_COLUMN_MISSING",
            Self::CompositeForeignKey => "COMPOSITE_FOREIGN_KEY",
            Self::Info => "INFO",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - part of the input was skipped or reinterpreted
    Warn,

    /// Error - a whole statement was lost
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where in the schema input a diagnostic points
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Input file, when parsing from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Table the statement defines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Offending clause text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clause: Option<String>,
}

impl Location {
    /// Location inside a table definition
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: Some(name.into()),
            ..Self::default()
        }
    }

    /// Narrow the location to one clause
    pub fn with_clause(mut self, clause: impl Into<String>) -> Self {
        self.clause = Some(clause.into());
        self
    }

    /// Attach the input file
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(file) = &self.file {
            parts.push(file.clone());
        }
        if let Some(table) = &self.table {
            parts.push(format!("table `{}`", table));
        }
        if let Some(clause) = &self.clause {
            parts.push(format!("clause `{}`", clause));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Source location (best-effort)
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
        }
    }

    /// Shorthand for a warning
    pub fn warn(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warn, message)
    }

    /// Shorthand for an error
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        // Codes end up in saved reports
        assert_eq!(DiagnosticCode::ColumnUnparseable.as_str(), "COLUMN_UNPARSEABLE");
        assert_eq!(DiagnosticCode::StatementMissingBody.as_str(), "STATEMENT_MISSING_BODY");
        assert_eq!(DiagnosticCode::CompositeForeignKey.to_string(), "COMPOSITE_FOREIGN_KEY");
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::warn(
            DiagnosticCode::ColumnUnparseable,
            "Could not parse column definition",
        )
        .with_location(Location::table("users").with_clause("???"));

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("COLUMN_UNPARSEABLE"));
        assert!(json.contains("\"warn\""));
        assert!(json.contains("\"table\":\"users\""));
        assert!(!json.contains("\"file\""));
    }

    #[test]
    fn diagnostic_display() {
        let diag = Diagnostic::error(DiagnosticCode::StatementUnterminated, "Body never closed")
            .with_location(Location::table("orders").with_file("schema.sql"));

        assert_eq!(
            diag.to_string(),
            "[error] STATEMENT_UNTERMINATED: Body never closed (schema.sql, table `orders`)"
        );
    }
}
