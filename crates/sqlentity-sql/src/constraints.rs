//! Table-level PRIMARY KEY and FOREIGN KEY extraction

use crate::lexer::unquote;
use regex::Regex;
use sqlentity_core::{Diagnostic, DiagnosticCode, ForeignKey, Location};
use std::sync::LazyLock;

static PRIMARY_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bPRIMARY\s+KEY\s*\(([^)]+)\)").expect("primary key pattern is valid")
});

static FOREIGN_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\bFOREIGN\s+KEY\s*\((?P<local>[^)]+)\)\s*REFERENCES\s+(?P<table>(?:(?:`[^`]+`|"[^"]+"|\[[^\]]+\]|[\w$]+)\s*\.\s*)*(?:`[^`]+`|"[^"]+"|\[[^\]]+\]|[\w$]+))(?:\s*\((?P<referenced>[^)]+)\))?"#,
    )
    .expect("foreign key pattern is valid")
});

/// Column names of the first table-level `PRIMARY KEY (...)` in a body.
///
/// An inline `id INT PRIMARY KEY` has no parenthesized list and is not
/// matched here; the column resolver flags those.
pub fn find_primary_keys(body: &str) -> Vec<String> {
    PRIMARY_KEY
        .captures(body)
        .map(|caps| split_names(&caps[1]))
        .unwrap_or_default()
}

/// One `FOREIGN KEY (...) REFERENCES t(...)` match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyMatch {
    pub local_columns: Vec<String>,
    /// Table name without schema qualifier
    pub referenced_table: String,
    /// Empty when no column list follows the table
    pub referenced_columns: Vec<String>,
}

impl ForeignKeyMatch {
    /// More than one local column
    pub fn is_composite(&self) -> bool {
        self.local_columns.len() > 1
    }

    /// Convert a single-column match into an unresolved [`ForeignKey`].
    ///
    /// Composite keys are rejected with a diagnostic.
    pub fn into_foreign_key(self, table: &str) -> Result<ForeignKey, Diagnostic> {
        if self.is_composite() {
            return Err(Diagnostic::warn(
                DiagnosticCode::CompositeForeignKey,
                format!(
                    "Composite foreign key ({}) -> {} is not generated",
                    self.local_columns.join(", "),
                    self.referenced_table
                ),
            )
            .with_location(Location::table(table)));
        }

        let local = self.local_columns.into_iter().next().unwrap_or_default();
        let referenced = self.referenced_columns.into_iter().next().unwrap_or_default();
        Ok(ForeignKey::new(local, self.referenced_table, referenced))
    }
}

/// Every table-level foreign key in a body, in declaration order
pub fn find_foreign_keys(body: &str) -> Vec<ForeignKeyMatch> {
    FOREIGN_KEY
        .captures_iter(body)
        .map(|caps| {
            let table = caps["table"].rsplit('.').next().unwrap_or_default();
            ForeignKeyMatch {
                local_columns: split_names(&caps["local"]),
                referenced_table: unquote(table).to_string(),
                referenced_columns: caps
                    .name("referenced")
                    .map(|m| split_names(m.as_str()))
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Split a parenthesized name list, dropping quotes and sort order
fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|name| {
            let name = name.split_whitespace().next().unwrap_or_default();
            unquote(name).to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_primary_key() {
        assert_eq!(find_primary_keys("id INT, name TEXT, PRIMARY KEY (id)"), vec!["id"]);
    }

    #[test]
    fn composite_primary_key_is_quote_stripped() {
        assert_eq!(
            find_primary_keys("a INT, b INT, primary key (`a`, \"b\")"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn only_first_primary_key_clause_counts() {
        assert_eq!(find_primary_keys("PRIMARY KEY (a), PRIMARY KEY (b)"), vec!["a"]);
    }

    #[test]
    fn inline_primary_key_not_matched() {
        assert!(find_primary_keys("id INT PRIMARY KEY, name TEXT").is_empty());
    }

    #[test]
    fn foreign_keys_in_order() {
        let body = "id INT, a_id INT, b_id INT, \
                    FOREIGN KEY (a_id) REFERENCES a(id), \
                    CONSTRAINT fk_b foreign key (`b_id`) references `shop`.`b` (`id`) ON DELETE CASCADE";
        let keys: Vec<ForeignKey> = find_foreign_keys(body)
            .into_iter()
            .map(|m| m.into_foreign_key("t").unwrap())
            .collect();

        assert_eq!(
            keys,
            vec![ForeignKey::new("a_id", "a", "id"), ForeignKey::new("b_id", "b", "id")]
        );
    }

    #[test]
    fn reference_without_column_list() {
        let matches = find_foreign_keys("x INT, FOREIGN KEY (x) REFERENCES other");
        assert_eq!(matches.len(), 1);
        let fk = matches[0].clone().into_foreign_key("t").unwrap();
        assert_eq!(fk.referenced_table, "other");
        assert_eq!(fk.referenced_column, "");
    }

    #[test]
    fn composite_foreign_key_is_reported() {
        let matches = find_foreign_keys("FOREIGN KEY (a, b) REFERENCES t(a, b)");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].is_composite());

        let diag = matches[0].clone().into_foreign_key("child").unwrap_err();
        assert_eq!(diag.code, DiagnosticCode::CompositeForeignKey);
        assert_eq!(diag.location.unwrap().table.as_deref(), Some("child"));
    }

    #[test]
    fn sort_order_is_dropped() {
        assert_eq!(find_primary_keys("PRIMARY KEY (code ASC, id DESC)"), vec!["code", "id"]);
    }
}
