//! Schema parsing pipeline
//!
//! normalize -> extract statements -> per table: split, resolve columns and
//! constraints -> collect tables -> link foreign keys.

use crate::column::{ClauseKind, ColumnResolver};
use crate::constraints::{find_foreign_keys, find_primary_keys};
use crate::extractor::{StatementExtractor, TableStatement};
use crate::linker::link;
use crate::normalizer::normalize;
use crate::splitter::split_clauses;
use sqlentity_core::{Diagnostic, DiagnosticCode, ForeignKey, Location, Schema, Table, TypeMapper};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Error reading schema input
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Linked schema plus everything worth reporting about it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseOutcome {
    pub schema: Schema,

    /// Diagnostics in source order
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    /// Whether any diagnostic is an error
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == sqlentity_core::Severity::Error)
    }
}

/// `CREATE TABLE` schema parser
#[derive(Debug, Clone)]
pub struct SchemaParser {
    mapper: TypeMapper,
    jobs: usize,
    file: Option<String>,
}

impl SchemaParser {
    /// Parser with the built-in type table, single-threaded
    pub fn new() -> Self {
        Self {
            mapper: TypeMapper::new(),
            jobs: 1,
            file: None,
        }
    }

    /// Use a custom type table
    pub fn with_mapper(mut self, mapper: TypeMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Parse table bodies on up to `jobs` threads (0 is treated as 1)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// File name attached to every diagnostic location
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Type table in use
    pub fn mapper(&self) -> &TypeMapper {
        &self.mapper
    }

    /// Read and parse a schema file
    pub fn parse_file(&self, path: &Path) -> Result<ParseOutcome, ParseError> {
        let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parser = match &self.file {
            Some(_) => self.clone(),
            None => self.clone().with_file(path.display().to_string()),
        };
        Ok(parser.parse(&text))
    }

    /// Parse raw schema text into a linked schema
    pub fn parse(&self, raw: &str) -> ParseOutcome {
        let text = normalize(raw);

        // Extraction is sequential; each item keeps its source position
        let items: Vec<Result<TableStatement<'_>, Diagnostic>> = StatementExtractor::scan(&text).collect();
        let statements: Vec<&TableStatement<'_>> = items.iter().filter_map(|item| item.as_ref().ok()).collect();
        debug!(statements = statements.len(), jobs = self.jobs, "Extracted statements");

        let mut parsed = self.parse_statements(&statements).into_iter();

        let mut schema = Schema::new();
        let mut diagnostics = Vec::new();
        for item in items {
            match item {
                Err(diag) => diagnostics.push(diag),
                Ok(_) => {
                    let Some((table, table_diagnostics)) = parsed.next() else {
                        continue;
                    };
                    diagnostics.extend(table_diagnostics);

                    let name = table.name.clone();
                    if schema.insert(table) {
                        diagnostics.push(
                            Diagnostic::warn(
                                DiagnosticCode::DuplicateTable,
                                format!("Table '{}' is defined more than once, the last definition wins", name),
                            )
                            .with_location(Location::table(&name)),
                        );
                    }
                }
            }
        }

        let resolved = link(&mut schema);
        info!(tables = schema.len(), foreign_keys = resolved, "Linked schema");

        if let Some(file) = &self.file {
            for diag in &mut diagnostics {
                let location = diag.location.take().unwrap_or_default();
                diag.location = Some(location.with_file(file));
            }
        }
        for diag in &diagnostics {
            warn!(code = diag.code.as_str(), "{}", diag.message);
        }

        ParseOutcome { schema, diagnostics }
    }

    /// Parse bodies in source order, on scoped threads when `jobs > 1`
    fn parse_statements(&self, statements: &[&TableStatement<'_>]) -> Vec<(Table, Vec<Diagnostic>)> {
        if self.jobs <= 1 || statements.len() < 2 {
            return statements.iter().map(|stmt| self.parse_table(stmt)).collect();
        }

        let chunk_size = statements.len().div_ceil(self.jobs);
        std::thread::scope(|scope| {
            let handles: Vec<_> = statements
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || chunk.iter().map(|stmt| self.parse_table(stmt)).collect::<Vec<_>>())
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    }

    /// Build one unlinked table from its statement
    pub fn parse_table(&self, statement: &TableStatement<'_>) -> (Table, Vec<Diagnostic>) {
        let mut table = Table::new(&statement.name);
        let mut diagnostics = Vec::new();
        let mut inline_references: Vec<ForeignKey> = Vec::new();
        let resolver = ColumnResolver::new(&self.mapper);

        for clause in split_clauses(statement.body) {
            if let ClauseKind::Constraint(kind) = ClauseKind::classify(clause) {
                debug!(table = %table.name, ?kind, clause, "Constraint clause");
                continue;
            }

            let resolved = match resolver.resolve(clause) {
                Ok(resolved) => resolved,
                Err(err) => {
                    diagnostics.push(err.to_diagnostic(&table.name, clause));
                    continue;
                }
            };
            debug!(table = %table.name, column = %resolved.column.name, sql_type = %resolved.column.sql_type, "Column");

            let name = resolved.column.name.clone();
            inline_references.retain(|fk| !fk.local_column.eq_ignore_ascii_case(&name));
            if let Some(reference) = resolved.reference {
                inline_references.push(ForeignKey::new(&name, reference.table, reference.column));
            }

            if table.upsert_column(resolved.column) {
                diagnostics.push(
                    Diagnostic::warn(
                        DiagnosticCode::DuplicateColumn,
                        format!("Column '{}' is declared more than once, the last definition wins", name),
                    )
                    .with_location(Location::table(&table.name).with_clause(clause)),
                );
            }
        }

        // Inline keys first so the set keeps declaration order
        table.mark_primary_keys();
        for pk in find_primary_keys(statement.body) {
            table.add_primary_key(pk);
        }
        for missing in table.mark_primary_keys() {
            diagnostics.push(
                Diagnostic::warn(
                    DiagnosticCode::PrimaryKeyColumnMissing,
                    format!("Primary key column '{}' is not a column of the table", missing),
                )
                .with_location(Location::table(&table.name)),
            );
        }

        for found in find_foreign_keys(statement.body) {
            match found.into_foreign_key(&table.name) {
                Ok(fk) => table.foreign_keys.push(fk),
                Err(diag) => diagnostics.push(diag),
            }
        }
        // A table-level key on the same column wins over the inline one
        for fk in inline_references {
            let declared = table
                .foreign_keys
                .iter()
                .any(|existing| existing.local_column.eq_ignore_ascii_case(&fk.local_column));
            if declared {
                debug!(table = %table.name, column = %fk.local_column, "Inline reference already declared");
            } else {
                table.foreign_keys.push(fk);
            }
        }

        info!(
            table = %table.name,
            columns = table.columns.len(),
            primary_keys = table.primary_keys.len(),
            foreign_keys = table.foreign_keys.len(),
            "Parsed table"
        );

        (table, diagnostics)
    }
}

impl Default for SchemaParser {
    fn default() -> Self {
        Self::new()
    }
}
