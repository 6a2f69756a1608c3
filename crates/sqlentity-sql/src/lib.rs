//! SQL DDL parsing and schema model construction
//!
//! This crate handles:
//! - Stripping comments and whitespace from schema text
//! - Locating `CREATE TABLE` statements and their bodies
//! - Splitting bodies into column and constraint clauses
//! - Resolving column clauses (type, nullability, identity, defaults)
//! - Extracting table-level primary and foreign keys
//! - Linking foreign keys across tables by name
//!
//! Parsing is lexical, not a full SQL grammar. Recoverable problems are
//! returned as diagnostics next to the model.

pub mod normalizer;
pub mod lexer;
pub mod extractor;
pub mod splitter;
pub mod column;
pub mod constraints;
pub mod linker;
pub mod parser;

pub use normalizer::normalize;
pub use extractor::{StatementExtractor, Statements, TableStatement};
pub use splitter::split_clauses;
pub use column::{ClauseKind, ColumnError, ColumnResolver, ConstraintKind, InlineReference, ResolvedColumn};
pub use constraints::{find_foreign_keys, find_primary_keys, ForeignKeyMatch};
pub use linker::link;
pub use parser::{ParseError, ParseOutcome, SchemaParser};
