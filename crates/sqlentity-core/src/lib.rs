//! sqlentity core
//!
//! Core domain model shared by the parser, the generator and the CLI.
//! Never rename diagnostic codes - they are part of the report format.

pub mod diagnostic;
pub mod schema;
pub mod types;
pub mod naming;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use schema::{Column, ForeignKey, Table, Schema};
pub use types::{JavaType, TypeMapper};
pub use report::{Report, ReportVersion, ReportSummary};
pub use config::{Config, ConfigError, PersistenceApi};
