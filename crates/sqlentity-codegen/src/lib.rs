//! JPA entity code generation
//!
//! This crate handles:
//! - Building a template context per table (fields, annotations, relationships)
//! - Rendering Java entity classes with a bundled MiniJinja template
//! - Writing one `<ClassName>.java` per table

pub mod context;
pub mod functions;
pub mod generator;
pub mod writer;

pub use context::{EntityContext, FieldContext, GeneratorOptions, RelationshipContext};
pub use functions::{java_string, javadoc, upper_first};
pub use generator::{CodegenError, EntityGenerator, GeneratedEntity};
pub use writer::write_entities;
