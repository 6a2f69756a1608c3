//! Template context for one entity class
//!
//! Annotations and Java expression fragments are built here; the template
//! only loops, substitutes and escapes names.

use crate::functions::{java_string, javadoc};
use serde::{Deserialize, Serialize};
use sqlentity_core::naming::field_name;
use sqlentity_core::{Column, Config, JavaType, PersistenceApi, Schema, Table};
use std::collections::{BTreeSet, HashSet};

/// Generation settings shared by every entity of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// Java package of the generated classes
    pub package: String,

    /// `javax.persistence` or `jakarta.persistence`
    pub persistence: PersistenceApi,
}

impl GeneratorOptions {
    /// Options with the default persistence API
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            persistence: PersistenceApi::default(),
        }
    }

    /// Use the given persistence API
    pub fn with_persistence(mut self, persistence: PersistenceApi) -> Self {
        self.persistence = persistence;
        self
    }

    /// Options taken from a loaded config
    pub fn from_config(config: &Config) -> Self {
        Self {
            package: config.package.clone(),
            persistence: config.persistence,
        }
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// One column field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldContext {
    /// Java field name
    pub name: String,

    pub java_type: String,

    /// Javadoc line
    pub doc: String,

    /// `@Id`, `@GeneratedValue`, `@Column(...)`, in that order
    pub annotations: Vec<String>,
}

/// One `@ManyToOne` field for a resolved foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipContext {
    pub name: String,

    /// Class of the referenced entity
    pub class_name: String,

    pub referenced_table: String,

    /// Local column
    pub join_column: String,
}

/// Everything rendered into one `<ClassName>.java`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityContext {
    pub package: String,
    pub imports: Vec<String>,

    pub table_name: String,

    pub class_name: String,
    pub fields: Vec<FieldContext>,
    pub relationships: Vec<RelationshipContext>,

    /// Parameter list of the required-fields constructor; empty when not emitted
    pub required_params: String,

    /// Field names assigned by the required-fields constructor
    pub required_fields: Vec<String>,

    /// `Objects.equals(a, that.a) && ...`; empty without a primary key
    pub equals_expr: String,

    /// Arguments of `Objects.hash(...)`
    pub hash_args: String,

    /// Lines of the `toString` concatenation after the class name
    pub to_string_lines: Vec<String>,
}

impl EntityContext {
    /// Build the context for `table`; relationships come from its resolved foreign keys
    pub fn build(schema: &Schema, table: &Table, options: &GeneratorOptions) -> Self {
        let fields: Vec<FieldContext> = table.columns.iter().map(field_context).collect();
        let relationships = relationship_contexts(schema, table, &fields);

        let required: Vec<&Column> = table.required_columns().collect();
        let required_params = required
            .iter()
            .map(|c| format!("{} {}", c.mapped_type.java_name(), c.field_name))
            .collect::<Vec<_>>()
            .join(", ");

        let keys: Vec<&Column> = table.primary_key_columns().collect();
        let equals_expr = keys
            .iter()
            .map(|c| format!("Objects.equals({0}, that.{0})", c.field_name))
            .collect::<Vec<_>>()
            .join(" && ");
        let hash_args = keys
            .iter()
            .map(|c| c.field_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let to_string_lines = fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let separator = if i == 0 { "" } else { ", " };
                format!("\"{}{}=\" + {} +", separator, field.name, field.name)
            })
            .collect();

        Self {
            package: options.package.clone(),
            imports: imports(table, options),
            table_name: table.name.clone(),
            class_name: table.class_name.clone(),
            fields,
            relationships,
            required_params,
            required_fields: required.iter().map(|c| c.field_name.clone()).collect(),
            equals_expr,
            hash_args,
            to_string_lines,
        }
    }
}

/// Sorted, de-duplicated import list
fn imports(table: &Table, options: &GeneratorOptions) -> Vec<String> {
    let mut imports = BTreeSet::new();
    imports.insert(format!("{}.*", options.persistence.package()));
    imports.insert("java.io.Serializable".to_string());
    if table.has_primary_key() {
        imports.insert("java.util.Objects".to_string());
    }
    for column in &table.columns {
        if let Some(import) = column.mapped_type.import() {
            imports.insert(import.to_string());
        }
    }
    imports.into_iter().collect()
}

fn field_context(column: &Column) -> FieldContext {
    let mut annotations = Vec::new();
    if column.is_primary_key {
        annotations.push("@Id".to_string());
        if column.is_auto_generated {
            annotations.push("@GeneratedValue(strategy = GenerationType.IDENTITY)".to_string());
        }
    }
    annotations.push(column_annotation(column));

    let doc = match &column.default_value {
        Some(default) => format!("Column {} (default: {})", column.name, default),
        None => format!("Column {}", column.name),
    };

    FieldContext {
        name: column.field_name.clone(),
        java_type: column.mapped_type.java_name().to_string(),
        doc: javadoc(&doc),
        annotations,
    }
}

/// `@Column(name = "...", ...)` with only the attributes that differ from defaults
fn column_annotation(column: &Column) -> String {
    let mut attributes = vec![format!("name = \"{}\"", java_string(&column.name))];

    if !column.nullable {
        attributes.push("nullable = false".to_string());
    }
    if column.unique && !column.is_primary_key {
        attributes.push("unique = true".to_string());
    }
    if column.mapped_type == JavaType::String {
        if let Some(length) = column.length {
            attributes.push(format!("length = {}", length));
        }
    }
    if column.mapped_type == JavaType::BigDecimal {
        if let Some(precision) = column.precision {
            attributes.push(format!("precision = {}", precision));
        }
        if let Some(scale) = column.scale {
            attributes.push(format!("scale = {}", scale));
        }
    }
    if let Some(default) = &column.default_value {
        let not_null = if column.nullable { "" } else { " NOT NULL" };
        let definition = format!("{}{} DEFAULT {}", column.raw_type, not_null, default);
        attributes.push(format!("columnDefinition = \"{}\"", java_string(&definition)));
    }

    format!("@Column({})", attributes.join(", "))
}

/// Relationship fields for resolved foreign keys, with unique names.
///
/// The field is named after the referenced table; a name already taken by a
/// column or an earlier relationship falls back to the join column without
/// its `_id` suffix, then to a numeric suffix.
fn relationship_contexts(schema: &Schema, table: &Table, fields: &[FieldContext]) -> Vec<RelationshipContext> {
    let mut taken: HashSet<String> = fields.iter().map(|f| f.name.clone()).collect();
    let mut relationships = Vec::new();

    for (fk, target) in schema.relationships(table) {
        let mut name = field_name(&fk.referenced_table);
        if taken.contains(&name) {
            let local = fk.local_column.as_str();
            let stem = local
                .strip_suffix("_id")
                .or_else(|| local.strip_suffix("_ID"))
                .or_else(|| local.strip_suffix("Id"))
                .unwrap_or(local);
            name = field_name(stem);
        }
        if taken.contains(&name) {
            let base = name.clone();
            let mut n = 2;
            while taken.contains(&name) {
                name = format!("{}{}", base, n);
                n += 1;
            }
        }
        taken.insert(name.clone());

        relationships.push(RelationshipContext {
            name,
            class_name: target.class_name.clone(),
            referenced_table: target.name.clone(),
            join_column: fk.local_column.clone(),
        });
    }

    relationships
}
