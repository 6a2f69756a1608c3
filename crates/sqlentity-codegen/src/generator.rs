//! Entity rendering
//!
//! Renders one Java source file per table from the bundled template.

use crate::context::{EntityContext, GeneratorOptions};
use minijinja::{AutoEscape, Environment};
use sqlentity_core::{Schema, Table};
use std::path::{Path, PathBuf};

const ENTITY_TEMPLATE_NAME: &str = "entity.java";
const ENTITY_TEMPLATE: &str = include_str!("../templates/entity.java.j2");

/// Error during entity generation
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One rendered entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEntity {
    pub table: String,
    pub class_name: String,
    pub source: String,
}

impl GeneratedEntity {
    /// `<ClassName>.java`
    pub fn file_name(&self) -> String {
        format!("{}.java", self.class_name)
    }
}

/// JPA entity generator
pub struct EntityGenerator {
    env: Environment<'static>,
    options: GeneratorOptions,
}

impl EntityGenerator {
    /// Create a generator with the bundled template
    pub fn new(options: GeneratorOptions) -> Result<Self, CodegenError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        env.add_filter("java_string", |value: String| crate::functions::java_string(&value));
        env.add_filter("javadoc", |value: String| crate::functions::javadoc(&value));
        env.add_filter("upper_first", |value: String| crate::functions::upper_first(&value));

        env.add_template(ENTITY_TEMPLATE_NAME, ENTITY_TEMPLATE)?;

        Ok(Self { env, options })
    }

    /// Options in use
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Render the entity for one table of `schema`
    pub fn render(&self, schema: &Schema, table: &Table) -> Result<GeneratedEntity, CodegenError> {
        let context = EntityContext::build(schema, table, &self.options);
        let source = self
            .env
            .get_template(ENTITY_TEMPLATE_NAME)?
            .render(&context)?;

        tracing::debug!(table = %table.name, class = %table.class_name, "Rendered entity");

        Ok(GeneratedEntity {
            table: table.name.clone(),
            class_name: table.class_name.clone(),
            source,
        })
    }

    /// Render every table, in schema order
    pub fn render_all(&self, schema: &Schema) -> Result<Vec<GeneratedEntity>, CodegenError> {
        schema
            .tables
            .iter()
            .map(|table| self.render(schema, table))
            .collect()
    }

    /// Render every table and write the files into `output_dir`
    pub fn write_all(&self, schema: &Schema, output_dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        let entities = self.render_all(schema)?;
        crate::writer::write_entities(&entities, output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlentity_sql::SchemaParser;

    fn render(sql: &str) -> Vec<GeneratedEntity> {
        let schema = SchemaParser::new().parse(sql).schema;
        EntityGenerator::new(GeneratorOptions::new("com.example.entities"))
            .unwrap()
            .render_all(&schema)
            .unwrap()
    }

    #[test]
    fn users_entity() {
        let entities = render(
            "CREATE TABLE users (id INT PRIMARY KEY AUTO_INCREMENT, name VARCHAR(100) NOT NULL, email VARCHAR(100));",
        );
        assert_eq!(entities.len(), 1);

        let users = &entities[0];
        assert_eq!(users.file_name(), "Users.java");

        let src = &users.source;
        assert!(src.starts_with("package com.example.entities;\n\nimport java.io.Serializable;\n"));
        assert!(src.contains("import javax.persistence.*;\n"));
        assert!(src.contains("@Entity\n@Table(name = \"users\")\npublic class Users implements Serializable {\n"));
        assert!(src.contains(
            "    @Id\n    @GeneratedValue(strategy = GenerationType.IDENTITY)\n    @Column(name = \"id\")\n    private Integer id;\n"
        ));
        assert!(src.contains("    @Column(name = \"name\", nullable = false, length = 100)\n    private String name;\n"));
        assert!(src.contains("    @Column(name = \"email\", length = 100)\n    private String email;\n"));
        assert!(src.contains("    public Users() {\n    }\n"));
        assert!(src.contains("    public Users(String name) {\n        this.name = name;\n    }\n"));
        assert!(src.contains("    public String getEmail() {\n        return email;\n    }\n"));
        assert!(src.contains("    public void setEmail(String email) {\n        this.email = email;\n    }\n"));
        assert!(src.contains("        return Objects.equals(id, that.id);\n"));
        assert!(src.contains("        return Objects.hash(id);\n"));
        assert!(src.contains(
            "        return \"Users{\" +\n                \"id=\" + id +\n                \", name=\" + name +\n                \", email=\" + email +\n                \"}\";\n"
        ));
        assert!(src.ends_with("    }\n}\n"));
    }

    #[test]
    fn relationship_field_and_accessors() {
        let entities = render(
            "CREATE TABLE departments (id INT PRIMARY KEY); \
             CREATE TABLE employees (id INT PRIMARY KEY, department_id INT, \
             FOREIGN KEY (department_id) REFERENCES departments(id));",
        );
        let src = &entities[1].source;

        assert!(src.contains(
            "    @ManyToOne(fetch = FetchType.LAZY)\n    @JoinColumn(name = \"department_id\")\n    private Departments departments;\n"
        ));
        assert!(src.contains("    public Departments getDepartments() {\n"));
        assert!(src.contains("    public void setDepartments(Departments departments) {\n"));
    }

    #[test]
    fn unresolved_foreign_key_renders_no_relationship() {
        let entities = render(
            "CREATE TABLE employees (id INT PRIMARY KEY, department_id INT, \
             FOREIGN KEY (department_id) REFERENCES departments(id));",
        );
        assert!(!entities[0].source.contains("@ManyToOne"));
        assert!(entities[0].source.contains("private Integer departmentId;"));
    }

    #[test]
    fn optional_sections_omitted() {
        let entities = render("CREATE TABLE audit_log (message TEXT, created_at TIMESTAMP);");
        let src = &entities[0].source;

        assert_eq!(entities[0].class_name, "AuditLog");
        assert!(!src.contains("import java.util.Objects;"));
        assert!(!src.contains("equals(Object o)"));
        assert!(!src.contains("hashCode()"));
        assert!(!src.contains("Constructor with required fields"));
        assert!(src.contains("import java.time.LocalDateTime;"));
        assert!(!src.contains("\n\n\n"));
    }

    #[test]
    fn default_value_goes_to_column_definition() {
        let entities = render("CREATE TABLE t (salary DECIMAL(10,2) UNSIGNED DEFAULT 0.00, note VARCHAR(20) DEFAULT 'say \"hi\"');");
        let src = &entities[0].source;

        assert!(src.contains("     * Column salary (default: 0.00)\n"));
        assert!(src.contains("columnDefinition = \"DECIMAL(10,2) UNSIGNED DEFAULT 0.00\""));
        assert!(src.contains("columnDefinition = \"VARCHAR(20) DEFAULT 'say \\\"hi\\\"'\""));
        assert!(src.contains("private BigDecimal salary;"));
    }

    #[test]
    fn jakarta_namespace() {
        let schema = SchemaParser::new().parse("CREATE TABLE t (id INT);").schema;
        let options = GeneratorOptions::new("org.acme").with_persistence(sqlentity_core::PersistenceApi::Jakarta);
        let entity = EntityGenerator::new(options).unwrap().render(&schema, &schema.tables[0]).unwrap();

        assert!(entity.source.starts_with("package org.acme;\n"));
        assert!(entity.source.contains("import jakarta.persistence.*;"));
        assert!(!entity.source.contains("javax"));
    }
}
