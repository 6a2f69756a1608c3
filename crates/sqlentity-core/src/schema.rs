//! Schema model built from `CREATE TABLE` statements

use crate::naming;
use crate::types::JavaType;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name as written (quotes removed)
    pub name: String,

    /// Java field name
    pub field_name: String,

    /// Normalized base type (`VARCHAR(255) UNSIGNED` -> `VARCHAR`)
    pub sql_type: String,

    /// Full type text, upper-cased
    pub raw_type: String,

    /// Java type the field is generated with
    pub mapped_type: JavaType,

    /// Nullable unless declared `NOT NULL`
    pub nullable: bool,

    /// Part of the primary key
    pub is_primary_key: bool,

    /// Value generated by the database (identity, auto increment, serial)
    pub is_auto_generated: bool,

    /// Declared `UNSIGNED`
    pub unsigned: bool,

    /// Declared `UNIQUE` inline
    pub unique: bool,

    /// Raw `DEFAULT` literal
    pub default_value: Option<String>,

    /// Length of character types
    pub length: Option<u32>,

    /// Precision of exact numerics
    pub precision: Option<u32>,

    /// Scale of exact numerics
    pub scale: Option<u32>,
}

impl Column {
    /// Create a nullable column with no attributes
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>, mapped_type: JavaType) -> Self {
        let name = name.into();
        let sql_type = sql_type.into();
        Self {
            field_name: naming::field_name(&name),
            raw_type: sql_type.clone(),
            name,
            sql_type,
            mapped_type,
            nullable: true,
            is_primary_key: false,
            is_auto_generated: false,
            unsigned: false,
            unique: false,
            default_value: None,
            length: None,
            precision: None,
            scale: None,
        }
    }

    /// Set nullability
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark as primary key
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.is_primary_key = primary_key;
        self
    }

    /// Mark as database generated
    pub fn with_auto_generated(mut self, auto_generated: bool) -> Self {
        self.is_auto_generated = auto_generated;
        self
    }

    /// Set the default literal
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Whether the column has to be passed to the required-fields constructor
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.is_auto_generated
    }
}

/// A foreign key from one column to a column of another table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Column of the owning table
    pub local_column: String,

    /// Name of the referenced table
    pub referenced_table: String,

    /// Column of the referenced table
    pub referenced_column: String,

    /// Position of the referenced table in the schema, set by linking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<usize>,
}

impl ForeignKey {
    /// Create an unresolved foreign key
    pub fn new(
        local_column: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            local_column: local_column.into(),
            referenced_table: referenced_table.into(),
            referenced_column: referenced_column.into(),
            target: None,
        }
    }

    /// Whether the referenced table was found in the schema
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

/// A table and everything declared inside its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name as written (quotes removed)
    pub name: String,

    /// Java class name
    pub class_name: String,

    /// Columns in declaration order
    pub columns: Vec<Column>,

    /// Primary key column names, first-seen order, no duplicates
    pub primary_keys: Vec<String>,

    /// Foreign keys in declaration order
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            class_name: naming::class_name(&name),
            name,
            columns: Vec::new(),
            primary_keys: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Find a column by name (SQL column names compare case-insensitively)
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Append a column, or replace an existing one with the same name in place.
    ///
    /// Returns `true` when a column was replaced.
    pub fn upsert_column(&mut self, column: Column) -> bool {
        match self
            .columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(&column.name))
        {
            Some(existing) => {
                *existing = column;
                true
            }
            None => {
                self.columns.push(column);
                false
            }
        }
    }

    /// Add a name to the primary key set unless already present
    pub fn add_primary_key(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.primary_keys.iter().any(|pk| pk.eq_ignore_ascii_case(&name)) {
            self.primary_keys.push(name);
        }
    }

    /// Make the primary key set and the column flags agree.
    ///
    /// Inline `PRIMARY KEY` columns join the set, then every column in the
    /// set gets its flag. Returns the set members with no matching column.
    pub fn mark_primary_keys(&mut self) -> Vec<String> {
        let inline: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.clone())
            .collect();
        for name in inline {
            self.add_primary_key(name);
        }

        let mut missing = Vec::new();
        for pk in &self.primary_keys {
            match self
                .columns
                .iter_mut()
                .find(|c| c.name.eq_ignore_ascii_case(pk))
            {
                Some(column) => column.is_primary_key = true,
                None => missing.push(pk.clone()),
            }
        }
        missing
    }

    /// Columns flagged as primary key, in declaration order
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    /// Whether any column is part of the primary key
    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.is_primary_key)
    }

    /// Non-nullable, non-generated columns in declaration order
    pub fn required_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_required())
    }
}

/// All tables parsed from one input
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Tables in source order, names unique
    pub tables: Vec<Table>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Insert a table, replacing an existing table with the same name in place.
    ///
    /// Returns `true` when a table was replaced.
    pub fn insert(&mut self, table: Table) -> bool {
        match self.position(&table.name) {
            Some(index) => {
                self.tables[index] = table;
                true
            }
            None => {
                self.tables.push(table);
                false
            }
        }
    }

    /// Position of a table by exact name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name == name)
    }

    /// Look up a table by exact name
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.position(name).map(|i| &self.tables[i])
    }

    /// Table a linked foreign key points at
    pub fn referenced_table(&self, fk: &ForeignKey) -> Option<&Table> {
        fk.target.and_then(|i| self.tables.get(i))
    }

    /// Resolved foreign keys of a table with their target tables
    pub fn relationships<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = (&'a ForeignKey, &'a Table)> + 'a {
        table
            .foreign_keys
            .iter()
            .filter_map(move |fk| self.referenced_table(fk).map(|target| (fk, target)))
    }

    /// Table names in source order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table was parsed
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Hex SHA-256 of the serialized model; equal models give equal digests
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn users() -> Table {
        let mut table = Table::new("user_accounts");
        table.columns.push(
            Column::new("id", "INT", JavaType::Integer)
                .with_primary_key(true)
                .with_auto_generated(true),
        );
        table.columns.push(Column::new("email", "VARCHAR", JavaType::String).with_nullable(false));
        table.columns.push(Column::new("nickname", "VARCHAR", JavaType::String));
        table
    }

    #[test]
    fn table_naming() {
        let table = users();
        assert_eq!(table.class_name, "UserAccounts");
        assert_eq!(table.columns[1].field_name, "email");
        assert_eq!(table.column_names(), vec!["id", "email", "nickname"]);
    }

    #[test]
    fn primary_key_union_has_no_duplicates() {
        let mut table = users();
        table.add_primary_key("id");
        table.add_primary_key("ID");
        let missing = table.mark_primary_keys();

        assert!(missing.is_empty());
        assert_eq!(table.primary_keys, vec!["id".to_string()]);
        assert_eq!(table.primary_key_columns().count(), 1);
    }

    #[test]
    fn table_level_primary_key_sets_flags() {
        let mut table = users();
        table.columns[0].is_primary_key = false;
        table.add_primary_key("email");
        table.add_primary_key("ghost");
        let missing = table.mark_primary_keys();

        assert_eq!(missing, vec!["ghost".to_string()]);
        assert!(table.find_column("email").unwrap().is_primary_key);
        assert!(!table.find_column("id").unwrap().is_primary_key);
    }

    #[test]
    fn required_columns_skip_nullable_and_generated() {
        let table = users();
        let required: Vec<&str> = table.required_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(required, vec!["email"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut table = users();
        let replaced = table.upsert_column(Column::new("EMAIL", "TEXT", JavaType::String));

        assert!(replaced);
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[1].sql_type, "TEXT");
    }

    #[test]
    fn schema_lookup_and_relationships() {
        let mut orders = Table::new("orders");
        orders.foreign_keys.push(ForeignKey::new("user_id", "user_accounts", "id"));
        orders.foreign_keys.push(ForeignKey::new("coupon_id", "coupons", "id"));

        let mut schema = Schema::new();
        schema.insert(users());
        schema.insert(orders);
        schema.tables[1].foreign_keys[0].target = Some(0);

        let orders = schema.get("orders").unwrap();
        let related: Vec<&str> = schema.relationships(orders).map(|(_, t)| t.name.as_str()).collect();
        assert_eq!(related, vec!["user_accounts"]);
        assert!(schema.get("coupons").is_none());
    }

    #[test]
    fn fingerprint_is_stable() {
        let mut a = Schema::new();
        a.insert(users());
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = a.clone();
        c.tables[0].columns[2].nullable = false;
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
