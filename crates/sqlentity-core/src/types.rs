//! SQL to Java type mapping
//!
//! The mapping tables are immutable data: a [`TypeMapper`] is built once
//! (defaults plus config overrides) and shared by the column resolver and
//! the entity generator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Java types an entity field can be generated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JavaType {
    String,
    Byte,
    Short,
    Integer,
    Long,
    BigInteger,
    BigDecimal,
    Float,
    Double,
    Boolean,
    LocalDate,
    LocalTime,
    LocalDateTime,
    #[serde(rename = "byte[]")]
    ByteArray,
    #[serde(rename = "UUID")]
    Uuid,
}

impl JavaType {
    /// Type name as written in Java source
    pub fn java_name(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::BigInteger => "BigInteger",
            Self::BigDecimal => "BigDecimal",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::LocalDate => "LocalDate",
            Self::LocalTime => "LocalTime",
            Self::LocalDateTime => "LocalDateTime",
            Self::ByteArray => "byte[]",
            Self::Uuid => "UUID",
        }
    }

    /// Fully qualified import needed to use this type, if any
    pub fn import(&self) -> Option<&'static str> {
        match self {
            Self::BigDecimal => Some("java.math.BigDecimal"),
            Self::BigInteger => Some("java.math.BigInteger"),
            Self::LocalDate => Some("java.time.LocalDate"),
            Self::LocalTime => Some("java.time.LocalTime"),
            Self::LocalDateTime => Some("java.time.LocalDateTime"),
            Self::Uuid => Some("java.util.UUID"),
            _ => None,
        }
    }

    /// Widen one step along Byte -> Short -> Integer -> Long -> BigInteger.
    ///
    /// Types off that chain (and BigInteger itself) are returned unchanged.
    pub fn widen_unsigned(self) -> Self {
        match self {
            Self::Byte => Self::Short,
            Self::Short => Self::Integer,
            Self::Integer => Self::Long,
            Self::Long => Self::BigInteger,
            other => other,
        }
    }
}

impl std::fmt::Display for JavaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.java_name())
    }
}

impl std::str::FromStr for JavaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim() {
            "String" => Self::String,
            "Byte" => Self::Byte,
            "Short" => Self::Short,
            "Integer" => Self::Integer,
            "Long" => Self::Long,
            "BigInteger" => Self::BigInteger,
            "BigDecimal" => Self::BigDecimal,
            "Float" => Self::Float,
            "Double" => Self::Double,
            "Boolean" => Self::Boolean,
            "LocalDate" => Self::LocalDate,
            "LocalTime" => Self::LocalTime,
            "LocalDateTime" => Self::LocalDateTime,
            "byte[]" => Self::ByteArray,
            "UUID" => Self::Uuid,
            other => return Err(format!("unknown Java type '{}'", other)),
        };
        Ok(ty)
    }
}

/// Built-in SQL base type table
const DEFAULT_MAPPINGS: &[(&str, JavaType)] = &[
    // Character data
    ("VARCHAR", JavaType::String),
    ("CHAR", JavaType::String),
    ("CHARACTER", JavaType::String),
    ("CHARACTER VARYING", JavaType::String),
    ("TEXT", JavaType::String),
    ("LONGTEXT", JavaType::String),
    ("MEDIUMTEXT", JavaType::String),
    ("TINYTEXT", JavaType::String),
    ("CLOB", JavaType::String),
    ("NVARCHAR", JavaType::String),
    ("NCHAR", JavaType::String),
    ("NTEXT", JavaType::String),
    // Integers
    ("INT", JavaType::Integer),
    ("INTEGER", JavaType::Integer),
    ("MEDIUMINT", JavaType::Integer),
    ("SMALLINT", JavaType::Short),
    ("TINYINT", JavaType::Byte),
    ("BIGINT", JavaType::Long),
    ("SERIAL", JavaType::Integer),
    ("SMALLSERIAL", JavaType::Short),
    ("BIGSERIAL", JavaType::Long),
    // Exact and approximate numerics
    ("DECIMAL", JavaType::BigDecimal),
    ("NUMERIC", JavaType::BigDecimal),
    ("MONEY", JavaType::BigDecimal),
    ("SMALLMONEY", JavaType::BigDecimal),
    ("FLOAT", JavaType::Float),
    ("REAL", JavaType::Float),
    ("DOUBLE", JavaType::Double),
    ("DOUBLE PRECISION", JavaType::Double),
    // Temporal
    ("DATE", JavaType::LocalDate),
    ("TIME", JavaType::LocalTime),
    ("TIMESTAMP", JavaType::LocalDateTime),
    ("TIMESTAMPTZ", JavaType::LocalDateTime),
    ("TIMESTAMP WITH TIME ZONE", JavaType::LocalDateTime),
    ("TIMESTAMP WITHOUT TIME ZONE", JavaType::LocalDateTime),
    ("DATETIME", JavaType::LocalDateTime),
    ("DATETIME2", JavaType::LocalDateTime),
    ("SMALLDATETIME", JavaType::LocalDateTime),
    // Boolean
    ("BOOLEAN", JavaType::Boolean),
    ("BOOL", JavaType::Boolean),
    ("BIT", JavaType::Boolean),
    // Binary
    ("BLOB", JavaType::ByteArray),
    ("LONGBLOB", JavaType::ByteArray),
    ("MEDIUMBLOB", JavaType::ByteArray),
    ("TINYBLOB", JavaType::ByteArray),
    ("BINARY", JavaType::ByteArray),
    ("VARBINARY", JavaType::ByteArray),
    ("BYTEA", JavaType::ByteArray),
    ("IMAGE", JavaType::ByteArray),
    // Documents and identifiers
    ("JSON", JavaType::String),
    ("JSONB", JavaType::String),
    ("XML", JavaType::String),
    ("UUID", JavaType::Uuid),
];

/// Read-only SQL base type -> Java type lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapper {
    mappings: BTreeMap<String, JavaType>,
    fallback: JavaType,
}

impl TypeMapper {
    /// Mapper with the built-in table; unknown types map to `String`
    pub fn new() -> Self {
        Self {
            mappings: DEFAULT_MAPPINGS
                .iter()
                .map(|(sql, java)| (sql.to_string(), *java))
                .collect(),
            fallback: JavaType::String,
        }
    }

    /// Add or replace mappings (keys are case-insensitive SQL base types)
    pub fn with_overrides<I, K>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, JavaType)>,
        K: AsRef<str>,
    {
        for (sql, java) in overrides {
            self.mappings.insert(sql.as_ref().trim().to_uppercase(), java);
        }
        self
    }

    /// Map a normalized base type, falling back to `String`
    pub fn map(&self, base_type: &str) -> JavaType {
        self.mappings
            .get(&base_type.trim().to_uppercase())
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Map a base type and apply unsigned widening when flagged
    pub fn resolve(&self, base_type: &str, unsigned: bool) -> JavaType {
        let mapped = self.map(base_type);
        if unsigned {
            mapped.widen_unsigned()
        } else {
            mapped
        }
    }

    /// Whether the base type has an explicit entry
    pub fn is_known(&self, base_type: &str) -> bool {
        self.mappings.contains_key(&base_type.trim().to_uppercase())
    }

    /// Type used for SQL types with no entry
    pub fn fallback(&self) -> JavaType {
        self.fallback
    }

    /// All mappings, ordered by SQL type name
    pub fn entries(&self) -> impl Iterator<Item = (&str, JavaType)> {
        self.mappings.iter().map(|(sql, java)| (sql.as_str(), *java))
    }
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new()
    }
}
