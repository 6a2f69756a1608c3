//! Configuration schema (sqlentity.toml)

use crate::types::{JavaType, TypeMapper};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sqlentity.toml";

/// Persistence annotation namespace used by generated entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceApi {
    /// `javax.persistence` (JPA 2.x)
    #[default]
    Javax,

    /// `jakarta.persistence` (Jakarta Persistence 3.x)
    Jakarta,
}

impl PersistenceApi {
    /// Package holding the annotations
    pub fn package(&self) -> &'static str {
        match self {
            Self::Javax => "javax.persistence",
            Self::Jakarta => "jakarta.persistence",
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Java package of generated entities
    #[serde(default = "default_package")]
    pub package: String,

    /// Directory receiving one file per entity
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Annotation namespace
    #[serde(default)]
    pub persistence: PersistenceApi,

    /// Worker threads used to parse table bodies
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Extra or replacement SQL -> Java type mappings
    #[serde(default)]
    pub type_overrides: BTreeMap<String, JavaType>,
}

fn default_package() -> String {
    "com.example.entities".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./generated-entities")
}

fn default_jobs() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package: default_package(),
            output_dir: default_output_dir(),
            persistence: PersistenceApi::default(),
            jobs: default_jobs(),
            type_overrides: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Type mapper with this config's overrides applied
    pub fn type_mapper(&self) -> TypeMapper {
        TypeMapper::new().with_overrides(self.type_overrides.iter().map(|(k, v)| (k, *v)))
    }

    /// Check package syntax and job count
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.package.trim().is_empty() {
            return Err(ConfigError::Invalid("package must not be empty".to_string()));
        }

        let valid_package = self.package.split('.').all(|segment| {
            segment
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
        });
        if !valid_package {
            return Err(ConfigError::Invalid(format!(
                "'{}' is not a valid Java package name",
                self.package
            )));
        }

        if self.jobs == 0 {
            return Err(ConfigError::Invalid("jobs must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.package, "com.example.entities");
        assert_eq!(config.output_dir, PathBuf::from("./generated-entities"));
        assert_eq!(config.persistence, PersistenceApi::Javax);
        assert_eq!(config.jobs, 1);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_from_toml() {
        let config = Config::from_toml(
            r#"
            package = "org.acme.model"
            persistence = "jakarta"
            jobs = 4

            [type_overrides]
            MONEY = "Double"
            GEOMETRY = "byte[]"
            "#,
        )
        .unwrap();

        assert_eq!(config.package, "org.acme.model");
        assert_eq!(config.persistence.package(), "jakarta.persistence");
        assert_eq!(config.jobs, 4);

        let mapper = config.type_mapper();
        assert_eq!(mapper.map("MONEY"), JavaType::Double);
        assert_eq!(mapper.map("GEOMETRY"), JavaType::ByteArray);
    }

    #[test]
    fn rejects_invalid_package() {
        assert!(matches!(
            Config::from_toml("package = \"com..example\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("package = \"com.1example\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(Config::from_toml("jobs = 0"), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_unknown_java_type() {
        assert!(matches!(
            Config::from_toml("[type_overrides]\nMONEY = \"Object\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        let mut config = Config::default();
        config.package = "com.shop.domain".to_string();
        config.type_overrides.insert("TINYINT".to_string(), JavaType::Boolean);
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
