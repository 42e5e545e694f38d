//! Schema registry for table, security, and variable configs.
//!
//! The three canonical schemas ship inside the crate and are compiled once.
//! A registry is immutable after it is built, so a single instance can be
//! shared across threads behind an `Arc`.

use crate::CompileError;
use jsonschema::Validator;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

const TABLE_SCHEMA: &str = include_str!("../schemas/table.schema.json");
const SECURITY_SCHEMA: &str = include_str!("../schemas/security.schema.json");
const VARIABLE_SCHEMA: &str = include_str!("../schemas/variable.schema.json");

/// Kind of config document, each bound to its own schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    Table,
    Security,
    Variable,
}

impl ConfigKind {
    /// All kinds, in registry load order.
    pub const ALL: [ConfigKind; 3] = [
        ConfigKind::Table,
        ConfigKind::Security,
        ConfigKind::Variable,
    ];

    /// Lowercase label used in logs and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKind::Table => "table",
            ConfigKind::Security => "security",
            ConfigKind::Variable => "variable",
        }
    }

    /// Raw text of the embedded schema for this kind.
    pub fn embedded_schema(self) -> &'static str {
        match self {
            ConfigKind::Table => TABLE_SCHEMA,
            ConfigKind::Security => SECURITY_SCHEMA,
            ConfigKind::Variable => VARIABLE_SCHEMA,
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled schemas keyed by config kind.
pub struct SchemaRegistry {
    schemas: HashMap<ConfigKind, Validator>,
}

impl SchemaRegistry {
    /// Compile the three embedded schemas. Any failure is fatal.
    pub fn embedded() -> Result<Self, CompileError> {
        let mut builder = Self::builder();
        for kind in ConfigKind::ALL {
            builder = builder.with_embedded(kind)?;
        }
        Ok(builder.build())
    }

    /// Start an empty registry.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Look up the compiled schema for a kind.
    pub fn get(&self, kind: ConfigKind) -> Result<&Validator, CompileError> {
        self.schemas
            .get(&kind)
            .ok_or(CompileError::SchemaNotLoaded(kind))
    }

    /// True when a schema is registered for the kind.
    pub fn contains(&self, kind: ConfigKind) -> bool {
        self.schemas.contains_key(&kind)
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds = self.schemas.keys().map(|kind| kind.as_str()).collect::<Vec<_>>();
        kinds.sort_unstable();
        f.debug_struct("SchemaRegistry").field("kinds", &kinds).finish()
    }
}

/// Builder for registries holding a subset of schemas or custom documents.
#[derive(Default)]
pub struct SchemaRegistryBuilder {
    schemas: HashMap<ConfigKind, Validator>,
}

impl SchemaRegistryBuilder {
    /// Register the schema shipped with the crate for `kind`.
    pub fn with_embedded(self, kind: ConfigKind) -> Result<Self, CompileError> {
        let document: Value = serde_json::from_str(kind.embedded_schema()).map_err(|err| {
            CompileError::SchemaLoad {
                kind,
                message: err.to_string(),
            }
        })?;
        self.with_schema(kind, &document)
    }

    /// Register a custom schema document for `kind`, replacing any earlier one.
    pub fn with_schema(mut self, kind: ConfigKind, document: &Value) -> Result<Self, CompileError> {
        let validator =
            jsonschema::validator_for(document).map_err(|err| CompileError::SchemaLoad {
                kind,
                message: err.to_string(),
            })?;
        debug!("schema compiled (kind={kind})");
        self.schemas.insert(kind, validator);
        Ok(self)
    }

    /// Freeze the registry.
    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self.schemas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// The embedded registry has a schema for every kind.
    #[test]
    fn embedded_registry_holds_every_kind() {
        let registry = SchemaRegistry::embedded().expect("registry");
        for kind in ConfigKind::ALL {
            assert!(registry.contains(kind), "missing {kind}");
        }
    }

    /// Looking up a kind that was never registered fails.
    #[test]
    fn lookup_of_unregistered_kind_fails() {
        let registry = SchemaRegistry::builder()
            .with_embedded(ConfigKind::Table)
            .expect("table")
            .build();
        let err = registry
            .get(ConfigKind::Security)
            .err()
            .expect("security schema is absent");
        assert!(matches!(
            err,
            CompileError::SchemaNotLoaded(ConfigKind::Security)
        ));
    }

    /// Schemas that do not compile are rejected at build time.
    #[test]
    fn rejects_invalid_schema_document() {
        let err = SchemaRegistry::builder()
            .with_schema(ConfigKind::Variable, &json!({ "type": 12 }))
            .err()
            .expect("schema rejected");
        assert!(matches!(
            err,
            CompileError::SchemaLoad {
                kind: ConfigKind::Variable,
                ..
            }
        ));
    }

    /// Kinds display as their lowercase labels.
    #[test]
    fn kind_labels() {
        let labels = ConfigKind::ALL.map(|kind| kind.to_string());
        assert_eq!(labels, ["table", "security", "variable"].map(String::from));
    }
}
