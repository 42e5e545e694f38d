//! Typed models produced by the config compiler.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Resolved template variables keyed by name.
pub type Variables = serde_json::Map<String, Value>;

/// Aggregate of table definitions, deduplicated by content.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TableConfig {
    #[serde(default)]
    pub tables: BTreeSet<Table>,
}

impl TableConfig {
    /// Number of distinct table definitions.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when no tables were compiled.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Find every definition carrying the provided name.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Table> + 'a {
        self.tables.iter().filter(move |table| table.name == name)
    }

    /// Union another aggregate into this one. Equal definitions collapse.
    pub fn merge(&mut self, other: TableConfig) {
        self.tables.extend(other.tables);
    }
}

impl FromIterator<Table> for TableConfig {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}

/// A single logical table. Equality is field-for-field over its content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_connection_name: Option<String>,
    #[serde(default = "default_is_fact")]
    pub is_fact: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Cardinality>,
    #[serde(default = "default_read_access")]
    pub read_access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub joins: Vec<Join>,
    #[serde(default)]
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

fn default_is_fact() -> bool {
    true
}

/// Default read permission expression for tables and columns.
fn default_read_access() -> String {
    "Prefab.Role.All".to_string()
}

/// Rough row-count class used by query planners.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

/// Relationship from one table to another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Join {
    pub name: String,
    pub to: String,
    #[serde(default, rename = "type")]
    pub join_type: JoinType,
    #[serde(default)]
    pub kind: JoinKind,
    pub definition: String,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "camelCase")]
pub enum JoinType {
    #[default]
    ToOne,
    ToMany,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Left,
    Inner,
    Full,
    Cross,
}

/// Aggregated metric column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_read_access")]
    pub read_access: String,
    pub definition: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Grouping column, optionally time-grained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_read_access")]
    pub read_access: String,
    pub definition: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grain: Option<Grain>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub values: BTreeSet<String>,
}

/// Value type of a measure or dimension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Text,
    Integer,
    Decimal,
    Money,
    Boolean,
    Coordinate,
    Time,
}

/// Time grain applied to a `TIME` dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grain {
    #[serde(rename = "type")]
    pub grain_type: GrainType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum GrainType {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

/// Access rules for the compiled model.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SecurityConfig {
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub rules: Vec<SecurityRule>,
}

impl SecurityConfig {
    /// Look up a rule by name.
    pub fn rule(&self, name: &str) -> Option<&SecurityRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }
}

/// Named row-level filter check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityRule {
    #[serde(default, rename = "type")]
    pub rule_type: RuleType,
    pub name: String,
    pub filter: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    #[default]
    Filter,
}

/// Everything compiled from one model directory.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct CompiledModel {
    pub variables: Variables,
    pub security: Option<SecurityConfig>,
    pub tables: TableConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(name: &str, source: &str) -> Table {
        Table {
            name: name.to_string(),
            schema: None,
            db_connection_name: None,
            is_fact: true,
            hidden: false,
            description: None,
            category: None,
            cardinality: None,
            read_access: default_read_access(),
            extend: None,
            sql: None,
            table: Some(source.to_string()),
            tags: BTreeSet::new(),
            joins: Vec::new(),
            measures: Vec::new(),
            dimensions: Vec::new(),
        }
    }

    /// Merging per-file aggregates gives the same set in either order.
    #[test]
    fn merge_is_order_independent() {
        let first: TableConfig = [table("users", "users"), table("orders", "orders")]
            .into_iter()
            .collect();
        let second: TableConfig = [table("users", "users"), table("orders", "orders_v2")]
            .into_iter()
            .collect();

        let mut forward = TableConfig::default();
        forward.merge(first.clone());
        forward.merge(second.clone());

        let mut backward = TableConfig::default();
        backward.merge(second);
        backward.merge(first);

        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 3);
        assert_eq!(forward.named("users").count(), 1);
        assert_eq!(forward.named("orders").count(), 2);
    }

    /// Collecting equal definitions keeps a single copy.
    #[test]
    fn collecting_duplicates_collapses_them() {
        let config: TableConfig = std::iter::repeat_with(|| table("users", "users"))
            .take(3)
            .collect();
        assert_eq!(config.len(), 1);
        assert!(!config.is_empty());
    }
}
