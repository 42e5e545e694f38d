//! Schema validation reports.

use crate::{CompileError, ConfigKind, SchemaRegistry};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One schema violation at a JSON pointer location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer to the offending value; empty for the document root.
    pub pointer: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.pointer.is_empty() {
            "root"
        } else {
            self.pointer.as_str()
        };
        write!(f, "{location}: {}", self.message)
    }
}

/// Outcome of checking a document against its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub kind: ConfigKind,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_success(&self) -> bool {
        self.violations.is_empty()
    }

    /// Convert a failed report into `ValidationFailed`.
    pub fn into_result(self, origin: &str) -> Result<(), CompileError> {
        if self.is_success() {
            return Ok(());
        }
        Err(CompileError::ValidationFailed {
            kind: self.kind,
            origin: origin.to_string(),
            violations: self.violations,
        })
    }
}

/// Check `value` against the schema registered for `kind`.
///
/// Non-conformance is reported, not raised; only a missing schema is an error.
pub fn validate(
    registry: &SchemaRegistry,
    kind: ConfigKind,
    value: &Value,
) -> Result<ValidationReport, CompileError> {
    let validator = registry.get(kind)?;
    let violations = validator
        .iter_errors(value)
        .map(|err| Violation {
            pointer: err.instance_path.to_string(),
            message: err.to_string(),
        })
        .collect();
    Ok(ValidationReport { kind, violations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::embedded().expect("registry")
    }

    /// A well-formed table config produces no violations.
    #[test]
    fn conforming_table_config_passes() {
        let value = json!({
            "tables": [{
                "name": "orders",
                "table": "orders",
                "measures": [{ "name": "total", "type": "MONEY", "definition": "SUM({{$total}})" }]
            }]
        });
        let report = validate(&registry(), ConfigKind::Table, &value).expect("report");
        assert!(report.is_success(), "{:?}", report.violations);
    }

    /// Violations carry the JSON pointer of the offending value.
    #[test]
    fn reports_violation_location() {
        let value = json!({ "tables": [{ "name": "orders", "table": "orders", "cardinality": "vast" }] });
        let report = validate(&registry(), ConfigKind::Table, &value).expect("report");
        assert!(!report.is_success());
        assert_eq!(report.violations[0].pointer, "/tables/0/cardinality");
    }

    /// Security rules without a filter are rejected.
    #[test]
    fn security_rule_requires_filter() {
        let value = json!({ "rules": [{ "name": "owner" }] });
        let report = validate(&registry(), ConfigKind::Security, &value).expect("report");
        let err = report.into_result("security.json5").unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.to_string().contains("security.json5"));
    }

    /// Variable names must start with a letter.
    #[test]
    fn variable_names_are_constrained() {
        let value = json!({ "9lives": true });
        let report = validate(&registry(), ConfigKind::Variable, &value).expect("report");
        assert!(!report.is_success());

        let value = json!({ "tablePrefix": "fct_", "nested": { "any": [1, 2] } });
        let report = validate(&registry(), ConfigKind::Variable, &value).expect("report");
        assert!(report.is_success());
    }

    /// Validating against an unregistered kind fails instead of passing.
    #[test]
    fn missing_schema_is_an_error() {
        let registry = SchemaRegistry::builder().build();
        let err = validate(&registry, ConfigKind::Variable, &json!({})).unwrap_err();
        assert!(matches!(err, CompileError::SchemaNotLoaded(ConfigKind::Variable)));
    }
}
