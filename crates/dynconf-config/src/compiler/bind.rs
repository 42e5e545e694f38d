//! Binding of validated JSON onto typed models.

use crate::{CompileError, ConfigKind};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize validated data. Does not re-check the schema.
pub(crate) fn bind<T: DeserializeOwned>(kind: ConfigKind, value: Value) -> Result<T, CompileError> {
    serde_json::from_value(value).map_err(|source| CompileError::BindingError { kind, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnType, SecurityConfig, TableConfig};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Binding fills in defaults for omitted table fields.
    #[test]
    fn binds_table_defaults() {
        let config: TableConfig = bind(
            ConfigKind::Table,
            json!({
                "tables": [{
                    "name": "orders",
                    "table": "orders",
                    "dimensions": [{ "name": "region", "type": "TEXT", "definition": "{{$region}}" }]
                }]
            }),
        )
        .expect("bind");
        let table = config.named("orders").next().expect("orders");
        assert!(table.is_fact);
        assert_eq!(table.read_access, "Prefab.Role.All");
        assert_eq!(table.dimensions[0].column_type, ColumnType::Text);
    }

    /// Values with the wrong shape fail to bind.
    #[test]
    fn structural_mismatch_is_a_binding_error() {
        let err = bind::<SecurityConfig>(ConfigKind::Security, json!({ "rules": 5 })).unwrap_err();
        assert!(matches!(
            err,
            CompileError::BindingError {
                kind: ConfigKind::Security,
                ..
            }
        ));
    }
}
