//! Declared output shapes for structured LLM results.

pub mod error;
pub mod registry;
#[allow(clippy::module_inception)]
pub mod schema;
pub mod validation;

pub use error::SchemaError;
pub use registry::{
    lookup_schema, register_schema, schemas_snapshot, validate_schema, SchemaRegistry,
};
pub use schema::{Schema, SchemaKind};
pub use validation::validate_value;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enum_accepts_listed_values_only() {
        let schema = Schema::enumeration(["a", "b"]);
        assert!(validate_value(&schema, &json!("a"), &mut Vec::new()).is_ok());
        assert!(validate_value(&schema, &json!("c"), &mut Vec::new()).is_err());
        assert!(validate_value(&schema, &json!(1), &mut Vec::new()).is_err());
    }

    #[test]
    fn nested_failure_reports_path() {
        let schema = Schema::object([("items", Schema::array(Schema::string()))]);
        let err = validate_value(&schema, &json!({"items": ["ok", 3]}), &mut Vec::new())
            .unwrap_err();
        match err {
            SchemaError::Validation { path, .. } => assert_eq!(path, vec!["items", "1"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn describe_renders_tagged_json() {
        let schema = Schema::enumeration(["x"]);
        assert_eq!(schema.describe(), r#"{"type":"enum","values":["x"]}"#);
    }
}
