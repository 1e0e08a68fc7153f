use serde_json::Value;

use super::error::SchemaError;
use super::schema::{Schema, SchemaKind};

/// Checks `value` against `schema`; `path` collects the location of the failure.
pub fn validate_value(
    schema: &Schema,
    value: &Value,
    path: &mut Vec<String>,
) -> std::result::Result<(), SchemaError> {
    match &schema.kind {
        SchemaKind::Null => expect(value.is_null(), "expected null", path)?,
        SchemaKind::Boolean => expect(value.is_boolean(), "expected boolean", path)?,
        SchemaKind::Integer => expect(
            value.is_i64() || value.is_u64(),
            "expected integer",
            path,
        )?,
        SchemaKind::Number => expect(value.is_number(), "expected number", path)?,
        SchemaKind::String => expect(value.is_string(), "expected string", path)?,
        SchemaKind::Enum { values } => {
            let Some(text) = value.as_str() else {
                return Err(failure("expected string", path));
            };
            if !values.iter().any(|allowed| allowed == text) {
                return Err(failure(
                    &format!("`{}` is not one of [{}]", text, values.join(", ")),
                    path,
                ));
            }
        }
        SchemaKind::Array { items } => {
            let array = value
                .as_array()
                .ok_or_else(|| failure("expected array", path))?;
            for (idx, element) in array.iter().enumerate() {
                path.push(idx.to_string());
                validate_value(items, element, path)?;
                path.pop();
            }
        }
        SchemaKind::Object {
            properties,
            required,
            additional,
        } => {
            let object = value
                .as_object()
                .ok_or_else(|| failure("expected object", path))?;

            for key in required {
                if !object.contains_key(key) {
                    let mut required_path = path.clone();
                    required_path.push(key.clone());
                    return Err(SchemaError::Validation {
                        message: format!("missing required property `{}`", key),
                        path: required_path,
                    });
                }
            }

            for (key, val) in object {
                if let Some(sub_schema) = properties.get(key) {
                    path.push(key.clone());
                    validate_value(sub_schema, val, path)?;
                    path.pop();
                } else if !additional {
                    let mut extra_path = path.clone();
                    extra_path.push(key.clone());
                    return Err(SchemaError::Validation {
                        message: format!("unexpected property `{}`", key),
                        path: extra_path,
                    });
                }
            }
        }
        SchemaKind::Any => {}
    }

    Ok(())
}

fn expect(condition: bool, message: &str, path: &[String]) -> std::result::Result<(), SchemaError> {
    if condition {
        Ok(())
    } else {
        Err(failure(message, path))
    }
}

fn failure(message: &str, path: &[String]) -> SchemaError {
    SchemaError::Validation {
        message: message.to_string(),
        path: path.to_vec(),
    }
}
