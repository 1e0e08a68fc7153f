use serde_json::Value;

use crate::error::{FlowAiError, Result};
use crate::schema::{validate_value, Schema, SchemaKind};

const JSON_CODE_BLOCK_START: &str = "```json";
const CODE_BLOCK_FENCE: &str = "```";

/// Strips the code fence a model wraps around JSON.
pub fn clean_response(response: &str) -> String {
    let start_marker = if response.contains(JSON_CODE_BLOCK_START) {
        JSON_CODE_BLOCK_START
    } else {
        CODE_BLOCK_FENCE
    };

    if let Some(start) = response.find(start_marker) {
        let body_start = start + start_marker.len();
        if let Some(end) = response[body_start..].find(CODE_BLOCK_FENCE) {
            return response[body_start..body_start + end].trim().to_string();
        }
    }

    response.trim().to_string()
}

/// Parses a cleaned response and validates it against `schema`.
///
/// `string` and `enum` schemas also accept bare text.
pub fn parse_structured(cleaned: &str, schema: &Schema) -> Result<Value> {
    let value = match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => value,
        Err(err) => match schema.kind {
            SchemaKind::String | SchemaKind::Enum { .. } => {
                Value::String(cleaned.trim().trim_matches('"').to_string())
            }
            _ => {
                return Err(FlowAiError::StructuredOutput(format!(
                    "response is not valid JSON: {}",
                    err
                )))
            }
        },
    };

    validate_value(schema, &value, &mut Vec::new())?;
    Ok(value)
}
