use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SchemaKind {
    #[serde(rename = "null")]
    Null,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "string")]
    String,
    /// A string restricted to one of `values`.
    #[serde(rename = "enum")]
    Enum { values: Vec<String> },
    #[serde(rename = "array")]
    Array { items: Box<Schema> },
    #[serde(rename = "object")]
    Object {
        properties: HashMap<String, Schema>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        required: Vec<String>,
        #[serde(default = "Schema::allow_additional")]
        additional: bool,
    },
    #[serde(rename = "any")]
    Any,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            name: None,
            kind,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SchemaKind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn array(items: Schema) -> Self {
        Self::new(SchemaKind::Array {
            items: Box::new(items),
        })
    }

    /// Closed object: every listed property is required, nothing else allowed.
    pub fn object<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = (S, Schema)>,
        S: Into<String>,
    {
        let properties: HashMap<String, Schema> = properties
            .into_iter()
            .map(|(name, schema)| (name.into(), schema))
            .collect();
        let mut required: Vec<String> = properties.keys().cloned().collect();
        required.sort();
        Self::new(SchemaKind::Object {
            properties,
            required,
            additional: false,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Compact JSON rendering, embedded in prompts that request this shape.
    pub fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self.kind))
    }

    pub(crate) fn allow_additional() -> bool {
        true
    }
}
