use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;

use super::error::SchemaError;
use super::schema::Schema;
use super::validation::validate_value;

#[derive(Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), schema);
    }

    pub fn snapshot(&self) -> Vec<(String, Schema)> {
        let mut entries: Vec<(String, Schema)> = self
            .schemas
            .iter()
            .map(|(name, schema)| (name.clone(), schema.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn get(&self, name: &str) -> std::result::Result<&Schema, SchemaError> {
        self.schemas
            .get(name)
            .ok_or_else(|| SchemaError::NotRegistered(name.to_string()))
    }

    pub fn validate(&self, name: &str, value: &Value) -> std::result::Result<(), SchemaError> {
        let schema = self.get(name)?;
        validate_value(schema, value, &mut Vec::new())
    }
}

static REGISTRY: Lazy<RwLock<SchemaRegistry>> = Lazy::new(|| RwLock::new(SchemaRegistry::new()));

pub fn register_schema(name: impl Into<String>, schema: Schema) {
    REGISTRY.write().register(name, schema);
}

pub fn lookup_schema(name: &str) -> Option<Schema> {
    REGISTRY.read().get(name).ok().cloned()
}

pub fn validate_schema(name: &str, value: &Value) -> std::result::Result<(), SchemaError> {
    REGISTRY.read().validate(name, value)
}

pub fn schemas_snapshot() -> Vec<(String, Schema)> {
    REGISTRY.read().snapshot()
}
