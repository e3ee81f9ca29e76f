//! Schema definitions stored for reuse, keyed by schema name

use serde_json::Value;
use std::collections::BTreeMap;

/// Prefix of references into the stored schemas
pub const SCHEMA_REFERENCE_PREFIX: &str = "#/components/schemas/";

#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    schemas: BTreeMap<String, Value>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, schema_name: &str) -> bool {
        self.schemas.contains_key(schema_name)
    }

    /// The stored schema, building and storing it first if missing
    pub fn find_or_create(&mut self, schema_name: &str, build: impl FnOnce() -> Value) -> &Value {
        self.schemas
            .entry(schema_name.to_string())
            .or_insert_with(build)
    }

    pub fn schema_reference(&self, schema_name: &str) -> String {
        format!("{SCHEMA_REFERENCE_PREFIX}{schema_name}")
    }

    /// `{"$ref": ...}` object pointing at `schema_name`
    pub fn reference_object(&self, schema_name: &str) -> Value {
        serde_json::json!({ "$ref": self.schema_reference(schema_name) })
    }

    pub fn get(&self, schema_name: &str) -> Option<&Value> {
        self.schemas.get(schema_name)
    }

    pub fn set(&mut self, schema_name: impl Into<String>, schema: Value) {
        self.schemas.insert(schema_name.into(), schema);
    }

    pub fn all(&self) -> &BTreeMap<String, Value> {
        &self.schemas
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
