//! Collaborators of the documentation generator
//!
//! Attribute type resolution, URL generation and translation live outside
//! this workspace. The traits here are their contracts; the small
//! implementations cover fixed setups and tests.

use restype_core::{ApiError, ApiResult};
use restype_schema::ResourceType;
use serde_json::Value;
use std::collections::HashMap;

// ============================================================================
// AttributeTypeResolver
// ============================================================================

/// Determines the JSON schema of an attribute
pub trait AttributeTypeResolver: Send + Sync {
    /// Schema fragment such as `{"type": "string"}` for `property`
    fn property_type(&self, resource_type: &dyn ResourceType, property: &str) -> ApiResult<Value>;
}

/// Resolver over a fixed `(type, property) -> schema` table
#[derive(Debug, Clone, Default)]
pub struct StaticAttributeTypes {
    types: HashMap<(String, String), Value>,
}

impl StaticAttributeTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_name: impl Into<String>, property: impl Into<String>, schema: Value) {
        self.types.insert((type_name.into(), property.into()), schema);
    }

    pub fn with_type(mut self, type_name: impl Into<String>, property: impl Into<String>, schema: Value) -> Self {
        self.insert(type_name, property, schema);
        self
    }
}

impl AttributeTypeResolver for StaticAttributeTypes {
    fn property_type(&self, resource_type: &dyn ResourceType, property: &str) -> ApiResult<Value> {
        let type_name = resource_type.type_name();
        self.types
            .get(&(type_name.to_string(), property.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::UndeterminedAttributeType {
                type_name: type_name.to_string(),
                property: property.to_string(),
                message: "no attribute type declared".to_string(),
            })
    }
}

// ============================================================================
// RouteGenerator
// ============================================================================

/// Generates the URLs of resource routes
pub trait RouteGenerator: Send + Sync {
    /// URL of the list route of `type_name`
    fn resource_list_url(&self, type_name: &str) -> String;

    /// URL template of the single-entity route of `type_name`
    fn resource_entity_url(&self, type_name: &str) -> String {
        format!("{}/{{resourceId}}/", self.resource_list_url(type_name))
    }
}

/// Routes of the form `<prefix>/<type>`
#[derive(Debug, Clone)]
pub struct PrefixRouteGenerator {
    prefix: String,
}

impl PrefixRouteGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for PrefixRouteGenerator {
    fn default() -> Self {
        Self::new("/api")
    }
}

impl RouteGenerator for PrefixRouteGenerator {
    fn resource_list_url(&self, type_name: &str) -> String {
        format!("{}/{type_name}", self.prefix)
    }
}

// ============================================================================
// Translator
// ============================================================================

/// Turns message keys into human-readable text
pub trait Translator: Send + Sync {
    /// Translate `id`, substituting `{name}` placeholders from `parameters`
    fn trans(&self, id: &str, parameters: &[(&str, &str)]) -> String;
}

/// Translator over an in-memory message table; unknown keys are returned as-is
#[derive(Debug, Clone, Default)]
pub struct MessageTable {
    messages: HashMap<String, String>,
}

impl MessageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// English messages for every key the OpenAPI generator uses
    pub fn english() -> Self {
        [
            ("title", "API documentation"),
            ("description", "Resources exposed through the JSON:API interface"),
            ("resource.section", "{type}"),
            ("resource.id", "ID of the resource"),
            ("method.list.description", "List resources of type {type}"),
            ("method.get.description", "Get a single resource of type {type}"),
            ("parameter.query.include", "Relationships to include"),
            ("parameter.query.exclude", "Relationships to exclude from the defaults"),
            ("parameter.query.page_number", "Page number, starting at 1"),
            ("parameter.query.page_size", "Number of resources per page"),
            ("parameter.query.filter", "Filter conditions"),
        ]
        .into_iter()
        .fold(Self::new(), |table, (id, message)| table.with_message(id, message))
    }

    pub fn with_message(mut self, id: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(id.into(), message.into());
        self
    }
}

impl Translator for MessageTable {
    fn trans(&self, id: &str, parameters: &[(&str, &str)]) -> String {
        let template = self.messages.get(id).map(String::as_str).unwrap_or(id);
        parameters
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restype_schema::ResourceTypeDefinition;
    use serde_json::json;

    #[test]
    fn test_static_attribute_types() {
        let book = ResourceTypeDefinition::builder("Book").build().unwrap();
        let types = StaticAttributeTypes::new().with_type("Book", "title", json!({"type": "string"}));

        assert_eq!(
            types.property_type(&book, "title").unwrap(),
            json!({"type": "string"})
        );
        let err = types.property_type(&book, "pages").unwrap_err();
        assert!(matches!(err, ApiError::UndeterminedAttributeType { .. }));
    }

    #[test]
    fn test_prefix_routes() {
        let routes = PrefixRouteGenerator::new("/api/2.0/");
        assert_eq!(routes.resource_list_url("Book"), "/api/2.0/Book");
        assert_eq!(routes.resource_entity_url("Book"), "/api/2.0/Book/{resourceId}/");
    }

    #[test]
    fn test_message_table_substitutes_parameters() {
        let table = MessageTable::english();
        assert_eq!(
            table.trans("method.list.description", &[("type", "Book")]),
            "List resources of type Book"
        );
        assert_eq!(table.trans("unknown.key", &[]), "unknown.key");
    }
}
