//! Command implementations
//!
//! Every command returns its output instead of printing it, so the binary
//! decides where it goes.

use crate::catalog::{Catalog, CatalogEntity};
use anyhow::{Context, Result};
use colored::Colorize;
use restype_core::{Entity, EntityRef, PropertyValue, PropertyValueMap};
use restype_docs::{DocsConfig, MessageTable, OpenApiSchemaGenerator, PrefixRouteGenerator};
use restype_requests::{PropertyValuesGenerator, RawProperties};
use restype_schema::{Property, ResourceType, TypeRegistry, TypeRequirement};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

/// Body of a write request
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteRequest {
    #[serde(default)]
    pub attributes: RawProperties,
    #[serde(default)]
    pub relationships: RawProperties,
}

// ============================================================================
// inspect
// ============================================================================

/// Human readable overview of the catalog's types
pub fn inspect(catalog: &Catalog) -> Result<String> {
    let registry = catalog.type_registry()?;
    let mut out = String::new();

    for resource_type in registry.resource_types() {
        let mut exposure = Vec::new();
        if resource_type.is_exposed_as_primary_resource() {
            exposure.push("primary");
        }
        if resource_type.is_exposed_as_relationship() {
            exposure.push("relationship");
        }
        let exposure = if exposure.is_empty() {
            "not exposed".to_string()
        } else {
            exposure.join(", ")
        };
        writeln!(out, "{} ({})", resource_type.type_name().bold(), exposure.as_str().dimmed())?;

        for property in resource_type.properties() {
            writeln!(
                out,
                "  {:<16} {:<20} {}",
                property.descriptor().name(),
                kind_label(property),
                flags(property).join(" ")
            )?;
        }
    }

    for identifier in registry.type_identifiers() {
        if registry.resource_type_or_none(&identifier).is_none() {
            writeln!(out, "{} ({})", identifier.as_str().bold(), "internal".yellow())?;
        }
    }

    Ok(out)
}

fn kind_label(property: &Property) -> String {
    match property.as_relationship() {
        Some(relationship) => format!(
            "{} -> {}",
            relationship.cardinality(),
            relationship.target_type_identifier()
        ),
        None => "attribute".to_string(),
    }
}

fn flags(property: &Property) -> Vec<String> {
    let descriptor = property.descriptor();
    let mut flags = Vec::new();
    if descriptor.is_readable() {
        flags.push("readable".green().to_string());
    }
    if descriptor.is_default_field() {
        flags.push("default-field".to_string());
    }
    if property
        .as_relationship()
        .is_some_and(|relationship| relationship.is_default_include())
    {
        flags.push("default-include".to_string());
    }
    if descriptor.is_filterable() {
        flags.push("filterable".cyan().to_string());
    }
    if descriptor.is_sortable() {
        flags.push("sortable".cyan().to_string());
    }
    if descriptor.is_initializable() {
        let label = if descriptor.is_required_for_creation() {
            "initializable(required)"
        } else {
            "initializable"
        };
        flags.push(label.blue().to_string());
    }
    if !descriptor.behaviors().post_constructor_behaviors().is_empty() {
        flags.push("post-construction".blue().to_string());
    }
    if descriptor.is_updatable() {
        flags.push("updatable".magenta().to_string());
    }
    if let Some(alias) = descriptor.aliased_path() {
        flags.push(format!("alias={alias}"));
    }
    flags
}

// ============================================================================
// resolve
// ============================================================================

/// Resolve a write request against `type_name` and render the value map
pub fn resolve(catalog: &Catalog, type_name: &str, request: &WriteRequest) -> Result<Value> {
    let registry = Arc::new(catalog.type_registry()?);
    let resource_type = registry
        .request_type(type_name, TypeRequirement::ExposedAsPrimaryResource)
        .with_context(|| format!("Cannot write resources of type '{type_name}'"))?;

    let generator = PropertyValuesGenerator::new(Arc::new(catalog.entity_fetcher()), registry);
    let values = generator.generate_property_values_for_type(
        resource_type.as_ref(),
        &request.attributes,
        &request.relationships,
    )?;
    tracing::debug!(type_name, count = values.len(), "resolved request");

    Ok(render_values(&values))
}

pub fn load_request(path: &Path) -> Result<WriteRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid request {}", path.display()))
}

fn render_values(values: &PropertyValueMap) -> Value {
    let rendered: Map<String, Value> = values
        .iter()
        .map(|(name, value)| (name.clone(), render_value(value)))
        .collect();
    Value::Object(rendered)
}

fn render_value(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Attribute(value) => value.clone(),
        PropertyValue::ToOne(None) => Value::Null,
        PropertyValue::ToOne(Some(entity)) => render_entity(entity),
        PropertyValue::ToMany(entities) => entities.iter().map(render_entity).collect(),
    }
}

fn render_entity(entity: &EntityRef) -> Value {
    let entity: &dyn Entity = entity.as_ref();
    match entity.downcast_ref::<CatalogEntity>() {
        Some(entity) => json!({ "type": entity.type_identifier, "id": entity.id }),
        None => json!({ "entity": format!("{entity:?}") }),
    }
}

// ============================================================================
// docs
// ============================================================================

/// OpenAPI document of the catalog
pub fn docs(catalog: &Catalog, config: DocsConfig) -> Result<Value> {
    let registry = Arc::new(catalog.type_registry()?);
    let mut generator = OpenApiSchemaGenerator::new(
        registry,
        Arc::new(catalog.attribute_types()),
        Arc::new(PrefixRouteGenerator::default()),
        Arc::new(MessageTable::english()),
    )
    .with_config(config);
    Ok(generator.open_api_specification())
}

#[cfg(test)]
mod tests {
    use super::*;
    use restype_core::ApiError;

    fn catalog() -> Catalog {
        Catalog::from_json(
            &json!({
                "types": [
                    {
                        "name": "Book",
                        "properties": [
                            {"name": "title", "kind": "attribute", "readable": true, "initializable": true, "required": true},
                            {"name": "author", "kind": "to_one", "target": "Person", "readable": true},
                            {"name": "tags", "kind": "to_many", "target": "Tag"}
                        ]
                    },
                    {"name": "Person", "exposed_as_primary_resource": false},
                    {"name": "Tag"}
                ],
                "entities": [
                    {"type": "Person", "id": "1"},
                    {"type": "Tag", "id": "a"},
                    {"type": "Tag", "id": "b"}
                ]
            })
            .to_string(),
        )
        .unwrap()
    }

    fn request(value: Value) -> WriteRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resolve_renders_identifiers() {
        let request = request(json!({
            "attributes": {"title": "Dune"},
            "relationships": {
                "author": {"data": {"type": "Person", "id": "1"}},
                "tags": {"data": [{"type": "Tag", "id": "b"}, {"type": "Tag", "id": "a"}]}
            }
        }));

        let values = resolve(&catalog(), "Book", &request).unwrap();
        assert_eq!(
            values,
            json!({
                "title": "Dune",
                "author": {"type": "Person", "id": "1"},
                "tags": [{"type": "Tag", "id": "b"}, {"type": "Tag", "id": "a"}]
            })
        );
    }

    #[test]
    fn test_resolve_rejects_non_primary_type() {
        let err = resolve(&catalog(), "Person", &WriteRequest::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::UnknownOrUnexposedType { .. })
        ));
    }

    #[test]
    fn test_resolve_propagates_request_errors() {
        let request = request(json!({
            "attributes": {"author": "someone"},
            "relationships": {"author": {"data": null}}
        }));
        let err = resolve(&catalog(), "Book", &request).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::DuplicateFieldName { .. })
        ));
    }

    #[test]
    fn test_inspect_lists_types() {
        colored::control::set_override(false);
        let out = inspect(&catalog()).unwrap();

        assert!(out.contains("Book (primary, relationship)"));
        assert!(out.contains("Person (relationship)"));
        assert!(out.contains("to-one -> Person"));
        assert!(out.contains("initializable(required)"));
    }

    #[test]
    fn test_docs_uses_page_size() {
        let document = docs(&catalog(), DocsConfig::new().with_default_page_size(5)).unwrap();
        assert_eq!(
            document["components"]["schemas"]["parameters:page_size"]["default"],
            json!(5)
        );
        assert!(document["paths"].get("/api/Person").is_none());
    }
}
