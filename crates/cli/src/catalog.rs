//! JSON catalog files
//!
//! A catalog declares resource types, internal (non-resource) types and
//! fixture entities. It is the only input the command-line tools need.

use anyhow::{Context, Result, bail};
use restype_docs::StaticAttributeTypes;
use restype_requests::InMemoryEntityFetcher;
use restype_schema::{
    AttributeBuilder, InMemoryTypeRegistry, Property, PropertyConfigBuilder, PropertyPath,
    ReadOptions, RelationshipPath, ResourceTypeDefinition, ToManyRelationshipBuilder,
    ToOneRelationshipBuilder,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default)]
    pub types: Vec<TypeSpec>,

    /// Types known to the backend but not usable through the API
    #[serde(default)]
    pub internal_types: Vec<String>,

    #[serde(default)]
    pub entities: Vec<CatalogEntity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSpec {
    pub name: String,

    #[serde(default = "default_true")]
    pub exposed_as_primary_resource: bool,

    #[serde(default = "default_true")]
    pub exposed_as_relationship: bool,

    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Attribute,
    ToOne,
    ToMany,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertySpec {
    pub name: String,
    pub kind: PropertyKind,

    /// Target type of relationships
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub readable: bool,
    #[serde(default)]
    pub default_field: bool,
    #[serde(default)]
    pub default_include: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub initializable: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub updatable: bool,

    /// Settable right after construction; creation requests may omit it
    #[serde(default)]
    pub post_constructor: bool,

    /// Constructor argument receiving the value, when not named like the property
    #[serde(default)]
    pub constructor_argument: Option<String>,

    /// Dot separated entity path the property is read from
    #[serde(default)]
    pub alias: Option<String>,

    /// JSON schema of an attribute, used for documentation
    #[serde(default)]
    pub schema: Option<Value>,
}

/// Fixture entity; also the entity type handed out by the catalog's fetcher
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntity {
    #[serde(rename = "type")]
    pub type_identifier: String,
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid catalog {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Registry with every declared resource and internal type
    pub fn type_registry(&self) -> Result<InMemoryTypeRegistry> {
        let mut registry = InMemoryTypeRegistry::new();
        for spec in &self.types {
            registry.register(Arc::new(spec.build()?))?;
        }
        for identifier in &self.internal_types {
            registry.register_internal(identifier.as_str())?;
        }
        Ok(registry)
    }

    pub fn entity_fetcher(&self) -> InMemoryEntityFetcher {
        self.entities
            .iter()
            .fold(InMemoryEntityFetcher::new(), |fetcher, entity| {
                fetcher.with_entity(
                    entity.type_identifier.as_str(),
                    entity.id.as_str(),
                    entity.clone(),
                )
            })
    }

    /// Attribute schemas declared in the catalog
    pub fn attribute_types(&self) -> StaticAttributeTypes {
        let mut types = StaticAttributeTypes::new();
        for spec in &self.types {
            for property in &spec.properties {
                if let Some(schema) = &property.schema {
                    types.insert(spec.name.as_str(), property.name.as_str(), schema.clone());
                }
            }
        }
        types
    }
}

impl TypeSpec {
    pub fn build(&self) -> Result<ResourceTypeDefinition> {
        let properties = self
            .properties
            .iter()
            .map(|property| {
                property
                    .build()
                    .with_context(|| format!("Invalid property '{}' of '{}'", property.name, self.name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResourceTypeDefinition::builder(self.name.as_str())
            .properties(properties)
            .exposed_as_primary_resource(self.exposed_as_primary_resource)
            .exposed_as_relationship(self.exposed_as_relationship)
            .build()?)
    }
}

impl PropertySpec {
    pub fn build(&self) -> Result<Property> {
        if self.required && !self.initializable {
            bail!("required properties must be initializable");
        }
        if self.constructor_argument.is_some() && !self.initializable {
            bail!("constructor arguments need an initializable property");
        }
        let property = match self.kind {
            PropertyKind::Attribute => {
                if self.target.is_some() {
                    bail!("attributes have no target type");
                }
                let builder = self.declare(AttributeBuilder::named(&self.name)?);
                if self.updatable {
                    builder.updatable(Vec::new()).build()
                } else {
                    builder.build()
                }
            }
            PropertyKind::ToOne => {
                let path = self.relationship_path()?;
                let builder = self.declare(ToOneRelationshipBuilder::new(&path, self.default_include)?);
                if self.updatable {
                    builder.updatable(Vec::new(), Vec::new(), None).build()
                } else {
                    builder.build()
                }
            }
            PropertyKind::ToMany => {
                let path = self.relationship_path()?;
                let builder = self.declare(ToManyRelationshipBuilder::new(&path, self.default_include)?);
                if self.updatable {
                    builder.updatable(Vec::new(), Vec::new(), None).build()
                } else {
                    builder.build()
                }
            }
        };
        Ok(property)
    }

    fn relationship_path(&self) -> Result<RelationshipPath> {
        match &self.target {
            Some(target) => Ok(RelationshipPath::named(&self.name, target.as_str())),
            None => bail!("relationships need a target type"),
        }
    }

    /// Apply the capability flags shared by every property kind
    fn declare<B: PropertyConfigBuilder>(&self, mut builder: B) -> B {
        if self.readable {
            let options = if self.default_field {
                ReadOptions::default_field()
            } else {
                ReadOptions::default()
            };
            builder = builder.readable_with(options);
        }
        if self.filterable {
            builder = builder.filterable();
        }
        if self.sortable {
            builder = builder.sortable();
        }
        if self.initializable {
            builder = builder.initializable(self.required);
        }
        if let Some(argument) = &self.constructor_argument {
            builder = builder.constructor_argument(argument.as_str());
        }
        if self.post_constructor {
            builder = builder.settable_after_construction(true);
        }
        if let Some(alias) = &self.alias {
            builder = builder.aliased(PropertyPath::parse(alias));
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restype_docs::AttributeTypeResolver;
    use restype_schema::{Cardinality, ResourceType, TypeRegistry};
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_json(
            &json!({
                "types": [
                    {
                        "name": "Book",
                        "properties": [
                            {"name": "title", "kind": "attribute", "readable": true, "initializable": true, "required": true, "schema": {"type": "string"}},
                            {"name": "author", "kind": "to_one", "target": "Person", "readable": true, "default_include": true},
                            {"name": "tags", "kind": "to_many", "target": "Tag", "updatable": true}
                        ]
                    },
                    {"name": "Person", "exposed_as_primary_resource": false},
                    {"name": "Tag"}
                ],
                "internal_types": ["AuditLog"],
                "entities": [{"type": "Person", "id": "1", "attributes": {"name": "Ada"}}]
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_registry_from_catalog() {
        let registry = catalog().type_registry().unwrap();
        assert_eq!(registry.len(), 4);

        let book = registry.resource_type_or_none("Book").unwrap();
        assert_eq!(book.properties().len(), 3);
        assert_eq!(book.property("tags").unwrap().cardinality(), Some(Cardinality::ToMany));
        assert!(book.relationship("author").unwrap().is_default_include());
        assert!(book.as_creatable().is_some());
        assert!(book.as_updatable().is_some());

        let person = registry.resource_type_or_none("Person").unwrap();
        assert!(!person.is_exposed_as_primary_resource());
        assert!(registry.resource_type_or_none("AuditLog").is_none());
    }

    #[test]
    fn test_relationship_without_target_rejected() {
        let catalog = Catalog::from_json(
            r#"{"types": [{"name": "Book", "properties": [{"name": "author", "kind": "to_one"}]}]}"#,
        )
        .unwrap();
        let err = catalog.type_registry().unwrap_err();
        assert!(format!("{err:#}").contains("relationships need a target type"));
    }

    #[test]
    fn test_required_without_initializable_rejected() {
        let catalog = Catalog::from_json(
            r#"{"types": [{"name": "Book", "properties": [{"name": "title", "kind": "attribute", "required": true}]}]}"#,
        )
        .unwrap();
        let err = catalog.type_registry().unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Invalid property 'title' of 'Book'"));
        assert!(message.contains("required properties must be initializable"));
    }

    #[test]
    fn test_constructor_argument_without_initializable_rejected() {
        let catalog = Catalog::from_json(
            r#"{"types": [{"name": "Book", "properties": [{"name": "title", "kind": "attribute", "constructor_argument": "name"}]}]}"#,
        )
        .unwrap();
        let err = catalog.type_registry().unwrap_err();
        assert!(format!("{err:#}").contains("constructor arguments need an initializable property"));
    }

    #[test]
    fn test_creation_flags() {
        let catalog = Catalog::from_json(
            &json!({
                "types": [{
                    "name": "Book",
                    "properties": [
                        {"name": "title", "kind": "attribute", "initializable": true, "constructor_argument": "name"},
                        {"name": "tags", "kind": "to_many", "target": "Tag", "post_constructor": true}
                    ]
                }]
            })
            .to_string(),
        )
        .unwrap();
        let book = catalog.types[0].build().unwrap();
        let creatable = book.as_creatable().unwrap();

        let constructors = creatable.constructor_behaviors();
        assert_eq!(constructors["title"][0].constructor_argument(), Some("name"));
        assert!(!constructors.contains_key("tags"));

        let post = creatable.post_constructor_behaviors();
        assert_eq!(post.keys().collect::<Vec<_>>(), vec!["tags"]);
        assert_eq!(
            creatable.initializable_properties().keys().collect::<Vec<_>>(),
            vec!["tags", "title"]
        );
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(Catalog::from_json(r#"{"types": [], "extra": 1}"#).is_err());
    }

    #[test]
    fn test_fixtures_and_attribute_types() {
        let catalog = catalog();
        assert_eq!(catalog.entity_fetcher().len(), 1);

        let book = catalog.types[0].build().unwrap();
        let types = catalog.attribute_types();
        assert_eq!(types.property_type(&book, "title").unwrap(), json!({"type": "string"}));
        assert!(types.property_type(&book, "author").is_err());
    }
}
