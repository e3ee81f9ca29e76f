//! Core types used throughout restype
//!
//! This module contains the value objects shared by the schema, request and
//! documentation crates: identifiers, linkages, property paths, opaque
//! conditions and resolved property values.

use crate::error::{ApiError, ApiResult, TypeLookupFailure};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Cardinality
// ============================================================================

/// Number of entities a relationship points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// At most one related entity
    ToOne,
    /// An ordered collection of related entities
    ToMany,
}

impl Cardinality {
    pub fn is_to_one(&self) -> bool {
        matches!(self, Cardinality::ToOne)
    }

    pub fn is_to_many(&self) -> bool {
        matches!(self, Cardinality::ToMany)
    }

    /// Human-readable name for messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Cardinality::ToOne => "to-one",
            Cardinality::ToMany => "to-many",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Resource Identifier Object
// ============================================================================

/// A `(type, id)` pair addressing one resource instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifierObject {
    #[serde(rename = "type")]
    type_identifier: String,
    id: String,
}

impl ResourceIdentifierObject {
    /// Create a new identifier object; an empty type identifier is never registered
    pub fn new(type_identifier: impl Into<String>, id: impl Into<String>) -> ApiResult<Self> {
        let type_identifier = type_identifier.into();
        if type_identifier.is_empty() {
            return Err(ApiError::unknown_type(
                type_identifier,
                TypeLookupFailure::NotRegistered,
            ));
        }

        Ok(Self {
            type_identifier,
            id: id.into(),
        })
    }

    pub fn type_identifier(&self) -> &str {
        &self.type_identifier
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ResourceIdentifierObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_identifier, self.id)
    }
}

// ============================================================================
// Resource Linkage
// ============================================================================

/// Normalized relationship payload, prior to entity resolution
///
/// The variant is chosen once, when the raw payload is parsed, and is never
/// re-inferred afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLinkage {
    /// `None` clears the relationship
    ToOne(Option<ResourceIdentifierObject>),
    /// An empty list means "no related entities"
    ToMany(Vec<ResourceIdentifierObject>),
}

impl ResourceLinkage {
    pub fn cardinality(&self) -> Cardinality {
        match self {
            ResourceLinkage::ToOne(_) => Cardinality::ToOne,
            ResourceLinkage::ToMany(_) => Cardinality::ToMany,
        }
    }

    /// All identifier objects, in payload order
    pub fn identifiers(&self) -> Vec<&ResourceIdentifierObject> {
        match self {
            ResourceLinkage::ToOne(identifier) => identifier.iter().collect(),
            ResourceLinkage::ToMany(identifiers) => identifiers.iter().collect(),
        }
    }
}

// ============================================================================
// Property Path
// ============================================================================

/// Ordered list of property names leading from an entity to a value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dot-separated path such as `author.address.city`
    pub fn parse(path: &str) -> Self {
        Self::new(path.split('.'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, i.e. the name of the property the path ends in
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

// ============================================================================
// Condition
// ============================================================================

/// Opaque predicate descriptor
///
/// Conditions are recorded and passed along; evaluating them is the job of an
/// external query-condition evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Operator name understood by the evaluator
    pub operator: String,

    /// Path the condition applies to (empty for constant conditions)
    #[serde(default)]
    pub path: PropertyPath,

    /// Operand, if the operator takes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl Condition {
    pub fn new(operator: impl Into<String>, path: PropertyPath, value: Option<serde_json::Value>) -> Self {
        Self {
            operator: operator.into(),
            path,
            value,
        }
    }

    pub fn always_true() -> Self {
        Self::new("TRUE", PropertyPath::default(), None)
    }

    pub fn always_false() -> Self {
        Self::new("FALSE", PropertyPath::default(), None)
    }

    pub fn property_has_value(value: impl Into<serde_json::Value>, path: PropertyPath) -> Self {
        Self::new("EQUALS", path, Some(value.into()))
    }

    pub fn property_is_null(path: PropertyPath) -> Self {
        Self::new("IS NULL", path, None)
    }
}

// ============================================================================
// Entities and Property Values
// ============================================================================

/// A backing entity instance handed out by an entity fetcher
///
/// Implemented for every `'static` value that is `Debug + Send + Sync`.
pub trait Entity: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> Entity for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Entity {
    /// Downcast to the concrete entity type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Shared handle to a fetched entity
pub type EntityRef = Arc<dyn Entity>;

/// A resolved value ready to be handed to constructor or setter behaviors
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// Attribute value, passed through unchanged
    Attribute(serde_json::Value),
    /// Resolved to-one relationship (`None` clears it)
    ToOne(Option<EntityRef>),
    /// Resolved to-many relationship, in request order
    ToMany(Vec<EntityRef>),
}

impl PropertyValue {
    pub fn as_attribute(&self) -> Option<&serde_json::Value> {
        match self {
            PropertyValue::Attribute(value) => Some(value),
            _ => None,
        }
    }

    /// The related entity of a to-one value; `None` for other values too
    pub fn as_to_one(&self) -> Option<&EntityRef> {
        match self {
            PropertyValue::ToOne(entity) => entity.as_ref(),
            _ => None,
        }
    }

    pub fn as_to_many(&self) -> Option<&[EntityRef]> {
        match self {
            PropertyValue::ToMany(entities) => Some(entities),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(
            self,
            PropertyValue::ToOne(None) | PropertyValue::Attribute(serde_json::Value::Null)
        )
    }

    pub fn is_relationship(&self) -> bool {
        !matches!(self, PropertyValue::Attribute(_))
    }
}

/// Property name to resolved value
pub type PropertyValueMap = BTreeMap<String, PropertyValue>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Book {
        title: String,
    }

    #[test]
    fn test_identifier_object_equality() {
        let a = ResourceIdentifierObject::new("book", "1").unwrap();
        let b = ResourceIdentifierObject::new("book", "1").unwrap();
        let c = ResourceIdentifierObject::new("book", "2").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "book:1");
    }

    #[test]
    fn test_identifier_object_requires_type() {
        assert!(ResourceIdentifierObject::new("", "1").is_err());
    }

    #[test]
    fn test_identifier_object_serialization() {
        let identifier = ResourceIdentifierObject::new("author", "5").unwrap();
        let value = serde_json::to_value(&identifier).unwrap();
        assert_eq!(value, json!({"type": "author", "id": "5"}));
    }

    #[test]
    fn test_linkage_cardinality() {
        let to_one = ResourceLinkage::ToOne(None);
        assert_eq!(to_one.cardinality(), Cardinality::ToOne);
        assert!(to_one.identifiers().is_empty());

        let to_many = ResourceLinkage::ToMany(vec![
            ResourceIdentifierObject::new("book", "1").unwrap(),
            ResourceIdentifierObject::new("book", "2").unwrap(),
        ]);
        assert_eq!(to_many.cardinality(), Cardinality::ToMany);
        let ids: Vec<_> = to_many.identifiers().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_property_path() {
        let path = PropertyPath::parse("author.address.city");
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some("city"));
        assert_eq!(path.to_string(), "author.address.city");
        assert!(PropertyPath::default().is_empty());
    }

    #[test]
    fn test_condition_factories() {
        let condition = Condition::property_has_value("draft", PropertyPath::parse("state"));
        assert_eq!(condition.operator, "EQUALS");
        assert_eq!(condition.value, Some(json!("draft")));
        assert_eq!(Condition::always_false().path, PropertyPath::default());
    }

    #[test]
    fn test_entity_downcast() {
        let entity: EntityRef = Arc::new(Book {
            title: "Dune".to_string(),
        });
        let book = entity.downcast_ref::<Book>().unwrap();
        assert_eq!(book.title, "Dune");
        assert!(entity.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_property_value_accessors() {
        let attribute = PropertyValue::Attribute(json!("Dune"));
        assert_eq!(attribute.as_attribute(), Some(&json!("Dune")));
        assert!(!attribute.is_relationship());

        let cleared = PropertyValue::ToOne(None);
        assert!(cleared.is_null());
        assert!(cleared.is_relationship());
        assert!(cleared.as_to_one().is_none());

        let many = PropertyValue::ToMany(vec![]);
        assert_eq!(many.as_to_many().map(<[EntityRef]>::len), Some(0));
    }
}
