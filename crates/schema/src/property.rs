//! Property descriptors
//!
//! Immutable records describing one property of a resource type: its name,
//! capability flags and behaviors. Descriptors are produced by the builders
//! in [`crate::builder`] and shared read-only afterwards.

use crate::behavior::BehaviorSet;
use restype_core::{ApiResult, Cardinality, Entity, Named, PropertyPath, PropertyValue};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// ReadTransform
// ============================================================================

/// Custom read of a property value from its entity
#[derive(Clone)]
pub struct ReadTransform(Arc<dyn Fn(&dyn Entity) -> ApiResult<PropertyValue> + Send + Sync>);

impl ReadTransform {
    pub fn new<F>(read: F) -> Self
    where
        F: Fn(&dyn Entity) -> ApiResult<PropertyValue> + Send + Sync + 'static,
    {
        Self(Arc::new(read))
    }

    pub fn apply(&self, entity: &dyn Entity) -> ApiResult<PropertyValue> {
        (self.0)(entity)
    }
}

impl fmt::Debug for ReadTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReadTransform(..)")
    }
}

// ============================================================================
// PropertyDescriptor
// ============================================================================

/// Capabilities and behaviors of a single property
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub(crate) name: String,
    pub(crate) readable: bool,
    pub(crate) filterable: bool,
    pub(crate) sortable: bool,
    pub(crate) default_field: bool,
    pub(crate) initializable: bool,
    pub(crate) required_for_creation: bool,
    pub(crate) aliased_path: Option<PropertyPath>,
    pub(crate) read_transform: Option<ReadTransform>,
    pub(crate) allowing_inconsistencies: bool,
    pub(crate) behaviors: BehaviorSet,
}

impl PropertyDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exposed in responses
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Usable in query conditions
    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    /// Usable for ordering
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Included in responses without an explicit field selection
    pub fn is_default_field(&self) -> bool {
        self.default_field
    }

    pub fn is_initializable(&self) -> bool {
        self.initializable
    }

    pub fn is_required_for_creation(&self) -> bool {
        self.required_for_creation
    }

    /// Path into the backing entity, if it differs from the property name
    pub fn aliased_path(&self) -> Option<&PropertyPath> {
        self.aliased_path.as_ref()
    }

    pub fn read_transform(&self) -> Option<&ReadTransform> {
        self.read_transform.as_ref()
    }

    /// Read-time inconsistencies are tolerated instead of failing the read
    pub fn is_allowing_inconsistencies(&self) -> bool {
        self.allowing_inconsistencies
    }

    pub fn behaviors(&self) -> &BehaviorSet {
        &self.behaviors
    }

    /// Whether any update behavior is registered
    pub fn is_updatable(&self) -> bool {
        !self.behaviors.update_behaviors().is_empty()
    }
}

// ============================================================================
// RelationshipDescriptor
// ============================================================================

/// A property referencing other resources
#[derive(Debug, Clone)]
pub struct RelationshipDescriptor {
    pub(crate) property: PropertyDescriptor,
    pub(crate) cardinality: Cardinality,
    pub(crate) target_type_identifier: String,
    pub(crate) default_include: bool,
}

impl RelationshipDescriptor {
    /// The capability part shared with attributes
    pub fn property(&self) -> &PropertyDescriptor {
        &self.property
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn target_type_identifier(&self) -> &str {
        &self.target_type_identifier
    }

    /// Expanded in responses without an explicit include directive
    pub fn is_default_include(&self) -> bool {
        self.default_include
    }
}

// ============================================================================
// Property
// ============================================================================

/// Either kind of built property
#[derive(Debug, Clone)]
pub enum Property {
    Attribute(PropertyDescriptor),
    Relationship(RelationshipDescriptor),
}

impl Property {
    /// Capability part, regardless of kind
    pub fn descriptor(&self) -> &PropertyDescriptor {
        match self {
            Property::Attribute(descriptor) => descriptor,
            Property::Relationship(relationship) => &relationship.property,
        }
    }

    pub fn as_relationship(&self) -> Option<&RelationshipDescriptor> {
        match self {
            Property::Relationship(relationship) => Some(relationship),
            Property::Attribute(_) => None,
        }
    }

    pub fn is_relationship(&self) -> bool {
        matches!(self, Property::Relationship(_))
    }

    /// Cardinality of a relationship, `None` for attributes
    pub fn cardinality(&self) -> Option<Cardinality> {
        self.as_relationship().map(RelationshipDescriptor::cardinality)
    }

    /// Target type of a relationship, `None` for attributes
    pub fn target_type_identifier(&self) -> Option<&str> {
        self.as_relationship()
            .map(RelationshipDescriptor::target_type_identifier)
    }
}

impl Named for Property {
    fn name(&self) -> &str {
        &self.descriptor().name
    }
}

impl Named for PropertyDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}
