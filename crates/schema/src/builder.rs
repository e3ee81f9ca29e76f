//! Property builders
//!
//! Builders are ordinary mutable accumulators. Capability declarations are
//! chained on the builder and [`PropertyConfigBuilder::build`] copies the
//! accumulated state into an immutable [`Property`]. Building does not
//! consume the builder, so it can be built again and yields an equivalent
//! descriptor every time.

use crate::behavior::{
    BehaviorRef, BehaviorSet, ConstructorParameterBehavior, PropertySetBehavior,
    ToManyRelationshipSetBehavior, ToManyUpdateCallback, ToOneRelationshipSetBehavior,
    ToOneUpdateCallback,
};
use crate::property::{Property, PropertyDescriptor, ReadTransform, RelationshipDescriptor};
use restype_core::{ApiError, ApiResult, Cardinality, Condition, PropertyPath};
use std::sync::Arc;

// ============================================================================
// ReadOptions
// ============================================================================

/// Options for [`PropertyConfigBuilder::readable_with`]
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Include the property in responses by default
    pub default_field: bool,

    /// Custom read instead of the plain entity property
    pub read_transform: Option<ReadTransform>,

    /// Tolerate read-time inconsistencies instead of failing
    pub allowing_inconsistencies: bool,
}

impl ReadOptions {
    pub fn default_field() -> Self {
        Self {
            default_field: true,
            ..Self::default()
        }
    }

    pub fn with_read_transform(mut self, transform: ReadTransform) -> Self {
        self.read_transform = Some(transform);
        self
    }

    pub fn allowing_inconsistencies(mut self) -> Self {
        self.allowing_inconsistencies = true;
        self
    }
}

// ============================================================================
// PropertyConfig
// ============================================================================

/// Mutable state accumulated by every builder kind
#[derive(Debug, Clone)]
pub struct PropertyConfig {
    name: String,
    readable: bool,
    filterable: bool,
    sortable: bool,
    default_field: bool,
    initializable: bool,
    required_for_creation: bool,
    constructor_argument: Option<String>,
    aliased_path: Option<PropertyPath>,
    read_transform: Option<ReadTransform>,
    allowing_inconsistencies: bool,
    behaviors: BehaviorSet,
}

impl PropertyConfig {
    /// Start a configuration named after the last segment of `path`
    pub fn from_path(path: &PropertyPath) -> ApiResult<Self> {
        let name = match path.last() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(ApiError::path_resolution(
                    path.to_string(),
                    "path does not end in a property name",
                ));
            }
        };

        Ok(Self {
            name,
            readable: false,
            filterable: false,
            sortable: false,
            default_field: false,
            initializable: false,
            required_for_creation: false,
            constructor_argument: None,
            aliased_path: None,
            read_transform: None,
            allowing_inconsistencies: false,
            behaviors: BehaviorSet::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy the current state into a descriptor
    fn to_descriptor(&self) -> PropertyDescriptor {
        let mut behaviors = BehaviorSet::new();
        if self.initializable {
            let parameter = ConstructorParameterBehavior::new(&self.name, self.required_for_creation);
            let parameter = match &self.constructor_argument {
                Some(argument) => parameter.with_argument_name(argument.as_str()),
                None => parameter,
            };
            behaviors.push(Arc::new(parameter));
        }
        for kind_list in [
            self.behaviors.constructor_behaviors(),
            self.behaviors.post_constructor_behaviors(),
            self.behaviors.update_behaviors(),
        ] {
            for behavior in kind_list {
                behaviors.push(Arc::clone(behavior));
            }
        }

        PropertyDescriptor {
            name: self.name.clone(),
            readable: self.readable,
            filterable: self.filterable,
            sortable: self.sortable,
            default_field: self.default_field,
            initializable: self.initializable,
            required_for_creation: self.required_for_creation,
            aliased_path: self.aliased_path.clone(),
            read_transform: self.read_transform.clone(),
            allowing_inconsistencies: self.allowing_inconsistencies,
            behaviors,
        }
    }
}

// ============================================================================
// PropertyConfigBuilder Trait
// ============================================================================

/// Capability declarations shared by attribute and relationship builders
pub trait PropertyConfigBuilder: Sized {
    fn config(&self) -> &PropertyConfig;

    fn config_mut(&mut self) -> &mut PropertyConfig;

    /// Produce the immutable descriptor; the builder stays usable
    fn build(&self) -> Property;

    /// Name the built property will carry
    fn property_name(&self) -> &str {
        self.config().name()
    }

    /// Expose the property in responses
    fn readable(self) -> Self {
        self.readable_with(ReadOptions::default())
    }

    /// Expose the property in responses with custom read options
    fn readable_with(mut self, options: ReadOptions) -> Self {
        let config = self.config_mut();
        config.readable = true;
        config.default_field = options.default_field;
        config.read_transform = options.read_transform;
        config.allowing_inconsistencies = options.allowing_inconsistencies;
        self
    }

    /// Allow the property in query conditions
    fn filterable(mut self) -> Self {
        self.config_mut().filterable = true;
        self
    }

    /// Allow the property for ordering
    fn sortable(mut self) -> Self {
        self.config_mut().sortable = true;
        self
    }

    /// Allow setting the property while the entity is constructed
    fn initializable(mut self, required: bool) -> Self {
        let config = self.config_mut();
        config.initializable = true;
        config.required_for_creation = required;
        self
    }

    /// Read and write the property through a different entity path
    fn aliased(mut self, path: PropertyPath) -> Self {
        self.config_mut().aliased_path = Some(path);
        self
    }

    /// Pass the value to a constructor argument not named like the property
    fn constructor_argument(mut self, argument: impl Into<String>) -> Self {
        self.config_mut().constructor_argument = Some(argument.into());
        self
    }

    /// Allow setting the property right after the entity is constructed
    ///
    /// `optional` lets create requests omit the value.
    fn settable_after_construction(mut self, optional: bool) -> Self {
        let behavior = PropertySetBehavior::post_constructor(self.property_name(), optional);
        self.config_mut().behaviors.push(Arc::new(behavior));
        self
    }

    /// Register a custom behavior; it is filed under its own kind
    ///
    /// Fails with [`ApiError::MisboundBehavior`] when the behavior is bound
    /// to a different property.
    fn add_behavior(mut self, behavior: BehaviorRef) -> ApiResult<Self> {
        if behavior.property_name() != self.property_name() {
            return Err(ApiError::MisboundBehavior {
                property: self.property_name().to_string(),
                behavior: behavior.name().to_string(),
                bound_to: behavior.property_name().to_string(),
            });
        }
        self.config_mut().behaviors.push(behavior);
        Ok(self)
    }
}

// ============================================================================
// AttributeBuilder
// ============================================================================

/// Builder for non-relationship properties
#[derive(Debug, Clone)]
pub struct AttributeBuilder {
    config: PropertyConfig,
}

impl AttributeBuilder {
    pub fn new(path: &PropertyPath) -> ApiResult<Self> {
        Ok(Self {
            config: PropertyConfig::from_path(path)?,
        })
    }

    /// Builder for a top-level property
    pub fn named(name: &str) -> ApiResult<Self> {
        Self::new(&PropertyPath::new([name]))
    }

    /// Allow updates of existing entities matching `entity_conditions`
    pub fn updatable(mut self, entity_conditions: Vec<Condition>) -> Self {
        let behavior = PropertySetBehavior::update(&self.config.name, entity_conditions);
        self.config.behaviors.push(Arc::new(behavior));
        self
    }
}

impl PropertyConfigBuilder for AttributeBuilder {
    fn config(&self) -> &PropertyConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut PropertyConfig {
        &mut self.config
    }

    fn build(&self) -> Property {
        Property::Attribute(self.config.to_descriptor())
    }
}

// ============================================================================
// RelationshipPath
// ============================================================================

/// A property path that leads to entities of a known resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipPath {
    path: PropertyPath,
    target_type_identifier: String,
}

impl RelationshipPath {
    pub fn new(path: PropertyPath, target_type_identifier: impl Into<String>) -> Self {
        Self {
            path,
            target_type_identifier: target_type_identifier.into(),
        }
    }

    /// Path of a top-level relationship property
    pub fn named(name: &str, target_type_identifier: impl Into<String>) -> Self {
        Self::new(PropertyPath::new([name]), target_type_identifier)
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn target_type_identifier(&self) -> &str {
        &self.target_type_identifier
    }
}

// ============================================================================
// RelationshipBuilder
// ============================================================================

/// Builder for relationship properties of a fixed cardinality
#[derive(Debug, Clone)]
pub struct RelationshipBuilder {
    config: PropertyConfig,
    cardinality: Cardinality,
    target_type_identifier: String,
    default_include: bool,
}

impl RelationshipBuilder {
    /// Fails with [`ApiError::PathResolution`] when the path yields no
    /// property name or no target type
    pub fn new(
        path: &RelationshipPath,
        cardinality: Cardinality,
        default_include: bool,
    ) -> ApiResult<Self> {
        let config = PropertyConfig::from_path(&path.path)?;
        if path.target_type_identifier.is_empty() {
            return Err(ApiError::path_resolution(
                path.path.to_string(),
                "relationship path does not resolve to a target type",
            ));
        }

        Ok(Self {
            config,
            cardinality,
            target_type_identifier: path.target_type_identifier.clone(),
            default_include,
        })
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn target_type_identifier(&self) -> &str {
        &self.target_type_identifier
    }
}

impl PropertyConfigBuilder for RelationshipBuilder {
    fn config(&self) -> &PropertyConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut PropertyConfig {
        &mut self.config
    }

    fn build(&self) -> Property {
        Property::Relationship(RelationshipDescriptor {
            property: self.config.to_descriptor(),
            cardinality: self.cardinality,
            target_type_identifier: self.target_type_identifier.clone(),
            default_include: self.default_include,
        })
    }
}

// ============================================================================
// ToOneRelationshipBuilder / ToManyRelationshipBuilder
// ============================================================================

/// Builder for to-one relationships
#[derive(Debug, Clone)]
pub struct ToOneRelationshipBuilder {
    inner: RelationshipBuilder,
}

impl ToOneRelationshipBuilder {
    pub fn new(path: &RelationshipPath, default_include: bool) -> ApiResult<Self> {
        Ok(Self {
            inner: RelationshipBuilder::new(path, Cardinality::ToOne, default_include)?,
        })
    }

    /// Allow replacing the related entity of existing entities
    ///
    /// `entity_conditions` gate the owning entity, `relationship_conditions`
    /// gate the new related entity, `callback` gets the final say.
    pub fn updatable(
        mut self,
        entity_conditions: Vec<Condition>,
        relationship_conditions: Vec<Condition>,
        callback: Option<ToOneUpdateCallback>,
    ) -> Self {
        let behavior = ToOneRelationshipSetBehavior::new(
            self.property_name(),
            entity_conditions,
            relationship_conditions,
            callback,
        );
        self.inner.config.behaviors.push(Arc::new(behavior));
        self
    }
}

impl PropertyConfigBuilder for ToOneRelationshipBuilder {
    fn config(&self) -> &PropertyConfig {
        &self.inner.config
    }

    fn config_mut(&mut self) -> &mut PropertyConfig {
        &mut self.inner.config
    }

    fn build(&self) -> Property {
        self.inner.build()
    }
}

/// Builder for to-many relationships
#[derive(Debug, Clone)]
pub struct ToManyRelationshipBuilder {
    inner: RelationshipBuilder,
}

impl ToManyRelationshipBuilder {
    pub fn new(path: &RelationshipPath, default_include: bool) -> ApiResult<Self> {
        Ok(Self {
            inner: RelationshipBuilder::new(path, Cardinality::ToMany, default_include)?,
        })
    }

    /// Allow replacing the related collection of existing entities
    ///
    /// `entity_conditions` gate the owning entity, `relationship_conditions`
    /// gate every entity of the replacement collection, `callback` receives
    /// the owning entity and the full replacement and gets the final say.
    pub fn updatable(
        mut self,
        entity_conditions: Vec<Condition>,
        relationship_conditions: Vec<Condition>,
        callback: Option<ToManyUpdateCallback>,
    ) -> Self {
        let behavior = ToManyRelationshipSetBehavior::new(
            self.property_name(),
            entity_conditions,
            relationship_conditions,
            callback,
        );
        self.inner.config.behaviors.push(Arc::new(behavior));
        self
    }
}

impl PropertyConfigBuilder for ToManyRelationshipBuilder {
    fn config(&self) -> &PropertyConfig {
        &self.inner.config
    }

    fn config_mut(&mut self) -> &mut PropertyConfig {
        &mut self.inner.config
    }

    fn build(&self) -> Property {
        self.inner.build()
    }
}

// ============================================================================
// Tests
// ============================================================================
