//! Resource types and their capabilities
//!
//! A resource type implements the [`ResourceType`] base trait and opts into
//! capabilities selectively. Callers ask for a capability through the
//! `as_*` accessors instead of casting.

use crate::behavior::BehaviorRef;
use crate::property::{Property, RelationshipDescriptor};
use restype_core::{
    ApiError, ApiResult, Condition, Named, PropertyPath, Validatable, ensure_unique_names,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Property name to relationship target type (`None` for attributes)
pub type PropertyTargets = BTreeMap<String, Option<String>>;

// ============================================================================
// Capability Traits
// ============================================================================

/// Properties exposed in responses
pub trait ReadableType {
    fn readable_properties(&self) -> PropertyTargets;

    /// Properties included when no field selection is requested
    fn default_fields(&self) -> BTreeSet<String>;

    /// Relationships included when no include directive is requested
    fn default_includes(&self) -> BTreeSet<String>;
}

/// Properties usable in query conditions
pub trait FilterableType {
    fn filterable_properties(&self) -> PropertyTargets;
}

/// Properties usable for ordering
pub trait SortableType {
    fn sortable_properties(&self) -> PropertyTargets;
}

/// Types whose entities can be created through the API
pub trait CreatableType {
    /// Properties settable during creation, in or right after the constructor
    fn initializable_properties(&self) -> PropertyTargets;

    /// Properties that must be present in a creation request
    fn required_properties(&self) -> BTreeSet<String>;

    /// Constructor behaviors per property, in registration order
    fn constructor_behaviors(&self) -> BTreeMap<String, Vec<BehaviorRef>>;

    /// Behaviors applied right after construction, per property
    fn post_constructor_behaviors(&self) -> BTreeMap<String, Vec<BehaviorRef>>;
}

/// Types whose entities can be updated through the API
pub trait UpdatableType {
    /// Update behaviors per property, in registration order
    fn update_behaviors(&self) -> BTreeMap<String, Vec<BehaviorRef>>;
}

// ============================================================================
// ResourceType Trait
// ============================================================================

/// A named, schema-bearing entity kind exposed through the API
pub trait ResourceType: fmt::Debug + Send + Sync {
    fn type_name(&self) -> &str;

    fn properties(&self) -> &[Property];

    /// Whether the type can be accessed directly (own list and entity routes)
    fn is_exposed_as_primary_resource(&self) -> bool;

    /// Whether relationships of other types may point to this type
    fn is_exposed_as_relationship(&self) -> bool;

    /// Conditions every accessible entity must satisfy
    fn access_conditions(&self) -> &[Condition] {
        &[]
    }

    fn property(&self, name: &str) -> Option<&Property> {
        self.properties().iter().find(|p| p.name_matches(name))
    }

    fn relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.property(name).and_then(Property::as_relationship)
    }

    /// Properties backed by a different entity path
    fn aliases(&self) -> BTreeMap<String, PropertyPath> {
        self.properties()
            .iter()
            .filter_map(|p| {
                let descriptor = p.descriptor();
                descriptor
                    .aliased_path()
                    .map(|path| (descriptor.name().to_string(), path.clone()))
            })
            .collect()
    }

    fn as_readable(&self) -> Option<&dyn ReadableType> {
        None
    }

    fn as_filterable(&self) -> Option<&dyn FilterableType> {
        None
    }

    fn as_sortable(&self) -> Option<&dyn SortableType> {
        None
    }

    fn as_creatable(&self) -> Option<&dyn CreatableType> {
        None
    }

    fn as_updatable(&self) -> Option<&dyn UpdatableType> {
        None
    }
}

fn targets_where(properties: &[Property], keep: impl Fn(&Property) -> bool) -> PropertyTargets {
    properties
        .iter()
        .filter(|p| keep(p))
        .map(|p| {
            (
                p.name().to_string(),
                p.target_type_identifier().map(str::to_string),
            )
        })
        .collect()
}

// ============================================================================
// ResourceTypeDefinition
// ============================================================================

/// A resource type assembled from built properties
///
/// Capabilities follow the properties: the type is readable when any
/// property is readable, creatable when any property is initializable and
/// so on.
#[derive(Debug, Clone)]
pub struct ResourceTypeDefinition {
    type_name: String,
    properties: Vec<Property>,
    exposed_as_primary_resource: bool,
    exposed_as_relationship: bool,
    access_conditions: Vec<Condition>,
}

impl ResourceTypeDefinition {
    pub fn builder(type_name: impl Into<String>) -> ResourceTypeBuilder {
        ResourceTypeBuilder::new(type_name)
    }

    fn any_property(&self, check: impl Fn(&Property) -> bool) -> bool {
        self.properties.iter().any(check)
    }

    fn behaviors_per_property(
        &self,
        select: impl Fn(&Property) -> &[BehaviorRef],
    ) -> BTreeMap<String, Vec<BehaviorRef>> {
        self.properties
            .iter()
            .filter(|p| !select(p).is_empty())
            .map(|p| (p.name().to_string(), select(p).to_vec()))
            .collect()
    }
}

impl Validatable for ResourceTypeDefinition {
    fn validate(&self) -> ApiResult<()> {
        if self.type_name.is_empty() {
            return Err(ApiError::type_validation(
                &self.type_name,
                "type name cannot be empty",
            ));
        }
        ensure_unique_names(&self.type_name, &self.properties)?;
        if let Some(property) = self.properties.iter().find(|p| {
            let d = p.descriptor();
            d.is_required_for_creation() && !d.is_initializable()
        }) {
            return Err(ApiError::type_validation(
                &self.type_name,
                format!(
                    "property '{}' is required for creation but not initializable",
                    property.name()
                ),
            ));
        }
        Ok(())
    }
}

impl Named for ResourceTypeDefinition {
    fn name(&self) -> &str {
        &self.type_name
    }
}

impl ResourceType for ResourceTypeDefinition {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn properties(&self) -> &[Property] {
        &self.properties
    }

    fn is_exposed_as_primary_resource(&self) -> bool {
        self.exposed_as_primary_resource
    }

    fn is_exposed_as_relationship(&self) -> bool {
        self.exposed_as_relationship
    }

    fn access_conditions(&self) -> &[Condition] {
        &self.access_conditions
    }

    fn as_readable(&self) -> Option<&dyn ReadableType> {
        self.any_property(|p| p.descriptor().is_readable())
            .then_some(self as &dyn ReadableType)
    }

    fn as_filterable(&self) -> Option<&dyn FilterableType> {
        self.any_property(|p| p.descriptor().is_filterable())
            .then_some(self as &dyn FilterableType)
    }

    fn as_sortable(&self) -> Option<&dyn SortableType> {
        self.any_property(|p| p.descriptor().is_sortable())
            .then_some(self as &dyn SortableType)
    }

    fn as_creatable(&self) -> Option<&dyn CreatableType> {
        self.any_property(|p| p.descriptor().behaviors().is_creatable())
            .then_some(self as &dyn CreatableType)
    }

    fn as_updatable(&self) -> Option<&dyn UpdatableType> {
        self.any_property(|p| p.descriptor().is_updatable())
            .then_some(self as &dyn UpdatableType)
    }
}

impl ReadableType for ResourceTypeDefinition {
    fn readable_properties(&self) -> PropertyTargets {
        targets_where(&self.properties, |p| p.descriptor().is_readable())
    }

    fn default_fields(&self) -> BTreeSet<String> {
        self.properties
            .iter()
            .filter(|p| p.descriptor().is_readable() && p.descriptor().is_default_field())
            .map(|p| p.name().to_string())
            .collect()
    }

    fn default_includes(&self) -> BTreeSet<String> {
        self.properties
            .iter()
            .filter_map(Property::as_relationship)
            .filter(|r| r.property().is_readable() && r.is_default_include())
            .map(|r| r.property().name().to_string())
            .collect()
    }
}

impl FilterableType for ResourceTypeDefinition {
    fn filterable_properties(&self) -> PropertyTargets {
        targets_where(&self.properties, |p| p.descriptor().is_filterable())
    }
}

impl SortableType for ResourceTypeDefinition {
    fn sortable_properties(&self) -> PropertyTargets {
        targets_where(&self.properties, |p| p.descriptor().is_sortable())
    }
}

impl CreatableType for ResourceTypeDefinition {
    fn initializable_properties(&self) -> PropertyTargets {
        targets_where(&self.properties, |p| p.descriptor().behaviors().is_creatable())
    }

    fn required_properties(&self) -> BTreeSet<String> {
        self.properties
            .iter()
            .filter(|p| p.descriptor().is_required_for_creation())
            .map(|p| p.name().to_string())
            .collect()
    }

    fn constructor_behaviors(&self) -> BTreeMap<String, Vec<BehaviorRef>> {
        self.behaviors_per_property(|p| p.descriptor().behaviors().constructor_behaviors())
    }

    fn post_constructor_behaviors(&self) -> BTreeMap<String, Vec<BehaviorRef>> {
        self.behaviors_per_property(|p| p.descriptor().behaviors().post_constructor_behaviors())
    }
}

impl UpdatableType for ResourceTypeDefinition {
    fn update_behaviors(&self) -> BTreeMap<String, Vec<BehaviorRef>> {
        self.behaviors_per_property(|p| p.descriptor().behaviors().update_behaviors())
    }
}

// ============================================================================
// ResourceTypeBuilder
// ============================================================================

/// Assembles a [`ResourceTypeDefinition`] from built properties
#[derive(Debug, Clone)]
pub struct ResourceTypeBuilder {
    type_name: String,
    properties: Vec<Property>,
    exposed_as_primary_resource: bool,
    exposed_as_relationship: bool,
    access_conditions: Vec<Condition>,
}

impl ResourceTypeBuilder {
    /// Types are exposed both ways unless stated otherwise
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
            exposed_as_primary_resource: true,
            exposed_as_relationship: true,
            access_conditions: Vec::new(),
        }
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn exposed_as_primary_resource(mut self, exposed: bool) -> Self {
        self.exposed_as_primary_resource = exposed;
        self
    }

    pub fn exposed_as_relationship(mut self, exposed: bool) -> Self {
        self.exposed_as_relationship = exposed;
        self
    }

    pub fn access_condition(mut self, condition: Condition) -> Self {
        self.access_conditions.push(condition);
        self
    }

    /// Validate and finish the definition
    pub fn build(self) -> ApiResult<ResourceTypeDefinition> {
        let definition = ResourceTypeDefinition {
            type_name: self.type_name,
            properties: self.properties,
            exposed_as_primary_resource: self.exposed_as_primary_resource,
            exposed_as_relationship: self.exposed_as_relationship,
            access_conditions: self.access_conditions,
        };
        definition.validate()?;
        Ok(definition)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{
        AttributeBuilder, PropertyConfigBuilder, ReadOptions, RelationshipPath,
        ToManyRelationshipBuilder, ToOneRelationshipBuilder,
    };
    use pretty_assertions::assert_eq;

    fn book_type() -> ResourceTypeDefinition {
        ResourceTypeDefinition::builder("Book")
            .property(
                AttributeBuilder::named("title")
                    .unwrap()
                    .readable_with(ReadOptions::default_field())
                    .filterable()
                    .sortable()
                    .initializable(true)
                    .build(),
            )
            .property(
                ToOneRelationshipBuilder::new(&RelationshipPath::named("author", "Author"), true)
                    .unwrap()
                    .readable()
                    .filterable()
                    .build(),
            )
            .property(
                ToManyRelationshipBuilder::new(&RelationshipPath::named("tags", "Tag"), false)
                    .unwrap()
                    .readable()
                    .aliased(PropertyPath::parse("labels"))
                    .updatable(vec![], vec![], None)
                    .build(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_readable_capability() {
        let book = book_type();
        let readable = book.as_readable().unwrap();

        let mut expected = PropertyTargets::new();
        expected.insert("author".to_string(), Some("Author".to_string()));
        expected.insert("tags".to_string(), Some("Tag".to_string()));
        expected.insert("title".to_string(), None);
        assert_eq!(readable.readable_properties(), expected);
        assert_eq!(
            readable.default_fields().into_iter().collect::<Vec<_>>(),
            vec!["title".to_string()]
        );
        assert_eq!(
            readable.default_includes().into_iter().collect::<Vec<_>>(),
            vec!["author".to_string()]
        );
    }

    #[test]
    fn test_filterable_and_sortable_capabilities() {
        let book = book_type();
        let filterable = book.as_filterable().unwrap().filterable_properties();
        assert_eq!(filterable.keys().collect::<Vec<_>>(), vec!["author", "title"]);
        let sortable = book.as_sortable().unwrap().sortable_properties();
        assert_eq!(sortable.keys().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_creatable_and_updatable_capabilities() {
        let book = book_type();
        let creatable = book.as_creatable().unwrap();
        assert!(creatable.required_properties().contains("title"));
        assert_eq!(creatable.constructor_behaviors().len(), 1);

        let updates = book.as_updatable().unwrap().update_behaviors();
        assert_eq!(updates.keys().collect::<Vec<_>>(), vec!["tags"]);
    }

    #[test]
    fn test_post_constructor_properties_make_type_creatable() {
        let tag = ResourceTypeDefinition::builder("Tag")
            .property(
                AttributeBuilder::named("label")
                    .unwrap()
                    .settable_after_construction(false)
                    .build(),
            )
            .build()
            .unwrap();

        let creatable = tag.as_creatable().unwrap();
        assert!(creatable.initializable_properties().contains_key("label"));
        assert!(creatable.constructor_behaviors().is_empty());
        assert_eq!(creatable.post_constructor_behaviors()["label"].len(), 1);
        assert!(creatable.required_properties().is_empty());
    }

    #[test]
    fn test_capabilities_are_selective() {
        let tag = ResourceTypeDefinition::builder("Tag")
            .property(AttributeBuilder::named("label").unwrap().readable().build())
            .build()
            .unwrap();
        assert!(tag.as_readable().is_some());
        assert!(tag.as_filterable().is_none());
        assert!(tag.as_sortable().is_none());
        assert!(tag.as_creatable().is_none());
        assert!(tag.as_updatable().is_none());
    }

    #[test]
    fn test_lookup_helpers() {
        let book = book_type();
        assert!(book.property("title").is_some());
        assert!(book.relationship("title").is_none());
        assert_eq!(
            book.relationship("tags").map(|r| r.target_type_identifier()),
            Some("Tag")
        );
        assert_eq!(
            book.aliases().get("tags"),
            Some(&PropertyPath::parse("labels"))
        );
    }

    #[test]
    fn test_duplicate_property_names_rejected() {
        let err = ResourceTypeDefinition::builder("Book")
            .property(AttributeBuilder::named("title").unwrap().build())
            .property(
                ToOneRelationshipBuilder::new(&RelationshipPath::named("title", "Title"), false)
                    .unwrap()
                    .build(),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateProperty { ref property, .. } if property == "title"));
    }

    #[test]
    fn test_empty_type_name_rejected() {
        let result = ResourceTypeDefinition::builder("").build();
        assert!(matches!(result, Err(ApiError::TypeValidation { .. })));
    }

    #[test]
    fn test_exposure_defaults() {
        let tag = ResourceTypeDefinition::builder("Tag")
            .exposed_as_primary_resource(false)
            .access_condition(Condition::always_false())
            .build()
            .unwrap();
        assert!(!tag.is_exposed_as_primary_resource());
        assert!(tag.is_exposed_as_relationship());
        assert_eq!(tag.access_conditions(), &[Condition::always_false()]);
    }
}
