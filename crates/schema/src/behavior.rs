//! Property behaviors
//!
//! Behaviors govern how a property takes part in entity construction and
//! updates. They are registered while a resource type is defined and invoked
//! later by the request pipeline; nothing in this workspace runs them on its
//! own.

use restype_core::{Condition, Entity, EntityRef};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// BehaviorKind
// ============================================================================

/// When a behavior runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    /// Supplies a value while the entity is instantiated
    Constructor,
    /// Sets a value right after instantiation
    PostConstructor,
    /// Sets a value on an existing entity
    Update,
}

// ============================================================================
// PropertyBehavior
// ============================================================================

/// A pluggable unit bound to one property
pub trait PropertyBehavior: fmt::Debug + Send + Sync {
    /// Short name identifying the behavior implementation
    fn name(&self) -> &str;

    fn kind(&self) -> BehaviorKind;

    /// Name of the property the behavior is bound to
    fn property_name(&self) -> &str;

    /// Conditions the owning entity must satisfy for the behavior to apply
    fn entity_conditions(&self) -> &[Condition] {
        &[]
    }

    /// Constructor argument receiving the value, for constructor behaviors
    fn constructor_argument(&self) -> Option<&str> {
        None
    }
}

/// Shared handle to a registered behavior
pub type BehaviorRef = Arc<dyn PropertyBehavior>;

// ============================================================================
// Concrete Behaviors
// ============================================================================

/// Passes the request value to the entity constructor
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorParameterBehavior {
    property: String,
    argument_name: String,
    required: bool,
}

impl ConstructorParameterBehavior {
    pub fn new(property: impl Into<String>, required: bool) -> Self {
        let property = property.into();
        Self {
            argument_name: property.clone(),
            property,
            required,
        }
    }

    /// Use a constructor argument name different from the property name
    pub fn with_argument_name(mut self, argument_name: impl Into<String>) -> Self {
        self.argument_name = argument_name.into();
        self
    }

    pub fn argument_name(&self) -> &str {
        &self.argument_name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

impl PropertyBehavior for ConstructorParameterBehavior {
    fn name(&self) -> &str {
        "constructor-parameter"
    }

    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Constructor
    }

    fn property_name(&self) -> &str {
        &self.property
    }

    fn constructor_argument(&self) -> Option<&str> {
        Some(&self.argument_name)
    }
}

/// Writes an attribute or to-one value through the entity's setter
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySetBehavior {
    property: String,
    kind: BehaviorKind,
    entity_conditions: Vec<Condition>,
    optional: bool,
}

impl PropertySetBehavior {
    /// Setter used while updating an existing entity
    pub fn update(property: impl Into<String>, entity_conditions: Vec<Condition>) -> Self {
        Self {
            property: property.into(),
            kind: BehaviorKind::Update,
            entity_conditions,
            optional: true,
        }
    }

    /// Setter used right after instantiation
    pub fn post_constructor(property: impl Into<String>, optional: bool) -> Self {
        Self {
            property: property.into(),
            kind: BehaviorKind::PostConstructor,
            entity_conditions: Vec::new(),
            optional,
        }
    }

    /// Whether the request may omit the value
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl PropertyBehavior for PropertySetBehavior {
    fn name(&self) -> &str {
        "property-set"
    }

    fn kind(&self) -> BehaviorKind {
        self.kind
    }

    fn property_name(&self) -> &str {
        &self.property
    }

    fn entity_conditions(&self) -> &[Condition] {
        &self.entity_conditions
    }
}

/// Custom acceptance check for a to-one update: owning entity, new target
pub type ToOneUpdateCallback = Arc<dyn Fn(&dyn Entity, Option<&EntityRef>) -> bool + Send + Sync>;

/// Custom acceptance check for a to-many update: owning entity, full replacement
pub type ToManyUpdateCallback = Arc<dyn Fn(&dyn Entity, &[EntityRef]) -> bool + Send + Sync>;

/// Update of a to-one relationship, gated by conditions on both sides
#[derive(Clone)]
pub struct ToOneRelationshipSetBehavior {
    property: String,
    entity_conditions: Vec<Condition>,
    relationship_conditions: Vec<Condition>,
    callback: Option<ToOneUpdateCallback>,
}

impl ToOneRelationshipSetBehavior {
    pub fn new(
        property: impl Into<String>,
        entity_conditions: Vec<Condition>,
        relationship_conditions: Vec<Condition>,
        callback: Option<ToOneUpdateCallback>,
    ) -> Self {
        Self {
            property: property.into(),
            entity_conditions,
            relationship_conditions,
            callback,
        }
    }

    /// Conditions the new related entity must satisfy
    pub fn relationship_conditions(&self) -> &[Condition] {
        &self.relationship_conditions
    }

    /// Run the custom callback; updates without one are accepted
    pub fn accepts(&self, entity: &dyn Entity, related: Option<&EntityRef>) -> bool {
        self.callback
            .as_ref()
            .is_none_or(|callback| callback(entity, related))
    }
}

impl fmt::Debug for ToOneRelationshipSetBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToOneRelationshipSetBehavior")
            .field("property", &self.property)
            .field("entity_conditions", &self.entity_conditions)
            .field("relationship_conditions", &self.relationship_conditions)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl PropertyBehavior for ToOneRelationshipSetBehavior {
    fn name(&self) -> &str {
        "to-one-relationship-set"
    }

    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Update
    }

    fn property_name(&self) -> &str {
        &self.property
    }

    fn entity_conditions(&self) -> &[Condition] {
        &self.entity_conditions
    }
}

/// Update of a to-many relationship, gated by conditions on both sides
#[derive(Clone)]
pub struct ToManyRelationshipSetBehavior {
    property: String,
    entity_conditions: Vec<Condition>,
    relationship_conditions: Vec<Condition>,
    callback: Option<ToManyUpdateCallback>,
}

impl ToManyRelationshipSetBehavior {
    pub fn new(
        property: impl Into<String>,
        entity_conditions: Vec<Condition>,
        relationship_conditions: Vec<Condition>,
        callback: Option<ToManyUpdateCallback>,
    ) -> Self {
        Self {
            property: property.into(),
            entity_conditions,
            relationship_conditions,
            callback,
        }
    }

    /// Conditions each entity of the replacement collection must satisfy
    pub fn relationship_conditions(&self) -> &[Condition] {
        &self.relationship_conditions
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Run the custom callback; updates without one are accepted
    pub fn accepts(&self, entity: &dyn Entity, related: &[EntityRef]) -> bool {
        self.callback
            .as_ref()
            .is_none_or(|callback| callback(entity, related))
    }
}

impl fmt::Debug for ToManyRelationshipSetBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToManyRelationshipSetBehavior")
            .field("property", &self.property)
            .field("entity_conditions", &self.entity_conditions)
            .field("relationship_conditions", &self.relationship_conditions)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl PropertyBehavior for ToManyRelationshipSetBehavior {
    fn name(&self) -> &str {
        "to-many-relationship-set"
    }

    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Update
    }

    fn property_name(&self) -> &str {
        &self.property
    }

    fn entity_conditions(&self) -> &[Condition] {
        &self.entity_conditions
    }
}

// ============================================================================
// BehaviorSet
// ============================================================================

/// Ordered behavior lists of one property, one list per [`BehaviorKind`]
#[derive(Debug, Clone, Default)]
pub struct BehaviorSet {
    constructor: Vec<BehaviorRef>,
    post_constructor: Vec<BehaviorRef>,
    update: Vec<BehaviorRef>,
}

impl BehaviorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a behavior to the list matching its kind
    pub fn push(&mut self, behavior: BehaviorRef) {
        match behavior.kind() {
            BehaviorKind::Constructor => self.constructor.push(behavior),
            BehaviorKind::PostConstructor => self.post_constructor.push(behavior),
            BehaviorKind::Update => self.update.push(behavior),
        }
    }

    pub fn constructor_behaviors(&self) -> &[BehaviorRef] {
        &self.constructor
    }

    pub fn post_constructor_behaviors(&self) -> &[BehaviorRef] {
        &self.post_constructor
    }

    pub fn update_behaviors(&self) -> &[BehaviorRef] {
        &self.update
    }

    pub fn of_kind(&self, kind: BehaviorKind) -> &[BehaviorRef] {
        match kind {
            BehaviorKind::Constructor => &self.constructor,
            BehaviorKind::PostConstructor => &self.post_constructor,
            BehaviorKind::Update => &self.update,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.constructor.is_empty() && self.post_constructor.is_empty() && self.update.is_empty()
    }

    /// Whether the property can be set while creating an entity
    pub fn is_creatable(&self) -> bool {
        !self.constructor.is_empty() || !self.post_constructor.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use restype_core::PropertyPath;

    #[derive(Debug)]
    struct Author {
        name: String,
    }

    #[derive(Debug)]
    struct Book;

    #[test]
    fn test_behavior_set_keeps_order_per_kind() {
        let mut set = BehaviorSet::new();
        set.push(Arc::new(PropertySetBehavior::update("title", vec![])));
        set.push(Arc::new(ConstructorParameterBehavior::new("title", true)));
        set.push(Arc::new(PropertySetBehavior::update(
            "title",
            vec![Condition::always_true()],
        )));

        assert_eq!(set.constructor_behaviors().len(), 1);
        assert!(set.post_constructor_behaviors().is_empty());
        let updates = set.update_behaviors();
        assert_eq!(updates.len(), 2);
        assert!(updates[0].entity_conditions().is_empty());
        assert_eq!(updates[1].entity_conditions(), &[Condition::always_true()]);
        assert!(set.is_creatable());
    }

    #[test]
    fn test_constructor_parameter_behavior() {
        let behavior = ConstructorParameterBehavior::new("title", true).with_argument_name("name");
        assert_eq!(behavior.kind(), BehaviorKind::Constructor);
        assert_eq!(behavior.property_name(), "title");
        assert_eq!(behavior.argument_name(), "name");
        assert!(behavior.is_required());
    }

    #[test]
    fn test_to_many_behavior_without_callback_accepts() {
        let behavior = ToManyRelationshipSetBehavior::new(
            "books",
            vec![Condition::always_true()],
            vec![Condition::property_is_null(PropertyPath::parse("deletedAt"))],
            None,
        );
        let author = Author {
            name: "Herbert".to_string(),
        };
        assert!(behavior.accepts(&author, &[]));
        assert_eq!(behavior.relationship_conditions().len(), 1);
        assert!(!behavior.has_callback());
    }

    #[test]
    fn test_to_many_behavior_callback_decides() {
        let callback: ToManyUpdateCallback = Arc::new(|entity, related| {
            let author = entity.downcast_ref::<Author>();
            author.is_some_and(|a| a.name == "Herbert") && related.len() <= 1
        });
        let behavior = ToManyRelationshipSetBehavior::new("books", vec![], vec![], Some(callback));

        let author = Author {
            name: "Herbert".to_string(),
        };
        let one: Vec<EntityRef> = vec![Arc::new(Book)];
        let two: Vec<EntityRef> = vec![Arc::new(Book), Arc::new(Book)];
        assert!(behavior.accepts(&author, &one));
        assert!(!behavior.accepts(&author, &two));
    }

    #[test]
    fn test_to_one_behavior_callback_sees_cleared_value() {
        let callback: ToOneUpdateCallback = Arc::new(|_, related| related.is_some());
        let behavior = ToOneRelationshipSetBehavior::new("author", vec![], vec![], Some(callback));
        let book = Book;
        let author: EntityRef = Arc::new(Author {
            name: "Herbert".to_string(),
        });
        assert!(behavior.accepts(&book, Some(&author)));
        assert!(!behavior.accepts(&book, None));
    }
}
