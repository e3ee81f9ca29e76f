//! # restype Schema
//!
//! This crate describes what a resource type exposes. It contains the
//! property model and the type catalog that requests are resolved against.
//!
//! ## Core Concepts
//!
//! - **Property descriptor**: immutable capability flags of one property
//!   (readable, filterable, sortable, initializable, ...)
//! - **Relationship descriptor**: a property descriptor plus cardinality,
//!   target type and default-include flag
//! - **Builder**: a mutable accumulator producing descriptors
//! - **Behavior**: a pluggable construction or update unit bound to a property
//! - **Resource type**: a named set of properties with selectively
//!   implemented capabilities
//! - **Type registry**: identifier lookup gated by kind and exposure
//!

// Module declarations
pub mod behavior;
pub mod builder;
pub mod property;
pub mod registry;
pub mod resource_type;

// Re-export commonly used types at crate root
pub use behavior::{
    BehaviorKind, BehaviorRef, BehaviorSet, ConstructorParameterBehavior, PropertyBehavior,
    PropertySetBehavior, ToManyRelationshipSetBehavior, ToManyUpdateCallback,
    ToOneRelationshipSetBehavior, ToOneUpdateCallback,
};
pub use builder::{
    AttributeBuilder, PropertyConfig, PropertyConfigBuilder, ReadOptions, RelationshipBuilder,
    RelationshipPath, ToManyRelationshipBuilder, ToOneRelationshipBuilder,
};
pub use property::{Property, PropertyDescriptor, ReadTransform, RelationshipDescriptor};
pub use registry::{InMemoryTypeRegistry, RegisteredType, TypeRegistry, TypeRequirement};
pub use resource_type::{
    CreatableType, FilterableType, PropertyTargets, ReadableType, ResourceType,
    ResourceTypeBuilder, ResourceTypeDefinition, SortableType, UpdatableType,
};

// Re-export core types that are commonly used with the schema
pub use restype_core::{
    ApiError, ApiResult, Cardinality, Condition, PropertyPath, TypeLookupFailure,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for defining resource types
pub mod prelude {
    pub use crate::{
        // Builders
        AttributeBuilder,
        // Re-exported from core
        ApiError,
        ApiResult,
        Cardinality,
        Condition,
        // Registry
        InMemoryTypeRegistry,
        PropertyConfigBuilder,
        PropertyPath,
        ReadOptions,
        RelationshipPath,
        // Resource types
        ResourceType,
        ResourceTypeDefinition,
        ToManyRelationshipBuilder,
        ToOneRelationshipBuilder,
        TypeRegistry,
        TypeRequirement,
    };
}
