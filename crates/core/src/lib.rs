//! # restype Core
//!
//! Core value objects, traits and error handling for restype.
//!
//! This crate provides the foundational building blocks shared by the
//! schema, request and documentation crates, including:
//!
//! - **Types**: resource identifier objects, resource linkages, property
//!   paths, opaque conditions and resolved property values
//! - **Traits**: `Validatable` and `Named`
//! - **Errors**: unified error handling with `ApiError` and `ApiResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ApiError, ApiResult, TypeLookupFailure};
pub use traits::{Named, Validatable, duplicate_names, ensure_unique_names};
pub use types::{
    Cardinality, Condition, Entity, EntityRef, PropertyPath, PropertyValue, PropertyValueMap,
    ResourceIdentifierObject, ResourceLinkage,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
