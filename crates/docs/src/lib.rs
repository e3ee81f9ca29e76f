//! # restype Docs
//!
//! Derives an OpenAPI document from the registered resource types. Only the
//! readable properties of a type end up in its schema, and only types exposed
//! as primary resources get routes.
//!
//! Attributes whose type cannot be determined are documented as
//! `{"type": "undetermined"}` instead of failing the whole document.

pub mod collaborators;
pub mod config;
pub mod generator;
pub mod schema_store;

pub use collaborators::{
    AttributeTypeResolver, MessageTable, PrefixRouteGenerator, RouteGenerator,
    StaticAttributeTypes, Translator,
};
pub use config::DocsConfig;
pub use generator::{OpenApiSchemaGenerator, UNDETERMINED_TYPE};
pub use schema_store::{SchemaStore, SCHEMA_REFERENCE_PREFIX};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
