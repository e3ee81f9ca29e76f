//! # restype Requests
//!
//! Request-to-entity resolution for restype.
//!
//! A write request carries attributes and relationships as already
//! deserialized key/value maps. This crate turns them into a single
//! [`PropertyValueMap`](restype_core::PropertyValueMap):
//!
//! 1. each relationship entry is parsed into a typed
//!    [`ResourceLinkage`](restype_core::ResourceLinkage) ([`linkage`])
//! 2. the linkage is resolved to entities through the type registry and an
//!    [`EntityFetcher`] ([`resolver`])
//! 3. resolved relationships and attributes are merged, rejecting shared
//!    keys ([`generator`])
//!
//! Every failure aborts the whole generation; partial results are never
//! returned.
//!

pub mod fetcher;
pub mod generator;
pub mod linkage;
pub mod resolver;

pub use fetcher::{EntityFetcher, InMemoryEntityFetcher};
pub use generator::{PropertyValuesGenerator, RawProperties};
pub use linkage::parse_relationship_entry;
pub use resolver::LinkageResolver;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
