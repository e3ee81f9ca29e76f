//! Type registry
//!
//! Maps type identifiers to registered types and gates access to them.
//! A lookup for a relationship target passes three checks in order: the
//! identifier is registered, the registered type is a resource type, and the
//! resource type is exposed for the requested use.

use crate::resource_type::ResourceType;
use restype_core::{ApiError, ApiResult, TypeLookupFailure};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

// ============================================================================
// RegisteredType
// ============================================================================

/// Entry of a type registry
#[derive(Debug, Clone)]
pub enum RegisteredType {
    /// A resource type usable through the API
    Resource(Arc<dyn ResourceType>),
    /// A type known to the backend (e.g. for querying) but not a resource type
    Internal(String),
}

impl RegisteredType {
    pub fn type_name(&self) -> &str {
        match self {
            RegisteredType::Resource(resource_type) => resource_type.type_name(),
            RegisteredType::Internal(name) => name,
        }
    }

    pub fn as_resource(&self) -> Option<&Arc<dyn ResourceType>> {
        match self {
            RegisteredType::Resource(resource_type) => Some(resource_type),
            RegisteredType::Internal(_) => None,
        }
    }
}

// ============================================================================
// TypeRequirement
// ============================================================================

/// Exposure a caller requires from a resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRequirement {
    /// Any resource type, regardless of exposure
    AnyResource,
    /// Target of a relationship
    ExposedAsRelationship,
    /// Directly accessible resource
    ExposedAsPrimaryResource,
}

impl TypeRequirement {
    /// The failure to report when `resource_type` does not meet the requirement
    pub fn check(&self, resource_type: &dyn ResourceType) -> Result<(), TypeLookupFailure> {
        match self {
            TypeRequirement::AnyResource => Ok(()),
            TypeRequirement::ExposedAsRelationship if !resource_type.is_exposed_as_relationship() => {
                Err(TypeLookupFailure::NotExposedAsRelationship)
            }
            TypeRequirement::ExposedAsPrimaryResource
                if !resource_type.is_exposed_as_primary_resource() =>
            {
                Err(TypeLookupFailure::NotExposedAsPrimaryResource)
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// TypeRegistry Trait
// ============================================================================

/// Lookup from type identifiers to registered types
pub trait TypeRegistry: Send + Sync {
    /// The raw entry, without any gating
    fn lookup(&self, identifier: &str) -> Option<RegisteredType>;

    /// All registered identifiers
    fn type_identifiers(&self) -> BTreeSet<String>;

    /// Gated lookup: existence, then kind, then exposure
    fn request_type(
        &self,
        identifier: &str,
        requirement: TypeRequirement,
    ) -> ApiResult<Arc<dyn ResourceType>> {
        let registered = self
            .lookup(identifier)
            .ok_or_else(|| ApiError::unknown_type(identifier, TypeLookupFailure::NotRegistered))?;
        let resource_type = registered
            .as_resource()
            .ok_or_else(|| ApiError::unknown_type(identifier, TypeLookupFailure::NotAResourceType))?;
        requirement
            .check(resource_type.as_ref())
            .map_err(|reason| ApiError::unknown_type(identifier, reason))?;
        Ok(Arc::clone(resource_type))
    }

    /// The resource type registered under `identifier`, if any
    fn resource_type_or_none(&self, identifier: &str) -> Option<Arc<dyn ResourceType>> {
        self.lookup(identifier)
            .and_then(|registered| registered.as_resource().cloned())
    }

    /// All registered resource types, ordered by identifier
    fn resource_types(&self) -> Vec<Arc<dyn ResourceType>> {
        self.type_identifiers()
            .iter()
            .filter_map(|identifier| self.resource_type_or_none(identifier))
            .collect()
    }
}

// ============================================================================
// InMemoryTypeRegistry
// ============================================================================

/// Registry filled once at startup and read concurrently afterwards
#[derive(Debug, Clone, Default)]
pub struct InMemoryTypeRegistry {
    types: BTreeMap<String, RegisteredType>,
}

impl InMemoryTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource type under its own type name
    pub fn register(&mut self, resource_type: Arc<dyn ResourceType>) -> ApiResult<()> {
        let identifier = resource_type.type_name().to_string();
        self.insert(identifier, RegisteredType::Resource(resource_type))
    }

    /// Register a type that is known but not exposed as a resource type
    pub fn register_internal(&mut self, identifier: impl Into<String>) -> ApiResult<()> {
        let identifier = identifier.into();
        self.insert(identifier.clone(), RegisteredType::Internal(identifier))
    }

    /// Builder-style variant of [`InMemoryTypeRegistry::register`]
    pub fn with_type(mut self, resource_type: Arc<dyn ResourceType>) -> ApiResult<Self> {
        self.register(resource_type)?;
        Ok(self)
    }

    fn insert(&mut self, identifier: String, entry: RegisteredType) -> ApiResult<()> {
        if self.types.contains_key(&identifier) {
            return Err(ApiError::DuplicateType(identifier));
        }
        tracing::debug!(type_identifier = %identifier, "registered type");
        self.types.insert(identifier, entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry for InMemoryTypeRegistry {
    fn lookup(&self, identifier: &str) -> Option<RegisteredType> {
        self.types.get(identifier).cloned()
    }

    fn type_identifiers(&self) -> BTreeSet<String> {
        self.types.keys().cloned().collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
