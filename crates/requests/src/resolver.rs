//! Linkage resolution
//!
//! Resolves a [`ResourceLinkage`] to live entities. Every referenced type
//! is checked against the type registry before the first entity is fetched,
//! so a to-many linkage with one unusable type fetches nothing at all.

use crate::fetcher::EntityFetcher;
use restype_core::{
    ApiError, ApiResult, Cardinality, EntityRef, PropertyValue, ResourceIdentifierObject,
    ResourceLinkage,
};
use restype_schema::{ResourceType, TypeRegistry, TypeRequirement};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves linkages through a type registry and an entity fetcher
pub struct LinkageResolver<'a> {
    registry: &'a dyn TypeRegistry,
    fetcher: &'a dyn EntityFetcher,
}

impl<'a> LinkageResolver<'a> {
    pub fn new(registry: &'a dyn TypeRegistry, fetcher: &'a dyn EntityFetcher) -> Self {
        Self { registry, fetcher }
    }

    /// Resolve the linkage of `property`
    ///
    /// When `expected` is given the linkage must have that cardinality;
    /// a mismatch fails with [`ApiError::UnsupportedLinkage`].
    pub fn resolve(
        &self,
        property: &str,
        linkage: &ResourceLinkage,
        expected: Option<Cardinality>,
    ) -> ApiResult<PropertyValue> {
        if let Some(expected) = expected.filter(|e| *e != linkage.cardinality()) {
            return Err(ApiError::unsupported_linkage(
                property,
                format!(
                    "expected {expected} linkage, got {}",
                    linkage.cardinality()
                ),
            ));
        }

        match linkage {
            ResourceLinkage::ToOne(None) => {
                tracing::trace!(property, "to-one linkage cleared, nothing to fetch");
                Ok(PropertyValue::ToOne(None))
            }
            ResourceLinkage::ToOne(Some(identifier)) => {
                let mut entities = self.resolve_identifiers(std::slice::from_ref(identifier))?;
                Ok(PropertyValue::ToOne(entities.pop()))
            }
            ResourceLinkage::ToMany(identifiers) => {
                self.resolve_identifiers(identifiers).map(PropertyValue::ToMany)
            }
        }
    }

    /// Resolve identifiers to entities, preserving input order
    pub fn resolve_identifiers(
        &self,
        identifiers: &[ResourceIdentifierObject],
    ) -> ApiResult<Vec<EntityRef>> {
        let mut cache: HashMap<&str, Arc<dyn ResourceType>> = HashMap::new();
        let mut resource_types = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let type_identifier = identifier.type_identifier();
            let resource_type = match cache.get(type_identifier) {
                Some(resource_type) => Arc::clone(resource_type),
                None => {
                    let resource_type = self
                        .registry
                        .request_type(type_identifier, TypeRequirement::ExposedAsRelationship)?;
                    cache.insert(type_identifier, Arc::clone(&resource_type));
                    resource_type
                }
            };
            resource_types.push(resource_type);
        }

        identifiers
            .iter()
            .zip(&resource_types)
            .map(|(identifier, resource_type)| {
                tracing::trace!(%identifier, "fetching related entity");
                self.fetcher
                    .get_entity_by_type_identifier(resource_type.as_ref(), identifier.id())
            })
            .collect()
    }
}
