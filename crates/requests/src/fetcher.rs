//! Entity fetching
//!
//! The entity fetcher turns a `(resource type, id)` pair into a live entity.
//! Its not-found behavior belongs to the implementation; the in-memory
//! fetcher below fails with [`ApiError::EntityNotFound`].

use restype_core::{ApiError, ApiResult, Entity, EntityRef};
use restype_schema::ResourceType;
use std::collections::HashMap;
use std::sync::Arc;

/// Loads entities referenced by relationship linkages
pub trait EntityFetcher: Send + Sync {
    fn get_entity_by_type_identifier(
        &self,
        resource_type: &dyn ResourceType,
        id: &str,
    ) -> ApiResult<EntityRef>;
}

/// Fetcher over a fixed set of entities, keyed by type name and id
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityFetcher {
    entities: HashMap<(String, String), EntityRef>,
}

impl InMemoryEntityFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entity, replacing any previous one with the same key
    pub fn insert(
        &mut self,
        type_identifier: impl Into<String>,
        id: impl Into<String>,
        entity: impl Entity,
    ) {
        self.insert_shared(type_identifier, id, Arc::new(entity));
    }

    pub fn insert_shared(
        &mut self,
        type_identifier: impl Into<String>,
        id: impl Into<String>,
        entity: EntityRef,
    ) {
        self.entities
            .insert((type_identifier.into(), id.into()), entity);
    }

    /// Builder-style variant of [`InMemoryEntityFetcher::insert`]
    pub fn with_entity(
        mut self,
        type_identifier: impl Into<String>,
        id: impl Into<String>,
        entity: impl Entity,
    ) -> Self {
        self.insert(type_identifier, id, entity);
        self
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityFetcher for InMemoryEntityFetcher {
    fn get_entity_by_type_identifier(
        &self,
        resource_type: &dyn ResourceType,
        id: &str,
    ) -> ApiResult<EntityRef> {
        let type_identifier = resource_type.type_name();
        self.entities
            .get(&(type_identifier.to_string(), id.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::entity_not_found(type_identifier, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restype_schema::ResourceTypeDefinition;

    #[derive(Debug, PartialEq)]
    struct Author {
        name: &'static str,
    }

    #[test]
    fn test_fetch_stored_entity() {
        let author_type = ResourceTypeDefinition::builder("author").build().unwrap();
        let fetcher = InMemoryEntityFetcher::new().with_entity("author", "5", Author { name: "Le Guin" });

        let entity = fetcher
            .get_entity_by_type_identifier(&author_type, "5")
            .unwrap();
        assert_eq!(
            entity.downcast_ref::<Author>(),
            Some(&Author { name: "Le Guin" })
        );
    }

    #[test]
    fn test_missing_entity_is_not_found() {
        let author_type = ResourceTypeDefinition::builder("author").build().unwrap();
        let fetcher = InMemoryEntityFetcher::new();
        assert!(fetcher.is_empty());

        let err = fetcher
            .get_entity_by_type_identifier(&author_type, "404")
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::EntityNotFound { ref type_identifier, ref id }
                if type_identifier == "author" && id == "404"
        ));
    }
}
