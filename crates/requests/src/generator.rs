//! Property values generation
//!
//! Converts the attributes and relationships of a write request into one
//! flat map from property name to the value that constructor and setter
//! behaviors receive.

use crate::fetcher::EntityFetcher;
use crate::linkage::parse_relationship_entry;
use crate::resolver::LinkageResolver;
use restype_core::{ApiError, ApiResult, Cardinality, PropertyValue, PropertyValueMap};
use restype_schema::{ResourceType, TypeRegistry};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Raw attribute or relationship section of a request
pub type RawProperties = Map<String, Value>;

/// Merges resolved relationships and attributes into one value map
#[derive(Clone)]
pub struct PropertyValuesGenerator {
    fetcher: Arc<dyn EntityFetcher>,
    registry: Arc<dyn TypeRegistry>,
}

impl PropertyValuesGenerator {
    pub fn new(fetcher: Arc<dyn EntityFetcher>, registry: Arc<dyn TypeRegistry>) -> Self {
        Self { fetcher, registry }
    }

    /// Generate the property values of a request
    ///
    /// The cardinality of each relationship follows the shape of its
    /// linkage. Fails without fetching anything when a key is used both as
    /// attribute and as relationship.
    pub fn generate_property_values(
        &self,
        attributes: &RawProperties,
        relationships: &RawProperties,
    ) -> ApiResult<PropertyValueMap> {
        self.generate(attributes, relationships, |_| Ok(None))
    }

    /// Like [`Self::generate_property_values`], with every relationship
    /// checked against the declared relationships of `resource_type`
    pub fn generate_property_values_for_type(
        &self,
        resource_type: &dyn ResourceType,
        attributes: &RawProperties,
        relationships: &RawProperties,
    ) -> ApiResult<PropertyValueMap> {
        self.generate(attributes, relationships, |property| {
            match resource_type.property(property) {
                Some(declared) => declared.cardinality().map(Some).ok_or_else(|| {
                    ApiError::unsupported_linkage(
                        property,
                        format!(
                            "'{}' declares '{property}' as an attribute",
                            resource_type.type_name()
                        ),
                    )
                }),
                None => Err(ApiError::unsupported_linkage(
                    property,
                    format!(
                        "'{}' declares no relationship '{property}'",
                        resource_type.type_name()
                    ),
                )),
            }
        })
    }

    fn generate(
        &self,
        attributes: &RawProperties,
        relationships: &RawProperties,
        expected_cardinality: impl Fn(&str) -> ApiResult<Option<Cardinality>>,
    ) -> ApiResult<PropertyValueMap> {
        ensure_distinct_keys(attributes, relationships)?;

        let resolver = LinkageResolver::new(self.registry.as_ref(), self.fetcher.as_ref());
        let mut relationship_values = PropertyValueMap::new();
        for (property, raw) in relationships {
            let linkage = parse_relationship_entry(property, raw)?;
            let expected = expected_cardinality(property)?;
            tracing::debug!(
                property = %property,
                cardinality = %linkage.cardinality(),
                identifiers = linkage.identifiers().len(),
                "resolving relationship"
            );
            let value = resolver.resolve(property, &linkage, expected)?;
            relationship_values.insert(property.clone(), value);
        }

        let mut values: PropertyValueMap = attributes
            .iter()
            .map(|(name, value)| (name.clone(), PropertyValue::Attribute(value.clone())))
            .collect();
        values.extend(relationship_values);
        tracing::debug!(
            attributes = attributes.len(),
            relationships = relationships.len(),
            "generated property values"
        );

        Ok(values)
    }
}

/// Fail with [`ApiError::DuplicateFieldName`] listing every shared key
fn ensure_distinct_keys(attributes: &RawProperties, relationships: &RawProperties) -> ApiResult<()> {
    let mut names: Vec<String> = relationships
        .keys()
        .filter(|name| attributes.contains_key(name.as_str()))
        .cloned()
        .collect();
    if names.is_empty() {
        return Ok(());
    }
    names.sort();
    Err(ApiError::DuplicateFieldName { names })
}
