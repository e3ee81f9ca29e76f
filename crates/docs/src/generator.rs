//! OpenAPI document derivation
//!
//! Every registered resource type gets a schema in the [`SchemaStore`].
//! Types exposed as primary resources additionally get a tag and a
//! list/entity route pair. Relationship properties reference the schema of
//! their target; attribute schemas come from the [`AttributeTypeResolver`].

use crate::collaborators::{AttributeTypeResolver, RouteGenerator, Translator};
use crate::config::DocsConfig;
use crate::schema_store::SchemaStore;
use restype_core::PropertyPath;
use restype_schema::{ResourceType, TypeRegistry};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Placeholder schema of attributes whose type could not be determined
pub const UNDETERMINED_TYPE: &str = "undetermined";

const INCLUDE_SCHEMA: &str = "parameters:include";
const EXCLUDE_SCHEMA: &str = "parameters:exclude";
const PAGE_NUMBER_SCHEMA: &str = "parameters:page_number";
const PAGE_SIZE_SCHEMA: &str = "parameters:page_size";

pub struct OpenApiSchemaGenerator {
    registry: Arc<dyn TypeRegistry>,
    attribute_types: Arc<dyn AttributeTypeResolver>,
    routes: Arc<dyn RouteGenerator>,
    translator: Arc<dyn Translator>,
    config: DocsConfig,
    store: SchemaStore,
}

impl OpenApiSchemaGenerator {
    pub fn new(
        registry: Arc<dyn TypeRegistry>,
        attribute_types: Arc<dyn AttributeTypeResolver>,
        routes: Arc<dyn RouteGenerator>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            registry,
            attribute_types,
            routes,
            translator,
            config: DocsConfig::default(),
            store: SchemaStore::new(),
        }
    }

    pub fn with_config(mut self, config: DocsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    /// Schemas created so far; they are reused by later calls
    pub fn schema_store(&self) -> &SchemaStore {
        &self.store
    }

    /// Build the complete OpenAPI document
    pub fn open_api_specification(&mut self) -> Value {
        let resource_types = self.registry.resource_types();
        tracing::debug!(count = resource_types.len(), "generating OpenAPI document");

        for resource_type in &resource_types {
            self.resource_schema_reference(resource_type.as_ref());
        }

        let mut tags = Vec::new();
        let mut paths = Map::new();
        for resource_type in resource_types
            .iter()
            .filter(|t| t.is_exposed_as_primary_resource())
        {
            let type_name = resource_type.type_name();
            let tag = self
                .translator
                .trans("resource.section", &[("type", type_name)]);
            tags.push(json!({ "name": tag }));

            let list_item = self.list_path_item(resource_type.as_ref(), &tag);
            paths.insert(self.routes.resource_list_url(type_name), list_item);
            let entity_item = self.entity_path_item(resource_type.as_ref(), &tag);
            paths.insert(self.routes.resource_entity_url(type_name), entity_item);
        }

        json!({
            "openapi": self.config.openapi_version,
            "info": {
                "title": self.translator.trans("title", &[]),
                "description": self.translator.trans("description", &[]),
                "version": self.config.api_version,
            },
            "tags": tags,
            "paths": paths,
            "components": { "schemas": self.store.all() },
        })
    }

    /// Reference to the schema of `resource_type`, creating it if missing
    pub fn resource_schema_reference(&mut self, resource_type: &dyn ResourceType) -> Value {
        let type_name = resource_type.type_name();
        if !self.store.has(type_name) {
            let schema = self.resource_schema(resource_type);
            self.store.set(type_name, schema);
        }
        self.store.reference_object(type_name)
    }

    fn resource_schema(&self, resource_type: &dyn ResourceType) -> Value {
        let mut properties = Map::new();
        let Some(readable) = resource_type.as_readable() else {
            return json!({ "type": "object", "properties": properties });
        };

        let aliases = resource_type.aliases();
        for (name, target) in readable.readable_properties() {
            let schema = match target {
                Some(target) => {
                    if self.registry.resource_type_or_none(&target).is_none() {
                        tracing::debug!(
                            type_name = resource_type.type_name(),
                            property = %name,
                            target = %target,
                            "relationship target is not a resource type, omitting"
                        );
                        continue;
                    }
                    self.store.reference_object(&target)
                }
                None => self.attribute_schema(resource_type, &name, aliases.get(&name)),
            };
            properties.insert(name, schema);
        }

        json!({ "type": "object", "properties": properties })
    }

    fn attribute_schema(
        &self,
        resource_type: &dyn ResourceType,
        name: &str,
        alias: Option<&PropertyPath>,
    ) -> Value {
        let resolved_name = match alias {
            Some(path) => {
                if path.len() > 1 {
                    tracing::warn!(
                        type_name = resource_type.type_name(),
                        property = name,
                        alias = %path,
                        "multi-segment alias, resolving the attribute type by its first segment"
                    );
                }
                path.segments().first().map(String::as_str).unwrap_or(name)
            }
            None => name,
        };

        match self.attribute_types.property_type(resource_type, resolved_name) {
            Ok(schema) => schema,
            Err(error) => {
                tracing::warn!(
                    type_name = resource_type.type_name(),
                    property = name,
                    %error,
                    "could not determine attribute type"
                );
                json!({ "type": UNDETERMINED_TYPE })
            }
        }
    }

    fn list_path_item(&mut self, resource_type: &dyn ResourceType, tag: &str) -> Value {
        let type_name = resource_type.type_name();
        let mut parameters = vec![self.include_parameter(), self.exclude_parameter()];
        parameters.extend(self.pagination_parameters());
        if resource_type
            .as_filterable()
            .is_some_and(|filterable| !filterable.filterable_properties().is_empty())
        {
            parameters.push(self.filter_parameter());
        }

        let reference = self.resource_schema_reference(resource_type);
        let data = json!({ "type": "array", "items": reference });
        json!({
            "get": {
                "tags": [tag],
                "description": self.translator.trans("method.list.description", &[("type", type_name)]),
                "parameters": parameters,
                "responses": { "200": self.response(data) },
            }
        })
    }

    fn entity_path_item(&mut self, resource_type: &dyn ResourceType, tag: &str) -> Value {
        let type_name = resource_type.type_name();
        let parameters = vec![
            json!({
                "name": "resourceId",
                "in": "path",
                "required": true,
                "description": self.translator.trans("resource.id", &[]),
                "schema": { "type": "string" },
            }),
            self.include_parameter(),
            self.exclude_parameter(),
        ];

        let data = self.resource_schema_reference(resource_type);
        json!({
            "get": {
                "tags": [tag],
                "description": self.translator.trans("method.get.description", &[("type", type_name)]),
                "parameters": parameters,
                "responses": { "200": self.response(data) },
            }
        })
    }

    fn response(&self, data: Value) -> Value {
        json!({
            "description": "OK",
            "content": {
                self.config.media_type.as_str(): {
                    "schema": {
                        "type": "object",
                        "properties": {
                            "jsonapi": {
                                "type": "object",
                                "properties": {
                                    "version": { "type": "string", "example": self.config.jsonapi_version },
                                },
                            },
                            "data": data,
                        },
                    },
                },
            },
        })
    }

    fn include_parameter(&mut self) -> Value {
        let description = self.translator.trans("parameter.query.include", &[]);
        self.store.find_or_create(INCLUDE_SCHEMA, relationship_list_schema);
        json!({
            "name": "include",
            "in": "query",
            "description": description,
            "schema": self.store.reference_object(INCLUDE_SCHEMA),
        })
    }

    fn exclude_parameter(&mut self) -> Value {
        let description = self.translator.trans("parameter.query.exclude", &[]);
        self.store.find_or_create(EXCLUDE_SCHEMA, relationship_list_schema);
        json!({
            "name": "exclude",
            "in": "query",
            "description": description,
            "schema": self.store.reference_object(EXCLUDE_SCHEMA),
        })
    }

    fn pagination_parameters(&mut self) -> [Value; 2] {
        let number_description = self.translator.trans("parameter.query.page_number", &[]);
        let size_description = self.translator.trans("parameter.query.page_size", &[]);
        let default_page_size = self.config.default_page_size;
        self.store.find_or_create(PAGE_NUMBER_SCHEMA, || {
            json!({ "type": "integer", "minimum": 1, "default": 1 })
        });
        self.store.find_or_create(PAGE_SIZE_SCHEMA, || {
            json!({ "type": "integer", "minimum": 1, "default": default_page_size })
        });

        [
            json!({
                "name": "page[number]",
                "in": "query",
                "description": number_description,
                "schema": self.store.reference_object(PAGE_NUMBER_SCHEMA),
            }),
            json!({
                "name": "page[size]",
                "in": "query",
                "description": size_description,
                "schema": self.store.reference_object(PAGE_SIZE_SCHEMA),
            }),
        ]
    }

    fn filter_parameter(&self) -> Value {
        json!({
            "name": "filter",
            "in": "query",
            "description": self.translator.trans("parameter.query.filter", &[]),
            "style": "deepObject",
            "explode": true,
            "schema": { "type": "object" },
        })
    }
}

/// Comma separated list of dot separated relationship paths
fn relationship_list_schema() -> Value {
    json!({
        "type": "string",
        "pattern": r"^[\w-]+(\.[\w-]+)*(,[\w-]+(\.[\w-]+)*)*$",
    })
}

// ============================================================================
// Tests
// ============================================================================
