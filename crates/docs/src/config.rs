//! Documentation generator configuration

/// Settings of the generated OpenAPI document
#[derive(Debug, Clone)]
pub struct DocsConfig {
    /// OpenAPI specification version written to the document
    pub openapi_version: String,

    /// Version of the documented API
    pub api_version: String,

    /// JSON:API version advertised in response schemas
    pub jsonapi_version: String,

    /// Default of the `page[size]` parameter
    pub default_page_size: u32,

    /// Media type of request and response bodies
    pub media_type: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            openapi_version: "3.0.2".to_string(),
            api_version: "2.0".to_string(),
            jsonapi_version: "1.0".to_string(),
            default_page_size: 20,
            media_type: "application/vnd.api+json".to_string(),
        }
    }
}

impl DocsConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let config = DocsConfig::new()
            .with_default_page_size(50)
            .with_api_version("3.1");
        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.api_version, "3.1");
        assert_eq!(config.openapi_version, "3.0.2");
        assert_eq!(config.media_type, "application/vnd.api+json");
    }
}
