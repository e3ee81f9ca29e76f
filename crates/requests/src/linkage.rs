//! Relationship entry parsing
//!
//! Turns one raw relationship entry (`{"data": ...}`) of a request into a
//! [`ResourceLinkage`]. The linkage variant is decided here and nowhere else:
//!
//! | `data` member            | linkage               |
//! |--------------------------|-----------------------|
//! | missing or `null`        | `ToOne(None)`         |
//! | identifier object        | `ToOne(Some(..))`     |
//! | list of identifier objects | `ToMany(..)`        |
//!
//! Anything else fails with [`ApiError::UnsupportedLinkage`].

use restype_core::{ApiError, ApiResult, ResourceIdentifierObject, ResourceLinkage};
use serde_json::{Map, Value};

/// Parse the raw relationship entry for `property`
pub fn parse_relationship_entry(property: &str, raw: &Value) -> ApiResult<ResourceLinkage> {
    let entry = raw.as_object().ok_or_else(|| {
        ApiError::unsupported_linkage(property, "relationship entry must be an object")
    })?;

    match entry.get("data") {
        None | Some(Value::Null) => Ok(ResourceLinkage::ToOne(None)),
        Some(Value::Object(data)) => {
            parse_identifier(property, data).map(|id| ResourceLinkage::ToOne(Some(id)))
        }
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(data) => parse_identifier(property, data),
                _ => Err(ApiError::unsupported_linkage(
                    property,
                    format!("element {index} of the linkage list is not an identifier object"),
                )),
            })
            .collect::<ApiResult<Vec<_>>>()
            .map(ResourceLinkage::ToMany),
        Some(_) => Err(ApiError::unsupported_linkage(
            property,
            "data must be null, an identifier object or a list of identifier objects",
        )),
    }
}

fn parse_identifier(property: &str, data: &Map<String, Value>) -> ApiResult<ResourceIdentifierObject> {
    let type_identifier = match data.get("type") {
        Some(Value::String(type_identifier)) if !type_identifier.is_empty() => type_identifier,
        _ => {
            return Err(ApiError::unsupported_linkage(
                property,
                "identifier object requires a non-empty string 'type'",
            ));
        }
    };
    let id = match data.get("id") {
        Some(Value::String(id)) => id,
        _ => {
            return Err(ApiError::unsupported_linkage(
                property,
                "identifier object requires a string 'id'",
            ));
        }
    };

    ResourceIdentifierObject::new(type_identifier.as_str(), id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn identifier(type_identifier: &str, id: &str) -> ResourceIdentifierObject {
        ResourceIdentifierObject::new(type_identifier, id).unwrap()
    }

    #[test]
    fn test_null_and_missing_data_clear_to_one() {
        assert_eq!(
            parse_relationship_entry("author", &json!({"data": null})).unwrap(),
            ResourceLinkage::ToOne(None)
        );
        assert_eq!(
            parse_relationship_entry("author", &json!({})).unwrap(),
            ResourceLinkage::ToOne(None)
        );
    }

    #[test]
    fn test_single_identifier_is_to_one() {
        let linkage =
            parse_relationship_entry("author", &json!({"data": {"type": "author", "id": "5"}}))
                .unwrap();
        assert_eq!(
            linkage,
            ResourceLinkage::ToOne(Some(identifier("author", "5")))
        );
    }

    #[test]
    fn test_list_is_to_many_in_order() {
        let linkage = parse_relationship_entry(
            "books",
            &json!({"data": [
                {"type": "book", "id": "2"},
                {"type": "book", "id": "1"},
                {"type": "book", "id": "2"}
            ]}),
        )
        .unwrap();
        assert_eq!(
            linkage,
            ResourceLinkage::ToMany(vec![
                identifier("book", "2"),
                identifier("book", "1"),
                identifier("book", "2"),
            ])
        );
    }

    #[test]
    fn test_empty_list_is_valid_to_many() {
        let linkage = parse_relationship_entry("books", &json!({"data": []})).unwrap();
        assert_eq!(linkage, ResourceLinkage::ToMany(vec![]));
    }

    #[test]
    fn test_meta_and_links_are_ignored() {
        let linkage = parse_relationship_entry(
            "author",
            &json!({"data": {"type": "author", "id": "5", "meta": {"x": 1}}, "links": {}}),
        )
        .unwrap();
        assert_eq!(linkage.cardinality(), restype_core::Cardinality::ToOne);
    }

    #[test]
    fn test_unsupported_shapes() {
        let cases = [
            json!("author:5"),
            json!({"data": "5"}),
            json!({"data": 5}),
            json!({"data": true}),
            json!({"data": {"id": "5"}}),
            json!({"data": {"type": "", "id": "5"}}),
            json!({"data": {"type": "author", "id": 5}}),
            json!({"data": {"type": "author"}}),
            json!({"data": [{"type": "book", "id": "1"}, null]}),
            json!({"data": [["book", "1"]]}),
        ];
        for raw in cases {
            let err = parse_relationship_entry("author", &raw).unwrap_err();
            assert!(
                matches!(err, ApiError::UnsupportedLinkage { ref property, .. } if property == "author"),
                "{raw} produced {err:?}"
            );
        }
    }
}
