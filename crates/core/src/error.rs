//! Error types for restype
//!
//! This module provides unified error handling across the workspace:
//! request-resolution failures, type-definition failures and the
//! documentation-only degradations.

use thiserror::Error;

// ============================================================================
// TypeLookupFailure
// ============================================================================

/// The gating step at which a type registry lookup failed
///
/// Lookups are gated in a fixed order: existence, then kind, then exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TypeLookupFailure {
    /// No type is registered under the identifier
    #[error("is not registered")]
    NotRegistered,

    /// A type is registered but it is not a resource type
    #[error("is not a resource type")]
    NotAResourceType,

    /// The resource type may not be used as a relationship target
    #[error("is not exposed as a relationship target")]
    NotExposedAsRelationship,

    /// The resource type may not be accessed directly
    #[error("is not exposed as a primary resource")]
    NotExposedAsPrimaryResource,
}

// ============================================================================
// ApiError
// ============================================================================

/// The main error type for restype
#[derive(Debug, Error)]
pub enum ApiError {
    // ========================================================================
    // Request Resolution Errors
    // ========================================================================
    /// A relationship payload has an unrecognised shape or the wrong cardinality
    #[error("Unsupported resource linkage for relationship '{property}': {reason}")]
    UnsupportedLinkage { property: String, reason: String },

    /// A relationship references a type that is absent or not usable as target
    #[error("Type '{type_identifier}' {reason}")]
    UnknownOrUnexposedType {
        type_identifier: String,
        reason: TypeLookupFailure,
    },

    /// The entity fetcher found no entity for the identifier
    #[error("Entity of type '{type_identifier}' with ID '{id}' not found")]
    EntityNotFound { type_identifier: String, id: String },

    /// Attribute and relationship key sets overlap
    #[error("Attribute and relationship keys must be distinct, duplicated: {}", .names.join(", "))]
    DuplicateFieldName { names: Vec<String> },

    // ========================================================================
    // Type Definition Errors
    // ========================================================================
    /// A property path does not yield the names a builder needs
    #[error("Cannot resolve property path '{path}': {message}")]
    PathResolution { path: String, message: String },

    /// Two properties of one resource type share a name
    #[error("Duplicate property name: '{property}' already exists in resource type '{type_name}'")]
    DuplicateProperty { type_name: String, property: String },

    /// Two types were registered under the same identifier
    #[error("Duplicate type identifier: '{0}' is already registered")]
    DuplicateType(String),

    /// A behavior bound to one property was attached to another
    #[error("Behavior '{behavior}' is bound to property '{bound_to}', not '{property}'")]
    MisboundBehavior {
        property: String,
        behavior: String,
        bound_to: String,
    },

    /// A resource type definition is inconsistent
    #[error("Resource type validation failed for '{type_name}': {message}")]
    TypeValidation { type_name: String, message: String },

    // ========================================================================
    // Documentation Errors
    // ========================================================================
    /// The type of an attribute could not be determined
    #[error("Cannot determine attribute type of '{type_name}::{property}': {message}")]
    UndeterminedAttributeType {
        type_name: String,
        property: String,
        message: String,
    },
}

impl ApiError {
    /// Create an unsupported linkage error
    pub fn unsupported_linkage(property: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::UnsupportedLinkage {
            property: property.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown or unexposed type error
    pub fn unknown_type(type_identifier: impl Into<String>, reason: TypeLookupFailure) -> Self {
        ApiError::UnknownOrUnexposedType {
            type_identifier: type_identifier.into(),
            reason,
        }
    }

    /// Create an entity not found error
    pub fn entity_not_found(type_identifier: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::EntityNotFound {
            type_identifier: type_identifier.into(),
            id: id.into(),
        }
    }

    /// Create a path resolution error
    pub fn path_resolution(path: impl Into<String>, msg: impl Into<String>) -> Self {
        ApiError::PathResolution {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a resource type validation error
    pub fn type_validation(type_name: impl Into<String>, msg: impl Into<String>) -> Self {
        ApiError::TypeValidation {
            type_name: type_name.into(),
            message: msg.into(),
        }
    }

    /// Check if this error was caused by the content of a request
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            ApiError::UnsupportedLinkage { .. }
                | ApiError::UnknownOrUnexposedType { .. }
                | ApiError::EntityNotFound { .. }
                | ApiError::DuplicateFieldName { .. }
        )
    }

    /// Check if this error was raised while defining resource types
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            ApiError::PathResolution { .. }
                | ApiError::DuplicateProperty { .. }
                | ApiError::DuplicateType(_)
                | ApiError::MisboundBehavior { .. }
                | ApiError::TypeValidation { .. }
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::EntityNotFound { .. }
                | ApiError::UnknownOrUnexposedType {
                    reason: TypeLookupFailure::NotRegistered,
                    ..
                }
        )
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Tests
// ============================================================================
