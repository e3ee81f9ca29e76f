//! Core traits for restype
//!
//! This module defines the small traits shared by the schema and request
//! crates for naming and validating definitions.

use crate::error::{ApiError, ApiResult};
use std::collections::BTreeSet;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Definitions checked for consistency once they are assembled
///
/// Resource type definitions run these checks when their builder finishes,
/// so a registry never holds a type that contradicts itself.
///
/// ```rust,ignore
/// use restype_core::{ApiError, ApiResult, Validatable};
///
/// struct Alias(String);
///
/// impl Validatable for Alias {
///     fn validate(&self) -> ApiResult<()> {
///         if self.0.contains("..") {
///             return Err(ApiError::type_validation("Alias", "empty path segment"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// First inconsistency found, if any
    fn validate(&self) -> ApiResult<()>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Messages of every inconsistency; the default reports at most one
    fn validation_errors(&self) -> Vec<String> {
        self.validate()
            .err()
            .map(|error| error.to_string())
            .into_iter()
            .collect()
    }
}

// ============================================================================
// Named Trait
// ============================================================================

/// Definitions identified by a name unique within their owner
pub trait Named {
    fn name(&self) -> &str;

    /// Case-sensitive comparison
    fn name_matches(&self, other: &str) -> bool {
        self.name() == other
    }
}

/// Names occurring more than once, sorted
pub fn duplicate_names<'a, T, I>(items: I) -> Vec<String>
where
    T: Named + 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for item in items {
        if !seen.insert(item.name()) {
            duplicates.insert(item.name().to_string());
        }
    }
    duplicates.into_iter().collect()
}

/// Fail with [`ApiError::DuplicateProperty`] on the first duplicated name
pub fn ensure_unique_names<'a, T, I>(owner: &str, items: I) -> ApiResult<()>
where
    T: Named + 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    match duplicate_names(items).into_iter().next() {
        Some(property) => Err(ApiError::DuplicateProperty {
            type_name: owner.to_string(),
            property,
        }),
        None => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================
