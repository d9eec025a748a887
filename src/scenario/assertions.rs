//! Expectation checks over search results.
//!
//! Each check stops at the first offending entry.

use crate::directory::{DirectoryEntry, SearchResult};
use crate::error::AssertionError;

/// Attribute holding an entry's object classes.
pub(super) const OBJECT_CLASS_ATTRIBUTE: &str = "objectClass";

/// A filtered search must have produced exactly `expected` entries.
pub(super) fn request_count(
    filter: &str,
    expected: usize,
    result: Option<&SearchResult>,
) -> Result<(), AssertionError> {
    let Some(found) = result else {
        return Err(AssertionError::NoResult {
            filter: filter.to_owned(),
            expected,
        });
    };
    if found.count() == expected {
        Ok(())
    } else {
        Err(AssertionError::CountMismatch {
            filter: filter.to_owned(),
            expected,
            actual: found.count(),
        })
    }
}

/// The first entry of a `cn` search must list `object_class`.
///
/// Later entries sharing the same `cn` are not consulted.
pub(super) fn first_has_object_class(
    cn: &str,
    object_class: &str,
    result: Option<&SearchResult>,
) -> Result<(), AssertionError> {
    let first = result
        .and_then(SearchResult::first)
        .ok_or_else(|| AssertionError::UnknownEntry { cn: cn.to_owned() })?;
    let classes = first
        .attribute_values(OBJECT_CLASS_ATTRIBUTE)
        .unwrap_or_default();
    if classes.iter().any(|class| class == object_class) {
        Ok(())
    } else {
        Err(AssertionError::ObjectClassMissing {
            cn: cn.to_owned(),
            object_class: object_class.to_owned(),
            actual: classes.to_vec(),
        })
    }
}

/// The last search must have returned exactly `expected` entries.
pub(super) const fn result_count(
    result: &SearchResult,
    expected: usize,
) -> Result<(), AssertionError> {
    if result.count() == expected {
        Ok(())
    } else {
        Err(AssertionError::ResultCountMismatch {
            expected,
            actual: result.count(),
        })
    }
}

/// Every entry must carry `attribute` with `value` among its values.
pub(super) fn all_have_attribute_value(
    result: &SearchResult,
    attribute: &str,
    value: &str,
) -> Result<(), AssertionError> {
    result.entries().iter().try_for_each(|entry| {
        let values = defined_values(entry, attribute)?;
        if values.iter().any(|candidate| candidate == value) {
            Ok(())
        } else {
            Err(AssertionError::AttributeValueMismatch {
                dn: entry.distinguished_name().to_owned(),
                attribute: attribute.to_owned(),
                expected: value.to_owned(),
                actual: values.to_vec(),
            })
        }
    })
}

/// Every entry must carry `attribute`.
pub(super) fn all_have_attribute_defined(
    result: &SearchResult,
    attribute: &str,
) -> Result<(), AssertionError> {
    result
        .entries()
        .iter()
        .try_for_each(|entry| defined_values(entry, attribute).map(|_| ()))
}

fn defined_values<'a>(
    entry: &'a DirectoryEntry,
    attribute: &str,
) -> Result<&'a [String], AssertionError> {
    entry
        .attribute_values(attribute)
        .ok_or_else(|| AssertionError::MissingAttribute {
            dn: entry.distinguished_name().to_owned(),
            attribute: attribute.to_owned(),
        })
}
