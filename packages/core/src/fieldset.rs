//! Sparse fieldsets: per-type restrictions on which attributes are rendered.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Attribute names per resource type, in the order given.
pub type FieldMap = IndexMap<String, Vec<String>>;

/// The caller's `fields` option, as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldsOption {
    /// `{ "articles": ["title"], "people": ["name"] }`
    ByType(FieldMap),
    /// `["title"]` — restricts the type of the primary data only.
    Primary(Vec<String>),
}

/// The allowed attribute names for one resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldNames(IndexSet<String>);

impl FieldNames {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldNames {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Resolved sparse fieldsets, keyed by resource type.
///
/// A type with no entry is unrestricted. Built once per document and shared by
/// every step of the build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fieldset {
    by_type: HashMap<String, FieldNames>,
}

impl Fieldset {
    /// No restrictions for any type.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Resolve the caller's option into a lookup structure.
    ///
    /// A bare list applies to `primary_type`; when there is no primary type
    /// (an empty collection) it restricts nothing.
    pub fn resolve(option: Option<&FieldsOption>, primary_type: Option<&str>) -> Self {
        let mut fieldset = Self::unrestricted();
        match option {
            None => {}
            Some(FieldsOption::ByType(map)) => {
                for (resource_type, names) in map {
                    fieldset.restrict(resource_type.clone(), names.iter().cloned());
                }
            }
            Some(FieldsOption::Primary(names)) => {
                if let Some(t) = primary_type {
                    fieldset.restrict(t, names.iter().cloned());
                }
            }
        }
        fieldset
    }

    /// Restrict `resource_type` to the given attribute names, replacing any
    /// earlier restriction for that type.
    pub fn restrict<S: Into<String>>(
        &mut self,
        resource_type: impl Into<String>,
        names: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.by_type
            .insert(resource_type.into(), names.into_iter().collect());
        self
    }

    /// The allowed names for `resource_type`, or `None` if unrestricted.
    pub fn fields_for(&self, resource_type: &str) -> Option<&FieldNames> {
        self.by_type.get(resource_type)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.by_type.is_empty()
    }
}

// --- tests -------------------------------------------------------------------
