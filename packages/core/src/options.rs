//! Caller-supplied document options.

use serde::{Deserialize, Serialize};

use crate::fieldset::{Fieldset, FieldsOption};
use crate::include::IncludeOption;

/// Options controlling one document build.
///
/// Deserialises from JSON such as:
///
/// ```json
/// { "include": "author,comments.author", "fields": { "articles": ["title"] } }
/// ```
///
/// Both keys are optional. Without `include` nothing is side-loaded; without
/// `fields` every attribute is rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<IncludeOption>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldsOption>,

    /// A fieldset resolved ahead of time. Takes precedence over `fields`.
    #[serde(skip)]
    pub fieldset: Option<Fieldset>,
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, include: impl Into<IncludeOption>) -> Self {
        self.include = Some(include.into());
        self
    }

    pub fn fields(mut self, fields: FieldsOption) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Use an already resolved fieldset instead of raw `fields`.
    pub fn with_fieldset(mut self, fieldset: Fieldset) -> Self {
        self.fieldset = Some(fieldset);
        self
    }
}
