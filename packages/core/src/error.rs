use thiserror::Error;

/// Errors raised while building a document.
///
/// The builder itself never fails on well-formed input; every variant here is
/// either produced by a [`Resource`](crate::Resource) implementation or by the
/// id rendering step, and is returned to the caller unchanged. A failure on any
/// entity aborts the whole build.
#[derive(Debug, Error)]
pub enum Error {
    #[error("resource of type {resource_type:?} has no id")]
    MissingId { resource_type: String },

    #[error("resource of type {resource_type:?} has a non-scalar id: {value}")]
    NonScalarId {
        resource_type: String,
        value: serde_json::Value,
    },

    #[error("attribute {name:?} of {resource_type:?} could not be resolved: {message}")]
    Attribute {
        resource_type: String,
        name: String,
        message: String,
    },

    /// Free-form failure reported by a `Resource` implementation.
    #[error("{0}")]
    Collaborator(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
