//! The entity contract the document builder reads from.
//!
//! The builder knows nothing about the shape of a caller's domain objects. It
//! only needs a resource type, an id, an attribute map, and the ordered list of
//! associations, all exposed through [`Resource`]. Nothing here is ever
//! mutated by the builder.

use serde_json::{Map, Value};

use crate::error::Error;
use crate::fieldset::FieldNames;

/// A named relation declared by an entity.
///
/// `R` is the entity type itself, so a graph mixing several kinds of entities
/// uses one `Resource` type covering all of them (an enum, or a handle into an
/// [`EntityGraph`](crate::graph::EntityGraph)).
#[derive(Debug, Clone, PartialEq)]
pub enum Association<R> {
    /// Zero-or-one related entity.
    ToOne(Option<R>),
    /// Ordered sequence of related entities.
    ToMany(Vec<R>),
}

impl<R> Association<R> {
    /// The related entities as a sequence: a present to-one becomes a
    /// one-element vector, an absent one becomes empty.
    pub fn into_vec(self) -> Vec<R> {
        match self {
            Association::ToOne(one) => one.into_iter().collect(),
            Association::ToMany(many) => many,
        }
    }

    /// Borrowing counterpart of [`Association::into_vec`].
    pub fn related(&self) -> Vec<&R> {
        match self {
            Association::ToOne(one) => one.iter().collect(),
            Association::ToMany(many) => many.iter().collect(),
        }
    }
}

/// An entity that can be rendered as a JSON:API resource object.
pub trait Resource: Sized {
    /// The JSON:API `type` of this entity (e.g. `"articles"`).
    fn resource_type(&self) -> &str;

    /// The entity's id as any JSON scalar. Rendered with [`render_id`].
    fn id(&self) -> Result<Value, Error>;

    /// The entity's attributes.
    ///
    /// `fields` is the sparse-fieldset restriction for this entity's type, if
    /// any. Implementations may use it to skip work; the builder applies the
    /// restriction again regardless, and always drops `id` and `type` keys
    /// since those live at the top level of the resource object.
    fn attributes(&self, fields: Option<&FieldNames>) -> Result<Map<String, Value>, Error>;

    /// Associations in declaration order.
    fn associations(&self) -> Vec<(&str, Association<Self>)>;
}

/// Render a resource id as the string JSON:API requires.
///
/// Strings pass through, numbers and booleans use their JSON text. `null`
/// means the entity has no id and is reported rather than replaced with a
/// placeholder.
pub fn render_id(resource_type: &str, id: Value) -> Result<String, Error> {
    match id {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(Error::MissingId {
            resource_type: resource_type.to_string(),
        }),
        value @ (Value::Array(_) | Value::Object(_)) => Err(Error::NonScalarId {
            resource_type: resource_type.to_string(),
            value,
        }),
    }
}

// --- tests -------------------------------------------------------------------
