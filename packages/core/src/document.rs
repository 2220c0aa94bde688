//! The JSON:API output model.
//!
//! These types serialise to the exact document shape:
//!
//! ```json
//! {
//!   "data": {
//!     "type": "articles",
//!     "id": "1",
//!     "attributes": { "title": "T" },
//!     "links": { "author": { "linkage": { "type": "people", "id": "9" } } }
//!   },
//!   "included": [
//!     { "type": "people", "id": "9", "attributes": { "name": "N" }, "links": {} }
//!   ]
//! }
//! ```

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Error;

/// The minimal `{type, id}` reference to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl Identifier {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

/// Resource linkage for one association. Mirrors the association it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Linkage {
    /// A to-one association with no related entity. Serialises as `null`.
    Empty,
    /// A to-one association with a related entity.
    ToOne(Identifier),
    /// A to-many association. An empty collection is `[]`, never `null`.
    ToMany(Vec<Identifier>),
}

impl Serialize for Linkage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Linkage::Empty => serializer.serialize_none(),
            Linkage::ToOne(identifier) => identifier.serialize(serializer),
            Linkage::ToMany(identifiers) => identifiers.serialize(serializer),
        }
    }
}

/// The object stored under an association name in a resource's `links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub linkage: Linkage,
}

/// One entity rendered as a JSON:API resource object.
///
/// `id` is always a string. `attributes` never contains `id` or `type`.
/// `links` holds one entry per declared association, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    pub attributes: Map<String, Value>,
    pub links: IndexMap<String, Relationship>,
}

impl ResourceObject {
    /// The `{type, id}` pair identifying this resource.
    pub fn identifier(&self) -> Identifier {
        Identifier::new(&self.resource_type, &self.id)
    }
}

/// The top-level `data` member: one resource, or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Single(ResourceObject),
    Collection(Vec<ResourceObject>),
}

impl PrimaryData {
    /// The primary resources in order.
    pub fn resources(&self) -> Vec<&ResourceObject> {
        match self {
            PrimaryData::Single(r) => vec![r],
            PrimaryData::Collection(rs) => rs.iter().collect(),
        }
    }
}

/// A complete JSON:API response document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub data: PrimaryData,

    /// Side-loaded resources. Never contains two structurally equal entries.
    /// Omitted from the JSON entirely when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
}

impl Document {
    /// The document as a `serde_json::Value`.
    pub fn to_json_value(&self) -> Result<Value, Error> {
        Ok(serde_json::to_value(self)?)
    }
}

/// The shared `included` collection for one build.
///
/// Deduplication compares the fully rendered resource object (type, id,
/// attributes and links), not just the identifier. Only entries sharing the
/// identifier are compared.
#[derive(Debug, Default)]
pub(crate) struct Included {
    resources: Vec<ResourceObject>,
    by_identifier: HashMap<Identifier, Vec<usize>>,
}

impl Included {
    /// Append `resource` unless an identical one is already present. Returns
    /// whether it was added.
    pub(crate) fn push_unique(&mut self, resource: ResourceObject) -> bool {
        let slots = self.by_identifier.entry(resource.identifier()).or_default();
        if slots.iter().any(|&i| self.resources[i] == resource) {
            return false;
        }
        slots.push(self.resources.len());
        self.resources.push(resource);
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.resources.len()
    }

    pub(crate) fn into_vec(self) -> Vec<ResourceObject> {
        self.resources
    }
}

// --- tests -------------------------------------------------------------------
