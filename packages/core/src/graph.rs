//! An in-memory entity graph that implements [`Resource`].
//!
//! The graph is not a storage engine. It is a ready-made collaborator for
//! driving the document builder from data: load flat records that point at
//! each other by `{type, id}`, then hand [`Node`]s to the builder. Records may
//! reference each other in cycles and may be shared by many parents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::fieldset::FieldNames;
use crate::resource::{Association, Resource};

/// A `{type, id}` pointer from one record to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordKey {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: Value,
}

impl RecordKey {
    pub fn new(resource_type: impl Into<String>, id: impl Into<Value>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

/// The target(s) of one relation of a record.
///
/// Serialised as `null` or an object for to-one, an array for to-many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationRef {
    Many(Vec<RecordKey>),
    One(Option<RecordKey>),
}

/// One entity in the graph.
///
/// ```json
/// {
///   "type": "articles",
///   "id": 1,
///   "attributes": { "title": "T" },
///   "relations": {
///     "author": { "type": "people", "id": 9 },
///     "comments": [ { "type": "comments", "id": 5 } ]
///   }
/// }
/// ```
///
/// Relations keep the order in which they are declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Any JSON scalar. A missing id deserialises as `null` and fails the
    /// build when the record is rendered.
    #[serde(default)]
    pub id: Value,

    #[serde(default)]
    pub attributes: Map<String, Value>,

    #[serde(default)]
    pub relations: IndexMap<String, RelationRef>,
}

impl Record {
    pub fn new(resource_type: impl Into<String>, id: impl Into<Value>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            attributes: Map::new(),
            relations: IndexMap::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn to_one(mut self, name: impl Into<String>, target: Option<RecordKey>) -> Self {
        self.relations.insert(name.into(), RelationRef::One(target));
        self
    }

    pub fn to_many(mut self, name: impl Into<String>, targets: Vec<RecordKey>) -> Self {
        self.relations.insert(name.into(), RelationRef::Many(targets));
        self
    }
}

/// Input accepted by [`EntityGraph::from_json`]: a bare array of records or
/// an object wrapping them under `resources`.
#[derive(Deserialize)]
#[serde(untagged)]
enum GraphInput {
    Records(Vec<Record>),
    Wrapped { resources: Vec<Record> },
}

/// A collection of [`Record`]s indexed by `(type, id)`.
///
/// Insertion order is preserved. A record with an existing `(type, id)`
/// replaces the earlier one in place.
#[derive(Debug, Default)]
pub struct EntityGraph {
    records: IndexMap<(String, String), Record>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(iter: impl IntoIterator<Item = Record>) -> Self {
        let mut g = Self::new();
        for r in iter {
            g.add(r);
        }
        g
    }

    /// Parse a graph from JSON: a bare array of records, or an object holding
    /// them under `resources`.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let records = match serde_json::from_str::<GraphInput>(json)? {
            GraphInput::Records(records) => records,
            GraphInput::Wrapped { resources } => resources,
        };
        Ok(Self::from_records(records))
    }

    pub fn add(&mut self, record: Record) {
        let key = (record.resource_type.clone(), id_key(&record.id));
        self.records.insert(key, record);
    }

    pub fn get(&self, resource_type: &str, id: &Value) -> Option<&Record> {
        self.records
            .get(&(resource_type.to_string(), id_key(id)))
    }

    /// A handle to the record `(type, id)`, usable as a [`Resource`].
    ///
    /// Ids are compared by their rendered form, so `9` and `"9"` name the
    /// same record.
    pub fn node(&self, resource_type: &str, id: impl Into<Value>) -> Option<Node<'_>> {
        self.get(resource_type, &id.into())
            .map(|record| Node { graph: self, record })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records as nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        self.records.values().map(|record| Node { graph: self, record })
    }

    /// All records of one type, in insertion order.
    pub fn by_type(&self, resource_type: &str) -> Vec<Node<'_>> {
        self.nodes()
            .filter(|n| n.record.resource_type == resource_type)
            .collect()
    }

    fn resolve(&self, from: &Record, relation: &str, key: &RecordKey) -> Option<Node<'_>> {
        let node = self.node(&key.resource_type, key.id.clone());
        if node.is_none() {
            // Receivers tolerate references to records they were not given.
            debug!(
                from_type = %from.resource_type,
                from_id = %id_key(&from.id),
                relation,
                target_type = %key.resource_type,
                target_id = %id_key(&key.id),
                "dangling relation skipped"
            );
        }
        node
    }
}

/// A borrowed view of one record inside its graph.
#[derive(Debug, Clone, Copy)]
pub struct Node<'g> {
    graph: &'g EntityGraph,
    record: &'g Record,
}

impl<'g> Node<'g> {
    pub fn record(&self) -> &'g Record {
        self.record
    }
}

impl<'g> Resource for Node<'g> {
    fn resource_type(&self) -> &str {
        &self.record.resource_type
    }

    fn id(&self) -> Result<Value, Error> {
        Ok(self.record.id.clone())
    }

    fn attributes(&self, fields: Option<&FieldNames>) -> Result<Map<String, Value>, Error> {
        Ok(self
            .record
            .attributes
            .iter()
            .filter(|(name, _)| fields.map_or(true, |f| f.contains(name)))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect())
    }

    fn associations(&self) -> Vec<(&str, Association<Self>)> {
        let graph = self.graph;
        let record = self.record;
        record
            .relations
            .iter()
            .map(|(name, relation)| {
                let association = match relation {
                    RelationRef::One(None) => Association::ToOne(None),
                    RelationRef::One(Some(key)) => {
                        Association::ToOne(graph.resolve(record, name, key))
                    }
                    RelationRef::Many(keys) => Association::ToMany(
                        keys.iter()
                            .filter_map(|key| graph.resolve(record, name, key))
                            .collect(),
                    ),
                };
                (name.as_str(), association)
            })
            .collect()
    }
}

/// Index key for an id: strings as-is, everything else as JSON text.
fn id_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> EntityGraph {
        EntityGraph::from_records([
            Record::new("articles", 1)
                .attr("title", "T")
                .to_one("author", Some(RecordKey::new("people", 9)))
                .to_many(
                    "comments",
                    vec![RecordKey::new("comments", 5), RecordKey::new("comments", 6)],
                ),
            Record::new("people", 9).attr("name", "N"),
            Record::new("comments", 5).attr("body", "first"),
        ])
    }

    #[test]
    fn add_and_get() {
        let g = sample();
        assert_eq!(g.len(), 3);
        assert!(g.get("people", &json!(9)).is_some());
        assert!(g.get("people", &json!(10)).is_none());
    }

    #[test]
    fn numeric_and_string_ids_name_the_same_record() {
        let g = sample();
        assert!(g.node("people", "9").is_some());
        assert!(g.node("people", 9).is_some());
    }

    #[test]
    fn duplicate_key_replaces_in_place() {
        let mut g = sample();
        g.add(Record::new("articles", 1).attr("title", "T2"));
        assert_eq!(g.len(), 3);
        let first = g.nodes().next().unwrap();
        assert_eq!(first.record().attributes["title"], json!("T2"));
    }

    #[test]
    fn by_type_keeps_insertion_order() {
        let g = EntityGraph::from_records([
            Record::new("people", 2),
            Record::new("articles", 1),
            Record::new("people", 1),
        ]);
        let ids: Vec<_> = g.by_type("people").iter().map(|n| n.record().id.clone()).collect();
        assert_eq!(ids, vec![json!(2), json!(1)]);
    }

    #[test]
    fn dangling_references_are_skipped() {
        let g = sample();
        let article = g.node("articles", 1).unwrap();
        let assocs = article.associations();
        assert_eq!(assocs.len(), 2);
        assert_eq!(assocs[0].0, "author");
        assert_eq!(assocs[0].1.related().len(), 1);
        // comments/6 is not in the graph.
        assert_eq!(assocs[1].0, "comments");
        assert_eq!(assocs[1].1.related().len(), 1);

        let orphan = EntityGraph::from_records([
            Record::new("articles", 1).to_one("author", Some(RecordKey::new("people", 1)))
        ]);
        let article = orphan.node("articles", 1).unwrap();
        let assocs = article.associations();
        assert!(matches!(assocs[0].1, Association::ToOne(None)));
    }

    #[test]
    fn attributes_honour_field_hint() {
        let g = EntityGraph::from_records([Record::new("people", 1)
            .attr("name", "N")
            .attr("email", "e@example.com")]);
        let fields: FieldNames = ["name"].into_iter().collect();
        let attrs = g.node("people", 1).unwrap().attributes(Some(&fields)).unwrap();
        assert_eq!(attrs.len(), 1);
        assert!(attrs.contains_key("name"));
    }

    #[test]
    fn from_json_accepts_both_shapes() {
        let bare = r#"[{"type":"people","id":9,"attributes":{"name":"N"}}]"#;
        assert_eq!(EntityGraph::from_json(bare).unwrap().len(), 1);

        let wrapped = r#"{"resources":[
            {"type":"articles","id":"1","relations":{"author":{"type":"people","id":9},"editor":null,"tags":[]}},
            {"type":"people","id":9}
        ]}"#;
        let g = EntityGraph::from_json(wrapped).unwrap();
        assert_eq!(g.len(), 2);
        let article = g.get("articles", &json!("1")).unwrap();
        assert_eq!(
            article.relations.keys().collect::<Vec<_>>(),
            vec!["author", "editor", "tags"]
        );
        assert_eq!(article.relations["editor"], RelationRef::One(None));
        assert_eq!(article.relations["tags"], RelationRef::Many(vec![]));
    }

    #[test]
    fn missing_id_deserialises_as_null() {
        let g = EntityGraph::from_json(r#"[{"type":"people"}]"#).unwrap();
        let node = g.nodes().next().unwrap();
        assert_eq!(node.id().unwrap(), Value::Null);
    }
}
