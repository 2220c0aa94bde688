//! JSON:API document assembly.
//!
//! This crate turns a graph of entities and their to-one / to-many relations
//! into a JSON:API response document: a `data` section of resource objects
//! carrying relationship linkage, and a deduplicated `included` section holding
//! only the relationship paths the caller asked for. It is output only; inbound
//! request documents are not parsed here.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`resource`] | The [`Resource`] trait entities implement, and [`Association`] |
//! | [`include`] | Include-path parsing and matching via [`IncludePaths`] |
//! | [`fieldset`] | Sparse fieldsets: [`Fieldset`], [`FieldsOption`] |
//! | [`options`] | Caller options for one build: [`DocumentOptions`] |
//! | [`builder`] | The document builder: [`DocumentBuilder`], [`build_document`] |
//! | [`document`] | Output model: [`Document`], [`ResourceObject`], [`Linkage`] |
//! | [`graph`] | An in-memory [`EntityGraph`] whose nodes implement [`Resource`] |
//! | [`render`] | Plain-text rendering of documents |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use sideload::{build_document, DocumentOptions, EntityGraph, Primary, Record, RecordKey};
//!
//! let graph = EntityGraph::from_records([
//!     Record::new("articles", 1)
//!         .attr("title", "T")
//!         .to_one("author", Some(RecordKey::new("people", 9))),
//!     Record::new("people", 9).attr("name", "N"),
//! ]);
//!
//! let article = graph.node("articles", 1).expect("article is in the graph");
//! let doc = build_document(Primary::Single(article), &DocumentOptions::new().include("author"))?;
//!
//! let json = serde_json::to_string_pretty(&doc)?;
//! ```

pub mod builder;
pub mod document;
pub mod error;
pub mod fieldset;
pub mod graph;
pub mod include;
pub mod options;
pub mod render;
pub mod resource;

pub use builder::{build_document, DocumentBuilder, Primary};
pub use document::{Document, Identifier, Linkage, PrimaryData, Relationship, ResourceObject};
pub use error::Error;
pub use fieldset::{FieldMap, FieldNames, Fieldset, FieldsOption};
pub use graph::{EntityGraph, Node, Record, RecordKey, RelationRef};
pub use include::{IncludeOption, IncludePaths};
pub use options::DocumentOptions;
pub use resource::{render_id, Association, Resource};
