//! Human-readable text rendering of a [`Document`].
//!
//! Useful for terminals and logs when eyeballing what a build produced. The
//! output is stable plain text but it is not a format of its own; only the
//! JSON produced by [`Document`]'s `Serialize` impl is normative.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::document::{Document, Identifier, Linkage, PrimaryData, ResourceObject};

/// Render a document as indented plain text.
///
/// ```text
/// Document  1 primary, 1 included
/// ───────────────────────────────
///
/// DATA
///   articles/1  title="T" body="B"
///     author -> people/9
///
/// INCLUDED
///   people (1)
///     people/9  name="N"
/// ```
pub fn render_document(doc: &Document) -> String {
    let primary = doc.data.resources();
    let header = format!(
        "Document  {} primary, {} included",
        primary.len(),
        doc.included.len()
    );
    let rule = "─".repeat(header.chars().count());
    let mut out = format!("{}\n{}\n", header, rule);

    out.push('\n');
    out.push_str("DATA\n");
    if primary.is_empty() {
        out.push_str("  (empty collection)\n");
    }
    for resource in primary {
        render_resource(&mut out, resource, 2);
    }

    if !doc.included.is_empty() {
        // group by type, types sorted; entries keep their document order
        let mut groups: BTreeMap<&str, Vec<&ResourceObject>> = BTreeMap::new();
        for r in &doc.included {
            groups.entry(r.resource_type.as_str()).or_default().push(r);
        }
        out.push('\n');
        out.push_str("INCLUDED\n");
        for (resource_type, resources) in groups {
            out.push_str(&format!("  {} ({})\n", resource_type, resources.len()));
            for r in resources {
                render_resource(&mut out, r, 4);
            }
        }
    }

    out
}

/// One-line summary of the primary data shape, e.g. `"single articles/1"`.
pub fn describe_data(data: &PrimaryData) -> String {
    match data {
        PrimaryData::Single(r) => format!("single {}", label(&r.identifier())),
        PrimaryData::Collection(rs) => format!("collection of {}", rs.len()),
    }
}

// --- helpers -----------------------------------------------------------------

fn render_resource(out: &mut String, r: &ResourceObject, indent: usize) {
    let pad = " ".repeat(indent);
    out.push_str(&pad);
    out.push_str(&label(&r.identifier()));
    let attrs: Vec<String> = r
        .attributes
        .iter()
        .map(|(k, v)| format!("{}={}", k, truncate(&scalar(v), 40)))
        .collect();
    if !attrs.is_empty() {
        out.push_str("  ");
        out.push_str(&attrs.join(" "));
    }
    out.push('\n');

    for (name, rel) in &r.links {
        let target = match &rel.linkage {
            Linkage::Empty => "(none)".to_string(),
            Linkage::ToOne(id) => label(id),
            Linkage::ToMany(ids) => format!(
                "[{}]",
                ids.iter().map(label).collect::<Vec<_>>().join(", ")
            ),
        };
        out.push_str(&format!("{}  {} -> {}\n", pad, name, target));
    }
}

fn label(id: &Identifier) -> String {
    format!("{}/{}", id.resource_type, id.id)
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{}…", head)
    }
}

// --- tests -------------------------------------------------------------------
