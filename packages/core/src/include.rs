//! Include-path matching.
//!
//! Callers name the relationship paths they want side-loaded as dotted
//! association names (`"author"`, `"comments.author"`). The builder walks the
//! association graph building the same dotted strings and asks two questions
//! of every path: should the related resources at this path go into
//! `included`, and does any requested path continue below it.

use serde::{Deserialize, Serialize};

/// The caller's `include` option, as received.
///
/// Deserialises from either a comma-separated string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncludeOption {
    /// `"author,comments.author"`
    Joined(String),
    /// `["author", "comments.author"]`
    List(Vec<String>),
}

impl From<&str> for IncludeOption {
    fn from(s: &str) -> Self {
        IncludeOption::Joined(s.to_string())
    }
}

impl From<String> for IncludeOption {
    fn from(s: String) -> Self {
        IncludeOption::Joined(s)
    }
}

impl From<Vec<String>> for IncludeOption {
    fn from(v: Vec<String>) -> Self {
        IncludeOption::List(v)
    }
}

impl From<&[&str]> for IncludeOption {
    fn from(v: &[&str]) -> Self {
        IncludeOption::List(v.iter().map(|s| s.to_string()).collect())
    }
}

/// A parsed set of requested include paths.
///
/// Matching always happens on whole dot-separated segments: `"author"` never
/// matches an entry `"authors"`, and a malformed entry such as `"a..b"` simply
/// never matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludePaths {
    paths: Vec<String>,
}

impl IncludePaths {
    /// Parse the caller's option. `None` yields an empty set.
    ///
    /// List entries are split on commas too, entries are trimmed, and empty
    /// entries are discarded.
    pub fn parse(option: Option<&IncludeOption>) -> Self {
        let raw: Vec<&str> = match option {
            None => vec![],
            Some(IncludeOption::Joined(s)) => vec![s.as_str()],
            Some(IncludeOption::List(v)) => v.iter().map(String::as_str).collect(),
        };
        let paths = raw
            .into_iter()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Self { paths }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The requested paths, in the order given.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// `true` iff `path` was requested exactly.
    ///
    /// An ancestor of a requested path is not itself included: asking for
    /// `"comments.author"` walks through `"comments"` without side-loading it.
    pub fn should_include(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// `true` iff some requested path continues strictly below `path`.
    pub fn should_descend(&self, path: &str) -> bool {
        self.paths.iter().any(|p| {
            p.len() > path.len() + 1
                && p.starts_with(path)
                && p.as_bytes()[path.len()] == b'.'
        })
    }
}

/// Join an ancestor path and an association name into a child path.
pub(crate) fn child_path(ancestor: &str, name: &str) -> String {
    if ancestor.is_empty() {
        name.to_string()
    } else {
        format!("{ancestor}.{name}")
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(s: &str) -> IncludePaths {
        IncludePaths::parse(Some(&IncludeOption::from(s)))
    }

    #[test]
    fn no_option_matches_nothing() {
        let p = IncludePaths::parse(None);
        assert!(p.is_empty());
        assert!(!p.should_include("author"));
        assert!(!p.should_descend("author"));
        assert!(!p.should_include(""));
    }

    #[test]
    fn parse_splits_and_trims() {
        let p = paths("author, comments.author ,,");
        assert_eq!(p.paths().collect::<Vec<_>>(), vec!["author", "comments.author"]);
    }

    #[test]
    fn list_entries_are_split_on_commas() {
        let opt = IncludeOption::List(vec!["author,tags".into(), "comments".into()]);
        let p = IncludePaths::parse(Some(&opt));
        assert_eq!(p.paths().collect::<Vec<_>>(), vec!["author", "tags", "comments"]);
    }

    #[test]
    fn exact_match_only() {
        let p = paths("comments");
        assert!(p.should_include("comments"));
        assert!(!p.should_include("commenter"));
        assert!(!p.should_include("comment"));
        assert!(!p.should_include("comments.author"));
    }

    #[test]
    fn no_substring_matches() {
        let p = paths("authors");
        assert!(!p.should_include("author"));
        assert!(!p.should_descend("author"));
    }

    #[test]
    fn nested_path_descends_without_including_ancestor() {
        let p = paths("comments.author");
        assert!(!p.should_include("comments"));
        assert!(p.should_descend("comments"));
        assert!(p.should_include("comments.author"));
        assert!(!p.should_descend("comments.author"));
        assert!(!p.should_descend("comment"));
    }

    #[test]
    fn deep_paths_descend_at_every_level() {
        let p = paths("a.b.c");
        assert!(p.should_descend("a"));
        assert!(p.should_descend("a.b"));
        assert!(!p.should_descend("a.b.c"));
        assert!(p.should_include("a.b.c"));
    }

    #[test]
    fn malformed_entries_never_match() {
        let p = paths("a..b,.c,d.");
        assert!(!p.should_include("a"));
        assert!(!p.should_include("a.b"));
        assert!(!p.should_include("c"));
        assert!(!p.should_include("d"));
        assert!(!p.should_descend("d"));
        // `a..b` continues past `a`, but no real child path can ever equal it.
        assert!(p.should_descend("a"));
        assert!(!p.should_include("a.b"));
    }

    #[test]
    fn deserialises_string_or_list() {
        let s: IncludeOption = serde_json::from_str(r#""author,comments""#).unwrap();
        assert_eq!(s, IncludeOption::Joined("author,comments".into()));
        let l: IncludeOption = serde_json::from_str(r#"["author","comments"]"#).unwrap();
        assert_eq!(l, IncludeOption::List(vec!["author".into(), "comments".into()]));
    }

    #[test]
    fn child_path_joins_with_dot() {
        assert_eq!(child_path("", "author"), "author");
        assert_eq!(child_path("comments", "author"), "comments.author");
    }
}
