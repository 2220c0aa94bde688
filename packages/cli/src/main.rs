//! `sideload` — build JSON:API documents from the command line.
//!
//! Provides two subcommands:
//!
//! - **`build`** — print the JSON:API document for a selection of records.
//! - **`render`** — print a human-readable summary of that document.
//!
//! Both read an entity graph from a JSON file path or from stdin (`-`): either
//! an array of records or an object with a `resources` array.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use sideload::render::{describe_data, render_document};
use sideload::{
    Document, DocumentBuilder, DocumentOptions, EntityGraph, FieldMap, FieldsOption, IncludeOption,
    Node, Primary,
};
use tracing::debug;

/// sideload — JSON:API document builder
///
/// Turn a graph of records into a JSON:API document with relationship
/// linkage, sparse fieldsets and side-loaded `included` resources.
#[derive(Parser)]
#[command(name = "sideload", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a JSON:API document and print it.
    ///
    /// Examples:
    ///   sideload build graph.json --root articles:1 --include author,comments.author
    ///   sideload build graph.json --fields articles=title,body --pretty
    Build {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Build a document and print a plain-text summary of it.
    Render {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Path to a JSON graph file, or `-` for stdin.
    file: PathBuf,

    /// Primary record as TYPE:ID. Repeat for a collection.
    /// Without any --root, every record in the file is the primary data.
    #[arg(long = "root", value_name = "TYPE:ID")]
    roots: Vec<String>,

    /// Render the primary data as an array even for a single --root.
    #[arg(long)]
    collection: bool,

    /// Comma-separated include paths (e.g. "author,comments.author").
    #[arg(short = 'i', long, env = "SIDELOAD_INCLUDE", value_name = "PATHS")]
    include: Option<String>,

    /// Sparse fieldset as TYPE=NAME,NAME. Repeat for several types.
    #[arg(short = 'f', long = "fields", value_name = "TYPE=NAMES")]
    fields: Vec<String>,

    /// JSON file with document options (`include`, `fields`).
    /// --include and --fields override the matching keys. A bare-list
    /// `fields` cannot be combined with --fields.
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sideload=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build { input, pretty } => {
            let graph = load_graph(&input.file);
            let options = load_options(&input);
            let doc = build(&graph, &input, &options);
            let json = if pretty {
                serde_json::to_string_pretty(&doc)
            } else {
                serde_json::to_string(&doc)
            };
            match json {
                Ok(text) => println!("{}", text),
                Err(e) => fatal(&format!("failed to serialise document: {}", e)),
            }
        }

        Command::Render { input } => {
            let graph = load_graph(&input.file);
            let options = load_options(&input);
            let doc = build(&graph, &input, &options);
            print!("{}", render_document(&doc));
        }
    }
}

/// Select the primary records and build the document. Exits 1 on failure.
fn build(graph: &EntityGraph, input: &InputArgs, options: &DocumentOptions) -> Document {
    let primary = select_primary(graph, input);
    let builder = DocumentBuilder::new(options);
    debug!(
        include = ?builder.include_paths().paths().collect::<Vec<_>>(),
        "building document"
    );
    let doc = builder.build(primary).unwrap_or_else(|e| {
        eprintln!("sideload: build failed: {}", e);
        process::exit(1);
    });
    debug!(data = %describe_data(&doc.data), included = doc.included.len(), "document ready");
    doc
}

fn select_primary<'g>(graph: &'g EntityGraph, input: &InputArgs) -> Primary<Node<'g>> {
    if input.roots.is_empty() {
        return Primary::Collection(graph.nodes().collect());
    }
    let mut nodes = Vec::with_capacity(input.roots.len());
    for raw in &input.roots {
        let (resource_type, id) = raw.split_once(':').unwrap_or_else(|| {
            fatal(&format!("invalid --root {:?}: expected format TYPE:ID", raw))
        });
        let node = graph
            .node(resource_type, id)
            .unwrap_or_else(|| fatal(&format!("no record {}:{} in the input", resource_type, id)));
        nodes.push(node);
    }
    if nodes.len() == 1 && !input.collection {
        Primary::Single(nodes.remove(0))
    } else {
        Primary::Collection(nodes)
    }
}

/// Options from --options, with --include and --fields layered on top.
fn load_options(input: &InputArgs) -> DocumentOptions {
    let mut options = match &input.options {
        Some(path) => {
            let json = read_input(path);
            serde_json::from_str::<DocumentOptions>(&json).unwrap_or_else(|e| {
                fatal(&format!("failed to parse options {}: {}", path.display(), e))
            })
        }
        None => DocumentOptions::default(),
    };

    if let Some(include) = &input.include {
        options.include = Some(IncludeOption::Joined(include.clone()));
    }

    if !input.fields.is_empty() {
        let flags = parse_field_flags(&input.fields);
        let merged = merge_field_flags(options.fields.take(), flags).unwrap_or_else(|e| fatal(&e));
        options.fields = Some(merged);
    }

    options
}

/// Layer --fields over the `fields` loaded from --options. Types the flags do
/// not mention keep their entry from the file.
fn merge_field_flags(
    existing: Option<FieldsOption>,
    mut flags: FieldMap,
) -> Result<FieldsOption, String> {
    match existing {
        None => {}
        Some(FieldsOption::ByType(from_file)) => {
            for (t, names) in from_file {
                flags.entry(t).or_insert(names);
            }
        }
        Some(FieldsOption::Primary(_)) => {
            return Err(
                "--fields cannot be combined with a bare-list \"fields\" from --options; \
                 key the file's fields by type instead"
                    .to_string(),
            );
        }
    }
    Ok(FieldsOption::ByType(flags))
}

fn parse_field_flags(raw: &[String]) -> FieldMap {
    let mut map = FieldMap::new();
    for entry in raw {
        let (resource_type, names) = entry.split_once('=').unwrap_or_else(|| {
            fatal(&format!("invalid --fields {:?}: expected format TYPE=NAME,NAME", entry))
        });
        let names = names
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        map.insert(resource_type.to_string(), names);
    }
    map
}

fn load_graph(path: &PathBuf) -> EntityGraph {
    let json = read_input(path);
    EntityGraph::from_json(&json)
        .unwrap_or_else(|e| fatal(&format!("failed to parse input as an entity graph: {}", e)))
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &PathBuf) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path).unwrap_or_else(|e| {
            fatal(&format!("failed to read {}: {}", path.display(), e))
        })
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("sideload: {}", msg);
    process::exit(2);
}

// --- tests -------------------------------------------------------------------
