#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::process::exit;

use saphyr_repr::budget::BudgetReport;
use saphyr_repr::options::UnknownTagPolicy;
use saphyr_repr::{
    CoreSchema, FailsafeSchema, JsonSchema, NodeId, NodeKind, NodePath, NodePathSegment, NodeRef,
    NullSchema, Options, Schema, display_path, from_multiple_with_options,
};

const USAGE: &str = "usage: saphyr-repr <none|failsafe|json|core> <file>\n\
    Loads the YAML file under the given schema and prints the path, resolved tag \
    and value of every node.";

fn report_budget(report: &BudgetReport) {
    eprintln!(
        "budget: {} events, {} nodes, {} anchors, {} aliases, depth {}",
        report.events, report.nodes, report.anchors, report.aliases, report.max_depth
    );
}

fn schema_by_name(name: &str) -> Option<&'static dyn Schema> {
    let schema: &'static dyn Schema = match name {
        "none" => NullSchema::instance(),
        "failsafe" => FailsafeSchema::instance(),
        "json" => JsonSchema::instance(),
        "core" => CoreSchema::instance(),
        _ => return None,
    };
    Some(schema)
}

/// Print one line per node. Shared nodes are printed at every path that reaches
/// them, but their children only once.
fn print_node(
    node: NodeRef<'_>,
    path: &mut NodePath,
    schema: &dyn Schema,
    seen: &mut HashSet<NodeId>,
) {
    let rendered = match node.kind() {
        NodeKind::Scalar(_) => match node.to_value(schema) {
            Ok(value) => value.to_string(),
            Err(err) => format!("<{err}>"),
        },
        NodeKind::Mapping(m) => format!("{{{} entries}}", m.len()),
        NodeKind::Sequence(s) => format!("[{} items]", s.len()),
    };
    let tag = node.tag().shorthand().unwrap_or_else(|| node.tag().to_string());
    println!("{}\t{tag}\t{rendered}", display_path(path.as_slice()));

    if !seen.insert(node.id()) {
        return;
    }
    for (index, item) in node.items().enumerate() {
        path.push(NodePathSegment::SequenceItem { index });
        print_node(item, path, schema, seen);
        path.pop();
    }
    for (key, value) in node.entries() {
        path.push(NodePathSegment::MappingKey);
        print_node(key, path, schema, seen);
        path.pop();
        path.push(NodePathSegment::MappingValue {
            key: key.scalar_value().map(str::to_owned),
        });
        print_node(value, path, schema, seen);
        path.pop();
    }
}

/// Load a YAML file under the chosen schema and dump its representation graph.
fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return;
    }
    let [schema_name, path] = args.as_slice() else {
        eprintln!("{USAGE}");
        exit(1);
    };
    let Some(schema) = schema_by_name(schema_name) else {
        eprintln!("unknown schema `{schema_name}`\n{USAGE}");
        exit(1);
    };

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Failed to read {path}: {err}");
            exit(2);
        }
    };

    let options = Options {
        budget_report: Some(report_budget),
        unknown_tags: UnknownTagPolicy::Preserve,
        ..Options::default()
    };

    let stream = match from_multiple_with_options(&content, |_| schema, options) {
        Ok(stream) => stream,
        Err(err) => {
            eprintln!("{path} invalid:\n{err}");
            exit(3);
        }
    };

    for (index, document) in stream.iter().enumerate() {
        println!("--- # document {index}");
        let mut seen = HashSet::new();
        print_node(document.root(), &mut NodePath::new(), schema, &mut seen);
    }
}
