//! Help and usage rendering.
//!
//! Rendering is a pure function of a node and its ancestor chain; callers
//! decide where the text goes.

use argmodel_core::{FieldDescriptor, FieldKind, ValueType, metavar};

use crate::tree::{CommandNode, CommandTree, NodeId};

const HELP_SPELLING: &str = "-h, --help";
const HELP_TEXT: &str = "show this help message and exit";

/// Renders the one-line usage summary of a node.
///
/// # Examples
///
/// ```
/// use argmodel_core::*;
/// use argmodel_parser::{CommandTree, help};
///
/// let model = ModelSchema::new("Greet")
///     .with_field(FieldSchema::new("name", ValueType::Text))
///     .with_field(FieldSchema::new("repeat_count", ValueType::Integer).with_default(10))
///     .with_field(FieldSchema::flag("shout", false));
/// let tree = CommandTree::build("greet", &model).unwrap();
///
/// assert_eq!(
///     help::usage(&tree, tree.root()),
///     "usage: greet [-h] <name> [--repeat-count REPEAT_COUNT] [--[no-]shout]"
/// );
/// ```
pub fn usage(tree: &CommandTree, id: NodeId) -> String {
    let node = tree.node(id);
    let mut parts = vec![format!("usage: {}", tree.command_line(id)), "[-h]".to_string()];

    for field in &node.positionals {
        if field.is_greedy() {
            parts.push(format!("<{0}> [<{0}> ...]", field.cli_name));
        } else {
            parts.push(format!("<{}>", field.cli_name));
        }
    }

    for field in node.options.values() {
        parts.push(option_usage(field));
    }

    if let Some(slot) = &node.subcommand {
        parts.push(format!("{{{}}} ...", slot.tokens().join(",")));
    }

    parts.join(" ")
}

fn option_usage(field: &FieldDescriptor) -> String {
    let bare = field.cli_name.trim_start_matches("--");
    match field.kind {
        FieldKind::Flag if field.required => format!("(--{bare} | --no-{bare})"),
        FieldKind::Flag => format!("[--[no-]{bare}]"),
        _ if field.is_repeatable() => format!("[{} {} ...]", field.cli_name, metavar(&field.name)),
        _ => format!("[{} {}]", field.cli_name, metavar(&field.name)),
    }
}

/// Renders the full help text of a node.
///
/// Sections: usage, summary, positional arguments, optional keyword
/// arguments and subcommands. Empty sections are left out, except the
/// keyword section which always lists `--help`.
pub fn render_help(tree: &CommandTree, id: NodeId) -> String {
    let node = tree.node(id);
    let mut out = String::new();

    out.push_str(&usage(tree, id));
    out.push('\n');

    if !node.summary.is_empty() {
        out.push('\n');
        out.push_str(&node.summary);
        out.push('\n');
    }

    let positionals: Vec<(String, String)> = node
        .positionals
        .iter()
        .map(|field| (field.cli_name.clone(), describe(field)))
        .collect();

    let mut options = vec![(HELP_SPELLING.to_string(), HELP_TEXT.to_string())];
    options.extend(
        node.options
            .values()
            .map(|field| (option_spelling(field), describe(field))),
    );

    let subcommands = subcommand_rows(tree, node);

    let width = positionals
        .iter()
        .chain(&options)
        .chain(&subcommands)
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0);

    if !positionals.is_empty() {
        push_section(&mut out, "positional arguments:", &positionals, width);
    }
    push_section(&mut out, "optional keyword arguments:", &options, width);
    if !subcommands.is_empty() {
        push_section(&mut out, "subcommands:", &subcommands, width);
    }

    out
}

fn subcommand_rows(tree: &CommandTree, node: &CommandNode) -> Vec<(String, String)> {
    let Some(slot) = &node.subcommand else {
        return Vec::new();
    };
    let mut rows = vec![(format!("{{{}}}", slot.tokens().join(",")), slot.help_text.clone())];
    for (token, child) in &slot.choices {
        let summary = tree
            .node(*child)
            .summary
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        rows.push((format!("  {token}"), summary));
    }
    rows
}

fn push_section(out: &mut String, title: &str, rows: &[(String, String)], width: usize) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    for (left, right) in rows {
        let line = format!("  {left:<width$}  {right}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn option_spelling(field: &FieldDescriptor) -> String {
    let mut names = Vec::new();
    names.extend(field.short.clone());
    names.push(field.cli_name.clone());
    names.extend(field.negated_short());
    names.extend(field.negated_name());
    let names = names.join(", ");

    if field.kind == FieldKind::Keyword {
        format!("{names} {}", metavar(&field.name))
    } else {
        names
    }
}

/// Help text followed by the type annotation and default.
fn describe(field: &FieldDescriptor) -> String {
    let mut parts = Vec::new();
    if !field.help_text.is_empty() {
        parts.push(field.help_text.clone());
    }
    if field.is_repeatable() {
        parts.push("Can be applied multiple times.".to_string());
    }
    parts.push(type_annotation(&field.value_type));
    match &field.default {
        Some(default) => parts.push(format!("[default = {default}]")),
        None if field.kind == FieldKind::Flag => parts.push("[required]".to_string()),
        None => {}
    }
    parts.join(" ")
}

fn type_annotation(value_type: &ValueType) -> String {
    match value_type {
        ValueType::Choice(options) => format!("[allowed values: {}]", options.join(", ")),
        other => format!("[{}]", other.type_name()),
    }
}
