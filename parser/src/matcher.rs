//! Tokenizer/matcher: walks argv against the command tree.
//!
//! Tokens are consumed left to right against the *current* node, starting at
//! the root:
//!
//! - `-h` / `--help` stops matching and yields help for the current node.
//! - `--name` tokens (and declared `-x` shorts) address the current node's
//!   options before anything else, so options may be interleaved with
//!   positionals and selectors.
//! - Other tokens fill positionals in declaration order. Once they are all
//!   filled, the next bare token selects a subcommand and the child node
//!   becomes current.
//! - A bare `--` ends option matching; every later token is bare.
//!
//! Values are cast as they are matched and the first error ends the parse.

use indexmap::IndexMap;
use tracing::debug;

use argmodel_core::{FieldDescriptor, FieldKind, ParsedCommand, Value};

use crate::cast::{CastError, cast};
use crate::error::{ParseError, ParseErrorKind};
use crate::help::{render_help, usage};
use crate::tree::{CommandNode, CommandTree, NodeId, Spelling};

/// Result of a successful match.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Every token matched; the assembled value.
    Parsed(T),
    /// A help trigger was seen; the rendered help of the current node.
    Help(String),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Parsed(value) => Outcome::Parsed(f(value)),
            Self::Help(text) => Outcome::Help(text),
        }
    }

    pub fn into_parsed(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Help(_) => None,
        }
    }

    pub fn help_text(&self) -> Option<&str> {
        match self {
            Self::Parsed(_) => None,
            Self::Help(text) => Some(text),
        }
    }
}

/// Matching state of one node on the path from the root.
struct Frame {
    node: NodeId,
    values: IndexMap<String, Value>,
    next_positional: usize,
}

impl Frame {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            values: IndexMap::new(),
            next_positional: 0,
        }
    }
}

/// Matches `args` (program name excluded) against `tree`.
pub fn match_args<S: AsRef<str>>(
    tree: &CommandTree,
    args: &[S],
) -> Result<Outcome<ParsedCommand>, ParseError> {
    let matcher = Matcher {
        tree,
        root: Frame::new(tree.root()),
        selected: Vec::new(),
    };
    matcher.run(args)
}

struct Matcher<'t> {
    tree: &'t CommandTree,
    root: Frame,
    /// Frames of the selected subcommands, outermost first
    selected: Vec<Frame>,
}

impl Matcher<'_> {
    fn run<S: AsRef<str>>(mut self, args: &[S]) -> Result<Outcome<ParsedCommand>, ParseError> {
        let mut tokens = args.iter().map(<S as AsRef<str>>::as_ref);
        let mut options_done = false;

        while let Some(token) = tokens.next() {
            if !options_done {
                if token == "--" {
                    options_done = true;
                    continue;
                }
                if token == "-h" || token == "--help" {
                    let node = self.current().node;
                    debug!(command = %self.tree.command_line(node), "help requested");
                    return Ok(Outcome::Help(render_help(self.tree, node)));
                }
                if self.is_option_token(token) {
                    self.match_option(token, &mut tokens)?;
                    continue;
                }
            }
            self.match_bare(token)?;
        }

        self.check_complete()?;
        Ok(Outcome::Parsed(self.assemble()))
    }

    fn current(&self) -> &Frame {
        self.selected.last().unwrap_or(&self.root)
    }

    fn current_mut(&mut self) -> &mut Frame {
        match self.selected.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    /// `--anything`, or a single-dash token naming a declared short alias.
    /// Other single-dash tokens such as `-5` stay bare values.
    fn is_option_token(&self, token: &str) -> bool {
        if token.starts_with("--") {
            return true;
        }
        token.starts_with('-') && self.tree.node(self.current().node).find_option(token).is_some()
    }

    fn match_option<'a>(
        &mut self,
        token: &str,
        rest: &mut impl Iterator<Item = &'a str>,
    ) -> Result<(), ParseError> {
        let tree = self.tree;
        let node = tree.node(self.current().node);

        let Some((field, spelling)) = node.find_option(token) else {
            return Err(self.error(ParseErrorKind::UnknownOption {
                option: token.to_string(),
                valid: node.option_spellings(),
            }));
        };

        let value = match field.kind {
            FieldKind::Flag => Value::Bool(spelling == Spelling::Positive),
            _ => {
                let Some(raw) = rest.next() else {
                    return Err(self.error(ParseErrorKind::MissingValue {
                        option: token.to_string(),
                    }));
                };
                self.cast_value(field, token, raw)?
            }
        };

        debug!(option = token, field = %field.name, %value, "matched option");
        let frame = self.current_mut();
        if field.is_repeatable() {
            append(&mut frame.values, &field.name, value);
        } else {
            frame.values.insert(field.name.clone(), value);
        }
        Ok(())
    }

    fn match_bare(&mut self, token: &str) -> Result<(), ParseError> {
        let tree = self.tree;
        let frame = self.current();
        let node = tree.node(frame.node);

        if let Some(field) = node.positionals.get(frame.next_positional) {
            let value = self.cast_value(field, &field.cli_name, token)?;
            debug!(field = %field.name, %value, "matched positional");
            let frame = self.current_mut();
            if field.is_greedy() {
                append(&mut frame.values, &field.name, value);
            } else {
                frame.values.insert(field.name.clone(), value);
                frame.next_positional += 1;
            }
            return Ok(());
        }

        let Some(slot) = &node.subcommand else {
            return Err(self.error(ParseErrorKind::UnexpectedArgument {
                token: token.to_string(),
            }));
        };

        match slot.choices.get(token) {
            Some(child) => {
                debug!(subcommand = token, "descending into subcommand");
                self.selected.push(Frame::new(*child));
                Ok(())
            }
            None => Err(self.error(ParseErrorKind::UnknownSubcommand {
                token: token.to_string(),
                valid: slot.choices.keys().cloned().collect(),
            })),
        }
    }

    fn cast_value(
        &self,
        field: &FieldDescriptor,
        argument: &str,
        raw: &str,
    ) -> Result<Value, ParseError> {
        cast(&field.value_type, raw).map_err(|err| {
            self.error(match err {
                CastError::Mismatch { expected } => ParseErrorKind::TypeMismatch {
                    argument: argument.to_string(),
                    value: raw.to_string(),
                    expected,
                },
                CastError::NotAChoice { choices } => ParseErrorKind::InvalidChoice {
                    argument: argument.to_string(),
                    value: raw.to_string(),
                    choices,
                },
            })
        })
    }

    /// Checks required fields and slots, root first.
    fn check_complete(&self) -> Result<(), ParseError> {
        let leaf = self.current().node;
        for frame in std::iter::once(&self.root).chain(&self.selected) {
            let node = self.tree.node(frame.node);
            let missing = node
                .positionals
                .iter()
                .chain(node.options.values().filter(|field| field.required))
                .find(|field| !frame.values.contains_key(&field.name));

            if let Some(field) = missing {
                return Err(self.error_at(
                    frame.node,
                    ParseErrorKind::MissingArgument {
                        argument: field.cli_name.clone(),
                    },
                ));
            }

            match &node.subcommand {
                Some(slot) if frame.node == leaf => {
                    return Err(self.error_at(
                        frame.node,
                        ParseErrorKind::MissingSubcommand {
                            valid: slot.choices.keys().cloned().collect(),
                        },
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Fills defaults and nests every selected frame into its parent.
    fn assemble(self) -> ParsedCommand {
        let tree = self.tree;
        let mut child = None;
        for frame in self.selected.into_iter().rev() {
            child = Some(assemble_node(tree.node(frame.node), frame.values, child));
        }
        let root = assemble_node(tree.node(self.root.node), self.root.values, child);
        debug!(model = %root.model, fields = root.fields.len(), "assembled field map");
        root
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        self.error_at(self.current().node, kind)
    }

    fn error_at(&self, node: NodeId, kind: ParseErrorKind) -> ParseError {
        ParseError {
            command: self.tree.command_line(node),
            path: self.tree.path(node),
            kind,
            usage: usage(self.tree, node),
        }
    }
}

/// Builds one node's field map in declaration order.
fn assemble_node(
    node: &CommandNode,
    mut values: IndexMap<String, Value>,
    child: Option<ParsedCommand>,
) -> ParsedCommand {
    let mut parsed = ParsedCommand::new(&node.model);
    let mut child = child;
    let slot_field = node.subcommand.as_ref().map(|slot| slot.field.as_str());

    for name in node.field_names() {
        let value = if slot_field == Some(name.as_str()) {
            child.take().map(Value::Command)
        } else {
            values.shift_remove(name).or_else(|| default_for(node, name))
        };
        if let Some(value) = value {
            parsed.fields.insert(name.clone(), value);
        }
    }
    parsed
}

fn append(values: &mut IndexMap<String, Value>, field: &str, value: Value) {
    match values.get_mut(field) {
        Some(Value::List(items)) => items.push(value),
        _ => {
            values.insert(field.to_string(), Value::List(vec![value]));
        }
    }
}

fn default_for(node: &CommandNode, name: &str) -> Option<Value> {
    node.options
        .values()
        .find(|field| field.name == name)
        .and_then(|field| field.default.clone())
}
