//! Argument parsing driven by declarative model schemas.
//!
//! A [`ModelSchema`] is compiled once into a [`CommandTree`]; argv is then
//! matched against the tree, producing either a [`ParsedCommand`] or rendered
//! help. Typed construction goes through [`CliModel`].
//!
//! # Examples
//!
//! ```
//! use argmodel_core::*;
//! use argmodel_parser::{Outcome, Parser};
//!
//! let model = ModelSchema::new("Greet")
//!     .with_field(FieldSchema::new("name", ValueType::Text))
//!     .with_field(FieldSchema::new("repeat_count", ValueType::Integer).with_default(10));
//! let parser = Parser::new("greet", &model).unwrap();
//!
//! let Outcome::Parsed(parsed) = parser.parse(["alex", "--repeat-count", "3"]).unwrap() else {
//!     panic!("expected a parsed command");
//! };
//! assert_eq!(parsed.get("repeat_count"), Some(&Value::Integer(3)));
//!
//! let err = parser.parse(["alex", "--repeat-count", "three"]).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "argument `--repeat-count`: invalid integer value `three`"
//! );
//! ```

pub mod cast;
mod error;
pub mod help;
mod matcher;
mod model;
mod tree;

pub use error::{Error, ParseError, ParseErrorKind};
pub use matcher::Outcome;
pub use model::{CliModel, ValidationError, construct_from_serde};
pub use tree::{CommandNode, CommandTree, NodeId, Spelling, SubcommandSlot};

use argmodel_core::{ConfigError, ModelSchema, ParsedCommand, ParserConfig};
use tracing::debug;

/// A compiled command tree plus the configuration it reports errors with.
#[derive(Debug, Clone)]
pub struct Parser {
    tree: CommandTree,
    config: ParserConfig,
}

impl Parser {
    /// Validates `model` and compiles its command tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in the model.
    pub fn new(program: &str, model: &ModelSchema) -> Result<Self, ConfigError> {
        Ok(Self {
            tree: CommandTree::build(program, model)?,
            config: ParserConfig::default(),
        })
    }

    /// Builds a parser from a configuration, resolving the program name
    /// against `argv0` when the configuration does not fix one.
    pub fn from_config(
        config: ParserConfig,
        argv0: Option<&str>,
        model: &ModelSchema,
    ) -> Result<Self, ConfigError> {
        let program = config.program_name(argv0);
        Ok(Self::new(&program, model)?.with_config(config))
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Matches `args` (program name excluded).
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] in token order; missing required
    /// arguments are reported after every token has been consumed.
    pub fn parse<I, S>(&self, args: I) -> Result<Outcome<ParsedCommand>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<S> = args.into_iter().collect();
        debug!(program = self.tree.program(), args = args.len(), "parsing arguments");
        matcher::match_args(&self.tree, &args)
    }

    /// Help text of the root command.
    pub fn help(&self) -> String {
        help::render_help(&self.tree, self.tree.root())
    }

    /// Help text of the command at a selector path, if the path exists.
    pub fn help_for<S: AsRef<str>>(&self, path: &[S]) -> Option<String> {
        self.tree
            .find(path)
            .map(|id| help::render_help(&self.tree, id))
    }

    /// Usage line of the root command.
    pub fn usage(&self) -> String {
        help::usage(&self.tree, self.tree.root())
    }

    /// Parses and hands the field map to `M::construct`.
    ///
    /// # Errors
    ///
    /// Parse failures as [`Error::Parse`], rejections from the model as
    /// [`Error::Validation`].
    pub fn parse_model<M, I, S>(&self, args: I) -> Result<Outcome<M>, Error>
    where
        M: CliModel,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.parse(args)? {
            Outcome::Help(text) => Ok(Outcome::Help(text)),
            Outcome::Parsed(parsed) => {
                let selected = self.selected_node(&parsed);
                M::construct(parsed)
                    .map(Outcome::Parsed)
                    .map_err(|source| Error::Validation {
                        command: self.tree.command_line(selected),
                        usage: help::usage(&self.tree, selected),
                        source,
                    })
            }
        }
    }

    /// Deepest node selected in a parsed command.
    fn selected_node(&self, parsed: &ParsedCommand) -> NodeId {
        let mut current = self.tree.root();
        let mut command = parsed;
        while let Some((_, child)) = command.subcommand() {
            let next = self.tree.node(current).subcommand.as_ref().and_then(|slot| {
                slot.choices
                    .values()
                    .copied()
                    .find(|id| self.tree.node(*id).model == child.model)
            });
            let Some(next) = next else {
                break;
            };
            current = next;
            command = child;
        }
        current
    }
}

/// Builds a parser for `M` and parses `args` into it.
///
/// # Errors
///
/// See [`Error`]; a malformed schema surfaces as [`Error::Config`].
pub fn parse<M, I, S>(program: &str, args: I) -> Result<Outcome<M>, Error>
where
    M: CliModel,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Parser::new(program, &M::schema())?.parse_model(args)
}

/// Parses the process arguments into `M` with the default configuration.
///
/// Prints help to stdout and exits with status 0 when help is requested.
/// Prints the rendered error to stderr and exits with the configured status
/// on failure.
pub fn run<M: CliModel>() -> M {
    run_with(ParserConfig::default())
}

/// [`run`] with an explicit configuration.
pub fn run_with<M: CliModel>(config: ParserConfig) -> M {
    let mut argv = std::env::args();
    let argv0 = argv.next();
    let args: Vec<String> = argv.collect();

    let result = Parser::from_config(config.clone(), argv0.as_deref(), &M::schema())
        .map_err(Error::from)
        .and_then(|parser| parser.parse_model::<M, _, _>(&args));

    match result {
        Ok(Outcome::Parsed(model)) => model,
        Ok(Outcome::Help(text)) => {
            print!("{text}");
            std::process::exit(0);
        }
        Err(err) => {
            eprint!("{}", err.render());
            std::process::exit(err.exit_code(&config));
        }
    }
}
