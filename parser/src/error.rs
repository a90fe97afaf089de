//! Parse and top-level error types.

use argmodel_core::{ConfigError, ParserConfig};
use thiserror::Error;

use crate::model::ValidationError;

/// What went wrong while matching tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A `-`/`--` token that names no option of the current command.
    #[error("unrecognized option `{option}` (valid options: {})", valid.join(", "))]
    UnknownOption { option: String, valid: Vec<String> },
    /// A selector token that names no subcommand of the current command.
    #[error("invalid subcommand `{token}` (choose from: {})", valid.join(", "))]
    UnknownSubcommand { token: String, valid: Vec<String> },
    /// A bare token left over once every positional is filled.
    #[error("unexpected argument `{token}`")]
    UnexpectedArgument { token: String },
    /// A keyword was the last token.
    #[error("option `{option}` expects a value")]
    MissingValue { option: String },
    /// Text that cannot be cast to the declared type.
    #[error("argument `{argument}`: invalid {expected} value `{value}`")]
    TypeMismatch {
        argument: String,
        value: String,
        expected: String,
    },
    /// Text outside a choice set; the choice form of a type mismatch.
    #[error("argument `{argument}`: invalid choice `{value}` (choose from: {})", choices.join(", "))]
    InvalidChoice {
        argument: String,
        value: String,
        choices: Vec<String>,
    },
    /// A required positional or flag never matched.
    #[error("missing required argument `{argument}`")]
    MissingArgument { argument: String },
    /// A subcommand slot with no selector token.
    #[error("missing subcommand (choose from: {})", valid.join(", "))]
    MissingSubcommand { valid: Vec<String> },
}

/// A failure while matching argv against the command tree.
///
/// Carries the command path at which matching stopped and that command's
/// usage line, so the message can be reported with a usage reminder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// Program name followed by the selector tokens consumed so far
    pub command: String,
    /// Selector tokens consumed so far
    pub path: Vec<String>,
    pub kind: ParseErrorKind,
    /// Usage line of the command where the error occurred
    pub usage: String,
}

impl ParseError {
    /// Usage reminder plus `<command>: error: <message>`.
    pub fn render(&self) -> String {
        format!("{}\n{}: error: {}\n", self.usage, self.command, self.kind)
    }
}

/// Any failure from building, parsing or constructing a model.
#[derive(Debug, Error)]
pub enum Error {
    /// The model is malformed; a programming error in the schema.
    #[error("invalid model: {0}")]
    Config(#[from] ConfigError),
    /// The arguments do not match the grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The collaborator rejected the assembled field map.
    #[error("{source}")]
    Validation {
        command: String,
        usage: String,
        #[source]
        source: ValidationError,
    },
}

impl Error {
    /// Exit status for this error under `config`.
    pub fn exit_code(&self, config: &ParserConfig) -> i32 {
        match self {
            Self::Config(_) => config.config_exit_code,
            Self::Parse(_) | Self::Validation { .. } => config.error_exit_code,
        }
    }

    /// Message suitable for stderr, with a usage reminder where one applies.
    pub fn render(&self) -> String {
        match self {
            Self::Config(err) => format!("error: invalid model: {err}\n"),
            Self::Parse(err) => err.render(),
            Self::Validation {
                command,
                usage,
                source,
            } => format!("{usage}\n{command}: error: {source}\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_render() {
        let err = ParseError {
            command: "climb".to_string(),
            path: Vec::new(),
            kind: ParseErrorKind::UnknownSubcommand {
                token: "boulders".to_string(),
                valid: vec!["routes".to_string(), "climbers".to_string()],
            },
            usage: "usage: climb [-h] {routes,climbers} ...".to_string(),
        };
        assert_eq!(
            err.render(),
            "usage: climb [-h] {routes,climbers} ...\n\
             climb: error: invalid subcommand `boulders` (choose from: routes, climbers)\n"
        );
    }

    #[test]
    fn test_exit_codes() {
        let config = ParserConfig::default();
        let config_err = Error::Config(ConfigError::EmptyModelName {
            path: "<root>".to_string(),
        });
        assert_eq!(config_err.exit_code(&config), 1);

        let validation = Error::Validation {
            command: "app".to_string(),
            usage: "usage: app [-h]".to_string(),
            source: ValidationError::new("value too large"),
        };
        assert_eq!(validation.exit_code(&config), 2);
        assert_eq!(validation.to_string(), "value too large");
    }
}
