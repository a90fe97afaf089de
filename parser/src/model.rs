//! The seam between parsing and model construction.
//!
//! The parser only casts tokens; building the final typed object and any
//! semantic validation (ranges, cross-field rules) belongs to the model. A
//! rejection is surfaced to the user verbatim.

use argmodel_core::{ModelSchema, ParsedCommand};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A rejection from model construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A type that can be populated from the command line.
///
/// `schema` registers the fields; `construct` receives the casted field map
/// and builds the value, rejecting anything its own rules forbid.
///
/// # Examples
///
/// ```
/// use argmodel_core::*;
/// use argmodel_parser::{CliModel, ValidationError, construct_from_serde};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Greet {
///     name: String,
///     repeat_count: i64,
/// }
///
/// impl CliModel for Greet {
///     fn schema() -> ModelSchema {
///         ModelSchema::new("Greet")
///             .with_field(FieldSchema::new("name", ValueType::Text))
///             .with_field(FieldSchema::new("repeat_count", ValueType::Integer).with_default(10))
///     }
///
///     fn construct(parsed: ParsedCommand) -> Result<Self, ValidationError> {
///         construct_from_serde(&parsed)
///     }
/// }
///
/// let greet = argmodel_parser::parse::<Greet, _, _>("greet", ["alex"])
///     .unwrap()
///     .into_parsed()
///     .unwrap();
/// assert_eq!(greet, Greet { name: "alex".into(), repeat_count: 10 });
/// ```
pub trait CliModel: Sized {
    /// Declarative description of the model's fields.
    fn schema() -> ModelSchema;

    /// Builds the model from a parsed field map.
    fn construct(parsed: ParsedCommand) -> Result<Self, ValidationError>;
}

/// Builds `T` through `serde`, with subcommands externally tagged by model
/// name so that an `enum` whose variants are named after the member models
/// deserializes directly.
///
/// # Errors
///
/// Returns the deserializer's message as a [`ValidationError`].
pub fn construct_from_serde<T: DeserializeOwned>(parsed: &ParsedCommand) -> Result<T, ValidationError> {
    serde_json::from_value(parsed.to_tagged_json()).map_err(|err| ValidationError::new(err.to_string()))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct CloneArgs {
        depth: i64,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    enum Sub {
        Clone(CloneArgs),
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Remote {
        url: String,
        sub_command: Sub,
    }

    #[test]
    fn test_serde_constructs_tagged_subcommands() {
        let mut clone = ParsedCommand::new("Clone");
        clone.insert("depth", 11);
        let mut remote = ParsedCommand::new("Remote");
        remote.insert("url", "https://mysuperrepo");
        remote.insert("sub_command", clone);

        let built: Remote = construct_from_serde(&remote).unwrap();
        assert_eq!(
            built,
            Remote {
                url: "https://mysuperrepo".into(),
                sub_command: Sub::Clone(CloneArgs { depth: 11 }),
            }
        );
    }

    #[test]
    fn test_serde_rejection_is_surfaced() {
        let mut clone = ParsedCommand::new("Clone");
        clone.insert("depth", "deep");
        let err = construct_from_serde::<CloneArgs>(&clone).unwrap_err();
        assert!(err.message.contains("invalid type"), "{}", err.message);
    }
}
