//! Model schema validation.
//!
//! Catches schema mistakes that make a model unusable as a command-line
//! grammar: several subcommand fields in one model, defaults on subcommand
//! fields, defaults that do not match their declared type, clashing names and
//! so on. These are programming errors in the schema, reported before any
//! argument is read.
//!
//! # Examples
//!
//! ```
//! use argmodel_core::*;
//!
//! let ok = ModelSchema::new("Greet").with_field(FieldSchema::new("name", ValueType::Text));
//! assert!(validate_model(&ok).is_empty());
//!
//! // Two union fields in the same model
//! let bad = ModelSchema::new("Git")
//!     .with_field(FieldSchema::subcommand("first", vec![ModelSchema::new("A")]))
//!     .with_field(FieldSchema::subcommand("second", vec![ModelSchema::new("B")]));
//! let errors = validate_model(&bad);
//! assert!(matches!(errors[0], ConfigError::MultipleSubcommands { .. }));
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::naming::field_spelling;
use crate::{FieldSchema, ModelSchema, ValueType};

/// Build-time schema errors.
///
/// Each variant names the model (as a `Root > Child` path) and field at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Model name is empty or whitespace-only.
    #[error("model name cannot be empty (at {path})")]
    EmptyModelName { path: String },
    /// Field name is empty or whitespace-only.
    #[error("{model}: field name cannot be empty")]
    EmptyFieldName { model: String },
    /// Two fields share a command-line spelling.
    #[error("{model}: duplicate field `{field}`")]
    DuplicateField { model: String, field: String },
    /// Field name collides with the built-in `--help`.
    #[error("{model}: field `{field}` collides with the built-in --help")]
    ReservedName { model: String, field: String },
    /// Short alias is not a single ASCII letter or digit, or is `h`.
    #[error("{model}: invalid short alias `-{short}` on field `{field}`")]
    InvalidShort {
        model: String,
        field: String,
        short: char,
    },
    /// Two fields share a short alias.
    #[error("{model}: duplicate short alias `-{short}`")]
    DuplicateShort { model: String, short: char },
    /// A field is spelled like the `--no-` form of a flag in the same model.
    #[error("{model}: field `{field}` collides with `--no-` form of flag `{flag}`")]
    NegationClash {
        model: String,
        flag: String,
        field: String,
    },
    /// More than one field is a union of models.
    #[error("{model}: only one subcommand field is allowed, found {}", fields.join(", "))]
    MultipleSubcommands { model: String, fields: Vec<String> },
    /// A subcommand field declares a default.
    #[error("{model}: subcommand field `{field}` cannot have a default")]
    SubcommandDefault { model: String, field: String },
    /// A subcommand field has no member models.
    #[error("{model}: subcommand field `{field}` has no member models")]
    EmptyUnion { model: String, field: String },
    /// Two union members map to the same selector token.
    #[error("{model}: duplicate subcommand `{token}`")]
    DuplicateSubcommand { model: String, token: String },
    /// A choice field has no options.
    #[error("{model}: choice field `{field}` has no options")]
    EmptyChoice { model: String, field: String },
    /// A default does not fit the declared type.
    #[error("{model}: default `{found}` of field `{field}` is not a valid {expected}")]
    InvalidDefault {
        model: String,
        field: String,
        expected: String,
        found: String,
    },
    /// A list or optional wraps something other than a scalar.
    #[error("{model}: field `{field}` must wrap a text, integer, float or choice type")]
    UnsupportedElement { model: String, field: String },
    /// A required list positional is followed by other positionals.
    #[error("{model}: list argument `{field}` must be the last positional argument")]
    GreedyPositionalNotLast { model: String, field: String },
    /// A required list positional shares its model with a subcommand.
    #[error("{model}: list argument `{field}` cannot be combined with a subcommand")]
    GreedyPositionalWithSubcommand { model: String, field: String },
}

/// Validates a model and, recursively, every union member.
///
/// Returns every problem found, in declaration order.
pub fn validate_model(model: &ModelSchema) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let mut path = Vec::new();
    validate_recursive(model, &mut path, &mut errors);
    errors
}

fn validate_recursive(model: &ModelSchema, path: &mut Vec<String>, errors: &mut Vec<ConfigError>) {
    if model.name.trim().is_empty() {
        let at = if path.is_empty() {
            "<root>".to_string()
        } else {
            path.join(" > ")
        };
        errors.push(ConfigError::EmptyModelName { path: at });
        return;
    }

    path.push(model.name.clone());
    let model_path = path.join(" > ");

    validate_fields(model, &model_path, errors);

    for field in &model.fields {
        if let ValueType::Union(members) = &field.value_type {
            for member in members {
                validate_recursive(member, path, errors);
            }
        }
    }

    path.pop();
}

fn validate_fields(model: &ModelSchema, model_path: &str, errors: &mut Vec<ConfigError>) {
    let mut seen_names = HashSet::new();
    let mut seen_shorts = HashSet::new();
    let mut subcommands = Vec::new();

    for field in &model.fields {
        if field.name.trim().is_empty() {
            errors.push(ConfigError::EmptyFieldName {
                model: model_path.to_string(),
            });
            continue;
        }

        let spelling = field_spelling(&field.name);
        if spelling == "help" || spelling == "no-help" {
            errors.push(ConfigError::ReservedName {
                model: model_path.to_string(),
                field: field.name.clone(),
            });
        }
        if !seen_names.insert(spelling) {
            errors.push(ConfigError::DuplicateField {
                model: model_path.to_string(),
                field: field.name.clone(),
            });
        }

        if let Some(short) = field.short {
            if !short.is_ascii_alphanumeric() || short == 'h' {
                errors.push(ConfigError::InvalidShort {
                    model: model_path.to_string(),
                    field: field.name.clone(),
                    short,
                });
            } else if !seen_shorts.insert(short) {
                errors.push(ConfigError::DuplicateShort {
                    model: model_path.to_string(),
                    short,
                });
            }
        }

        if matches!(field.value_type, ValueType::Union(_)) {
            subcommands.push(field.name.clone());
        }

        validate_field_type(field, model_path, errors);
    }

    if subcommands.len() > 1 {
        errors.push(ConfigError::MultipleSubcommands {
            model: model_path.to_string(),
            fields: subcommands.clone(),
        });
    }

    validate_negations(model, model_path, errors);
    validate_greedy_positional(model, model_path, !subcommands.is_empty(), errors);
}

/// Every flag also owns its `no-<name>` spelling; no other field may take it.
fn validate_negations(model: &ModelSchema, model_path: &str, errors: &mut Vec<ConfigError>) {
    for flag in model.fields.iter().filter(|f| f.value_type == ValueType::Bool) {
        let negated = format!("no-{}", field_spelling(&flag.name));
        for other in model.fields.iter().filter(|f| field_spelling(&f.name) == negated) {
            errors.push(ConfigError::NegationClash {
                model: model_path.to_string(),
                flag: flag.name.clone(),
                field: other.name.clone(),
            });
        }
    }
}

fn validate_field_type(field: &FieldSchema, model_path: &str, errors: &mut Vec<ConfigError>) {
    match &field.value_type {
        ValueType::Union(members) => {
            if field.default.is_some() {
                errors.push(ConfigError::SubcommandDefault {
                    model: model_path.to_string(),
                    field: field.name.clone(),
                });
            }
            if members.is_empty() {
                errors.push(ConfigError::EmptyUnion {
                    model: model_path.to_string(),
                    field: field.name.clone(),
                });
            }
            let mut tokens = HashSet::new();
            for member in members {
                let token = member.token();
                if !token.is_empty() && !tokens.insert(token.clone()) {
                    errors.push(ConfigError::DuplicateSubcommand {
                        model: model_path.to_string(),
                        token,
                    });
                }
            }
            return;
        }
        ValueType::List(inner) | ValueType::Optional(inner) if !inner.is_scalar() => {
            errors.push(ConfigError::UnsupportedElement {
                model: model_path.to_string(),
                field: field.name.clone(),
            });
            return;
        }
        _ => {}
    }

    if choice_options(&field.value_type).is_some_and(<[String]>::is_empty) {
        errors.push(ConfigError::EmptyChoice {
            model: model_path.to_string(),
            field: field.name.clone(),
        });
        return;
    }

    let Some(default) = &field.default else {
        return;
    };
    if !field.value_type.accepts(default) {
        errors.push(ConfigError::InvalidDefault {
            model: model_path.to_string(),
            field: field.name.clone(),
            expected: field.value_type.type_name(),
            found: default.to_string(),
        });
    }
}

fn choice_options(value_type: &ValueType) -> Option<&[String]> {
    match value_type {
        ValueType::Choice(options) => Some(options),
        ValueType::List(inner) | ValueType::Optional(inner) => choice_options(inner),
        _ => None,
    }
}

/// A list field without a default swallows every remaining bare token of its
/// command, so nothing positional may follow it.
fn validate_greedy_positional(
    model: &ModelSchema,
    model_path: &str,
    has_subcommand: bool,
    errors: &mut Vec<ConfigError>,
) {
    let positionals: Vec<&FieldSchema> = model
        .fields
        .iter()
        .filter(|f| f.default.is_none())
        .filter(|f| !matches!(f.value_type, ValueType::Bool | ValueType::Union(_) | ValueType::Optional(_)))
        .collect();

    for (index, field) in positionals.iter().enumerate() {
        if !matches!(field.value_type, ValueType::List(_)) {
            continue;
        }
        if has_subcommand {
            errors.push(ConfigError::GreedyPositionalWithSubcommand {
                model: model_path.to_string(),
                field: field.name.clone(),
            });
        } else if index + 1 != positionals.len() {
            errors.push(ConfigError::GreedyPositionalNotLast {
                model: model_path.to_string(),
                field: field.name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_rejects_multiple_subcommands() {
        let model = ModelSchema::new("Root")
            .with_field(FieldSchema::subcommand("one", vec![ModelSchema::new("A")]))
            .with_field(FieldSchema::subcommand("two", vec![ModelSchema::new("B")]));

        assert_eq!(
            validate_model(&model),
            vec![ConfigError::MultipleSubcommands {
                model: "Root".to_string(),
                fields: vec!["one".to_string(), "two".to_string()],
            }]
        );
    }

    #[test]
    fn test_rejects_subcommand_default() {
        let mut field = FieldSchema::subcommand("cmd", vec![ModelSchema::new("A")]);
        field.default = Some(Value::Text("a".into()));
        let model = ModelSchema::new("Root").with_field(field);

        assert_eq!(
            validate_model(&model),
            vec![ConfigError::SubcommandDefault {
                model: "Root".to_string(),
                field: "cmd".to_string(),
            }]
        );
    }

    #[test]
    fn test_reports_nested_model_path() {
        let clone = ModelSchema::new("Clone")
            .with_field(FieldSchema::new("depth", ValueType::Integer).with_default("deep"));
        let model = ModelSchema::new("Git").with_field(FieldSchema::subcommand("cmd", vec![clone]));

        assert_eq!(
            validate_model(&model),
            vec![ConfigError::InvalidDefault {
                model: "Git > Clone".to_string(),
                field: "depth".to_string(),
                expected: "integer".to_string(),
                found: "deep".to_string(),
            }]
        );
    }

    #[test]
    fn test_rejects_choice_default_outside_set() {
        let model = ModelSchema::new("Root").with_field(
            FieldSchema::new("choice", ValueType::choice(["option1", "option2"]))
                .with_default("option3"),
        );
        let errors = validate_model(&model);
        assert!(matches!(errors[0], ConfigError::InvalidDefault { .. }));
    }

    #[test]
    fn test_rejects_duplicate_and_reserved_shorts() {
        let model = ModelSchema::new("Root")
            .with_field(FieldSchema::flag("verbose", false).with_short('v'))
            .with_field(FieldSchema::new("value", ValueType::Integer).with_default(1).with_short('v'))
            .with_field(FieldSchema::flag("hidden", false).with_short('h'));

        let errors = validate_model(&model);
        assert_eq!(
            errors,
            vec![
                ConfigError::DuplicateShort {
                    model: "Root".to_string(),
                    short: 'v',
                },
                ConfigError::InvalidShort {
                    model: "Root".to_string(),
                    field: "hidden".to_string(),
                    short: 'h',
                },
            ]
        );
    }

    #[test]
    fn test_rejects_fields_with_same_spelling() {
        let model = ModelSchema::new("Root")
            .with_field(FieldSchema::new("dry_run", ValueType::Text))
            .with_field(FieldSchema::new("dry-run", ValueType::Text));
        assert!(matches!(
            validate_model(&model)[0],
            ConfigError::DuplicateField { .. }
        ));
    }

    #[test]
    fn test_rejects_field_spelled_like_negated_flag() {
        let model = ModelSchema::new("Root")
            .with_field(FieldSchema::new("no_verbose", ValueType::Text).with_default("y"))
            .with_field(FieldSchema::flag("verbose", true));
        assert_eq!(
            validate_model(&model),
            vec![ConfigError::NegationClash {
                model: "Root".to_string(),
                flag: "verbose".to_string(),
                field: "no_verbose".to_string(),
            }]
        );

        let flags = ModelSchema::new("Root")
            .with_field(FieldSchema::flag("cache", true))
            .with_field(FieldSchema::flag("no_cache", false));
        assert!(matches!(
            validate_model(&flags)[0],
            ConfigError::NegationClash { ref field, .. } if field == "no_cache"
        ));
    }

    #[test]
    fn test_rejects_help_field() {
        let model = ModelSchema::new("Root").with_field(FieldSchema::flag("help", false));
        assert!(matches!(
            validate_model(&model)[0],
            ConfigError::ReservedName { .. }
        ));
    }

    #[test]
    fn test_rejects_greedy_positional_before_other_positionals() {
        let model = ModelSchema::new("Root")
            .with_field(FieldSchema::new("items", ValueType::list(ValueType::Integer)))
            .with_field(FieldSchema::new("name", ValueType::Text));
        assert_eq!(
            validate_model(&model),
            vec![ConfigError::GreedyPositionalNotLast {
                model: "Root".to_string(),
                field: "items".to_string(),
            }]
        );
    }

    #[test]
    fn test_rejects_duplicate_subcommand_tokens() {
        let model = ModelSchema::new("Root").with_field(FieldSchema::subcommand(
            "cmd",
            vec![ModelSchema::new("CloneRepo"), ModelSchema::new("clone_repo")],
        ));
        assert_eq!(
            validate_model(&model),
            vec![ConfigError::DuplicateSubcommand {
                model: "Root".to_string(),
                token: "clone-repo".to_string(),
            }]
        );
    }

    #[test]
    fn test_accepts_empty_model() {
        assert!(validate_model(&ModelSchema::new("Noop")).is_empty());
    }
}
