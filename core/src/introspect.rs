//! Schema introspection: classifies model fields into command-line roles.
//!
//! Classification rules:
//!
//! | declared type          | default | kind                               |
//! |------------------------|---------|------------------------------------|
//! | union of models        | never   | [`FieldKind::Subcommand`]          |
//! | bool                   | yes/no  | [`FieldKind::Flag`]                |
//! | optional scalar        | implied | [`FieldKind::Keyword`]             |
//! | any other              | no      | [`FieldKind::Positional`]          |
//! | any other              | yes     | [`FieldKind::Keyword`]             |
//!
//! A boolean without a default becomes a *required* flag since booleans are
//! never cast from text. An optional scalar without an explicit default
//! defaults to `null`.

use crate::naming::{field_spelling, long_name, negated_long_name};
use crate::validate::{ConfigError, validate_model};
use crate::{FieldSchema, ModelSchema, Value, ValueType};

/// Command-line role of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Matched by position, always required.
    Positional,
    /// `--name VALUE`.
    Keyword,
    /// `--name` / `--no-name`.
    Flag,
    /// Selects one member of a union of models.
    Subcommand,
}

/// Static per-field metadata derived from a [`FieldSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Declared field name; key of the parsed field map
    pub name: String,
    pub kind: FieldKind,
    pub value_type: ValueType,
    /// `true` iff no default applies
    pub required: bool,
    /// Typed default, present iff not required
    pub default: Option<Value>,
    pub help_text: String,
    /// `--kebab-name` for keywords and flags, `kebab-name` otherwise
    pub cli_name: String,
    /// `-x` alias, if declared
    pub short: Option<String>,
}

impl FieldDescriptor {
    /// `--no-name` spelling for flags.
    pub fn negated_name(&self) -> Option<String> {
        (self.kind == FieldKind::Flag).then(|| negated_long_name(&self.name))
    }

    /// `-no-x` spelling for flags with a short alias.
    pub fn negated_short(&self) -> Option<String> {
        if self.kind != FieldKind::Flag {
            return None;
        }
        self.short
            .as_ref()
            .map(|short| format!("-no-{}", short.trim_start_matches('-')))
    }

    /// Positional list that consumes every remaining bare token.
    pub fn is_greedy(&self) -> bool {
        self.kind == FieldKind::Positional && matches!(self.value_type, ValueType::List(_))
    }

    /// Keyword that may be repeated, each occurrence appending a value.
    pub fn is_repeatable(&self) -> bool {
        self.kind == FieldKind::Keyword && matches!(self.value_type, ValueType::List(_))
    }

    /// Union member models of a subcommand field.
    pub fn members(&self) -> &[ModelSchema] {
        match &self.value_type {
            ValueType::Union(members) => members,
            _ => &[],
        }
    }
}

/// Introspected view of one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescription {
    /// Declared model name
    pub name: String,
    /// Selector token when used as a subcommand
    pub token: String,
    /// Summary documentation, possibly empty
    pub summary: String,
    /// Field descriptors in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl ModelDescription {
    pub fn positionals(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Positional)
    }

    pub fn options(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::Keyword | FieldKind::Flag))
    }

    pub fn subcommand(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.kind == FieldKind::Subcommand)
    }
}

/// Validates `model` and classifies its fields.
///
/// Union members are validated as part of this call but only described
/// shallowly; callers recurse through [`FieldDescriptor::members`].
///
/// # Errors
///
/// Returns the first [`ConfigError`] found in the model or any nested member.
///
/// # Examples
///
/// ```
/// use argmodel_core::*;
///
/// let model = ModelSchema::new("Info").with_field(FieldSchema::flag("verbose", true));
/// let description = introspect(&model).unwrap();
///
/// let verbose = &description.fields[0];
/// assert_eq!(verbose.kind, FieldKind::Flag);
/// assert_eq!(verbose.negated_name().as_deref(), Some("--no-verbose"));
/// assert_eq!(verbose.default, Some(Value::Bool(true)));
/// ```
pub fn introspect(model: &ModelSchema) -> Result<ModelDescription, ConfigError> {
    if let Some(error) = validate_model(model).into_iter().next() {
        return Err(error);
    }
    Ok(describe(model))
}

/// Classifies the fields of a model that has already been validated.
pub fn describe(model: &ModelSchema) -> ModelDescription {
    ModelDescription {
        name: model.name.clone(),
        token: model.token(),
        summary: model.doc.as_deref().unwrap_or_default().trim().to_string(),
        fields: model.fields.iter().map(describe_field).collect(),
    }
}

fn describe_field(field: &FieldSchema) -> FieldDescriptor {
    let default = effective_default(field);
    let kind = match (&field.value_type, &default) {
        (ValueType::Union(_), _) => FieldKind::Subcommand,
        (ValueType::Bool, _) => FieldKind::Flag,
        (_, None) => FieldKind::Positional,
        (_, Some(_)) => FieldKind::Keyword,
    };

    let cli_name = match kind {
        FieldKind::Keyword | FieldKind::Flag => long_name(&field.name),
        FieldKind::Positional | FieldKind::Subcommand => field_spelling(&field.name),
    };

    FieldDescriptor {
        name: field.name.clone(),
        kind,
        value_type: field.value_type.clone(),
        required: default.is_none(),
        default,
        help_text: field.help.clone().unwrap_or_default(),
        cli_name,
        short: field.short.map(|c| format!("-{c}")),
    }
}

/// Applies the implicit `null` default of optional fields and widens integer
/// literals given for float fields.
fn effective_default(field: &FieldSchema) -> Option<Value> {
    match (&field.value_type, &field.default) {
        (ValueType::Optional(_), None) => Some(Value::Null),
        (ValueType::Float, Some(Value::Integer(n))) => Some(Value::Float(*n as f64)),
        (ValueType::Optional(inner), Some(Value::Integer(n))) if **inner == ValueType::Float => {
            Some(Value::Float(*n as f64))
        }
        (ValueType::List(inner), Some(Value::List(items))) if **inner == ValueType::Float => {
            Some(Value::List(
                items
                    .iter()
                    .map(|v| match v {
                        Value::Integer(n) => Value::Float(*n as f64),
                        other => other.clone(),
                    })
                    .collect(),
            ))
        }
        (_, default) => default.clone(),
    }
}
