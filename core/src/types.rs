//! Model schema type definitions.
//!
//! A [`ModelSchema`] is the declarative input to the grammar builder: an
//! ordered list of [`FieldSchema`]s plus the model's own summary text. The
//! types derive [`serde`] so models can be written by hand in YAML or JSON
//! as well as built in code.

use serde::{Deserialize, Serialize};

use crate::naming::kebab_case;
use crate::value::Value;

/// Declared type of a model field.
///
/// # Examples
///
/// ```
/// use argmodel_core::ValueType;
///
/// let format = ValueType::Choice(vec!["json".into(), "yaml".into()]);
/// assert!(format.is_scalar());
/// assert!(!ValueType::Bool.is_scalar());
/// assert_eq!(ValueType::list(ValueType::Integer).type_name(), "list of integer");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free text, passed through unchanged.
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit floating point number.
    Float,
    /// Boolean, only ever set through `--name` / `--no-name`.
    Bool,
    /// One of a fixed set of string literals.
    Choice(Vec<String>),
    /// Repeated scalar values.
    List(#[serde(with = "serde_yaml::with::singleton_map")] Box<ValueType>),
    /// A scalar that may be absent (`null`).
    Optional(#[serde(with = "serde_yaml::with::singleton_map")] Box<ValueType>),
    /// Tagged union of nested models, compiled into subcommands.
    Union(Vec<ModelSchema>),
}

impl ValueType {
    /// Creates a list type with the given element type.
    pub fn list(element: ValueType) -> Self {
        Self::List(Box::new(element))
    }

    /// Creates an optional type with the given inner type.
    pub fn optional(inner: ValueType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Creates a choice type from string literals.
    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(options.into_iter().map(Into::into).collect())
    }

    /// Returns `true` for types cast from a single raw token.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Integer | Self::Float | Self::Choice(_)
        )
    }

    /// Human-readable name used in help output and error messages.
    pub fn type_name(&self) -> String {
        match self {
            Self::Text => "text".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Float => "float".to_string(),
            Self::Bool => "bool".to_string(),
            Self::Choice(options) => format!("one of: {}", options.join(", ")),
            Self::List(element) => format!("list of {}", element.type_name()),
            Self::Optional(inner) => format!("optional {}", inner.type_name()),
            Self::Union(members) => {
                let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
                format!("one of models: {}", names.join(", "))
            }
        }
    }

    /// Returns `true` if `value` is a legal default for this type.
    ///
    /// Integer literals are accepted for float fields; `null` only for
    /// optional fields.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Text, Value::Text(_)) => true,
            (Self::Integer, Value::Integer(_)) => true,
            (Self::Float, Value::Float(_) | Value::Integer(_)) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Choice(options), Value::Text(text)) => options.contains(text),
            (Self::List(element), Value::List(items)) => items.iter().all(|v| element.accepts(v)),
            (Self::Optional(_), Value::Null) => true,
            (Self::Optional(inner), other) => inner.accepts(other),
            _ => false,
        }
    }
}

/// Schema for one model field.
///
/// Use [`new`](FieldSchema::new) or one of the shorthand constructors, then
/// chain builder methods.
///
/// # Examples
///
/// ```
/// use argmodel_core::{FieldSchema, Value, ValueType};
///
/// let depth = FieldSchema::new("depth", ValueType::Integer)
///     .with_default(1)
///     .with_short('d')
///     .with_help("Clone depth");
/// assert_eq!(depth.default, Some(Value::Integer(1)));
///
/// let proceed = FieldSchema::flag("proceed", false);
/// assert_eq!(proceed.value_type, ValueType::Bool);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name as declared in the model (e.g. "repeat_count")
    pub name: String,
    /// Declared type, written as `text` or as a single-key map such as
    /// `{choice: [a, b]}` in both YAML and JSON
    #[serde(rename = "type", with = "serde_yaml::with::singleton_map")]
    pub value_type: ValueType,
    /// Default value; absent means the field is required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Documentation shown in help output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Single-character alias (e.g. 'v' for `-v`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
}

impl FieldSchema {
    /// Creates a required field of the given type.
    pub fn new(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            default: None,
            help: None,
            short: None,
        }
    }

    /// Creates a boolean flag with a default.
    pub fn flag(name: &str, default: bool) -> Self {
        Self::new(name, ValueType::Bool).with_default(default)
    }

    /// Creates a subcommand field from the union's member models.
    pub fn subcommand(name: &str, members: Vec<ModelSchema>) -> Self {
        Self::new(name, ValueType::Union(members))
    }

    /// Sets the default value, making the field optional on the command line.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Adds help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Adds a short alias.
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }
}

/// Declarative description of one model.
///
/// The model name doubles as the subcommand selector when the model is a
/// member of a union: it is converted with [`kebab_case`].
///
/// # Examples
///
/// ```
/// use argmodel_core::*;
///
/// let routes = ModelSchema::new("Routes")
///     .with_field(FieldSchema::new("route_name", ValueType::Text));
/// let climbers = ModelSchema::new("Climbers")
///     .with_field(FieldSchema::new("climber_name", ValueType::Text));
///
/// let root = ModelSchema::new("Climbing")
///     .with_field(FieldSchema::subcommand("sub_command", vec![routes, climbers]));
///
/// assert_eq!(root.subcommand_field().unwrap().name, "sub_command");
/// assert_eq!(root.token(), "climbing");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Model name (e.g. "CloneRepo")
    pub name: String,
    /// Summary documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl ModelSchema {
    /// Creates an empty model.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds summary documentation.
    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    /// Appends a field.
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Finds a field by declared name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the first field whose type is a union of models.
    pub fn subcommand_field(&self) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|f| matches!(f.value_type, ValueType::Union(_)))
    }

    /// Selector token used when this model is a subcommand.
    pub fn token(&self) -> String {
        kebab_case(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_accepts_defaults() {
        assert!(ValueType::Float.accepts(&Value::Integer(3)));
        assert!(!ValueType::Integer.accepts(&Value::Float(3.0)));
        assert!(ValueType::choice(["a", "b"]).accepts(&Value::from("a")));
        assert!(!ValueType::choice(["a", "b"]).accepts(&Value::from("c")));
        assert!(ValueType::optional(ValueType::Integer).accepts(&Value::Null));
        assert!(!ValueType::Integer.accepts(&Value::Null));
        assert!(
            ValueType::list(ValueType::Integer).accepts(&Value::List(vec![Value::Integer(9)]))
        );
    }

    #[test]
    fn test_model_schema_builder() {
        let model = ModelSchema::new("OptionalsModel")
            .with_doc("A model with only optionals.")
            .with_field(FieldSchema::new("value_1", ValueType::Integer).with_default(10))
            .with_field(FieldSchema::new("value_2", ValueType::Text).with_default("ABC"));

        assert_eq!(model.fields.len(), 2);
        assert_eq!(
            model.field("value_2").unwrap().default,
            Some(Value::Text("ABC".into()))
        );
        assert!(model.subcommand_field().is_none());
        assert_eq!(model.token(), "optionals-model");
    }

    #[test]
    fn test_field_schema_yaml_roundtrip_shape() {
        let yaml = r#"
name: format
type:
  choice: [json, yaml]
default: json
short: f
"#;
        let field: FieldSchema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(field.value_type, ValueType::choice(["json", "yaml"]));
        assert_eq!(field.default, Some(Value::Text("json".into())));
        assert_eq!(field.short, Some('f'));
    }

    #[test]
    fn test_field_schema_yaml_compound_types() {
        let yaml = r#"
- name: tags
  type:
    list: integer
  default: [1, 2]
- name: limit
  type:
    optional: float
- name: sub_command
  type:
    union:
      - name: Clone
        fields:
          - name: mode
            type:
              choice: [deep, shallow]
"#;
        let fields: Vec<FieldSchema> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(fields[0].value_type, ValueType::list(ValueType::Integer));
        assert_eq!(fields[1].value_type, ValueType::optional(ValueType::Float));
        let ValueType::Union(members) = &fields[2].value_type else {
            panic!("expected a union, got {:?}", fields[2].value_type);
        };
        assert_eq!(
            members[0].fields[0].value_type,
            ValueType::choice(["deep", "shallow"])
        );
    }

    #[test]
    fn test_field_schema_serializes_map_form() {
        let field = FieldSchema::new("format", ValueType::choice(["json", "yaml"]));
        let yaml = serde_yaml::to_string(&field).unwrap();
        assert!(yaml.contains("choice:"), "{yaml}");
        assert_eq!(serde_yaml::from_str::<FieldSchema>(&yaml).unwrap(), field);

        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], serde_json::json!({"choice": ["json", "yaml"]}));
        assert_eq!(serde_json::from_value::<FieldSchema>(json).unwrap(), field);
    }
}
