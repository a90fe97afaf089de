//! Typed values produced by casting command-line tokens.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A typed field value.
///
/// Serializes untagged, so a parsed command renders as a plain nested map
/// (`{"name": "alex", "repeat_count": 3}`).
///
/// # Examples
///
/// ```
/// use argmodel_core::Value;
///
/// assert_eq!(Value::from(3), Value::Integer(3));
/// assert_eq!(Value::from("alex").to_string(), "alex");
/// assert_eq!(Value::Null.to_string(), "none");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    /// Field map of the selected subcommand.
    #[serde(skip_deserializing)]
    Command(ParsedCommand),
}

impl Value {
    /// Short name of the value's shape, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Command(_) => "command",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&ParsedCommand> {
        match self {
            Self::Command(command) => Some(command),
            _ => None,
        }
    }

    /// Converts to JSON, representing subcommands externally tagged by model
    /// name (`{"Climbers": {"climber_name": "Ondra"}}`).
    pub fn to_tagged_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Integer(n) => serde_json::Value::from(*n),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Text(text) => serde_json::Value::String(text.clone()),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_tagged_json).collect())
            }
            Self::Command(command) => {
                let mut tagged = serde_json::Map::new();
                tagged.insert(command.model.clone(), command.to_tagged_json());
                serde_json::Value::Object(tagged)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "none"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(text) => write!(f, "{text}"),
            Self::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Self::Command(command) => write!(f, "{}", command.model),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<ParsedCommand> for Value {
    fn from(command: ParsedCommand) -> Self {
        Self::Command(command)
    }
}

/// The assembled field map of one command, in declaration order.
///
/// A subcommand field holds the selected child's own `ParsedCommand` as a
/// [`Value::Command`].
///
/// # Examples
///
/// ```
/// use argmodel_core::{ParsedCommand, Value};
///
/// let mut climbers = ParsedCommand::new("Climbers");
/// climbers.insert("climber_name", "Ondra");
///
/// let mut root = ParsedCommand::new("Climbing");
/// root.insert("sub_command", climbers);
///
/// assert_eq!(
///     serde_json::to_value(&root).unwrap(),
///     serde_json::json!({"sub_command": {"climber_name": "Ondra"}})
/// );
/// let (field, child) = root.subcommand().unwrap();
/// assert_eq!(field, "sub_command");
/// assert_eq!(child.model, "Climbers");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedCommand {
    /// Name of the model this map belongs to
    pub model: String,
    /// Field name → typed value
    pub fields: IndexMap<String, Value>,
}

impl ParsedCommand {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            fields: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the subcommand field name and the selected child, if any.
    pub fn subcommand(&self) -> Option<(&str, &ParsedCommand)> {
        self.fields
            .iter()
            .find_map(|(name, value)| value.as_command().map(|c| (name.as_str(), c)))
    }

    /// Converts to a JSON object with subcommands externally tagged by model
    /// name, the shape `serde` expects for an enum of models.
    pub fn to_tagged_json(&self) -> serde_json::Value {
        let object = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_tagged_json()))
            .collect();
        serde_json::Value::Object(object)
    }
}

impl Serialize for ParsedCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
