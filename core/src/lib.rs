//! Core model schema primitives for typed command-line grammars.
//!
//! This crate defines the declarative side of `argmodel`:
//!
//! - [`ModelSchema`]: a named data model with ordered fields and a summary.
//! - [`FieldSchema`]: one field with its name, [`ValueType`], optional default, help
//!   text and an optional short alias.
//! - [`Value`] / [`ParsedCommand`]: typed values produced by parsing, nested
//!   per subcommand.
//! - [`introspect`]: classifies fields into [`FieldDescriptor`]s
//!   (positional, keyword, flag, subcommand).
//! - [`validate_model`]: catches schema mistakes such as two subcommand
//!   fields in one model, before any argument is read.
//! - [`SchemaFile`]: a versioned YAML/JSON envelope for loading models from
//!   disk.
//!
//! # Example
//!
//! ```
//! use argmodel_core::*;
//!
//! let model = ModelSchema::new("Greet")
//!     .with_doc("Say hello.")
//!     .with_field(FieldSchema::new("name", ValueType::Text).with_help("Who to greet"))
//!     .with_field(FieldSchema::new("repeat_count", ValueType::Integer).with_default(10));
//!
//! assert!(validate_model(&model).is_empty());
//!
//! let description = introspect(&model).unwrap();
//! assert_eq!(description.fields[0].kind, FieldKind::Positional);
//! assert_eq!(description.fields[1].cli_name, "--repeat-count");
//! ```

mod config;
mod introspect;
mod naming;
mod schema_file;
mod types;
mod validate;
mod value;

pub use config::{DEFAULT_CONFIG_EXIT_CODE, DEFAULT_ERROR_EXIT_CODE, DEFAULT_PROGRAM, ParserConfig};
pub use introspect::{FieldDescriptor, FieldKind, ModelDescription, describe, introspect};
pub use naming::{field_spelling, kebab_case, long_name, metavar, negated_long_name};
pub use schema_file::{SCHEMA_CONTRACT_VERSION, SchemaFile, SchemaFileError};
pub use types::*;
pub use validate::{ConfigError, validate_model};
pub use value::{ParsedCommand, Value};
