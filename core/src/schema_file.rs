//! Versioned on-disk envelope for a model schema.
//!
//! # Example YAML
//!
//! ```yaml
//! schema_version: "1.0.0"
//! program: climb
//! parser:
//!   error_exit_code: 2
//! model:
//!   name: Climbing
//!   doc: Log your climbs.
//!   fields:
//!     - name: sub_command
//!       type:
//!         union:
//!           - name: Routes
//!             fields:
//!               - name: route_name
//!                 type: text
//!           - name: Climbers
//!             fields:
//!               - name: climber_name
//!                 type: text
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ModelSchema, ParserConfig};

/// Version of the schema file contract (semver).
///
/// Files with a different major version are rejected.
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// Errors raised while loading a [`SchemaFile`].
#[derive(Debug, Error)]
pub enum SchemaFileError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file declares an incompatible contract version.
    #[error("unsupported schema version {found} (expected {})", SCHEMA_CONTRACT_VERSION)]
    UnsupportedVersion { found: String },
}

/// A model schema together with the parser settings used to run it.
///
/// # Examples
///
/// ```
/// use argmodel_core::*;
///
/// let file = SchemaFile::from_yaml_str(r#"
/// program: greet
/// model:
///   name: Greet
///   fields:
///     - name: name
///       type: text
/// "#).unwrap();
///
/// assert_eq!(file.program_name(None), "greet");
/// assert_eq!(file.model.fields[0].value_type, ValueType::Text);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Contract version (defaults to [`SCHEMA_CONTRACT_VERSION`] when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Shorthand for `parser.program`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Parser settings.
    #[serde(default)]
    pub parser: ParserConfig,
    /// The root model.
    pub model: ModelSchema,
}

impl SchemaFile {
    /// Wraps a model with default settings.
    pub fn new(model: ModelSchema) -> Self {
        Self {
            schema_version: Some(SCHEMA_CONTRACT_VERSION.to_string()),
            program: None,
            parser: ParserConfig::default(),
            model,
        }
    }

    /// Loads a schema file, choosing JSON for `.json` files and YAML for
    /// everything else.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](SchemaFileError::IoError) if the file cannot be
    /// read, a JSON/YAML error if it cannot be parsed, or
    /// [`UnsupportedVersion`](SchemaFileError::UnsupportedVersion).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaFileError> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let file: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_reader(reader)?,
            _ => serde_yaml::from_reader(reader)?,
        };
        file.check_version()?;
        Ok(file)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaFileError> {
        let file: Self = serde_yaml::from_str(text)?;
        file.check_version()?;
        Ok(file)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaFileError> {
        let file: Self = serde_json::from_str(text)?;
        file.check_version()?;
        Ok(file)
    }

    /// Effective parser settings, with the top-level `program` applied.
    pub fn parser_config(&self) -> ParserConfig {
        let mut config = self.parser.clone();
        if let Some(program) = &self.program {
            config.program = Some(program.clone());
        }
        config
    }

    /// Resolves the program name shown in usage lines.
    pub fn program_name(&self, argv0: Option<&str>) -> String {
        self.parser_config().program_name(argv0)
    }

    fn check_version(&self) -> Result<(), SchemaFileError> {
        let Some(found) = &self.schema_version else {
            return Ok(());
        };
        if major(found) == major(SCHEMA_CONTRACT_VERSION) {
            Ok(())
        } else {
            Err(SchemaFileError::UnsupportedVersion {
                found: found.clone(),
            })
        }
    }
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version).trim()
}
