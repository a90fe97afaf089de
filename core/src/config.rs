//! Parser behaviour settings.

use serde::{Deserialize, Serialize};

/// Exit code used when a parse or validation error is reported.
pub const DEFAULT_ERROR_EXIT_CODE: i32 = 2;

/// Exit code used when the model itself is malformed.
pub const DEFAULT_CONFIG_EXIT_CODE: i32 = 1;

/// Program name used when neither the config nor `argv[0]` provides one.
pub const DEFAULT_PROGRAM: &str = "app";

/// Settings shared by the parser and the `argmodel` binary.
///
/// Every field has a default, so an empty YAML mapping is a valid config.
///
/// # Examples
///
/// ```
/// use argmodel_core::ParserConfig;
///
/// let config: ParserConfig = serde_yaml::from_str("program: climb").unwrap();
/// assert_eq!(config.program.as_deref(), Some("climb"));
/// assert_eq!(config.error_exit_code, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Program name shown in usage lines (defaults to `argv[0]`'s file name).
    pub program: Option<String>,
    /// Exit status for parse and validation errors.
    pub error_exit_code: i32,
    /// Exit status for configuration errors in the model.
    pub config_exit_code: i32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            program: None,
            error_exit_code: DEFAULT_ERROR_EXIT_CODE,
            config_exit_code: DEFAULT_CONFIG_EXIT_CODE,
        }
    }
}

impl ParserConfig {
    /// Sets the program name.
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = Some(program.to_string());
        self
    }

    /// Resolves the program name, falling back to the file name of `argv0`.
    pub fn program_name(&self, argv0: Option<&str>) -> String {
        if let Some(program) = &self.program {
            return program.clone();
        }
        argv0
            .map(|path| {
                path.rsplit(['/', '\\'])
                    .next()
                    .unwrap_or(path)
                    .to_string()
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string())
    }
}
