//! Naming rules shared by the grammar builder and the help renderer.
//!
//! Field spellings only turn underscores into dashes, so `value1` stays
//! `--value1`. Subcommand tokens come from model names and go through
//! [`kebab_case`]: PascalCase/camelCase boundaries and underscores become
//! dashes and everything is lowercased. A letter followed by a digit is split
//! as well, so `Step2` becomes `step-2`.

use regex::Regex;
use std::sync::LazyLock;

static LETTER_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z])([0-9])").expect("static regex must compile"));

static LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("static regex must compile"));

/// Converts a declared name into its kebab-case command-line spelling.
///
/// # Examples
///
/// ```
/// use argmodel_core::kebab_case;
///
/// assert_eq!(kebab_case("repeat_count"), "repeat-count");
/// assert_eq!(kebab_case("CloneRepo"), "clone-repo");
/// assert_eq!(kebab_case("Routes"), "routes");
/// assert_eq!(kebab_case("Step2"), "step-2");
/// ```
pub fn kebab_case(name: &str) -> String {
    let split = LETTER_DIGIT.replace_all(name, "${1}-${2}");
    let split = LOWER_UPPER.replace_all(&split, "${1}-${2}");
    split.replace('_', "-").to_lowercase()
}

/// Command-line spelling of a field name, without any leading dashes.
///
/// ```
/// use argmodel_core::field_spelling;
///
/// assert_eq!(field_spelling("repeat_count"), "repeat-count");
/// assert_eq!(field_spelling("value1"), "value1");
/// ```
pub fn field_spelling(field: &str) -> String {
    field.replace('_', "-")
}

/// Returns the `--long` spelling of a keyword or flag field.
pub fn long_name(field: &str) -> String {
    format!("--{}", field_spelling(field))
}

/// Returns the `--no-long` spelling that sets a flag to `false`.
pub fn negated_long_name(field: &str) -> String {
    format!("--no-{}", field_spelling(field))
}

/// Returns the placeholder shown after a keyword in usage lines
/// (`repeat_count` → `REPEAT_COUNT`).
pub fn metavar(field: &str) -> String {
    field.replace('-', "_").to_uppercase()
}
