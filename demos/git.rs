//! Nested subcommands example.
//!
//! Two levels of subcommands with defaults at every level, plus a
//! hand-written `construct` that enforces a rule the grammar cannot express.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argmodel-demos --example git -- remote clone 11
//! cargo run -p argmodel-demos --example git -- remote --url https://other info --no-verbose
//! cargo run -p argmodel-demos --example git -- merge main --strategy ours
//! cargo run -p argmodel-demos --example git -- remote clone 0
//! ```

use argmodel_core::{FieldSchema, ModelSchema, ParsedCommand, ParserConfig, Value, ValueType};
use argmodel_parser::{CliModel, ValidationError};

#[derive(Debug)]
enum RemoteAction {
    Clone { depth: i64 },
    Info { verbose: bool },
}

#[derive(Debug)]
enum GitCommand {
    Remote { url: String, action: RemoteAction },
    Merge { branch: String, strategy: Option<String> },
}

fn text(parsed: &ParsedCommand, field: &str) -> Result<String, ValidationError> {
    parsed
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::new(format!("{field} must be text")))
}

fn subcommand<'a>(parsed: &'a ParsedCommand) -> Result<(&'a str, &'a ParsedCommand), ValidationError> {
    parsed
        .subcommand()
        .ok_or_else(|| ValidationError::new(format!("{} needs a subcommand", parsed.model)))
}

impl CliModel for GitCommand {
    fn schema() -> ModelSchema {
        let clone = ModelSchema::new("Clone")
            .with_doc("Clone a remote repository.")
            .with_field(FieldSchema::new("depth", ValueType::Integer).with_help("History depth"));
        let info = ModelSchema::new("Info")
            .with_doc("Show remote info.")
            .with_field(FieldSchema::flag("verbose", true).with_short('v'));
        let remote = ModelSchema::new("Remote")
            .with_doc("Manage remotes.")
            .with_field(FieldSchema::new("url", ValueType::Text).with_default("https://mysuperrepo"))
            .with_field(FieldSchema::subcommand("sub_command", vec![clone, info]));
        let merge = ModelSchema::new("Merge")
            .with_doc("Merge a branch into the current one.")
            .with_field(FieldSchema::new("branch", ValueType::Text))
            .with_field(FieldSchema::new(
                "strategy",
                ValueType::optional(ValueType::choice(["ours", "theirs"])),
            ));

        ModelSchema::new("MyGitModel")
            .with_doc("My custom git cli.")
            .with_field(FieldSchema::subcommand("sub_command", vec![remote, merge]))
    }

    fn construct(parsed: ParsedCommand) -> Result<Self, ValidationError> {
        let (_, command) = subcommand(&parsed)?;
        match command.model.as_str() {
            "Remote" => {
                let (_, action) = subcommand(command)?;
                let action = match action.model.as_str() {
                    "Clone" => {
                        let depth = action.get("depth").and_then(Value::as_i64).unwrap_or_default();
                        if depth < 1 {
                            return Err(ValidationError::new("depth must be at least 1"));
                        }
                        RemoteAction::Clone { depth }
                    }
                    _ => RemoteAction::Info {
                        verbose: action.get("verbose").and_then(Value::as_bool).unwrap_or(true),
                    },
                };
                Ok(GitCommand::Remote {
                    url: text(command, "url")?,
                    action,
                })
            }
            _ => Ok(GitCommand::Merge {
                branch: text(command, "branch")?,
                strategy: command.get("strategy").and_then(Value::as_str).map(str::to_string),
            }),
        }
    }
}

fn main() {
    let command: GitCommand = argmodel_parser::run_with(ParserConfig::default().with_program("git"));
    println!("{command:#?}");
}
