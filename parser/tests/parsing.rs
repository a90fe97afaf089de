use argmodel_core::{FieldSchema, ModelSchema, ParsedCommand, Value, ValueType};
use argmodel_parser::{Outcome, ParseError, ParseErrorKind, Parser};

fn git() -> ModelSchema {
    let info = ModelSchema::new("Info")
        .with_doc("Show remote info.")
        .with_field(FieldSchema::flag("verbose", true).with_help("Print everything"));
    let clone = ModelSchema::new("Clone")
        .with_doc("Clone a remote repository.")
        .with_field(FieldSchema::new("depth", ValueType::Integer));
    let remote = ModelSchema::new("Remote")
        .with_doc("Manage remotes.")
        .with_field(FieldSchema::new("url", ValueType::Text).with_default("https://mysuperrepo"))
        .with_field(FieldSchema::subcommand("sub_command", vec![clone, info]));
    let merge = ModelSchema::new("Merge")
        .with_doc("Merge a branch.")
        .with_field(FieldSchema::new("branch", ValueType::Text));
    ModelSchema::new("MyGitModel")
        .with_doc("My custom git cli.")
        .with_field(FieldSchema::subcommand("sub_command", vec![remote, merge]))
}

fn climbing() -> ModelSchema {
    let routes = ModelSchema::new("Routes")
        .with_doc("Manage routes.")
        .with_field(FieldSchema::new("route_name", ValueType::Text))
        .with_field(
            FieldSchema::new("grade", ValueType::choice(["easy", "hard"])).with_default("easy"),
        );
    let climbers = ModelSchema::new("Climbers")
        .with_doc("Manage climbers.")
        .with_field(FieldSchema::new("climber_name", ValueType::Text));
    ModelSchema::new("Climbing")
        .with_doc("Log your climbs.")
        .with_field(FieldSchema::flag("verbose", false).with_short('v'))
        .with_field(FieldSchema::subcommand("sub_command", vec![routes, climbers]))
}

fn parse(model: &ModelSchema, args: &[&str]) -> Result<Outcome<ParsedCommand>, ParseError> {
    Parser::new("app", model).unwrap().parse(args)
}

fn parsed(model: &ModelSchema, args: &[&str]) -> ParsedCommand {
    match parse(model, args).unwrap() {
        Outcome::Parsed(parsed) => parsed,
        Outcome::Help(text) => panic!("unexpected help:\n{text}"),
    }
}

fn error(model: &ModelSchema, args: &[&str]) -> ParseError {
    parse(model, args).unwrap_err()
}

fn sub(parsed: &ParsedCommand) -> &ParsedCommand {
    parsed
        .get("sub_command")
        .and_then(Value::as_command)
        .expect("sub_command should hold a command")
}

#[test]
fn test_climbing_end_to_end() {
    let result = parsed(&climbing(), &["climbers", "Ondra"]);
    assert_eq!(result.model, "Climbing");
    assert_eq!(result.get("verbose"), Some(&Value::Bool(false)));

    let climbers = sub(&result);
    assert_eq!(climbers.model, "Climbers");
    assert_eq!(climbers.get("climber_name"), Some(&Value::from("Ondra")));
    assert_eq!(
        result.to_tagged_json(),
        serde_json::json!({
            "verbose": false,
            "sub_command": {"Climbers": {"climber_name": "Ondra"}}
        })
    );
}

#[test]
fn test_root_options_before_selector() {
    let result = parsed(&climbing(), &["-v", "routes", "Silbergeier"]);
    assert_eq!(result.get("verbose"), Some(&Value::Bool(true)));
    let routes = sub(&result);
    assert_eq!(routes.get("route_name"), Some(&Value::from("Silbergeier")));
    assert_eq!(routes.get("grade"), Some(&Value::from("easy")));
}

#[test]
fn test_options_address_the_current_command() {
    // once a subcommand is selected, root options are no longer reachable
    let err = error(&climbing(), &["routes", "Silbergeier", "--verbose"]);
    assert_eq!(err.path, vec!["routes"]);
    assert!(matches!(err.kind, ParseErrorKind::UnknownOption { ref option, .. } if option == "--verbose"));
}

#[test]
fn test_nested_subcommands() {
    let result = parsed(&git(), &["merge", "main"]);
    assert_eq!(sub(&result).get("branch"), Some(&Value::from("main")));

    let result = parsed(&git(), &["remote", "info"]);
    let remote = sub(&result);
    assert_eq!(remote.get("url"), Some(&Value::from("https://mysuperrepo")));
    assert_eq!(sub(remote).get("verbose"), Some(&Value::Bool(true)));

    let result = parsed(&git(), &["remote", "info", "--no-verbose"]);
    assert_eq!(sub(sub(&result)).get("verbose"), Some(&Value::Bool(false)));

    let result = parsed(&git(), &["remote", "clone", "11"]);
    assert_eq!(sub(sub(&result)).get("depth"), Some(&Value::Integer(11)));
}

#[test]
fn test_nested_keyword_between_selectors() {
    let result = parsed(&git(), &["remote", "--url", "https://other", "clone", "1"]);
    let remote = sub(&result);
    assert_eq!(remote.get("url"), Some(&Value::from("https://other")));
    assert_eq!(sub(remote).model, "Clone");
}

#[test]
fn test_field_order_is_declaration_order() {
    let result = parsed(&git(), &["remote", "clone", "1"]);
    let remote = sub(&result);
    assert_eq!(
        remote.fields.keys().collect::<Vec<_>>(),
        vec!["url", "sub_command"]
    );
}

#[test]
fn test_subcommands_are_exclusive() {
    let err = error(&git(), &["merge", "main", "remote"]);
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedArgument {
            token: "remote".to_string()
        }
    );
    assert_eq!(err.command, "app merge");
}

#[test]
fn test_unknown_subcommand() {
    let err = error(&climbing(), &["boulders"]);
    assert_eq!(
        err.kind,
        ParseErrorKind::UnknownSubcommand {
            token: "boulders".to_string(),
            valid: vec!["routes".to_string(), "climbers".to_string()],
        }
    );
    assert_eq!(
        err.render(),
        "usage: app [-h] [--[no-]verbose] {routes,climbers} ...\n\
         app: error: invalid subcommand `boulders` (choose from: routes, climbers)\n"
    );
}

#[test]
fn test_missing_subcommand() {
    let err = error(&climbing(), &[]);
    assert!(matches!(err.kind, ParseErrorKind::MissingSubcommand { .. }));

    let err = error(&git(), &["remote"]);
    assert_eq!(err.command, "app remote");
    assert_eq!(
        err.kind,
        ParseErrorKind::MissingSubcommand {
            valid: vec!["clone".to_string(), "info".to_string()]
        }
    );
}

#[test]
fn test_missing_positional_in_subcommand() {
    let err = error(&climbing(), &["climbers"]);
    assert_eq!(err.path, vec!["climbers"]);
    assert_eq!(
        err.kind,
        ParseErrorKind::MissingArgument {
            argument: "climber-name".to_string()
        }
    );
}

#[test]
fn test_invalid_choice() {
    let err = error(&climbing(), &["routes", "Silbergeier", "--grade", "medium"]);
    assert_eq!(
        err.to_string(),
        "argument `--grade`: invalid choice `medium` (choose from: easy, hard)"
    );
}

#[test]
fn test_choice_positional() {
    let model = ModelSchema::new("ModelWithChoice")
        .with_field(FieldSchema::new("choice", ValueType::choice(["option1", "option2"])));
    assert_eq!(parsed(&model, &["option1"]).get("choice"), Some(&Value::from("option1")));
    assert!(matches!(
        error(&model, &["wrong_options"]).kind,
        ParseErrorKind::InvalidChoice { .. }
    ));
}

#[test]
fn test_flag_any_position() {
    let model = ModelSchema::new("M")
        .with_field(FieldSchema::new("name", ValueType::Text))
        .with_field(FieldSchema::flag("proceed", true));
    for args in [["--no-proceed", "x"], ["x", "--no-proceed"]] {
        let result = parsed(&model, &args);
        assert_eq!(result.get("proceed"), Some(&Value::Bool(false)));
        assert_eq!(result.get("name"), Some(&Value::from("x")));
    }
    assert_eq!(parsed(&model, &["x"]).get("proceed"), Some(&Value::Bool(true)));
}

#[test]
fn test_float_accepts_integer_default() {
    let model = ModelSchema::new("M")
        .with_field(FieldSchema::new("ratio", ValueType::Float).with_default(1));
    assert_eq!(parsed(&model, &[]).get("ratio"), Some(&Value::Float(1.0)));
    assert_eq!(parsed(&model, &["--ratio", "0.5"]).get("ratio"), Some(&Value::Float(0.5)));
}

#[test]
fn test_empty_argv_with_only_defaults() {
    let model = ModelSchema::new("M")
        .with_field(FieldSchema::new("level", ValueType::Integer).with_default(1))
        .with_field(FieldSchema::flag("quiet", false));
    let result = parsed(&model, &[]);
    assert_eq!(result.get("level"), Some(&Value::Integer(1)));
    assert_eq!(result.get("quiet"), Some(&Value::Bool(false)));
}

#[test]
fn test_empty_model() {
    let model = ModelSchema::new("Empty");
    assert!(parsed(&model, &[]).fields.is_empty());
    assert!(matches!(
        error(&model, &["anything"]).kind,
        ParseErrorKind::UnexpectedArgument { .. }
    ));
}

#[test]
fn test_unknown_option_lists_valid_spellings() {
    let model = ModelSchema::new("M").with_field(FieldSchema::flag("proceed", true));
    let err = error(&model, &["--proceeed"]);
    assert_eq!(
        err.to_string(),
        "unrecognized option `--proceeed` (valid options: --proceed, --no-proceed, --help)"
    );
}

#[test]
fn test_help_for_selected_subcommand() {
    let outcome = parse(&git(), &["remote", "--help"]).unwrap();
    let help = outcome.help_text().unwrap();
    assert!(help.starts_with("usage: app remote [-h] [--url URL] {clone,info} ...\n"));
    assert!(help.contains("Manage remotes."));

    let parser = Parser::new("app", &git()).unwrap();
    assert_eq!(parser.help_for(&["remote"]).as_deref(), Some(help));
}

#[test]
fn test_help_is_idempotent() {
    let parser = Parser::new("app", &git()).unwrap();
    let first = parser.parse(["-h"]).unwrap();
    let second = parser.parse(["-h"]).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.help_text(), Some(parser.help().as_str()));
}

#[test]
fn test_help_after_error_token_is_not_reached() {
    let err = error(&git(), &["push", "-h"]);
    assert!(matches!(err.kind, ParseErrorKind::UnknownSubcommand { .. }));
}

#[test]
fn test_double_dash_makes_tokens_bare() {
    let model = ModelSchema::new("M")
        .with_field(FieldSchema::new("items", ValueType::list(ValueType::Text)));
    let result = parsed(&model, &["a", "--", "--b", "-h"]);
    assert_eq!(result.get("items"), Some(&Value::from(vec!["a", "--b", "-h"])));
}

#[test]
fn test_parse_is_repeatable() {
    let parser = Parser::new("climb", &climbing()).unwrap();
    let args = ["routes", "Silbergeier"];
    assert_eq!(parser.parse(args).unwrap(), parser.parse(args).unwrap());
}
