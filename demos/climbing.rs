//! Climbing logbook example.
//!
//! A root model with a flag and two subcommands, built into a typed struct
//! through `serde`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argmodel-demos --example climbing -- climbers Ondra
//! cargo run -p argmodel-demos --example climbing -- -v routes Silbergeier --grade hard
//! cargo run -p argmodel-demos --example climbing -- routes --help
//! ```

use argmodel_core::{FieldSchema, ModelSchema, ParsedCommand, ValueType};
use argmodel_parser::{CliModel, ValidationError, construct_from_serde};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Routes {
    route_name: String,
    grade: String,
}

#[derive(Debug, Deserialize)]
struct Climbers {
    climber_name: String,
}

#[derive(Debug, Deserialize)]
enum Target {
    Routes(Routes),
    Climbers(Climbers),
}

/// Log your climbs.
#[derive(Debug, Deserialize)]
struct Climbing {
    verbose: bool,
    sub_command: Target,
}

impl CliModel for Climbing {
    fn schema() -> ModelSchema {
        let routes = ModelSchema::new("Routes")
            .with_doc("Manage routes.\n\nRoutes are identified by their name.")
            .with_field(FieldSchema::new("route_name", ValueType::Text).with_help("Name of the route"))
            .with_field(
                FieldSchema::new("grade", ValueType::choice(["easy", "hard"]))
                    .with_default("easy")
                    .with_help("How hard it felt"),
            );
        let climbers = ModelSchema::new("Climbers")
            .with_doc("Manage climbers.")
            .with_field(FieldSchema::new("climber_name", ValueType::Text).with_help("Who climbed"));

        ModelSchema::new("Climbing")
            .with_doc("Log your climbs.")
            .with_field(FieldSchema::flag("verbose", false).with_short('v').with_help("Talk more"))
            .with_field(
                FieldSchema::subcommand("sub_command", vec![routes, climbers])
                    .with_help("What to log"),
            )
    }

    fn construct(parsed: ParsedCommand) -> Result<Self, ValidationError> {
        construct_from_serde(&parsed)
    }
}

fn main() {
    let args: Climbing = argmodel_parser::run();

    if args.verbose {
        println!("{args:#?}");
    }
    match args.sub_command {
        Target::Routes(route) => println!("Logged route {} ({})", route.route_name, route.grade),
        Target::Climbers(climber) => println!("Logged climber {}", climber.climber_name),
    }
}
