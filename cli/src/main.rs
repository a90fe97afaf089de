use std::path::{Path, PathBuf};

use argmodel_core::{SchemaFile, validate_model};
use argmodel_parser::{Outcome, Parser as ModelParser};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Output format for parsed field maps.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argmodel")]
#[command(about = "Parse command lines against declarative model schemas")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log parser internals to stderr.
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse arguments against a schema file and print the field map.
    Parse(ParseArgs),
    /// Print help for the root command or a subcommand path.
    Help(HelpArgs),
    /// Check a schema file for configuration errors.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (YAML, or JSON with a `.json` extension).
    #[arg(long)]
    schema: PathBuf,
    /// Program name shown in usage lines (overrides the schema file).
    #[arg(long)]
    program: Option<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to parse, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Schema file (YAML, or JSON with a `.json` extension).
    #[arg(long)]
    schema: PathBuf,
    /// Subcommand selector tokens, e.g. `remote info`.
    path: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema file (YAML, or JSON with a `.json` extension).
    #[arg(long)]
    schema: PathBuf,
}

/// A failed subcommand: what to print on stderr and the exit status.
#[derive(Debug)]
struct Failure {
    message: String,
    code: i32,
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self {
            message: format!("error: {message}"),
            code: 1,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args).map_err(Failure::from),
        Command::Validate(args) => run_validate(args).map_err(Failure::from),
    };

    if let Err(failure) = result {
        eprintln!("{}", failure.message.trim_end());
        std::process::exit(failure.code);
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = if debug {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_schema(path: &Path) -> Result<SchemaFile, String> {
    let file = SchemaFile::load(path).map_err(|e| format!("{}: {e}", path.display()))?;
    debug!(schema = %path.display(), model = %file.model.name, "loaded schema file");
    Ok(file)
}

fn run_parse(args: ParseArgs) -> Result<(), Failure> {
    let file = load_schema(&args.schema)?;
    let mut config = file.parser_config();
    if let Some(program) = args.program {
        config = config.with_program(&program);
    }

    let parser = match ModelParser::from_config(config.clone(), None, &file.model) {
        Ok(parser) => parser,
        Err(err) => {
            return Err(Failure {
                message: format!("error: invalid model: {err}"),
                code: config.config_exit_code,
            });
        }
    };

    match parser.parse(&args.args) {
        Ok(Outcome::Help(text)) => {
            print!("{text}");
            Ok(())
        }
        Ok(Outcome::Parsed(parsed)) => {
            info!(model = %parsed.model, "parsed arguments");
            let rendered = match args.format {
                CliOutputFormat::Json => serde_json::to_string_pretty(&parsed)
                    .map(|json| json + "\n")
                    .map_err(|e| e.to_string())?,
                CliOutputFormat::Yaml => serde_yaml::to_string(&parsed).map_err(|e| e.to_string())?,
            };
            print!("{rendered}");
            Ok(())
        }
        Err(err) => {
            debug!(path = ?err.path, "parse failed");
            Err(Failure {
                message: err.render(),
                code: config.error_exit_code,
            })
        }
    }
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let file = load_schema(&args.schema)?;
    let parser = ModelParser::from_config(file.parser_config(), None, &file.model)
        .map_err(|e| format!("invalid model: {e}"))?;

    let help = parser.help_for(&args.path).ok_or_else(|| {
        format!(
            "no subcommand at `{}` (usage: {})",
            args.path.join(" "),
            parser.usage().trim_start_matches("usage: ")
        )
    })?;
    print!("{help}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let file = load_schema(&args.schema)?;
    let errors = validate_model(&file.model);
    if errors.is_empty() {
        println!("Model `{}` is valid.", file.model.name);
        return Ok(());
    }

    for err in &errors {
        warn!(%err, "configuration error");
        println!("  {err}");
    }
    Err(format!(
        "{} configuration error(s) in {}",
        errors.len(),
        args.schema.display()
    ))
}
