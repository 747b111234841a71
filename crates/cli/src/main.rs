mod report;
mod schema;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use optline::{HelpFormatter, ParseSettings, parse_with};
use std::{fs, io, path::PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use crate::report::{CheckReport, ParseReport};
use crate::schema::{DEFAULT_SCHEMA_NAME, Schema};

#[derive(Parser)]
#[command(name = "optline")]
#[command(version, about = "Inspect and exercise optline option catalogs", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter optline.json
    Init(InitArgs),

    /// Validate a schema and report what it declares
    Check(CheckArgs),

    /// Print the help text a schema renders to
    Help(HelpArgs),

    /// Parse arguments against a schema
    Parse(ParseArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Target directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Program name recorded in the schema
    #[arg(short, long, default_value = "my-app")]
    name: String,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the schema
    #[arg(short, long, default_value = DEFAULT_SCHEMA_NAME, value_name = "FILE")]
    schema: PathBuf,

    /// Only output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct HelpArgs {
    /// Path to the schema
    #[arg(short, long, default_value = DEFAULT_SCHEMA_NAME, value_name = "FILE")]
    schema: PathBuf,

    /// Line width
    #[arg(long, default_value_t = optline::help::DEFAULT_WIDTH, value_name = "N")]
    width: usize,

    /// Generate the usage line from the declared options
    #[arg(long)]
    auto_usage: bool,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the schema
    #[arg(short, long, default_value = DEFAULT_SCHEMA_NAME, value_name = "FILE")]
    schema: PathBuf,

    /// Stop at the first positional argument
    #[arg(long)]
    stop_at_non_option: bool,

    /// Skip the required option and group checks
    #[arg(long)]
    no_required: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,

    /// Arguments to parse
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Check(args) => check_command(args),
        Commands::Help(args) => help_command(args),
        Commands::Parse(args) => parse_command(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let schema_path = dir.join(DEFAULT_SCHEMA_NAME);
    if schema_path.exists() {
        bail!("{DEFAULT_SCHEMA_NAME} already exists in {}", dir.display());
    }

    Schema::starter(&args.name).write(&schema_path)?;

    eprintln!("Created: {}", schema_path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_SCHEMA_NAME} to declare your options");
    eprintln!("  2. Run: optline help");
    eprintln!("  3. Run: optline parse -- -v input.txt");

    Ok(())
}

fn check_command(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let schema = Schema::from_file(&args.schema)?;
    let catalog = schema
        .to_catalog()
        .with_context(|| format!("invalid schema: {}", args.schema.display()))?;
    let report = CheckReport::new(schema.app_name(), &catalog);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Schema: {}", args.schema.display());
        println!(
            "OK: {} option(s), {} required, {} group(s)",
            report.options, report.required, report.groups
        );
    }
    Ok(())
}

fn help_command(args: HelpArgs) -> Result<()> {
    tracing::debug!("executing help command");

    let schema = Schema::from_file(&args.schema)?;
    let catalog = schema
        .to_catalog()
        .with_context(|| format!("invalid schema: {}", args.schema.display()))?;

    let text = HelpFormatter::new()
        .width(args.width)
        .header(schema.header.as_str())
        .footer(schema.footer.as_str())
        .auto_usage(args.auto_usage)
        .render(schema.app_name(), &schema.syntax, &catalog);
    print!("{text}");
    Ok(())
}

fn parse_command(args: ParseArgs) -> Result<()> {
    tracing::debug!(count = args.args.len(), "executing parse command");

    let schema = Schema::from_file(&args.schema)?;
    let catalog = schema
        .to_catalog()
        .with_context(|| format!("invalid schema: {}", args.schema.display()))?;

    let settings = ParseSettings::new()
        .stop_at_non_option(args.stop_at_non_option)
        .check_required(!args.no_required);

    let result = match parse_with(&catalog, &args.args, &settings) {
        Ok(result) => result,
        Err(err) => {
            tracing::debug!(kind = ?err.kind(), "parse failed");
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let report = ParseReport::new(&result);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
