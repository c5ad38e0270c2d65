use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cmdtree_catalog::{CatalogConfig, load_tree};
use cmdtree_core::{
    ClassifyConfig, Command as CatalogCommand, CommandTree, Invocation, MissingValuePolicy,
    parse_with, render_help, render_tree,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmdtree")]
#[command(about = "Inspect command catalogs and parse invocations against them")]
#[command(version, disable_help_subcommand = true)]
struct Cli {
    /// Enable debug logging on stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a token list against a catalog and print the result.
    Parse(ParseArgs),
    /// Load a catalog and check it for authoring mistakes.
    Validate(CatalogArgs),
    /// Print the command tree of a catalog.
    Tree(CatalogArgs),
    /// Print help for a command in a catalog.
    Help(HelpArgs),
}

/// Where the catalog comes from: a catalog file, a config file, or both.
#[derive(Debug, Args)]
#[group(required = true, multiple = true)]
struct CatalogArgs {
    /// Catalog file (.json, .yaml or .yml).
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// YAML config naming the catalog and classifier settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    source: CatalogArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Drop a trailing long option with no value instead of failing.
    #[arg(long)]
    lenient_long_options: bool,
    /// Tokens to parse, starting with the root command name.
    #[arg(last = true, required = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    #[command(flatten)]
    source: CatalogArgs,
    /// Subcommand path beneath the root (empty for the root itself).
    path: Vec<String>,
}

/// What `parse` prints.
#[derive(Debug, Serialize)]
struct ParseReport {
    path: Vec<String>,
    help_requested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
    invocation: Invocation,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Validate(args) => run_validate(args),
        Command::Tree(args) => run_tree(args),
        Command::Help(args) => run_help(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let (tree, mut config) = load_source(&args.source)?;
    if args.lenient_long_options {
        config.long_option_policy = MissingValuePolicy::Ignore;
    }
    debug!(tokens = args.tokens.len(), ?config, "parsing invocation");

    let parsed = parse_with(&args.tokens, &tree, &config).map_err(|err| err.to_string())?;
    let help_requested = parsed.invocation.help_requested();
    let help = parsed
        .wants_help(&tree)
        .then(|| render_help(&parsed.command));

    let report = ParseReport {
        path: parsed.path,
        help_requested,
        help,
        invocation: parsed.invocation,
    };
    print!("{}", format_output(&report, args.format)?);
    Ok(())
}

fn run_validate(args: CatalogArgs) -> Result<(), String> {
    let (tree, _) = load_source(&args)?;
    println!(
        "Catalog for '{}' is valid: {} command(s).",
        tree.root.name,
        count_commands(&tree.root)
    );
    Ok(())
}

fn run_tree(args: CatalogArgs) -> Result<(), String> {
    let (tree, _) = load_source(&args)?;
    print!("{}", render_tree(&tree.root));
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let (tree, _) = load_source(&args.source)?;
    let node = tree.root.descendant(&args.path).ok_or_else(|| {
        format!(
            "no command '{}' in catalog for '{}'",
            args.path.join(" "),
            tree.root.name
        )
    })?;
    print!("{}", render_help(&tree.effective_command(node)));
    Ok(())
}

/// Loads the catalog named on the command line, falling back to the one named
/// in the config file. `--catalog` wins when both are given.
fn load_source(args: &CatalogArgs) -> Result<(CommandTree, ClassifyConfig), String> {
    let config = match &args.config {
        Some(path) => Some(
            CatalogConfig::load(path)
                .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        ),
        None => None,
    };

    let catalog_path = match (&args.catalog, &config) {
        (Some(path), _) => path.clone(),
        (None, Some(config)) => config.catalog_path(),
        (None, None) => return Err("either --catalog or --config is required".to_string()),
    };

    let tree = load_tree(&catalog_path)
        .map_err(|err| format!("Failed to load '{}': {err}", catalog_path.display()))?;
    let classify = config.map(|c| c.classify).unwrap_or_default();
    Ok((tree, classify))
}

fn count_commands(command: &CatalogCommand) -> usize {
    1 + command.subcommands.iter().map(count_commands).sum::<usize>()
}

fn format_output<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|err| format!("Failed to serialize output: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|err| format!("Failed to serialize output: {err}")),
    }
}
