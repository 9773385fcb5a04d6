//! dimexpand Command Line Interface
//!
//! Expand dimension-agnostic notation and browse the identity library.
//!
//! # Usage
//!
//! ```bash
//! # Expand notation
//! dimexpand_cli expand "sum(Dim^2) = r^2" -d 3 -p "r=5"
//!
//! # Expand a named identity with an override
//! dimexpand_cli identity Torus -d 3 -p "R=4"
//!
//! # List identities with 2D/3D previews
//! dimexpand_cli identities --verbose
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use dimexpand::{
    parse_param_list, IdentityDefinition, IdentityLibrary, LibraryConfig, Params,
    TemplateExpander,
};

#[derive(Parser)]
#[command(name = "dimexpand_cli")]
#[command(version)]
#[command(about = "Expand dimension-agnostic equation notation")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    format: OutputFormat,

    /// Extra identity YAML directory
    #[arg(long, global = true, env = "DIMEXPAND_IDENTITY_DIR")]
    identity_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a notation string
    Expand {
        /// Notation, e.g. "sum(Dim^2) = r^2"
        notation: String,

        /// Number of axes (default from DIMEXPAND_DEFAULT_DIMENSION, else 2)
        #[arg(short, long)]
        dimension: Option<usize>,

        /// Parameters, e.g. "a=2, r=5"
        #[arg(short, long)]
        params: Option<String>,
    },

    /// Expand a named identity
    Identity {
        /// Identity name, e.g. "Circle/Sphere"
        name: String,

        #[arg(short, long)]
        dimension: Option<usize>,

        /// Overrides for the identity defaults
        #[arg(short, long)]
        params: Option<String>,
    },

    /// List available identities
    Identities {
        /// Show defaults, descriptions and 2D/3D previews
        #[arg(long)]
        verbose: bool,
    },
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = LibraryConfig::from_env()?;
    if cli.identity_dir.is_some() {
        config.identity_dir = cli.identity_dir;
    }

    match cli.command {
        Commands::Expand {
            notation,
            dimension,
            params,
        } => cmd_expand(
            &notation,
            dimension.unwrap_or(config.default_dimension),
            params.as_deref(),
            cli.format,
        ),
        Commands::Identity {
            name,
            dimension,
            params,
        } => cmd_identity(
            &config,
            &name,
            dimension.unwrap_or(config.default_dimension),
            params.as_deref(),
            cli.format,
        ),
        Commands::Identities { verbose } => cmd_identities(&config, verbose, cli.format),
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_expand(
    notation: &str,
    dimension: usize,
    params: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let params = read_params(params)?;
    let expanded = TemplateExpander::new().expand(notation, dimension, &params)?;

    print_expansion(notation, dimension, &params, &expanded, format)
}

fn cmd_identity(
    config: &LibraryConfig,
    name: &str,
    dimension: usize,
    params: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let library = config.load_library()?;
    let overrides = read_params(params)?;
    let expanded =
        TemplateExpander::new().expand_identity(&library, name, dimension, &overrides)?;

    // Report the parameters actually used, defaults included
    let used = library
        .get(name)
        .map(|def| def.merged_params(&overrides))
        .unwrap_or(overrides);

    print_expansion(name, dimension, &used, &expanded, format)
}

fn cmd_identities(config: &LibraryConfig, verbose: bool, format: OutputFormat) -> Result<()> {
    let library = config.load_library()?;
    let expander = TemplateExpander::new();

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = library
                .iter()
                .map(|def| {
                    serde_json::json!({
                        "name": def.name,
                        "expr": def.notation,
                        "params": def.params,
                        "description": def.description,
                        "min_dim": def.min_dim,
                        "preview_2d": preview(&expander, &library, def, 2),
                        "preview_3d": preview(&expander, &library, def, 3),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("JSON serialization failed")?
            );
        }
        OutputFormat::Text => {
            println!(
                "{}",
                format!("{} identities", library.len()).cyan().bold()
            );
            println!();

            for def in library.iter() {
                let dim_tag = if def.min_dim > 1 {
                    format!("[{}D+]", def.min_dim).yellow()
                } else {
                    "[nD]".dimmed()
                };
                println!("  {} {}", def.name.green().bold(), dim_tag);
                println!("    {}", def.notation);

                if verbose {
                    if !def.description.is_empty() {
                        println!("    {}", def.description.dimmed());
                    }
                    if !def.params.is_empty() {
                        println!("    Defaults: {}", describe_params(&def.params));
                    }
                    for dimension in [2, 3] {
                        if let Some(text) = preview(&expander, &library, def, dimension) {
                            println!("    {}D: {}", dimension, text.blue());
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn read_params(raw: Option<&str>) -> Result<Params> {
    match raw {
        Some(raw) => Ok(parse_param_list(raw)?),
        None => Ok(Params::new()),
    }
}

fn print_expansion(
    source: &str,
    dimension: usize,
    params: &Params,
    expanded: &str,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "source": source,
                "dimension": dimension,
                "params": params,
                "expanded": expanded,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("JSON serialization failed")?
            );
        }
        OutputFormat::Text => println!("{}", expanded),
    }
    Ok(())
}

/// Expansion for a preview dimension, or `None` when the identity needs more axes
fn preview(
    expander: &TemplateExpander,
    library: &IdentityLibrary,
    def: &IdentityDefinition,
    dimension: usize,
) -> Option<String> {
    if !def.supports(dimension) {
        return None;
    }
    match expander.expand_identity(library, &def.name, dimension, &Params::new()) {
        Ok(text) => Some(text),
        Err(e) => Some(format!("<{}>", e)),
    }
}

fn describe_params(params: &Params) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}
