//! jpql: render JPQL query models from the command line
//!
//! # Usage
//!
//! ```bash
//! # Render a query model with generated placeholders
//! jpql render query.json
//!
//! # Inline literals, bind named parameters from a file
//! jpql render query.json --params params.json --inline
//!
//! # Read the model from stdin, print JSON
//! cat query.json | jpql render - --format json
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use jpql_render::prelude::*;

#[derive(Parser)]
#[command(name = "jpql")]
#[command(version)]
#[command(about = "Render JPQL query models to query text and parameters", long_about = None)]
#[command(after_help = "EXAMPLES:
    jpql render query.json
    jpql render query.json --params params.json --inline
    jpql kinds --config jpql.toml")]
struct Cli {
    /// Configuration file (defaults to ./jpql.toml, then the user config dir)
    #[arg(long, global = true, env = "JPQL_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON query model
    Render {
        /// Query model file, or `-` for stdin
        query: String,

        /// JSON object of named parameter values
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Write literals inline instead of as placeholders
        #[arg(long)]
        inline: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List the node kinds the configured context can render
    Kinds,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "jpql_render=debug" } else { "jpql_render=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RenderConfig::discover()?,
    };
    let renderer = JpqlRenderer::new(config.context()?);

    match &cli.command {
        Commands::Render {
            query,
            params,
            inline,
            format,
        } => {
            let mode = if *inline { RenderMode::Inline } else { config.mode };
            render_query(&renderer, query, params.as_deref(), mode, format)
        }
        Commands::Kinds => {
            show_kinds(renderer.context());
            Ok(())
        }
    }
}

fn render_query(
    renderer: &JpqlRenderer,
    source: &str,
    params_path: Option<&Path>,
    mode: RenderMode,
    format: &OutputFormat,
) -> Result<()> {
    let query: Query = serde_json::from_str(&read_source(source)?)
        .with_context(|| format!("{} is not a valid query model", source))?;

    let result = match params_path {
        Some(path) => {
            let params = load_params(path)?;
            renderer.render_with_params(&query, &params, mode)?
        }
        None => renderer.render(&query, mode)?,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            if let Some(result_type) = query.result_type() {
                println!("{} {}", "Result type:".dimmed(), result_type.cyan());
            }
            println!("{}", result.query.white().bold());
            if !result.params.is_empty() {
                println!();
                println!("{}", "Parameters:".cyan());
                for (name, value) in &result.params {
                    println!(
                        "  :{} = {} {}",
                        name,
                        value.to_string().yellow(),
                        format!("({})", value.type_name()).dimmed()
                    );
                }
            }
        }
    }
    Ok(())
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read {}", source))
    }
}

/// Named parameters from a JSON object.
///
/// Plain JSON scalars map to the obvious literal; temporal, enum and binary
/// values use the tagged form, e.g. `{"type": "date", "value": "2024-01-31"}`.
fn load_params(path: &Path) -> Result<Params> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)
        .with_context(|| format!("{} must hold a JSON object", path.display()))?;

    let mut params = Params::new();
    for (name, json) in object {
        let value = match Value::from_json(&json) {
            Some(value) => value,
            None => match serde_json::from_value::<Value>(json) {
                Ok(value) => value,
                Err(e) => bail!("parameter '{}' has no literal form: {}", name, e),
            },
        };
        params.insert(name, value);
    }
    Ok(params)
}

fn show_kinds(context: &RenderContext) {
    println!("{}", "Registered node kinds".cyan().bold());
    println!("{}", "─".repeat(32).dimmed());
    for kind in context.kinds() {
        println!("  {}", kind.to_string().white());
    }
}
