use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde_json::Value as JsonValue;
use tracing::{Level, info};

use crate::config::FilterConfig;
use crate::filters::{Condition, FilterCompiler, ParseError, apply_condition};
use crate::schema::EntityType;
use crate::utils::{decode_filter_param, encode_filter_param, read_to_string_limited};

#[derive(Parser)]
#[command(name = "oneroster-filter")]
#[command(version = "0.1.0")]
#[command(about = "Compile and test OneRoster filter expressions", long_about = None)]
pub struct Cli {
    /// Config file (defaults to $ONEROSTER_FILTER_CONFIG, then the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter and print the resulting condition
    Compile {
        /// Filter expression, e.g. "status='active' AND role='student'"
        filter: String,

        /// Restrict fields to this collection's schema
        #[arg(short, long)]
        entity: Option<EntityType>,

        /// Treat the filter as a raw percent-encoded query-string value
        #[arg(long)]
        url_encoded: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Compile every line of a file (blank lines and # comments are skipped)
    Check {
        file: PathBuf,

        #[arg(short, long)]
        entity: Option<EntityType>,
    },
    /// Print the records from a JSON array file that match a filter
    Eval {
        filter: String,

        /// JSON file containing an array of objects
        #[arg(short, long)]
        records: PathBuf,

        #[arg(short, long)]
        entity: Option<EntityType>,
    },
    /// List the filterable fields of a collection
    Fields { entity: EntityType },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Condition tree as JSON
    Json,
    /// Canonical filter expression
    Text,
    /// Canonical expression as a `filter=` query parameter
    Query,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let config = FilterConfig::load(cli.config.as_deref())?;

    match command {
        Commands::Compile { filter, entity, url_encoded, format } => {
            compile_command(&filter, entity, url_encoded, format, &config)
        }
        Commands::Check { file, entity } => check_command(&file, entity, &config),
        Commands::Eval { filter, records, entity } => {
            eval_command(&filter, &records, entity, &config)
        }
        Commands::Fields { entity } => {
            show_fields(entity, &config);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();
}

fn compiler_for(entity: Option<EntityType>, config: &FilterConfig) -> FilterCompiler {
    match entity {
        Some(entity) => entity.compiler(config),
        None => FilterCompiler::new().with_limits(&config.limits),
    }
}

/// Compile, or print the OneRoster error payload and fail
fn compile_or_report(compiler: &FilterCompiler, filter: &str) -> Result<Condition> {
    match compiler.compile(filter) {
        Ok(condition) => Ok(condition),
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_status_info())?);
            let status = err.status_code();
            Err(anyhow::Error::new(err).context(format!("Filter rejected (HTTP {})", status)))
        }
    }
}

fn compile_command(
    filter: &str,
    entity: Option<EntityType>,
    url_encoded: bool,
    format: OutputFormat,
    config: &FilterConfig,
) -> Result<()> {
    let filter = if url_encoded { decode_filter_param(filter)? } else { filter.to_string() };
    let condition = compile_or_report(&compiler_for(entity, config), &filter)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&condition)?),
        OutputFormat::Text => println!("{}", condition),
        OutputFormat::Query => println!("filter={}", encode_filter_param(&condition.to_string())),
    }

    Ok(())
}

fn check_command(file: &Path, entity: Option<EntityType>, config: &FilterConfig) -> Result<()> {
    let content = read_to_string_limited(file)?;
    let compiler = compiler_for(entity, config);

    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let results: Vec<(usize, Result<Condition, ParseError>)> =
        lines.par_iter().map(|(number, line)| (*number, compiler.compile(line))).collect();

    let mut invalid = 0;
    for (number, result) in &results {
        match result {
            Ok(condition) => {
                println!("line {}: ok ({} comparisons)", number, condition.leaf_count())
            }
            Err(err) => {
                invalid += 1;
                println!("line {}: {}", number, err);
            }
        }
    }

    println!();
    println!(
        "Checked {} filters: {} valid, {} invalid",
        results.len(),
        results.len() - invalid,
        invalid
    );

    if invalid > 0 {
        bail!("{} filter(s) failed to compile", invalid);
    }
    Ok(())
}

fn eval_command(
    filter: &str,
    records_path: &Path,
    entity: Option<EntityType>,
    config: &FilterConfig,
) -> Result<()> {
    let content = read_to_string_limited(records_path)?;
    let records: Vec<JsonValue> = serde_json::from_str(&content)
        .with_context(|| format!("{} must contain a JSON array", records_path.display()))?;
    let total = records.len();

    let condition = compile_or_report(&compiler_for(entity, config), filter)?;
    let matched = apply_condition(records, &condition)?;

    info!(matched = matched.len(), total, "Applied filter");
    println!("{}", serde_json::to_string_pretty(&matched)?);
    Ok(())
}

fn show_fields(entity: EntityType, config: &FilterConfig) {
    let types = entity.field_types(config);

    println!("Filterable fields for {}", entity);
    println!("================================");
    for (name, field_type) in &types {
        println!("  {:<40} {}", name, field_type.as_str());
    }
    println!();
    println!("Total fields: {}", types.len());
}
