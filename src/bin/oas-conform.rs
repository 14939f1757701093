//! OpenAPI conformance CLI
//!
//! Compares a local OpenAPI document with the reference API, writes an
//! adapted copy, and requests a model-written conformance review.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use oas_conform::{
    adapt_with_rules, compare, load_document, write_document, ComparisonReport, RuleSet,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oas-conform")]
#[command(about = "Compare an OpenAPI document with a reference API and adapt it")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG applies otherwise
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report divergences and similarities between two documents
    Compare {
        /// Local OpenAPI document (.json, .yaml or .yml)
        local: PathBuf,

        /// Reference OpenAPI document (.json, .yaml or .yml)
        reference: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit with status 1 when any divergence is found
        #[arg(long)]
        strict: bool,
    },

    /// Write a copy of the local document adapted to the reference conventions
    Adapt {
        /// Local OpenAPI document (.json, .yaml or .yml)
        local: PathBuf,

        /// Reference OpenAPI document (.json, .yaml or .yml)
        reference: PathBuf,

        /// Adapted document path; the extension selects JSON or YAML
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Compare, then adapt: print the report and write the adapted document
    Run {
        /// Local OpenAPI document (.json, .yaml or .yml)
        local: PathBuf,

        /// Reference OpenAPI document (.json, .yaml or .yml)
        reference: PathBuf,

        /// Adapted document path; the extension selects JSON or YAML
        #[arg(long, short)]
        output: PathBuf,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Ask a hosted chat model for an Open Finance conformance review
    #[cfg(feature = "remote")]
    Conformance {
        /// OpenAPI document to review (.json, .yaml or .yml)
        document: PathBuf,

        /// Chat-completions endpoint URL
        #[arg(long, env = "OAS_CONFORM_ENDPOINT")]
        endpoint: String,

        /// Model identifier sent with the request
        #[arg(long, env = "OAS_CONFORM_MODEL")]
        model: String,

        /// Bearer token for the endpoint
        #[arg(long, env = "OAS_CONFORM_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 240)]
        timeout_secs: u64,

        /// Sampling temperature
        #[arg(long, default_value_t = 1.0)]
        temperature: f32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compare {
            local,
            reference,
            json,
            pretty,
            output,
            strict,
        } => run_compare(CompareArgs {
            local,
            reference,
            json,
            pretty,
            output,
            strict,
        }),

        Commands::Adapt {
            local,
            reference,
            output,
        } => run_adapt(&local, &reference, &output),

        Commands::Run {
            local,
            reference,
            output,
            json,
        } => run_all(&local, &reference, &output, json),

        #[cfg(feature = "remote")]
        Commands::Conformance {
            document,
            endpoint,
            model,
            api_key,
            timeout_secs,
            temperature,
        } => {
            let config = oas_conform::ChatConfig::new(endpoint, model)
                .api_key(api_key)
                .temperature(temperature)
                .timeout(std::time::Duration::from_secs(timeout_secs));
            run_conformance(&document, config)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load a document, printing the error and mapping it to an exit code.
fn load(path: &Path, role: &str) -> Result<Value, u8> {
    load_document(path).map_err(|e| {
        eprintln!("Error loading {} document: {}", role, e);
        e.exit_code() as u8
    })
}

fn load_pair(local: &Path, reference: &Path) -> Result<(Value, Value), u8> {
    Ok((load(local, "local")?, load(reference, "reference")?))
}

fn render_report(report: &ComparisonReport, json: bool, pretty: bool) -> Result<String, u8> {
    if !json {
        return Ok(report.to_string());
    }
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
    .map_err(|e| {
        eprintln!("Error serializing report: {}", e);
        2u8
    })
}

struct CompareArgs {
    local: PathBuf,
    reference: PathBuf,
    json: bool,
    pretty: bool,
    output: Option<PathBuf>,
    strict: bool,
}

fn run_compare(args: CompareArgs) -> Result<(), u8> {
    let CompareArgs {
        local,
        reference,
        json,
        pretty,
        output,
        strict,
    } = args;
    let (local_doc, reference_doc) = load_pair(&local, &reference)?;

    let report = compare(&local_doc, &reference_doc);
    tracing::info!(
        divergences = report.divergence_count(),
        similarities = report.similarity_count(),
        "comparison finished"
    );
    let text = render_report(&report, json, pretty)?;

    match output {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", text)).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", text);
        }
    }

    if strict && !report.is_aligned() {
        return Err(1);
    }
    Ok(())
}

fn adapt_and_write(local: &Value, reference: &Value, output: &Path) -> Result<(), u8> {
    let adaptation = adapt_with_rules(local, reference, &RuleSet::default());
    write_document(&adaptation.document, output).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    for change in &adaptation.applied {
        println!("  - {}", change);
    }
    println!(
        "Adapted OpenAPI specification saved to: {}",
        output.display()
    );
    Ok(())
}

fn run_adapt(local: &Path, reference: &Path, output: &Path) -> Result<(), u8> {
    let (local_doc, reference_doc) = load_pair(local, reference)?;
    adapt_and_write(&local_doc, &reference_doc, output)
}

fn run_all(local: &Path, reference: &Path, output: &Path, json: bool) -> Result<(), u8> {
    let (local_doc, reference_doc) = load_pair(local, reference)?;

    let report = compare(&local_doc, &reference_doc);
    println!("Comparison Report:");
    println!("{}", render_report(&report, json, true)?);
    println!();

    adapt_and_write(&local_doc, &reference_doc, output)
}

#[cfg(feature = "remote")]
fn run_conformance(document: &Path, config: oas_conform::ChatConfig) -> Result<(), u8> {
    use oas_conform::{conformance_report, render_document, Format, HttpChatClient};

    let doc = load(document, "input")?;
    let text = render_document(&doc, Format::Json).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let report = match HttpChatClient::new(config) {
        Ok(client) => conformance_report(&client, &text),
        Err(e) => {
            tracing::warn!(error = %e, "cannot build chat client");
            oas_conform::FALLBACK_RESPONSE.to_string()
        }
    };
    println!("{}", report);
    Ok(())
}
