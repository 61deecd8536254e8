//! # voltaje-quote
//!
//! Prices a quote document and prints the breakdown.
//!
//! ## Usage
//! ```bash
//! voltaje-quote demos/quote.json
//! voltaje-quote demos/quote.json --mode per-line --json
//! voltaje-quote demos/quote.json --materials
//! RUST_LOG=voltaje=debug voltaje-quote demos/quote.json --config demos/voltaje.toml
//! ```
//!
//! ## Flow
//! ```text
//! args ──► AppConfig::load ──► QuoteDocument ──► compute_totals ──► text / JSON
//!              (file, env)       (JSON file)       (voltaje-core)
//! ```

mod config;
mod document;
mod error;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use serde::Serialize;
use voltaje_core::work_code::{material_requirements, MaterialRequirement};
use voltaje_core::{compute_totals, PricingMode, Totals};

use config::AppConfig;
use document::QuoteDocument;
use error::{CliError, CliResult};

const USAGE: &str = "\
voltaje-quote - price a quote document

USAGE:
    voltaje-quote <quote.json> [OPTIONS]

OPTIONS:
    -m, --mode <MODE>      Pricing mode: quote-level | per-line
        --json             Print the totals record as JSON
                           (with --materials, one object: totals and materials)
        --materials        Also print kit material requirements
    -c, --config <PATH>    Configuration file (TOML)
    -h, --help             Show this help

ENVIRONMENT:
    VOLTAJE_PRICING_MODE, VOLTAJE_COST_FALLBACK, VOLTAJE_COST_FALLBACK_RATIO,
    VOLTAJE_CURRENCY_SYMBOL, VOLTAJE_CURRENCY_DECIMALS, RUST_LOG";

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Default, PartialEq)]
struct Args {
    input: Option<PathBuf>,
    mode: Option<PricingMode>,
    json: bool,
    materials: bool,
    config: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn parse(args: &[String]) -> CliResult<Self> {
        let mut parsed = Args::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--mode" | "-m" => {
                    i += 1;
                    let value = args
                        .get(i)
                        .ok_or_else(|| CliError::Usage("--mode needs a value".into()))?;
                    let mode = value
                        .parse::<PricingMode>()
                        .map_err(|e| CliError::Usage(e.to_string()))?;
                    parsed.mode = Some(mode);
                }
                "--config" | "-c" => {
                    i += 1;
                    let value = args
                        .get(i)
                        .ok_or_else(|| CliError::Usage("--config needs a path".into()))?;
                    parsed.config = Some(PathBuf::from(value));
                }
                "--json" => parsed.json = true,
                "--materials" => parsed.materials = true,
                "--help" | "-h" => parsed.help = true,
                flag if flag.starts_with('-') => {
                    return Err(CliError::Usage(format!("unknown option {}", flag)));
                }
                path => {
                    if parsed.input.is_some() {
                        return Err(CliError::Usage(format!("unexpected argument {}", path)));
                    }
                    parsed.input = Some(PathBuf::from(path));
                }
            }
            i += 1;
        }

        if parsed.input.is_none() && !parsed.help {
            return Err(CliError::Usage("missing quote document path".into()));
        }
        Ok(parsed)
    }
}

/// `--json --materials` output: one document holding both records.
#[derive(Serialize)]
struct JsonReport<'a> {
    totals: &'a Totals,
    materials: &'a [MaterialRequirement],
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Quote failed");
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Logs go to stderr so `--json` output stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,voltaje_cli=info,voltaje_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(raw_args: &[String]) -> CliResult<String> {
    let args = Args::parse(raw_args)?;
    if args.help {
        return Ok(format!("{}\n", USAGE));
    }

    let config = AppConfig::load(args.config.clone())?;
    let input = args
        .input
        .ok_or_else(|| CliError::Usage("missing quote document path".into()))?;
    let document = QuoteDocument::from_path(&input)?;

    let mode = document.effective_mode(args.mode, config.pricing.default_mode);
    let policy = config.pricing.policy();
    debug!(%mode, ?policy, "Pricing quote");

    let totals = compute_totals(&document.items, &document.modifiers, mode, &policy)?;
    info!(
        lines = totals.lines.len(),
        grand_total = %totals.grand_total,
        "Quote priced"
    );

    let format = config.currency.format();
    let requirements = if args.materials {
        Some(material_requirements(&document.items)?)
    } else {
        None
    };

    let output = if args.json {
        let mut json = match &requirements {
            Some(materials) => serde_json::to_string_pretty(&JsonReport {
                totals: &totals,
                materials,
            })?,
            None => serde_json::to_string_pretty(&totals)?,
        };
        json.push('\n');
        json
    } else {
        let mut text = render::render_text(&totals, &format);
        if let Some(materials) = &requirements {
            text.push('\n');
            text.push_str(&render::render_materials(materials, &format));
        }
        text
    };

    Ok(output)
}
