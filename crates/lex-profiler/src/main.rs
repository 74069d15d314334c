//! CLI entry point for the column profiler.

use anyhow::{Result, anyhow};
use clap::Parser;
use lex_profiler::{
    ColumnKind, ProfileReport, ProfilerConfig, ReportGenerator, analyze, load_table,
    render_text_report, sample_rows,
};
use std::path::Path;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Automated column profiling and data-quality rule suggestion",
    long_about = "Profiles every column of a CSV or Parquet file and suggests quality rules.\n\n\
                  EXAMPLES:\n  \
                  # Profile a 10,000 row sample of a trip file\n  \
                  lex-profiler -i yellow_tripdata_2024-01.parquet --sample 10000\n\n  \
                  # Declare a text column as temporal\n  \
                  lex-profiler -i online_retail.csv --kind InvoiceDate=temporal\n\n  \
                  # Machine-readable output\n  \
                  lex-profiler -i trips.csv --json | jq '.rules'"
)]
struct Args {
    /// Path to the CSV or Parquet file to profile
    #[arg(short, long)]
    input: String,

    /// Output directory for reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Profile a uniform random sample of this many rows
    #[arg(long)]
    sample: Option<usize>,

    /// Seed for row sampling
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Declare a column kind, as COLUMN=numeric|temporal|categorical (repeatable)
    #[arg(long = "kind", value_name = "COLUMN=KIND", value_parser = parse_kind_override)]
    kinds: Vec<(String, ColumnKind)>,

    /// Width of the IQR outlier fences, in multiples of the IQR
    #[arg(long, default_value = "1.5")]
    outlier_iqr_multiplier: f64,

    /// Width of the suggested value range, in standard deviations
    #[arg(long, default_value = "3.0")]
    rule_bound_sigma: f64,

    /// Suggest NotNull for columns with a null fraction below this (0.0 - 1.0)
    #[arg(long, default_value = "0.05")]
    not_null_threshold: f64,

    /// Most frequent values kept per categorical column
    #[arg(long, default_value = "5")]
    top_n: usize,

    /// Sample values kept per column
    #[arg(long, default_value = "5")]
    sample_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the report)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the text report
    ///
    /// Disables all logs; only outputs the JSON report.
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

fn parse_kind_override(raw: &str) -> std::result::Result<(String, ColumnKind), String> {
    let (column, kind) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected COLUMN=KIND, got '{}'", raw))?;
    if column.is_empty() {
        return Err(format!("missing column name in '{}'", raw));
    }
    Ok((column.to_string(), kind.parse()?))
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> Result<ProfilerConfig> {
    let mut builder = ProfilerConfig::builder()
        .outlier_iqr_multiplier(args.outlier_iqr_multiplier)
        .rule_bound_sigma(args.rule_bound_sigma)
        .not_null_threshold(args.not_null_threshold)
        .top_n_categorical(args.top_n)
        .sample_size(args.sample_size);

    for (column, kind) in &args.kinds {
        builder = builder.declare_kind(column, *kind);
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = build_config(&args)?;

    info!("Loading dataset from: {}", args.input);
    let data = load_table(&args.input)?;

    let (data, sampled_rows) = match args.sample {
        Some(n) => {
            let sampled = sample_rows(&data, n, args.seed)?;
            let rows = sampled.height();
            (sampled, Some(rows))
        }
        None => (data, None),
    };

    let outcome = analyze(&data, &config)?;
    for failure in &outcome.profile.failures {
        warn!("Column '{}' was not profiled: {}", failure.column, failure.message);
    }

    let text = (!args.json).then(|| render_text_report(&outcome));
    let report = ProfileReport::new(&args.input, sampled_rows, &config, outcome);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let generator = ReportGenerator::new(&args.output);
        let report_path = generator.write_report_to_file(&report, &extract_file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    if let Some(rows) = sampled_rows {
        println!("Using sample of {} records for profiling\n", rows);
    }
    if let Some(text) = text {
        print!("{}", text);
    }
    print_footer(&report);

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn print_footer(report: &ProfileReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(70));
    println!(
        "Profiling complete: {} of {} columns profiled, {} rules ({} errors, {} warnings)",
        summary.profiled_columns,
        summary.columns,
        summary.error_rules + summary.warning_rules,
        summary.error_rules,
        summary.warning_rules
    );
    if !summary.failed_columns.is_empty() {
        println!("  ! {} columns failed profiling", summary.failed_columns.len());
    }
    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(70));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_override() {
        assert_eq!(
            parse_kind_override("InvoiceDate=temporal").unwrap(),
            ("InvoiceDate".to_string(), ColumnKind::Temporal)
        );
        assert_eq!(
            parse_kind_override("a=b=numeric").unwrap(),
            ("a=b".to_string(), ColumnKind::Numeric)
        );
        assert!(parse_kind_override("InvoiceDate").is_err());
        assert!(parse_kind_override("=numeric").is_err());
        assert!(parse_kind_override("Quantity=money").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["lex-profiler", "-i", "trips.csv"]);
        let config = build_config(&args).unwrap();

        assert_eq!(args.output, "./outputs");
        assert_eq!(args.seed, 42);
        assert!(args.sample.is_none());
        assert_eq!(config, ProfilerConfig::default());
    }

    #[test]
    fn test_args_kind_overrides() {
        let args = Args::parse_from([
            "lex-profiler",
            "-i",
            "online_retail.csv",
            "--kind",
            "InvoiceDate=temporal",
            "--kind",
            "Quantity=numeric",
            "--sample",
            "1000",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(args.sample, Some(1000));
        assert_eq!(config.kind_for("InvoiceDate", ColumnKind::Categorical), ColumnKind::Temporal);
        assert_eq!(config.kind_for("Quantity", ColumnKind::Categorical), ColumnKind::Numeric);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let args = Args::parse_from(["lex-profiler", "-i", "trips.csv", "--not-null-threshold", "5"]);
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_extract_file_stem() {
        assert_eq!(extract_file_stem("data/yellow_tripdata_2024-01.parquet"), "yellow_tripdata_2024-01");
    }
}
