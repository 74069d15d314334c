//! Automated Column Profiling Library
//!
//! Profiles every column of a tabular dataset and suggests data-quality rules
//! from the observed statistics, built with Rust and Polars.
//!
//! # Overview
//!
//! - **Profiling**: null accounting, cardinality and sample values for every column
//! - **Numeric statistics**: min/max, mean, median, standard deviation, quartiles
//!   and IQR outlier detection
//! - **Temporal and categorical statistics**: date ranges and most frequent values
//! - **Rule suggestion**: NotNull, ValueRange and WarnZeros rules with severities
//! - **Reporting**: console text report and JSON report files
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_profiler::{ProfilerConfig, analyze, load_table, render_text_report};
//!
//! let df = load_table("data/yellow_tripdata_2024-01.parquet")?;
//!
//! let config = ProfilerConfig::builder()
//!     .not_null_threshold(0.05)
//!     .build()?;
//!
//! let outcome = analyze(&df, &config)?;
//! println!("{}", render_text_report(&outcome));
//!
//! for rule in &outcome.rules {
//!     println!("[{}] {}", rule.severity.label(), rule.description);
//! }
//! ```
//!
//! # Declared kinds
//!
//! A column is profiled as numeric, temporal or categorical according to its
//! dtype. Text columns that hold numbers or timestamps can be declared with
//! [`ProfilerConfigBuilder::declare_kind`]; a column whose values contradict
//! its declared kind is reported in [`DatasetProfile::failures`] while the
//! remaining columns are still profiled.

pub mod config;
pub mod error;
pub mod loader;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, ProfilerConfig, ProfilerConfigBuilder};
pub use error::{ProfilingError, Result as ProfilingResult, ResultExt};
pub use loader::{load_table, sample_rows};
pub use profiler::{analyze, build_profile, profile_column};
pub use quality::synthesize_rules;
pub use reporting::{ProfileReport, ReportGenerator, ReportSummary, render_text_report};
pub use types::{
    CategoricalStats, ColumnFailure, ColumnKind, ColumnProfile, ColumnStats, DatasetProfile,
    NumericStats, ProfilingOutcome, QualityRule, RuleKind, Severity, TemporalStats, ValueCount,
};
