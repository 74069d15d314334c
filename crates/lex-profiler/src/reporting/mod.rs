//! Report generation module.
//!
//! Two renderings of a [`ProfilingOutcome`](crate::types::ProfilingOutcome):
//!
//! - [`render_text_report`]: the human-readable console report
//! - [`ProfileReport`]: the JSON document printed with `--json` or written
//!   by [`ReportGenerator`] with `--emit-report`
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_profiler::reporting::{ProfileReport, ReportGenerator};
//!
//! let report = ProfileReport::new("data/yellow_tripdata.parquet", None, &config, outcome);
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or write to file
//! let generator = ReportGenerator::new("outputs");
//! generator.write_report_to_file(&report, "yellow_tripdata")?;
//! ```

mod generator;
mod text;

pub use generator::{ProfileReport, ReportGenerator, ReportSummary};
pub use text::render_text_report;
