use crate::config::ProfilerConfig;
use crate::error::Result;
use crate::types::{ColumnFailure, DatasetProfile, ProfilingOutcome, QualityRule, Severity};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// JSON report of one profiling run.
///
/// Used for both stdout output (`--json`) and file output (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Local time the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Rows actually profiled when the table was sampled
    pub sampled_rows: Option<usize>,
    /// Configuration the profile was computed with
    pub config: ProfilerConfig,
    /// Counts over the profile and the rule list
    pub summary: ReportSummary,
    pub profile: DatasetProfile,
    pub rules: Vec<QualityRule>,
}

/// Headline counts for a [`ProfileReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub rows: usize,
    pub columns: usize,
    pub profiled_columns: usize,
    pub unprofilable_columns: Vec<String>,
    pub failed_columns: Vec<ColumnFailure>,
    pub error_rules: usize,
    pub warning_rules: usize,
}

impl ProfileReport {
    pub fn new(
        input_file: impl Into<String>,
        sampled_rows: Option<usize>,
        config: &ProfilerConfig,
        outcome: ProfilingOutcome,
    ) -> Self {
        let ProfilingOutcome { profile, rules } = outcome;

        let count_severity = |severity: Severity| rules.iter().filter(|r| r.severity == severity).count();
        let summary = ReportSummary {
            rows: profile.shape.0,
            columns: profile.shape.1,
            profiled_columns: profile.columns.len(),
            unprofilable_columns: profile
                .unprofilable_columns()
                .into_iter()
                .map(String::from)
                .collect(),
            failed_columns: profile.failures.clone(),
            error_rules: count_severity(Severity::Error),
            warning_rules: count_severity(Severity::Warning),
        };

        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.into(),
            sampled_rows,
            config: config.clone(),
            summary,
            profile,
            rules,
        }
    }
}

/// Writes reports into an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write the report as pretty JSON to `<output_dir>/<report_base_name>_report.json`.
    ///
    /// The output directory is created if needed. Returns the written path.
    pub fn write_report_to_file(
        &self,
        report: &ProfileReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
