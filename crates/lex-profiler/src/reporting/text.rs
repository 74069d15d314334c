use crate::types::{ColumnProfile, ColumnStats, ProfilingOutcome, QualityRule};
use crate::utils::format_count;
use std::fmt;

const RULE_WIDTH: usize = 70;

/// Values shown per categorical column in the console report.
const SHOWN_VALUES: usize = 3;

/// Render the profile and rules as the console report.
pub fn render_text_report(outcome: &ProfilingOutcome) -> String {
    TextReport(outcome).to_string()
}

struct TextReport<'a>(&'a ProfilingOutcome);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ProfilingOutcome { profile, rules } = self.0;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{}", rule)?;
        writeln!(f, "AUTOMATED DATA PROFILING")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;
        writeln!(
            f,
            "Dataset shape: {} rows × {} columns",
            format_count(profile.shape.0),
            profile.shape.1
        )?;

        for name in &profile.column_order {
            writeln!(f)?;
            writeln!(f, "{}", rule)?;
            writeln!(f, "Column: {}", name)?;
            writeln!(f, "{}", rule)?;
            if let Some(column) = profile.column(name) {
                write_column(f, column)?;
            } else if let Some(failure) = profile.failure(name) {
                writeln!(f, "  Not profiled [{}]: {}", failure.code, failure.message)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "SUGGESTED QUALITY RULES")?;
        writeln!(f, "{}", rule)?;
        write_rules(f, rules)
    }
}

fn write_column(f: &mut fmt::Formatter<'_>, column: &ColumnProfile) -> fmt::Result {
    writeln!(f, "  Data Type: {}", column.dtype)?;
    writeln!(
        f,
        "  Null Values: {} ({:.2}%)",
        format_count(column.null_count),
        column.null_percentage()
    )?;
    writeln!(f, "  Unique Values: {}", format_count(column.unique_count))?;

    match &column.stats {
        ColumnStats::Numeric(stats) => {
            writeln!(f)?;
            writeln!(f, "  Statistics:")?;
            writeln!(f, "    Min: {:.2}", stats.min)?;
            writeln!(f, "    Max: {:.2}", stats.max)?;
            writeln!(f, "    Mean: {:.2}", stats.mean)?;
            writeln!(f, "    Median: {:.2}", stats.median)?;
            writeln!(f, "    Std Dev: {:.2}", stats.stddev)?;
            writeln!(f, "    Zero values: {}", format_count(stats.zero_count))?;
            writeln!(f, "    Negative values: {}", format_count(stats.negative_count))?;
            writeln!(f)?;
            writeln!(
                f,
                "  Outliers (IQR method): {} ({:.2}%)",
                format_count(stats.outlier_count),
                stats.outlier_fraction * 100.0
            )?;
            writeln!(f)?;
            writeln!(f, "  Suggested Quality Rules:")?;
            writeln!(
                f,
                "    Accept range: {:.2} to {:.2}",
                stats.suggested_min, stats.suggested_max
            )?;
        }
        ColumnStats::Temporal(stats) => {
            writeln!(
                f,
                "  Date Range: {} to {}",
                stats.min_timestamp, stats.max_timestamp
            )?;
        }
        ColumnStats::Categorical(stats) => {
            let shown: Vec<String> = column
                .sample_values
                .iter()
                .take(SHOWN_VALUES)
                .map(|v| format!("'{}'", v))
                .collect();
            writeln!(f, "  Sample Values: [{}]", shown.join(", "))?;
            if !stats.top_values.is_empty() {
                writeln!(f, "  Most Common Values:")?;
                for entry in stats.top_values.iter().take(SHOWN_VALUES) {
                    writeln!(
                        f,
                        "    '{}': {} occurrences",
                        entry.value,
                        format_count(entry.count)
                    )?;
                }
            }
        }
        ColumnStats::Unprofilable { reason } => {
            writeln!(f, "  No {} statistics: {}", column.declared_kind, reason)?;
        }
    }

    Ok(())
}

/// Rules grouped under their column, in rule order.
fn write_rules(f: &mut fmt::Formatter<'_>, rules: &[QualityRule]) -> fmt::Result {
    let mut current: Option<&str> = None;

    for rule in rules {
        if current != Some(rule.column.as_str()) {
            writeln!(f)?;
            writeln!(f, "{}:", rule.column)?;
            current = Some(rule.column.as_str());
        }
        writeln!(f, "  [{}] {}", rule.severity.label(), rule.description)?;
    }

    Ok(())
}
