use crate::config::ProfilerConfig;
use crate::types::{ColumnProfile, DatasetProfile, NumericStats, QualityRule, RuleKind, Severity};
use crate::utils::format_count;
use tracing::debug;

/// Derive suggested quality rules from a dataset profile.
///
/// Rules are grouped by column in profile order. Within a column they are
/// emitted as NotNull, ValueRange, WarnZeros, each only when it applies.
/// Columns listed as failures carry no profile and get no rules.
pub fn synthesize_rules(profile: &DatasetProfile, config: &ProfilerConfig) -> Vec<QualityRule> {
    let mut rules = Vec::new();

    for column in &profile.columns {
        let before = rules.len();

        if let Some(rule) = not_null_rule(column, config.not_null_threshold) {
            rules.push(rule);
        }

        if let Some(stats) = column.numeric() {
            rules.push(value_range_rule(&column.name, stats));
            if let Some(rule) = warn_zeros_rule(&column.name, stats) {
                rules.push(rule);
            }
        }

        debug!(
            "Suggested {} rules for column '{}'",
            rules.len() - before,
            column.name
        );
    }

    rules
}

/// A column that is almost always populated should never be null.
fn not_null_rule(column: &ColumnProfile, threshold: f64) -> Option<QualityRule> {
    if column.null_fraction >= threshold {
        return None;
    }

    Some(QualityRule {
        column: column.name.clone(),
        kind: RuleKind::NotNull,
        severity: Severity::Error,
        description: format!(
            "{} should not be null (currently {:.2}% null)",
            column.name,
            column.null_percentage()
        ),
    })
}

fn value_range_rule(name: &str, stats: &NumericStats) -> QualityRule {
    QualityRule {
        column: name.to_string(),
        kind: RuleKind::ValueRange {
            min: stats.suggested_min,
            max: stats.suggested_max,
        },
        severity: Severity::Error,
        description: format!(
            "{} should be between {:.2} and {:.2}",
            name, stats.suggested_min, stats.suggested_max
        ),
    }
}

/// Zeros often stand in for missing readings, so they are flagged, never blocked.
fn warn_zeros_rule(name: &str, stats: &NumericStats) -> Option<QualityRule> {
    if stats.zero_count == 0 {
        return None;
    }

    Some(QualityRule {
        column: name.to_string(),
        kind: RuleKind::WarnZeros {
            zero_count: stats.zero_count,
        },
        severity: Severity::Warning,
        description: format!(
            "{} has {} zero values - verify if valid",
            name,
            format_count(stats.zero_count)
        ),
    })
}
