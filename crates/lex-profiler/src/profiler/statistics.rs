//! Statistical analysis functions for column profiling.

use crate::config::ProfilerConfig;
use crate::error::{ProfilingError, Result};
use crate::types::{CategoricalStats, NumericStats, TemporalStats, ValueCount};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Quantile of sorted data using linear interpolation between closest ranks.
///
/// Returns `None` for empty input.
pub(crate) fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        let frac = idx - lo as f64;
        Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
    }
}

/// Population mean and standard deviation of finite values.
///
/// Welford accumulation over values divided by a power of two near the
/// largest magnitude, so squared deviations stay in range. Power-of-two
/// scaling is exact.
fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    let largest = values.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
    if largest == 0.0 {
        return (0.0, 0.0);
    }
    let exponent = (largest.log2().floor() as i32).clamp(f64::MIN_EXP - 1, f64::MAX_EXP - 1);
    let scale = 2.0f64.powi(exponent);

    let mut count = 0.0;
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for x in values {
        let x = x / scale;
        count += 1.0;
        let delta = x - mean;
        mean += delta / count;
        m2 += delta * (x - mean);
    }

    (mean * scale, (m2 / count).sqrt() * scale)
}

/// Compute the numeric statistics block of a column.
///
/// Only finite values take part; infinities are counted separately. Fails
/// with [`ProfilingError::UnprofilableColumn`] when no finite value exists
/// or when a derived statistic leaves the `f64` range.
pub(crate) fn numeric_stats(
    column: &str,
    values: &[Option<f64>],
    config: &ProfilerConfig,
) -> Result<NumericStats> {
    let row_count = values.len();
    let non_null: Vec<f64> = values.iter().flatten().copied().collect();
    let mut finite: Vec<f64> = non_null.iter().copied().filter(|x| x.is_finite()).collect();
    let non_finite_count = non_null.len() - finite.len();

    if finite.is_empty() {
        let reason = if non_null.is_empty() {
            "all values are null"
        } else {
            "no finite values"
        };
        return Err(ProfilingError::UnprofilableColumn {
            column: column.to_string(),
            reason: reason.to_string(),
        });
    }

    finite.sort_by(|a, b| a.total_cmp(b));

    let (mean, stddev) = mean_and_stddev(&finite);

    // finite is non-empty, so every quantile exists
    let q1 = quantile(&finite, 0.25).unwrap_or(mean);
    let median = quantile(&finite, 0.5).unwrap_or(mean);
    let q3 = quantile(&finite, 0.75).unwrap_or(mean);

    let iqr = q3 - q1;
    let lower_fence = q1 - config.outlier_iqr_multiplier * iqr;
    let upper_fence = q3 + config.outlier_iqr_multiplier * iqr;
    let outlier_count = finite
        .iter()
        .filter(|&&x| x < lower_fence || x > upper_fence)
        .count();

    let zero_count = finite.iter().filter(|&&x| x == 0.0).count();
    let negative_count = finite.iter().filter(|&&x| x < 0.0).count();
    let suggested_min = mean - config.rule_bound_sigma * stddev;
    let suggested_max = mean + config.rule_bound_sigma * stddev;

    let derived = [
        mean,
        median,
        stddev,
        q1,
        q3,
        lower_fence,
        upper_fence,
        suggested_min,
        suggested_max,
    ];
    if derived.iter().any(|x| !x.is_finite()) {
        return Err(ProfilingError::UnprofilableColumn {
            column: column.to_string(),
            reason: "statistics overflow".to_string(),
        });
    }

    Ok(NumericStats {
        min: finite[0],
        max: finite[finite.len() - 1],
        mean,
        median,
        stddev,
        q1,
        q3,
        lower_fence,
        upper_fence,
        outlier_count,
        outlier_fraction: outlier_count as f64 / row_count as f64,
        suggested_min,
        suggested_max,
        zero_count,
        negative_count,
        non_finite_count,
    })
}

/// Compute the earliest and latest timestamp of a column.
pub(crate) fn temporal_stats(column: &str, values: &[Option<NaiveDateTime>]) -> Result<TemporalStats> {
    let mut present = values.iter().flatten();
    let Some(first) = present.next() else {
        return Err(ProfilingError::UnprofilableColumn {
            column: column.to_string(),
            reason: "all values are null".to_string(),
        });
    };

    let (min_timestamp, max_timestamp) = present.fold((*first, *first), |(lo, hi), ts| {
        (lo.min(*ts), hi.max(*ts))
    });

    Ok(TemporalStats {
        min_timestamp,
        max_timestamp,
    })
}

/// Count the most frequent non-null values.
///
/// Ties keep the order in which the values were first encountered.
pub(crate) fn categorical_stats(values: &[Option<String>], top_n: usize) -> CategoricalStats {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for value in values.iter().flatten() {
        match position.get(value.as_str()) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                position.insert(value.as_str(), counts.len());
                counts.push((value.as_str(), 1));
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top_n);

    CategoricalStats {
        top_values: counts
            .into_iter()
            .map(|(value, count)| ValueCount {
                value: value.to_string(),
                count,
            })
            .collect(),
    }
}
