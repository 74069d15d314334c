//! Materialization of a column's values according to its declared kind.
//!
//! This is the only place that looks at polars dtypes. Everything downstream
//! works on plain vectors, so a mismatch between declared kind and actual
//! values is detected here and nowhere else.

use crate::error::{ProfilingError, Result};
use crate::types::ColumnKind;
use crate::utils::{is_missing_token, is_numeric_dtype, parse_numeric_string, parse_timestamp_string};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Days from 0001-01-01 (day 1 of the common era) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A column's values, one entry per row, `None` for missing entries.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Temporal(Vec<Option<NaiveDateTime>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnValues {
    pub(crate) fn kind(&self) -> ColumnKind {
        match self {
            ColumnValues::Numeric(_) => ColumnKind::Numeric,
            ColumnValues::Temporal(_) => ColumnKind::Temporal,
            ColumnValues::Categorical(_) => ColumnKind::Categorical,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Temporal(v) => v.len(),
            ColumnValues::Categorical(v) => v.len(),
        }
    }

    pub(crate) fn null_count(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnValues::Temporal(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnValues::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Count distinct non-null values.
    pub(crate) fn unique_count(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v
                .iter()
                .flatten()
                // -0.0 and 0.0 are the same value
                .map(|x| if *x == 0.0 { 0u64 } else { x.to_bits() })
                .collect::<HashSet<_>>()
                .len(),
            ColumnValues::Temporal(v) => v.iter().flatten().collect::<HashSet<_>>().len(),
            ColumnValues::Categorical(v) => v
                .iter()
                .flatten()
                .map(String::as_str)
                .collect::<HashSet<_>>()
                .len(),
        }
    }

    /// First `max_samples` non-null values in column order, rendered as text.
    pub(crate) fn sample_values(&self, max_samples: usize) -> Vec<String> {
        match self {
            ColumnValues::Numeric(v) => v
                .iter()
                .flatten()
                .take(max_samples)
                .map(|x| x.to_string())
                .collect(),
            ColumnValues::Temporal(v) => v
                .iter()
                .flatten()
                .take(max_samples)
                .map(|ts| ts.to_string())
                .collect(),
            ColumnValues::Categorical(v) => v
                .iter()
                .flatten()
                .take(max_samples)
                .cloned()
                .collect(),
        }
    }
}

/// Read a series as values of the declared kind.
///
/// Fails with [`ProfilingError::InvalidColumnKind`] when the data cannot be
/// read as that kind.
pub(crate) fn extract_values(series: &Series, declared: ColumnKind) -> Result<ColumnValues> {
    match declared {
        ColumnKind::Numeric => extract_numeric(series).map(ColumnValues::Numeric),
        ColumnKind::Temporal => extract_temporal(series).map(ColumnValues::Temporal),
        ColumnKind::Categorical => extract_categorical(series).map(ColumnValues::Categorical),
    }
}

fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}

fn invalid_kind(series: &Series, declared: ColumnKind, detail: String) -> ProfilingError {
    ProfilingError::InvalidColumnKind {
        column: series.name().to_string(),
        declared,
        detail,
    }
}

/// Polars refusals on a single column stay with that column.
fn column_error(
    series: &Series,
    declared: ColumnKind,
) -> impl Fn(PolarsError) -> ProfilingError + '_ {
    move |e| invalid_kind(series, declared, e.to_string())
}

fn extract_numeric(series: &Series) -> Result<Vec<Option<f64>>> {
    let dtype = series.dtype();

    if is_numeric_dtype(dtype) || dtype == &DataType::Boolean {
        let floats = series
            .cast(&DataType::Float64)
            .map_err(column_error(series, ColumnKind::Numeric))?;
        // NaN is a missing value, not a number to aggregate
        return Ok(floats
            .f64()
            .map_err(column_error(series, ColumnKind::Numeric))?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect());
    }

    if is_text_dtype(dtype) {
        let strings = series
            .cast(&DataType::String)
            .map_err(column_error(series, ColumnKind::Numeric))?;
        let cells = strings.str().map_err(column_error(series, ColumnKind::Numeric))?;
        let mut values = Vec::with_capacity(strings.len());
        for cell in cells.into_iter() {
            let value = match cell {
                None => None,
                Some(s) if is_missing_token(s) => None,
                Some(s) => match parse_numeric_string(s) {
                    Some(x) if x.is_nan() => None,
                    Some(x) => Some(x),
                    None => {
                        return Err(invalid_kind(
                            series,
                            ColumnKind::Numeric,
                            format!("contains non-numeric token '{}'", s),
                        ));
                    }
                },
            };
            values.push(value);
        }
        return Ok(values);
    }

    Err(invalid_kind(
        series,
        ColumnKind::Numeric,
        format!("has dtype {}", dtype),
    ))
}

fn extract_temporal(series: &Series) -> Result<Vec<Option<NaiveDateTime>>> {
    match series.dtype() {
        DataType::Date => {
            let physical = series.to_physical_repr();
            Ok(physical
                .i32()
                .map_err(column_error(series, ColumnKind::Temporal))?
                .into_iter()
                .map(|days| days.and_then(date_from_epoch_days))
                .collect())
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let physical = series.to_physical_repr();
            Ok(physical
                .i64()
                .map_err(column_error(series, ColumnKind::Temporal))?
                .into_iter()
                .map(|ticks| ticks.and_then(|t| timestamp_from_ticks(t, unit)))
                .collect())
        }
        dtype if is_text_dtype(dtype) => {
            let strings = series
                .cast(&DataType::String)
                .map_err(column_error(series, ColumnKind::Temporal))?;
            let cells = strings.str().map_err(column_error(series, ColumnKind::Temporal))?;
            let mut values = Vec::with_capacity(strings.len());
            for cell in cells.into_iter() {
                let value = match cell {
                    None => None,
                    Some(s) if is_missing_token(s) => None,
                    Some(s) => match parse_timestamp_string(s) {
                        Some(ts) => Some(ts),
                        None => {
                            return Err(invalid_kind(
                                series,
                                ColumnKind::Temporal,
                                format!("contains unparsable timestamp '{}'", s),
                            ));
                        }
                    },
                };
                values.push(value);
            }
            Ok(values)
        }
        dtype => Err(invalid_kind(
            series,
            ColumnKind::Temporal,
            format!("has dtype {}", dtype),
        )),
    }
}

fn extract_categorical(series: &Series) -> Result<Vec<Option<String>>> {
    match series.cast(&DataType::String) {
        Ok(strings) => Ok(strings
            .str()
            .map_err(column_error(series, ColumnKind::Categorical))?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()),
        // nested dtypes (List, Struct, Array) have no string cast
        Err(e) => {
            debug!("Rendering column '{}' value by value: {}", series.name(), e);
            render_values(series)
        }
    }
}

fn render_values(series: &Series) -> Result<Vec<Option<String>>> {
    (0..series.len())
        .map(|idx| -> Result<Option<String>> {
            let value = series
                .get(idx)
                .map_err(column_error(series, ColumnKind::Categorical))?;
            Ok(match value {
                AnyValue::Null => None,
                other => Some(other.to_string()),
            })
        })
        .collect()
}

fn date_from_epoch_days(days: i32) -> Option<NaiveDateTime> {
    let days_from_ce = days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?;
    NaiveDate::from_num_days_from_ce_opt(days_from_ce)?.and_hms_opt(0, 0, 0)
}

fn timestamp_from_ticks(ticks: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let timestamp = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::<Utc>::from_timestamp_nanos(ticks)),
        TimeUnit::Microseconds => DateTime::<Utc>::from_timestamp_micros(ticks),
        TimeUnit::Milliseconds => DateTime::<Utc>::from_timestamp_millis(ticks),
    };
    timestamp.map(|ts| ts.naive_utc())
}
