//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling datasets, including:
//! - Reading each column as its declared kind (numeric, temporal, categorical)
//! - Kind-specific statistics and IQR outlier detection
//! - Assembly of the dataset-level profile
//!
//! Profiling is a pure function of the table and the configuration. Columns
//! are processed in table order and the input is never mutated.

mod extraction;
mod statistics;

use crate::config::ProfilerConfig;
use crate::error::{ProfilingError, Result};
use crate::quality::synthesize_rules;
use crate::types::{
    ColumnFailure, ColumnKind, ColumnProfile, ColumnStats, DatasetProfile, ProfilingOutcome,
};
use polars::prelude::*;
use tracing::{debug, info, warn};

use extraction::{ColumnValues, extract_values};
use statistics::{categorical_stats, numeric_stats, temporal_stats};

/// Profile every column of a table.
///
/// Fails with [`ProfilingError::EmptyTable`] when the table has no rows or no
/// columns, and with [`ProfilingError::ColumnNotFound`] when a kind override
/// names a column the table does not have. Columns whose values contradict
/// their declared kind are listed in [`DatasetProfile::failures`]; all other
/// columns are still profiled.
pub fn build_profile(df: &DataFrame, config: &ProfilerConfig) -> Result<DatasetProfile> {
    config
        .validate()
        .map_err(|e| ProfilingError::InvalidConfig(e.to_string()))?;

    let (rows, columns) = df.shape();
    if rows == 0 || columns == 0 {
        return Err(ProfilingError::EmptyTable { rows, columns });
    }

    for name in config.kind_overrides.keys() {
        if df.column(name).is_err() {
            return Err(ProfilingError::ColumnNotFound(name.clone()));
        }
    }

    info!("Profiling dataset: {} rows x {} columns", rows, columns);

    let mut column_profiles = Vec::with_capacity(columns);
    let mut failures = Vec::new();

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let name = series.name().to_string();
        let declared = config.kind_for(&name, ColumnKind::from_dtype(series.dtype()));

        match profile_column(series, declared, config) {
            Ok(profile) => column_profiles.push(profile),
            Err(e) if e.is_column_level() => {
                warn!("Skipping column '{}': {}", name, e);
                failures.push(ColumnFailure::new(name, &e));
            }
            Err(e) => return Err(e.with_context(format!("While profiling column '{}'", name))),
        }
    }

    info!(
        "Profiled {} columns ({} failed)",
        column_profiles.len(),
        failures.len()
    );

    Ok(DatasetProfile {
        shape: (rows, columns),
        columns: column_profiles,
        failures,
        column_order: df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect(),
    })
}

/// Profile a single column as the given kind.
///
/// A numeric or temporal column without any usable value still yields a
/// profile, with [`ColumnStats::Unprofilable`] in place of the statistics.
/// A zero-length column cannot be profiled and is reported as
/// [`ProfilingError::UnprofilableColumn`].
pub fn profile_column(
    series: &Series,
    declared: ColumnKind,
    config: &ProfilerConfig,
) -> Result<ColumnProfile> {
    let name = series.name().to_string();
    let row_count = series.len();

    if row_count == 0 {
        return Err(ProfilingError::UnprofilableColumn {
            column: name,
            reason: "column has no rows".to_string(),
        });
    }

    let values = extract_values(series, declared)?;
    let null_count = values.null_count();
    let unique_count = values.unique_count();
    let sample_values = values.sample_values(config.sample_size);

    let computed = match &values {
        ColumnValues::Numeric(v) => numeric_stats(&name, v, config).map(ColumnStats::Numeric),
        ColumnValues::Temporal(v) => temporal_stats(&name, v).map(ColumnStats::Temporal),
        ColumnValues::Categorical(v) => Ok(ColumnStats::Categorical(categorical_stats(
            v,
            config.top_n_categorical,
        ))),
    };

    let stats = match computed {
        Ok(stats) => stats,
        Err(ProfilingError::UnprofilableColumn { reason, .. }) => {
            warn!("No {} statistics for column '{}': {}", declared, name, reason);
            ColumnStats::Unprofilable { reason }
        }
        Err(e) => return Err(e),
    };

    debug!(
        "Column '{}': kind={}, nulls={}/{}, unique={}",
        name, declared, null_count, row_count, unique_count
    );

    Ok(ColumnProfile {
        name,
        dtype: series.dtype().to_string(),
        declared_kind: values.kind(),
        row_count,
        null_count,
        null_fraction: null_count as f64 / row_count as f64,
        unique_count,
        sample_values,
        stats,
    })
}

/// Profile a table and derive the suggested quality rules in one call.
pub fn analyze(df: &DataFrame, config: &ProfilerConfig) -> Result<ProfilingOutcome> {
    let profile = build_profile(df, config)?;
    let rules = synthesize_rules(&profile, config);
    Ok(ProfilingOutcome { profile, rules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn trips() -> DataFrame {
        df!(
            "passenger_count" => &[Some(1i64), Some(2), None, Some(1), Some(5)],
            "fare_amount" => &[12.5f64, 0.0, 7.0, 70.0, 9.5],
            "store_and_fwd_flag" => &[Some("N"), Some("N"), Some("Y"), None, Some("N")],
        )
        .unwrap()
    }

    #[test]
    fn test_profile_covers_all_columns_in_order() {
        let profile = build_profile(&trips(), &ProfilerConfig::default()).unwrap();

        assert_eq!(profile.shape, (5, 3));
        assert!(profile.is_complete());
        let names: Vec<&str> = profile.column_names().collect();
        assert_eq!(names, vec!["passenger_count", "fare_amount", "store_and_fwd_flag"]);
    }

    #[test]
    fn test_kinds_follow_dtypes() {
        let profile = build_profile(&trips(), &ProfilerConfig::default()).unwrap();

        assert_eq!(
            profile.column("passenger_count").unwrap().declared_kind,
            ColumnKind::Numeric
        );
        assert!(profile.column("fare_amount").unwrap().numeric().is_some());

        let flag = profile.column("store_and_fwd_flag").unwrap();
        assert_eq!(flag.declared_kind, ColumnKind::Categorical);
        let top = &flag.categorical().unwrap().top_values;
        assert_eq!(top[0].value, "N");
        assert_eq!(top[0].count, 3);
    }

    #[test]
    fn test_null_accounting() {
        let profile = build_profile(&trips(), &ProfilerConfig::default()).unwrap();

        for col in &profile.columns {
            assert_eq!(col.null_count + col.non_null_count(), col.row_count);
            assert_eq!(col.null_fraction, col.null_count as f64 / col.row_count as f64);
        }
        let passengers = profile.column("passenger_count").unwrap();
        assert_eq!(passengers.null_count, 1);
        assert_eq!(passengers.null_fraction, 0.2);
        assert_eq!(passengers.unique_count, 3);
        assert_eq!(passengers.sample_values, vec!["1", "2", "1", "5"]);
    }

    #[test]
    fn test_empty_table_rejected() {
        let df = df!("fare_amount" => Vec::<f64>::new()).unwrap();
        let err = build_profile(&df, &ProfilerConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ProfilingError::EmptyTable {
                rows: 0,
                columns: 1
            }
        ));

        let err = build_profile(&DataFrame::empty(), &ProfilerConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_TABLE");
    }

    #[test]
    fn test_all_null_column_is_unprofilable_not_fatal() {
        let df = df!(
            "airport_fee" => &[None::<f64>, None, None],
            "trip_distance" => &[1.2f64, 3.4, 0.8],
        )
        .unwrap();
        let profile = build_profile(&df, &ProfilerConfig::default()).unwrap();

        let fee = profile.column("airport_fee").unwrap();
        assert_eq!(fee.declared_kind, ColumnKind::Numeric);
        assert_eq!(fee.unique_count, 0);
        assert_eq!(fee.null_fraction, 1.0);
        assert!(fee.sample_values.is_empty());
        assert!(matches!(fee.stats, ColumnStats::Unprofilable { .. }));
        assert_eq!(profile.unprofilable_columns(), vec!["airport_fee"]);
        assert!(profile.column("trip_distance").unwrap().numeric().is_some());
    }

    #[test]
    fn test_invalid_kind_is_isolated() {
        let df = df!(
            "Quantity" => &["6", "ten", "8"],
            "Country" => &["United Kingdom", "France", "United Kingdom"],
        )
        .unwrap();
        let config = ProfilerConfig::builder()
            .declare_kind("Quantity", ColumnKind::Numeric)
            .build()
            .unwrap();

        let profile = build_profile(&df, &config).unwrap();

        assert!(!profile.is_complete());
        assert!(profile.column("Quantity").is_none());
        assert_eq!(profile.failure("Quantity").unwrap().code, "INVALID_COLUMN_KIND");
        assert!(profile.column("Country").is_some());
    }

    #[test]
    fn test_list_column_does_not_abort_siblings() {
        let tags = Series::new(
            "tags".into(),
            &[
                Series::new("".into(), &[1i64, 2]),
                Series::new("".into(), &[3i64]),
                Series::new("".into(), &[4i64, 5, 6]),
            ],
        );
        let fare = Series::new("fare_amount".into(), &[12.5f64, 7.0, 9.5]);
        let df = DataFrame::new(vec![fare.into_column(), tags.into_column()]).unwrap();

        let profile = build_profile(&df, &ProfilerConfig::default()).unwrap();

        assert!(profile.column("fare_amount").unwrap().numeric().is_some());
        let tags = profile.column("tags").unwrap();
        assert_eq!(tags.declared_kind, ColumnKind::Categorical);
        assert_eq!(tags.unique_count, 3);
        assert_eq!(tags.categorical().unwrap().top_values.len(), 3);
    }

    #[test]
    fn test_list_column_declared_numeric_is_recorded_as_failure() {
        let tags = Series::new(
            "tags".into(),
            &[Series::new("".into(), &[1i64]), Series::new("".into(), &[2i64])],
        );
        let fare = Series::new("fare_amount".into(), &[12.5f64, 7.0]);
        let df = DataFrame::new(vec![fare.into_column(), tags.into_column()]).unwrap();
        let config = ProfilerConfig::builder()
            .declare_kind("tags", ColumnKind::Numeric)
            .build()
            .unwrap();

        let profile = build_profile(&df, &config).unwrap();

        assert_eq!(profile.failure("tags").unwrap().code, "INVALID_COLUMN_KIND");
        assert!(profile.column("fare_amount").is_some());
        assert_eq!(profile.column_order, vec!["fare_amount", "tags"]);
    }

    #[test]
    fn test_override_for_unknown_column_rejected() {
        let config = ProfilerConfig::builder()
            .declare_kind("no_such_column", ColumnKind::Temporal)
            .build()
            .unwrap();
        let err = build_profile(&trips(), &config).unwrap_err();
        assert!(matches!(err, ProfilingError::ColumnNotFound(name) if name == "no_such_column"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ProfilerConfig {
            not_null_threshold: 2.0,
            ..ProfilerConfig::default()
        };
        let err = build_profile(&trips(), &config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_string_column_declared_temporal() {
        let df = df!("InvoiceDate" => &["12/1/2010 8:26", "12/9/2011 12:50", "1/4/2011 10:00"]).unwrap();
        let config = ProfilerConfig::builder()
            .declare_kind("InvoiceDate", ColumnKind::Temporal)
            .build()
            .unwrap();

        let profile = build_profile(&df, &config).unwrap();
        let stats = profile.column("InvoiceDate").unwrap().temporal().unwrap();
        assert_eq!(stats.min_timestamp.to_string(), "2010-12-01 08:26:00");
        assert_eq!(stats.max_timestamp.to_string(), "2011-12-09 12:50:00");
    }

    #[test]
    fn test_zero_length_column_is_unprofilable() {
        let series = Series::new("empty".into(), Vec::<f64>::new());
        let err = profile_column(&series, ColumnKind::Numeric, &ProfilerConfig::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "UNPROFILABLE_COLUMN");
    }

    #[test]
    fn test_profiling_is_idempotent() {
        let df = trips();
        let config = ProfilerConfig::default();

        let first = analyze(&df, &config).unwrap();
        let second = analyze(&df, &config).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
