//! Configuration types for the profiler.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic profiler setup.

use crate::types::ColumnKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for profiling and rule suggestion.
///
/// Use [`ProfilerConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_profiler::config::ProfilerConfig;
/// use lex_profiler::ColumnKind;
///
/// let config = ProfilerConfig::builder()
///     .not_null_threshold(0.01)
///     .declare_kind("InvoiceDate", ColumnKind::Temporal)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Width of the IQR outlier fences, in multiples of the IQR.
    /// Default: 1.5
    pub outlier_iqr_multiplier: f64,

    /// Width of the suggested value range, in standard deviations around the mean.
    /// Default: 3.0
    pub rule_bound_sigma: f64,

    /// A NotNull rule is suggested only for columns whose null fraction is
    /// strictly below this value (0.0 - 1.0).
    /// Default: 0.05
    pub not_null_threshold: f64,

    /// Number of most frequent values kept for categorical columns.
    /// Default: 5
    pub top_n_categorical: usize,

    /// Number of leading non-null values kept as samples.
    /// Default: 5
    pub sample_size: usize,

    /// Kinds to use instead of the dtype-derived ones, keyed by column name.
    /// Default: empty
    pub kind_overrides: BTreeMap<String, ColumnKind>,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            outlier_iqr_multiplier: 1.5,
            rule_bound_sigma: 3.0,
            not_null_threshold: 0.05,
            top_n_categorical: 5,
            sample_size: 5,
            kind_overrides: BTreeMap::new(),
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.outlier_iqr_multiplier.is_finite() || self.outlier_iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier {
                field: "outlier_iqr_multiplier".to_string(),
                value: self.outlier_iqr_multiplier,
            });
        }

        if !self.rule_bound_sigma.is_finite() || self.rule_bound_sigma < 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier {
                field: "rule_bound_sigma".to_string(),
                value: self.rule_bound_sigma,
            });
        }

        if !(0.0..=1.0).contains(&self.not_null_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "not_null_threshold".to_string(),
                value: self.not_null_threshold,
            });
        }

        if self.top_n_categorical == 0 {
            return Err(ConfigValidationError::InvalidTopN(self.top_n_categorical));
        }

        Ok(())
    }

    /// Kind to profile `column` as, given its dtype-derived kind.
    pub fn kind_for(&self, column: &str, dtype_kind: ColumnKind) -> ColumnKind {
        self.kind_overrides
            .get(column)
            .copied()
            .unwrap_or(dtype_kind)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid multiplier for '{field}': {value} (must be a finite, non-negative number)")]
    InvalidMultiplier { field: String, value: f64 },

    #[error("Invalid top-N for categorical values: {0} (must be at least 1)")]
    InvalidTopN(usize),
}

/// Builder for [`ProfilerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProfilerConfigBuilder {
    outlier_iqr_multiplier: Option<f64>,
    rule_bound_sigma: Option<f64>,
    not_null_threshold: Option<f64>,
    top_n_categorical: Option<usize>,
    sample_size: Option<usize>,
    kind_overrides: BTreeMap<String, ColumnKind>,
}

impl ProfilerConfigBuilder {
    /// Set the IQR multiplier for outlier fences.
    ///
    /// # Arguments
    /// * `multiplier` - Non-negative fence width (e.g., 1.5 = Tukey fences)
    pub fn outlier_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.outlier_iqr_multiplier = Some(multiplier);
        self
    }

    /// Set how many standard deviations the suggested range spans on each side.
    pub fn rule_bound_sigma(mut self, sigma: f64) -> Self {
        self.rule_bound_sigma = Some(sigma);
        self
    }

    /// Set the maximum null fraction for which a NotNull rule is still suggested.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.05 = 5%)
    pub fn not_null_threshold(mut self, threshold: f64) -> Self {
        self.not_null_threshold = Some(threshold);
        self
    }

    /// Set how many frequent values categorical profiles keep.
    pub fn top_n_categorical(mut self, n: usize) -> Self {
        self.top_n_categorical = Some(n);
        self
    }

    /// Set how many sample values each profile keeps.
    pub fn sample_size(mut self, n: usize) -> Self {
        self.sample_size = Some(n);
        self
    }

    /// Profile `column` as `kind` regardless of its dtype.
    pub fn declare_kind(mut self, column: impl Into<String>, kind: ColumnKind) -> Self {
        self.kind_overrides.insert(column.into(), kind);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProfilerConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProfilerConfig, ConfigValidationError> {
        let config = ProfilerConfig {
            outlier_iqr_multiplier: self.outlier_iqr_multiplier.unwrap_or(1.5),
            rule_bound_sigma: self.rule_bound_sigma.unwrap_or(3.0),
            not_null_threshold: self.not_null_threshold.unwrap_or(0.05),
            top_n_categorical: self.top_n_categorical.unwrap_or(5),
            sample_size: self.sample_size.unwrap_or(5),
            kind_overrides: self.kind_overrides,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProfilerConfig::default();
        assert_eq!(config.outlier_iqr_multiplier, 1.5);
        assert_eq!(config.rule_bound_sigma, 3.0);
        assert_eq!(config.not_null_threshold, 0.05);
        assert_eq!(config.top_n_categorical, 5);
        assert_eq!(config.sample_size, 5);
        assert!(config.kind_overrides.is_empty());
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = ProfilerConfig::builder().build().unwrap();
        assert_eq!(config, ProfilerConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = ProfilerConfig::builder()
            .outlier_iqr_multiplier(3.0)
            .rule_bound_sigma(2.0)
            .not_null_threshold(0.01)
            .top_n_categorical(2)
            .sample_size(3)
            .declare_kind("tpep_pickup_datetime", ColumnKind::Temporal)
            .build()
            .unwrap();

        assert_eq!(config.outlier_iqr_multiplier, 3.0);
        assert_eq!(config.rule_bound_sigma, 2.0);
        assert_eq!(config.not_null_threshold, 0.01);
        assert_eq!(config.top_n_categorical, 2);
        assert_eq!(config.sample_size, 3);
        assert_eq!(
            config.kind_for("tpep_pickup_datetime", ColumnKind::Categorical),
            ColumnKind::Temporal
        );
        assert_eq!(
            config.kind_for("fare_amount", ColumnKind::Numeric),
            ColumnKind::Numeric
        );
    }

    #[test]
    fn test_validation_invalid_threshold() {
        let result = ProfilerConfig::builder().not_null_threshold(1.5).build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_validation_invalid_multiplier() {
        let result = ProfilerConfig::builder().outlier_iqr_multiplier(-1.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMultiplier { .. }
        ));

        let result = ProfilerConfig::builder().rule_bound_sigma(f64::NAN).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMultiplier { .. }
        ));
    }

    #[test]
    fn test_validation_invalid_top_n() {
        let result = ProfilerConfig::builder().top_n_categorical(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidTopN(0)
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{
            "not_null_threshold": 0.1,
            "kind_overrides": { "InvoiceDate": "temporal" }
        }"#;

        let config: ProfilerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.not_null_threshold, 0.1);
        assert_eq!(config.outlier_iqr_multiplier, 1.5);
        assert_eq!(
            config.kind_overrides.get("InvoiceDate"),
            Some(&ColumnKind::Temporal)
        );
    }
}
