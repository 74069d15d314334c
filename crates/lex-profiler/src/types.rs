use crate::utils::{is_numeric_dtype, is_temporal_dtype};
use chrono::NaiveDateTime;
use polars::prelude::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Column Kinds
// ============================================================================

/// The logical kind a column is profiled as.
///
/// The kind decides which statistics block a [`ColumnProfile`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Temporal,
    Categorical,
}

impl ColumnKind {
    /// Derive the kind from a column's dtype.
    ///
    /// Integers and floats are numeric, dates and datetimes are temporal,
    /// everything else (strings, categoricals, booleans, ...) is categorical.
    pub fn from_dtype(dtype: &DataType) -> Self {
        if is_numeric_dtype(dtype) {
            ColumnKind::Numeric
        } else if is_temporal_dtype(dtype) {
            ColumnKind::Temporal
        } else {
            ColumnKind::Categorical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Temporal => "temporal",
            ColumnKind::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(ColumnKind::Numeric),
            "temporal" | "datetime" => Ok(ColumnKind::Temporal),
            "categorical" | "text" | "string" => Ok(ColumnKind::Categorical),
            other => Err(format!(
                "unknown column kind '{}' (expected numeric, temporal or categorical)",
                other
            )),
        }
    }
}

// ============================================================================
// Column Profiles
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Physical dtype of the source column, e.g. `f64` or `datetime[μs]`.
    pub dtype: String,
    pub declared_kind: ColumnKind,
    pub row_count: usize,
    pub null_count: usize,
    pub null_fraction: f64,
    pub unique_count: usize,
    /// First non-null values in column order, for human inspection only.
    pub sample_values: Vec<String>,
    pub stats: ColumnStats,
}

impl ColumnProfile {
    /// Number of non-null entries in the column.
    pub fn non_null_count(&self) -> usize {
        self.row_count - self.null_count
    }

    /// Null share as a percentage (0 - 100).
    pub fn null_percentage(&self) -> f64 {
        self.null_fraction * 100.0
    }

    pub fn numeric(&self) -> Option<&NumericStats> {
        match &self.stats {
            ColumnStats::Numeric(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn temporal(&self) -> Option<&TemporalStats> {
        match &self.stats {
            ColumnStats::Temporal(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn categorical(&self) -> Option<&CategoricalStats> {
        match &self.stats {
            ColumnStats::Categorical(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn is_profilable(&self) -> bool {
        !matches!(self.stats, ColumnStats::Unprofilable { .. })
    }
}

/// Kind-specific statistics of a column.
///
/// Exactly one block exists per profile. `Unprofilable` stands in for the
/// numeric or temporal block when the column holds no usable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnStats {
    Numeric(NumericStats),
    Temporal(TemporalStats),
    Categorical(CategoricalStats),
    Unprofilable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub stddev: f64,
    pub q1: f64,
    pub q3: f64,
    /// Lower IQR fence; values strictly below are outliers.
    pub lower_fence: f64,
    /// Upper IQR fence; values strictly above are outliers.
    pub upper_fence: f64,
    pub outlier_count: usize,
    /// Outliers over the full column length, nulls included.
    pub outlier_fraction: f64,
    /// `mean - sigma * stddev`, not clamped to the observed range.
    pub suggested_min: f64,
    /// `mean + sigma * stddev`, not clamped to the observed range.
    pub suggested_max: f64,
    pub zero_count: usize,
    /// Finite values strictly below zero.
    pub negative_count: usize,
    /// Infinite values, excluded from every statistic above.
    pub non_finite_count: usize,
}

impl NumericStats {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalStats {
    pub min_timestamp: NaiveDateTime,
    pub max_timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStats {
    /// Most frequent values, highest count first.
    pub top_values: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

// ============================================================================
// Dataset Profile
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub shape: (usize, usize),
    /// Column profiles in table order.
    pub columns: Vec<ColumnProfile>,
    /// Columns that could not be profiled at all.
    pub failures: Vec<ColumnFailure>,
    /// Every column name in table order, profiled or failed.
    pub column_order: Vec<String>,
}

impl DatasetProfile {
    /// Look up a column profile by name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|col| col.name.as_str())
    }

    pub fn failure(&self, name: &str) -> Option<&ColumnFailure> {
        self.failures.iter().find(|failure| failure.column == name)
    }

    /// Names of columns whose kind-specific block could not be computed.
    pub fn unprofilable_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|col| !col.is_profilable())
            .map(|col| col.name.as_str())
            .collect()
    }

    /// True when every column produced a profile.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A column that failed profiling with a column-level error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFailure {
    pub column: String,
    pub code: String,
    pub message: String,
}

impl ColumnFailure {
    pub fn new(column: impl Into<String>, error: &crate::error::ProfilingError) -> Self {
        Self {
            column: column.into(),
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

// ============================================================================
// Quality Rules
// ============================================================================

/// How strongly a violated rule should be treated downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

/// The check a rule asks a validator to perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleKind {
    NotNull,
    ValueRange { min: f64, max: f64 },
    WarnZeros { zero_count: usize },
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::NotNull => "not_null",
            RuleKind::ValueRange { .. } => "value_range",
            RuleKind::WarnZeros { .. } => "warn_zeros",
        }
    }
}

/// A suggested, not yet enforced, quality check for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRule {
    pub column: String,
    #[serde(flatten)]
    pub kind: RuleKind,
    pub severity: Severity,
    pub description: String,
}

/// Profile and suggested rules of one profiling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilingOutcome {
    pub profile: DatasetProfile,
    pub rules: Vec<QualityRule>,
}

// Profiles are plain values and may be handed across threads.
static_assertions::assert_impl_all!(DatasetProfile: Send, Sync);
static_assertions::assert_impl_all!(QualityRule: Send, Sync);
