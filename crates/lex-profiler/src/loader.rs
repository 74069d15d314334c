//! Table loading and row sampling.
//!
//! Files are read eagerly into a [`DataFrame`]. CSV files are read with date
//! parsing enabled so timestamp columns arrive as temporal dtypes.

use crate::error::{ProfilingError, Result, ResultExt};
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Rows used to infer CSV column dtypes.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Load a CSV or Parquet file, chosen by extension.
pub fn load_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let df = match extension.as_str() {
        "csv" => read_csv(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        _ => {
            return Err(ProfilingError::UnsupportedFormat(format!(
                "{} (expected .csv or .parquet)",
                path.display()
            )));
        }
    };

    info!(
        "Loaded {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .context(format!("Failed to read CSV file {}", path.display()))
}

fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    ParquetReader::new(file)
        .finish()
        .context(format!("Failed to read Parquet file {}", path.display()))
}

/// Draw `n` rows uniformly without replacement, reproducible for a given seed.
///
/// Sampled rows keep their original relative order. When `n` is at least the
/// table height the table is returned unchanged.
pub fn sample_rows(df: &DataFrame, n: usize, seed: u64) -> Result<DataFrame> {
    let height = df.height();
    if n >= height {
        debug!("Sample of {} rows covers all {} rows", n, height);
        return Ok(df.clone());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked: Vec<IdxSize> = index::sample(&mut rng, height, n)
        .into_iter()
        .map(|i| i as IdxSize)
        .collect();
    picked.sort_unstable();

    let indices = IdxCa::from_vec("sample_idx".into(), picked);
    let sampled = df.take(&indices).context("Failed to sample rows")?;

    info!("Sampled {} of {} rows (seed {})", n, height, seed);
    Ok(sampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv_parses_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "trips.csv",
            "tpep_pickup_datetime,fare_amount,store_and_fwd_flag\n\
             2024-01-01 00:57:55,17.7,N\n\
             2024-01-01 00:03:00,10.0,N\n\
             2024-01-01 00:17:06,23.3,Y\n",
        );

        let df = load_table(&path).unwrap();
        assert_eq!(df.shape(), (3, 3));
        assert!(matches!(
            df.column("tpep_pickup_datetime").unwrap().dtype(),
            DataType::Datetime(_, _)
        ));
        assert_eq!(df.column("fare_amount").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("store_and_fwd_flag").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_load_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trips.parquet");
        let mut df = df!(
            "trip_distance" => &[1.2f64, 0.0, 3.4],
            "VendorID" => &[1i64, 2, 2],
        )
        .unwrap();
        let file = File::create(&path).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();

        let loaded = load_table(&path).unwrap();
        assert!(loaded.equals(&df));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_table("Online Retail.xlsx").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_table(dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_sample_rows_is_reproducible() {
        let df = df!("id" => (0..100i64).collect::<Vec<_>>()).unwrap();

        let first = sample_rows(&df, 10, 42).unwrap();
        let second = sample_rows(&df, 10, 42).unwrap();

        assert_eq!(first.height(), 10);
        assert!(first.equals(&second));

        let ids: Vec<i64> = first.column("id").unwrap().i64().unwrap().into_no_null_iter().collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_sample_larger_than_table_returns_all() {
        let df = df!("id" => &[1i64, 2, 3]).unwrap();
        let sampled = sample_rows(&df, 10, 7).unwrap();
        assert!(sampled.equals(&df));
    }
}
