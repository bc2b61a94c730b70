//! CSV Data Loader Module
//! Reads the species observation file into a Polars DataFrame.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rows scanned for dtype inference; `None` scans the whole file so the
/// inferred schema depends only on the set of values in each column.
pub(crate) const INFER_SCHEMA_LENGTH: Option<usize> = None;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to load CSV {path}: {source}")]
    DataAccess {
        path: PathBuf,
        #[source]
        source: BoxedSource,
    },
    #[error("No header row in {0}")]
    NoHeader(PathBuf),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file, inferring columns from its header row.
    ///
    /// Every record must have as many fields as the header.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let access = |source: BoxedSource| LoaderError::DataAccess {
            path: path.to_path_buf(),
            source,
        };

        let header_width = Self::check_record_widths(path).map_err(|e| access(e.into()))?;
        if header_width == 0 {
            return Err(LoaderError::NoHeader(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(INFER_SCHEMA_LENGTH)
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(|e| access(e.into()))?;

        log::info!(
            "Loaded {} rows, {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(df)
    }

    /// Scan the file once with a strict reader; polars pads short rows with
    /// nulls, so width mismatches are caught here. Returns the header width.
    fn check_record_widths(path: &Path) -> Result<usize, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;
        let width = reader.headers()?.len();

        let mut record = csv::StringRecord::new();
        while reader.read_record(&mut record)? {}
        Ok(width)
    }

    /// Get list of column names.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Get list of text-valued column names.
    pub fn text_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| matches!(col.dtype(), DataType::String))
            .map(|col| col.name().to_string())
            .collect()
    }
}
