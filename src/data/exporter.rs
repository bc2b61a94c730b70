//! CSV Exporter Module
//! Writes the cleaned table to a flat file for downstream tools.

use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write CSV {path}: {source}")]
    DataAccess {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

pub struct DataExporter;

impl DataExporter {
    /// Write `df` as CSV, header row first, no index column.
    pub fn write_csv(df: &DataFrame, path: &Path) -> Result<(), ExporterError> {
        let io_err = |source: std::io::Error| ExporterError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = File::create(path).map_err(io_err)?;

        // CsvWriter::finish wants a mutable frame; it may rechunk.
        let mut out = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut out)
            .map_err(|source| ExporterError::DataAccess {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("Wrote {} rows to {}", df.height(), path.display());
        Ok(())
    }
}
