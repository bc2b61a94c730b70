//! Data Processor Module
//! Handles data cleaning: header normalization, text trimming and
//! duplicate row removal.

use super::loader::INFER_SCHEMA_LENGTH;
use crate::data::schema;
use crate::data::DataLoader;
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Columns {first:?} and {second:?} both normalize to {normalized:?}")]
    ColumnCollision {
        first: String,
        second: String,
        normalized: String,
    },
    #[error("Required column missing after normalization: {0}")]
    MissingColumn(String),
}

/// Cleaned table plus bookkeeping about what cleaning removed.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub df: DataFrame,
    pub input_rows: usize,
}

impl NormalizedTable {
    pub fn output_rows(&self) -> usize {
        self.df.height()
    }

    pub fn duplicates_removed(&self) -> usize {
        self.input_rows - self.df.height()
    }
}

/// Handles data cleaning operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Lower-case, strip and underscore a single column label.
    pub fn normalize_column_name(name: &str) -> String {
        name.to_lowercase().trim().replace(' ', "_")
    }

    /// Rename every column to its normalized label.
    ///
    /// Fails if two labels collapse onto the same normalized name.
    pub fn normalize_headers(df: &mut DataFrame) -> Result<(), ProcessorError> {
        let originals = DataLoader::column_names(df);
        let mut seen: HashMap<String, &str> = HashMap::with_capacity(originals.len());
        let mut renamed = Vec::with_capacity(originals.len());

        for original in &originals {
            let normalized = Self::normalize_column_name(original);
            if let Some(first) = seen.insert(normalized.clone(), original.as_str()) {
                return Err(ProcessorError::ColumnCollision {
                    first: first.to_string(),
                    second: original.clone(),
                    normalized,
                });
            }
            renamed.push(normalized);
        }

        df.set_column_names(renamed.iter().map(|s| s.as_str()))?;
        Ok(())
    }

    /// Strip leading/trailing whitespace from every text column.
    pub fn trim_text_columns(df: DataFrame) -> Result<DataFrame, ProcessorError> {
        let text_cols = DataLoader::text_columns(&df);
        if text_cols.is_empty() {
            return Ok(df);
        }

        let trimmed = df
            .lazy()
            .with_columns(
                text_cols
                    .iter()
                    .map(|c| col(c.as_str()).str().strip_chars(lit(NULL)))
                    .collect::<Vec<_>>(),
            )
            .collect()?;
        Ok(trimmed)
    }

    /// Re-run CSV dtype inference over the text columns.
    ///
    /// Padding can make a numeric column load as text (" 12"); once trimmed,
    /// such a column takes the dtype a reload of the cleaned file infers.
    pub fn reinfer_text_columns(mut df: DataFrame) -> Result<DataFrame, ProcessorError> {
        let text_cols = DataLoader::text_columns(&df);
        if text_cols.is_empty() {
            return Ok(df);
        }

        let mut text = df.select(text_cols.iter().map(|c| c.as_str()))?;
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .finish(&mut text)?;

        let reparsed = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(INFER_SCHEMA_LENGTH)
            .into_reader_with_file_handle(Cursor::new(buf))
            .finish()?;

        for column in reparsed.get_columns() {
            if column.dtype() != &DataType::String {
                log::debug!("Column '{}' re-inferred as {}", column.name(), column.dtype());
            }
            df.with_column(column.clone())?;
        }
        Ok(df)
    }

    /// Remove rows equal in every column, keeping the first occurrence.
    pub fn drop_duplicate_rows(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
    }

    /// Run the full cleaning pass over a freshly loaded table.
    pub fn normalize(mut df: DataFrame) -> Result<NormalizedTable, ProcessorError> {
        let input_rows = df.height();

        Self::normalize_headers(&mut df)?;
        let df = Self::trim_text_columns(df)?;
        let df = Self::reinfer_text_columns(df)?;
        let df = Self::drop_duplicate_rows(&df)?;

        let table = NormalizedTable { df, input_rows };
        log::info!(
            "Normalized table: {} rows in, {} rows out ({} duplicates removed)",
            table.input_rows,
            table.output_rows(),
            table.duplicates_removed()
        );
        Ok(table)
    }

    /// Ensure the columns every aggregation depends on are present.
    pub fn require_mandatory_columns(df: &DataFrame) -> Result<(), ProcessorError> {
        match schema::missing_mandatory(df).first() {
            Some(missing) => Err(ProcessorError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn column_names_are_lowercased_and_underscored() {
        assert_eq!(DataProcessor::normalize_column_name("ParkName"), "parkname");
        assert_eq!(DataProcessor::normalize_column_name(" Park Name "), "park_name");
        assert_eq!(
            DataProcessor::normalize_column_name("Category Name"),
            "category_name"
        );
    }

    #[test]
    fn header_normalization_is_idempotent() {
        for raw in ["ParkName", "  Sci Name", "Nativeness ", "family"] {
            let once = DataProcessor::normalize_column_name(raw);
            assert_eq!(DataProcessor::normalize_column_name(&once), once);
        }
    }

    #[test]
    fn colliding_headers_are_a_schema_error() {
        let mut df = df! {
            "Family" => ["Ursidae"],
            "family " => ["Canidae"],
        }
        .unwrap();

        let err = DataProcessor::normalize_headers(&mut df).unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::ColumnCollision { ref normalized, .. } if normalized == "family"
        ));
    }

    #[test]
    fn trims_text_but_leaves_numbers_alone() {
        let df = df! {
            "sciname" => [" Ursus americanus ", "Canis latrans\t"],
            "count" => [3i64, 4],
        }
        .unwrap();

        let out = DataProcessor::trim_text_columns(df).unwrap();
        assert_eq!(
            string_values(&out, "sciname"),
            vec![
                Some("Ursus americanus".to_string()),
                Some("Canis latrans".to_string())
            ]
        );
        let counts: Vec<Option<i64>> = out
            .column("count")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(counts, vec![Some(3), Some(4)]);
    }

    #[test]
    fn normalize_collapses_whitespace_duplicates() {
        let df = df! {
            "ParkName" => ["Bryce Canyon", "Bryce Canyon"],
            "SciName" => [" Ursus americanus ", "Ursus americanus"],
        }
        .unwrap();

        let table = DataProcessor::normalize(df).unwrap();
        assert_eq!(
            DataLoader::column_names(&table.df),
            vec!["parkname", "sciname"]
        );
        assert_eq!(table.output_rows(), 1);
        assert_eq!(table.duplicates_removed(), 1);
        assert_eq!(
            string_values(&table.df, "sciname"),
            vec![Some("Ursus americanus".to_string())]
        );
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let df = df! {
            "parkname" => ["C", "A", "C", "B", "A"],
            "sciname" => ["x", "y", "x", "z", "y"],
        }
        .unwrap();

        let out = DataProcessor::drop_duplicate_rows(&df).unwrap();
        assert!(out.height() <= df.height());
        assert_eq!(
            string_values(&out, "parkname"),
            vec![Some("C".into()), Some("A".into()), Some("B".into())]
        );
    }

    #[test]
    fn rows_differing_in_one_column_survive() {
        let df = df! {
            "parkname" => ["Zion", "Zion"],
            "sciname" => ["Ursus americanus", "Ursus americanus"],
            "nativeness" => ["Native", "Not Native"],
        }
        .unwrap();

        let out = DataProcessor::drop_duplicate_rows(&df).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn no_text_value_keeps_surrounding_whitespace() {
        let df = df! {
            "Park Name" => ["  Zion", "Yosemite  ", " Zion "],
            "Family" => ["Ursidae ", " Canidae", "Ursidae"],
        }
        .unwrap();

        let table = DataProcessor::normalize(df).unwrap();
        for name in DataLoader::text_columns(&table.df) {
            for value in string_values(&table.df, &name).into_iter().flatten() {
                assert_eq!(value.trim(), value);
            }
        }
    }

    #[test]
    fn padded_numbers_become_numeric_after_trimming() {
        let df = df! {
            "ParkName" => ["Zion", "Zion"],
            "SciName" => ["Ursus americanus", "Canis latrans"],
            "Code" => [" 12", "7 "],
        }
        .unwrap();

        let table = DataProcessor::normalize(df).unwrap();
        let codes: Vec<Option<i64>> = table
            .df
            .column("code")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(codes, vec![Some(12), Some(7)]);
        assert_eq!(
            DataLoader::column_names(&table.df),
            vec!["parkname", "sciname", "code"]
        );
        assert_eq!(DataLoader::text_columns(&table.df), vec!["parkname", "sciname"]);
    }

    #[test]
    fn mandatory_columns_are_checked() {
        let df = df! { "parkname" => ["Zion"] }.unwrap();
        let err = DataProcessor::require_mandatory_columns(&df).unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(ref c) if c == "sciname"));
    }
}
