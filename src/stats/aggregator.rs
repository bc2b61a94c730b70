//! Species Aggregator Module
//! Grouped distinct-species counts over the cleaned observation table.

use crate::data::schema::{
    self, SchemaCapabilities, CATEGORY_NAME, FAMILY, NATIVENESS, PARK_NAME, SCI_NAME,
};
use crate::data::{DataProcessor, ProcessorError};
use polars::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

const SPECIES_COUNT: &str = "species_count";

/// Number of families kept by the family ranking.
pub const TOP_FAMILIES: usize = 10;

#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Schema(#[from] ProcessorError),
}

/// Distinct scientific names observed within one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesCount {
    pub key: String,
    pub species_count: u64,
}

/// Native vs non-native composition of one park.
#[derive(Debug, Clone, PartialEq)]
pub struct NativenessShare {
    pub park: String,
    /// Distinct species per nativeness value.
    pub counts: BTreeMap<String, u64>,
    pub total: u64,
    pub native_percent: f64,
    pub nonnative_percent: f64,
}

impl NativenessShare {
    /// Build the share for a park; `None` when the park has no species,
    /// since a percentage of zero is undefined.
    pub fn from_counts(park: String, counts: BTreeMap<String, u64>) -> Option<Self> {
        let total: u64 = counts.values().sum();
        if total == 0 {
            return None;
        }

        let native = counts.get(schema::NATIVE).copied().unwrap_or(0);
        let native_percent = native as f64 / total as f64 * 100.0;

        Some(Self {
            park,
            counts,
            total,
            native_percent,
            nonnative_percent: 100.0 - native_percent,
        })
    }
}

/// All four summaries; optional ones are `None` when their column is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesReport {
    pub by_park: Vec<SpeciesCount>,
    pub nativeness: Option<Vec<NativenessShare>>,
    pub by_category: Option<Vec<SpeciesCount>>,
    pub top_families: Option<Vec<SpeciesCount>>,
}

impl SpeciesReport {
    /// Check the schema, then compute every supported summary in parallel.
    pub fn compute(df: &DataFrame) -> Result<Self, AggregatorError> {
        DataProcessor::require_mandatory_columns(df)?;
        let caps = SchemaCapabilities::detect(df);

        for (present, column) in [
            (caps.nativeness, NATIVENESS),
            (caps.category, CATEGORY_NAME),
            (caps.family, FAMILY),
        ] {
            if !present {
                log::info!("Column '{}' not present, skipping its summary", column);
            }
        }

        let ((by_park, nativeness), (by_category, top_families)) = rayon::join(
            || {
                rayon::join(
                    || SpeciesAggregator::by_park(df),
                    || {
                        caps.nativeness
                            .then(|| SpeciesAggregator::by_park_nativeness(df))
                            .transpose()
                    },
                )
            },
            || {
                rayon::join(
                    || {
                        caps.category
                            .then(|| SpeciesAggregator::by_category(df))
                            .transpose()
                    },
                    || {
                        caps.family
                            .then(|| SpeciesAggregator::top_families(df, TOP_FAMILIES))
                            .transpose()
                    },
                )
            },
        );

        Ok(Self {
            by_park: by_park?,
            nativeness: nativeness?,
            by_category: by_category?,
            top_families: top_families?,
        })
    }
}

/// Computes grouped distinct-species summaries.
pub struct SpeciesAggregator;

impl SpeciesAggregator {
    /// Distinct species per park, ordered by park name.
    pub fn by_park(df: &DataFrame) -> Result<Vec<SpeciesCount>, AggregatorError> {
        Self::distinct_species_by(df, PARK_NAME)
    }

    /// Distinct species per taxonomic category, ordered by category name.
    pub fn by_category(df: &DataFrame) -> Result<Vec<SpeciesCount>, AggregatorError> {
        Self::distinct_species_by(df, CATEGORY_NAME)
    }

    /// The `n` families with the most distinct species, largest first.
    ///
    /// Equal counts keep alphabetical family order.
    pub fn top_families(
        df: &DataFrame,
        n: usize,
    ) -> Result<Vec<SpeciesCount>, AggregatorError> {
        let mut families = Self::distinct_species_by(df, FAMILY)?;
        // sort_by is stable
        families.sort_by(|a, b| b.species_count.cmp(&a.species_count));
        families.truncate(n);
        Ok(families)
    }

    /// Native/non-native composition per park, ordered by park name.
    pub fn by_park_nativeness(df: &DataFrame) -> Result<Vec<NativenessShare>, AggregatorError> {
        let grouped = Self::grouped_counts(df, &[PARK_NAME, NATIVENESS])?;
        let parks = grouped.column(PARK_NAME)?.str()?;
        let values = grouped.column(NATIVENESS)?.str()?;
        let counts = grouped.column(SPECIES_COUNT)?.u64()?;

        let mut by_park: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
        for ((park, value), count) in parks.into_iter().zip(values).zip(counts) {
            if let (Some(park), Some(value), Some(count)) = (park, value, count) {
                by_park
                    .entry(park.to_string())
                    .or_default()
                    .insert(value.to_string(), count);
            }
        }

        Ok(by_park
            .into_iter()
            .filter_map(|(park, counts)| NativenessShare::from_counts(park, counts))
            .collect())
    }

    fn distinct_species_by(
        df: &DataFrame,
        key: &str,
    ) -> Result<Vec<SpeciesCount>, AggregatorError> {
        let grouped = Self::grouped_counts(df, &[key])?;
        let keys = grouped.column(key)?.str()?;
        let counts = grouped.column(SPECIES_COUNT)?.u64()?;

        let sorted: BTreeMap<String, u64> = keys
            .into_iter()
            .zip(counts)
            .filter_map(|(k, c)| Some((k?.to_string(), c?)))
            .collect();

        Ok(sorted
            .into_iter()
            .map(|(key, species_count)| SpeciesCount { key, species_count })
            .collect())
    }

    /// Group by `keys` (as text) and count distinct non-null scientific names.
    /// Rows with a null key or a null scientific name are ignored.
    fn grouped_counts(df: &DataFrame, keys: &[&str]) -> PolarsResult<DataFrame> {
        let present = keys
            .iter()
            .fold(col(SCI_NAME).is_not_null(), |acc, k| acc.and(col(*k).is_not_null()));
        let group_exprs: Vec<Expr> = keys
            .iter()
            .map(|k| col(*k).cast(DataType::String))
            .collect();

        df.clone()
            .lazy()
            .filter(present)
            .group_by(group_exprs)
            .agg([col(SCI_NAME)
                .n_unique()
                .cast(DataType::UInt64)
                .alias(SPECIES_COUNT)])
            .collect()
    }
}
