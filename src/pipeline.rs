//! Species report pipeline: load, clean, export, summarize, chart.

use crate::charts::{ChartPlotter, StaticChartRenderer};
use crate::config::PipelineConfig;
use crate::data::{DataExporter, DataLoader, DataProcessor};
use crate::stats::SpeciesReport;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Result of the data stages, before any chart is drawn.
#[derive(Debug)]
pub struct Analysis {
    pub rows_loaded: usize,
    pub rows_cleaned: usize,
    pub duplicates_removed: usize,
    pub report: SpeciesReport,
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub analysis: Analysis,
    pub cleaned_path: PathBuf,
    pub charts: Vec<PathBuf>,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run every stage, then hand the charts to the system viewer if enabled.
    pub fn run(&self) -> Result<PipelineOutcome> {
        let analysis = self.analyze()?;

        let charts = ChartPlotter::charts_for(&analysis.report);
        let rendered = StaticChartRenderer::render_all(&charts, &self.config.chart_dir)
            .context("Rendering charts")?;

        if self.config.open_charts {
            Self::show(&rendered);
        }

        let outcome = PipelineOutcome {
            analysis,
            cleaned_path: self.config.output.clone(),
            charts: rendered,
        };
        log::info!(
            "Done: {} rows loaded, {} kept ({} duplicates), {} charts in {}",
            outcome.analysis.rows_loaded,
            outcome.analysis.rows_cleaned,
            outcome.analysis.duplicates_removed,
            outcome.charts.len(),
            self.config.chart_dir.display()
        );
        Ok(outcome)
    }

    /// Load, normalize, export the cleaned copy and compute the summaries.
    pub fn analyze(&self) -> Result<Analysis> {
        let raw = DataLoader::load_csv(&self.config.input).context("Loading species data")?;
        let table = DataProcessor::normalize(raw).context("Normalizing species data")?;

        DataExporter::write_csv(&table.df, &self.config.output)
            .context("Exporting cleaned data")?;

        let report = SpeciesReport::compute(&table.df).context("Summarizing species")?;

        Ok(Analysis {
            rows_loaded: table.input_rows,
            rows_cleaned: table.output_rows(),
            duplicates_removed: table.duplicates_removed(),
            report,
        })
    }

    fn show(charts: &[PathBuf]) {
        for chart in charts {
            if let Err(e) = open::that(chart) {
                log::warn!("Could not open {}: {}", chart.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LoaderError, ProcessorError};
    use crate::stats::{AggregatorError, SpeciesCount};
    use std::fs;
    use std::path::Path;

    fn config_in(dir: &Path, csv: &str) -> PipelineConfig {
        let input = dir.join("species.csv");
        fs::write(&input, csv).unwrap();
        PipelineConfig {
            input,
            output: dir.join("cleaned.csv"),
            chart_dir: dir.join("charts"),
            open_charts: false,
        }
    }

    #[test]
    fn bryce_canyon_duplicate_collapses_to_one_species() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            "ParkName,SciName\nBryce Canyon, Ursus americanus \nBryce Canyon,Ursus americanus\n",
        );

        let analysis = Pipeline::new(config.clone()).analyze().unwrap();

        assert_eq!(analysis.rows_loaded, 2);
        assert_eq!(analysis.rows_cleaned, 1);
        assert_eq!(analysis.duplicates_removed, 1);
        assert_eq!(
            analysis.report.by_park,
            vec![SpeciesCount {
                key: "Bryce Canyon".into(),
                species_count: 1
            }]
        );
        assert!(analysis.report.nativeness.is_none());
        assert_eq!(
            fs::read_to_string(&config.output).unwrap(),
            "parkname,sciname\nBryce Canyon,Ursus americanus\n"
        );
    }

    #[test]
    fn full_dataset_produces_all_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            "Park Code,ParkName,CategoryName,Family,SciName,Nativeness\n\
             ACAD,Acadia,Mammal,Ursidae,Ursus americanus,Native\n\
             ACAD,Acadia,Vascular Plant,Asteraceae,Solidago rugosa,Native\n\
             ACAD,Acadia,Vascular Plant,Poaceae,Poa annua,Not Native\n\
             ACAD,Acadia,Vascular Plant,Poaceae,Poa annua,Not Native\n\
             ZION,Zion,Insect,Carabidae,Carabus sp,Native\n",
        );

        let report = Pipeline::new(config).analyze().unwrap().report;

        let nativeness = report.nativeness.unwrap();
        assert_eq!(nativeness.len(), 2);
        assert_eq!(nativeness[0].park, "Acadia");
        assert_eq!(nativeness[0].total, 3);
        assert_eq!(nativeness[1].native_percent, 100.0);

        let categories = report.by_category.unwrap();
        assert_eq!(categories.len(), 3);

        let families = report.top_families.unwrap();
        assert_eq!(families[0].key, "Asteraceae");
        assert_eq!(families.len(), 4);
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            input: dir.path().join("nowhere.csv"),
            output: dir.path().join("cleaned.csv"),
            chart_dir: dir.path().join("charts"),
            open_charts: false,
        };

        let err = Pipeline::new(config).analyze().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoaderError>(),
            Some(LoaderError::FileNotFound(_))
        ));
    }

    #[test]
    fn missing_species_column_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "ParkName,Family\nZion,Ursidae\n");

        let err = Pipeline::new(config).analyze().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AggregatorError>(),
            Some(AggregatorError::Schema(ProcessorError::MissingColumn(c))) if c == "sciname"
        ));
    }
}
