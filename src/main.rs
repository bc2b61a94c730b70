//! NP Species - National Park species data cleaning & biodiversity report
//!
//! Loads the species observation CSV, cleans it, writes a cleaned copy and
//! charts species richness by park, nativeness, category and family.

mod charts;
mod config;
mod data;
mod pipeline;
mod stats;

use clap::Parser;
use config::{Cli, PipelineConfig};
use pipeline::Pipeline;
use stats::SpeciesReport;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from(Cli::parse());
    let outcome = Pipeline::new(config).run()?;

    log_summary(&outcome.analysis.report);
    log::info!("Cleaned data: {}", outcome.cleaned_path.display());
    for chart in &outcome.charts {
        log::info!("Chart: {}", chart.display());
    }
    Ok(())
}

fn log_summary(report: &SpeciesReport) {
    for park in &report.by_park {
        log::info!("{}: {} species", park.key, park.species_count);
    }
    for share in report.nativeness.iter().flatten() {
        log::info!(
            "{}: {:.2}% native, {:.2}% non-native of {} ({:?})",
            share.park,
            share.native_percent,
            share.nonnative_percent,
            share.total,
            share.counts
        );
    }
    for category in report.by_category.iter().flatten() {
        log::debug!("{}: {} species", category.key, category.species_count);
    }
    for family in report.top_families.iter().flatten() {
        log::debug!("{}: {} species", family.key, family.species_count);
    }
}
