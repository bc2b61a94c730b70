//! Run configuration.
//! Every setting has a default, so a bare invocation reads the standard
//! dataset from the working directory.

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "most_visited_nps_species_data.csv";
pub const DEFAULT_OUTPUT: &str = "cleaned_nps_species_data.csv";
pub const DEFAULT_CHART_DIR: &str = "charts";

#[derive(Parser, Debug)]
#[command(name = "np_species")]
#[command(about = "Clean national park species data and chart biodiversity summaries")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Species observation CSV to read
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Where to write the cleaned CSV
    #[arg(long, short, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Directory for rendered chart images
    #[arg(long, default_value = DEFAULT_CHART_DIR)]
    pub chart_dir: PathBuf,

    /// Write charts without opening them in the system viewer
    #[arg(long)]
    pub no_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub chart_dir: PathBuf,
    pub open_charts: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            chart_dir: PathBuf::from(DEFAULT_CHART_DIR),
            open_charts: true,
        }
    }
}

impl From<Cli> for PipelineConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            output: cli.output,
            chart_dir: cli.chart_dir,
            open_charts: !cli.no_open,
        }
    }
}
