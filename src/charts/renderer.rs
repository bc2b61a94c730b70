//! Static Chart Renderer
//! Draws `Chart` descriptions to PNG files with plotters.
//!
//! Layout:
//! 1. Title centered above the plot
//! 2. Category axis at the bottom, labels rotated to stay readable
//! 3. Value axis on the left with its description
//! 4. Legend in the plot area for stacked charts

use crate::charts::{Chart, ChartKind, ChartPlotter};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 22;
const LABEL_SIZE: u32 = 13;
// Room for rotated park and family names
const X_LABEL_AREA: u32 = 190;
const Y_LABEL_AREA: u32 = 70;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot create chart directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to draw {path}: {message}")]
    Drawing { path: PathBuf, message: String },
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart into `dir` as `<file_stem>.png`.
    pub fn render_all(charts: &[Chart], dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        charts
            .iter()
            .map(|chart| {
                let path = dir.join(format!("{}.png", chart.file_stem));
                Self::render_png(chart, &path)?;
                Ok(path)
            })
            .collect()
    }

    /// Render a single chart to a PNG file.
    pub fn render_png(chart: &Chart, path: &Path) -> Result<(), RenderError> {
        Self::draw(chart, path).map_err(|e| RenderError::Drawing {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::info!("Rendered '{}' to {}", chart.title, path.display());
        Ok(())
    }

    fn draw(chart: &Chart, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, chart.size).into_drawing_area();
        root.fill(&WHITE)?;

        let n = chart.categories.len() as u32;
        let labels = &chart.categories;

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..chart.y_max())?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|v| Self::category_label(labels, v))
            .x_label_style(
                (FONT, LABEL_SIZE)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(chart.x_desc.as_str())
            .y_desc(chart.y_desc.as_str())
            .draw()?;

        match &chart.kind {
            ChartKind::Bar { values, palette } => {
                ctx.draw_series(values.iter().enumerate().map(|(i, &v)| {
                    let color = ChartPlotter::palette_color(palette, i, values.len());
                    Self::bar(i as u32, 0.0, v, color)
                }))?;
            }
            ChartKind::StackedBar { layers } => {
                let mut base = vec![0.0; labels.len()];
                for layer in layers {
                    let color = layer.color;
                    ctx.draw_series(
                        layer
                            .values
                            .iter()
                            .enumerate()
                            .map(|(i, &v)| Self::bar(i as u32, base[i], base[i] + v, color)),
                    )?
                    .label(layer.label.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                    });

                    for (b, v) in base.iter_mut().zip(&layer.values) {
                        *b += v;
                    }
                }

                ctx.configure_series_labels()
                    .position(SeriesLabelPosition::UpperRight)
                    .background_style(&WHITE.mix(0.85))
                    .border_style(&BLACK)
                    .draw()?;
            }
        }

        root.present()?;
        Ok(())
    }

    fn bar(idx: u32, from: f64, to: f64, color: RGBColor) -> Rectangle<(SegmentValue<u32>, f64)> {
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(idx), from),
                (SegmentValue::Exact(idx + 1), to),
            ],
            color.filled(),
        );
        bar.set_margin(0, 0, 4, 4);
        bar
    }

    fn category_label(labels: &[String], value: &SegmentValue<u32>) -> String {
        match value {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        }
    }
}
