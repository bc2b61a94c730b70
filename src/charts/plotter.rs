//! Chart Plotter Module
//! Builds chart descriptions from species summaries. Nothing here draws;
//! `StaticChartRenderer` turns a `Chart` into pixels.

use crate::stats::{NativenessShare, SpeciesCount, SpeciesReport};
use plotters::style::RGBColor;

const UNIQUE_SPECIES: &str = "Number of Unique Species";

/// Color stops for sequential and diverging palettes
pub const VIRIDIS: [RGBColor; 10] = [
    RGBColor(68, 1, 84),
    RGBColor(72, 40, 120),
    RGBColor(62, 73, 137),
    RGBColor(49, 104, 142),
    RGBColor(38, 130, 142),
    RGBColor(31, 158, 137),
    RGBColor(53, 183, 121),
    RGBColor(110, 206, 88),
    RGBColor(181, 222, 43),
    RGBColor(253, 231, 37),
];

pub const MAGMA: [RGBColor; 10] = [
    RGBColor(0, 0, 4),
    RGBColor(24, 15, 61),
    RGBColor(68, 15, 118),
    RGBColor(114, 31, 129),
    RGBColor(158, 47, 127),
    RGBColor(205, 64, 113),
    RGBColor(241, 96, 93),
    RGBColor(253, 150, 104),
    RGBColor(254, 202, 141),
    RGBColor(252, 253, 191),
];

pub const COOLWARM: [RGBColor; 9] = [
    RGBColor(59, 76, 192),
    RGBColor(98, 130, 234),
    RGBColor(141, 176, 254),
    RGBColor(184, 208, 249),
    RGBColor(221, 220, 220),
    RGBColor(245, 196, 173),
    RGBColor(244, 154, 123),
    RGBColor(226, 105, 82),
    RGBColor(180, 4, 38),
];

/// Light/dark blue pair used for the stacked nativeness bars
pub const PAIRED: [RGBColor; 2] = [RGBColor(166, 206, 227), RGBColor(31, 120, 180)];

/// One stacked segment series.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayer {
    pub label: String,
    pub values: Vec<f64>,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// One bar per category, colored along the palette.
    Bar {
        values: Vec<f64>,
        palette: &'static [RGBColor],
    },
    /// Layers stacked bottom to top, with a legend.
    StackedBar { layers: Vec<BarLayer> },
}

/// A fully described static chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub file_stem: &'static str,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub categories: Vec<String>,
    pub kind: ChartKind,
    pub size: (u32, u32),
}

impl Chart {
    /// Upper bound for the value axis with some headroom.
    pub fn y_max(&self) -> f64 {
        let peak = match &self.kind {
            ChartKind::Bar { values, .. } => values.iter().copied().fold(0.0, f64::max),
            ChartKind::StackedBar { layers } => (0..self.categories.len())
                .map(|i| {
                    layers
                        .iter()
                        .filter_map(|l| l.values.get(i))
                        .sum::<f64>()
                })
                .fold(0.0, f64::max),
        };

        if peak > 0.0 {
            peak * 1.05
        } else {
            1.0
        }
    }
}

/// Creates the report's charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for bar `idx` of `n`, spread evenly along the palette.
    pub fn palette_color(palette: &[RGBColor], idx: usize, n: usize) -> RGBColor {
        match palette.len() {
            0 => RGBColor(0, 0, 0),
            1 => palette[0],
            _ if n <= 1 => palette[palette.len() / 2],
            len => {
                let t = idx.min(n - 1) as f64 / (n - 1) as f64 * (len - 1) as f64;
                let lo = t.floor() as usize;
                let hi = (lo + 1).min(len - 1);
                let frac = t - lo as f64;
                let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
                let (a, b) = (palette[lo], palette[hi]);
                RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
            }
        }
    }

    pub fn species_by_park(counts: &[SpeciesCount]) -> Chart {
        Self::bar_chart(
            "figure_1_species_by_park",
            "Figure 1: Species Count by Park",
            "parkname",
            counts,
            &VIRIDIS,
            (1000, 600),
        )
    }

    pub fn nativeness_by_park(shares: &[NativenessShare]) -> Chart {
        let layers = vec![
            BarLayer {
                label: "Native_percent".to_string(),
                values: shares.iter().map(|s| s.native_percent).collect(),
                color: PAIRED[0],
            },
            BarLayer {
                label: "NonNative_percent".to_string(),
                values: shares.iter().map(|s| s.nonnative_percent).collect(),
                color: PAIRED[1],
            },
        ];

        Chart {
            file_stem: "figure_2_nativeness_by_park",
            title: "Figure 2: Native vs Non-native Species by Park".to_string(),
            x_desc: "parkname".to_string(),
            y_desc: "Percentage of Species".to_string(),
            categories: shares.iter().map(|s| s.park.clone()).collect(),
            kind: ChartKind::StackedBar { layers },
            size: (1000, 600),
        }
    }

    pub fn species_by_category(counts: &[SpeciesCount]) -> Chart {
        Self::bar_chart(
            "figure_3_species_by_category",
            "Figure 3: Species Count by Category",
            "categoryname",
            counts,
            &MAGMA,
            (800, 600),
        )
    }

    pub fn top_families(counts: &[SpeciesCount]) -> Chart {
        Self::bar_chart(
            "figure_4_top_families",
            "Figure 4: Top 10 Families by Species Count",
            "family",
            counts,
            &COOLWARM,
            (1000, 600),
        )
    }

    /// Charts for every summary present in the report, in figure order.
    /// Empty summaries produce no chart.
    pub fn charts_for(report: &SpeciesReport) -> Vec<Chart> {
        let mut charts = vec![Self::species_by_park(&report.by_park)];
        if let Some(shares) = &report.nativeness {
            charts.push(Self::nativeness_by_park(shares));
        }
        if let Some(counts) = &report.by_category {
            charts.push(Self::species_by_category(counts));
        }
        if let Some(counts) = &report.top_families {
            charts.push(Self::top_families(counts));
        }

        charts.retain(|chart| {
            let keep = !chart.categories.is_empty();
            if !keep {
                log::warn!("No data for '{}', chart not rendered", chart.title);
            }
            keep
        });
        charts
    }

    fn bar_chart(
        file_stem: &'static str,
        title: &str,
        x_desc: &str,
        counts: &[SpeciesCount],
        palette: &'static [RGBColor],
        size: (u32, u32),
    ) -> Chart {
        Chart {
            file_stem,
            title: title.to_string(),
            x_desc: x_desc.to_string(),
            y_desc: UNIQUE_SPECIES.to_string(),
            categories: counts.iter().map(|c| c.key.clone()).collect(),
            kind: ChartKind::Bar {
                values: counts.iter().map(|c| c.species_count as f64).collect(),
                palette,
            },
            size,
        }
    }
}
