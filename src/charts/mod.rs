//! Charts module - Chart descriptions and static rendering

mod plotter;
mod renderer;

pub use plotter::{Chart, ChartKind, ChartPlotter};
pub use renderer::{RenderError, StaticChartRenderer};
