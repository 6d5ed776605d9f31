//! Charts module - Interactive and static chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, ComparisonChartData, RegionChartData};
pub use renderer::{RenderError, StaticChartRenderer};
