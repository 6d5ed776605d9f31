//! Stats module - aggregation for charts and tables

mod calculator;

pub use calculator::{RegionAverage, SeriesSummary, StatsCalculator};
