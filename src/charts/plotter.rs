//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::dashboard::TableRow;
use crate::data::IndexSeries;
use crate::signal::SignalTraces;
use crate::stats::RegionAverage;
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoints};
use std::collections::BTreeMap;

pub const CLEAN_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green
pub const NOISY_COLOR: Color32 = Color32::from_rgb(243, 156, 18); // Orange
pub const FILTERED_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219);

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Weekly values of one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearLine {
    pub year: i32,
    pub points: Vec<[f64; 2]>,
}

/// Index over weeks for one region, one line per year.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionChartData {
    pub title: String,
    pub series: IndexSeries,
    pub lines: Vec<YearLine>,
}

impl RegionChartData {
    /// Group table rows by year, points sorted by week. Rows missing a year,
    /// week or value are skipped.
    pub fn from_rows(rows: &[TableRow], series: IndexSeries, region: &str) -> Self {
        let mut by_year: BTreeMap<i32, Vec<[f64; 2]>> = BTreeMap::new();
        for row in rows {
            if let (Some(year), Some(week), Some(value)) = (row.year, row.week, row.value) {
                by_year
                    .entry(year)
                    .or_default()
                    .push([week as f64, value]);
            }
        }

        let lines = by_year
            .into_iter()
            .map(|(year, mut points)| {
                points.sort_by(|a, b| a[0].total_cmp(&b[0]));
                YearLine { year, points }
            })
            .collect();

        Self {
            title: format!("{} for {}", series, region),
            series,
            lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Mean of the series per region.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChartData {
    pub title: String,
    pub series: IndexSeries,
    pub bars: Vec<RegionAverage>,
}

impl ComparisonChartData {
    pub fn new(series: IndexSeries, bars: Vec<RegionAverage>) -> Self {
        Self {
            title: format!("Mean {} by region", series),
            series,
            bars,
        }
    }

    /// True when no region has a mean to draw.
    pub fn is_empty(&self) -> bool {
        self.bars.iter().all(|b| b.mean.is_none())
    }
}

/// Creates dashboard and signal charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for the n-th line.
    pub fn get_line_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Time/value pairs for a trace.
    pub fn trace_points(time: &[f64], values: &[f64]) -> Vec<[f64; 2]> {
        time.iter().zip(values).map(|(&t, &v)| [t, v]).collect()
    }

    /// Draw the per-year line chart of one region.
    /// X-axis: week, Y-axis: index value
    pub fn draw_region_chart(ui: &mut egui::Ui, data: &RegionChartData, height: f32) {
        Plot::new(format!("region_{}", data.series))
            .height(height)
            .legend(Legend::default())
            .x_axis_label("Week")
            .y_axis_label(data.series.to_string())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (idx, line) in data.lines.iter().enumerate() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(line.points.clone()))
                            .color(Self::get_line_color(idx))
                            .width(1.5)
                            .name(line.year.to_string()),
                    );
                }
            });
    }

    /// Draw the per-region bar chart.
    /// X-axis: region (labelled by name), Y-axis: mean value
    pub fn draw_comparison_chart(ui: &mut egui::Ui, data: &ComparisonChartData, height: f32) {
        let labels: Vec<String> = data.bars.iter().map(|b| b.name.clone()).collect();

        let bars: Vec<Bar> = data
            .bars
            .iter()
            .enumerate()
            .filter_map(|(i, avg)| {
                let mean = avg.mean?;
                Some(Bar::new(i as f64, mean).width(0.7).name(&avg.name))
            })
            .collect();

        Plot::new(format!("comparison_{}", data.series))
            .height(height)
            .x_axis_label("Region")
            .y_axis_label(data.series.to_string())
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let value = mark.value;
                if value < 0.0 || value.fract() != 0.0 {
                    return String::new();
                }
                labels.get(value as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name(data.series.to_string()));
            });
    }

    /// Draw one signal trace against time.
    pub fn draw_trace(
        ui: &mut egui::Ui,
        id: &str,
        time: &[f64],
        values: &[f64],
        color: Color32,
        dashed: bool,
        height: f32,
    ) {
        let mut line = Line::new(PlotPoints::from(Self::trace_points(time, values)))
            .color(color)
            .width(1.5)
            .name(id);
        if dashed {
            line = line.style(LineStyle::dashed_dense());
        }

        Plot::new(id)
            .height(height)
            .legend(Legend::default())
            .x_axis_label("t, s")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(line);
            });
    }

    /// Draw the clean, noisy and filtered plots, honoring visibility toggles.
    pub fn draw_signal_charts(ui: &mut egui::Ui, time: &[f64], traces: &SignalTraces, height: f32) {
        ui.label(egui::RichText::new("Clean harmonic").strong());
        Self::draw_trace(ui, "Clean", time, &traces.clean, CLEAN_COLOR, false, height);

        ui.label(egui::RichText::new("Harmonic with noise").strong());
        let noisy: &[f64] = if traces.show_noise { &traces.noisy } else { &[] };
        Self::draw_trace(ui, "Noisy", time, noisy, NOISY_COLOR, false, height);

        ui.label(egui::RichText::new("Filtered harmonic").strong());
        let filtered: &[f64] = if traces.show_filtered { &traces.filtered } else { &[] };
        Self::draw_trace(ui, "Filtered", time, filtered, FILTERED_COLOR, true, height);
    }
}
