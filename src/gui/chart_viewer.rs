//! Chart Viewer Widget
//! Central panel of the dashboard: result table, region chart and the
//! per-region comparison, one tab each.

use crate::charts::{ChartPlotter, ComparisonChartData, RegionChartData};
use crate::dashboard::TableRow;
use crate::data::IndexSeries;
use crate::stats::SeriesSummary;
use egui::{Color32, RichText, ScrollArea};

const ROW_HEIGHT: f32 = 18.0;
const CHART_HEIGHT: f32 = 520.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultTab {
    #[default]
    Table,
    RegionChart,
    Comparison,
}

/// Results of the current selection.
#[derive(Default)]
pub struct ChartViewer {
    pub tab: ResultTab,
    pub series: IndexSeries,
    pub rows: Vec<TableRow>,
    pub summary: Option<SeriesSummary>,
    pub region_chart: Option<RegionChartData>,
    pub comparison: Option<ComparisonChartData>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.summary = None;
        self.region_chart = None;
        self.comparison = None;
    }

    pub fn set_results(
        &mut self,
        series: IndexSeries,
        rows: Vec<TableRow>,
        summary: SeriesSummary,
        region_chart: RegionChartData,
        comparison: ComparisonChartData,
    ) {
        self.series = series;
        self.rows = rows;
        self.summary = Some(summary);
        self.region_chart = Some(region_chart);
        self.comparison = Some(comparison);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, ResultTab::Table, "📋 Table");
            ui.selectable_value(&mut self.tab, ResultTab::RegionChart, "📈 Region chart");
            ui.selectable_value(&mut self.tab, ResultTab::Comparison, "📊 Comparison");
        });
        ui.separator();

        if self.summary.is_none() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        match self.tab {
            ResultTab::Table => self.show_table(ui),
            ResultTab::RegionChart => match &self.region_chart {
                Some(chart) if !chart.is_empty() => {
                    ChartPlotter::draw_region_chart(ui, chart, CHART_HEIGHT)
                }
                _ => Self::no_data(ui),
            },
            ResultTab::Comparison => match &self.comparison {
                Some(chart) if !chart.is_empty() => {
                    ChartPlotter::draw_comparison_chart(ui, chart, CHART_HEIGHT)
                }
                _ => Self::no_data(ui),
            },
        }
    }

    fn no_data(ui: &mut egui::Ui) {
        ui.centered_and_justified(|ui| {
            ui.label(
                RichText::new("⚠ No data to plot for this selection")
                    .size(18.0)
                    .color(Color32::from_rgb(243, 156, 18)),
            );
        });
    }

    fn show_table(&self, ui: &mut egui::Ui) {
        if let Some(summary) = &self.summary {
            ui.label(
                RichText::new(format!(
                    "{} rows, {} with values | mean {:.2} | std {:.2} | min {:.2} | max {:.2}",
                    self.rows.len(),
                    summary.count,
                    summary.mean,
                    summary.std,
                    summary.min,
                    summary.max
                ))
                .size(12.0)
                .color(Color32::GRAY),
            );
            ui.add_space(5.0);
        }

        let fmt_int = |v: Option<i32>| v.map(|v| v.to_string()).unwrap_or_default();

        egui::Grid::new("result_header")
            .num_columns(4)
            .min_col_width(140.0)
            .show(ui, |ui| {
                ui.label(RichText::new("Region").strong());
                ui.label(RichText::new("Year").strong());
                ui.label(RichText::new("Week").strong());
                ui.label(RichText::new(self.series.to_string()).strong());
                ui.end_row();
            });
        ui.separator();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_rows(ui, ROW_HEIGHT, self.rows.len(), |ui, row_range| {
                egui::Grid::new("result_rows")
                    .num_columns(4)
                    .min_col_width(140.0)
                    .striped(true)
                    .start_row(row_range.start)
                    .show(ui, |ui| {
                        for row in &self.rows[row_range] {
                            ui.label(&row.region);
                            ui.label(fmt_int(row.year));
                            ui.label(fmt_int(row.week));
                            ui.label(row.value.map(|v| format!("{:.2}", v)).unwrap_or_default());
                            ui.end_row();
                        }
                    });
            });
    }
}
