//! VHI Lab Main Application
//! Main window switching between the VHI dashboard and the signal demo.

use crate::charts::{ComparisonChartData, RegionChartData, RenderError, StaticChartRenderer};
use crate::dashboard::{
    apply_selection, table_rows, DashboardWarning, DatasetBounds, Selection, TableRow,
};
use crate::data::{read_dataset, region_name, DatasetLoader};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, SignalView, SignalViewAction};
use crate::signal::SignalSession;
use crate::stats::{SeriesSummary, StatsCalculator};
use egui::SidePanel;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

const EXPORT_SIZE: (u32, u32) = (1400, 900);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Dashboard,
    Signal,
}

/// Dataset loading result from background thread
enum LoadResult {
    Progress(String),
    Complete {
        df: DataFrame,
        path: PathBuf,
        bounds: Option<DatasetBounds>,
    },
    Error(String),
}

/// Main application window.
pub struct VhiLabApp {
    view: View,
    loader: DatasetLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    signal_view: SignalView,
    session: SignalSession,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl VhiLabApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        session: SignalSession,
        dataset: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            view: View::Dashboard,
            loader: DatasetLoader::new(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            signal_view: SignalView::new(),
            session,
            load_rx: None,
            is_loading: false,
        };

        if let Some(path) = dataset {
            if path.exists() {
                app.start_loading(path);
            } else {
                log::warn!("Dataset {} not found; use Browse to pick one", path.display());
                app.control_panel
                    .set_status(&format!("Dataset {} not found", path.display()));
            }
        }

        app
    }

    /// Handle dataset selection
    fn handle_browse_dataset(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Read the dataset in a background thread
    fn start_loading(&mut self, path: PathBuf) {
        self.chart_viewer.clear();
        self.control_panel.dataset_path = Some(path.clone());
        self.control_panel.set_status("Loading dataset...");
        self.control_panel.busy = true;
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!(
                "Reading {}...",
                path.display()
            )));

            match read_dataset(&path) {
                Ok(df) => {
                    let bounds = DatasetBounds::from_frame(&df);
                    let _ = tx.send(LoadResult::Complete { df, path, bounds });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for dataset loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(&status);
                    }
                    LoadResult::Complete { df, path, bounds } => {
                        log::info!("Loaded {} rows from {}", df.height(), path.display());
                        self.loader.set_dataframe(df);
                        let row_count = self.loader.get_row_count();
                        self.control_panel
                            .set_status(&format!("Loaded {} rows", row_count));
                        match bounds {
                            Some(bounds) => {
                                self.control_panel.update_bounds(bounds);
                                self.refresh();
                            }
                            None => {
                                self.control_panel.bounds = None;
                                self.control_panel
                                    .set_status("Dataset has no year/week values");
                            }
                        }
                        self.finish_loading();
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        log::error!("Dataset load failed: {}", error);
                        self.control_panel.set_status(&format!("Error: {}", error));
                        self.finish_loading();
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn finish_loading(&mut self) {
        self.is_loading = false;
        self.control_panel.busy = false;
    }

    /// Re-run the dashboard queries for the current selection.
    fn refresh(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            return;
        };
        let selection = self.control_panel.selection.clone();

        match Self::query(df, &selection) {
            Ok(results) => {
                for warning in &results.warnings {
                    log::warn!("{}", warning);
                }
                self.control_panel.warnings = results.warnings;
                self.chart_viewer.set_results(
                    selection.series,
                    results.rows,
                    results.summary,
                    results.region_chart,
                    results.comparison,
                );
            }
            Err(e) => {
                log::error!("Dashboard query failed: {:#}", e);
                self.chart_viewer.clear();
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn query(df: &DataFrame, selection: &Selection) -> anyhow::Result<DashboardResults> {
        let outcome = apply_selection(df, selection)?;
        let rows = table_rows(&outcome.frame, selection.series)?;
        let summary = StatsCalculator::summarize(&outcome.frame, selection.series)?;
        let region_chart = RegionChartData::from_rows(
            &rows,
            selection.series,
            &region_name(selection.region_id),
        );
        let means =
            StatsCalculator::region_means(df, selection.series, selection.years, selection.weeks)?;

        Ok(DashboardResults {
            warnings: outcome.warnings,
            rows,
            summary,
            region_chart,
            comparison: ComparisonChartData::new(selection.series, means),
        })
    }

    /// Ask for a PNG destination.
    fn pick_png_path(default_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(default_name)
            .save_file()
    }

    /// Report an export and open the file in the system viewer.
    fn finish_export(result: Result<(), RenderError>, path: &Path) -> String {
        match result {
            Ok(()) => {
                if let Err(e) = open::that(path) {
                    log::warn!("Cannot open {}: {}", path.display(), e);
                }
                format!("Saved {}", path.display())
            }
            Err(e) => {
                log::error!("Export to {} failed: {}", path.display(), e);
                format!("Error: {}", e)
            }
        }
    }

    fn handle_export_region_chart(&mut self) {
        let Some(chart) = &self.chart_viewer.region_chart else {
            self.control_panel.set_status("No chart to export");
            return;
        };
        let Some(path) = Self::pick_png_path("region_chart.png") else {
            return;
        };
        let result = StaticChartRenderer::render_region_chart(chart, &path, EXPORT_SIZE);
        let status = Self::finish_export(result, &path);
        self.control_panel.set_status(&status);
    }

    fn handle_export_comparison_chart(&mut self) {
        let Some(chart) = &self.chart_viewer.comparison else {
            self.control_panel.set_status("No chart to export");
            return;
        };
        let Some(path) = Self::pick_png_path("comparison_chart.png") else {
            return;
        };
        let result = StaticChartRenderer::render_comparison_chart(chart, &path, EXPORT_SIZE);
        let status = Self::finish_export(result, &path);
        self.control_panel.set_status(&status);
    }

    fn handle_export_signal_chart(&mut self) {
        let Some(path) = Self::pick_png_path("harmonic_signal.png") else {
            return;
        };
        let result = StaticChartRenderer::render_signal_chart(
            self.session.time().as_slice(),
            self.session.traces(),
            &path,
            EXPORT_SIZE,
        );
        self.signal_view.status = Some(Self::finish_export(result, &path));
    }

    fn show_dashboard(&mut self, ctx: &egui::Context) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseDataset => self.handle_browse_dataset(),
                        ControlPanelAction::SelectionChanged => self.refresh(),
                        ControlPanelAction::ResetFilters => {
                            self.control_panel.reset_filters();
                            self.refresh();
                        }
                        ControlPanelAction::ExportRegionChart => {
                            self.handle_export_region_chart()
                        }
                        ControlPanelAction::ExportComparisonChart => {
                            self.handle_export_comparison_chart()
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Results
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

/// Everything the dashboard shows for one selection.
struct DashboardResults {
    warnings: Vec<DashboardWarning>,
    rows: Vec<TableRow>,
    summary: SeriesSummary,
    region_chart: RegionChartData,
    comparison: ComparisonChartData,
}

impl eframe::App for VhiLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("view_switch").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.view, View::Dashboard, "🌾 VHI Dashboard");
                ui.selectable_value(&mut self.view, View::Signal, "〰 Harmonic Signal");
            });
        });

        match self.view {
            View::Dashboard => self.show_dashboard(ctx),
            View::Signal => {
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| self.signal_view.show(ui, &mut self.session))
                    .inner;
                if action == SignalViewAction::ExportChart {
                    self.handle_export_signal_chart();
                }
            }
        }
    }
}
