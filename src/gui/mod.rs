//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod signal_view;

pub use app::VhiLabApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use signal_view::{SignalView, SignalViewAction};
