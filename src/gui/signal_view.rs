//! Signal View
//! Controls and plots of the harmonic signal demo. Every widget change is
//! turned into a `SignalEvent` and dispatched to the session.

use crate::charts::ChartPlotter;
use crate::signal::{
    SignalEvent, SignalSession, AMPLITUDE_RANGE, FREQUENCY_RANGE, NOISE_MEAN_RANGE,
    NOISE_VARIANCE_RANGE, PHASE_RANGE, WINDOW_RANGE,
};
use egui::{Color32, RichText, ScrollArea};

const PLOT_HEIGHT: f32 = 200.0;

#[derive(Debug, Clone, PartialEq)]
pub enum SignalViewAction {
    None,
    ExportChart,
}

#[derive(Default)]
pub struct SignalView {
    pub status: Option<String>,
}

impl SignalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widgets that changed this frame, as events.
    fn controls(ui: &mut egui::Ui, session: &SignalSession) -> (Vec<SignalEvent>, bool) {
        let mut params = *session.params();
        let mut events = Vec::new();
        let mut export = false;

        ui.label(RichText::new("〰 Harmonic").size(14.0).strong());
        if ui
            .add(egui::Slider::new(&mut params.amplitude, AMPLITUDE_RANGE).step_by(0.1).text("Amplitude"))
            .changed()
        {
            events.push(SignalEvent::Amplitude(params.amplitude));
        }
        if ui
            .add(egui::Slider::new(&mut params.frequency, FREQUENCY_RANGE).step_by(0.1).text("Frequency"))
            .changed()
        {
            events.push(SignalEvent::Frequency(params.frequency));
        }
        if ui
            .add(egui::Slider::new(&mut params.phase, PHASE_RANGE).step_by(0.1).text("Phase"))
            .changed()
        {
            events.push(SignalEvent::Phase(params.phase));
        }

        ui.add_space(10.0);
        ui.label(RichText::new("🎲 Noise").size(14.0).strong());
        if ui
            .add(egui::Slider::new(&mut params.noise_mean, NOISE_MEAN_RANGE).step_by(0.05).text("Mean"))
            .changed()
        {
            events.push(SignalEvent::NoiseMean(params.noise_mean));
        }
        if ui
            .add(
                egui::Slider::new(&mut params.noise_variance, NOISE_VARIANCE_RANGE)
                    .step_by(0.01)
                    .text("Variance"),
            )
            .changed()
        {
            events.push(SignalEvent::NoiseVariance(params.noise_variance));
        }
        if ui.checkbox(&mut params.show_noise, "Show noise").changed() {
            events.push(SignalEvent::ShowNoise(params.show_noise));
        }
        let noise = session.noise();
        let cached = noise.is_cached(params.noise_mean, params.noise_variance);
        ui.label(
            RichText::new(format!(
                "{} samples, draw {}",
                noise.len(),
                if cached { "cached" } else { "pending" }
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );

        ui.add_space(10.0);
        ui.label(RichText::new("🧹 Filter").size(14.0).strong());
        if ui
            .add(egui::Slider::new(&mut params.window, WINDOW_RANGE).text("Window"))
            .changed()
        {
            events.push(SignalEvent::Window(params.window));
        }
        if ui.checkbox(&mut params.show_filtered, "Show filtered").changed() {
            events.push(SignalEvent::ShowFiltered(params.show_filtered));
        }

        ui.add_space(15.0);
        ui.vertical_centered(|ui| {
            let reset = egui::Button::new(RichText::new("↺ Reset").size(14.0))
                .min_size(egui::vec2(200.0, 30.0));
            if ui.add(reset).clicked() {
                events.push(SignalEvent::Reset);
            }
            ui.add_space(5.0);
            let save = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                .min_size(egui::vec2(200.0, 30.0));
            if ui.add(save).clicked() {
                export = true;
            }
        });

        (events, export)
    }

    pub fn show(&mut self, ui: &mut egui::Ui, session: &mut SignalSession) -> SignalViewAction {
        let mut action = SignalViewAction::None;

        egui::SidePanel::left("signal_controls")
            .min_width(300.0)
            .max_width(350.0)
            .show_inside(ui, |ui| {
                let (events, export) = Self::controls(ui, session);
                for event in events {
                    if let Err(e) = session.handle(event) {
                        log::warn!("Signal event {:?} rejected: {}", event, e);
                        self.status = Some(format!("Error: {}", e));
                    }
                }
                if export {
                    action = SignalViewAction::ExportChart;
                }

                if let Some(status) = &self.status {
                    ui.add_space(10.0);
                    ui.separator();
                    let color = if status.starts_with("Error") {
                        Color32::from_rgb(220, 53, 69)
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(status).size(11.0).color(color));
                }
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ChartPlotter::draw_signal_charts(
                    ui,
                    session.time().as_slice(),
                    session.traces(),
                    PLOT_HEIGHT,
                );
            });
        });

        action
    }
}
