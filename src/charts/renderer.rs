//! Static Chart Renderer
//! Writes the dashboard and signal charts to PNG files with plotters.
//!
//! Layout matches the interactive views:
//! 1. Region chart: one line per year, week on the x axis
//! 2. Comparison chart: one bar per region, names under the bars
//! 3. Signal chart: clean, noisy and filtered traces stacked vertically

use super::plotter::{ComparisonChartData, RegionChartData};
use crate::signal::SignalTraces;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const CLEAN: RGBColor = RGBColor(46, 204, 113);
const NOISY: RGBColor = RGBColor(243, 156, 18);
const FILTERED: RGBColor = RGBColor(52, 152, 219);
const BAR: RGBColor = RGBColor(52, 152, 219);

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render")]
    Empty,
    #[error("Drawing failed: {0}")]
    Draw(String),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// (min, max) of the values padded by 10%, or `None` if there are none.
fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return None;
    }
    let pad = ((max - min) * 0.1).max(1e-6);
    Some((min - pad, max + pad))
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Per-year lines of one region.
    pub fn render_region_chart(
        data: &RegionChartData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let (y_min, y_max) = padded_range(
            data.lines
                .iter()
                .flat_map(|line| line.points.iter().map(|p| p[1])),
        )
        .ok_or(RenderError::Empty)?;
        let (x_min, x_max) = padded_range(
            data.lines
                .iter()
                .flat_map(|line| line.points.iter().map(|p| p[0])),
        )
        .ok_or(RenderError::Empty)?;

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&data.title, (FONT, 26))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(55)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Week")
            .y_desc(data.series.to_string())
            .draw()
            .map_err(draw_err)?;

        for (idx, line) in data.lines.iter().enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            chart
                .draw_series(LineSeries::new(
                    line.points.iter().map(|p| (p[0], p[1])),
                    color.stroke_width(2),
                ))
                .map_err(draw_err)?
                .label(line.year.to_string())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        log::info!("Region chart saved to {}", path.display());
        Ok(())
    }

    /// Bar per region of the series mean.
    pub fn render_comparison_chart(
        data: &ComparisonChartData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        if data.is_empty() {
            return Err(RenderError::Empty);
        }
        let max = data
            .bars
            .iter()
            .filter_map(|b| b.mean)
            .fold(0.0_f64, f64::max);
        let n = data.bars.len() as f64;
        let names: Vec<String> = data.bars.iter().map(|b| b.name.clone()).collect();

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&data.title, (FONT, 26))
            .margin(15)
            .x_label_area_size(120)
            .y_label_area_size(55)
            .build_cartesian_2d(-0.5..n - 0.5, 0.0..max * 1.1 + 1e-6)
            .map_err(draw_err)?;

        let label_at = |x: &f64| -> String {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(data.bars.len())
            .x_label_formatter(&label_at)
            .x_label_style(
                (FONT, 13)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_desc(data.series.to_string())
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(data.bars.iter().enumerate().filter_map(|(i, avg)| {
                let mean = avg.mean?;
                let x = i as f64;
                Some(Rectangle::new([(x - 0.35, 0.0), (x + 0.35, mean)], BAR.filled()))
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        log::info!("Comparison chart saved to {}", path.display());
        Ok(())
    }

    /// Clean, noisy and filtered traces in three stacked panels. Hidden
    /// traces leave their panel empty.
    pub fn render_signal_chart(
        time: &[f64],
        traces: &SignalTraces,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let (t_min, t_max) = match (time.first(), time.last()) {
            (Some(&first), Some(&last)) if last > first => (first, last),
            _ => return Err(RenderError::Empty),
        };
        let (y_min, y_max) = padded_range(
            traces
                .clean
                .iter()
                .chain(&traces.noisy)
                .chain(&traces.filtered)
                .copied(),
        )
        .ok_or(RenderError::Empty)?;

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let panels = root.split_evenly((3, 1));

        let plots: [(&str, &[f64], RGBColor, bool); 3] = [
            ("Clean harmonic", &traces.clean, CLEAN, true),
            ("Harmonic with noise", &traces.noisy, NOISY, traces.show_noise),
            ("Filtered harmonic", &traces.filtered, FILTERED, traces.show_filtered),
        ];

        for (panel, (title, values, color, visible)) in panels.iter().zip(plots) {
            let mut chart = ChartBuilder::on(panel)
                .caption(title, (FONT, 20))
                .margin(10)
                .x_label_area_size(30)
                .y_label_area_size(45)
                .build_cartesian_2d(t_min..t_max, y_min..y_max)
                .map_err(draw_err)?;

            chart.configure_mesh().draw().map_err(draw_err)?;

            if visible {
                chart
                    .draw_series(LineSeries::new(
                        time.iter().copied().zip(values.iter().copied()),
                        color.stroke_width(1),
                    ))
                    .map_err(draw_err)?;
            }
        }

        root.present().map_err(draw_err)?;
        log::info!("Signal chart saved to {}", path.display());
        Ok(())
    }
}
