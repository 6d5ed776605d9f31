//! Signal demo state and event dispatch.

use super::harmonic::{generate_harmonic, moving_average, TimeBase};
use super::noise::NoiseCache;
use super::SignalError;
use std::f64::consts::PI;
use std::ops::RangeInclusive;

pub const INIT_AMPLITUDE: f64 = 1.0;
pub const INIT_FREQUENCY: f64 = 1.0;
pub const INIT_PHASE: f64 = 0.0;
pub const INIT_NOISE_MEAN: f64 = 0.0;
pub const INIT_NOISE_VARIANCE: f64 = 0.1;
pub const INIT_WINDOW: usize = 30;

pub const AMPLITUDE_RANGE: RangeInclusive<f64> = 0.1..=5.0;
pub const FREQUENCY_RANGE: RangeInclusive<f64> = 0.1..=5.0;
pub const PHASE_RANGE: RangeInclusive<f64> = 0.0..=2.0 * PI;
pub const NOISE_MEAN_RANGE: RangeInclusive<f64> = -1.0..=1.0;
pub const NOISE_VARIANCE_RANGE: RangeInclusive<f64> = 0.01..=1.0;
pub const WINDOW_RANGE: RangeInclusive<usize> = 1..=500;

/// Slider and toggle values of the demo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParams {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub noise_mean: f64,
    pub noise_variance: f64,
    pub window: usize,
    pub show_noise: bool,
    pub show_filtered: bool,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            amplitude: INIT_AMPLITUDE,
            frequency: INIT_FREQUENCY,
            phase: INIT_PHASE,
            noise_mean: INIT_NOISE_MEAN,
            noise_variance: INIT_NOISE_VARIANCE,
            window: INIT_WINDOW,
            show_noise: true,
            show_filtered: true,
        }
    }
}

/// A single user interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalEvent {
    Amplitude(f64),
    Frequency(f64),
    Phase(f64),
    NoiseMean(f64),
    NoiseVariance(f64),
    Window(usize),
    ShowNoise(bool),
    ShowFiltered(bool),
    Reset,
}

fn clamp_f64(current: f64, value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        current
    }
}

impl SignalParams {
    /// Parameters after `event`; out-of-range values are clamped.
    pub fn apply(self, event: SignalEvent) -> Self {
        match event {
            SignalEvent::Amplitude(v) => Self {
                amplitude: clamp_f64(self.amplitude, v, &AMPLITUDE_RANGE),
                ..self
            },
            SignalEvent::Frequency(v) => Self {
                frequency: clamp_f64(self.frequency, v, &FREQUENCY_RANGE),
                ..self
            },
            SignalEvent::Phase(v) => Self {
                phase: clamp_f64(self.phase, v, &PHASE_RANGE),
                ..self
            },
            SignalEvent::NoiseMean(v) => Self {
                noise_mean: clamp_f64(self.noise_mean, v, &NOISE_MEAN_RANGE),
                ..self
            },
            SignalEvent::NoiseVariance(v) => Self {
                noise_variance: clamp_f64(self.noise_variance, v, &NOISE_VARIANCE_RANGE),
                ..self
            },
            SignalEvent::Window(w) => Self {
                window: w.clamp(*WINDOW_RANGE.start(), *WINDOW_RANGE.end()),
                ..self
            },
            SignalEvent::ShowNoise(show_noise) => Self { show_noise, ..self },
            SignalEvent::ShowFiltered(show_filtered) => Self {
                show_filtered,
                ..self
            },
            SignalEvent::Reset => Self::default(),
        }
    }
}

/// Clean, noisy and filtered traces on a shared time base.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTraces {
    pub clean: Vec<f64>,
    pub noisy: Vec<f64>,
    pub filtered: Vec<f64>,
    pub show_noise: bool,
    pub show_filtered: bool,
}

/// Recompute all traces. With noise hidden the "noisy" trace is the clean
/// harmonic and the noise cache is left untouched.
pub fn compute_traces(
    time: &TimeBase,
    params: &SignalParams,
    noise: &mut NoiseCache,
) -> Result<SignalTraces, SignalError> {
    let clean = generate_harmonic(time, params.amplitude, params.frequency, params.phase);

    let noisy = if params.show_noise {
        let samples = noise.get(params.noise_mean, params.noise_variance)?;
        clean.iter().zip(samples).map(|(y, n)| y + n).collect()
    } else {
        clean.clone()
    };

    let filtered = moving_average(&noisy, params.window)?;

    Ok(SignalTraces {
        clean,
        noisy,
        filtered,
        show_noise: params.show_noise,
        show_filtered: params.show_filtered,
    })
}

/// Owns the demo state; every event synchronously recomputes the traces.
pub struct SignalSession {
    time: TimeBase,
    params: SignalParams,
    noise: NoiseCache,
    traces: SignalTraces,
}

impl SignalSession {
    pub fn new() -> Result<Self, SignalError> {
        let time = TimeBase::standard();
        let noise = NoiseCache::new(time.len());
        Self::with_noise(time, noise)
    }

    pub fn with_noise(time: TimeBase, mut noise: NoiseCache) -> Result<Self, SignalError> {
        if time.is_empty() || noise.is_empty() || time.len() != noise.len() {
            return Err(SignalError::ShapeMismatch {
                time: time.len(),
                noise: noise.len(),
            });
        }
        let params = SignalParams::default();
        let traces = compute_traces(&time, &params, &mut noise)?;
        Ok(Self {
            time,
            params,
            noise,
            traces,
        })
    }

    /// Apply one event and return the redrawn traces.
    ///
    /// On error the previous parameters and traces are kept.
    pub fn handle(&mut self, event: SignalEvent) -> Result<&SignalTraces, SignalError> {
        if event == SignalEvent::Reset {
            self.noise.clear();
            log::info!("Signal parameters reset");
        }

        let params = self.params.apply(event);
        self.traces = compute_traces(&self.time, &params, &mut self.noise)?;
        self.params = params;
        Ok(&self.traces)
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    pub fn traces(&self) -> &SignalTraces {
        &self.traces
    }

    pub fn time(&self) -> &TimeBase {
        &self.time
    }

    pub fn noise(&self) -> &NoiseCache {
        &self.noise
    }
}
