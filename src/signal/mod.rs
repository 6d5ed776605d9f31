//! Signal module - noisy harmonic generation and smoothing

mod harmonic;
mod noise;
mod session;

use thiserror::Error;

pub use session::{
    SignalEvent, SignalSession, SignalTraces, AMPLITUDE_RANGE, FREQUENCY_RANGE, NOISE_MEAN_RANGE,
    NOISE_VARIANCE_RANGE, PHASE_RANGE, WINDOW_RANGE,
};

#[derive(Error, Debug, PartialEq)]
pub enum SignalError {
    #[error("Filter window {window} must be between 1 and the signal length {len}")]
    InvalidWindow { window: usize, len: usize },
    #[error("Invalid noise parameters: mean={mean}, variance={variance}")]
    InvalidNoise { mean: f64, variance: f64 },
    #[error("Time base has {time} samples but the noise cache holds {noise}")]
    ShapeMismatch { time: usize, noise: usize },
    #[error("Noise distribution error: {0}")]
    Distribution(String),
}
