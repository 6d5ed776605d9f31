//! Harmonic generation and moving-average smoothing.

use super::SignalError;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Samples per second of the demo time base.
pub const SAMPLE_RATE: usize = 1000;
/// Length of the demo time base in seconds.
pub const DURATION_SECS: usize = 10;

/// Evenly spaced sample instants, endpoints included.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBase {
    samples: Vec<f64>,
}

impl TimeBase {
    pub fn linspace(start: f64, end: f64, count: usize) -> Self {
        let samples = match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (count - 1) as f64;
                let mut samples: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
                samples[count - 1] = end;
                samples
            }
        };
        Self { samples }
    }

    /// 10 000 samples over [0, 10] s.
    pub fn standard() -> Self {
        Self::linspace(0.0, DURATION_SECS as f64, SAMPLE_RATE * DURATION_SECS)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }
}

/// `amplitude * sin(2π·frequency·t + phase)` over the time base.
pub fn generate_harmonic(time: &TimeBase, amplitude: f64, frequency: f64, phase: f64) -> Vec<f64> {
    time.as_slice()
        .iter()
        .map(|&t| amplitude * (2.0 * PI * frequency * t + phase).sin())
        .collect()
}

/// Uniform-kernel moving average with same-length output.
///
/// Equivalent to a "same" mode convolution with a kernel of `window` ones
/// divided by `window`: the kernel is centered and the edges see a
/// zero-padded partial overlap. `window` must be in `1..=signal.len()`.
pub fn moving_average(signal: &[f64], window: usize) -> Result<Vec<f64>, SignalError> {
    let len = signal.len();
    if window == 0 || window > len {
        return Err(SignalError::InvalidWindow { window, len });
    }

    // Offset of the "same" slice inside the full convolution
    let start = (window - 1) / 2;
    let scale = window as f64;

    let smoothed = (0..len)
        .into_par_iter()
        .map(|i| {
            let n = i + start;
            let lo = n.saturating_sub(window - 1);
            let hi = n.min(len - 1);
            signal[lo..=hi].iter().sum::<f64>() / scale
        })
        .collect();

    Ok(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn standard_time_base_spans_ten_seconds() {
        let time = TimeBase::standard();
        assert_eq!(time.len(), 10_000);
        assert_eq!(time.as_slice()[0], 0.0);
        assert_eq!(time.as_slice()[9_999], 10.0);
        assert_relative_eq!(time.as_slice()[1], 10.0 / 9_999.0, epsilon = 1e-12);
    }

    #[test]
    fn harmonic_is_deterministic() {
        let time = TimeBase::standard();
        let a = generate_harmonic(&time, 2.0, 1.5, 0.3);
        let b = generate_harmonic(&time, 2.0, 1.5, 0.3);
        assert_eq!(a, b);
    }

    #[test]
    fn phase_shift_of_two_pi_is_identity() {
        let time = TimeBase::standard();
        let base = generate_harmonic(&time, 1.3, 2.2, 0.4);
        let shifted = generate_harmonic(&time, 1.3, 2.2, 0.4 + 2.0 * PI);
        for (x, y) in base.iter().zip(&shifted) {
            assert_relative_eq!(*x, *y, epsilon = 1e-9);
        }
    }

    #[test]
    fn harmonic_matches_closed_form() {
        let time = TimeBase::linspace(0.0, 1.0, 5);
        let y = generate_harmonic(&time, 3.0, 1.0, 0.0);
        assert_relative_eq!(y[1], 3.0, epsilon = 1e-12); // t = 0.25
        assert_relative_eq!(y[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(y[3], -3.0, epsilon = 1e-12);
    }

    #[test]
    fn window_one_is_identity() {
        let signal = vec![0.3, -1.7, 2.5, 4.0, 0.0];
        assert_eq!(moving_average(&signal, 1).unwrap(), signal);
    }

    #[test]
    fn preserves_length_for_all_valid_windows() {
        let signal: Vec<f64> = (0..37).map(|i| (i as f64 * 0.7).sin()).collect();
        for window in 1..=signal.len() {
            assert_eq!(moving_average(&signal, window).unwrap().len(), signal.len());
        }
    }

    #[test]
    fn matches_same_mode_convolution_odd_window() {
        // np.convolve([1, 2, 3, 4, 5], ones(3)/3, mode='same')
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        let expected = [1.0, 2.0, 3.0, 4.0, 3.0];
        for (o, e) in out.iter().zip(expected) {
            assert_relative_eq!(*o, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn matches_same_mode_convolution_even_window() {
        // np.convolve([1, 2, 3, 4, 5], ones(4)/4, mode='same')
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 4).unwrap();
        let expected = [0.75, 1.5, 2.5, 3.5, 3.0];
        for (o, e) in out.iter().zip(expected) {
            assert_relative_eq!(*o, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn window_equal_to_length_is_accepted() {
        let out = moving_average(&[2.0, 2.0, 2.0], 3).unwrap();
        assert_relative_eq!(out[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(out[0], 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_zero_and_oversized_windows() {
        let signal = [1.0, 2.0, 3.0];
        assert!(matches!(
            moving_average(&signal, 0),
            Err(SignalError::InvalidWindow { window: 0, len: 3 })
        ));
        assert!(matches!(
            moving_average(&signal, 4),
            Err(SignalError::InvalidWindow { window: 4, len: 3 })
        ));
    }
}
