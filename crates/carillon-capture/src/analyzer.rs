//! Spectral analyzer producing byte-magnitude frequency frames.
//!
//! Reproduces the frame contract the detection core expects from its
//! capture collaborator: a windowed FFT over the most recent
//! `transform_size` mono samples, exponential smoothing across successive
//! frames, and magnitudes reported as bytes by mapping a fixed decibel
//! range onto `0..=255`.

use std::collections::VecDeque;
use std::sync::Arc;

use rustfft::{FftPlanner, num_complex::Complex};

use crate::{Error, Result};

/// Window function applied before the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Rectangular (no windowing).
    Rectangular,
    /// Hann window (raised cosine).
    Hann,
    /// Blackman window; the default, matching common host analyzers.
    Blackman,
}

impl Window {
    /// Window coefficients for a buffer of `size` samples.
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        use std::f32::consts::PI;
        (0..size)
            .map(|i| {
                let x = 2.0 * PI * i as f32 / size as f32;
                match self {
                    Window::Rectangular => 1.0,
                    Window::Hann => 0.5 * (1.0 - x.cos()),
                    Window::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                }
            })
            .collect()
    }
}

/// Tuning for [`SpectrumAnalyzer`].
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerParams {
    /// Window applied before the FFT.
    pub window: Window,
    /// Exponential smoothing factor in `[0, 1)`: the weight of the
    /// previous frame's magnitudes. 0 disables smoothing.
    pub smoothing: f32,
    /// Magnitude mapped to byte 0.
    pub min_db: f32,
    /// Magnitude mapped to byte 255.
    pub max_db: f32,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            window: Window::Blackman,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
        }
    }
}

/// Sliding-window FFT over a mono sample feed.
///
/// Samples are pushed as they arrive; each call to [`write_magnitudes`]
/// transforms the newest `transform_size` samples (zero-padded while the
/// buffer is still filling) and writes `transform_size / 2` byte
/// magnitudes.
///
/// [`write_magnitudes`]: SpectrumAnalyzer::write_magnitudes
pub struct SpectrumAnalyzer {
    fft: Arc<dyn rustfft::Fft<f32>>,
    transform_size: usize,
    window: Vec<f32>,
    params: AnalyzerParams,
    ring: VecDeque<f32>,
    smoothed: Vec<f32>,
    scratch: Vec<Complex<f32>>,
}

impl std::fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("transform_size", &self.transform_size)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl SpectrumAnalyzer {
    /// Create an analyzer with default parameters.
    pub fn new(transform_size: usize) -> Result<Self> {
        Self::with_params(transform_size, AnalyzerParams::default())
    }

    /// Create an analyzer with explicit parameters.
    pub fn with_params(transform_size: usize, params: AnalyzerParams) -> Result<Self> {
        if transform_size < 32 || !transform_size.is_power_of_two() {
            return Err(Error::BadTransformSize(transform_size));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(transform_size);

        Ok(Self {
            fft,
            transform_size,
            window: params.window.coefficients(transform_size),
            params,
            ring: VecDeque::with_capacity(transform_size),
            smoothed: vec![0.0; transform_size / 2],
            scratch: vec![Complex::new(0.0, 0.0); transform_size],
        })
    }

    /// Transform size of the analyzer.
    pub fn transform_size(&self) -> usize {
        self.transform_size
    }

    /// Number of magnitude bins per frame (`transform_size / 2`).
    pub fn bin_count(&self) -> usize {
        self.transform_size / 2
    }

    /// Append mono samples, keeping only the newest `transform_size`.
    pub fn push_samples(&mut self, samples: &[f32]) {
        for &sample in samples {
            if self.ring.len() == self.transform_size {
                self.ring.pop_front();
            }
            self.ring.push_back(sample);
        }
    }

    /// Transform the current sample window and write byte magnitudes.
    ///
    /// `frame` must be `transform_size / 2` long. Magnitudes are scaled by
    /// `1 / transform_size`, smoothed against the previous call, converted
    /// to dB, and mapped linearly from `[min_db, max_db]` onto `0..=255`
    /// with saturation.
    pub fn write_magnitudes(&mut self, frame: &mut [u8]) {
        debug_assert_eq!(frame.len(), self.bin_count());

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let sample = self.ring.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        let scale = 1.0 / self.transform_size as f32;
        let tau = self.params.smoothing;
        let db_span = self.params.max_db - self.params.min_db;

        for (i, byte) in frame.iter_mut().enumerate() {
            let magnitude = self.scratch[i].norm() * scale;
            let smoothed = tau * self.smoothed[i] + (1.0 - tau) * magnitude;
            self.smoothed[i] = smoothed;

            let db = 20.0 * smoothed.max(1e-10).log10();
            let scaled = 255.0 * (db - self.params.min_db) / db_span;
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }
    }

    /// Drop buffered samples and smoothing state.
    pub fn reset(&mut self) {
        self.ring.clear();
        self.smoothed.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn sine(freq: f32, sample_rate: f32, count: usize) -> Vec<f32> {
        (0..count)
            .map(|n| (TAU * freq * n as f32 / sample_rate).sin())
            .collect()
    }

    /// Analyzer with smoothing disabled so a single frame settles.
    fn unsmoothed(transform_size: usize) -> SpectrumAnalyzer {
        SpectrumAnalyzer::with_params(
            transform_size,
            AnalyzerParams {
                smoothing: 0.0,
                ..AnalyzerParams::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn rejects_non_power_of_two() {
        assert!(SpectrumAnalyzer::new(1000).is_err());
        assert!(SpectrumAnalyzer::new(2048).is_ok());
    }

    #[test]
    fn silence_produces_zero_bytes() {
        let mut analyzer = unsmoothed(2048);
        analyzer.push_samples(&vec![0.0; 2048]);

        let mut frame = vec![0u8; 1024];
        analyzer.write_magnitudes(&mut frame);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn sine_peaks_at_expected_bin() {
        // 440 Hz at 44100 Hz / 2048 lands in bin round(440 / 21.53) = 20.
        let mut analyzer = unsmoothed(2048);
        analyzer.push_samples(&sine(440.0, 44100.0, 2048));

        let mut frame = vec![0u8; 1024];
        analyzer.write_magnitudes(&mut frame);

        let peak = frame
            .iter()
            .enumerate()
            .max_by_key(|&(_, &b)| b)
            .map(|(i, _)| i)
            .unwrap();
        assert!(
            (peak as i64 - 20).unsigned_abs() <= 1,
            "peak at bin {peak}, expected near 20"
        );
        assert!(frame[peak] > 0);
    }

    #[test]
    fn off_peak_bins_stay_below_peak() {
        let mut analyzer = unsmoothed(2048);
        analyzer.push_samples(&sine(440.0, 44100.0, 2048));

        let mut frame = vec![0u8; 1024];
        analyzer.write_magnitudes(&mut frame);

        // Far away from the tone the spectrum drops off.
        assert!(frame[500] < frame[20]);
    }

    #[test]
    fn smoothing_ramps_magnitudes_up() {
        let mut analyzer = SpectrumAnalyzer::new(2048).unwrap();
        analyzer.push_samples(&sine(440.0, 44100.0, 2048));

        let mut first = vec![0u8; 1024];
        let mut second = vec![0u8; 1024];
        analyzer.write_magnitudes(&mut first);
        analyzer.write_magnitudes(&mut second);

        // With smoothing, successive frames of a steady tone approach the
        // settled magnitude from below.
        assert!(second[20] >= first[20]);
        assert!(first[20] > 0);
    }

    #[test]
    fn window_keeps_only_newest_samples() {
        let mut analyzer = unsmoothed(2048);
        // Old tone fully displaced by silence.
        analyzer.push_samples(&sine(440.0, 44100.0, 2048));
        analyzer.push_samples(&vec![0.0; 2048]);

        let mut frame = vec![0u8; 1024];
        analyzer.write_magnitudes(&mut frame);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn reset_clears_smoothing_state() {
        let mut analyzer = SpectrumAnalyzer::new(2048).unwrap();
        analyzer.push_samples(&sine(440.0, 44100.0, 2048));
        let mut frame = vec![0u8; 1024];
        analyzer.write_magnitudes(&mut frame);

        analyzer.reset();
        analyzer.write_magnitudes(&mut frame);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn blackman_coefficients_taper_at_edges() {
        let coeffs = Window::Blackman.coefficients(128);
        assert!(coeffs[0].abs() < 0.01);
        assert!((coeffs[64] - 1.0).abs() < 0.01);
    }
}
