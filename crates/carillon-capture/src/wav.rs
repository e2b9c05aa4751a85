//! Offline WAV scanning.
//!
//! [`WavScan`] walks a WAV file hop by hop through the same spectral
//! analyzer live capture uses, timestamping frames with the file position
//! in seconds. Detections over a scan therefore report positions within
//! the file.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::analyzer::{AnalyzerParams, SpectrumAnalyzer};
use crate::Result;

/// Frame-by-frame spectral scan of a WAV file.
#[derive(Debug)]
pub struct WavScan {
    samples: Vec<f32>,
    sample_rate: u32,
    analyzer: SpectrumAnalyzer,
    hop: usize,
    pos: usize,
}

impl WavScan {
    /// Open a WAV file for scanning with the default hop of
    /// `transform_size / 2`.
    ///
    /// Multi-channel audio is mixed down to mono; integer formats are
    /// normalized to `[-1, 1]`.
    pub fn open<P: AsRef<Path>>(path: P, transform_size: usize) -> Result<Self> {
        Self::with_params(path, transform_size, AnalyzerParams::default())
    }

    /// Open a WAV file with explicit analyzer parameters.
    pub fn with_params<P: AsRef<Path>>(
        path: P,
        transform_size: usize,
        params: AnalyzerParams,
    ) -> Result<Self> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.samples::<f32>().collect::<hound::Result<_>>()?,
            SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<hound::Result<_>>()?
            }
        };

        let channels = spec.channels as usize;
        let samples: Vec<f32> = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };

        tracing::debug!(
            sample_rate = spec.sample_rate,
            channels,
            frames = samples.len(),
            "opened WAV for scanning"
        );

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            analyzer: SpectrumAnalyzer::with_params(transform_size, params)?,
            hop: transform_size / 2,
            pos: 0,
        })
    }

    /// Override the hop size in samples.
    pub fn with_hop(mut self, hop: usize) -> Self {
        self.hop = hop.max(1);
        self
    }

    /// Sample rate of the file in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Transform size of the underlying analyzer.
    pub fn transform_size(&self) -> usize {
        self.analyzer.transform_size()
    }

    /// Total duration of the file in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Advance one hop and write the next frame.
    ///
    /// Returns the file position in seconds at the end of the consumed
    /// audio, or `None` once the file is exhausted. `frame` must be
    /// `transform_size / 2` long.
    pub fn next_frame(&mut self, frame: &mut [u8]) -> Option<f64> {
        if self.pos >= self.samples.len() {
            return None;
        }

        let end = (self.pos + self.hop).min(self.samples.len());
        self.analyzer.push_samples(&self.samples[self.pos..end]);
        self.pos = end;

        self.analyzer.write_magnitudes(frame);
        Some(self.pos as f64 / f64::from(self.sample_rate))
    }
}
