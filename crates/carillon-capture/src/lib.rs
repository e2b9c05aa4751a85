//! Capture layer for the carillon chime detector.
//!
//! This crate provides the concrete [`FrequencySource`] implementations the
//! detection core is driven by:
//!
//! - **Live capture**: [`MicSource`] wraps a cpal input stream and feeds a
//!   [`SpectrumAnalyzer`]
//! - **Offline scanning**: [`WavScan`] walks a WAV file through the same
//!   analyzer with a file-position clock
//! - **Device discovery**: [`list_input_devices`] / [`default_input_device`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use carillon_capture::{CaptureConfig, MicSource};
//! use carillon_core::{DetectionLoop, DetectorConfig};
//!
//! let source = MicSource::open(&CaptureConfig::default())?;
//! let detection = DetectionLoop::new(
//!     source,
//!     &DetectorConfig::default(),
//!     Box::new(|onset| println!("chime at {onset:.3}s")),
//! )?;
//! let handle = detection.handle();
//! detection.run(); // blocks until handle.stop()
//! ```
//!
//! [`FrequencySource`]: carillon_core::FrequencySource

mod analyzer;
mod mic;
mod wav;

pub use analyzer::{AnalyzerParams, SpectrumAnalyzer, Window};
pub use mic::{AudioDevice, CaptureConfig, MicSource, default_input_device, list_input_devices};
pub use wav::WavScan;

/// Error types for capture operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// No audio input device available on the system.
    #[error("no audio input device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("input device not found: {0}")]
    DeviceNotFound(String),

    /// The transform size is not usable for spectral analysis.
    #[error("transform size {0} is not a power of two of at least 32")]
    BadTransformSize(usize),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for capture operations.
pub type Result<T> = std::result::Result<T, Error>;
