//! Carillon Core - spectral chime detection
//!
//! This crate implements the detection pipeline for a multi-tone chime
//! sound: mapping target frequencies onto spectral bins, aggregating
//! per-frame energy averages into a bounded rolling history, deriving a
//! normalized chime-to-background score, and firing an event with a
//! lag-compensated onset timestamp when the score crosses a threshold.
//!
//! # Core Abstractions
//!
//! - [`frequency_to_bin`] / [`ChimeBins`] - resolve target frequencies to
//!   analyzer bins, dropping out-of-range targets with a warning
//! - [`FrameAggregator`] - per-frame chime/non-chime mean energies over a
//!   bounded [`EnergyHistory`]
//! - [`ScoreWindow`] - rolling-mean evaluation with an explicit
//!   zero-baseline guard
//! - [`ThresholdTrigger`] - threshold crossing under a configurable
//!   [`RetriggerPolicy`]
//! - [`ChimeDetector`] - the composed frame-level pipeline, directly
//!   drivable from tests and offline scans
//! - [`DetectionLoop`] / [`DetectionHandle`] - the live driver over a
//!   [`FrequencySource`], with idempotent teardown
//!
//! # Example
//!
//! ```rust
//! use carillon_core::{ChimeDetector, DetectorConfig};
//!
//! let config = DetectorConfig::default();
//! let mut detector = ChimeDetector::new(&config, 44100, 2048).unwrap();
//!
//! let frame = vec![0u8; 1024]; // one frequency frame, 0..=255 per bin
//! if let Some(event) = detector.process_frame(&frame, 0.0) {
//!     println!("chime began at {:.3}", event.onset);
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Exclusive ownership**: all detection state lives in one pipeline
//!   instance; the only cross-thread state is the cancellation flag
//! - **Cooperative stepping**: one frame is processed to completion before
//!   the next is requested; cancellation is honored at step boundaries
//! - **No hidden non-finites**: zero baselines and unfilled windows are
//!   represented as absent scores, never compared against the threshold

pub mod aggregator;
pub mod bins;
pub mod config;
pub mod detector;
pub mod driver;
pub mod history;
pub mod score;
pub mod source;
pub mod trigger;

pub use aggregator::FrameAggregator;
pub use bins::{ChimeBins, OutOfRange, bin_resolution, frequency_to_bin};
pub use config::{ConfigError, DEFAULT_TARGETS, DetectorConfig};
pub use detector::ChimeDetector;
pub use driver::{Clock, DetectionHandle, DetectionLoop, EventListener};
pub use history::{EnergyHistory, EnergySample, ScoreTrail};
pub use score::{Score, ScoreWindow};
pub use source::FrequencySource;
pub use trigger::{ChimeEvent, RetriggerPolicy, ThresholdTrigger};
