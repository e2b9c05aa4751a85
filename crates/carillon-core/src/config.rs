//! Detector configuration.

use std::ops::Range;
use std::time::Duration;

use thiserror::Error;

use crate::trigger::RetriggerPolicy;

/// Default target chime frequencies in Hz.
pub const DEFAULT_TARGETS: [f32; 6] = [650.0, 1180.0, 1560.0, 2093.0, 2490.0, 3000.0];

/// Errors produced by [`DetectorConfig::validate`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rolling window must hold at least one sample.
    #[error("window length must be at least 1")]
    ZeroWindow,

    /// The history cannot be shorter than the rolling window.
    #[error("history capacity {history} is smaller than window length {window}")]
    HistoryTooShort {
        /// Configured history capacity.
        history: usize,
        /// Configured window length.
        window: usize,
    },

    /// The inspection range contains no bins.
    #[error("bin range {start}..{end} is empty")]
    EmptyBinRange {
        /// Range start (inclusive).
        start: usize,
        /// Range end (exclusive).
        end: usize,
    },

    /// No target frequencies were configured.
    #[error("no target frequencies configured")]
    NoTargets,

    /// The detection threshold must be a positive finite ratio.
    #[error("threshold must be positive and finite, got {0}")]
    BadThreshold(f32),
}

/// Tuning parameters for the detection pipeline.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Target chime frequencies in Hz; out-of-range targets are dropped
    /// at resolution time with a warning.
    pub target_frequencies: Vec<f32>,
    /// Bin range inspected per frame (clamped to the frame length).
    pub bin_range: Range<usize>,
    /// Energy history capacity.
    pub history_len: usize,
    /// Rolling-mean window length; also the onset lag compensation depth.
    pub window_len: usize,
    /// Normalized-score threshold for firing.
    pub threshold: f32,
    /// Retained score trail capacity.
    pub score_trail_len: usize,
    /// Retrigger behavior while the score stays above threshold.
    pub retrigger: RetriggerPolicy,
    /// Pause between detection steps in the live loop.
    pub poll_interval: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            target_frequencies: DEFAULT_TARGETS.to_vec(),
            bin_range: 0..200,
            history_len: 20,
            window_len: 10,
            threshold: 2.0,
            score_trail_len: 600,
            retrigger: RetriggerPolicy::EveryFrame,
            poll_interval: Duration::from_millis(16),
        }
    }
}

impl DetectorConfig {
    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_len == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.history_len < self.window_len {
            return Err(ConfigError::HistoryTooShort {
                history: self.history_len,
                window: self.window_len,
            });
        }
        if self.bin_range.is_empty() {
            return Err(ConfigError::EmptyBinRange {
                start: self.bin_range.start,
                end: self.bin_range.end,
            });
        }
        if self.target_frequencies.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::BadThreshold(self.threshold));
        }
        Ok(())
    }
}
