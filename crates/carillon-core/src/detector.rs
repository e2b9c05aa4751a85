//! Frame-level detection pipeline.

use crate::aggregator::FrameAggregator;
use crate::bins::ChimeBins;
use crate::config::{ConfigError, DetectorConfig};
use crate::history::{EnergyHistory, ScoreTrail};
use crate::score::{Score, ScoreWindow};
use crate::trigger::{ChimeEvent, ThresholdTrigger};

/// The complete per-frame pipeline: aggregate energies, evaluate the
/// rolling score, test the threshold.
///
/// Pure with respect to I/O: frames and timestamps come from the caller,
/// which makes the pipeline directly drivable from synthetic tests and
/// offline file scans. [`DetectionLoop`](crate::driver::DetectionLoop)
/// wraps it for live capture.
#[derive(Debug)]
pub struct ChimeDetector {
    aggregator: FrameAggregator,
    window: ScoreWindow,
    trigger: ThresholdTrigger,
    trail: ScoreTrail,
    last_score: Option<Score>,
}

impl ChimeDetector {
    /// Build the pipeline for an analyzer with the given geometry.
    ///
    /// Resolves the chime bin set up front; targets outside the bin range
    /// are dropped with a warning and detection proceeds with reduced
    /// coverage.
    pub fn new(
        config: &DetectorConfig,
        sample_rate: u32,
        transform_size: usize,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let bins = ChimeBins::resolve(&config.target_frequencies, sample_rate, transform_size);
        tracing::debug!(
            resolved = bins.len(),
            configured = config.target_frequencies.len(),
            "chime bin set resolved"
        );

        Ok(Self {
            aggregator: FrameAggregator::new(bins, config.bin_range.clone(), config.history_len),
            window: ScoreWindow::new(config.window_len),
            trigger: ThresholdTrigger::new(config.threshold, config.retrigger),
            trail: ScoreTrail::new(config.score_trail_len),
            last_score: None,
        })
    }

    /// Process one frequency frame captured at `time`.
    ///
    /// Returns a [`ChimeEvent`] when the normalized score crosses the
    /// threshold under the configured retrigger policy. The event onset is
    /// the timestamp recorded at the start of the averaging window, not
    /// `time` itself.
    pub fn process_frame(&mut self, frame: &[u8], time: f64) -> Option<ChimeEvent> {
        self.aggregator.ingest(frame, time);

        let score = self.window.evaluate(self.aggregator.history())?;
        self.last_score = Some(score);
        if let Some(normalized) = score.normalized {
            self.trail.push(normalized);
        }

        // Always in range: evaluate only succeeds with a full window.
        let onset = self
            .aggregator
            .history()
            .nth_back(self.window.window_len() - 1)?
            .time;

        self.trigger.check(score.normalized, onset)
    }

    /// The rolling energy history.
    pub fn history(&self) -> &EnergyHistory {
        self.aggregator.history()
    }

    /// The retained normalized-score trail.
    pub fn score_trail(&self) -> &ScoreTrail {
        &self.trail
    }

    /// The resolved chime bin set.
    pub fn chime_bins(&self) -> &ChimeBins {
        self.aggregator.chime_bins()
    }

    /// The most recent window evaluation, if any.
    pub fn last_score(&self) -> Option<Score> {
        self.last_score
    }
}
