//! Per-frame energy aggregation.

use std::ops::Range;

use crate::bins::ChimeBins;
use crate::history::{EnergyHistory, EnergySample};

/// Splits each frequency frame into chime and non-chime mean energies.
///
/// Iterates the configured inspection range, classifies each bin against
/// the chime set, and appends the resulting [`EnergySample`] to the bounded
/// history. A category with no bins averages to exactly 0.
#[derive(Debug)]
pub struct FrameAggregator {
    bins: ChimeBins,
    range: Range<usize>,
    history: EnergyHistory,
}

impl FrameAggregator {
    /// Create an aggregator over `range` with a history bounded at
    /// `history_capacity` entries.
    pub fn new(bins: ChimeBins, range: Range<usize>, history_capacity: usize) -> Self {
        Self {
            bins,
            range,
            history: EnergyHistory::new(history_capacity),
        }
    }

    /// Ingest one frequency frame captured at `time`.
    ///
    /// The inspection range is clamped to the frame length. Mutates the
    /// history in place and returns the appended sample.
    pub fn ingest(&mut self, frame: &[u8], time: f64) -> EnergySample {
        let start = self.range.start.min(frame.len());
        let end = self.range.end.min(frame.len());

        let mut chime_sum: u32 = 0;
        let mut chime_count: u32 = 0;
        let mut no_chime_sum: u32 = 0;
        let mut no_chime_count: u32 = 0;

        for (i, &magnitude) in frame[start..end].iter().enumerate() {
            if self.bins.contains(start + i) {
                chime_sum += u32::from(magnitude);
                chime_count += 1;
            } else {
                no_chime_sum += u32::from(magnitude);
                no_chime_count += 1;
            }
        }

        let sample = EnergySample {
            time,
            chime_avg: mean(chime_sum, chime_count),
            no_chime_avg: mean(no_chime_sum, no_chime_count),
        };
        self.history.push(sample);
        sample
    }

    /// The rolling energy history.
    pub fn history(&self) -> &EnergyHistory {
        &self.history
    }

    /// The resolved chime bin set.
    pub fn chime_bins(&self) -> &ChimeBins {
        &self.bins
    }

    /// The inspected bin range.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }
}

fn mean(sum: u32, count: u32) -> f32 {
    if count == 0 {
        0.0
    } else {
        sum as f32 / count as f32
    }
}
