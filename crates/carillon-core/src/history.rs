//! Bounded FIFO buffers for per-frame energy averages and scores.

use std::collections::VecDeque;

/// Per-frame energy averages with the capture timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergySample {
    /// Clock reading when the frame was ingested.
    pub time: f64,
    /// Mean magnitude over the chime bins (0 when the set is empty).
    pub chime_avg: f32,
    /// Mean magnitude over the remaining bins in the inspection range.
    pub no_chime_avg: f32,
}

/// Bounded FIFO of recent [`EnergySample`]s.
///
/// Holds at most `capacity` entries; pushing to a full history evicts the
/// oldest. The rolling score and the lag-compensated onset timestamp are
/// both derived from this buffer.
#[derive(Debug, Clone)]
pub struct EnergyHistory {
    samples: VecDeque<EnergySample>,
    capacity: usize,
}

impl EnergyHistory {
    /// Create an empty history bounded at `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when full.
    pub fn push(&mut self, sample: EnergySample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True before the first ingestion.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recent sample.
    pub fn newest(&self) -> Option<&EnergySample> {
        self.samples.back()
    }

    /// The sample `n` entries before the newest (`nth_back(0)` is the newest).
    pub fn nth_back(&self, n: usize) -> Option<&EnergySample> {
        self.samples.len().checked_sub(n + 1).and_then(|i| self.samples.get(i))
    }

    /// Iterate over the last `n` samples, oldest first.
    pub fn last_n(&self, n: usize) -> impl Iterator<Item = &EnergySample> {
        self.samples.iter().skip(self.samples.len().saturating_sub(n))
    }

    /// Iterate over all held samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &EnergySample> {
        self.samples.iter()
    }
}

/// Bounded FIFO of recent normalized scores.
///
/// Retained for trend inspection (e.g. verbose CLI output); the trigger
/// decision never consults it.
#[derive(Debug, Clone)]
pub struct ScoreTrail {
    scores: VecDeque<f32>,
    capacity: usize,
}

impl ScoreTrail {
    /// Create an empty trail bounded at `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a score, evicting the oldest when full.
    pub fn push(&mut self, score: f32) {
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    /// Number of scores currently held.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when no score has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// The most recent score.
    pub fn latest(&self) -> Option<f32> {
        self.scores.back().copied()
    }

    /// Iterate over held scores, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.scores.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64) -> EnergySample {
        EnergySample {
            time,
            chime_avg: 0.0,
            no_chime_avg: 0.0,
        }
    }

    #[test]
    fn history_never_exceeds_capacity() {
        let mut history = EnergyHistory::new(20);
        for i in 0..100 {
            history.push(sample(i as f64));
            assert!(history.len() <= 20);
        }
        assert_eq!(history.len(), 20);
    }

    #[test]
    fn history_evicts_oldest_first() {
        let mut history = EnergyHistory::new(3);
        for i in 0..5 {
            history.push(sample(i as f64));
        }
        let times: Vec<f64> = history.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn nth_back_counts_from_newest() {
        let mut history = EnergyHistory::new(10);
        for i in 0..10 {
            history.push(sample(i as f64));
        }
        assert_eq!(history.nth_back(0).unwrap().time, 9.0);
        assert_eq!(history.nth_back(9).unwrap().time, 0.0);
        assert!(history.nth_back(10).is_none());
    }

    #[test]
    fn last_n_returns_tail_in_order() {
        let mut history = EnergyHistory::new(10);
        for i in 0..6 {
            history.push(sample(i as f64));
        }
        let tail: Vec<f64> = history.last_n(3).map(|s| s.time).collect();
        assert_eq!(tail, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn last_n_with_short_history_returns_everything() {
        let mut history = EnergyHistory::new(10);
        history.push(sample(1.0));
        assert_eq!(history.last_n(5).count(), 1);
    }

    #[test]
    fn trail_is_bounded() {
        let mut trail = ScoreTrail::new(600);
        for i in 0..1000 {
            trail.push(i as f32);
        }
        assert_eq!(trail.len(), 600);
        assert_eq!(trail.latest(), Some(999.0));
        assert_eq!(trail.iter().next(), Some(400.0));
    }
}
