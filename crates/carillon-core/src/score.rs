//! Rolling score evaluation over the energy history.

use crate::history::EnergyHistory;

/// One evaluation of the rolling window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Mean chime energy over the window.
    pub chime: f32,
    /// Mean non-chime energy over the window.
    pub baseline: f32,
    /// `chime / baseline`, or `None` when the baseline is zero or the
    /// ratio is non-finite. An absent score never triggers.
    pub normalized: Option<f32>,
}

/// Rolling-mean evaluator over the last `window_len` history entries.
///
/// Evaluation is skipped (returns `None`) until the history holds a full
/// window. Besides avoiding a warm-up baseline of near-zero, this
/// guarantees the onset lookup `window_len - 1` entries back is always
/// valid when a score exists.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWindow {
    window_len: usize,
}

impl ScoreWindow {
    /// Create an evaluator averaging over `window_len` samples.
    pub fn new(window_len: usize) -> Self {
        Self { window_len }
    }

    /// Number of samples averaged per evaluation.
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Evaluate the window, or `None` while the history is still filling.
    pub fn evaluate(&self, history: &EnergyHistory) -> Option<Score> {
        if history.len() < self.window_len {
            return None;
        }

        let mut chime_sum = 0.0f32;
        let mut baseline_sum = 0.0f32;
        for sample in history.last_n(self.window_len) {
            chime_sum += sample.chime_avg;
            baseline_sum += sample.no_chime_avg;
        }

        let chime = chime_sum / self.window_len as f32;
        let baseline = baseline_sum / self.window_len as f32;

        // A zero baseline would divide to inf/NaN; report the score as
        // absent instead of relying on non-finite comparison semantics.
        let normalized = if baseline > 0.0 {
            let ratio = chime / baseline;
            ratio.is_finite().then_some(ratio)
        } else {
            None
        };

        Some(Score {
            chime,
            baseline,
            normalized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::EnergySample;

    fn filled_history(entries: &[(f32, f32)]) -> EnergyHistory {
        let mut history = EnergyHistory::new(20);
        for (i, &(chime_avg, no_chime_avg)) in entries.iter().enumerate() {
            history.push(EnergySample {
                time: i as f64,
                chime_avg,
                no_chime_avg,
            });
        }
        history
    }

    #[test]
    fn skips_until_window_is_full() {
        let window = ScoreWindow::new(10);
        let history = filled_history(&[(200.0, 10.0); 9]);
        assert!(window.evaluate(&history).is_none());
    }

    #[test]
    fn evaluates_once_window_is_full() {
        let window = ScoreWindow::new(10);
        let history = filled_history(&[(200.0, 10.0); 10]);
        let score = window.evaluate(&history).unwrap();
        assert_eq!(score.chime, 200.0);
        assert_eq!(score.baseline, 10.0);
        assert_eq!(score.normalized, Some(20.0));
    }

    #[test]
    fn averages_only_the_window_tail() {
        let window = ScoreWindow::new(2);
        // Older entries must not contribute.
        let history = filled_history(&[(1000.0, 1000.0), (4.0, 2.0), (8.0, 2.0)]);
        let score = window.evaluate(&history).unwrap();
        assert_eq!(score.chime, 6.0);
        assert_eq!(score.baseline, 2.0);
        assert_eq!(score.normalized, Some(3.0));
    }

    #[test]
    fn zero_baseline_yields_no_normalized_score() {
        let window = ScoreWindow::new(10);
        let history = filled_history(&[(200.0, 0.0); 10]);
        let score = window.evaluate(&history).unwrap();
        assert_eq!(score.baseline, 0.0);
        assert_eq!(score.normalized, None);
    }

    #[test]
    fn silence_yields_no_normalized_score() {
        let window = ScoreWindow::new(10);
        let history = filled_history(&[(0.0, 0.0); 10]);
        let score = window.evaluate(&history).unwrap();
        assert_eq!(score.normalized, None);
    }
}
