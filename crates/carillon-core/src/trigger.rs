//! Threshold crossing and retrigger policy.

/// How the trigger behaves while the score stays above threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetriggerPolicy {
    /// Fire on every frame whose score exceeds the threshold. Suppressing
    /// repeats is then the listener's responsibility (e.g. stopping
    /// detection after the first event).
    EveryFrame,
    /// Fire once per crossing; re-arms when the score drops back under the
    /// threshold (an absent score counts as below).
    OncePerCrossing,
    /// Fire at most once per `min_gap` clock units, measured between
    /// reported onsets.
    Cooldown {
        /// Minimum spacing between events, in clock units.
        min_gap: f64,
    },
}

/// A detected chime occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChimeEvent {
    /// Estimated onset: the timestamp at the start of the averaging window,
    /// compensating for the lag of the rolling mean.
    pub onset: f64,
    /// The normalized score at the moment of crossing.
    pub normalized_score: f32,
}

/// Compares normalized scores against a fixed threshold.
#[derive(Debug, Clone)]
pub struct ThresholdTrigger {
    threshold: f32,
    policy: RetriggerPolicy,
    was_above: bool,
    last_onset: Option<f64>,
}

impl ThresholdTrigger {
    /// Create a trigger firing above `threshold` under the given policy.
    pub fn new(threshold: f32, policy: RetriggerPolicy) -> Self {
        Self {
            threshold,
            policy,
            was_above: false,
            last_onset: None,
        }
    }

    /// The configured threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// The configured retrigger policy.
    pub fn policy(&self) -> RetriggerPolicy {
        self.policy
    }

    /// Check one evaluation. `normalized` is absent while the score is
    /// undefined (unfilled window upstream, zero baseline); `onset` is the
    /// lag-compensated timestamp to report on a crossing.
    pub fn check(&mut self, normalized: Option<f32>, onset: f64) -> Option<ChimeEvent> {
        let above = normalized.is_some_and(|score| score.is_finite() && score > self.threshold);

        let fire = match self.policy {
            RetriggerPolicy::EveryFrame => above,
            RetriggerPolicy::OncePerCrossing => above && !self.was_above,
            RetriggerPolicy::Cooldown { min_gap } => {
                above
                    && self
                        .last_onset
                        .is_none_or(|last| onset - last >= min_gap)
            }
        };
        self.was_above = above;

        if fire {
            self.last_onset = Some(onset);
            normalized.map(|normalized_score| ChimeEvent {
                onset,
                normalized_score,
            })
        } else {
            None
        }
    }
}
