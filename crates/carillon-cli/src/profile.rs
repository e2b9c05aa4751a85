//! Detection profile file format.
//!
//! Profiles are TOML files overriding parts of the detector configuration,
//! shared by the listen and scan commands.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use carillon_core::{DetectorConfig, RetriggerPolicy};

/// Detection profile file format. Every field is optional; absent fields
/// keep the base configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Profile {
    /// Name of the profile, for display only.
    pub name: Option<String>,
    /// Target chime frequencies in Hz.
    pub target_frequencies: Option<Vec<f32>>,
    /// Inspected bin range as `[start, end)`.
    pub bin_range: Option<[usize; 2]>,
    /// Energy history capacity.
    pub history_len: Option<usize>,
    /// Rolling-mean window length.
    pub window_len: Option<usize>,
    /// Normalized-score threshold.
    pub threshold: Option<f32>,
    /// Retrigger behavior.
    pub retrigger: Option<RetriggerSpec>,
    /// Pause between live detection steps in milliseconds.
    pub poll_interval_ms: Option<u64>,
}

/// Retrigger policy as written in profile files.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RetriggerSpec {
    /// Fire on every frame above threshold.
    EveryFrame,
    /// Fire once per crossing.
    OncePerCrossing,
    /// Fire at most once per `min_gap` seconds.
    Cooldown {
        /// Minimum spacing between events in seconds.
        min_gap: f64,
    },
}

impl From<RetriggerSpec> for RetriggerPolicy {
    fn from(spec: RetriggerSpec) -> Self {
        match spec {
            RetriggerSpec::EveryFrame => RetriggerPolicy::EveryFrame,
            RetriggerSpec::OncePerCrossing => RetriggerPolicy::OncePerCrossing,
            RetriggerSpec::Cooldown { min_gap } => RetriggerPolicy::Cooldown { min_gap },
        }
    }
}

impl Profile {
    /// Load a profile from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading profile '{}'", path.display()))?;
        let profile: Profile = toml::from_str(&content)
            .with_context(|| format!("parsing profile '{}'", path.display()))?;

        if let Some(name) = &profile.name {
            println!("Loading profile: {name}");
        }
        Ok(profile)
    }

    /// Apply the profile's overrides on top of `base`.
    pub fn apply(self, mut base: DetectorConfig) -> DetectorConfig {
        if let Some(targets) = self.target_frequencies {
            base.target_frequencies = targets;
        }
        if let Some([start, end]) = self.bin_range {
            base.bin_range = start..end;
        }
        if let Some(history_len) = self.history_len {
            base.history_len = history_len;
        }
        if let Some(window_len) = self.window_len {
            base.window_len = window_len;
        }
        if let Some(threshold) = self.threshold {
            base.threshold = threshold;
        }
        if let Some(retrigger) = self.retrigger {
            base.retrigger = retrigger.into();
        }
        if let Some(ms) = self.poll_interval_ms {
            base.poll_interval = std::time::Duration::from_millis(ms);
        }
        base
    }
}
