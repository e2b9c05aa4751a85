//! Frequency-to-bin mapping.
//!
//! A spectral frame divides the spectrum into bins of width
//! `sample_rate / transform_size` Hz. Target chime frequencies are resolved
//! to bin indices once at startup; a target that lands outside the valid
//! range (DC to Nyquist) is dropped with a warning rather than failing
//! detection outright.

use thiserror::Error;

/// A target frequency that resolves outside the analyzer's bin range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{target_hz} Hz maps outside the {bin_count} available bins")]
pub struct OutOfRange {
    /// The frequency that could not be mapped.
    pub target_hz: f32,
    /// Number of valid bins (`transform_size / 2`).
    pub bin_count: usize,
}

/// Width in Hz of one spectral bin.
pub fn bin_resolution(sample_rate: u32, transform_size: usize) -> f32 {
    sample_rate as f32 / transform_size as f32
}

/// Map a target frequency to the nearest spectral bin index.
///
/// The index is `round(target_hz / resolution)` and is valid iff it falls
/// in `0..transform_size / 2`. Pure; called once per configured target at
/// startup.
pub fn frequency_to_bin(
    target_hz: f32,
    sample_rate: u32,
    transform_size: usize,
) -> Result<usize, OutOfRange> {
    let bin_count = transform_size / 2;
    let index = (target_hz / bin_resolution(sample_rate, transform_size)).round();

    if index >= 0.0 && (index as usize) < bin_count {
        Ok(index as usize)
    } else {
        Err(OutOfRange {
            target_hz,
            bin_count,
        })
    }
}

/// The set of bin indices nearest the configured chime frequencies.
///
/// Built once from the target list via [`frequency_to_bin`]. Targets that
/// resolve out of range are logged and excluded; detection continues with
/// reduced coverage.
#[derive(Debug, Clone)]
pub struct ChimeBins {
    bins: Vec<usize>,
}

impl ChimeBins {
    /// Resolve a list of target frequencies against the analyzer geometry.
    pub fn resolve(targets: &[f32], sample_rate: u32, transform_size: usize) -> Self {
        let mut bins: Vec<usize> = Vec::with_capacity(targets.len());

        for &target_hz in targets {
            match frequency_to_bin(target_hz, sample_rate, transform_size) {
                Ok(bin) => bins.push(bin),
                Err(err) => {
                    tracing::warn!(
                        target_hz = f64::from(target_hz),
                        bin_count = err.bin_count,
                        "dropping target frequency"
                    );
                }
            }
        }

        bins.sort_unstable();
        bins.dedup();

        if bins.is_empty() {
            tracing::warn!("no target frequency maps into the bin range; detector will never fire");
        }

        Self { bins }
    }

    /// Whether `bin` belongs to the chime set.
    #[inline]
    pub fn contains(&self, bin: usize) -> bool {
        self.bins.binary_search(&bin).is_ok()
    }

    /// The resolved bin indices, sorted ascending.
    pub fn as_slice(&self) -> &[usize] {
        &self.bins
    }

    /// Number of resolved bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True when every target was dropped.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
