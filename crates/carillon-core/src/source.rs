//! Capture collaborator contract.
//!
//! The core does not acquire audio or compute spectra itself. A
//! [`FrequencySource`] wraps whatever produces frequency-domain frames
//! (a microphone behind an FFT analyzer, or a test fake) and the
//! detection loop pulls one frame from it per step.
//!
//! The trait is object-safe so sources can be swapped at runtime, the same
//! way the audio backend is abstracted in comparable pipelines.

/// A supplier of frequency-domain magnitude frames.
pub trait FrequencySource {
    /// Sample rate of the underlying signal in Hz.
    fn sample_rate(&self) -> u32;

    /// Transform size of the analyzer; frames carry `transform_size / 2`
    /// magnitudes.
    fn transform_size(&self) -> usize;

    /// Write the current frame into `frame` as magnitudes in `0..=255`,
    /// one per bin. `frame` is `transform_size / 2` long.
    fn fill_frame(&mut self, frame: &mut [u8]);

    /// Release capture resources. The detection loop calls this exactly
    /// once during teardown.
    fn close(&mut self);
}
