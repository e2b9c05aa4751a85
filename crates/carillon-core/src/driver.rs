//! Live detection loop.
//!
//! [`DetectionLoop`] drives the frame pipeline against a
//! [`FrequencySource`] at a fixed cadence: pull one frame, run it through
//! the detector, invoke the listener on a crossing, sleep, repeat. One step
//! always runs to completion; the cancellation flag is consulted only at
//! step boundaries, and the source is closed exactly once when the loop
//! exits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::config::{ConfigError, DetectorConfig};
use crate::detector::ChimeDetector;
use crate::source::FrequencySource;

/// Detection event callback, invoked once per event with the
/// lag-compensated onset timestamp in clock units.
pub type EventListener = Box<dyn FnMut(f64) + Send>;

/// Monotonically non-decreasing clock in caller-defined units.
pub type Clock = Box<dyn FnMut() -> f64 + Send>;

/// Cancellation handle for a running [`DetectionLoop`].
///
/// `stop` only sets a flag, so it is idempotent and safe to call from any
/// thread, any number of times. The loop itself releases the capture
/// resources after its in-flight step completes.
#[derive(Debug, Clone)]
pub struct DetectionHandle {
    cancelled: Arc<AtomicBool>,
}

impl DetectionHandle {
    /// Request the loop to stop after the current step.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Cooperative single-threaded detection driver.
///
/// All mutable detection state is owned exclusively by the loop; the only
/// thing shared with other threads is the cancellation flag.
pub struct DetectionLoop<S: FrequencySource> {
    source: S,
    detector: ChimeDetector,
    listener: EventListener,
    clock: Clock,
    frame: Vec<u8>,
    poll_interval: Duration,
    cancelled: Arc<AtomicBool>,
}

impl<S: FrequencySource> DetectionLoop<S> {
    /// Build a loop with the default clock: seconds elapsed on a monotonic
    /// [`Instant`] anchored at construction.
    ///
    /// Fails if the configuration is inconsistent; source acquisition
    /// failures surface earlier, from the source's own constructor.
    pub fn new(
        source: S,
        config: &DetectorConfig,
        listener: EventListener,
    ) -> Result<Self, ConfigError> {
        let start = Instant::now();
        Self::with_clock(
            source,
            config,
            listener,
            Box::new(move || start.elapsed().as_secs_f64()),
        )
    }

    /// Build a loop with a caller-supplied clock.
    pub fn with_clock(
        source: S,
        config: &DetectorConfig,
        listener: EventListener,
        clock: Clock,
    ) -> Result<Self, ConfigError> {
        let detector = ChimeDetector::new(config, source.sample_rate(), source.transform_size())?;
        let frame = vec![0; source.transform_size() / 2];

        Ok(Self {
            source,
            detector,
            listener,
            clock,
            frame,
            poll_interval: config.poll_interval,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// A handle for stopping the loop from another thread.
    pub fn handle(&self) -> DetectionHandle {
        DetectionHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Run until cancelled, consuming the loop.
    ///
    /// Blocks the calling thread. Each iteration completes a full step
    /// before honoring the cancellation flag; the source is closed once on
    /// the way out and the loop state is dropped with `self`.
    pub fn run(mut self) {
        tracing::info!(
            sample_rate = self.source.sample_rate(),
            transform_size = self.source.transform_size(),
            chime_bins = self.detector.chime_bins().len(),
            "detection started"
        );

        loop {
            self.step();
            if self.cancelled.load(Ordering::SeqCst) {
                break;
            }
            std::thread::sleep(self.poll_interval);
        }

        self.source.close();
        tracing::info!("detection stopped");
    }

    fn step(&mut self) {
        self.source.fill_frame(&mut self.frame);
        let now = (self.clock)();

        if let Some(event) = self.detector.process_frame(&self.frame, now) {
            tracing::debug!(
                onset = event.onset,
                score = f64::from(event.normalized_score),
                "chime detected"
            );
            (self.listener)(event.onset);
        } else if let Some(score) = self.detector.last_score() {
            tracing::trace!(
                chime = f64::from(score.chime),
                baseline = f64::from(score.baseline),
                normalized = ?score.normalized,
                "window evaluated"
            );
        }
    }
}
