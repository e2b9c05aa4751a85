//! Integration tests for the detection pipeline.
//!
//! Drives the composed pipeline with synthetic frequency frames and checks
//! the end-to-end contract: warm-up behavior, threshold crossing with
//! lag-compensated onsets, silence handling, and retrigger policies.

use carillon_core::{ChimeDetector, ChimeEvent, DetectorConfig, RetriggerPolicy};

const SAMPLE_RATE: u32 = 44100;
const TRANSFORM_SIZE: usize = 2048;
const BIN_COUNT: usize = TRANSFORM_SIZE / 2;

/// A frame with `chime` magnitude in the resolved chime bins and `rest`
/// everywhere else.
fn synthetic_frame(detector: &ChimeDetector, chime: u8, rest: u8) -> Vec<u8> {
    let mut frame = vec![rest; BIN_COUNT];
    for &bin in detector.chime_bins().as_slice() {
        frame[bin] = chime;
    }
    frame
}

/// Feed `frames` in order, collecting fired events.
fn drive(detector: &mut ChimeDetector, frames: &[(Vec<u8>, f64)]) -> Vec<ChimeEvent> {
    frames
        .iter()
        .filter_map(|(frame, time)| detector.process_frame(frame, *time))
        .collect()
}

// ============================================================================
// Threshold crossing
// ============================================================================

#[test]
fn ten_loud_frames_fire_with_window_start_onset() {
    let mut detector = ChimeDetector::new(&DetectorConfig::default(), SAMPLE_RATE, TRANSFORM_SIZE)
        .unwrap();
    let loud = synthetic_frame(&detector, 200, 10);

    // 200 / 10 = normalized score 20, well above the threshold of 2.
    let frames: Vec<_> = (0..10).map(|i| (loud.clone(), i as f64 * 0.016)).collect();
    let events = drive(&mut detector, &frames);

    assert_eq!(events.len(), 1, "exactly one event on the tenth frame");
    assert_eq!(events[0].normalized_score, 20.0);
    // The onset reports the start of the averaging window: the timestamp
    // of the entry ten positions before the newest.
    assert_eq!(events[0].onset, 0.0);
}

#[test]
fn onset_tracks_window_start_as_history_slides() {
    let mut detector = ChimeDetector::new(&DetectorConfig::default(), SAMPLE_RATE, TRANSFORM_SIZE)
        .unwrap();
    let quiet = synthetic_frame(&detector, 10, 10);
    let loud = synthetic_frame(&detector, 200, 10);

    // 5 quiet warm-up frames, then sustained chime.
    let mut frames: Vec<_> = (0..5).map(|i| (quiet.clone(), i as f64)).collect();
    frames.extend((5..40).map(|i| (loud.clone(), i as f64)));

    let events = drive(&mut detector, &frames);
    assert!(!events.is_empty());

    // Every onset lies 9 frames behind the frame that fired it.
    let first = &events[0];
    assert!(first.onset >= 0.0);
    for window in events.windows(2) {
        assert!(window[1].onset > window[0].onset, "onsets advance with the window");
    }
}

#[test]
fn quiet_chime_below_threshold_never_fires() {
    let mut detector = ChimeDetector::new(&DetectorConfig::default(), SAMPLE_RATE, TRANSFORM_SIZE)
        .unwrap();
    // Ratio 100/60 ≈ 1.67 < 2.
    let frame = synthetic_frame(&detector, 100, 60);
    let frames: Vec<_> = (0..50).map(|i| (frame.clone(), i as f64)).collect();
    assert!(drive(&mut detector, &frames).is_empty());
}

// ============================================================================
// Silence and degenerate input
// ============================================================================

#[test]
fn silent_input_never_fires() {
    let mut detector = ChimeDetector::new(&DetectorConfig::default(), SAMPLE_RATE, TRANSFORM_SIZE)
        .unwrap();
    let silence = vec![0u8; BIN_COUNT];
    let frames: Vec<_> = (0..200).map(|i| (silence.clone(), i as f64)).collect();

    // Baseline 0 resolves to "no trigger", not a panic or spurious event.
    assert!(drive(&mut detector, &frames).is_empty());
}

#[test]
fn chime_over_dead_quiet_background_never_fires() {
    // Energy only in the chime bins: the baseline stays 0, so the
    // normalized score is undefined and must not trigger.
    let mut detector = ChimeDetector::new(&DetectorConfig::default(), SAMPLE_RATE, TRANSFORM_SIZE)
        .unwrap();
    let frame = synthetic_frame(&detector, 255, 0);
    let frames: Vec<_> = (0..50).map(|i| (frame.clone(), i as f64)).collect();
    assert!(drive(&mut detector, &frames).is_empty());
}

#[test]
fn all_targets_dropped_never_fires() {
    let config = DetectorConfig {
        target_frequencies: vec![40_000.0, 50_000.0],
        ..DetectorConfig::default()
    };
    let mut detector = ChimeDetector::new(&config, SAMPLE_RATE, TRANSFORM_SIZE).unwrap();
    assert!(detector.chime_bins().is_empty());

    let frame = vec![255u8; BIN_COUNT];
    let frames: Vec<_> = (0..50).map(|i| (frame.clone(), i as f64)).collect();
    assert!(drive(&mut detector, &frames).is_empty());
}

// ============================================================================
// Retrigger policies
// ============================================================================

#[test]
fn every_frame_policy_fires_per_frame_above_threshold() {
    let mut detector = ChimeDetector::new(&DetectorConfig::default(), SAMPLE_RATE, TRANSFORM_SIZE)
        .unwrap();
    let loud = synthetic_frame(&detector, 200, 10);
    let frames: Vec<_> = (0..20).map(|i| (loud.clone(), i as f64)).collect();

    // Frames 10..=20 all evaluate above threshold.
    assert_eq!(drive(&mut detector, &frames).len(), 11);
}

#[test]
fn cooldown_policy_spaces_events() {
    let config = DetectorConfig {
        retrigger: RetriggerPolicy::Cooldown { min_gap: 5.0 },
        ..DetectorConfig::default()
    };
    let mut detector = ChimeDetector::new(&config, SAMPLE_RATE, TRANSFORM_SIZE).unwrap();
    let loud = synthetic_frame(&detector, 200, 10);

    // One frame per clock unit, 30 units of sustained chime.
    let frames: Vec<_> = (0..30).map(|i| (loud.clone(), i as f64)).collect();
    let events = drive(&mut detector, &frames);

    assert!(events.len() > 1);
    for window in events.windows(2) {
        assert!(window[1].onset - window[0].onset >= 5.0);
    }
}

// ============================================================================
// History invariants through the pipeline
// ============================================================================

#[test]
fn history_capacity_holds_through_long_runs() {
    let mut detector = ChimeDetector::new(&DetectorConfig::default(), SAMPLE_RATE, TRANSFORM_SIZE)
        .unwrap();
    let frame = synthetic_frame(&detector, 50, 20);

    for i in 0..1000 {
        detector.process_frame(&frame, i as f64);
        assert!(detector.history().len() <= 20);
    }
    assert_eq!(detector.history().len(), 20);
}

#[test]
fn score_trail_is_bounded_by_config() {
    let config = DetectorConfig {
        score_trail_len: 600,
        ..DetectorConfig::default()
    };
    let mut detector = ChimeDetector::new(&config, SAMPLE_RATE, TRANSFORM_SIZE).unwrap();
    let frame = synthetic_frame(&detector, 50, 20);

    for i in 0..2000 {
        detector.process_frame(&frame, i as f64);
    }
    assert_eq!(detector.score_trail().len(), 600);
}
