//! Synthetic detection demo: drives the frame pipeline with generated
//! spectra and prints the score evolution and fired events.
//!
//! Run with: cargo run -p carillon-core --example synthetic_detection
#![allow(missing_docs)]

use carillon_core::{ChimeDetector, DetectorConfig, RetriggerPolicy};

const TRANSFORM_SIZE: usize = 2048;
const SAMPLE_RATE: u32 = 44100;

/// A frame with `chime` magnitude in the chime bins, `rest` elsewhere.
fn frame(detector: &ChimeDetector, chime: u8, rest: u8) -> Vec<u8> {
    let mut frame = vec![rest; TRANSFORM_SIZE / 2];
    for &bin in detector.chime_bins().as_slice() {
        frame[bin] = chime;
    }
    frame
}

fn main() {
    let config = DetectorConfig {
        retrigger: RetriggerPolicy::OncePerCrossing,
        ..DetectorConfig::default()
    };
    let mut detector = ChimeDetector::new(&config, SAMPLE_RATE, TRANSFORM_SIZE).unwrap();

    println!("=== Chime bins at {} Hz / {} ===\n", SAMPLE_RATE, TRANSFORM_SIZE);
    println!("{:?}\n", detector.chime_bins().as_slice());

    // 20 quiet frames, a 15-frame chime burst, then quiet again.
    let quiet = frame(&detector, 12, 12);
    let loud = frame(&detector, 200, 12);

    println!("{:>6} {:>12} {:>12} {:>12}  event", "step", "chime", "baseline", "score");
    for step in 0..50 {
        let spectrum = if (20..35).contains(&step) { &loud } else { &quiet };
        let event = detector.process_frame(spectrum, step as f64 * 0.016);

        if let Some(score) = detector.last_score() {
            println!(
                "{:>6} {:>12.2} {:>12.2} {:>12} {}",
                step,
                score.chime,
                score.baseline,
                score
                    .normalized
                    .map_or_else(|| "-".to_string(), |n| format!("{n:.2}")),
                event.map_or_else(String::new, |e| format!(" fired, onset {:.3}s", e.onset)),
            );
        }
    }
}
