//! Offline WAV scanning command.

use std::path::PathBuf;

use clap::Args;

use carillon_capture::WavScan;
use carillon_core::{ChimeDetector, DetectorConfig, RetriggerPolicy};

use crate::profile::Profile;

#[derive(Args)]
pub struct ScanArgs {
    /// WAV file to scan
    file: PathBuf,

    /// Detection profile file (TOML)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// FFT transform size
    #[arg(long, default_value = "2048")]
    transform_size: usize,

    /// Hop size in samples between analyzed frames
    #[arg(long)]
    hop: Option<usize>,

    /// Normalized-score threshold override
    #[arg(long)]
    threshold: Option<f32>,
}

pub fn run(args: ScanArgs) -> anyhow::Result<()> {
    let mut config = DetectorConfig {
        retrigger: RetriggerPolicy::OncePerCrossing,
        ..DetectorConfig::default()
    };
    if let Some(path) = &args.profile {
        config = Profile::load(path)?.apply(config);
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }

    let mut scan = WavScan::open(&args.file, args.transform_size)?;
    if let Some(hop) = args.hop {
        scan = scan.with_hop(hop);
    }

    println!(
        "Scanning {} ({:.1}s at {} Hz)",
        args.file.display(),
        scan.duration_secs(),
        scan.sample_rate()
    );

    let mut detector = ChimeDetector::new(&config, scan.sample_rate(), scan.transform_size())?;

    let mut frame = vec![0u8; scan.transform_size() / 2];
    let mut detections = 0usize;
    while let Some(time) = scan.next_frame(&mut frame) {
        if let Some(event) = detector.process_frame(&frame, time) {
            detections += 1;
            println!(
                "  [{}] chime began at {} (score {:.1})",
                detections,
                format_timestamp(event.onset),
                event.normalized_score
            );
        }
    }

    if detections == 0 {
        println!("No chimes found.");
    } else {
        println!("\n{} chime(s) found.", detections);
    }

    Ok(())
}

/// Format seconds as `mm:ss.mmm`.
fn format_timestamp(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = seconds - minutes as f64 * 60.0;
    format!("{minutes:02}:{rest:06.3}")
}
