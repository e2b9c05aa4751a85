//! Live detection command.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Args;

use carillon_capture::{CaptureConfig, MicSource};
use carillon_core::{DetectionHandle, DetectionLoop, DetectorConfig, RetriggerPolicy};

use crate::profile::Profile;

#[derive(Args)]
pub struct ListenArgs {
    /// Detection profile file (TOML)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Input device name, partial name, or index
    #[arg(long)]
    device: Option<String>,

    /// FFT transform size
    #[arg(long, default_value = "2048")]
    transform_size: usize,

    /// Normalized-score threshold override
    #[arg(long)]
    threshold: Option<f32>,

    /// Stop after the first detected chime
    #[arg(long)]
    once: bool,
}

pub fn run(args: ListenArgs) -> anyhow::Result<()> {
    let mut config = DetectorConfig {
        // Continuous monitoring default; profiles may override.
        retrigger: RetriggerPolicy::OncePerCrossing,
        ..DetectorConfig::default()
    };
    if let Some(path) = &args.profile {
        config = Profile::load(path)?.apply(config);
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }

    let source = MicSource::open(&CaptureConfig {
        device: args.device.clone(),
        transform_size: args.transform_size,
        ..CaptureConfig::default()
    })?;

    println!("Listening for chimes ({} target frequencies)", config.target_frequencies.len());
    println!("  Threshold: {}", config.threshold);
    println!("  Transform size: {}", args.transform_size);
    println!("\nPress Ctrl+C to stop...\n");

    // The listener needs the loop's handle for --once, but the handle only
    // exists once the loop is built; hand it over through a shared slot.
    let stop_slot: Arc<Mutex<Option<DetectionHandle>>> = Arc::new(Mutex::new(None));

    let once = args.once;
    let listener_slot = Arc::clone(&stop_slot);
    let detection = DetectionLoop::new(
        source,
        &config,
        Box::new(move |onset| {
            println!("Chime detected - began at {onset:.3}s");
            if once
                && let Ok(slot) = listener_slot.lock()
                && let Some(handle) = slot.as_ref()
            {
                handle.stop();
            }
        }),
    )?;

    let handle = detection.handle();
    if let Ok(mut slot) = stop_slot.lock() {
        *slot = Some(handle.clone());
    }

    ctrlc::set_handler(move || {
        println!("\nStopping...");
        handle.stop();
    })?;

    // Blocks until the handle is stopped; the loop releases the capture
    // stream on the way out.
    detection.run();

    println!("Done!");
    Ok(())
}
