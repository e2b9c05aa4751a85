//! Audio input device listing command.

use clap::Args;

use carillon_capture::{default_input_device, list_input_devices};

#[derive(Args)]
pub struct DevicesArgs {}

pub fn run(_args: DevicesArgs) -> anyhow::Result<()> {
    let devices = list_input_devices()?;

    if devices.is_empty() {
        println!("No audio input devices found.");
        return Ok(());
    }

    let default = default_input_device()?;

    println!("Available Input Devices");
    println!("=======================\n");
    for (idx, device) in devices.iter().enumerate() {
        let marker = if default.as_ref().is_some_and(|d| d.name == device.name) {
            " (default)"
        } else {
            ""
        };
        println!(
            "  [{}] {} ({} Hz){}",
            idx, device.name, device.default_sample_rate, marker
        );
    }

    println!();
    println!("Tip: Use device index or partial name with listen --device:");
    println!("  carillon listen --device 0");
    println!("  carillon listen --device \"USB\"");

    Ok(())
}
