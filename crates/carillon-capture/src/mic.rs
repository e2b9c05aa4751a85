//! Live microphone capture via cpal.
//!
//! The cpal input callback only moves raw samples into a channel; all
//! analysis happens on the detection thread when the loop pulls a frame.
//! Dropping the stream stops capture, so teardown is the detection loop
//! closing the source once.

use std::sync::mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host};

use carillon_core::FrequencySource;

use crate::analyzer::{AnalyzerParams, SpectrumAnalyzer};
use crate::{Error, Result};

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio input device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

/// Configuration for opening a microphone source.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Input device name or index (uses system default if `None`).
    pub device: Option<String>,
    /// FFT transform size; frames carry `transform_size / 2` magnitudes.
    pub transform_size: usize,
    /// Analyzer tuning.
    pub analyzer: AnalyzerParams,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: None,
            transform_size: 2048,
            analyzer: AnalyzerParams::default(),
        }
    }
}

/// List all available audio input devices.
pub fn list_input_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    let inputs = host
        .input_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;
    for device in inputs {
        if let Ok(name) = device_name(&device) {
            let default_sample_rate = device
                .default_input_config()
                .map(|c| c.sample_rate())
                .unwrap_or(48000);
            devices.push(AudioDevice {
                name,
                default_sample_rate,
            });
        }
    }

    Ok(devices)
}

/// Get the default input device info, if any.
pub fn default_input_device() -> Result<Option<AudioDevice>> {
    let host = cpal::default_host();
    Ok(host.default_input_device().and_then(|d| {
        device_name(&d).ok().map(|name| AudioDevice {
            name,
            default_sample_rate: d
                .default_input_config()
                .map(|c| c.sample_rate())
                .unwrap_or(48000),
        })
    }))
}

/// Find an input device by index, exact name, or case-insensitive partial
/// name; `None` selects the system default.
fn find_input_device(host: &Host, selector: Option<&str>) -> Result<Device> {
    let Some(selector) = selector else {
        return host.default_input_device().ok_or(Error::NoDevice);
    };

    let devices: Vec<Device> = host
        .input_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
        .collect();

    if let Ok(index) = selector.parse::<usize>() {
        return devices.get(index).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "index {} (only {} input devices available)",
                index,
                devices.len()
            ))
        });
    }

    for device in &devices {
        if device_name(device).is_ok_and(|n| n == selector) {
            return Ok(device.clone());
        }
    }

    let search_lower = selector.to_lowercase();
    for device in &devices {
        if let Ok(name) = device_name(device)
            && name.to_lowercase().contains(&search_lower)
        {
            return Ok(device.clone());
        }
    }

    Err(Error::DeviceNotFound(selector.to_string()))
}

/// Microphone-backed frequency source.
///
/// Owns the cpal input stream (RAII: dropping it stops capture) and the
/// spectral analyzer. Implements [`FrequencySource`] for the detection
/// loop.
pub struct MicSource {
    analyzer: SpectrumAnalyzer,
    sample_rate: u32,
    channels: usize,
    rx: mpsc::Receiver<Vec<f32>>,
    stream: Option<cpal::Stream>,
}

impl MicSource {
    /// Open the configured input device and start capturing.
    ///
    /// Fails synchronously when no device is available or the stream
    /// cannot be built; no detection loop should be started in that case.
    pub fn open(config: &CaptureConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = find_input_device(&host, config.device.as_deref())?;

        let input_config = device
            .default_input_config()
            .map_err(|e| Error::Stream(e.to_string()))?;
        let sample_rate = input_config.sample_rate();
        let channels = input_config.channels() as usize;

        let analyzer = SpectrumAnalyzer::with_params(config.transform_size, config.analyzer)?;

        let (tx, rx) = mpsc::sync_channel::<Vec<f32>>(8);
        let stream = device
            .build_input_stream(
                &input_config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Drop the chunk if the detector is behind; the analyzer
                    // only ever wants the newest samples anyway.
                    let _ = tx.try_send(data.to_vec());
                },
                |err| tracing::error!(error = %err, "input stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;
        stream.play().map_err(|e| Error::Stream(e.to_string()))?;

        let name = device_name(&device).unwrap_or_else(|_| "unknown".into());
        tracing::info!(
            device = %name,
            sample_rate,
            channels,
            transform_size = config.transform_size,
            "capture started"
        );

        Ok(Self {
            analyzer,
            sample_rate,
            channels,
            rx,
            stream: Some(stream),
        })
    }

    /// Drain pending capture chunks into the analyzer, mixing to mono.
    fn drain_pending(&mut self) {
        while let Ok(chunk) = self.rx.try_recv() {
            if self.channels <= 1 {
                self.analyzer.push_samples(&chunk);
            } else {
                let mono: Vec<f32> = chunk
                    .chunks(self.channels)
                    .map(|frame| frame.iter().sum::<f32>() / self.channels as f32)
                    .collect();
                self.analyzer.push_samples(&mono);
            }
        }
    }
}

impl FrequencySource for MicSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn transform_size(&self) -> usize {
        self.analyzer.transform_size()
    }

    fn fill_frame(&mut self, frame: &mut [u8]) {
        self.drain_pending();
        self.analyzer.write_magnitudes(frame);
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::info!("capture stream closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_devices_does_not_panic() {
        // Device availability depends on the system; only check the call
        // itself succeeds.
        let result = list_input_devices();
        assert!(result.is_ok());
    }

    #[test]
    fn default_capture_config_matches_analyzer_contract() {
        let config = CaptureConfig::default();
        assert_eq!(config.transform_size, 2048);
        assert!(config.device.is_none());
    }
}
