//! Audio input capture using cpal
//!
//! Captures from a microphone or line-in and feeds the sample ring buffer

use super::buffer::SampleProducer;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio input device found")]
    NoDevice,

    #[error("Failed to get device name: {0}")]
    DeviceName(String),

    #[error("Failed to get default config: {0}")]
    DefaultConfig(String),

    #[error("Failed to build stream: {0}")]
    BuildStream(String),

    #[error("Failed to play stream: {0}")]
    PlayStream(String),
}

/// Audio input device information
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Audio input stream
pub struct AudioInput {
    stream: Stream,
    device_info: AudioDeviceInfo,
}

impl AudioInput {
    /// Create audio input from the default device
    ///
    /// # Arguments
    /// * `producer` - Ring buffer producer for captured audio
    pub fn from_default_device(producer: SampleProducer) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(AudioError::NoDevice)?;

        Self::from_device(device, producer)
    }

    /// Create audio input from a specific device
    ///
    /// The device's native sample rate is accepted as-is; the analyzer is
    /// reconfigured to match it downstream.
    pub fn from_device(device: Device, producer: SampleProducer) -> Result<Self, AudioError> {
        let name = device
            .name()
            .map_err(|e| AudioError::DeviceName(e.to_string()))?;

        let config = device
            .default_input_config()
            .map_err(|e| AudioError::DefaultConfig(e.to_string()))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        let device_info = AudioDeviceInfo {
            name,
            sample_rate,
            channels,
        };

        let stream_config: StreamConfig = config.into();

        let producer = Arc::new(Mutex::new(producer));
        let producer_clone = Arc::clone(&producer);

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Downmix interleaved channels to mono f64
                    let samples: Vec<f64> = if channels > 1 {
                        data.chunks(channels as usize)
                            .map(|frame| {
                                frame.iter().map(|&s| s as f64).sum::<f64>()
                                    / frame.len() as f64
                            })
                            .collect()
                    } else {
                        data.iter().map(|&s| s as f64).collect()
                    };

                    if let Ok(mut prod) = producer_clone.lock() {
                        prod.write(&samples);
                    }
                },
                move |err| {
                    eprintln!("Audio input error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::BuildStream(e.to_string()))?;

        Ok(Self {
            stream,
            device_info,
        })
    }

    /// Start capturing audio
    pub fn start(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Pause audio capture
    pub fn pause(&self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Get device information
    pub fn device_info(&self) -> &AudioDeviceInfo {
        &self.device_info
    }
}

/// List available audio input devices
pub fn list_input_devices() -> Result<Vec<AudioDeviceInfo>, AudioError> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    let device_iter = host
        .input_devices()
        .map_err(|e| AudioError::DeviceName(e.to_string()))?;

    for device in device_iter {
        if let Ok(name) = device.name() {
            if let Ok(config) = device.default_input_config() {
                devices.push(AudioDeviceInfo {
                    name,
                    sample_rate: config.sample_rate().0,
                    channels: config.channels(),
                });
            }
        }
    }

    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_devices() {
        // Just ensure it doesn't crash on hosts without input devices
        let _ = list_input_devices();
    }
}
