//! Analyzer configuration with fail-fast validation
//!
//! Invalid settings are rejected at the boundary with a typed error so
//! misconfiguration never reaches the sampling loop.

use super::bands::MAX_BANDS;
use thiserror::Error;

/// Supported FFT resolutions
pub const SUPPORTED_FFT_SIZES: [usize; 6] = [256, 512, 1024, 2048, 4096, 8192];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("band count {0} outside supported range 1..=64")]
    BandCount(usize),

    #[error("unsupported FFT size {0} (expected one of 256, 512, 1024, 2048, 4096, 8192)")]
    FftSize(usize),

    #[error("sample rate must be positive, got {0}")]
    SampleRate(f64),

    #[error("update frequency must be positive, got {0}")]
    UpdateFrequency(f64),

    #[error("smoothing factor {0} outside exclusive range (0, 1)")]
    Smoothing(f64),

    #[error("scale range inverted: min {min} > max {max}")]
    ScaleRange { min: f64, max: f64 },

    #[error("shake cooldown must be non-negative, got {0}")]
    ShakeCooldown(f64),
}

/// Spectral analyzer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Number of frequency bands (1..=64)
    pub num_bands: usize,

    /// FFT resolution, one of [`SUPPORTED_FFT_SIZES`]
    pub fft_size: usize,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Sample passes per second; decouples analysis rate from the
    /// caller's tick rate
    pub update_frequency: f64,

    /// Input gain applied to raw band intensities
    pub sensitivity: f64,

    /// Exponential smoothing weight in (0, 1); closer to 1 tracks the
    /// raw signal faster, closer to 0 smooths more
    pub smoothing: f64,

    /// Lower edge of the output scale range
    pub min_scale: f64,

    /// Upper edge of the output scale range
    pub max_scale: f64,

    /// Secondary gain applied after sensitivity
    pub intensity_multiplier: f64,

    /// Overall-intensity delta above which a beat fires
    pub beat_threshold: f64,

    /// Overall-intensity delta above which a shake fires (stricter than beat)
    pub shake_threshold: f64,

    /// Minimum time between shake events in seconds
    pub shake_cooldown: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            num_bands: 16,
            fft_size: 2048,
            sample_rate: 44100.0,
            update_frequency: 120.0,
            sensitivity: 1.0,
            smoothing: 0.25,
            min_scale: 1.0,
            max_scale: 3.0,
            intensity_multiplier: 1.0,
            beat_threshold: 0.1,
            shake_threshold: 0.3,
            shake_cooldown: 0.5,
        }
    }
}

impl AnalyzerConfig {
    /// Validate all fields
    ///
    /// # Returns
    /// `Ok(())` if the configuration is usable, otherwise the first
    /// violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_bands < 1 || self.num_bands > MAX_BANDS {
            return Err(ConfigError::BandCount(self.num_bands));
        }

        if !SUPPORTED_FFT_SIZES.contains(&self.fft_size) {
            return Err(ConfigError::FftSize(self.fft_size));
        }

        if !(self.sample_rate > 0.0) {
            return Err(ConfigError::SampleRate(self.sample_rate));
        }

        if !(self.update_frequency > 0.0) {
            return Err(ConfigError::UpdateFrequency(self.update_frequency));
        }

        if !(self.smoothing > 0.0 && self.smoothing < 1.0) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }

        if self.min_scale > self.max_scale {
            return Err(ConfigError::ScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }

        if self.shake_cooldown < 0.0 {
            return Err(ConfigError::ShakeCooldown(self.shake_cooldown));
        }

        Ok(())
    }
}
