//! Spectral analyzer with beat and shake detection
//!
//! Consumes a magnitude-spectrum capability, produces smoothed per-band
//! intensities and discrete beat/shake events at a throttled update rate.

use super::bands::BandConfig;
use super::config::{AnalyzerConfig, ConfigError};
use super::events::{BandUpdate, Beat, SampleResult, Shake};
use crate::spectrum::MagnitudeSource;
use std::sync::{Arc, Mutex};

/// Raw intensity above which a band counts toward broadband loudness
const HIGH_INTENSITY_THRESHOLD: f64 = 0.4;

/// Fraction of loud bands that qualifies as a broadband shake trigger
const BROADBAND_FRACTION: f64 = 0.5;

/// Linear interpolation between `a` and `b`
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Map `value` from `[in_min, in_max]` to `[out_min, out_max]`
///
/// Exact at both endpoints and monotone in between. Degenerate input
/// ranges map to `out_min`.
fn remap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let span = in_max - in_min;
    if span.abs() < f64::EPSILON {
        return out_min;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

/// Real-time spectral analyzer
///
/// Driven by repeated `advance(dt)` calls on one thread; all state is
/// mutated only by the owning instance. Callers that share an analyzer
/// across threads must wrap it in a mutex.
pub struct SpectralAnalyzer {
    config: AnalyzerConfig,
    bands: BandConfig,

    /// Most recent unsmoothed per-band intensity, normalized to [0, 1]
    raw_intensity: Vec<f64>,

    /// Exponentially smoothed per-band intensity, [0, 1]
    smoothed_intensity: Vec<f64>,

    /// Mean of the previous pass's raw intensities (one-frame lag,
    /// the beat-detection baseline)
    previous_overall: f64,

    /// Analyzer clock time of the last emitted shake
    last_shake_time: f64,

    /// Monotonic clock accumulated from advance() deltas
    clock: f64,

    /// Time accumulated toward the next sample pass
    accumulator: f64,

    /// Magnitude-spectrum capability; advance() is a no-op without it
    source: Option<Arc<Mutex<dyn MagnitudeSource + Send>>>,
}

impl SpectralAnalyzer {
    /// Create a new analyzer
    ///
    /// # Arguments
    /// * `config` - Validated at construction; see [`ConfigError`]
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let bands = BandConfig::generate(config.num_bands);
        let num_bands = config.num_bands;

        Ok(Self {
            config,
            bands,
            raw_intensity: vec![0.0; num_bands],
            smoothed_intensity: vec![0.0; num_bands],
            previous_overall: 0.0,
            last_shake_time: f64::NEG_INFINITY,
            clock: 0.0,
            accumulator: 0.0,
            source: None,
        })
    }

    /// Apply a new configuration
    ///
    /// Regenerates the band layout and resizes state arrays, preserving
    /// intensities at surviving indices and zero-filling new slots.
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if config.num_bands != self.config.num_bands {
            self.bands = BandConfig::generate(config.num_bands);
            self.raw_intensity.resize(config.num_bands, 0.0);
            self.smoothed_intensity.resize(config.num_bands, 0.0);
        }

        self.config = config;
        Ok(())
    }

    /// Attach the magnitude-spectrum capability
    pub fn attach_source(&mut self, source: Arc<Mutex<dyn MagnitudeSource + Send>>) {
        self.source = Some(source);
    }

    /// Detach the magnitude source; subsequent advance() calls no-op
    pub fn detach_source(&mut self) {
        self.source = None;
    }

    /// Whether a magnitude source is attached
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Advance the analyzer clock by `delta_seconds`
    ///
    /// Accumulates time against the update period (`1 / update_frequency`)
    /// and runs one sample pass when it is reached, holding the source lock
    /// for the duration of the pass so the spectrum snapshot stays stable.
    ///
    /// # Returns
    /// The pass result, or `None` if no source is attached or the update
    /// period has not elapsed yet
    pub fn advance(&mut self, delta_seconds: f64) -> Option<SampleResult> {
        let source = self.source.as_ref()?.clone();

        self.clock += delta_seconds;
        self.accumulator += delta_seconds;

        let period = 1.0 / self.config.update_frequency;
        if self.accumulator < period {
            return None;
        }

        // Only charge the due pass once the snapshot lock is actually held
        let guard = source.lock().ok()?;
        self.accumulator = 0.0;
        Some(self.sample(&*guard))
    }

    /// Run one sample pass against the given spectrum snapshot
    fn sample(&mut self, source: &dyn MagnitudeSource) -> SampleResult {
        let num_bands = self.bands.len();
        let usable_bins = self.config.fft_size / 2;
        let hz_per_bin = (self.config.sample_rate / 2.0) / usable_bins as f64;

        let mut band_updates = Vec::with_capacity(num_bands);

        for i in 0..num_bands {
            let band = match self.bands.get(i) {
                Some(b) => *b,
                None => continue,
            };

            // Average the source magnitude over every bin the band covers.
            // A band with no usable bins reads as silence.
            let intensity = match band.bin_range(self.config.sample_rate, self.config.fft_size) {
                Some((min_bin, max_bin)) => {
                    let mut sum = 0.0;
                    for bin in min_bin..=max_bin {
                        let low = bin as f64 * hz_per_bin;
                        sum += source.magnitude(low, low + hz_per_bin);
                    }
                    let avg = sum / (max_bin - min_bin + 1) as f64;

                    // Square root compresses toward perceptual loudness
                    (avg.sqrt() * self.config.sensitivity * self.config.intensity_multiplier)
                        .clamp(0.0, 1.0)
                }
                None => 0.0,
            };

            self.raw_intensity[i] = intensity;
            self.smoothed_intensity[i] =
                lerp(self.smoothed_intensity[i], intensity, self.config.smoothing);

            let scale = (self.config.min_scale
                + self.smoothed_intensity[i] * (self.config.max_scale - self.config.min_scale))
                .clamp(self.config.min_scale, self.config.max_scale);

            band_updates.push(BandUpdate { band: i, scale });
        }

        let overall: f64 = self.raw_intensity.iter().sum::<f64>() / num_bands as f64;
        let delta = overall - self.previous_overall;

        let beat = if delta > self.config.beat_threshold {
            let strength = remap(delta, 0.0, 1.0, self.config.min_scale, self.config.max_scale)
                .clamp(self.config.min_scale, self.config.max_scale);
            Some(Beat { strength })
        } else {
            None
        };

        let shake = if self.clock - self.last_shake_time >= self.config.shake_cooldown {
            self.detect_shake(delta)
        } else {
            None
        };
        if shake.is_some() {
            self.last_shake_time = self.clock;
        }

        // This pass's raw mean becomes the next pass's baseline
        self.previous_overall = overall;

        SampleResult {
            timestamp: self.clock,
            bands: band_updates,
            beat,
            shake,
        }
    }

    /// Evaluate the two shake triggers: a sharp overall-intensity jump, or
    /// sustained loudness across at least half of the bands
    fn detect_shake(&self, delta: f64) -> Option<Shake> {
        let min = self.config.min_scale;
        let max = self.config.max_scale;

        let mut strength: Option<f64> = None;

        if delta > self.config.shake_threshold {
            strength = Some(remap(delta, self.config.shake_threshold, 1.0, min, max));
        }

        let loud_bands = self
            .raw_intensity
            .iter()
            .filter(|&&v| v > HIGH_INTENSITY_THRESHOLD)
            .count();
        let loud_fraction = loud_bands as f64 / self.raw_intensity.len() as f64;

        if loud_fraction >= BROADBAND_FRACTION {
            let broadband = remap(loud_fraction, BROADBAND_FRACTION, 1.0, min, max);
            strength = Some(strength.map_or(broadband, |s| s.max(broadband)));
        }

        strength.map(|s| Shake {
            strength: s.clamp(min, max),
        })
    }

    /// Raw intensity of a band, or 0.0 for out-of-range indices
    pub fn raw_intensity(&self, band: usize) -> f64 {
        self.raw_intensity.get(band).copied().unwrap_or(0.0)
    }

    /// Smoothed intensity of a band, or 0.0 for out-of-range indices
    pub fn smoothed_intensity(&self, band: usize) -> f64 {
        self.smoothed_intensity.get(band).copied().unwrap_or(0.0)
    }

    /// Current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Current band layout
    pub fn bands(&self) -> &BandConfig {
        &self.bands
    }

    /// Reset all analysis state, keeping configuration and source
    pub fn reset(&mut self) {
        self.raw_intensity.fill(0.0);
        self.smoothed_intensity.fill(0.0);
        self.previous_overall = 0.0;
        self.last_shake_time = f64::NEG_INFINITY;
        self.clock = 0.0;
        self.accumulator = 0.0;
    }
}
