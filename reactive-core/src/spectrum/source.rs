//! Magnitude-spectrum capability and its FFT-backed provider
//!
//! The analyzer only depends on the `MagnitudeSource` trait; hosts with
//! their own spectrum pipeline implement it directly, while
//! `SpectrumSource` provides a realfft-based implementation fed from raw
//! samples.

use super::window::{amplitude_correction_factor, generate_window, WindowType};
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Queryable magnitude spectrum
///
/// `magnitude` is called once per bin per band during a sample pass and
/// must answer from a stable snapshot for the duration of the pass.
pub trait MagnitudeSource {
    /// Average magnitude over the frequency range `[low_hz, high_hz)`
    ///
    /// Ranges outside the usable spectrum return 0.0.
    fn magnitude(&self, low_hz: f64, high_hz: f64) -> f64;
}

/// FFT-backed magnitude source
///
/// Maintains a rolling frame of the most recent `fft_size` samples and
/// recomputes an amplitude-corrected magnitude spectrum on each ingest.
pub struct SpectrumSource {
    /// FFT size (number of samples per frame)
    fft_size: usize,

    /// Sample rate in Hz
    sample_rate: f64,

    /// Window applied before the transform
    window_type: WindowType,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Window coefficients
    window: Vec<f64>,

    /// Amplitude correction for the window taper
    correction: f64,

    /// Rolling frame of the latest samples
    frame: Vec<f64>,

    /// Samples accumulated so far, saturating at fft_size
    filled: usize,

    /// Reusable windowed FFT input
    input_buffer: Vec<f64>,

    /// Reusable complex spectrum output
    spectrum_buffer: Vec<Complex<f64>>,

    /// Normalized magnitudes for fft_size/2 + 1 bins
    magnitudes: Vec<f64>,
}

impl SpectrumSource {
    /// Create a new spectrum source
    ///
    /// # Arguments
    /// * `fft_size` - Frame length in samples (power of 2)
    /// * `sample_rate` - Sample rate in Hz
    /// * `window_type` - Window applied before the transform
    pub fn new(fft_size: usize, sample_rate: f64, window_type: WindowType) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let window = generate_window(window_type, fft_size);
        let correction = amplitude_correction_factor(&window);

        Self {
            fft_size,
            sample_rate,
            window_type,
            r2c,
            window,
            correction,
            frame: vec![0.0; fft_size],
            filled: 0,
            input_buffer: vec![0.0; fft_size],
            spectrum_buffer: vec![Complex::new(0.0, 0.0); fft_size / 2 + 1],
            magnitudes: vec![0.0; fft_size / 2 + 1],
        }
    }

    /// Append samples to the rolling frame and recompute the spectrum
    ///
    /// Until a full frame has accumulated the spectrum reads as silence.
    pub fn ingest(&mut self, samples: &[f64]) {
        if samples.is_empty() {
            return;
        }

        if samples.len() >= self.fft_size {
            // Incoming block replaces the whole frame
            self.frame
                .copy_from_slice(&samples[samples.len() - self.fft_size..]);
            self.filled = self.fft_size;
        } else {
            // Shift the frame left and append at the end
            let keep = self.fft_size - samples.len();
            self.frame.copy_within(samples.len().., 0);
            self.frame[keep..].copy_from_slice(samples);
            self.filled = (self.filled + samples.len()).min(self.fft_size);
        }

        if self.filled == self.fft_size {
            self.compute_spectrum();
        }
    }

    /// Window the current frame, transform, and normalize magnitudes
    fn compute_spectrum(&mut self) {
        for i in 0..self.fft_size {
            // NaN/Inf samples would contaminate the whole spectrum
            let sample = if self.frame[i].is_finite() {
                self.frame[i]
            } else {
                0.0
            };
            self.input_buffer[i] = sample * self.window[i];
        }

        self.r2c
            .process(&mut self.input_buffer, &mut self.spectrum_buffer)
            .expect("FFT processing failed");

        // 2/N puts a full-scale sine near 1.0 at its peak bin; the window
        // correction compensates the taper
        let norm = 2.0 / self.fft_size as f64 * self.correction;
        for (mag, c) in self.magnitudes.iter_mut().zip(self.spectrum_buffer.iter()) {
            *mag = c.norm() * norm;
        }
    }

    /// Replan for a new FFT size and/or sample rate, clearing state
    pub fn reconfigure(&mut self, fft_size: usize, sample_rate: f64) {
        if fft_size != self.fft_size {
            let mut planner = RealFftPlanner::<f64>::new();
            self.r2c = planner.plan_fft_forward(fft_size);
            self.window = generate_window(self.window_type, fft_size);
            self.correction = amplitude_correction_factor(&self.window);
            self.frame = vec![0.0; fft_size];
            self.input_buffer = vec![0.0; fft_size];
            self.spectrum_buffer = vec![Complex::new(0.0, 0.0); fft_size / 2 + 1];
            self.magnitudes = vec![0.0; fft_size / 2 + 1];
            self.fft_size = fft_size;
        }

        self.sample_rate = sample_rate;
        self.reset();
    }

    /// Clear the rolling frame and spectrum
    pub fn reset(&mut self) {
        self.frame.fill(0.0);
        self.magnitudes.fill(0.0);
        self.filled = 0;
    }

    /// Current FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Current sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl MagnitudeSource for SpectrumSource {
    fn magnitude(&self, low_hz: f64, high_hz: f64) -> f64 {
        let nyquist = self.sample_rate / 2.0;
        let usable_bins = self.fft_size / 2;

        let low = low_hz.max(0.0);
        let high = high_hz.min(nyquist);
        if high <= low {
            return 0.0;
        }

        // Include exactly the bins whose sub-range intersects [low, high):
        // a bin starting at high_hz belongs to the next range over
        let hz_per_bin = nyquist / usable_bins as f64;
        let min_bin = (low / hz_per_bin).floor() as usize;
        let max_bin = ((high / hz_per_bin).ceil() as usize)
            .saturating_sub(1)
            .min(usable_bins - 1);
        if min_bin > max_bin {
            return 0.0;
        }

        let sum: f64 = self.magnitudes[min_bin..=max_bin].iter().sum();
        sum / (max_bin - min_bin + 1) as f64
    }
}
