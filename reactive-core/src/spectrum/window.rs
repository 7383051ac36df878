//! Window functions applied before the spectral transform
//!
//! Windowing reduces spectral leakage when analyzing a rolling frame

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    /// Sidelobe attenuation: ~44 dB
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    /// Sidelobe attenuation: ~53 dB
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    /// Sidelobe attenuation: ~74 dB
    Blackman,

    /// Rectangular window (no windowing)
    Rectangular,
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    let m = length as f64;
    let mut window = Vec::with_capacity(length);

    match window_type {
        WindowType::Hann => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.5 - 0.5 * angle.cos());
            }
        }

        WindowType::Hamming => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.54 - 0.46 * angle.cos());
            }
        }

        WindowType::Blackman => {
            for n in 0..length {
                let angle1 = 2.0 * PI * n as f64 / (m - 1.0);
                let angle2 = 4.0 * PI * n as f64 / (m - 1.0);
                window.push(0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos());
            }
        }

        WindowType::Rectangular => {
            window.resize(length, 1.0);
        }
    }

    window
}

/// Amplitude correction factor for a window
///
/// Windowing reduces signal amplitude; multiplying magnitudes by this
/// factor restores peak levels.
pub fn amplitude_correction_factor(window: &[f64]) -> f64 {
    let sum: f64 = window.iter().sum();
    window.len() as f64 / sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_shapes() {
        let length = 161;

        let hann = generate_window(WindowType::Hann, length);
        let hamming = generate_window(WindowType::Hamming, length);
        let blackman = generate_window(WindowType::Blackman, length);

        assert_eq!(hann.len(), length);

        // Symmetric with unit peak at the center
        let center = length / 2;
        for w in [&hann, &hamming, &blackman] {
            assert!((w[0] - w[length - 1]).abs() < 1e-10);
            assert!((w[center] - 1.0).abs() < 1e-10);
        }

        // Hann tapers to zero, Hamming to 0.08
        assert!(hann[0].abs() < 1e-10);
        assert!(hamming[0] > 0.07 && hamming[0] < 0.09);
    }

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(WindowType::Rectangular, 100);
        assert!(window.iter().all(|&w| w == 1.0));
        assert!((amplitude_correction_factor(&window) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_correction_factor_compensates_taper() {
        let hann = generate_window(WindowType::Hann, 1024);

        // Hann loses half the amplitude on average, so correction ~2
        let factor = amplitude_correction_factor(&hann);
        assert!(factor > 1.9 && factor < 2.1);
    }
}
