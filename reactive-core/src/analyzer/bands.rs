//! Logarithmically spaced frequency bands
//!
//! Divides the audible range into contiguous sub-ranges analyzed independently

/// Lower edge of the analyzed range in Hz
pub const MIN_FREQ_HZ: f64 = 20.0;

/// Upper edge of the analyzed range in Hz
pub const MAX_FREQ_HZ: f64 = 20_000.0;

/// Maximum supported number of bands
pub const MAX_BANDS: usize = 64;

/// A single frequency band `[low_hz, high_hz)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRange {
    pub low_hz: f64,
    pub high_hz: f64,
}

impl BandRange {
    /// Map this band to an inclusive FFT bin range
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `fft_size` - FFT size (usable bins = fft_size / 2)
    ///
    /// # Returns
    /// `(min_bin, max_bin)` inclusive, or `None` if the band lies entirely
    /// above the usable spectrum (degenerate at low sample rates)
    pub fn bin_range(&self, sample_rate: f64, fft_size: usize) -> Option<(usize, usize)> {
        let usable_bins = fft_size / 2;
        if usable_bins == 0 {
            return None;
        }

        let hz_per_bin = (sample_rate / 2.0) / usable_bins as f64;
        let min_bin = (self.low_hz / hz_per_bin).floor() as usize;
        let max_bin = (self.high_hz / hz_per_bin).floor() as usize;

        if min_bin >= usable_bins {
            return None;
        }

        Some((min_bin, max_bin.min(usable_bins - 1)))
    }
}

/// Ordered set of contiguous frequency bands covering 20 Hz - 20 kHz
#[derive(Debug, Clone)]
pub struct BandConfig {
    bands: Vec<BandRange>,
}

impl BandConfig {
    /// Generate `num_bands` logarithmically spaced bands
    ///
    /// Band edges follow `exp(log_min + i * step)` where
    /// `step = (ln(max) - ln(min)) / num_bands`, so each band covers the
    /// same ratio of frequencies (matching pitch perception).
    ///
    /// Assumes `num_bands` was validated to `1..=MAX_BANDS` at the
    /// configuration boundary.
    pub fn generate(num_bands: usize) -> Self {
        let log_min = MIN_FREQ_HZ.ln();
        let log_max = MAX_FREQ_HZ.ln();
        let step = (log_max - log_min) / num_bands as f64;

        let bands = (0..num_bands)
            .map(|i| BandRange {
                low_hz: (log_min + i as f64 * step).exp(),
                high_hz: (log_min + (i + 1) as f64 * step).exp(),
            })
            .collect();

        Self { bands }
    }

    /// Number of bands
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Whether the configuration is empty (never true for generated configs)
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Get a band by index
    pub fn get(&self, index: usize) -> Option<&BandRange> {
        self.bands.get(index)
    }

    /// Iterate over bands in increasing frequency order
    pub fn iter(&self) -> impl Iterator<Item = &BandRange> {
        self.bands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_count_and_monotonicity() {
        for n in 1..=MAX_BANDS {
            let config = BandConfig::generate(n);
            assert_eq!(config.len(), n);

            for band in config.iter() {
                assert!(band.low_hz < band.high_hz);
            }
        }
    }

    #[test]
    fn test_bands_contiguous_and_cover_range() {
        for n in [1, 2, 10, 64] {
            let config = BandConfig::generate(n);

            assert!((config.get(0).unwrap().low_hz - MIN_FREQ_HZ).abs() < 1e-6);
            assert!((config.get(n - 1).unwrap().high_hz - MAX_FREQ_HZ).abs() < 1e-6);

            // Each band starts where the previous one ends
            for i in 1..n {
                let prev = config.get(i - 1).unwrap();
                let curr = config.get(i).unwrap();
                assert!((prev.high_hz - curr.low_hz).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_single_band_covers_full_range() {
        let config = BandConfig::generate(1);
        let band = config.get(0).unwrap();

        assert!((band.low_hz - 20.0).abs() < 1e-6);
        assert!((band.high_hz - 20_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_log_spacing_equal_ratios() {
        let config = BandConfig::generate(10);

        // Logarithmic spacing means every band has the same high/low ratio
        let first_ratio = {
            let b = config.get(0).unwrap();
            b.high_hz / b.low_hz
        };
        for band in config.iter() {
            assert!((band.high_hz / band.low_hz - first_ratio).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bin_range_basic() {
        // 44100 Hz, 2048-point FFT: 1024 usable bins, ~21.5 Hz per bin
        let band = BandRange {
            low_hz: 20.0,
            high_hz: 60.0,
        };
        let (min_bin, max_bin) = band.bin_range(44100.0, 2048).unwrap();

        assert_eq!(min_bin, 0);
        assert_eq!(max_bin, 2); // floor(60 / 21.53)
    }

    #[test]
    fn test_bin_range_clamped_to_usable_bins() {
        // Band ending at 20 kHz with an 8 kHz sample rate (4 kHz Nyquist)
        let band = BandRange {
            low_hz: 100.0,
            high_hz: 20_000.0,
        };
        let (_, max_bin) = band.bin_range(8000.0, 512).unwrap();

        assert_eq!(max_bin, 255); // fft_size/2 - 1
    }

    #[test]
    fn test_bin_range_above_nyquist_is_degenerate() {
        // Entire band above the usable spectrum
        let band = BandRange {
            low_hz: 6000.0,
            high_hz: 12_000.0,
        };
        assert!(band.bin_range(8000.0, 512).is_none());
    }
}
