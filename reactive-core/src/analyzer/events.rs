//! Event payloads produced by a sample pass
//!
//! Consumers poll `SampleResult` rather than registering callbacks, keeping
//! ordering and backpressure under their control.

/// Smoothed, scaled intensity for one band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandUpdate {
    /// Band index in `0..num_bands`
    pub band: usize,

    /// Intensity mapped to `[min_scale, max_scale]`
    pub scale: f64,
}

/// Short-term rise in overall spectral energy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    /// Strength in `[min_scale, max_scale]`
    pub strength: f64,
}

/// Stronger, cooldown-limited energy event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shake {
    /// Strength in `[min_scale, max_scale]`
    pub strength: f64,
}

/// Tagged event for consumers that want a flat stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalyzerEvent {
    Band(BandUpdate),
    Beat(Beat),
    Shake(Shake),
}

/// Complete output of one sample pass
///
/// Ordering is stable: band updates in increasing band index, then at most
/// one beat, then at most one shake.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    /// Analyzer clock time of this pass in seconds
    pub timestamp: f64,

    /// One update per band, in band order
    pub bands: Vec<BandUpdate>,

    /// Beat event, if the overall-intensity delta crossed the threshold
    pub beat: Option<Beat>,

    /// Shake event, if triggered and outside the cooldown window
    pub shake: Option<Shake>,
}

impl SampleResult {
    /// Iterate all events of this pass in emission order
    pub fn events(&self) -> impl Iterator<Item = AnalyzerEvent> + '_ {
        self.bands
            .iter()
            .map(|&b| AnalyzerEvent::Band(b))
            .chain(self.beat.map(AnalyzerEvent::Beat))
            .chain(self.shake.map(AnalyzerEvent::Shake))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_iteration_order() {
        let result = SampleResult {
            timestamp: 0.0,
            bands: vec![
                BandUpdate {
                    band: 0,
                    scale: 1.0,
                },
                BandUpdate {
                    band: 1,
                    scale: 1.5,
                },
            ],
            beat: Some(Beat { strength: 2.0 }),
            shake: Some(Shake { strength: 2.5 }),
        };

        let events: Vec<AnalyzerEvent> = result.events().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], AnalyzerEvent::Band(BandUpdate { band: 0, .. })));
        assert!(matches!(events[1], AnalyzerEvent::Band(BandUpdate { band: 1, .. })));
        assert!(matches!(events[2], AnalyzerEvent::Beat(_)));
        assert!(matches!(events[3], AnalyzerEvent::Shake(_)));
    }

    #[test]
    fn test_events_skips_absent_beat_and_shake() {
        let result = SampleResult {
            timestamp: 0.0,
            bands: vec![BandUpdate {
                band: 0,
                scale: 1.0,
            }],
            beat: None,
            shake: None,
        };

        assert_eq!(result.events().count(), 1);
    }
}
