//! Audio Reactive Core - Spectral Event Detection Engine
//!
//! Real-time frequency-band analysis with beat and shake detection for
//! audio-reactive visuals.

pub mod analyzer;
pub mod audio;
pub mod spectrum;

pub use analyzer::{AnalyzerConfig, ConfigError, SampleResult, SpectralAnalyzer};
pub use audio::ReactivePipeline;
pub use spectrum::{MagnitudeSource, SpectrumSource};
