//! Spectral analysis and event detection

pub mod bands;
pub mod config;
pub mod engine;
pub mod events;

pub use bands::{BandConfig, BandRange};
pub use config::{AnalyzerConfig, ConfigError};
pub use engine::SpectralAnalyzer;
pub use events::{AnalyzerEvent, BandUpdate, Beat, SampleResult, Shake};
