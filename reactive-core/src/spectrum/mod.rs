//! Magnitude-spectrum extraction with FFT

pub mod source;
pub mod window;

pub use source::{MagnitudeSource, SpectrumSource};
pub use window::{generate_window, WindowType};
