//! Audio capture and pipeline glue with cpal

pub mod buffer;
pub mod input;
pub mod pipeline;

pub use buffer::SampleRingBuffer;
pub use input::{AudioError, AudioInput};
pub use pipeline::ReactivePipeline;
