//! Live capture pipeline - keeps the hot loop in one thread
//!
//! Wires the cpal input stream, the FFT magnitude source, and the spectral
//! analyzer together; consumers poll the latest sample result.

use crate::analyzer::{AnalyzerConfig, ConfigError, SampleResult, SpectralAnalyzer};
use crate::audio::buffer::SampleRingBuffer;
use crate::audio::input::AudioInput;
use crate::spectrum::{SpectrumSource, WindowType};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Ring buffer capacity in samples (about 2 seconds at 48 kHz)
const RING_BUFFER_CAPACITY: usize = 96_000;

/// Audio-reactive analysis pipeline
///
/// Owns the analyzer and its FFT-backed magnitude source behind mutexes;
/// the processing thread is the only writer once started.
pub struct ReactivePipeline {
    /// Spectral analyzer, mutated by the processing thread
    analyzer: Arc<Mutex<SpectralAnalyzer>>,

    /// FFT-backed magnitude source fed from captured samples
    source: Arc<Mutex<SpectrumSource>>,

    /// Most recent sample result, taken by consumers
    latest: Arc<Mutex<Option<SampleResult>>>,

    /// Audio input stream
    audio_input: Option<AudioInput>,

    /// Processing thread handle
    process_thread: Option<std::thread::JoinHandle<()>>,

    /// Running flag
    running: Arc<AtomicBool>,
}

impl ReactivePipeline {
    /// Create a new pipeline
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        let source = Arc::new(Mutex::new(SpectrumSource::new(
            config.fft_size,
            config.sample_rate,
            WindowType::Hann,
        )));

        let mut analyzer = SpectralAnalyzer::new(config)?;
        analyzer.attach_source(source.clone());

        Ok(Self {
            analyzer: Arc::new(Mutex::new(analyzer)),
            source,
            latest: Arc::new(Mutex::new(None)),
            audio_input: None,
            process_thread: None,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start capture and analysis
    ///
    /// # Returns
    /// Name of the capture device
    pub fn start(&mut self) -> Result<String, String> {
        if self.is_running() {
            return Err("Pipeline already running".to_string());
        }

        let rb = SampleRingBuffer::new(RING_BUFFER_CAPACITY);
        let (producer, consumer) = rb.split();

        let input = AudioInput::from_default_device(producer)
            .map_err(|e| format!("Failed to start audio: {}", e))?;

        let device_name = input.device_info().name.clone();
        let device_rate = input.device_info().sample_rate as f64;

        // Follow the device's native sample rate; only the rate changes,
        // so revalidation cannot fail here
        if let Ok(mut analyzer) = self.analyzer.lock() {
            let mut config = analyzer.config().clone();
            config.sample_rate = device_rate;
            let _ = analyzer.update_config(config);
        }
        if let Ok(mut source) = self.source.lock() {
            let fft_size = source.fft_size();
            source.reconfigure(fft_size, device_rate);
        }

        input
            .start()
            .map_err(|e| format!("Failed to start stream: {}", e))?;
        self.audio_input = Some(input);

        self.running.store(true, Ordering::SeqCst);

        let analyzer = Arc::clone(&self.analyzer);
        let source = Arc::clone(&self.source);
        let latest = Arc::clone(&self.latest);
        let running = Arc::clone(&self.running);

        let handle = std::thread::spawn(move || {
            let mut temp_buffer = vec![0.0; 2048];
            let mut consumer = consumer;
            let mut last_tick = Instant::now();

            while running.load(Ordering::SeqCst) {
                let n = consumer.read(&mut temp_buffer);

                if n > 0 {
                    if let Ok(mut src) = source.lock() {
                        src.ingest(&temp_buffer[..n]);
                    }

                    let dt = last_tick.elapsed().as_secs_f64();
                    last_tick = Instant::now();

                    if let Ok(mut analyzer) = analyzer.lock() {
                        if let Some(result) = analyzer.advance(dt) {
                            if let Ok(mut latest) = latest.lock() {
                                *latest = Some(result);
                            }
                        }
                    }
                } else {
                    // No data available, sleep briefly to avoid busy-wait
                    std::thread::sleep(std::time::Duration::from_micros(100));
                }
            }
        });

        self.process_thread = Some(handle);

        Ok(device_name)
    }

    /// Stop capture and analysis
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.process_thread.take() {
            let _ = handle.join();
        }

        if let Some(input) = &self.audio_input {
            let _ = input.pause();
        }

        self.audio_input = None;
    }

    /// Take the most recent sample result, if a new one is available
    pub fn latest_result(&self) -> Option<SampleResult> {
        if let Ok(mut latest) = self.latest.lock() {
            latest.take()
        } else {
            None
        }
    }

    /// Apply a new configuration to the analyzer and the spectrum source
    pub fn set_config(&self, config: AnalyzerConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Ok(mut analyzer) = self.analyzer.lock() {
            analyzer.update_config(config.clone())?;
        }
        if let Ok(mut source) = self.source.lock() {
            source.reconfigure(config.fft_size, config.sample_rate);
        }

        Ok(())
    }

    /// Shared handle to the analyzer
    pub fn analyzer(&self) -> Arc<Mutex<SpectralAnalyzer>> {
        Arc::clone(&self.analyzer)
    }

    /// Whether the pipeline is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for ReactivePipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_construction() {
        let pipeline = ReactivePipeline::new(AnalyzerConfig::default()).unwrap();
        assert!(!pipeline.is_running());
        assert!(pipeline.latest_result().is_none());
    }

    #[test]
    fn test_pipeline_rejects_invalid_config() {
        let bad = AnalyzerConfig {
            fft_size: 1000,
            ..Default::default()
        };
        assert!(ReactivePipeline::new(bad).is_err());
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut pipeline = ReactivePipeline::new(AnalyzerConfig::default()).unwrap();

        pipeline.running.store(true, Ordering::SeqCst);
        assert!(pipeline.start().is_err());

        pipeline.running.store(false, Ordering::SeqCst);
    }

    #[test]
    fn test_set_config_propagates() {
        let pipeline = ReactivePipeline::new(AnalyzerConfig::default()).unwrap();

        let updated = AnalyzerConfig {
            num_bands: 32,
            fft_size: 4096,
            ..Default::default()
        };
        pipeline.set_config(updated).unwrap();

        let analyzer = pipeline.analyzer();
        let analyzer = analyzer.lock().unwrap();
        assert_eq!(analyzer.config().num_bands, 32);
        assert_eq!(analyzer.config().fft_size, 4096);
    }
}
