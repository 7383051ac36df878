//! Lock-free ring buffer for captured samples
//!
//! Passes audio from the capture callback to the analysis thread

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// Thread-safe sample ring buffer
pub struct SampleRingBuffer {
    producer: HeapProducer<f64>,
    consumer: HeapConsumer<f64>,
    capacity: usize,
}

impl SampleRingBuffer {
    /// Create a new ring buffer
    ///
    /// # Arguments
    /// * `capacity` - Buffer capacity in samples
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::<f64>::new(capacity);
        let (producer, consumer) = rb.split();

        Self {
            producer,
            consumer,
            capacity,
        }
    }

    /// Split into producer and consumer ends
    pub fn split(self) -> (SampleProducer, SampleConsumer) {
        (
            SampleProducer {
                producer: self.producer,
            },
            SampleConsumer {
                consumer: self.consumer,
                capacity: self.capacity,
            },
        )
    }
}

/// Producer end, written by the capture callback
pub struct SampleProducer {
    producer: HeapProducer<f64>,
}

impl SampleProducer {
    /// Write samples, returning how many fit
    pub fn write(&mut self, samples: &[f64]) -> usize {
        self.producer.push_slice(samples)
    }

    /// Number of free slots
    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }
}

/// Consumer end, drained by the analysis thread
pub struct SampleConsumer {
    consumer: HeapConsumer<f64>,
    capacity: usize,
}

impl SampleConsumer {
    /// Read samples into `buffer`, returning how many were available
    pub fn read(&mut self, buffer: &mut [f64]) -> usize {
        self.consumer.pop_slice(buffer)
    }

    /// Number of buffered samples
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// Whether the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    /// Buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let rb = SampleRingBuffer::new(1024);
        let (mut producer, mut consumer) = rb.split();

        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(producer.write(&data), 5);

        let mut output = vec![0.0; 5];
        assert_eq!(consumer.read(&mut output), 5);
        assert_eq!(output, data);
    }

    #[test]
    fn test_overflow_is_truncated() {
        let rb = SampleRingBuffer::new(10);
        let (mut producer, mut consumer) = rb.split();

        let written = producer.write(&vec![1.0; 20]);
        assert!(written <= 10);

        let mut output = vec![0.0; 20];
        assert_eq!(consumer.read(&mut output), written);
    }

    #[test]
    fn test_read_from_empty() {
        let rb = SampleRingBuffer::new(64);
        let (_producer, mut consumer) = rb.split();

        let mut output = vec![0.0; 8];
        assert_eq!(consumer.read(&mut output), 0);
        assert!(consumer.is_empty());
    }
}
