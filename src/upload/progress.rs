//! Byte counting for part uploads

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total_size: u64,
    uploaded_size: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_size: u64) -> Self {
        ProgressTracker {
            total_size,
            uploaded_size: 0,
            start_time: Instant::now(),
        }
    }

    pub fn update(&mut self, bytes_uploaded: u64) {
        self.uploaded_size = (self.uploaded_size + bytes_uploaded).min(self.total_size);
    }

    pub fn uploaded(&self) -> u64 {
        self.uploaded_size
    }

    pub fn total(&self) -> u64 {
        self.total_size
    }

    pub fn percentage(&self) -> f64 {
        if self.total_size == 0 {
            return 100.0;
        }
        (self.uploaded_size as f64 / self.total_size as f64) * 100.0
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn bytes_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.uploaded_size as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let mut tracker = ProgressTracker::new(200);
        assert_eq!(tracker.percentage(), 0.0);
        tracker.update(50);
        assert_eq!(tracker.percentage(), 25.0);
        tracker.update(500);
        assert_eq!(tracker.uploaded(), 200);
        assert_eq!(tracker.percentage(), 100.0);
    }

    #[test]
    fn test_empty_total() {
        assert_eq!(ProgressTracker::new(0).percentage(), 100.0);
    }
}
