use std::time::Duration;

/// Frames-per-second over one-second windows, fed with host timestamps.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    window_start: Option<Duration>,
    frame_count: u32,
    pub current_fps: f32,
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one frame at `timestamp`. Returns a new sample once a full
    /// second has accumulated.
    pub fn update(&mut self, timestamp: Duration) -> Option<f32> {
        let start = *self.window_start.get_or_insert(timestamp);
        self.frame_count += 1;

        let elapsed = timestamp.saturating_sub(start).as_secs_f32();
        if elapsed >= 1.0 {
            self.current_fps = self.frame_count as f32 / elapsed;
            self.window_start = Some(timestamp);
            self.frame_count = 0;
            return Some(self.current_fps);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_second() {
        let mut fps = FpsCounter::new();
        let mut samples = Vec::new();
        for i in 0..=120u64 {
            if let Some(s) = fps.update(Duration::from_millis(i * 1000 / 60)) {
                samples.push(s);
            }
        }
        assert_eq!(samples.len(), 2);
        assert!((samples[0] - 61.0).abs() < 0.5);
    }
}
