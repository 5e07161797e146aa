use std::time::Duration;

/// Timing of the tick being processed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameState {
    /// Seconds since the first tick after mount.
    pub time: f32,
    /// Ticks processed so far, including this one.
    pub frame_count: u64,
}

/// Turns host refresh timestamps into [`FrameState`]s.
///
/// Timestamps are whatever clock the host uses; the first one seen becomes
/// time zero and earlier ones clamp to it.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    start: Option<Duration>,
    frame_count: u64,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock to `timestamp`.
    pub fn tick(&mut self, timestamp: Duration) -> FrameState {
        let start = *self.start.get_or_insert(timestamp);
        self.frame_count += 1;

        FrameState {
            time: timestamp.saturating_sub(start).as_secs_f32(),
            frame_count: self.frame_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_time_zero() {
        let mut clock = FrameClock::new();
        let f = clock.tick(Duration::from_secs(100));
        assert_eq!(f.time, 0.0);
        assert_eq!(f.frame_count, 1);

        let f = clock.tick(Duration::from_millis(100_500));
        assert!((f.time - 0.5).abs() < 1e-6);
        assert_eq!(f.frame_count, 2);
    }

    #[test]
    fn timestamp_before_start_clamps_to_zero() {
        let mut clock = FrameClock::new();
        clock.tick(Duration::from_secs(2));
        let f = clock.tick(Duration::from_secs(1));
        assert_eq!(f.time, 0.0);
        assert_eq!(f.frame_count, 2);
    }
}
