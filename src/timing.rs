//! Fixed-timestep frame gate
//!
//! The display calls back at whatever rate it likes; the simulation only ticks
//! once a full frame interval has elapsed. Leftover time is carried into the
//! next frame instead of being dropped, so the tick rate does not drift.

#[derive(Debug, Clone)]
pub struct FrameGate {
    interval_ms: f64,
    last_ms: f64,
}

impl FrameGate {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: 0.0,
        }
    }

    /// Restart measuring from `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.last_ms = now_ms;
    }

    /// Returns true if a tick should run for the frame at `now_ms`.
    ///
    /// At most one tick per frame; the remainder past a whole interval is kept.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        let delta = now_ms - self.last_ms;
        if delta >= self.interval_ms {
            self.last_ms = now_ms - delta % self.interval_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waits_for_full_interval() {
        let mut gate = FrameGate::new(10.0);
        gate.start(0.0);
        assert!(!gate.ready(4.0));
        assert!(!gate.ready(9.99));
        assert!(gate.ready(10.0));
    }

    #[test]
    fn test_remainder_carries_forward() {
        let mut gate = FrameGate::new(10.0);
        gate.start(0.0);
        // 14ms elapsed: tick, 4ms carried
        assert!(gate.ready(14.0));
        // Only 6 more ms needed
        assert!(!gate.ready(19.0));
        assert!(gate.ready(20.0));
    }

    #[test]
    fn test_one_tick_per_frame_after_stall() {
        let mut gate = FrameGate::new(10.0);
        gate.start(0.0);
        assert!(gate.ready(55.0));
        // Stall collapses to a single tick, 5ms remainder kept
        assert!(!gate.ready(59.0));
        assert!(gate.ready(60.0));
    }

    #[test]
    fn test_sixty_hz_over_one_second() {
        let interval = 1000.0 / 60.0;
        let mut gate = FrameGate::new(interval);
        gate.start(0.0);
        // 120 Hz display for one second
        let ticks = (1..=120).filter(|i| gate.ready(*i as f64 * 1000.0 / 120.0)).count();
        assert!((59..=60).contains(&ticks), "ticks = {}", ticks);
    }
}
