//! Frame clock
//!
//! Turns the millisecond timestamps handed to animation-frame callbacks into
//! seconds since the scene started.

/// Elapsed time source for a scene
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneClock {
    origin_ms: Option<f64>,
    elapsed: f64,
}

impl SceneClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a timestamp (milliseconds) and return seconds since the first one.
    ///
    /// Elapsed time never decreases, even if timestamps do.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let origin = *self.origin_ms.get_or_insert(now_ms);
        let elapsed = (now_ms - origin) / 1000.0;
        if elapsed.is_finite() && elapsed > self.elapsed {
            self.elapsed = elapsed;
        }
        self.elapsed
    }

    /// Seconds at the last tick
    pub fn seconds(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_time_zero() {
        let mut clock = SceneClock::new();
        assert_eq!(clock.tick(123_456.0), 0.0);
    }

    #[test]
    fn reports_seconds_since_first_tick() {
        let mut clock = SceneClock::new();
        clock.tick(1000.0);
        assert_eq!(clock.tick(3500.0), 2.5);
        assert_eq!(clock.seconds(), 2.5);
    }

    #[test]
    fn never_runs_backwards() {
        let mut clock = SceneClock::new();
        clock.tick(0.0);
        clock.tick(2000.0);
        assert_eq!(clock.tick(1500.0), 2.0);
        assert_eq!(clock.tick(f64::NAN), 2.0);
    }
}
