//! Wall-clock interval timer
//!
//! Projectiles fire on a fixed period measured in real time, so a 30 fps and
//! a 144 fps client shoot equally often.

/// Repeating timer fed with elapsed milliseconds
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: f64,
    elapsed_ms: f64,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            elapsed_ms: 0.0,
        }
    }

    /// Advance by `dt_ms` and return how many periods completed
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        if dt_ms.is_nan() || dt_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let mut fired = 0;
        while self.elapsed_ms >= self.period_ms {
            self.elapsed_ms -= self.period_ms;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_per_period_regardless_of_frame_rate() {
        let mut slow = IntervalTimer::new(1000.0);
        let mut fast = IntervalTimer::new(1000.0);

        let slow_fired: u32 = (0..30).map(|_| slow.advance(1000.0 / 30.0)).sum();
        let fast_fired: u32 = (0..144).map(|_| fast.advance(1000.0 / 144.0)).sum();

        // One second each; allow for float drift on the last frame
        assert!((0..=1).contains(&slow_fired));
        assert!((0..=1).contains(&fast_fired));

        let slow_total: u32 = (0..300).map(|_| slow.advance(1000.0 / 30.0)).sum();
        let fast_total: u32 = (0..1440).map(|_| fast.advance(1000.0 / 144.0)).sum();
        assert!((slow_fired + slow_total).abs_diff(11) <= 1);
        assert!((fast_fired + fast_total).abs_diff(11) <= 1);
    }

    #[test]
    fn test_long_frame_fires_multiple() {
        let mut timer = IntervalTimer::new(1000.0);
        assert_eq!(timer.advance(2500.0), 2);
        assert_eq!(timer.advance(499.0), 0);
        assert_eq!(timer.advance(1.0), 1);
    }

    #[test]
    fn test_ignores_bad_dt() {
        let mut timer = IntervalTimer::new(1000.0);
        assert_eq!(timer.advance(-5.0), 0);
        assert_eq!(timer.advance(f64::NAN), 0);
        assert_eq!(timer.advance(999.0), 0);
    }
}
