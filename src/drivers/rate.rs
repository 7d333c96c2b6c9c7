use std::time::{Duration, Instant};
/// Rate summary emitted roughly once per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateReport {
    /// Packets per second over the window since the previous report.
    pub current_hz: f64,
    /// Packets per second since monitoring started.
    pub average_hz: f64,
    pub total: u64,
}
/// Counts accepted packets and reports the rate once a window has elapsed.
pub struct PacketRate {
    started: Instant,
    window_start: Instant,
    window: Duration,
    window_count: u64,
    total: u64,
}
impl PacketRate {
    pub fn new(window: Duration) -> Self {
        Self::starting_at(Instant::now(), window)
    }
    pub fn starting_at(now: Instant, window: Duration) -> Self {
        Self {
            started: now,
            window_start: now,
            window,
            window_count: 0,
            total: 0,
        }
    }
    #[cfg(test)]
    pub fn total(&self) -> u64 {
        self.total
    }
    pub fn record(&mut self) -> Option<RateReport> {
        self.record_at(Instant::now())
    }
    pub fn record_at(&mut self, now: Instant) -> Option<RateReport> {
        self.window_count += 1;
        self.total += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }
        let since_start = now.saturating_duration_since(self.started).as_secs_f64();
        let report = RateReport {
            current_hz: self.window_count as f64 / elapsed.as_secs_f64(),
            average_hz: if since_start > 0.0 {
                self.total as f64 / since_start
            } else {
                0.0
            },
            total: self.total,
        };
        self.window_count = 0;
        self.window_start = now;
        Some(report)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn reports_once_per_window() {
        let t0 = Instant::now();
        let mut rate = PacketRate::starting_at(t0, Duration::from_secs(1));
        for i in 1..100u64 {
            assert!(rate.record_at(t0 + Duration::from_millis(i * 10)).is_none());
        }
        let report = rate
            .record_at(t0 + Duration::from_millis(1000))
            .expect("window elapsed");
        assert_eq!(report.total, 100);
        assert!((report.current_hz - 100.0).abs() < 1e-9);
        assert!((report.average_hz - 100.0).abs() < 1e-9);
        // next window: 50 packets over two seconds
        for i in 1..50u64 {
            assert!(rate.record_at(t0 + Duration::from_millis(1000 + i * 20)).is_none());
        }
        let report = rate.record_at(t0 + Duration::from_millis(3000)).unwrap();
        assert!((report.current_hz - 25.0).abs() < 1e-9);
        assert!((report.average_hz - 50.0).abs() < 1e-9);
        assert_eq!(rate.total(), 150);
    }
}
