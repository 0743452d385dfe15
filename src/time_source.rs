//! Time source abstraction for real and simulated time.
//!
//! The engine tick loop, the logger timestamps, and the simulate subcommand
//! all read time through the global source installed here. Real runs use the
//! system clock; `adzanr simulate` installs a [`SimulatedTimeSource`] that
//! advances at a configurable multiple of real time, letting a full day of
//! phase transitions play out in seconds.

use chrono::{DateTime, Duration as ChronoDuration, Local};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time source advancing at a constant multiple of real time.
///
/// Simulated "now" is derived purely from the real time elapsed since
/// construction, so concurrent readers and sleepers always agree on the
/// clock without shared bookkeeping.
pub struct SimulatedTimeSource {
    start_time: DateTime<Local>,
    end_time: DateTime<Local>,
    /// Time acceleration factor (e.g., 60.0 = 1 simulated minute per second)
    multiplier: f64,
    created: Instant,
}

impl SimulatedTimeSource {
    /// Create a simulated source covering `start_time..end_time` at the
    /// given acceleration. Non-positive multipliers fall back to 60x.
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>, multiplier: f64) -> Self {
        Self {
            start_time,
            end_time,
            multiplier: if multiplier > 0.0 { multiplier } else { 60.0 },
            created: Instant::now(),
        }
    }

    fn current_time(&self) -> DateTime<Local> {
        let real_elapsed = self.created.elapsed().as_secs_f64();
        let simulated_secs = real_elapsed * self.multiplier;
        let elapsed = ChronoDuration::milliseconds((simulated_secs * 1000.0) as i64);
        let simulated = self.start_time + elapsed;
        if simulated > self.end_time {
            self.end_time
        } else {
            simulated
        }
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        // Scale the simulated duration down to real time
        let real_secs = duration.as_secs_f64() / self.multiplier;
        if real_secs > 0.0 {
            std::thread::sleep(StdDuration::from_secs_f64(real_secs));
        }
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Sleep for the specified duration using the global time source
pub fn sleep(duration: StdDuration) {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .sleep(duration)
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Check if simulation has reached its end time (always false for real time)
pub fn simulation_ended() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_ended()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS"
pub fn parse_datetime(s: &str) -> anyhow::Result<DateTime<Local>> {
    use chrono::{NaiveDateTime, TimeZone};

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| anyhow::anyhow!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))?;
    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| anyhow::anyhow!("Ambiguous or invalid local time: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_time_stays_within_bounds() {
        let start = parse_datetime("2026-03-15 04:00:00").unwrap();
        let end = parse_datetime("2026-03-15 05:00:00").unwrap();
        let source = SimulatedTimeSource::new(start, end, 3600.0);

        let now = source.now();
        assert!(now >= start);
        assert!(now <= end);
    }

    #[test]
    fn test_simulated_time_advances() {
        let start = parse_datetime("2026-03-15 04:00:00").unwrap();
        let end = parse_datetime("2026-03-16 04:00:00").unwrap();
        // 1 real millisecond = 1 simulated second
        let source = SimulatedTimeSource::new(start, end, 1000.0);

        let first = source.now();
        source.sleep(StdDuration::from_secs(5));
        let second = source.now();
        assert!(second > first);
        assert!(!source.is_ended());
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("not a time").is_err());
        assert!(parse_datetime("2026-03-15").is_err());
        assert!(parse_datetime("2026-03-15 04:00:00").is_ok());
    }
}
