//! Source of the real current time for pass-through reference time.

use chrono::{DateTime, Utc};

/// Clock trait for the oracle's notion of "now".
pub trait Clock: Send + Sync {
    /// Get the current UTC time.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current time as whole milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64 {
        self.now_utc().timestamp_millis()
    }
}

/// System clock using actual wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock clock for deterministic testing of pass-through reference time.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug)]
pub struct MockClock {
    now_ms: std::sync::atomic::AtomicI64,
}

#[cfg(any(test, feature = "test-seams"))]
impl MockClock {
    /// Create a mock clock frozen at the given time.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::from_millis(now.timestamp_millis())
    }

    /// Create a mock clock frozen at the given epoch milliseconds.
    pub fn from_millis(now_ms: i64) -> Self {
        Self {
            now_ms: std::sync::atomic::AtomicI64::new(now_ms),
        }
    }

    /// Create a mock clock from an RFC 3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        let now = DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc);
        Ok(Self::new(now))
    }

    /// Advance the clock by a duration.
    ///
    /// Takes `&self` so a clock already shared with a factory can keep moving.
    pub fn advance(&self, duration: chrono::Duration) {
        self.now_ms.fetch_add(
            duration.num_milliseconds(),
            std::sync::atomic::Ordering::SeqCst,
        );
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        let ms = self.now_ms.load(std::sync::atomic::Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms).unwrap_or_default()
    }

    fn now_millis(&self) -> i64 {
        self.now_ms.load(std::sync::atomic::Ordering::SeqCst)
    }
}
