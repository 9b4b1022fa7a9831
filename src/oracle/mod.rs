//! The host date primitive the fake type wraps.
//!
//! Storage is UTC milliseconds as `f64` with NaN for the invalid instant.
//! Field math, parsing and the absolute formats (ISO, UTC string) live here;
//! nothing in this module knows about the configured fake zone.

pub mod calendar;
pub mod format;
pub mod parse;

use crate::clock::{Clock, SystemClock};
use crate::zone::{HostZone, LocalZone};
use std::fmt;
use std::sync::Arc;

pub use calendar::DateField;

/// The real clock and the real local zone, bundled.
#[derive(Clone)]
pub struct Oracle {
    clock: Arc<dyn Clock>,
    zone: Arc<dyn LocalZone>,
}

impl Oracle {
    /// An oracle over the given clock and zone.
    pub fn new(clock: Arc<dyn Clock>, zone: Arc<dyn LocalZone>) -> Self {
        Self { clock, zone }
    }

    /// The machine's clock and timezone.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(HostZone))
    }

    /// Real current time in epoch milliseconds.
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// The real local zone.
    pub fn zone(&self) -> &dyn LocalZone {
        self.zone.as_ref()
    }

    /// Real minutes behind UTC at `t`. Zero for the invalid instant.
    pub fn offset_at(&self, t: f64) -> i64 {
        if t.is_finite() {
            self.zone.offset_at(t as i64)
        } else {
            0
        }
    }

    /// The host's own `parse`, reading zone-less strings in the real zone.
    pub fn parse(&self, s: &str) -> f64 {
        parse::parse(s, self.zone.as_ref())
    }
}

impl Default for Oracle {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Oracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Oracle")
            .field("clock", &"<dyn Clock>")
            .field("zone", &"<dyn LocalZone>")
            .finish()
    }
}
