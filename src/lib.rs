//! # Fakedate
//!
//! **A deterministic stand-in for the host date type, for tests that depend on "now".**
//!
//! Fakedate freezes (or passes through) two things: the current time and the
//! local timezone offset. It then hands back a date type with the host's full
//! surface (construction, local and UTC field accessors and mutators,
//! formatting, parsing) consistent with that configuration.
//!
//! ## Features
//!
//! - **Frozen clock**: `now()` and zero-argument construction return the reference time
//! - **Fixed zone**: every local field, setter and string is computed in a fixed offset
//! - **Pass-through**: either knob can defer to the real clock or the real zone
//! - **Per-instant offsets**: a passed-through zone is consulted at each instant, so DST holds
//! - **Host quirks kept**: two-digit years, field rollover, `Invalid Date`, UTC-read ISO dates
//!
//! ## Quickstart
//!
//! ```
//! use fakedate::{FakeDateConfig, FakeDateType};
//!
//! // Frozen at 2000-01-01T02:00:00Z, in UTC-02:00
//! let dates = FakeDateType::new(FakeDateConfig::fixed(946_692_000_000, 120));
//!
//! let now = dates.now_date();
//! assert_eq!(now.to_string(), "Sat Jan 01 2000 00:00:00 GMT-0200");
//! assert_eq!(now.get_hours(), 0.0);
//! assert_eq!(now.get_utc_hours(), 2.0);
//! ```
//!
//! ## Configuration
//!
//! - `reference_time`: fixed epoch milliseconds, or `Real` for the system clock
//! - `timezone_offset`: fixed minutes behind UTC, or `Host` for the machine's zone
//!
//! Both default to `0`. A loosely-typed options object
//! (`{"referenceTime": 0, "timezoneOffset": null}`) is accepted through
//! [`fake_date`] and [`FakeDateConfig::from_json`], which reject non-numbers
//! and non-integers.
//!
//! See [`FakeDateConfig`] for full documentation.

#![deny(missing_docs)]

#[macro_use]
mod macros;

// Core modules
pub mod clock;
pub mod config;
pub mod errors;
pub mod zone;

// Host date primitive
pub mod oracle;

// String dispatch
pub mod classify;

// Factory (main public API)
pub mod date;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::{FakeDateConfig, ReferenceTime, TimezoneOffset};
pub use date::{fake_date, DateArg, FakeDate, FakeDateType};
pub use errors::FakeDateError;
pub use oracle::DateField;
pub use zone::{HostZone, LocalZone};

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
#[cfg(any(test, feature = "test-seams"))]
pub use zone::MockZone;
