//! Fakedate configuration.
//!
//! Two independent knobs: what "now" is, and what the local zone is. Each is
//! either pinned to a fixed integer or passed through to the real host.

use crate::FakeDateError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Option key for the reference time.
pub const REFERENCE_TIME_KEY: &str = "referenceTime";

/// Option key for the timezone offset.
pub const TIMEZONE_OFFSET_KEY: &str = "timezoneOffset";

// Matches the host's time value range.
const MAX_REFERENCE_MS: u64 = 8_640_000_000_000_000;

/// What the produced type reports as the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTime {
    /// Frozen at this many milliseconds since the epoch.
    Fixed(i64),
    /// Track the real clock.
    Real,
}

impl Default for ReferenceTime {
    fn default() -> Self {
        ReferenceTime::Fixed(0)
    }
}

/// The local zone the produced type pretends to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimezoneOffset {
    /// Minutes behind UTC, `getTimezoneOffset` style: `120` is UTC-02:00.
    Fixed(i64),
    /// Whatever the host reports at each instant.
    Host,
}

impl Default for TimezoneOffset {
    fn default() -> Self {
        TimezoneOffset::Fixed(0)
    }
}

/// Configuration for a fake date type.
///
/// The default is a clock frozen at the epoch in a UTC+00:00 zone. Pass-through
/// is only ever opted into explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct FakeDateConfig {
    /// What "now" is.
    pub reference_time: ReferenceTime,

    /// What the local zone is.
    pub timezone_offset: TimezoneOffset,
}

impl FakeDateConfig {
    /// Frozen at `reference_ms`, in a zone `offset_minutes` behind UTC.
    pub fn fixed(reference_ms: i64, offset_minutes: i64) -> Self {
        Self {
            reference_time: ReferenceTime::Fixed(reference_ms),
            timezone_offset: TimezoneOffset::Fixed(offset_minutes),
        }
    }

    /// Replace the reference time.
    pub fn with_reference_time(mut self, reference_time: ReferenceTime) -> Self {
        self.reference_time = reference_time;
        self
    }

    /// Replace the timezone offset.
    pub fn with_timezone_offset(mut self, timezone_offset: TimezoneOffset) -> Self {
        self.timezone_offset = timezone_offset;
        self
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), FakeDateError> {
        if let ReferenceTime::Fixed(ms) = self.reference_time {
            if ms.unsigned_abs() > MAX_REFERENCE_MS {
                return Err(FakeDateError::ConfigError(format!(
                    "referenceTime must be within {} ms of the epoch, got {}",
                    MAX_REFERENCE_MS, ms
                )));
            }
        }
        Ok(())
    }

    /// Read a loosely-typed options object.
    ///
    /// Absent keys default to `0`; an explicit `null` selects pass-through.
    /// Unknown keys are ignored.
    ///
    /// # Errors
    /// * `ConfigError` - `options` is not an object
    /// * `NotANumber` - a key holds a string, boolean, array or object
    /// * `NotAnInteger` - a key holds a fractional number
    /// * `ConfigError` - a key holds an integer too large to represent, or the
    ///   reference time is outside the host's time range
    pub fn from_json(options: &Value) -> Result<Self, FakeDateError> {
        let Value::Object(map) = options else {
            return Err(FakeDateError::ConfigError(format!(
                "options must be an object, found {}",
                type_name(options)
            )));
        };

        let reference_time = match read_integer(map, REFERENCE_TIME_KEY)? {
            Setting::Absent => ReferenceTime::default(),
            Setting::PassThrough => ReferenceTime::Real,
            Setting::Value(ms) => ReferenceTime::Fixed(ms),
        };
        let timezone_offset = match read_integer(map, TIMEZONE_OFFSET_KEY)? {
            Setting::Absent => TimezoneOffset::default(),
            Setting::PassThrough => TimezoneOffset::Host,
            Setting::Value(minutes) => TimezoneOffset::Fixed(minutes),
        };

        let config = Self {
            reference_time,
            timezone_offset,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and read an options object from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, FakeDateError> {
        let options: Value = serde_json::from_str(json)
            .map_err(|e| FakeDateError::ConfigError(format!("Invalid options JSON: {}", e)))?;
        Self::from_json(&options)
    }
}

impl TryFrom<Value> for FakeDateConfig {
    type Error = FakeDateError;

    fn try_from(options: Value) -> Result<Self, Self::Error> {
        Self::from_json(&options)
    }
}

enum Setting {
    Absent,
    PassThrough,
    Value(i64),
}

/// The host's `typeof` name for a JSON value.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) | Value::Object(_) => "object",
    }
}

fn read_integer(map: &Map<String, Value>, name: &'static str) -> Result<Setting, FakeDateError> {
    let number = match map.get(name) {
        None => return Ok(Setting::Absent),
        Some(Value::Null) => return Ok(Setting::PassThrough),
        Some(Value::Number(number)) => number,
        Some(other) => {
            return Err(FakeDateError::NotANumber {
                name,
                found: type_name(other).to_string(),
            })
        }
    };

    if let Some(n) = number.as_i64() {
        return Ok(Setting::Value(n));
    }
    match number.as_f64() {
        Some(f) if f.fract() != 0.0 => Err(FakeDateError::NotAnInteger {
            name,
            found: number.to_string(),
        }),
        Some(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(Setting::Value(f as i64)),
        _ => Err(FakeDateError::ConfigError(format!(
            "{} is out of range, found {}",
            name, number
        ))),
    }
}
