//! The controlled-time factory and the date type it produces.
//!
//! A [`FakeDateType`] captures one configuration. Every [`FakeDate`] built
//! from it stores a true UTC time value and answers local-view questions by
//! shifting that value by the configured zone's offset at the instant in
//! question. The offset is looked up per call, never cached, since a host
//! zone moves across daylight saving transitions.

use crate::classify;
use crate::config::{FakeDateConfig, ReferenceTime, TimezoneOffset};
use crate::oracle::calendar::{self, time_clip, DateField};
use crate::oracle::format;
use crate::oracle::parse::parse_date;
use crate::oracle::Oracle;
use crate::FakeDateError;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

const MS_PER_MINUTE: f64 = 60_000.0;

/// An argument to construction or `utc`, as the host would receive it.
#[derive(Debug, Clone, PartialEq)]
pub enum DateArg {
    /// A numeric argument.
    Number(f64),
    /// A string argument.
    Text(String),
}

impl DateArg {
    /// Numeric coercion: numbers as-is, strings read as decimal (or `0x`,
    /// `0o`, `0b` integers), blank strings as zero, anything else NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            DateArg::Number(n) => *n,
            DateArg::Text(s) => string_to_number(s),
        }
    }
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
        }
    }
    // Rust also accepts "inf" and "nan"; the host does not.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

impl From<f64> for DateArg {
    fn from(n: f64) -> Self {
        DateArg::Number(n)
    }
}

impl From<i64> for DateArg {
    fn from(n: i64) -> Self {
        DateArg::Number(n as f64)
    }
}

impl From<i32> for DateArg {
    fn from(n: i32) -> Self {
        DateArg::Number(f64::from(n))
    }
}

impl From<&str> for DateArg {
    fn from(s: &str) -> Self {
        DateArg::Text(s.to_string())
    }
}

impl From<String> for DateArg {
    fn from(s: String) -> Self {
        DateArg::Text(s)
    }
}

#[derive(Debug)]
struct Inner {
    config: FakeDateConfig,
    oracle: Oracle,
}

/// A date type bound to one configuration.
///
/// Cheap to clone; clones share the configuration and the oracle.
#[derive(Debug, Clone)]
pub struct FakeDateType {
    inner: Arc<Inner>,
}

/// Build a fake date type from a loosely-typed options object.
///
/// # Errors
/// See [`FakeDateConfig::from_json`].
pub fn fake_date(options: &serde_json::Value) -> Result<FakeDateType, FakeDateError> {
    let config = FakeDateConfig::from_json(options)?;
    Ok(FakeDateType::new(config))
}

impl FakeDateType {
    /// Create a date type over the real clock and the real local zone.
    pub fn new(config: FakeDateConfig) -> Self {
        Self::with_oracle(config, Oracle::system())
    }

    /// Create a date type with a custom clock and host zone (for testing).
    #[cfg(any(test, feature = "test-seams"))]
    pub fn with_host(
        config: FakeDateConfig,
        clock: Arc<dyn crate::clock::Clock>,
        zone: Arc<dyn crate::zone::LocalZone>,
    ) -> Self {
        Self::with_oracle(config, Oracle::new(clock, zone))
    }

    fn with_oracle(config: FakeDateConfig, oracle: Oracle) -> Self {
        debug!(
            reference_time = ?config.reference_time,
            timezone_offset = ?config.timezone_offset,
            "built fake date type"
        );
        Self {
            inner: Arc::new(Inner { config, oracle }),
        }
    }

    /// The configuration this type was built with.
    pub fn config(&self) -> &FakeDateConfig {
        &self.inner.config
    }

    fn oracle(&self) -> &Oracle {
        &self.inner.oracle
    }

    /// Minutes behind UTC of the fake zone at the UTC instant `t`.
    fn offset_at(&self, t: f64) -> i64 {
        match self.inner.config.timezone_offset {
            TimezoneOffset::Fixed(minutes) => minutes,
            TimezoneOffset::Host => self.oracle().offset_at(t),
        }
    }

    /// Minutes behind UTC of the fake zone for a local wall-clock value.
    fn offset_for_local(&self, wall: f64) -> i64 {
        match self.inner.config.timezone_offset {
            TimezoneOffset::Fixed(minutes) => minutes,
            TimezoneOffset::Host if wall.is_finite() => {
                self.oracle().zone().offset_for_local(wall as i64)
            }
            TimezoneOffset::Host => 0,
        }
    }

    /// Milliseconds between the fake zone and the host zone at `t`.
    fn correction_at(&self, t: f64) -> f64 {
        (self.offset_at(t) - self.oracle().offset_at(t)) as f64 * MS_PER_MINUTE
    }

    /// Shift a stored UTC value to the fake zone's wall clock.
    fn to_local(&self, t: f64) -> f64 {
        t - self.offset_at(t) as f64 * MS_PER_MINUTE
    }

    /// Shift a wall-clock value in the fake zone back to UTC.
    fn utc_from_local(&self, wall: f64) -> f64 {
        wall + self.offset_for_local(wall) as f64 * MS_PER_MINUTE
    }

    /// The current time: the reference time if fixed, the real clock if not.
    pub fn now(&self) -> i64 {
        match self.inner.config.reference_time {
            ReferenceTime::Fixed(ms) => ms,
            ReferenceTime::Real => self.oracle().now(),
        }
    }

    /// Compose UTC fields, exactly as the host does. No zone correction.
    ///
    /// Fewer than two arguments yields NaN.
    pub fn utc(&self, args: &[DateArg]) -> f64 {
        let numbers: Vec<f64> = args.iter().map(DateArg::to_number).collect();
        calendar::utc(&numbers)
    }

    /// Parse a date string.
    ///
    /// ISO-prefixed strings and strings ending in a zone word go straight to
    /// the host parser. Anything else is parsed by the host and then shifted
    /// by the difference between the fake zone and the host zone, so a
    /// zone-less string reads as wall-clock time in the fake zone. A numeric
    /// offset in such a string is shifted all the same.
    pub fn parse(&self, s: &str) -> f64 {
        if classify::is_self_describing(s) {
            trace!(input = s, "self-describing date string");
            return self.oracle().parse(s);
        }
        match parse_date(s) {
            Some(parsed) if parsed.offset.is_some() => {
                trace!(input = s, "date string with numeric offset");
                let t = parsed.resolve(self.oracle().zone());
                time_clip(t + self.correction_at(t))
            }
            Some(parsed) => {
                trace!(input = s, "date string read in the fake zone");
                time_clip(self.utc_from_local(parsed.wall_ms))
            }
            None => f64::NAN,
        }
    }

    fn instance(&self, time: f64) -> FakeDate {
        FakeDate {
            time,
            ty: self.clone(),
        }
    }

    /// Construct from positional arguments, dispatching on their count and
    /// type the way the host's own constructor does.
    ///
    /// * none: the current time
    /// * one number: epoch milliseconds, uncorrected
    /// * one string: see [`FakeDateType::parse`]
    /// * two or more: `year, month[, date, hours, minutes, seconds, ms]` in
    ///   the fake zone
    pub fn construct(&self, args: &[DateArg]) -> FakeDate {
        trace!(args = args.len(), "construct");
        match args {
            [] => self.now_date(),
            [DateArg::Number(ms)] => self.at_millis(*ms),
            [DateArg::Text(s)] => self.at_string(s),
            _ => {
                let numbers: Vec<f64> = args.iter().take(7).map(DateArg::to_number).collect();
                self.at_fields(&numbers)
            }
        }
    }

    /// An instance at [`FakeDateType::now`].
    pub fn now_date(&self) -> FakeDate {
        self.instance(time_clip(self.now() as f64))
    }

    /// An instance at the given epoch milliseconds.
    pub fn at_millis(&self, ms: f64) -> FakeDate {
        self.instance(time_clip(ms))
    }

    /// An instance from a date string; invalid if it does not parse.
    pub fn at_string(&self, s: &str) -> FakeDate {
        self.instance(self.parse(s))
    }

    /// An instance from local fields `year, month[, date, hours, minutes,
    /// seconds, ms]`, month 0-based. With fewer than two fields this behaves
    /// like [`FakeDateType::construct`] with that many numbers.
    pub fn at_fields(&self, fields: &[f64]) -> FakeDate {
        match fields {
            [] => self.now_date(),
            [ms] => self.at_millis(*ms),
            _ => {
                let wall = calendar::compose(fields);
                self.instance(time_clip(self.utc_from_local(wall)))
            }
        }
    }
}

/// An instant viewed through a [`FakeDateType`]'s clock and zone.
#[derive(Clone)]
pub struct FakeDate {
    time: f64,
    ty: FakeDateType,
}

impl FakeDate {
    /// The type this instance was built by.
    pub fn date_type(&self) -> &FakeDateType {
        &self.ty
    }

    /// Whether the stored instant is valid.
    pub fn is_valid(&self) -> bool {
        !self.time.is_nan()
    }

    fn local_time(&self) -> f64 {
        self.ty.to_local(self.time)
    }

    /// Read a field as seen in the fake zone.
    pub fn get(&self, field: DateField) -> f64 {
        calendar::get_field(self.local_time(), field)
    }

    /// Read a field in UTC. `Year` has no UTC form and reads NaN.
    pub fn get_utc(&self, field: DateField) -> f64 {
        match field {
            DateField::Year => f64::NAN,
            _ => calendar::get_field(self.time, field),
        }
    }

    /// Write a field as seen in the fake zone, with the host's rollover rules
    /// and optional trailing fields (`set(Hours, &[h, m, s, ms])`).
    ///
    /// Returns the new stored time value. `Day` is read-only: the instance is
    /// left alone and NaN returned.
    pub fn set(&mut self, field: DateField, args: &[f64]) -> f64 {
        if field == DateField::Day {
            return f64::NAN;
        }
        let wall = calendar::set_field(self.local_time(), field, args);
        self.time = time_clip(self.ty.utc_from_local(wall));
        self.time
    }

    /// Write a field in UTC. `Day` and `Year` are not writable this way: the
    /// instance is left alone and NaN returned.
    pub fn set_utc(&mut self, field: DateField, args: &[f64]) -> f64 {
        if matches!(field, DateField::Day | DateField::Year) {
            return f64::NAN;
        }
        self.time = time_clip(calendar::set_field(self.time, field, args));
        self.time
    }

    /// Day of the month in the fake zone.
    pub fn get_date(&self) -> f64 {
        self.get(DateField::Date)
    }

    /// Day of the week in the fake zone, 0 is Sunday.
    pub fn get_day(&self) -> f64 {
        self.get(DateField::Day)
    }

    /// Year in the fake zone.
    pub fn get_full_year(&self) -> f64 {
        self.get(DateField::FullYear)
    }

    /// Hour in the fake zone.
    pub fn get_hours(&self) -> f64 {
        self.get(DateField::Hours)
    }

    /// Millisecond in the fake zone.
    pub fn get_milliseconds(&self) -> f64 {
        self.get(DateField::Milliseconds)
    }

    /// Minute in the fake zone.
    pub fn get_minutes(&self) -> f64 {
        self.get(DateField::Minutes)
    }

    /// Month in the fake zone, 0 is January.
    pub fn get_month(&self) -> f64 {
        self.get(DateField::Month)
    }

    /// Second in the fake zone.
    pub fn get_seconds(&self) -> f64 {
        self.get(DateField::Seconds)
    }

    /// Legacy year in the fake zone: full year minus 1900.
    pub fn get_year(&self) -> f64 {
        self.get(DateField::Year)
    }

    /// Day of the month in UTC.
    pub fn get_utc_date(&self) -> f64 {
        self.get_utc(DateField::Date)
    }

    /// Day of the week in UTC.
    pub fn get_utc_day(&self) -> f64 {
        self.get_utc(DateField::Day)
    }

    /// Year in UTC.
    pub fn get_utc_full_year(&self) -> f64 {
        self.get_utc(DateField::FullYear)
    }

    /// Hour in UTC.
    pub fn get_utc_hours(&self) -> f64 {
        self.get_utc(DateField::Hours)
    }

    /// Millisecond in UTC.
    pub fn get_utc_milliseconds(&self) -> f64 {
        self.get_utc(DateField::Milliseconds)
    }

    /// Minute in UTC.
    pub fn get_utc_minutes(&self) -> f64 {
        self.get_utc(DateField::Minutes)
    }

    /// Month in UTC.
    pub fn get_utc_month(&self) -> f64 {
        self.get_utc(DateField::Month)
    }

    /// Second in UTC.
    pub fn get_utc_seconds(&self) -> f64 {
        self.get_utc(DateField::Seconds)
    }

    /// The stored time value in epoch milliseconds, NaN if invalid.
    pub fn get_time(&self) -> f64 {
        self.time
    }

    /// Numeric coercion; same as [`FakeDate::get_time`].
    pub fn value_of(&self) -> f64 {
        self.time
    }

    /// Replace the stored time value. Returns the clipped value stored.
    pub fn set_time(&mut self, ms: f64) -> f64 {
        self.time = time_clip(ms);
        self.time
    }

    /// Minutes behind UTC: the configured offset, or the host's offset at
    /// this instant under pass-through. NaN if invalid.
    pub fn get_timezone_offset(&self) -> f64 {
        if self.time.is_nan() {
            return f64::NAN;
        }
        self.ty.offset_at(self.time) as f64
    }

    /// Set the day of the month in the fake zone.
    pub fn set_date(&mut self, date: f64) -> f64 {
        self.set(DateField::Date, &[date])
    }

    /// Set the year in the fake zone.
    pub fn set_full_year(&mut self, year: f64) -> f64 {
        self.set(DateField::FullYear, &[year])
    }

    /// Set the hour in the fake zone.
    pub fn set_hours(&mut self, hours: f64) -> f64 {
        self.set(DateField::Hours, &[hours])
    }

    /// Set the millisecond in the fake zone.
    pub fn set_milliseconds(&mut self, ms: f64) -> f64 {
        self.set(DateField::Milliseconds, &[ms])
    }

    /// Set the minute in the fake zone.
    pub fn set_minutes(&mut self, minutes: f64) -> f64 {
        self.set(DateField::Minutes, &[minutes])
    }

    /// Set the month in the fake zone.
    pub fn set_month(&mut self, month: f64) -> f64 {
        self.set(DateField::Month, &[month])
    }

    /// Set the second in the fake zone.
    pub fn set_seconds(&mut self, seconds: f64) -> f64 {
        self.set(DateField::Seconds, &[seconds])
    }

    /// Legacy year setter: `0..=99` means `1900..=1999`.
    pub fn set_year(&mut self, year: f64) -> f64 {
        self.set(DateField::Year, &[year])
    }

    /// Set the day of the month in UTC.
    pub fn set_utc_date(&mut self, date: f64) -> f64 {
        self.set_utc(DateField::Date, &[date])
    }

    /// Set the year in UTC.
    pub fn set_utc_full_year(&mut self, year: f64) -> f64 {
        self.set_utc(DateField::FullYear, &[year])
    }

    /// Set the hour in UTC.
    pub fn set_utc_hours(&mut self, hours: f64) -> f64 {
        self.set_utc(DateField::Hours, &[hours])
    }

    /// Set the millisecond in UTC.
    pub fn set_utc_milliseconds(&mut self, ms: f64) -> f64 {
        self.set_utc(DateField::Milliseconds, &[ms])
    }

    /// Set the minute in UTC.
    pub fn set_utc_minutes(&mut self, minutes: f64) -> f64 {
        self.set_utc(DateField::Minutes, &[minutes])
    }

    /// Set the month in UTC.
    pub fn set_utc_month(&mut self, month: f64) -> f64 {
        self.set_utc(DateField::Month, &[month])
    }

    /// Set the second in UTC.
    pub fn set_utc_seconds(&mut self, seconds: f64) -> f64 {
        self.set_utc(DateField::Seconds, &[seconds])
    }

    /// `"Sat Jan 01 2000"` in the fake zone, or `"Invalid Date"`.
    pub fn to_date_string(&self) -> String {
        match calendar::fields(self.local_time()) {
            Some(f) => format::date_string(&f),
            None => format::INVALID_DATE.to_string(),
        }
    }

    /// `"00:00:00 GMT-0200"` in the fake zone, or `"Invalid Date"`.
    pub fn to_time_string(&self) -> String {
        match calendar::fields(self.local_time()) {
            Some(f) => format::time_string(&f, self.ty.offset_at(self.time)),
            None => format::INVALID_DATE.to_string(),
        }
    }

    /// Same as `to_string()`; there is no locale support.
    pub fn to_locale_string(&self) -> String {
        self.to_string()
    }

    /// Same as [`FakeDate::to_date_string`].
    pub fn to_locale_date_string(&self) -> String {
        self.to_date_string()
    }

    /// Same as [`FakeDate::to_time_string`].
    pub fn to_locale_time_string(&self) -> String {
        self.to_time_string()
    }

    /// `YYYY-MM-DDTHH:mm:ss.sssZ`.
    ///
    /// # Errors
    /// * `InvalidTimeValue` - the instance is invalid
    pub fn to_iso_string(&self) -> Result<String, FakeDateError> {
        format::iso_string(self.time).ok_or(FakeDateError::InvalidTimeValue)
    }

    /// `"Sat, 01 Jan 2000 02:00:00 GMT"`, or `"Invalid Date"`.
    pub fn to_utc_string(&self) -> String {
        format::utc_string(self.time)
    }

    /// Legacy alias of [`FakeDate::to_utc_string`].
    pub fn to_gmt_string(&self) -> String {
        self.to_utc_string()
    }

    /// The ISO string, or `None` for an invalid instance.
    pub fn to_json(&self) -> Option<String> {
        format::iso_string(self.time)
    }
}

/// String coercion: `"<date string> <time string>"` in the fake zone.
impl fmt::Display for FakeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(fields) = calendar::fields(self.local_time()) else {
            return f.write_str(format::INVALID_DATE);
        };
        write!(
            f,
            "{} {}",
            format::date_string(&fields),
            format::time_string(&fields, self.ty.offset_at(self.time))
        )
    }
}

impl fmt::Debug for FakeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeDate")
            .field("time", &self.time)
            .field("local", &self.to_string())
            .finish()
    }
}

impl From<&FakeDate> for f64 {
    fn from(date: &FakeDate) -> Self {
        date.value_of()
    }
}

impl PartialEq for FakeDate {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl PartialOrd for FakeDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.time.partial_cmp(&other.time)
    }
}

/// Serializes as [`FakeDate::to_json`]: an ISO string, or null.
impl Serialize for FakeDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_json() {
            Some(iso) => serializer.serialize_str(&iso),
            None => serializer.serialize_none(),
        }
    }
}
