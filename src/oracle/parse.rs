//! The host's date-string parser.
//!
//! Two grammars are accepted. ISO 8601 (`2001-01-01`, `2001-01-01T10:00Z`,
//! `+002001-01`) is tried first; date-only forms are UTC, date-time forms
//! without an offset are local. Anything else goes through a free-form
//! legacy grammar of month names, numbers, times and zone words, the shape
//! produced by `toString`/`toUTCString` and written by people
//! (`Jan 2, 1970`, `Sat, 01 Jan 2000 02:00:00 GMT`, `1/2/1970 10:00 PM`).

use super::calendar::{days_in_month, make_date, make_day, make_time, time_clip};
use crate::zone::{LocalZone, MS_PER_MINUTE};

/// A successfully read date string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedDate {
    /// The written calendar fields composed as if they were UTC.
    pub wall_ms: f64,
    /// Minutes behind UTC stated by the string itself, if any.
    pub offset: Option<i64>,
}

impl ParsedDate {
    /// Resolve to an absolute time value, reading zone-less strings in `zone`.
    pub fn resolve(&self, zone: &dyn LocalZone) -> f64 {
        let offset = match self.offset {
            Some(offset) => offset,
            None => {
                if !self.wall_ms.is_finite() {
                    return f64::NAN;
                }
                zone.offset_for_local(self.wall_ms as i64)
            }
        };
        time_clip(self.wall_ms + (offset * MS_PER_MINUTE) as f64)
    }
}

/// The host's `parse`: an absolute time value, or NaN.
pub fn parse(s: &str, zone: &dyn LocalZone) -> f64 {
    match parse_date(s) {
        Some(parsed) => parsed.resolve(zone),
        None => f64::NAN,
    }
}

/// Read `s` without resolving zone-less forms.
pub fn parse_date(s: &str) -> Option<ParsedDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    parse_iso(s).or_else(|| parse_legacy(s))
}

fn valid_ymd(year: i64, month: i64, date: i64) -> bool {
    let Ok(month) = u32::try_from(month) else {
        return false;
    };
    date >= 1 && date <= i64::from(days_in_month(year, month))
}

fn valid_time(h: i64, m: i64, s: i64, ms: i64) -> bool {
    if h == 24 {
        return m == 0 && s == 0 && ms == 0;
    }
    (0..24).contains(&h) && (0..60).contains(&m) && (0..60).contains(&s)
}

fn wall_ms(y: i64, mo: i64, d: i64, h: i64, mi: i64, s: i64, ms: i64) -> f64 {
    make_date(
        make_day(y as f64, (mo - 1) as f64, d as f64),
        make_time(h as f64, mi as f64, s as f64, ms as f64),
    )
}

/// First three digits of a fraction, right-padded: `"5"` is 500 ms.
fn fraction_millis(frac: &str) -> i64 {
    let digits: String = frac.chars().chain("000".chars()).take(3).collect();
    digits.parse().unwrap_or(0)
}

/// `+05:30` / `-0200` / `Z` as minutes behind UTC.
fn signed_offset(text: &str) -> Option<i64> {
    if text.eq_ignore_ascii_case("z") {
        return Some(0);
    }
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (-1, &text[1..]),
        b'-' => (1, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i64 = digits[..2].parse().ok()?;
    let minutes: i64 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

fn parse_iso(s: &str) -> Option<ParsedDate> {
    let caps = regex!(
        r"^(?P<year>[+-]\d{6}|\d{4})(?:-(?P<month>\d{2})(?:-(?P<day>\d{2}))?)?(?:[Tt ](?P<hour>\d{2}):(?P<min>\d{2})(?::(?P<sec>\d{2})(?:[.,](?P<frac>\d+))?)?(?P<tz>[Zz]|[+-]\d{2}:?\d{2})?)?$"
    )
    .captures(s)?;

    let year_text = &caps["year"];
    if year_text == "-000000" {
        return None;
    }
    let year: i64 = year_text.trim_start_matches('+').parse().ok()?;
    let num = |name: &str, default: i64| -> Option<i64> {
        match caps.name(name) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };
    let month = num("month", 1)?;
    let date = num("day", 1)?;
    let hour = num("hour", 0)?;
    let minute = num("min", 0)?;
    let second = num("sec", 0)?;
    let millis = caps.name("frac").map_or(0, |m| fraction_millis(m.as_str()));

    if !valid_ymd(year, month, date) || !valid_time(hour, minute, second, millis) {
        return None;
    }

    let has_time = caps.name("hour").is_some();
    let offset = match caps.name("tz") {
        Some(tz) => Some(signed_offset(tz.as_str())?),
        // Date-only forms are UTC; date-time forms are local.
        None if !has_time => Some(0),
        None => None,
    };

    Some(ParsedDate {
        wall_ms: wall_ms(year, month, date, hour, minute, second, millis),
        offset,
    })
}

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Minutes behind UTC for the zone words the legacy grammar knows.
fn zone_word_offset(word: &str) -> Option<i64> {
    match word {
        "gmt" | "utc" | "ut" | "z" => Some(0),
        "est" => Some(300),
        "edt" => Some(240),
        "cst" => Some(360),
        "cdt" => Some(300),
        "mst" => Some(420),
        "mdt" => Some(360),
        "pst" => Some(480),
        "pdt" => Some(420),
        _ => None,
    }
}

fn is_name_prefix(word: &str, names: &[&str]) -> Option<usize> {
    if word.len() < 3 {
        return None;
    }
    names.iter().position(|name| name.starts_with(word))
}

/// A number as written, with its digit count (two-digit years are legacy).
#[derive(Debug, Clone, Copy)]
struct Written {
    value: i64,
    digits: usize,
}

fn legacy_year(n: Written) -> i64 {
    if n.digits <= 2 {
        if n.value < 50 {
            2000 + n.value
        } else {
            1900 + n.value
        }
    } else {
        n.value
    }
}

#[derive(Debug, Default)]
struct LegacyFields {
    month: Option<i64>,
    numbers: Vec<Written>,
    slash_date: Option<(i64, i64, Written)>,
    time: Option<(i64, i64, i64, i64)>,
    pm: Option<bool>,
    offset: Option<i64>,
}

fn parse_legacy(s: &str) -> Option<ParsedDate> {
    let tokens = regex!(
        r"(?x)
        (?P<comment>\([^)]*\))
        | (?P<time>\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)
        | (?P<slash>\d{1,2}/\d{1,2}/\d{1,6})
        | (?P<offset>[+-]\d{2}:?\d{2})
        | (?P<num>\d+)
        | (?P<word>[A-Za-z]+\.?)
        | (?P<sep>[\s,]+)
        | (?P<other>.)
        "
    );

    let mut out = LegacyFields::default();
    for caps in tokens.captures_iter(s) {
        if caps.name("comment").is_some() || caps.name("sep").is_some() {
            continue;
        }
        if let Some(m) = caps.name("time") {
            if out.time.is_some() {
                return None;
            }
            out.time = Some(parse_clock(m.as_str())?);
        } else if let Some(m) = caps.name("slash") {
            let mut parts = m.as_str().split('/');
            let month = parts.next()?.parse().ok()?;
            let date = parts.next()?.parse().ok()?;
            let year_text = parts.next()?;
            let year = Written {
                value: year_text.parse().ok()?,
                digits: year_text.len(),
            };
            out.slash_date = Some((month, date, year));
        } else if let Some(m) = caps.name("offset") {
            // A signed offset only makes sense after a time or zone word.
            if out.time.is_none() && out.offset.is_none() {
                return None;
            }
            out.offset = Some(signed_offset(m.as_str())?);
        } else if let Some(m) = caps.name("num") {
            out.numbers.push(Written {
                value: m.as_str().parse().ok()?,
                digits: m.as_str().len(),
            });
        } else if let Some(m) = caps.name("word") {
            let word = m.as_str().trim_end_matches('.').to_ascii_lowercase();
            apply_word(&mut out, &word)?;
        } else {
            return None;
        }
    }

    let (year, month, date) = legacy_date(&out)?;
    let (mut hour, minute, second, millis) = out.time.unwrap_or((0, 0, 0, 0));
    match out.pm {
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some(true) if hour < 12 => hour += 12,
        Some(false) if hour == 12 => hour = 0,
        _ => {}
    }

    if !valid_ymd(year, month, date) || !valid_time(hour, minute, second, millis) {
        return None;
    }

    Some(ParsedDate {
        wall_ms: wall_ms(year, month, date, hour, minute, second, millis),
        offset: out.offset,
    })
}

fn apply_word(out: &mut LegacyFields, word: &str) -> Option<()> {
    match word {
        "am" | "pm" => {
            if out.pm.is_some() {
                return None;
            }
            out.pm = Some(word == "pm");
        }
        _ => {
            if let Some(offset) = zone_word_offset(word) {
                out.offset = Some(offset);
            } else if let Some(index) = is_name_prefix(word, &MONTH_NAMES) {
                if out.month.is_some() {
                    return None;
                }
                out.month = Some(index as i64 + 1);
            } else if is_name_prefix(word, &WEEKDAY_NAMES).is_none() {
                return None;
            }
        }
    }
    Some(())
}

fn parse_clock(text: &str) -> Option<(i64, i64, i64, i64)> {
    let (hms, frac) = match text.split_once('.') {
        Some((hms, frac)) => (hms, fraction_millis(frac)),
        None => (text, 0),
    };
    let mut parts = hms.split(':');
    let hour = parts.next()?.parse().ok()?;
    let minute = parts.next()?.parse().ok()?;
    let second = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    Some((hour, minute, second, frac))
}

/// Work out year, 1-based month and day from the collected pieces.
fn legacy_date(out: &LegacyFields) -> Option<(i64, i64, i64)> {
    if let Some((month, date, year)) = out.slash_date {
        if out.month.is_some() || !out.numbers.is_empty() {
            return None;
        }
        return Some((legacy_year(year), month, date));
    }

    let month = out.month?;
    match out.numbers.as_slice() {
        // "Jan 2 1970", "2 Jan 1970"
        [first, second] if first.value <= 31 && first.digits <= 2 => {
            Some((legacy_year(*second), month, first.value))
        }
        // "1970 Jan 2"
        [first, second] => Some((legacy_year(*first), month, second.value)),
        // "Jan 1970"
        [only] if only.value > 31 || only.digits > 2 => Some((legacy_year(*only), month, 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::calendar::{utc, MAX_TIME};
    use crate::zone::MockZone;

    fn utc_ms(args: &[f64]) -> f64 {
        utc(args)
    }

    #[test]
    fn iso_date_only_is_utc() {
        let zone = MockZone::fixed(120);
        assert_eq!(parse("2001-01-01", &zone), utc_ms(&[2001.0, 0.0, 1.0]));
        assert_eq!(parse("2001-02", &zone), utc_ms(&[2001.0, 1.0, 1.0]));
        assert_eq!(parse("2001", &zone), utc_ms(&[2001.0, 0.0, 1.0]));
    }

    #[test]
    fn iso_date_time_with_offset() {
        let zone = MockZone::fixed(0);
        let expected = utc_ms(&[2000.0, 0.0, 1.0, 2.0, 0.0, 0.0, 0.0]);
        assert_eq!(parse("2000-01-01T00:00:00.000-02:00", &zone), expected);
        assert_eq!(parse("2000-01-01T02:00:00Z", &zone), expected);
        assert_eq!(parse("2000-01-01T07:30:00+0530", &zone), expected);
    }

    #[test]
    fn iso_date_time_without_offset_is_local() {
        let zone = MockZone::fixed(120);
        assert_eq!(
            parse("2000-01-01T00:00", &zone),
            utc_ms(&[2000.0, 0.0, 1.0, 2.0, 0.0])
        );
    }

    #[test]
    fn iso_extended_year() {
        let zone = MockZone::fixed(0);
        assert_eq!(
            parse("+020000-01-01T00:00:00.000Z", &zone),
            utc_ms(&[20000.0, 0.0, 1.0])
        );
        assert!(parse("-000000-01-01", &zone).is_nan());
        assert_eq!(parse("+275760-09-13T00:00:00.000Z", &zone), MAX_TIME);
        assert_eq!(parse("-271821-04-20T00:00:00.000Z", &zone), -MAX_TIME);
        assert!(parse("+275760-09-13T00:00:00.001Z", &zone).is_nan());
    }

    #[test]
    fn iso_rejects_impossible_fields() {
        let zone = MockZone::fixed(0);
        assert!(parse("2001-02-29", &zone).is_nan());
        assert!(parse("2001-13-01", &zone).is_nan());
        assert!(parse("2001-01-01T25:00Z", &zone).is_nan());
        assert_eq!(
            parse("2001-01-01T24:00Z", &zone),
            utc_ms(&[2001.0, 0.0, 2.0])
        );
    }

    #[test]
    fn iso_fraction_digits() {
        let zone = MockZone::fixed(0);
        let base = utc_ms(&[2001.0, 0.0, 1.0]);
        assert_eq!(parse("2001-01-01T00:00:00.5Z", &zone), base + 500.0);
        assert_eq!(parse("2001-01-01T00:00:00.123456Z", &zone), base + 123.0);
    }

    #[test]
    fn legacy_month_day_year() {
        let zone = MockZone::fixed(0);
        assert_eq!(parse("Jan 2, 1970", &zone), 86_400_000.0);
        assert_eq!(parse("January 2 1970", &zone), 86_400_000.0);
        assert_eq!(parse("2 Jan 1970", &zone), 86_400_000.0);
        assert_eq!(parse("1970 Jan 2", &zone), 86_400_000.0);
    }

    #[test]
    fn legacy_zone_words() {
        let zone = MockZone::fixed(120);
        assert_eq!(parse("Jan 1, 1970 GMT", &zone), 0.0);
        assert_eq!(parse("Jan 1, 1970 EST", &zone), 300.0 * 60_000.0);
        assert_eq!(parse("Jan 1, 1970", &zone), 120.0 * 60_000.0);
    }

    #[test]
    fn legacy_reads_to_string_output() {
        let zone = MockZone::fixed(0);
        let expected = utc_ms(&[2000.0, 0.0, 1.0, 2.0, 0.0]);
        assert_eq!(parse("Sat Jan 01 2000 00:00:00 GMT-0200", &zone), expected);
        assert_eq!(
            parse("Sat Jan 01 2000 00:00:00 GMT-0200 (Fake Standard Time)", &zone),
            expected
        );
        assert_eq!(parse("Sat, 01 Jan 2000 02:00:00 GMT", &zone), expected);
    }

    #[test]
    fn legacy_slash_dates_and_meridiem() {
        let zone = MockZone::fixed(0);
        assert_eq!(
            parse("1/2/1970 10:30 PM", &zone),
            utc_ms(&[1970.0, 0.0, 2.0, 22.0, 30.0])
        );
        assert_eq!(parse("1/2/1970 12:00 am", &zone), utc_ms(&[1970.0, 0.0, 2.0]));
        assert_eq!(parse("12/31/99", &zone), utc_ms(&[1999.0, 11.0, 31.0]));
    }

    #[test]
    fn unparseable_strings_are_nan() {
        let zone = MockZone::fixed(0);
        for s in ["1234567---", "", "   ", "tomorrow", "Jan", "Jan 1, 1970 ???", "13:00", "Feb 30 2001"] {
            assert!(parse(s, &zone).is_nan(), "{s:?} should not parse");
        }
    }

    #[test]
    fn explicit_offset_is_reported() {
        let parsed = parse_date("Jan 1 1970 10:00 +0500").unwrap();
        assert_eq!(parsed.offset, Some(-300));
        assert_eq!(parse_date("Jan 1 1970 10:00").unwrap().offset, None);
    }
}
