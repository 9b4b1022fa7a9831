//! String renderings of time values.

use super::calendar::{fields, Fields};

/// Text every formatter returns for the invalid instant.
pub const INVALID_DATE: &str = "Invalid Date";

/// Abbreviated weekday names, Sunday first.
pub const DAYS_OF_WEEK: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Abbreviated month names, January first.
pub const MONTHS_OF_YEAR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn weekday_name(f: &Fields) -> &'static str {
    DAYS_OF_WEEK[f.weekday as usize % 7]
}

fn month_name(f: &Fields) -> &'static str {
    MONTHS_OF_YEAR[f.month as usize % 12]
}

/// `"Sat Jan 01 2000"`. The year is printed at its natural width.
pub fn date_string(f: &Fields) -> String {
    format!("{} {} {:02} {}", weekday_name(f), month_name(f), f.date, f.year)
}

/// `"00:00:00 GMT-0200"` for fields read off the local view and an offset in
/// minutes behind UTC.
pub fn time_string(f: &Fields, offset_minutes: i64) -> String {
    format!(
        "{:02}:{:02}:{:02} GMT{}",
        f.hours,
        f.minutes,
        f.seconds,
        offset_suffix(offset_minutes)
    )
}

/// `"+0530"` / `"-0200"`. A positive offset (behind UTC) prints with `-`.
pub fn offset_suffix(offset_minutes: i64) -> String {
    let sign = if offset_minutes < 0 { '+' } else { '-' };
    let magnitude = offset_minutes.unsigned_abs();
    format!("{}{:02}{:02}", sign, magnitude / 60, magnitude % 60)
}

/// `YYYY-MM-DDTHH:mm:ss.sssZ`, with `±YYYYYY` years outside `0..=9999`.
///
/// `None` for the invalid instant.
pub fn iso_string(t: f64) -> Option<String> {
    let f = fields(t)?;
    let year = if (0..=9999).contains(&f.year) {
        format!("{:04}", f.year)
    } else if f.year < 0 {
        format!("-{:06}", f.year.unsigned_abs())
    } else {
        format!("+{:06}", f.year)
    };
    Some(format!(
        "{}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        f.month + 1,
        f.date,
        f.hours,
        f.minutes,
        f.seconds,
        f.millis
    ))
}

/// `"Sat, 01 Jan 2000 02:00:00 GMT"`, or [`INVALID_DATE`].
pub fn utc_string(t: f64) -> String {
    let Some(f) = fields(t) else {
        return INVALID_DATE.to_string();
    };
    let year = if f.year < 0 {
        format!("-{:04}", f.year.unsigned_abs())
    } else {
        format!("{:04}", f.year)
    };
    format!(
        "{}, {:02} {} {} {:02}:{:02}:{:02} GMT",
        weekday_name(&f),
        f.date,
        month_name(&f),
        year,
        f.hours,
        f.minutes,
        f.seconds
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::calendar::{utc, MAX_TIME};

    #[test]
    fn iso_string_regular_year() {
        let t = utc(&[2016.0, 0.0, 1.0, 0.0, 0.0, 0.0, 7.0]);
        assert_eq!(iso_string(t).unwrap(), "2016-01-01T00:00:00.007Z");
    }

    #[test]
    fn iso_string_extended_years() {
        let far = utc(&[20000.0, 0.0, 1.0]);
        assert_eq!(iso_string(far).unwrap(), "+020000-01-01T00:00:00.000Z");
        let before_zero = utc(&[-1.0, 11.0, 31.0]);
        assert_eq!(iso_string(before_zero).unwrap(), "-000001-12-31T00:00:00.000Z");
        assert_eq!(
            iso_string(MAX_TIME).unwrap(),
            "+275760-09-13T00:00:00.000Z"
        );
        assert_eq!(
            iso_string(-MAX_TIME).unwrap(),
            "-271821-04-20T00:00:00.000Z"
        );
    }

    #[test]
    fn iso_string_invalid() {
        assert!(iso_string(f64::NAN).is_none());
    }

    #[test]
    fn utc_string_format() {
        let t = utc(&[2016.0, 0.0, 1.0]);
        assert_eq!(utc_string(t), "Fri, 01 Jan 2016 00:00:00 GMT");
        assert_eq!(utc_string(f64::NAN), "Invalid Date");
    }

    #[test]
    fn offset_suffix_sign_is_inverted() {
        assert_eq!(offset_suffix(120), "-0200");
        assert_eq!(offset_suffix(0), "-0000");
        assert_eq!(offset_suffix(-330), "+0530");
        assert_eq!(offset_suffix(-45), "+0045");
    }

    #[test]
    fn date_and_time_strings() {
        let f = fields(utc(&[2000.0, 0.0, 1.0, 9.0, 5.0, 3.0])).unwrap();
        assert_eq!(date_string(&f), "Sat Jan 01 2000");
        assert_eq!(time_string(&f, 120), "09:05:03 GMT-0200");
    }
}
