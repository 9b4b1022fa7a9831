//! UTC field composition and decomposition over `f64` time values.
//!
//! Time values are milliseconds since the epoch; NaN is the invalid instant.
//! Day numbers use proleptic Gregorian civil arithmetic, which covers the
//! full `±8.64e15` range (years -271821 to 275760).

/// Milliseconds in a day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Largest representable distance from the epoch, in either direction.
pub const MAX_TIME: f64 = 8.64e15;

// Any year past this is far outside MAX_TIME and cannot overflow below.
const MAX_YEAR_MAGNITUDE: f64 = 1e9;

/// A per-field accessor/mutator selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    /// Day of the month, 1-based.
    Date,
    /// Day of the week, 0 is Sunday. Read-only.
    Day,
    /// Four-digit year.
    FullYear,
    /// Hour of the day, 0-23.
    Hours,
    /// Millisecond of the second, 0-999.
    Milliseconds,
    /// Minute of the hour, 0-59.
    Minutes,
    /// Month of the year, 0 is January.
    Month,
    /// Second of the minute, 0-59.
    Seconds,
    /// Legacy year: full year minus 1900. Local view only.
    Year,
}

impl DateField {
    /// Every field, in accessor-table order.
    pub const ALL: [DateField; 9] = [
        DateField::Date,
        DateField::Day,
        DateField::FullYear,
        DateField::Hours,
        DateField::Milliseconds,
        DateField::Minutes,
        DateField::Month,
        DateField::Seconds,
        DateField::Year,
    ];
}

/// Calendar fields of a valid time value, read in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    /// Full year (may be negative or above 9999).
    pub year: i32,
    /// Month, 0-based.
    pub month: u32,
    /// Day of month, 1-based.
    pub date: u32,
    /// Day of week, 0 is Sunday.
    pub weekday: u32,
    /// Hour, 0-23.
    pub hours: u32,
    /// Minute, 0-59.
    pub minutes: u32,
    /// Second, 0-59.
    pub seconds: u32,
    /// Millisecond, 0-999.
    pub millis: u32,
}

/// Clamp to the representable range and drop the fractional part.
pub fn time_clip(t: f64) -> f64 {
    if !t.is_finite() || t.abs() > MAX_TIME {
        return f64::NAN;
    }
    // +0.0 turns a -0.0 result into +0.0
    t.trunc() + 0.0
}

/// Whether `year` is a Gregorian leap year.
pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in the 1-based `month` of `year`; zero for an out-of-range month.
pub fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since the epoch of a civil date, 1-based month.
pub fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let month = i64::from(month);
    let doy = (153 * (month + if month > 2 { -3 } else { 9 }) + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Civil date of a day number: `(year, 1-based month, day)`.
pub fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Read the UTC fields of `t`, or `None` for the invalid instant.
///
/// A local view may sit up to a day past the clipped range, so that much
/// slack is allowed.
pub fn fields(t: f64) -> Option<Fields> {
    if !t.is_finite() || t.abs() > MAX_TIME + MS_PER_DAY {
        return None;
    }
    let ms = t as i64;
    let days = ms.div_euclid(86_400_000);
    let rem = ms.rem_euclid(86_400_000);
    let (year, month, date) = civil_from_days(days);
    Some(Fields {
        year: i32::try_from(year).ok()?,
        month: month - 1,
        date,
        // 1970-01-01 was a Thursday
        weekday: (days + 4).rem_euclid(7) as u32,
        hours: (rem / 3_600_000) as u32,
        minutes: (rem % 3_600_000 / 60_000) as u32,
        seconds: (rem % 60_000 / 1_000) as u32,
        millis: (rem % 1_000) as u32,
    })
}

/// Whole days since the epoch.
pub fn day(t: f64) -> f64 {
    (t / MS_PER_DAY).floor()
}

/// Milliseconds since the start of the day containing `t`.
pub fn time_within_day(t: f64) -> f64 {
    t.rem_euclid(MS_PER_DAY)
}

/// Combine hour, minute, second and millisecond into a millisecond count.
///
/// Out-of-range components are accepted and carry over.
pub fn make_time(hour: f64, min: f64, sec: f64, ms: f64) -> f64 {
    if !(hour.is_finite() && min.is_finite() && sec.is_finite() && ms.is_finite()) {
        return f64::NAN;
    }
    hour.trunc() * 3_600_000.0 + min.trunc() * 60_000.0 + sec.trunc() * 1_000.0 + ms.trunc()
}

/// Day number (days since the epoch) of `year`/`month`/`date`.
///
/// `month` is 0-based and may overflow into neighbouring years; `date` may
/// overflow into neighbouring months.
pub fn make_day(year: f64, month: f64, date: f64) -> f64 {
    if !(year.is_finite() && month.is_finite() && date.is_finite()) {
        return f64::NAN;
    }
    let (y, m, dt) = (year.trunc(), month.trunc(), date.trunc());
    let ym = y + (m / 12.0).floor();
    if ym.abs() > MAX_YEAR_MAGNITUDE {
        return f64::NAN;
    }
    let mn = m.rem_euclid(12.0) as u32;
    let days = days_from_civil(ym as i64, mn + 1, 1);
    days as f64 + dt - 1.0
}

/// Combine a day number and a time-of-day into a time value.
pub fn make_date(day: f64, time: f64) -> f64 {
    if !(day.is_finite() && time.is_finite()) {
        return f64::NAN;
    }
    let tv = day * MS_PER_DAY + time;
    if tv.is_finite() {
        tv
    } else {
        f64::NAN
    }
}

/// Map the legacy two-digit years `0..=99` onto `1900..=1999`.
pub fn legacy_full_year(year: f64) -> f64 {
    if year.is_nan() {
        return year;
    }
    let yi = year.trunc();
    if (0.0..=99.0).contains(&yi) {
        1900.0 + yi
    } else {
        year
    }
}

/// Compose positional `year, month[, date, hours, minutes, seconds, ms]`
/// fields into an unclipped time value. Missing trailing fields default to
/// the first of the month at midnight.
pub fn compose(args: &[f64]) -> f64 {
    let Some(&year) = args.first() else {
        return f64::NAN;
    };
    let arg = |i: usize, default: f64| args.get(i).copied().unwrap_or(default);
    let day = make_day(legacy_full_year(year), arg(1, 0.0), arg(2, 1.0));
    let time = make_time(arg(3, 0.0), arg(4, 0.0), arg(5, 0.0), arg(6, 0.0));
    make_date(day, time)
}

/// The host's `UTC(year, month, ...)` routine.
///
/// Fewer than two fields yields NaN.
pub fn utc(args: &[f64]) -> f64 {
    if args.len() < 2 {
        return f64::NAN;
    }
    time_clip(compose(args))
}

/// Read one field of `t` in UTC. NaN for the invalid instant.
pub fn get_field(t: f64, field: DateField) -> f64 {
    let Some(f) = fields(t) else {
        return f64::NAN;
    };
    match field {
        DateField::Date => f64::from(f.date),
        DateField::Day => f64::from(f.weekday),
        DateField::FullYear => f64::from(f.year),
        DateField::Hours => f64::from(f.hours),
        DateField::Milliseconds => f64::from(f.millis),
        DateField::Minutes => f64::from(f.minutes),
        DateField::Month => f64::from(f.month),
        DateField::Seconds => f64::from(f.seconds),
        DateField::Year => f64::from(f.year) - 1900.0,
    }
}

/// Apply the host's setter semantics for `field` to the UTC fields of `t`.
///
/// `args` are the setter's positional arguments; trailing ones that are
/// absent keep the current field. Returns the unclipped new time value.
/// `FullYear` and `Year` start from time 0 when `t` is invalid; every other
/// field keeps the instant invalid.
pub fn set_field(t: f64, field: DateField, args: &[f64]) -> f64 {
    let Some(&first) = args.first() else {
        return f64::NAN;
    };
    let t = match field {
        DateField::FullYear | DateField::Year if t.is_nan() => 0.0,
        DateField::Year if first.is_nan() => return f64::NAN,
        DateField::Day => return f64::NAN,
        _ => t,
    };
    let Some(f) = fields(t) else {
        return f64::NAN;
    };
    let arg = |i: usize, current: u32| args.get(i).copied().unwrap_or(f64::from(current));

    match field {
        DateField::Milliseconds => make_date(
            day(t),
            make_time(f64::from(f.hours), f64::from(f.minutes), f64::from(f.seconds), first),
        ),
        DateField::Seconds => make_date(
            day(t),
            make_time(f64::from(f.hours), f64::from(f.minutes), first, arg(1, f.millis)),
        ),
        DateField::Minutes => make_date(
            day(t),
            make_time(f64::from(f.hours), first, arg(1, f.seconds), arg(2, f.millis)),
        ),
        DateField::Hours => make_date(
            day(t),
            make_time(first, arg(1, f.minutes), arg(2, f.seconds), arg(3, f.millis)),
        ),
        DateField::Date => make_date(
            make_day(f64::from(f.year), f64::from(f.month), first),
            time_within_day(t),
        ),
        DateField::Month => make_date(
            make_day(f64::from(f.year), first, arg(1, f.date)),
            time_within_day(t),
        ),
        DateField::FullYear => make_date(
            make_day(first, arg(1, f.month), arg(2, f.date)),
            time_within_day(t),
        ),
        DateField::Year => make_date(
            make_day(legacy_full_year(first), f64::from(f.month), f64::from(f.date)),
            time_within_day(t),
        ),
        DateField::Day => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2016-07-05T00:00:00Z
    const JUL_5_2016: f64 = 1_467_676_800_000.0;

    #[test]
    fn utc_epoch_and_modern_date() {
        assert_eq!(utc(&[1970.0, 0.0]), 0.0);
        assert_eq!(utc(&[2016.0, 6.0, 5.0]), JUL_5_2016);
        assert_eq!(utc(&[2016.0, 6.0, 5.0, 12.0, 30.0, 15.0, 250.0]), JUL_5_2016 + 45_015_250.0);
    }

    #[test]
    fn utc_needs_two_fields() {
        assert!(utc(&[2016.0]).is_nan());
        assert!(utc(&[]).is_nan());
        assert!(utc(&[f64::NAN, 0.0]).is_nan());
    }

    #[test]
    fn utc_maps_two_digit_years() {
        assert_eq!(utc(&[99.0, 0.0]), utc(&[1999.0, 0.0]));
        assert_eq!(utc(&[0.0, 0.0]), utc(&[1900.0, 0.0]));
        assert_ne!(utc(&[100.0, 0.0]), utc(&[2000.0, 0.0]));
    }

    #[test]
    fn month_overflow_rolls_years() {
        assert_eq!(utc(&[2015.0, 12.0, 1.0]), utc(&[2016.0, 0.0, 1.0]));
        assert_eq!(utc(&[2016.0, -1.0, 1.0]), utc(&[2015.0, 11.0, 1.0]));
    }

    #[test]
    fn time_clip_bounds() {
        assert_eq!(time_clip(8.2e15), 8.2e15);
        assert_eq!(time_clip(-8.2e15), -8.2e15);
        assert_eq!(time_clip(MAX_TIME), MAX_TIME);
        assert_eq!(time_clip(-MAX_TIME), -MAX_TIME);
        assert!(time_clip(MAX_TIME + 1.0).is_nan());
        assert!(time_clip(f64::INFINITY).is_nan());
        assert_eq!(time_clip(1.9), 1.0);
        assert_eq!(time_clip(-1.9), -1.0);
        assert!(time_clip(-0.0).is_sign_positive());
    }

    #[test]
    fn fields_read_utc() {
        let f = fields(JUL_5_2016 + 3_723_004.0).unwrap();
        assert_eq!(
            f,
            Fields {
                year: 2016,
                month: 6,
                date: 5,
                weekday: 2,
                hours: 1,
                minutes: 2,
                seconds: 3,
                millis: 4,
            }
        );
        assert!(fields(f64::NAN).is_none());
    }

    #[test]
    fn fields_before_epoch() {
        let f = fields(-1.0).unwrap();
        assert_eq!((f.year, f.month, f.date), (1969, 11, 31));
        assert_eq!((f.hours, f.minutes, f.seconds, f.millis), (23, 59, 59, 999));
    }

    #[test]
    fn fields_at_range_limits() {
        let last = fields(MAX_TIME).unwrap();
        assert_eq!((last.year, last.month, last.date), (275_760, 8, 13));
        assert_eq!(last.weekday, 6);
        let first = fields(-MAX_TIME).unwrap();
        assert_eq!((first.year, first.month, first.date), (-271_821, 3, 20));
        assert_eq!(first.weekday, 2);
        assert!(fields(MAX_TIME + 2.0 * MS_PER_DAY).is_none());
    }

    #[test]
    fn utc_composes_range_limits() {
        assert_eq!(utc(&[275_760.0, 8.0, 13.0]), MAX_TIME);
        assert_eq!(utc(&[-271_821.0, 3.0, 20.0]), -MAX_TIME);
        assert!(utc(&[275_760.0, 8.0, 13.0, 0.0, 0.0, 0.0, 1.0]).is_nan());
    }

    #[test]
    fn civil_days_agree_both_ways() {
        for days in [-719_468, -1, 0, 1, 11_016, 59, 60, 2_932_896] {
            let (y, m, d) = civil_from_days(days);
            assert_eq!(days_from_civil(y, m, d), days);
        }
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(11_016), (2000, 2, 29));
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2001, 13), 0);
    }

    #[test]
    fn set_date_rolls_over() {
        let jan_31 = utc(&[1999.0, 0.0, 31.0]);
        assert_eq!(set_field(jan_31, DateField::Date, &[32.0]), utc(&[1999.0, 1.0, 1.0]));
        assert_eq!(set_field(jan_31, DateField::Date, &[0.0]), utc(&[1998.0, 11.0, 31.0]));
    }

    #[test]
    fn set_date_leap_years() {
        let feb_2000 = utc(&[2000.0, 1.0, 1.0]);
        assert_eq!(get_field(set_field(feb_2000, DateField::Date, &[29.0]), DateField::Date), 29.0);
        let feb_2001 = utc(&[2001.0, 1.0, 1.0]);
        let rolled = set_field(feb_2001, DateField::Date, &[29.0]);
        assert_eq!(get_field(rolled, DateField::Date), 1.0);
        assert_eq!(get_field(rolled, DateField::Month), 2.0);
    }

    #[test]
    fn set_hours_with_trailing_fields() {
        let t = utc(&[2000.0, 0.0, 1.0, 10.0, 20.0, 30.0, 400.0]);
        assert_eq!(set_field(t, DateField::Hours, &[5.0]), utc(&[2000.0, 0.0, 1.0, 5.0, 20.0, 30.0, 400.0]));
        assert_eq!(set_field(t, DateField::Hours, &[5.0, 6.0, 7.0, 8.0]), utc(&[2000.0, 0.0, 1.0, 5.0, 6.0, 7.0, 8.0]));
        assert_eq!(set_field(t, DateField::Hours, &[24.0]), utc(&[2000.0, 0.0, 2.0, 0.0, 20.0, 30.0, 400.0]));
    }

    #[test]
    fn set_month_clamps_through_rollover() {
        let jan_31 = utc(&[2001.0, 0.0, 31.0]);
        // Feb 31 2001 rolls to Mar 3
        assert_eq!(set_field(jan_31, DateField::Month, &[1.0]), utc(&[2001.0, 2.0, 3.0]));
    }

    #[test]
    fn setters_keep_invalid_instant() {
        for field in [DateField::Date, DateField::Hours, DateField::Minutes, DateField::Month] {
            assert!(set_field(f64::NAN, field, &[1.0]).is_nan());
        }
    }

    #[test]
    fn full_year_restarts_invalid_instant() {
        assert_eq!(set_field(f64::NAN, DateField::FullYear, &[2000.0]), utc(&[2000.0, 0.0, 1.0]));
        assert_eq!(set_field(f64::NAN, DateField::Year, &[97.0]), utc(&[1997.0, 0.0, 1.0]));
        assert!(set_field(0.0, DateField::Year, &[f64::NAN]).is_nan());
    }

    #[test]
    fn day_is_not_settable() {
        assert!(set_field(0.0, DateField::Day, &[3.0]).is_nan());
    }

    #[test]
    fn empty_setter_args_are_nan() {
        assert!(set_field(0.0, DateField::Seconds, &[]).is_nan());
    }

    #[test]
    fn legacy_year_getter() {
        assert_eq!(get_field(utc(&[2012.0, 0.0]), DateField::Year), 112.0);
        assert!(get_field(f64::NAN, DateField::Year).is_nan());
    }
}
