//! The host's real local-time offset, queried per instant.
//!
//! Offsets follow the `getTimezoneOffset` convention: minutes *behind* UTC,
//! so UTC-02:00 is `120` and UTC+01:00 is `-60`. The value is a function of
//! the instant because daylight saving moves it.

use chrono::{DateTime, Local, NaiveDateTime, Offset, TimeZone};

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: i64 = 60_000;

const MS_PER_DAY: i64 = 86_400_000;

/// Local-offset source for the oracle.
pub trait LocalZone: Send + Sync {
    /// Minutes behind UTC in effect at the given UTC instant.
    fn offset_at(&self, utc_ms: i64) -> i64;

    /// Minutes behind UTC for a local wall-clock time expressed as if it were
    /// UTC milliseconds.
    ///
    /// Ambiguous wall times resolve to the earlier instant. Wall times skipped
    /// by a forward jump use the offset in effect before the jump.
    fn offset_for_local(&self, local_ms: i64) -> i64 {
        // At most one transition is assumed within a day of the wall time.
        let before = self.offset_at(local_ms - MS_PER_DAY);
        let after = self.offset_at(local_ms + MS_PER_DAY);
        let fits = |offset: i64| self.offset_at(local_ms + offset * MS_PER_MINUTE) == offset;
        match (fits(before), fits(after)) {
            (true, true) => before.min(after),
            (true, false) => before,
            (false, true) => after,
            (false, false) => before,
        }
    }
}

/// The machine's configured timezone, through `chrono::Local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostZone;

fn naive_at(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

impl LocalZone for HostZone {
    fn offset_at(&self, utc_ms: i64) -> i64 {
        match naive_at(utc_ms) {
            Some(naive) => {
                let east = Local.offset_from_utc_datetime(&naive).fix().local_minus_utc();
                -i64::from(east) / 60
            }
            None => 0,
        }
    }

    fn offset_for_local(&self, local_ms: i64) -> i64 {
        let Some(naive) = naive_at(local_ms) else {
            return 0;
        };
        match Local.offset_from_local_datetime(&naive).earliest() {
            Some(offset) => -i64::from(offset.fix().local_minus_utc()) / 60,
            // Skipped wall time (spring forward): use the offset before the gap.
            None => self.offset_at(local_ms - MS_PER_DAY),
        }
    }
}

/// Scripted zone for deterministic tests, including DST-style transitions.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Clone)]
pub struct MockZone {
    base: i64,
    transitions: Vec<(i64, i64)>,
}

#[cfg(any(test, feature = "test-seams"))]
impl MockZone {
    /// A zone with one offset for all instants.
    pub fn fixed(offset_minutes: i64) -> Self {
        Self {
            base: offset_minutes,
            transitions: Vec::new(),
        }
    }

    /// Switch to `offset_minutes` from the UTC instant `at_ms` onwards.
    pub fn with_transition(mut self, at_ms: i64, offset_minutes: i64) -> Self {
        self.transitions.push((at_ms, offset_minutes));
        self.transitions.sort_by_key(|&(at, _)| at);
        self
    }

    /// A US-Eastern-like zone for 2021: UTC-5 in winter, UTC-4 from
    /// 2021-03-14T07:00Z until 2021-11-07T06:00Z.
    pub fn eastern_2021() -> Self {
        Self::fixed(300)
            .with_transition(1_615_705_200_000, 240)
            .with_transition(1_636_264_800_000, 300)
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl LocalZone for MockZone {
    fn offset_at(&self, utc_ms: i64) -> i64 {
        self.transitions
            .iter()
            .rev()
            .find(|&&(at, _)| at <= utc_ms)
            .map_or(self.base, |&(_, offset)| offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_15_2021: i64 = 1_610_668_800_000;
    const JUL_15_2021: i64 = 1_626_307_200_000;

    #[test]
    fn fixed_mock_zone_is_constant() {
        let zone = MockZone::fixed(120);
        assert_eq!(zone.offset_at(0), 120);
        assert_eq!(zone.offset_at(JUL_15_2021), 120);
        assert_eq!(zone.offset_for_local(JUL_15_2021), 120);
    }

    #[test]
    fn transitions_change_offset_per_instant() {
        let zone = MockZone::eastern_2021();
        assert_eq!(zone.offset_at(JAN_15_2021), 300);
        assert_eq!(zone.offset_at(JUL_15_2021), 240);
        assert_eq!(zone.offset_at(1_636_264_800_000), 300);
    }

    #[test]
    fn local_wall_time_resolves_across_transition() {
        let zone = MockZone::eastern_2021();
        // 2021-03-14T12:00 local is after the jump, so EDT applies
        let noon_local = 1_615_723_200_000;
        assert_eq!(zone.offset_for_local(noon_local), 240);
        // 2021-03-14T01:00 local is before it
        let one_am_local = 1_615_683_600_000;
        assert_eq!(zone.offset_for_local(one_am_local), 300);
    }

    #[test]
    fn skipped_wall_time_uses_offset_before_jump() {
        let zone = MockZone::eastern_2021();
        // 2021-03-14T02:30 local never happens
        let skipped = 1_615_689_000_000;
        assert_eq!(zone.offset_for_local(skipped), 300);
    }

    #[test]
    fn repeated_wall_time_uses_earlier_instant() {
        let zone = MockZone::eastern_2021();
        // 2021-11-07T01:30 local happens in EDT and again in EST
        let repeated = 1_636_248_600_000;
        assert_eq!(zone.offset_for_local(repeated), 240);
        // 2021-11-07T03:00 local is unambiguous
        assert_eq!(zone.offset_for_local(repeated + 5_400_000), 300);
    }

    #[test]
    fn host_zone_round_trips_its_own_offset() {
        let zone = HostZone;
        let offset = zone.offset_at(JAN_15_2021);
        let local = JAN_15_2021 - offset * MS_PER_MINUTE;
        assert_eq!(zone.offset_for_local(local), offset);
    }
}
