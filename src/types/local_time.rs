//! Conversion of station-local wall-clock times into UTC instants.
//!
//! Requests against the facade are phrased in the station's local time. Naive
//! inputs are placed in the station's zone; inputs that already carry an offset
//! are taken as the absolute instants they describe.

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc,
};
use chrono_tz::Tz;

/// Anything that can name an instant relative to a station's timezone.
pub trait StationLocalTime {
    /// Resolves `self` to a UTC instant, reading naive values as wall-clock time in `tz`.
    ///
    /// Returns `None` when `self` cannot be parsed.
    fn to_station_utc(self, tz: Tz) -> Option<DateTime<Utc>>;
}

/// Places a naive wall-clock time in `tz`.
///
/// A time repeated by a DST fall-back resolves to its first occurrence. A time
/// skipped by a spring-forward gap is read with the offset in force before the
/// gap, so 02:30 on a US spring-forward day becomes 03:30 daylight time.
pub fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let offset = (1..=48).find_map(|hours| {
                tz.offset_from_local_datetime(&(naive - TimeDelta::hours(hours)))
                    .earliest()
                    .map(|offset| offset.fix())
            })?;
            let utc = naive - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
            Some(Utc.from_utc_datetime(&utc))
        }
    }
}

impl StationLocalTime for NaiveDateTime {
    fn to_station_utc(self, tz: Tz) -> Option<DateTime<Utc>> {
        local_to_utc(self, tz)
    }
}

impl StationLocalTime for NaiveDate {
    fn to_station_utc(self, tz: Tz) -> Option<DateTime<Utc>> {
        local_to_utc(self.and_time(NaiveTime::MIN), tz)
    }
}

impl StationLocalTime for DateTime<Utc> {
    fn to_station_utc(self, _tz: Tz) -> Option<DateTime<Utc>> {
        Some(self)
    }
}

impl StationLocalTime for DateTime<Tz> {
    fn to_station_utc(self, _tz: Tz) -> Option<DateTime<Utc>> {
        Some(self.with_timezone(&Utc))
    }
}

impl StationLocalTime for DateTime<FixedOffset> {
    fn to_station_utc(self, _tz: Tz) -> Option<DateTime<Utc>> {
        Some(self.with_timezone(&Utc))
    }
}

impl StationLocalTime for &str {
    fn to_station_utc(self, tz: Tz) -> Option<DateTime<Utc>> {
        let s = self.trim();
        // Offsets in the string win over the station zone
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return naive.to_station_utc(tz);
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()?
            .to_station_utc(tz)
    }
}

impl StationLocalTime for String {
    fn to_station_utc(self, tz: Tz) -> Option<DateTime<Utc>> {
        self.as_str().to_station_utc(tz)
    }
}

impl StationLocalTime for &String {
    fn to_station_utc(self, tz: Tz) -> Option<DateTime<Utc>> {
        self.as_str().to_station_utc(tz)
    }
}
