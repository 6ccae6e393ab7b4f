//! Day/night resolution in the *observed location's* local time.
//!
//! The weather provider reports sunrise/sunset as UTC epoch seconds plus a
//! per-location UTC offset. Folding the offset into the timestamp before
//! extracting the hour keeps the result independent of whatever timezone the
//! machine running this code happens to be in.

use chrono::Utc;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;

/// Sunrise/sunset timestamps and UTC offset for one location, as reported by
/// the provider (`timezone` + `sys.sunrise` / `sys.sunset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    /// Signed offset between the location's local time and UTC, in seconds.
    /// Not necessarily a whole number of hours.
    pub utc_offset_seconds: i64,
    /// Sunrise at the location, UTC epoch seconds.
    pub sunrise_epoch_seconds: i64,
    /// Sunset at the location, UTC epoch seconds.
    pub sunset_epoch_seconds: i64,
}

/// Result of [`resolve`]: hours-of-day in the location's local time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalDayTime {
    pub sunrise_hour: u32,
    pub sunset_hour: u32,
    pub current_local_hour: u32,
    pub is_night: bool,
}

/// Hour-of-day (0..=23) of an epoch-seconds value interpreted as UTC.
///
/// Euclidean remainder keeps pre-1970 timestamps in range too.
#[must_use]
pub fn hour_of_day(epoch_seconds: i64) -> u32 {
    (epoch_seconds.rem_euclid(SECONDS_PER_DAY) / SECONDS_PER_HOUR) as u32
}

/// Resolve day/night for `snapshot` against the current wall clock.
///
/// A missing snapshot (data not fetched yet) yields the zero-valued result
/// rather than an error, so callers never have to guard the initial-load
/// window. Never panics.
#[must_use]
pub fn resolve(snapshot: Option<&SunTimes>) -> LocalDayTime {
    resolve_at(snapshot, Utc::now().timestamp())
}

/// Deterministic variant of [`resolve`] with the clock supplied by the caller.
///
/// Night is boundary-inclusive on both ends: the sunset hour is already
/// night, the sunrise hour is already day. The comparison assumes sunrise
/// precedes sunset within the same local day. If a window ever inverts
/// (conceivable near the poles) the flag comes out wrong. Callers picking
/// themes from the flag depend on that exact behavior, so tests pin it
/// instead of correcting it.
#[must_use]
pub fn resolve_at(snapshot: Option<&SunTimes>, now_epoch_seconds: i64) -> LocalDayTime {
    let offset = snapshot.map_or(0, |s| s.utc_offset_seconds);

    let sunrise_hour = snapshot.map_or(0, |s| hour_of_day(s.sunrise_epoch_seconds + offset));
    let sunset_hour = snapshot.map_or(0, |s| hour_of_day(s.sunset_epoch_seconds + offset));
    let current_local_hour = hour_of_day(now_epoch_seconds + offset);

    let is_night = current_local_hour >= sunset_hour || current_local_hour < sunrise_hour;

    LocalDayTime { sunrise_hour, sunset_hour, current_local_hour, is_night }
}
