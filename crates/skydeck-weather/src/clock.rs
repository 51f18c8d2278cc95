//! Local-time resolution from provider UTC offsets.
//!
//! The offset lookup itself lives in [`crate::provider`]; callers convert a
//! failed lookup to `None` before reaching this module, so the snapshot
//! computation can never fail. A `None` offset means the location shows the
//! system wall clock, formatted identically to the offset path.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Timelike, Utc};

use crate::types::{TimeOfDay, TimeSnapshot};

/// 12-hour clock with AM/PM marker, e.g. "7:05 PM"
pub const CLOCK_FORMAT: &str = "%-I:%M %p";

/// Resolve the display time for one location.
///
/// With an offset, the location's local time is the current UTC instant
/// shifted by the offset (whole seconds east of UTC, may be negative).
/// Offsets outside the representable day range are treated as unavailable.
pub fn resolve_local_time(profile_id: i64, utc_offset_seconds: Option<i32>) -> TimeSnapshot {
    snapshot_at(profile_id, Utc::now(), Local::now(), utc_offset_seconds)
}

fn snapshot_at(
    profile_id: i64,
    now_utc: DateTime<Utc>,
    now_local: DateTime<Local>,
    utc_offset_seconds: Option<i32>,
) -> TimeSnapshot {
    let local: NaiveDateTime = utc_offset_seconds
        .and_then(FixedOffset::east_opt)
        .map(|tz| now_utc.with_timezone(&tz).naive_local())
        .unwrap_or_else(|| now_local.naive_local());

    TimeSnapshot {
        profile_id,
        clock: local.format(CLOCK_FORMAT).to_string(),
        time_of_day: TimeOfDay::from_hour(local.hour()),
    }
}
