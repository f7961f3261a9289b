use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// Longest stretch of wall clock time a zone has ever skipped (Samoa, 2011-12-30).
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Resolves a wall clock time in `tz`.
///
/// Ambiguous times resolve to the earlier instant. Times skipped by a DST change resolve to
/// the first valid instant after the gap, so a local midnight that does not exist becomes
/// the start of that local day.
pub fn resolve_local(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    (0..=MAX_GAP_MINUTES)
        .filter_map(|minutes| local.checked_add_signed(TimeDelta::minutes(minutes)))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local))
}
