//! Wall-clock to remote-write timestamp conversion.

use chrono::{DateTime, Utc};

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Converts a wall-clock time to milliseconds since the Unix epoch.
///
/// The sub-second part is rounded to the nearest millisecond (half up)
/// instead of truncated, so `.1235s` contributes 124ms. A fraction that
/// rounds up to 1000ms carries into the next second.
pub fn to_epoch_millis(t: DateTime<Utc>) -> i64 {
    // timestamp() floors, so subsec nanos are always non-negative
    let secs = t.timestamp();
    let nanos = i64::from(t.timestamp_subsec_nanos());
    let millis = (nanos + NANOS_PER_MILLI / 2) / NANOS_PER_MILLI;
    secs * 1000 + millis
}
