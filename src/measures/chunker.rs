//! Splits a requested interval into the sub-intervals fetched by one remote call each.

use crate::types::time_chunk::TimeChunk;
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use std::num::NonZeroU32;

/// Splits `[start, end)` into consecutive chunks of `duration_days`, the last one
/// clipped to `end`.
///
/// Both bounds are first truncated to whole seconds, the resolution they are
/// sent with. The chunks are ascending, contiguous and at least one second
/// long, and together cover exactly the truncated `[start, end)`. When that
/// interval is empty there is nothing to fetch and the result is empty.
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use std::num::NonZeroU32;
/// use wisconet::chunk;
///
/// let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// let end = start + TimeDelta::days(62);
/// let chunks = chunk(start, end, NonZeroU32::new(30).unwrap());
///
/// let days: Vec<i64> = chunks.iter().map(|c| c.duration().num_days()).collect();
/// assert_eq!(days, [30, 30, 2]);
/// ```
pub fn chunk(start: DateTime<Utc>, end: DateTime<Utc>, duration_days: NonZeroU32) -> Vec<TimeChunk> {
    let (start, end) = (start.trunc_subsecs(0), end.trunc_subsecs(0));
    if start >= end {
        return Vec::new();
    }

    let step = TimeDelta::days(i64::from(duration_days.get()));
    let mut chunks = Vec::with_capacity(chunk_count(start, end, duration_days));
    let mut chunk_start = start;
    while chunk_start < end {
        let chunk_end = chunk_start
            .checked_add_signed(step)
            .map_or(end, |stepped| stepped.min(end));
        chunks.push(TimeChunk::new(chunk_start, chunk_end));
        chunk_start = chunk_end;
    }
    chunks
}

/// `ceil((end - start) / duration_days)` over the second-truncated bounds, or
/// zero for an empty interval.
pub fn chunk_count(start: DateTime<Utc>, end: DateTime<Utc>, duration_days: NonZeroU32) -> usize {
    let (start, end) = (start.trunc_subsecs(0), end.trunc_subsecs(0));
    if start >= end {
        return 0;
    }
    let total = (end - start).num_seconds();
    let step = i64::from(duration_days.get()) * 86_400;
    let count = total / step + i64::from(total % step != 0);
    usize::try_from(count).unwrap_or(0)
}
