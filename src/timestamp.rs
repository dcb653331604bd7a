use crate::error::{ParseError, Result};
use chrono::{DateTime, Utc};

/// Seconds from 1904-01-01T00:00:00Z to the Unix epoch.
pub const MAC_EPOCH_TO_UNIX: i64 = 2_082_844_800;

/// 1904-01-01T00:00:00Z plus `secs` seconds.
pub fn mac_epoch_to_utc(secs: u64) -> Result<DateTime<Utc>> {
    i64::try_from(secs)
        .ok()
        .and_then(|s| s.checked_sub(MAC_EPOCH_TO_UNIX))
        .and_then(|unix| DateTime::from_timestamp(unix, 0))
        .ok_or(ParseError::InvalidTimestamp { value: secs })
}

/// The inverse of [`mac_epoch_to_utc`], for instants not before 1904.
pub fn utc_to_mac_epoch(t: &DateTime<Utc>) -> Option<u64> {
    t.timestamp()
        .checked_add(MAC_EPOCH_TO_UNIX)
        .and_then(|s| u64::try_from(s).ok())
}
