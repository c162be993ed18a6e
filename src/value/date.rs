//! Date values
//!
//! An instant with millisecond precision, limited to ±8.64e15 ms around the
//! Unix epoch (±100,000,000 days), the range of the platform date type.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Largest representable distance from the epoch, in milliseconds
pub const MAX_DATE_MILLIS: i64 = 8_640_000_000_000_000;

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date(i64);

impl Date {
    /// Earliest representable instant
    pub const MIN: Date = Date(-MAX_DATE_MILLIS);

    /// Latest representable instant
    pub const MAX: Date = Date(MAX_DATE_MILLIS);

    /// The Unix epoch
    pub const EPOCH: Date = Date(0);

    /// Returns `None` outside `[MIN, MAX]`
    pub fn from_millis(millis: i64) -> Option<Self> {
        if (-MAX_DATE_MILLIS..=MAX_DATE_MILLIS).contains(&millis) {
            Some(Self(millis))
        } else {
            None
        }
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        // A clock outside the representable range saturates at the extremes
        Self::from_system_time(SystemTime::now()).unwrap_or(Self::MAX)
    }

    pub fn from_system_time(time: SystemTime) -> Option<Self> {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).ok()?,
            Err(before) => -i64::try_from(before.duration().as_millis()).ok()?,
        };
        Self::from_millis(millis)
    }

    /// `None` if the host clock cannot represent this instant
    pub fn to_system_time(self) -> Option<SystemTime> {
        let offset = Duration::from_millis(self.0.unsigned_abs());
        if self.0 >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }
}
