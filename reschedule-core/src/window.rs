//! Start/end instant pairs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RescheduleError, RescheduleResult};

/// A span of time with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> RescheduleResult<Self> {
        if end <= start {
            return Err(RescheduleError::InvalidWindow(
                "end time must be after start time".into(),
            ));
        }
        Ok(TimeWindow { start, end })
    }

    /// Window of `duration` starting at `start`.
    pub fn starting_at(start: DateTime<Utc>, duration: Duration) -> RescheduleResult<Self> {
        let end = start.checked_add_signed(duration).ok_or_else(|| {
            RescheduleError::InvalidWindow(format!("duration {} is too long", duration))
        })?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap: windows that merely touch do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}
