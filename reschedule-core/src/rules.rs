//! Business constraints applied to a proposed reschedule.

use serde::{Deserialize, Serialize};

use crate::error::{RescheduleError, RescheduleResult};

pub const DEFAULT_MIN_NOTICE_HOURS: f64 = 24.0;
pub const DEFAULT_BUSINESS_HOURS_START: u32 = 9;
pub const DEFAULT_BUSINESS_HOURS_END: u32 = 17;

/// Upper bound on the notice period (about a century).
pub const MAX_MIN_NOTICE_HOURS: f64 = 876_000.0;

/// Minimum notice and business-hour range. Construct with [`BusinessRules::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BusinessRules {
    min_notice_hours: f64,
    business_hours_start: u32,
    business_hours_end: u32,
}

impl BusinessRules {
    pub fn new(
        min_notice_hours: f64,
        business_hours_start: u32,
        business_hours_end: u32,
    ) -> RescheduleResult<Self> {
        if !min_notice_hours.is_finite() || min_notice_hours < 0.0 {
            return Err(RescheduleError::InvalidConfiguration(format!(
                "minimum notice must be a non-negative number of hours, got {}",
                min_notice_hours
            )));
        }
        if min_notice_hours > MAX_MIN_NOTICE_HOURS {
            return Err(RescheduleError::InvalidConfiguration(format!(
                "minimum notice must be at most {} hours, got {}",
                MAX_MIN_NOTICE_HOURS, min_notice_hours
            )));
        }
        if business_hours_start > 23 || business_hours_end > 23 {
            return Err(RescheduleError::InvalidConfiguration(format!(
                "business hours must be between 0 and 23, got {}–{}",
                business_hours_start, business_hours_end
            )));
        }
        if business_hours_start >= business_hours_end {
            return Err(RescheduleError::InvalidConfiguration(format!(
                "business hours start ({}) must be before end ({})",
                business_hours_start, business_hours_end
            )));
        }

        Ok(BusinessRules {
            min_notice_hours,
            business_hours_start,
            business_hours_end,
        })
    }

    pub fn min_notice_hours(&self) -> f64 {
        self.min_notice_hours
    }

    pub fn business_hours_start(&self) -> u32 {
        self.business_hours_start
    }

    pub fn business_hours_end(&self) -> u32 {
        self.business_hours_end
    }

    /// The minimum notice as a duration, to the second.
    pub fn min_notice(&self) -> chrono::Duration {
        chrono::Duration::seconds((self.min_notice_hours * 3600.0).round() as i64)
    }

    pub fn within_business_hours(&self, hour: u32) -> bool {
        self.business_hours_start <= hour && hour < self.business_hours_end
    }
}

impl Default for BusinessRules {
    fn default() -> Self {
        BusinessRules {
            min_notice_hours: DEFAULT_MIN_NOTICE_HOURS,
            business_hours_start: DEFAULT_BUSINESS_HOURS_START,
            business_hours_end: DEFAULT_BUSINESS_HOURS_END,
        }
    }
}

/// What a detected conflict does to the commit action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Show a warning but still allow the commit.
    #[default]
    Warn,
    /// Refuse to commit into an occupied window.
    Block,
}
