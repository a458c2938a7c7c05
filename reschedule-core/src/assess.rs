//! Validation plus the gateway-backed conflict check, and the commit step.

use chrono::{DateTime, Utc};

use crate::error::{RemoteCall, RescheduleError, RescheduleResult};
use crate::event::Event;
use crate::gateway::CalendarGateway;
use crate::rules::BusinessRules;
use crate::validate::{ValidationResult, validate};
use crate::window::TimeWindow;

/// Outcome of checking one candidate window.
#[derive(Debug)]
pub struct Assessment {
    pub result: ValidationResult,
    /// Set when the conflict check itself failed; `result.conflict` is then
    /// `false` and the user decides without a conflict signal.
    pub conflict_warning: Option<RescheduleError>,
}

/// Validate `candidate` and ask the gateway whether it is occupied.
///
/// A failed conflict check is never an error here.
pub async fn assess<G: CalendarGateway>(
    gateway: &G,
    calendar_id: &str,
    moving_event_id: Option<&str>,
    candidate: &TimeWindow,
    now: DateTime<Utc>,
    rules: &BusinessRules,
) -> Assessment {
    let result = validate(candidate, now, rules);

    match gateway.has_overlap(calendar_id, candidate, moving_event_id).await {
        Ok(conflict) => Assessment {
            result: result.with_conflict(conflict),
            conflict_warning: None,
        },
        Err(err) => {
            tracing::warn!(error = %err, "conflict check failed");
            Assessment {
                result,
                conflict_warning: Some(as_remote(RemoteCall::ConflictCheck, err)),
            }
        }
    }
}

/// Patch the event to `candidate`. Failures come back as
/// `RemoteApi { call: PatchEvent }` so the caller can keep its state and retry.
pub async fn commit<G: CalendarGateway>(
    gateway: &G,
    calendar_id: &str,
    event_id: &str,
    candidate: &TimeWindow,
    time_zone: &str,
) -> RescheduleResult<Event> {
    gateway
        .patch_event_time(calendar_id, event_id, candidate, time_zone)
        .await
        .map_err(|err| match err {
            RescheduleError::RemoteApi { .. } => as_remote(RemoteCall::PatchEvent, err),
            other => other,
        })
}

fn as_remote(call: RemoteCall, err: RescheduleError) -> RescheduleError {
    match err {
        RescheduleError::RemoteApi { message, .. } => RescheduleError::RemoteApi { call, message },
        other => RescheduleError::remote(call, other),
    }
}
