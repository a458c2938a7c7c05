//! `CalendarGateway` backed by the Google Calendar API.

use google_calendar::types::{OrderBy, SendUpdates};
use reschedule_core::{
    CalendarGateway, Event, EventQuery, RemoteCall, RescheduleError, RescheduleResult,
    TimeWindow,
};

use crate::AuthPaths;
use crate::app_config::Credentials;
use crate::authenticate::{self, Authorized};
use crate::convert::{FromGoogle, is_cancelled, rescheduled};
use crate::session::Session;

pub struct GoogleGateway {
    session: Session,
    credentials: Option<Credentials>,
}

impl GoogleGateway {
    /// Authorize (reusing, refreshing or granting a session) and connect.
    pub async fn connect(paths: &AuthPaths) -> RescheduleResult<Self> {
        let Authorized {
            session,
            credentials,
        } = authenticate::obtain(paths).await?;

        Ok(GoogleGateway {
            session,
            credentials,
        })
    }

    fn client(&self) -> google_calendar::Client {
        self.session.client(self.credentials.as_ref())
    }

    /// Non-cancelled single occurrences in `window`, in start order.
    async fn events_in(
        &self,
        call: RemoteCall,
        calendar_id: &str,
        window: &TimeWindow,
        text_filter: &str,
    ) -> RescheduleResult<Vec<Event>> {
        let time_min = window.start().to_rfc3339();
        let time_max = window.end().to_rfc3339();

        tracing::debug!(calendar_id, %time_min, %time_max, text_filter, "listing Google events");

        let response = self
            .client()
            .events()
            .list_all(
                calendar_id,
                "",                 // i_cal_uid
                0,                  // max_attendees
                OrderBy::StartTime, // order_by
                &[],                // private_extended_property
                text_filter,        // q
                &[],                // shared_extended_property
                false,              // show_deleted
                false,              // show_hidden_invitations
                true,               // single_events: expand recurring events
                &time_max,
                &time_min,
                "", // time_zone
                "", // updated_min
            )
            .await
            .map_err(|e| RescheduleError::remote(call, e))?;

        let events = response
            .body
            .into_iter()
            .filter(|e| !is_cancelled(e) && !e.id.is_empty())
            .filter_map(|e| match Event::from_google(e) {
                Ok(event) => Some(event),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping event without times");
                    None
                }
            })
            .collect();

        Ok(events)
    }
}

impl CalendarGateway for GoogleGateway {
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> RescheduleResult<Vec<Event>> {
        let filter = query.text_filter.as_deref().unwrap_or("");
        let events = self
            .events_in(RemoteCall::ListEvents, calendar_id, &query.window, filter)
            .await?;
        let events = first_n(events, query.max_results);

        tracing::debug!(count = events.len(), "listed events");
        Ok(events)
    }

    async fn has_overlap(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        exclude_event_id: Option<&str>,
    ) -> RescheduleResult<bool> {
        let events = self
            .events_in(RemoteCall::ConflictCheck, calendar_id, window, "")
            .await?;

        Ok(any_other(&events, exclude_event_id))
    }

    async fn patch_event_time(
        &self,
        calendar_id: &str,
        event_id: &str,
        window: &TimeWindow,
        time_zone: &str,
    ) -> RescheduleResult<Event> {
        tracing::info!(calendar_id, event_id, start = %window.start(), end = %window.end(), time_zone, "patching event time");

        let client = self.client();
        let current = client
            .events()
            .get(calendar_id, event_id, 0, "")
            .await
            .map_err(|e| RescheduleError::remote(RemoteCall::PatchEvent, e))?
            .body;

        let response = client
            .events()
            .patch(
                calendar_id,
                event_id,
                0,                 // conference_data_version
                0,                 // max_attendees
                false,             // send_notifications (deprecated)
                SendUpdates::None, // send_updates
                false,             // supports_attachments
                &rescheduled(current, window, time_zone),
            )
            .await
            .map_err(|e| RescheduleError::remote(RemoteCall::PatchEvent, e))?;

        Event::from_google(response.body)
            .map_err(|e| RescheduleError::remote(RemoteCall::PatchEvent, format!("{:#}", e)))
    }
}

/// Whether any event other than `exclude_event_id` is present.
fn any_other(events: &[Event], exclude_event_id: Option<&str>) -> bool {
    events
        .iter()
        .any(|e| Some(e.id.as_str()) != exclude_event_id)
}

/// Keep the first `max_results` events, which arrive in start order.
fn first_n(mut events: Vec<Event>, max_results: usize) -> Vec<Event> {
    events.truncate(max_results);
    events
}
