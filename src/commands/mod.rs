pub mod auth;
pub mod events;
pub mod reschedule;

use anyhow::Result;
use chrono::Utc;
use reschedule_core::{CalendarGateway, Event, EventQuery};
use reschedule_google::GoogleGateway;

use crate::config::Settings;
use crate::utils::tui::while_waiting;

/// Connect and fetch upcoming events, showing a spinner while the list call runs.
///
/// Any failure here is fatal: there is nothing to show without the list.
async fn load_upcoming(
    settings: &Settings,
    filter: Option<String>,
) -> Result<(GoogleGateway, Vec<Event>)> {
    let days_ahead = settings.checked_days_ahead()?;
    let gateway = GoogleGateway::connect(&settings.auth_paths()).await?;

    let query = EventQuery::upcoming(Utc::now(), days_ahead, filter, settings.max_results)?;

    let events = while_waiting(
        "Loading events...",
        gateway.list_events(&settings.calendar_id, &query),
    )
    .await?;

    Ok((gateway, events))
}
