pub mod google;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("calendar API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("invalid stored token: {0}")]
    Token(#[from] serde_json::Error),
}

/// Event payload sent to the provider on insert.
#[derive(Debug, Clone, Serialize)]
pub struct EventBody {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    pub reminders: Reminders,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// Local wall-clock time without offset; `time_zone` carries the zone.
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

/// An event as returned by the provider. Owned entirely by the calendar;
/// never persisted locally beyond the lifetime of one request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    pub html_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: Option<String>,
    /// All-day events carry a bare date instead.
    pub date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListEventsParams {
    /// RFC 3339 lower bound; only events starting at or after this moment.
    pub time_min: String,
    /// Provider-side full-text query.
    pub query: String,
    pub max_results: u32,
}

/// The calendar collaborator. Listing returns future single occurrences
/// ordered by start time, matching the search shape the reconciler needs.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn insert_event(
        &self,
        calendar_id: &str,
        body: &EventBody,
    ) -> Result<CalendarEvent, CalendarError>;

    async fn list_events(
        &self,
        calendar_id: &str,
        params: &ListEventsParams,
    ) -> Result<Vec<CalendarEvent>, CalendarError>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), CalendarError>;
}
