use chrono::{SecondsFormat, Utc};

use crate::config::OPERATING_TIMEZONE;
use crate::models::{CancelDetails, MeetingDetails};
use crate::services::calendar::{
    CalendarError, CalendarEvent, CalendarProvider, EventBody, EventTime, ListEventsParams,
    ReminderOverride, Reminders,
};

/// Upper bound on the fuzzy-match search; the provider returns future single
/// occurrences ordered by start time.
const MATCH_SEARCH_LIMIT: u32 = 50;

const REMINDER_MINUTES: u32 = 30;

/// Build the provider event payload for a booked meeting.
pub fn build_event_body(meeting: &MeetingDetails) -> EventBody {
    let start = meeting.start();
    let end = meeting.end();
    let type_label = meeting.meeting_type.label();

    let mut description_parts = vec![
        format!("Client: {}", meeting.caller_name),
        format!("Phone: {}", meeting.caller_phone),
        format!("Meeting Type: {type_label}"),
        format!("Call ID: {}", meeting.call_id),
    ];
    if let Some(summary) = &meeting.call_summary {
        description_parts.push(format!("\nCall Summary:\n{summary}"));
    }

    EventBody {
        summary: format!(
            "Discovery Meeting - {} ({type_label})",
            meeting.caller_name
        ),
        description: description_parts.join("\n"),
        start: EventTime {
            date_time: start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time_zone: OPERATING_TIMEZONE.name().to_string(),
        },
        end: EventTime {
            date_time: end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time_zone: OPERATING_TIMEZONE.name().to_string(),
        },
        reminders: Reminders {
            use_default: false,
            overrides: vec![ReminderOverride {
                method: "popup".to_string(),
                minutes: REMINDER_MINUTES,
            }],
        },
    }
}

/// Create a calendar event for the booked meeting. Provider errors are
/// logged with the originating call and re-raised; a booking that silently
/// never reaches the calendar is a business defect.
pub async fn handle_meeting_booked(
    calendar: &dyn CalendarProvider,
    calendar_id: &str,
    meeting: &MeetingDetails,
) -> Result<CalendarEvent, CalendarError> {
    tracing::info!(
        caller = %meeting.caller_name,
        date = %meeting.date,
        time = %meeting.time,
        "creating calendar event"
    );

    let body = build_event_body(meeting);
    let event = calendar
        .insert_event(calendar_id, &body)
        .await
        .map_err(|e| {
            tracing::error!(call_id = %meeting.call_id, error = %e, "failed to create calendar event");
            e
        })?;

    tracing::info!(
        call_id = %meeting.call_id,
        link = event.html_link.as_deref().unwrap_or("no link"),
        "calendar event created"
    );

    Ok(event)
}

/// Find and delete the caller's existing calendar event. A caller with no
/// discoverable event is not a failure; the request just logs and completes.
pub async fn handle_meeting_cancelled(
    calendar: &dyn CalendarProvider,
    calendar_id: &str,
    details: &CancelDetails,
) -> Result<(), CalendarError> {
    tracing::info!(caller = %details.caller_name, "cancelling meeting");

    let deleted = delete_matching_event(calendar, calendar_id, details)
        .await
        .map_err(|e| {
            tracing::error!(call_id = %details.call_id, error = %e, "failed to cancel meeting");
            e
        })?;

    match deleted {
        Some(event) => {
            tracing::info!(caller = %details.caller_name, summary = %event.summary, "meeting cancelled");
        }
        None => {
            tracing::warn!(
                caller = %details.caller_name,
                phone = %details.caller_phone,
                "no matching event found to cancel"
            );
        }
    }

    Ok(())
}

/// Delete the old event and create a new one at the updated time. The two
/// steps are independent; a missing old event never blocks the new booking.
pub async fn handle_meeting_rescheduled(
    calendar: &dyn CalendarProvider,
    calendar_id: &str,
    cancel: &CancelDetails,
    new_meeting: &MeetingDetails,
) -> Result<CalendarEvent, CalendarError> {
    tracing::info!(
        caller = %cancel.caller_name,
        date = %new_meeting.date,
        time = %new_meeting.time,
        "rescheduling meeting"
    );

    let deleted = delete_matching_event(calendar, calendar_id, cancel)
        .await
        .map_err(|e| {
            tracing::error!(call_id = %cancel.call_id, error = %e, "failed to reschedule meeting");
            e
        })?;

    match deleted {
        Some(event) => tracing::info!(summary = %event.summary, "old event deleted"),
        None => {
            tracing::warn!(
                caller = %cancel.caller_name,
                "no existing event found, creating new event anyway"
            );
        }
    }

    handle_meeting_booked(calendar, calendar_id, new_meeting).await
}

async fn delete_matching_event(
    calendar: &dyn CalendarProvider,
    calendar_id: &str,
    details: &CancelDetails,
) -> Result<Option<CalendarEvent>, CalendarError> {
    let Some(event) = find_event_by_caller(
        calendar,
        calendar_id,
        &details.caller_name,
        &details.caller_phone,
    )
    .await?
    else {
        return Ok(None);
    };

    calendar.delete_event(calendar_id, &event.id).await?;
    Ok(Some(event))
}

/// Best-effort search for a caller's upcoming event. No stable identifier
/// exists between the voice platform and the calendar, so this matches the
/// name against summaries and the phone number against descriptions, first
/// with the name as the search term and then with the phone number. The
/// first hit in provider order wins; two callers sharing a phone-number
/// substring can collide.
pub async fn find_event_by_caller(
    calendar: &dyn CalendarProvider,
    calendar_id: &str,
    caller_name: &str,
    caller_phone: &str,
) -> Result<Option<CalendarEvent>, CalendarError> {
    let time_min = Utc::now()
        .with_timezone(&OPERATING_TIMEZONE)
        .to_rfc3339_opts(SecondsFormat::Secs, false);

    let by_name = calendar
        .list_events(
            calendar_id,
            &ListEventsParams {
                time_min: time_min.clone(),
                query: caller_name.to_string(),
                max_results: MATCH_SEARCH_LIMIT,
            },
        )
        .await?;

    let name_lower = caller_name.to_lowercase();
    for event in by_name {
        if event.summary.to_lowercase().contains(&name_lower)
            || event.description.contains(caller_phone)
        {
            return Ok(Some(event));
        }
    }

    let by_phone = calendar
        .list_events(
            calendar_id,
            &ListEventsParams {
                time_min,
                query: caller_phone.to_string(),
                max_results: MATCH_SEARCH_LIMIT,
            },
        )
        .await?;

    for event in by_phone {
        if event.description.contains(caller_phone) {
            return Ok(Some(event));
        }
    }

    Ok(None)
}
