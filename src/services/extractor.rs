use crate::models::{CallRecord, CancelDetails, MeetingDetails, MeetingType, ToolCallEntry};
use crate::services::classifier::{AVAILABILITY_TOOL, TOOL_INVOCATION_ROLE};
use crate::services::datetime::parse_flexible_datetime;

pub const UNKNOWN_CALLER_NAME: &str = "Unknown Caller";
pub const UNKNOWN_CALLER_PHONE: &str = "Unknown";

/// Slots are one hour (10-11 morning or 1-2 afternoon); no variable-length
/// meetings are modeled.
const MEETING_DURATION_MINUTES: i32 = 60;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("no meeting datetime found")]
    MissingSchedule,

    #[error("could not parse datetime '{raw}'")]
    UnparseableSchedule { raw: String },

    #[error("no caller name or phone found")]
    MissingCallerIdentity,
}

/// Extract meeting details from custom analysis data, with a tool-call
/// fallback for the datetime.
pub fn extract_meeting_details(call: &CallRecord) -> Result<MeetingDetails, ExtractionError> {
    let (caller_name, caller_phone) = resolve_caller_identity(call)?;

    let raw_datetime = call
        .custom_analysis_value("meeting_datetime")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| {
            call.transcript_with_tool_calls
                .as_deref()
                .and_then(datetime_from_tool_calls)
        })
        .ok_or(ExtractionError::MissingSchedule)?;

    let dt = parse_flexible_datetime(&raw_datetime)
        .map_err(|_| ExtractionError::UnparseableSchedule { raw: raw_datetime })?;

    let meeting_type = call
        .custom_analysis_value("meeting_type")
        .map(MeetingType::parse)
        .unwrap_or(MeetingType::Phone);

    Ok(MeetingDetails {
        caller_name,
        caller_phone,
        meeting_type,
        date: dt.date(),
        time: dt.time(),
        duration_minutes: MEETING_DURATION_MINUTES,
        call_summary: call.call_summary(),
        call_id: call.call_id.clone(),
    })
}

/// Extract caller info for a cancellation, or the "old meeting" half of a
/// reschedule.
pub fn extract_cancel_details(call: &CallRecord) -> Result<CancelDetails, ExtractionError> {
    let (caller_name, caller_phone) = resolve_caller_identity(call)?;

    Ok(CancelDetails {
        caller_name,
        caller_phone,
        call_summary: call.call_summary(),
        call_id: call.call_id.clone(),
    })
}

/// Shared identity resolution. A caller we can neither name nor phone back
/// cannot be matched to anything, so that case fails here rather than
/// producing details full of sentinels.
fn resolve_caller_identity(call: &CallRecord) -> Result<(String, String), ExtractionError> {
    let caller_name = call
        .custom_analysis_value("caller_name")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_CALLER_NAME.to_string());

    let caller_phone = call
        .custom_analysis_value("caller_phone")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| call.from_number.clone().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| UNKNOWN_CALLER_PHONE.to_string());

    if caller_name == UNKNOWN_CALLER_NAME && caller_phone == UNKNOWN_CALLER_PHONE {
        tracing::error!(call_id = %call.call_id, "no caller info found");
        return Err(ExtractionError::MissingCallerIdentity);
    }

    Ok((caller_name, caller_phone))
}

/// Scan tool invocations for the selected meeting time. The agent passes the
/// chosen slot back to the availability tool as `date` and `time` arguments.
fn datetime_from_tool_calls(trace: &[ToolCallEntry]) -> Option<String> {
    for entry in trace {
        if entry.role != TOOL_INVOCATION_ROLE || entry.name.as_deref() != Some(AVAILABILITY_TOOL) {
            continue;
        }

        let raw_args = entry.arguments.as_deref().unwrap_or("{}");
        let Ok(args) = serde_json::from_str::<serde_json::Value>(raw_args) else {
            continue;
        };

        let date = args.get("date").and_then(|v| v.as_str()).unwrap_or("");
        let time = args.get("time").and_then(|v| v.as_str()).unwrap_or("");
        if !date.is_empty() && !time.is_empty() {
            return Some(format!("{date} {time}"));
        }
        if !date.is_empty() {
            return Some(date.to_string());
        }
    }

    None
}
