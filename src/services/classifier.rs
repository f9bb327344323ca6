use crate::models::{CallOutcome, CallRecord};

/// Tool the voice agent calls to look up open slots. Its presence in the
/// trace is treated as booking intent even without explicit confirmation.
pub const AVAILABILITY_TOOL: &str = "check_available_dates";

pub const TOOL_INVOCATION_ROLE: &str = "tool_call_invocation";

/// Determine the call outcome from custom analysis data, with fallbacks.
///
/// The upstream label is advisory (LLM-generated), so this degrades through
/// progressively weaker signals instead of failing: explicit label, then
/// availability-tool usage, then the success flag, then `no_conversation`.
pub fn classify_outcome(call: &CallRecord) -> CallOutcome {
    if let Some(raw) = call.custom_analysis_value("call_outcome") {
        match CallOutcome::parse(raw) {
            Some(outcome) => return outcome,
            None => {
                tracing::warn!(call_id = %call.call_id, value = raw, "unknown call_outcome value");
            }
        }
    }

    if let Some(trace) = &call.transcript_with_tool_calls {
        let checked_availability = trace.iter().any(|entry| {
            entry.role == TOOL_INVOCATION_ROLE && entry.name.as_deref() == Some(AVAILABILITY_TOOL)
        });
        if checked_availability {
            return CallOutcome::MeetingBooked;
        }
    }

    if call
        .call_analysis
        .as_ref()
        .and_then(|a| a.call_successful)
        .unwrap_or(false)
    {
        return CallOutcome::InfoOnly;
    }

    CallOutcome::NoConversation
}
