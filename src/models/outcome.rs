use serde::{Deserialize, Serialize};

/// The single classified business result of a call. The upstream analysis
/// pass emits these as string labels; `meeting_canceled` keeps the producer's
/// spelling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    MeetingBooked,
    #[serde(rename = "meeting_canceled")]
    MeetingCancelled,
    MeetingRescheduled,
    CallbackRequested,
    InfoOnly,
    NoConversation,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::MeetingBooked => "meeting_booked",
            CallOutcome::MeetingCancelled => "meeting_canceled",
            CallOutcome::MeetingRescheduled => "meeting_rescheduled",
            CallOutcome::CallbackRequested => "callback_requested",
            CallOutcome::InfoOnly => "info_only",
            CallOutcome::NoConversation => "no_conversation",
        }
    }

    /// Exact label match; anything else is the caller's problem to fall
    /// back from.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "meeting_booked" => Some(CallOutcome::MeetingBooked),
            "meeting_canceled" => Some(CallOutcome::MeetingCancelled),
            "meeting_rescheduled" => Some(CallOutcome::MeetingRescheduled),
            "callback_requested" => Some(CallOutcome::CallbackRequested),
            "info_only" => Some(CallOutcome::InfoOnly),
            "no_conversation" => Some(CallOutcome::NoConversation),
            _ => None,
        }
    }
}
