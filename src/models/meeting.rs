use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingType {
    Video,
    Phone,
    InPerson,
}

impl MeetingType {
    /// Unrecognized input defaults to a phone call.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "video" => MeetingType::Video,
            "in-person" => MeetingType::InPerson,
            _ => MeetingType::Phone,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeetingType::Video => "Video Call",
            MeetingType::Phone => "Phone Call",
            MeetingType::InPerson => "In-Person Meeting",
        }
    }
}

/// Extracted and validated meeting details ready for calendar creation.
#[derive(Debug, Clone)]
pub struct MeetingDetails {
    pub caller_name: String,
    pub caller_phone: String,
    pub meeting_type: MeetingType,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: i32,
    pub call_summary: Option<String>,
    pub call_id: String,
}

impl MeetingDetails {
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start() + Duration::minutes(self.duration_minutes as i64)
    }
}

/// Just enough to locate an existing event for cancel or reschedule.
#[derive(Debug, Clone)]
pub struct CancelDetails {
    pub caller_name: String,
    pub caller_phone: String,
    pub call_summary: Option<String>,
    pub call_id: String,
}
