pub mod call;
pub mod meeting;
pub mod outcome;

pub use call::{CallAnalysis, CallRecord, ToolCallEntry, WebhookEventType, WebhookPayload};
pub use meeting::{CancelDetails, MeetingDetails, MeetingType};
pub use outcome::CallOutcome;
