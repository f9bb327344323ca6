use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    CallStarted,
    CallEnded,
    CallAnalyzed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub event: WebhookEventType,
    pub call: CallRecord,
}

/// Snapshot of one finished call as delivered by the voice platform.
///
/// The producer sends more fields than we model; anything unknown is ignored
/// on deserialize.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallRecord {
    pub call_id: String,
    pub agent_id: Option<String>,
    pub call_type: Option<String>,
    pub call_status: Option<String>,
    pub from_number: Option<String>,
    pub to_number: Option<String>,
    pub direction: Option<String>,
    pub start_timestamp: Option<i64>,
    pub end_timestamp: Option<i64>,
    pub duration_ms: Option<i64>,
    pub disconnection_reason: Option<String>,
    pub transcript: Option<String>,
    pub transcript_with_tool_calls: Option<Vec<ToolCallEntry>>,
    pub call_analysis: Option<CallAnalysis>,
}

impl CallRecord {
    /// String-valued entry from the custom analysis data, if any. The bag is
    /// produced by an LLM analysis pass, so every lookup is optional and
    /// non-string values are treated as absent.
    pub fn custom_analysis_value(&self, key: &str) -> Option<&str> {
        self.call_analysis
            .as_ref()?
            .custom_analysis_data
            .as_ref()?
            .get(key)?
            .as_str()
    }

    pub fn call_summary(&self) -> Option<String> {
        self.call_analysis
            .as_ref()
            .and_then(|a| a.call_summary.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallAnalysis {
    pub call_summary: Option<String>,
    pub user_sentiment: Option<String>,
    pub call_successful: Option<bool>,
    pub in_voicemail: Option<bool>,
    pub custom_analysis_data: Option<Map<String, Value>>,
}

/// One entry in the transcript-with-tool-calls trace. Plain utterances and
/// tool results share the shape; only invocations carry a tool name and
/// a JSON-encoded argument string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolCallEntry {
    #[serde(default)]
    pub role: String,
    pub name: Option<String>,
    pub arguments: Option<String>,
    pub tool_call_id: Option<String>,
    pub content: Option<String>,
}
