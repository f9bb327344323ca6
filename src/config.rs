use std::env;

use chrono_tz::Tz;

/// All calendar events are created in this zone regardless of where the
/// caller is; the business runs on Hawaii time and quotes slots in it.
pub const OPERATING_TIMEZONE: Tz = chrono_tz::Pacific::Honolulu;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub retell_api_key: String,
    pub google_token_json: String,
    pub google_calendar_id: String,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            retell_api_key: env::var("RETELL_API_KEY").unwrap_or_default(),
            google_token_json: env::var("GOOGLE_TOKEN_JSON").unwrap_or_else(|_| "{}".to_string()),
            google_calendar_id: env::var("GOOGLE_CALENDAR_ID")
                .unwrap_or_else(|_| "primary".to_string()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()),
        }
    }

    /// Signature verification is skipped in development so local webhook
    /// replays don't need a signed payload.
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
