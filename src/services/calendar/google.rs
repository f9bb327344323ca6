use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{CalendarError, CalendarEvent, CalendarProvider, EventBody, ListEventsParams};

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Cached access tokens are refreshed this close to their recorded expiry.
const EXPIRY_SKEW_SECONDS: i64 = 60;

/// Stored OAuth token blob, in the shape the token-generation tool writes
/// (and Python's google-auth library emits). `access_token` is accepted as
/// an alias for `token` on read.
#[derive(Debug, Clone, Deserialize)]
struct StoredToken {
    #[serde(default, alias = "access_token")]
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    client_secret: String,
    #[serde(default)]
    expiry: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Clone)]
struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

pub struct GoogleCalendarProvider {
    stored: StoredToken,
    access: Mutex<Option<AccessToken>>,
    client: reqwest::Client,
}

impl GoogleCalendarProvider {
    pub fn from_token_json(token_json: &str) -> Result<Self, CalendarError> {
        let stored: StoredToken = serde_json::from_str(token_json)?;

        // Reuse the stored access token until its recorded expiry.
        let access = match (&stored.token, &stored.expiry) {
            (token, Some(expiry)) if !token.is_empty() => {
                parse_expiry(expiry).map(|expires_at| AccessToken {
                    token: token.clone(),
                    expires_at,
                })
            }
            _ => None,
        };

        Ok(Self {
            stored,
            access: Mutex::new(access),
            client: reqwest::Client::new(),
        })
    }

    /// A usable bearer token, refreshed through the token endpoint when the
    /// cached one is missing or about to expire. The lock is held across the
    /// refresh so concurrent requests don't issue redundant refresh calls.
    async fn access_token(&self) -> Result<String, CalendarError> {
        let mut guard = self.access.lock().await;

        if let Some(access) = guard.as_ref() {
            if access.expires_at > Utc::now() + Duration::seconds(EXPIRY_SKEW_SECONDS) {
                return Ok(access.token.clone());
            }
        }

        let refreshed = self.refresh_access_token().await?;
        let token = refreshed.token.clone();
        *guard = Some(refreshed);
        tracing::info!("google OAuth token refreshed");

        Ok(token)
    }

    async fn refresh_access_token(&self) -> Result<AccessToken, CalendarError> {
        let refresh_token = self.stored.refresh_token.as_deref().ok_or_else(|| {
            CalendarError::RefreshFailed("no refresh token in stored credentials".to_string())
        })?;

        let resp = self
            .client
            .post(&self.stored.token_uri)
            .form(&[
                ("client_id", self.stored.client_id.as_str()),
                ("client_secret", self.stored.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body: serde_json::Value = resp.json().await?;
        if !status.is_success() {
            return Err(CalendarError::RefreshFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let token = body["access_token"]
            .as_str()
            .ok_or_else(|| {
                CalendarError::RefreshFailed("no access_token in response".to_string())
            })?
            .to_string();
        let expires_in = body["expires_in"].as_u64().unwrap_or(3600);

        Ok(AccessToken {
            token,
            expires_at: Utc::now() + Duration::seconds(expires_in as i64),
        })
    }
}

fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Deserialize)]
struct EventsListResponse {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

#[async_trait::async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    async fn insert_event(
        &self,
        calendar_id: &str,
        body: &EventBody,
    ) -> Result<CalendarEvent, CalendarError> {
        let token = self.access_token().await?;
        let url = format!("{API_BASE}/calendars/{calendar_id}/events");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CalendarError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        params: &ListEventsParams,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let token = self.access_token().await?;
        let url = format!("{API_BASE}/calendars/{calendar_id}/events");
        let max_results = params.max_results.to_string();

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("timeMin", params.time_min.as_str()),
                ("q", params.query.as_str()),
                ("maxResults", max_results.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CalendarError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EventsListResponse = resp.json().await?;
        Ok(body.items)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), CalendarError> {
        let token = self.access_token().await?;
        let url = format!("{API_BASE}/calendars/{calendar_id}/events/{event_id}");

        let resp = self.client.delete(&url).bearer_auth(&token).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CalendarError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_token_python_format() {
        let json = r#"{
            "token": "ya29.test-access-token",
            "refresh_token": "1//test-refresh",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_id": "12345.apps.googleusercontent.com",
            "client_secret": "secret",
            "scopes": ["https://www.googleapis.com/auth/calendar"],
            "expiry": "2026-03-01T12:00:00+00:00"
        }"#;

        let token: StoredToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.token, "ya29.test-access-token");
        assert_eq!(token.refresh_token.as_deref(), Some("1//test-refresh"));
        assert_eq!(token.client_id, "12345.apps.googleusercontent.com");
    }

    #[test]
    fn test_stored_token_access_token_alias_and_defaults() {
        let json = r#"{"access_token": "ya29.alias", "refresh_token": "1//r", "client_id": "c"}"#;
        let token: StoredToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.token, "ya29.alias");
        assert_eq!(token.token_uri, "https://oauth2.googleapis.com/token");
        assert!(token.expiry.is_none());
    }

    #[test]
    fn test_empty_blob_parses_but_carries_nothing() {
        let token: StoredToken = serde_json::from_str("{}").unwrap();
        assert!(token.token.is_empty());
        assert!(token.refresh_token.is_none());
    }

    #[test]
    fn test_parse_expiry() {
        assert!(parse_expiry("2026-03-01T12:00:00Z").is_some());
        assert!(parse_expiry("2026-03-01T12:00:00+00:00").is_some());
        assert!(parse_expiry("not a date").is_none());
    }

    #[tokio::test]
    async fn test_seeded_access_token_is_served_from_cache() {
        let expiry = (Utc::now() + Duration::hours(1)).to_rfc3339();
        let json = format!(
            r#"{{"token": "ya29.cached", "refresh_token": "1//r", "client_id": "c", "expiry": "{expiry}"}}"#
        );

        let provider = GoogleCalendarProvider::from_token_json(&json).unwrap();
        // No token endpoint is reachable in tests; a cache hit is the only
        // way this returns Ok.
        assert_eq!(provider.access_token().await.unwrap(), "ya29.cached");
    }

    #[tokio::test]
    async fn test_missing_refresh_token_fails_closed() {
        let provider = GoogleCalendarProvider::from_token_json(r#"{"token": "ya29.x"}"#).unwrap();
        let err = provider.access_token().await.unwrap_err();
        assert!(matches!(err, CalendarError::RefreshFailed(_)));
    }
}
