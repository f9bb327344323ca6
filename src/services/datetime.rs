use chrono::{NaiveDate, NaiveDateTime};

/// Formats the upstream analysis pass is known to emit, most common first.
/// Ambiguous input resolves to the first pattern that accepts it.
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M %p",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
];

#[derive(Debug, PartialEq, Eq)]
pub struct NoMatchingFormat {
    pub raw: String,
}

impl std::fmt::Display for NoMatchingFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no matching datetime format for: {}", self.raw)
    }
}

impl std::error::Error for NoMatchingFormat {}

/// Try each known format against the trimmed input and return the first
/// success. A bare date parses with the time defaulted to midnight.
pub fn parse_flexible_datetime(raw: &str) -> Result<NaiveDateTime, NoMatchingFormat> {
    let trimmed = raw.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    Err(NoMatchingFormat {
        raw: trimmed.to_string(),
    })
}
