use chrono::{DateTime, FixedOffset};

/// Parse an `%aD`/`%cD` date such as `Tue, 3 Oct 2023 14:05:09 +0200`.
///
/// The original offset is kept so author-local time survives the round trip
/// through the store.
pub fn parse_log_date(text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc2822(text.trim())
}
