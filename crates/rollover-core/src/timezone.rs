use crate::error::CoreError;
use crate::models::DueValue;
use chrono_tz::Tz;
use std::str::FromStr;

/// Parse an IANA timezone name
pub fn parse_timezone(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone)
        .map_err(|_| CoreError::InvalidTimezone(format!("Invalid timezone: {}", timezone)))
}

/// Validate IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<(), CoreError> {
    parse_timezone(timezone).map(|_| ())
}

/// Render a due value the way the user sees it locally.
///
/// Dates are shown as-is; instants are converted and tagged with the zone abbreviation.
pub fn format_due_local(due: &DueValue, timezone: &Tz) -> String {
    match due {
        DueValue::On(date) => date.format("%Y-%m-%d").to_string(),
        DueValue::At(at) => at.with_timezone(timezone).format("%Y-%m-%d %H:%M %Z").to_string(),
    }
}
