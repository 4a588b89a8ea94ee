use rollover_core::error::CoreError;
use rollover_core::timezone::validate_timezone;

/// Detect system timezone
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        let tz = tz.trim_start_matches(':');
        if !tz.is_empty() && validate_timezone(tz).is_ok() {
            return tz.to_string();
        }
    }

    if let Ok(tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    // Fallback to UTC
    "UTC".to_string()
}

/// Get common timezones for suggestions
pub fn get_common_timezones() -> Vec<&'static str> {
    vec![
        "UTC",
        "America/New_York",
        "America/Chicago",
        "America/Denver",
        "America/Los_Angeles",
        "America/Toronto",
        "America/Sao_Paulo",
        "Europe/London",
        "Europe/Paris",
        "Europe/Berlin",
        "Europe/Madrid",
        "Asia/Tokyo",
        "Asia/Shanghai",
        "Asia/Kolkata",
        "Asia/Singapore",
        "Asia/Dubai",
        "Australia/Sydney",
        "Pacific/Auckland",
        "Pacific/Honolulu",
    ]
}

/// Suggest similar timezone for invalid input
pub fn suggest_timezone(invalid: &str) -> Vec<&'static str> {
    let invalid_lower = invalid.to_lowercase();

    let mut matches: Vec<_> = get_common_timezones()
        .into_iter()
        .filter(|tz| {
            let tz_lower = tz.to_lowercase();
            tz_lower.contains(&invalid_lower)
                || invalid_lower.contains(&tz_lower)
                || tz.split('/').any(|part| part.to_lowercase().contains(&invalid_lower))
        })
        .collect();

    matches.truncate(5);
    matches
}

/// Common abbreviations and city shorthands mapped to IANA names.
///
/// Checked before a direct parse: chrono-tz also knows legacy fixed-offset
/// zones such as `EST` and `CET`, which ignore daylight saving time.
fn abbreviation_to_iana(input: &str) -> Option<&'static str> {
    let name = match input.to_lowercase().as_str() {
        "est" | "edt" | "eastern" => "America/New_York",
        "cst" | "cdt" | "central" => "America/Chicago",
        "mst" | "mdt" | "mountain" => "America/Denver",
        "pst" | "pdt" | "pacific" => "America/Los_Angeles",
        "gmt" | "utc" | "z" => "UTC",
        "bst" | "london" => "Europe/London",
        "cet" | "cest" | "paris" => "Europe/Paris",
        "jst" | "tokyo" => "Asia/Tokyo",
        _ => return None,
    };
    Some(name)
}

/// Convert user-friendly timezone input to IANA name
pub fn normalize_timezone_input(input: &str) -> Result<String, CoreError> {
    let input = input.trim();
    if let Some(normalized) = abbreviation_to_iana(input) {
        validate_timezone(normalized)?;
        return Ok(normalized.to_string());
    }

    if validate_timezone(input).is_ok() {
        return Ok(input.to_string());
    }

    let suggestions = suggest_timezone(input);
    if suggestions.is_empty() {
        Err(CoreError::InvalidTimezone(format!(
            "Unknown timezone '{}'. Use standard IANA names like 'America/New_York'",
            input
        )))
    } else {
        Err(CoreError::InvalidTimezone(format!(
            "Unknown timezone '{}'. Did you mean: {}?",
            input,
            suggestions.join(", ")
        )))
    }
}
