//! Timestamp resolution with a strict-format chain and a loose fallback.
//!
//! Log timestamps appear with or without a trailing timezone token depending
//! on who wrote the entry (the runtime's native logger appends one, our own
//! appended lines do too, rewritten lines may not), so the strict formats are
//! tried before any loose parsing to avoid misreading ambiguous strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Strict formats, tried in order. The first full match wins.
const EXPLICIT_FORMATS: &[&str] = &[
    // 02-Jan-2024 03:04:05 (native logger format, timezone token stripped)
    "%d-%b-%Y %H:%M:%S",
    // 2024-01-02 03:04:05
    "%Y-%m-%d %H:%M:%S",
];

/// Loose fallbacks for anything the strict chain rejects.
const FALLBACK_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S"];

const FALLBACK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y"];

/// Resolve a timestamp string to a UTC instant. Returns `None` when every
/// known format fails; never panics on garbage input.
pub fn resolve(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // Strict formats, with and without a trailing timezone token.
    let candidates = [Some(text), strip_timezone_token(text)];
    for candidate in candidates.into_iter().flatten() {
        for format in EXPLICIT_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(candidate, format) {
                return Some(naive.and_utc());
            }
        }
    }

    // Loose fallbacks, last resort.
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in FALLBACK_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    for format in FALLBACK_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Some(naive.and_utc());
            }
        }
    }

    None
}

/// Strip a trailing timezone abbreviation (`UTC`, `GMT`, ...) so the strict
/// formats can be retried. Only a short, all-alphabetic final token counts.
fn strip_timezone_token(text: &str) -> Option<&str> {
    let (head, tail) = text.rsplit_once(' ')?;
    if (1..=5).contains(&tail.len()) && tail.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(head.trim_end())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_native_format_with_timezone() {
        let resolved = resolve("02-Jan-2024 03:04:05 UTC").unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn test_native_format_without_timezone() {
        let resolved = resolve("02-Jan-2024 03:04:05").unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn test_iso_like_format() {
        let resolved = resolve("2024-06-01 12:30:00").unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_fallback() {
        let resolved = resolve("2024-06-01T12:30:00+02:00").unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_date_only_fallback_is_midnight() {
        let resolved = resolve("2024-03-01").unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_garbage_is_none() {
        assert!(resolve("internal function").is_none());
        assert!(resolve("").is_none());
        assert!(resolve("not a date at all 12345").is_none());
    }

    #[test]
    fn test_timezone_token_must_be_short_alpha() {
        // The trailing token here is not a timezone; stripping it must not
        // turn garbage into a parse.
        assert!(resolve("02-Jan-2024 03:04:05 NOTATIMEZONE").is_none());
    }
}
