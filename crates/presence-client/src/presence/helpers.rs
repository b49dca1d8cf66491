//! Utility helpers for the presence module.

use chrono::{SecondsFormat, Utc};

/// Current time as ISO 8601 with millisecond precision and a `Z` suffix,
/// e.g. `2024-05-01T09:00:00.000Z`.
pub(crate) fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_now_is_rfc3339_utc_millis() {
        let now = iso_now();
        assert!(now.ends_with('Z'));
        assert_eq!(now.len(), "2024-05-01T09:00:00.000Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
