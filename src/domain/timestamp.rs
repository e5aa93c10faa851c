// Source timestamp parsing and local-zone rendering
use super::error::MalformedPayloadError;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use chrono_tz::Tz;

const SOURCE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DISPLAY_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Zone used to render timestamps. Picked once at start-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayZone {
    /// Whatever zone the host is configured with
    Host,
    Named(Tz),
}

impl DisplayZone {
    pub fn render(&self, instant: DateTime<Utc>) -> String {
        match self {
            DisplayZone::Host => instant.with_timezone(&Local).format(DISPLAY_FORMAT).to_string(),
            DisplayZone::Named(tz) => instant.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DisplayZone::Host => "host local",
            DisplayZone::Named(tz) => tz.name(),
        }
    }
}

/// Parses `YYYY-MM-DDTHH:MM:SSZ`. Fractional seconds and offsets are rejected.
pub fn parse_utc(value: &str) -> Result<DateTime<Utc>, MalformedPayloadError> {
    NaiveDateTime::parse_from_str(value, SOURCE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| MalformedPayloadError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_utc() {
        let parsed = parse_utc("2024-03-01T12:34:56Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 12, 34, 56).unwrap());
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(parse_utc("2024-03-01T12:34:56.250Z").is_err());
        assert!(parse_utc("2024-03-01 12:34:56").is_err());
        assert!(parse_utc("yesterday").is_err());
    }

    #[test]
    fn test_render_named_zone_with_dst() {
        let zone = DisplayZone::Named(chrono_tz::America::New_York);

        // EST, UTC-5
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 17, 0, 0).unwrap();
        assert_eq!(zone.render(winter), "01/15/2024 12:00:00");

        // EDT, UTC-4
        let summer = Utc.with_ymd_and_hms(2024, 7, 4, 3, 5, 9).unwrap();
        assert_eq!(zone.render(summer), "07/03/2024 23:05:09");
    }

    #[test]
    fn test_render_utc() {
        let zone = DisplayZone::Named(chrono_tz::UTC);
        let instant = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(zone.render(instant), "12/31/2023 23:59:59");
        assert_eq!(zone.name(), "UTC");
    }
}
