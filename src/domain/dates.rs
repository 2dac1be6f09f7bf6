//! ISO-8601 handling for dates crossing the API boundary.
//!
//! The backend is not consistent about the shape of due dates: some
//! endpoints return full RFC 3339 timestamps, some a naive
//! `YYYY-MM-DDTHH:MM:SS` and older rows a plain `YYYY-MM-DD`. Everything is
//! normalised to UTC on ingress.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Wire format used for search-range bounds
pub const WIRE_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Parses any of the date shapes the backend emits
pub fn parse_iso(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| start_of_day(date).and_utc())
}

/// Inclusive lower bound of a selected day
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Inclusive upper bound of a selected day (23:59:59.999)
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999 is always a valid time of day
    date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN))
}

pub fn format_wire(value: NaiveDateTime) -> String {
    value.format(WIRE_DATE_TIME_FORMAT).to_string()
}

/// Serde adapter for optional due dates
pub mod optional_iso {
    use super::parse_iso;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_iso(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid ISO-8601 date '{}'", raw))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_iso("2023-12-31T10:15:00.000Z").unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_parse_rfc3339_with_offset_normalises_to_utc() {
        let dt = parse_iso("2023-12-31T10:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_naive_and_plain_dates() {
        let naive = parse_iso("2023-12-15T08:30:00").unwrap();
        assert_eq!(naive.minute(), 30);

        let plain = parse_iso("2023-12-15").unwrap();
        assert_eq!(plain.day(), 15);
        assert_eq!(plain.hour(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_iso("next tuesday").is_none());
        assert!(parse_iso("").is_none());
    }

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_wire(start_of_day(date)), "2024-03-01T00:00:00.000");
        assert_eq!(format_wire(end_of_day(date)), "2024-03-01T23:59:59.999");
    }
}
