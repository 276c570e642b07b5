//! Lenient decoding of backend payloads.
//!
//! The backend sends dates as `2024-03-01`, `2024-03-01T00:00:00` or full
//! RFC 3339 timestamps depending on the entity. Dates are written back in the
//! plain `YYYY-MM-DD` form. Unset fields arrive as explicit `null`s.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date, ignoring any time component
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, DATE_FORMAT).map_err(|e| format!("invalid date '{}': {}", raw, e))
}

/// Parse an RFC 3339 timestamp, or a zone-less one taken as UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|ts| ts.and_utc()))
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}

/// `null` decodes as the type's default, same as a missing field.
///
/// Use together with `#[serde(default)]`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub mod lenient_date {
    use super::*;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

pub mod lenient_date_option {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_some(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_date(value).map(Some).map_err(serde::de::Error::custom),
        }
    }
}

pub mod lenient_timestamp_option {
    use super::*;

    pub fn serialize<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(t) => serializer.serialize_some(&t.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_timestamp(value).map(Some).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sparse {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_date("2024-03-01").unwrap(), expected);
        assert_eq!(parse_date("2024-03-01T10:15:00").unwrap(), expected);
        assert_eq!(parse_date("2024-03-01T10:15:00.000Z").unwrap(), expected);
        assert!(parse_date("03/01/2024").is_err());
    }

    #[test]
    fn test_parse_timestamp_with_and_without_zone() {
        let zoned = parse_timestamp("2024-03-01T10:15:00+02:00").unwrap();
        assert_eq!(zoned.hour(), 8);

        let naive = parse_timestamp("2024-03-01T10:15:00.250").unwrap();
        assert_eq!(naive.hour(), 10);
        assert_eq!(naive.day(), 1);
    }

    #[test]
    fn test_null_fields_fall_back_to_default() {
        let sparse: Sparse = serde_json::from_str(r#"{"name": null, "tags": null}"#).unwrap();
        assert_eq!(sparse.name, "");
        assert!(sparse.tags.is_empty());

        let missing: Sparse = serde_json::from_str("{}").unwrap();
        assert!(missing.tags.is_empty());

        let set: Sparse = serde_json::from_str(r#"{"name": "Acme", "tags": ["a"]}"#).unwrap();
        assert_eq!(set.name, "Acme");
        assert_eq!(set.tags, vec!["a"]);
    }
}
