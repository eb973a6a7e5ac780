use crate::core::errors::ExchangeError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Codec trait mapping typed entities to and from generic JSON values
///
/// Decoding never substitutes defaults for required fields: a missing or mistyped
/// field is reported as `ExchangeError::Decode` with serde's field context.
pub trait JsonCodec: Sized {
    /// Encode into a JSON value
    fn to_json(&self) -> Result<Value, ExchangeError>;

    /// Decode from a JSON value
    fn from_json(value: Value) -> Result<Self, ExchangeError>;
}

impl<T> JsonCodec for T
where
    T: Serialize + DeserializeOwned,
{
    fn to_json(&self) -> Result<Value, ExchangeError> {
        serde_json::to_value(self).map_err(|e| {
            ExchangeError::Serialization(format!(
                "Failed to encode {}: {}",
                std::any::type_name::<T>(),
                e
            ))
        })
    }

    fn from_json(value: Value) -> Result<Self, ExchangeError> {
        decode_value(value)
    }
}

/// Decode a JSON value into any deserializable type.
pub fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, ExchangeError> {
    serde_json::from_value(value).map_err(|e| {
        ExchangeError::Decode(format!(
            "Failed to decode {}: {}",
            std::any::type_name::<T>(),
            e
        ))
    })
}

/// Decode a raw response body.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ExchangeError> {
    serde_json::from_str(body)
        .map_err(|e| ExchangeError::Decode(format!("Failed to parse JSON response: {}", e)))
}

/// The exchange's single timestamp format: UTC with millisecond precision,
/// e.g. `2024-01-15T10:30:00.123Z`.
///
/// Values finer than a millisecond are written with nanosecond digits so that
/// encoding never loses precision; parsing accepts any fractional width.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
    pub const PRECISE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";
    const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

    pub fn format(ts: &DateTime<Utc>) -> String {
        if ts.timestamp_subsec_nanos() % 1_000_000 == 0 {
            ts.format(FORMAT).to_string()
        } else {
            ts.format(PRECISE_FORMAT).to_string()
        }
    }

    pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, PARSE_FORMAT).map(|naive| naive.and_utc())
    }

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(|e| {
            serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e))
        })
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match ts {
                Some(ts) => serializer.serialize_str(&super::format(ts)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| {
                    super::parse(&raw).map_err(|e| {
                        serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e))
                    })
                })
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "timestamp")]
        at: DateTime<Utc>,
        label: String,
    }

    #[test]
    fn test_timestamp_uses_millisecond_format() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
            + chrono::Duration::milliseconds(123);

        assert_eq!(timestamp::format(&at), "2024-01-15T10:30:00.123Z");
        assert_eq!(timestamp::parse("2024-01-15T10:30:00.123Z").unwrap(), at);
    }

    #[test]
    fn test_sub_millisecond_timestamp_round_trips() {
        let at = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let stamped = Stamped {
            at,
            label: "fill".to_string(),
        };

        let encoded = stamped.to_json().unwrap();

        assert_eq!(encoded["at"], json!("2023-11-14T22:13:20.123456789Z"));
        assert_eq!(Stamped::from_json(encoded).unwrap(), stamped);
        assert_eq!(
            timestamp::parse("2023-11-14T22:13:20.123456Z").unwrap(),
            DateTime::from_timestamp(1_700_000_000, 123_456_000).unwrap()
        );
    }

    #[test]
    fn test_malformed_timestamp_fails() {
        let err = Stamped::from_json(json!({"at": "15/01/2024 10:30", "label": "x"})).unwrap_err();
        assert!(matches!(err, ExchangeError::Decode(ref msg) if msg.contains("invalid timestamp")));
    }

    #[test]
    fn test_missing_field_is_reported_not_defaulted() {
        let err = Stamped::from_json(json!({"at": "2024-01-15T10:30:00.000Z"})).unwrap_err();
        assert!(matches!(err, ExchangeError::Decode(ref msg) if msg.contains("label")));
    }

    #[test]
    fn test_mistyped_field_fails() {
        let err = Stamped::from_json(json!({"at": "2024-01-15T10:30:00.000Z", "label": 7}))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Decode(_)));
    }

    #[test]
    fn test_decode_body_rejects_non_json() {
        let err = decode_body::<Value>("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ExchangeError::Decode(_)));
    }
}
