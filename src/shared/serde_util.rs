//! Custom serde helpers for the stream's wire formats.

/// Deserializes a Unix-millis `u64` into `DateTime<Utc>`.
///
/// The stream sends every timestamp as epoch milliseconds, not ISO 8601
/// strings.
pub mod timestamp_ms {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        DateTime::<Utc>::from_timestamp_millis(millis as i64)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", millis)))
    }
}

/// Optional variant of [`timestamp_ms`] for fields the feed may omit.
pub mod timestamp_ms_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<u64>::deserialize(deserializer)? {
            None => Ok(None),
            Some(millis) => DateTime::<Utc>::from_timestamp_millis(millis as i64)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", millis))),
        }
    }
}
