//! Serializes a `chrono::Duration` as a whole number of seconds.

use chrono::Duration;
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs = i64::deserialize(deserializer)?;

    Duration::try_seconds(secs).ok_or_else(|| D::Error::custom("duration out of range"))
}
