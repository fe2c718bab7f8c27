//! Persisted run log entries.
//!
//! A [`RunRecord`] is stamped with the current UTC time by the history store
//! when it is created; there is no public constructor that accepts a
//! timestamp. A [`RunHistory`] is the whole persisted log, oldest record first.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// One logged invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    description: String,
    #[serde(with = "utc_timestamp")]
    timestamp: DateTime<Utc>,
    output: String,
}

impl RunRecord {
    /// Creates a record stamped with the current UTC time, truncated to the
    /// microsecond precision it is persisted with.
    pub(crate) fn stamped(description: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            timestamp: Utc::now().trunc_subsecs(6),
            output: output.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn at(
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            timestamp,
            output: output.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the record was created (UTC).
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

/// Ordered, append-only sequence of [`RunRecord`]s.
///
/// Serialized as a bare JSON array; insertion order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunHistory {
    records: Vec<RunRecord>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RunRecord> {
        self.records.iter()
    }

    /// The most recently appended record.
    pub fn last(&self) -> Option<&RunRecord> {
        self.records.last()
    }

    pub(crate) fn push(&mut self, record: RunRecord) {
        self.records.push(record);
    }
}

impl<'a> IntoIterator for &'a RunHistory {
    type Item = &'a RunRecord;
    type IntoIter = std::slice::Iter<'a, RunRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// RFC 3339 with microseconds and an explicit `+00:00` offset on the way out;
/// any RFC 3339 offset on the way in, normalized to UTC.
mod utc_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, false))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| serde::de::Error::custom(format!("bad rfc3339 timestamp {raw:?}: {e}")))
    }
}
