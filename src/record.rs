use anyhow::Result;
use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::Error;
use crate::labels::LabelObservation;

pub const DEFAULT_BRANCH: &str = "unknown";

/// Exact decimal text of a finite float, as the table's number type expects.
///
/// `f64`'s `Display` prints the shortest digits that parse back to the same
/// value, so `87.65` stays `"87.65"` instead of its binary expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Decimal(String);

impl Decimal {
    pub fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then(|| Decimal(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredLabel {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Confidence")]
    pub confidence: Decimal,
}

impl TryFrom<&LabelObservation> for StoredLabel {
    type Error = Error;

    fn try_from(label: &LabelObservation) -> Result<Self, Error> {
        let Some(confidence) = Decimal::from_f64(label.confidence) else {
            return Err(Error::NonFiniteConfidence {
                label: label.name.clone(),
                value: label.confidence,
            });
        };
        Ok(StoredLabel {
            name: label.name.clone(),
            confidence,
        })
    }
}

/// One row of the results table, keyed by `filename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRecord {
    pub filename: String,
    pub labels: Vec<StoredLabel>,
    pub timestamp: String,
    pub branch: String,
}

impl AnalysisRecord {
    pub fn new(
        filename: &str,
        labels: &[LabelObservation],
        branch: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let labels = labels
            .iter()
            .map(StoredLabel::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AnalysisRecord {
            filename: filename.to_string(),
            labels,
            timestamp: iso_timestamp(now),
            branch: branch.to_string(),
        })
    }
}

/// Naive UTC ISO-8601 with a literal `Z` appended. Microseconds are printed
/// only when non-zero.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    let naive = now.naive_utc();
    let seconds = naive.format("%Y-%m-%dT%H:%M:%S");
    let micros = naive.nanosecond() / 1_000;
    if micros == 0 {
        format!("{seconds}Z")
    } else {
        format!("{seconds}.{micros:06}Z")
    }
}
