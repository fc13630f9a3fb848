//! Record and summary types shared by the pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One project row of the registry sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Geographic region, the grouping key.
    pub region: String,
    /// Host country of the project.
    pub country: String,
    /// Total credits issued, if reported.
    pub issued: Option<f64>,
    /// Total credits remaining, if reported.
    pub remaining: Option<f64>,
}

impl Record {
    /// Creates a record from its four fields.
    pub fn new(
        region: impl Into<String>,
        country: impl Into<String>,
        issued: Option<f64>,
        remaining: Option<f64>,
    ) -> Self {
        Self {
            region: region.into(),
            country: country.into(),
            issued,
            remaining,
        }
    }

    /// Value of the given metric for this record.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Issued => self.issued,
            Metric::Remaining => self.remaining,
        }
    }

    /// True when both numeric fields are present.
    pub fn is_complete(&self) -> bool {
        self.issued.is_some() && self.remaining.is_some()
    }
}

/// The two numeric fields that are summed and charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Credits issued.
    Issued,
    /// Credits remaining.
    Remaining,
}

impl Metric {
    /// Both metrics, in chart order.
    pub const ALL: [Metric; 2] = [Metric::Issued, Metric::Remaining];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issued => f.write_str("issued"),
            Self::Remaining => f.write_str("remaining"),
        }
    }
}

/// Display names given to each metric once unpivoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricLabels {
    /// Label for [`Metric::Issued`].
    pub issued: String,
    /// Label for [`Metric::Remaining`].
    pub remaining: String,
}

impl Default for MetricLabels {
    fn default() -> Self {
        Self {
            issued: "Total Credits Issued".to_string(),
            remaining: "Total Credits Remaining".to_string(),
        }
    }
}

impl MetricLabels {
    /// Label for a metric.
    pub fn label(&self, metric: Metric) -> &str {
        match metric {
            Metric::Issued => &self.issued,
            Metric::Remaining => &self.remaining,
        }
    }

    /// Reverse lookup of a label. Exact match only.
    pub fn metric_for(&self, label: &str) -> Option<Metric> {
        Metric::ALL
            .into_iter()
            .find(|metric| self.label(*metric) == label)
    }
}

/// Per-region totals, optionally enriched with top contributing countries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region: String,
    pub issued: f64,
    pub remaining: f64,
    /// Top issuing countries, comma separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_issued: Option<String>,
    /// Top countries by remaining credits, comma separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_remaining: Option<String>,
}

impl RegionSummary {
    /// Creates an un-enriched summary row.
    pub fn new(region: impl Into<String>, issued: f64, remaining: f64) -> Self {
        Self {
            region: region.into(),
            issued,
            remaining,
            top_issued: None,
            top_remaining: None,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Issued => self.issued,
            Metric::Remaining => self.remaining,
        }
    }

    pub fn top_countries(&self, metric: Metric) -> Option<&str> {
        match metric {
            Metric::Issued => self.top_issued.as_deref(),
            Metric::Remaining => self.top_remaining.as_deref(),
        }
    }
}

/// One `(region, metric, value)` triple of the long-format table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRow {
    pub region: String,
    pub metric: String,
    pub value: f64,
}

impl LongRow {
    pub fn new(region: impl Into<String>, metric: impl Into<String>, value: f64) -> Self {
        Self {
            region: region.into(),
            metric: metric.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_completeness() {
        assert!(Record::new("Africa", "Kenya", Some(1.0), Some(0.0)).is_complete());
        assert!(!Record::new("Africa", "Kenya", None, Some(0.0)).is_complete());
        assert!(!Record::new("Africa", "Kenya", Some(1.0), None).is_complete());
    }

    #[test]
    fn test_record_value_by_metric() {
        let record = Record::new("Asia", "India", Some(300.0), Some(100.0));
        assert_eq!(record.value(Metric::Issued), Some(300.0));
        assert_eq!(record.value(Metric::Remaining), Some(100.0));
    }

    #[test]
    fn test_metric_labels_lookup() {
        let labels = MetricLabels::default();
        assert_eq!(labels.label(Metric::Issued), "Total Credits Issued");
        assert_eq!(
            labels.metric_for("Total Credits Remaining"),
            Some(Metric::Remaining)
        );
        assert_eq!(labels.metric_for("total credits remaining"), None);
    }

    #[test]
    fn test_summary_serialization_skips_absent_enrichment() {
        let summary = RegionSummary::new("Africa", 300.0, 50.0);
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"region":"Africa","issued":300.0,"remaining":50.0}"#);
    }
}
