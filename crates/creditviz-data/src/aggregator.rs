//! Regional aggregation and long-format reshaping.

use creditviz_common::{LongRow, Metric, MetricLabels, Record, RegionSummary};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, warn};

/// Output of [`RegionAggregator::aggregate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// One row per region, ordered by region name.
    pub summaries: Vec<RegionSummary>,
    /// `summaries` unpivoted, region-major, issued before remaining.
    pub long_rows: Vec<LongRow>,
    /// Records that passed the null filter.
    pub kept: usize,
    /// Records dropped because a numeric field was missing.
    pub dropped: usize,
}

/// Groups records by region and sums both credit fields.
#[derive(Debug, Clone, Default)]
pub struct RegionAggregator {
    labels: MetricLabels,
}

impl RegionAggregator {
    pub fn new(labels: MetricLabels) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &MetricLabels {
        &self.labels
    }

    /// Filter, group, sum and unpivot in one pass over `records`.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn aggregate(&self, records: &[Record]) -> Aggregation {
        let kept = complete_records(records).count();
        let dropped = records.len() - kept;
        if dropped > 0 {
            debug!(dropped, "Dropped records with a missing credit field");
        }

        let summaries = summarize_by_region(records);
        let long_rows = unpivot(&summaries, &self.labels);
        debug!(
            regions = summaries.len(),
            long_rows = long_rows.len(),
            "Aggregated records by region"
        );

        Aggregation {
            summaries,
            long_rows,
            kept,
            dropped,
        }
    }
}

/// Records with both `issued` and `remaining` present.
///
/// The filter is joint: a record missing either field contributes to
/// neither sum.
pub fn complete_records(records: &[Record]) -> impl Iterator<Item = &Record> {
    records.iter().filter(|record| record.is_complete())
}

/// Sum both fields per region over the complete records. Region equality is
/// exact; rows come out ordered by region name.
pub fn summarize_by_region(records: &[Record]) -> Vec<RegionSummary> {
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for record in complete_records(records) {
        let entry = totals.entry(record.region.as_str()).or_insert((0.0, 0.0));
        entry.0 += record.issued.unwrap_or_default();
        entry.1 += record.remaining.unwrap_or_default();
    }

    totals
        .into_iter()
        .map(|(region, (issued, remaining))| RegionSummary::new(region, issued, remaining))
        .collect()
}

/// Reshape summaries into `(region, metric label, value)` rows, two per
/// summary.
pub fn unpivot(summaries: &[RegionSummary], labels: &MetricLabels) -> Vec<LongRow> {
    summaries
        .iter()
        .flat_map(|summary| {
            Metric::ALL.into_iter().map(move |metric| {
                LongRow::new(
                    summary.region.clone(),
                    labels.label(metric),
                    summary.value(metric),
                )
            })
        })
        .collect()
}

/// Inverse of [`unpivot`]: fold long rows back into one summary per region,
/// in order of first appearance. Rows whose metric label is unknown are
/// skipped.
pub fn pivot(rows: &[LongRow], labels: &MetricLabels) -> Vec<RegionSummary> {
    let mut summaries: Vec<RegionSummary> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let Some(metric) = labels.metric_for(&row.metric) else {
            warn!(metric = %row.metric, region = %row.region, "Skipping row with unknown metric");
            continue;
        };

        let index = *positions.entry(row.region.as_str()).or_insert_with(|| {
            summaries.push(RegionSummary::new(row.region.clone(), 0.0, 0.0));
            summaries.len() - 1
        });

        match metric {
            Metric::Issued => summaries[index].issued = row.value,
            Metric::Remaining => summaries[index].remaining = row.value,
        }
    }

    summaries
}
