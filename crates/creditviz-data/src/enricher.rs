//! Top contributing countries per region.

use creditviz_common::{Metric, Record, RegionSummary};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Default number of countries listed per region.
pub const DEFAULT_TOP_N: usize = 3;

/// Separator between country names in the display string.
pub const COUNTRY_SEPARATOR: &str = ", ";

/// Highest-sum countries of one region for one metric, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopContributors {
    pub region: String,
    pub metric: Metric,
    /// `(country, sum)` pairs, sums non-increasing.
    pub entries: Vec<(String, f64)>,
}

impl TopContributors {
    /// Country names joined in rank order.
    pub fn display(&self) -> String {
        self.countries().collect::<Vec<_>>().join(COUNTRY_SEPARATOR)
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(country, _)| country.as_str())
    }
}

/// Running sum of one country within a region.
struct CountryTotal<'a> {
    country: &'a str,
    sum: f64,
}

/// For each region, the `n` countries with the largest sum of `metric`.
///
/// Only records whose `metric` value is present take part, so a country
/// with no reported values never appears. Ties keep input order. Regions
/// come out ordered by name; regions without any value are omitted.
#[instrument(skip(records), fields(records = records.len()))]
pub fn top_contributors(records: &[Record], metric: Metric, n: usize) -> Vec<TopContributors> {
    let mut by_region: BTreeMap<&str, Vec<CountryTotal<'_>>> = BTreeMap::new();
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();

    for record in records {
        let Some(value) = record.value(metric) else {
            continue;
        };
        let totals = by_region.entry(record.region.as_str()).or_default();
        let slot = *slots
            .entry((record.region.as_str(), record.country.as_str()))
            .or_insert_with(|| {
                totals.push(CountryTotal {
                    country: record.country.as_str(),
                    sum: 0.0,
                });
                totals.len() - 1
            });
        totals[slot].sum += value;
    }

    let result: Vec<TopContributors> = by_region
        .into_iter()
        .map(|(region, mut totals)| {
            // Totals were pushed in first-appearance order and sort_by is stable.
            totals.sort_by(|a, b| b.sum.total_cmp(&a.sum));
            totals.truncate(n);
            TopContributors {
                region: region.to_string(),
                metric,
                entries: totals
                    .into_iter()
                    .map(|total| (total.country.to_string(), total.sum))
                    .collect(),
            }
        })
        .collect();

    debug!(regions = result.len(), %metric, n, "Ranked countries per region");
    result
}

/// Attach top-country strings to `summaries`, joining on region.
///
/// Regions absent from the ranking keep `None`; a region whose ranking is
/// empty (`n == 0`) also gets `None`.
pub fn attach_top_countries(
    mut summaries: Vec<RegionSummary>,
    issued: &[TopContributors],
    remaining: &[TopContributors],
) -> Vec<RegionSummary> {
    let lookup = |ranking: &[TopContributors], region: &str| {
        ranking
            .iter()
            .find(|top| top.region == region && !top.entries.is_empty())
            .map(TopContributors::display)
    };

    for summary in &mut summaries {
        summary.top_issued = lookup(issued, &summary.region);
        summary.top_remaining = lookup(remaining, &summary.region);
    }
    summaries
}

/// Rank both metrics and attach the results to `summaries`.
#[instrument(skip(summaries, records), fields(regions = summaries.len()))]
pub fn enrich(summaries: Vec<RegionSummary>, records: &[Record], n: usize) -> Vec<RegionSummary> {
    let issued = top_contributors(records, Metric::Issued, n);
    let remaining = top_contributors(records, Metric::Remaining, n);
    attach_top_countries(summaries, &issued, &remaining)
}
