//! Turns aggregated credit data into a [`ChartSpec`].

use crate::spec::{BarMode, ChartSpec, HoverLabelStyle, Trace};
use creditviz_common::{format_thousands, LongRow, Metric, MetricLabels, RegionSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Display options for the grouped bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    /// Metric label to marker color.
    pub colors: BTreeMap<String, String>,
    pub bar_mode: BarMode,
    pub hover_label: HoverLabelStyle,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        let labels = MetricLabels::default();
        let colors = BTreeMap::from([
            (labels.issued, "#1F77B4".to_string()),
            (labels.remaining, "#FF7F0E".to_string()),
        ]);

        Self {
            title: "Carbon Credits Issued and Remaining by Region".to_string(),
            x_axis_title: "Region".to_string(),
            y_axis_title: "Credits".to_string(),
            colors,
            bar_mode: BarMode::Group,
            hover_label: HoverLabelStyle::default(),
            width: 1000,
            height: 600,
        }
    }
}

/// Hover text for one bar.
///
/// Lines are separated with `<br>`, which plotly.js renders as a line break.
/// `top` is left blank when the region has no ranked countries.
pub fn hover_text(region: &str, metric: &str, value: f64, top: Option<&str>) -> String {
    format!(
        "{region}<br>{metric}: {}<br>Top countries: {}",
        format_thousands(value),
        top.unwrap_or_default()
    )
}

/// A single bar before grouping into traces.
struct Bar<'a> {
    region: &'a str,
    metric: &'a str,
    value: f64,
    hover: Option<String>,
}

/// Builds chart specifications from long rows or region summaries.
#[derive(Debug, Clone, Default)]
pub struct ChartBuilder {
    options: ChartOptions,
}

impl ChartBuilder {
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// One trace per distinct metric, bars in row order, default hover.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn from_long_rows(&self, rows: &[LongRow]) -> ChartSpec {
        self.assemble(rows.iter().map(|row| Bar {
            region: &row.region,
            metric: &row.metric,
            value: row.value,
            hover: None,
        }))
    }

    /// One trace per metric from summaries.
    ///
    /// If any summary carries top-country strings, every bar gets hover text
    /// naming its region, value and top contributors.
    #[instrument(skip(self, summaries, labels), fields(regions = summaries.len()))]
    pub fn from_summaries(&self, summaries: &[RegionSummary], labels: &MetricLabels) -> ChartSpec {
        let enriched = summaries.iter().any(|summary| {
            Metric::ALL
                .iter()
                .any(|metric| summary.top_countries(*metric).is_some())
        });

        self.assemble(summaries.iter().flat_map(|summary| {
            Metric::ALL.into_iter().map(move |metric| {
                let label = labels.label(metric);
                let value = summary.value(metric);
                Bar {
                    region: &summary.region,
                    metric: label,
                    value,
                    hover: enriched.then(|| {
                        hover_text(&summary.region, label, value, summary.top_countries(metric))
                    }),
                }
            })
        }))
    }

    fn assemble<'a>(&self, bars: impl Iterator<Item = Bar<'a>>) -> ChartSpec {
        let mut grouped: Vec<(&'a str, Vec<Bar<'a>>)> = Vec::new();
        for bar in bars {
            match grouped.iter_mut().find(|(metric, _)| *metric == bar.metric) {
                Some((_, group)) => group.push(bar),
                None => grouped.push((bar.metric, vec![bar])),
            }
        }

        let traces: Vec<Trace> = grouped
            .into_iter()
            .map(|(metric, bars)| {
                let color = self.options.colors.get(metric).cloned();
                if color.is_none() {
                    debug!(metric, "No color configured, using default palette");
                }

                let mut x = Vec::with_capacity(bars.len());
                let mut y = Vec::with_capacity(bars.len());
                let mut hover = Vec::with_capacity(bars.len());
                for bar in bars {
                    x.push(bar.region.to_string());
                    y.push(bar.value);
                    hover.push(bar.hover);
                }

                Trace {
                    name: metric.to_string(),
                    x,
                    y,
                    color,
                    hover_text: hover.into_iter().collect(),
                }
            })
            .collect();

        debug!(traces = traces.len(), "Built chart spec");

        ChartSpec {
            title: self.options.title.clone(),
            x_axis_title: self.options.x_axis_title.clone(),
            y_axis_title: self.options.y_axis_title.clone(),
            bar_mode: self.options.bar_mode,
            traces,
            hover_label: self.options.hover_label.clone(),
            width: self.options.width,
            height: self.options.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worked_long_rows() -> Vec<LongRow> {
        vec![
            LongRow::new("Africa", "Total Credits Issued", 300.0),
            LongRow::new("Africa", "Total Credits Remaining", 50.0),
            LongRow::new("Asia", "Total Credits Issued", 300.0),
            LongRow::new("Asia", "Total Credits Remaining", 100.0),
        ]
    }

    #[test]
    fn test_from_long_rows_groups_by_metric() {
        let spec = ChartBuilder::default().from_long_rows(&worked_long_rows());

        assert_eq!(spec.bar_mode, BarMode::Group);
        assert_eq!(spec.traces.len(), 2);

        let issued = &spec.traces[0];
        assert_eq!(issued.name, "Total Credits Issued");
        assert_eq!(issued.x, vec!["Africa", "Asia"]);
        assert_eq!(issued.y, vec![300.0, 300.0]);
        assert_eq!(issued.color.as_deref(), Some("#1F77B4"));
        assert_eq!(issued.hover_text, None);

        assert_eq!(spec.traces[1].y, vec![50.0, 100.0]);
    }

    #[test]
    fn test_trace_order_follows_first_appearance() {
        let rows = vec![
            LongRow::new("Asia", "Total Credits Remaining", 1.0),
            LongRow::new("Asia", "Total Credits Issued", 2.0),
        ];
        let spec = ChartBuilder::default().from_long_rows(&rows);
        assert_eq!(spec.traces[0].name, "Total Credits Remaining");
    }

    #[test]
    fn test_unmapped_metric_uses_default_color() {
        let rows = vec![
            LongRow::new("Asia", "Credits Retired", 5.0),
            LongRow::new("Africa", "Credits Retired", 7.0),
        ];
        let spec = ChartBuilder::default().from_long_rows(&rows);

        assert_eq!(spec.traces.len(), 1);
        assert_eq!(spec.traces[0].x, vec!["Asia", "Africa"]);
        assert_eq!(spec.traces[0].y, vec![5.0, 7.0]);
        assert_eq!(spec.traces[0].color, None);
    }

    #[test]
    fn test_empty_input_gives_empty_chart() {
        let builder = ChartBuilder::default();
        assert!(builder.from_long_rows(&[]).traces.is_empty());
        assert!(builder
            .from_summaries(&[], &MetricLabels::default())
            .is_empty());
    }

    #[test]
    fn test_from_summaries_with_hover() {
        let mut africa = RegionSummary::new("Africa", 300.0, 50.0);
        africa.top_issued = Some("Uganda, Kenya".to_string());
        africa.top_remaining = Some("Kenya, Uganda".to_string());
        let asia = RegionSummary::new("Asia", 1_234_567.0, 0.0);

        let spec = ChartBuilder::default().from_summaries(&[africa, asia], &MetricLabels::default());

        let issued = &spec.traces[0];
        assert_eq!(issued.hover_info(), "text");
        let hover = issued.hover_text.as_ref().unwrap();
        assert_eq!(
            hover[0],
            "Africa<br>Total Credits Issued: 300<br>Top countries: Uganda, Kenya"
        );
        assert_eq!(
            hover[1],
            "Asia<br>Total Credits Issued: 1,234,567<br>Top countries: "
        );
    }

    #[test]
    fn test_from_summaries_without_enrichment() {
        let summaries = vec![RegionSummary::new("Africa", 300.0, 50.0)];
        let spec = ChartBuilder::default().from_summaries(&summaries, &MetricLabels::default());

        assert_eq!(spec.traces.len(), 2);
        assert!(spec.traces.iter().all(|trace| trace.hover_text.is_none()));
        assert_eq!(spec.traces[1].name, "Total Credits Remaining");
        assert_eq!(spec.traces[1].y, vec![50.0]);
    }

    #[test]
    fn test_options_flow_into_spec() {
        let options = ChartOptions {
            title: "Registry".to_string(),
            bar_mode: BarMode::Stack,
            width: 640,
            ..ChartOptions::default()
        };
        let spec = ChartBuilder::new(options).from_long_rows(&worked_long_rows());

        assert_eq!(spec.title, "Registry");
        assert_eq!(spec.bar_mode, BarMode::Stack);
        assert_eq!(spec.width, 640);
    }
}
