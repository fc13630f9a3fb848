//! Backend-neutral description of a grouped bar chart.
//!
//! A [`ChartSpec`] carries everything an interactive engine needs: traces,
//! titles, bar mode and hover configuration. [`ChartSpec::to_plotly_figure`]
//! maps it onto the plotly.js figure schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// How traces sharing an x category are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    /// Side by side
    #[default]
    Group,
    Stack,
    Overlay,
}

impl BarMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Stack => "stack",
            Self::Overlay => "overlay",
        }
    }
}

impl fmt::Display for BarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Styling of the hover tooltip box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverLabelStyle {
    pub background_color: String,
    pub font_size: u32,
    pub font_color: String,
}

impl Default for HoverLabelStyle {
    fn default() -> Self {
        Self {
            background_color: "#FFFFFF".to_string(),
            font_size: 16,
            font_color: "#000000".to_string(),
        }
    }
}

/// One bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Legend entry, the metric label.
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    /// Marker color; `None` leaves the engine's default palette in charge.
    pub color: Option<String>,
    /// Per-bar hover text. When present it replaces the default tooltip.
    pub hover_text: Option<Vec<String>>,
}

impl Trace {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Value of plotly's `hoverinfo` for this trace.
    pub fn hover_info(&self) -> &'static str {
        if self.hover_text.is_some() {
            "text"
        } else {
            "all"
        }
    }

    fn to_plotly(&self, hover_label: &HoverLabelStyle) -> Value {
        let mut trace = Map::new();
        trace.insert("type".to_string(), json!("bar"));
        trace.insert("name".to_string(), json!(self.name));
        trace.insert("x".to_string(), json!(self.x));
        trace.insert("y".to_string(), json!(self.y));
        if let Some(color) = &self.color {
            trace.insert("marker".to_string(), json!({ "color": color }));
        }
        if let Some(text) = &self.hover_text {
            trace.insert("hovertext".to_string(), json!(text));
        }
        trace.insert("hoverinfo".to_string(), json!(self.hover_info()));
        trace.insert(
            "hoverlabel".to_string(),
            json!({
                "bgcolor": hover_label.background_color,
                "font": {
                    "size": hover_label.font_size,
                    "color": hover_label.font_color,
                },
            }),
        );
        Value::Object(trace)
    }
}

/// A complete grouped bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub bar_mode: BarMode,
    pub traces: Vec<Trace>,
    pub hover_label: HoverLabelStyle,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    /// True when no trace has a bar to draw.
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(Trace::is_empty)
    }

    /// Distinct x categories across all traces, in first-appearance order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for x in self.traces.iter().flat_map(|trace| trace.x.iter()) {
            if !categories.contains(&x.as_str()) {
                categories.push(x.as_str());
            }
        }
        categories
    }

    /// Largest bar value, or zero for an empty chart.
    pub fn max_value(&self) -> f64 {
        self.traces
            .iter()
            .flat_map(|trace| trace.y.iter().copied())
            .fold(0.0, f64::max)
    }

    /// Serialize to a plotly.js figure object (`data` plus `layout`).
    pub fn to_plotly_figure(&self) -> Value {
        let data: Vec<Value> = self
            .traces
            .iter()
            .map(|trace| trace.to_plotly(&self.hover_label))
            .collect();

        json!({
            "data": data,
            "layout": {
                "title": { "text": self.title },
                "xaxis": { "title": { "text": self.x_axis_title } },
                "yaxis": { "title": { "text": self.y_axis_title } },
                "barmode": self.bar_mode.as_str(),
                "width": self.width,
                "height": self.height,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> ChartSpec {
        ChartSpec {
            title: "Credits".to_string(),
            x_axis_title: "Region".to_string(),
            y_axis_title: "Credits".to_string(),
            bar_mode: BarMode::Group,
            traces: vec![
                Trace {
                    name: "Total Credits Issued".to_string(),
                    x: vec!["Africa".to_string(), "Asia".to_string()],
                    y: vec![300.0, 300.0],
                    color: Some("#1F77B4".to_string()),
                    hover_text: Some(vec!["a".to_string(), "b".to_string()]),
                },
                Trace {
                    name: "Total Credits Remaining".to_string(),
                    x: vec!["Africa".to_string(), "Europe".to_string()],
                    y: vec![50.0, 100.0],
                    color: None,
                    hover_text: None,
                },
            ],
            hover_label: HoverLabelStyle::default(),
            width: 900,
            height: 600,
        }
    }

    #[test]
    fn test_plotly_figure_layout() {
        let figure = sample_spec().to_plotly_figure();
        let layout = &figure["layout"];

        assert_eq!(layout["barmode"], "group");
        assert_eq!(layout["title"]["text"], "Credits");
        assert_eq!(layout["xaxis"]["title"]["text"], "Region");
        assert_eq!(layout["width"], 900);
    }

    #[test]
    fn test_plotly_figure_traces() {
        let figure = sample_spec().to_plotly_figure();
        let data = figure["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);

        let issued = &data[0];
        assert_eq!(issued["type"], "bar");
        assert_eq!(issued["marker"]["color"], "#1F77B4");
        assert_eq!(issued["hoverinfo"], "text");
        assert_eq!(issued["hovertext"][1], "b");
        assert_eq!(issued["hoverlabel"]["bgcolor"], "#FFFFFF");
        assert_eq!(issued["hoverlabel"]["font"]["size"], 16);

        let remaining = &data[1];
        assert!(remaining.get("marker").is_none());
        assert!(remaining.get("hovertext").is_none());
        assert_eq!(remaining["hoverinfo"], "all");
    }

    #[test]
    fn test_categories_and_max() {
        let spec = sample_spec();
        assert_eq!(spec.categories(), vec!["Africa", "Asia", "Europe"]);
        assert_eq!(spec.max_value(), 300.0);
        assert!(!spec.is_empty());
    }

    #[test]
    fn test_bar_mode_serde() {
        assert_eq!(serde_json::to_string(&BarMode::Stack).unwrap(), "\"stack\"");
        assert_eq!(BarMode::default(), BarMode::Group);
    }
}
