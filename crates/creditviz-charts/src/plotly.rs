//! Renderers targeting the plotly.js engine.

use crate::renderer::{ensure_parent, ChartRenderer, DEFAULT_PLOTLY_CDN_URL};
use crate::spec::ChartSpec;
use chrono::Utc;
use creditviz_common::{format_timestamp, Result};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Writes the plotly figure as pretty-printed JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_to_string(&self, spec: &ChartSpec) -> Result<String> {
        Ok(serde_json::to_string_pretty(&spec.to_plotly_figure())?)
    }
}

impl ChartRenderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "plotly-json"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    #[instrument(skip(self, spec), fields(path = %path.display()))]
    fn render_to_file(&self, spec: &ChartSpec, path: &Path) -> Result<()> {
        let content = self.render_to_string(spec)?;
        ensure_parent(path)?;
        fs::write(path, content)?;
        info!("Wrote plotly figure to {}", path.display());
        Ok(())
    }
}

/// Writes a standalone HTML page that draws the figure with plotly.js.
///
/// Hover, zoom and pan come from the engine loaded from `cdn_url`.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    cdn_url: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PLOTLY_CDN_URL)
    }
}

impl HtmlRenderer {
    pub fn new(cdn_url: impl Into<String>) -> Self {
        Self {
            cdn_url: cdn_url.into(),
        }
    }

    pub fn cdn_url(&self) -> &str {
        &self.cdn_url
    }

    pub fn render_to_string(&self, spec: &ChartSpec) -> Result<String> {
        // A literal "</" inside the inline script would close the tag early.
        let figure = serde_json::to_string(&spec.to_plotly_figure())?.replace("</", "<\\/");

        Ok(format!(
            r#"<!DOCTYPE html>
<!-- generated {generated} -->
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart"></div>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout, {{ responsive: true }});
</script>
</body>
</html>
"#,
            generated = format_timestamp(Utc::now()),
            title = escape_html(&spec.title),
            cdn = escape_html(&self.cdn_url),
        ))
    }
}

impl ChartRenderer for HtmlRenderer {
    fn name(&self) -> &'static str {
        "plotly-html"
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }

    #[instrument(skip(self, spec), fields(path = %path.display()))]
    fn render_to_file(&self, spec: &ChartSpec, path: &Path) -> Result<()> {
        let content = self.render_to_string(spec)?;
        ensure_parent(path)?;
        fs::write(path, content)?;
        info!("Wrote interactive chart to {}", path.display());
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ChartBuilder;
    use creditviz_common::{MetricLabels, RegionSummary};

    fn enriched_spec() -> ChartSpec {
        let mut africa = RegionSummary::new("Africa", 300.0, 50.0);
        africa.top_issued = Some("Uganda, Kenya".to_string());
        ChartBuilder::default().from_summaries(&[africa], &MetricLabels::default())
    }

    #[test]
    fn test_json_is_plotly_figure() {
        let json = JsonRenderer::new().render_to_string(&enriched_spec()).unwrap();
        let figure: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(figure["layout"]["barmode"], "group");
        assert_eq!(figure["data"][0]["hoverinfo"], "text");
    }

    #[test]
    fn test_html_page() {
        let renderer = HtmlRenderer::new("https://example.test/plotly.js");
        let html = renderer.render_to_string(&enriched_spec()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<script src="https://example.test/plotly.js"></script>"#));
        assert!(html.contains("Plotly.newPlot(\"chart\""));
        assert!(html.contains("Uganda, Kenya"));
    }

    #[test]
    fn test_html_escapes_script_breakout() {
        let mut spec = enriched_spec();
        spec.title = "</script><b>".to_string();
        let html = HtmlRenderer::default().render_to_string(&spec).unwrap();

        assert!(html.contains("<title>&lt;/script&gt;&lt;b&gt;</title>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a & "b" <c>"#), "a &amp; &quot;b&quot; &lt;c&gt;");
    }
}
