//! Chart renderer trait, output formats and shared helpers.

use crate::bitmap::BitmapRenderer;
use crate::plotly::{HtmlRenderer, JsonRenderer};
use crate::spec::ChartSpec;
use creditviz_common::{CreditVizError, Result};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// plotly.js bundle referenced by generated HTML pages.
pub const DEFAULT_PLOTLY_CDN_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Trait for turning a [`ChartSpec`] into a file.
pub trait ChartRenderer {
    /// Short renderer name used in logs.
    fn name(&self) -> &'static str;

    /// Extension, without the dot, of the files this renderer writes.
    fn file_extension(&self) -> &'static str;

    /// Render `spec` to `path`, creating parent directories as needed.
    fn render_to_file(&self, spec: &ChartSpec, path: &Path) -> Result<()>;

    /// `directory/stem.<extension>`
    fn output_path(&self, directory: &Path, stem: &str) -> PathBuf {
        directory.join(format!("{stem}.{}", self.file_extension()))
    }
}

/// Output formats selectable from configuration and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// plotly figure JSON
    Json,
    /// standalone interactive page
    Html,
    /// static bitmap
    Png,
}

impl RenderFormat {
    pub const ALL: [RenderFormat; 3] = [Self::Json, Self::Html, Self::Png];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderFormat {
    type Err = CreditVizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            "png" => Ok(Self::Png),
            other => Err(CreditVizError::validation_field(
                format!("Unknown render format '{other}' (expected json, html or png)"),
                "output.formats",
            )),
        }
    }
}

/// Settings shared by the concrete renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererSettings {
    pub plotly_cdn_url: String,
    pub font_family: String,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            plotly_cdn_url: DEFAULT_PLOTLY_CDN_URL.to_string(),
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Renderer for a format.
pub fn renderer_for(format: RenderFormat, settings: &RendererSettings) -> Box<dyn ChartRenderer> {
    match format {
        RenderFormat::Json => Box::new(JsonRenderer::new()),
        RenderFormat::Html => Box::new(HtmlRenderer::new(settings.plotly_cdn_url.clone())),
        RenderFormat::Png => Box::new(BitmapRenderer::new(settings.font_family.clone())),
    }
}

/// Parse a `#RRGGBB` color.
pub fn parse_color(color: &str) -> Option<RGBColor> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Fallback colors for traces without a configured color.
pub fn palette_color(index: usize) -> RGBColor {
    const PALETTE: [RGBColor; 8] = [
        RGBColor(31, 119, 180),  // Blue
        RGBColor(255, 127, 14),  // Orange
        RGBColor(44, 160, 44),   // Green
        RGBColor(214, 39, 40),   // Red
        RGBColor(148, 103, 189), // Purple
        RGBColor(140, 86, 75),   // Brown
        RGBColor(227, 119, 194), // Pink
        RGBColor(127, 127, 127), // Gray
    ];
    PALETTE[index % PALETTE.len()]
}

/// Create the parent directory of `path` if it has one.
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!(parse_color("#FF0000"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_color("#1f77b4"), Some(RGBColor(31, 119, 180)));

        assert_eq!(parse_color("FF0000"), None);
        assert_eq!(parse_color("#FFF"), None);
        assert_eq!(parse_color("#ZZ0000"), None);
        assert_eq!(parse_color("steelblue"), None);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(0), RGBColor(31, 119, 180));
        assert_eq!(palette_color(8), palette_color(0));
    }

    #[test]
    fn test_render_format_parsing() {
        assert_eq!("json".parse::<RenderFormat>().unwrap(), RenderFormat::Json);
        assert_eq!(" HTML ".parse::<RenderFormat>().unwrap(), RenderFormat::Html);
        assert_eq!("png".parse::<RenderFormat>().unwrap(), RenderFormat::Png);
        assert!("svg".parse::<RenderFormat>().is_err());

        for format in RenderFormat::ALL {
            assert_eq!(format.to_string().parse::<RenderFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_renderer_for_extensions() {
        let settings = RendererSettings::default();
        for format in RenderFormat::ALL {
            let renderer = renderer_for(format, &settings);
            assert_eq!(renderer.file_extension(), format.as_str());
        }
    }

    #[test]
    fn test_output_path() {
        let renderer = renderer_for(RenderFormat::Html, &RendererSettings::default());
        assert_eq!(
            renderer.output_path(Path::new("out"), "credits_by_region"),
            PathBuf::from("out/credits_by_region.html")
        );
    }
}
