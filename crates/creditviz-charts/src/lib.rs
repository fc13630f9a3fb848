//! # creditviz charts
//!
//! Grouped bar chart specifications built from regional credit totals, and
//! renderers that turn them into plotly figures, interactive HTML pages or
//! static PNG images.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitmap;
pub mod builder;
pub mod plotly;
pub mod renderer;
pub mod spec;

pub use bitmap::BitmapRenderer;
pub use builder::{hover_text, ChartBuilder, ChartOptions};
pub use plotly::{HtmlRenderer, JsonRenderer};
pub use renderer::{
    palette_color, parse_color, renderer_for, ChartRenderer, RenderFormat, RendererSettings,
    DEFAULT_PLOTLY_CDN_URL,
};
pub use spec::{BarMode, ChartSpec, HoverLabelStyle, Trace};
