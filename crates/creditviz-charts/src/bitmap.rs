//! Static PNG rendering through plotters.

use crate::renderer::{ensure_parent, palette_color, parse_color, ChartRenderer};
use crate::spec::{BarMode, ChartSpec};
use creditviz_common::{format_thousands, truncate_label, CreditVizError, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info, instrument};

const MAX_CATEGORY_LABEL: usize = 18;

/// Bar chart as a PNG image.
///
/// Hover text has no static equivalent and is dropped; every other part of
/// the chart is drawn.
#[derive(Debug, Clone)]
pub struct BitmapRenderer {
    font_family: String,
}

impl Default for BitmapRenderer {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

impl BitmapRenderer {
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
        }
    }
}

/// Slot layout of the x axis: each category takes one slot per bar column
/// plus one empty slot as a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SlotLayout {
    columns: u32,
    categories: u32,
}

impl SlotLayout {
    /// Grouped bars get a column per trace; stacked and overlaid bars share one.
    fn new(bar_mode: BarMode, traces: usize, categories: usize) -> Self {
        let columns = match bar_mode {
            BarMode::Group => traces as u32,
            BarMode::Stack | BarMode::Overlay => 1,
        };
        Self {
            columns,
            categories: categories as u32,
        }
    }

    fn stride(self) -> u32 {
        self.columns.max(1) + 1
    }

    fn total(self) -> u32 {
        (self.categories * self.stride()).max(1)
    }

    fn slot(self, category: u32, trace: u32) -> u32 {
        category * self.stride() + trace.min(self.columns.max(1) - 1)
    }

    /// Category whose label sits on `slot`, if any.
    fn labelled_category(self, slot: u32) -> Option<u32> {
        let label_offset = (self.columns.max(1) - 1) / 2;
        (slot % self.stride() == label_offset && slot / self.stride() < self.categories)
            .then(|| slot / self.stride())
    }
}

/// Vertical extent of one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bar {
    category: u32,
    bottom: f64,
    top: f64,
}

/// Bars of every trace, one vector per trace. Stacked bars grow away from
/// zero, positive and negative values on separate stacks.
fn bar_extents(spec: &ChartSpec, categories: &[&str]) -> Vec<Vec<Bar>> {
    let mut positive = vec![0.0; categories.len()];
    let mut negative = vec![0.0; categories.len()];
    let mut extents = Vec::with_capacity(spec.traces.len());

    for trace in &spec.traces {
        let mut bars = Vec::with_capacity(trace.x.len());
        for (category, value) in trace.x.iter().zip(&trace.y) {
            let Some(index) = categories.iter().position(|c| *c == category.as_str()) else {
                continue;
            };
            let base = match spec.bar_mode {
                BarMode::Stack if *value < 0.0 => &mut negative[index],
                BarMode::Stack => &mut positive[index],
                BarMode::Group | BarMode::Overlay => {
                    bars.push(Bar {
                        category: index as u32,
                        bottom: 0.0,
                        top: *value,
                    });
                    continue;
                }
            };
            let bottom = *base;
            *base += value;
            bars.push(Bar {
                category: index as u32,
                bottom,
                top: *base,
            });
        }
        extents.push(bars);
    }
    extents
}

/// Value axis range, always including zero.
fn value_range(extents: &[Vec<Bar>]) -> (f64, f64) {
    let ends = || extents.iter().flatten().flat_map(|bar| [bar.bottom, bar.top]);
    let low = ends().fold(0.0, f64::min);
    let high = ends().fold(0.0, f64::max);
    if low == high {
        (0.0, 1.0)
    } else {
        let padding = (high - low) * 0.1;
        (if low < 0.0 { low - padding } else { 0.0 }, high + padding)
    }
}

impl ChartRenderer for BitmapRenderer {
    fn name(&self) -> &'static str {
        "bitmap"
    }

    fn file_extension(&self) -> &'static str {
        "png"
    }

    #[instrument(skip(self, spec), fields(path = %path.display(), traces = spec.traces.len()))]
    fn render_to_file(&self, spec: &ChartSpec, path: &Path) -> Result<()> {
        if spec.width == 0 || spec.height == 0 {
            return Err(CreditVizError::chart(format!(
                "Chart dimensions must be positive, got {}x{}",
                spec.width, spec.height
            )));
        }
        ensure_parent(path)?;

        let root = BitMapBackend::new(path, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let categories = spec.categories();
        let layout = SlotLayout::new(spec.bar_mode, spec.traces.len(), categories.len());
        let extents = bar_extents(spec, &categories);
        let (low, high) = value_range(&extents);
        debug!(mode = %spec.bar_mode, slots = layout.total(), "Laid out bars");

        let font = self.font_family.as_str();
        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, (font, 24))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d((0u32..layout.total()).into_segmented(), low..high)?;

        let x_label = |value: &SegmentValue<u32>| match value {
            SegmentValue::CenterOf(slot) => layout
                .labelled_category(*slot)
                .and_then(|index| categories.get(index as usize))
                .map(|category| truncate_label(category, MAX_CATEGORY_LABEL))
                .unwrap_or_default(),
            _ => String::new(),
        };
        let y_label = |value: &f64| format_thousands(*value);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(layout.total() as usize + 1)
            .x_label_formatter(&x_label)
            .y_label_formatter(&y_label)
            .x_desc(spec.x_axis_title.as_str())
            .y_desc(spec.y_axis_title.as_str())
            .label_style((font, 14))
            .draw()?;

        for (index, (trace, bars)) in spec.traces.iter().zip(&extents).enumerate() {
            let color = trace
                .color
                .as_deref()
                .and_then(parse_color)
                .unwrap_or_else(|| palette_color(index));
            let style = match spec.bar_mode {
                BarMode::Overlay => color.mix(0.6).filled(),
                BarMode::Group | BarMode::Stack => color.filled(),
            };

            let rectangles = bars.iter().map(|bar| {
                let slot = layout.slot(bar.category, index as u32);
                Rectangle::new(
                    [
                        (SegmentValue::Exact(slot), bar.bottom),
                        (SegmentValue::Exact(slot + 1), bar.top),
                    ],
                    style,
                )
            });

            chart
                .draw_series(rectangles)?
                .label(trace.name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], style));
        }

        if spec.traces.is_empty() {
            debug!("Rendering empty chart");
        } else {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font((font, 14))
                .draw()?;
        }

        root.present()?;
        info!("Wrote static chart to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{BarMode, HoverLabelStyle, Trace};
    use creditviz_common::test_utils::assert_approx_eq;

    fn spec_with(traces: Vec<Trace>) -> ChartSpec {
        ChartSpec {
            title: "Credits".to_string(),
            x_axis_title: "Region".to_string(),
            y_axis_title: "Credits".to_string(),
            bar_mode: BarMode::Group,
            traces,
            hover_label: HoverLabelStyle::default(),
            width: 640,
            height: 480,
        }
    }

    fn trace(name: &str, x: &[&str], y: &[f64]) -> Trace {
        Trace {
            name: name.to_string(),
            x: x.iter().map(|c| c.to_string()).collect(),
            y: y.to_vec(),
            color: None,
            hover_text: None,
        }
    }

    #[test]
    fn test_slot_layout() {
        let layout = SlotLayout::new(BarMode::Group, 2, 3);
        assert_eq!(layout.stride(), 3);
        assert_eq!(layout.total(), 9);
        assert_eq!(layout.slot(1, 1), 4);
        assert_eq!(layout.labelled_category(3), Some(1));
        assert_eq!(layout.labelled_category(4), None);
        assert_eq!(layout.labelled_category(9), None);
    }

    #[test]
    fn test_stacked_traces_share_a_column() {
        let layout = SlotLayout::new(BarMode::Stack, 2, 3);
        assert_eq!(layout.stride(), 2);
        assert_eq!(layout.total(), 6);
        assert_eq!(layout.slot(1, 0), 2);
        assert_eq!(layout.slot(1, 1), 2);
        assert_eq!(layout.labelled_category(2), Some(1));

        assert_eq!(SlotLayout::new(BarMode::Overlay, 2, 3), layout);
    }

    #[test]
    fn test_empty_layout_has_one_slot() {
        let layout = SlotLayout::new(BarMode::Group, 0, 0);
        assert_eq!(layout.total(), 1);
        assert_eq!(layout.labelled_category(0), None);
    }

    #[test]
    fn test_grouped_bars_start_at_zero() {
        let spec = spec_with(vec![
            trace("Issued", &["Asia", "Africa"], &[100.0, 300.0]),
            trace("Remaining", &["Asia"], &[50.0]),
        ]);
        let extents = bar_extents(&spec, &spec.categories());

        assert_eq!(
            extents[0],
            vec![
                Bar { category: 0, bottom: 0.0, top: 100.0 },
                Bar { category: 1, bottom: 0.0, top: 300.0 },
            ]
        );
        assert_eq!(extents[1], vec![Bar { category: 0, bottom: 0.0, top: 50.0 }]);
    }

    #[test]
    fn test_stacked_bars_accumulate_per_category() {
        let mut spec = spec_with(vec![
            trace("Issued", &["Asia", "Africa"], &[100.0, 300.0]),
            trace("Remaining", &["Asia", "Africa"], &[50.0, -20.0]),
        ]);
        spec.bar_mode = BarMode::Stack;
        let extents = bar_extents(&spec, &spec.categories());

        assert_eq!(extents[1][0], Bar { category: 0, bottom: 100.0, top: 150.0 });
        assert_eq!(extents[1][1], Bar { category: 1, bottom: 0.0, top: -20.0 });

        let (low, high) = value_range(&extents);
        assert_approx_eq(low, -52.0, 1e-9);
        assert_approx_eq(high, 332.0, 1e-9);
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[]), (0.0, 1.0));

        let spec = spec_with(vec![trace("Issued", &["Asia"], &[100.0])]);
        let (low, high) = value_range(&bar_extents(&spec, &spec.categories()));
        assert_eq!(low, 0.0);
        assert_approx_eq(high, 110.0, 1e-9);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut spec = spec_with(Vec::new());
        spec.width = 0;

        let dir = tempfile::tempdir().unwrap();
        let result = BitmapRenderer::default().render_to_file(&spec, &dir.path().join("chart.png"));
        assert!(matches!(result, Err(CreditVizError::Chart { .. })));
    }
}
