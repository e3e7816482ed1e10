use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use shared::{CategoryTotal, LineChartSpec, MonthlyTotal, PageConfig, PieChartSpec};
use web_sys::HtmlCanvasElement;

use crate::services::dom;
use crate::services::errors::BehaviorError;
use crate::services::logging::Logger;

const COMPONENT: &str = "charts";

const LINE_COLOR: RGBColor = RGBColor(102, 126, 234);

const PALETTE: [RGBColor; 8] = [
    RGBColor(102, 126, 234),
    RGBColor(240, 147, 251),
    RGBColor(72, 187, 120),
    RGBColor(246, 173, 85),
    RGBColor(245, 101, 101),
    RGBColor(79, 209, 197),
    RGBColor(159, 122, 234),
    RGBColor(160, 174, 192),
];

fn drawing<E: std::fmt::Display>(e: E) -> BehaviorError {
    BehaviorError::Drawing(e.to_string())
}

fn backend(canvas: HtmlCanvasElement) -> Result<CanvasBackend, BehaviorError> {
    CanvasBackend::with_canvas_object(canvas)
        .ok_or_else(|| BehaviorError::Drawing("canvas has no 2d context".to_string()))
}

/// Draws both dashboard charts from the JSON blocks the server rendered.
///
/// Each chart needs its canvas and its data block; a chart with either
/// missing is skipped.
pub fn render_from_page(config: &PageConfig) {
    if let Some(canvas) = dom::optional_element::<HtmlCanvasElement>(COMPONENT, &config.monthly_chart_id) {
        let result = dom::json_block::<Vec<MonthlyTotal>>(&config.monthly_data_id)
            .and_then(|rows| draw_line_chart(canvas, &LineChartSpec::from_rows(&rows)));
        report(&config.monthly_chart_id, result);
    }

    if let Some(canvas) = dom::optional_element::<HtmlCanvasElement>(COMPONENT, &config.category_chart_id) {
        let result = dom::json_block::<Vec<CategoryTotal>>(&config.category_data_id)
            .and_then(|rows| draw_pie_chart(canvas, &PieChartSpec::from_rows(&rows)));
        report(&config.category_chart_id, result);
    }
}

fn report(chart_id: &str, result: Result<(), BehaviorError>) {
    match result {
        Ok(()) => Logger::debug_with_component(COMPONENT, &format!("Drew #{}", chart_id)),
        Err(e @ BehaviorError::MissingElement(_)) => {
            Logger::debug_with_component(COMPONENT, &format!("Skipping #{}: {}", chart_id, e))
        }
        Err(e) => Logger::warn_with_component(COMPONENT, &format!("Skipping #{}: {}", chart_id, e)),
    }
}

/// Monthly totals as a line with a marker per month
pub fn draw_line_chart(canvas: HtmlCanvasElement, spec: &LineChartSpec) -> Result<(), BehaviorError> {
    if spec.is_empty() {
        return Ok(());
    }

    let root = backend(canvas)?.into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let (y_min, y_max) = spec.value_bounds();
    let x_max = spec.values.len().saturating_sub(1).max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .caption(&spec.series_label, ("sans-serif", 16))
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(drawing)?;

    // Month labels sit on integer positions only
    let month_label = |x: &f64| {
        let index = x.round();
        if (x - index).abs() > 1e-6 || index < 0.0 {
            return String::new();
        }
        spec.labels.get(index as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_labels(spec.labels.len().max(2))
        .x_label_formatter(&month_label)
        .y_label_formatter(&|v| format!("{:.2}", v))
        .label_style(("sans-serif", 12, &LINE_COLOR))
        .axis_style(RGBColor(230, 230, 230))
        .bold_line_style(RGBColor(245, 245, 245))
        .light_line_style(RGBColor(250, 250, 250))
        .draw()
        .map_err(drawing)?;

    let points: Vec<(f64, f64)> = spec
        .values
        .iter()
        .enumerate()
        .map(|(index, total)| (index as f64, *total))
        .collect();

    chart
        .draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(3)))
        .map_err(drawing)?;
    chart
        .draw_series(points.iter().map(|point| Circle::new(*point, 4, LINE_COLOR.filled())))
        .map_err(drawing)?;

    root.present().map_err(drawing)
}

/// Category totals as wedges with a legend on the right
pub fn draw_pie_chart(canvas: HtmlCanvasElement, spec: &PieChartSpec) -> Result<(), BehaviorError> {
    let slices = spec.slices();
    if slices.is_empty() {
        return Ok(());
    }

    let root = backend(canvas)?.into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let (width, height) = root.dim_in_pixel();
    let legend_width = 160.min(width / 3);
    let plot_width = width - legend_width;
    let center = (plot_width as f64 / 2.0, height as f64 / 2.0);
    let radius = (plot_width.min(height) as f64 / 2.0 - 10.0).max(1.0);

    for slice in &slices {
        let color = PALETTE[slice.index % PALETTE.len()];
        let outline: Vec<(i32, i32)> = slice
            .outline(center, radius, 0.05)
            .into_iter()
            .map(|(x, y)| (x.round() as i32, y.round() as i32))
            .collect();
        root.draw(&Polygon::new(outline, color.filled())).map_err(drawing)?;
    }

    let legend_x = plot_width as i32 + 10;
    for (row, slice) in slices.iter().enumerate() {
        let color = PALETTE[slice.index % PALETTE.len()];
        let y = 20 + row as i32 * 22;
        root.draw(&Rectangle::new([(legend_x, y), (legend_x + 14, y + 14)], color.filled()))
            .map_err(drawing)?;
        root.draw(&Text::new(
            slice.label.clone(),
            (legend_x + 20, y),
            ("sans-serif", 13).into_font(),
        ))
        .map_err(drawing)?;
    }

    root.present().map_err(drawing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        for (i, a) in PALETTE.iter().enumerate() {
            for b in PALETTE.iter().skip(i + 1) {
                assert_ne!((a.0, a.1, a.2), (b.0, b.1, b.2));
            }
        }
    }

    #[test]
    fn test_drawing_error_wraps_message() {
        assert_eq!(drawing("boom"), BehaviorError::Drawing("boom".to_string()));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn canvas() -> HtmlCanvasElement {
        let canvas: HtmlCanvasElement = dom::document()
            .unwrap()
            .create_element("canvas")
            .unwrap()
            .dyn_into()
            .unwrap();
        canvas.set_width(400);
        canvas.set_height(300);
        canvas
    }

    #[wasm_bindgen_test]
    fn test_charts_draw_on_detached_canvas() {
        let monthly = vec![
            MonthlyTotal { month: "2025-01".into(), total: 120.0 },
            MonthlyTotal { month: "2025-02".into(), total: 80.0 },
        ];
        assert!(draw_line_chart(canvas(), &LineChartSpec::from_rows(&monthly)).is_ok());

        let categories = vec![
            CategoryTotal { category: "Food".into(), total: 30.0 },
            CategoryTotal { category: "Bills".into(), total: 70.0 },
        ];
        assert!(draw_pie_chart(canvas(), &PieChartSpec::from_rows(&categories)).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_empty_rows_draw_nothing() {
        assert!(draw_line_chart(canvas(), &LineChartSpec::from_rows(&[])).is_ok());
        assert!(draw_pie_chart(canvas(), &PieChartSpec::from_rows(&[])).is_ok());
    }
}
