//! Money Flow Chart
//!
//! Line chart of hourly net flow drawn on an HTML5 canvas.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use econ_dashboard::views::markup::format_money;
use econ_dashboard::FlowSeries;

const LINE_COLOR: &str = "#60a5fa"; // blue-400
const FILL_COLOR: &str = "rgba(96,165,250,0.2)";

/// Draw `series` on `canvas`, replacing whatever was there
pub fn draw_flow(canvas: &HtmlCanvasElement, series: &FlowSeries) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    // Margins
    let margin_left = 80.0;
    let margin_right = 20.0;
    let margin_top = 30.0;
    let margin_bottom = 30.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    // Clear canvas
    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    // Legend
    ctx.set_fill_style(&"#e5e7eb".into()); // gray-200
    ctx.set_font("13px sans-serif");
    let _ = ctx.fill_text(
        &format!("Money flow ({})", series.currency),
        margin_left,
        margin_top - 12.0,
    );

    if series.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No money flow for this selection", width / 2.0 - 120.0, height / 2.0);
        return;
    }

    // Y range always includes zero so inflow and outflow read correctly
    let mut y_min = series.points.iter().map(|p| p.value).fold(0.0_f64, f64::min);
    let mut y_max = series.points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    let y_padding = if y_max > y_min { (y_max - y_min) * 0.1 } else { 1.0 };
    y_min -= y_padding;
    y_max += y_padding;

    let x_at = |i: usize| {
        if series.points.len() == 1 {
            margin_left + chart_width / 2.0
        } else {
            margin_left + (i as f64 / (series.points.len() - 1) as f64) * chart_width
        }
    };
    let y_at = |v: f64| margin_top + ((y_max - v) / (y_max - y_min)) * chart_height;

    // Horizontal grid lines with y-axis labels
    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);
    for i in 0..=4 {
        let value = y_max - (i as f64 / 4.0) * (y_max - y_min);
        let y = y_at(value);
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        ctx.set_font("12px sans-serif");
        let _ = ctx.fill_text(&format_money(value), 5.0, y + 4.0);
    }

    // Area under the line, closed at zero
    let zero = y_at(0.0);
    ctx.set_fill_style(&FILL_COLOR.into());
    ctx.begin_path();
    ctx.move_to(x_at(0), zero);
    for (i, point) in series.points.iter().enumerate() {
        ctx.line_to(x_at(i), y_at(point.value));
    }
    ctx.line_to(x_at(series.points.len() - 1), zero);
    ctx.close_path();
    ctx.fill();

    // Line
    ctx.set_stroke_style(&LINE_COLOR.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, point) in series.points.iter().enumerate() {
        if i == 0 {
            ctx.move_to(x_at(i), y_at(point.value));
        } else {
            ctx.line_to(x_at(i), y_at(point.value));
        }
    }
    ctx.stroke();

    // Points
    ctx.set_fill_style(&LINE_COLOR.into());
    for (i, point) in series.points.iter().enumerate() {
        ctx.begin_path();
        let _ = ctx.arc(x_at(i), y_at(point.value), 3.0, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
    }

    // X-axis labels, thinned to at most ~8
    ctx.set_fill_style(&"#9ca3af".into());
    ctx.set_font("12px sans-serif");
    let step = series.points.len().div_ceil(8).max(1);
    for (i, point) in series.points.iter().enumerate().step_by(step) {
        let _ = ctx.fill_text(&point.label, x_at(i) - 16.0, height - 10.0);
    }
}
