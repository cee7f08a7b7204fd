// src/chart.rs
// Draws the derived angle-over-time series as a PNG line chart and returns it as a base64 data URL,
// ready to drop into an <img src=...> on the simulation page.
// Rendering goes plotters -> raw RGB buffer -> image crate PNG encoder -> base64.

use crate::model::ChartPoint;
use crate::series::WINDOW_SECS;
use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use plotters::prelude::*;
use std::io::{self, Cursor};
use std::ops::Range;

const W: u32 = 720; // Image width in pixels
const H: u32 = 300; // Image height in pixels

/// Line color of the angle curve (#1976d2).
const LINE: RGBColor = RGBColor(0x19, 0x76, 0xd2);

/// Turns chart points into plottable (seconds, degrees) pairs, dropping anything non-finite.
pub fn plot_points(points: &[ChartPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter_map(|p| {
            let t: f64 = p.time.parse().ok()?;
            (t.is_finite() && p.theta_deg.is_finite()).then_some((t, p.theta_deg))
        })
        .collect()
}

/// Y axis range covering all values with 10% headroom; never empty.
pub fn angle_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return -1.0..1.0; // No finite samples.
    }
    let pad = ((hi - lo) * 0.1).max(1.0);
    (lo - pad)..(hi + pad)
}

/// Renders the series as a PNG data URL. Returns `Ok(None)` when there is nothing to draw.
pub fn render_chart(points: &[ChartPoint]) -> io::Result<Option<String>> {
    if points.is_empty() {
        return Ok(None);
    }
    let series = plot_points(points);
    let y_range = angle_range(series.iter().map(|&(_, y)| y));

    let mut pixel_buffer = vec![0u8; (W * H * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixel_buffer, (W, H)).into_drawing_area();
        root.fill(&WHITE).map_err(io::Error::other)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..WINDOW_SECS, y_range)
            .map_err(io::Error::other)?;

        chart
            .configure_mesh()
            .light_line_style(RGBColor(0xcc, 0xcc, 0xcc).mix(0.4).stroke_width(1))
            .x_desc("Time (s)")
            .y_desc("Angle (°)")
            .draw()
            .map_err(io::Error::other)?;

        chart
            .draw_series(LineSeries::new(series, LINE.stroke_width(2)))
            .map_err(io::Error::other)?;

        root.present().map_err(io::Error::other)?;
    }

    let img_buffer = image::RgbImage::from_raw(W, H, pixel_buffer)
        .ok_or_else(|| io::Error::other("pixel buffer does not match chart size"))?;

    let mut png = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img_buffer)
        .write_to(&mut png, ImageFormat::Png)
        .map_err(io::Error::other)?;

    Ok(Some(format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png.into_inner())
    )))
}
