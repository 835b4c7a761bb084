//! Height vs weight: scatter with least-squares regression, original
//! and square-root-transformed panels side by side.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::models::PokemonRow;

use super::data::{linear_fit, pearson};
use super::theme;

const EPSILON: f64 = 1e-6;

pub fn render(rows: &[PokemonRow], out_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = out_dir.join("height_vs_weight_comparison.png");
    anyhow::ensure!(!rows.is_empty(), "table is empty");
    draw(rows, &path)?;
    Ok(path)
}

// The backend holds its borrow of the path until dropped, so drawing
// gets its own scope.
fn draw(rows: &[PokemonRow], path: &Path) -> anyhow::Result<()> {
    let weights: Vec<f64> = rows.iter().map(|r| r.weight_kg).collect();
    let heights: Vec<f64> = rows.iter().map(|r| r.height_m).collect();
    let weights_sqrt: Vec<f64> = weights.iter().map(|w| (w + EPSILON).sqrt()).collect();
    let heights_sqrt: Vec<f64> = heights.iter().map(|h| (h + EPSILON).sqrt()).collect();

    let root = BitMapBackend::new(path, (1600, 640)).into_drawing_area();
    root.fill(&WHITE)?;

    let (header, body) = root.split_vertically(60);
    header.draw(&Text::new(
        "Relationship Between Height and Weight",
        (800, 10),
        theme::centered_title_font(),
    ))?;

    let panels = body.split_evenly((1, 2));
    draw_panel(
        &panels[0],
        &weights,
        &heights,
        "Height vs Weight (Original Data)",
        "Weight (kg)",
        "Height (m)",
    )?;
    draw_panel(
        &panels[1],
        &weights_sqrt,
        &heights_sqrt,
        "Height vs Weight (Square-Root Transformed)",
        "sqrt(Weight)",
        "sqrt(Height)",
    )?;

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    xs: &[f64],
    ys: &[f64],
    title: &str,
    x_desc: &str,
    y_desc: &str,
) -> anyhow::Result<()> {
    let x_max = xs.iter().cloned().fold(1.0f64, f64::max) * 1.05;
    let y_max = ys.iter().cloned().fold(1.0f64, f64::max) * 1.05;

    let mut chart = ChartBuilder::on(area)
        .caption(title, theme::panel_title_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style(theme::label_font())
        .draw()?;

    chart.draw_series(
        xs.iter()
            .zip(ys.iter())
            .map(|(&x, &y)| Circle::new((x, y), 3, theme::SCATTER_POINT.mix(0.4).filled())),
    )?;

    let (slope, intercept) = linear_fit(xs, ys);
    chart.draw_series(LineSeries::new(
        [(0.0, intercept), (x_max, slope * x_max + intercept)],
        theme::REGRESSION_LINE.stroke_width(2),
    ))?;

    let r = pearson(xs, ys);
    let annotations = [
        format!("y = {:.2}x + {:.2}", slope, intercept),
        format!("r = {:.3}", r),
        format!("R² = {:.3}", r * r),
    ];
    let (width, _) = area.dim_in_pixel();
    for (i, text) in annotations.iter().enumerate() {
        area.draw(&Text::new(
            text.clone(),
            (width as i32 - 220, 70 + i as i32 * 22),
            theme::label_font(),
        ))?;
    }

    Ok(())
}
