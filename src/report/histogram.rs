//! Distribution of each base stat, 2×3 grid of 20-bin histograms.
//! Y axis is the share of Pokémon per bin, shown as a percentage.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::models::PokemonRow;

use super::data::{stat_value, STAT_DISPLAY, STAT_KEYS};
use super::theme;

const BINS: usize = 20;

pub fn render(rows: &[PokemonRow], out_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = out_dir.join("base_stat_distrib_histogram.png");
    anyhow::ensure!(!rows.is_empty(), "table is empty");
    draw(rows, &path)?;
    Ok(path)
}

fn draw(rows: &[PokemonRow], path: &Path) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, (1400, 840)).into_drawing_area();
    root.fill(&WHITE)?;

    let (header, body) = root.split_vertically(80);
    header.draw(&Text::new(
        "Base Stat Distributions",
        (700, 8),
        theme::centered_title_font(),
    ))?;
    header.draw(&Text::new(
        "X-axis: Stat Value | Y-axis: Percentage of Pokémon",
        (700, 48),
        theme::centered_subtitle_font(),
    ))?;

    let panels = body.split_evenly((2, 3));
    for ((panel, key), name) in panels.iter().zip(STAT_KEYS).zip(STAT_DISPLAY) {
        let values: Vec<f64> = rows.iter().map(|r| stat_value(r, key) as f64).collect();
        draw_histogram(panel, &values, name)?;
    }

    root.present()?;
    Ok(())
}

fn draw_histogram(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    values: &[f64],
    title: &str,
) -> anyhow::Result<()> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    // Degenerate column: widen the range so the single bar is visible.
    let (min, max) = if min == max { (min - 1.0, max + 1.0) } else { (min, max) };
    let width = (max - min) / BINS as f64;

    let mut counts = [0usize; BINS];
    for &v in values {
        let bin = (((v - min) / width) as usize).min(BINS - 1);
        counts[bin] += 1;
    }

    let shares: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 / values.len() as f64 * 100.0)
        .collect();
    let y_max = shares.iter().cloned().fold(1.0f64, f64::max) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(title, theme::panel_title_font())
        .margin(12)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(min..max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .y_label_formatter(&|v| format!("{:.0}%", v))
        .label_style(theme::label_font())
        .draw()?;

    chart.draw_series(shares.iter().enumerate().map(|(i, &share)| {
        let x0 = min + i as f64 * width;
        Rectangle::new(
            [(x0, 0.0), (x0 + width, share)],
            theme::HISTOGRAM_FILL.filled().stroke_width(1),
        )
    }))?;
    // Bin outlines, drawn separately so the fill stays solid.
    chart.draw_series(shares.iter().enumerate().map(|(i, &share)| {
        let x0 = min + i as f64 * width;
        Rectangle::new([(x0, 0.0), (x0 + width, share)], BLACK.stroke_width(1))
    }))?;

    Ok(())
}
