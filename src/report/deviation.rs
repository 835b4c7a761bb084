//! Deviation of each primary type's mean stats from the overall mean.
//! One bar panel per type; bars above zero are strengths, below are
//! weaknesses.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::models::PokemonRow;

use super::data::{overall_stat_means, stat_means_by_primary_type, STAT_DISPLAY};
use super::theme;

const COLS: usize = 4;

pub fn render(rows: &[PokemonRow], out_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = out_dir.join("deviations_in_base_stats_by_element_type_bar.png");
    draw(rows, &path)?;
    Ok(path)
}

fn draw(rows: &[PokemonRow], path: &Path) -> anyhow::Result<()> {
    let type_means = stat_means_by_primary_type(rows);
    anyhow::ensure!(!type_means.is_empty(), "table is empty");
    let overall = overall_stat_means(rows);

    // (type, per-stat deviation)
    let deviations: Vec<(String, [f64; 6])> = type_means
        .into_iter()
        .map(|(ty, means)| {
            let mut dev = [0.0f64; 6];
            for i in 0..6 {
                dev[i] = means[i] - overall[i];
            }
            (ty, dev)
        })
        .collect();

    let limit = deviations
        .iter()
        .flat_map(|(_, dev)| dev.iter())
        .fold(1.0f64, |acc, &d| acc.max(d.abs()))
        * 1.15;

    let grid_rows = deviations.len().div_ceil(COLS);
    let root = BitMapBackend::new(path, (COLS as u32 * 380, 90 + grid_rows as u32 * 300))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let (header, body) = root.split_vertically(90);
    header.draw(&Text::new(
        "Deviations in Base Stats by Primary Elemental Type",
        (COLS as i32 * 190, 8),
        theme::centered_title_font(),
    ))?;
    header.draw(&Text::new(
        "Type average minus overall average, per stat",
        (COLS as i32 * 190, 50),
        theme::centered_subtitle_font(),
    ))?;

    let panels = body.split_evenly((grid_rows, COLS));
    for (index, (type_name, dev)) in deviations.iter().enumerate() {
        draw_panel(&panels[index], type_name, dev, limit)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    type_name: &str,
    deviations: &[f64; 6],
    limit: f64,
) -> anyhow::Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(type_name, theme::panel_title_font())
        .margin(12)
        .x_label_area_size(55)
        .y_label_area_size(45)
        .build_cartesian_2d(0f64..6f64, -limit..limit)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(6)
        .x_label_formatter(&|v| {
            STAT_DISPLAY
                .get(v.floor() as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        })
        .y_label_formatter(&|v| format!("{:+.0}", v))
        .label_style(theme::label_font())
        .draw()?;

    chart.draw_series(deviations.iter().enumerate().map(|(i, &dev)| {
        let color = if dev >= 0.0 {
            theme::POSITIVE_BAR
        } else {
            theme::NEGATIVE_BAR
        };
        let (lo, hi) = if dev >= 0.0 { (0.0, dev) } else { (dev, 0.0) };
        Rectangle::new([(i as f64 + 0.2, lo), (i as f64 + 0.8, hi)], color.filled())
    }))?;

    // Zero baseline.
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (6.0, 0.0)],
        BLACK,
    )))?;

    Ok(())
}
