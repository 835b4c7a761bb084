//! Average base stats by primary type, one radar profile per type.
//!
//! Plotters has no polar coordinate system, so the spokes, rings, and
//! profile polygon are drawn directly in pixel space on each panel.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::models::PokemonRow;

use super::data::{stat_means_by_primary_type, STAT_DISPLAY};
use super::theme;

const COLS: usize = 6;

pub fn render(rows: &[PokemonRow], out_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = out_dir.join("avg_base_stats_by_element_type_radial_graphs.png");
    draw(rows, &path)?;
    Ok(path)
}

fn draw(rows: &[PokemonRow], path: &Path) -> anyhow::Result<()> {
    let means = stat_means_by_primary_type(rows);
    anyhow::ensure!(!means.is_empty(), "table is empty");

    // Shared scale: every axis runs 0..=the largest type-average.
    let scale = means
        .iter()
        .flat_map(|(_, m)| m.iter())
        .cloned()
        .fold(1.0f64, f64::max);

    let grid_rows = means.len().div_ceil(COLS);
    let root = BitMapBackend::new(path, (COLS as u32 * 280, 80 + grid_rows as u32 * 280))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let (header, body) = root.split_vertically(80);
    header.draw(&Text::new(
        "Average Base Stats by Primary Elemental Type",
        (COLS as i32 * 140, 8),
        theme::centered_title_font(),
    ))?;
    header.draw(&Text::new(
        format!("Axis scale: 0 to {:.0} (shared across all types)", scale),
        (COLS as i32 * 140, 48),
        theme::centered_subtitle_font(),
    ))?;

    let panels = body.split_evenly((grid_rows, COLS));
    for (index, (type_name, stat_means)) in means.iter().enumerate() {
        draw_radar(&panels[index], type_name, stat_means, scale, index)?;
    }

    root.present()?;
    Ok(())
}

fn draw_radar(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    type_name: &str,
    means: &[f64; 6],
    scale: f64,
    color_index: usize,
) -> anyhow::Result<()> {
    let (width, height) = area.dim_in_pixel();
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0 + 10.0;
    let radius = (width.min(height) as f64 / 2.0) - 45.0;

    let point = |axis: usize, fraction: f64| -> (i32, i32) {
        // Axis 0 points straight up; the rest go clockwise in 60° steps.
        let angle = -std::f64::consts::FRAC_PI_2 + axis as f64 * std::f64::consts::FRAC_PI_3;
        (
            (cx + fraction * radius * angle.cos()).round() as i32,
            (cy + fraction * radius * angle.sin()).round() as i32,
        )
    };

    // Concentric reference rings at 25% steps.
    for ring in 1..=4 {
        let fraction = ring as f64 / 4.0;
        let mut outline: Vec<(i32, i32)> = (0..6).map(|axis| point(axis, fraction)).collect();
        outline.push(outline[0]);
        area.draw(&PathElement::new(outline, BLACK.mix(0.15)))?;
    }

    // Spokes and axis labels.
    for (axis, label) in STAT_DISPLAY.iter().enumerate() {
        let edge = point(axis, 1.0);
        area.draw(&PathElement::new(
            vec![(cx as i32, cy as i32), edge],
            BLACK.mix(0.25),
        ))?;
        let anchor = point(axis, 1.22);
        area.draw(&Text::new(*label, anchor, theme::centered_label_font()))?;
    }

    // The profile polygon.
    let color = theme::type_color(color_index);
    let mut profile: Vec<(i32, i32)> = means
        .iter()
        .enumerate()
        .map(|(axis, &value)| point(axis, value / scale))
        .collect();
    profile.push(profile[0]);

    area.draw(&Polygon::new(profile.clone(), color.mix(0.35)))?;
    area.draw(&PathElement::new(profile, color.stroke_width(2)))?;

    area.draw(&Text::new(
        type_name.to_string(),
        (cx as i32, 6),
        theme::panel_title_font().pos(plotters::style::text_anchor::Pos::new(
            plotters::style::text_anchor::HPos::Center,
            plotters::style::text_anchor::VPos::Top,
        )),
    ))?;

    Ok(())
}
