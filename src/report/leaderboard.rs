//! Top-10 leaderboards: per stat, and per type by total base stat.
//!
//! The grouped-by-type leaderboards look up each entry's downloaded
//! image at `<images_dir>/<entity_key>_image.jpg` and draw a small
//! thumbnail when the file exists; absence is tolerated.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::models::{image_filename, PokemonRow};

use super::data::{stat_value, top_n_by, STAT_DISPLAY, STAT_KEYS};
use super::theme;

const TOP_N: usize = 10;
const TYPE_COLS: usize = 3;
const THUMB_SIZE: u32 = 28;

/// `top_10_by_base_stat.png`: a 3×2 grid, one leaderboard per stat.
pub fn render_by_stat(rows: &[PokemonRow], out_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = out_dir.join("top_10_by_base_stat.png");
    anyhow::ensure!(!rows.is_empty(), "table is empty");
    draw_by_stat(rows, &path)?;
    Ok(path)
}

fn draw_by_stat(rows: &[PokemonRow], path: &Path) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, (1300, 2000)).into_drawing_area();
    root.fill(&WHITE)?;

    let (header, body) = root.split_vertically(60);
    header.draw(&Text::new(
        "Top 10 Pokémon by Base Stat Category",
        (650, 8),
        theme::centered_title_font(),
    ))?;

    let panels = body.split_evenly((3, 2));
    for ((panel, key), name) in panels.iter().zip(STAT_KEYS).zip(STAT_DISPLAY) {
        let top: Vec<(&str, i64)> = top_n_by(rows, key, TOP_N)
            .iter()
            .map(|r| (r.pokemon.as_str(), stat_value(r, key)))
            .collect();
        draw_leaderboard(panel, name, &top, theme::PRIMARY_BAR.to_rgba(), None, None)?;
    }

    root.present()?;
    Ok(())
}

/// The two grouped leaderboards: top 10 by total within each type,
/// counting primary+secondary membership and primary-only membership.
pub fn render_by_type(
    rows: &[PokemonRow],
    out_dir: &Path,
    images_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    anyhow::ensure!(!rows.is_empty(), "table is empty");

    let both = out_dir.join("top_10_total_stats_by_primary_and_secondary_elements.png");
    grouped(
        rows,
        &both,
        "Top 10 by Total Base Stat per Type (Primary or Secondary)",
        images_dir,
        |row, ty| row.elem_1 == ty || row.elem_2.as_deref() == Some(ty),
    )?;
    let primary_only = out_dir.join("top_10_total_stats_by_primary_only_elements.png");
    grouped(
        rows,
        &primary_only,
        "Top 10 by Total Base Stat per Type (Primary Only)",
        images_dir,
        |row, ty| row.elem_1 == ty,
    )?;

    Ok(vec![both, primary_only])
}

fn grouped(
    rows: &[PokemonRow],
    path: &Path,
    title: &str,
    images_dir: &Path,
    member: impl Fn(&PokemonRow, &str) -> bool,
) -> anyhow::Result<()> {
    let mut types: Vec<String> = rows
        .iter()
        .flat_map(|r| {
            std::iter::once(r.elem_1.clone()).chain(r.elem_2.iter().cloned())
        })
        .collect();
    types.sort();
    types.dedup();
    // Primary-only grouping may leave some types without members.
    types.retain(|ty| rows.iter().any(|r| member(r, ty)));

    let grid_rows = types.len().div_ceil(TYPE_COLS);
    let root = BitMapBackend::new(path, (TYPE_COLS as u32 * 450, 70 + grid_rows as u32 * 360))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let (header, body) = root.split_vertically(70);
    header.draw(&Text::new(
        title,
        (TYPE_COLS as i32 * 225, 8),
        theme::centered_title_font(),
    ))?;

    let panels = body.split_evenly((grid_rows, TYPE_COLS));
    for (index, ty) in types.iter().enumerate() {
        let mut members: Vec<&PokemonRow> = rows.iter().filter(|r| member(r, ty)).collect();
        members.sort_by_key(|r| std::cmp::Reverse(r.total));
        members.truncate(TOP_N);

        let entries: Vec<(&str, i64)> = members
            .iter()
            .map(|r| (r.pokemon.as_str(), r.total))
            .collect();
        draw_leaderboard(
            &panels[index],
            ty,
            &entries,
            theme::type_color(index).to_rgba(),
            Some(images_dir),
            Some(members.as_slice()),
        )?;
    }

    root.present()?;
    Ok(())
}

/// Horizontal top-10 bars, rank 1 at the top. When `images_dir` and the
/// member rows are given, a thumbnail is blitted next to each bar if
/// the entity's image file exists.
fn draw_leaderboard(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    title: &str,
    entries: &[(&str, i64)],
    bar_color: RGBAColor,
    images_dir: Option<&Path>,
    members: Option<&[&PokemonRow]>,
) -> anyhow::Result<()> {
    let x_max = entries.iter().map(|&(_, v)| v).max().unwrap_or(1) as f64 * 1.25;
    let n = entries.len().max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(title, theme::panel_title_font())
        .margin(12)
        .x_label_area_size(35)
        .y_label_area_size(20)
        .build_cartesian_2d(0f64..x_max, 0f64..n)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_y_axis()
        .label_style(theme::label_font())
        .draw()?;

    // Rank i renders at band n-1-i so rank 1 sits on top.
    chart.draw_series(entries.iter().enumerate().map(|(i, &(_, value))| {
        let y = n - 1.0 - i as f64;
        Rectangle::new(
            [(0.0, y + 0.15), (value as f64, y + 0.85)],
            bar_color.filled(),
        )
    }))?;

    chart.draw_series(entries.iter().enumerate().map(|(i, &(name, value))| {
        let y = n - 1.0 - i as f64;
        Text::new(
            format!("{} ({})", name, value),
            (value as f64 + x_max * 0.02, y + 0.5),
            theme::label_font().pos(plotters::style::text_anchor::Pos::new(
                plotters::style::text_anchor::HPos::Left,
                plotters::style::text_anchor::VPos::Center,
            )),
        )
    }))?;

    // Optional sprite thumbnails.
    if let (Some(images_dir), Some(members)) = (images_dir, members) {
        for (i, row) in members.iter().enumerate() {
            let image_path = images_dir.join(image_filename(&row.pokemon));
            if !image_path.exists() {
                continue;
            }
            let Ok(sprite) = image::open(&image_path) else {
                // Unreadable file is treated the same as absent.
                continue;
            };
            let sprite = sprite.thumbnail_exact(THUMB_SIZE, THUMB_SIZE);
            let y = n - 1.0 - i as f64;
            let elem: BitMapElement<_> = ((x_max * 0.01, y + 0.9), sprite).into();
            chart.draw_series(std::iter::once(elem))?;
        }
    }

    Ok(())
}
