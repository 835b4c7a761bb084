//! Share of Pokémon per elemental type, primary and secondary stacked.
//!
//! Primary shares are over all rows; secondary shares are over the rows
//! that have a secondary type, matching how the table has always been
//! summarized. Types are sorted by combined share, descending.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::models::PokemonRow;

use super::theme;

pub fn render(rows: &[PokemonRow], out_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = out_dir.join("element_type_stacked_bar.png");
    anyhow::ensure!(!rows.is_empty(), "table is empty");
    draw(rows, &path)?;
    Ok(path)
}

fn draw(rows: &[PokemonRow], path: &Path) -> anyhow::Result<()> {
    let mut primary: HashMap<&str, usize> = HashMap::new();
    let mut secondary: HashMap<&str, usize> = HashMap::new();
    let mut with_secondary = 0usize;
    for row in rows {
        *primary.entry(row.elem_1.as_str()).or_default() += 1;
        if let Some(elem_2) = &row.elem_2 {
            *secondary.entry(elem_2.as_str()).or_default() += 1;
            with_secondary += 1;
        }
    }

    let mut names: Vec<&str> = primary
        .keys()
        .chain(secondary.keys())
        .copied()
        .collect();
    names.sort_unstable();
    names.dedup();

    // (name, primary %, secondary %)
    let mut shares: Vec<(&str, f64, f64)> = names
        .into_iter()
        .map(|name| {
            let p = *primary.get(name).unwrap_or(&0) as f64 / rows.len() as f64 * 100.0;
            let s = if with_secondary == 0 {
                0.0
            } else {
                *secondary.get(name).unwrap_or(&0) as f64 / with_secondary as f64 * 100.0
            };
            (name, p, s)
        })
        .collect();
    shares.sort_by(|a, b| (b.1 + b.2).total_cmp(&(a.1 + a.2)));

    let y_max = shares
        .iter()
        .map(|(_, p, s)| p + s)
        .fold(1.0f64, f64::max)
        * 1.1;
    let n = shares.len();

    let root = BitMapBackend::new(path, (1400, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let (header, body) = root.split_vertically(80);
    header.draw(&Text::new(
        "Distribution of Pokémon Types by Primary and Secondary Categories",
        (700, 8),
        theme::centered_title_font(),
    ))?;
    header.draw(&Text::new(
        "Stacked Bar Chart Showing the Percentage of Pokémon by Elemental Type",
        (700, 48),
        theme::centered_subtitle_font(),
    ))?;

    let labels: Vec<String> = shares.iter().map(|(name, _, _)| name.to_string()).collect();
    let mut chart = ChartBuilder::on(&body)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..n as f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .x_label_formatter(&|v| {
            labels
                .get(v.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_label_formatter(&|v| format!("{:.0}%", v))
        .x_desc("Pokémon Type")
        .y_desc("Percentage (%)")
        .label_style(theme::label_font())
        .draw()?;

    chart
        .draw_series(shares.iter().enumerate().map(|(i, &(_, p, _))| {
            Rectangle::new(
                [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, p)],
                theme::PRIMARY_BAR.filled(),
            )
        }))?
        .label("Primary")
        .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], theme::PRIMARY_BAR.filled()));

    chart
        .draw_series(shares.iter().enumerate().map(|(i, &(_, p, s))| {
            Rectangle::new(
                [(i as f64 + 0.15, p), (i as f64 + 0.85, p + s)],
                theme::SECONDARY_BAR.filled(),
            )
        }))?
        .label("Secondary")
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 6), (x + 12, y + 6)], theme::SECONDARY_BAR.filled())
        });

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font(theme::label_font())
        .draw()?;

    root.present()?;
    Ok(())
}
