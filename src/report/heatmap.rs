//! Dual-type frequency: primary × secondary count matrices, one sorted
//! by row frequency and one alphabetical, stacked vertically.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::models::PokemonRow;

use super::theme;

struct Matrix {
    primaries: Vec<String>,
    secondaries: Vec<String>,
    counts: Vec<Vec<usize>>,
    max: usize,
}

pub fn render(rows: &[PokemonRow], out_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = out_dir.join("dual_type_heat_graph.png");
    draw(rows, &path)?;
    Ok(path)
}

fn draw(rows: &[PokemonRow], path: &Path) -> anyhow::Result<()> {
    let alphabetical = build_matrix(rows)?;
    let sorted = sort_by_frequency(&alphabetical);

    let root = BitMapBackend::new(path, (1100, 1900)).into_drawing_area();
    root.fill(&WHITE)?;

    let (header, body) = root.split_vertically(60);
    header.draw(&Text::new(
        "Frequency of Dual-Type Pokémon",
        (550, 8),
        theme::centered_title_font(),
    ))?;

    let panels = body.split_evenly((2, 1));
    draw_heatmap(&panels[0], &sorted, "Sorted by Primary-Type Frequency")?;
    draw_heatmap(&panels[1], &alphabetical, "Alphabetical Order")?;

    root.present()?;
    Ok(())
}

fn build_matrix(rows: &[PokemonRow]) -> anyhow::Result<Matrix> {
    let mut counts: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    let mut secondary_set: BTreeSet<&str> = BTreeSet::new();

    for row in rows {
        let Some(elem_2) = &row.elem_2 else { continue };
        *counts
            .entry(row.elem_1.as_str())
            .or_default()
            .entry(elem_2.as_str())
            .or_default() += 1;
        secondary_set.insert(elem_2.as_str());
    }
    anyhow::ensure!(!counts.is_empty(), "no dual-type rows in table");

    let primaries: Vec<String> = counts.keys().map(|s| s.to_string()).collect();
    let secondaries: Vec<String> = secondary_set.iter().map(|s| s.to_string()).collect();

    let grid: Vec<Vec<usize>> = primaries
        .iter()
        .map(|p| {
            secondaries
                .iter()
                .map(|s| {
                    counts
                        .get(p.as_str())
                        .and_then(|inner| inner.get(s.as_str()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    let max = grid
        .iter()
        .flat_map(|row| row.iter())
        .copied()
        .max()
        .unwrap_or(1)
        .max(1);

    Ok(Matrix {
        primaries,
        secondaries,
        counts: grid,
        max,
    })
}

/// Reorder rows by their total count, descending; columns stay
/// alphabetical in both variants.
fn sort_by_frequency(matrix: &Matrix) -> Matrix {
    let mut order: Vec<usize> = (0..matrix.primaries.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(matrix.counts[i].iter().sum::<usize>()));

    Matrix {
        primaries: order.iter().map(|&i| matrix.primaries[i].clone()).collect(),
        secondaries: matrix.secondaries.clone(),
        counts: order.iter().map(|&i| matrix.counts[i].clone()).collect(),
        max: matrix.max,
    }
}

fn draw_heatmap(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    matrix: &Matrix,
    title: &str,
) -> anyhow::Result<()> {
    let n_rows = matrix.primaries.len();
    let n_cols = matrix.secondaries.len();

    let mut chart = ChartBuilder::on(area)
        .caption(title, theme::panel_title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(0f64..n_cols as f64, 0f64..n_rows as f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n_cols)
        .y_labels(n_rows)
        .x_label_formatter(&|v| {
            matrix
                .secondaries
                .get(v.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_label_formatter(&|v| {
            matrix
                .primaries
                .get(v.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .x_desc("Secondary Type")
        .y_desc("Primary Type")
        .label_style(theme::label_font())
        .draw()?;

    chart.draw_series(matrix.counts.iter().enumerate().flat_map(|(i, row)| {
        let max = matrix.max;
        row.iter().enumerate().map(move |(j, &count)| {
            let intensity = count as f64 / max as f64;
            let color = theme::PRIMARY_BAR.mix(intensity.max(0.03));
            Rectangle::new(
                [(j as f64, i as f64), (j as f64 + 1.0, i as f64 + 1.0)],
                color.filled(),
            )
        })
    }))?;

    // Count annotations on non-empty cells.
    chart.draw_series(matrix.counts.iter().enumerate().flat_map(|(i, row)| {
        row.iter().enumerate().filter(|&(_, &c)| c > 0).map(move |(j, &count)| {
            Text::new(
                count.to_string(),
                (j as f64 + 0.5, i as f64 + 0.5),
                theme::centered_label_font(),
            )
        })
    }))?;

    Ok(())
}
