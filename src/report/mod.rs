//! Report rendering: statistical figures from the persisted table.
//!
//! Pure consumer of the table (plus, for the grouped leaderboards, the
//! downloaded image files). Every figure is computed independently from
//! the full table; a failing figure is logged and counted but does not
//! stop the rest.

pub mod data;
mod deviation;
mod heatmap;
mod histogram;
mod leaderboard;
mod radar;
mod scatter;
mod theme;
mod type_bars;

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::models::PokemonRow;

/// What happened during a full render pass.
#[derive(Debug, Default)]
pub struct RenderSummary {
    pub rendered: Vec<PathBuf>,
    pub failures: Vec<(&'static str, anyhow::Error)>,
}

impl RenderSummary {
    fn record(&mut self, name: &'static str, result: anyhow::Result<Vec<PathBuf>>) {
        match result {
            Ok(paths) => {
                for path in &paths {
                    info!(figure = name, path = %path.display(), "figure rendered");
                }
                self.rendered.extend(paths);
            }
            Err(e) => {
                error!(figure = name, error = %e, "figure failed");
                self.failures.push((name, e));
            }
        }
    }
}

/// Render every figure into `reports_dir`.
///
/// `images_dir` is only consulted by the grouped leaderboards, which
/// tolerate missing image files.
pub fn render_all(
    rows: &[PokemonRow],
    reports_dir: &Path,
    images_dir: &Path,
) -> std::io::Result<RenderSummary> {
    std::fs::create_dir_all(reports_dir)?;

    let mut summary = RenderSummary::default();
    summary.record(
        "height_vs_weight",
        scatter::render(rows, reports_dir).map(|p| vec![p]),
    );
    summary.record(
        "base_stat_distributions",
        histogram::render(rows, reports_dir).map(|p| vec![p]),
    );
    summary.record(
        "type_proportions",
        type_bars::render(rows, reports_dir).map(|p| vec![p]),
    );
    summary.record(
        "dual_type_frequency",
        heatmap::render(rows, reports_dir).map(|p| vec![p]),
    );
    summary.record(
        "type_stat_profiles",
        radar::render(rows, reports_dir).map(|p| vec![p]),
    );
    summary.record(
        "type_stat_deviations",
        deviation::render(rows, reports_dir).map(|p| vec![p]),
    );
    summary.record(
        "top_ten_by_stat",
        leaderboard::render_by_stat(rows, reports_dir).map(|p| vec![p]),
    );
    summary.record(
        "top_ten_by_type",
        leaderboard::render_by_type(rows, reports_dir, images_dir),
    );

    Ok(summary)
}
