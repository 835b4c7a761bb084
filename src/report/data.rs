//! Shared aggregation and regression helpers for the figures.

use std::collections::BTreeMap;

use crate::models::PokemonRow;

/// Column keys of the six base stats, in display order.
pub const STAT_KEYS: [&str; 6] = ["hp", "attack", "defense", "sp_atk", "sp_def", "speed"];

/// Human-readable names matching `STAT_KEYS`.
pub const STAT_DISPLAY: [&str; 6] = ["HP", "Attack", "Defense", "Sp. Attack", "Sp. Defense", "Speed"];

/// Look up a stat column on a row by key.
pub fn stat_value(row: &PokemonRow, key: &str) -> i64 {
    match key {
        "hp" => row.hp,
        "attack" => row.attack,
        "defense" => row.defense,
        "sp_atk" => row.sp_atk,
        "sp_def" => row.sp_def,
        "speed" => row.speed,
        "total" => row.total,
        _ => unreachable!("unknown stat key {key}"),
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Least-squares linear fit; returns `(slope, intercept)`.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return (0.0, 0.0);
    }
    let mx = mean(&xs[..n]);
    let my = mean(&ys[..n]);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for i in 0..n {
        let dx = xs[i] - mx;
        sxx += dx * dx;
        sxy += dx * (ys[i] - my);
    }
    if sxx == 0.0 {
        return (0.0, my);
    }
    let slope = sxy / sxx;
    (slope, my - slope * mx)
}

/// Pearson correlation coefficient.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let mx = mean(&xs[..n]);
    let my = mean(&ys[..n]);

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for i in 0..n {
        let dx = xs[i] - mx;
        let dy = ys[i] - my;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return 0.0;
    }
    sxy / (sxx.sqrt() * syy.sqrt())
}

/// Distinct primary types in alphabetical order.
pub fn primary_types(rows: &[PokemonRow]) -> Vec<String> {
    let mut types: Vec<String> = rows.iter().map(|r| r.elem_1.clone()).collect();
    types.sort();
    types.dedup();
    types
}

/// Mean of each base stat per primary type, alphabetical by type.
pub fn stat_means_by_primary_type(rows: &[PokemonRow]) -> Vec<(String, [f64; 6])> {
    let mut grouped: BTreeMap<&str, Vec<&PokemonRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.elem_1.as_str()).or_default().push(row);
    }

    grouped
        .into_iter()
        .map(|(ty, members)| {
            let mut means = [0.0f64; 6];
            for (i, key) in STAT_KEYS.iter().enumerate() {
                let values: Vec<f64> = members.iter().map(|r| stat_value(r, key) as f64).collect();
                means[i] = mean(&values);
            }
            (ty.to_string(), means)
        })
        .collect()
}

/// Overall mean of each base stat across all rows.
pub fn overall_stat_means(rows: &[PokemonRow]) -> [f64; 6] {
    let mut means = [0.0f64; 6];
    for (i, key) in STAT_KEYS.iter().enumerate() {
        let values: Vec<f64> = rows.iter().map(|r| stat_value(r, key) as f64).collect();
        means[i] = mean(&values);
    }
    means
}

/// Top `n` rows by a stat column, descending, ties in table order.
pub fn top_n_by<'a>(rows: &'a [PokemonRow], key: &str, n: usize) -> Vec<&'a PokemonRow> {
    let mut sorted: Vec<&PokemonRow> = rows.iter().collect();
    sorted.sort_by_key(|r| std::cmp::Reverse(stat_value(r, key)));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, elem_1: &str, elem_2: Option<&str>, stats: [i64; 6]) -> PokemonRow {
        PokemonRow {
            pokemon: name.to_string(),
            url: String::new(),
            pokedex_num: "0001".to_string(),
            elem_1: elem_1.to_string(),
            elem_2: elem_2.map(str::to_string),
            species: String::new(),
            height_m: 1.0,
            weight_kg: 10.0,
            male_pct: 50.0,
            female_pct: 50.0,
            hp: stats[0],
            attack: stats[1],
            defense: stats[2],
            sp_atk: stats[3],
            sp_def: stats[4],
            speed: stats[5],
            total: stats.iter().sum(),
        }
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let (slope, intercept) = linear_fit(&xs, &ys);
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&xs, &up) - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &down) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_input() {
        let xs = [1.0, 1.0, 1.0];
        let ys = [2.0, 3.0, 4.0];
        assert_eq!(pearson(&xs, &ys), 0.0);
    }

    #[test]
    fn test_stat_means_by_primary_type() {
        let rows = [
            row("A", "Grass", None, [10, 20, 30, 40, 50, 60]),
            row("B", "Grass", None, [30, 40, 50, 60, 70, 80]),
            row("C", "Fire", None, [100, 100, 100, 100, 100, 100]),
        ];
        let means = stat_means_by_primary_type(&rows);
        assert_eq!(means.len(), 2);
        // Alphabetical: Fire first.
        assert_eq!(means[0].0, "Fire");
        assert_eq!(means[1].0, "Grass");
        assert_eq!(means[1].1[0], 20.0); // mean HP of the two Grass rows
    }

    #[test]
    fn test_top_n_by_descending() {
        let rows = [
            row("A", "Grass", None, [10, 1, 1, 1, 1, 1]),
            row("B", "Fire", None, [30, 1, 1, 1, 1, 1]),
            row("C", "Water", None, [20, 1, 1, 1, 1, 1]),
        ];
        let top = top_n_by(&rows, "hp", 2);
        let names: Vec<&str> = top.iter().map(|r| r.pokemon.as_str()).collect();
        assert_eq!(names, ["B", "C"]);
    }
}
