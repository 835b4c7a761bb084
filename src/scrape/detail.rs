//! Detail-page fetch and attribute extraction.
//!
//! Extraction is all-or-nothing: a record is either fully populated or
//! the page fails with a descriptive `ParseError`. Lookups are by the
//! row's `<th>` label inside the vitals tables rather than by position,
//! which survives cosmetic reordering; for well-formed pages the result
//! is identical. Pages with variant tabs repeat the vitals tables once
//! per form — the first match in document order is the base form, which
//! is the one the listing links to.

use scraper::{ElementRef, Html, Selector};

use crate::error::{FetchError, ParseError};
use crate::models::PokemonRecord;

use super::Fetcher;

/// Fetch raw markup for one detail page. One request, no retry; the
/// caller decides how failures are isolated.
pub async fn fetch_detail_page(fetcher: &dyn Fetcher, url: &str) -> Result<String, FetchError> {
    fetcher.fetch_text(url).await
}

/// Parse a detail page into one record.
pub fn parse_detail(html: &str, url: &str) -> Result<PokemonRecord, ParseError> {
    let document = Html::parse_document(html);

    let h1_sel = Selector::parse("h1").expect("static selector");
    let canonical_name = document
        .select(&h1_sel)
        .next()
        .map(element_text)
        .filter(|name| !name.is_empty())
        .ok_or(ParseError::MissingElement {
            field: "page header",
            url: url.to_string(),
        })?;

    let pokedex_num = first_token(require_cell(&document, "National №", url)?).ok_or(
        ParseError::MissingElement {
            field: "National №",
            url: url.to_string(),
        },
    )?;

    let type_tokens = cell_tokens(require_cell(&document, "Type", url)?);
    let elem_1 = type_tokens.first().cloned().ok_or(ParseError::MissingElement {
        field: "Type",
        url: url.to_string(),
    })?;
    let elem_2 = type_tokens.get(1).cloned();

    let species = element_text(require_cell(&document, "Species", url)?);

    let height_m = parse_measurement(require_cell(&document, "Height", url)?, "m", "Height", url)?;
    let weight_kg = parse_measurement(require_cell(&document, "Weight", url)?, "kg", "Weight", url)?;

    let (male_pct, female_pct) = parse_gender(require_cell(&document, "Gender", url)?, url)?;

    let hp = stat_value(&document, "HP", url)?;
    let attack = stat_value(&document, "Attack", url)?;
    let defense = stat_value(&document, "Defense", url)?;
    let sp_atk = stat_value(&document, "Sp. Atk", url)?;
    let sp_def = stat_value(&document, "Sp. Def", url)?;
    let speed = stat_value(&document, "Speed", url)?;
    // Total is trusted from the page, never recomputed from the six.
    let total = stat_value(&document, "Total", url)?;

    Ok(PokemonRecord {
        canonical_name,
        pokedex_num,
        elem_1,
        elem_2,
        species,
        height_m,
        weight_kg,
        male_pct,
        female_pct,
        hp,
        attack,
        defense,
        sp_atk,
        sp_def,
        speed,
        total,
    })
}

/// Find the value cell of the first vitals-table row whose `<th>` label
/// matches, searching tables in document order.
fn vitals_cell<'a>(document: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    let table_sel = Selector::parse("table.vitals-table").expect("static selector");
    let row_sel = Selector::parse("tr").expect("static selector");
    let th_sel = Selector::parse("th").expect("static selector");
    let td_sel = Selector::parse("td").expect("static selector");

    for table in document.select(&table_sel) {
        for row in table.select(&row_sel) {
            let Some(th) = row.select(&th_sel).next() else {
                continue;
            };
            if normalize_label(&element_text(th)) == label {
                return row.select(&td_sel).next();
            }
        }
    }
    None
}

fn require_cell<'a>(
    document: &'a Html,
    label: &'static str,
    url: &str,
) -> Result<ElementRef<'a>, ParseError> {
    vitals_cell(document, label).ok_or(ParseError::MissingElement {
        field: label,
        url: url.to_string(),
    })
}

/// Full text of an element with surrounding whitespace trimmed.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text chunks of a cell with whitespace-only chunks discarded.
fn cell_tokens(cell: ElementRef<'_>) -> Vec<String> {
    cell.text()
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.trim().to_string())
        .collect()
}

fn first_token(cell: ElementRef<'_>) -> Option<String> {
    cell.text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// Labels on the page carry non-breaking spaces; compare after
/// normalizing them to plain spaces.
fn normalize_label(label: &str) -> String {
    label.replace('\u{a0}', " ").trim().to_string()
}

/// Parse a unit-suffixed measurement like `"0.7\u{a0}m (2′04″)"`:
/// strip the NBSP artifact, split on the unit, parse the prefix.
fn parse_measurement(
    cell: ElementRef<'_>,
    unit: &str,
    field: &'static str,
    url: &str,
) -> Result<f64, ParseError> {
    let raw = element_text(cell).replace('\u{a0}', "");
    let prefix = raw.split(unit).next().unwrap_or("").trim().to_string();
    prefix.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        field,
        value: raw,
        url: url.to_string(),
    })
}

/// Gender ratios from the gender cell.
///
/// `Genderless` anywhere in the tokens means both ratios are zero.
/// Otherwise the tokens are `[male%, separator, female%]`; the
/// separator is skipped by position and the percentages parsed with
/// their `%` suffix (and any trailing words) stripped.
fn parse_gender(cell: ElementRef<'_>, url: &str) -> Result<(f64, f64), ParseError> {
    let tokens = cell_tokens(cell);

    if tokens.iter().any(|t| t == "Genderless") {
        return Ok((0.0, 0.0));
    }

    if tokens.len() < 3 {
        return Err(ParseError::InvalidNumber {
            field: "Gender",
            value: tokens.join(" "),
            url: url.to_string(),
        });
    }

    let male = parse_percent(&tokens[0], url)?;
    let female = parse_percent(&tokens[2], url)?;
    Ok((male, female))
}

fn parse_percent(token: &str, url: &str) -> Result<f64, ParseError> {
    token
        .split('%')
        .next()
        .unwrap_or("")
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber {
            field: "Gender",
            value: token.to_string(),
            url: url.to_string(),
        })
}

/// Integer value of a stats-table row (HP, Attack, ..., Total).
fn stat_value(document: &Html, label: &'static str, url: &str) -> Result<i64, ParseError> {
    let cell = require_cell(document, label, url)?;
    let value = first_token(cell).ok_or(ParseError::MissingElement {
        field: label,
        url: url.to_string(),
    })?;
    value.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
        field: label,
        value,
        url: url.to_string(),
    })
}
