//! Data models for the Pokédex pipeline.

use serde::{Deserialize, Serialize};

/// One entry from the index listing: the name as displayed there and the
/// absolute URL of its detail page.
///
/// Several display names may point at the same detail page (regional
/// forms share a base page); the listing is deduplicated by display name
/// only, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub display_name: String,
    pub detail_url: String,
}

/// Everything extracted from one detail page.
///
/// `pokedex_num` stays a string: the source renders it zero-padded
/// ("0025") and the padding is significant through serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct PokemonRecord {
    /// Name from the detail page header; the join key back to the listing.
    pub canonical_name: String,
    pub pokedex_num: String,
    pub elem_1: String,
    pub elem_2: Option<String>,
    pub species: String,
    pub height_m: f64,
    pub weight_kg: f64,
    pub male_pct: f64,
    pub female_pct: f64,
    pub hp: i64,
    pub attack: i64,
    pub defense: i64,
    pub sp_atk: i64,
    pub sp_def: i64,
    pub speed: i64,
    pub total: i64,
}

/// One row of the persisted table: the listing pair joined with its
/// extracted record. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRow {
    pub pokemon: String,
    pub url: String,
    pub pokedex_num: String,
    pub elem_1: String,
    pub elem_2: Option<String>,
    pub species: String,
    pub height_m: f64,
    pub weight_kg: f64,
    pub male_pct: f64,
    pub female_pct: f64,
    pub hp: i64,
    pub attack: i64,
    pub defense: i64,
    pub sp_atk: i64,
    pub sp_def: i64,
    pub speed: i64,
    pub total: i64,
}

impl PokemonRow {
    pub fn new(entry: &ListingEntry, record: &PokemonRecord) -> Self {
        Self {
            pokemon: entry.display_name.clone(),
            url: entry.detail_url.clone(),
            pokedex_num: record.pokedex_num.clone(),
            elem_1: record.elem_1.clone(),
            elem_2: record.elem_2.clone(),
            species: record.species.clone(),
            height_m: record.height_m,
            weight_kg: record.weight_kg,
            male_pct: record.male_pct,
            female_pct: record.female_pct,
            hp: record.hp,
            attack: record.attack,
            defense: record.defense,
            sp_atk: record.sp_atk,
            sp_def: record.sp_def,
            speed: record.speed,
            total: record.total,
        }
    }
}

/// Filesystem key for an entity: lower-cased, spaces replaced with
/// underscores. Image files are named `<entity_key>_image.jpg`.
pub fn entity_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Image filename for an entity.
pub fn image_filename(name: &str) -> String {
    format!("{}_image.jpg", entity_key(name))
}
