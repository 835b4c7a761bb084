//! dexacquire - Pokédex data acquisition and visualization pipeline.
//!
//! Scrapes entity attributes and images from pokemondb.net into a CSV
//! table plus an image directory, then renders a fixed set of
//! statistical figures from the persisted data.

pub mod cli;
pub mod config;
pub mod error;
pub mod images;
pub mod models;
pub mod progress;
pub mod report;
pub mod scrape;
pub mod table;
