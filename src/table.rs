//! Table building and CSV persistence.
//!
//! The listing is joined back to the extracted records on
//! `display_name == canonical_name`. Variant entries whose detail-page
//! header differs from their listing name cannot join; they are
//! collected as `JoinError`s and reported instead of silently dropped.
//!
//! `pokedex_num` is carried as text end to end. The csv crate does not
//! infer column types on read, so a zero-padded identifier like
//! `"0025"` survives a write-then-read round trip.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, JoinError};
use crate::models::{ListingEntry, PokemonRecord, PokemonRow};

/// Join outcome: rows in listing order plus the entries that had no
/// matching record.
#[derive(Debug, Default)]
pub struct TableBuildOutcome {
    pub rows: Vec<PokemonRow>,
    pub mismatches: Vec<JoinError>,
}

/// Join listing entries to records.
///
/// Records are indexed by canonical name; each listing entry in order
/// either produces one row or one `JoinError`.
pub fn build(entries: &[ListingEntry], records: &[PokemonRecord]) -> TableBuildOutcome {
    let by_name: HashMap<&str, &PokemonRecord> = records
        .iter()
        .map(|r| (r.canonical_name.as_str(), r))
        .collect();

    let mut outcome = TableBuildOutcome::default();
    for entry in entries {
        match by_name.get(entry.display_name.as_str()) {
            Some(record) => outcome.rows.push(PokemonRow::new(entry, record)),
            None => {
                let mismatch = JoinError {
                    display_name: entry.display_name.clone(),
                    detail_url: entry.detail_url.clone(),
                };
                warn!(%mismatch, "listing entry dropped from table");
                outcome.mismatches.push(mismatch);
            }
        }
    }

    outcome
}

/// Write rows to a CSV file with a header row.
pub fn write(path: &Path, rows: &[PokemonRow]) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the persisted table back.
pub fn read(path: &Path) -> Result<Vec<PokemonRow>, Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Write rows, then re-read the file and verify the row count matches.
/// Returns the verified count.
pub fn write_verified(path: &Path, rows: &[PokemonRow]) -> Result<usize, Error> {
    write(path, rows)?;
    let reloaded = read(path)?;
    if reloaded.len() != rows.len() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "verification re-read returned {} rows, expected {}",
                reloaded.len(),
                rows.len()
            ),
        )));
    }
    info!(rows = reloaded.len(), path = %path.display(), "table written and verified");
    Ok(reloaded.len())
}
