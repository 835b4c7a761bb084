//! Durable progress tracking for resumable downloads.
//!
//! One entity key per line, append-only. Loaded into memory at startup
//! and consulted before every download; appended (and flushed) the
//! moment an entity reaches a terminal state that must not repeat. This
//! file is the only state shared across runs.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ProgressLog {
    path: PathBuf,
    seen: HashSet<String>,
}

impl ProgressLog {
    /// Load an existing log, or start empty when the file is absent.
    pub fn load(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let mut seen = HashSet::new();

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            for line in reader.lines() {
                let line = line?;
                let key = line.trim();
                if !key.is_empty() {
                    seen.insert(key.to_string());
                }
            }
        }

        Ok(Self { path, seen })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Record a key durably. Idempotent: re-recording a known key does
    /// not touch the file.
    pub fn record(&mut self, key: &str) -> std::io::Result<()> {
        if !self.seen.insert(key.to_string()) {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", key)?;
        file.flush()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_starts_empty_when_file_absent() {
        let dir = tempdir().unwrap();
        let log = ProgressLog::load(dir.path().join("progress.txt")).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_record_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.txt");

        let mut log = ProgressLog::load(&path).unwrap();
        log.record("bulbasaur").unwrap();
        log.record("ivysaur").unwrap();
        assert!(log.contains("bulbasaur"));

        let reloaded = ProgressLog::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("ivysaur"));
    }

    #[test]
    fn test_record_is_idempotent_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.txt");

        let mut log = ProgressLog::load(&path).unwrap();
        log.record("pikachu").unwrap();
        log.record("pikachu").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "pikachu\n");
    }

    #[test]
    fn test_blank_lines_ignored_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.txt");
        std::fs::write(&path, "bulbasaur\n\n  \nivysaur\n").unwrap();

        let log = ProgressLog::load(&path).unwrap();
        assert_eq!(log.len(), 2);
    }
}
