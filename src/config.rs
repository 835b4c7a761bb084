//! Configuration for the acquisition pipeline.
//!
//! Defaults reproduce the constants the pipeline has always used, so an
//! invocation with no flags and no config file behaves identically to
//! previous runs. An optional `dexacquire.toml` in the working directory
//! (or a path given with `--config`) overrides individual values; CLI
//! flags override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::scrape::RetryPolicy;

/// Index page listing every Pokémon.
pub const DEFAULT_INDEX_URL: &str = "https://pokemondb.net/pokedex/all";

/// Base for resolving relative detail-page links.
pub const DEFAULT_BASE_URL: &str = "https://pokemondb.net";

/// Host that serves root-relative sprite references.
pub const DEFAULT_SPRITE_BASE_URL: &str = "https://img.pokemondb.net";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub index_url: String,
    pub base_url: String,
    pub sprite_base_url: String,

    /// Directory all artifacts live under.
    pub data_dir: PathBuf,
    pub table_file: String,
    pub images_dir: String,
    pub reports_dir: String,
    pub progress_file: String,
    pub failure_log: String,

    /// Fixed delay between entities, the only throttling in the crawl.
    pub request_delay_ms: u64,
    /// Attempts per entity in the image stage before it counts as failed.
    pub retry_limit: u32,
    /// Delay between retry attempts.
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            sprite_base_url: DEFAULT_SPRITE_BASE_URL.to_string(),
            data_dir: PathBuf::from("."),
            table_file: "pokemon_db.csv".to_string(),
            images_dir: "pokemon_images".to_string(),
            reports_dir: "pokemon_graphs".to_string(),
            progress_file: "downloaded_pokemon.txt".to_string(),
            failure_log: "failed_pokemon.txt".to_string(),
            request_delay_ms: 1_000,
            retry_limit: 3,
            retry_delay_ms: 2_000,
            request_timeout_secs: 30,
            user_agent: concat!("dexacquire/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load configuration, overlaying `dexacquire.toml` when present.
    ///
    /// An explicit path that does not exist is an error; the implicit
    /// default path is allowed to be absent.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from("dexacquire.toml"), false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("config file {} not found", path.display());
            }
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn table_path(&self) -> PathBuf {
        self.data_dir.join(&self.table_file)
    }

    pub fn images_path(&self) -> PathBuf {
        self.data_dir.join(&self.images_dir)
    }

    pub fn reports_path(&self) -> PathBuf {
        self.data_dir.join(&self.reports_dir)
    }

    pub fn progress_path(&self) -> PathBuf {
        self.data_dir.join(&self.progress_file)
    }

    pub fn failure_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.failure_log)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_limit, Duration::from_millis(self.retry_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.index_url, "https://pokemondb.net/pokedex/all");
        assert_eq!(config.table_file, "pokemon_db.csv");
        assert_eq!(config.retry_limit, 3);
        assert_eq!(config.request_delay_ms, 1_000);
        assert_eq!(config.retry_delay_ms, 2_000);
    }

    #[test]
    fn test_load_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dexacquire.toml");
        std::fs::write(&path, "retry_limit = 5\nimages_dir = \"art\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.retry_limit, 5);
        assert_eq!(config.images_dir, "art");
        // Untouched keys keep their defaults.
        assert_eq!(config.table_file, "pokemon_db.csv");
    }

    #[test]
    fn test_load_missing_explicit_path_errors() {
        assert!(Config::load(Some(Path::new("/nonexistent/dex.toml"))).is_err());
    }
}
