//! End-to-end pipeline tests over an in-memory fetcher.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use dexacquire::config::Config;
use dexacquire::error::FetchError;
use dexacquire::images::ImageDownloader;
use dexacquire::models::{image_filename, ListingEntry, PokemonRow};
use dexacquire::report;
use dexacquire::scrape::{self, Fetcher};
use dexacquire::table;

/// Serves canned pages and blobs, counts every network call, and can
/// be told to fail specific URLs unconditionally.
#[derive(Default)]
struct FakeFetcher {
    pages: HashMap<String, String>,
    blobs: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, url: &str) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.check(url)?;
        self.pages.get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.check(url)?;
        self.blobs.get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn detail_page(name: &str, num: &str, artwork_url: &str) -> String {
    format!(
        r#"<html><body>
        <h1>{name}</h1>
        <a rel="lightbox" href="{artwork_url}"></a>
        <table class="vitals-table"><tbody>
            <tr><th>National №</th><td><strong>{num}</strong></td></tr>
            <tr><th>Type</th><td><a>Grass</a> <a>Poison</a></td></tr>
            <tr><th>Species</th><td>Seed Pokémon</td></tr>
            <tr><th>Height</th><td>0.7&nbsp;m (2′04″)</td></tr>
            <tr><th>Weight</th><td>6.9&nbsp;kg (15.2 lbs)</td></tr>
        </tbody></table>
        <table class="vitals-table"><tbody>
            <tr><th>Gender</th><td><span>87.5% male</span>, <span>12.5% female</span></td></tr>
        </tbody></table>
        <table class="vitals-table"><tbody>
            <tr><th>HP</th><td>45</td></tr>
            <tr><th>Attack</th><td>49</td></tr>
            <tr><th>Defense</th><td>49</td></tr>
            <tr><th>Sp.&nbsp;Atk</th><td>65</td></tr>
            <tr><th>Sp.&nbsp;Def</th><td>65</td></tr>
            <tr><th>Speed</th><td>45</td></tr>
            <tr><th>Total</th><td>318</td></tr>
        </tbody></table>
        </body></html>"#
    )
}

fn test_config(data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.data_dir = data_dir.to_path_buf();
    config.request_delay_ms = 0;
    config.retry_delay_ms = 0;
    config
}

fn two_entity_fetcher() -> FakeFetcher {
    let mut fetcher = FakeFetcher::default();
    fetcher.pages.insert(
        "https://pokemondb.net/pokedex/all".to_string(),
        r#"
        <a class="ent-name" href="/pokedex/bulbasaur">Bulbasaur</a>
        <a class="ent-name" href="/pokedex/ivysaur">Ivysaur</a>
        "#
        .to_string(),
    );
    fetcher.pages.insert(
        "https://pokemondb.net/pokedex/bulbasaur".to_string(),
        detail_page("Bulbasaur", "0001", "https://img.pokemondb.net/artwork/bulbasaur.jpg"),
    );
    fetcher.pages.insert(
        "https://pokemondb.net/pokedex/ivysaur".to_string(),
        detail_page("Ivysaur", "0002", "https://img.pokemondb.net/artwork/ivysaur.jpg"),
    );
    fetcher.blobs.insert(
        "https://img.pokemondb.net/artwork/bulbasaur.jpg".to_string(),
        vec![0xff, 0xd8, 0xff, 0x01],
    );
    fetcher.blobs.insert(
        "https://img.pokemondb.net/artwork/ivysaur.jpg".to_string(),
        vec![0xff, 0xd8, 0xff, 0x02],
    );
    fetcher
}

#[tokio::test]
async fn end_to_end_scrape_and_download() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let fetcher = two_entity_fetcher();

    // Scrape stage.
    let entries = scrape::fetch_listing(&fetcher, &config).await.unwrap();
    assert_eq!(entries.len(), 2);

    let outcome = scrape::crawl_details(&fetcher, &entries, config.request_delay(), |_| {}).await;
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.records.len(), 2);

    let built = table::build(&entries, &outcome.records);
    assert!(built.mismatches.is_empty());
    assert_eq!(table::write_verified(&config.table_path(), &built.rows).unwrap(), 2);

    let reloaded = table::read(&config.table_path()).unwrap();
    assert_eq!(reloaded[0].pokemon, "Bulbasaur");
    assert_eq!(reloaded[0].pokedex_num, "0001");

    // Image stage.
    let mut downloader = ImageDownloader::new(&fetcher, &config).unwrap();
    let summary = downloader.run(&entries, |_, _| {}).await.unwrap();
    assert_eq!(summary.downloaded, 2);
    assert!(summary.failed.is_empty());

    assert!(config.images_path().join("bulbasaur_image.jpg").exists());
    assert!(config.images_path().join("ivysaur_image.jpg").exists());

    let progress = std::fs::read_to_string(config.progress_path()).unwrap();
    assert_eq!(progress, "bulbasaur\nivysaur\n");

    let failures = std::fs::read_to_string(config.failure_log_path()).unwrap();
    assert!(failures.is_empty());
}

#[tokio::test]
async fn second_image_run_makes_no_network_calls() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let fetcher = two_entity_fetcher();

    let entries = vec![
        ListingEntry {
            display_name: "Bulbasaur".to_string(),
            detail_url: "https://pokemondb.net/pokedex/bulbasaur".to_string(),
        },
        ListingEntry {
            display_name: "Ivysaur".to_string(),
            detail_url: "https://pokemondb.net/pokedex/ivysaur".to_string(),
        },
    ];

    let mut downloader = ImageDownloader::new(&fetcher, &config).unwrap();
    downloader.run(&entries, |_, _| {}).await.unwrap();
    let calls_after_first = fetcher.calls();
    assert!(calls_after_first > 0);

    // Fresh downloader, same progress state on disk.
    let mut downloader = ImageDownloader::new(&fetcher, &config).unwrap();
    let summary = downloader.run(&entries, |_, _| {}).await.unwrap();
    assert_eq!(summary.skipped, 2);
    assert_eq!(fetcher.calls(), calls_after_first);
}

#[tokio::test]
async fn retry_exhaustion_is_logged_once_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let mut fetcher = two_entity_fetcher();
    fetcher
        .failing
        .insert("https://pokemondb.net/pokedex/bulbasaur".to_string());

    let entries = vec![
        ListingEntry {
            display_name: "Bulbasaur".to_string(),
            detail_url: "https://pokemondb.net/pokedex/bulbasaur".to_string(),
        },
        ListingEntry {
            display_name: "Ivysaur".to_string(),
            detail_url: "https://pokemondb.net/pokedex/ivysaur".to_string(),
        },
    ];

    let mut downloader = ImageDownloader::new(&fetcher, &config).unwrap();
    let summary = downloader.run(&entries, |_, _| {}).await.unwrap();

    // Exactly retry_limit attempts for the failing entity, then on to
    // the next one.
    assert_eq!(summary.failed, vec!["bulbasaur".to_string()]);
    assert_eq!(summary.downloaded, 1);
    // 3 failing page fetches + 1 page + 1 image for Ivysaur.
    assert_eq!(fetcher.calls(), config.retry_limit as usize + 2);

    let failures = std::fs::read_to_string(config.failure_log_path()).unwrap();
    assert_eq!(failures, "bulbasaur\n");

    // The failed entity is not in the progress set, so a later run can
    // try again.
    let progress = std::fs::read_to_string(config.progress_path()).unwrap();
    assert_eq!(progress, "ivysaur\n");
}

#[tokio::test]
async fn no_image_reference_is_recorded_as_done_without_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let mut fetcher = FakeFetcher::default();
    let mut page = detail_page("Ditto", "0132", "unused");
    page = page.replace(r#"<a rel="lightbox" href="unused"></a>"#, "");
    fetcher
        .pages
        .insert("https://pokemondb.net/pokedex/ditto".to_string(), page);

    let entries = vec![ListingEntry {
        display_name: "Ditto".to_string(),
        detail_url: "https://pokemondb.net/pokedex/ditto".to_string(),
    }];

    let mut downloader = ImageDownloader::new(&fetcher, &config).unwrap();
    let summary = downloader.run(&entries, |_, _| {}).await.unwrap();
    assert_eq!(summary.no_image, 1);
    assert!(!config.images_path().join("ditto_image.jpg").exists());

    // Recorded as done: a second run skips it without a network call.
    let calls = fetcher.calls();
    let mut downloader = ImageDownloader::new(&fetcher, &config).unwrap();
    let summary = downloader.run(&entries, |_, _| {}).await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(fetcher.calls(), calls);
}

fn table_row(
    name: &str,
    num: &str,
    elem_1: &str,
    elem_2: Option<&str>,
    height_m: f64,
    weight_kg: f64,
    stats: [i64; 6],
) -> PokemonRow {
    PokemonRow {
        pokemon: name.to_string(),
        url: format!("https://pokemondb.net/pokedex/{}", name.to_lowercase()),
        pokedex_num: num.to_string(),
        elem_1: elem_1.to_string(),
        elem_2: elem_2.map(str::to_string),
        species: "Test Pokémon".to_string(),
        height_m,
        weight_kg,
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
fn render_all_writes_every_figure() {
    let dir = tempfile::tempdir().unwrap();
    let reports_dir = dir.path().join("pokemon_graphs");
    let images_dir = dir.path().join("pokemon_images");
    std::fs::create_dir_all(&images_dir).unwrap();

    let rows = vec![
        table_row("Bulbasaur", "0001", "Grass", Some("Poison"), 0.7, 6.9, [45, 49, 49, 65, 65, 45]),
        table_row("Charmander", "0004", "Fire", None, 0.6, 8.5, [39, 52, 43, 60, 50, 65]),
        table_row("Squirtle", "0007", "Water", None, 0.5, 9.0, [44, 48, 65, 50, 64, 43]),
        table_row("Gengar", "0094", "Ghost", Some("Poison"), 1.5, 40.5, [60, 65, 60, 130, 75, 110]),
        table_row("Onix", "0095", "Rock", Some("Ground"), 8.8, 210.0, [35, 45, 160, 30, 45, 70]),
        table_row("Gyarados", "0130", "Water", Some("Flying"), 6.5, 235.0, [95, 125, 79, 60, 100, 81]),
    ];

    // One entity has a decodable thumbnail on disk; the leaderboards
    // must tolerate the absent files of the rest.
    image::RgbImage::from_pixel(8, 8, image::Rgb([90, 140, 200]))
        .save(images_dir.join(image_filename("Bulbasaur")))
        .unwrap();

    let summary = report::render_all(&rows, &reports_dir, &images_dir).unwrap();
    let failed: Vec<&str> = summary.failures.iter().map(|(name, _)| *name).collect();
    assert!(failed.is_empty(), "figures failed: {:?}", failed);
    assert_eq!(summary.rendered.len(), 9);

    for name in [
        "height_vs_weight_comparison.png",
        "base_stat_distrib_histogram.png",
        "element_type_stacked_bar.png",
        "dual_type_heat_graph.png",
        "avg_base_stats_by_element_type_radial_graphs.png",
        "deviations_in_base_stats_by_element_type_bar.png",
        "top_10_by_base_stat.png",
        "top_10_total_stats_by_primary_and_secondary_elements.png",
        "top_10_total_stats_by_primary_only_elements.png",
    ] {
        assert!(reports_dir.join(name).exists(), "missing {name}");
    }
}

#[test]
fn render_all_rejects_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let reports_dir = dir.path().join("pokemon_graphs");
    let images_dir = dir.path().join("pokemon_images");

    let summary = report::render_all(&[], &reports_dir, &images_dir).unwrap();
    assert!(summary.rendered.is_empty());
    // Every figure reports the empty table instead of writing a blank chart.
    assert_eq!(summary.failures.len(), 8);
}
