//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the listing and detail pages and
//! run the full fetch-extract-append cycle against a CSV file on disk.

use anime_harvest::config::Config;
use anime_harvest::crawler::{run_harvest, Coordinator, HttpFetcher, RetryPolicy};
use anime_harvest::output::{LogObserver, NullObserver};
use anime_harvest::storage::{CsvStore, RecordStore};
use anime_harvest::{AnimeRecord, HarvestError, COLUMNS, SENTINEL};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, data_path: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.listing_url = format!("{}/topanime.php?limit=", base_url);
    config.output.data_path = data_path.display().to_string();
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config
}

fn listing_html(links: &[String]) -> String {
    let rows: String = links
        .iter()
        .map(|link| {
            format!(
                r#"<tr class="ranking-list"><td class="title al va-t word-break">
                <a class="hoverinfo_trigger fl-l ml12 mr8" href="{}"><img alt="cover"></a>
                </td></tr>"#,
                link
            )
        })
        .collect();
    format!(
        "<html><body><table class=\"top-ranking-table\">{}</table></body></html>",
        rows
    )
}

fn detail_html(title: &str) -> String {
    format!(
        r#"<html><body>
        <h1 class="title-name h1_bold_none"><strong>{}</strong></h1>
        <div class="spaceit_pad"><span class="dark_text">Type:</span>
          <a href="/topanime.php?type=tv">TV</a></div>
        <div class="spaceit_pad"><span class="dark_text">Episodes:</span>
          24
        </div>
        <div class="spaceit_pad"><span class="dark_text">Genres:</span>
          <span itemprop="genre" style="display: none">Sci-Fi</span><a href="/g/24">Sci-Fi</a>,
          <span itemprop="genre" style="display: none">Drama</span><a href="/g/8">Drama</a>
        </div>
        <div class="spaceit_pad"><span class="dark_text">Licensors:</span>
          None found, <a href="/dbchanges.php">add some</a></div>
        <div class="spaceit_pad"><span class="dark_text">Score:</span>
          <span itemprop="ratingValue" class="score-label">9.07</span></div>
        <div><h2>Synopsis</h2></div><p itemprop="description">A self-proclaimed mad scientist
        discovers a way to message the past.

        [Written by MAL Rewrite]</p>
        </body></html>"#,
        title
    )
}

/// Mounts a listing page at `offset` whose links point at detail pages
async fn mount_listing(server: &MockServer, offset: usize, ids: std::ops::Range<usize>) {
    let links: Vec<String> = ids
        .clone()
        .map(|id| format!("{}/anime/{}", server.uri(), id))
        .collect();

    Mock::given(method("GET"))
        .and(path("/topanime.php"))
        .and(query_param("limit", offset.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&links)))
        .expect(1)
        .mount(server)
        .await;

    for id in ids {
        Mock::given(method("GET"))
            .and(path(format!("/anime/{}", id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(detail_html(&format!("Anime {}", id))),
            )
            .mount(server)
            .await;
    }
}

/// Mounts a listing page that must never be requested
async fn forbid_listing(server: &MockServer, offset: usize) {
    Mock::given(method("GET"))
        .and(path("/topanime.php"))
        .and(query_param("limit", offset.to_string()))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

fn seed_rows(data_path: &Path, count: usize) {
    let mut store = CsvStore::initialize(data_path, true).expect("Failed to create store");
    for i in 0..count {
        store
            .append(&AnimeRecord::with_title(format!("Seeded {}", i)))
            .expect("Failed to seed row");
    }
}

#[tokio::test]
async fn test_full_harvest_from_empty_table() {
    let server = MockServer::start().await;
    mount_listing(&server, 0, 1..3).await;

    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("raw").join("anime_data.csv");
    let config = create_test_config(&server.uri(), &data_path);

    let summary = run_harvest(&config, false, &LogObserver)
        .await
        .expect("Harvest failed");

    assert_eq!(summary.items_stored, 2);
    assert_eq!(summary.end_offset, 50);

    let store = CsvStore::initialize(&data_path, false).unwrap();
    let records = store.records().unwrap();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.title, "Anime 1");
    assert_eq!(first.type_of_anime, "TV");
    assert_eq!(first.episodes, "24");
    assert_eq!(first.genres, "Drama, Sci-Fi");
    assert_eq!(first.licensors, SENTINEL);
    assert_eq!(first.english_title, SENTINEL);
    assert_eq!(first.rating, "9.07");
    assert_eq!(
        first.synopsis,
        "A self-proclaimed mad scientist discovers a way to message the past."
    );
    assert_eq!(records[1].title, "Anime 2");

    let header = std::fs::read_to_string(&data_path).unwrap();
    assert!(header.starts_with(&COLUMNS.join(",")));
}

#[tokio::test]
async fn test_resume_from_existing_rows() {
    let server = MockServer::start().await;
    forbid_listing(&server, 0).await;
    forbid_listing(&server, 50).await;
    mount_listing(&server, 100, 1..6).await;

    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("anime_data.csv");
    seed_rows(&data_path, 120);

    let config = create_test_config(&server.uri(), &data_path);
    let summary = run_harvest(&config, false, &NullObserver)
        .await
        .expect("Harvest failed");

    assert_eq!(summary.existing_rows, 120);
    assert_eq!(summary.start_offset, 100);
    assert_eq!(summary.end_offset, 150);

    let store = CsvStore::initialize(&data_path, false).unwrap();
    assert_eq!(store.count_rows().unwrap(), 125);

    let records = store.records().unwrap();
    assert_eq!(records[119].title, "Seeded 119");
    assert_eq!(records[120].title, "Anime 1");
    assert_eq!(records[124].title, "Anime 5");
}

#[tokio::test]
async fn test_redo_discards_rows_and_starts_over() {
    let server = MockServer::start().await;
    mount_listing(&server, 0, 1..2).await;

    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("anime_data.csv");
    seed_rows(&data_path, 60);

    let config = create_test_config(&server.uri(), &data_path);
    run_harvest(&config, true, &NullObserver)
        .await
        .expect("Harvest failed");

    let store = CsvStore::initialize(&data_path, false).unwrap();
    let records = store.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Anime 1");
}

#[tokio::test]
async fn test_end_of_listing_leaves_table_unchanged() {
    let server = MockServer::start().await;

    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("anime_data.csv");
    seed_rows(&data_path, 3);
    let before = std::fs::read_to_string(&data_path).unwrap();

    let config = create_test_config(&server.uri(), &data_path);
    let summary = run_harvest(&config, false, &NullObserver)
        .await
        .expect("Harvest failed");

    assert_eq!(summary.items_stored, 0);
    assert_eq!(summary.end_offset, 0);
    assert_eq!(std::fs::read_to_string(&data_path).unwrap(), before);
}

#[tokio::test]
async fn test_missing_item_page_is_fatal() {
    let server = MockServer::start().await;
    let links = vec![
        format!("{}/anime/1", server.uri()),
        format!("{}/anime/404", server.uri()),
        format!("{}/anime/3", server.uri()),
    ];

    Mock::given(method("GET"))
        .and(path("/topanime.php"))
        .and(query_param("limit", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&links)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/anime/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_html("Anime 1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/anime/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_html("Anime 3")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("anime_data.csv");
    let config = create_test_config(&server.uri(), &data_path);

    let result = run_harvest(&config, false, &NullObserver).await;
    assert!(matches!(result, Err(HarvestError::Fetch(_))));

    let store = CsvStore::initialize(&data_path, false).unwrap();
    assert_eq!(store.count_rows().unwrap(), 1);
}

#[tokio::test]
async fn test_item_without_title_is_fatal() {
    let server = MockServer::start().await;
    let links = vec![format!("{}/anime/7", server.uri())];

    Mock::given(method("GET"))
        .and(path("/topanime.php"))
        .and(query_param("limit", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&links)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/anime/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Maintenance</body></html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("anime_data.csv");
    let config = create_test_config(&server.uri(), &data_path);

    let result = run_harvest(&config, false, &NullObserver).await;
    assert!(matches!(result, Err(HarvestError::MissingTitle { .. })));
}

#[tokio::test]
async fn test_listing_server_error_is_not_end_of_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topanime.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("anime_data.csv");
    let config = create_test_config(&server.uri(), &data_path);

    let store = CsvStore::initialize(&data_path, false).unwrap();
    let fetcher = HttpFetcher::new(&config.http).unwrap();
    let mut coordinator = Coordinator::new(&config, fetcher, store)
        .unwrap()
        .with_retry(RetryPolicy::disabled());

    let result = coordinator.run(&NullObserver).await;
    assert!(matches!(result, Err(HarvestError::Fetch(_))));
    assert_eq!(coordinator.store().count_rows().unwrap(), 0);
}
