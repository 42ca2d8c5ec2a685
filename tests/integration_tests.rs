//! Integration tests using mock HTTP servers
//!
//! Tests the full end-to-end flow: YAML configuration → version resolution →
//! paged/legacy fetches → adapted records → emitted points

use arrpoll::client::{ClientContext, RadarrClient, SonarrClient};
use arrpoll::config::{Config, HttpSettings, ServerConfig};
use arrpoll::engine::Poller;
use arrpoll::output::{build_writer, MemoryWriter};
use arrpoll::points::Scalar;
use arrpoll::template::TemplateContext;
use arrpoll::types::ApiVersion;
use arrpoll::version::{MapOverrides, VersionCache, VersionResolver};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn context(overrides: MapOverrides, writer: Arc<MemoryWriter>) -> ClientContext {
    let resolver = VersionResolver::with_overrides(VersionCache::new(), Arc::new(overrides));
    ClientContext::new(resolver, writer, HttpSettings::default())
}

async fn mount_status(server: &MockServer, endpoint: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"version": "0.2.0.1358"})))
        .mount(server)
        .await;
}

fn queue_page(page: u32, page_size: u32, total: u32) -> Value {
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);
    let records: Vec<Value> = (start..end)
        .map(|i| {
            let protocol = if i % 2 == 0 { "usenet" } else { "torrent" };
            json!({
                "id": i,
                "title": format!("Show.S01E{i:03}.720p"),
                "protocol": protocol,
                "series": {"title": "Long Running Show"},
                "episode": {"seasonNumber": 1 + i / 100, "episodeNumber": i % 100, "title": format!("Episode {i}")},
                "quality": {"quality": {"id": 4, "name": "HDTV-720p"}},
                "size": 1000.0,
                "sizeleft": 10.0,
                "status": "downloading"
            })
        })
        .collect();
    json!({
        "page": page,
        "pageSize": page_size,
        "sortKey": "timeleft",
        "sortDirection": "ascending",
        "totalRecords": total,
        "records": records
    })
}

// ============================================================================
// Legacy-only Server
// ============================================================================

#[tokio::test]
async fn test_legacy_only_radarr_missing() {
    let server = MockServer::start().await;
    mount_status(&server, "/api/v3/system/status", 404).await;
    mount_status(&server, "/api/system/status", 200).await;
    Mock::given(method("GET"))
        .and(path("/api/movie"))
        .and(header("X-Api-Key", "radarr-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "title": "Old Film",
                "year": 2015,
                "tmdbId": 4242,
                "titleSlug": "old-film-4242",
                "monitored": true,
                "downloaded": false,
                "isAvailable": true
            },
            {
                "id": 2,
                "title": "Owned Film",
                "year": 2016,
                "tmdbId": 4343,
                "titleSlug": "owned-film-4343",
                "monitored": true,
                "downloaded": true,
                "isAvailable": true
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let writer = Arc::new(MemoryWriter::new());
    let ctx = context(MapOverrides::new(), Arc::clone(&writer));
    let client = assert_ok!(
        RadarrClient::connect(ServerConfig::new(1, server.uri(), "radarr-key"), &ctx).await
    );

    assert_eq!(client.version(), ApiVersion::LegacyV1);
    assert_eq!(assert_ok!(client.missing().await), 1);

    let points = writer.points();
    let point = &points[0];
    assert_eq!(point.measurement, "Radarr");
    assert_eq!(point.tag_value("Missing_Available"), Some(&Scalar::Int(0)));
    assert_eq!(point.tag_value("name"), Some(&Scalar::from("Old Film (2015)")));
    assert_eq!(point.tag_value("api_version"), Some(&Scalar::from("v1")));
}

// ============================================================================
// Paged Queue
// ============================================================================

#[tokio::test]
async fn test_sonarr_paged_queue_of_620_items() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        Mock::given(method("GET"))
            .and(path("/api/v3/queue"))
            .and(query_param("page", page.to_string()))
            .and(query_param("pageSize", "250"))
            .and(query_param("includeEpisode", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(queue_page(page, 250, 620)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let writer = Arc::new(MemoryWriter::new());
    let ctx = context(
        MapOverrides::new().with("SONARR_1_API_VERSION", "v3"),
        Arc::clone(&writer),
    );
    let client = assert_ok!(
        SonarrClient::connect(ServerConfig::new(1, server.uri(), "key"), &ctx).await
    );

    assert_eq!(assert_ok!(client.queue().await), 620);

    let points = writer.points();
    assert_eq!(points.len(), 620);
    assert_eq!(writer.batches(), 1);
    let ids: Vec<i64> = points
        .iter()
        .filter_map(|p| p.tag_value("sonarrId").and_then(Scalar::as_i64))
        .collect();
    assert_eq!(ids, (0..620).collect::<Vec<_>>());
    let hashes: HashSet<&str> = points.iter().filter_map(|p| p.hash()).collect();
    assert_eq!(hashes.len(), 620);
}

#[tokio::test]
async fn test_paged_queue_failure_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/queue"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(queue_page(1, 250, 620)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/queue"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let writer = Arc::new(MemoryWriter::new());
    let ctx = context(
        MapOverrides::new().with("SONARR_1_API_VERSION", "v3"),
        Arc::clone(&writer),
    );
    let client = assert_ok!(
        SonarrClient::connect(ServerConfig::new(1, server.uri(), "key"), &ctx).await
    );

    assert_err!(client.queue().await);
    assert_eq!(writer.batches(), 0);
}

// ============================================================================
// Shared Version Cache
// ============================================================================

#[tokio::test]
async fn test_version_probed_once_per_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/system/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "4.0.1.929"})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(MapOverrides::new(), Arc::new(MemoryWriter::new()));
    let config = ServerConfig::new(1, server.uri(), "key");

    let first = assert_ok!(SonarrClient::connect(config.clone(), &ctx).await);
    let second = assert_ok!(SonarrClient::connect(config, &ctx).await);

    assert_eq!(first.version(), ApiVersion::VersionedV3);
    assert_eq!(second.version(), ApiVersion::VersionedV3);
    assert_eq!(ctx.resolver.cache().len().await, 1);
}

// ============================================================================
// Configuration to InfluxDB
// ============================================================================

#[tokio::test]
async fn test_config_to_influx_cycle() {
    let radarr = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/movie"))
        .and(header("X-Api-Key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "title": "Film",
            "year": 2022,
            "tmdbId": 77,
            "titleSlug": "film-77",
            "monitored": true,
            "movieFile": null,
            "isAvailable": false
        }])))
        .expect(1)
        .mount(&radarr)
        .await;
    let influx = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/write"))
        .and(query_param("db", "media"))
        .and(body_string_contains("Missing_Available=1"))
        .and(body_string_contains("api_version=v3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&influx)
        .await;

    let yaml = format!(
        r#"
output:
  kind: influx
  influx:
    url: {influx}
    database: media
override_prefix: ARRPOLL
radarr:
  - id: 3
    url: {radarr}
    api_key: "{{{{ env.RADARR_KEY }}}}"
    queue: false
"#,
        influx = influx.uri(),
        radarr = radarr.uri()
    );
    let mut templates = TemplateContext::new();
    templates.set_env("RADARR_KEY", "secret-key");
    let config = assert_ok!(Config::from_yaml(&yaml, &templates));

    let overrides = MapOverrides::new().with("ARRPOLL_RADARR_3_API_VERSION", "v3");
    let resolver = VersionResolver::with_overrides(VersionCache::new(), Arc::new(overrides))
        .with_prefix(config.override_prefix.clone());
    let writer = assert_ok!(build_writer(&config, false));
    let ctx = ClientContext::new(resolver, writer, config.http.clone());

    let poller = assert_ok!(Poller::connect(&config, &ctx).await);
    let stats = poller.run_once().await;

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.points_written, 1);
}

// ============================================================================
// Blocking entry
// ============================================================================

#[test]
fn test_connect_from_blocking_context() {
    let ctx = context(
        MapOverrides::new().with("RADARR_9_API_VERSION", "v1"),
        Arc::new(MemoryWriter::new()),
    );

    let client = tokio_test::block_on(RadarrClient::connect(
        ServerConfig::new(9, "http://127.0.0.1:9", "key"),
        &ctx,
    ));

    assert_eq!(assert_ok!(client).version(), ApiVersion::LegacyV1);
}
