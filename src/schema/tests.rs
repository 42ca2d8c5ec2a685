//! Tests for schema adaptation

use super::*;
use crate::error::Error;
use crate::types::ApiVersion;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn v3_episode() -> serde_json::Value {
    json!({
        "id": 101,
        "seriesId": 7,
        "title": "Pilot",
        "seasonNumber": 1,
        "episodeNumber": 2,
        "airDateUtc": "2024-03-01T02:00:00Z",
        "monitored": true,
        "episodeFile": {"id": 55, "relativePath": "S01E02.mkv"},
        "series": {"title": "Show", "tvdbId": 1234},
        "unmonitoredSeason": false
    })
}

// ============================================================================
// Episode Tests
// ============================================================================

#[test]
fn test_episode_has_file_from_episode_file() {
    let episode: Episode = adapt(v3_episode(), ApiVersion::VersionedV3).unwrap();

    assert!(episode.has_file);
    assert_eq!(episode.episode_file_id, Some(55));
    assert_eq!(episode.series.title, "Show");
    assert_eq!(episode.sxe(), "S01E02");
    assert!(!episode.is_missing());
}

#[test]
fn test_episode_null_episode_file_means_missing() {
    let mut raw = v3_episode();
    raw["episodeFile"] = serde_json::Value::Null;

    let episode: Episode = adapt(raw, ApiVersion::VersionedV3).unwrap();

    assert!(!episode.has_file);
    assert_eq!(episode.episode_file_id, None);
    assert!(episode.is_missing());
}

#[test]
fn test_episode_null_title_reads_unknown() {
    let mut raw = v3_episode();
    raw["title"] = serde_json::Value::Null;

    let episode: Episode = adapt(raw, ApiVersion::VersionedV3).unwrap();

    assert_eq!(episode.title, "Unknown");
}

#[test]
fn test_episode_existing_has_file_is_kept() {
    let mut raw = v3_episode();
    raw["hasFile"] = json!(false);

    let episode: Episode = adapt(raw, ApiVersion::VersionedV3).unwrap();

    assert!(!episode.has_file);
}

#[test]
fn test_legacy_episode_passes_through() {
    let raw = json!({
        "id": 3,
        "title": "Finale",
        "seasonNumber": 10,
        "episodeNumber": 22,
        "airDateUtc": "2018-05-01T01:00:00Z",
        "monitored": true,
        "hasFile": false,
        "episodeFileId": 0,
        "series": {"title": "Long Show"}
    });

    let episode: Episode = adapt(raw, ApiVersion::LegacyV1).unwrap();

    assert_eq!(episode.sxe(), "S10E22");
    assert_eq!(episode.episode_file_id, Some(0));
    assert!(episode.is_missing());
}

#[test]
fn test_episode_missing_series_fails() {
    let mut raw = v3_episode();
    raw.as_object_mut().unwrap().remove("series");

    let err = adapt::<Episode>(raw, ApiVersion::VersionedV3).unwrap_err();

    match err {
        Error::SchemaMismatch { entity, message } => {
            assert_eq!(entity, "episode");
            assert!(message.contains("Pilot"));
            assert!(message.contains("series"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_non_object_record_fails() {
    let err = adapt::<Episode>(json!([1, 2]), ApiVersion::VersionedV3).unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { .. }));
}

// ============================================================================
// Movie Tests
// ============================================================================

#[test_case(json!({"id": 9}), true ; "movie file present")]
#[test_case(serde_json::Value::Null, false ; "movie file null")]
fn test_movie_has_file_from_movie_file(movie_file: serde_json::Value, expected: bool) {
    let raw = json!({
        "id": 1,
        "title": "Film",
        "year": 2020,
        "tmdbId": 603,
        "titleSlug": "film-603",
        "monitored": true,
        "isAvailable": true,
        "movieFile": movie_file
    });

    let movie: Movie = adapt(raw, ApiVersion::VersionedV3).unwrap();

    assert_eq!(movie.has_file, expected);
    assert_eq!(movie.display_name(), "Film (2020)");
}

#[test]
fn test_legacy_movie_downloaded_fallback() {
    let raw = json!({
        "id": 1,
        "title": "Old Film",
        "year": 1999,
        "tmdbId": 42,
        "titleSlug": "old-film-42",
        "monitored": true,
        "isAvailable": false,
        "downloaded": false
    });

    let movie: Movie = adapt(raw.clone(), ApiVersion::LegacyV1).unwrap();
    assert!(movie.is_missing());

    // Versioned servers always send hasFile; without it the record is invalid
    assert!(adapt::<Movie>(raw, ApiVersion::VersionedV3).is_err());
}

// ============================================================================
// Queue Tests
// ============================================================================

#[test_case("SABnzbd", Protocol::Usenet)]
#[test_case("NZBGet", Protocol::Usenet)]
#[test_case("My Usenet Box", Protocol::Usenet)]
#[test_case("qBittorrent", Protocol::Torrent)]
#[test_case("Transmission", Protocol::Torrent)]
fn test_queue_protocol_heuristic(client: &str, expected: Protocol) {
    let raw = json!({"id": 1, "downloadClient": client, "movie": {"title": "Film", "tmdbId": 1}});

    let item: QueueItem = adapt(raw, ApiVersion::VersionedV3).unwrap();

    assert_eq!(item.protocol, expected);
}

#[test]
fn test_queue_protocol_is_not_overwritten() {
    let raw = json!({"id": 1, "protocol": "torrent", "downloadClient": "SABnzbd"});

    let item: QueueItem = adapt(raw, ApiVersion::VersionedV3).unwrap();

    assert_eq!(item.protocol, Protocol::Torrent);
    assert_eq!(item.protocol.id(), 0);
}

#[test]
fn test_queue_without_protocol_or_client_fails() {
    let raw = json!({"id": 1, "title": "Release"});
    assert!(adapt::<QueueItem>(raw, ApiVersion::VersionedV3).is_err());
}

#[test]
fn test_queue_media() {
    let movie_item: QueueItem = adapt(
        json!({"id": 1, "protocol": "usenet", "movie": {"title": "Film", "tmdbId": 5}}),
        ApiVersion::VersionedV3,
    )
    .unwrap();
    let episode_item: QueueItem = adapt(
        json!({
            "id": 2,
            "protocol": "Torrent",
            "series": {"title": "Show"},
            "episode": {"seasonNumber": 1, "episodeNumber": 3, "title": "Third"},
            "quality": {"quality": {"id": 4, "name": "HDTV-720p"}, "revision": {"version": 1}}
        }),
        ApiVersion::LegacyV1,
    )
    .unwrap();
    let orphan: QueueItem = adapt(
        json!({"id": 3, "protocol": "usenet", "series": {"title": "Show"}}),
        ApiVersion::VersionedV3,
    )
    .unwrap();

    assert_eq!(
        movie_item.media(),
        Some(QueueMedia::Movie(MovieRef {
            title: "Film".into(),
            tmdb_id: 5
        }))
    );
    assert!(matches!(episode_item.media(), Some(QueueMedia::Episode { .. })));
    assert_eq!(episode_item.protocol, Protocol::Torrent);
    assert_eq!(episode_item.quality_name(), "HDTV-720p");
    assert_eq!(orphan.media(), None);
    assert_eq!(orphan.quality_name(), "Unknown");
}

#[test]
fn test_queue_null_text_reads_unknown() {
    let item: QueueItem = adapt(
        json!({
            "id": 4,
            "protocol": "usenet",
            "status": null,
            "series": {"title": "Show"},
            "episode": {"seasonNumber": 2, "episodeNumber": 1, "title": null},
            "quality": {"quality": {"id": 0, "name": null}}
        }),
        ApiVersion::VersionedV3,
    )
    .unwrap();

    assert_eq!(item.status, "Unknown");
    assert_eq!(item.quality_name(), "Unknown");
    match item.media() {
        Some(QueueMedia::Episode { episode, .. }) => assert_eq!(episode.title, "Unknown"),
        other => panic!("expected episode media, got {other:?}"),
    }
}

// ============================================================================
// Idempotence Tests
// ============================================================================

#[test]
fn test_adapt_is_idempotent() {
    let episode: Episode = adapt(v3_episode(), ApiVersion::VersionedV3).unwrap();
    let again: Episode = adapt(
        serde_json::to_value(&episode).unwrap(),
        ApiVersion::VersionedV3,
    )
    .unwrap();
    assert_eq!(again, episode);

    let item: QueueItem = adapt(
        json!({
            "id": 8,
            "title": "Film.2020.1080p",
            "downloadClient": "SABnzbd",
            "movie": {"title": "Film", "tmdbId": 5, "year": 2020},
            "size": 1000.0,
            "sizeleft": 250.0,
            "status": "downloading",
            "customFormatScore": 10
        }),
        ApiVersion::VersionedV3,
    )
    .unwrap();
    let again: QueueItem =
        adapt(serde_json::to_value(&item).unwrap(), ApiVersion::LegacyV1).unwrap();
    assert_eq!(again, item);
}

#[test]
fn test_completion_is_idempotent() {
    let serde_json::Value::Object(mut once) = v3_episode() else {
        unreachable!()
    };
    Episode::complete(&mut once, ApiVersion::VersionedV3);
    let mut twice = once.clone();
    Episode::complete(&mut twice, ApiVersion::VersionedV3);

    assert_eq!(twice, once);
}

#[test]
fn test_unknown_fields_are_dropped() {
    let episode: Episode = adapt(v3_episode(), ApiVersion::VersionedV3).unwrap();
    let value = serde_json::to_value(&episode).unwrap();

    assert!(value.get("unmonitoredSeason").is_none());
    assert!(value.get("episodeFile").is_none());
    assert_eq!(value["hasFile"], json!(true));
}

// ============================================================================
// Batch and Envelope Tests
// ============================================================================

#[test]
fn test_adapt_all_skips_bad_records() {
    let mut broken = v3_episode();
    broken.as_object_mut().unwrap().remove("seasonNumber");

    let episodes: Vec<Episode> = adapt_all(
        vec![v3_episode(), broken, json!("nonsense"), v3_episode()],
        ApiVersion::VersionedV3,
    );

    assert_eq!(episodes.len(), 2);
}

#[test]
fn test_records_from_body() {
    assert_eq!(
        records_from_body(json!([1, 2]), "episode").unwrap(),
        vec![json!(1), json!(2)]
    );
    assert_eq!(
        records_from_body(json!({"page": 1, "records": [{"id": 1}]}), "episode").unwrap(),
        vec![json!({"id": 1})]
    );
    assert!(records_from_body(json!({"message": "Unauthorized"}), "episode").is_err());
    assert!(records_from_body(json!({"records": {}}), "episode").is_err());
    assert!(records_from_body(json!("text"), "episode").is_err());
}

#[test]
fn test_guess_protocol() {
    assert_eq!(guess_protocol("sabnzbd"), "usenet");
    assert_eq!(guess_protocol("Deluge"), "torrent");
}
