//! Radarr point layout

use super::hash::identity_hash;
use super::point::Point;
use crate::schema::{Movie, QueueItem, QueueMedia};
use crate::types::{ApiVersion, ServiceType};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Map missing movies to points
pub fn radarr_missing_points(
    movies: &[Movie],
    server_id: u32,
    version: ApiVersion,
    time: DateTime<Utc>,
) -> Vec<Point> {
    movies
        .iter()
        .map(|movie| {
            let name = movie.display_name();
            let hash = identity_hash(server_id, &name, movie.tmdb_id);
            Point::new(ServiceType::Radarr.measurement(), time)
                .tag("type", "Missing")
                .tag("Missing", true)
                .tag("Missing_Available", i64::from(!movie.is_available))
                .tag("tmdbId", movie.tmdb_id)
                .tag("server", server_id)
                .tag("name", name)
                .tag("titleSlug", &movie.title_slug)
                .tag("api_version", version.as_str())
                .field("hash", hash)
        })
        .collect()
}

/// Map queue entries to points; entries without a movie are skipped
pub fn radarr_queue_points(
    items: &[QueueItem],
    server_id: u32,
    version: ApiVersion,
    time: DateTime<Utc>,
) -> Vec<Point> {
    items
        .iter()
        .filter_map(|item| {
            let Some(QueueMedia::Movie(movie)) = item.media() else {
                debug!("Skipping Radarr queue item {} without movie", item.id);
                return None;
            };
            let quality = item.quality_name();
            let hash = identity_hash(server_id, &movie.title, quality);
            Some(
                Point::new(ServiceType::Radarr.measurement(), time)
                    .tag("type", "Queue")
                    .tag("tmdbId", movie.tmdb_id)
                    .tag("server", server_id)
                    .tag("name", movie.title)
                    .tag("quality", quality)
                    .tag("size", item.size)
                    .tag_opt("title", item.title.as_deref())
                    .tag_opt("timeleft", item.timeleft.as_deref())
                    .tag_opt(
                        "estimatedCompletionTime",
                        item.estimated_completion_time.as_deref(),
                    )
                    .tag("status", &item.status)
                    .tag_opt("trackedDownloadState", item.tracked_download_state.as_deref())
                    .tag_opt(
                        "trackedDownloadStatus",
                        item.tracked_download_status.as_deref(),
                    )
                    .tag_opt("downloadClient", item.download_client.as_deref())
                    .tag("protocol", item.protocol.as_str())
                    .tag_opt("indexer", item.indexer.as_deref())
                    .tag_opt("outputPath", item.output_path.as_deref())
                    .tag("id", item.id)
                    .tag("api_version", version.as_str())
                    .field("hash", hash)
                    .field("sizeleft", item.sizeleft)
                    .field_opt("customFormatScore", item.custom_format_score),
            )
        })
        .collect()
}
