//! Sonarr point layout

use super::hash::identity_hash;
use super::point::Point;
use crate::schema::{sxe, Episode, QueueItem, QueueMedia};
use crate::types::{ApiVersion, ServiceType};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::debug;

/// Sonarr poll category, emitted as the `type` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeCategory {
    Missing,
    Future,
}

impl EpisodeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "Missing",
            Self::Future => "Future",
        }
    }
}

impl fmt::Display for EpisodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map calendar or wanted episodes to points
pub fn sonarr_episode_points(
    episodes: &[Episode],
    server_id: u32,
    category: EpisodeCategory,
    version: ApiVersion,
    time: DateTime<Utc>,
) -> Vec<Point> {
    episodes
        .iter()
        .map(|episode| {
            let sxe = episode.sxe();
            let hash = identity_hash(server_id, &episode.series.title, &sxe);
            Point::new(ServiceType::Sonarr.measurement(), time)
                .tag("type", category.as_str())
                .tag("sonarrId", episode.id)
                .tag("server", server_id)
                .tag("name", &episode.series.title)
                .tag("epname", &episode.title)
                .tag("sxe", sxe)
                .tag_opt("airsUTC", episode.air_date_utc.as_deref())
                .tag("downloaded", i64::from(episode.has_file))
                .tag("api_version", version.as_str())
                .field("hash", hash)
        })
        .collect()
}

/// Map queue entries to points; entries without an episode are skipped
pub fn sonarr_queue_points(
    items: &[QueueItem],
    server_id: u32,
    version: ApiVersion,
    time: DateTime<Utc>,
) -> Vec<Point> {
    items
        .iter()
        .filter_map(|item| {
            let Some(QueueMedia::Episode { series, episode }) = item.media() else {
                debug!("Skipping Sonarr queue item {} without episode", item.id);
                return None;
            };
            let sxe = sxe(episode.season_number, episode.episode_number);
            let quality = item.quality_name();
            let hash = identity_hash(server_id, &format!("{} {sxe}", series.title), quality);
            Some(
                Point::new(ServiceType::Sonarr.measurement(), time)
                    .tag("type", "Queue")
                    .tag("sonarrId", item.id)
                    .tag("server", server_id)
                    .tag("name", series.title)
                    .tag("epname", episode.title)
                    .tag("sxe", sxe)
                    .tag("protocol", item.protocol.as_str().to_uppercase())
                    .tag("protocol_id", item.protocol.id())
                    .tag("quality", quality)
                    .tag("api_version", version.as_str())
                    .field("hash", hash),
            )
        })
        .collect()
}
