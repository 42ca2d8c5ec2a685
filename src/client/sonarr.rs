//! Sonarr façade

use super::common::{calendar_window, today, Connection, PAGE_SIZE};
use super::context::ClientContext;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::http::{RequestConfig, Transport};
use crate::pagination::PageReconciler;
use crate::points::{sonarr_episode_points, sonarr_queue_points, EpisodeCategory};
use crate::schema::{adapt_all, Episode, Normalize, QueueItem};
use crate::types::{ApiVersion, ServiceType};
use chrono::{Days, Utc};
use std::sync::Arc;

const SERVICE: ServiceType = ServiceType::Sonarr;

/// Per-server Sonarr client exposing the poll operations
pub struct SonarrClient {
    conn: Connection,
}

impl SonarrClient {
    /// Connect to `server` and resolve its API version
    pub async fn connect(server: ServerConfig, ctx: &ClientContext) -> Result<Self> {
        let conn = Connection::open(SERVICE, server, ctx).await?;
        Ok(Self { conn })
    }

    /// Connect over an existing transport
    pub async fn with_transport(
        server: ServerConfig,
        transport: Arc<dyn Transport>,
        ctx: &ClientContext,
    ) -> Self {
        let conn = Connection::with_transport(SERVICE, server, transport, ctx).await;
        Self { conn }
    }

    pub fn version(&self) -> ApiVersion {
        self.conn.version
    }

    pub fn server(&self) -> &ServerConfig {
        &self.conn.server
    }

    /// Monitored episodes without a file
    pub async fn missing(&self) -> Result<usize> {
        let version = self.conn.version;
        let records = match version {
            ApiVersion::LegacyV1 => {
                let end = today();
                let start = end
                    .checked_sub_days(Days::new(u64::from(self.conn.server.missing_days)))
                    .unwrap_or(end);
                self.conn
                    .fetch_records(
                        &version.endpoint("calendar"),
                        calendar_window(start, end),
                        Episode::ENTITY,
                    )
                    .await?
            }
            ApiVersion::VersionedV3 => {
                PageReconciler::new(self.conn.transport.as_ref())
                    .collect(
                        &version.endpoint("wanted/missing"),
                        PAGE_SIZE,
                        &[
                            ("sortKey", "airDateUtc"),
                            ("sortDirection", "descending"),
                            ("includeSeries", "true"),
                        ],
                    )
                    .await?
            }
        };

        let missing: Vec<Episode> = adapt_all::<Episode>(records, version)
            .into_iter()
            .filter(Episode::is_missing)
            .collect();
        let points = sonarr_episode_points(
            &missing,
            self.conn.server.id,
            EpisodeCategory::Missing,
            version,
            Utc::now(),
        );
        self.conn.emit(SERVICE, "missing", points).await
    }

    /// Episodes airing within the look-ahead window
    pub async fn future(&self) -> Result<usize> {
        let version = self.conn.version;
        let start = today();
        let end = start
            .checked_add_days(Days::new(u64::from(self.conn.server.future_days)))
            .unwrap_or(start);
        let mut config = calendar_window(start, end);
        if version == ApiVersion::VersionedV3 {
            config = config.query("includeSeries", true);
        }

        let records = self
            .conn
            .fetch_records(&version.endpoint("calendar"), config, Episode::ENTITY)
            .await?;
        let episodes: Vec<Episode> = adapt_all(records, version);
        let points = sonarr_episode_points(
            &episodes,
            self.conn.server.id,
            EpisodeCategory::Future,
            version,
            Utc::now(),
        );
        self.conn.emit(SERVICE, "future", points).await
    }

    /// Active downloads
    pub async fn queue(&self) -> Result<usize> {
        let version = self.conn.version;
        let endpoint = version.endpoint("queue");
        let records = match version {
            ApiVersion::LegacyV1 => {
                self.conn
                    .fetch_records(&endpoint, RequestConfig::new(), QueueItem::ENTITY)
                    .await?
            }
            ApiVersion::VersionedV3 => {
                PageReconciler::new(self.conn.transport.as_ref())
                    .collect(
                        &endpoint,
                        PAGE_SIZE,
                        &[
                            ("includeSeries", "true"),
                            ("includeEpisode", "true"),
                            ("includeUnknownSeriesItems", "false"),
                        ],
                    )
                    .await?
            }
        };

        let items: Vec<QueueItem> = adapt_all(records, version);
        let points = sonarr_queue_points(&items, self.conn.server.id, version, Utc::now());
        self.conn.emit(SERVICE, "queue", points).await
    }
}

impl std::fmt::Debug for SonarrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SonarrClient")
            .field("server", &self.conn.server.id)
            .field("url", &self.conn.server.base_url())
            .field("version", &self.conn.version)
            .finish()
    }
}
