//! Radarr façade

use super::common::{Connection, PAGE_SIZE};
use super::context::ClientContext;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::http::{RequestConfig, Transport};
use crate::pagination::PageReconciler;
use crate::points::{radarr_missing_points, radarr_queue_points};
use crate::schema::{adapt_all, Movie, Normalize, QueueItem};
use crate::types::{ApiVersion, ServiceType};
use chrono::Utc;
use std::sync::Arc;

const SERVICE: ServiceType = ServiceType::Radarr;

/// Per-server Radarr client exposing the poll operations
pub struct RadarrClient {
    conn: Connection,
}

impl RadarrClient {
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

    /// Monitored movies without a file
    pub async fn missing(&self) -> Result<usize> {
        let version = self.conn.version;
        let records = self
            .conn
            .fetch_records(&version.endpoint("movie"), RequestConfig::new(), Movie::ENTITY)
            .await?;

        let missing: Vec<Movie> = adapt_all::<Movie>(records, version)
            .into_iter()
            .filter(Movie::is_missing)
            .collect();
        let points = radarr_missing_points(&missing, self.conn.server.id, version, Utc::now());
        self.conn.emit(SERVICE, "missing", points).await
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
                        &[("includeMovie", "true"), ("includeUnknownMovieItems", "false")],
                    )
                    .await?
            }
        };

        let items: Vec<QueueItem> = adapt_all(records, version);
        let points = radarr_queue_points(&items, self.conn.server.id, version, Utc::now());
        self.conn.emit(SERVICE, "queue", points).await
    }
}

impl std::fmt::Debug for RadarrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadarrClient")
            .field("server", &self.conn.server.id)
            .field("url", &self.conn.server.base_url())
            .field("version", &self.conn.version)
            .finish()
    }
}
