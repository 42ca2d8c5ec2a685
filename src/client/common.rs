//! Helpers shared by the service façades

use super::context::ClientContext;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, RequestConfig, Transport};
use crate::output::PointWriter;
use crate::points::Point;
use crate::schema::records_from_body;
use crate::types::{ApiVersion, Method, ServiceType};
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Page size requested from paged endpoints
pub const PAGE_SIZE: u32 = 250;

/// Transport and resolved version of one server
pub(crate) struct Connection {
    pub server: ServerConfig,
    pub transport: Arc<dyn Transport>,
    pub writer: Arc<dyn PointWriter>,
    pub version: ApiVersion,
}

impl Connection {
    /// Build the HTTP transport for `server` and resolve its version
    pub async fn open(
        service: ServiceType,
        server: ServerConfig,
        ctx: &ClientContext,
    ) -> Result<Self> {
        let client = HttpClient::with_config(HttpClientConfig::for_server(&server, &ctx.http))?;
        Ok(Self::with_transport(service, server, Arc::new(client), ctx).await)
    }

    /// Resolve the version over an existing transport.
    ///
    /// Falls back to the legacy API when resolution fails.
    pub async fn with_transport(
        service: ServiceType,
        server: ServerConfig,
        transport: Arc<dyn Transport>,
        ctx: &ClientContext,
    ) -> Self {
        let version = match ctx
            .resolver
            .resolve(service, &server, transport.as_ref())
            .await
        {
            Some(version) => version,
            None => {
                warn!(
                    "{} server {} version unknown, falling back to {}",
                    service,
                    server.id,
                    ApiVersion::LegacyV1
                );
                ApiVersion::LegacyV1
            }
        };

        Self {
            server,
            transport,
            writer: Arc::clone(&ctx.writer),
            version,
        }
    }

    /// GET a non-paged endpoint and extract its record list
    pub async fn fetch_records(
        &self,
        endpoint: &str,
        config: RequestConfig,
        entity: &str,
    ) -> Result<Vec<Value>> {
        let body = self.transport.fetch(Method::GET, endpoint, config).await?;
        records_from_body(body, entity)
    }

    /// Write points, skipping empty batches
    pub async fn emit(&self, service: ServiceType, operation: &str, points: Vec<Point>) -> Result<usize> {
        if points.is_empty() {
            debug!(
                "No {} {} points for server {}",
                service, operation, self.server.id
            );
            return Ok(0);
        }
        self.writer.write_points(&points).await?;
        info!(
            "{} {}: {} points from server {}",
            service,
            operation,
            points.len(),
            self.server.id
        );
        Ok(points.len())
    }
}

/// `start`/`end` query for a calendar window of whole days
pub fn calendar_window(start: NaiveDate, end: NaiveDate) -> RequestConfig {
    RequestConfig::new()
        .query("start", start.format("%Y-%m-%d"))
        .query("end", end.format("%Y-%m-%d"))
}

/// Current date in the host's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
