//! Point writers

use super::line_protocol::encode_points;
use crate::config::{HttpSettings, InfluxConfig};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::points::Point;
use async_trait::async_trait;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

/// Destination for emitted points
#[async_trait]
pub trait PointWriter: Send + Sync {
    /// Write a batch of points
    async fn write_points(&self, points: &[Point]) -> Result<()>;
}

// ============================================================================
// InfluxDB
// ============================================================================

/// Writes points to an InfluxDB 1.x `/write` endpoint
pub struct InfluxWriter {
    client: HttpClient,
    database: String,
    username: Option<String>,
    password: Option<String>,
}

impl InfluxWriter {
    /// Create a writer for the configured database
    pub fn new(config: &InfluxConfig, settings: &HttpSettings) -> Result<Self> {
        let http = HttpClientConfig::builder()
            .base_url(&config.url)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .max_retries(settings.max_retries)
            .verify_ssl(config.verify_ssl)
            .no_rate_limit()
            .build();

        Ok(Self {
            client: HttpClient::with_config(http)?,
            database: config.database.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn request_config(&self, body: String) -> RequestConfig {
        let mut config = RequestConfig::new()
            .query("db", &self.database)
            .query("precision", "ns")
            .header("Content-Type", "text/plain; charset=utf-8")
            .text(body);
        if let Some(username) = &self.username {
            config = config.query("u", username);
        }
        if let Some(password) = &self.password {
            config = config.query("p", password);
        }
        config
    }
}

#[async_trait]
impl PointWriter for InfluxWriter {
    async fn write_points(&self, points: &[Point]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        let body = encode_points(points)?;
        self.client
            .post_with_config("/write", self.request_config(body))
            .await?;
        info!("Wrote {} points to {}", points.len(), self.database);
        Ok(())
    }
}

impl std::fmt::Debug for InfluxWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfluxWriter")
            .field("url", &self.client.base_url())
            .field("database", &self.database)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// JSON lines
// ============================================================================

/// Writes one JSON object per point
pub struct JsonLinesWriter<W: Write + Send> {
    out: Mutex<W>,
}

impl JsonLinesWriter<std::io::Stdout> {
    /// Writer on standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the underlying sink
    pub fn into_inner(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|_| Error::output("JSON lines sink poisoned"))
    }
}

#[async_trait]
impl<W: Write + Send> PointWriter for JsonLinesWriter<W> {
    async fn write_points(&self, points: &[Point]) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::output("JSON lines sink poisoned"))?;
        for point in points {
            serde_json::to_writer(&mut *out, point)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        debug!("Printed {} points", points.len());
        Ok(())
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Collects points in memory
#[derive(Debug, Default)]
pub struct MemoryWriter {
    points: Mutex<Vec<Point>>,
    batches: Mutex<usize>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far
    pub fn points(&self) -> Vec<Point> {
        self.points
            .lock()
            .map(|points| points.clone())
            .unwrap_or_default()
    }

    /// Number of `write_points` calls received
    pub fn batches(&self) -> usize {
        self.batches.lock().map(|b| *b).unwrap_or_default()
    }

    /// Points whose `type` tag equals `category`
    pub fn points_of_type(&self, category: &str) -> Vec<Point> {
        self.points()
            .into_iter()
            .filter(|p| p.tag_value("type").and_then(|t| t.as_str()) == Some(category))
            .collect()
    }
}

#[async_trait]
impl PointWriter for MemoryWriter {
    async fn write_points(&self, points: &[Point]) -> Result<()> {
        self.points
            .lock()
            .map_err(|_| Error::output("memory sink poisoned"))?
            .extend_from_slice(points);
        *self
            .batches
            .lock()
            .map_err(|_| Error::output("memory sink poisoned"))? += 1;
        Ok(())
    }
}
