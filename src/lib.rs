// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # arrpoll
//!
//! Polls Sonarr and Radarr servers and turns their API responses into
//! time-series points, whichever API generation each server speaks.
//!
//! ## Features
//!
//! - **Version Detection**: Per-server API generation, cached, with operator overrides
//! - **Schema Adaptation**: Legacy and versioned payloads normalized into one record model
//! - **Pagination**: Paged endpoints reconciled into complete result sets
//! - **Identity Hashing**: Stable SHA-256 identity per emitted point
//! - **InfluxDB Output**: Line protocol over HTTP, or JSON lines for dry runs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use arrpoll::client::{ClientContext, RadarrClient};
//! use arrpoll::config::{HttpSettings, ServerConfig};
//! use arrpoll::output::MemoryWriter;
//! use arrpoll::version::{VersionCache, VersionResolver};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> arrpoll::Result<()> {
//!     let ctx = ClientContext::new(
//!         VersionResolver::new(VersionCache::new()),
//!         Arc::new(MemoryWriter::new()),
//!         HttpSettings::default(),
//!     );
//!     let server = ServerConfig::new(1, "http://radarr:7878", "api-key");
//!     let radarr = RadarrClient::connect(server, &ctx).await?;
//!     let written = radarr.missing().await?;
//!     println!("{written} missing movies on {}", radarr.version());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                 Poller (one task per operation)               │
//! └───────────────────────────────┬───────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┴───────────────────────────────┐
//! │        SonarrClient / RadarrClient  (version resolved once)   │
//! └──────┬───────────┬──────────────┬─────────────┬───────────────┘
//!        │           │              │             │
//! ┌──────┴────┐ ┌────┴─────┐ ┌──────┴─────┐ ┌─────┴──────┐ ┌────────┐
//! │ Version   │ │ Paginate │ │ Schema     │ │ Points     │→│ Output │
//! │ cache     │ │ page/    │ │ completion │ │ tags       │ │ Influx │
//! │ override  │ │ pageSize │ │ + serde    │ │ fields     │ │ stdout │
//! │ probe     │ │ total    │ │            │ │ hash       │ │        │
//! └───────────┘ └──────────┘ └────────────┘ └────────────┘ └────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// API version resolution and caching
pub mod version;

/// Raw response adaptation into normalized records
pub mod schema;

/// Paged endpoint reconciliation
pub mod pagination;

/// Point mapping and identity hashing
pub mod points;

/// Point writers
pub mod output;

/// Sonarr and Radarr façades
pub mod client;

/// Scheduling of façade operations
pub mod engine;

/// Configuration file
pub mod config;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{ClientContext, RadarrClient, SonarrClient};
pub use config::Config;
pub use engine::{PollStats, Poller};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
