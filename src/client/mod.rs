//! Service façades
//!
//! One client per configured server. Each resolves the server's API version
//! once at connect time, then exposes the poll operations, choosing endpoints
//! and query parameters for that version:
//!
//! | Client | Operation | Legacy (`/api`) | Versioned (`/api/v3`) |
//! |---|---|---|---|
//! | Sonarr | `missing` | calendar over the look-back window | paged `wanted/missing` |
//! | Sonarr | `future` | calendar over the look-ahead window | calendar with series |
//! | Sonarr | `queue` | plain array | paged queue |
//! | Radarr | `missing` | movie list | movie list |
//! | Radarr | `queue` | plain array | paged queue |
//!
//! Every operation returns the number of points written.

mod common;
mod context;
mod radarr;
mod sonarr;

pub use common::PAGE_SIZE;
pub use context::ClientContext;
pub use radarr::RadarrClient;
pub use sonarr::SonarrClient;
