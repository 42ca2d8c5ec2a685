//! Record mapping
//!
//! Converts normalized records into `Point`s with a fixed tag and field
//! layout per service and category, plus a content-derived identity hash.
//!
//! The hash is the lowercase hex SHA-256 of `{server id}{title}{discriminator}`
//! and is always stored as the `hash` field, never as a tag.

mod hash;
mod point;
mod radarr;
mod sonarr;

pub use hash::identity_hash;
pub use point::{Point, Scalar};
pub use radarr::{radarr_missing_points, radarr_queue_points};
pub use sonarr::{sonarr_episode_points, sonarr_queue_points, EpisodeCategory};
