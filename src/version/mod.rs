//! API version resolution
//!
//! Decides, per managed server, whether the legacy (`/api`) or the versioned
//! (`/api/v3`) API is live.
//!
//! # Overview
//!
//! Resolution short-circuits on the first hit:
//! 1. `VersionCache` lookup (no network)
//! 2. Operator override (`{SERVICE}_{id}_API_VERSION`)
//! 3. Live probe of `/api/v3/system/status`, then `/api/system/status`

mod cache;
mod overrides;
mod resolver;

pub use cache::{CacheKey, VersionCache};
pub use overrides::{override_key, read_override, EnvOverrides, MapOverrides, OverrideSource};
pub use resolver::VersionResolver;
