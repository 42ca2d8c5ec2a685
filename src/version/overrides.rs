//! Operator overrides for the API version
//!
//! Keys have the form `{SERVICE}_{server_id}_API_VERSION`, optionally
//! preceded by a configured prefix (`ARRPOLL_SONARR_1_API_VERSION`).

use crate::types::{ApiVersion, ServiceType};
use std::collections::HashMap;
use tracing::warn;

/// Source of operator-provided override values
pub trait OverrideSource: Send + Sync {
    /// Raw value for a key, if set
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads overrides from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvOverrides;

impl OverrideSource for EnvOverrides {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed override table
#[derive(Debug, Clone, Default)]
pub struct MapOverrides(pub HashMap<String, String>);

impl MapOverrides {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl OverrideSource for MapOverrides {
    fn lookup(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Build the override key for a server
pub fn override_key(prefix: Option<&str>, service: ServiceType, server_id: u32) -> String {
    let base = format!("{}_{server_id}_API_VERSION", service.env_token());
    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}_{base}", prefix.trim_end_matches('_')),
        None => base,
    }
}

/// Read and interpret the override for a server.
///
/// Unset or empty values yield `None`. Unrecognized values are logged and
/// ignored.
pub fn read_override(
    source: &dyn OverrideSource,
    prefix: Option<&str>,
    service: ServiceType,
    server_id: u32,
) -> Option<ApiVersion> {
    let key = override_key(prefix, service, server_id);
    let raw = source.lookup(&key)?;
    if raw.trim().is_empty() {
        return None;
    }

    match raw.parse::<ApiVersion>() {
        Ok(version) => Some(version),
        Err(reason) => {
            warn!(
                "Invalid {} API version in {}: {:?} ({}), probing instead",
                service, key, raw, reason
            );
            None
        }
    }
}
