//! Version resolution: cache, then operator override, then live probing

use super::cache::{CacheKey, VersionCache};
use super::overrides::{read_override, EnvOverrides, OverrideSource};
use crate::config::ServerConfig;
use crate::http::{RequestConfig, Transport};
use crate::types::{ApiVersion, Method, ServiceType};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Determines which API generation a server speaks
#[derive(Clone)]
pub struct VersionResolver {
    cache: VersionCache,
    overrides: Arc<dyn OverrideSource>,
    prefix: Option<String>,
}

impl VersionResolver {
    /// Resolver reading overrides from the process environment
    pub fn new(cache: VersionCache) -> Self {
        Self::with_overrides(cache, Arc::new(EnvOverrides))
    }

    /// Resolver with a custom override source
    pub fn with_overrides(cache: VersionCache, overrides: Arc<dyn OverrideSource>) -> Self {
        Self {
            cache,
            overrides,
            prefix: None,
        }
    }

    /// Set the override key prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Shared cache
    pub fn cache(&self) -> &VersionCache {
        &self.cache
    }

    /// Resolve the API version of `server`.
    ///
    /// Returns `None` when no probe succeeds; that outcome is not cached so a
    /// later call probes again.
    pub async fn resolve(
        &self,
        service: ServiceType,
        server: &ServerConfig,
        transport: &dyn Transport,
    ) -> Option<ApiVersion> {
        let key = CacheKey::new(service, &server.url, server.id);

        if let Some(version) = self.cache.get(&key).await {
            debug!(
                "{} API version for server {} from cache: {}",
                service, server.id, version
            );
            return Some(version);
        }

        if let Some(version) =
            read_override(self.overrides.as_ref(), self.prefix.as_deref(), service, server.id)
        {
            info!(
                "{} API forced to {} for server {}",
                service, version, server.id
            );
            self.cache.insert(key, version).await;
            return Some(version);
        }

        for version in ApiVersion::PROBE_ORDER {
            let endpoint = version.status_endpoint();
            match transport
                .fetch(Method::GET, &endpoint, RequestConfig::new())
                .await
            {
                Ok(status) => {
                    info!(
                        "{} API {} detected on {}",
                        service,
                        version,
                        server.base_url()
                    );
                    log_app_version(service, version, &status);
                    self.cache.insert(key, version).await;
                    return Some(version);
                }
                Err(e) => {
                    debug!("{} {} probe on {} failed: {}", service, version, endpoint, e);
                }
            }
        }

        error!(
            "Unable to detect {} API version on {}",
            service,
            server.base_url()
        );
        None
    }
}

impl std::fmt::Debug for VersionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionResolver")
            .field("cache", &self.cache)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

fn log_app_version(service: ServiceType, version: ApiVersion, status: &Value) {
    let Some(app_version) = status.get("version").and_then(Value::as_str) else {
        return;
    };
    info!("{} version {}", service, app_version);
    if service == ServiceType::Sonarr
        && version == ApiVersion::VersionedV3
        && app_version.starts_with("4.")
    {
        info!("Sonarr v4 detected, it speaks API v3");
    }
}
