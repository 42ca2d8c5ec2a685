//! Common types used throughout arrpoll
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type. Key order follows the response body.
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Service Type
// ============================================================================

/// Managed application category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// TV manager
    Sonarr,
    /// Movie manager
    Radarr,
}

impl ServiceType {
    /// Lower-case name, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sonarr => "sonarr",
            Self::Radarr => "radarr",
        }
    }

    /// Upper-case token used in override keys
    pub fn env_token(&self) -> &'static str {
        match self {
            Self::Sonarr => "SONARR",
            Self::Radarr => "RADARR",
        }
    }

    /// Measurement name for emitted points
    pub fn measurement(&self) -> &'static str {
        match self {
            Self::Sonarr => "Sonarr",
            Self::Radarr => "Radarr",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// API Version
// ============================================================================

/// API schema generation spoken by a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiVersion {
    /// Legacy single-tier API under `/api`
    #[serde(rename = "v1")]
    LegacyV1,
    /// Versioned API under `/api/v3`
    #[serde(rename = "v3")]
    VersionedV3,
}

impl ApiVersion {
    /// Probe candidates, most capable first
    pub const PROBE_ORDER: [ApiVersion; 2] = [ApiVersion::VersionedV3, ApiVersion::LegacyV1];

    /// Short token ("v1" / "v3")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LegacyV1 => "v1",
            Self::VersionedV3 => "v3",
        }
    }

    /// URL prefix for every endpoint of this generation
    pub fn api_prefix(&self) -> &'static str {
        match self {
            Self::LegacyV1 => "/api",
            Self::VersionedV3 => "/api/v3",
        }
    }

    /// Build an endpoint path under this generation's prefix
    pub fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.api_prefix(), resource.trim_start_matches('/'))
    }

    /// Status endpoint used when probing for this generation
    pub fn status_endpoint(&self) -> String {
        self.endpoint("system/status")
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    /// Accepts the operator override tokens `1`, `v1`, `3`, `v3`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "v1" => Ok(Self::LegacyV1),
            "3" | "v3" => Ok(Self::VersionedV3),
            other => Err(format!("unrecognized API version '{other}'")),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
