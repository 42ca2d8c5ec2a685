//! Configuration types
//!
//! The poller is configured from a single YAML file describing the output
//! sink, HTTP tuning and the list of managed servers per service type.
//! `{{ env.NAME }}` placeholders are interpolated before parsing.

use crate::error::{Error, Result, ResultExt};
use crate::template::{self, TemplateContext};
use crate::types::ServiceType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete poller configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where emitted points go
    #[serde(default)]
    pub output: OutputConfig,

    /// HTTP client tuning shared by every managed server
    #[serde(default)]
    pub http: HttpSettings,

    /// Optional prefix for API version override variables
    #[serde(default)]
    pub override_prefix: Option<String>,

    /// TV manager servers
    #[serde(default)]
    pub sonarr: Vec<ServerConfig>,

    /// Movie manager servers
    #[serde(default)]
    pub radarr: Vec<ServerConfig>,
}

impl Config {
    /// Load, interpolate and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&contents, &TemplateContext::from_env())
    }

    /// Parse configuration text with the given template context
    pub fn from_yaml(contents: &str, ctx: &TemplateContext) -> Result<Self> {
        let rendered = template::render(contents, ctx)?;
        let config: Config = serde_yaml::from_str(&rendered)?;
        config.validate()?;
        Ok(config)
    }

    /// Servers configured for a service type
    pub fn servers(&self, service: ServiceType) -> &[ServerConfig] {
        match service {
            ServiceType::Sonarr => &self.sonarr,
            ServiceType::Radarr => &self.radarr,
        }
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<()> {
        for service in [ServiceType::Sonarr, ServiceType::Radarr] {
            let mut seen = HashSet::new();
            for server in self.servers(service) {
                if !seen.insert(server.id) {
                    return Err(Error::invalid_value(
                        format!("{service}.id"),
                        format!("duplicate server id {}", server.id),
                    ));
                }
                server.validate(service)?;
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be greater than 0",
            ));
        }

        if self.output.kind == OutputKind::Influx {
            let influx = self
                .output
                .influx
                .as_ref()
                .ok_or_else(|| Error::missing_field("output.influx"))?;
            url::Url::parse(&influx.url)?;
            if influx.database.trim().is_empty() {
                return Err(Error::missing_field("output.influx.database"));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Output
// ============================================================================

/// Output sink selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// InfluxDB line protocol over HTTP
    Influx,
    /// JSON lines on stdout
    #[default]
    Stdout,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Sink kind
    #[serde(default)]
    pub kind: OutputKind,

    /// InfluxDB settings (required for `kind: influx`)
    #[serde(default)]
    pub influx: Option<InfluxConfig>,
}

/// InfluxDB connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluxConfig {
    /// Base URL, e.g. `http://localhost:8086`
    pub url: String,

    /// Target database
    pub database: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub verify_ssl: bool,
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP tuning shared by every server client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Requests per second per server (`null` disables limiting)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: Option<u32>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

#[allow(clippy::unnecessary_wraps)]
fn default_requests_per_second() -> Option<u32> {
    Some(10)
}

// ============================================================================
// Servers
// ============================================================================

/// Identity and tuning of one managed server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Stable identifier, unique per service type
    pub id: u32,

    /// Base URL, e.g. `http://sonarr:8989`
    pub url: String,

    pub api_key: String,

    #[serde(default)]
    pub verify_ssl: bool,

    /// Look-back window for missing episodes on legacy servers
    #[serde(default = "default_missing_days")]
    pub missing_days: u32,

    /// Look-ahead window for upcoming episodes
    #[serde(default = "default_future_days")]
    pub future_days: u32,

    #[serde(default = "default_true")]
    pub get_missing: bool,

    #[serde(default = "default_run_seconds", alias = "missing_days_run_seconds")]
    pub get_missing_run_seconds: u64,

    #[serde(default = "default_true")]
    pub get_future: bool,

    #[serde(default = "default_run_seconds")]
    pub future_days_run_seconds: u64,

    #[serde(default = "default_true")]
    pub queue: bool,

    #[serde(default = "default_run_seconds")]
    pub queue_run_seconds: u64,
}

fn default_missing_days() -> u32 {
    7
}

fn default_future_days() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_run_seconds() -> u64 {
    300
}

impl ServerConfig {
    /// Server with default tuning
    pub fn new(id: u32, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            api_key: api_key.into(),
            verify_ssl: false,
            missing_days: default_missing_days(),
            future_days: default_future_days(),
            get_missing: true,
            get_missing_run_seconds: default_run_seconds(),
            get_future: true,
            future_days_run_seconds: default_run_seconds(),
            queue: true,
            queue_run_seconds: default_run_seconds(),
        }
    }

    /// URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    fn validate(&self, service: ServiceType) -> Result<()> {
        let field = |name: &str| format!("{service}[{}].{name}", self.id);

        url::Url::parse(&self.url)
            .map_err(|e| Error::invalid_value(field("url"), e.to_string()))?;

        if self.api_key.trim().is_empty() {
            return Err(Error::invalid_value(field("api_key"), "must not be empty"));
        }

        for (name, value) in [
            ("get_missing_run_seconds", self.get_missing_run_seconds),
            ("future_days_run_seconds", self.future_days_run_seconds),
            ("queue_run_seconds", self.queue_run_seconds),
        ] {
            if value == 0 {
                return Err(Error::invalid_value(field(name), "must be greater than 0"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = r#"
output:
  kind: influx
  influx:
    url: http://influx:8086
    database: arrpoll
http:
  timeout_secs: 10
override_prefix: ARRPOLL
sonarr:
  - id: 1
    url: http://sonarr:8989
    api_key: "{{ env.SONARR_KEY }}"
    missing_days: 14
    queue: false
radarr:
  - id: 1
    url: https://radarr.example.com/
    api_key: radarr-key
    verify_ssl: true
"#;

    fn ctx() -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.set_env("SONARR_KEY", "from-env");
        ctx
    }

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml(SAMPLE, &ctx()).unwrap();

        assert_eq!(config.output.kind, OutputKind::Influx);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.override_prefix.as_deref(), Some("ARRPOLL"));

        let sonarr = &config.sonarr[0];
        assert_eq!(sonarr.api_key, "from-env");
        assert_eq!(sonarr.missing_days, 14);
        assert_eq!(sonarr.future_days, 1);
        assert!(!sonarr.queue);
        assert!(sonarr.get_missing);

        let radarr = &config.radarr[0];
        assert!(radarr.verify_ssl);
        assert_eq!(radarr.base_url(), "https://radarr.example.com");
        assert_eq!(radarr.queue_run_seconds, 300);
    }

    #[test]
    fn test_missing_env_variable_fails() {
        let err = Config::from_yaml(SAMPLE, &TemplateContext::new()).unwrap_err();
        assert!(matches!(err, Error::UndefinedVariable { .. }));
    }

    #[test]
    fn test_duplicate_server_id_rejected() {
        let yaml = r"
sonarr:
  - { id: 1, url: 'http://a:8989', api_key: k }
  - { id: 1, url: 'http://b:8989', api_key: k }
";
        let err = Config::from_yaml(yaml, &TemplateContext::new()).unwrap_err();
        assert!(err.to_string().contains("duplicate server id 1"));
    }

    #[test]
    fn test_same_id_across_services_allowed() {
        let yaml = r"
sonarr:
  - { id: 1, url: 'http://a:8989', api_key: k }
radarr:
  - { id: 1, url: 'http://b:7878', api_key: k }
";
        assert!(Config::from_yaml(yaml, &TemplateContext::new()).is_ok());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let yaml = "radarr:\n  - { id: 3, url: 'not a url', api_key: k }\n";
        let err = Config::from_yaml(yaml, &TemplateContext::new()).unwrap_err();
        assert!(err.to_string().contains("radarr[3].url"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let yaml = "sonarr:\n  - { id: 2, url: 'http://a', api_key: '  ' }\n";
        let err = Config::from_yaml(yaml, &TemplateContext::new()).unwrap_err();
        assert!(err.to_string().contains("sonarr[2].api_key"));
    }

    #[test]
    fn test_influx_output_requires_section() {
        let yaml = "output:\n  kind: influx\n";
        let err = Config::from_yaml(yaml, &TemplateContext::new()).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("{}", &TemplateContext::new()).unwrap();
        assert_eq!(config.output.kind, OutputKind::Stdout);
        assert_eq!(config.http.requests_per_second, Some(10));
        assert!(config.sonarr.is_empty());
    }

    #[test]
    fn test_missing_interval_alias() {
        let yaml = "sonarr:\n  - id: 1\n    url: http://sonarr:8989\n    api_key: k\n    missing_days_run_seconds: 60\n";
        let config = Config::from_yaml(yaml, &TemplateContext::new()).unwrap();
        assert_eq!(config.sonarr[0].get_missing_run_seconds, 60);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "radarr:\n  - {{ id: 9, url: 'http://radarr:7878', api_key: k }}"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.radarr[0], ServerConfig::new(9, "http://radarr:7878", "k"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
