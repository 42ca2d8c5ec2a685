//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::ClientContext;
use crate::config::Config;
use crate::engine::Poller;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::output::build_writer;
use crate::types::{OptionStringExt, ServiceType};
use crate::version::{VersionCache, VersionResolver};
use serde_json::{json, Value};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run => self.run_scheduled().await,
            Commands::Once { dry_run } => self.once(*dry_run).await,
            Commands::Detect => self.detect().await,
            Commands::Validate => self.validate(),
        }
    }

    fn load_config(&self) -> Result<Config> {
        Config::from_file(&self.cli.config)
    }

    fn resolver(config: &Config) -> VersionResolver {
        VersionResolver::new(VersionCache::new())
            .with_prefix(config.override_prefix.clone().none_if_empty())
    }

    fn context(config: &Config, dry_run: bool) -> Result<ClientContext> {
        Ok(ClientContext::new(
            Self::resolver(config),
            build_writer(config, dry_run)?,
            config.http.clone(),
        ))
    }

    /// Scheduled polling
    async fn run_scheduled(&self) -> Result<()> {
        let config = self.load_config()?;
        let ctx = Self::context(&config, false)?;
        let poller = Poller::connect(&config, &ctx).await?;
        info!("Polling {} operations, press Ctrl-C to stop", poller.job_ids().len());
        poller.run().await
    }

    /// Single poll cycle
    async fn once(&self, dry_run: bool) -> Result<()> {
        let config = self.load_config()?;
        let ctx = Self::context(&config, dry_run)?;
        let poller = Poller::connect(&config, &ctx).await?;
        let stats = poller.run_once().await;

        // Dry runs print points on stdout; keep the report off it
        let report = json!({
            "type": "STATS",
            "stats": {
                "succeeded": stats.succeeded,
                "failed": stats.failed,
                "points_written": stats.points_written,
                "duration_ms": stats.duration_ms
            }
        });
        if dry_run {
            info!("{}", report);
        } else {
            self.output_message(&report);
        }
        Ok(())
    }

    /// Resolve and report every server's API version
    async fn detect(&self) -> Result<()> {
        let config = self.load_config()?;
        let resolver = Self::resolver(&config);

        for service in [ServiceType::Sonarr, ServiceType::Radarr] {
            for server in config.servers(service) {
                let client =
                    HttpClient::with_config(HttpClientConfig::for_server(server, &config.http))?;
                let version = resolver.resolve(service, server, &client).await;
                self.output_message(&json!({
                    "type": "VERSION",
                    "service": service.as_str(),
                    "server": server.id,
                    "url": server.base_url(),
                    "api_version": version.map(|v| v.as_str()),
                }));
            }
        }

        Ok(())
    }

    /// Validate the configuration file
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Configuration '{}' is valid with {} Sonarr and {} Radarr servers",
                    self.cli.config.display(),
                    config.sonarr.len(),
                    config.radarr.len()
                )
            }
        }));

        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
