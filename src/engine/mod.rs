//! Poll engine
//!
//! Schedules the façade operations of every configured server.
//!
//! # Overview
//!
//! - `Poller::run` runs each enabled operation as its own tokio task on its
//!   configured interval until shutdown
//! - `Poller::run_once` runs every enabled operation once, concurrently, and
//!   returns a `PollStats` summary
//!
//! A failing server only affects its own operations.

mod types;

pub use types::{JobId, OperationKind, PollStats};

use crate::client::{ClientContext, RadarrClient, SonarrClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::ServiceType;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
enum Facade {
    Sonarr(Arc<SonarrClient>),
    Radarr(Arc<RadarrClient>),
}

/// One enabled operation and its schedule
#[derive(Debug, Clone)]
struct Job {
    id: JobId,
    facade: Facade,
    interval: Duration,
}

impl Job {
    async fn run(&self) -> Result<usize> {
        match (&self.facade, self.id.kind) {
            (Facade::Sonarr(client), OperationKind::Missing) => client.missing().await,
            (Facade::Sonarr(client), OperationKind::Future) => client.future().await,
            (Facade::Sonarr(client), OperationKind::Queue) => client.queue().await,
            (Facade::Radarr(client), OperationKind::Missing) => client.missing().await,
            (Facade::Radarr(client), OperationKind::Queue) => client.queue().await,
            (Facade::Radarr(_), OperationKind::Future) => Ok(0),
        }
    }
}

/// Runs façade operations on their schedules
#[derive(Debug, Default)]
pub struct Poller {
    jobs: Vec<Job>,
}

impl Poller {
    /// Connect to every configured server and schedule its enabled operations
    pub async fn connect(config: &Config, ctx: &ClientContext) -> Result<Self> {
        let sonarr = join_all(
            config
                .sonarr
                .iter()
                .map(|server| SonarrClient::connect(server.clone(), ctx)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;
        let radarr = join_all(
            config
                .radarr
                .iter()
                .map(|server| RadarrClient::connect(server.clone(), ctx)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_clients(sonarr, radarr))
    }

    /// Schedule the enabled operations of already connected clients
    pub fn from_clients(sonarr: Vec<SonarrClient>, radarr: Vec<RadarrClient>) -> Self {
        let mut poller = Self::default();

        for client in sonarr {
            let server = client.server().clone();
            let facade = Facade::Sonarr(Arc::new(client));
            let schedule = [
                (OperationKind::Missing, server.get_missing, server.get_missing_run_seconds),
                (OperationKind::Future, server.get_future, server.future_days_run_seconds),
                (OperationKind::Queue, server.queue, server.queue_run_seconds),
            ];
            poller.add_jobs(ServiceType::Sonarr, server.id, &facade, &schedule);
        }

        for client in radarr {
            let server = client.server().clone();
            let facade = Facade::Radarr(Arc::new(client));
            let schedule = [
                (OperationKind::Missing, server.get_missing, server.get_missing_run_seconds),
                (OperationKind::Queue, server.queue, server.queue_run_seconds),
            ];
            poller.add_jobs(ServiceType::Radarr, server.id, &facade, &schedule);
        }

        poller
    }

    fn add_jobs(
        &mut self,
        service: ServiceType,
        server_id: u32,
        facade: &Facade,
        schedule: &[(OperationKind, bool, u64)],
    ) {
        for &(kind, enabled, seconds) in schedule {
            let id = JobId {
                service,
                server_id,
                kind,
            };
            if !enabled {
                debug!("{} disabled", id);
                continue;
            }
            self.jobs.push(Job {
                id,
                facade: facade.clone(),
                interval: Duration::from_secs(seconds.max(1)),
            });
        }
    }

    /// Scheduled operations
    pub fn job_ids(&self) -> Vec<JobId> {
        self.jobs.iter().map(|job| job.id).collect()
    }

    /// Run every operation once, concurrently
    pub async fn run_once(&self) -> PollStats {
        let start = Instant::now();
        let results = join_all(self.jobs.iter().map(|job| async move {
            let result = job.run().await;
            (job.id, result)
        }))
        .await;

        let mut stats = PollStats::new();
        for (id, result) in results {
            match result {
                Ok(points) => stats.add_success(points),
                Err(e) => {
                    log_failure(id, &e);
                    stats.add_failure();
                }
            }
        }
        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Poll cycle: {} ok, {} failed, {} points in {}ms",
            stats.succeeded, stats.failed, stats.points_written, stats.duration_ms
        );
        stats
    }

    /// Run every operation on its interval until Ctrl-C
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run every operation on its interval until `shutdown` completes
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let mut tasks = JoinSet::new();
        for job in self.jobs {
            info!("Scheduling {} every {}s", job.id, job.interval.as_secs());
            tasks.spawn(async move {
                let mut ticker = tokio::time::interval(job.interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    match job.run().await {
                        Ok(points) => debug!("{} wrote {} points", job.id, points),
                        Err(e) => log_failure(job.id, &e),
                    }
                }
            });
        }

        shutdown.await;
        info!("Shutting down {} scheduled operations", tasks.len());
        tasks.shutdown().await;
        Ok(())
    }
}

/// Transport failures log at warn, everything else at error
fn log_failure(id: JobId, e: &Error) {
    if e.is_transport() {
        warn!("{} skipped this cycle: {}", id, e);
    } else {
        error!("{} failed: {}", id, e);
    }
}
