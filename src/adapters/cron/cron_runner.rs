//! CronRunner - background service firing the scheduled jobs.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `run_at_times` | 09:00 to 14:00 hourly | Local times at which all jobs run |
//! | `poll_interval` | 30s | How often the clock is checked |
//!
//! Each run-at slot fires at most once. A slot missed while the service was
//! down fires on the next tick of the same day; the jobs are idempotent, so a
//! restart inside a slot is harmless.
//!
//! ## Graceful Shutdown
//!
//! The runner listens on a watch channel and stops after the run in progress.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use tokio::sync::watch;
use tokio::time;

use crate::application::scheduler::{JobContext, JobReport, ScheduledJob};

/// Configuration for the CronRunner service.
#[derive(Debug, Clone)]
pub struct CronRunnerConfig {
    /// Local times at which every job runs.
    pub run_at_times: Vec<NaiveTime>,

    /// How often to check whether a slot is due.
    pub poll_interval: Duration,
}

impl Default for CronRunnerConfig {
    fn default() -> Self {
        Self {
            run_at_times: (9..=14)
                .filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0))
                .collect(),
            poll_interval: Duration::from_secs(30),
        }
    }
}

impl CronRunnerConfig {
    pub fn with_run_at_times(mut self, times: Vec<NaiveTime>) -> Self {
        self.run_at_times = times;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// The latest run-at slot not after `now` on the same day.
pub fn due_slot(run_at_times: &[NaiveTime], now: NaiveDateTime) -> Option<NaiveDateTime> {
    run_at_times
        .iter()
        .filter(|t| **t <= now.time())
        .max()
        .map(|t| now.date().and_time(*t))
}

/// Runs every job at each configured slot.
pub struct CronRunner {
    jobs: Vec<Arc<dyn ScheduledJob>>,
    config: CronRunnerConfig,
}

impl CronRunner {
    pub fn new(jobs: Vec<Arc<dyn ScheduledJob>>) -> Self {
        Self::with_config(jobs, CronRunnerConfig::default())
    }

    pub fn with_config(jobs: Vec<Arc<dyn ScheduledJob>>, config: CronRunnerConfig) -> Self {
        Self { jobs, config }
    }

    /// Run until the shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.poll_interval);
        let mut last_slot: Option<NaiveDateTime> = None;
        tracing::info!(
            slots = self.config.run_at_times.len(),
            jobs = self.jobs.len(),
            "Cron runner started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Cron runner stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.tick(Local::now().naive_local(), &mut last_slot).await;
                }
            }
        }
    }

    /// Runs all jobs if a slot not yet served is due at `now`.
    ///
    /// Returns whether the jobs ran.
    pub async fn tick(&self, now: NaiveDateTime, last_slot: &mut Option<NaiveDateTime>) -> bool {
        let Some(slot) = due_slot(&self.config.run_at_times, now) else {
            return false;
        };
        if last_slot.map_or(false, |last| last >= slot) {
            return false;
        }
        *last_slot = Some(slot);
        tracing::info!(slot = %slot, "Run-at slot due");
        self.run_all(&JobContext::current()).await;
        true
    }

    /// Runs every job once at `ctx`, in order. A job failing to start does
    /// not prevent the others.
    pub async fn run_all(&self, ctx: &JobContext) -> Vec<(&'static str, Option<JobReport>)> {
        let mut reports = Vec::with_capacity(self.jobs.len());
        for job in &self.jobs {
            match job.run_at(ctx).await {
                Ok(report) => reports.push((job.name(), Some(report))),
                Err(e) => {
                    tracing::error!(job = job.name(), error = %e, "Job aborted");
                    reports.push((job.name(), None));
                }
            }
        }
        reports
    }
}
