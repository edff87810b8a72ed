//! inforequests-cron - runs the reminder and auto-close jobs.
//!
//! Usage: `inforequests-cron [--once] [CONFIG.toml]`
//!
//! Without `--once` the jobs run at every configured run-at time until the
//! process receives Ctrl-C.

use std::sync::Arc;

use tokio::sync::watch;

use inforequests::adapters::{
    CronRunner, FileInforequestRepository, InMemoryDirectory, InMemoryInforequestRepository,
    LoggingTransport,
};
use inforequests::application::scheduler::{standard_jobs, JobContext, JobServices};
use inforequests::config::{AppConfig, StorageBackend};
use inforequests::ports::InforequestRepository;
use inforequests::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let once = args.iter().any(|a| a == "--once");
    let config_path = args.iter().find(|a| !a.starts_with("--"));

    let config = match config_path {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load()?,
    };
    config.validate()?;
    telemetry::init(&config.runtime)?;

    let jurisdiction = Arc::new(config.jurisdiction()?);
    let repository: Arc<dyn InforequestRepository> = match config.storage.backend {
        StorageBackend::File => Arc::new(FileInforequestRepository::new(&config.storage.path)),
        StorageBackend::Memory => Arc::new(InMemoryInforequestRepository::new()),
    };
    let directory = match &config.storage.directory_file {
        Some(path) => InMemoryDirectory::from_yaml_file(path).await?,
        None => InMemoryDirectory::new(),
    };

    let services = JobServices {
        repository,
        identity: Arc::new(directory),
        transport: Arc::new(LoggingTransport::new()),
        jurisdiction,
        sender: config.mail.from_mailbox(),
    };
    let runner = CronRunner::with_config(standard_jobs(services), config.scheduler.runner_config()?);

    if once {
        for (job, report) in runner.run_all(&JobContext::current()).await {
            tracing::info!(job, ?report, "Run complete");
        }
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });
    runner.run(shutdown_rx).await;
    Ok(())
}
