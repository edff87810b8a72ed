//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! and an optional TOML file using the `config` and `dotenvy` crates. Environment
//! variables use the `INFOREQUESTS` prefix and nested values are separated by
//! double underscores.
//!
//! # Example
//!
//! ```no_run
//! use inforequests::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let jurisdiction = config.jurisdiction().expect("Invalid calendar");
//! ```

mod calendar;
mod deadlines;
mod error;
mod mail;
mod runtime;
mod scheduler;
mod storage;

pub use calendar::{CalendarConfig, HolidayPreset};
pub use deadlines::DeadlinesConfig;
pub use error::{ConfigError, ValidationError};
pub use mail::MailConfig;
pub use runtime::{Environment, LogFormat, RuntimeConfig};
pub use scheduler::SchedulerConfig;
pub use storage::{StorageBackend, StorageConfig};

use std::path::Path;

use serde::Deserialize;

use crate::domain::inforequest::Jurisdiction;

const ENV_PREFIX: &str = "INFOREQUESTS";

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// development setup. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Environment, log level and format
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Holiday calendar
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Statutory terms and scheduler thresholds
    #[serde(default)]
    pub deadlines: DeadlinesConfig,

    /// System sender and reply addresses
    #[serde(default)]
    pub mail: MailConfig,

    /// Cron run-at times
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Persistence
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INFOREQUESTS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `INFOREQUESTS__SCHEDULER__POLL_INTERVAL_SECS=60` -> `scheduler.poll_interval_secs = 60`
    /// - `INFOREQUESTS__CALENDAR__HOLIDAYS=03-15` -> `calendar.holidays = "03-15"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a TOML file, with environment variables
    /// taking precedence over it
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).format(config::FileFormat::Toml))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    fn environment() -> config::Environment {
        config::Environment::default()
            .prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.calendar.validate()?;
        self.deadlines.validate()?;
        self.mail.validate()?;
        self.scheduler.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Calendar and terms that deadline arithmetic runs on
    pub fn jurisdiction(&self) -> Result<Jurisdiction, ConfigError> {
        Ok(Jurisdiction::new(
            self.calendar.build()?,
            self.deadlines.to_policy(),
        ))
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.runtime.is_production()
    }
}
