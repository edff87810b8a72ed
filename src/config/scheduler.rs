//! Scheduler configuration

use std::time::Duration;

use chrono::NaiveTime;
use serde::Deserialize;

use crate::adapters::CronRunnerConfig;

use super::error::ValidationError;

/// When the cron runner fires the jobs
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Comma-separated local `HH:MM` times
    #[serde(default = "default_run_at_times")]
    pub run_at_times: String,

    /// How often the runner checks the clock, in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl SchedulerConfig {
    /// Parsed run-at times, sorted
    pub fn times(&self) -> Result<Vec<NaiveTime>, ValidationError> {
        let mut times = self
            .run_at_times
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                NaiveTime::parse_from_str(s, "%H:%M")
                    .map_err(|_| ValidationError::InvalidRunAtTime(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if times.is_empty() {
            return Err(ValidationError::NoRunAtTimes);
        }
        times.sort();
        times.dedup();
        Ok(times)
    }

    pub fn runner_config(&self) -> Result<CronRunnerConfig, ValidationError> {
        Ok(CronRunnerConfig::default()
            .with_run_at_times(self.times()?)
            .with_poll_interval(Duration::from_secs(self.poll_interval_secs)))
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_secs == 0 || self.poll_interval_secs > 3600 {
            return Err(ValidationError::InvalidPollInterval);
        }
        self.times().map(|_| ())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            run_at_times: default_run_at_times(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_run_at_times() -> String {
    "09:00,10:00,11:00,12:00,13:00,14:00".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_times() {
        let times = SchedulerConfig::default().times().unwrap();
        assert_eq!(times.len(), 6);
        assert_eq!(times[5], NaiveTime::from_hms_opt(14, 0, 0).unwrap());
    }

    #[test]
    fn test_times_are_sorted_and_deduplicated() {
        let config = SchedulerConfig {
            run_at_times: "13:30, 08:15,13:30".to_string(),
            ..Default::default()
        };
        let times = config.times().unwrap();
        assert_eq!(
            times,
            vec![
                NaiveTime::from_hms_opt(8, 15, 0).unwrap(),
                NaiveTime::from_hms_opt(13, 30, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_invalid_time_is_rejected() {
        let config = SchedulerConfig {
            run_at_times: "25:00".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidRunAtTime("25:00".to_string()))
        );
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let config = SchedulerConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPollInterval));
    }
}
