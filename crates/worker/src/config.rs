use std::num::NonZeroU32;
use std::time::Duration;

/// Default send rate (emails per second).
const DEFAULT_RATE_PER_SEC: u32 = 5;

/// Default idle poll interval in milliseconds.
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Email worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum emails handed to the mailer per second (`EMAIL_RATE_PER_SEC`).
    pub rate_per_sec: NonZeroU32,
    /// Sleep between polls when the queue is empty (`EMAIL_POLL_INTERVAL_MS`).
    pub poll_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            rate_per_sec: NonZeroU32::new(DEFAULT_RATE_PER_SEC).unwrap_or(NonZeroU32::MIN),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WorkerConfig {
    /// Load from the environment, falling back to defaults for missing or
    /// unparseable values. A rate of `0` is treated as unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rate_per_sec: std::env::var("EMAIL_RATE_PER_SEC")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .and_then(NonZeroU32::new)
                .unwrap_or(defaults.rate_per_sec),
            poll_interval: std::env::var("EMAIL_POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.rate_per_sec.get(), 5);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }
}
