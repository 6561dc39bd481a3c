//! Kumo: a pausable, bounded-concurrency URL fetch scheduler
//!
//! This crate implements a work scheduler that fetches a dynamically growing
//! set of URLs on a fixed number of worker slots, supports cooperative
//! pause/resume, cancels in-flight work on stop, and accumulates per-URL
//! outcomes in a shared result store.

pub mod config;
pub mod crawler;
pub mod queue;
pub mod state;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for Kumo operations
#[derive(Debug, Error)]
pub enum KumoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Kumo operations
pub type Result<T> = std::result::Result<T, KumoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlScheduler, FetchError, Fetcher, HttpFetcher};
pub use queue::{ResourceQueue, WorkItem};
pub use state::ControlState;
pub use store::{ResultStore, TaskOutcome};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts_to_kumo_error() {
        let err = KumoError::from(ConfigError::Validation(
            "worker_count must be between 1 and 100, got 0".to_string(),
        ));
        assert!(err.to_string().contains("worker_count"));
    }
}
