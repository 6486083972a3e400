//! Observability configuration parsing from environment variables.
//!
//! This module handles loading the log filter and output format.

use std::env;

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `smc_features=debug`
    pub log_filter: String,
    /// Multi-line human readable output instead of the compact format
    pub pretty: bool,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            pretty: false,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Self {
        Self {
            log_filter: env::var("RUST_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
            pretty: env::var("LOG_PRETTY")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<bool>()
                .unwrap_or(false),
        }
    }

    /// Installs the global `tracing` subscriber. Safe to call more than once.
    pub fn init_tracing(&self) {
        let filter = tracing_subscriber::EnvFilter::try_new(&self.log_filter)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false);

        let result = if self.pretty {
            builder.pretty().try_init()
        } else {
            builder.compact().try_init()
        };
        if result.is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_config_defaults() {
        let config = ObservabilityEnvConfig::default();
        assert_eq!(config.log_filter, "info");
        assert!(!config.pretty);
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        let config = ObservabilityEnvConfig::default();
        config.init_tracing();
        config.init_tracing();
    }
}
