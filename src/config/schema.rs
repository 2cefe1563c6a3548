//! Configuration schema definitions.
//!
//! All types derive Serde's `Deserialize` for loading from config files.

use serde::Deserialize;
use std::time::Duration;

/// Root configuration for the balancer.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BalancerConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Queue sizing.
    pub queue: QueueConfig,

    /// Per-operation deadlines.
    pub timeouts: TimeoutConfig,

    /// Drain behavior on termination.
    pub lifecycle: LifecycleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl BalancerConfig {
    /// Flattened `(name, value)` view of every setting, for startup logging.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("listener.host", self.listener.host.clone()),
            ("listener.port", self.listener.port.to_string()),
            ("queue.size", self.queue.size.to_string()),
            ("timeouts.get_secs", self.timeouts.get_secs.to_string()),
            ("timeouts.post_secs", self.timeouts.post_secs.to_string()),
            ("timeouts.shutdown_secs", self.timeouts.shutdown_secs.to_string()),
            (
                "lifecycle.graceful_period_secs",
                self.lifecycle.graceful_period_secs.to_string(),
            ),
            ("observability.log_level", self.observability.log_level.clone()),
            (
                "observability.metrics_enabled",
                self.observability.metrics_enabled.to_string(),
            ),
        ]
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 2308,
        }
    }
}

/// Queue configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of queued messages.
    pub size: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { size: 1024 }
    }
}

/// Timeout configuration for producer, consumer and listener shutdown.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// How long a consumer waits for a message, in seconds.
    pub get_secs: u64,

    /// How long a producer waits for a free slot, in seconds.
    pub post_secs: u64,

    /// How long in-flight requests may run once the listener stops, in seconds.
    pub shutdown_secs: u64,
}

impl TimeoutConfig {
    pub fn get(&self) -> Duration {
        Duration::from_secs(self.get_secs)
    }

    pub fn post(&self) -> Duration {
        Duration::from_secs(self.post_secs)
    }

    pub fn shutdown(&self) -> Duration {
        Duration::from_secs(self.shutdown_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            get_secs: 2,
            post_secs: 2,
            shutdown_secs: 3,
        }
    }
}

/// Termination behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Drain budget in one-second ticks (0 = wait until the queue is empty).
    pub graceful_period_secs: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            graceful_period_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Serve Prometheus metrics on `/metrics`.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = BalancerConfig::default();
        assert_eq!(config.listener.bind_address(), "localhost:2308");
        assert_eq!(config.queue.size, 1024);
        assert_eq!(config.lifecycle.graceful_period_secs, 60);
        assert_eq!(config.timeouts.shutdown(), Duration::from_secs(3));
        assert_eq!(config.timeouts.get(), Duration::from_secs(2));
        assert_eq!(config.timeouts.post(), Duration::from_secs(2));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: BalancerConfig = toml::from_str(
            r#"
            [queue]
            size = 16

            [timeouts]
            get_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.queue.size, 16);
        assert_eq!(config.timeouts.get_secs, 5);
        assert_eq!(config.timeouts.post_secs, 2);
        assert_eq!(config.listener.port, 2308);
    }

    #[test]
    fn fields_lists_every_setting() {
        let fields = BalancerConfig::default().fields();
        assert_eq!(fields.len(), 9);
        assert!(fields.contains(&("queue.size", "1024".to_string())));
        assert!(fields.contains(&("listener.host", "localhost".to_string())));
    }
}
