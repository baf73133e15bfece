//! Collection configuration.
//!
//! `MetricsConfig` selects which categories `collect_all` gathers;
//! `CacheConfig` bootstraps the native cache. Both load from JSON and every
//! field is optional, missing fields taking the standard template's value.

use crate::cache::{CacheController, CachePolicy, MetricCategory};
use crate::error::ProbeError;
use crate::native::NativeProbe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Named configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsTemplate {
    /// CPU, memory and load only, no pressure. The hostname is still
    /// reported.
    Minimal,
    #[default]
    Standard,
    Full,
}

impl FromStr for MetricsTemplate {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(MetricsTemplate::Minimal),
            "standard" => Ok(MetricsTemplate::Standard),
            "full" => Ok(MetricsTemplate::Full),
            other => Err(ProbeError::Config(format!(
                "unknown metrics template '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    pub enabled: bool,
    pub pressure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub enabled: bool,
    pub pressure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    pub enabled: bool,
    pub partitions: bool,
    pub usage: bool,
    pub io: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub enabled: bool,
    pub interfaces: bool,
    pub stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    pub enabled: bool,
    pub pressure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionsConfig {
    pub enabled: bool,
    pub tcp_stats: bool,
    pub tcp_connections: bool,
    pub udp_sockets: bool,
    pub unix_sockets: bool,
    pub listening_ports: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
    pub enabled: bool,
}

/// Metrics about the collecting process itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub enabled: bool,
    /// System-wide and per-process context switch counters.
    pub context_switches: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pressure: true,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pressure: true,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            partitions: true,
            usage: true,
            io: true,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interfaces: true,
            stats: true,
        }
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pressure: true,
        }
    }
}

impl Default for ConnectionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tcp_stats: true,
            tcp_connections: true,
            udp_sockets: true,
            unix_sockets: true,
            listening_ports: true,
        }
    }
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            context_switches: true,
        }
    }
}

/// Settings pushed to the native cache at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub policy: CachePolicy,
    /// Per-category TTL overrides in milliseconds, applied after the policy.
    pub ttl_overrides_ms: BTreeMap<MetricCategory, u64>,
}

impl CacheConfig {
    /// Pushes this configuration to the native cache.
    ///
    /// Disabled: turns caching off, if it is on. Enabled: applies the policy,
    /// then each override in category order. A failing override does not
    /// stop the remaining ones; the first failure is returned.
    pub fn apply<N: NativeProbe>(&self, cache: &CacheController<N>) -> Result<(), ProbeError> {
        if !self.enabled {
            if !cache.is_enabled() {
                return Ok(());
            }
            return cache.disable().inspect_err(|e| {
                warn!(error = %e, "failed to disable metric cache");
            });
        }

        cache.enable_with_policy(self.policy).inspect_err(|e| {
            warn!(policy = ?self.policy, error = %e, "failed to enable metric cache");
        })?;

        let mut first_error = None;
        for (&category, &ttl_ms) in &self.ttl_overrides_ms {
            if let Err(e) = cache.set_ttl(category, Duration::from_millis(ttl_ms)) {
                warn!(%category, ttl_ms, error = %e, "failed to apply cache TTL override");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Which metric categories and sub-metrics to collect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// When false, snapshots carry metadata only.
    pub enabled: bool,
    pub cpu: CpuConfig,
    pub memory: MemoryConfig,
    pub load: LoadConfig,
    pub disk: DiskConfig,
    pub network: NetworkConfig,
    pub io: IoConfig,
    pub connections: ConnectionsConfig,
    pub thermal: ThermalConfig,
    pub process: ProcessConfig,
    pub cache: CacheConfig,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self::from_template(MetricsTemplate::Standard)
    }
}

impl MetricsConfig {
    pub fn from_template(template: MetricsTemplate) -> Self {
        let all = Self {
            enabled: true,
            cpu: CpuConfig::default(),
            memory: MemoryConfig::default(),
            load: LoadConfig::default(),
            disk: DiskConfig::default(),
            network: NetworkConfig::default(),
            io: IoConfig::default(),
            connections: ConnectionsConfig::default(),
            thermal: ThermalConfig::default(),
            process: ProcessConfig::default(),
            cache: CacheConfig::default(),
        };
        match template {
            MetricsTemplate::Standard | MetricsTemplate::Full => all,
            MetricsTemplate::Minimal => Self {
                cpu: CpuConfig {
                    enabled: true,
                    pressure: false,
                },
                memory: MemoryConfig {
                    enabled: true,
                    pressure: false,
                },
                load: LoadConfig { enabled: true },
                disk: DiskConfig {
                    enabled: false,
                    ..all.disk
                },
                network: NetworkConfig {
                    enabled: false,
                    ..all.network
                },
                io: IoConfig {
                    enabled: false,
                    ..all.io
                },
                connections: ConnectionsConfig {
                    enabled: false,
                    ..all.connections
                },
                thermal: ThermalConfig { enabled: false },
                process: ProcessConfig {
                    enabled: false,
                    ..all.process
                },
                ..all
            },
        }
    }

    /// A config that collects nothing but metadata.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ProbeError> {
        serde_json::from_str(text).map_err(|e| ProbeError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProbeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// True if any connection table is requested.
    pub fn wants_connections(&self) -> bool {
        let c = &self.connections;
        self.enabled
            && c.enabled
            && (c.tcp_stats
                || c.tcp_connections
                || c.udp_sockets
                || c.unix_sockets
                || c.listening_ports)
    }
}
