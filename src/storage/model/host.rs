//! Per-process and host-level records: the collecting process, thermal
//! sensors and scheduler context switches.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Resource usage of the collecting process.
///
/// Source: `/proc/self/stat`, `/proc/self/status`, `/proc/self/fd`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ProcessInfo {
    pub pid: i32,
    pub cpu_percent: f64,
    pub memory_rss_bytes: u64,
    pub memory_vms_bytes: u64,
    /// RSS as a share of total memory (%).
    pub memory_percent: f64,
    pub num_threads: u32,
    pub num_fds: u32,
    /// "running", "sleeping", "waiting", "zombie", "stopped" or "unknown".
    pub state: Arc<str>,
}

/// One thermal zone or hwmon sensor.
///
/// Source: `/sys/class/thermal/thermal_zone*`, `/sys/class/hwmon`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ThermalZone {
    pub name: Arc<str>,
    pub label: Arc<str>,
    pub temp_celsius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_crit: Option<f64>,
}

/// Thermal sensors. `supported` is false on platforms without sensors, in
/// which case no zones are listed.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ThermalInfo {
    pub supported: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<ThermalZone>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct ContextSwitchCounts {
    pub voluntary: u64,
    pub involuntary: u64,
}

/// Source: `ctxt` in `/proc/stat`, `/proc/self/status`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct ContextSwitchInfo {
    /// Switches since boot, across all CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_total: Option<u64>,
    /// Switches of the collecting process.
    #[serde(
        rename = "self",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current: Option<ContextSwitchCounts>,
}

impl ContextSwitchInfo {
    pub fn is_empty(&self) -> bool {
        self.system_total.is_none() && self.current.is_none()
    }
}
