//! System-wide metric records as published in a snapshot.
//!
//! Strings are `Arc<str>` so that stable names coming out of the intern cache
//! are shared between snapshots instead of copied.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pressure stall information for one resource.
///
/// Source: `/proc/pressure/{cpu,memory,io}`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PressureInfo {
    /// Share of time at least one task stalled, 10s average (%).
    pub some_avg10: f64,
    pub some_avg60: f64,
    pub some_avg300: f64,
    /// Total stall time (microseconds).
    pub some_total_us: u64,

    /// Share of time all non-idle tasks stalled. Not reported for CPU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_avg10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_avg60: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_avg300: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_total_us: Option<u64>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct CpuInfo {
    /// 100 minus idle, never negative.
    pub usage_percent: f64,
    pub user_percent: f64,
    pub system_percent: f64,
    pub iowait_percent: f64,
    pub steal_percent: f64,
    pub cores: u32,
    pub frequency_mhz: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<PressureInfo>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_bytes: u64,
    pub cached_bytes: u64,
    pub buffers_bytes: u64,
    pub swap_total_bytes: u64,
    pub swap_used_bytes: u64,
    /// `used / total * 100`, zero when total is unknown.
    pub used_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<PressureInfo>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct LoadInfo {
    pub load_1min: f64,
    pub load_5min: f64,
    pub load_15min: f64,
}

/// Mounted filesystem.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PartitionInfo {
    pub device: Arc<str>,
    pub mount_point: Arc<str>,
    pub fs_type: Arc<str>,
    /// Raw comma-joined mount options, omitted when empty.
    #[serde(default, skip_serializing_if = "str::is_empty")]
    pub options: Arc<str>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct DiskUsageInfo {
    pub path: Arc<str>,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub used_percent: f64,
    pub inodes_total: u64,
    pub inodes_used: u64,
    pub inodes_free: u64,
}

/// Block device counters.
///
/// Source: `/proc/diskstats`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct DiskIoInfo {
    pub device: Arc<str>,
    pub reads_completed: u64,
    /// 512-byte sectors.
    pub sectors_read: u64,
    pub read_time_ms: u64,
    pub writes_completed: u64,
    pub sectors_written: u64,
    pub write_time_ms: u64,
    pub io_in_progress: u64,
    pub io_time_ms: u64,
    pub weighted_io_time_ms: u64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct DiskInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitions: Option<Vec<PartitionInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Vec<DiskUsageInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io: Option<Vec<DiskIoInfo>>,
}

impl DiskInfo {
    pub fn is_empty(&self) -> bool {
        self.partitions.is_none() && self.usage.is_none() && self.io.is_none()
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct NetInterfaceInfo {
    pub name: Arc<str>,
    pub mac_address: Arc<str>,
    pub mtu: u32,
    pub is_up: bool,
    pub is_loopback: bool,
}

/// Per-interface traffic counters.
///
/// Source: `/proc/net/dev`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct NetStatsInfo {
    pub interface: Arc<str>,
    pub bytes_recv: u64,
    pub packets_recv: u64,
    pub errors_in: u64,
    pub drops_in: u64,
    pub bytes_sent: u64,
    pub packets_sent: u64,
    pub errors_out: u64,
    pub drops_out: u64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct NetworkInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<NetInterfaceInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<NetStatsInfo>>,
}

impl NetworkInfo {
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_none() && self.stats.is_none()
    }
}

/// Aggregate block I/O counters.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct IoInfo {
    pub read_ops: u64,
    pub read_bytes: u64,
    pub write_ops: u64,
    pub write_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<PressureInfo>,
}
