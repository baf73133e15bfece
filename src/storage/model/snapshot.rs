//! The aggregate snapshot returned by one collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::connections::ConnectionsInfo;
use super::host::{ContextSwitchInfo, ProcessInfo, ThermalInfo};
use super::system::{CpuInfo, DiskInfo, IoInfo, LoadInfo, MemoryInfo, NetworkInfo};

/// One point-in-time view of the host.
///
/// Every category is optional. A missing category means it was either not
/// requested or its native collection failed; the shape of the snapshot is
/// the per-category success signal.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Snapshot {
    /// Wall-clock time the collection started.
    pub timestamp: DateTime<Utc>,
    /// Platform identifier reported by the native engine.
    pub platform: Arc<str>,
    /// Host name, resolved once when the collector is initialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<Arc<str>>,
    /// `timestamp` as Unix nanoseconds.
    pub collected_at_ns: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io: Option<IoInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<ConnectionsInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<ProcessInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal: Option<ThermalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_switches: Option<ContextSwitchInfo>,
}

impl Snapshot {
    /// A snapshot carrying only metadata.
    pub fn empty(timestamp: DateTime<Utc>, platform: Arc<str>) -> Self {
        Self {
            collected_at_ns: timestamp.timestamp_nanos_opt().unwrap_or(0),
            timestamp,
            platform,
            hostname: None,
            cpu: None,
            memory: None,
            load: None,
            disk: None,
            network: None,
            io: None,
            connections: None,
            process: None,
            thermal: None,
            context_switches: None,
        }
    }

    /// Number of top-level categories present.
    pub fn category_count(&self) -> usize {
        [
            self.cpu.is_some(),
            self.memory.is_some(),
            self.load.is_some(),
            self.disk.is_some(),
            self.network.is_some(),
            self.io.is_some(),
            self.connections.is_some(),
            self.process.is_some(),
            self.thermal.is_some(),
            self.context_switches.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::model::{LoadInfo, PressureInfo};

    #[test]
    fn test_empty_snapshot_serializes_metadata_only() {
        let ts = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let snap = Snapshot::empty(ts, Arc::from("linux"));
        let json = serde_json::to_value(&snap).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 3);
        assert_eq!(obj["platform"], "linux");
        assert_eq!(obj["collected_at_ns"], 1_714_564_800_000_000_000i64);
        assert_eq!(snap.category_count(), 0);
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let mut snap = Snapshot::empty(Utc::now(), Arc::from("linux"));
        snap.load = Some(LoadInfo {
            load_1min: 1.0,
            load_5min: 0.5,
            load_15min: 0.25,
        });
        snap.cpu = Some(CpuInfo {
            usage_percent: 10.0,
            cores: 4,
            pressure: Some(PressureInfo {
                some_avg10: 1.0,
                ..Default::default()
            }),
            ..Default::default()
        });

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["load"]["load_5min"], 0.5);
        assert!(json.get("memory").is_none());
        let pressure = json["cpu"]["pressure"].as_object().unwrap();
        assert!(pressure.contains_key("some_avg10"));
        assert!(!pressure.contains_key("full_avg10"));
        assert_eq!(snap.category_count(), 2);
    }

    #[test]
    fn test_deserialize_back() {
        let mut snap = Snapshot::empty(Utc::now(), Arc::from("freebsd"));
        snap.memory = Some(MemoryInfo {
            total_bytes: 1024,
            used_bytes: 256,
            used_percent: 25.0,
            ..Default::default()
        });
        let text = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_host_sections_serialize() {
        use crate::storage::model::{ContextSwitchCounts, ThermalZone};

        let mut snap = Snapshot::empty(Utc::now(), Arc::from("linux"));
        snap.hostname = Some(Arc::from("db-01"));
        snap.thermal = Some(ThermalInfo {
            supported: true,
            zones: vec![ThermalZone {
                name: Arc::from("thermal_zone0"),
                label: Arc::from("x86_pkg_temp"),
                temp_celsius: 48.0,
                temp_crit: Some(100.0),
                ..Default::default()
            }],
        });
        snap.context_switches = Some(ContextSwitchInfo {
            system_total: None,
            current: Some(ContextSwitchCounts {
                voluntary: 12,
                involuntary: 3,
            }),
        });

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["hostname"], "db-01");
        let zone = &json["thermal"]["zones"][0];
        assert_eq!(zone["temp_crit"], 100.0);
        assert!(zone.get("temp_max").is_none());
        assert_eq!(json["context_switches"]["self"]["voluntary"], 12);
        assert!(json["context_switches"].get("system_total").is_none());

        snap.thermal = Some(ThermalInfo::default());
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["thermal"]["supported"], false);
        assert!(json["thermal"].get("zones").is_none());
        assert_eq!(snap.category_count(), 2);
    }
}
