//! Metric categories and the named TTL presets applied across them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metric kinds the native engine can serve from its snapshot cache.
///
/// The numeric ids are the values passed across the native boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MetricCategory {
    Cpu = 0,
    CpuPressure = 1,
    Memory = 2,
    MemoryPressure = 3,
    Load = 4,
    DiskPartitions = 5,
    DiskUsage = 6,
    DiskIo = 7,
    NetInterfaces = 8,
    NetStats = 9,
    IoStats = 10,
    IoPressure = 11,
}

impl MetricCategory {
    pub const COUNT: usize = 12;

    pub const ALL: [MetricCategory; Self::COUNT] = [
        MetricCategory::Cpu,
        MetricCategory::CpuPressure,
        MetricCategory::Memory,
        MetricCategory::MemoryPressure,
        MetricCategory::Load,
        MetricCategory::DiskPartitions,
        MetricCategory::DiskUsage,
        MetricCategory::DiskIo,
        MetricCategory::NetInterfaces,
        MetricCategory::NetStats,
        MetricCategory::IoStats,
        MetricCategory::IoPressure,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            MetricCategory::Cpu => "cpu",
            MetricCategory::CpuPressure => "cpu_pressure",
            MetricCategory::Memory => "memory",
            MetricCategory::MemoryPressure => "memory_pressure",
            MetricCategory::Load => "load",
            MetricCategory::DiskPartitions => "disk_partitions",
            MetricCategory::DiskUsage => "disk_usage",
            MetricCategory::DiskIo => "disk_io",
            MetricCategory::NetInterfaces => "net_interfaces",
            MetricCategory::NetStats => "net_stats",
            MetricCategory::IoStats => "io_stats",
            MetricCategory::IoPressure => "io_pressure",
        }
    }
}

impl std::fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Named TTL preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum CachePolicy {
    /// Balanced TTLs for polling every few seconds.
    #[default]
    Default = 0,
    /// Short TTLs for sub-second polling loops.
    HighFrequency = 1,
    /// Long TTLs for dashboards refreshed every 10s or more.
    LowFrequency = 2,
    /// Every TTL is zero: nothing is served from cache.
    Disabled = 3,
}

impl CachePolicy {
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(CachePolicy::Default),
            1 => Some(CachePolicy::HighFrequency),
            2 => Some(CachePolicy::LowFrequency),
            3 => Some(CachePolicy::Disabled),
            _ => None,
        }
    }

    /// Per-category TTL table this preset applies.
    pub fn ttls(self) -> CachePolicies {
        match self {
            CachePolicy::Default => CachePolicies::default_preset(),
            CachePolicy::HighFrequency => CachePolicies::high_frequency(),
            CachePolicy::LowFrequency => CachePolicies::low_frequency(),
            CachePolicy::Disabled => CachePolicies::disabled(),
        }
    }
}

/// TTL for every metric category, indexed by category id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicies {
    ttls: [Duration; MetricCategory::COUNT],
}

const fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

const fn secs(v: u64) -> Duration {
    Duration::from_secs(v)
}

impl CachePolicies {
    // Order: cpu, cpu_pressure, memory, memory_pressure, load,
    // disk_partitions, disk_usage, disk_io, net_interfaces, net_stats,
    // io_stats, io_pressure.

    pub fn default_preset() -> Self {
        Self {
            ttls: [
                ms(100),
                ms(500),
                ms(500),
                ms(500),
                secs(1),
                secs(30),
                secs(5),
                secs(1),
                secs(30),
                ms(500),
                ms(500),
                ms(500),
            ],
        }
    }

    pub fn high_frequency() -> Self {
        Self {
            ttls: [
                ms(50),
                ms(100),
                ms(100),
                ms(100),
                ms(500),
                secs(10),
                secs(1),
                ms(500),
                secs(10),
                ms(100),
                ms(100),
                ms(100),
            ],
        }
    }

    pub fn low_frequency() -> Self {
        Self {
            ttls: [
                secs(1),
                secs(5),
                secs(5),
                secs(5),
                secs(10),
                secs(60),
                secs(30),
                secs(10),
                secs(60),
                secs(5),
                secs(5),
                secs(5),
            ],
        }
    }

    pub fn disabled() -> Self {
        Self {
            ttls: [Duration::ZERO; MetricCategory::COUNT],
        }
    }

    pub fn get(&self, category: MetricCategory) -> Duration {
        self.ttls[category.id() as usize]
    }

    pub fn set(&mut self, category: MetricCategory, ttl: Duration) {
        self.ttls[category.id() as usize] = ttl;
    }
}

impl Default for CachePolicies {
    fn default() -> Self {
        Self::default_preset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ids_are_stable() {
        for (i, c) in MetricCategory::ALL.iter().enumerate() {
            assert_eq!(c.id() as usize, i);
            assert_eq!(MetricCategory::from_id(i as u8), Some(*c));
        }
        assert_eq!(MetricCategory::from_id(12), None);
        assert_eq!(MetricCategory::IoPressure.id(), 11);
    }

    #[test]
    fn test_policy_ids() {
        assert_eq!(CachePolicy::from_id(1), Some(CachePolicy::HighFrequency));
        assert_eq!(CachePolicy::from_id(4), None);
        assert_eq!(CachePolicy::Disabled.id(), 3);
    }

    #[test]
    fn test_preset_values() {
        let d = CachePolicy::Default.ttls();
        assert_eq!(d.get(MetricCategory::Cpu), Duration::from_millis(100));
        assert_eq!(d.get(MetricCategory::DiskPartitions), Duration::from_secs(30));

        let hf = CachePolicy::HighFrequency.ttls();
        assert_eq!(hf.get(MetricCategory::Cpu), Duration::from_millis(50));
        assert_eq!(hf.get(MetricCategory::Load), Duration::from_millis(500));

        let lf = CachePolicy::LowFrequency.ttls();
        assert_eq!(lf.get(MetricCategory::NetInterfaces), Duration::from_secs(60));
    }

    #[test]
    fn test_high_frequency_never_longer_than_default() {
        let d = CachePolicies::default_preset();
        let hf = CachePolicies::high_frequency();
        let lf = CachePolicies::low_frequency();
        for c in MetricCategory::ALL {
            assert!(hf.get(c) <= d.get(c), "{c}");
            assert!(d.get(c) <= lf.get(c), "{c}");
        }
    }

    #[test]
    fn test_disabled_is_all_zero() {
        let p = CachePolicy::Disabled.ttls();
        assert!(MetricCategory::ALL.iter().all(|c| p.get(*c).is_zero()));
    }

    #[test]
    fn test_set_override() {
        let mut p = CachePolicies::default();
        p.set(MetricCategory::Memory, Duration::ZERO);
        assert!(p.get(MetricCategory::Memory).is_zero());
        assert_eq!(p.get(MetricCategory::Cpu), Duration::from_millis(100));
    }
}
