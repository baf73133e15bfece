//! Main collector that orchestrates metric collection.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::{connections, convert};
use crate::cache::CacheController;
use crate::config::MetricsConfig;
use crate::error::ProbeError;
use crate::native::{CollectPath, NativeProbe, RawStatus};
use crate::storage::model::{
    ConnectionsInfo, ContextSwitchInfo, CpuInfo, DiskInfo, DiskIoInfo, DiskUsageInfo, IoInfo,
    ListeningPort, LoadInfo, MemoryInfo, NetInterfaceInfo, NetStatsInfo, NetworkInfo,
    PartitionInfo, PressureInfo, ProcessInfo, TcpConnection, TcpStatsInfo, ThermalInfo,
    UdpSocket, UnixSocket,
};
use crate::storage::{InternCache, Pools, Snapshot};

/// Timing information for the most recent `collect_all`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectorTiming {
    /// Total snapshot collection time.
    pub total: Duration,
    /// CPU usage plus CPU pressure.
    pub cpu: Duration,
    /// Memory plus memory pressure.
    pub memory: Duration,
    pub load: Duration,
    /// Partitions, usage and block device counters.
    pub disk: Duration,
    /// Interfaces and traffic counters.
    pub network: Duration,
    /// Aggregate I/O plus I/O pressure.
    pub io: Duration,
    /// Socket tables and listening ports.
    pub connections: Duration,
    /// Own process plus context switches.
    pub process: Duration,
    pub thermal: Duration,
}

/// Collects metric snapshots from a native engine.
///
/// A collector owns the intern cache and the pools used while building
/// snapshots. It is `Sync`: any number of threads may call `collect_all`
/// concurrently.
pub struct Collector<N: NativeProbe> {
    native: Arc<N>,
    platform: Arc<str>,
    pid: i32,
    initialized: Mutex<bool>,
    /// Resolved by `init`, reported in every snapshot.
    hostname: Mutex<Option<Arc<str>>>,
    strings: InternCache,
    pools: Pools,
    last_timing: Mutex<Option<CollectorTiming>>,
}

/// Keeps a category's value, or logs why it is absent.
fn best_effort<T>(category: &'static str, result: Result<T, RawStatus>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(code) => {
            debug!(category, code, error = %ProbeError::from_raw_error(code), "skipping category");
            None
        }
    }
}

/// Surfaces a native failure as-is.
fn direct<T>(result: Result<T, RawStatus>) -> Result<T, ProbeError> {
    result.map_err(ProbeError::from_raw_error)
}

impl<N: NativeProbe> Collector<N> {
    /// Creates a collector over `native`. Call `init()` before collecting.
    pub fn new(native: Arc<N>) -> Self {
        Self::with_strings(native, InternCache::new())
    }

    /// Creates a collector with a caller-provided intern cache.
    pub fn with_strings(native: Arc<N>, strings: InternCache) -> Self {
        let platform = Arc::from(native.platform());
        Self {
            native,
            platform,
            pid: std::process::id() as i32,
            initialized: Mutex::new(false),
            hostname: Mutex::new(None),
            strings,
            pools: Pools::new(),
            last_timing: Mutex::new(None),
        }
    }

    /// Initializes the native engine and resolves the hostname. Calling it
    /// again is a no-op. A host that cannot report its name still
    /// initializes; snapshots then carry no hostname.
    pub fn init(&self) -> Result<(), ProbeError> {
        let mut initialized = self.initialized.lock();
        if *initialized {
            return Ok(());
        }
        ProbeError::from_raw_status(self.native.init())?;

        let hostname = best_effort("hostname", self.native.hostname())
            .and_then(|raw| convert::hostname(&raw, &self.strings));
        *self.hostname.lock() = hostname.clone();
        *initialized = true;
        info!(
            platform = %self.platform,
            hostname = hostname.as_deref().unwrap_or("-"),
            "native engine initialized"
        );
        Ok(())
    }

    /// Applies the cache section of `config` to the native cache.
    ///
    /// Callers that load their configuration from a file use this once after
    /// `init` so the cache settings take effect.
    pub fn configure(&self, config: &MetricsConfig) -> Result<(), ProbeError> {
        self.ensure_initialized()?;
        config.cache.apply(&self.cache())
    }

    /// Releases the native engine. A no-op if not initialized.
    pub fn shutdown(&self) {
        let mut initialized = self.initialized.lock();
        if !*initialized {
            return;
        }
        self.native.shutdown();
        *self.hostname.lock() = None;
        *initialized = false;
        info!(platform = %self.platform, "native engine shut down");
    }

    pub fn is_initialized(&self) -> bool {
        *self.initialized.lock()
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Hostname resolved at `init`, if the host reported one.
    pub fn hostname(&self) -> Option<Arc<str>> {
        self.hostname.lock().clone()
    }

    /// Control handle for the native cache.
    pub fn cache(&self) -> CacheController<N> {
        CacheController::new(Arc::clone(&self.native))
    }

    pub fn strings(&self) -> &InternCache {
        &self.strings
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    /// Returns timing information from the last `collect_all`.
    pub fn last_timing(&self) -> Option<CollectorTiming> {
        *self.last_timing.lock()
    }

    fn ensure_initialized(&self) -> Result<(), ProbeError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(ProbeError::NotInitialized)
        }
    }

    /// Collects every category `config` asks for.
    ///
    /// A category whose native call fails is left out of the snapshot and
    /// does not affect the others. The only error is `NotInitialized`.
    pub fn collect_all(&self, config: &MetricsConfig) -> Result<Snapshot, ProbeError> {
        self.ensure_initialized()?;

        let total_start = Instant::now();
        let mut snapshot = Snapshot::empty(Utc::now(), Arc::clone(&self.platform));
        snapshot.hostname = self.hostname();
        if !config.enabled {
            return Ok(snapshot);
        }

        let path = if self.native.cache_is_enabled() {
            CollectPath::Cached
        } else {
            CollectPath::Direct
        };
        let mut timing = CollectorTiming::default();

        if config.cpu.enabled {
            let start = Instant::now();
            snapshot.cpu = self.gather_cpu(path, config.cpu.pressure);
            timing.cpu = start.elapsed();
        }

        if config.memory.enabled {
            let start = Instant::now();
            snapshot.memory = self.gather_memory(path, config.memory.pressure);
            timing.memory = start.elapsed();
        }

        if config.load.enabled {
            let start = Instant::now();
            snapshot.load = best_effort("load", self.native.collect_load(path))
                .map(|raw| convert::load(&raw));
            timing.load = start.elapsed();
        }

        if config.disk.enabled {
            let start = Instant::now();
            snapshot.disk = self.gather_disk(path, config);
            timing.disk = start.elapsed();
        }

        if config.network.enabled {
            let start = Instant::now();
            snapshot.network = self.gather_network(path, config);
            timing.network = start.elapsed();
        }

        if config.io.enabled {
            let start = Instant::now();
            snapshot.io = self.gather_io(path, config.io.pressure);
            timing.io = start.elapsed();
        }

        if config.wants_connections() {
            let start = Instant::now();
            snapshot.connections = self.gather_connections(config);
            timing.connections = start.elapsed();
        }

        if config.process.enabled {
            let start = Instant::now();
            snapshot.process = best_effort("process", self.native.collect_process(self.pid))
                .map(|raw| convert::process(&raw, &self.strings));
            if config.process.context_switches {
                snapshot.context_switches = self.gather_context_switches();
            }
            timing.process = start.elapsed();
        }

        if config.thermal.enabled {
            let start = Instant::now();
            snapshot.thermal = self.gather_thermal();
            timing.thermal = start.elapsed();
        }

        timing.total = total_start.elapsed();
        *self.last_timing.lock() = Some(timing);

        Ok(snapshot)
    }

    /// `collect_all` encoded as JSON through a pooled buffer.
    pub fn collect_all_json(&self, config: &MetricsConfig) -> Result<String, ProbeError> {
        let snapshot = self.collect_all(config)?;

        let mut buf = self.pools.json.acquire();
        let encoded = serde_json::to_writer(&mut buf, &snapshot)
            .map_err(ProbeError::from)
            .and_then(|()| {
                std::str::from_utf8(&buf)
                    .map(str::to_owned)
                    .map_err(|e| ProbeError::Encode(e.to_string()))
            });
        self.pools.json.release(buf);
        encoded
    }

    fn gather_cpu(&self, path: CollectPath, pressure: bool) -> Option<CpuInfo> {
        let raw = best_effort("cpu", self.native.collect_cpu(path))?;
        let mut info = convert::cpu(&raw);
        if pressure {
            info.pressure = best_effort("cpu_pressure", self.native.collect_cpu_pressure(path))
                .map(|p| convert::pressure_some(&p));
        }
        Some(info)
    }

    fn gather_memory(&self, path: CollectPath, pressure: bool) -> Option<MemoryInfo> {
        let raw = best_effort("memory", self.native.collect_memory(path))?;
        let mut info = convert::memory(&raw);
        if pressure {
            info.pressure =
                best_effort("memory_pressure", self.native.collect_memory_pressure(path))
                    .map(|p| convert::pressure_full(&p));
        }
        Some(info)
    }

    fn gather_disk(&self, path: CollectPath, config: &MetricsConfig) -> Option<DiskInfo> {
        let strings = &self.strings;
        let mut disk = DiskInfo::default();

        if config.disk.partitions {
            disk.partitions = best_effort("disk_partitions", self.native.list_partitions(path))
                .map(|raw| raw.iter().map(|r| convert::partition(r, strings)).collect());
        }
        if config.disk.usage {
            disk.usage = best_effort("disk_usage", self.native.collect_disk_usage(path))
                .map(|raw| raw.iter().map(|r| convert::disk_usage(r, strings)).collect());
        }
        if config.disk.io {
            disk.io = best_effort("disk_io", self.native.collect_disk_io(path))
                .map(|raw| raw.iter().map(|r| convert::disk_io(r, strings)).collect());
        }

        (!disk.is_empty()).then_some(disk)
    }

    fn gather_network(&self, path: CollectPath, config: &MetricsConfig) -> Option<NetworkInfo> {
        let strings = &self.strings;
        let mut network = NetworkInfo::default();

        if config.network.interfaces {
            network.interfaces =
                best_effort("net_interfaces", self.native.list_net_interfaces(path)).map(|raw| {
                    raw.iter()
                        .map(|r| convert::net_interface(r, strings))
                        .collect()
                });
        }
        if config.network.stats {
            network.stats = best_effort("net_stats", self.native.collect_net_stats(path))
                .map(|raw| raw.iter().map(|r| convert::net_stats(r, strings)).collect());
        }

        (!network.is_empty()).then_some(network)
    }

    fn gather_io(&self, path: CollectPath, pressure: bool) -> Option<IoInfo> {
        let raw = best_effort("io_stats", self.native.collect_io_stats(path))?;
        let mut info = convert::io(&raw);
        if pressure {
            info.pressure = best_effort("io_pressure", self.native.collect_io_pressure(path))
                .map(|p| convert::pressure_full(&p));
        }
        Some(info)
    }

    fn gather_connections(&self, config: &MetricsConfig) -> Option<ConnectionsInfo> {
        let wanted = &config.connections;
        let (pools, strings) = (&self.pools, &self.strings);
        let mut info = ConnectionsInfo::default();

        if wanted.tcp_stats {
            info.tcp_stats = best_effort("tcp_stats", self.native.collect_tcp_stats())
                .map(|raw| convert::tcp_stats(&raw));
        }

        // One native call serves both the connection table and the listeners.
        if (wanted.tcp_connections || wanted.listening_ports)
            && let Some(raw) =
                best_effort("tcp_connections", self.native.collect_tcp_connections())
        {
            if wanted.tcp_connections {
                info.tcp_connections = Some(connections::tcp_connections(pools, strings, &raw));
            }
            if wanted.listening_ports {
                info.listening_ports = Some(connections::listening_ports(pools, strings, &raw));
            }
        }

        if wanted.udp_sockets {
            info.udp_sockets = best_effort("udp_sockets", self.native.collect_udp_sockets())
                .map(|raw| connections::udp_sockets(pools, strings, &raw));
        }
        if wanted.unix_sockets {
            info.unix_sockets = best_effort("unix_sockets", self.native.collect_unix_sockets())
                .map(|raw| connections::unix_sockets(pools, strings, &raw));
        }

        (!info.is_empty()).then_some(info)
    }

    /// `supported: false` without sensors; absent if reading them failed.
    fn gather_thermal(&self) -> Option<ThermalInfo> {
        if !self.native.thermal_is_supported() {
            return Some(ThermalInfo::default());
        }
        best_effort("thermal", self.native.collect_thermal_zones()).map(|raw| ThermalInfo {
            supported: true,
            zones: raw
                .iter()
                .map(|r| convert::thermal_zone(r, &self.strings))
                .collect(),
        })
    }

    fn gather_context_switches(&self) -> Option<ContextSwitchInfo> {
        let info = ContextSwitchInfo {
            system_total: best_effort(
                "system_context_switches",
                self.native.collect_system_context_switches(),
            ),
            current: best_effort(
                "self_context_switches",
                self.native.collect_self_context_switches(),
            )
            .map(|raw| convert::context_switch_counts(&raw)),
        };
        (!info.is_empty()).then_some(info)
    }

    // Direct collectors: always fresh, errors surfaced as-is.

    pub fn collect_cpu(&self) -> Result<CpuInfo, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_cpu(CollectPath::Direct))?;
        Ok(convert::cpu(&raw))
    }

    pub fn collect_memory(&self) -> Result<MemoryInfo, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_memory(CollectPath::Direct))?;
        Ok(convert::memory(&raw))
    }

    pub fn collect_load(&self) -> Result<LoadInfo, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_load(CollectPath::Direct))?;
        Ok(convert::load(&raw))
    }

    pub fn collect_cpu_pressure(&self) -> Result<PressureInfo, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_cpu_pressure(CollectPath::Direct))?;
        Ok(convert::pressure_some(&raw))
    }

    pub fn collect_memory_pressure(&self) -> Result<PressureInfo, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_memory_pressure(CollectPath::Direct))?;
        Ok(convert::pressure_full(&raw))
    }

    pub fn collect_io_pressure(&self) -> Result<PressureInfo, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_io_pressure(CollectPath::Direct))?;
        Ok(convert::pressure_full(&raw))
    }

    pub fn collect_io_stats(&self) -> Result<IoInfo, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_io_stats(CollectPath::Direct))?;
        Ok(convert::io(&raw))
    }

    pub fn list_partitions(&self) -> Result<Vec<PartitionInfo>, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.list_partitions(CollectPath::Direct))?;
        Ok(raw
            .iter()
            .map(|r| convert::partition(r, &self.strings))
            .collect())
    }

    pub fn collect_disk_usage(&self) -> Result<Vec<DiskUsageInfo>, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_disk_usage(CollectPath::Direct))?;
        Ok(raw
            .iter()
            .map(|r| convert::disk_usage(r, &self.strings))
            .collect())
    }

    pub fn collect_disk_io(&self) -> Result<Vec<DiskIoInfo>, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_disk_io(CollectPath::Direct))?;
        Ok(raw
            .iter()
            .map(|r| convert::disk_io(r, &self.strings))
            .collect())
    }

    pub fn list_net_interfaces(&self) -> Result<Vec<NetInterfaceInfo>, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.list_net_interfaces(CollectPath::Direct))?;
        Ok(raw
            .iter()
            .map(|r| convert::net_interface(r, &self.strings))
            .collect())
    }

    pub fn collect_net_stats(&self) -> Result<Vec<NetStatsInfo>, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_net_stats(CollectPath::Direct))?;
        Ok(raw
            .iter()
            .map(|r| convert::net_stats(r, &self.strings))
            .collect())
    }

    pub fn collect_tcp_stats(&self) -> Result<TcpStatsInfo, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_tcp_stats())?;
        Ok(convert::tcp_stats(&raw))
    }

    pub fn collect_tcp_connections(&self) -> Result<Vec<TcpConnection>, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_tcp_connections())?;
        Ok(connections::tcp_connections(&self.pools, &self.strings, &raw))
    }

    pub fn collect_udp_sockets(&self) -> Result<Vec<UdpSocket>, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_udp_sockets())?;
        Ok(connections::udp_sockets(&self.pools, &self.strings, &raw))
    }

    pub fn collect_unix_sockets(&self) -> Result<Vec<UnixSocket>, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_unix_sockets())?;
        Ok(connections::unix_sockets(&self.pools, &self.strings, &raw))
    }

    pub fn collect_listening_ports(&self) -> Result<Vec<ListeningPort>, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_tcp_connections())?;
        Ok(connections::listening_ports(&self.pools, &self.strings, &raw))
    }

    /// Resource usage of any process; `collect_all` reports its own.
    pub fn collect_process(&self, pid: i32) -> Result<ProcessInfo, ProbeError> {
        self.ensure_initialized()?;
        let raw = direct(self.native.collect_process(pid))?;
        Ok(convert::process(&raw, &self.strings))
    }

    /// Succeeds with `supported: false` on hosts without sensors.
    pub fn collect_thermal(&self) -> Result<ThermalInfo, ProbeError> {
        self.ensure_initialized()?;
        if !self.native.thermal_is_supported() {
            return Ok(ThermalInfo::default());
        }
        let raw = direct(self.native.collect_thermal_zones())?;
        Ok(ThermalInfo {
            supported: true,
            zones: raw
                .iter()
                .map(|r| convert::thermal_zone(r, &self.strings))
                .collect(),
        })
    }

    /// Both counters; fails if either is unavailable.
    pub fn collect_context_switches(&self) -> Result<ContextSwitchInfo, ProbeError> {
        self.ensure_initialized()?;
        let system_total = direct(self.native.collect_system_context_switches())?;
        let current = direct(self.native.collect_self_context_switches())?;
        Ok(ContextSwitchInfo {
            system_total: Some(system_total),
            current: Some(convert::context_switch_counts(&current)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CachePolicy, MetricCategory};
    use crate::config::MetricsTemplate;
    use crate::error::StatusCode;
    use crate::native::mock::{MockCall, MockProbe};

    fn collector(probe: MockProbe) -> (Arc<MockProbe>, Collector<MockProbe>) {
        let probe = Arc::new(probe);
        let collector = Collector::new(Arc::clone(&probe));
        collector.init().unwrap();
        (probe, collector)
    }

    #[test]
    fn test_collect_before_init_fails_fast() {
        let probe = Arc::new(MockProbe::typical_host());
        let collector = Collector::new(Arc::clone(&probe));

        assert_eq!(
            collector.collect_all(&MetricsConfig::default()),
            Err(ProbeError::NotInitialized)
        );
        assert_eq!(collector.collect_cpu(), Err(ProbeError::NotInitialized));
        assert_eq!(
            collector.collect_tcp_connections(),
            Err(ProbeError::NotInitialized)
        );
        assert_eq!(probe.collections(MockCall::Cpu), 0);
        assert_eq!(probe.collections(MockCall::TcpConnections), 0);
    }

    #[test]
    fn test_init_is_idempotent() {
        let (probe, collector) = collector(MockProbe::typical_host());
        collector.init().unwrap();
        assert!(collector.is_initialized());
        assert_eq!(probe.init_calls(), 1);
    }

    #[test]
    fn test_init_failure_propagates() {
        let probe = Arc::new(MockProbe::typical_host().with_init_status(StatusCode::Permission));
        let collector = Collector::new(probe);
        assert_eq!(collector.init(), Err(ProbeError::Permission));
        assert!(!collector.is_initialized());
    }

    #[test]
    fn test_shutdown() {
        let (probe, collector) = collector(MockProbe::typical_host());
        collector.shutdown();
        collector.shutdown();
        assert_eq!(probe.shutdown_calls(), 1);
        assert!(!collector.is_initialized());
        assert_eq!(
            collector.collect_all(&MetricsConfig::default()),
            Err(ProbeError::NotInitialized)
        );
    }

    #[test]
    fn test_collect_all_typical_host() {
        let (_, collector) = collector(MockProbe::typical_host());
        let snap = collector.collect_all(&MetricsConfig::default()).unwrap();

        assert_eq!(&*snap.platform, "linux");
        assert_eq!(snap.hostname.as_deref(), Some("db-01.example.internal"));
        assert_eq!(snap.category_count(), 10);

        let cpu = snap.cpu.as_ref().unwrap();
        assert!((cpu.usage_percent - 27.5).abs() < 1e-9);
        assert_eq!(cpu.cores, 8);
        let cpu_pressure = cpu.pressure.as_ref().unwrap();
        assert_eq!(cpu_pressure.full_avg10, None);

        let memory = snap.memory.as_ref().unwrap();
        assert!(memory.pressure.as_ref().unwrap().full_total_us.is_some());

        let disk = snap.disk.as_ref().unwrap();
        assert_eq!(disk.partitions.as_ref().unwrap().len(), 2);
        assert_eq!(&*disk.partitions.as_ref().unwrap()[0].options, "rw,relatime,errors=remount-ro");
        assert_eq!(disk.io.as_ref().unwrap().len(), 2);

        let network = snap.network.as_ref().unwrap();
        let interfaces = network.interfaces.as_ref().unwrap();
        assert!(interfaces.iter().any(|i| i.is_loopback && &*i.name == "lo"));
        assert!(interfaces.iter().any(|i| !i.is_up && &*i.name == "eth1"));

        let io = snap.io.as_ref().unwrap();
        assert!(io.pressure.is_some());

        let conns = snap.connections.as_ref().unwrap();
        assert_eq!(conns.tcp_stats.as_ref().unwrap().total, 4);
        assert_eq!(conns.tcp_connections.as_ref().unwrap().len(), 4);
        assert_eq!(conns.listening_ports.as_ref().unwrap().len(), 3);
        assert_eq!(conns.udp_sockets.as_ref().unwrap().len(), 2);
        assert_eq!(conns.unix_sockets.as_ref().unwrap().len(), 3);

        let process = snap.process.as_ref().unwrap();
        assert_eq!(process.pid, std::process::id() as i32);
        assert_eq!(&*process.state, "running");

        let thermal = snap.thermal.as_ref().unwrap();
        assert!(thermal.supported);
        assert_eq!(thermal.zones.len(), 2);
        assert_eq!(thermal.zones[0].temp_max, None);
        assert_eq!(thermal.zones[1].temp_max, Some(84.0));

        let switches = snap.context_switches.as_ref().unwrap();
        assert_eq!(switches.system_total, Some(987_654_321));
        assert_eq!(switches.current.unwrap().involuntary, 35);
    }

    #[test]
    fn test_partial_failure_omits_only_failed_category() {
        let (probe, collector) = collector(MockProbe::typical_host());
        probe.fail(MockCall::Memory, StatusCode::Io);

        let snap = collector.collect_all(&MetricsConfig::default()).unwrap();
        assert!(snap.memory.is_none());
        assert!(snap.cpu.is_some());
        assert!(snap.load.is_some());
        assert!(snap.connections.is_some());
    }

    #[test]
    fn test_failed_sub_metric_keeps_parent() {
        let (probe, collector) = collector(MockProbe::typical_host());
        probe.fail(MockCall::Partitions, StatusCode::Permission);
        probe.fail(MockCall::CpuPressure, StatusCode::NotSupported);

        let snap = collector.collect_all(&MetricsConfig::default()).unwrap();
        let disk = snap.disk.unwrap();
        assert!(disk.partitions.is_none());
        assert!(disk.usage.is_some());
        let cpu = snap.cpu.unwrap();
        assert!(cpu.pressure.is_none());
    }

    #[test]
    fn test_minimal_host() {
        let (_, collector) = collector(MockProbe::minimal_host());
        let snap = collector.collect_all(&MetricsConfig::default()).unwrap();

        assert_eq!(&*snap.platform, "darwin");
        assert!(snap.cpu.as_ref().unwrap().pressure.is_none());
        assert!(snap.memory.as_ref().unwrap().pressure.is_none());
        assert!(snap.load.is_some());
        assert!(snap.disk.is_none());
        assert!(snap.network.is_none());
        assert!(snap.io.is_none());
        assert!(snap.connections.is_none());
        assert!(snap.process.is_some());
        assert!(snap.context_switches.is_none());
        let thermal = snap.thermal.unwrap();
        assert!(!thermal.supported);
        assert!(thermal.zones.is_empty());
    }

    #[test]
    fn test_unprivileged_host() {
        let (_, collector) = collector(MockProbe::unprivileged_host());
        let snap = collector.collect_all(&MetricsConfig::default()).unwrap();

        let conns = snap.connections.unwrap();
        assert!(conns.tcp_stats.is_some());
        assert!(conns.tcp_connections.is_none());
        assert!(conns.listening_ports.is_none());
        assert!(conns.unix_sockets.is_none());
        assert_eq!(
            collector.collect_tcp_connections(),
            Err(ProbeError::Permission)
        );
    }

    #[test]
    fn test_disabled_config_is_metadata_only() {
        let (probe, collector) = collector(MockProbe::typical_host());
        let snap = collector.collect_all(&MetricsConfig::disabled()).unwrap();
        assert_eq!(snap.category_count(), 0);
        assert!(snap.hostname.is_some());
        assert_eq!(probe.collections(MockCall::Cpu), 0);
        assert_eq!(probe.collections(MockCall::UnixSockets), 0);
    }

    #[test]
    fn test_minimal_template() {
        let (probe, collector) = collector(MockProbe::typical_host());
        let cfg = MetricsConfig::from_template(MetricsTemplate::Minimal);
        let snap = collector.collect_all(&cfg).unwrap();

        assert_eq!(snap.category_count(), 3);
        assert!(snap.cpu.unwrap().pressure.is_none());
        assert_eq!(probe.collections(MockCall::CpuPressure), 0);
        assert_eq!(probe.collections(MockCall::TcpConnections), 0);
    }

    #[test]
    fn test_listening_ports_only_still_reads_tcp_table() {
        let (probe, collector) = collector(MockProbe::typical_host());
        let mut cfg = MetricsConfig::default();
        cfg.connections.tcp_connections = false;
        cfg.connections.tcp_stats = false;
        cfg.connections.udp_sockets = false;
        cfg.connections.unix_sockets = false;

        let conns = collector.collect_all(&cfg).unwrap().connections.unwrap();
        assert!(conns.tcp_connections.is_none());
        assert_eq!(conns.listening_ports.unwrap().len(), 3);
        assert_eq!(probe.collections(MockCall::TcpConnections), 1);
    }

    #[test]
    fn test_cache_enabled_uses_cached_path() {
        let (probe, collector) = collector(MockProbe::typical_host());
        let cfg = MetricsConfig::default();

        collector.collect_all(&cfg).unwrap();
        collector.collect_all(&cfg).unwrap();
        assert_eq!(probe.collections(MockCall::Cpu), 2);

        collector
            .cache()
            .enable_with_policy(CachePolicy::LowFrequency)
            .unwrap();
        collector.collect_all(&cfg).unwrap();
        collector.collect_all(&cfg).unwrap();
        assert_eq!(probe.collections(MockCall::Cpu), 3);
        assert_eq!(probe.collections(MockCall::NetInterfaces), 3);
        // Socket tables are never cached.
        assert_eq!(probe.collections(MockCall::TcpConnections), 4);

        collector.cache().invalidate_all().unwrap();
        collector.collect_all(&cfg).unwrap();
        assert_eq!(probe.collections(MockCall::Cpu), 4);
    }

    #[test]
    fn test_direct_collectors_bypass_cache() {
        let (probe, collector) = collector(MockProbe::typical_host());
        collector.cache().enable().unwrap();
        collector.collect_cpu().unwrap();
        collector.collect_cpu().unwrap();
        assert_eq!(probe.collections(MockCall::Cpu), 2);
    }

    #[test]
    fn test_direct_collectors_surface_status() {
        let (_, collector) = collector(MockProbe::minimal_host());
        assert!(collector.collect_cpu().is_ok());
        assert!(collector.collect_memory().is_ok());
        assert!(collector.collect_load().is_ok());
        assert_eq!(collector.collect_cpu_pressure(), Err(ProbeError::NotSupported));
        assert_eq!(collector.collect_memory_pressure(), Err(ProbeError::NotSupported));
        assert_eq!(collector.collect_io_pressure(), Err(ProbeError::NotSupported));
        assert_eq!(collector.collect_io_stats(), Err(ProbeError::NotSupported));
        assert_eq!(collector.list_partitions(), Err(ProbeError::NotSupported));
        assert_eq!(collector.collect_disk_usage(), Err(ProbeError::NotSupported));
        assert_eq!(collector.collect_disk_io(), Err(ProbeError::NotSupported));
        assert_eq!(collector.list_net_interfaces(), Err(ProbeError::NotSupported));
        assert_eq!(collector.collect_net_stats(), Err(ProbeError::NotSupported));
        assert_eq!(collector.collect_tcp_stats(), Err(ProbeError::NotSupported));
        assert_eq!(collector.collect_udp_sockets(), Err(ProbeError::NotSupported));
        assert_eq!(collector.collect_unix_sockets(), Err(ProbeError::NotSupported));
        assert_eq!(
            collector.collect_listening_ports(),
            Err(ProbeError::NotSupported)
        );
        assert_eq!(
            collector.collect_context_switches(),
            Err(ProbeError::NotSupported)
        );
        assert!(!collector.collect_thermal().unwrap().supported);
        assert_eq!(collector.collect_process(-1), Err(ProbeError::NotFound));
    }

    #[test]
    fn test_direct_collectors_typical_host() {
        let (_, collector) = collector(MockProbe::typical_host());
        assert_eq!(collector.collect_listening_ports().unwrap().len(), 3);
        assert_eq!(collector.collect_tcp_stats().unwrap().listen, 3);
        assert_eq!(collector.collect_net_stats().unwrap()[1].bytes_recv, 987_654_321);
        assert_eq!(collector.collect_disk_usage().unwrap().len(), 2);
        assert_eq!(
            collector.collect_io_pressure().unwrap().full_total_us,
            Some(3_000_000)
        );
        assert_eq!(collector.collect_process(1024).unwrap().num_fds, 180);
        assert_eq!(collector.collect_thermal().unwrap().zones.len(), 2);
        let switches = collector.collect_context_switches().unwrap();
        assert_eq!(switches.current.unwrap().voluntary, 1_200);
    }

    #[test]
    fn test_unknown_native_status() {
        let (probe, collector) = collector(MockProbe::typical_host());
        probe.fail_with_code(MockCall::Load, 42);

        assert_eq!(collector.collect_load(), Err(ProbeError::UnknownStatus(42)));
        let snap = collector.collect_all(&MetricsConfig::default()).unwrap();
        assert!(snap.load.is_none());
        assert!(snap.cpu.is_some());
    }

    #[test]
    fn test_disabled_policy_ignores_ttl_override() {
        let (probe, collector) = collector(MockProbe::typical_host());
        let cache = collector.cache();
        cache.enable_with_policy(CachePolicy::Disabled).unwrap();
        cache.set_ttl(MetricCategory::Cpu, Duration::from_secs(60)).unwrap();

        let cfg = MetricsConfig::default();
        collector.collect_all(&cfg).unwrap();
        collector.collect_all(&cfg).unwrap();
        assert_eq!(probe.collections(MockCall::Cpu), 2);
        assert_eq!(probe.collections(MockCall::Load), 2);
    }

    #[test]
    fn test_configure_applies_loaded_cache_section() {
        let probe = Arc::new(MockProbe::typical_host());
        let collector = Collector::new(Arc::clone(&probe));
        let cfg = MetricsConfig::from_json_str(
            r#"{
                "cache": {
                    "enabled": true,
                    "policy": "high_frequency",
                    "ttl_overrides_ms": { "cpu": 60000 }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(collector.configure(&cfg), Err(ProbeError::NotInitialized));
        collector.init().unwrap();
        collector.configure(&cfg).unwrap();

        assert!(collector.cache().is_enabled());
        assert_eq!(probe.cache_policy(), Some(CachePolicy::HighFrequency));
        assert_eq!(probe.cache_ttl(MetricCategory::Cpu), Duration::from_secs(60));

        collector.collect_all(&cfg).unwrap();
        collector.collect_all(&cfg).unwrap();
        assert_eq!(probe.collections(MockCall::Cpu), 1);
    }

    #[test]
    fn test_configure_default_without_cache_support() {
        let (probe, collector) = collector(MockProbe::minimal_host());
        collector.configure(&MetricsConfig::default()).unwrap();
        assert!(!collector.cache().is_enabled());
        collector.collect_all(&MetricsConfig::default()).unwrap();
        assert_eq!(probe.collections(MockCall::Cpu), 1);
    }

    #[test]
    fn test_hostname_failure_does_not_block_init() {
        let probe = MockProbe::typical_host();
        probe.fail(MockCall::Hostname, StatusCode::Permission);
        let (_, collector) = collector(probe);

        assert!(collector.is_initialized());
        assert_eq!(collector.hostname(), None);
        let snap = collector.collect_all(&MetricsConfig::default()).unwrap();
        assert!(snap.hostname.is_none());
        assert!(snap.cpu.is_some());
    }

    #[test]
    fn test_hostname_resolved_once() {
        let (probe, collector) = collector(MockProbe::typical_host());
        collector.collect_all(&MetricsConfig::default()).unwrap();
        collector.collect_all(&MetricsConfig::default()).unwrap();
        assert_eq!(probe.collections(MockCall::Hostname), 1);

        collector.shutdown();
        assert_eq!(collector.hostname(), None);
    }

    #[test]
    fn test_host_sections_follow_config() {
        let (probe, collector) = collector(MockProbe::typical_host());
        let mut cfg = MetricsConfig::default();
        cfg.process.context_switches = false;
        cfg.thermal.enabled = false;

        let snap = collector.collect_all(&cfg).unwrap();
        assert!(snap.process.is_some());
        assert!(snap.context_switches.is_none());
        assert!(snap.thermal.is_none());
        assert_eq!(probe.collections(MockCall::SystemContextSwitches), 0);
        assert_eq!(probe.collections(MockCall::ThermalZones), 0);
    }

    #[test]
    fn test_context_switches_partial() {
        let (probe, collector) = collector(MockProbe::typical_host());
        probe.fail(MockCall::SelfContextSwitches, StatusCode::Permission);

        let snap = collector.collect_all(&MetricsConfig::default()).unwrap();
        let switches = snap.context_switches.unwrap();
        assert_eq!(switches.system_total, Some(987_654_321));
        assert!(switches.current.is_none());
        assert_eq!(
            collector.collect_context_switches(),
            Err(ProbeError::Permission)
        );
    }

    #[test]
    fn test_thermal_read_failure_omits_section() {
        let (probe, collector) = collector(MockProbe::typical_host());
        probe.fail(MockCall::ThermalZones, StatusCode::Io);

        let snap = collector.collect_all(&MetricsConfig::default()).unwrap();
        assert!(snap.thermal.is_none());
        assert_eq!(collector.collect_thermal(), Err(ProbeError::Io));
    }

    #[test]
    fn test_stable_strings_shared_across_snapshots() {
        let (_, collector) = collector(MockProbe::typical_host());
        let cfg = MetricsConfig::default();
        let a = collector.collect_all(&cfg).unwrap();
        let size = collector.strings().stats().size;
        let b = collector.collect_all(&cfg).unwrap();

        let dev_a = &a.disk.as_ref().unwrap().partitions.as_ref().unwrap()[0].device;
        let dev_b = &b.disk.as_ref().unwrap().partitions.as_ref().unwrap()[0].device;
        assert!(Arc::ptr_eq(dev_a, dev_b));
        assert_eq!(collector.strings().stats().size, size);
    }

    #[test]
    fn test_collect_all_json() {
        let (_, collector) = collector(MockProbe::typical_host());
        let json = collector.collect_all_json(&MetricsConfig::default()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["platform"], "linux");
        assert_eq!(value["load"]["load_1min"], 0.75);
        assert_eq!(value["connections"]["listening_ports"][0]["protocol"], "tcp");
        assert_eq!(collector.pools().json.idle(), 1);

        assert_eq!(value["hostname"], "db-01.example.internal");
        assert_eq!(value["context_switches"]["self"]["voluntary"], 1_200);

        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.category_count(), 10);
    }

    #[test]
    fn test_timing_recorded() {
        let (_, collector) = collector(MockProbe::typical_host());
        assert!(collector.last_timing().is_none());
        collector.collect_all(&MetricsConfig::default()).unwrap();
        let timing = collector.last_timing().unwrap();
        assert!(timing.total >= timing.cpu);
        assert!(timing.total >= timing.connections);
    }

    #[test]
    fn test_concurrent_collect_all() {
        let (_, collector) = collector(MockProbe::typical_host());
        let cfg = MetricsConfig::default();
        collector.collect_all(&cfg).unwrap();
        let strings = collector.strings().stats().size;

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..20 {
                        let snap = collector.collect_all(&cfg).unwrap();
                        assert_eq!(snap.category_count(), 10);
                        assert_eq!(
                            snap.connections.unwrap().tcp_connections.unwrap().len(),
                            4
                        );
                    }
                });
            }
        });

        assert_eq!(collector.strings().stats().size, strings);
        assert!(collector.pools().tcp.idle() >= 1);
    }
}
