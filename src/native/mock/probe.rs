//! In-memory native engine for tests and for running without the native library.
//!
//! `MockProbe` serves host data from a `MockHost` and emulates the native
//! snapshot cache: policy presets, per-category TTL overrides and
//! invalidation behave the way the engine does, so cache control can be
//! exercised end to end. Failures can be injected per call.

use crate::cache::{CachePolicies, CachePolicy, MetricCategory};
use crate::error::StatusCode;
use crate::native::{
    CollectPath, FixedStr, HOSTNAME_LEN, MAX_THERMAL_ZONES, NativeProbe, RawContextSwitches,
    RawCpu, RawDiskIo, RawDiskUsage, RawInetSocket, RawIoStats, RawLoad, RawMemory,
    RawNetInterface, RawNetStats, RawPartition, RawPressure, RawProcess, RawStatus, RawTcpStats,
    RawThermalZone, RawUnixSocket,
};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Every native collection entry point, used as a key for failure injection
/// and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    Hostname,
    Cpu,
    CpuPressure,
    Memory,
    MemoryPressure,
    Load,
    Partitions,
    DiskUsage,
    DiskIo,
    NetInterfaces,
    NetStats,
    IoStats,
    IoPressure,
    TcpStats,
    TcpConnections,
    UdpSockets,
    UnixSockets,
    Process,
    ThermalZones,
    SystemContextSwitches,
    SelfContextSwitches,
}

impl MockCall {
    /// Cache key for calls the native cache can serve.
    pub fn category(self) -> Option<MetricCategory> {
        match self {
            MockCall::Cpu => Some(MetricCategory::Cpu),
            MockCall::CpuPressure => Some(MetricCategory::CpuPressure),
            MockCall::Memory => Some(MetricCategory::Memory),
            MockCall::MemoryPressure => Some(MetricCategory::MemoryPressure),
            MockCall::Load => Some(MetricCategory::Load),
            MockCall::Partitions => Some(MetricCategory::DiskPartitions),
            MockCall::DiskUsage => Some(MetricCategory::DiskUsage),
            MockCall::DiskIo => Some(MetricCategory::DiskIo),
            MockCall::NetInterfaces => Some(MetricCategory::NetInterfaces),
            MockCall::NetStats => Some(MetricCategory::NetStats),
            MockCall::IoStats => Some(MetricCategory::IoStats),
            MockCall::IoPressure => Some(MetricCategory::IoPressure),
            MockCall::Hostname
            | MockCall::TcpStats
            | MockCall::TcpConnections
            | MockCall::UdpSockets
            | MockCall::UnixSockets
            | MockCall::Process
            | MockCall::ThermalZones
            | MockCall::SystemContextSwitches
            | MockCall::SelfContextSwitches => None,
        }
    }
}

/// Host state returned by the mock.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    pub hostname: FixedStr<HOSTNAME_LEN>,
    pub cpu: RawCpu,
    pub memory: RawMemory,
    pub load: RawLoad,
    pub cpu_pressure: RawPressure,
    pub memory_pressure: RawPressure,
    pub io_pressure: RawPressure,
    pub io_stats: RawIoStats,
    pub partitions: Vec<RawPartition>,
    pub disk_usage: Vec<RawDiskUsage>,
    pub disk_io: Vec<RawDiskIo>,
    pub net_interfaces: Vec<RawNetInterface>,
    pub net_stats: Vec<RawNetStats>,
    pub tcp_stats: RawTcpStats,
    pub tcp_connections: Vec<RawInetSocket>,
    pub udp_sockets: Vec<RawInetSocket>,
    pub unix_sockets: Vec<RawUnixSocket>,
    /// Processes that `collect_process` can find by pid.
    pub processes: Vec<RawProcess>,
    /// When false, thermal collection answers `NotSupported`.
    pub thermal_supported: bool,
    pub thermal_zones: Vec<RawThermalZone>,
    pub context_switches: RawContextSwitches,
}

struct CacheEntry {
    filled_at: Instant,
    value: Arc<dyn Any + Send + Sync>,
}

struct NativeCache {
    enabled: bool,
    policy: CachePolicy,
    ttls: CachePolicies,
    entries: HashMap<MetricCategory, CacheEntry>,
}

impl NativeCache {
    fn new() -> Self {
        Self {
            enabled: false,
            policy: CachePolicy::Default,
            ttls: CachePolicies::default_preset(),
            entries: HashMap::new(),
        }
    }

    /// The `Disabled` preset bypasses the cache whatever the per-category
    /// TTLs say.
    fn serves(&self) -> bool {
        self.enabled && self.policy != CachePolicy::Disabled
    }

    fn lookup<T: Clone + 'static>(&self, category: MetricCategory) -> Option<T> {
        if !self.serves() {
            return None;
        }
        let ttl = self.ttls.get(category);
        if ttl.is_zero() {
            return None;
        }
        let entry = self.entries.get(&category)?;
        if entry.filled_at.elapsed() >= ttl {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }
}

/// Mock implementation of [`NativeProbe`].
pub struct MockProbe {
    platform: String,
    host: RwLock<MockHost>,
    failures: RwLock<HashMap<MockCall, RawStatus>>,
    collections: Mutex<HashMap<MockCall, usize>>,
    cache: Mutex<NativeCache>,
    cache_supported: bool,
    init_status: RawStatus,
    init_calls: Mutex<usize>,
    shutdown_calls: Mutex<usize>,
}

impl MockProbe {
    /// Creates a mock serving `host` on the given platform.
    pub fn new(platform: impl Into<String>, host: MockHost) -> Self {
        Self {
            platform: platform.into(),
            host: RwLock::new(host),
            failures: RwLock::new(HashMap::new()),
            collections: Mutex::new(HashMap::new()),
            cache: Mutex::new(NativeCache::new()),
            cache_supported: true,
            init_status: StatusCode::Ok.as_raw(),
            init_calls: Mutex::new(0),
            shutdown_calls: Mutex::new(0),
        }
    }

    /// Every `cache_*` call will answer `NotSupported`.
    pub fn without_cache_support(mut self) -> Self {
        self.cache_supported = false;
        self
    }

    /// `init()` will return `status`.
    pub fn with_init_status(mut self, status: StatusCode) -> Self {
        self.init_status = status.as_raw();
        self
    }

    /// Makes `call` fail with `status` until cleared.
    pub fn fail(&self, call: MockCall, status: StatusCode) {
        self.fail_with_code(call, status.as_raw());
    }

    /// Makes `call` fail with an arbitrary raw code, including codes the
    /// adapter does not know.
    pub fn fail_with_code(&self, call: MockCall, code: RawStatus) {
        self.failures.write().insert(call, code);
    }

    pub fn clear_failure(&self, call: MockCall) {
        self.failures.write().remove(&call);
    }

    /// Mutates the host data in place. Entries already in the emulated cache
    /// keep serving the old data until they expire or are invalidated.
    pub fn update_host(&self, f: impl FnOnce(&mut MockHost)) {
        f(&mut *self.host.write());
    }

    /// Number of times `call` produced fresh data (cache hits excluded).
    pub fn collections(&self, call: MockCall) -> usize {
        self.collections.lock().get(&call).copied().unwrap_or(0)
    }

    pub fn init_calls(&self) -> usize {
        *self.init_calls.lock()
    }

    pub fn shutdown_calls(&self) -> usize {
        *self.shutdown_calls.lock()
    }

    /// Active preset, `None` while the cache is disabled.
    pub fn cache_policy(&self) -> Option<CachePolicy> {
        let cache = self.cache.lock();
        cache.enabled.then_some(cache.policy)
    }

    /// Effective TTL for `category` as the native cache sees it.
    pub fn cache_ttl(&self, category: MetricCategory) -> Duration {
        self.cache.lock().ttls.get(category)
    }

    fn collect<T>(
        &self,
        call: MockCall,
        path: CollectPath,
        read: impl FnOnce(&MockHost) -> T,
    ) -> Result<T, RawStatus>
    where
        T: Clone + Send + Sync + 'static,
    {
        let category = match path {
            CollectPath::Cached => call.category(),
            CollectPath::Direct => None,
        };

        if let Some(category) = category
            && let Some(hit) = self.cache.lock().lookup::<T>(category)
        {
            return Ok(hit);
        }

        if let Some(code) = self.failures.read().get(&call).copied() {
            return Err(code);
        }

        let value = read(&*self.host.read());
        *self.collections.lock().entry(call).or_insert(0) += 1;

        if let Some(category) = category {
            let mut cache = self.cache.lock();
            if cache.serves() {
                cache.entries.insert(
                    category,
                    CacheEntry {
                        filled_at: Instant::now(),
                        value: Arc::new(value.clone()),
                    },
                );
            }
        }

        Ok(value)
    }

    /// Runs a cache control call, answering `NotSupported` when the platform
    /// has no cache.
    fn control(&self, f: impl FnOnce(&mut NativeCache) -> StatusCode) -> RawStatus {
        if !self.cache_supported {
            return StatusCode::NotSupported.as_raw();
        }
        f(&mut *self.cache.lock()).as_raw()
    }
}

impl NativeProbe for MockProbe {
    fn init(&self) -> RawStatus {
        *self.init_calls.lock() += 1;
        self.init_status
    }

    fn shutdown(&self) {
        *self.shutdown_calls.lock() += 1;
        self.cache.lock().entries.clear();
    }

    fn platform(&self) -> &str {
        &self.platform
    }

    fn hostname(&self) -> Result<FixedStr<HOSTNAME_LEN>, RawStatus> {
        self.collect(MockCall::Hostname, CollectPath::Direct, |h| h.hostname)
    }

    fn collect_cpu(&self, path: CollectPath) -> Result<RawCpu, RawStatus> {
        self.collect(MockCall::Cpu, path, |h| h.cpu)
    }

    fn collect_memory(&self, path: CollectPath) -> Result<RawMemory, RawStatus> {
        self.collect(MockCall::Memory, path, |h| h.memory)
    }

    fn collect_load(&self, path: CollectPath) -> Result<RawLoad, RawStatus> {
        self.collect(MockCall::Load, path, |h| h.load)
    }

    fn collect_cpu_pressure(&self, path: CollectPath) -> Result<RawPressure, RawStatus> {
        self.collect(MockCall::CpuPressure, path, |h| h.cpu_pressure)
    }

    fn collect_memory_pressure(&self, path: CollectPath) -> Result<RawPressure, RawStatus> {
        self.collect(MockCall::MemoryPressure, path, |h| h.memory_pressure)
    }

    fn collect_io_pressure(&self, path: CollectPath) -> Result<RawPressure, RawStatus> {
        self.collect(MockCall::IoPressure, path, |h| h.io_pressure)
    }

    fn collect_io_stats(&self, path: CollectPath) -> Result<RawIoStats, RawStatus> {
        self.collect(MockCall::IoStats, path, |h| h.io_stats)
    }

    fn list_partitions(&self, path: CollectPath) -> Result<Vec<RawPartition>, RawStatus> {
        self.collect(MockCall::Partitions, path, |h| h.partitions.clone())
    }

    fn collect_disk_usage(&self, path: CollectPath) -> Result<Vec<RawDiskUsage>, RawStatus> {
        self.collect(MockCall::DiskUsage, path, |h| h.disk_usage.clone())
    }

    fn collect_disk_io(&self, path: CollectPath) -> Result<Vec<RawDiskIo>, RawStatus> {
        self.collect(MockCall::DiskIo, path, |h| h.disk_io.clone())
    }

    fn list_net_interfaces(&self, path: CollectPath) -> Result<Vec<RawNetInterface>, RawStatus> {
        self.collect(MockCall::NetInterfaces, path, |h| h.net_interfaces.clone())
    }

    fn collect_net_stats(&self, path: CollectPath) -> Result<Vec<RawNetStats>, RawStatus> {
        self.collect(MockCall::NetStats, path, |h| h.net_stats.clone())
    }

    fn collect_tcp_stats(&self) -> Result<RawTcpStats, RawStatus> {
        self.collect(MockCall::TcpStats, CollectPath::Direct, |h| h.tcp_stats)
    }

    fn collect_tcp_connections(&self) -> Result<Vec<RawInetSocket>, RawStatus> {
        self.collect(MockCall::TcpConnections, CollectPath::Direct, |h| {
            h.tcp_connections.clone()
        })
    }

    fn collect_udp_sockets(&self) -> Result<Vec<RawInetSocket>, RawStatus> {
        self.collect(MockCall::UdpSockets, CollectPath::Direct, |h| {
            h.udp_sockets.clone()
        })
    }

    fn collect_unix_sockets(&self) -> Result<Vec<RawUnixSocket>, RawStatus> {
        self.collect(MockCall::UnixSockets, CollectPath::Direct, |h| {
            h.unix_sockets.clone()
        })
    }

    fn collect_process(&self, pid: i32) -> Result<RawProcess, RawStatus> {
        self.collect(MockCall::Process, CollectPath::Direct, |h| {
            h.processes.iter().find(|p| p.pid == pid).copied()
        })?
        .ok_or(StatusCode::NotFound.as_raw())
    }

    fn thermal_is_supported(&self) -> bool {
        self.host.read().thermal_supported
    }

    fn collect_thermal_zones(&self) -> Result<Vec<RawThermalZone>, RawStatus> {
        self.collect(MockCall::ThermalZones, CollectPath::Direct, |h| {
            h.thermal_supported.then(|| {
                h.thermal_zones
                    .iter()
                    .take(MAX_THERMAL_ZONES)
                    .copied()
                    .collect::<Vec<_>>()
            })
        })?
        .ok_or(StatusCode::NotSupported.as_raw())
    }

    fn collect_system_context_switches(&self) -> Result<u64, RawStatus> {
        self.collect(MockCall::SystemContextSwitches, CollectPath::Direct, |h| {
            h.context_switches.system_total
        })
    }

    fn collect_self_context_switches(&self) -> Result<RawContextSwitches, RawStatus> {
        self.collect(MockCall::SelfContextSwitches, CollectPath::Direct, |h| {
            h.context_switches
        })
    }

    fn cache_enable(&self) -> RawStatus {
        self.control(|cache| {
            if !cache.enabled {
                cache.enabled = true;
                cache.policy = CachePolicy::Default;
                cache.ttls = CachePolicy::Default.ttls();
                cache.entries.clear();
            }
            StatusCode::Ok
        })
    }

    fn cache_enable_with_policy(&self, policy_id: u32) -> RawStatus {
        self.control(|cache| {
            let Some(policy) = CachePolicy::from_id(policy_id) else {
                return StatusCode::InvalidParam;
            };
            cache.enabled = true;
            cache.policy = policy;
            cache.ttls = policy.ttls();
            cache.entries.clear();
            StatusCode::Ok
        })
    }

    fn cache_disable(&self) -> RawStatus {
        self.control(|cache| {
            cache.enabled = false;
            cache.entries.clear();
            StatusCode::Ok
        })
    }

    fn cache_is_enabled(&self) -> bool {
        self.cache_supported && self.cache.lock().enabled
    }

    fn cache_set_ttl(&self, category_id: u8, ttl_ms: u64) -> RawStatus {
        self.control(|cache| {
            let Some(category) = MetricCategory::from_id(category_id) else {
                return StatusCode::InvalidParam;
            };
            if !cache.enabled {
                return StatusCode::NotSupported;
            }
            cache.ttls.set(category, Duration::from_millis(ttl_ms));
            StatusCode::Ok
        })
    }

    fn cache_invalidate_all(&self) -> RawStatus {
        self.control(|cache| {
            if !cache.enabled {
                return StatusCode::NotSupported;
            }
            cache.entries.clear();
            StatusCode::Ok
        })
    }

    fn cache_invalidate(&self, category_id: u8) -> RawStatus {
        self.control(|cache| {
            let Some(category) = MetricCategory::from_id(category_id) else {
                return StatusCode::InvalidParam;
            };
            if !cache.enabled {
                return StatusCode::NotSupported;
            }
            cache.entries.remove(&category);
            StatusCode::Ok
        })
    }
}
