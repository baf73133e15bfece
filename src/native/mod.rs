//! The native collection engine as seen from this crate.
//!
//! The engine owns the actual OS access and its own TTL snapshot cache. This
//! crate only talks to it through [`NativeProbe`], which allows the adapter to
//! run against the real engine or against [`mock::MockProbe`] in tests.

pub mod mock;
pub mod raw;

pub use raw::*;

/// Status code exactly as returned across the native boundary.
///
/// Zero is success. Known values are listed in [`crate::error::StatusCode`];
/// anything else is surfaced as `ProbeError::UnknownStatus`.
pub type RawStatus = i32;

/// Which native entry point to use for a cacheable category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectPath {
    /// Always collect fresh data.
    Direct,
    /// Let the native cache answer if its entry is still within TTL.
    Cached,
}

/// Synchronous call surface of the native engine.
///
/// Every call may block for as long as the engine needs; no timeout is
/// applied at this level. Status codes are returned raw and translated by
/// the caller.
pub trait NativeProbe: Send + Sync {
    fn init(&self) -> RawStatus;
    fn shutdown(&self);
    /// Platform identifier, e.g. "linux".
    fn platform(&self) -> &str;
    fn hostname(&self) -> Result<FixedStr<HOSTNAME_LEN>, RawStatus>;

    fn collect_cpu(&self, path: CollectPath) -> Result<RawCpu, RawStatus>;
    fn collect_memory(&self, path: CollectPath) -> Result<RawMemory, RawStatus>;
    fn collect_load(&self, path: CollectPath) -> Result<RawLoad, RawStatus>;
    fn collect_cpu_pressure(&self, path: CollectPath) -> Result<RawPressure, RawStatus>;
    fn collect_memory_pressure(&self, path: CollectPath) -> Result<RawPressure, RawStatus>;
    fn collect_io_pressure(&self, path: CollectPath) -> Result<RawPressure, RawStatus>;
    fn collect_io_stats(&self, path: CollectPath) -> Result<RawIoStats, RawStatus>;
    fn list_partitions(&self, path: CollectPath) -> Result<Vec<RawPartition>, RawStatus>;
    fn collect_disk_usage(&self, path: CollectPath) -> Result<Vec<RawDiskUsage>, RawStatus>;
    fn collect_disk_io(&self, path: CollectPath) -> Result<Vec<RawDiskIo>, RawStatus>;
    fn list_net_interfaces(&self, path: CollectPath) -> Result<Vec<RawNetInterface>, RawStatus>;
    fn collect_net_stats(&self, path: CollectPath) -> Result<Vec<RawNetStats>, RawStatus>;

    // Connection tables, process and sensor data are never cached natively.
    fn collect_tcp_stats(&self) -> Result<RawTcpStats, RawStatus>;
    fn collect_tcp_connections(&self) -> Result<Vec<RawInetSocket>, RawStatus>;
    fn collect_udp_sockets(&self) -> Result<Vec<RawInetSocket>, RawStatus>;
    fn collect_unix_sockets(&self) -> Result<Vec<RawUnixSocket>, RawStatus>;
    fn collect_process(&self, pid: i32) -> Result<RawProcess, RawStatus>;
    fn thermal_is_supported(&self) -> bool;
    fn collect_thermal_zones(&self) -> Result<Vec<RawThermalZone>, RawStatus>;
    fn collect_system_context_switches(&self) -> Result<u64, RawStatus>;
    fn collect_self_context_switches(&self) -> Result<RawContextSwitches, RawStatus>;

    fn cache_enable(&self) -> RawStatus;
    fn cache_enable_with_policy(&self, policy_id: u32) -> RawStatus;
    fn cache_disable(&self) -> RawStatus;
    fn cache_is_enabled(&self) -> bool;
    fn cache_set_ttl(&self, category_id: u8, ttl_ms: u64) -> RawStatus;
    fn cache_invalidate_all(&self) -> RawStatus;
    fn cache_invalidate(&self, category_id: u8) -> RawStatus;
}
