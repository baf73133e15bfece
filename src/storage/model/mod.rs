//! Data models for snapshots.
//!
//! - [`system`]: CPU, memory, load, disk, network and I/O records
//! - [`connections`]: socket tables and listening ports
//! - [`host`]: the collecting process, thermal sensors, context switches
//! - [`snapshot`]: the aggregate returned by one collection
//!
//! ```text
//! Snapshot
//!   ├── timestamp, platform, hostname?, collected_at_ns
//!   ├── cpu?  (pressure?)
//!   ├── memory?  (pressure?)
//!   ├── load?
//!   ├── disk?  { partitions?, usage?, io? }
//!   ├── network?  { interfaces?, stats? }
//!   ├── io?  (pressure?)
//!   ├── process?
//!   ├── thermal?  { supported, zones }
//!   ├── context_switches?  { system_total?, self? }
//!   └── connections?  { tcp_stats?, tcp_connections?, udp_sockets?,
//!                       unix_sockets?, listening_ports? }
//! ```

mod connections;
mod host;
mod snapshot;
mod system;

pub use connections::{
    ConnectionsInfo, ListeningPort, TcpConnection, TcpStatsInfo, UdpSocket, UnixSocket,
};
pub use host::{ContextSwitchCounts, ContextSwitchInfo, ProcessInfo, ThermalInfo, ThermalZone};
pub use snapshot::Snapshot;
pub use system::{
    CpuInfo, DiskInfo, DiskIoInfo, DiskUsageInfo, IoInfo, LoadInfo, MemoryInfo, NetInterfaceInfo,
    NetStatsInfo, NetworkInfo, PartitionInfo, PressureInfo,
};
