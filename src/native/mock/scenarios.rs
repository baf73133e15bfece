//! Pre-built host scenarios for the mock engine.

use super::probe::{MockCall, MockHost, MockProbe};
use crate::error::StatusCode;
use crate::native::{
    AddressFamily, FixedStr, IFF_LOOPBACK, IFF_UP, ProcessState, RawContextSwitches, RawCpu,
    RawDiskIo, RawDiskUsage, RawInetSocket, RawIoStats, RawLoad, RawMemory, RawNetInterface,
    RawNetStats, RawPartition, RawPressure, RawProcess, RawTcpStats, RawThermalZone,
    RawUnixSocket, SocketState,
};

const GIB: u64 = 1024 * 1024 * 1024;

fn partition(device: &str, mount_point: &str, fs_type: &str, options: &str) -> RawPartition {
    RawPartition {
        device: FixedStr::new(device),
        mount_point: FixedStr::new(mount_point),
        fs_type: FixedStr::new(fs_type),
        options: FixedStr::new(options),
    }
}

fn usage(path: &str, total: u64, used: u64) -> RawDiskUsage {
    RawDiskUsage {
        path: FixedStr::new(path),
        total_bytes: total,
        used_bytes: used,
        free_bytes: total - used,
        used_percent: used as f64 * 100.0 / total as f64,
        inodes_total: 1_000_000,
        inodes_used: 250_000,
        inodes_free: 750_000,
    }
}

fn iface(name: &str, mac: &str, mtu: u32, flags: u32) -> RawNetInterface {
    RawNetInterface {
        name: FixedStr::new(name),
        mac_address: FixedStr::new(mac),
        mtu,
        flags,
    }
}

fn inet(
    family: AddressFamily,
    local: (&str, u16),
    remote: (&str, u16),
    state: SocketState,
    pid: i32,
    process: &str,
    inode: u64,
) -> RawInetSocket {
    RawInetSocket {
        family,
        local_addr: FixedStr::new(local.0),
        local_port: local.1,
        remote_addr: FixedStr::new(remote.0),
        remote_port: remote.1,
        state,
        pid,
        process_name: FixedStr::new(process),
        inode,
        rx_queue: 0,
        tx_queue: 0,
    }
}

fn thermal(
    name: &str,
    label: &str,
    temp: f64,
    max: Option<f64>,
    crit: Option<f64>,
) -> RawThermalZone {
    RawThermalZone {
        name: FixedStr::new(name),
        label: FixedStr::new(label),
        temp_celsius: temp,
        temp_max: max.unwrap_or(0.0),
        temp_crit: crit.unwrap_or(0.0),
        has_max: max.is_some(),
        has_crit: crit.is_some(),
    }
}

/// The test process itself, so collectors asking for their own pid find it.
fn current_process() -> RawProcess {
    RawProcess {
        pid: std::process::id() as i32,
        cpu_percent: 2.5,
        memory_rss_bytes: 48 * 1024 * 1024,
        memory_vms_bytes: 512 * 1024 * 1024,
        memory_percent: 0.3,
        num_threads: 6,
        num_fds: 24,
        state: ProcessState::Running,
    }
}

fn unix(path: &str, socket_type: &str, state: SocketState, pid: i32, process: &str) -> RawUnixSocket {
    RawUnixSocket {
        path: FixedStr::new(path),
        socket_type: FixedStr::new(socket_type),
        state,
        pid,
        process_name: FixedStr::new(process),
        inode: 40_000 + pid as u64,
    }
}

impl MockHost {
    /// A small Linux server: 8 cores, 16 GiB, two disks, loopback plus one
    /// NIC, sshd/postgres/nginx listening and one established SSH session.
    pub fn typical() -> Self {
        use AddressFamily::{Ipv4, Ipv6};
        use SocketState::{Established, Listen};

        Self {
            hostname: FixedStr::new("db-01.example.internal"),
            cpu: RawCpu {
                user_percent: 18.5,
                system_percent: 6.0,
                idle_percent: 72.5,
                iowait_percent: 2.0,
                steal_percent: 1.0,
                cores: 8,
                frequency_mhz: 2400,
            },
            memory: RawMemory {
                total_bytes: 16 * GIB,
                available_bytes: 11 * GIB,
                used_bytes: 5 * GIB,
                cached_bytes: 3 * GIB,
                buffers_bytes: GIB / 2,
                swap_total_bytes: 4 * GIB,
                swap_used_bytes: GIB / 4,
            },
            load: RawLoad {
                load_1min: 0.75,
                load_5min: 0.60,
                load_15min: 0.45,
            },
            cpu_pressure: RawPressure {
                some_avg10: 1.25,
                some_avg60: 0.80,
                some_avg300: 0.40,
                some_total_us: 1_234_567,
                ..Default::default()
            },
            memory_pressure: RawPressure {
                some_avg10: 0.10,
                some_avg60: 0.05,
                some_avg300: 0.01,
                some_total_us: 45_000,
                full_avg10: 0.02,
                full_avg60: 0.01,
                full_avg300: 0.0,
                full_total_us: 9_000,
            },
            io_pressure: RawPressure {
                some_avg10: 3.5,
                some_avg60: 2.0,
                some_avg300: 1.0,
                some_total_us: 8_000_000,
                full_avg10: 1.5,
                full_avg60: 0.9,
                full_avg300: 0.4,
                full_total_us: 3_000_000,
            },
            io_stats: RawIoStats {
                read_ops: 120_000,
                read_bytes: 4 * GIB,
                write_ops: 80_000,
                write_bytes: 2 * GIB,
            },
            partitions: vec![
                partition("/dev/sda1", "/", "ext4", "rw,relatime,errors=remount-ro"),
                partition("/dev/sdb1", "/var/lib/postgresql", "xfs", "rw,noatime"),
            ],
            disk_usage: vec![
                usage("/", 100 * GIB, 42 * GIB),
                usage("/var/lib/postgresql", 500 * GIB, 310 * GIB),
            ],
            disk_io: vec![
                RawDiskIo {
                    device: FixedStr::new("sda"),
                    reads_completed: 90_000,
                    sectors_read: 6_000_000,
                    read_time_ms: 45_000,
                    writes_completed: 50_000,
                    sectors_written: 3_000_000,
                    write_time_ms: 60_000,
                    io_in_progress: 0,
                    io_time_ms: 80_000,
                    weighted_io_time_ms: 105_000,
                },
                RawDiskIo {
                    device: FixedStr::new("sdb"),
                    reads_completed: 30_000,
                    sectors_read: 2_400_000,
                    read_time_ms: 12_000,
                    writes_completed: 30_000,
                    sectors_written: 1_200_000,
                    write_time_ms: 20_000,
                    io_in_progress: 2,
                    io_time_ms: 25_000,
                    weighted_io_time_ms: 32_000,
                },
            ],
            net_interfaces: vec![
                iface("lo", "00:00:00:00:00:00", 65536, IFF_UP | IFF_LOOPBACK),
                iface("eth0", "52:54:00:12:34:56", 1500, IFF_UP),
                iface("eth1", "52:54:00:ab:cd:ef", 1500, 0),
            ],
            net_stats: vec![
                RawNetStats {
                    interface: FixedStr::new("lo"),
                    rx_bytes: 1_000_000,
                    rx_packets: 10_000,
                    tx_bytes: 1_000_000,
                    tx_packets: 10_000,
                    ..Default::default()
                },
                RawNetStats {
                    interface: FixedStr::new("eth0"),
                    rx_bytes: 987_654_321,
                    rx_packets: 1_200_000,
                    rx_errors: 3,
                    rx_drops: 12,
                    tx_bytes: 123_456_789,
                    tx_packets: 800_000,
                    tx_errors: 0,
                    tx_drops: 1,
                },
            ],
            tcp_stats: RawTcpStats {
                established: 1,
                listen: 3,
                ..Default::default()
            },
            tcp_connections: vec![
                inet(Ipv4, ("0.0.0.0", 22), ("0.0.0.0", 0), Listen, 812, "sshd", 20_001),
                inet(Ipv4, ("127.0.0.1", 5432), ("0.0.0.0", 0), Listen, 1024, "postgres", 20_002),
                inet(Ipv6, ("::", 80), ("::", 0), Listen, 1500, "nginx", 20_003),
                inet(
                    Ipv4,
                    ("10.0.0.5", 22),
                    ("10.0.0.9", 51234),
                    Established,
                    4021,
                    "sshd",
                    20_004,
                ),
            ],
            udp_sockets: vec![
                inet(Ipv4, ("127.0.0.53", 53), ("0.0.0.0", 0), SocketState::Close, 600, "systemd-resolve", 20_010),
                inet(Ipv4, ("10.0.0.5", 68), ("0.0.0.0", 0), SocketState::Close, 590, "dhclient", 20_011),
            ],
            unix_sockets: vec![
                unix("/run/systemd/notify", "dgram", SocketState::Unknown, 1, "systemd"),
                unix("/var/run/postgresql/.s.PGSQL.5432", "stream", Listen, 1024, "postgres"),
                unix("", "stream", Established, 1500, "nginx"),
            ],
            processes: vec![
                RawProcess {
                    pid: 1024,
                    cpu_percent: 12.0,
                    memory_rss_bytes: 2 * GIB,
                    memory_vms_bytes: 4 * GIB,
                    memory_percent: 12.5,
                    num_threads: 1,
                    num_fds: 180,
                    state: ProcessState::Sleeping,
                },
                current_process(),
            ],
            thermal_supported: true,
            thermal_zones: vec![
                thermal("thermal_zone0", "x86_pkg_temp", 52.0, None, Some(100.0)),
                thermal("hwmon1", "Core 0", 49.0, Some(84.0), Some(100.0)),
            ],
            context_switches: RawContextSwitches {
                voluntary: 1_200,
                involuntary: 35,
                system_total: 987_654_321,
            },
        }
    }
}

impl MockProbe {
    /// A Linux host with every collector working.
    pub fn typical_host() -> Self {
        Self::new("linux", MockHost::typical())
    }

    /// A host that only reports CPU, memory, load, the hostname and its own
    /// process. Everything else is `NotSupported`, as on platforms without
    /// PSI, procfs, sensors or a socket table.
    pub fn minimal_host() -> Self {
        let host = MockHost {
            thermal_supported: false,
            thermal_zones: Vec::new(),
            partitions: Vec::new(),
            disk_usage: Vec::new(),
            disk_io: Vec::new(),
            net_interfaces: Vec::new(),
            net_stats: Vec::new(),
            tcp_connections: Vec::new(),
            udp_sockets: Vec::new(),
            unix_sockets: Vec::new(),
            ..MockHost::typical()
        };
        let probe = Self::new("darwin", host).without_cache_support();
        for call in [
            MockCall::CpuPressure,
            MockCall::MemoryPressure,
            MockCall::IoPressure,
            MockCall::IoStats,
            MockCall::Partitions,
            MockCall::DiskUsage,
            MockCall::DiskIo,
            MockCall::NetInterfaces,
            MockCall::NetStats,
            MockCall::TcpStats,
            MockCall::TcpConnections,
            MockCall::UdpSockets,
            MockCall::UnixSockets,
            MockCall::SystemContextSwitches,
            MockCall::SelfContextSwitches,
        ] {
            probe.fail(call, StatusCode::NotSupported);
        }
        probe
    }

    /// A Linux host running without privileges: PSI and socket tables are
    /// denied, the rest works.
    pub fn unprivileged_host() -> Self {
        let probe = Self::typical_host();
        for call in [
            MockCall::CpuPressure,
            MockCall::MemoryPressure,
            MockCall::IoPressure,
            MockCall::TcpConnections,
            MockCall::UdpSockets,
            MockCall::UnixSockets,
        ] {
            probe.fail(call, StatusCode::Permission);
        }
        probe
    }
}
