//! Raw native records to snapshot records.
//!
//! Names that stay constant for the life of a device (device names, mount
//! points, interface names, MACs, socket types, sensor names) and the fixed
//! state and family labels go through the intern cache. Addresses, process
//! names and socket paths change between calls and are converted directly.

use std::sync::Arc;

use crate::native::{
    FixedStr, HOSTNAME_LEN, IFF_LOOPBACK, IFF_UP, RawContextSwitches, RawCpu, RawDiskIo, RawDiskUsage, RawInetSocket,
    RawIoStats, RawLoad, RawMemory, RawNetInterface, RawNetStats, RawPartition, RawPressure,
    RawProcess, RawTcpStats, RawThermalZone, RawUnixSocket, SocketState,
};
use crate::storage::InternCache;
use crate::storage::model::{
    ContextSwitchCounts, CpuInfo, DiskIoInfo, DiskUsageInfo, IoInfo, ListeningPort, LoadInfo,
    MemoryInfo, NetInterfaceInfo, NetStatsInfo, PartitionInfo, PressureInfo, ProcessInfo,
    TcpConnection, TcpStatsInfo, ThermalZone, UdpSocket, UnixSocket,
};

const STABLE: bool = true;
const DYNAMIC: bool = false;

pub(crate) fn cpu(raw: &RawCpu) -> CpuInfo {
    CpuInfo {
        usage_percent: (100.0 - raw.idle_percent).max(0.0),
        user_percent: raw.user_percent,
        system_percent: raw.system_percent,
        iowait_percent: raw.iowait_percent,
        steal_percent: raw.steal_percent,
        cores: raw.cores,
        frequency_mhz: raw.frequency_mhz,
        pressure: None,
    }
}

pub(crate) fn memory(raw: &RawMemory) -> MemoryInfo {
    let used_percent = if raw.total_bytes > 0 {
        raw.used_bytes as f64 * 100.0 / raw.total_bytes as f64
    } else {
        0.0
    };
    MemoryInfo {
        total_bytes: raw.total_bytes,
        available_bytes: raw.available_bytes,
        used_bytes: raw.used_bytes,
        cached_bytes: raw.cached_bytes,
        buffers_bytes: raw.buffers_bytes,
        swap_total_bytes: raw.swap_total_bytes,
        swap_used_bytes: raw.swap_used_bytes,
        used_percent,
        pressure: None,
    }
}

pub(crate) fn load(raw: &RawLoad) -> LoadInfo {
    LoadInfo {
        load_1min: raw.load_1min,
        load_5min: raw.load_5min,
        load_15min: raw.load_15min,
    }
}

/// CPU pressure has no `full` line.
pub(crate) fn pressure_some(raw: &RawPressure) -> PressureInfo {
    PressureInfo {
        some_avg10: raw.some_avg10,
        some_avg60: raw.some_avg60,
        some_avg300: raw.some_avg300,
        some_total_us: raw.some_total_us,
        full_avg10: None,
        full_avg60: None,
        full_avg300: None,
        full_total_us: None,
    }
}

pub(crate) fn pressure_full(raw: &RawPressure) -> PressureInfo {
    PressureInfo {
        full_avg10: Some(raw.full_avg10),
        full_avg60: Some(raw.full_avg60),
        full_avg300: Some(raw.full_avg300),
        full_total_us: Some(raw.full_total_us),
        ..pressure_some(raw)
    }
}

pub(crate) fn io(raw: &RawIoStats) -> IoInfo {
    IoInfo {
        read_ops: raw.read_ops,
        read_bytes: raw.read_bytes,
        write_ops: raw.write_ops,
        write_bytes: raw.write_bytes,
        pressure: None,
    }
}

pub(crate) fn partition(raw: &RawPartition, strings: &InternCache) -> PartitionInfo {
    PartitionInfo {
        device: strings.intern_or_convert(raw.device.as_bytes(), STABLE),
        mount_point: strings.intern_or_convert(raw.mount_point.as_bytes(), STABLE),
        fs_type: strings.intern_or_convert(raw.fs_type.as_bytes(), STABLE),
        options: strings.intern_or_convert(raw.options.as_bytes(), STABLE),
    }
}

pub(crate) fn disk_usage(raw: &RawDiskUsage, strings: &InternCache) -> DiskUsageInfo {
    DiskUsageInfo {
        path: strings.intern_or_convert(raw.path.as_bytes(), STABLE),
        total_bytes: raw.total_bytes,
        used_bytes: raw.used_bytes,
        free_bytes: raw.free_bytes,
        used_percent: raw.used_percent,
        inodes_total: raw.inodes_total,
        inodes_used: raw.inodes_used,
        inodes_free: raw.inodes_free,
    }
}

pub(crate) fn disk_io(raw: &RawDiskIo, strings: &InternCache) -> DiskIoInfo {
    DiskIoInfo {
        device: strings.intern_or_convert(raw.device.as_bytes(), STABLE),
        reads_completed: raw.reads_completed,
        sectors_read: raw.sectors_read,
        read_time_ms: raw.read_time_ms,
        writes_completed: raw.writes_completed,
        sectors_written: raw.sectors_written,
        write_time_ms: raw.write_time_ms,
        io_in_progress: raw.io_in_progress,
        io_time_ms: raw.io_time_ms,
        weighted_io_time_ms: raw.weighted_io_time_ms,
    }
}

pub(crate) fn net_interface(raw: &RawNetInterface, strings: &InternCache) -> NetInterfaceInfo {
    NetInterfaceInfo {
        name: strings.intern_or_convert(raw.name.as_bytes(), STABLE),
        mac_address: strings.intern_or_convert(raw.mac_address.as_bytes(), STABLE),
        mtu: raw.mtu,
        is_up: raw.flags & IFF_UP != 0,
        is_loopback: raw.flags & IFF_LOOPBACK != 0,
    }
}

pub(crate) fn net_stats(raw: &RawNetStats, strings: &InternCache) -> NetStatsInfo {
    NetStatsInfo {
        interface: strings.intern_or_convert(raw.interface.as_bytes(), STABLE),
        bytes_recv: raw.rx_bytes,
        packets_recv: raw.rx_packets,
        errors_in: raw.rx_errors,
        drops_in: raw.rx_drops,
        bytes_sent: raw.tx_bytes,
        packets_sent: raw.tx_packets,
        errors_out: raw.tx_errors,
        drops_out: raw.tx_drops,
    }
}

pub(crate) fn tcp_stats(raw: &RawTcpStats) -> TcpStatsInfo {
    TcpStatsInfo {
        established: raw.established,
        syn_sent: raw.syn_sent,
        syn_recv: raw.syn_recv,
        fin_wait1: raw.fin_wait1,
        fin_wait2: raw.fin_wait2,
        time_wait: raw.time_wait,
        close: raw.close,
        close_wait: raw.close_wait,
        last_ack: raw.last_ack,
        listen: raw.listen,
        closing: raw.closing,
        total: raw.total(),
    }
}

/// Fixed label, shared by every record that carries it.
fn label(strings: &InternCache, s: &'static str) -> Arc<str> {
    strings.intern_or_convert(s.as_bytes(), STABLE)
}

pub(crate) fn tcp_connection(raw: &RawInetSocket, strings: &InternCache) -> TcpConnection {
    TcpConnection {
        family: label(strings, raw.family.name()),
        local_addr: strings.intern_or_convert(raw.local_addr.as_bytes(), DYNAMIC),
        local_port: raw.local_port,
        remote_addr: strings.intern_or_convert(raw.remote_addr.as_bytes(), DYNAMIC),
        remote_port: raw.remote_port,
        state: label(strings, raw.state.name()),
        pid: raw.pid,
        process_name: strings.intern_or_convert(raw.process_name.as_bytes(), DYNAMIC),
        inode: raw.inode,
        rx_queue: raw.rx_queue,
        tx_queue: raw.tx_queue,
    }
}

pub(crate) fn udp_socket(raw: &RawInetSocket, strings: &InternCache) -> UdpSocket {
    UdpSocket {
        family: label(strings, raw.family.name()),
        local_addr: strings.intern_or_convert(raw.local_addr.as_bytes(), DYNAMIC),
        local_port: raw.local_port,
        remote_addr: strings.intern_or_convert(raw.remote_addr.as_bytes(), DYNAMIC),
        remote_port: raw.remote_port,
        state: label(strings, raw.state.name()),
        pid: raw.pid,
        process_name: strings.intern_or_convert(raw.process_name.as_bytes(), DYNAMIC),
        inode: raw.inode,
        rx_queue: raw.rx_queue,
        tx_queue: raw.tx_queue,
    }
}

pub(crate) fn unix_socket(raw: &RawUnixSocket, strings: &InternCache) -> UnixSocket {
    UnixSocket {
        path: strings.intern_or_convert(raw.path.as_bytes(), DYNAMIC),
        socket_type: strings.intern_or_convert(raw.socket_type.as_bytes(), STABLE),
        state: label(strings, raw.state.name()),
        pid: raw.pid,
        process_name: strings.intern_or_convert(raw.process_name.as_bytes(), DYNAMIC),
        inode: raw.inode,
    }
}

/// `None` unless the socket is listening.
pub(crate) fn listening_port(raw: &RawInetSocket, strings: &InternCache) -> Option<ListeningPort> {
    if raw.state != SocketState::Listen {
        return None;
    }
    Some(ListeningPort {
        protocol: label(strings, "tcp"),
        address: strings.intern_or_convert(raw.local_addr.as_bytes(), DYNAMIC),
        port: raw.local_port,
        pid: raw.pid,
        process_name: strings.intern_or_convert(raw.process_name.as_bytes(), DYNAMIC),
    })
}

/// `None` if the host reported an empty name.
pub(crate) fn hostname(raw: &FixedStr<HOSTNAME_LEN>, strings: &InternCache) -> Option<Arc<str>> {
    (!raw.is_empty()).then(|| strings.intern_or_convert(raw.as_bytes(), STABLE))
}

pub(crate) fn process(raw: &RawProcess, strings: &InternCache) -> ProcessInfo {
    ProcessInfo {
        pid: raw.pid,
        cpu_percent: raw.cpu_percent,
        memory_rss_bytes: raw.memory_rss_bytes,
        memory_vms_bytes: raw.memory_vms_bytes,
        memory_percent: raw.memory_percent,
        num_threads: raw.num_threads,
        num_fds: raw.num_fds,
        state: label(strings, raw.state.name()),
    }
}

pub(crate) fn thermal_zone(raw: &RawThermalZone, strings: &InternCache) -> ThermalZone {
    ThermalZone {
        name: strings.intern_or_convert(raw.name.as_bytes(), STABLE),
        label: strings.intern_or_convert(raw.label.as_bytes(), STABLE),
        temp_celsius: raw.temp_celsius,
        temp_max: raw.has_max.then_some(raw.temp_max),
        temp_crit: raw.has_crit.then_some(raw.temp_crit),
    }
}

pub(crate) fn context_switch_counts(raw: &RawContextSwitches) -> ContextSwitchCounts {
    ContextSwitchCounts {
        voluntary: raw.voluntary,
        involuntary: raw.involuntary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{AddressFamily, ProcessState};

    #[test]
    fn test_cpu_usage_from_idle() {
        let raw = RawCpu {
            idle_percent: 72.5,
            cores: 8,
            ..Default::default()
        };
        let info = cpu(&raw);
        assert!((info.usage_percent - 27.5).abs() < 1e-9);
        assert_eq!(info.cores, 8);
    }

    #[test]
    fn test_cpu_usage_never_negative() {
        let raw = RawCpu {
            idle_percent: 100.4,
            ..Default::default()
        };
        assert_eq!(cpu(&raw).usage_percent, 0.0);
    }

    #[test]
    fn test_memory_used_percent() {
        let raw = RawMemory {
            total_bytes: 200,
            used_bytes: 50,
            ..Default::default()
        };
        assert_eq!(memory(&raw).used_percent, 25.0);
        assert_eq!(memory(&RawMemory::default()).used_percent, 0.0);
    }

    #[test]
    fn test_pressure_variants() {
        let raw = RawPressure {
            some_avg10: 1.0,
            full_avg10: 0.5,
            full_total_us: 7,
            ..Default::default()
        };
        assert_eq!(pressure_some(&raw).full_avg10, None);
        let full = pressure_full(&raw);
        assert_eq!(full.some_avg10, 1.0);
        assert_eq!(full.full_avg10, Some(0.5));
        assert_eq!(full.full_total_us, Some(7));
    }

    #[test]
    fn test_stable_names_are_interned() {
        let strings = InternCache::new();
        let raw = RawPartition {
            device: FixedStr::new("/dev/sda1"),
            mount_point: FixedStr::new("/"),
            fs_type: FixedStr::new("ext4"),
            options: FixedStr::new("rw,relatime"),
        };
        let a = partition(&raw, &strings);
        let b = partition(&raw, &strings);
        assert!(Arc::ptr_eq(&a.device, &b.device));
        assert_eq!(&*a.options, "rw,relatime");
        assert_eq!(strings.len(), 4);
    }

    #[test]
    fn test_dynamic_fields_bypass_interning() {
        let strings = InternCache::new();
        let raw = RawInetSocket {
            family: AddressFamily::Ipv6,
            local_addr: FixedStr::new("::1"),
            local_port: 8080,
            state: SocketState::Established,
            process_name: FixedStr::new("envoy"),
            ..Default::default()
        };
        let conn = tcp_connection(&raw, &strings);
        assert_eq!(&*conn.family, "IPv6");
        assert_eq!(&*conn.state, "ESTABLISHED");
        assert_eq!(&*conn.local_addr, "::1");
        // Only the family and state labels are stored.
        assert_eq!(strings.len(), 2);
    }

    #[test]
    fn test_labels_shared_across_records() {
        let strings = InternCache::new();
        let raw = RawInetSocket {
            family: AddressFamily::Ipv4,
            local_addr: FixedStr::new("10.0.0.5"),
            state: SocketState::Listen,
            ..Default::default()
        };
        let a = tcp_connection(&raw, &strings);
        let b = udp_socket(&raw, &strings);
        assert!(Arc::ptr_eq(&a.family, &b.family));
        assert!(Arc::ptr_eq(&a.state, &b.state));

        let p1 = listening_port(&raw, &strings).unwrap();
        let p2 = listening_port(&raw, &strings).unwrap();
        assert!(Arc::ptr_eq(&p1.protocol, &p2.protocol));
        assert!(!Arc::ptr_eq(&p1.address, &p2.address));
        assert_eq!(strings.len(), 3);
    }

    #[test]
    fn test_interface_flags() {
        let strings = InternCache::new();
        let lo = RawNetInterface {
            name: FixedStr::new("lo"),
            flags: IFF_UP | IFF_LOOPBACK,
            ..Default::default()
        };
        let down = RawNetInterface {
            name: FixedStr::new("eth1"),
            flags: 0,
            ..Default::default()
        };
        let lo = net_interface(&lo, &strings);
        assert!(lo.is_up && lo.is_loopback);
        let down = net_interface(&down, &strings);
        assert!(!down.is_up && !down.is_loopback);
    }

    #[test]
    fn test_listening_port_only_for_listen_state() {
        let strings = InternCache::new();
        let mut raw = RawInetSocket {
            local_addr: FixedStr::new("0.0.0.0"),
            local_port: 22,
            state: SocketState::Established,
            process_name: FixedStr::new("sshd"),
            ..Default::default()
        };
        assert!(listening_port(&raw, &strings).is_none());
        raw.state = SocketState::Listen;
        let port = listening_port(&raw, &strings).unwrap();
        assert_eq!(&*port.protocol, "tcp");
        assert_eq!(port.port, 22);
        assert_eq!(&*port.process_name, "sshd");
    }

    #[test]
    fn test_unix_socket_type_is_stable() {
        let strings = InternCache::new();
        let raw = RawUnixSocket {
            path: FixedStr::new("/run/app.sock"),
            socket_type: FixedStr::new("stream"),
            ..Default::default()
        };
        let s = unix_socket(&raw, &strings);
        assert_eq!(&*s.socket_type, "stream");
        assert_eq!(&*s.state, "UNKNOWN");
        // "stream" and "UNKNOWN"; the path is not stored.
        assert_eq!(strings.len(), 2);
    }

    #[test]
    fn test_empty_hostname_is_absent() {
        let strings = InternCache::new();
        assert_eq!(hostname(&FixedStr::default(), &strings), None);
        let name = hostname(&FixedStr::new("db-01"), &strings).unwrap();
        assert_eq!(&*name, "db-01");
    }

    #[test]
    fn test_process_state_label() {
        let strings = InternCache::new();
        let raw = RawProcess {
            pid: 42,
            num_threads: 3,
            state: ProcessState::Sleeping,
            ..Default::default()
        };
        let a = process(&raw, &strings);
        let b = process(&raw, &strings);
        assert_eq!(a.pid, 42);
        assert_eq!(&*a.state, "sleeping");
        assert!(Arc::ptr_eq(&a.state, &b.state));
    }

    #[test]
    fn test_thermal_limits_only_when_reported() {
        let strings = InternCache::new();
        let mut raw = RawThermalZone {
            name: FixedStr::new("thermal_zone0"),
            label: FixedStr::new("x86_pkg_temp"),
            temp_celsius: 48.0,
            temp_max: 90.0,
            temp_crit: 105.0,
            has_max: false,
            has_crit: true,
        };
        let zone = thermal_zone(&raw, &strings);
        assert_eq!(&*zone.label, "x86_pkg_temp");
        assert_eq!(zone.temp_max, None);
        assert_eq!(zone.temp_crit, Some(105.0));

        raw.has_crit = false;
        assert_eq!(thermal_zone(&raw, &strings).temp_crit, None);
    }
}
