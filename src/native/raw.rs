//! Records exactly as the native engine hands them over.
//!
//! Text fields are fixed-size, NUL-padded byte buffers. Nothing here is
//! converted yet; that happens in `collector::convert` through the intern cache.

pub const MAX_PATH_LEN: usize = 256;
pub const FS_TYPE_LEN: usize = 64;
pub const DEVICE_LEN: usize = 64;
pub const IFACE_NAME_LEN: usize = 64;
pub const MAC_LEN: usize = 18;
pub const ADDR_LEN: usize = 46;
pub const PROCESS_NAME_LEN: usize = 64;
pub const SOCKET_TYPE_LEN: usize = 16;
pub const HOSTNAME_LEN: usize = 256;
pub const THERMAL_NAME_LEN: usize = 64;
/// Upper bound on zones returned by one thermal collection.
pub const MAX_THERMAL_ZONES: usize = 32;

/// Interface flag bits as reported by the kernel.
pub const IFF_UP: u32 = 0x1;
pub const IFF_LOOPBACK: u32 = 0x8;

/// Fixed-size, NUL-padded text buffer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FixedStr<const N: usize>(pub [u8; N]);

impl<const N: usize> FixedStr<N> {
    /// Copies `s` into a zeroed buffer, truncating so that at least one
    /// trailing NUL remains.
    pub fn new(s: &str) -> Self {
        let mut buf = [0u8; N];
        let len = s.len().min(N.saturating_sub(1));
        buf[..len].copy_from_slice(&s.as_bytes()[..len]);
        Self(buf)
    }

    /// Whole buffer including padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Bytes up to the first NUL.
    pub fn trimmed(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(N);
        &self.0[..end]
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> std::fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.trimmed()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawCpu {
    pub user_percent: f64,
    pub system_percent: f64,
    pub idle_percent: f64,
    pub iowait_percent: f64,
    pub steal_percent: f64,
    pub cores: u32,
    pub frequency_mhz: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawMemory {
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_bytes: u64,
    pub cached_bytes: u64,
    pub buffers_bytes: u64,
    pub swap_total_bytes: u64,
    pub swap_used_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawLoad {
    pub load_1min: f64,
    pub load_5min: f64,
    pub load_15min: f64,
}

/// PSI line. `full_*` is always zero for CPU.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawPressure {
    pub some_avg10: f64,
    pub some_avg60: f64,
    pub some_avg300: f64,
    pub some_total_us: u64,
    pub full_avg10: f64,
    pub full_avg60: f64,
    pub full_avg300: f64,
    pub full_total_us: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawIoStats {
    pub read_ops: u64,
    pub read_bytes: u64,
    pub write_ops: u64,
    pub write_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawPartition {
    pub device: FixedStr<MAX_PATH_LEN>,
    pub mount_point: FixedStr<MAX_PATH_LEN>,
    pub fs_type: FixedStr<FS_TYPE_LEN>,
    /// Comma-joined mount options.
    pub options: FixedStr<MAX_PATH_LEN>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawDiskUsage {
    pub path: FixedStr<MAX_PATH_LEN>,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub used_percent: f64,
    pub inodes_total: u64,
    pub inodes_used: u64,
    pub inodes_free: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawDiskIo {
    pub device: FixedStr<DEVICE_LEN>,
    pub reads_completed: u64,
    pub sectors_read: u64,
    pub read_time_ms: u64,
    pub writes_completed: u64,
    pub sectors_written: u64,
    pub write_time_ms: u64,
    pub io_in_progress: u64,
    pub io_time_ms: u64,
    pub weighted_io_time_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawNetInterface {
    pub name: FixedStr<IFACE_NAME_LEN>,
    pub mac_address: FixedStr<MAC_LEN>,
    pub mtu: u32,
    /// `IFF_*` bits.
    pub flags: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawNetStats {
    pub interface: FixedStr<IFACE_NAME_LEN>,
    pub rx_bytes: u64,
    pub rx_packets: u64,
    pub rx_errors: u64,
    pub rx_drops: u64,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errors: u64,
    pub tx_drops: u64,
}

/// Socket state as numbered by the native engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SocketState {
    #[default]
    Unknown = 0,
    Established = 1,
    SynSent = 2,
    SynRecv = 3,
    FinWait1 = 4,
    FinWait2 = 5,
    TimeWait = 6,
    Close = 7,
    CloseWait = 8,
    LastAck = 9,
    Listen = 10,
    Closing = 11,
}

impl SocketState {
    pub fn name(self) -> &'static str {
        match self {
            SocketState::Unknown => "UNKNOWN",
            SocketState::Established => "ESTABLISHED",
            SocketState::SynSent => "SYN_SENT",
            SocketState::SynRecv => "SYN_RECV",
            SocketState::FinWait1 => "FIN_WAIT1",
            SocketState::FinWait2 => "FIN_WAIT2",
            SocketState::TimeWait => "TIME_WAIT",
            SocketState::Close => "CLOSE",
            SocketState::CloseWait => "CLOSE_WAIT",
            SocketState::LastAck => "LAST_ACK",
            SocketState::Listen => "LISTEN",
            SocketState::Closing => "CLOSING",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AddressFamily {
    #[default]
    Ipv4 = 4,
    Ipv6 = 6,
}

impl AddressFamily {
    pub fn name(self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "IPv4",
            AddressFamily::Ipv6 => "IPv6",
        }
    }
}

/// TCP and UDP sockets share one layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawInetSocket {
    pub family: AddressFamily,
    pub local_addr: FixedStr<ADDR_LEN>,
    pub local_port: u16,
    pub remote_addr: FixedStr<ADDR_LEN>,
    pub remote_port: u16,
    pub state: SocketState,
    pub pid: i32,
    pub process_name: FixedStr<PROCESS_NAME_LEN>,
    pub inode: u64,
    pub rx_queue: u32,
    pub tx_queue: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawUnixSocket {
    pub path: FixedStr<MAX_PATH_LEN>,
    /// "stream", "dgram" or "seqpacket".
    pub socket_type: FixedStr<SOCKET_TYPE_LEN>,
    pub state: SocketState,
    pub pid: i32,
    pub process_name: FixedStr<PROCESS_NAME_LEN>,
    pub inode: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTcpStats {
    pub established: u32,
    pub syn_sent: u32,
    pub syn_recv: u32,
    pub fin_wait1: u32,
    pub fin_wait2: u32,
    pub time_wait: u32,
    pub close: u32,
    pub close_wait: u32,
    pub last_ack: u32,
    pub listen: u32,
    pub closing: u32,
}

impl RawTcpStats {
    /// Sum over every state, saturating.
    pub fn total(&self) -> u32 {
        [
            self.established,
            self.syn_sent,
            self.syn_recv,
            self.fin_wait1,
            self.fin_wait2,
            self.time_wait,
            self.close,
            self.close_wait,
            self.last_ack,
            self.listen,
            self.closing,
        ]
        .iter()
        .fold(0u32, |acc, v| acc.saturating_add(*v))
    }
}

/// Scheduler state of a process as numbered by the native engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProcessState {
    Running = 0,
    Sleeping = 1,
    Waiting = 2,
    Zombie = 3,
    Stopped = 4,
    #[default]
    Unknown = 255,
}

impl ProcessState {
    pub fn name(self) -> &'static str {
        match self {
            ProcessState::Running => "running",
            ProcessState::Sleeping => "sleeping",
            ProcessState::Waiting => "waiting",
            ProcessState::Zombie => "zombie",
            ProcessState::Stopped => "stopped",
            ProcessState::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawProcess {
    pub pid: i32,
    pub cpu_percent: f64,
    pub memory_rss_bytes: u64,
    pub memory_vms_bytes: u64,
    pub memory_percent: f64,
    pub num_threads: u32,
    pub num_fds: u32,
    pub state: ProcessState,
}

/// Thresholds are only meaningful when the matching `has_*` flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawThermalZone {
    pub name: FixedStr<THERMAL_NAME_LEN>,
    pub label: FixedStr<THERMAL_NAME_LEN>,
    pub temp_celsius: f64,
    pub temp_max: f64,
    pub temp_crit: f64,
    pub has_max: bool,
    pub has_crit: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawContextSwitches {
    pub voluntary: u64,
    pub involuntary: u64,
    pub system_total: u64,
}
