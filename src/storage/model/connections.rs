//! Socket table records.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// TCP connection counts per state.
///
/// Source: `/proc/net/tcp`, `/proc/net/tcp6`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct TcpStatsInfo {
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
    pub total: u32,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct TcpConnection {
    /// "IPv4" or "IPv6".
    pub family: Arc<str>,
    pub local_addr: Arc<str>,
    pub local_port: u16,
    pub remote_addr: Arc<str>,
    pub remote_port: u16,
    /// Kernel state name, e.g. "ESTABLISHED".
    pub state: Arc<str>,
    pub pid: i32,
    pub process_name: Arc<str>,
    pub inode: u64,
    pub rx_queue: u32,
    pub tx_queue: u32,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct UdpSocket {
    pub family: Arc<str>,
    pub local_addr: Arc<str>,
    pub local_port: u16,
    pub remote_addr: Arc<str>,
    pub remote_port: u16,
    pub state: Arc<str>,
    pub pid: i32,
    pub process_name: Arc<str>,
    pub inode: u64,
    pub rx_queue: u32,
    pub tx_queue: u32,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct UnixSocket {
    /// Empty for unnamed sockets.
    pub path: Arc<str>,
    pub socket_type: Arc<str>,
    pub state: Arc<str>,
    pub pid: i32,
    pub process_name: Arc<str>,
    pub inode: u64,
}

/// A socket accepting connections.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct ListeningPort {
    /// Always "tcp" at the moment.
    pub protocol: Arc<str>,
    pub address: Arc<str>,
    pub port: u16,
    pub pid: i32,
    pub process_name: Arc<str>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ConnectionsInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_stats: Option<TcpStatsInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_connections: Option<Vec<TcpConnection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_sockets: Option<Vec<UdpSocket>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unix_sockets: Option<Vec<UnixSocket>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listening_ports: Option<Vec<ListeningPort>>,
}

impl ConnectionsInfo {
    pub fn is_empty(&self) -> bool {
        self.tcp_stats.is_none()
            && self.tcp_connections.is_none()
            && self.udp_sockets.is_none()
            && self.unix_sockets.is_none()
            && self.listening_ports.is_none()
    }
}
