//! Socket tables assembled in pooled buffers.
//!
//! Each table is built in a container borrowed from its pool, copied into an
//! owned `Vec` sized exactly for the caller, and the container is returned.
//! The pooled storage never escapes this module.

use super::convert;
use crate::native::{RawInetSocket, RawUnixSocket};
use crate::storage::model::{ListeningPort, TcpConnection, UdpSocket, UnixSocket};
use crate::storage::{BoundedPool, InternCache, Pools};

fn assemble<R, T: Clone>(
    pool: &BoundedPool<T>,
    raw: &[R],
    map: impl FnMut(&R) -> Option<T>,
) -> Vec<T> {
    let mut buf = pool.acquire();
    buf.extend(raw.iter().filter_map(map));
    let owned = buf.to_vec();
    pool.release(buf);
    owned
}

pub(crate) fn tcp_connections(
    pools: &Pools,
    strings: &InternCache,
    raw: &[RawInetSocket],
) -> Vec<TcpConnection> {
    assemble(&pools.tcp, raw, |r| {
        Some(convert::tcp_connection(r, strings))
    })
}

pub(crate) fn udp_sockets(
    pools: &Pools,
    strings: &InternCache,
    raw: &[RawInetSocket],
) -> Vec<UdpSocket> {
    assemble(&pools.udp, raw, |r| Some(convert::udp_socket(r, strings)))
}

pub(crate) fn unix_sockets(
    pools: &Pools,
    strings: &InternCache,
    raw: &[RawUnixSocket],
) -> Vec<UnixSocket> {
    assemble(&pools.unix, raw, |r| Some(convert::unix_socket(r, strings)))
}

/// TCP sockets in `LISTEN` state.
pub(crate) fn listening_ports(
    pools: &Pools,
    strings: &InternCache,
    raw: &[RawInetSocket],
) -> Vec<ListeningPort> {
    assemble(&pools.listen, raw, |r| convert::listening_port(r, strings))
}
