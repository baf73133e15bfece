//! Bounded pools for the transient containers used while assembling a snapshot.
//!
//! Each record kind has its own pool because typical cardinalities differ by
//! an order of magnitude (established TCP connections versus listening ports).
//! A container released with a capacity above the pool's ceiling is dropped
//! so one unusually large collection cannot pin memory. The number of idle
//! containers is capped as well, so a burst of concurrent borrowers does not
//! leave the free list at its high-water mark.

use super::model::{ListeningPort, TcpConnection, UdpSocket, UnixSocket};
use parking_lot::Mutex;
use tracing::debug;

pub const DEFAULT_TCP_CAPACITY: usize = 256;
pub const MAX_TCP_CAPACITY: usize = 1024;
pub const DEFAULT_UDP_CAPACITY: usize = 64;
pub const DEFAULT_UNIX_CAPACITY: usize = 64;
pub const DEFAULT_LISTEN_CAPACITY: usize = 64;
/// Ceiling shared by the UDP, Unix-socket and listening-port pools.
pub const MAX_GENERIC_CAPACITY: usize = 512;
pub const DEFAULT_JSON_BUFFER_SIZE: usize = 16 * 1024;
pub const MAX_JSON_BUFFER_SIZE: usize = 1024 * 1024;
/// Idle containers kept per record pool.
pub const DEFAULT_MAX_IDLE: usize = 16;
/// Idle JSON buffers kept; at the ceiling this retains at most 4 MiB.
pub const MAX_IDLE_JSON_BUFFERS: usize = 4;

/// Free list of `Vec<T>` with a per-pool default capacity, capacity ceiling
/// and idle limit.
pub struct BoundedPool<T> {
    name: &'static str,
    free: Mutex<Vec<Vec<T>>>,
    default_capacity: usize,
    max_capacity: usize,
    max_idle: usize,
}

impl<T> BoundedPool<T> {
    pub fn new(name: &'static str, default_capacity: usize, max_capacity: usize) -> Self {
        Self {
            name,
            free: Mutex::new(Vec::new()),
            default_capacity,
            max_capacity,
            max_idle: DEFAULT_MAX_IDLE,
        }
    }

    /// Caps how many released containers are kept at rest.
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Hands out an empty container. Never blocks on allocation; a fresh one
    /// is created when the pool is empty.
    pub fn acquire(&self) -> Vec<T> {
        let recycled = self.free.lock().pop();
        match recycled {
            Some(mut v) => {
                v.clear();
                v
            }
            None => Vec::with_capacity(self.default_capacity),
        }
    }

    /// Returns a container to the pool, or drops it if it grew past the
    /// ceiling or the pool already holds `max_idle` containers.
    pub fn release(&self, mut container: Vec<T>) {
        let capacity = container.capacity();
        if capacity > self.max_capacity {
            debug!(
                pool = self.name,
                capacity,
                max = self.max_capacity,
                "dropping oversized container"
            );
            return;
        }
        container.clear();
        let mut free = self.free.lock();
        if free.len() >= self.max_idle {
            debug!(pool = self.name, idle = free.len(), "pool full, dropping container");
            return;
        }
        free.push(container);
    }

    /// Containers currently at rest in the pool.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    pub fn default_capacity(&self) -> usize {
        self.default_capacity
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn max_idle(&self) -> usize {
        self.max_idle
    }
}

/// One pool per record kind plus the JSON output buffer.
pub struct Pools {
    pub tcp: BoundedPool<TcpConnection>,
    pub udp: BoundedPool<UdpSocket>,
    pub unix: BoundedPool<UnixSocket>,
    pub listen: BoundedPool<ListeningPort>,
    pub json: BoundedPool<u8>,
}

impl Pools {
    pub fn new() -> Self {
        Self {
            tcp: BoundedPool::new("tcp", DEFAULT_TCP_CAPACITY, MAX_TCP_CAPACITY),
            udp: BoundedPool::new("udp", DEFAULT_UDP_CAPACITY, MAX_GENERIC_CAPACITY),
            unix: BoundedPool::new("unix", DEFAULT_UNIX_CAPACITY, MAX_GENERIC_CAPACITY),
            listen: BoundedPool::new("listen", DEFAULT_LISTEN_CAPACITY, MAX_GENERIC_CAPACITY),
            json: BoundedPool::new("json", DEFAULT_JSON_BUFFER_SIZE, MAX_JSON_BUFFER_SIZE)
                .with_max_idle(MAX_IDLE_JSON_BUFFERS),
        }
    }
}

impl Default for Pools {
    fn default() -> Self {
        Self::new()
    }
}
