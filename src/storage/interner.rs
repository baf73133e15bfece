use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

/// Default number of distinct strings kept before the cache is reset.
///
/// A typical host has a few dozen devices, mount points and interfaces.
pub const DEFAULT_INTERN_CAPACITY: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternStats {
    pub size: usize,
    pub capacity: usize,
}

/// Thread-safe cache of byte-buffer to string conversions.
///
/// Keys are the xxh3 hash of the buffer contents, never its address, so two
/// identical buffers from different records share one `Arc<str>`. Only values
/// the caller marks as stable are stored. There is no recency tracking: when
/// an insert would exceed capacity the whole map is cleared and rebuilt on
/// demand.
pub struct InternCache {
    strings: RwLock<HashMap<u64, Arc<str>>>,
    capacity: usize,
}

impl InternCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INTERN_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            strings: RwLock::new(HashMap::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Converts `raw` (NUL-terminated or not) to a string.
    ///
    /// With `stable == false` the conversion bypasses the cache entirely.
    /// With `stable == true` equal input bytes return the same `Arc` until
    /// the cache is cleared.
    pub fn intern_or_convert(&self, raw: &[u8], stable: bool) -> Arc<str> {
        if !stable {
            return Arc::from(convert(raw));
        }

        let hash = xxh3_64(raw);
        if let Some(s) = self.strings.read().get(&hash) {
            return Arc::clone(s);
        }

        let value: Arc<str> = Arc::from(convert(raw));

        let mut strings = self.strings.write();
        // Another thread may have inserted while we were converting.
        if let Some(s) = strings.get(&hash) {
            return Arc::clone(s);
        }
        if strings.len() >= self.capacity {
            debug!(
                size = strings.len(),
                capacity = self.capacity,
                "intern cache full, resetting"
            );
            strings.clear();
        }
        strings.insert(hash, Arc::clone(&value));
        value
    }

    pub fn clear(&self) {
        let mut strings = self.strings.write();
        strings.clear();
        strings.shrink_to(self.capacity);
    }

    pub fn stats(&self) -> InternStats {
        InternStats {
            size: self.strings.read().len(),
            capacity: self.capacity,
        }
    }

    /// Returns the number of interned strings.
    pub fn len(&self) -> usize {
        self.strings.read().len()
    }

    /// Returns true if the cache holds no strings.
    pub fn is_empty(&self) -> bool {
        self.strings.read().is_empty()
    }
}

impl Default for InternCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads up to the first NUL; invalid UTF-8 is replaced, never rejected.
fn convert(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
