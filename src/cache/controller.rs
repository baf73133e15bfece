//! Control plane for the native snapshot cache.

use super::policy::{CachePolicy, MetricCategory};
use crate::error::ProbeError;
use crate::native::NativeProbe;
use std::sync::Arc;
use std::time::Duration;

/// Stateless proxy over the native cache controls.
///
/// All cache state lives in the native engine; this type only marshals
/// arguments and translates status codes. Cloning is cheap and every clone
/// controls the same native cache.
pub struct CacheController<N: NativeProbe> {
    native: Arc<N>,
}

impl<N: NativeProbe> Clone for CacheController<N> {
    fn clone(&self) -> Self {
        Self {
            native: Arc::clone(&self.native),
        }
    }
}

impl<N: NativeProbe> CacheController<N> {
    pub fn new(native: Arc<N>) -> Self {
        Self { native }
    }

    /// Enables caching with the default preset. A no-op if already enabled.
    pub fn enable(&self) -> Result<(), ProbeError> {
        ProbeError::from_raw_status(self.native.cache_enable())
    }

    /// Enables caching and applies `policy` to every category at once.
    pub fn enable_with_policy(&self, policy: CachePolicy) -> Result<(), ProbeError> {
        ProbeError::from_raw_status(self.native.cache_enable_with_policy(policy.id()))
    }

    pub fn disable(&self) -> Result<(), ProbeError> {
        ProbeError::from_raw_status(self.native.cache_disable())
    }

    /// Read-only; safe to call before `enable`.
    pub fn is_enabled(&self) -> bool {
        self.native.cache_is_enabled()
    }

    /// Overrides one category's TTL. Zero means never serve it from cache.
    ///
    /// Fails with `NotSupported` while caching is disabled; the setting is
    /// not remembered for a later `enable`.
    pub fn set_ttl(&self, category: MetricCategory, ttl: Duration) -> Result<(), ProbeError> {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        ProbeError::from_raw_status(self.native.cache_set_ttl(category.id(), ttl_ms))
    }

    pub fn invalidate_all(&self) -> Result<(), ProbeError> {
        ProbeError::from_raw_status(self.native.cache_invalidate_all())
    }

    pub fn invalidate(&self, category: MetricCategory) -> Result<(), ProbeError> {
        ProbeError::from_raw_status(self.native.cache_invalidate(category.id()))
    }
}
