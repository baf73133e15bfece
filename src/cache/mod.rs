//! TTL cache control.
//!
//! The native engine keeps a short-lived snapshot per metric category and
//! serves repeated collections from it while the entry is younger than the
//! category's TTL. This module names the categories, defines the policy
//! presets, and exposes [`CacheController`] to drive the native cache.

mod controller;
mod policy;

pub use controller::CacheController;
pub use policy::{CachePolicies, CachePolicy, MetricCategory};
