//! sysprobe - high-frequency system metrics on top of a native collection engine.
//!
//! The native engine does the OS work; this library keeps frequent snapshots
//! cheap:
//! - [`cache`] drives the engine's per-category TTL cache
//! - [`storage::interner`] shares strings for stable names across snapshots
//! - [`storage::pool`] recycles the buffers used to assemble each snapshot
//! - [`collector`] ties them together into `collect_all`

pub mod cache;
pub mod collector;
pub mod config;
pub mod error;
pub mod native;
pub mod storage;

pub use cache::{CacheController, CachePolicy, MetricCategory};
pub use collector::{Collector, CollectorTiming};
pub use config::MetricsConfig;
pub use error::{ProbeError, StatusCode};
pub use native::{NativeProbe, RawStatus};
pub use storage::Snapshot;
