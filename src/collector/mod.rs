//! Snapshot collection on top of the native engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Collector                           │
//! │  ┌──────────────┐  ┌───────────────┐  ┌───────────────────┐  │
//! │  │ cache()      │  │ InternCache   │  │ Pools             │  │
//! │  │ direct or    │  │ stable names  │  │ tcp/udp/unix/     │  │
//! │  │ cached path  │  │ (xxh3 keyed)  │  │ listen/json       │  │
//! │  └──────┬───────┘  └───────┬───────┘  └─────────┬─────────┘  │
//! │         └──────────────────┼────────────────────┘            │
//! │                            │                                 │
//! │                     ┌──────▼──────┐                          │
//! │                     │ NativeProbe │ (trait)                  │
//! │                     └──────┬──────┘                          │
//! └────────────────────────────┼─────────────────────────────────┘
//!                              │
//!                ┌─────────────┴─────────────┐
//!                │                           │
//!         ┌──────▼──────┐             ┌──────▼──────┐
//!         │ native lib  │             │  MockProbe  │
//!         │             │             │ + scenarios │
//!         └─────────────┘             └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use sysprobe::collector::Collector;
//! use sysprobe::config::MetricsConfig;
//! use sysprobe::native::mock::MockProbe;
//!
//! let config = MetricsConfig::default();
//! let collector = Collector::new(Arc::new(MockProbe::typical_host()));
//! collector.init().unwrap();
//! collector.configure(&config).unwrap();
//! let snapshot = collector.collect_all(&config).unwrap();
//! assert!(snapshot.cpu.is_some());
//! assert!(snapshot.hostname.is_some());
//! ```

#[allow(clippy::module_inception)]
mod collector;
mod connections;
mod convert;

pub use collector::{Collector, CollectorTiming};
