pub mod interner;
pub mod model;
pub mod pool;

pub use interner::{InternCache, InternStats};
pub use model::Snapshot;
pub use pool::{BoundedPool, Pools};
