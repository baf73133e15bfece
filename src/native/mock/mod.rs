//! Mock native engine for testing.
//!
//! This module provides `MockProbe` and pre-built host scenarios for testing
//! the adapter without the native collection library.

mod probe;
mod scenarios;

pub use probe::{MockCall, MockHost, MockProbe};
