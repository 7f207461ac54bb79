//! Mark Core
//!
//! Shared pieces of the benchmark host:
//! - Version information
//! - Options (configuration layer)

pub mod options;

pub use options::{Options, OptionsError, PresentMode};

/// Benchmark version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
