//! Mark Window System Loader
//!
//! Finds the window system module best suited to this machine and activates it.
//!
//! ## Pipeline
//!
//! 1. **Scan** the configured directory for shared modules ([`scan`])
//! 2. **Probe** each candidate: load, call its probe entry point, unload ([`probe`])
//! 3. **Select** the highest priority, earliest on ties ([`select`])
//! 4. **Activate** the winner: load it again, call its create entry point and
//!    keep the module loaded for as long as the window system lives ([`loader`])
//!
//! A candidate that fails to load or lacks a probe entry point simply scores
//! zero. Only "nothing usable" and activation failures are reported as errors.
//!
//! ```ignore
//! let options = Options::default();
//! let mut loader = WindowSystemLoader::new(&options);
//! let window_system = loader.load_window_system()?;
//! ```

pub mod error;
pub mod handle;
pub mod loader;
pub mod module;
pub mod probe;
pub mod scan;
pub mod select;

#[cfg(test)]
mod testing;

pub use error::{LoaderError, NativeError};
pub use handle::ModuleHandle;
pub use loader::{activate, ActiveWindowSystem, WindowSystemLoader};
pub use module::{EntryPoint, Module, ModuleProvider, NativeModule, NativeProvider};
pub use select::{find_best_module, probe_candidates, select_best, ProbeReport};
