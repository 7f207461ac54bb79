//! Window system capability and module entry points
//!
//! A window system lives in its own shared library and exports two C-ABI
//! symbols:
//!
//! | symbol                      | signature                                   | required |
//! |-----------------------------|---------------------------------------------|----------|
//! | `mark_window_system_probe`  | `fn() -> c_int`                              | no       |
//! | `mark_window_system_create` | `fn(*const Options) -> *mut BoxedWindowSystem` | yes    |
//!
//! The probe reports how well the module can run on this machine: `0` means it
//! cannot run, larger values are preferred. Create returns a pointer obtained
//! from `Box::into_raw`, or null on failure; ownership passes to the host.
//!
//! A null result carries no reason. Each module links its own copy of
//! `tracing` with no subscriber installed, so the construction error logged by
//! the export helper is not visible to the host, which only sees
//! `CreateFailed`. Run the module's `create` directly to diagnose it.
//!
//! Trait objects cross the library boundary, so a module must be built with
//! the same toolchain and `mark_render` version as the host. Use
//! [`export_window_system!`](crate::export_window_system) rather than writing
//! the entry points by hand.

use crate::GpuContext;
use mark_core::Options;
use std::os::raw::c_int;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use thiserror::Error;

pub const PROBE_SYMBOL: &str = "mark_window_system_probe";
pub const CREATE_SYMBOL: &str = "mark_window_system_create";

pub type BoxedWindowSystem = Box<dyn WindowSystem>;

/// Signature of [`PROBE_SYMBOL`].
pub type ProbeFn = unsafe extern "C" fn() -> c_int;

/// Signature of [`CREATE_SYMBOL`].
#[allow(improper_ctypes_definitions)]
pub type CreateFn = unsafe extern "C" fn(options: *const Options) -> *mut BoxedWindowSystem;

#[derive(Debug, Error)]
pub enum WindowSystemError {
    #[error("window system used before init_gpu")]
    NotInitialized,

    #[error("failed to create window: {0}")]
    Window(String),

    #[error("failed to create surface")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,

    #[error("failed to acquire frame")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("invalid window system option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },
}

/// Presentation target driven by the benchmark loop.
pub trait WindowSystem {
    fn name(&self) -> &str;

    /// Create GPU resources (surfaces, offscreen images) for `gpu`.
    fn init_gpu(&mut self, gpu: &GpuContext) -> Result<(), WindowSystemError>;

    /// Release everything created by `init_gpu`.
    fn deinit_gpu(&mut self);

    fn format(&self) -> wgpu::TextureFormat;

    fn size(&self) -> (u32, u32);

    /// Acquire the next image to render into.
    fn next_frame(&mut self, gpu: &GpuContext) -> Result<wgpu::TextureView, WindowSystemError>;

    /// Present the image returned by the last `next_frame`.
    fn present_frame(&mut self, gpu: &GpuContext);

    fn should_quit(&self) -> bool;
}

#[doc(hidden)]
pub fn export_probe(probe: fn() -> i32) -> c_int {
    catch_unwind(probe).unwrap_or_else(|_| {
        tracing::error!("window system probe panicked");
        0
    })
}

/// # Safety
///
/// `options` must be null or point to an `Options` that stays valid for the
/// duration of the call.
#[doc(hidden)]
pub unsafe fn export_create<W>(
    options: *const Options,
    create: fn(&Options) -> Result<W, WindowSystemError>,
) -> *mut BoxedWindowSystem
where
    W: WindowSystem + 'static,
{
    // SAFETY: guaranteed by the caller
    let Some(options) = (unsafe { options.as_ref() }) else {
        return ptr::null_mut();
    };

    match catch_unwind(AssertUnwindSafe(|| create(options))) {
        Ok(Ok(window_system)) => {
            let boxed: BoxedWindowSystem = Box::new(window_system);
            Box::into_raw(Box::new(boxed))
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "window system construction failed");
            ptr::null_mut()
        }
        Err(_) => {
            tracing::error!("window system construction panicked");
            ptr::null_mut()
        }
    }
}

/// Export the probe and create entry points of a window system module.
///
/// ```ignore
/// fn probe() -> i32 { 1 }
/// fn create(options: &Options) -> Result<MyWindowSystem, WindowSystemError> { ... }
///
/// mark_render::export_window_system!(probe: probe, create: create);
/// ```
#[macro_export]
macro_rules! export_window_system {
    (probe: $probe:path, create: $create:path $(,)?) => {
        #[no_mangle]
        pub extern "C" fn mark_window_system_probe() -> ::std::os::raw::c_int {
            $crate::window_system::export_probe($probe)
        }

        /// # Safety
        ///
        /// `options` must be null or point to a live `Options`.
        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub unsafe extern "C" fn mark_window_system_create(
            options: *const $crate::mark_core::Options,
        ) -> *mut $crate::window_system::BoxedWindowSystem {
            unsafe { $crate::window_system::export_create(options, $create) }
        }
    };
}
