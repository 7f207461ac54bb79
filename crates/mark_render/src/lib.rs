//! Mark Render
//!
//! Rendering-side contracts shared by the host and window system modules:
//! - [`WindowSystem`], the capability every window system module provides
//! - The native entry points a module exports (see [`window_system`])
//! - GPU context creation and one-shot command helpers

pub mod backend;
pub mod copy;
pub mod gpu;
pub mod one_time_commands;
pub mod window;
pub mod window_system;

pub use copy::copy_buffer;
pub use gpu::{GpuContext, GpuError};
pub use one_time_commands::OneTimeCommands;
pub use window_system::{WindowSystem, WindowSystemError};

pub use mark_core;
pub use wgpu;
pub use winit;
