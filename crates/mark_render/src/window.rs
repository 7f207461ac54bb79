//! Window creation helpers
//!
//! Shared by window system modules that open a native window through winit.

use mark_core::Options;
use winit::window::Window;

pub const DEFAULT_TITLE: &str = "mark";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
        }
    }
}

impl WindowConfig {
    /// Build from the host options. Recognised window system options are
    /// `title` and `fullscreen` (`true`/`false`).
    pub fn from_options(options: &Options) -> Self {
        Self {
            title: options
                .window_system_option("title")
                .unwrap_or(DEFAULT_TITLE)
                .to_string(),
            width: options.width,
            height: options.height,
            fullscreen: options.window_system_option("fullscreen") == Some("true"),
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> winit::window::WindowAttributes {
    let attributes = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
        .with_resizable(false);

    if config.fullscreen {
        attributes.with_fullscreen(Some(winit::window::Fullscreen::Borderless(None)))
    } else {
        attributes
    }
}
