//! Native window system via winit
//!
//! Opens a window and presents through a wgpu surface. Events are pumped from
//! the benchmark loop instead of handing control to winit's `run_app`.
//!
//! Window system options:
//! - `title`: window title
//! - `fullscreen`: `true` for a borderless fullscreen window

use mark_render::backend::choose_present_mode;
use mark_render::mark_core::{Options, PresentMode};
use mark_render::wgpu;
use mark_render::window::{window_attributes, WindowConfig};
use mark_render::{GpuContext, WindowSystem, WindowSystemError};
use std::sync::Arc;
use std::time::Duration;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes, WindowId},
};

/// Preferred over the headless window system whenever a display is present
pub const PRIORITY: i32 = 2;

/// Event pumps to wait for the initial window
const CREATE_ATTEMPTS: usize = 100;

struct WindowApp {
    attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    error: Option<String>,
    quit: bool,
}

impl ApplicationHandler for WindowApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                self.error = Some(e.to_string());
                self.quit = true;
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.quit = true,
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.quit = true,
            _ => {}
        }
    }
}

pub struct WinitWindowSystem {
    // Surface first: it must drop before the window it presents to
    surface: Option<wgpu::Surface<'static>>,
    surface_config: Option<wgpu::SurfaceConfiguration>,
    frame: Option<wgpu::SurfaceTexture>,
    app: WindowApp,
    event_loop: EventLoop<()>,
    config: WindowConfig,
    present_mode: PresentMode,
    frames: u32,
    presented: u32,
}

impl WinitWindowSystem {
    pub fn new(options: &Options) -> Result<Self, WindowSystemError> {
        let config = WindowConfig::from_options(options);
        let event_loop = EventLoop::new().map_err(|e| WindowSystemError::Window(e.to_string()))?;

        let mut window_system = Self {
            surface: None,
            surface_config: None,
            frame: None,
            app: WindowApp {
                attributes: window_attributes(&config),
                window: None,
                error: None,
                quit: false,
            },
            event_loop,
            config,
            present_mode: options.present_mode,
            frames: options.frames,
            presented: 0,
        };

        for _ in 0..CREATE_ATTEMPTS {
            window_system.pump_events();
            if window_system.app.window.is_some() || window_system.app.error.is_some() {
                break;
            }
        }

        if let Some(error) = window_system.app.error.take() {
            return Err(WindowSystemError::Window(error));
        }
        if window_system.app.window.is_none() {
            return Err(WindowSystemError::Window("window was never created".to_string()));
        }

        tracing::debug!(title = %window_system.config.title, "window created");
        Ok(window_system)
    }

    fn pump_events(&mut self) {
        if let PumpStatus::Exit(_) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app)
        {
            self.app.quit = true;
        }
    }

    fn configure(&self, gpu: &GpuContext) {
        if let (Some(surface), Some(config)) = (&self.surface, &self.surface_config) {
            surface.configure(&gpu.device, config);
        }
    }
}

impl WindowSystem for WinitWindowSystem {
    fn name(&self) -> &str {
        "winit"
    }

    fn init_gpu(&mut self, gpu: &GpuContext) -> Result<(), WindowSystemError> {
        let window = self.app.window.clone().ok_or(WindowSystemError::NotInitialized)?;
        let size = window.inner_size();

        let surface = gpu.instance.create_surface(window)?;
        let caps = surface.get_capabilities(&gpu.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(WindowSystemError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: choose_present_mode(self.present_mode, &caps.present_modes),
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        self.surface = Some(surface);
        self.surface_config = Some(config);
        self.configure(gpu);
        Ok(())
    }

    fn deinit_gpu(&mut self) {
        self.frame = None;
        self.surface = None;
        self.surface_config = None;
    }

    fn format(&self) -> wgpu::TextureFormat {
        self.surface_config
            .as_ref()
            .map_or(wgpu::TextureFormat::Bgra8UnormSrgb, |config| config.format)
    }

    fn size(&self) -> (u32, u32) {
        self.surface_config
            .as_ref()
            .map_or((self.config.width, self.config.height), |config| {
                (config.width, config.height)
            })
    }

    fn next_frame(&mut self, gpu: &GpuContext) -> Result<wgpu::TextureView, WindowSystemError> {
        self.pump_events();

        let surface = self.surface.as_ref().ok_or(WindowSystemError::NotInitialized)?;
        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                self.configure(gpu);
                self.surface
                    .as_ref()
                    .ok_or(WindowSystemError::NotInitialized)?
                    .get_current_texture()?
            }
            Err(e) => return Err(e.into()),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.frame = Some(frame);
        Ok(view)
    }

    fn present_frame(&mut self, _gpu: &GpuContext) {
        if let Some(frame) = self.frame.take() {
            if let Some(window) = &self.app.window {
                window.pre_present_notify();
            }
            frame.present();
            self.presented += 1;
        }
    }

    fn should_quit(&self) -> bool {
        self.app.quit || (self.frames > 0 && self.presented >= self.frames)
    }
}

/// Priority for a machine where `lookup` reads the environment.
fn display_priority(lookup: impl Fn(&str) -> Option<String>) -> i32 {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return PRIORITY;
    }

    let has_display = ["WAYLAND_DISPLAY", "DISPLAY"]
        .into_iter()
        .any(|var| lookup(var).is_some_and(|value| !value.is_empty()));

    if has_display {
        PRIORITY
    } else {
        0
    }
}

fn probe() -> i32 {
    display_priority(|var| std::env::var(var).ok())
}

fn create(options: &Options) -> Result<WinitWindowSystem, WindowSystemError> {
    WinitWindowSystem::new(options)
}

mark_render::export_window_system!(probe: probe, create: create);
