//! Headless window system
//!
//! Renders into a ring of offscreen images and never opens a window. Usable
//! everywhere, so it probes with the lowest positive priority and wins only
//! when nothing better is available.
//!
//! Window system options:
//! - `images`: number of offscreen images (default 3)

use mark_render::mark_core::Options;
use mark_render::wgpu;
use mark_render::{GpuContext, WindowSystem, WindowSystemError};

pub const PRIORITY: i32 = 1;

/// Frames presented when the host does not set a frame count
pub const DEFAULT_FRAMES: u32 = 500;

const DEFAULT_IMAGES: u32 = 3;

pub struct HeadlessWindowSystem {
    width: u32,
    height: u32,
    image_count: u32,
    frames: u32,
    images: Vec<wgpu::Texture>,
    current: usize,
    presented: u32,
}

impl HeadlessWindowSystem {
    pub fn new(options: &Options) -> Result<Self, WindowSystemError> {
        let image_count = match options.window_system_option("images") {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or_else(|| WindowSystemError::InvalidOption {
                    key: "images".to_string(),
                    reason: format!("expected a positive integer, got '{value}'"),
                })?,
            None => DEFAULT_IMAGES,
        };

        Ok(Self {
            width: options.width,
            height: options.height,
            image_count,
            frames: if options.frames == 0 { DEFAULT_FRAMES } else { options.frames },
            images: Vec::new(),
            current: 0,
            presented: 0,
        })
    }

    pub fn image_count(&self) -> u32 {
        self.image_count
    }
}

impl WindowSystem for HeadlessWindowSystem {
    fn name(&self) -> &str {
        "headless"
    }

    fn init_gpu(&mut self, gpu: &GpuContext) -> Result<(), WindowSystemError> {
        self.images = (0..self.image_count)
            .map(|index| {
                gpu.device.create_texture(&wgpu::TextureDescriptor {
                    label: Some(&format!("Headless Image {index}")),
                    size: wgpu::Extent3d {
                        width: self.width,
                        height: self.height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: self.format(),
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
                    view_formats: &[],
                })
            })
            .collect();
        self.current = 0;

        tracing::debug!(images = self.image_count, "headless images created");
        Ok(())
    }

    fn deinit_gpu(&mut self) {
        self.images.clear();
    }

    fn format(&self) -> wgpu::TextureFormat {
        wgpu::TextureFormat::Rgba8UnormSrgb
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn next_frame(&mut self, _gpu: &GpuContext) -> Result<wgpu::TextureView, WindowSystemError> {
        let image = self
            .images
            .get(self.current)
            .ok_or(WindowSystemError::NotInitialized)?;

        Ok(image.create_view(&wgpu::TextureViewDescriptor::default()))
    }

    fn present_frame(&mut self, _gpu: &GpuContext) {
        if self.images.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.images.len();
        self.presented += 1;
    }

    fn should_quit(&self) -> bool {
        self.presented >= self.frames
    }
}

fn probe() -> i32 {
    PRIORITY
}

fn create(options: &Options) -> Result<HeadlessWindowSystem, WindowSystemError> {
    HeadlessWindowSystem::new(options)
}

mark_render::export_window_system!(probe: probe, create: create);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_as_fallback() {
        assert_eq!(mark_window_system_probe(), PRIORITY);
    }

    #[test]
    fn create_entry_point_builds_window_system() {
        let options = Options::default();
        let raw = unsafe { mark_window_system_create(&options) };
        assert!(!raw.is_null());

        let window_system = unsafe { Box::from_raw(raw) };
        assert_eq!(window_system.name(), "headless");
        assert_eq!(window_system.size(), (options.width, options.height));
        assert!(!window_system.should_quit());
    }

    #[test]
    fn rejects_bad_image_count() {
        let mut options = Options::default();
        options
            .window_system_options
            .insert("images".into(), "zero".into());

        assert!(matches!(
            HeadlessWindowSystem::new(&options),
            Err(WindowSystemError::InvalidOption { .. })
        ));
        assert!(unsafe { mark_window_system_create(&options) }.is_null());

        options
            .window_system_options
            .insert("images".into(), "2".into());
        assert_eq!(HeadlessWindowSystem::new(&options).unwrap().image_count(), 2);
    }

    #[test]
    fn quits_after_requested_frames() {
        let Ok(gpu) = GpuContext::new_blocking() else {
            return;
        };

        let options = Options {
            width: 64,
            height: 64,
            frames: 4,
            ..Options::default()
        };
        let mut window_system = HeadlessWindowSystem::new(&options).unwrap();
        assert!(matches!(
            window_system.next_frame(&gpu),
            Err(WindowSystemError::NotInitialized)
        ));

        window_system.init_gpu(&gpu).unwrap();
        let mut presented = 0;
        while !window_system.should_quit() {
            window_system.next_frame(&gpu).unwrap();
            window_system.present_frame(&gpu);
            presented += 1;
        }
        assert_eq!(presented, 4);

        window_system.deinit_gpu();
    }
}
