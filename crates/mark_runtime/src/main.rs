//! Mark Runtime
//!
//! Benchmark host: loads options, activates the best window system module and
//! presents frames until the window system asks to quit.
//!
//! Usage: `mark [options.json]`

use anyhow::{Context, Result};
use mark_core::Options;
use mark_loader::WindowSystemLoader;
use mark_render::{wgpu, GpuContext, WindowSystem};
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug shows every probed module)
    tracing_subscriber::fmt::init();

    tracing::info!("mark v{}", mark_core::VERSION);

    let options = load_options()?;
    tracing::info!(dir = %options.window_system_dir.display(), "window system directory");

    let mut loader = WindowSystemLoader::new(&options);
    let window_system = loader
        .load_window_system()
        .context("failed to load a window system")?;

    let gpu = GpuContext::new_blocking().context("failed to initialize GPU")?;
    window_system
        .init_gpu(&gpu)
        .context("failed to initialize window system")?;

    let result = run(window_system, &gpu);
    window_system.deinit_gpu();

    result
}

fn load_options() -> Result<Options> {
    let mut options = match std::env::args_os().nth(1) {
        Some(path) => Options::from_file(Path::new(&path))
            .with_context(|| format!("failed to load options from {}", Path::new(&path).display()))?,
        None => Options::default(),
    };
    options.apply_env_overrides();
    Ok(options)
}

fn run(window_system: &mut dyn WindowSystem, gpu: &GpuContext) -> Result<()> {
    let (width, height) = window_system.size();
    tracing::info!(
        window_system = window_system.name(),
        width,
        height,
        format = ?window_system.format(),
        "running"
    );

    let start = Instant::now();
    let mut frames: u64 = 0;

    while !window_system.should_quit() {
        let view = window_system
            .next_frame(gpu)
            .context("failed to acquire frame")?;
        clear(gpu, &view, frames);
        window_system.present_frame(gpu);
        frames += 1;
    }

    let elapsed = start.elapsed().as_secs_f64();
    let fps = if elapsed > 0.0 { frames as f64 / elapsed } else { 0.0 };
    tracing::info!(frames, fps = %format!("{fps:.1}"), "done");

    Ok(())
}

/// Clear `view` to a color that cycles with the frame number.
fn clear(gpu: &GpuContext, view: &wgpu::TextureView, frame: u64) {
    let phase = (frame % 120) as f64 / 120.0;

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Clear Encoder"),
        });

    {
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: phase,
                        g: 0.2,
                        b: 1.0 - phase,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }

    gpu.queue.submit(std::iter::once(encoder.finish()));
}
