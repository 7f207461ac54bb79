//! Buffer copy helper

use crate::{GpuContext, OneTimeCommands};

/// Copy `size` bytes from the start of `src` to the start of `dst`, blocking
/// until the copy has completed on the GPU.
pub fn copy_buffer(
    gpu: &GpuContext,
    src: &wgpu::Buffer,
    dst: &wgpu::Buffer,
    size: wgpu::BufferAddress,
) {
    let mut commands = OneTimeCommands::new(gpu, "Copy Buffer");
    commands.encoder().copy_buffer_to_buffer(src, 0, dst, 0, size);
    commands.submit();
}
