//! Single-use command recording
//!
//! Records into a fresh encoder, submits once and blocks until the GPU has
//! finished. Dropping without submitting discards the recorded commands.

use crate::GpuContext;

pub struct OneTimeCommands<'a> {
    gpu: &'a GpuContext,
    encoder: wgpu::CommandEncoder,
}

impl<'a> OneTimeCommands<'a> {
    pub fn new(gpu: &'a GpuContext, label: &str) -> Self {
        let encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });

        Self { gpu, encoder }
    }

    pub fn encoder(&mut self) -> &mut wgpu::CommandEncoder {
        &mut self.encoder
    }

    /// Submit the recorded commands and wait for them to complete.
    pub fn submit(self) {
        let index = self.gpu.queue.submit(std::iter::once(self.encoder.finish()));
        let result = self
            .gpu
            .device
            .poll(wgpu::Maintain::WaitForSubmissionIndex(index));
        tracing::trace!(queue_empty = result.is_queue_empty(), "one-time commands completed");
    }
}
