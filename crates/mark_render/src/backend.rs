//! Present mode selection
//!
//! Maps the configured [`PresentMode`] onto what a surface actually supports.

use mark_core::PresentMode;

pub fn to_wgpu(mode: PresentMode) -> wgpu::PresentMode {
    match mode {
        PresentMode::Immediate => wgpu::PresentMode::Immediate,
        PresentMode::Mailbox => wgpu::PresentMode::Mailbox,
        PresentMode::Fifo => wgpu::PresentMode::Fifo,
        PresentMode::FifoRelaxed => wgpu::PresentMode::FifoRelaxed,
    }
}

/// Pick the requested mode if the surface supports it, otherwise FIFO
/// (which every surface must support).
pub fn choose_present_mode(
    requested: PresentMode,
    supported: &[wgpu::PresentMode],
) -> wgpu::PresentMode {
    let wanted = to_wgpu(requested);
    if supported.contains(&wanted) {
        wanted
    } else {
        tracing::warn!(?wanted, "present mode not supported by surface, falling back to FIFO");
        wgpu::PresentMode::Fifo
    }
}
