//! Per-candidate probing

use crate::handle::ModuleHandle;
use crate::module::ModuleProvider;
use std::path::Path;

/// Load `candidate`, call its probe entry point and unload it again.
///
/// Every failure yields priority 0: a file that does not load and a module
/// without a probe entry point are both just unusable.
pub fn probe_module<P: ModuleProvider>(provider: &P, candidate: &Path) -> i32 {
    let handle = match ModuleHandle::open(provider, candidate) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::debug!(candidate = %candidate.display(), error = %e, "failed to load file");
            return 0;
        }
    };

    let priority = match handle.probe_entry() {
        Ok(probe) => {
            let priority = probe.probe();
            tracing::debug!(candidate = %candidate.display(), priority, "probe succeeded");
            priority
        }
        Err(e) => {
            tracing::debug!(candidate = %candidate.display(), error = %e, "failed to find probe function");
            0
        }
    };

    priority
}
