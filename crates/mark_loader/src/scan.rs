//! Candidate module discovery

use std::path::{Path, PathBuf};

/// File name suffix of shared modules on this platform.
#[cfg(target_os = "windows")]
pub const MODULE_SUFFIX: &str = ".dll";

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub const MODULE_SUFFIX: &str = ".dylib";

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "ios")))]
pub const MODULE_SUFFIX: &str = ".so";

/// Whether `name` looks like a shared module. The suffix alone is not a name.
pub fn has_module_suffix(name: &str) -> bool {
    name.len() > MODULE_SUFFIX.len() && name.ends_with(MODULE_SUFFIX)
}

/// Every file in `dir` with the module suffix, in directory order.
///
/// An unreadable directory yields no candidates. Subdirectories are not
/// searched.
pub fn modules_in_dir(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "cannot read window system directory");
            return Vec::new();
        }
    };

    entries
        .flatten()
        .filter(|entry| has_module_suffix(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect()
}
