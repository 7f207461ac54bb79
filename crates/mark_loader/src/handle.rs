//! Owning guard for a loaded module

use crate::error::NativeError;
use crate::module::{EntryPoint, Module, ModuleProvider};
use mark_render::window_system::{CreateFn, ProbeFn};
use std::path::Path;

/// Owns at most one loaded module and unloads it exactly once when dropped.
///
/// Move-only: assigning a new guard over an old one unloads the old module,
/// and a moved-from guard no longer exists to unload anything. A guard can be
/// empty, either from [`empty`](Self::empty) or after [`take`](Self::take),
/// so access to the module is fallible.
pub struct ModuleHandle<M: Module> {
    module: Option<M>,
}

impl<M: Module> ModuleHandle<M> {
    pub fn new(module: M) -> Self {
        Self {
            module: Some(module),
        }
    }

    /// Guard holding no module.
    pub fn empty() -> Self {
        Self { module: None }
    }

    /// Open `path` through `provider` and take ownership of the result.
    pub fn open<P>(provider: &P, path: &Path) -> Result<Self, NativeError>
    where
        P: ModuleProvider<Module = M>,
    {
        provider.open(path).map(Self::new)
    }

    pub fn get(&self) -> Option<&M> {
        self.module.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.module.is_some()
    }

    /// Own `module` instead, unloading the previous one if any.
    pub fn replace(&mut self, module: M) {
        if let Some(previous) = self.module.replace(module) {
            unload(previous);
        }
    }

    /// Move the module out without unloading it, leaving the guard empty.
    pub fn take(&mut self) -> Option<M> {
        self.module.take()
    }

    /// Resolve the probe entry point of the owned module.
    pub fn probe_entry(&self) -> Result<EntryPoint<'_, ProbeFn>, NativeError> {
        self.loaded()?.probe_entry()
    }

    /// Resolve the create entry point of the owned module.
    pub fn create_entry(&self) -> Result<EntryPoint<'_, CreateFn>, NativeError> {
        self.loaded()?.create_entry()
    }

    fn loaded(&self) -> Result<&M, NativeError> {
        self.module
            .as_ref()
            .ok_or_else(|| "module handle is empty".into())
    }
}

fn unload<M: Module>(module: M) {
    if let Err(e) = module.unload() {
        tracing::warn!(error = %e, "failed to unload window system module");
    }
}

impl<M: Module> Default for ModuleHandle<M> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<M: Module> Drop for ModuleHandle<M> {
    fn drop(&mut self) {
        if let Some(module) = self.module.take() {
            unload(module);
        }
    }
}

impl<M: Module> std::fmt::Debug for ModuleHandle<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
