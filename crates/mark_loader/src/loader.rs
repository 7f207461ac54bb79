//! Activating the selected window system

use crate::error::LoaderError;
use crate::handle::ModuleHandle;
use crate::module::{Module, ModuleProvider, NativeProvider};
use crate::select::find_best_module;
use mark_core::Options;
use mark_render::window_system::{BoxedWindowSystem, CREATE_SYMBOL};
use mark_render::WindowSystem;
use std::path::{Path, PathBuf};

/// A window system together with the module that implements it.
pub struct ActiveWindowSystem<M: Module> {
    // Fields drop in declaration order: the window system must be gone before
    // its module is unloaded.
    window_system: BoxedWindowSystem,
    handle: ModuleHandle<M>,
    path: PathBuf,
}

impl<M: Module> ActiveWindowSystem<M> {
    pub fn window_system(&self) -> &dyn WindowSystem {
        self.window_system.as_ref()
    }

    pub fn window_system_mut(&mut self) -> &mut dyn WindowSystem {
        self.window_system.as_mut()
    }

    /// Path of the module backing the window system.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn handle(&self) -> &ModuleHandle<M> {
        &self.handle
    }
}

impl<M: Module> std::fmt::Debug for ActiveWindowSystem<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveWindowSystem")
            .field("name", &self.window_system.name())
            .field("path", &self.path)
            .finish()
    }
}

/// Load `path` afresh and construct its window system.
///
/// There is no fallback: any failure here ends activation.
pub fn activate<P: ModuleProvider>(
    provider: &P,
    path: &Path,
    options: &Options,
) -> Result<ActiveWindowSystem<P::Module>, LoaderError> {
    let handle = ModuleHandle::open(provider, path).map_err(|source| LoaderError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let window_system = {
        let create = handle
            .create_entry()
            .map_err(|source| LoaderError::MissingEntryPoint {
                path: path.to_path_buf(),
                symbol: CREATE_SYMBOL,
                source,
            })?;

        create.create(options).ok_or_else(|| LoaderError::CreateFailed {
            path: path.to_path_buf(),
        })?
    };

    tracing::info!(
        module = %path.display(),
        window_system = window_system.name(),
        "window system activated"
    );

    Ok(ActiveWindowSystem {
        window_system,
        handle,
        path: path.to_path_buf(),
    })
}

/// Finds, loads and keeps the window system for a set of options.
///
/// The first successful [`load_window_system`](Self::load_window_system)
/// activates a module; later calls return the same window system without
/// scanning again. The loader is not synchronised: it is meant to be driven
/// from the host's main thread, and `&mut self` keeps it that way.
pub struct WindowSystemLoader<'a, P: ModuleProvider = NativeProvider> {
    options: &'a Options,
    provider: P,
    active: Option<ActiveWindowSystem<P::Module>>,
}

impl<'a> WindowSystemLoader<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self::with_provider(options, NativeProvider)
    }
}

impl<'a, P: ModuleProvider> WindowSystemLoader<'a, P> {
    pub fn with_provider(options: &'a Options, provider: P) -> Self {
        Self {
            options,
            provider,
            active: None,
        }
    }

    /// Return the active window system, discovering and activating one first
    /// if necessary.
    pub fn load_window_system(&mut self) -> Result<&mut dyn WindowSystem, LoaderError> {
        let active = match self.active.take() {
            Some(active) => active,
            None => {
                let path = find_best_module(&self.provider, &self.options.window_system_dir)?;
                activate(&self.provider, &path, self.options)?
            }
        };

        Ok(self.active.insert(active).window_system_mut())
    }

    pub fn active(&self) -> Option<&ActiveWindowSystem<P::Module>> {
        self.active.as_ref()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
