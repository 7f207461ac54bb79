//! Native module access
//!
//! [`ModuleProvider`] opens shared libraries and [`Module`] resolves the two
//! window system entry points from one of them. [`NativeProvider`] does this
//! with `libloading`; tests substitute their own provider.

use crate::error::NativeError;
use crate::scan;
use libloading::{Library, Symbol};
use mark_core::Options;
use mark_render::window_system::{
    BoxedWindowSystem, CreateFn, ProbeFn, CREATE_SYMBOL, PROBE_SYMBOL,
};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A loaded module.
///
/// Only [`ModuleHandle`](crate::ModuleHandle) calls [`Module::unload`].
pub trait Module {
    /// Resolve the optional probe entry point.
    fn probe_entry(&self) -> Result<EntryPoint<'_, ProbeFn>, NativeError>;

    /// Resolve the mandatory create entry point.
    fn create_entry(&self) -> Result<EntryPoint<'_, CreateFn>, NativeError>;

    /// Unload the module. Entry points resolved from it must no longer exist.
    fn unload(self) -> Result<(), NativeError>;
}

/// Source of window system modules.
pub trait ModuleProvider {
    type Module: Module;

    /// List candidate module files in `dir`.
    fn candidates(&self, dir: &Path) -> Vec<PathBuf> {
        scan::modules_in_dir(dir)
    }

    fn open(&self, path: &Path) -> Result<Self::Module, NativeError>;
}

/// Entry point resolved from a module, valid while the module stays loaded.
#[derive(Clone, Copy)]
pub struct EntryPoint<'m, F> {
    func: F,
    _module: PhantomData<&'m ()>,
}

impl<'m, F> EntryPoint<'m, F> {
    /// # Safety
    ///
    /// `func` must have the signature `F` and remain callable for `'m`.
    pub unsafe fn new(func: F) -> Self {
        Self {
            func,
            _module: PhantomData,
        }
    }
}

impl EntryPoint<'_, ProbeFn> {
    pub fn probe(&self) -> i32 {
        // SAFETY: validity guaranteed at construction
        unsafe { (self.func)() }
    }
}

impl EntryPoint<'_, CreateFn> {
    /// Call the create entry point. `None` when the module reports failure.
    pub fn create(&self, options: &Options) -> Option<BoxedWindowSystem> {
        // SAFETY: validity guaranteed at construction; `options` outlives the call
        let raw = unsafe { (self.func)(options) };
        if raw.is_null() {
            return None;
        }

        // SAFETY: non-null results come from `Box::into_raw` in the module
        let boxed = unsafe { Box::from_raw(raw) };
        Some(*boxed)
    }
}

/// Opens modules with the platform dynamic loader (`dlopen` with lazy binding
/// on Unix, `LoadLibrary` on Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeProvider;

impl ModuleProvider for NativeProvider {
    type Module = NativeModule;

    fn open(&self, path: &Path) -> Result<NativeModule, NativeError> {
        // SAFETY: running a module's initialisers is inherent to loading it; the
        // scanned directory is trusted configuration.
        let library = unsafe { Library::new(path)? };
        Ok(NativeModule { library })
    }
}

#[derive(Debug)]
pub struct NativeModule {
    library: Library,
}

impl Module for NativeModule {
    fn probe_entry(&self) -> Result<EntryPoint<'_, ProbeFn>, NativeError> {
        // SAFETY: modules export PROBE_SYMBOL with the ProbeFn signature, and the
        // returned entry point borrows `self`, which keeps the library loaded.
        unsafe {
            let symbol: Symbol<'_, ProbeFn> = self.library.get(PROBE_SYMBOL.as_bytes())?;
            Ok(EntryPoint::new(*symbol))
        }
    }

    fn create_entry(&self) -> Result<EntryPoint<'_, CreateFn>, NativeError> {
        // SAFETY: as for probe_entry, with CREATE_SYMBOL and CreateFn
        unsafe {
            let symbol: Symbol<'_, CreateFn> = self.library.get(CREATE_SYMBOL.as_bytes())?;
            Ok(EntryPoint::new(*symbol))
        }
    }

    fn unload(self) -> Result<(), NativeError> {
        self.library.close()?;
        Ok(())
    }
}
