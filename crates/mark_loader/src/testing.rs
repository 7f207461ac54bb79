//! In-memory module provider for tests
//!
//! Candidates are a fixed list, so scan order is deterministic. Every load,
//! unload, scan and window system drop is recorded in a shared [`Journal`].

use crate::error::NativeError;
use crate::module::{EntryPoint, Module, ModuleProvider};
use mark_core::Options;
use mark_render::window_system::{BoxedWindowSystem, CreateFn, ProbeFn};
use mark_render::{wgpu, GpuContext, WindowSystem, WindowSystemError};
use std::cell::{Cell, RefCell};
use std::os::raw::c_int;
use std::path::{Path, PathBuf};
use std::ptr;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateBehavior {
    Succeed,
    ReturnNull,
    MissingSymbol,
}

#[derive(Debug, Clone, Copy)]
pub struct FakeModuleConfig {
    /// `None` when the file cannot be loaded at all
    max_loads: Option<usize>,
    /// `None` when the module lacks the probe symbol
    priority: Option<i32>,
    create: CreateBehavior,
}

impl FakeModuleConfig {
    pub fn priority(priority: i32) -> Self {
        Self {
            max_loads: Some(usize::MAX),
            priority: Some(priority),
            create: CreateBehavior::Succeed,
        }
    }

    pub fn unloadable() -> Self {
        Self {
            max_loads: None,
            ..Self::priority(0)
        }
    }

    pub fn without_probe() -> Self {
        Self {
            priority: None,
            ..Self::priority(0)
        }
    }

    /// Loads for probing, then fails every later load.
    pub fn fail_reload(self) -> Self {
        Self {
            max_loads: Some(1),
            ..self
        }
    }

    pub fn create(self, create: CreateBehavior) -> Self {
        Self { create, ..self }
    }
}

#[derive(Debug, Default)]
pub struct Journal {
    scans: Cell<usize>,
    loads: Cell<usize>,
    unloads: Cell<usize>,
    events: RefCell<Vec<String>>,
}

impl Journal {
    pub fn scans(&self) -> usize {
        self.scans.get()
    }

    pub fn loads(&self) -> usize {
        self.loads.get()
    }

    pub fn unloads(&self) -> usize {
        self.unloads.get()
    }

    /// Modules loaded and not yet unloaded.
    pub fn live(&self) -> usize {
        self.loads() - self.unloads()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

pub struct FakeProvider {
    candidates: Vec<(PathBuf, FakeModuleConfig)>,
    journal: Rc<Journal>,
}

impl FakeProvider {
    pub fn new(candidates: Vec<(&str, FakeModuleConfig)>) -> Self {
        Self {
            candidates: candidates
                .into_iter()
                .map(|(name, config)| (PathBuf::from(name), config))
                .collect(),
            journal: Rc::default(),
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn loads_of(&self, path: &Path) -> usize {
        let loaded = format!("load {}", path.display());
        self.journal
            .events
            .borrow()
            .iter()
            .filter(|event| **event == loaded)
            .count()
    }
}

impl ModuleProvider for FakeProvider {
    type Module = FakeModule;

    fn candidates(&self, _dir: &Path) -> Vec<PathBuf> {
        self.journal.scans.set(self.journal.scans() + 1);
        self.candidates.iter().map(|(path, _)| path.clone()).collect()
    }

    fn open(&self, path: &Path) -> Result<FakeModule, NativeError> {
        let config = self
            .candidates
            .iter()
            .find(|(candidate, _)| candidate == path)
            .map(|(_, config)| *config)
            .ok_or_else(|| format!("{}: cannot open shared object file", path.display()))?;

        match config.max_loads {
            Some(max) if self.loads_of(path) < max => {}
            _ => return Err(format!("{}: invalid ELF header", path.display()).into()),
        }

        self.journal.loads.set(self.journal.loads() + 1);
        self.journal.record(format!("load {}", path.display()));

        Ok(FakeModule {
            path: path.to_path_buf(),
            config,
            journal: Rc::clone(&self.journal),
        })
    }
}

pub struct FakeModule {
    path: PathBuf,
    config: FakeModuleConfig,
    journal: Rc<Journal>,
}

thread_local! {
    static NEXT_PRIORITY: Cell<c_int> = const { Cell::new(0) };
    static NEXT_WINDOW_SYSTEM: RefCell<Option<FakeWindowSystem>> = const { RefCell::new(None) };
}

unsafe extern "C" fn fake_probe() -> c_int {
    NEXT_PRIORITY.with(Cell::get)
}

unsafe extern "C" fn fake_create(_options: *const Options) -> *mut BoxedWindowSystem {
    match NEXT_WINDOW_SYSTEM.with(|next| next.borrow_mut().take()) {
        Some(window_system) => {
            let boxed: BoxedWindowSystem = Box::new(window_system);
            Box::into_raw(Box::new(boxed))
        }
        None => ptr::null_mut(),
    }
}

impl Module for FakeModule {
    fn probe_entry(&self) -> Result<EntryPoint<'_, ProbeFn>, NativeError> {
        let priority = self
            .config
            .priority
            .ok_or_else(|| format!("{}: undefined symbol: mark_window_system_probe", self.path.display()))?;

        NEXT_PRIORITY.with(|next| next.set(priority));
        // SAFETY: fake_probe is a plain function with the ProbeFn signature
        Ok(unsafe { EntryPoint::new(fake_probe as ProbeFn) })
    }

    fn create_entry(&self) -> Result<EntryPoint<'_, CreateFn>, NativeError> {
        let next = match self.config.create {
            CreateBehavior::MissingSymbol => {
                return Err(format!(
                    "{}: undefined symbol: mark_window_system_create",
                    self.path.display()
                )
                .into())
            }
            CreateBehavior::ReturnNull => None,
            CreateBehavior::Succeed => Some(FakeWindowSystem {
                name: self.path.display().to_string(),
                journal: Rc::clone(&self.journal),
            }),
        };

        NEXT_WINDOW_SYSTEM.with(|slot| *slot.borrow_mut() = next);
        // SAFETY: fake_create is a plain function with the CreateFn signature
        Ok(unsafe { EntryPoint::new(fake_create as CreateFn) })
    }

    fn unload(self) -> Result<(), NativeError> {
        self.journal.unloads.set(self.journal.unloads() + 1);
        self.journal.record(format!("unload {}", self.path.display()));
        Ok(())
    }
}

pub struct FakeWindowSystem {
    name: String,
    journal: Rc<Journal>,
}

impl Drop for FakeWindowSystem {
    fn drop(&mut self) {
        self.journal.record(format!("drop window system {}", self.name));
    }
}

impl WindowSystem for FakeWindowSystem {
    fn name(&self) -> &str {
        &self.name
    }

    fn init_gpu(&mut self, _gpu: &GpuContext) -> Result<(), WindowSystemError> {
        Ok(())
    }

    fn deinit_gpu(&mut self) {}

    fn format(&self) -> wgpu::TextureFormat {
        wgpu::TextureFormat::Bgra8UnormSrgb
    }

    fn size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn next_frame(&mut self, _gpu: &GpuContext) -> Result<wgpu::TextureView, WindowSystemError> {
        Err(WindowSystemError::NotInitialized)
    }

    fn present_frame(&mut self, _gpu: &GpuContext) {}

    fn should_quit(&self) -> bool {
        false
    }
}
