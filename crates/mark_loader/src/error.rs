use mark_core::options::WINDOW_SYSTEM_DIR_ENV;
use std::path::PathBuf;
use thiserror::Error;

/// Diagnostic reported by the native loader (the `dlerror` text on Unix).
pub type NativeError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that end discovery or activation of a window system.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error(
        "failed to find a usable window system in '{}' ({candidates} candidates), \
         try setting window_system_dir or {env}",
        .dir.display(),
        env = WINDOW_SYSTEM_DIR_ENV
    )]
    NoUsableModule { dir: PathBuf, candidates: usize },

    #[error("failed to load window system module '{}'", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: NativeError,
    },

    #[error("window system module '{}' doesn't provide {symbol}", .path.display())]
    MissingEntryPoint {
        path: PathBuf,
        symbol: &'static str,
        #[source]
        source: NativeError,
    },

    /// The create entry point returned null. The module's reason does not
    /// cross the ABI.
    #[error("window system module '{}' failed to create a window system", .path.display())]
    CreateFailed { path: PathBuf },
}
