//! Ctrl+C handling for graceful interruption.
//!
//! An interrupt never kills the run outright: it sets a shared
//! `AtomicBool` that the walker, the duplicate detector, the resolution
//! engine and the console prompt all poll. Each of them stops at the next
//! file or group boundary, a best-effort summary is still printed, and the
//! process exits with [`EXIT_CODE_INTERRUPTED`].
//!
//! ```rust,no_run
//! use hashsweep::duplicates::FinderConfig;
//! use hashsweep::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let config = FinderConfig::default().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit code for an interrupted run (128 + SIGINT).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared interrupt flag.
///
/// Cloning shares the same flag.
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no interrupt recorded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) was called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Record an interrupt by hand.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// The flag to hand to the walker, finder, engine and prompter.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler.
///
/// The first call registers the hook; later calls (for example from several
/// `run_app` invocations in one test binary) get the same handler back with
/// its flag cleared. When another hook is already registered, an unhooked
/// handler is returned that still honours
/// [`request_shutdown`](ShutdownHandler::request_shutdown).
///
/// # Errors
///
/// Currently always succeeds; installation failures fall back to an
/// unhooked handler.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    let installed = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);

        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupted. Finishing up...");
        let _ = stderr.flush();

        log::info!("Shutdown signal received");
    });

    match installed {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(GLOBAL_HANDLER.get().cloned().unwrap_or(handler))
        }
        Err(e) => {
            log::debug!("Ctrl+C handler not installed ({}), using unhooked handler", e);
            let fallback = GLOBAL_HANDLER.get_or_init(ShutdownHandler::new).clone();
            fallback.reset();
            Ok(fallback)
        }
    }
}

/// Create a handler without installing any signal hook.
///
/// ```
/// use hashsweep::signal::create_handler;
///
/// let handler = create_handler();
/// assert!(!handler.is_shutdown_requested());
/// ```
#[must_use]
pub fn create_handler() -> ShutdownHandler {
    ShutdownHandler::new()
}
