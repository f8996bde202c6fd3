//! Core infrastructure module for classeval.
//!
//! - [`types`]: shared index aliases, the multiclass AUC strategy selector
//!   and the score-with-standard-error pair
//! - [`constants`]: scoring defaults and sentinels
//! - [`error`]: the crate-wide error type

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{EvalError, Result};
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize the logging subsystem.
///
/// Uses `RUST_LOG` when set, otherwise [`DEFAULT_LOG_FILTER`]. Calling this
/// more than once, or after another logger was installed, is harmless.
pub fn initialize_logging() {
    if LOGGING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let env = env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("A logger was already installed; keeping it");
    }
    log::info!("classeval {} initialized", CLASSEVAL_VERSION);
}

/// Whether [`initialize_logging`] has run.
pub fn is_logging_initialized() -> bool {
    LOGGING_INITIALIZED.load(Ordering::SeqCst)
}
