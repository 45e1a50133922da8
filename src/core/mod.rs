//! Core infrastructure module for Pure Rust CART.
//!
//! This module provides the foundational components shared by the rest of
//! the crate:
//!
//! - [`types`]: Fundamental index types and configuration enumerations
//! - [`constants`]: Numeric thresholds and hyperparameter defaults
//! - [`error`]: Error handling and error types
//! - [`random`]: The split-search random generator

pub mod constants;
pub mod error;
pub mod random;
pub mod types;

// Re-export commonly used items for convenience
pub use constants::*;
pub use error::{CartError, Result};
pub use random::Random;
pub use types::*;

/// Version information for the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the logging subsystem.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    // Ignore the error if a logger is already installed.
    let _ = env_logger::try_init();
}
