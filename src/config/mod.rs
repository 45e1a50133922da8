//! Configuration management for Pure Rust CART.
//!
//! Hyperparameters are collected into a plain [`Config`] value, either
//! directly, through [`ConfigBuilder`], or from a TOML file. Validation
//! runs once at `build()` / `fit` time.

pub mod core;

pub use self::core::{Config, ConfigBuilder};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "cart.toml";
