//! # Pure Rust CART
//!
//! A pure Rust implementation of CART-style binary decision tree
//! induction, supporting classification and regression with exhaustive,
//! randomized and presorted split search.
//!
//! ## Features
//!
//! - **Memory Safety**: the tree is an append-only arena of nodes with
//!   integer child indices; no pointer-linked structures.
//! - **Incremental Statistics**: impurity criteria maintain left/right
//!   statistics under a moving partition boundary instead of recomputing
//!   them per candidate split.
//! - **Constant-Feature Memoization**: features found constant in a node
//!   are never re-evaluated in its descendants.
//! - **Two Growth Strategies**: depth-first construction bounded by
//!   `max_depth`, or best-first construction bounded by a leaf budget.
//! - **Parallel Prediction**: the finished tree is immutable and batch
//!   prediction fans out across rows with Rayon.
//!
//! ## Quick Start
//!
//! ```rust
//! use cart_rust::{ConfigBuilder, DecisionTreeClassifier};
//! use ndarray::{Array1, Array2};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Two well-separated clusters along one feature
//! let features = Array2::from_shape_vec(
//!     (6, 1),
//!     vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0],
//! )?;
//! let labels = Array1::from_vec(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
//!
//! let config = ConfigBuilder::new()
//!     .max_depth(3)
//!     .random_state(0)
//!     .build()?;
//!
//! let mut model = DecisionTreeClassifier::new(config)?;
//! model.fit(&features, &labels, None)?;
//!
//! let predictions = model.predict(&features)?;
//! assert_eq!(predictions, labels);
//!
//! let importances = model.feature_importances()?;
//! assert!((importances.sum() - 1.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`core`]: fundamental types, constants, error handling, random state
//! - [`config`]: hyperparameter configuration and validation
//! - [`tree`]: the induction core — criteria, splitters, tree storage and
//!   builders
//! - [`model`]: the high-level classifier and regressor estimators
//!
//! ## Concurrency
//!
//! One `fit` call is single-threaded and synchronous: the sample and
//! feature permutations are exclusively owned by the splitter for its
//! duration. Once `fit` returns, the tree is read-only and may be shared
//! across threads for prediction without locking.

#![warn(missing_docs)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module
pub mod core;

// Configuration management module
pub mod config;

// Tree induction module
pub mod tree;

// High-level estimators
pub mod model;

// Shared helpers
pub mod utils;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{CartError, Result},
    random::Random,
    types::*,
};

// Re-export configuration functionality
pub use config::{Config, ConfigBuilder};

// Re-export the induction core
pub use tree::{
    BestFirstTreeBuilder, Criterion, DepthFirstBuilder, Node, SplitRecord, Splitter, Tree,
    TreeBuilder,
};

// Re-export the estimators
pub use model::{compute_sample_weight, DecisionTreeClassifier, DecisionTreeRegressor};

/// Initialize the library's logging subsystem (idempotent).
pub fn init() {
    crate::core::init_logging();
    log::debug!("cart-rust {} initialized", crate::core::VERSION);
}
