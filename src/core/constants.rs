//! System constants and default configuration values for Pure Rust CART.
//!
//! This module defines the numeric thresholds and hyperparameter defaults
//! shared by the splitter, builders and configuration layer.

use static_assertions::const_assert;

/// Default tolerance below which a feature's value range is treated as
/// constant within a node. The legacy implementation hard-coded `1e-1`,
/// which misclassifies narrow-range features; the tolerance is configurable
/// through [`crate::config::Config::feature_threshold`].
pub const DEFAULT_FEATURE_THRESHOLD: f64 = 1e-7;

/// A node whose impurity is at or below this value is considered pure and
/// is never split further.
pub const MIN_IMPURITY_SPLIT: f64 = 1e-7;

/// Default minimum number of samples required to split an internal node.
pub const DEFAULT_MIN_SAMPLES_SPLIT: usize = 2;

/// Default minimum number of samples required in each leaf.
pub const DEFAULT_MIN_SAMPLES_LEAF: usize = 1;

/// Default minimum weighted fraction of the total sample weight required
/// in each leaf.
pub const DEFAULT_MIN_WEIGHT_FRACTION_LEAF: f64 = 0.0;

/// Default maximum tree depth. Non-positive means unbounded.
pub const DEFAULT_MAX_DEPTH: i32 = -1;

/// Default number of features to examine per split. Non-positive means all.
pub const DEFAULT_MAX_FEATURES: i32 = -1;

/// Default maximum number of leaf nodes. Non-positive selects depth-first
/// growth; a value of at least 2 selects best-first growth with that budget.
pub const DEFAULT_MAX_LEAF_NODES: i32 = -1;

// A split must leave at least one sample on each side.
const_assert!(DEFAULT_MIN_SAMPLES_LEAF >= 1);
const_assert!(DEFAULT_MIN_SAMPLES_SPLIT >= 2 * DEFAULT_MIN_SAMPLES_LEAF);
