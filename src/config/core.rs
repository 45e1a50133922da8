//! Core configuration structures for Pure Rust CART.
//!
//! This module provides the main configuration structure and builder
//! pattern for setting up decision-tree induction parameters. All
//! validation happens once, in [`ConfigBuilder::build`] or at the start of
//! `fit`; the hot loops never re-check hyperparameters.

use crate::core::constants::*;
use crate::core::error::{CartError, Result};
use crate::core::types::{CriterionKind, SplitterKind};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for decision-tree induction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Impurity criterion used to rank candidate splits
    pub criterion: CriterionKind,
    /// Split search strategy
    pub splitter: SplitterKind,
    /// Maximum tree depth; non-positive means unbounded.
    /// Ignored by best-first growth, which bounds leaves instead.
    pub max_depth: i32,
    /// Minimum number of samples required to split an internal node
    pub min_samples_split: usize,
    /// Minimum number of samples required in each leaf
    pub min_samples_leaf: usize,
    /// Minimum weighted fraction of the total sample weight in each leaf
    pub min_weight_fraction_leaf: f64,
    /// Number of features to examine per split; non-positive means all
    pub max_features: i32,
    /// Maximum number of leaf nodes; non-positive selects depth-first
    /// growth, a value of at least 2 selects best-first growth
    pub max_leaf_nodes: i32,
    /// Seed for feature/threshold sampling; `None` draws an entropy seed
    pub random_state: Option<u64>,
    /// Tolerance below which a feature is treated as constant in a node
    pub feature_threshold: f64,
    /// Per-class weights multiplied into the sample weights
    /// (classification only; indexed by class, in sorted label order)
    pub class_weight: Option<Vec<f64>>,
}

impl Config {
    /// Default configuration for classification (Gini, best splits).
    pub fn default_classification() -> Self {
        Config {
            criterion: CriterionKind::Gini,
            ..Self::base()
        }
    }

    /// Default configuration for regression (MSE, best splits).
    pub fn default_regression() -> Self {
        Config {
            criterion: CriterionKind::Mse,
            ..Self::base()
        }
    }

    fn base() -> Self {
        Config {
            criterion: CriterionKind::Gini,
            splitter: SplitterKind::Best,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
            min_weight_fraction_leaf: DEFAULT_MIN_WEIGHT_FRACTION_LEAF,
            max_features: DEFAULT_MAX_FEATURES,
            max_leaf_nodes: DEFAULT_MAX_LEAF_NODES,
            random_state: None,
            feature_threshold: DEFAULT_FEATURE_THRESHOLD,
            class_weight: None,
        }
    }

    /// Validate hyperparameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.min_samples_split < 1 {
            return Err(CartError::invalid_parameter(
                "min_samples_split",
                self.min_samples_split.to_string(),
                "must be at least 1",
            ));
        }
        if self.min_samples_leaf < 1 {
            return Err(CartError::invalid_parameter(
                "min_samples_leaf",
                self.min_samples_leaf.to_string(),
                "must be at least 1",
            ));
        }
        if !(0.0..=0.5).contains(&self.min_weight_fraction_leaf) {
            return Err(CartError::invalid_parameter(
                "min_weight_fraction_leaf",
                self.min_weight_fraction_leaf.to_string(),
                "must lie in [0, 0.5]",
            ));
        }
        if self.max_leaf_nodes == 1 {
            return Err(CartError::invalid_parameter(
                "max_leaf_nodes",
                "1",
                "a tree with a single leaf cannot be grown best-first; \
                 use a non-positive value for depth-first growth",
            ));
        }
        if !(self.feature_threshold >= 0.0) {
            return Err(CartError::invalid_parameter(
                "feature_threshold",
                self.feature_threshold.to_string(),
                "must be non-negative",
            ));
        }
        if let Some(weights) = &self.class_weight {
            if weights.iter().any(|&w| !(w > 0.0) || !w.is_finite()) {
                return Err(CartError::invalid_parameter(
                    "class_weight",
                    format!("{:?}", weights),
                    "all class weights must be positive and finite",
                ));
            }
        }
        Ok(())
    }

    /// Load a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CartError::serialization(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CartError::serialization(format!("TOML serialize error: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_classification()
    }
}

/// Builder for [`Config`] with validation at `build()`.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with the classification defaults.
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default_classification(),
        }
    }

    /// Creates a new builder seeded with the regression defaults.
    pub fn regression() -> Self {
        ConfigBuilder {
            config: Config::default_regression(),
        }
    }

    /// Sets the impurity criterion.
    pub fn criterion(mut self, criterion: CriterionKind) -> Self {
        self.config.criterion = criterion;
        self
    }

    /// Sets the split search strategy.
    pub fn splitter(mut self, splitter: SplitterKind) -> Self {
        self.config.splitter = splitter;
        self
    }

    /// Sets the maximum tree depth (non-positive means unbounded).
    pub fn max_depth(mut self, max_depth: i32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Sets the minimum number of samples required to split a node.
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.config.min_samples_split = min_samples_split;
        self
    }

    /// Sets the minimum number of samples required in each leaf.
    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.config.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Sets the minimum weighted fraction of total weight per leaf.
    pub fn min_weight_fraction_leaf(mut self, fraction: f64) -> Self {
        self.config.min_weight_fraction_leaf = fraction;
        self
    }

    /// Sets the number of features examined per split (non-positive: all).
    pub fn max_features(mut self, max_features: i32) -> Self {
        self.config.max_features = max_features;
        self
    }

    /// Sets the leaf budget (non-positive: depth-first growth).
    pub fn max_leaf_nodes(mut self, max_leaf_nodes: i32) -> Self {
        self.config.max_leaf_nodes = max_leaf_nodes;
        self
    }

    /// Sets the sampling seed.
    pub fn random_state(mut self, seed: u64) -> Self {
        self.config.random_state = Some(seed);
        self
    }

    /// Sets the constant-feature detection tolerance.
    pub fn feature_threshold(mut self, threshold: f64) -> Self {
        self.config.feature_threshold = threshold;
        self
    }

    /// Sets per-class weights (classification only).
    pub fn class_weight(mut self, weights: Vec<f64>) -> Self {
        self.config.class_weight = Some(weights);
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
