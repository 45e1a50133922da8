//! Core data types for the Pure Rust CART implementation.
//!
//! This module defines the fundamental index types and configuration
//! enumerations shared by the criterion, splitter, tree and builder
//! components.

use crate::core::error::{CartError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sample (row) index into the feature matrix and target vector.
pub type SampleIndex = usize;

/// Feature (column) index into the feature matrix.
pub type FeatureIndex = usize;

/// Tree node identifier type.
pub type NodeIndex = usize;

/// Learning task types supported by the decision tree implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Classification task (integer-valued class labels)
    Classification,
    /// Regression task (continuous target)
    Regression,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Classification => write!(f, "classification"),
            TaskKind::Regression => write!(f, "regression"),
        }
    }
}

/// Impurity criterion types.
///
/// The criterion is resolved from its configuration name exactly once per
/// `fit` call; the per-split hot loop dispatches over a closed sum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    /// Gini impurity (classification)
    Gini,
    /// Shannon entropy (classification)
    Entropy,
    /// Mean squared error / variance (regression)
    Mse,
    /// Friedman's improved MSE split score (regression)
    FriedmanMse,
}

impl CriterionKind {
    /// Returns the task this criterion applies to.
    pub fn task(&self) -> TaskKind {
        match self {
            CriterionKind::Gini | CriterionKind::Entropy => TaskKind::Classification,
            CriterionKind::Mse | CriterionKind::FriedmanMse => TaskKind::Regression,
        }
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionKind::Gini => write!(f, "gini"),
            CriterionKind::Entropy => write!(f, "entropy"),
            CriterionKind::Mse => write!(f, "mse"),
            CriterionKind::FriedmanMse => write!(f, "friedman_mse"),
        }
    }
}

impl FromStr for CriterionKind {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gini" => Ok(CriterionKind::Gini),
            "entropy" => Ok(CriterionKind::Entropy),
            "mse" => Ok(CriterionKind::Mse),
            "friedman_mse" => Ok(CriterionKind::FriedmanMse),
            _ => Err(CartError::invalid_parameter(
                "criterion",
                s,
                "expected one of: gini, entropy, mse, friedman_mse",
            )),
        }
    }
}

/// Split search strategy types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitterKind {
    /// Exhaustive per-feature sort-and-scan search
    Best,
    /// One random threshold per sampled feature
    Random,
    /// Exhaustive search over a dataset-wide precomputed column sort
    Presort,
}

impl fmt::Display for SplitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitterKind::Best => write!(f, "best"),
            SplitterKind::Random => write!(f, "random"),
            SplitterKind::Presort => write!(f, "presort"),
        }
    }
}

impl FromStr for SplitterKind {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "best" => Ok(SplitterKind::Best),
            "random" => Ok(SplitterKind::Random),
            "presort" => Ok(SplitterKind::Presort),
            _ => Err(CartError::invalid_parameter(
                "splitter",
                s,
                "expected one of: best, random, presort",
            )),
        }
    }
}

/// Tree growth strategy, resolved from `max_leaf_nodes` at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStrategy {
    /// Stack-driven depth-first expansion, bounded by `max_depth`
    DepthFirst,
    /// Priority-queue expansion by impurity improvement, bounded by a leaf budget
    BestFirst {
        /// Maximum number of leaves the finished tree may have
        max_leaf_nodes: usize,
    },
}
