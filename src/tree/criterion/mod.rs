//! Impurity criteria for split evaluation.
//!
//! A criterion maintains running weighted statistics over a contiguous
//! sample range `samples[start..end]` and a movable split point `pos`.
//! Statistics for the left side `[start, pos)` and right side `[pos, end)`
//! are updated incrementally as `pos` advances monotonically within one
//! split search; they are never recomputed from scratch.
//!
//! The concrete variant is selected once per `fit` from the configuration
//! name; the per-split hot loop dispatches over this closed sum type.

pub mod classification;
pub mod regression;

pub use classification::ClassificationCriterion;
pub use regression::RegressionCriterion;

use crate::core::error::{CartError, Result};
use crate::core::types::{CriterionKind, SampleIndex, TaskKind};
use ndarray::Array1;

/// Impurity criterion, polymorphic over the classification and regression
/// statistic bases.
#[derive(Debug, Clone)]
pub enum Criterion {
    /// Weighted class-histogram statistics (Gini, Entropy)
    Classification(ClassificationCriterion),
    /// Weighted sum / sum-of-squares statistics (MSE, FriedmanMSE)
    Regression(RegressionCriterion),
}

impl Criterion {
    /// Creates a criterion for the given kind.
    ///
    /// `n_classes` is required for classification kinds and ignored for
    /// regression kinds.
    pub fn new(kind: CriterionKind, n_classes: usize) -> Result<Self> {
        match kind.task() {
            TaskKind::Classification => {
                if n_classes < 1 {
                    return Err(CartError::dataset(
                        "classification requires at least one class",
                    ));
                }
                Ok(Criterion::Classification(ClassificationCriterion::new(
                    kind, n_classes,
                )))
            }
            TaskKind::Regression => Ok(Criterion::Regression(RegressionCriterion::new(kind))),
        }
    }

    /// Initializes the criterion on node `samples[start..end]`.
    ///
    /// Computes the node-level totals and then [`reset`](Self::reset)s the
    /// split point to `start`.
    pub fn init(
        &mut self,
        y: &Array1<f64>,
        sample_weight: Option<&Array1<f64>>,
        weighted_n_samples: f64,
        samples: &[SampleIndex],
        start: usize,
        end: usize,
    ) {
        match self {
            Criterion::Classification(c) => {
                c.init(y, sample_weight, weighted_n_samples, samples, start, end)
            }
            Criterion::Regression(c) => {
                c.init(y, sample_weight, weighted_n_samples, samples, start, end)
            }
        }
    }

    /// Resets the split point to `start`, moving all weight to the right.
    pub fn reset(&mut self) {
        match self {
            Criterion::Classification(c) => c.reset(),
            Criterion::Regression(c) => c.reset(),
        }
    }

    /// Moves the statistics of `samples[pos..new_pos]` from the right child
    /// to the left child. `new_pos` must not decrease and must stay within
    /// `[start, end]`; violating this is a caller bug.
    pub fn update(
        &mut self,
        y: &Array1<f64>,
        sample_weight: Option<&Array1<f64>>,
        samples: &[SampleIndex],
        new_pos: usize,
    ) {
        match self {
            Criterion::Classification(c) => c.update(y, sample_weight, samples, new_pos),
            Criterion::Regression(c) => c.update(y, sample_weight, samples, new_pos),
        }
    }

    /// Impurity of the node `samples[start..end]`.
    pub fn node_impurity(&self) -> f64 {
        match self {
            Criterion::Classification(c) => c.node_impurity(),
            Criterion::Regression(c) => c.node_impurity(),
        }
    }

    /// Impurity of the children `(left, right)` at the current split point.
    ///
    /// Must not be called while either side is empty.
    pub fn children_impurity(&self) -> (f64, f64) {
        match self {
            Criterion::Classification(c) => c.children_impurity(),
            Criterion::Regression(c) => c.children_impurity(),
        }
    }

    /// Value of the node: the un-normalized weighted class histogram for
    /// classification, the single-element weighted mean for regression.
    pub fn node_value(&self) -> Vec<f64> {
        match self {
            Criterion::Classification(c) => c.node_value(),
            Criterion::Regression(c) => c.node_value(),
        }
    }

    /// Weighted impurity improvement of the current split point:
    ///
    /// ```text
    /// N_t / N * (impurity - N_t_R / N_t * right impurity
    ///                     - N_t_L / N_t * left impurity)
    /// ```
    ///
    /// FriedmanMSE overrides this with Friedman's mean-separation score,
    /// which does not depend on the parent impurity.
    pub fn impurity_improvement(&self, impurity: f64) -> f64 {
        match self {
            Criterion::Classification(c) => c.impurity_improvement(impurity),
            Criterion::Regression(c) => c.impurity_improvement(impurity),
        }
    }

    /// Weighted number of samples currently on the left side.
    pub fn weighted_n_left(&self) -> f64 {
        match self {
            Criterion::Classification(c) => c.weighted_n_left,
            Criterion::Regression(c) => c.weighted_n_left,
        }
    }

    /// Weighted number of samples currently on the right side.
    pub fn weighted_n_right(&self) -> f64 {
        match self {
            Criterion::Classification(c) => c.weighted_n_right,
            Criterion::Regression(c) => c.weighted_n_right,
        }
    }

    /// Weighted number of samples in the node.
    pub fn weighted_n_node_samples(&self) -> f64 {
        match self {
            Criterion::Classification(c) => c.weighted_n_node_samples,
            Criterion::Regression(c) => c.weighted_n_node_samples,
        }
    }
}

/// Shared generic improvement formula over the positional weights.
pub(crate) fn weighted_improvement(
    weighted_n_samples: f64,
    weighted_n_node_samples: f64,
    weighted_n_left: f64,
    weighted_n_right: f64,
    impurity: f64,
    impurity_left: f64,
    impurity_right: f64,
) -> f64 {
    (weighted_n_node_samples / weighted_n_samples)
        * (impurity
            - weighted_n_right / weighted_n_node_samples * impurity_right
            - weighted_n_left / weighted_n_node_samples * impurity_left)
}
