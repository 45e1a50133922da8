//! Classification criteria: Gini impurity and Shannon entropy.
//!
//! Both share a weighted class-histogram base. The target vector must hold
//! class indices in `0..n_classes` (the model wrapper maps arbitrary
//! numeric labels to indices before building).

use crate::core::types::{CriterionKind, SampleIndex};
use crate::tree::criterion::weighted_improvement;
use ndarray::Array1;

/// Running weighted class-histogram statistics for a node and its movable
/// split point.
#[derive(Debug, Clone)]
pub struct ClassificationCriterion {
    kind: CriterionKind,
    n_classes: usize,

    pub(crate) start: usize,
    pub(crate) pos: usize,
    pub(crate) end: usize,

    /// Weighted number of samples in the whole training set
    pub(crate) weighted_n_samples: f64,
    /// Weighted number of samples in the node
    pub(crate) weighted_n_node_samples: f64,
    /// Weighted number of samples in `[start, pos)`
    pub(crate) weighted_n_left: f64,
    /// Weighted number of samples in `[pos, end)`
    pub(crate) weighted_n_right: f64,

    label_count_total: Vec<f64>,
    label_count_left: Vec<f64>,
    label_count_right: Vec<f64>,
}

impl ClassificationCriterion {
    /// Creates an empty criterion for `n_classes` classes.
    ///
    /// `kind` must be one of the classification kinds.
    pub fn new(kind: CriterionKind, n_classes: usize) -> Self {
        debug_assert!(matches!(
            kind,
            CriterionKind::Gini | CriterionKind::Entropy
        ));
        ClassificationCriterion {
            kind,
            n_classes,
            start: 0,
            pos: 0,
            end: 0,
            weighted_n_samples: 0.0,
            weighted_n_node_samples: 0.0,
            weighted_n_left: 0.0,
            weighted_n_right: 0.0,
            label_count_total: vec![0.0; n_classes],
            label_count_left: vec![0.0; n_classes],
            label_count_right: vec![0.0; n_classes],
        }
    }

    /// Initializes the criterion on node `samples[start..end]`.
    pub fn init(
        &mut self,
        y: &Array1<f64>,
        sample_weight: Option<&Array1<f64>>,
        weighted_n_samples: f64,
        samples: &[SampleIndex],
        start: usize,
        end: usize,
    ) {
        self.start = start;
        self.end = end;
        self.weighted_n_samples = weighted_n_samples;

        self.label_count_total.iter_mut().for_each(|c| *c = 0.0);
        let mut weighted_n_node_samples = 0.0;

        for &index in &samples[start..end] {
            let w = sample_weight.map_or(1.0, |sw| sw[index]);
            let class = y[index] as usize;
            self.label_count_total[class] += w;
            weighted_n_node_samples += w;
        }
        self.weighted_n_node_samples = weighted_n_node_samples;

        self.reset();
    }

    /// Resets the split point to `start`.
    pub fn reset(&mut self) {
        self.pos = self.start;

        self.weighted_n_left = 0.0;
        self.weighted_n_right = self.weighted_n_node_samples;

        for class in 0..self.n_classes {
            self.label_count_left[class] = 0.0;
            self.label_count_right[class] = self.label_count_total[class];
        }
    }

    /// Moves the statistics of `samples[pos..new_pos]` from right to left.
    pub fn update(
        &mut self,
        y: &Array1<f64>,
        sample_weight: Option<&Array1<f64>>,
        samples: &[SampleIndex],
        new_pos: usize,
    ) {
        let mut diff_w = 0.0;
        for &index in &samples[self.pos..new_pos] {
            let w = sample_weight.map_or(1.0, |sw| sw[index]);
            let class = y[index] as usize;
            self.label_count_left[class] += w;
            self.label_count_right[class] -= w;
            diff_w += w;
        }
        self.weighted_n_left += diff_w;
        self.weighted_n_right -= diff_w;

        self.pos = new_pos;
    }

    /// Impurity of the node `samples[start..end]`.
    pub fn node_impurity(&self) -> f64 {
        match self.kind {
            CriterionKind::Gini => {
                gini_impurity(&self.label_count_total, self.weighted_n_node_samples)
            }
            CriterionKind::Entropy => {
                entropy_impurity(&self.label_count_total, self.weighted_n_node_samples)
            }
            _ => unreachable!("constructed with a classification kind"),
        }
    }

    /// Impurity of the children `(left, right)` at the current split point.
    pub fn children_impurity(&self) -> (f64, f64) {
        match self.kind {
            CriterionKind::Gini => (
                gini_impurity(&self.label_count_left, self.weighted_n_left),
                gini_impurity(&self.label_count_right, self.weighted_n_right),
            ),
            CriterionKind::Entropy => (
                entropy_impurity(&self.label_count_left, self.weighted_n_left),
                entropy_impurity(&self.label_count_right, self.weighted_n_right),
            ),
            _ => unreachable!("constructed with a classification kind"),
        }
    }

    /// Un-normalized weighted class histogram of the node.
    pub fn node_value(&self) -> Vec<f64> {
        self.label_count_total.clone()
    }

    /// Weighted impurity improvement of the current split point.
    pub fn impurity_improvement(&self, impurity: f64) -> f64 {
        let (impurity_left, impurity_right) = self.children_impurity();
        weighted_improvement(
            self.weighted_n_samples,
            self.weighted_n_node_samples,
            self.weighted_n_left,
            self.weighted_n_right,
            impurity,
            impurity_left,
            impurity_right,
        )
    }
}

fn gini_impurity(label_counts: &[f64], weighted_n: f64) -> f64 {
    let mut sq_count = 0.0;
    for &count in label_counts {
        sq_count += count * count;
    }
    1.0 - sq_count / (weighted_n * weighted_n)
}

fn entropy_impurity(label_counts: &[f64], weighted_n: f64) -> f64 {
    let mut entropy = 0.0;
    for &count in label_counts {
        if count > 0.0 {
            let p = count / weighted_n;
            entropy -= p * p.ln();
        }
    }
    entropy
}
