//! Regression criteria: mean squared error and Friedman's MSE.
//!
//! Both share weighted sum and sum-of-squares accumulators; the node
//! impurity is the weighted variance `E[y^2] - E[y]^2`. FriedmanMSE reuses
//! the MSE impurity but overrides the improvement with Friedman's
//! mean-separation score used by gradient boosting.

use crate::core::types::{CriterionKind, SampleIndex};
use crate::tree::criterion::weighted_improvement;
use ndarray::Array1;

/// Running weighted sum / sum-of-squares statistics for a node and its
/// movable split point.
#[derive(Debug, Clone)]
pub struct RegressionCriterion {
    kind: CriterionKind,

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

    sum_total: f64,
    sq_sum_total: f64,
    mean_total: f64,

    sum_left: f64,
    sum_right: f64,
    sq_sum_left: f64,
    sq_sum_right: f64,
    mean_left: f64,
    mean_right: f64,
    var_left: f64,
    var_right: f64,
}

impl RegressionCriterion {
    /// Creates an empty regression criterion.
    ///
    /// `kind` must be one of the regression kinds.
    pub fn new(kind: CriterionKind) -> Self {
        debug_assert!(matches!(
            kind,
            CriterionKind::Mse | CriterionKind::FriedmanMse
        ));
        RegressionCriterion {
            kind,
            start: 0,
            pos: 0,
            end: 0,
            weighted_n_samples: 0.0,
            weighted_n_node_samples: 0.0,
            weighted_n_left: 0.0,
            weighted_n_right: 0.0,
            sum_total: 0.0,
            sq_sum_total: 0.0,
            mean_total: 0.0,
            sum_left: 0.0,
            sum_right: 0.0,
            sq_sum_left: 0.0,
            sq_sum_right: 0.0,
            mean_left: 0.0,
            mean_right: 0.0,
            var_left: 0.0,
            var_right: 0.0,
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

        self.sum_total = 0.0;
        self.sq_sum_total = 0.0;
        let mut weighted_n_node_samples = 0.0;

        for &index in &samples[start..end] {
            let w = sample_weight.map_or(1.0, |sw| sw[index]);
            let y_i = y[index];
            let w_y_i = w * y_i;
            self.sum_total += w_y_i;
            self.sq_sum_total += w_y_i * y_i;
            weighted_n_node_samples += w;
        }
        self.weighted_n_node_samples = weighted_n_node_samples;
        self.mean_total = self.sum_total / weighted_n_node_samples;

        self.reset();
    }

    /// Resets the split point to `start`.
    pub fn reset(&mut self) {
        self.pos = self.start;

        self.sum_left = 0.0;
        self.sum_right = self.sum_total;
        self.sq_sum_left = 0.0;
        self.sq_sum_right = self.sq_sum_total;
        self.mean_left = 0.0;
        self.mean_right = self.mean_total;
        self.var_left = 0.0;
        self.var_right =
            self.sq_sum_total / self.weighted_n_node_samples - self.mean_total * self.mean_total;

        self.weighted_n_left = 0.0;
        self.weighted_n_right = self.weighted_n_node_samples;
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
            let y_i = y[index];
            let w_y_i = w * y_i;

            self.sum_left += w_y_i;
            self.sum_right -= w_y_i;
            self.sq_sum_left += w_y_i * y_i;
            self.sq_sum_right -= w_y_i * y_i;

            diff_w += w;
        }
        self.weighted_n_left += diff_w;
        self.weighted_n_right -= diff_w;

        self.mean_left = self.sum_left / self.weighted_n_left;
        self.mean_right = self.sum_right / self.weighted_n_right;
        self.var_left = self.sq_sum_left / self.weighted_n_left - self.mean_left * self.mean_left;
        self.var_right =
            self.sq_sum_right / self.weighted_n_right - self.mean_right * self.mean_right;

        self.pos = new_pos;
    }

    /// Weighted variance of the node `samples[start..end]`.
    pub fn node_impurity(&self) -> f64 {
        self.sq_sum_total / self.weighted_n_node_samples - self.mean_total * self.mean_total
    }

    /// Weighted variances of the children `(left, right)`.
    pub fn children_impurity(&self) -> (f64, f64) {
        (self.var_left, self.var_right)
    }

    /// Single-element weighted mean of the node.
    pub fn node_value(&self) -> Vec<f64> {
        vec![self.mean_total]
    }

    /// Weighted impurity improvement of the current split point.
    ///
    /// FriedmanMSE scores `w_l * w_r / (w_l + w_r) * (mean_l - mean_r)^2`,
    /// independent of the parent impurity.
    pub fn impurity_improvement(&self, impurity: f64) -> f64 {
        match self.kind {
            CriterionKind::FriedmanMse => {
                let diff = self.sum_left / self.weighted_n_left
                    - self.sum_right / self.weighted_n_right;
                self.weighted_n_left * self.weighted_n_right * diff * diff
                    / (self.weighted_n_left + self.weighted_n_right)
            }
            _ => {
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_node_impurity_is_variance() {
        let y = array![1.0, 2.0, 3.0, 4.0];
        let samples: Vec<usize> = (0..4).collect();

        let mut criterion = RegressionCriterion::new(CriterionKind::Mse);
        criterion.init(&y, None, 4.0, &samples, 0, 4);

        // mean 2.5, E[y^2] = 7.5, var = 1.25
        assert_relative_eq!(criterion.node_impurity(), 1.25, epsilon = 1e-12);
        assert_eq!(criterion.node_value(), vec![2.5]);
    }

    #[test]
    fn test_constant_target_has_zero_impurity() {
        let y = array![3.0, 3.0, 3.0];
        let samples: Vec<usize> = (0..3).collect();

        let mut criterion = RegressionCriterion::new(CriterionKind::Mse);
        criterion.init(&y, None, 3.0, &samples, 0, 3);
        assert_relative_eq!(criterion.node_impurity(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_children_variance_after_update() {
        let y = array![0.0, 0.0, 4.0, 8.0];
        let samples: Vec<usize> = (0..4).collect();

        let mut criterion = RegressionCriterion::new(CriterionKind::Mse);
        criterion.init(&y, None, 4.0, &samples, 0, 4);
        criterion.update(&y, None, &samples, 2);

        let (left, right) = criterion.children_impurity();
        assert_relative_eq!(left, 0.0, epsilon = 1e-12);
        // right: values 4, 8 -> mean 6, var 4
        assert_relative_eq!(right, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_friedman_rewards_mean_separation() {
        // Unequal child counts, distinct child means.
        let y = array![0.0, 0.0, 1.0, 5.0];
        let samples: Vec<usize> = (0..4).collect();

        let mut mse = RegressionCriterion::new(CriterionKind::Mse);
        mse.init(&y, None, 4.0, &samples, 0, 4);
        mse.update(&y, None, &samples, 3);

        let mut friedman = RegressionCriterion::new(CriterionKind::FriedmanMse);
        friedman.init(&y, None, 4.0, &samples, 0, 4);
        friedman.update(&y, None, &samples, 3);

        let parent = mse.node_impurity();
        let generic = mse.impurity_improvement(parent);
        let friedman_score = friedman.impurity_improvement(parent);

        // w_l = 3, w_r = 1, diff = 1/3 - 5: score = 0.75 * (14/3)^2.
        assert_relative_eq!(
            friedman_score,
            0.75 * (14.0f64 / 3.0).powi(2),
            epsilon = 1e-9
        );
        assert!(friedman_score > generic);
    }

    #[test]
    fn test_weighted_statistics() {
        let y = array![1.0, 3.0];
        let w = array![3.0, 1.0];
        let samples: Vec<usize> = vec![0, 1];

        let mut criterion = RegressionCriterion::new(CriterionKind::Mse);
        criterion.init(&y, Some(&w), 4.0, &samples, 0, 2);

        // weighted mean = (3 + 3) / 4 = 1.5
        assert_relative_eq!(criterion.node_value()[0], 1.5, epsilon = 1e-12);
        // E[y^2] = (3*1 + 1*9)/4 = 3 -> var = 3 - 2.25
        assert_relative_eq!(criterion.node_impurity(), 0.75, epsilon = 1e-12);
    }
}
