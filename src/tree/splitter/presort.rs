//! Exhaustive best-split search over a dataset-wide precomputed sort.
//!
//! Instead of sorting the active range per node, the per-column sorted row
//! order is computed once at `init`; each node extracts its own ordering
//! by filtering the global order through a sample mask.

use crate::core::error::Result;
use crate::core::types::SampleIndex;
use crate::tree::splitter::{FeatureSearch, SplitRecord, SplitterState};
use crate::utils::sort_permutation;
use ndarray::{Array1, Array2};

/// Best-split search that reuses a global per-column argsort.
#[derive(Debug)]
pub struct PresortBestSplitter {
    pub(crate) state: SplitterState,
    /// Per feature: all row indices sorted by that feature's value
    x_argsorted: Vec<Vec<SampleIndex>>,
    /// Total number of rows in the training matrix (before weight filtering)
    n_total_samples: usize,
    sample_mask: Vec<bool>,
}

impl PresortBestSplitter {
    pub(crate) fn new(state: SplitterState) -> Self {
        PresortBestSplitter {
            state,
            x_argsorted: Vec::new(),
            n_total_samples: 0,
            sample_mask: Vec::new(),
        }
    }

    /// Initializes the base state and precomputes the per-column sort.
    pub(crate) fn init(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        sample_weight: Option<&Array1<f64>>,
    ) -> Result<()> {
        self.state.init(x, y, sample_weight)?;

        self.n_total_samples = x.nrows();
        self.sample_mask = vec![false; self.n_total_samples];

        self.x_argsorted = (0..self.state.n_features)
            .map(|feature| {
                let column: Vec<f64> = x.column(feature).to_vec();
                sort_permutation(&column)
            })
            .collect();

        Ok(())
    }

    /// Finds the best split of `samples[start..end]` using the global sort.
    pub fn node_split(&mut self, impurity: f64, n_constant_features: &mut usize) -> SplitRecord {
        let st = &mut self.state;
        let (start, end) = (st.start, st.end);

        let mut best = SplitRecord::no_split(end);
        let mut search = FeatureSearch::new(st.n_features, st.max_features, *n_constant_features);

        for p in start..end {
            self.sample_mask[st.samples[p]] = true;
        }

        while let Some((f_j, feature)) = search.next_candidate(&mut st.features, &mut st.rng) {
            // Extract this node's ordering from the global argsort.
            let mut p = start;
            for &row in &self.x_argsorted[feature] {
                if self.sample_mask[row] {
                    st.samples[p] = row;
                    st.feature_values[p] = st.x[[row, feature]];
                    p += 1;
                }
            }
            debug_assert_eq!(p, end);

            if st.feature_values[end - 1] <= st.feature_values[start] + st.feature_threshold {
                search.mark_constant(&mut st.features, f_j);
                continue;
            }

            search.mark_evaluated(&mut st.features, f_j);

            // Evaluate all splits between adjacent distinct values.
            st.criterion.reset();
            let mut p = start;

            while p < end {
                while p + 1 < end
                    && st.feature_values[p + 1] <= st.feature_values[p] + st.feature_threshold
                {
                    p += 1;
                }
                p += 1;

                if p >= end {
                    break;
                }
                let pos = p;

                // Reject if min_samples_leaf is not guaranteed.
                if pos - start < st.min_samples_leaf || end - pos < st.min_samples_leaf {
                    continue;
                }

                st.criterion
                    .update(&st.y, st.sample_weight.as_ref(), &st.samples, pos);

                // Reject if min_weight_leaf is not satisfied.
                if st.criterion.weighted_n_left() < st.min_weight_leaf
                    || st.criterion.weighted_n_right() < st.min_weight_leaf
                {
                    continue;
                }

                let improvement = st.criterion.impurity_improvement(impurity);

                if improvement > best.improvement {
                    let (impurity_left, impurity_right) = st.criterion.children_impurity();

                    let mut threshold =
                        (st.feature_values[p - 1] + st.feature_values[p]) / 2.0;
                    if threshold == st.feature_values[p] {
                        threshold = st.feature_values[p - 1];
                    }

                    best = SplitRecord {
                        feature,
                        pos,
                        threshold,
                        improvement,
                        impurity_left,
                        impurity_right,
                    };
                }
            }
        }

        st.partition_around(&best);
        st.record_constant_features(&search);
        *n_constant_features = search.n_total_constants;

        // The mask must not leak into the sibling's search.
        for p in start..end {
            self.sample_mask[st.samples[p]] = false;
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::DEFAULT_FEATURE_THRESHOLD;
    use crate::core::random::Random;
    use crate::core::types::CriterionKind;
    use crate::tree::criterion::Criterion;
    use ndarray::{array, Array1, Array2};

    fn make(x: &Array2<f64>, y: &Array1<f64>) -> PresortBestSplitter {
        let criterion = Criterion::new(CriterionKind::Gini, 2).unwrap();
        let state = SplitterState::new(
            criterion,
            x.ncols(),
            1,
            0.0,
            DEFAULT_FEATURE_THRESHOLD,
            Random::with_seed(21),
        );
        let mut splitter = PresortBestSplitter::new(state);
        splitter.init(x, y, None).unwrap();
        splitter
    }

    #[test]
    fn test_matches_midpoint_scenario() {
        let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(10, |i| if i < 5 { 0.0 } else { 1.0 });

        let mut splitter = make(&x, &y);
        splitter.state.node_reset(0, 10);
        let impurity = splitter.state.criterion.node_impurity();
        let mut n_constant = 0;
        let split = splitter.node_split(impurity, &mut n_constant);

        assert_eq!(split.pos, 5);
        assert!(split.threshold > 4.0 && split.threshold < 5.0);
        assert!(split.impurity_left.abs() < 1e-12);
        assert!(split.impurity_right.abs() < 1e-12);
    }

    #[test]
    fn test_mask_is_cleared_between_nodes() {
        let x = array![
            [0.0, 5.0],
            [1.0, 1.0],
            [2.0, 4.0],
            [3.0, 2.0],
            [4.0, 8.0],
            [5.0, 3.0],
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut splitter = make(&x, &y);
        splitter.state.node_reset(0, 6);
        let impurity = splitter.state.criterion.node_impurity();
        let mut n_constant = 0;
        let split = splitter.node_split(impurity, &mut n_constant);
        assert_eq!(split.pos, 3);
        assert!(splitter.sample_mask.iter().all(|&m| !m));

        // Recurse into the left child; the extraction must only see its rows.
        let left_rows: std::collections::HashSet<usize> =
            splitter.state.samples[..3].iter().copied().collect();
        splitter.state.node_reset(0, split.pos);
        let child_impurity = splitter.state.criterion.node_impurity();
        let mut n_constant_child = 0;
        let _ = splitter.node_split(child_impurity, &mut n_constant_child);

        let after: std::collections::HashSet<usize> =
            splitter.state.samples[..3].iter().copied().collect();
        assert_eq!(after, left_rows);
        assert!(splitter.sample_mask.iter().all(|&m| !m));
    }

    #[test]
    fn test_extraction_orders_active_range() {
        let x = array![[3.0], [0.0], [2.0], [5.0], [1.0], [4.0]];
        let y = array![1.0, 0.0, 0.0, 1.0, 0.0, 1.0];

        let mut splitter = make(&x, &y);
        splitter.state.node_reset(0, 6);
        let impurity = splitter.state.criterion.node_impurity();
        let mut n_constant = 0;
        let split = splitter.node_split(impurity, &mut n_constant);

        // Values <= 2 are class 0, > 2 class 1: perfect split at pos 3.
        assert_eq!(split.pos, 3);
        assert!(split.threshold > 2.0 && split.threshold < 3.0);
    }
}
