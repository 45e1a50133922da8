//! Exhaustive best-split search with per-node sorting.

use crate::tree::splitter::{FeatureSearch, SplitRecord, SplitterState};
use crate::utils::sort_by_values;

/// Splitter that sorts each candidate feature's values within the node and
/// scans every adjacent pair of distinct values as a candidate threshold.
#[derive(Debug)]
pub struct BestSplitter {
    pub(crate) state: SplitterState,
}

impl BestSplitter {
    pub(crate) fn new(state: SplitterState) -> Self {
        BestSplitter { state }
    }

    /// Finds the best split of `samples[start..end]`.
    pub fn node_split(&mut self, impurity: f64, n_constant_features: &mut usize) -> SplitRecord {
        let st = &mut self.state;
        let (start, end) = (st.start, st.end);

        let mut best = SplitRecord::no_split(end);
        let mut search = FeatureSearch::new(st.n_features, st.max_features, *n_constant_features);

        while let Some((f_j, feature)) = search.next_candidate(&mut st.features, &mut st.rng) {
            // Copy the feature values for the active samples so the sort
            // works on a contiguous buffer.
            for i in start..end {
                st.feature_values[i] = st.x[[st.samples[i], feature]];
            }
            sort_by_values(
                &mut st.feature_values[start..end],
                &mut st.samples[start..end],
            );

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

        best
    }
}
