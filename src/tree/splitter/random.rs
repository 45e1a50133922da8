//! Randomized split search: one random threshold per sampled feature.

use crate::tree::splitter::{FeatureSearch, SplitRecord, SplitterState};

/// Splitter that scans each candidate feature once for its min/max and
/// draws a single uniform random threshold inside `(min, max)` instead of
/// evaluating every candidate position.
#[derive(Debug)]
pub struct RandomSplitter {
    pub(crate) state: SplitterState,
}

impl RandomSplitter {
    pub(crate) fn new(state: SplitterState) -> Self {
        RandomSplitter { state }
    }

    /// Finds a randomized split of `samples[start..end]`.
    pub fn node_split(&mut self, impurity: f64, n_constant_features: &mut usize) -> SplitRecord {
        let st = &mut self.state;
        let (start, end) = (st.start, st.end);

        let mut best = SplitRecord::no_split(end);
        let mut search = FeatureSearch::new(st.n_features, st.max_features, *n_constant_features);

        while let Some((f_j, feature)) = search.next_candidate(&mut st.features, &mut st.rng) {
            // One pass for min and max; faster than sorting.
            let mut min_feature_value = st.x[[st.samples[start], feature]];
            let mut max_feature_value = min_feature_value;
            st.feature_values[start] = min_feature_value;

            for i in (start + 1)..end {
                let value = st.x[[st.samples[i], feature]];
                st.feature_values[i] = value;

                if value < min_feature_value {
                    min_feature_value = value;
                } else if value > max_feature_value {
                    max_feature_value = value;
                }
            }

            if max_feature_value <= min_feature_value + st.feature_threshold {
                search.mark_constant(&mut st.features, f_j);
                continue;
            }

            search.mark_evaluated(&mut st.features, f_j);

            // Draw a random threshold strictly inside the value range.
            let mut threshold = st.rng.next_double(min_feature_value, max_feature_value);
            if threshold == max_feature_value {
                threshold = min_feature_value;
            }

            // Partition samples and feature values around the threshold.
            let mut p = start;
            let mut partition_end = end;
            while p < partition_end {
                let value = st.feature_values[p];
                if value <= threshold {
                    p += 1;
                } else {
                    partition_end -= 1;
                    st.feature_values[p] = st.feature_values[partition_end];
                    st.feature_values[partition_end] = value;
                    st.samples.swap(p, partition_end);
                }
            }
            let pos = partition_end;

            // Reject if min_samples_leaf is not guaranteed.
            if pos - start < st.min_samples_leaf || end - pos < st.min_samples_leaf {
                continue;
            }

            st.criterion.reset();
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

        st.partition_around(&best);
        st.record_constant_features(&search);
        *n_constant_features = search.n_total_constants;

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

    fn split_root(x: &Array2<f64>, y: &Array1<f64>, seed: u64) -> (RandomSplitter, SplitRecord) {
        let criterion = Criterion::new(CriterionKind::Gini, 2).unwrap();
        let state = SplitterState::new(
            criterion,
            x.ncols(),
            1,
            0.0,
            DEFAULT_FEATURE_THRESHOLD,
            Random::with_seed(seed),
        );
        let mut splitter = RandomSplitter::new(state);
        splitter.state.init(x, y, None).unwrap();
        splitter.state.node_reset(0, x.nrows());
        let impurity = splitter.state.criterion.node_impurity();
        let mut n_constant = 0;
        let split = splitter.node_split(impurity, &mut n_constant);
        (splitter, split)
    }

    #[test]
    fn test_threshold_stays_inside_value_range() {
        let x = Array2::from_shape_fn((20, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(20, |i| if i < 10 { 0.0 } else { 1.0 });

        for seed in 0..20 {
            let (_, split) = split_root(&x, &y, seed);
            assert!(split.pos < 20, "a non-constant feature must split");
            assert!(split.threshold >= 0.0);
            assert!(split.threshold < 19.0);
        }
    }

    #[test]
    fn test_partition_matches_threshold() {
        let x = array![[4.0], [1.0], [9.0], [0.0], [7.0], [3.0]];
        let y = array![1.0, 0.0, 1.0, 0.0, 1.0, 0.0];

        let (splitter, split) = split_root(&x, &y, 11);
        assert!(split.pos < 6);
        let samples = &splitter.state.samples;
        for &i in &samples[..split.pos] {
            assert!(x[[i, 0]] <= split.threshold);
        }
        for &i in &samples[split.pos..] {
            assert!(x[[i, 0]] > split.threshold);
        }
    }

    #[test]
    fn test_constant_feature_is_skipped() {
        let x = array![[1.0, 2.2], [2.0, 2.2], [3.0, 2.2], [4.0, 2.2]];
        let y = array![0.0, 0.0, 1.0, 1.0];

        let (_, split) = split_root(&x, &y, 5);
        assert_eq!(split.feature, 0);
    }

    #[test]
    fn test_same_seed_reproduces_split() {
        let x = Array2::from_shape_fn((16, 3), |(i, j)| ((i * 7 + j * 3) % 13) as f64);
        let y = Array1::from_shape_fn(16, |i| (i % 2) as f64);

        let (_, a) = split_root(&x, &y, 99);
        let (_, b) = split_root(&x, &y, 99);
        assert_eq!(a.feature, b.feature);
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.threshold, b.threshold);
    }
}
