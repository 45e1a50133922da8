//! Split search over features and thresholds.
//!
//! The splitter owns the sample-index permutation: samples contained in one
//! tree node always occupy a contiguous range `samples[start..end]`, and
//! `node_split` reorganizes that range in place into a left sub-range
//! (feature value `<=` threshold) followed by a right sub-range.
//!
//! The `features` array supports sampling without replacement via a
//! Fisher-Yates style permutation with four bookkeeping zones:
//!
//! - `[0, n_drawn_constants)` drawn and known-constant features;
//! - `[n_drawn_constants, n_known_constants)` known-constant features not
//!   yet drawn;
//! - `[n_known_constants, n_total_constants)` newly found constant features;
//! - `[n_total_constants, f_i)` undrawn candidate features;
//! - `[f_i, n_features)` drawn non-constant features.
//!
//! Features detected as constant by ancestor nodes are never re-evaluated;
//! `constant_features[..n_constant_features]` carries them down the tree.
//! Impurity computations are delegated to a [`Criterion`].

pub mod best;
pub mod presort;
pub mod random;

pub use best::BestSplitter;
pub use presort::PresortBestSplitter;
pub use random::RandomSplitter;

use crate::core::error::{CartError, Result};
use crate::core::random::Random;
use crate::core::types::{FeatureIndex, SampleIndex, SplitterKind};
use crate::tree::criterion::Criterion;
use ndarray::{Array1, Array2};

/// Result of one split search over one sample range.
///
/// `pos == end` signals that no valid split was found and the range must
/// become a leaf.
#[derive(Debug, Clone, Copy)]
pub struct SplitRecord {
    /// Feature the winning split tests
    pub feature: FeatureIndex,
    /// Partition boundary: left child is `[start, pos)`, right `[pos, end)`
    pub pos: usize,
    /// Threshold of the `<=` test
    pub threshold: f64,
    /// Weighted impurity improvement over the parent
    pub improvement: f64,
    /// Impurity of the left child
    pub impurity_left: f64,
    /// Impurity of the right child
    pub impurity_right: f64,
}

impl SplitRecord {
    /// A record signalling "no valid split" for a node ending at `end`.
    pub fn no_split(end: usize) -> Self {
        SplitRecord {
            feature: 0,
            pos: end,
            threshold: 0.0,
            improvement: f64::NEG_INFINITY,
            impurity_left: f64::INFINITY,
            impurity_right: f64::INFINITY,
        }
    }
}

/// State shared by every splitter variant.
#[derive(Debug)]
pub(crate) struct SplitterState {
    pub(crate) criterion: Criterion,
    pub(crate) max_features: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) min_weight_leaf: f64,
    pub(crate) feature_threshold: f64,
    pub(crate) rng: Random,

    /// Number of retained (nonzero-weight) samples
    pub(crate) n_samples: usize,
    pub(crate) n_features: usize,
    /// Permutation of the retained sample row indices
    pub(crate) samples: Vec<SampleIndex>,
    /// Permutation of the feature column indices
    pub(crate) features: Vec<FeatureIndex>,
    /// Prefix holds features constant for the current node and ancestors
    pub(crate) constant_features: Vec<FeatureIndex>,
    /// Scratch buffer of one feature's values for the active range
    pub(crate) feature_values: Vec<f64>,
    /// Weighted number of samples in the whole training set
    pub(crate) weighted_n_samples: f64,

    pub(crate) start: usize,
    pub(crate) end: usize,

    pub(crate) x: Array2<f64>,
    pub(crate) y: Array1<f64>,
    pub(crate) sample_weight: Option<Array1<f64>>,
}

impl SplitterState {
    pub(crate) fn new(
        criterion: Criterion,
        max_features: usize,
        min_samples_leaf: usize,
        min_weight_leaf: f64,
        feature_threshold: f64,
        rng: Random,
    ) -> Self {
        SplitterState {
            criterion,
            max_features,
            min_samples_leaf,
            min_weight_leaf,
            feature_threshold,
            rng,
            n_samples: 0,
            n_features: 0,
            samples: Vec::new(),
            features: Vec::new(),
            constant_features: Vec::new(),
            feature_values: Vec::new(),
            weighted_n_samples: 0.0,
            start: 0,
            end: 0,
            x: Array2::zeros((0, 0)),
            y: Array1::zeros(0),
            sample_weight: None,
        }
    }

    /// Binds the training data, builds the initial sample and feature
    /// permutations, and computes the total sample weight.
    pub(crate) fn init(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        sample_weight: Option<&Array1<f64>>,
    ) -> Result<()> {
        let n_rows = x.nrows();
        self.n_features = x.ncols();

        if y.len() != n_rows {
            return Err(CartError::data_dimension_mismatch(format!(
                "feature matrix has {} rows but target vector has {} entries",
                n_rows,
                y.len()
            )));
        }
        if let Some(weights) = sample_weight {
            if weights.len() != n_rows {
                return Err(CartError::dimension_mismatch(
                    n_rows.to_string(),
                    weights.len().to_string(),
                ));
            }
        }

        // Retain rows with nonzero weight; the total weight still sums over
        // every row.
        self.samples.clear();
        self.weighted_n_samples = 0.0;
        for i in 0..n_rows {
            match sample_weight {
                Some(weights) => {
                    if weights[i] != 0.0 {
                        self.samples.push(i);
                    }
                    self.weighted_n_samples += weights[i];
                }
                None => {
                    self.samples.push(i);
                    self.weighted_n_samples += 1.0;
                }
            }
        }
        self.n_samples = self.samples.len();

        self.features = (0..self.n_features).collect();
        self.constant_features = vec![0; self.n_features];
        self.feature_values = vec![0.0; self.n_samples];

        self.x = x.clone();
        self.y = y.clone();
        self.sample_weight = sample_weight.cloned();

        Ok(())
    }

    /// Rebinds the criterion to `samples[start..end]` and returns the
    /// node's weighted sample count.
    pub(crate) fn node_reset(&mut self, start: usize, end: usize) -> f64 {
        self.start = start;
        self.end = end;

        self.criterion.init(
            &self.y,
            self.sample_weight.as_ref(),
            self.weighted_n_samples,
            &self.samples,
            start,
            end,
        );

        self.criterion.weighted_n_node_samples()
    }

    /// Repartitions `samples[start..end]` around the winning split so rows
    /// with feature value `<=` threshold come first. No-op when the record
    /// signals "no split".
    pub(crate) fn partition_around(&mut self, best: &SplitRecord) {
        if best.pos < self.end {
            let mut p = self.start;
            let mut partition_end = self.end;

            while p < partition_end {
                if self.x[[self.samples[p], best.feature]] <= best.threshold {
                    p += 1;
                } else {
                    partition_end -= 1;
                    self.samples.swap(p, partition_end);
                }
            }
        }
    }

    /// Restores the original order of the known-constant prefix (required
    /// by sibling and child nodes) and records the newly found constants.
    pub(crate) fn record_constant_features(&mut self, search: &FeatureSearch) {
        let n_known = search.n_known_constants;
        let n_total = search.n_total_constants;

        self.features[..n_known].copy_from_slice(&self.constant_features[..n_known]);
        self.constant_features[n_known..n_total].copy_from_slice(&self.features[n_known..n_total]);
    }
}

/// The Fisher-Yates feature-sampling bookkeeping shared by all variants.
///
/// Draws up to `max_features` features without replacement, skipping the
/// impurity evaluation for features already known to be constant and
/// requiring at least one drawn feature to be non-constant.
#[derive(Debug)]
pub(crate) struct FeatureSearch {
    n_visited_features: usize,
    n_found_constants: usize,
    n_drawn_constants: usize,
    pub(crate) n_known_constants: usize,
    pub(crate) n_total_constants: usize,
    f_i: usize,
    max_features: usize,
}

impl FeatureSearch {
    pub(crate) fn new(n_features: usize, max_features: usize, n_known_constants: usize) -> Self {
        FeatureSearch {
            n_visited_features: 0,
            n_found_constants: 0,
            n_drawn_constants: 0,
            n_known_constants,
            n_total_constants: n_known_constants,
            f_i: n_features,
            max_features,
        }
    }

    /// Draws the next fresh candidate feature, or `None` once the search is
    /// exhausted. Known-constant draws are consumed internally.
    ///
    /// Returns the candidate's position in `features` and its index.
    pub(crate) fn next_candidate(
        &mut self,
        features: &mut [FeatureIndex],
        rng: &mut Random,
    ) -> Option<(usize, FeatureIndex)> {
        loop {
            // Stop early once only constant features remain, or once
            // max_features have been visited with at least one of them
            // evaluated as non-constant.
            let keep_drawing = self.f_i > self.n_total_constants
                && (self.n_visited_features < self.max_features
                    || self.n_visited_features <= self.n_found_constants + self.n_drawn_constants);
            if !keep_drawing {
                return None;
            }

            self.n_visited_features += 1;

            let f_j = rng.next_int(self.n_drawn_constants, self.f_i - self.n_found_constants);

            if f_j < self.n_known_constants {
                // Known constant: mark it drawn and keep sampling.
                features.swap(f_j, self.n_drawn_constants);
                self.n_drawn_constants += 1;
            } else {
                // Shift over the newly-found-constant zone.
                let f_j = f_j + self.n_found_constants;
                return Some((f_j, features[f_j]));
            }
        }
    }

    /// Marks the candidate at `f_j` as newly found constant.
    pub(crate) fn mark_constant(&mut self, features: &mut [FeatureIndex], f_j: usize) {
        let feature = features[f_j];
        features[f_j] = features[self.n_total_constants];
        features[self.n_total_constants] = feature;

        self.n_found_constants += 1;
        self.n_total_constants += 1;
    }

    /// Moves the candidate at `f_j` into the evaluated tail.
    pub(crate) fn mark_evaluated(&mut self, features: &mut [FeatureIndex], f_j: usize) {
        self.f_i -= 1;
        features.swap(self.f_i, f_j);
    }
}

/// Split search strategy, selected once per `fit` call.
#[derive(Debug)]
pub enum Splitter {
    /// Exhaustive per-feature sort and scan
    Best(BestSplitter),
    /// One random threshold per sampled feature
    Random(RandomSplitter),
    /// Exhaustive scan over a dataset-wide precomputed column sort
    Presort(PresortBestSplitter),
}

impl Splitter {
    /// Creates a splitter of the given kind.
    pub fn new(
        kind: SplitterKind,
        criterion: Criterion,
        max_features: usize,
        min_samples_leaf: usize,
        min_weight_leaf: f64,
        feature_threshold: f64,
        rng: Random,
    ) -> Self {
        let state = SplitterState::new(
            criterion,
            max_features,
            min_samples_leaf,
            min_weight_leaf,
            feature_threshold,
            rng,
        );
        match kind {
            SplitterKind::Best => Splitter::Best(BestSplitter::new(state)),
            SplitterKind::Random => Splitter::Random(RandomSplitter::new(state)),
            SplitterKind::Presort => Splitter::Presort(PresortBestSplitter::new(state)),
        }
    }

    /// Initializes the splitter on the training data.
    pub fn init(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        sample_weight: Option<&Array1<f64>>,
    ) -> Result<()> {
        match self {
            Splitter::Best(s) => s.state.init(x, y, sample_weight),
            Splitter::Random(s) => s.state.init(x, y, sample_weight),
            Splitter::Presort(s) => s.init(x, y, sample_weight),
        }
    }

    /// Resets the splitter on node `samples[start..end]`; returns the
    /// node's weighted sample count.
    pub fn node_reset(&mut self, start: usize, end: usize) -> f64 {
        self.state_mut().node_reset(start, end)
    }

    /// Impurity of the current node.
    pub fn node_impurity(&self) -> f64 {
        self.state().criterion.node_impurity()
    }

    /// Value of the current node.
    pub fn node_value(&self) -> Vec<f64> {
        self.state().criterion.node_value()
    }

    /// Searches for the best split of the current node.
    ///
    /// `n_constant_features` carries the ancestor constant-feature count in
    /// and the updated total out.
    pub fn node_split(&mut self, impurity: f64, n_constant_features: &mut usize) -> SplitRecord {
        match self {
            Splitter::Best(s) => s.node_split(impurity, n_constant_features),
            Splitter::Random(s) => s.node_split(impurity, n_constant_features),
            Splitter::Presort(s) => s.node_split(impurity, n_constant_features),
        }
    }

    /// Number of retained training samples.
    pub fn n_samples(&self) -> usize {
        self.state().n_samples
    }

    /// Weighted number of samples in the whole training set.
    pub fn weighted_n_samples(&self) -> f64 {
        self.state().weighted_n_samples
    }

    pub(crate) fn state(&self) -> &SplitterState {
        match self {
            Splitter::Best(s) => &s.state,
            Splitter::Random(s) => &s.state,
            Splitter::Presort(s) => &s.state,
        }
    }

    pub(crate) fn state_mut(&mut self) -> &mut SplitterState {
        match self {
            Splitter::Best(s) => &mut s.state,
            Splitter::Random(s) => &mut s.state,
            Splitter::Presort(s) => &mut s.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CriterionKind;
    use ndarray::{array, Array1, Array2};
    use proptest::prelude::*;

    fn make_splitter(kind: SplitterKind, n_classes: usize, max_features: usize) -> Splitter {
        let criterion = Criterion::new(CriterionKind::Gini, n_classes).unwrap();
        Splitter::new(
            kind,
            criterion,
            max_features,
            1,
            0.0,
            crate::core::constants::DEFAULT_FEATURE_THRESHOLD,
            Random::with_seed(42),
        )
    }

    #[test]
    fn test_init_rejects_row_mismatch() {
        let x = Array2::zeros((4, 2));
        let y = Array1::zeros(3);
        let mut splitter = make_splitter(SplitterKind::Best, 2, 2);
        assert!(matches!(
            splitter.init(&x, &y, None),
            Err(CartError::DataDimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_init_rejects_weight_mismatch() {
        let x = Array2::zeros((4, 2));
        let y = Array1::zeros(4);
        let w = Array1::ones(3);
        let mut splitter = make_splitter(SplitterKind::Best, 2, 2);
        assert!(matches!(
            splitter.init(&x, &y, Some(&w)),
            Err(CartError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_weight_rows_are_dropped() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let w = array![1.0, 0.0, 1.0, 1.0];
        let mut splitter = make_splitter(SplitterKind::Best, 2, 1);
        splitter.init(&x, &y, Some(&w)).unwrap();
        assert_eq!(splitter.n_samples(), 3);
        assert_eq!(splitter.weighted_n_samples(), 3.0);
    }

    #[test]
    fn test_ten_row_scenario_finds_midpoint_split() {
        // Feature equals the row index; label flips at index 5. The best
        // split must land between 4 and 5 with pure children.
        let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(10, |i| if i < 5 { 0.0 } else { 1.0 });

        let mut splitter = make_splitter(SplitterKind::Best, 2, 1);
        splitter.init(&x, &y, None).unwrap();
        splitter.node_reset(0, 10);

        let impurity = splitter.node_impurity();
        assert!((impurity - 0.5).abs() < 1e-12);

        let mut n_constant = 0;
        let split = splitter.node_split(impurity, &mut n_constant);

        assert_eq!(split.pos, 5);
        assert!(split.threshold > 4.0 && split.threshold < 5.0);
        assert!(split.impurity_left.abs() < 1e-12);
        assert!(split.impurity_right.abs() < 1e-12);
        assert!((split.improvement - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_constant_features_yield_no_split() {
        let x = Array2::from_elem((6, 3), 1.5);
        let y = array![0.0, 1.0, 0.0, 1.0, 0.0, 1.0];

        let mut splitter = make_splitter(SplitterKind::Best, 2, 3);
        splitter.init(&x, &y, None).unwrap();
        splitter.node_reset(0, 6);

        let impurity = splitter.node_impurity();
        let mut n_constant = 0;
        let split = splitter.node_split(impurity, &mut n_constant);

        assert_eq!(split.pos, 6);
        assert_eq!(n_constant, 3);
    }

    #[test]
    fn test_min_samples_leaf_rejections() {
        let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(10, |i| if i < 1 { 0.0 } else { 1.0 });

        // With min_samples_leaf = 4 the natural 1|9 split is not allowed;
        // any returned split must leave at least 4 on each side.
        let criterion = Criterion::new(CriterionKind::Gini, 2).unwrap();
        let mut splitter = Splitter::new(
            SplitterKind::Best,
            criterion,
            1,
            4,
            0.0,
            crate::core::constants::DEFAULT_FEATURE_THRESHOLD,
            Random::with_seed(1),
        );
        splitter.init(&x, &y, None).unwrap();
        splitter.node_reset(0, 10);
        let impurity = splitter.node_impurity();
        let mut n_constant = 0;
        let split = splitter.node_split(impurity, &mut n_constant);

        if split.pos < 10 {
            assert!(split.pos >= 4);
            assert!(10 - split.pos >= 4);
        }
    }

    #[test]
    fn test_min_weight_leaf_rejections() {
        // One heavy row on the left: without the weight floor the best
        // split isolates it; with the floor at 5.0 every returned split
        // must keep at least that much weight on both sides.
        let x = Array2::from_shape_fn((8, 1), |(i, _)| i as f64);
        let y = array![0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let w = array![4.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];

        let criterion = Criterion::new(CriterionKind::Gini, 2).unwrap();
        let mut splitter = Splitter::new(
            SplitterKind::Best,
            criterion,
            1,
            1,
            5.0,
            crate::core::constants::DEFAULT_FEATURE_THRESHOLD,
            Random::with_seed(8),
        );
        splitter.init(&x, &y, Some(&w)).unwrap();
        splitter.node_reset(0, 8);
        let impurity = splitter.node_impurity();
        let mut n_constant = 0;
        let split = splitter.node_split(impurity, &mut n_constant);

        if split.pos < 8 {
            let samples = &splitter.state().samples;
            let left_weight: f64 = samples[..split.pos].iter().map(|&i| w[i]).sum();
            let right_weight: f64 = samples[split.pos..].iter().map(|&i| w[i]).sum();
            assert!(left_weight >= 5.0);
            assert!(right_weight >= 5.0);
        }
    }

    #[test]
    fn test_partition_postcondition_all_variants() {
        let x = array![
            [3.0, 7.0],
            [1.0, 2.0],
            [4.0, 1.0],
            [1.0, 8.0],
            [5.0, 2.0],
            [9.0, 8.0],
            [2.0, 1.0],
            [6.0, 9.0],
        ];
        let y = array![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];

        for kind in [SplitterKind::Best, SplitterKind::Random, SplitterKind::Presort] {
            let mut splitter = make_splitter(kind, 2, 2);
            splitter.init(&x, &y, None).unwrap();
            splitter.node_reset(0, 8);
            let impurity = splitter.node_impurity();
            let mut n_constant = 0;
            let split = splitter.node_split(impurity, &mut n_constant);

            let samples = &splitter.state().samples;
            let mut sorted = samples.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..8).collect::<Vec<_>>(), "{kind} lost samples");

            if split.pos < 8 {
                for &i in &samples[..split.pos] {
                    assert!(x[[i, split.feature]] <= split.threshold, "{kind} left side");
                }
                for &i in &samples[split.pos..] {
                    assert!(x[[i, split.feature]] > split.threshold, "{kind} right side");
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_node_split_preserves_sample_permutation(
            values in proptest::collection::vec(0.0f64..10.0, 24),
            labels in proptest::collection::vec(0usize..2, 12),
            seed in 0u64..1000,
        ) {
            let x = Array2::from_shape_vec((12, 2), values).unwrap();
            let y = Array1::from_iter(labels.iter().map(|&c| c as f64));

            let criterion = Criterion::new(CriterionKind::Gini, 2).unwrap();
            let mut splitter = Splitter::new(
                SplitterKind::Best,
                criterion,
                2,
                1,
                0.0,
                crate::core::constants::DEFAULT_FEATURE_THRESHOLD,
                Random::with_seed(seed),
            );
            splitter.init(&x, &y, None).unwrap();
            splitter.node_reset(0, 12);
            let impurity = splitter.node_impurity();
            let mut n_constant = 0;
            let split = splitter.node_split(impurity, &mut n_constant);

            let samples = &splitter.state().samples;
            let mut sorted = samples.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..12).collect::<Vec<_>>());

            if split.pos < 12 {
                prop_assert!(split.pos >= 1);
                for &i in &samples[..split.pos] {
                    prop_assert!(x[[i, split.feature]] <= split.threshold);
                }
                for &i in &samples[split.pos..] {
                    prop_assert!(x[[i, split.feature]] > split.threshold);
                }
            }
        }
    }
}
