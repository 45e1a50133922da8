//! High-level estimators: decision-tree classifier and regressor.
//!
//! The estimators validate their inputs eagerly, resolve the configured
//! criterion/splitter names into concrete variants, grow the tree, and
//! expose `predict` and `feature_importances` on the fitted result. A
//! failed fit never leaves a partially built tree behind.

pub mod classifier;
pub mod regressor;
pub mod weights;

pub use classifier::DecisionTreeClassifier;
pub use regressor::DecisionTreeRegressor;
pub use weights::compute_sample_weight;

use crate::config::Config;
use crate::core::error::{CartError, Result};
use crate::core::random::Random;
use crate::core::types::GrowthStrategy;
use crate::tree::builder::{BestFirstTreeBuilder, DepthFirstBuilder, TreeBuilder};
use crate::tree::criterion::Criterion;
use crate::tree::splitter::Splitter;
use crate::tree::tree::Tree;
use ndarray::{Array1, Array2};

/// Hyperparameters after sentinel resolution, ready for the builders.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedParams {
    pub max_depth: usize,
    pub max_features: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub min_weight_leaf: f64,
    pub growth: GrowthStrategy,
}

/// Resolves sentinel hyperparameter values against the dataset shape.
pub(crate) fn resolve_params(
    config: &Config,
    n_features: usize,
    total_weight: f64,
) -> Result<ResolvedParams> {
    config.validate()?;

    let max_depth = if config.max_depth <= 0 {
        usize::MAX
    } else {
        config.max_depth as usize
    };

    let max_features = if config.max_features <= 0 {
        n_features
    } else {
        (config.max_features as usize).min(n_features)
    };

    // A split below 2 * min_samples_leaf could never satisfy both leaves.
    let min_samples_split = config.min_samples_split.max(2 * config.min_samples_leaf);

    let min_weight_leaf = config.min_weight_fraction_leaf * total_weight;

    let growth = if config.max_leaf_nodes <= 0 {
        GrowthStrategy::DepthFirst
    } else {
        GrowthStrategy::BestFirst {
            max_leaf_nodes: config.max_leaf_nodes as usize,
        }
    };

    Ok(ResolvedParams {
        max_depth,
        max_features,
        min_samples_split,
        min_samples_leaf: config.min_samples_leaf,
        min_weight_leaf,
        growth,
    })
}

/// Validates the training input shapes shared by both estimators.
pub(crate) fn validate_training_inputs(
    x: &Array2<f64>,
    y: &Array1<f64>,
    sample_weight: Option<&Array1<f64>>,
) -> Result<()> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(CartError::dataset(format!(
            "empty feature matrix: shape ({}, {})",
            x.nrows(),
            x.ncols()
        )));
    }
    if y.len() != x.nrows() {
        return Err(CartError::data_dimension_mismatch(format!(
            "feature matrix has {} rows but target vector has {} entries",
            x.nrows(),
            y.len()
        )));
    }
    if let Some(weights) = sample_weight {
        if weights.len() != x.nrows() {
            return Err(CartError::dimension_mismatch(
                format!("{} sample weights", x.nrows()),
                format!("{} sample weights", weights.len()),
            ));
        }
    }
    Ok(())
}

/// Grows one tree with the configured criterion, splitter and builder.
pub(crate) fn grow_tree(
    config: &Config,
    criterion: Criterion,
    value_stride: usize,
    x: &Array2<f64>,
    y: &Array1<f64>,
    sample_weight: Option<&Array1<f64>>,
) -> Result<Tree> {
    let total_weight = sample_weight.map_or(x.nrows() as f64, |w| w.sum());
    let params = resolve_params(config, x.ncols(), total_weight)?;

    let rng = match config.random_state {
        Some(seed) => Random::with_seed(seed),
        None => Random::new(),
    };

    let splitter = Splitter::new(
        config.splitter,
        criterion,
        params.max_features,
        params.min_samples_leaf,
        params.min_weight_leaf,
        config.feature_threshold,
        rng,
    );

    let mut tree = Tree::new(x.ncols(), value_stride, config.criterion.task());
    let mut builder = match params.growth {
        GrowthStrategy::DepthFirst => TreeBuilder::DepthFirst(DepthFirstBuilder::new(
            splitter,
            params.min_samples_split,
            params.min_samples_leaf,
            params.min_weight_leaf,
            params.max_depth,
        )),
        GrowthStrategy::BestFirst { max_leaf_nodes } => {
            TreeBuilder::BestFirst(BestFirstTreeBuilder::new(
                splitter,
                params.min_samples_split,
                params.min_samples_leaf,
                params.min_weight_leaf,
                max_leaf_nodes,
            ))
        }
    };

    builder.build(&mut tree, x, y, sample_weight)?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[test]
    fn test_resolve_sentinels() {
        let config = ConfigBuilder::new().build().unwrap();
        let params = resolve_params(&config, 7, 100.0).unwrap();
        assert_eq!(params.max_depth, usize::MAX);
        assert_eq!(params.max_features, 7);
        assert_eq!(params.growth, GrowthStrategy::DepthFirst);
        assert_eq!(params.min_weight_leaf, 0.0);
    }

    #[test]
    fn test_resolve_min_samples_split_floor() {
        let config = ConfigBuilder::new()
            .min_samples_split(2)
            .min_samples_leaf(5)
            .build()
            .unwrap();
        let params = resolve_params(&config, 3, 10.0).unwrap();
        assert_eq!(params.min_samples_split, 10);
    }

    #[test]
    fn test_resolve_best_first() {
        let config = ConfigBuilder::new().max_leaf_nodes(12).build().unwrap();
        let params = resolve_params(&config, 3, 10.0).unwrap();
        assert_eq!(
            params.growth,
            GrowthStrategy::BestFirst { max_leaf_nodes: 12 }
        );
    }

    #[test]
    fn test_max_features_clamped_to_width() {
        let config = ConfigBuilder::new().max_features(50).build().unwrap();
        let params = resolve_params(&config, 4, 10.0).unwrap();
        assert_eq!(params.max_features, 4);
    }

    #[test]
    fn test_validate_empty_input() {
        let x = Array2::zeros((0, 3));
        let y = Array1::zeros(0);
        assert!(matches!(
            validate_training_inputs(&x, &y, None),
            Err(CartError::Dataset { .. })
        ));
    }
}
