//! Decision tree regressor.

use crate::config::Config;
use crate::core::error::{CartError, Result};
use crate::core::types::TaskKind;
use crate::model::{grow_tree, validate_training_inputs};
use crate::tree::criterion::Criterion;
use crate::tree::tree::Tree;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A CART decision tree regressor.
///
/// Leaves store the weighted mean of their training targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    config: Config,
    tree: Option<Tree>,
}

impl DecisionTreeRegressor {
    /// Creates an unfitted regressor with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        if config.criterion.task() != TaskKind::Regression {
            return Err(CartError::invalid_parameter(
                "criterion",
                config.criterion.to_string(),
                "regression requires mse or friedman_mse",
            ));
        }
        if config.class_weight.is_some() {
            return Err(CartError::invalid_parameter(
                "class_weight",
                "present",
                "class weights only apply to classification",
            ));
        }
        Ok(DecisionTreeRegressor { config, tree: None })
    }

    /// Builds a decision tree for the training set `(x, y)`.
    ///
    /// An empty or absent `sample_weight` means uniform weight 1.0. A
    /// failed fit leaves the model unfitted.
    pub fn fit(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        sample_weight: Option<&Array1<f64>>,
    ) -> Result<()> {
        validate_training_inputs(x, y, sample_weight)?;
        self.tree = None;

        let criterion = Criterion::new(self.config.criterion, 0)?;
        let tree = grow_tree(&self.config, criterion, 1, x, y, sample_weight)?;

        log::info!(
            "regressor fitted: {} nodes, {} leaves, depth {}",
            tree.node_count(),
            tree.n_leaves(),
            tree.max_depth()
        );

        self.tree = Some(tree);
        Ok(())
    }

    /// Predicts the target value of every input row.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.fitted_tree("predict")?.predict(x)
    }

    /// Returns the normalized feature importances of the fitted tree.
    pub fn feature_importances(&self) -> Result<Array1<f64>> {
        let tree = self.fitted_tree("feature_importances")?;
        Ok(tree.feature_importances(true))
    }

    /// The fitted tree, if any.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Returns true once `fit` has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Saves the fitted model in binary format.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a model saved with [`save_model`](Self::save_model).
    pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }

    fn fitted_tree(&self, operation: &str) -> Result<&Tree> {
        self.tree
            .as_ref()
            .ok_or_else(|| CartError::not_fitted(operation))
    }
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new(Config::default_regression()).expect("default config is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::core::types::CriterionKind;
    use ndarray::array;

    #[test]
    fn test_classification_criterion_rejected() {
        let config = ConfigBuilder::regression()
            .criterion(CriterionKind::Gini)
            .build()
            .unwrap();
        assert!(matches!(
            DecisionTreeRegressor::new(config),
            Err(CartError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_fit_predict_step_function() {
        let x = Array2::from_shape_fn((12, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(12, |i| if i < 6 { 1.5 } else { -0.5 });

        let mut model = DecisionTreeRegressor::default();
        model.fit(&x, &y, None).unwrap();

        let predictions = model.predict(&x).unwrap();
        for i in 0..12 {
            assert!((predictions[i] - y[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_friedman_mse_builds() {
        let x = Array2::from_shape_fn((16, 2), |(i, j)| (i + j) as f64);
        let y = Array1::from_shape_fn(16, |i| (i as f64) * 0.25);

        let config = ConfigBuilder::regression()
            .criterion(CriterionKind::FriedmanMse)
            .max_depth(3)
            .build()
            .unwrap();
        let mut model = DecisionTreeRegressor::new(config).unwrap();
        model.fit(&x, &y, None).unwrap();
        assert!(model.is_fitted());
        assert!(model.tree().unwrap().max_depth() <= 3);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = DecisionTreeRegressor::default();
        let x = array![[0.0]];
        assert!(matches!(
            model.predict(&x),
            Err(CartError::NotFitted { .. })
        ));
    }

    #[test]
    fn test_class_weight_rejected() {
        let config = ConfigBuilder::regression()
            .class_weight(vec![1.0, 2.0])
            .build()
            .unwrap();
        assert!(matches!(
            DecisionTreeRegressor::new(config),
            Err(CartError::InvalidParameter { .. })
        ));
    }
}
