//! Decision tree classifier.

use crate::config::Config;
use crate::core::error::{CartError, Result};
use crate::core::types::TaskKind;
use crate::model::weights::compute_sample_weight;
use crate::model::{grow_tree, validate_training_inputs};
use crate::tree::criterion::Criterion;
use crate::tree::tree::Tree;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A CART decision tree classifier.
///
/// Labels may be arbitrary numeric values; they are mapped to class indices
/// `0..n_classes` (in sorted label order) before the tree is grown, and
/// mapped back on prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    config: Config,
    tree: Option<Tree>,
    classes: Vec<f64>,
}

impl DecisionTreeClassifier {
    /// Creates an unfitted classifier with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        if config.criterion.task() != TaskKind::Classification {
            return Err(CartError::invalid_parameter(
                "criterion",
                config.criterion.to_string(),
                "classification requires gini or entropy",
            ));
        }
        Ok(DecisionTreeClassifier {
            config,
            tree: None,
            classes: Vec::new(),
        })
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

        // Map labels to class indices in sorted label order.
        let mut classes: Vec<f64> = y.to_vec();
        classes.sort_by(|a, b| a.total_cmp(b));
        classes.dedup();

        let class_indices: Vec<usize> = y
            .iter()
            .map(|label| {
                classes
                    .binary_search_by(|c| c.total_cmp(label))
                    .expect("every label is in the class list")
            })
            .collect();
        let y_encoded = Array1::from_iter(class_indices.iter().map(|&c| c as f64));

        // Multiply expanded class weights into the sample weights.
        let weights = match &self.config.class_weight {
            Some(class_weight) => {
                if class_weight.len() != classes.len() {
                    return Err(CartError::invalid_parameter(
                        "class_weight",
                        format!("{} entries", class_weight.len()),
                        format!("dataset has {} classes", classes.len()),
                    ));
                }
                let expanded = compute_sample_weight(class_weight, &class_indices)?;
                Some(match sample_weight {
                    Some(user) => user * &expanded,
                    None => expanded,
                })
            }
            None => sample_weight.cloned(),
        };

        let criterion = Criterion::new(self.config.criterion, classes.len())?;
        let tree = grow_tree(
            &self.config,
            criterion,
            classes.len(),
            x,
            &y_encoded,
            weights.as_ref(),
        )?;

        log::info!(
            "classifier fitted: {} classes, {} nodes, {} leaves, depth {}",
            classes.len(),
            tree.node_count(),
            tree.n_leaves(),
            tree.max_depth()
        );

        self.classes = classes;
        self.tree = Some(tree);
        Ok(())
    }

    /// Predicts the class label of every input row.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let tree = self.fitted_tree("predict")?;
        let indices = tree.predict(x)?;
        Ok(indices.mapv(|idx| self.classes[idx as usize]))
    }

    /// Predicts class probabilities: the fraction of (weighted) training
    /// samples of each class in the reached leaf.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let tree = self.fitted_tree("predict_proba")?;
        let mut histograms = tree.predict_value(x)?;

        for mut row in histograms.rows_mut() {
            let total: f64 = row.sum();
            if total > 0.0 {
                row /= total;
            }
        }
        Ok(histograms)
    }

    /// Predicts class log-probabilities.
    pub fn predict_log_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        Ok(self.predict_proba(x)?.mapv(f64::ln))
    }

    /// Returns the normalized feature importances of the fitted tree.
    pub fn feature_importances(&self) -> Result<Array1<f64>> {
        let tree = self.fitted_tree("feature_importances")?;
        Ok(tree.feature_importances(true))
    }

    /// Class labels in index order.
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Number of classes seen during fit.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
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

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new(Config::default_classification()).expect("default config is valid")
    }
}
