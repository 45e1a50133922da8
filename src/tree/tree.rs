//! Binary decision tree storage, prediction, and feature importances.
//!
//! The tree is an append-only array of nodes with explicit child indices,
//! built by a [`crate::tree::builder::TreeBuilder`] and immutable
//! afterwards, which makes concurrent prediction safe without locking. A
//! parallel `values` array stores each finalized node's value: the weighted
//! class histogram for classification, the single-element weighted mean for
//! regression.

use crate::core::error::{CartError, Result};
use crate::core::types::{NodeIndex, TaskKind};
use crate::tree::node::Node;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary decision tree built by a tree builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    /// Number of features the tree was trained on
    n_features: usize,
    /// Length of each node value (number of classes, or 1 for regression)
    value_stride: usize,
    /// Task the tree was built for; decides how leaf values decode
    task: TaskKind,
    /// Maximum depth of any node
    max_depth: usize,
    /// Node arena; index 0 is always the root
    nodes: Vec<Node>,
    /// Per-node values, parallel to `nodes`
    values: Vec<Vec<f64>>,
}

impl Tree {
    /// Creates an empty tree.
    pub fn new(n_features: usize, value_stride: usize, task: TaskKind) -> Self {
        Tree {
            n_features,
            value_stride,
            task,
            max_depth: 0,
            nodes: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Number of features the tree was trained on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Length of each node value.
    pub fn value_stride(&self) -> usize {
        self.value_stride
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaf nodes in the tree.
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Maximum depth of any node.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the node at `index`, if it exists.
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Returns the value of the node at `index`, if it has been stored.
    pub fn value(&self, index: NodeIndex) -> Option<&[f64]> {
        self.values.get(index).map(|v| v.as_slice())
    }

    /// Appends a node and wires the parent's child pointer.
    ///
    /// Node indices are assigned in strict append order and never reused.
    /// `parent` is `None` only for the root.
    #[allow(clippy::too_many_arguments)]
    pub fn add_node(
        &mut self,
        parent: Option<NodeIndex>,
        is_left: bool,
        is_leaf: bool,
        feature: usize,
        threshold: f64,
        impurity: f64,
        n_node_samples: usize,
        weighted_n_node_samples: f64,
    ) -> NodeIndex {
        let node_id = self.nodes.len();

        let node = if is_leaf {
            Node::new_leaf(impurity, n_node_samples, weighted_n_node_samples)
        } else {
            // Children are wired when they are appended.
            Node::new_internal(
                feature,
                threshold,
                impurity,
                n_node_samples,
                weighted_n_node_samples,
            )
        };
        self.nodes.push(node);
        self.values.push(Vec::new());

        if let Some(parent_id) = parent {
            if is_left {
                self.nodes[parent_id].set_left_child(node_id);
            } else {
                self.nodes[parent_id].set_right_child(node_id);
            }
        }

        node_id
    }

    /// Stores the value of a finalized node.
    pub fn set_value(&mut self, index: NodeIndex, value: Vec<f64>) {
        self.values[index] = value;
    }

    /// Demotes the node at `index` to a leaf, keeping its stored value.
    pub(crate) fn demote_to_leaf(&mut self, index: NodeIndex) {
        self.nodes[index].demote_to_leaf();
    }

    pub(crate) fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Walks a single row from the root to a leaf, returning the leaf index.
    pub fn apply_row(&self, row: &ArrayView1<'_, f64>) -> NodeIndex {
        let mut node_id = 0;

        loop {
            let node = &self.nodes[node_id];
            let (feature, threshold) = match (node.feature(), node.threshold()) {
                (Some(feature), Some(threshold)) => (feature, threshold),
                _ => return node_id,
            };

            node_id = if row[feature] <= threshold {
                node.left_child().expect("internal node has a left child")
            } else {
                node.right_child().expect("internal node has a right child")
            };
        }
    }

    /// Returns the leaf index reached by every input row.
    pub fn apply(&self, x: &Array2<f64>) -> Result<Vec<NodeIndex>> {
        self.check_input(x)?;
        Ok(x.axis_iter(Axis(0)).map(|row| self.apply_row(&row)).collect())
    }

    /// Predicts one value per row: the arg-max class index for
    /// classification trees, the stored mean for regression trees.
    ///
    /// Rows are processed in parallel; the finished tree is read-only.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.check_input(x)?;

        let predictions: Vec<f64> = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| {
                let leaf = self.apply_row(&row);
                self.decode_value(leaf)
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Returns the stored value vector for the leaf reached by every row.
    pub fn predict_value(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_input(x)?;

        let mut out = Array2::zeros((x.nrows(), self.value_stride));
        for (i, row) in x.axis_iter(Axis(0)).enumerate() {
            let leaf = self.apply_row(&row);
            let value = &self.values[leaf];
            for (j, &v) in value.iter().enumerate() {
                out[[i, j]] = v;
            }
        }
        Ok(out)
    }

    fn decode_value(&self, leaf: NodeIndex) -> f64 {
        let value = &self.values[leaf];
        match self.task {
            TaskKind::Classification => argmax(value) as f64,
            TaskKind::Regression => value[0],
        }
    }

    /// Computes per-feature importances: the total weighted impurity
    /// decrease contributed by each feature's splits, divided by the root's
    /// weighted sample count, optionally normalized to sum to one.
    pub fn feature_importances(&self, normalize: bool) -> Array1<f64> {
        let mut importances = Array1::zeros(self.n_features);
        if self.nodes.is_empty() {
            return importances;
        }

        for node in &self.nodes {
            if let (Some(feature), Some(left_id), Some(right_id)) =
                (node.feature(), node.left_child(), node.right_child())
            {
                let left = &self.nodes[left_id];
                let right = &self.nodes[right_id];

                importances[feature] += node.weighted_n_node_samples() * node.impurity()
                    - left.weighted_n_node_samples() * left.impurity()
                    - right.weighted_n_node_samples() * right.impurity();
            }
        }

        importances /= self.nodes[0].weighted_n_node_samples();

        if normalize {
            let normalizer = importances.sum();
            if normalizer > 0.0 {
                importances /= normalizer;
            }
        }

        importances
    }

    /// Serializes the tree to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(CartError::from)
    }

    /// Deserializes a tree from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CartError::from)
    }

    fn check_input(&self, x: &Array2<f64>) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(CartError::prediction("tree has no nodes"));
        }
        if x.ncols() != self.n_features {
            return Err(CartError::dimension_mismatch(
                format!("{} features", self.n_features),
                format!("{} features", x.ncols()),
            ));
        }
        Ok(())
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tree(nodes={}, leaves={}, depth={})",
            self.node_count(),
            self.n_leaves(),
            self.max_depth()
        )
    }
}
