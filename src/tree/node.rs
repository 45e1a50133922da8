//! Tree node storage for the array-of-nodes arena.

use crate::core::types::{FeatureIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the append-only node arena.
///
/// Internal nodes carry a split (feature, threshold) and child indices that
/// are strictly greater than their own index; leaves carry neither. The
/// per-node value (class histogram or mean) lives in the tree's parallel
/// value array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Left child index (`None` for leaves)
    left_child: Option<NodeIndex>,
    /// Right child index (`None` for leaves)
    right_child: Option<NodeIndex>,
    /// Split feature index (`None` for leaves)
    feature: Option<FeatureIndex>,
    /// Split threshold (`None` for leaves)
    threshold: Option<f64>,
    /// Impurity of the node
    impurity: f64,
    /// Number of training samples reaching the node
    n_node_samples: usize,
    /// Weighted number of training samples reaching the node
    weighted_n_node_samples: f64,
}

impl Node {
    /// Creates a leaf node.
    pub fn new_leaf(impurity: f64, n_node_samples: usize, weighted_n_node_samples: f64) -> Self {
        Node {
            left_child: None,
            right_child: None,
            feature: None,
            threshold: None,
            impurity,
            n_node_samples,
            weighted_n_node_samples,
        }
    }

    /// Creates an internal node. Children are wired later, when they are
    /// appended to the arena.
    pub fn new_internal(
        feature: FeatureIndex,
        threshold: f64,
        impurity: f64,
        n_node_samples: usize,
        weighted_n_node_samples: f64,
    ) -> Self {
        Node {
            left_child: None,
            right_child: None,
            feature: Some(feature),
            threshold: Some(threshold),
            impurity,
            n_node_samples,
            weighted_n_node_samples,
        }
    }

    /// Returns true if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.feature.is_none()
    }

    /// Left child index, if any.
    pub fn left_child(&self) -> Option<NodeIndex> {
        self.left_child
    }

    /// Right child index, if any.
    pub fn right_child(&self) -> Option<NodeIndex> {
        self.right_child
    }

    /// Split feature index, if internal.
    pub fn feature(&self) -> Option<FeatureIndex> {
        self.feature
    }

    /// Split threshold, if internal.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Impurity of the node.
    pub fn impurity(&self) -> f64 {
        self.impurity
    }

    /// Number of training samples reaching the node.
    pub fn n_node_samples(&self) -> usize {
        self.n_node_samples
    }

    /// Weighted number of training samples reaching the node.
    pub fn weighted_n_node_samples(&self) -> f64 {
        self.weighted_n_node_samples
    }

    pub(crate) fn set_left_child(&mut self, child: NodeIndex) {
        self.left_child = Some(child);
    }

    pub(crate) fn set_right_child(&mut self, child: NodeIndex) {
        self.right_child = Some(child);
    }

    /// Demotes an internal node back to a leaf (best-first frontier
    /// freezing once the leaf budget is exhausted).
    pub(crate) fn demote_to_leaf(&mut self) {
        self.left_child = None;
        self.right_child = None;
        self.feature = None;
        self.threshold = None;
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(
                f,
                "Leaf(samples={}, impurity={:.6})",
                self.n_node_samples, self.impurity
            )
        } else {
            write!(
                f,
                "Split(feature={}, threshold={:.6}, samples={}, impurity={:.6})",
                self.feature.unwrap_or_default(),
                self.threshold.unwrap_or_default(),
                self.n_node_samples,
                self.impurity
            )
        }
    }
}
