//! Depth-first tree construction.

use crate::core::constants::MIN_IMPURITY_SPLIT;
use crate::core::error::Result;
use crate::tree::builder::StackRecord;
use crate::tree::splitter::Splitter;
use crate::tree::tree::Tree;
use ndarray::{Array1, Array2};

/// Builds a tree depth-first from a stack of pending ranges.
///
/// The left child is pushed last so it is expanded first (LIFO), which
/// keeps the constant-feature prefix contract valid down each path.
#[derive(Debug)]
pub struct DepthFirstBuilder {
    splitter: Splitter,
    min_samples_split: usize,
    min_samples_leaf: usize,
    min_weight_leaf: f64,
    max_depth: usize,
}

impl DepthFirstBuilder {
    /// Creates a depth-first builder.
    pub fn new(
        splitter: Splitter,
        min_samples_split: usize,
        min_samples_leaf: usize,
        min_weight_leaf: f64,
        max_depth: usize,
    ) -> Self {
        DepthFirstBuilder {
            splitter,
            min_samples_split,
            min_samples_leaf,
            min_weight_leaf,
            max_depth,
        }
    }

    /// Builds `tree` from the training set.
    pub fn build(
        &mut self,
        tree: &mut Tree,
        x: &Array2<f64>,
        y: &Array1<f64>,
        sample_weight: Option<&Array1<f64>>,
    ) -> Result<()> {
        self.splitter.init(x, y, sample_weight)?;

        let n_node_samples = self.splitter.n_samples();
        let mut max_depth_seen = 0;
        let mut first = true;

        let mut stack = vec![StackRecord {
            start: 0,
            end: n_node_samples,
            depth: 0,
            parent: None,
            is_left: false,
            impurity: f64::INFINITY,
            n_constant_features: 0,
        }];

        while let Some(record) = stack.pop() {
            let StackRecord {
                start,
                end,
                depth,
                parent,
                is_left,
                mut impurity,
                mut n_constant_features,
            } = record;

            let n_node_samples = end - start;
            let weighted_n_node_samples = self.splitter.node_reset(start, end);

            let mut is_leaf = depth >= self.max_depth
                || n_node_samples < self.min_samples_split
                || n_node_samples < 2 * self.min_samples_leaf
                || weighted_n_node_samples < self.min_weight_leaf;

            if first {
                impurity = self.splitter.node_impurity();
                first = false;
            }

            is_leaf = is_leaf || impurity <= MIN_IMPURITY_SPLIT;

            let split = if is_leaf {
                None
            } else {
                let split = self
                    .splitter
                    .node_split(impurity, &mut n_constant_features);
                // A search that moved no samples forces a leaf.
                is_leaf = split.pos >= end;
                Some(split)
            };

            let node_id = match &split {
                Some(s) if !is_leaf => tree.add_node(
                    parent,
                    is_left,
                    false,
                    s.feature,
                    s.threshold,
                    impurity,
                    n_node_samples,
                    weighted_n_node_samples,
                ),
                _ => tree.add_node(
                    parent,
                    is_left,
                    true,
                    0,
                    0.0,
                    impurity,
                    n_node_samples,
                    weighted_n_node_samples,
                ),
            };

            if is_leaf {
                tree.set_value(node_id, self.splitter.node_value());
            } else {
                let split = split.expect("non-leaf node has a split");

                // Push the right child first so the left child is expanded
                // next.
                stack.push(StackRecord {
                    start: split.pos,
                    end,
                    depth: depth + 1,
                    parent: Some(node_id),
                    is_left: false,
                    impurity: split.impurity_right,
                    n_constant_features,
                });
                stack.push(StackRecord {
                    start,
                    end: split.pos,
                    depth: depth + 1,
                    parent: Some(node_id),
                    is_left: true,
                    impurity: split.impurity_left,
                    n_constant_features,
                });
            }

            if depth > max_depth_seen {
                max_depth_seen = depth;
            }
        }

        tree.set_max_depth(max_depth_seen);
        log::debug!(
            "depth-first build finished: {} nodes, {} leaves, depth {}",
            tree.node_count(),
            tree.n_leaves(),
            tree.max_depth()
        );

        Ok(())
    }
}
