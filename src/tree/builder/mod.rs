//! Tree construction strategies.
//!
//! A builder drives the splitter over a frontier of pending sample ranges
//! and appends the resulting nodes to the tree. Two expansion orders are
//! provided: depth-first (stack, bounded by `max_depth`) and best-first
//! (priority queue by impurity improvement, bounded by a leaf budget).
//!
//! Per-node degeneracies are not errors: a range that cannot be split
//! deterministically becomes a leaf and construction continues.

pub mod best_first;
pub mod depth_first;

pub use best_first::BestFirstTreeBuilder;
pub use depth_first::DepthFirstBuilder;

use crate::core::error::Result;
use crate::core::types::NodeIndex;
use crate::tree::tree::Tree;
use ndarray::{Array1, Array2};

/// One pending sample range awaiting a split decision.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StackRecord {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) depth: usize,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) is_left: bool,
    pub(crate) impurity: f64,
    pub(crate) n_constant_features: usize,
}

/// Tree construction strategy, selected from `max_leaf_nodes` at fit time.
#[derive(Debug)]
pub enum TreeBuilder {
    /// Stack-driven depth-first construction
    DepthFirst(DepthFirstBuilder),
    /// Priority-queue best-first construction with a leaf budget
    BestFirst(BestFirstTreeBuilder),
}

impl TreeBuilder {
    /// Builds a decision tree from the training set.
    pub fn build(
        &mut self,
        tree: &mut Tree,
        x: &Array2<f64>,
        y: &Array1<f64>,
        sample_weight: Option<&Array1<f64>>,
    ) -> Result<()> {
        match self {
            TreeBuilder::DepthFirst(builder) => builder.build(tree, x, y, sample_weight),
            TreeBuilder::BestFirst(builder) => builder.build(tree, x, y, sample_weight),
        }
    }
}
