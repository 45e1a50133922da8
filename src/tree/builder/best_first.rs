//! Best-first tree construction with a leaf budget.

use crate::core::constants::MIN_IMPURITY_SPLIT;
use crate::core::error::Result;
use crate::core::types::NodeIndex;
use crate::tree::splitter::Splitter;
use crate::tree::tree::Tree;
use ndarray::{Array1, Array2};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One frontier entry: a node already appended to the tree whose range may
/// still be expanded.
#[derive(Debug, Clone, Copy)]
struct FrontierRecord {
    node_id: NodeIndex,
    start: usize,
    end: usize,
    pos: usize,
    depth: usize,
    is_leaf: bool,
    impurity_left: f64,
    impurity_right: f64,
    improvement: f64,
    /// Insertion counter; FIFO among equal improvements
    order: u64,
}

impl PartialEq for FrontierRecord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierRecord {}

impl PartialOrd for FrontierRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        // Highest improvement pops first; earlier insertion wins ties.
        self.improvement
            .total_cmp(&other.improvement)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Builds a tree by always expanding the frontier range with the highest
/// impurity improvement, until the frontier is empty or the leaf budget is
/// reached. Remaining frontier entries are then frozen as leaves using
/// their already-stored values. The depth ceiling is ignored by design;
/// the leaf budget bounds the tree instead.
#[derive(Debug)]
pub struct BestFirstTreeBuilder {
    splitter: Splitter,
    min_samples_split: usize,
    min_samples_leaf: usize,
    min_weight_leaf: f64,
    max_leaf_nodes: usize,
}

impl BestFirstTreeBuilder {
    /// Creates a best-first builder with the given leaf budget.
    pub fn new(
        splitter: Splitter,
        min_samples_split: usize,
        min_samples_leaf: usize,
        min_weight_leaf: f64,
        max_leaf_nodes: usize,
    ) -> Self {
        BestFirstTreeBuilder {
            splitter,
            min_samples_split,
            min_samples_leaf,
            min_weight_leaf,
            max_leaf_nodes,
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
        // The root is one leaf; every split trades one leaf for two.
        let mut max_split_nodes = self.max_leaf_nodes - 1;
        let mut max_depth_seen = 0;
        let mut order = 0u64;

        let mut frontier = BinaryHeap::new();

        let root = self.add_split_node(
            tree,
            0,
            n_node_samples,
            f64::INFINITY,
            true,
            false,
            None,
            0,
            &mut order,
        );
        frontier.push(root);

        while let Some(record) = frontier.pop() {
            if record.depth > max_depth_seen {
                max_depth_seen = record.depth;
            }

            if record.is_leaf || max_split_nodes == 0 {
                // Out of budget (or not expandable): freeze as a leaf. The
                // node's value was stored when it was appended.
                tree.demote_to_leaf(record.node_id);
                continue;
            }

            max_split_nodes -= 1;

            let left = self.add_split_node(
                tree,
                record.start,
                record.pos,
                record.impurity_left,
                false,
                true,
                Some(record.node_id),
                record.depth + 1,
                &mut order,
            );
            frontier.push(left);

            let right = self.add_split_node(
                tree,
                record.pos,
                record.end,
                record.impurity_right,
                false,
                false,
                Some(record.node_id),
                record.depth + 1,
                &mut order,
            );
            frontier.push(right);
        }

        tree.set_max_depth(max_depth_seen);
        log::debug!(
            "best-first build finished: {} nodes, {} leaves (budget {}), depth {}",
            tree.node_count(),
            tree.n_leaves(),
            self.max_leaf_nodes,
            tree.max_depth()
        );

        Ok(())
    }

    /// Splits the range, appends the node, stores its value (internal nodes
    /// included, since they may later be frozen as leaves), and returns the
    /// frontier record.
    #[allow(clippy::too_many_arguments)]
    fn add_split_node(
        &mut self,
        tree: &mut Tree,
        start: usize,
        end: usize,
        impurity: f64,
        is_first: bool,
        is_left: bool,
        parent: Option<NodeIndex>,
        depth: usize,
        order: &mut u64,
    ) -> FrontierRecord {
        let weighted_n_node_samples = self.splitter.node_reset(start, end);
        let impurity = if is_first {
            self.splitter.node_impurity()
        } else {
            impurity
        };

        let n_node_samples = end - start;
        let mut is_leaf = n_node_samples < self.min_samples_split
            || n_node_samples < 2 * self.min_samples_leaf
            || weighted_n_node_samples < self.min_weight_leaf
            || impurity <= MIN_IMPURITY_SPLIT;

        // The constant-feature prefix contract relies on depth-first
        // expansion order; best-first starts every node from scratch.
        let mut n_constant_features = 0;
        let split = if is_leaf {
            None
        } else {
            let split = self.splitter.node_split(impurity, &mut n_constant_features);
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

        // Values are stored for every node; a split node may still be
        // frozen as a leaf when the budget runs out.
        tree.set_value(node_id, self.splitter.node_value());

        *order += 1;
        match split {
            Some(s) if !is_leaf => FrontierRecord {
                node_id,
                start,
                end,
                pos: s.pos,
                depth,
                is_leaf: false,
                impurity_left: s.impurity_left,
                impurity_right: s.impurity_right,
                improvement: s.improvement,
                order: *order,
            },
            _ => FrontierRecord {
                node_id,
                start,
                end,
                pos: end,
                depth,
                is_leaf: true,
                impurity_left: impurity,
                impurity_right: impurity,
                improvement: 0.0,
                order: *order,
            },
        }
    }
}
