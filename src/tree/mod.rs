//! Tree induction subsystem: impurity criteria, split search, tree storage
//! and construction strategies.
//!
//! Dependency order, leaves first: [`criterion`] maintains running weighted
//! statistics over a sample range; [`splitter`] searches for the best
//! (feature, threshold) split, delegating impurity math to a criterion;
//! [`tree`] stores the finished array-of-nodes structure; [`builder`]
//! orchestrates node expansion depth-first or best-first.

pub mod builder;
pub mod criterion;
pub mod node;
pub mod splitter;
pub mod tree;

// Re-export key types for easy access
pub use builder::{BestFirstTreeBuilder, DepthFirstBuilder, TreeBuilder};
pub use criterion::{ClassificationCriterion, Criterion, RegressionCriterion};
pub use node::Node;
pub use splitter::{BestSplitter, PresortBestSplitter, RandomSplitter, SplitRecord, Splitter};
pub use tree::Tree;
