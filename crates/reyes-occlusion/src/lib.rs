//! Per-bucket occlusion hierarchy: a balanced quadtree of max sample depth,
//! stored flat in an array by the usual `4i+1..4i+4` child indexing, so a
//! bound can be tested against the current z-buffer in `O(log n)` with an
//! early exit the moment a subtree is either disjoint or already known
//! nearer than the query.
//!
//! One tree per bucket, never shared across worker threads — see the
//! concurrency notes on why that sidesteps any need for locking here.

mod index;
pub use index::{quad_tree_node_index, quad_tree_num_nodes, quad_tree_parent_node};

mod tree;
pub use tree::OcclusionTree;
