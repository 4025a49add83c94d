use glam::IVec2;
use reyes_math::{iceil, Box2i};

use crate::index::{quad_tree_node_index, quad_tree_num_nodes, quad_tree_parent_node};

/// Per-bucket z-occlusion hierarchy.
///
/// Leaves cover a `nleaves_x * nleaves_y` grid of sample positions; each
/// interior node holds the max z of everything visible beneath it so a
/// candidate bound can be rejected against a whole subtree at once. The
/// leaf grid is padded up to the next power of two on each axis
/// (`nleaves_full`) so the tree stays a perfect quadtree; the padding
/// columns/rows are seeded with `+inf` and never queried directly because
/// `is_occluded` always clamps its query bound to the real leaf range.
pub struct OcclusionTree {
    nleaves: IVec2,
    depth: i32,
    nleaves_full: i32,
    /// Max z known for every node, indexed by the flat quadtree index.
    z: Vec<f32>,
}

impl OcclusionTree {
    pub fn new(nleaves: IVec2) -> Self {
        assert!(nleaves.x > 0 && nleaves.y > 0);
        let depth = iceil((nleaves.x.max(nleaves.y) as f32).log2());
        let nleaves_full = 1 << depth;
        let num_nodes = quad_tree_num_nodes(depth);
        Self {
            nleaves,
            depth,
            nleaves_full,
            z: vec![f32::INFINITY; num_nodes],
        }
    }

    /// Reset every node to "nothing seen yet".
    pub fn reset(&mut self) {
        self.z.fill(f32::INFINITY);
    }

    fn leaf_range(&self) -> Box2i {
        Box2i::new(IVec2::ZERO, self.nleaves)
    }

    /// Flat array index of the leaf at `(x, y)`.
    pub fn node_index(&self, x: i32, y: i32) -> usize {
        quad_tree_node_index(x, y, self.depth)
    }

    /// Max z recorded for the node at `idx`.
    pub fn get_depth(&self, idx: usize) -> f32 {
        self.z[idx]
    }

    /// Record a new sample z at leaf `idx`, then propagate the change up
    /// to the root. Stops as soon as a parent's max doesn't change, since
    /// nothing further up can change either.
    pub fn set_depth(&mut self, idx: usize, z: f32) {
        if z >= self.z[idx] {
            return;
        }
        self.z[idx] = z;
        let mut idx = idx;
        while idx != 0 {
            let parent = quad_tree_parent_node(idx);
            let first_child = 4 * parent + 1;
            let children_max = (first_child..first_child + 4)
                .map(|c| self.z[c])
                .fold(f32::NEG_INFINITY, f32::max);
            if children_max >= self.z[parent] {
                break;
            }
            self.z[parent] = children_max;
            idx = parent;
        }
    }

    /// True if `bound` is known to lie entirely behind the max z recorded
    /// for its covering region (i.e. it would be fully hidden by geometry
    /// already rasterized there).
    pub fn is_occluded(&self, bound: Box2i, zmin: f32) -> bool {
        let bound = bound.clamp_to(&self.leaf_range());
        if bound.min.x >= bound.max.x || bound.min.y >= bound.max.y {
            return true;
        }
        self.is_occluded_rec(0, 0, IVec2::new(0, 0), self.nleaves_full, bound, zmin)
    }

    fn is_occluded_rec(
        &self,
        node: usize,
        depth: i32,
        node_min: IVec2,
        node_size: i32,
        bound: Box2i,
        zmin: f32,
    ) -> bool {
        let node_bound = Box2i::new(node_min, node_min + IVec2::splat(node_size));
        if node_bound.disjoint(&bound) {
            return true;
        }
        if self.z[node] <= zmin {
            return true;
        }
        if depth == self.depth {
            return false;
        }
        let half = node_size / 2;
        let first_child = 4 * node + 1;
        for (i, dx, dy) in [(0, 0, 0), (1, 1, 0), (2, 0, 1), (3, 1, 1)] {
            let child_min = node_min + IVec2::new(dx * half, dy * half);
            if !self.is_occluded_rec(
                first_child + i,
                depth + 1,
                child_min,
                half,
                bound,
                zmin,
            ) {
                return false;
            }
        }
        true
    }

    #[cfg(test)]
    fn print_tree(&self) -> String {
        let mut out = String::new();
        for d in 0..=self.depth {
            let start = if d == 0 { 0 } else { quad_tree_num_nodes(d - 1) };
            let end = quad_tree_num_nodes(d);
            out.push_str(&format!("{:?}\n", &self.z[start..end]));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tree_is_never_occluded() {
        let tree = OcclusionTree::new(IVec2::new(4, 4));
        let bound = Box2i::new(IVec2::new(0, 0), IVec2::new(2, 2));
        assert!(!tree.is_occluded(bound, 0.0));
    }

    #[test]
    fn setting_every_leaf_occludes_a_nearer_query() {
        let mut tree = OcclusionTree::new(IVec2::new(4, 4));
        for y in 0..4 {
            for x in 0..4 {
                let idx = tree.node_index(x, y);
                tree.set_depth(idx, 1.0);
            }
        }
        let bound = Box2i::new(IVec2::new(0, 0), IVec2::new(4, 4));
        assert!(tree.is_occluded(bound, 2.0));
        assert!(!tree.is_occluded(bound, 0.5));
    }

    #[test]
    fn occlusion_is_local_to_the_updated_region() {
        let mut tree = OcclusionTree::new(IVec2::new(4, 4));
        let idx = tree.node_index(0, 0);
        tree.set_depth(idx, 1.0);

        let near_corner = Box2i::new(IVec2::new(0, 0), IVec2::new(1, 1));
        assert!(tree.is_occluded(near_corner, 2.0));

        let far_corner = Box2i::new(IVec2::new(3, 3), IVec2::new(4, 4));
        assert!(!tree.is_occluded(far_corner, 2.0));
    }

    #[test]
    fn reset_clears_all_recorded_depths() {
        let mut tree = OcclusionTree::new(IVec2::new(2, 2));
        let idx = tree.node_index(0, 0);
        tree.set_depth(idx, 0.1);
        tree.reset();
        let bound = Box2i::new(IVec2::new(0, 0), IVec2::new(2, 2));
        assert!(!tree.is_occluded(bound, 100.0));
    }

    #[test]
    fn debug_print_covers_every_level() {
        let tree = OcclusionTree::new(IVec2::new(3, 3));
        let printed = tree.print_tree();
        assert_eq!(printed.lines().count() as i32, tree.depth + 1);
    }
}
