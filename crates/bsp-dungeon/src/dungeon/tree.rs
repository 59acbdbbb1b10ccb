//! Partition tree container and construction.

use log::trace;
use rand::Rng;

use crate::dungeon::node::{Node, NodeId};
use crate::dungeon::scene::Tint;
use crate::dungeon::split::SplitPolicy;
use crate::volume::Volume;

/// A binary space partition of a dungeon volume.
///
/// The tree always contains at least the root node. Cells of sibling nodes
/// are disjoint and tile their parent's cell exactly, so the leaves tile the
/// root volume.
///
/// # Construction
///
/// Trees are built by recursively offering cells to a [`SplitPolicy`]:
///
/// ```ignore
/// use bsp_dungeon::{GeneratorConfig, PartitionTree, RandomHalving, Volume};
/// use nalgebra::{Point3, Vector3};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let config = GeneratorConfig::default();
/// let policy = RandomHalving::from(&config);
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
///
/// let root = Volume::new(Point3::origin(), Vector3::new(50.0, 5.0, 50.0));
/// let tree = PartitionTree::build(root, &policy, &mut rng);
/// ```
///
/// A node that accepts a split immediately offers both halves for splitting,
/// so construction is a single depth-first pass.
///
/// # Storage
///
/// Nodes live in an arena indexed by [`NodeId`]. The connectivity phase reads
/// across sibling branches while mutating node state, which an ownership tree
/// of boxed children cannot express without borrow gymnastics; ids make those
/// cross-branch reads plain indexing. Nodes are never removed.
#[derive(Debug, Clone)]
pub struct PartitionTree {
    nodes: Vec<Node>,
}

impl PartitionTree {
    /// Builds a partition tree over `root_cell`.
    ///
    /// The policy's split attempts and the per-node tints both draw from
    /// `rng`, so an identical seed reproduces the identical tree.
    pub fn build<P, R>(root_cell: Volume, policy: &P, rng: &mut R) -> Self
    where
        P: SplitPolicy,
        R: Rng + ?Sized,
    {
        let mut tree = Self { nodes: Vec::new() };
        let root = tree.alloc(root_cell, rng);
        tree.split_recursively(root, policy, rng);
        tree
    }

    /// Returns the id of the root node.
    #[inline]
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` did not come from this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Returns the total number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree contains at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns every node id, in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Returns the depth of the deepest node, with the root at depth 0.
    pub fn depth(&self) -> usize {
        self.depth_below(self.root_id())
    }

    /// Collects all leaf ids, in depth-first order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_leaves(self.root_id(), &mut result);
        result
    }

    /// Collects the ids of all nodes at exactly `depth`, in depth-first
    /// order. The root is at depth 0; a depth below the deepest node yields
    /// an empty list.
    pub fn nodes_at_depth(&self, depth: usize) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_at_depth(self.root_id(), depth, &mut result);
        result
    }

    fn alloc<R: Rng + ?Sized>(&mut self, cell: Volume, rng: &mut R) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(cell, Tint::random(rng)));
        id
    }

    fn split_recursively<P, R>(&mut self, id: NodeId, policy: &P, rng: &mut R)
    where
        P: SplitPolicy,
        R: Rng + ?Sized,
    {
        let cell = *self.node(id).cell();
        if let Some(split) = policy.try_split(&cell, rng) {
            trace!("split node {} along {:?}", id.index(), split.axis);
            let first = self.alloc(split.first, rng);
            let second = self.alloc(split.second, rng);
            self.node_mut(id).set_children(split.axis, first, second);
            self.split_recursively(first, policy, rng);
            self.split_recursively(second, policy, rng);
        }
    }

    fn depth_below(&self, id: NodeId) -> usize {
        match self.node(id).children() {
            None => 0,
            Some((first, second)) => {
                1 + self.depth_below(first).max(self.depth_below(second))
            }
        }
    }

    fn collect_leaves(&self, id: NodeId, result: &mut Vec<NodeId>) {
        match self.node(id).children() {
            None => result.push(id),
            Some((first, second)) => {
                self.collect_leaves(first, result);
                self.collect_leaves(second, result);
            }
        }
    }

    fn collect_at_depth(&self, id: NodeId, remaining: usize, result: &mut Vec<NodeId>) {
        if remaining == 0 {
            result.push(id);
            return;
        }
        if let Some((first, second)) = self.node(id).children() {
            self.collect_at_depth(first, remaining - 1, result);
            self.collect_at_depth(second, remaining - 1, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::config::GeneratorConfig;
    use crate::dungeon::split::{RandomHalving, Split};
    use crate::volume::Axis;
    use assert_approx_eq::assert_approx_eq;
    use nalgebra::{Point3, Vector3};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scenario_root() -> Volume {
        Volume::new(Point3::origin(), Vector3::new(50.0, 5.0, 50.0))
    }

    fn halve_along(cell: &Volume, axis: Axis) -> Split {
        let mut extents = cell.extents();
        extents[axis.index()] *= 0.5;
        let mut offset = Vector3::zeros();
        offset[axis.index()] = extents[axis.index()];
        Split {
            axis,
            first: Volume::new(cell.center() - offset, extents),
            second: Volume::new(cell.center() + offset, extents),
        }
    }

    /// Deterministic test policy: halves the wider horizontal side while it
    /// exceeds the threshold.
    struct SplitWiderThan(f32);

    impl SplitPolicy for SplitWiderThan {
        fn is_valid(&self, _cell: &Volume) -> bool {
            true
        }

        fn try_split<R: Rng + ?Sized>(&self, cell: &Volume, _rng: &mut R) -> Option<Split> {
            let size = cell.size();
            let axis = if size.x >= size.z { Axis::X } else { Axis::Z };
            (size[axis.index()] > self.0).then(|| halve_along(cell, axis))
        }
    }

    #[test]
    fn scripted_tree_has_expected_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // 100 halves down to 25 on both axes: a full binary tree, four
        // splits deep.
        let tree = PartitionTree::build(scenario_root(), &SplitWiderThan(30.0), &mut rng);

        assert_eq!(tree.len(), 31);
        assert_eq!(tree.depth(), 4);
        assert_eq!(tree.leaves().len(), 16);
        for (depth, expected) in [(0, 1), (1, 2), (2, 4), (3, 8), (4, 16)] {
            assert_eq!(tree.nodes_at_depth(depth).len(), expected);
        }
        assert!(tree.nodes_at_depth(5).is_empty());
    }

    #[test]
    fn nodes_at_depth_zero_is_the_root() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tree = PartitionTree::build(scenario_root(), &SplitWiderThan(30.0), &mut rng);

        assert_eq!(tree.nodes_at_depth(0), vec![tree.root_id()]);
    }

    #[test]
    fn refused_root_split_leaves_a_single_node() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tree = PartitionTree::build(scenario_root(), &SplitWiderThan(1000.0), &mut rng);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaves(), vec![tree.root_id()]);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn leaves_come_out_depth_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tree = PartitionTree::build(scenario_root(), &SplitWiderThan(30.0), &mut rng);
        let leaves = tree.leaves();

        // First children sit on the negative side, so a depth-first walk
        // starts at the root's min corner and ends at its max corner.
        let first = tree.node(*leaves.first().unwrap()).cell();
        let last = tree.node(*leaves.last().unwrap()).cell();
        assert_approx_eq!(first.min().x, scenario_root().min().x, 1e-4);
        assert_approx_eq!(first.min().z, scenario_root().min().z, 1e-4);
        assert_approx_eq!(last.max().x, scenario_root().max().x, 1e-4);
        assert_approx_eq!(last.max().z, scenario_root().max().z, 1e-4);
    }

    #[test]
    fn split_cells_tile_their_parent() {
        let policy = RandomHalving::from(&GeneratorConfig::default());
        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tree = PartitionTree::build(scenario_root(), &policy, &mut rng);

            for id in tree.ids() {
                let node = tree.node(id);
                if let Some((first, second)) = node.children() {
                    let a = tree.node(first).cell();
                    let b = tree.node(second).cell();
                    assert!(!a.overlaps(b), "sibling cells must be disjoint");
                    assert_eq!(&a.union(b), node.cell(), "children must tile the parent");
                    assert_approx_eq!(
                        a.volume() + b.volume(),
                        node.cell().volume(),
                        node.cell().volume() * 1e-5
                    );
                }
            }
        }
    }

    #[test]
    fn scenario_leaves_are_valid_and_tile_the_root() {
        let policy = RandomHalving::from(&GeneratorConfig::default());
        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tree = PartitionTree::build(scenario_root(), &policy, &mut rng);
            let leaves = tree.leaves();

            let mut total = 0.0;
            for &id in &leaves {
                let cell = tree.node(id).cell();
                assert!(
                    policy.is_valid(cell),
                    "leaf cell {cell:?} violates the validity predicate"
                );
                total += cell.volume();
            }
            assert_approx_eq!(total, scenario_root().volume(), 1.0);

            for (i, &a) in leaves.iter().enumerate() {
                for &b in &leaves[i + 1..] {
                    assert!(
                        !tree.node(a).cell().overlaps(tree.node(b).cell()),
                        "leaf cells must not overlap"
                    );
                }
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_tree() {
        let policy = RandomHalving::from(&GeneratorConfig::default());
        let mut rng_a = ChaCha8Rng::seed_from_u64(9);
        let mut rng_b = ChaCha8Rng::seed_from_u64(9);

        let tree_a = PartitionTree::build(scenario_root(), &policy, &mut rng_a);
        let tree_b = PartitionTree::build(scenario_root(), &policy, &mut rng_b);

        assert_eq!(tree_a.len(), tree_b.len());
        for id in tree_a.ids() {
            assert_eq!(tree_a.node(id).cell(), tree_b.node(id).cell());
            assert_eq!(tree_a.node(id).tint(), tree_b.node(id).tint());
        }
    }
}
