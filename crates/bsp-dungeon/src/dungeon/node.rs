//! Partition tree nodes.

use crate::dungeon::scene::Tint;
use crate::volume::{Axis, Volume};

/// Identifies a node inside a [`PartitionTree`](super::PartitionTree) arena.
///
/// Ids are handed out by the owning tree during construction and stay valid
/// for the tree's whole lifetime; nodes are never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the arena index of this id.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Connectivity state of a node, derived from its structure and flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// A leaf node. Terminal for connectivity: there is nothing below it to
    /// wire up.
    Leaf,
    /// An internal node whose children have not been joined yet.
    Pending,
    /// An internal node whose children have been joined by a corridor.
    Connected,
}

impl LinkState {
    /// Whether a parent may treat a node in this state as finished.
    #[inline]
    pub fn is_ready(self) -> bool {
        matches!(self, LinkState::Leaf | LinkState::Connected)
    }
}

/// One cell of the partition tree.
///
/// A node's `cell` is fixed at construction. Exactly two fields mutate
/// afterwards, each monotonically and exactly once:
///
/// - `room` is written during the furnish phase (the carved room for a leaf,
///   the union of the children's rooms for an internal node),
/// - `connected` flips to `true` when the connectivity solver joins the
///   node's children.
///
/// Children always come in pairs; a one-child node is unrepresentable.
#[derive(Debug, Clone)]
pub struct Node {
    /// The region of space this node covers.
    cell: Volume,

    /// Bounds of the rooms in this subtree. `None` until the furnish phase.
    room: Option<Volume>,

    /// The axis this node's cell was halved along, if it was split.
    split_axis: Option<Axis>,

    /// The two halves of this node's cell, if it was split.
    children: Option<(NodeId, NodeId)>,

    /// Whether the children's subtrees have been joined by a corridor.
    /// Leaves never set this.
    connected: bool,

    /// Debug color assigned at construction, used to tag instantiated rooms.
    tint: Tint,
}

impl Node {
    /// Creates a leaf node covering `cell`.
    pub(crate) fn new(cell: Volume, tint: Tint) -> Self {
        Self {
            cell,
            room: None,
            split_axis: None,
            children: None,
            connected: false,
            tint,
        }
    }

    /// Returns the cell covered by this node.
    #[inline]
    pub fn cell(&self) -> &Volume {
        &self.cell
    }

    /// Returns the room bounds, if the furnish phase has run.
    #[inline]
    pub fn room(&self) -> Option<&Volume> {
        self.room.as_ref()
    }

    /// Returns the axis this node was split along, if any.
    #[inline]
    pub fn split_axis(&self) -> Option<Axis> {
        self.split_axis
    }

    /// Returns the ids of the two children, if this node was split.
    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children
    }

    /// Checks if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Whether the connectivity solver has joined this node's children.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Returns the debug color assigned to this node.
    #[inline]
    pub fn tint(&self) -> Tint {
        self.tint
    }

    /// Returns the connectivity state of this node.
    pub fn link_state(&self) -> LinkState {
        match self.children {
            None => LinkState::Leaf,
            Some(_) if self.connected => LinkState::Connected,
            Some(_) => LinkState::Pending,
        }
    }

    /// Whether a parent may treat this node as finished.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.link_state().is_ready()
    }

    /// Records the result of a split.
    pub(crate) fn set_children(&mut self, axis: Axis, first: NodeId, second: NodeId) {
        debug_assert!(self.children.is_none(), "a node is split at most once");
        self.split_axis = Some(axis);
        self.children = Some((first, second));
    }

    /// Writes the room bounds.
    ///
    /// # Panics (debug builds only)
    /// Panics if the room was already written or reaches outside the cell.
    pub(crate) fn set_room(&mut self, room: Volume) {
        debug_assert!(self.room.is_none(), "a node's room is written exactly once");
        debug_assert!(
            self.cell.contains(&room),
            "a node's room must stay inside its cell"
        );
        self.room = Some(room);
    }

    /// Flips the connected flag.
    pub(crate) fn mark_connected(&mut self) {
        debug_assert!(
            self.children.is_some(),
            "only split nodes take part in connectivity"
        );
        debug_assert!(!self.connected, "a node is connected at most once");
        self.connected = true;
    }
}
