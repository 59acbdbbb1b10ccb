//! Room carving and room-bounds aggregation.

use nalgebra::{Point3, Vector3};
use rand::Rng;

use crate::dungeon::config::GeneratorConfig;
use crate::dungeon::node::NodeId;
use crate::dungeon::scene::{GeometrySink, PrimitiveKind};
use crate::dungeon::tree::PartitionTree;
use crate::error::GenerationError;
use crate::volume::{Axis, Volume};

/// Carves randomized rooms inside leaf cells.
///
/// On each horizontal axis the room reaches a random distance past the cell
/// center toward both walls, drawn from
/// `[max(center_buffer, extent / 2), extent - edge_buffer]`. A successful
/// carve therefore guarantees:
///
/// - the room keeps at least `edge_buffer` of clearance to every wall,
/// - the room's extent is at least half the cell's extent on both horizontal
///   axes,
/// - the room reaches at least `center_buffer` past the cell center in all
///   four horizontal directions,
/// - the room spans the full cell height.
///
/// The center reach is what keeps corridors straight: sibling rooms always
/// share at least `2 * center_buffer` of projected overlap across their
/// boundary plane, and the union bounds built by [`aggregate_bounds`]
/// preserve that reach all the way up the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomGenerator {
    edge_buffer: f32,
    center_buffer: f32,
}

impl RoomGenerator {
    /// Creates a generator from the two buffer distances.
    pub fn new(edge_buffer: f32, center_buffer: f32) -> Self {
        Self {
            edge_buffer,
            center_buffer,
        }
    }

    /// Carves a room inside `cell`.
    ///
    /// Fails with [`GenerationError::RoomDoesNotFit`] if the cell is too
    /// tight for the buffers on either horizontal axis; the room is never
    /// silently clamped.
    pub fn carve<R: Rng + ?Sized>(
        &self,
        cell: &Volume,
        rng: &mut R,
    ) -> Result<Volume, GenerationError> {
        let (size_x, center_x) = self.carve_axis(cell, Axis::X, rng)?;
        let (size_z, center_z) = self.carve_axis(cell, Axis::Z, rng)?;

        Ok(Volume::new(
            Point3::new(center_x, cell.center().y, center_z),
            Vector3::new(size_x / 2.0, cell.extents().y, size_z / 2.0),
        ))
    }

    /// Draws the room's reach toward both walls on one axis and returns the
    /// resulting size and center coordinate.
    fn carve_axis<R: Rng + ?Sized>(
        &self,
        cell: &Volume,
        axis: Axis,
        rng: &mut R,
    ) -> Result<(f32, f32), GenerationError> {
        let extent = cell.extent_on(axis);
        let lo = self.center_buffer.max(extent / 2.0);
        let hi = extent - self.edge_buffer;
        if lo > hi {
            return Err(GenerationError::RoomDoesNotFit { cell: *cell, axis });
        }

        let toward_max = rng.random_range(lo..=hi);
        let toward_min = rng.random_range(lo..=hi);
        let size = toward_max + toward_min;
        let center = cell.center_on(axis) + (toward_max - toward_min) / 2.0;
        Ok((size, center))
    }
}

impl From<&GeneratorConfig> for RoomGenerator {
    fn from(config: &GeneratorConfig) -> Self {
        Self::new(config.edge_buffer, config.center_buffer)
    }
}

/// Carves a room for every leaf and requests its instantiation.
///
/// Leaves are visited in depth-first order. Internal nodes are left alone;
/// their bounds come from [`aggregate_bounds`] afterwards.
pub fn generate_rooms<S, R>(
    tree: &mut PartitionTree,
    rooms: &RoomGenerator,
    sink: &mut S,
    rng: &mut R,
) -> Result<(), GenerationError>
where
    S: GeometrySink,
    R: Rng + ?Sized,
{
    for id in tree.leaves() {
        let cell = *tree.node(id).cell();
        let tint = tree.node(id).tint();
        let room = rooms.carve(&cell, rng)?;
        tree.node_mut(id).set_room(room);
        sink.instantiate(&room, PrimitiveKind::Room, tint);
    }
    Ok(())
}

/// Writes every internal node's room bounds, bottom-up.
///
/// After this pass each internal node holds the union of its children's
/// rooms, so any node's room bound encloses every leaf room in its subtree.
/// Pure geometry: no scene requests are made.
///
/// # Panics
/// Panics if a leaf is missing its room, i.e. if [`generate_rooms`] has not
/// run first.
pub fn aggregate_bounds(tree: &mut PartitionTree) {
    let root = tree.root_id();
    aggregate_below(tree, root);
}

fn aggregate_below(tree: &mut PartitionTree, id: NodeId) {
    if let Some((first, second)) = tree.node(id).children() {
        aggregate_below(tree, first);
        aggregate_below(tree, second);

        let a = *tree
            .node(first)
            .room()
            .expect("rooms must be carved before aggregation");
        let b = *tree
            .node(second)
            .room()
            .expect("rooms must be carved before aggregation");
        tree.node_mut(id).set_room(a.union(&b));
    }
}
