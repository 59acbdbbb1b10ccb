//! Error taxonomy for dungeon generation.

use nalgebra::{Point3, Vector3};
use thiserror::Error;

use crate::volume::{Axis, Volume};

/// Unrecoverable failures during dungeon generation.
///
/// Split rejection is not represented here: a cell that refuses to split is
/// normal termination for that branch. Everything below aborts the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// The configuration failed validation before any geometry was touched.
    #[error("invalid generator configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A leaf cell is too tight to fit a room honoring the configured
    /// edge and center buffers on the given axis.
    #[error("no room fits cell {cell:?} on axis {axis:?} with the configured buffers")]
    RoomDoesNotFit { cell: Volume, axis: Axis },

    /// Sibling room bounds projected on the axis perpendicular to the split
    /// overlap by less than one corridor width, so no straight corridor can
    /// join them.
    #[error(
        "room projections on axis {axis:?} overlap by {width} but the corridor needs {needed}"
    )]
    OverlapTooNarrow { axis: Axis, width: f32, needed: f32 },

    /// A surface probe returned no hit, leaving a corridor without an
    /// endpoint.
    #[error("surface probe from {origin:?} along {direction:?} hit nothing")]
    ProbeMiss {
        origin: Point3<f32>,
        direction: Vector3<f32>,
    },

    /// A connectivity sweep made no progress while nodes were still pending.
    #[error("connectivity stalled with {pending} nodes still pending")]
    Stalled { pending: usize },
}
