//! Procedural dungeon generation over a BSP (Binary Space Partitioning) tree.

mod error;
mod volume;

pub mod dungeon;

pub use dungeon::{
    aggregate_bounds, generate_rooms, ConnectReport, ConnectivitySolver, DungeonGenerator,
    GeneratorConfig, GeometrySink, LinkState, Node, NodeId, PartitionTree, PlacedVolume,
    PrimitiveKind, RandomHalving, RoomGenerator, Split, SplitPolicy, StagedScene, SurfaceProbe,
    SweepReport, Tint,
};
pub use error::GenerationError;
pub use volume::{Axis, Volume, VOLUME_EPSILON};
