//! Dungeon generation over a binary space partitioning tree.
//!
//! This module turns one axis-aligned volume into a connected dungeon in
//! three phases, each a complete pass over the tree:
//!
//! - Partition: recursively halve the root cell along random horizontal axes
//!   until no valid split remains
//! - Furnish: carve a buffered room into every leaf cell, then aggregate
//!   room bounds bottom-up
//! - Connect: join sibling subtrees with straight corridors, sweeping until
//!   the whole tree is one walkable component
//!
//! # Example
//!
//! ```ignore
//! use bsp_dungeon::{DungeonGenerator, GeneratorConfig, StagedScene, Volume};
//! use nalgebra::{Point3, Vector3};
//!
//! // A flat 100 x 10 x 100 site, centered on the origin
//! let site = Volume::new(Point3::origin(), Vector3::new(50.0, 5.0, 50.0));
//!
//! let mut scene = StagedScene::new();
//! let mut generator = DungeonGenerator::seeded(GeneratorConfig::default(), 7)?;
//! let tree = generator.generate(site, &mut scene)?;
//!
//! // Rooms and corridors are now realized in the scene
//! assert_eq!(scene.visible().len(), tree.len());
//! ```
//!
//! # Architecture
//!
//! - [`DungeonGenerator`]: The façade driving all three phases
//! - [`PartitionTree`]: Arena-backed binary tree of [`Node`] cells
//! - [`SplitPolicy`]: Strategy trait deciding whether and how a cell splits
//! - [`RoomGenerator`]: Carves buffered rooms into leaf cells
//! - [`ConnectivitySolver`]: Sweeps the tree, synthesizing corridors
//! - [`GeometrySink`] / [`SurfaceProbe`]: The seams to a real scene or engine
//! - [`StagedScene`]: Reference implementation of both seams

mod config;
mod connect;
mod generator;
mod node;
mod rooms;
mod scene;
mod split;
mod tree;

// Re-export main types
pub use config::GeneratorConfig;
pub use connect::{ConnectReport, ConnectivitySolver, SweepReport};
pub use generator::DungeonGenerator;
pub use node::{LinkState, Node, NodeId};
pub use rooms::{aggregate_bounds, generate_rooms, RoomGenerator};
pub use scene::{GeometrySink, PlacedVolume, PrimitiveKind, StagedScene, SurfaceProbe, Tint};
pub use split::{RandomHalving, Split, SplitPolicy};
pub use tree::PartitionTree;
