//! Corridor synthesis and the connectivity fixed point.
//!
//! After the furnish phase every node carries room bounds, but only leaves
//! hold geometry a player could walk through. This module joins the tree into
//! one walkable dungeon, bottom-up:
//!
//! 1. A sweep visits every node in post-order. A node whose two children were
//!    both ready (leaf or connected) *before the sweep started* gets a
//!    corridor between its children's room bounds and becomes connected.
//! 2. Sweeps repeat until one connects nothing, which is the fixed point:
//!    either every node is ready, or the run stalls and is reported as an
//!    error rather than looping.
//!
//! Corridor endpoints come from probing already-realized geometry, which is
//! why readiness is snapshotted per sweep: a corridor requested in sweep N is
//! only guaranteed probe-visible after the commit that precedes sweep N + 1,
//! so a node must never be joined in the sweep that connected its children.
//! [`ConnectivitySolver::run`] commits between sweeps; callers driving
//! [`ConnectivitySolver::sweep`] manually (e.g. to animate the process) must
//! do the same.

use log::debug;
use nalgebra::Vector3;
use rand::Rng;

use crate::dungeon::config::GeneratorConfig;
use crate::dungeon::node::NodeId;
use crate::dungeon::scene::{GeometrySink, PrimitiveKind, SurfaceProbe, Tint};
use crate::dungeon::tree::PartitionTree;
use crate::error::GenerationError;
use crate::volume::{Axis, Volume};

/// What a single connectivity sweep did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Nodes connected during the sweep.
    pub connected: usize,
    /// Nodes still pending after the sweep.
    pub pending: usize,
}

/// Summary of a completed run to the fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectReport {
    /// Sweeps executed, including the final one that connected nothing.
    pub sweeps: usize,
    /// Corridors requested in total.
    pub corridors: usize,
}

/// Joins sibling subtrees with straight corridors until the whole tree is
/// connected.
///
/// The solver reads room bounds and writes connected flags; all geometry
/// flows through the scene collaborator passed to each call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectivitySolver {
    corridor_width: f32,
}

impl ConnectivitySolver {
    /// Creates a solver emitting corridors of the given width.
    pub fn new(corridor_width: f32) -> Self {
        Self { corridor_width }
    }

    /// Runs sweeps until a fixed point and returns the run summary.
    ///
    /// Calls `scene.commit()` before every sweep so that rooms and earlier
    /// corridors are probe-visible. Fails with [`GenerationError::Stalled`]
    /// if a sweep connects nothing while nodes are still pending; succeeds
    /// when a sweep connects nothing and none are left. Running again on a
    /// connected tree is a no-op that requests no geometry.
    ///
    /// # Panics
    /// Panics if room bounds have not been aggregated yet.
    pub fn run<S, R>(
        &self,
        tree: &mut PartitionTree,
        scene: &mut S,
        rng: &mut R,
    ) -> Result<ConnectReport, GenerationError>
    where
        S: GeometrySink + SurfaceProbe,
        R: Rng + ?Sized,
    {
        let mut sweeps = 0;
        let mut corridors = 0;
        loop {
            scene.commit();
            let report = self.sweep(tree, scene, rng)?;
            sweeps += 1;
            corridors += report.connected;
            debug!(
                "connectivity sweep {sweeps}: connected {}, pending {}",
                report.connected, report.pending
            );

            if report.connected == 0 {
                return if report.pending == 0 {
                    Ok(ConnectReport { sweeps, corridors })
                } else {
                    Err(GenerationError::Stalled {
                        pending: report.pending,
                    })
                };
            }
        }
    }

    /// Runs one bottom-up sweep over the whole tree.
    ///
    /// Readiness is snapshotted before the walk: a node connects in this
    /// sweep only if both children were ready when it started, so one tree
    /// level connects per sweep and no probe ever depends on geometry
    /// requested in the current sweep.
    ///
    /// # Panics
    /// Panics if a visited node's children are missing room bounds.
    pub fn sweep<S, R>(
        &self,
        tree: &mut PartitionTree,
        scene: &mut S,
        rng: &mut R,
    ) -> Result<SweepReport, GenerationError>
    where
        S: GeometrySink + SurfaceProbe,
        R: Rng + ?Sized,
    {
        let ready: Vec<bool> = tree.ids().map(|id| tree.node(id).is_ready()).collect();
        let root = tree.root_id();
        let mut connected = 0;
        self.sweep_below(tree, root, &ready, scene, rng, &mut connected)?;

        let pending = tree.ids().filter(|&id| !tree.node(id).is_ready()).count();
        Ok(SweepReport { connected, pending })
    }

    fn sweep_below<S, R>(
        &self,
        tree: &mut PartitionTree,
        id: NodeId,
        ready: &[bool],
        scene: &mut S,
        rng: &mut R,
        connected: &mut usize,
    ) -> Result<(), GenerationError>
    where
        S: GeometrySink + SurfaceProbe,
        R: Rng + ?Sized,
    {
        let Some((first, second)) = tree.node(id).children() else {
            return Ok(());
        };
        self.sweep_below(tree, first, ready, scene, rng, connected)?;
        self.sweep_below(tree, second, ready, scene, rng, connected)?;

        if !tree.node(id).is_connected() && ready[first.index()] && ready[second.index()] {
            self.join_children(tree, id, scene, rng)?;
            tree.node_mut(id).mark_connected();
            *connected += 1;
        }
        Ok(())
    }

    /// Synthesizes the corridor joining `id`'s two children and requests its
    /// instantiation.
    fn join_children<S, R>(
        &self,
        tree: &PartitionTree,
        id: NodeId,
        scene: &mut S,
        rng: &mut R,
    ) -> Result<(), GenerationError>
    where
        S: GeometrySink + SurfaceProbe,
        R: Rng + ?Sized,
    {
        let node = tree.node(id);
        let axis = node.split_axis().expect("only split nodes are joined");
        let (first, second) = node.children().expect("only split nodes are joined");
        let room_a = tree
            .node(first)
            .room()
            .expect("room bounds must be aggregated before connecting");
        let room_b = tree
            .node(second)
            .room()
            .expect("room bounds must be aggregated before connecting");

        // The corridor crosses the boundary plane somewhere both subtrees'
        // bounds cover, inset so its walls cannot graze a room corner.
        let perp = axis.perpendicular();
        let (lo, hi) = overlap_interval(room_a, room_b, perp);
        let width = hi - lo;
        if width < self.corridor_width {
            return Err(GenerationError::OverlapTooNarrow {
                axis: perp,
                width,
                needed: self.corridor_width,
            });
        }
        let half_width = self.corridor_width / 2.0;
        let crossing = rng.random_range((lo + half_width)..=(hi - half_width));

        let mut origin = node.cell().center();
        origin[perp.index()] = crossing;
        let direction = axis.unit();

        let forward = scene
            .probe(origin, direction)
            .ok_or(GenerationError::ProbeMiss { origin, direction })?;
        let backward = scene
            .probe(origin, -direction)
            .ok_or(GenerationError::ProbeMiss {
                origin,
                direction: -direction,
            })?;

        let near = forward[axis.index()].min(backward[axis.index()]);
        let far = forward[axis.index()].max(backward[axis.index()]);
        debug_assert!(
            far > near,
            "opposite probes must land on opposite sides of the boundary"
        );

        let mut center = origin;
        center[axis.index()] = (near + far) / 2.0;
        let mut extents = Vector3::new(half_width, half_width, half_width);
        extents[axis.index()] = (far - near) / 2.0;

        scene.instantiate(
            &Volume::new(center, extents),
            PrimitiveKind::Corridor,
            Tint::WHITE,
        );
        Ok(())
    }
}

impl From<&GeneratorConfig> for ConnectivitySolver {
    fn from(config: &GeneratorConfig) -> Self {
        Self::new(config.corridor_width)
    }
}

/// Projects two room bounds onto `axis` and returns their shared interval.
///
/// The result is `(lo, hi)` with `lo > hi` when the projections are
/// disjoint.
fn overlap_interval(a: &Volume, b: &Volume, axis: Axis) -> (f32, f32) {
    let (a_min, a_max) = a.span_on(axis);
    let (b_min, b_max) = b.span_on(axis);
    (a_min.max(b_min), a_max.min(b_max))
}
