//! The façade driving the three generation phases end to end.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::dungeon::config::GeneratorConfig;
use crate::dungeon::connect::ConnectivitySolver;
use crate::dungeon::rooms::{aggregate_bounds, generate_rooms, RoomGenerator};
use crate::dungeon::scene::{GeometrySink, SurfaceProbe};
use crate::dungeon::split::RandomHalving;
use crate::dungeon::tree::PartitionTree;
use crate::error::GenerationError;
use crate::volume::Volume;

/// Generates complete dungeons: partition, furnish, connect.
///
/// Owns a validated [`GeneratorConfig`] and a seeded RNG. All randomness
/// flows through that single RNG, so a generator built with
/// [`DungeonGenerator::seeded`] produces the identical tree and the identical
/// scene request stream for the identical seed, configuration and root cell.
///
/// ```ignore
/// let mut scene = StagedScene::new();
/// let mut generator = DungeonGenerator::seeded(GeneratorConfig::default(), 7)?;
/// let tree = generator.generate(root_cell, &mut scene)?;
/// ```
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
}

impl DungeonGenerator {
    /// Creates a generator with a seed drawn from the thread RNG.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        Self::seeded(config, rand::rng().random())
    }

    /// Creates a deterministic generator from an explicit seed.
    ///
    /// Fails if the configuration does not validate.
    pub fn seeded(config: GeneratorConfig, seed: u64) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Returns the configuration the generator runs with.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates one dungeon inside `root_cell` against `scene`.
    ///
    /// Runs the full pipeline: recursive partitioning, leaf room carving,
    /// bottom-up bound aggregation, then connectivity sweeps to the fixed
    /// point. Returns the finished tree; the geometry lives in the scene the
    /// caller passed in. The RNG advances, so calling this twice yields two
    /// different dungeons.
    pub fn generate<S>(
        &mut self,
        root_cell: Volume,
        scene: &mut S,
    ) -> Result<PartitionTree, GenerationError>
    where
        S: GeometrySink + SurfaceProbe,
    {
        let policy = RandomHalving::from(&self.config);
        let mut tree = PartitionTree::build(root_cell, &policy, &mut self.rng);
        debug!(
            "partitioned root into {} nodes ({} leaves, depth {})",
            tree.len(),
            tree.leaves().len(),
            tree.depth()
        );

        let rooms = RoomGenerator::from(&self.config);
        generate_rooms(&mut tree, &rooms, scene, &mut self.rng)?;
        aggregate_bounds(&mut tree);

        let solver = ConnectivitySolver::from(&self.config);
        let report = solver.run(&mut tree, scene, &mut self.rng)?;

        info!(
            "generated dungeon: {} rooms, {} corridors, {} sweeps",
            tree.leaves().len(),
            report.corridors,
            report.sweeps
        );
        Ok(tree)
    }
}
