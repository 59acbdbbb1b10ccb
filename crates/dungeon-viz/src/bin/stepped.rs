use bsp_dungeon::{
    aggregate_bounds, generate_rooms, ConnectivitySolver, GenerationError, GeneratorConfig,
    GeometrySink, LinkState, PartitionTree, RandomHalving, RoomGenerator, StagedScene,
    SweepReport, Volume,
};
use dungeon_viz::{draw_placed, draw_placed_wires, draw_volume_wires, seed_from_args, OrbitCamera};
use log::error;
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};
use ::rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The demo site: a flat 100 x 10 x 100 slab centered on the origin.
fn demo_site() -> Volume {
    Volume::new(Point3::origin(), Vector3::new(50.0, 5.0, 50.0))
}

/// Drives the pipeline one connectivity sweep at a time.
///
/// Partitioning and room carving happen up front, but nothing is committed:
/// every room starts out staged, and each step publishes the staged geometry
/// before sweeping, exactly as the generator does internally.
struct Stepper {
    tree: PartitionTree,
    scene: StagedScene,
    solver: ConnectivitySolver,
    rng: ChaCha8Rng,
    sweeps: usize,
    last: Option<SweepReport>,
    error: Option<GenerationError>,
}

impl Stepper {
    fn start(seed: u64) -> Self {
        let config = GeneratorConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut tree =
            PartitionTree::build(demo_site(), &RandomHalving::from(&config), &mut rng);
        let mut scene = StagedScene::new();

        let error = generate_rooms(&mut tree, &RoomGenerator::from(&config), &mut scene, &mut rng)
            .inspect_err(|err| error!("room carving failed: {err}"))
            .err();
        if error.is_none() {
            aggregate_bounds(&mut tree);
        }

        Self {
            tree,
            scene,
            solver: ConnectivitySolver::from(&config),
            rng,
            sweeps: 0,
            last: None,
            error,
        }
    }

    fn done(&self) -> bool {
        self.last
            .is_some_and(|report| report.connected == 0 && report.pending == 0)
    }

    /// Commits staged geometry, then runs one sweep.
    fn step(&mut self) {
        if self.error.is_some() || self.done() {
            return;
        }
        self.scene.commit();
        match self
            .solver
            .sweep(&mut self.tree, &mut self.scene, &mut self.rng)
        {
            Ok(report) => {
                self.sweeps += 1;
                self.last = Some(report);
            }
            Err(err) => {
                error!("sweep failed: {err}");
                self.error = Some(err);
            }
        }
    }

    fn count(&self, state: LinkState) -> usize {
        self.tree
            .ids()
            .filter(|&id| self.tree.node(id).link_state() == state)
            .count()
    }
}

#[macroquad::main("Dungeon Connectivity Sweeps")]
async fn main() {
    env_logger::init();

    let mut seed = seed_from_args().unwrap_or_else(::rand::random);
    let mut stepper = Stepper::start(seed);

    let site = demo_site();
    let mut camera = OrbitCamera::framing(&site);

    loop {
        camera.update();

        if is_key_pressed(KeyCode::Space) {
            stepper.step();
        }
        if is_key_pressed(KeyCode::R) {
            seed = seed.wrapping_add(1);
            stepper = Stepper::start(seed);
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        draw_volume_wires(&site, GRAY);
        for id in stepper.tree.leaves() {
            draw_volume_wires(stepper.tree.node(id).cell(), DARKGRAY);
        }

        // Published geometry solid, staged geometry as ghosts.
        for placed in stepper.scene.visible() {
            draw_placed(placed);
            draw_placed_wires(placed, Color::from_rgba(0, 0, 0, 120));
        }
        for placed in stepper.scene.pending() {
            draw_placed_wires(placed, YELLOW);
        }

        set_default_camera();

        draw_text(
            &format!("Connectivity sweeps - seed {seed}"),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Leaves: {} | Pending: {} | Connected: {}",
                stepper.count(LinkState::Leaf),
                stepper.count(LinkState::Pending),
                stepper.count(LinkState::Connected),
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        let status = match (&stepper.error, stepper.last) {
            (Some(err), _) => format!("Failed: {err}"),
            (None, None) => format!("Staged: {} rooms awaiting commit", stepper.scene.pending().len()),
            (None, Some(report)) => format!(
                "Sweep {}: connected {}, pending {} | staged {}",
                stepper.sweeps,
                report.connected,
                report.pending,
                stepper.scene.pending().len()
            ),
        };
        let status_color = if stepper.error.is_some() {
            RED
        } else if stepper.done() {
            GREEN
        } else {
            YELLOW
        };
        draw_text(&status, 10.0, 65.0, 18.0, status_color);
        if stepper.done() {
            draw_text("Fully connected", 10.0, 85.0, 18.0, GREEN);
        }

        draw_text(
            "[Space] commit + sweep | [R] restart | drag to rotate, scroll to zoom",
            10.0,
            110.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 130.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
