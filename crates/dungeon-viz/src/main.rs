use bsp_dungeon::{
    DungeonGenerator, GenerationError, GeneratorConfig, PartitionTree, StagedScene, Volume,
};
use dungeon_viz::{draw_placed, draw_placed_wires, draw_volume_wires, seed_from_args, OrbitCamera};
use log::{error, info};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};

/// The demo site: a flat 100 x 10 x 100 slab centered on the origin.
fn demo_site() -> Volume {
    Volume::new(Point3::origin(), Vector3::new(50.0, 5.0, 50.0))
}

struct Generated {
    tree: PartitionTree,
    scene: StagedScene,
}

fn generate(seed: u64) -> Result<Generated, GenerationError> {
    info!("generating dungeon with seed {seed}");
    let mut scene = StagedScene::new();
    let mut generator = DungeonGenerator::seeded(GeneratorConfig::default(), seed)?;
    let tree = generator.generate(demo_site(), &mut scene)?;
    Ok(Generated { tree, scene })
}

#[macroquad::main("Dungeon Visualization")]
async fn main() {
    env_logger::init();

    let mut seed = seed_from_args().unwrap_or_else(::rand::random);
    let mut generated = generate(seed).inspect_err(|err| error!("generation failed: {err}"));
    let mut show_cells = false;

    let site = demo_site();
    let mut camera = OrbitCamera::framing(&site);

    loop {
        camera.update();

        if is_key_pressed(KeyCode::R) {
            seed = seed.wrapping_add(1);
            generated = generate(seed).inspect_err(|err| error!("generation failed: {err}"));
        }
        if is_key_pressed(KeyCode::C) {
            show_cells = !show_cells;
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        draw_volume_wires(&site, GRAY);
        if let Ok(dungeon) = &generated {
            for placed in dungeon.scene.visible() {
                draw_placed(placed);
                draw_placed_wires(placed, Color::from_rgba(0, 0, 0, 120));
            }
            if show_cells {
                for id in dungeon.tree.leaves() {
                    draw_volume_wires(dungeon.tree.node(id).cell(), DARKGRAY);
                }
            }
        }

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(8.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 8.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 8.0), BLUE);

        set_default_camera();

        match &generated {
            Ok(dungeon) => {
                let rooms = dungeon.tree.leaves().len();
                let corridors = dungeon.tree.len() - rooms;
                draw_text(
                    &format!("Dungeon seed {seed} - {rooms} rooms, {corridors} corridors"),
                    10.0,
                    25.0,
                    20.0,
                    WHITE,
                );
                draw_text(
                    &format!(
                        "Tree: {} nodes, depth {}",
                        dungeon.tree.len(),
                        dungeon.tree.depth()
                    ),
                    10.0,
                    45.0,
                    18.0,
                    GRAY,
                );
            }
            Err(err) => {
                draw_text(&format!("Generation failed: {err}"), 10.0, 25.0, 20.0, RED);
            }
        }

        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 70.0, 16.0, DARKGRAY);
        draw_text("[R] regenerate | [C] toggle leaf cells", 10.0, 90.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 110.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
