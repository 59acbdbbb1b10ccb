use bsp_dungeon::{
    DungeonGenerator, GenerationError, GeneratorConfig, PartitionTree, PrimitiveKind, StagedScene,
    Volume,
};
use dungeon_viz::{seed_from_args, tint_color};
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

/// Maps world XZ coordinates onto the screen with a uniform scale.
struct Projection {
    scale: f32,
    offset: Vec2,
    site_min: Vec2,
}

impl Projection {
    /// Fits the site into the window below the HUD, recomputed per frame so
    /// resizing the window keeps the map in view.
    fn fit(site: &Volume) -> Self {
        let size = site.size();
        let margin = 40.0;
        let hud = 100.0;
        let scale = ((screen_width() - 2.0 * margin) / size.x)
            .min((screen_height() - hud - margin) / size.z);
        Self {
            scale,
            offset: vec2(margin, hud),
            site_min: vec2(site.min().x, site.min().z),
        }
    }

    fn rect(&self, volume: &Volume) -> Rect {
        let min = volume.min();
        let size = volume.size();
        Rect::new(
            self.offset.x + (min.x - self.site_min.x) * self.scale,
            self.offset.y + (min.z - self.site_min.y) * self.scale,
            size.x * self.scale,
            size.z * self.scale,
        )
    }
}

#[macroquad::main("Dungeon Overhead Map")]
async fn main() {
    env_logger::init();

    let mut seed = seed_from_args().unwrap_or_else(::rand::random);
    let mut generated = generate(seed).inspect_err(|err| error!("generation failed: {err}"));

    loop {
        if is_key_pressed(KeyCode::R) {
            seed = seed.wrapping_add(1);
            generated = generate(seed).inspect_err(|err| error!("generation failed: {err}"));
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));

        let site = demo_site();
        let projection = Projection::fit(&site);

        match &generated {
            Ok(dungeon) => {
                for id in dungeon.tree.leaves() {
                    let rect = projection.rect(dungeon.tree.node(id).cell());
                    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, DARKGRAY);
                }

                // Rooms first so the white corridors stay readable on top.
                for placed in dungeon.scene.visible() {
                    if placed.kind == PrimitiveKind::Room {
                        let rect = projection.rect(&placed.volume);
                        draw_rectangle(rect.x, rect.y, rect.w, rect.h, tint_color(placed.tint));
                    }
                }
                for placed in dungeon.scene.visible() {
                    if placed.kind == PrimitiveKind::Corridor {
                        let rect = projection.rect(&placed.volume);
                        draw_rectangle(rect.x, rect.y, rect.w, rect.h, WHITE);
                    }
                }

                let rooms = dungeon.tree.leaves().len();
                draw_text(
                    &format!(
                        "Overhead map - seed {seed}: {rooms} rooms, {} corridors",
                        dungeon.tree.len() - rooms
                    ),
                    10.0,
                    25.0,
                    20.0,
                    WHITE,
                );
            }
            Err(err) => {
                draw_text(&format!("Generation failed: {err}"), 10.0, 25.0, 20.0, RED);
            }
        }

        let border = projection.rect(&site);
        draw_rectangle_lines(border.x, border.y, border.w, border.h, 2.0, GRAY);

        draw_text("[R] regenerate", 10.0, 50.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 70.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
