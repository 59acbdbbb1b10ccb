//! Shared visualization utilities for the dungeon generator binaries.

use bsp_dungeon::{PlacedVolume, Tint, Volume};
use macroquad::prelude::*;

/// Converts a generator tint to a macroquad color.
pub fn tint_color(tint: Tint) -> Color {
    Color::new(tint.r, tint.g, tint.b, 1.0)
}

/// Returns a volume's center as a macroquad vector.
pub fn center_vec3(volume: &Volume) -> Vec3 {
    let center = volume.center();
    vec3(center.x, center.y, center.z)
}

/// Returns a volume's full size as a macroquad vector.
pub fn size_vec3(volume: &Volume) -> Vec3 {
    let size = volume.size();
    vec3(size.x, size.y, size.z)
}

/// Draws a placed volume as a solid cube in its tint.
pub fn draw_placed(placed: &PlacedVolume) {
    draw_cube(
        center_vec3(&placed.volume),
        size_vec3(&placed.volume),
        None,
        tint_color(placed.tint),
    );
}

/// Draws a placed volume as a wireframe, e.g. for staged geometry.
pub fn draw_placed_wires(placed: &PlacedVolume, color: Color) {
    draw_cube_wires(center_vec3(&placed.volume), size_vec3(&placed.volume), color);
}

/// Draws a volume outline, e.g. for partition cells.
pub fn draw_volume_wires(volume: &Volume, color: Color) {
    draw_cube_wires(center_vec3(volume), size_vec3(volume), color);
}

/// Reads the dungeon seed from the first CLI argument, if present.
pub fn seed_from_args() -> Option<u64> {
    std::env::args().nth(1).and_then(|arg| arg.parse().ok())
}

/// Simple orbit camera for inspecting a generated dungeon.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    /// Minimum distance from target
    pub min_distance: f32,
    /// Maximum distance from target
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Creates a camera framing the whole site from a high diagonal view.
    pub fn framing(site: &Volume) -> Self {
        let span = site.size().x.max(site.size().z);
        Self {
            distance: span * 1.2,
            yaw: 0.6,
            pitch: 0.7,
            target: center_vec3(site),
            zoom_speed: span * 0.05,
            min_distance: span * 0.15,
            max_distance: span * 4.0,
        }
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        // Mouse drag for rotation
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        // Clamp pitch to avoid gimbal lock
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        // Mouse wheel for zoom
        let scroll = mouse_wheel().1;
        self.distance -= scroll * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        // Arrow keys for rotation
        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}
