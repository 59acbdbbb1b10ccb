//! Scene collaborators for dungeon generation.
//!
//! The generator never talks to an engine directly. All scene effects go
//! through two narrow traits: [`GeometrySink`] receives fire-and-forget
//! requests to realize rooms and corridors, and [`SurfaceProbe`] answers ray
//! queries against whatever geometry the sink has realized so far.
//!
//! Corridor endpoints are discovered by probing, so sinks that realize
//! geometry lazily must uphold one timing contract: everything instantiated
//! before a [`GeometrySink::commit`] call is probe-visible after it returns.
//! The connectivity solver commits between sweeps and never probes for
//! geometry requested in the current sweep.

use nalgebra::{Point3, Vector3};
use rand::Rng;

use crate::volume::{Volume, VOLUME_EPSILON};

/// What kind of primitive an instantiation request describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// A room carved inside a leaf cell.
    Room,
    /// A straight corridor joining two sibling subtrees.
    Corridor,
}

/// An RGB color tag attached to instantiation requests.
///
/// Rooms carry their node's randomly hued tint so adjacent rooms are easy to
/// tell apart; corridors are white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Tint {
    /// The corridor color.
    pub const WHITE: Tint = Tint {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Converts an HSV triple to a tint.
    ///
    /// `hue` wraps around 1.0; `saturation` and `value` are clamped to
    /// `[0, 1]`.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);
        let h = (hue.fract() + 1.0).fract() * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector as u32 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self { r, g, b }
    }

    /// Draws a random fully-bright hue at 0.8 saturation.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_hsv(rng.random_range(0.0..1.0), 0.8, 1.0)
    }
}

/// Receiver for geometry instantiation requests.
///
/// Requests are fire-and-forget: no handle comes back, and the generator
/// never mutates or removes geometry it has requested.
pub trait GeometrySink {
    /// Requests that `volume` be realized as a `kind` primitive.
    fn instantiate(&mut self, volume: &Volume, kind: PrimitiveKind, tint: Tint);

    /// Marks a sweep boundary.
    ///
    /// After this returns, every volume instantiated before the call must be
    /// visible to probes. Sinks that realize geometry immediately can keep
    /// the default no-op.
    fn commit(&mut self) {}
}

/// Answers ray queries against realized scene geometry.
pub trait SurfaceProbe {
    /// Returns the first surface point hit along the ray, if any.
    fn probe(&self, origin: Point3<f32>, direction: Vector3<f32>) -> Option<Point3<f32>>;
}

/// A volume realized (or queued) by a [`StagedScene`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedVolume {
    pub volume: Volume,
    pub kind: PrimitiveKind,
    pub tint: Tint,
}

/// Reference implementation of both collaborator traits.
///
/// Instantiated volumes queue in a pending list; [`GeometrySink::commit`]
/// publishes them, which makes the one-sweep visibility latency of a real
/// engine observable to the solver and its tests. Probing is a nearest-hit
/// ray/box test over the published volumes.
#[derive(Debug, Default)]
pub struct StagedScene {
    visible: Vec<PlacedVolume>,
    pending: Vec<PlacedVolume>,
}

impl StagedScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the volumes visible to probes.
    pub fn visible(&self) -> &[PlacedVolume] {
        &self.visible
    }

    /// Returns the volumes requested since the last commit.
    pub fn pending(&self) -> &[PlacedVolume] {
        &self.pending
    }

    /// Returns every volume requested so far, published or not.
    pub fn placed(&self) -> impl Iterator<Item = &PlacedVolume> {
        self.visible.iter().chain(self.pending.iter())
    }

    /// Returns the total number of requests received.
    pub fn len(&self) -> usize {
        self.visible.len() + self.pending.len()
    }

    /// Returns `true` if no requests were received.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.pending.is_empty()
    }
}

impl GeometrySink for StagedScene {
    fn instantiate(&mut self, volume: &Volume, kind: PrimitiveKind, tint: Tint) {
        self.pending.push(PlacedVolume {
            volume: *volume,
            kind,
            tint,
        });
    }

    fn commit(&mut self) {
        self.visible.append(&mut self.pending);
    }
}

impl SurfaceProbe for StagedScene {
    fn probe(&self, origin: Point3<f32>, direction: Vector3<f32>) -> Option<Point3<f32>> {
        let mut nearest: Option<f32> = None;
        for placed in &self.visible {
            if let Some(t) = ray_box_entry(origin, direction, &placed.volume) {
                if nearest.is_none_or(|n| t < n) {
                    nearest = Some(t);
                }
            }
        }
        nearest.map(|t| origin + direction * t)
    }
}

/// Slab test returning the ray parameter of the box's entry face.
///
/// Surfaces behind the origin or within [`VOLUME_EPSILON`] of it do not
/// count, so a probe fired from a face it just created cannot hit itself.
fn ray_box_entry(origin: Point3<f32>, direction: Vector3<f32>, volume: &Volume) -> Option<f32> {
    let min = volume.min();
    let max = volume.max();
    let mut t_entry = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for i in 0..3 {
        if direction[i].abs() > f32::EPSILON {
            let inv = 1.0 / direction[i];
            let t1 = (min[i] - origin[i]) * inv;
            let t2 = (max[i] - origin[i]) * inv;
            t_entry = t_entry.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
        } else if origin[i] < min[i] || origin[i] > max[i] {
            // Parallel to the slab and outside it.
            return None;
        }
    }

    if t_exit >= t_entry && t_entry > VOLUME_EPSILON {
        Some(t_entry)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_box(center: [f32; 3], extents: [f32; 3]) -> Volume {
        Volume::new(
            Point3::new(center[0], center[1], center[2]),
            Vector3::new(extents[0], extents[1], extents[2]),
        )
    }

    fn probe_x(scene: &StagedScene, sign: f32) -> Option<Point3<f32>> {
        scene.probe(Point3::new(0.0, 0.0, 0.0), Vector3::new(sign, 0.0, 0.0))
    }

    #[test]
    fn hsv_conversion_hits_primaries() {
        let red = Tint::from_hsv(0.0, 1.0, 1.0);
        assert_eq!((red.r, red.g, red.b), (1.0, 0.0, 0.0));

        let green = Tint::from_hsv(1.0 / 3.0, 1.0, 1.0);
        assert_approx_eq!(green.r, 0.0, 1e-5);
        assert_approx_eq!(green.g, 1.0, 1e-5);
        assert_approx_eq!(green.b, 0.0, 1e-5);

        let desaturated = Tint::from_hsv(0.0, 0.8, 1.0);
        assert_approx_eq!(desaturated.g, 0.2, 1e-5);
        assert_approx_eq!(desaturated.b, 0.2, 1e-5);
    }

    #[test]
    fn random_tints_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..100 {
            let tint = Tint::random(&mut rng);
            for channel in [tint.r, tint.g, tint.b] {
                assert!((0.0..=1.0).contains(&channel), "channel {channel} out of range");
            }
        }
    }

    #[test]
    fn geometry_is_invisible_until_commit() {
        let mut scene = StagedScene::new();
        scene.instantiate(
            &make_box([5.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
            PrimitiveKind::Room,
            Tint::WHITE,
        );

        assert_eq!(scene.pending().len(), 1);
        assert!(probe_x(&scene, 1.0).is_none());

        scene.commit();
        assert!(scene.pending().is_empty());
        assert_eq!(scene.visible().len(), 1);
        assert_eq!(probe_x(&scene, 1.0), Some(Point3::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn probe_returns_nearest_entry_face() {
        let mut scene = StagedScene::new();
        scene.instantiate(
            &make_box([10.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
            PrimitiveKind::Room,
            Tint::WHITE,
        );
        scene.instantiate(
            &make_box([5.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
            PrimitiveKind::Room,
            Tint::WHITE,
        );
        scene.commit();

        assert_eq!(probe_x(&scene, 1.0), Some(Point3::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn probe_ignores_geometry_behind_the_origin() {
        let mut scene = StagedScene::new();
        scene.instantiate(
            &make_box([-5.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
            PrimitiveKind::Room,
            Tint::WHITE,
        );
        scene.commit();

        assert!(probe_x(&scene, 1.0).is_none());
        assert_eq!(probe_x(&scene, -1.0), Some(Point3::new(-4.0, 0.0, 0.0)));
    }

    #[test]
    fn probe_misses_offset_geometry() {
        let mut scene = StagedScene::new();
        scene.instantiate(
            &make_box([5.0, 0.0, 10.0], [1.0, 1.0, 1.0]),
            PrimitiveKind::Room,
            Tint::WHITE,
        );
        scene.commit();

        assert!(probe_x(&scene, 1.0).is_none());
    }

    #[test]
    fn placed_spans_both_lists() {
        let mut scene = StagedScene::new();
        scene.instantiate(
            &make_box([5.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
            PrimitiveKind::Room,
            Tint::WHITE,
        );
        scene.commit();
        scene.instantiate(
            &make_box([8.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
            PrimitiveKind::Corridor,
            Tint::WHITE,
        );

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.placed().count(), 2);
        let kinds: Vec<_> = scene.placed().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PrimitiveKind::Room, PrimitiveKind::Corridor]);
    }
}
