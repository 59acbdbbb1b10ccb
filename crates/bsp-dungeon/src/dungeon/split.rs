//! Split policies for partition tree construction.
//!
//! The split policy decides where the partition stops: every candidate cell
//! it rejects becomes a leaf, and every leaf later holds a room. Policies are
//! pure geometry; a refused split is normal termination for that branch,
//! never an error.

use nalgebra::Vector3;
use rand::Rng;

use crate::dungeon::config::GeneratorConfig;
use crate::volume::{Axis, Volume};

/// The outcome of an accepted split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    /// The axis the cell was halved along.
    pub axis: Axis,
    /// The half on the negative side of the axis.
    pub first: Volume,
    /// The half on the positive side of the axis.
    pub second: Volume,
}

/// Strategy for deciding whether and how to split a cell.
///
/// The shipped policy is [`RandomHalving`]; alternative policies (weighted
/// axis choice, off-center cuts) only need to keep the exact-tiling property:
/// the two returned halves must be disjoint and cover the cell.
pub trait SplitPolicy {
    /// Checks whether a candidate cell is acceptable on its own.
    fn is_valid(&self, cell: &Volume) -> bool;

    /// Attempts to split `cell`, returning `None` if the attempt produced an
    /// unacceptable half.
    fn try_split<R: Rng + ?Sized>(&self, cell: &Volume, rng: &mut R) -> Option<Split>;
}

/// Halves a cell along a uniformly random horizontal axis.
///
/// A split is accepted only if **both** halves individually clear the volume
/// floor and sit inside the aspect-ratio band. One axis is drawn per attempt;
/// a rejected draw is not retried on the other axis, which keeps leaf sizes
/// varied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomHalving {
    min_volume: f32,
    min_aspect: f32,
    max_aspect: f32,
}

impl RandomHalving {
    /// Creates a policy from a volume floor and an aspect-ratio band.
    pub fn new(min_volume: f32, min_aspect: f32, max_aspect: f32) -> Self {
        Self {
            min_volume,
            min_aspect,
            max_aspect,
        }
    }
}

impl From<&GeneratorConfig> for RandomHalving {
    fn from(config: &GeneratorConfig) -> Self {
        Self::new(config.min_cell_volume, config.min_aspect, config.max_aspect)
    }
}

impl SplitPolicy for RandomHalving {
    fn is_valid(&self, cell: &Volume) -> bool {
        cell.volume() >= self.min_volume
            && (self.min_aspect..=self.max_aspect).contains(&cell.aspect_ratio())
    }

    fn try_split<R: Rng + ?Sized>(&self, cell: &Volume, rng: &mut R) -> Option<Split> {
        let axis = if rng.random_bool(0.5) { Axis::X } else { Axis::Z };
        let (first, second) = halve(cell, axis);
        (self.is_valid(&first) && self.is_valid(&second)).then_some(Split {
            axis,
            first,
            second,
        })
    }
}

/// Cuts a cell into two equal halves along `axis`.
///
/// The halves share the boundary plane through the cell center and tile the
/// cell exactly.
fn halve(cell: &Volume, axis: Axis) -> (Volume, Volume) {
    let mut extents = cell.extents();
    extents[axis.index()] *= 0.5;

    let mut offset = Vector3::zeros();
    offset[axis.index()] = extents[axis.index()];

    (
        Volume::new(cell.center() - offset, extents),
        Volume::new(cell.center() + offset, extents),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use nalgebra::Point3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_cell(extents: [f32; 3]) -> Volume {
        Volume::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(extents[0], extents[1], extents[2]),
        )
    }

    fn default_policy() -> RandomHalving {
        RandomHalving::from(&GeneratorConfig::default())
    }

    #[test]
    fn validity_checks_volume_floor() {
        let policy = default_policy();

        // 6 x 2 x 6 = 72, far below the 800 floor.
        assert!(!policy.is_valid(&make_cell([3.0, 1.0, 3.0])));
        // 20 x 10 x 20 = 4000.
        assert!(policy.is_valid(&make_cell([10.0, 5.0, 10.0])));
    }

    #[test]
    fn validity_checks_aspect_band() {
        let policy = default_policy();

        // 100 x 10 footprint: ratio 10, too wide.
        assert!(!policy.is_valid(&make_cell([50.0, 5.0, 5.0])));
        // 10 x 100 footprint: ratio 0.1, too deep.
        assert!(!policy.is_valid(&make_cell([5.0, 5.0, 50.0])));
        // 50 x 10 footprint: ratio 5, on the inclusive boundary.
        assert!(policy.is_valid(&make_cell([25.0, 5.0, 5.0])));
    }

    #[test]
    fn halve_tiles_the_parent() {
        let cell = make_cell([50.0, 5.0, 50.0]);

        for axis in [Axis::X, Axis::Z] {
            let (first, second) = halve(&cell, axis);

            assert!(!first.overlaps(&second));
            assert_eq!(first.union(&second), cell);
            assert_approx_eq!(first.volume() + second.volume(), cell.volume(), 1e-2);

            // Halves differ only along the split axis.
            assert!(first.center_on(axis) < second.center_on(axis));
            let perp = axis.perpendicular();
            assert_eq!(first.center_on(perp), second.center_on(perp));
            assert_eq!(first.extent_on(axis), cell.extent_on(axis) / 2.0);
        }
    }

    #[test]
    fn accepted_split_has_two_valid_halves() {
        let policy = default_policy();
        let cell = make_cell([50.0, 5.0, 50.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        // Both halves of the scenario root are 50_000 units at ratio 1:2,
        // so any drawn axis is acceptable.
        let split = policy.try_split(&cell, &mut rng).unwrap();
        assert!(policy.is_valid(&split.first));
        assert!(policy.is_valid(&split.second));
        assert_eq!(split.first.union(&split.second), cell);
    }

    #[test]
    fn split_refused_when_halves_fall_below_volume_floor() {
        let policy = default_policy();
        // 18 x 4 x 18 = 1296: valid itself, but either half is 648 < 800.
        let cell = make_cell([9.0, 2.0, 9.0]);
        assert!(policy.is_valid(&cell));

        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_eq!(policy.try_split(&cell, &mut rng), None);
        }
    }

    #[test]
    fn both_axes_are_drawn_across_seeds() {
        let policy = default_policy();
        let cell = make_cell([50.0, 5.0, 50.0]);

        let mut seen_x = false;
        let mut seen_z = false;
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match policy.try_split(&cell, &mut rng).unwrap().axis {
                Axis::X => seen_x = true,
                Axis::Z => seen_z = true,
            }
        }
        assert!(seen_x && seen_z, "axis draw should not be constant");
    }
}
