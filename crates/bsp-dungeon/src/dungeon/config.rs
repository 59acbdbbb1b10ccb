//! Generation parameters.

use crate::error::GenerationError;

/// Tuning parameters for the whole generation pipeline.
///
/// The defaults reproduce the canonical dungeon: cells keep a volume of at
/// least 800 units and a footprint between 1:5 and 5:1, rooms stay one unit
/// off their cell walls and reach at least two units past the cell center,
/// and corridors are one unit wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Minimum volume a candidate cell must enclose to be acceptable.
    pub min_cell_volume: f32,

    /// Lower bound on a cell's horizontal aspect ratio (width over depth).
    pub min_aspect: f32,

    /// Upper bound on a cell's horizontal aspect ratio.
    pub max_aspect: f32,

    /// Minimum gap between a room face and its cell wall.
    pub edge_buffer: f32,

    /// Minimum distance a room reaches past its cell center on each
    /// horizontal axis. Sibling rooms therefore always share at least
    /// `2 * center_buffer` of projected overlap, which is what keeps every
    /// corridor straight.
    pub center_buffer: f32,

    /// Corridor cross-section: its size on the perpendicular and vertical
    /// axes.
    pub corridor_width: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_cell_volume: 800.0,
            min_aspect: 0.2,
            max_aspect: 5.0,
            edge_buffer: 1.0,
            center_buffer: 2.0,
            corridor_width: 1.0,
        }
    }
}

impl GeneratorConfig {
    /// Checks the parameters for internal consistency.
    ///
    /// Rejects non-positive sizes, an inverted aspect band, and a corridor
    /// wider than the overlap the center buffer guarantees.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !(self.min_cell_volume > 0.0) || !self.min_cell_volume.is_finite() {
            return Err(self.invalid("min_cell_volume must be positive and finite"));
        }
        if !(self.min_aspect > 0.0) {
            return Err(self.invalid("min_aspect must be positive"));
        }
        if self.max_aspect < self.min_aspect {
            return Err(self.invalid("max_aspect must not be below min_aspect"));
        }
        if !(self.edge_buffer > 0.0) {
            return Err(self.invalid("edge_buffer must be positive"));
        }
        if !(self.center_buffer > 0.0) {
            return Err(self.invalid("center_buffer must be positive"));
        }
        if !(self.corridor_width > 0.0) {
            return Err(self.invalid("corridor_width must be positive"));
        }
        if self.corridor_width > 2.0 * self.center_buffer {
            return Err(self.invalid(
                "corridor_width must not exceed twice the center_buffer, \
                 or sibling rooms cannot be joined by a straight corridor",
            ));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> GenerationError {
        GenerationError::InvalidConfig {
            reason: reason.to_string(),
        }
    }
}
