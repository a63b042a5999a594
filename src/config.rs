//! Grid construction parameters.
//!
//! [GridConfig] derives serde's traits with field defaults, so it can be loaded from any
//! serde format and partial documents fill in the rest:
//!
//! ```json
//! {
//!   "world_size": { "x": 40.0, "y": 25.0 },
//!   "node_radius": 0.25,
//!   "blur_size": 3,
//!   "terrain_penalties": { "8": 20, "9": 5 }
//! }
//! ```
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::sampler::LayerId;
use crate::{WorldPoint, D};

/// Largest number of cells a grid may have. Keeps every octile distance and path cost on a
/// full grid within `i32`.
pub const MAX_CELLS: usize = (i32::MAX / (4 * D)) as usize;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Extent of the grid in world units.
    pub world_size: WorldPoint,
    /// Half the side length of a cell.
    pub node_radius: f32,
    /// Radius of the box blur kernel applied to the penalties; 0 disables smoothing.
    pub blur_size: usize,
    /// World position of the centre of the grid.
    pub origin: WorldPoint,
    /// Movement penalty for each terrain layer. Layers without an entry cost nothing extra.
    pub terrain_penalties: BTreeMap<LayerId, i32>,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            world_size: WorldPoint::new(30.0, 30.0),
            node_radius: 0.5,
            blur_size: 4,
            origin: WorldPoint::default(),
            terrain_penalties: BTreeMap::new(),
        }
    }
}

impl GridConfig {
    pub fn node_diameter(&self) -> f32 {
        self.node_radius * 2.0
    }

    /// Number of cells along each axis, `round(world_size / node_diameter)`. Grids with more
    /// than [MAX_CELLS] cells are rejected.
    pub fn grid_size(&self) -> Result<(usize, usize), GridError> {
        let diameter = self.node_diameter();
        let finite = self.world_size.x.is_finite()
            && self.world_size.y.is_finite()
            && diameter.is_finite();
        let (size_x, size_y) = if finite && diameter > 0.0 {
            (
                (self.world_size.x / diameter).round() as i64,
                (self.world_size.y / diameter).round() as i64,
            )
        } else {
            (0, 0)
        };
        let cells = size_x.checked_mul(size_y);
        if size_x <= 0 || size_y <= 0 || cells.map_or(true, |cells| cells > MAX_CELLS as i64) {
            return Err(GridError::InvalidDimensions {
                world_x: self.world_size.x,
                world_y: self.world_size.y,
                node_radius: self.node_radius,
                size_x,
                size_y,
            });
        }
        Ok((size_x as usize, size_y as usize))
    }

    /// Checks the terrain table, which must be non-empty and non-negative when terrain is sampled.
    pub fn validate_terrain(&self) -> Result<(), GridError> {
        if self.terrain_penalties.is_empty() {
            return Err(GridError::EmptyTerrainTable);
        }
        self.check_negative_penalties()
    }

    /// Largest terrain penalty for which no path cost on this grid can overflow: a path
    /// enters every cell at most once and the heuristic adds at most `D * (size_x + size_y)`.
    pub fn max_penalty(&self) -> Result<i32, GridError> {
        let (size_x, size_y) = self.grid_size()?;
        Ok(penalty_limit(size_x, size_y))
    }

    fn check_negative_penalties(&self) -> Result<(), GridError> {
        match self
            .terrain_penalties
            .iter()
            .find(|(_, &penalty)| penalty < 0)
        {
            Some((&layer, &penalty)) => Err(GridError::NegativePenalty { layer, penalty }),
            None => Ok(()),
        }
    }

    /// Rejects negative penalties and penalties too large for a grid of the given size.
    pub(crate) fn validate_penalties(&self, size_x: usize, size_y: usize) -> Result<(), GridError> {
        self.check_negative_penalties()?;
        let limit = penalty_limit(size_x, size_y);
        match self
            .terrain_penalties
            .iter()
            .find(|(_, &penalty)| penalty > limit)
        {
            Some((&layer, &penalty)) => Err(GridError::PenaltyTooLarge {
                layer,
                penalty,
                limit,
            }),
            None => Ok(()),
        }
    }

    /// Penalty of a terrain layer, 0 if the layer is unknown.
    pub fn terrain_penalty(&self, layer: LayerId) -> i32 {
        self.terrain_penalties.get(&layer).copied().unwrap_or(0)
    }
}

fn penalty_limit(size_x: usize, size_y: usize) -> i32 {
    let cells = (size_x * size_y) as i64;
    let heuristic = D as i64 * (size_x + size_y) as i64;
    let limit = (i32::MAX as i64 - heuristic) / cells - D as i64;
    limit.clamp(0, i32::MAX as i64) as i32
}
