//! Interfaces to the world the grid is sampled from.
//!
//! Physics queries live outside this crate. A host supplies an [ObstacleSampler] that
//! answers whether a cell is blocked and, optionally, a [TerrainSampler] that probes
//! downward through the terrain layers to classify walkable cells. Plain closures
//! implement both traits for infallible samplers.
use crate::error::SampleError;
use crate::WorldPoint;

/// Identifier of a terrain layer, e.g. a physics layer index.
pub type LayerId = u32;

pub trait ObstacleSampler {
    /// Whether anything blocking overlaps the circle of `radius` around `centre`.
    /// Must be deterministic for a fixed world state.
    fn is_blocked(&self, centre: WorldPoint, radius: f32) -> Result<bool, SampleError>;
}

impl<F> ObstacleSampler for F
where
    F: Fn(WorldPoint, f32) -> bool,
{
    fn is_blocked(&self, centre: WorldPoint, radius: f32) -> Result<bool, SampleError> {
        Ok(self(centre, radius))
    }
}

pub trait TerrainSampler {
    /// Probes down through the terrain at `point` within a bounded range and returns the
    /// first layer hit, or [None] if nothing was hit.
    fn probe(&self, point: WorldPoint) -> Result<Option<LayerId>, SampleError>;
}

impl<F> TerrainSampler for F
where
    F: Fn(WorldPoint) -> Option<LayerId>,
{
    fn probe(&self, point: WorldPoint) -> Result<Option<LayerId>, SampleError> {
        Ok(self(point))
    }
}

/// A terrain that is never hit, so every walkable cell starts without penalty.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTerrain;

impl TerrainSampler for NoTerrain {
    fn probe(&self, _point: WorldPoint) -> Result<Option<LayerId>, SampleError> {
        Ok(None)
    }
}
