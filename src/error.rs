use thiserror::Error;

use crate::sampler::LayerId;

/// Error type returned by the world samplers. Sampler failures are not recovered from.
pub type SampleError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that prevent a [Grid](crate::Grid) from being constructed. No partial grid is ever
/// returned alongside one of these.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid grid dimensions: world size {world_x}x{world_y} with node radius {node_radius} gives a {size_x}x{size_y} grid")]
    InvalidDimensions {
        world_x: f32,
        world_y: f32,
        node_radius: f32,
        size_x: i64,
        size_y: i64,
    },
    #[error("Terrain sampling requested without any terrain penalties configured")]
    EmptyTerrainTable,
    #[error("Terrain layer {layer} has negative penalty {penalty}")]
    NegativePenalty { layer: LayerId, penalty: i32 },
    #[error("Terrain layer {layer} has penalty {penalty}, path costs on this grid allow at most {limit}")]
    PenaltyTooLarge {
        layer: LayerId,
        penalty: i32,
        limit: i32,
    },
    #[error("World sampling failed")]
    Sampler(#[source] SampleError),
}
