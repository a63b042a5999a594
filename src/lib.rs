//! # grid_astar
//!
//! A* pathfinding over a grid sampled from a world. Each cell is classified as
//! walkable or blocked by an [ObstacleSampler] and, when walkable, receives a
//! movement penalty from the terrain layer found by a [TerrainSampler]. The
//! penalty field is smoothed with a separable
//! [box blur](https://en.wikipedia.org/wiki/Box_blur) before any search runs,
//! so that paths keep some distance from expensive terrain instead of hugging
//! its border.
//!
//! Searches use the
//! [octile distance](https://en.wikipedia.org/wiki/A*_search_algorithm) as
//! heuristic and an [IndexedBinaryHeap] supporting in-place priority updates
//! as open set. The [Grid] is immutable once built; all per-search state lives
//! in the [Pathfinder], so one grid can serve several searches concurrently.
//! [Connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! are pre-computed to avoid flood-filling behaviour if no path exists.
//!
//! ```no_run
//! use grid_astar::{Grid, GridConfig, Pathfinder, WorldPoint};
//!
//! let config = GridConfig::default();
//! let grid = Grid::build_flat(&config, &|centre: WorldPoint, _radius: f32| {
//!     centre.x.abs() < 2.0 && centre.y > -10.0
//! })
//! .unwrap();
//! let mut pathfinder = Pathfinder::new(&grid);
//! if let Some(path) = pathfinder.find_path(WorldPoint::new(-10.0, 0.0), WorldPoint::new(10.0, 0.0)) {
//!     println!("Found a path of cost {} through {} nodes", path.cost, path.len());
//! }
//! ```
pub mod config;
pub mod error;
pub mod grid;
pub mod heap;
pub mod node;
pub mod pathfinder;
pub mod sampler;

pub use config::{GridConfig, MAX_CELLS};
pub use error::{GridError, SampleError};
pub use grid::Grid;
pub use grid_util::point::Point;
pub use heap::IndexedBinaryHeap;
pub use node::Node;
pub use pathfinder::{Path, Pathfinder, SearchStats};
pub use sampler::{LayerId, NoTerrain, ObstacleSampler, TerrainSampler};

use serde::{Deserialize, Serialize};

/// Cost of a cardinal (straight) move.
pub const C: i32 = 10;
/// Cost of a diagonal move, roughly `C * sqrt(2)`.
pub const D: i32 = 14;
/// Helper constant for the octile distance.
pub const E: i32 = 2 * C - D;

/// Size of the inline neighbour buffers; a cell has at most 8 neighbours.
pub const N_SMALLVEC_SIZE: usize = 8;

/// A position in world space, projected onto the plane of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const fn new(x: f32, y: f32) -> WorldPoint {
        WorldPoint { x, y }
    }
}

/// Octile distance between two grid points using [C] for cardinal and [D] for diagonal moves.
pub fn octile_distance(p1: &Point, p2: &Point) -> i32 {
    let delta_x = (p1.x - p2.x).abs();
    let delta_y = (p1.y - p2.y).abs();
    // Formula from https://github.com/riscy/a_star_on_grids
    // to efficiently compute the cost of a path taking the maximal amount
    // of diagonal steps before going straight
    (E * (delta_x - delta_y).abs() + D * (delta_x + delta_y)) / 2
}
