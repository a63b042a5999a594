use crate::{Point, WorldPoint};

/// A single cell of a [Grid](crate::Grid). Search costs are not stored here but in the
/// state of the [Pathfinder](crate::Pathfinder) running the search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    /// Grid coordinate, unique within its grid.
    pub position: Point,
    /// World position of the cell centre.
    pub world_position: WorldPoint,
    pub walkable: bool,
    /// Additive cost for entering this cell. Smoothed by the blur pass while the grid is built.
    pub movement_penalty: i32,
}

impl Node {
    pub fn new(
        position: Point,
        world_position: WorldPoint,
        walkable: bool,
        movement_penalty: i32,
    ) -> Node {
        Node {
            position,
            world_position,
            walkable,
            movement_penalty,
        }
    }

    /// Whether `other` is one of the 8 cells around this one.
    pub fn is_adjacent(&self, other: &Node) -> bool {
        let dx = (self.position.x - other.position.x).abs();
        let dy = (self.position.y - other.position.y).abs();
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }
}
