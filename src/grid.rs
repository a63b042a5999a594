use core::fmt;

use itertools::iproduct;
use log::{debug, info};
use num_traits::clamp;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::config::GridConfig;
use crate::error::GridError;
use crate::node::Node;
use crate::sampler::{LayerId, NoTerrain, ObstacleSampler, TerrainSampler};
use crate::{Point, WorldPoint, N_SMALLVEC_SIZE};

/// [Grid] owns the sampled [Node]s in row-major order together with a [UnionFind] of the
/// walkable cells, which answers whether two cells are connected at all before a search is
/// started. It is immutable once built; a changed world requires building a new grid.
#[derive(Clone, Debug)]
pub struct Grid {
    config: GridConfig,
    size_x: usize,
    size_y: usize,
    nodes: Vec<Node>,
    components: UnionFind<usize>,
}

impl Grid {
    /// Samples walkability and terrain penalties for every cell, blurs the penalties and
    /// generates the connected components.
    pub fn build<O, T>(config: &GridConfig, obstacles: &O, terrain: &T) -> Result<Grid, GridError>
    where
        O: ObstacleSampler + ?Sized,
        T: TerrainSampler + ?Sized,
    {
        config.validate_terrain()?;
        Self::build_inner(config, obstacles, terrain)
    }

    /// Like [build](Self::build), but without terrain: every walkable cell starts without penalty.
    pub fn build_flat<O>(config: &GridConfig, obstacles: &O) -> Result<Grid, GridError>
    where
        O: ObstacleSampler + ?Sized,
    {
        Self::build_inner(config, obstacles, &NoTerrain)
    }

    fn build_inner<O, T>(config: &GridConfig, obstacles: &O, terrain: &T) -> Result<Grid, GridError>
    where
        O: ObstacleSampler + ?Sized,
        T: TerrainSampler + ?Sized,
    {
        let (size_x, size_y) = config.grid_size()?;
        config.validate_penalties(size_x, size_y)?;
        info!(
            "Building {}x{} grid with node radius {}",
            size_x, size_y, config.node_radius
        );
        let mut grid = Grid {
            config: config.clone(),
            size_x,
            size_y,
            nodes: Vec::with_capacity(size_x * size_y),
            components: UnionFind::new(0),
        };
        for (y, x) in iproduct!(0..size_y, 0..size_x) {
            let position = Point::new(x as i32, y as i32);
            let centre = grid.world_point_of(&position);
            let walkable = !obstacles
                .is_blocked(centre, config.node_radius)
                .map_err(GridError::Sampler)?;
            let movement_penalty = if walkable {
                match terrain.probe(centre).map_err(GridError::Sampler)? {
                    Some(layer) => grid.terrain_penalty(layer),
                    None => 0,
                }
            } else {
                0
            };
            grid.nodes
                .push(Node::new(position, centre, walkable, movement_penalty));
        }
        grid.blur_penalties(config.blur_size);
        grid.generate_components();
        Ok(grid)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Number of cells in the grid.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Upper bound on the number of nodes a search can have open at once.
    pub fn max_size(&self) -> usize {
        self.size_x * self.size_y
    }

    pub fn node_diameter(&self) -> f32 {
        self.config.node_diameter()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Node at a raw index.
    ///
    /// # Panics
    /// If `ix` is not smaller than [len](Self::len).
    pub fn node(&self, ix: usize) -> &Node {
        &self.nodes[ix]
    }

    pub fn node_at(&self, point: &Point) -> Option<&Node> {
        self.index_of(point).map(|ix| &self.nodes[ix])
    }

    pub fn index_of(&self, point: &Point) -> Option<usize> {
        if self.in_bounds(point.x, point.y) {
            Some(self.get_ix(point.x as usize, point.y as usize))
        } else {
            None
        }
    }

    fn get_ix(&self, x: usize, y: usize) -> usize {
        y * self.size_x + x
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size_x && (y as usize) < self.size_y
    }

    /// Penalty configured for a terrain layer, 0 if the layer has none.
    pub fn terrain_penalty(&self, layer: LayerId) -> i32 {
        self.config.terrain_penalty(layer)
    }

    /// World position of the centre of the cell at `point`. The grid is centred on the
    /// configured origin.
    pub fn world_point_of(&self, point: &Point) -> WorldPoint {
        let radius = self.config.node_radius;
        let diameter = self.node_diameter();
        let bottom_left = WorldPoint::new(
            self.config.origin.x - self.config.world_size.x / 2.0,
            self.config.origin.y - self.config.world_size.y / 2.0,
        );
        WorldPoint::new(
            bottom_left.x + point.x as f32 * diameter + radius,
            bottom_left.y + point.y as f32 * diameter + radius,
        )
    }

    /// Maps a world position to the nearest cell. Positions outside the grid are clamped to its
    /// border, so this always returns a node.
    pub fn node_from_world_point(&self, point: WorldPoint) -> &Node {
        &self.nodes[self.index_from_world_point(point)]
    }

    pub fn index_from_world_point(&self, point: WorldPoint) -> usize {
        let world_size = self.config.world_size;
        let origin = self.config.origin;
        let percent_x = clamp(
            (point.x - origin.x + world_size.x / 2.0) / world_size.x,
            0.0,
            1.0,
        );
        let percent_y = clamp(
            (point.y - origin.y + world_size.y / 2.0) / world_size.y,
            0.0,
            1.0,
        );
        let x = ((self.size_x - 1) as f32 * percent_x).round() as usize;
        let y = ((self.size_y - 1) as f32 * percent_y).round() as usize;
        self.get_ix(x, y)
    }

    /// Indices of the up to 8 in-bounds cells around `ix`. Walkability is not considered.
    pub fn neighbour_indices(&self, ix: usize) -> SmallVec<[usize; N_SMALLVEC_SIZE]> {
        let position = self.nodes[ix].position;
        iproduct!(-1..=1, -1..=1)
            .filter(|&offset| offset != (0, 0))
            .filter_map(|(dx, dy)| self.index_of(&Point::new(position.x + dx, position.y + dy)))
            .collect()
    }

    /// The up to 8 in-bounds cells around `node`. Walkability is not considered.
    pub fn neighbours(&self, node: &Node) -> SmallVec<[&Node; N_SMALLVEC_SIZE]> {
        match self.index_of(&node.position) {
            Some(ix) => self
                .neighbour_indices(ix)
                .into_iter()
                .map(|n| &self.nodes[n])
                .collect(),
            None => SmallVec::new(),
        }
    }

    /// Smooths the movement penalties with a box blur of radius `blur_size`, run as a horizontal
    /// and a vertical sliding-window pass. Samples beyond the border repeat the edge cell.
    fn blur_penalties(&mut self, blur_size: usize) {
        if blur_size == 0 {
            return;
        }
        debug!("Blurring penalties with kernel radius {}", blur_size);
        let kernel_size = 2 * blur_size as i64 + 1;
        let extent = blur_size as i64;
        let (w, h) = (self.size_x, self.size_y);

        let mut horizontal = vec![0i64; w * h];
        for y in 0..h {
            let row = |x: i64| {
                self.nodes[y * w + clamp(x, 0, w as i64 - 1) as usize].movement_penalty as i64
            };
            let mut sum: i64 = (-extent..=extent).map(row).sum();
            horizontal[y * w] = sum;
            for x in 1..w as i64 {
                sum += row(x + extent) - row(x - extent - 1);
                horizontal[y * w + x as usize] = sum;
            }
        }

        let area = kernel_size * kernel_size;
        for x in 0..w {
            let column = |y: i64| horizontal[clamp(y, 0, h as i64 - 1) as usize * w + x];
            let mut sum: i64 = (-extent..=extent).map(column).sum();
            for y in 0..h as i64 {
                if y > 0 {
                    sum += column(y + extent) - column(y - extent - 1);
                }
                // Penalties are non-negative, so this rounds half up
                let blurred = (sum + area / 2) / area;
                self.nodes[y as usize * w + x].movement_penalty = blurred as i32;
            }
        }
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.index_of(point).map(|ix| self.components.find(ix))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        match (self.index_of(start), self.index_of(goal)) {
            (Some(start_ix), Some(goal_ix)) => !self.components.equiv(start_ix, goal_ix),
            _ => true,
        }
    }

    /// Generates a new [UnionFind] structure and links up walkable grid neighbours to the same
    /// components.
    fn generate_components(&mut self) {
        let mut components = UnionFind::new(self.nodes.len());
        for ix in 0..self.nodes.len() {
            if !self.nodes[ix].walkable {
                continue;
            }
            let position = self.nodes[ix].position;
            // Links to the cells above and to the right, the rest are covered from their side
            [(0, 1), (1, -1), (1, 0), (1, 1)]
                .into_iter()
                .filter_map(|(dx, dy)| self.index_of(&Point::new(position.x + dx, position.y + dy)))
                .filter(|&n| self.nodes[n].walkable)
                .for_each(|n| {
                    components.union(ix, n);
                });
        }
        self.components = components;
        debug!("Generated connected components for {} cells", self.nodes.len());
    }
}

impl fmt::Display for Grid {
    /// Top row first; `#` marks a blocked cell, walkable cells show their penalty.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for y in (0..self.size_y).rev() {
            let values = (0..self.size_x)
                .map(|x| {
                    let node = &self.nodes[self.get_ix(x, y)];
                    if node.walkable {
                        format!("{:>3}", node.movement_penalty)
                    } else {
                        "  #".to_owned()
                    }
                })
                .collect::<Vec<String>>();
            writeln!(f, "{}", values.join(""))?;
        }
        Ok(())
    }
}
