//! A* over a [Grid], keeping every piece of per-search state out of the grid itself.
//!
//! The open set is an [IndexedBinaryHeap] keyed by [Cost], so an already queued node is
//! re-prioritised in place when a cheaper route to it is found rather than pushed again.
//! Costs, parents and the closed flag of every touched node live in a search context owned by
//! the [Pathfinder], which is cleared and reused between calls.
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::grid::Grid;
use crate::heap::IndexedBinaryHeap;
use crate::node::Node;
use crate::{octile_distance, Point, WorldPoint, C, D};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Priority of a node in the open set. Orders by estimated total cost first, then by the
/// heuristic, favouring nodes closer to the target among equally promising ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cost {
    pub f: i32,
    pub h: i32,
}

#[derive(Clone, Copy, Debug)]
struct NodeState {
    g_cost: i32,
    h_cost: i32,
    parent: Option<usize>,
    closed: bool,
}

impl NodeState {
    fn f_cost(&self) -> i32 {
        self.g_cost + self.h_cost
    }

    fn key(&self) -> Cost {
        Cost {
            f: self.f_cost(),
            h: self.h_cost,
        }
    }
}

/// Scratch state of a single search, keyed by node index.
#[derive(Clone, Debug)]
struct SearchContext {
    states: FxIndexMap<usize, NodeState>,
    open: IndexedBinaryHeap<usize, Cost>,
}

impl SearchContext {
    fn reset(&mut self) {
        self.states.clear();
        self.open.clear();
    }

    fn is_closed(&self, ix: usize) -> bool {
        self.states.get(&ix).map_or(false, |state| state.closed)
    }

    /// Follows the parent links back from `target` and returns the nodes after `start` in
    /// walking order. A search that starts on its target yields just the target.
    fn reconstruct(&self, grid: &Grid, start: usize, target: usize) -> Path {
        let mut nodes = vec![*grid.node(target)];
        let mut current = target;
        while let Some(parent) = self.states[&current].parent {
            if parent == start {
                break;
            }
            assert!(nodes.len() < grid.len(), "parent links form a cycle");
            nodes.push(*grid.node(parent));
            current = parent;
        }
        nodes.reverse();
        Path {
            nodes,
            cost: self.states[&target].g_cost,
        }
    }
}

/// Path returned by a successful search, from the first step after the start up to and
/// including the target.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub nodes: Vec<Node>,
    /// Sum of the step costs and movement penalties of all entered cells.
    pub cost: i32,
}

impl Path {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn target(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.nodes.iter().map(|node| node.position)
    }

    pub fn world_points(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        self.nodes.iter().map(|node| node.world_position)
    }
}

/// Statistics of the most recent search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of nodes taken from the open set.
    pub expanded: usize,
    pub elapsed: Duration,
}

/// Runs A* searches on a shared [Grid]. Each pathfinder owns its search state, so several of
/// them can search the same grid at once.
#[derive(Clone, Debug)]
pub struct Pathfinder<'g> {
    grid: &'g Grid,
    context: SearchContext,
    max_expansions: Option<usize>,
    last_stats: SearchStats,
}

impl<'g> Pathfinder<'g> {
    pub fn new(grid: &'g Grid) -> Pathfinder<'g> {
        Pathfinder {
            grid,
            context: SearchContext {
                states: FxIndexMap::default(),
                open: IndexedBinaryHeap::with_capacity(grid.max_size()),
            },
            max_expansions: None,
            last_stats: SearchStats::default(),
        }
    }

    /// Gives up on a search after `max_expansions` nodes have been expanded, reporting no path.
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Pathfinder<'g> {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Computes the cheapest path between the cells nearest to two world positions. Returns
    /// [None] if no path exists.
    pub fn find_path(&mut self, start: WorldPoint, target: WorldPoint) -> Option<Path> {
        let start_ix = self.grid.index_from_world_point(start);
        let target_ix = self.grid.index_from_world_point(target);
        self.find_path_indices(start_ix, target_ix)
    }

    /// Computes the cheapest path between two grid cells. Returns [None] if no path exists or
    /// either point lies outside the grid.
    pub fn find_path_between(&mut self, start: Point, target: Point) -> Option<Path> {
        match (self.grid.index_of(&start), self.grid.index_of(&target)) {
            (Some(start_ix), Some(target_ix)) => self.find_path_indices(start_ix, target_ix),
            _ => {
                warn!("{} or {} lies outside the grid", start, target);
                None
            }
        }
    }

    fn find_path_indices(&mut self, start: usize, target: usize) -> Option<Path> {
        self.last_stats = SearchStats::default();
        let start_node = self.grid.node(start);
        let target_node = self.grid.node(target);
        if start != target && !target_node.walkable {
            info!("{} is not walkable", target_node.position);
            return None;
        }
        // A start on a blocked cell forms its own component but may still step off it
        if start_node.walkable
            && self
                .grid
                .unreachable(&start_node.position, &target_node.position)
        {
            info!(
                "{} is not reachable from {}",
                target_node.position, start_node.position
            );
            return None;
        }
        let timer = Instant::now();
        let (path, expanded) = self.search(start, target);
        self.last_stats = SearchStats {
            expanded,
            elapsed: timer.elapsed(),
        };
        if let Some(path) = &path {
            info!(
                "Path found: {} nodes with cost {} in {:?}, {} nodes expanded",
                path.len(),
                path.cost,
                self.last_stats.elapsed,
                expanded
            );
        }
        path
    }

    /// The A* loop proper. Returns the path, if any, and the number of expanded nodes.
    fn search(&mut self, start: usize, target: usize) -> (Option<Path>, usize) {
        let grid = self.grid;
        let target_position = grid.node(target).position;
        let ct = &mut self.context;
        ct.reset();

        let start_state = NodeState {
            g_cost: 0,
            h_cost: octile_distance(&grid.node(start).position, &target_position),
            parent: None,
            closed: false,
        };
        ct.states.insert(start, start_state);
        ct.open.add(start, start_state.key());

        let mut expanded = 0;
        while !ct.open.is_empty() {
            if self.max_expansions.map_or(false, |max| expanded >= max) {
                warn!(
                    "Search from {} to {} cut off after {} expansions",
                    grid.node(start).position,
                    target_position,
                    expanded
                );
                return (None, expanded);
            }
            let (current, _) = ct.open.remove_first();
            expanded += 1;
            let current_state = {
                let state = &mut ct.states[&current];
                state.closed = true;
                *state
            };
            if current == target {
                return (Some(ct.reconstruct(grid, start, target)), expanded);
            }

            let current_position = grid.node(current).position;
            for neighbour in grid.neighbour_indices(current) {
                let node = grid.node(neighbour);
                if !node.walkable || ct.is_closed(neighbour) {
                    continue;
                }
                let step = if node.position.x != current_position.x
                    && node.position.y != current_position.y
                {
                    D
                } else {
                    C
                };
                let new_cost = current_state.g_cost + step + node.movement_penalty;
                let open = ct.open.contains(&neighbour);
                if open && new_cost >= ct.states[&neighbour].g_cost {
                    continue;
                }
                let state = NodeState {
                    g_cost: new_cost,
                    h_cost: octile_distance(&node.position, &target_position),
                    parent: Some(current),
                    closed: false,
                };
                ct.states.insert(neighbour, state);
                if open {
                    ct.open.update_item(neighbour, state.key());
                } else {
                    ct.open.add(neighbour, state.key());
                }
            }
        }
        debug!(
            "Open set exhausted after {} expansions without reaching {}",
            expanded, target_position
        );
        (None, expanded)
    }
}
