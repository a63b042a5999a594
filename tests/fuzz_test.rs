/// Fuzzes the pathfinding system by checking for many random grids with random terrain that a path
/// is found exactly when a reference Dijkstra search reaches the target, and that its cost is
/// optimal. Blur radii, blocked starts and equal start and goal are all covered.
use grid_astar::{Grid, GridConfig, Path, Pathfinder, Point, WorldPoint, C, D};
use rand::prelude::*;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

const N: usize = 10;

fn random_grid(w: usize, h: usize, rng: &mut StdRng) -> Grid {
    let blocked: Vec<bool> = (0..w * h).map(|_| rng.gen_bool(0.35)).collect();
    let layers: Vec<Option<u32>> = (0..w * h)
        .map(|_| [None, Some(1), Some(2)][rng.gen_range(0..3)])
        .collect();
    let config = GridConfig {
        world_size: WorldPoint::new(w as f32, h as f32),
        node_radius: 0.5,
        blur_size: rng.gen_range(0..3),
        origin: WorldPoint::new(w as f32 / 2.0, h as f32 / 2.0),
        terrain_penalties: BTreeMap::from([(1, 4), (2, 30)]),
    };
    let ix = |p: WorldPoint| p.y.floor() as usize * w + p.x.floor() as usize;
    Grid::build(
        &config,
        &|p: WorldPoint, _: f32| blocked[ix(p)],
        &|p: WorldPoint| layers[ix(p)],
    )
    .unwrap()
}

fn random_grid_point(grid: &Grid, rng: &mut StdRng) -> Point {
    Point::new(
        rng.gen_range(0..grid.size_x()) as i32,
        rng.gen_range(0..grid.size_y()) as i32,
    )
}

fn step_cost(from: &Point, to: &Point) -> i32 {
    if from.x != to.x && from.y != to.y {
        D
    } else {
        C
    }
}

/// Plain Dijkstra over the same movement rules, returning the cheapest cost to the target.
fn reference_cost(grid: &Grid, start: Point, target: Point) -> Option<i32> {
    let start_ix = grid.index_of(&start).unwrap();
    let target_ix = grid.index_of(&target).unwrap();
    let mut dist = vec![i32::MAX; grid.len()];
    let mut queue = BinaryHeap::new();
    dist[start_ix] = 0;
    queue.push(Reverse((0, start_ix)));
    while let Some(Reverse((cost, ix))) = queue.pop() {
        if ix == target_ix {
            return Some(cost);
        }
        if cost > dist[ix] {
            continue;
        }
        let position = grid.node(ix).position;
        for n in grid.neighbour_indices(ix) {
            let node = grid.node(n);
            if !node.walkable {
                continue;
            }
            let new_cost = cost + step_cost(&position, &node.position) + node.movement_penalty;
            if new_cost < dist[n] {
                dist[n] = new_cost;
                queue.push(Reverse((new_cost, n)));
            }
        }
    }
    None
}

/// Recomputes the cost of a path from its nodes.
fn walked_cost(start: Point, path: &Path) -> i32 {
    let mut previous = start;
    let mut cost = 0;
    for node in &path.nodes {
        cost += step_cost(&previous, &node.position) + node.movement_penalty;
        previous = node.position;
    }
    cost
}

fn visualize_grid(grid: &Grid, start: &Point, end: &Point) {
    for y in (0..grid.size_y() as i32).rev() {
        for x in 0..grid.size_x() as i32 {
            let p = Point::new(x, y);
            if *start == p {
                print!("S");
            } else if *end == p {
                print!("G");
            } else if !grid.node_at(&p).unwrap().walkable {
                print!("#");
            } else {
                print!(".");
            }
        }
        println!();
    }
}

#[test]
fn fuzz() {
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..N_GRIDS {
        let grid = random_grid(N, N, &mut rng);
        let mut pathfinder = Pathfinder::new(&grid);
        for _ in 0..4 {
            let start = random_grid_point(&grid, &mut rng);
            let end = if rng.gen_bool(0.05) {
                start
            } else {
                random_grid_point(&grid, &mut rng)
            };
            let expected = if start == end {
                Some(0)
            } else {
                reference_cost(&grid, start, end)
            };
            let path = pathfinder.find_path_between(start, end);
            // Show the grid if the outcome differs
            if path.as_ref().map(|p| p.cost) != expected {
                visualize_grid(&grid, &start, &end);
            }
            assert_eq!(path.as_ref().map(|p| p.cost), expected);
            if let Some(path) = path {
                assert_eq!(path.target().unwrap().position, end);
                assert_eq!(walked_cost(start, &path), path.cost);
                assert!(path.nodes.iter().all(|n| n.walkable));
                let mut previous = start;
                for p in path.points() {
                    assert!((p.x - previous.x).abs() <= 1 && (p.y - previous.y).abs() <= 1);
                    assert_ne!(p, previous);
                    previous = p;
                }
            }
        }
    }
}

#[test]
fn fuzz_reachability() {
    const N_GRIDS: usize = 1000;
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..N_GRIDS {
        let grid = random_grid(N, N, &mut rng);
        let start = Point::new(0, 0);
        let end = Point::new(N as i32 - 1, N as i32 - 1);
        let both_walkable =
            grid.node_at(&start).unwrap().walkable && grid.node_at(&end).unwrap().walkable;
        if !both_walkable {
            continue;
        }
        let path = Pathfinder::new(&grid).find_path_between(start, end);
        if path.is_some() != grid.reachable(&start, &end) {
            visualize_grid(&grid, &start, &end);
        }
        assert_eq!(path.is_some(), grid.reachable(&start, &end));
    }
}
