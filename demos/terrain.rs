use grid_astar::{Grid, GridConfig, LayerId, Pathfinder, WorldPoint};
use std::collections::BTreeMap;

const GRASS: LayerId = 1;
const ROAD: LayerId = 2;
const SWAMP: LayerId = 3;

// A 30x30 world with a lake in the middle, a road around its south side and a swamp to the north.
// Every walkable cell is probed for its terrain layer and the penalties are blurred, so the path
// keeps some distance from the swamp instead of skirting its edge.
fn main() {
    env_logger::init();
    let config = GridConfig {
        terrain_penalties: BTreeMap::from([(GRASS, 5), (ROAD, 0), (SWAMP, 60)]),
        ..GridConfig::default()
    };
    let lake = |centre: WorldPoint, radius: f32| centre.x.hypot(centre.y) < 6.0 + radius;
    let terrain = |point: WorldPoint| {
        if (point.y + 9.0).abs() < 1.5 {
            Some(ROAD)
        } else if point.y > 4.0 && point.x.abs() < 8.0 {
            Some(SWAMP)
        } else {
            Some(GRASS)
        }
    };
    let grid = match Grid::build(&config, &lake, &terrain) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Could not build grid: {e}");
            return;
        }
    };
    println!("{}", grid);

    let mut pathfinder = Pathfinder::new(&grid);
    let start = WorldPoint::new(-13.0, 2.0);
    let target = WorldPoint::new(13.0, 2.0);
    match pathfinder.find_path(start, target) {
        Some(path) => {
            println!("Path of cost {} ({:?}):", path.cost, pathfinder.last_stats());
            for p in path.world_points() {
                println!("({:.1}, {:.1})", p.x, p.y);
            }
        }
        None => println!("No path exists"),
    }
}
