use grid_astar::{Grid, GridConfig, LayerId, Pathfinder, WorldPoint};
use std::{env, fs};

const DEFAULT_CONFIG: &str = r#"{
    "world_size": { "x": 16.0, "y": 8.0 },
    "node_radius": 0.25,
    "blur_size": 2,
    "terrain_penalties": { "0": 0, "1": 20 }
}"#;

// Loads the grid configuration from the JSON file given as first argument, or a built-in one.
fn main() {
    env_logger::init();
    let text = match env::args().nth(1) {
        Some(path) => match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Could not read {path}: {e}");
                return;
            }
        },
        None => DEFAULT_CONFIG.to_owned(),
    };
    let config: GridConfig = match serde_json::from_str(&text) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return;
        }
    };
    // A pillar in the middle, and rough ground on the right half
    let pillar =
        |centre: WorldPoint, radius: f32| centre.x.abs() < 1.0 + radius && centre.y.abs() < 2.0;
    let terrain = |point: WorldPoint| -> Option<LayerId> { Some(if point.x > 0.0 { 1 } else { 0 }) };
    let grid = match Grid::build(&config, &pillar, &terrain) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Could not build grid: {e}");
            return;
        }
    };
    let half = WorldPoint::new(config.world_size.x / 2.0, config.world_size.y / 2.0);
    let mut pathfinder = Pathfinder::new(&grid);
    match pathfinder.find_path(
        WorldPoint::new(config.origin.x - half.x, config.origin.y),
        WorldPoint::new(config.origin.x + half.x, config.origin.y),
    ) {
        Some(path) => println!("Found a path through {} cells with cost {}", path.len(), path.cost),
        None => println!("No path exists"),
    }
}
