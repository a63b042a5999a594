use grid_astar::{Grid, GridConfig, Pathfinder, Point, WorldPoint};

// In this example a path is found on a grid with shape
// #####
// #S  #
// # # #
// #  E#
// #####
// S marks the start
// E marks the end
fn main() {
    let config = GridConfig {
        world_size: WorldPoint::new(5.0, 5.0),
        node_radius: 0.5,
        blur_size: 0,
        ..GridConfig::default()
    };
    // Cell centres lie at whole coordinates from -2 to 2
    let blocked = |centre: WorldPoint, _radius: f32| {
        let border = centre.x.abs() > 1.5 || centre.y.abs() > 1.5;
        let middle = centre.x.abs() < 0.5 && centre.y.abs() < 0.5;
        border || middle
    };
    let grid = Grid::build_flat(&config, &blocked).unwrap();
    let mut pathfinder = Pathfinder::new(&grid);
    let start = Point::new(1, 3);
    let end = Point::new(3, 1);
    if let Some(path) = pathfinder.find_path_between(start, end) {
        println!("A path has been found:");
        for p in path.points() {
            println!("{:?}", p);
        }
    }
}
