//! Store route planning demo
//!
//! Builds a small supermarket floor plan, plans a multi-stop shopping
//! route and renders the result with gnuplot. The plot flips the Y axis so
//! the image matches the Y-down floor-plan space.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use store_router::path_planning::catmull_rom;
use store_router::routing::{PlannerConfig, RoutePlanner};
use store_router::{Obstacle, RouteBuilder, Waypoint};

const FLOOR_WIDTH: f64 = 800.0;
const FLOOR_HEIGHT: f64 = 500.0;

fn store_obstacles() -> Vec<Obstacle> {
    vec![
        // Shelf rows
        Obstacle::new(1, 120.0, 80.0, 160.0, 40.0, "shelf"),
        Obstacle::new(2, 120.0, 180.0, 160.0, 40.0, "shelf"),
        Obstacle::new(3, 120.0, 280.0, 160.0, 40.0, "shelf"),
        Obstacle::new(4, 400.0, 80.0, 160.0, 40.0, "shelf"),
        Obstacle::new(5, 400.0, 180.0, 160.0, 40.0, "shelf"),
        Obstacle::new(6, 400.0, 280.0, 160.0, 40.0, "shelf"),
        // Produce counter along the right wall
        Obstacle::new(7, 680.0, 60.0, 60.0, 280.0, "counter"),
        // Checkout row near the entrance
        Obstacle::new(8, 240.0, 400.0, 320.0, 40.0, "checkout"),
    ]
}

fn shopping_stops() -> Vec<Waypoint> {
    vec![
        Waypoint::new("Entrance", 60.0, 460.0),
        Waypoint::new("Cereal", 200.0, 150.0),
        Waypoint::new("Produce", 650.0, 200.0),
        Waypoint::new("Bread", 480.0, 250.0),
        Waypoint::new("Milk", 200.0, 340.0),
        Waypoint::new("Exit", 740.0, 460.0),
    ]
}

fn rect_outline(o: &Obstacle) -> (Vec<f64>, Vec<f64>) {
    let x = vec![o.x, o.x + o.width, o.x + o.width, o.x, o.x];
    let y = vec![o.y, o.y, o.y + o.height, o.y + o.height, o.y];
    (x, y)
}

fn main() {
    println!("Store route planning start!!");

    let obstacles = store_obstacles();
    let stops = shopping_stops();

    let planner = RoutePlanner::new(FLOOR_WIDTH, FLOOR_HEIGHT, PlannerConfig::default(), obstacles)
        .expect("valid floor plan");

    let route = planner.route(&stops).expect("route through the store");

    println!("Visiting order:");
    for (waypoint, progress) in route.waypoints.iter().zip(&route.waypoint_progress) {
        println!("  {:>5.1}%  {}", progress * 100.0, waypoint.name);
    }
    println!(
        "Total: {:.1} m, about {} min of walking",
        route.distance_meters, route.time_minutes
    );

    let smooth = catmull_rom(&route.points, 8);

    let mut fg = Figure::new();
    {
        let axes = fg.axes2d();
        axes.set_title("Store route", &[])
            .set_x_label("X [px]", &[])
            .set_y_label("Y [px]", &[])
            .set_x_range(AutoOption::Fix(0.0), AutoOption::Fix(FLOOR_WIDTH))
            // Flipped so the image matches the Y-down floor plan
            .set_y_range(AutoOption::Fix(FLOOR_HEIGHT), AutoOption::Fix(0.0))
            .set_aspect_ratio(AutoOption::Fix(FLOOR_HEIGHT / FLOOR_WIDTH));

        for obstacle in planner.obstacles() {
            let (x, y) = rect_outline(obstacle);
            axes.lines(&x, &y, &[Color("black"), LineWidth(1.5)]);
        }

        let rx: Vec<f64> = route.points.iter().map(|p| p.x).collect();
        let ry: Vec<f64> = route.points.iter().map(|p| p.y).collect();
        axes.lines(&rx, &ry, &[Caption("Route"), Color("#AAAAFF"), LineWidth(1.0)]);

        let sx: Vec<f64> = smooth.iter().map(|p| p.x).collect();
        let sy: Vec<f64> = smooth.iter().map(|p| p.y).collect();
        axes.lines(&sx, &sy, &[Caption("Smoothed"), Color("red"), LineWidth(2.0)]);

        let wx: Vec<f64> = route.waypoints.iter().map(|w| w.x).collect();
        let wy: Vec<f64> = route.waypoints.iter().map(|w| w.y).collect();
        axes.points(
            &wx,
            &wy,
            &[Caption("Stops"), Color("blue"), PointSymbol('O'), PointSize(1.5)],
        );
    }

    let output_path = "img/store_route_demo.png";
    match fg.save_to_png(output_path, 1000, 650) {
        Ok(_) => println!("Plot saved to: {}", output_path),
        Err(e) => println!("Could not save plot: {}", e),
    }

    println!("Store route planning finish!!");
}
