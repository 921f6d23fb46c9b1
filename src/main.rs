use std::process;

use docopt::Docopt;
use serde_derive::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use labyrinth::{
    cells::Cell,
    displays::{Layered, PathDisplay, StartEndPointsDisplay},
    generators::Algorithm,
    maze::Maze,
    pathing::Solver,
    units::{Height, Width},
    utils,
};

const USAGE: &str = "Labyrinth

Generate a maze, find a way through it and draw both as text.

Usage:
    labyrinth_driver -h | --help
    labyrinth_driver [<algorithm>] [--height=<h>] [--width=<w>] [--seed=<n>] [--solver=<s>] [--start-row=<r> --start-col=<c>] [--goal-row=<r> --goal-col=<c>] [--walls] [--info]

Arguments:
    <algorithm>          Maze generator, one of btree, sidewinder, fusion, exploration or wilson [default: sidewinder].

Options:
    -h --help            Show this screen.
    --height=<h>         Rows in the maze grid [default: 15].
    --width=<w>          Columns in the maze grid [default: 15].
    --seed=<n>           Seed for the random number generator. A fresh seed is picked and printed if absent.
    --solver=<s>         Path finder, one of dfs, bfs or rhr [default: bfs].
    --start-row=<r>      Row of the path start, the top left cell if not given.
    --start-col=<c>      Column of the path start.
    --goal-row=<r>       Row of the path goal, the bottom right cell if not given.
    --goal-col=<c>       Column of the path goal.
    --walls              List every wall segment as a pair of cells.
    --info               Print the per cell neighbours and the structure coherence report.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    arg_algorithm: Option<String>,
    flag_height: usize,
    flag_width: usize,
    flag_seed: Option<u64>,
    flag_solver: String,
    flag_start_row: Option<u32>,
    flag_start_col: Option<u32>,
    flag_goal_row: Option<u32>,
    flag_goal_col: Option<u32>,
    flag_walls: bool,
    flag_info: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {
        links {
            Maze(::labyrinth::errors::Error, ::labyrinth::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
        }
    }
}
use crate::errors::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(ref e) = run() {
        // Help and usage errors print themselves and pick the exit code.
        if let ErrorKind::DocOptFailure(ref usage) = *e.kind() {
            usage.exit();
        }

        eprintln!("error: {}", e);
        for cause in e.iter().skip(1) {
            eprintln!("caused by: {}", cause);
        }
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let algorithm = args.arg_algorithm
        .as_ref()
        .map_or("sidewinder", String::as_str)
        .parse::<Algorithm>()?;
    let solver = args.flag_solver.parse::<Solver>()?;
    let seed = args.flag_seed.unwrap_or_else(utils::random_seed);

    info!(%algorithm, height = args.flag_height, width = args.flag_width, seed, "generating maze");
    println!("seed: {}", seed);

    let maze = algorithm.generate(Height(args.flag_height),
                                  Width(args.flag_width),
                                  &mut utils::seeded_rng(seed));
    if maze.size() == 0 {
        println!("{} maze with no cells", algorithm);
        return Ok(());
    }

    let (start, goal) = end_points(&args, &maze);
    let path = maze.solve(solver, start, goal)
        .chain_err(|| format!("{} could not find a path through the {} maze", solver, algorithm))?;

    let content = Layered::new(StartEndPointsDisplay::new(start, goal), PathDisplay::new(&path, '.'));
    print!("{}", maze.overlay(&content));

    println!("{} path from {} to {}: {} steps", solver, start, goal, path.len());
    println!("depth first distance: {}", maze.distance_geo(start, goal)?);
    println!("shortest distance: {}", maze.distance_shortest(start, goal)?);
    println!("manhattan distance: {}", maze.distance_man(start, goal)?);

    if args.flag_walls {
        println!("walls:");
        for (a, b) in maze.iter_walls() {
            println!("{} | {}", a, b);
        }
    }

    if args.flag_info {
        print!("{}", maze.info());
    }

    Ok(())
}

fn end_points(args: &MazeArgs, maze: &Maze) -> (Cell, Cell) {
    let last_row = maze.height().saturating_sub(1) as u32;
    let last_col = maze.width().saturating_sub(1) as u32;

    let start = match (args.flag_start_row, args.flag_start_col) {
        (Some(row), Some(col)) => Cell::new(row, col),
        _ => Cell::new(0, 0),
    };
    let goal = match (args.flag_goal_row, args.flag_goal_col) {
        (Some(row), Some(col)) => Cell::new(row, col),
        _ => Cell::new(last_row, last_col),
    };
    (start, goal)
}
