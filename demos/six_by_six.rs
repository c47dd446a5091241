use retexo::grid::{BlockDims, Grid};
use retexo::solver::config::SolverConfig;
use retexo::solver::engine::{SearchOutcome, Solver};
use retexo::solver::stats::render_stats_table;
use tracing_subscriber::EnvFilter;

// A 6x6 grid with 2x3 blocks: same rules as Sudoku, smaller surface.
const PUZZLE: [[usize; 6]; 6] = [
    [1, 0, 0, 4, 0, 6],
    [0, 5, 6, 0, 2, 0],
    [2, 0, 4, 0, 6, 0],
    [0, 6, 0, 2, 0, 4],
    [3, 0, 5, 0, 1, 0],
    [0, 1, 0, 3, 0, 5],
];

fn puzzle_grid() -> Grid {
    let rows: Vec<Vec<usize>> = PUZZLE.iter().map(|row| row.to_vec()).collect();
    Grid::from_rows(BlockDims::new(2, 3).unwrap(), &rows).unwrap()
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let puzzle = puzzle_grid();
    println!("Puzzle:\n{puzzle}");

    let config = SolverConfig::from_names(
        "full-propagation",
        "minimum-remaining-values",
        "least-constraining-value",
    );
    let mut solver = Solver::new(&puzzle, config).unwrap();

    match solver.solve().unwrap() {
        SearchOutcome::Solved => println!("Solution:\n{}", solver.solution().unwrap()),
        SearchOutcome::Exhausted => println!("No completion exists."),
    }
    println!("{}", render_stats_table(solver.stats(), solver.trail()));
}
