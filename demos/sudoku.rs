use retexo::grid::{BlockDims, Grid};
use retexo::solver::config::SolverConfig;
use retexo::solver::engine::{SearchOutcome, Solver};
use retexo::solver::stats::render_stats_table;
use tracing_subscriber::EnvFilter;

const PUZZLE: [[usize; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

fn puzzle_grid() -> Grid {
    let rows: Vec<Vec<usize>> = PUZZLE.iter().map(|row| row.to_vec()).collect();
    Grid::from_rows(BlockDims::new(3, 3).unwrap(), &rows).unwrap()
}

fn solve_with(config: SolverConfig, puzzle: &Grid) -> Solver {
    let mut solver = Solver::new(puzzle, config).unwrap();
    let outcome = solver.solve().unwrap();
    assert_eq!(outcome, SearchOutcome::Solved);
    solver
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let puzzle = puzzle_grid();
    println!("Puzzle:\n{puzzle}");

    // The same puzzle under increasingly aggressive strategy stacks. Each
    // document is the kind of thing a caller would load from a file.
    let documents = [
        r#"{ "propagation": "forward-checking" }"#,
        r#"{
            "propagation": "forward-checking",
            "variable_selection": "minimum-remaining-values",
            "value_ordering": "least-constraining-value"
        }"#,
        r#"{ "propagation": "full-propagation", "variable_selection": "mrv-with-degree" }"#,
    ];

    let mut solution = None;
    for document in documents {
        let config: SolverConfig = serde_json::from_str(document).unwrap();
        let solver = solve_with(config, &puzzle);
        solution.get_or_insert_with(|| solver.solution().unwrap());
        println!("{document}");
        println!("{}", render_stats_table(solver.stats(), solver.trail()));
    }

    // An unknown heuristic name logs a warning and falls back to the
    // default instead of failing the run.
    let fallback = SolverConfig::from_names("full-propagation", "telepathy", "natural-order");
    let solver = solve_with(fallback, &puzzle);
    println!("full-propagation with an unknown selection heuristic:");
    println!("{}", render_stats_table(solver.stats(), solver.trail()));

    if let Some(solution) = solution {
        println!("Solution:\n{solution}");
    }
}
