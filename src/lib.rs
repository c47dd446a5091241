//! Retexo is a backtracking solver for Sudoku-family constraint grids.
//!
//! The solver works on any `p`x`q`-blocked grid (classic 9x9 Sudoku, 4x4,
//! 6x6, and so on) and is built around a single idea: every domain
//! mutation is recorded on a trail before it happens, so abandoning a
//! branch is a cheap, exact rewind instead of a board copy.
//!
//! # Core Concepts
//!
//! - **[`Grid`](crate::grid::Grid)**: the puzzle surface, a blocked square
//!   of cells where a clue is a fixed value and an empty cell is a cell
//!   the solver must fill.
//! - **[`Solver`](crate::solver::engine::Solver)**: the depth-first
//!   engine. It picks a cell, tries a value, propagates the consequences,
//!   and unwinds the trail whenever a branch dead-ends.
//! - **Strategies**: the three seams where behavior plugs in, as trait
//!   objects: [`VariableSelectionHeuristic`](crate::solver::heuristics::variable::VariableSelectionHeuristic)
//!   chooses the next cell, [`ValueOrderingHeuristic`](crate::solver::heuristics::value::ValueOrderingHeuristic)
//!   orders its candidates, and [`Propagator`](crate::solver::propagation::Propagator)
//!   decides how much deduction runs after each decision.
//! - **[`SolverConfig`](crate::solver::config::SolverConfig)**: names the
//!   built-in strategies so a run can be configured from data.
//!
//! # Example: A 4x4 Grid
//!
//! ```
//! use retexo::grid::{BlockDims, Grid};
//! use retexo::solver::config::SolverConfig;
//! use retexo::solver::engine::{SearchOutcome, Solver};
//!
//! // 0 marks an empty cell.
//! let puzzle = Grid::from_rows(
//!     BlockDims::new(2, 2).unwrap(),
//!     &[
//!         vec![1, 0, 0, 0],
//!         vec![0, 4, 0, 0],
//!         vec![0, 0, 0, 3],
//!         vec![0, 0, 2, 0],
//!     ],
//! )
//! .unwrap();
//!
//! let mut solver = Solver::new(&puzzle, SolverConfig::default()).unwrap();
//! assert_eq!(solver.solve().unwrap(), SearchOutcome::Solved);
//!
//! let solution = solver.solution().unwrap();
//! assert!(solution.is_complete());
//! assert_eq!(solution.get(0, 1), Some(2));
//! ```
//!
pub mod error;
pub mod grid;
pub mod solver;
