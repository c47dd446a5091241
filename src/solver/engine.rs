use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    grid::Grid,
    solver::{
        config::SolverConfig,
        heuristics::{
            value::ValueOrderingHeuristic,
            variable::{Selection, VariableSelectionHeuristic},
        },
        network::ConstraintNetwork,
        propagation::{PropagationContext, Propagator},
        stats::SearchStats,
        trail::Trail,
    },
};

/// How a finished search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every cell holds a value and every constraint is satisfied.
    Solved,
    /// The tree was explored to exhaustion; the puzzle has no completion.
    Exhausted,
}

/// The main engine for solving a Sudoku-family grid.
///
/// A `Solver` owns the constraint network built from a starting grid, the
/// trail that records every domain mutation, and the three strategies that
/// shape the search: variable selection, value ordering, and propagation.
/// It explores assignments depth-first. Each decision opens a trail marker
/// before any state changes, so a failed branch is unwound by popping back
/// to that marker, leaving the network exactly as the parent node saw it.
pub struct Solver {
    network: ConstraintNetwork,
    trail: Trail,
    variable_heuristic: Box<dyn VariableSelectionHeuristic>,
    value_heuristic: Box<dyn ValueOrderingHeuristic>,
    propagator: Box<dyn Propagator>,
    stats: SearchStats,
    solved: bool,
}

impl Solver {
    /// Builds a solver for `grid` using the strategies named in `config`.
    ///
    /// The strategy enums are resolved into their implementations here,
    /// once; the search itself only ever sees the trait objects.
    ///
    /// # Errors
    ///
    /// Fails if the grid's clues already violate a constraint.
    pub fn new(grid: &Grid, config: SolverConfig) -> Result<Self> {
        debug!(?config, "building solver");
        Self::with_strategies(
            grid,
            config.variable_selection.build(),
            config.value_ordering.build(),
            config.propagation.build(),
        )
    }

    /// Builds a solver from explicit strategy implementations, which is
    /// the entry point for strategies defined outside this crate.
    pub fn with_strategies(
        grid: &Grid,
        variable_heuristic: Box<dyn VariableSelectionHeuristic>,
        value_heuristic: Box<dyn ValueOrderingHeuristic>,
        propagator: Box<dyn Propagator>,
    ) -> Result<Self> {
        let network = ConstraintNetwork::new(grid)?;
        let trail = Trail::new(network.variable_count());
        Ok(Self {
            network,
            trail,
            variable_heuristic,
            value_heuristic,
            propagator,
            stats: SearchStats::default(),
            solved: false,
        })
    }

    /// Runs the search to completion.
    ///
    /// # Returns
    ///
    /// * [`SearchOutcome::Solved`] once a full consistent assignment is
    ///   found; the grid is then available from [`Solver::solution`].
    ///   Calling `solve` again returns immediately without searching.
    /// * [`SearchOutcome::Exhausted`] when every branch has been tried,
    ///   which proves the puzzle has no completion.
    pub fn solve(&mut self) -> Result<SearchOutcome> {
        if self.solved {
            return Ok(SearchOutcome::Solved);
        }

        debug!(
            variables = self.network.variable_count(),
            unassigned = self.network.unassigned_count(),
            "starting search"
        );
        let found = self.search(0)?;
        debug!(
            nodes = self.stats.nodes_visited,
            decisions = self.stats.decisions,
            backtracks = self.stats.backtracks,
            solved = found,
            "search finished"
        );

        if found {
            self.solved = true;
            Ok(SearchOutcome::Solved)
        } else {
            Ok(SearchOutcome::Exhausted)
        }
    }

    fn search(&mut self, depth: usize) -> Result<bool> {
        self.stats.nodes_visited += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let variable = match self.variable_heuristic.select_variable(&self.network) {
            Selection::AllAssigned => {
                // A heuristic from outside the crate may report completion
                // early; trust the network, not the heuristic.
                if !self.network.is_complete() {
                    return Err(Error::IncompleteAssignment {
                        unassigned: self.network.unassigned_count(),
                    });
                }
                return Ok(true);
            }
            Selection::Conflict(id) => {
                trace!(cell = id, depth, "empty domain, abandoning branch");
                return Ok(false);
            }
            Selection::Selected(id) => id,
        };

        for value in self.value_heuristic.order_values(&self.network, variable) {
            self.trail.place_marker();
            self.network.assign(&mut self.trail, variable, value)?;
            self.stats.decisions += 1;
            trace!(cell = variable, value, depth, "decision");

            self.stats.propagations += 1;
            let consistent = {
                let mut ctx =
                    PropagationContext::new(&mut self.network, &mut self.trail, &mut self.stats);
                self.propagator.propagate(&mut ctx)?
            };

            if consistent && self.search(depth + 1)? {
                return Ok(true);
            }

            self.trail.undo(&mut self.network)?;
            self.stats.backtracks += 1;
        }

        Ok(false)
    }

    /// The solved grid.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::IncompleteAssignment`] while any cell is still
    /// open, which includes every call made before a successful `solve`.
    pub fn solution(&self) -> Result<Grid> {
        self.network.to_grid()
    }

    pub fn network(&self) -> &ConstraintNetwork {
        &self.network
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }
}
