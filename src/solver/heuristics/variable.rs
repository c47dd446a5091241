//! Heuristics for choosing which cell to branch on next.

use std::cell::RefCell;

use rand::seq::IteratorRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::solver::network::{ConstraintNetwork, VariableId};

/// Outcome of a selection pass over the network.
///
/// "Everything is assigned" and "someone has no candidates left" are
/// both states with nothing to select, but the engine must treat them
/// in opposite ways: the first ends the search successfully, the second
/// fails the current branch. Conflating the two is the classic way to
/// report a false solve, so the distinction is carried in the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Branch on this variable next.
    Selected(VariableId),
    /// Every variable is assigned; the search is complete.
    AllAssigned,
    /// This unassigned variable has an empty domain; the branch is dead.
    Conflict(VariableId),
}

/// A trait for variable-selection heuristics.
///
/// Implementors define which unassigned variable the solver branches on
/// next. A good choice here can dramatically shrink the search tree.
/// Scan order over the network is row-major, and every heuristic breaks
/// ties in favour of the first candidate encountered in that order, so
/// selection is fully deterministic.
pub trait VariableSelectionHeuristic {
    fn select_variable(&self, network: &ConstraintNetwork) -> Selection;
}

/// Selects the first unassigned variable in scan order.
///
/// The baseline strategy: cheap, deterministic, and oblivious to how
/// constrained anything is.
pub struct SelectFirstHeuristic;

impl VariableSelectionHeuristic for SelectFirstHeuristic {
    fn select_variable(&self, network: &ConstraintNetwork) -> Selection {
        for (id, variable) in network.variables().iter().enumerate() {
            if !variable.is_assigned() {
                return Selection::Selected(id);
            }
        }
        Selection::AllAssigned
    }
}

/// Minimum Remaining Values: selects the unassigned variable with the
/// smallest domain.
///
/// A "fail-first" strategy; the most constrained cell is the one most
/// likely to expose a dead end early. A variable discovered with an
/// empty domain fails the branch immediately via [`Selection::Conflict`].
pub struct MinimumRemainingValuesHeuristic;

impl VariableSelectionHeuristic for MinimumRemainingValuesHeuristic {
    fn select_variable(&self, network: &ConstraintNetwork) -> Selection {
        let mut best: Option<(usize, VariableId)> = None;
        for (id, variable) in network.variables().iter().enumerate() {
            if variable.is_assigned() {
                continue;
            }
            let len = variable.domain().len();
            if len == 0 {
                return Selection::Conflict(id);
            }
            let better = match best {
                None => true,
                Some((best_len, _)) => len < best_len,
            };
            if better {
                best = Some((len, id));
            }
        }
        match best {
            Some((_, id)) => Selection::Selected(id),
            None => Selection::AllAssigned,
        }
    }
}

/// Selects the unassigned variable with the most unassigned neighbors.
///
/// Branching where the most open cells are in reach maximizes how much
/// each decision constrains the rest of the board.
pub struct DegreeHeuristic;

impl VariableSelectionHeuristic for DegreeHeuristic {
    fn select_variable(&self, network: &ConstraintNetwork) -> Selection {
        let mut best: Option<(usize, VariableId)> = None;
        for (id, variable) in network.variables().iter().enumerate() {
            if variable.is_assigned() {
                continue;
            }
            let degree = unassigned_degree(network, id);
            let better = match best {
                None => true,
                Some((best_degree, _)) => degree > best_degree,
            };
            if better {
                best = Some((degree, id));
            }
        }
        match best {
            Some((_, id)) => Selection::Selected(id),
            None => Selection::AllAssigned,
        }
    }
}

/// Minimum Remaining Values with the degree heuristic as tie-break.
///
/// Primary key: smallest domain. Among variables tied on that, the one
/// with the most unassigned neighbors wins; remaining ties go to the
/// first encountered in scan order.
pub struct MrvWithDegreeHeuristic;

impl VariableSelectionHeuristic for MrvWithDegreeHeuristic {
    fn select_variable(&self, network: &ConstraintNetwork) -> Selection {
        let mut best: Option<(usize, usize, VariableId)> = None;
        for (id, variable) in network.variables().iter().enumerate() {
            if variable.is_assigned() {
                continue;
            }
            let len = variable.domain().len();
            if len == 0 {
                return Selection::Conflict(id);
            }
            let degree = unassigned_degree(network, id);
            let better = match best {
                None => true,
                Some((best_len, best_degree, _)) => {
                    len < best_len || (len == best_len && degree > best_degree)
                }
            };
            if better {
                best = Some((len, degree, id));
            }
        }
        match best {
            Some((_, _, id)) => Selection::Selected(id),
            None => Selection::AllAssigned,
        }
    }
}

/// Selects uniformly among the unassigned variables.
///
/// Ships as the worked example of plugging a custom heuristic into the
/// engine. Seeded with a ChaCha stream so that runs reproduce exactly.
pub struct RandomVariableHeuristic {
    rng: RefCell<ChaCha8Rng>,
}

impl RandomVariableHeuristic {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: RefCell::new(ChaCha8Rng::from_entropy()),
        }
    }
}

impl VariableSelectionHeuristic for RandomVariableHeuristic {
    fn select_variable(&self, network: &ConstraintNetwork) -> Selection {
        let mut rng = self.rng.borrow_mut();
        let choice = network
            .variables()
            .iter()
            .enumerate()
            .filter(|(_, variable)| !variable.is_assigned())
            .map(|(id, _)| id)
            .choose(&mut *rng);
        match choice {
            Some(id) => Selection::Selected(id),
            None => Selection::AllAssigned,
        }
    }
}

/// Number of unassigned neighbors of `id`.
fn unassigned_degree(network: &ConstraintNetwork, id: VariableId) -> usize {
    network
        .neighbors_of(id)
        .map(|neighbors| {
            neighbors
                .iter()
                .filter(|&&n| !network.variables()[n].is_assigned())
                .count()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::{BlockDims, Grid},
        solver::trail::Trail,
    };
    use pretty_assertions::assert_eq;

    fn network_4x4(rows: &[Vec<usize>]) -> ConstraintNetwork {
        let grid = Grid::from_rows(BlockDims::new(2, 2).unwrap(), rows).unwrap();
        ConstraintNetwork::new(&grid).unwrap()
    }

    fn empty_4x4() -> (ConstraintNetwork, Trail) {
        let network = ConstraintNetwork::new(&Grid::empty(BlockDims::new(2, 2).unwrap())).unwrap();
        let trail = Trail::new(network.variable_count());
        (network, trail)
    }

    #[test]
    fn select_first_skips_clues_and_scans_row_major() {
        let network = network_4x4(&[
            vec![1, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        assert_eq!(
            SelectFirstHeuristic.select_variable(&network),
            Selection::Selected(1)
        );
    }

    #[test]
    fn every_heuristic_reports_all_assigned_on_a_complete_board() {
        let network = network_4x4(&[
            vec![1, 2, 3, 4],
            vec![3, 4, 1, 2],
            vec![2, 1, 4, 3],
            vec![4, 3, 2, 1],
        ]);
        assert_eq!(
            SelectFirstHeuristic.select_variable(&network),
            Selection::AllAssigned
        );
        assert_eq!(
            MinimumRemainingValuesHeuristic.select_variable(&network),
            Selection::AllAssigned
        );
        assert_eq!(
            DegreeHeuristic.select_variable(&network),
            Selection::AllAssigned
        );
        assert_eq!(
            MrvWithDegreeHeuristic.select_variable(&network),
            Selection::AllAssigned
        );
        assert_eq!(
            RandomVariableHeuristic::seeded(7).select_variable(&network),
            Selection::AllAssigned
        );
    }

    #[test]
    fn mrv_prefers_the_smallest_domain() {
        // One cell pinned to a single candidate, everything else wide open.
        let (mut network, mut trail) = empty_4x4();
        trail.place_marker();
        for v in [1, 2, 4] {
            network.remove_candidate(&mut trail, 6, v).unwrap();
        }
        assert_eq!(
            MinimumRemainingValuesHeuristic.select_variable(&network),
            Selection::Selected(6)
        );
    }

    #[test]
    fn mrv_fails_fast_on_an_empty_domain() {
        let (mut network, mut trail) = empty_4x4();
        trail.place_marker();
        for v in [1, 2, 3, 4] {
            network.remove_candidate(&mut trail, 3, v).unwrap();
        }
        // Variable 6 is more constrained than most, but the dead domain
        // at 3 is hit first and wins.
        for v in [1, 2, 4] {
            network.remove_candidate(&mut trail, 6, v).unwrap();
        }
        assert_eq!(
            MinimumRemainingValuesHeuristic.select_variable(&network),
            Selection::Conflict(3)
        );
    }

    #[test]
    fn mrv_ties_go_to_the_first_in_scan_order() {
        let (network, _) = empty_4x4();
        assert_eq!(
            MinimumRemainingValuesHeuristic.select_variable(&network),
            Selection::Selected(0)
        );
    }

    #[test]
    fn degree_picks_the_cell_with_the_most_unassigned_neighbors() {
        // Clues clustered in the top-left block depress the degree of
        // everything nearby; (2, 2) is the first cell with all seven
        // neighbors still open.
        let network = network_4x4(&[
            vec![0, 2, 0, 0],
            vec![3, 4, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        assert_eq!(
            DegreeHeuristic.select_variable(&network),
            Selection::Selected(10)
        );
    }

    #[test]
    fn mrv_with_degree_breaks_domain_ties_by_degree() {
        let (mut network, mut trail) = empty_4x4();
        trail.place_marker();
        // Two cells tied at two candidates each.
        for v in [3, 4] {
            network.remove_candidate(&mut trail, 5, v).unwrap();
            network.remove_candidate(&mut trail, 10, v).unwrap();
        }
        // Assigning a neighbor of 5 lowers its unassigned degree to 6;
        // 10 keeps all 7.
        network.assign(&mut trail, 1, 3).unwrap();

        assert_eq!(
            MinimumRemainingValuesHeuristic.select_variable(&network),
            Selection::Selected(5)
        );
        assert_eq!(
            MrvWithDegreeHeuristic.select_variable(&network),
            Selection::Selected(10)
        );
    }

    #[test]
    fn seeded_random_selection_reproduces_and_stays_unassigned() {
        let network = network_4x4(&[
            vec![1, 0, 0, 0],
            vec![0, 4, 0, 0],
            vec![0, 0, 4, 0],
            vec![0, 0, 0, 1],
        ]);
        let a = RandomVariableHeuristic::seeded(42);
        let b = RandomVariableHeuristic::seeded(42);
        for _ in 0..16 {
            let pick_a = a.select_variable(&network);
            assert_eq!(pick_a, b.select_variable(&network));
            match pick_a {
                Selection::Selected(id) => {
                    assert!(!network.variables()[id].is_assigned());
                }
                other => panic!("expected a selection, got {other:?}"),
            }
        }
    }
}
