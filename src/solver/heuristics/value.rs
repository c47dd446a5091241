//! Heuristics for ordering the candidate values of a chosen cell.

use crate::solver::network::{ConstraintNetwork, VariableId};

/// A trait for strategies that determine the order in which a variable's
/// remaining candidates are tried.
///
/// The engine calls this once per decision, before the first candidate
/// is assigned, so the returned order is computed against the domain as
/// it stands at that moment.
pub trait ValueOrderingHeuristic {
    fn order_values(&self, network: &ConstraintNetwork, variable: VariableId) -> Vec<usize>;
}

/// Tries candidates in ascending numeric order, the domain's natural
/// iteration order.
pub struct NaturalOrderHeuristic;

impl ValueOrderingHeuristic for NaturalOrderHeuristic {
    fn order_values(&self, network: &ConstraintNetwork, variable: VariableId) -> Vec<usize> {
        network
            .variable(variable)
            .map(|v| v.domain().iter().collect())
            .unwrap_or_default()
    }
}

/// Least Constraining Value: tries first the candidate that appears in
/// the fewest neighbor domains.
///
/// The value that eliminates the fewest options for the neighbors is the
/// one least likely to paint the rest of the board into a corner. The
/// sort is stable over an ascending scan, so candidates tied on their
/// count stay in ascending numeric order.
pub struct LeastConstrainingValueHeuristic;

impl ValueOrderingHeuristic for LeastConstrainingValueHeuristic {
    fn order_values(&self, network: &ConstraintNetwork, variable: VariableId) -> Vec<usize> {
        let candidates: Vec<usize> = match network.variable(variable) {
            Ok(v) => v.domain().iter().collect(),
            Err(_) => return Vec::new(),
        };
        let neighbors = match network.neighbors_of(variable) {
            Ok(n) => n,
            Err(_) => return Vec::new(),
        };

        let mut counted: Vec<(usize, usize)> = candidates
            .into_iter()
            .map(|value| {
                let count = neighbors
                    .iter()
                    .filter(|&&n| network.variables()[n].domain().contains(value))
                    .count();
                (count, value)
            })
            .collect();
        counted.sort_by_key(|&(count, _)| count);
        counted.into_iter().map(|(_, value)| value).collect()
    }
}
