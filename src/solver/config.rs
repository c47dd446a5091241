//! Run configuration: which strategy from each family a solver uses.
//!
//! Each family is a closed enum resolved into its trait object exactly
//! once, when the solver is built. Nothing matches on strategy names
//! during the search itself.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::solver::{
    heuristics::{
        value::{LeastConstrainingValueHeuristic, NaturalOrderHeuristic, ValueOrderingHeuristic},
        variable::{
            DegreeHeuristic, MinimumRemainingValuesHeuristic, MrvWithDegreeHeuristic,
            SelectFirstHeuristic, VariableSelectionHeuristic,
        },
    },
    propagation::{AssignmentsCheck, ForwardChecking, FullPropagation, Propagator},
};

/// The propagation strategy run after every decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Propagation {
    #[default]
    AssignmentsCheck,
    ForwardChecking,
    FullPropagation,
}

impl Propagation {
    /// Resolves a configuration name; anything unrecognized falls back
    /// to the default rather than failing.
    pub fn from_name(name: &str) -> Self {
        match name {
            "assignments-check" => Self::AssignmentsCheck,
            "forward-checking" => Self::ForwardChecking,
            "full-propagation" => Self::FullPropagation,
            other => {
                warn!(name = other, "unknown propagation strategy, using the default");
                Self::default()
            }
        }
    }

    pub fn build(self) -> Box<dyn Propagator> {
        match self {
            Self::AssignmentsCheck => Box::new(AssignmentsCheck),
            Self::ForwardChecking => Box::new(ForwardChecking),
            Self::FullPropagation => Box::new(FullPropagation),
        }
    }
}

/// The variable-selection heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariableSelection {
    #[default]
    FirstUnassigned,
    MinimumRemainingValues,
    Degree,
    MrvWithDegree,
}

impl VariableSelection {
    pub fn from_name(name: &str) -> Self {
        match name {
            "first-unassigned" => Self::FirstUnassigned,
            "minimum-remaining-values" => Self::MinimumRemainingValues,
            "degree" => Self::Degree,
            "mrv-with-degree" => Self::MrvWithDegree,
            other => {
                warn!(
                    name = other,
                    "unknown variable-selection heuristic, using the default"
                );
                Self::default()
            }
        }
    }

    pub fn build(self) -> Box<dyn VariableSelectionHeuristic> {
        match self {
            Self::FirstUnassigned => Box::new(SelectFirstHeuristic),
            Self::MinimumRemainingValues => Box::new(MinimumRemainingValuesHeuristic),
            Self::Degree => Box::new(DegreeHeuristic),
            Self::MrvWithDegree => Box::new(MrvWithDegreeHeuristic),
        }
    }
}

/// The value-ordering heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueOrdering {
    #[default]
    NaturalOrder,
    LeastConstrainingValue,
}

impl ValueOrdering {
    pub fn from_name(name: &str) -> Self {
        match name {
            "natural-order" => Self::NaturalOrder,
            "least-constraining-value" => Self::LeastConstrainingValue,
            other => {
                warn!(
                    name = other,
                    "unknown value-ordering heuristic, using the default"
                );
                Self::default()
            }
        }
    }

    pub fn build(self) -> Box<dyn ValueOrderingHeuristic> {
        match self {
            Self::NaturalOrder => Box::new(NaturalOrderHeuristic),
            Self::LeastConstrainingValue => Box::new(LeastConstrainingValueHeuristic),
        }
    }
}

/// The full strategy selection for one run.
///
/// Serializable so a configuration can arrive as data; every field has a
/// default, so a partial document (or an empty one) completes itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub propagation: Propagation,
    pub variable_selection: VariableSelection,
    pub value_ordering: ValueOrdering,
}

impl SolverConfig {
    pub fn from_names(propagation: &str, variable_selection: &str, value_ordering: &str) -> Self {
        Self {
            propagation: Propagation::from_name(propagation),
            variable_selection: VariableSelection::from_name(variable_selection),
            value_ordering: ValueOrdering::from_name(value_ordering),
        }
    }
}
