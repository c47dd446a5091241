//! Heuristics that order the search: which variable to branch on next,
//! and which of its values to try first.

pub mod value;
pub mod variable;
