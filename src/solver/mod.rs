//! The solving machinery: the constraint network, the trail that makes
//! backtracking cheap, and the pluggable strategies that drive the search.

pub mod config;
pub mod domain;
pub mod engine;
pub mod heuristics;
pub mod network;
pub mod propagation;
pub mod stats;
pub mod trail;
