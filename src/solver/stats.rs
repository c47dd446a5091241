use prettytable::{Cell, Row, Table};

use crate::solver::trail::Trail;

/// Counters accumulated over the lifetime of one solver.
///
/// The engine bumps the search-shaped counters (nodes, decisions,
/// backtracks) and the propagation context bumps the rest, so a strategy
/// never touches these directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    /// Search nodes entered, including the root.
    pub nodes_visited: u64,
    /// Candidate values tried at decision points.
    pub decisions: u64,
    /// Decisions undone after a failed branch.
    pub backtracks: u64,
    /// Propagation passes run, one per decision.
    pub propagations: u64,
    /// Candidates pruned from domains by propagation.
    pub prunings: u64,
    /// Assignments deduced by propagation rather than decided.
    pub propagated_assignments: u64,
    /// Deepest decision level reached.
    pub max_depth: usize,
}

pub fn render_stats_table(stats: &SearchStats, trail: &Trail) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Count")]));

    let rows = [
        ("Nodes visited", stats.nodes_visited),
        ("Decisions", stats.decisions),
        ("Backtracks", stats.backtracks),
        ("Propagation passes", stats.propagations),
        ("Prunings", stats.prunings),
        ("Propagated assignments", stats.propagated_assignments),
        ("Max depth", stats.max_depth as u64),
        ("Trail pushes", trail.push_count()),
        ("Trail undos", trail.undo_count()),
    ];
    for (metric, count) in rows {
        table.add_row(Row::new(vec![
            Cell::new(metric),
            Cell::new(&count.to_string()),
        ]));
    }

    table.to_string()
}
