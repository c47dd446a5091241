pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong while constructing or driving a solver.
///
/// Structural variants reject malformed input grids before any search
/// begins. Contract variants surface misuse of the solver's internal
/// protocol; a correctly driven search never produces them. Running out
/// of candidates is not an error and is reported through
/// [`SearchOutcome::Exhausted`](crate::solver::engine::SearchOutcome).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("block dimensions must both be at least 1, got {p}x{q}")]
    BadBlockDims { p: usize, q: usize },

    #[error("expected a {expected}x{expected} grid, got {rows} rows and {cols} columns in row {row}")]
    GridShape {
        expected: usize,
        rows: usize,
        cols: usize,
        row: usize,
    },

    #[error("cell ({row}, {col}) holds {value}, outside the legal range 1..={max}")]
    ValueOutOfRange {
        row: usize,
        col: usize,
        value: usize,
        max: usize,
    },

    #[error("cells ({row_a}, {col_a}) and ({row_b}, {col_b}) both hold clue {value} in {scope}")]
    ConflictingClues {
        row_a: usize,
        col_a: usize,
        row_b: usize,
        col_b: usize,
        value: usize,
        scope: String,
    },

    #[error("variable handle {0} does not belong to this network")]
    ForeignVariable(usize),

    #[error("cell ({row}, {col}) is a fixed clue and cannot be assigned")]
    ImmutableVariable { row: usize, col: usize },

    #[error("undo called with no open trail marker")]
    NoOpenMarker,

    #[error("{unassigned} variable(s) still unassigned; no complete solution to read")]
    IncompleteAssignment { unassigned: usize },
}
