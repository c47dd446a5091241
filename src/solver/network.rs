use std::fmt;

use bit_set::BitSet;

use crate::{
    error::{Error, Result},
    grid::{BlockDims, Grid},
    solver::{domain::Domain, trail::Trail},
};

/// Index of a [`Variable`] in its network's arena.
pub type VariableId = usize;
/// Index of a [`Constraint`] in its network's arena.
pub type ConstraintId = usize;

/// One grid cell under search.
///
/// A variable built from a clue cell starts assigned with a singleton
/// domain and is never changeable; one built from an empty cell starts
/// unassigned with the full domain. Assignment collapses the domain to
/// the assigned value so that domain inspection stays uniform across
/// assigned and unassigned variables.
#[derive(Debug, Clone)]
pub struct Variable {
    row: usize,
    col: usize,
    domain: Domain,
    assignment: Option<usize>,
    changeable: bool,
}

impl Variable {
    fn from_cell(row: usize, col: usize, clue: Option<usize>, size: usize) -> Self {
        match clue {
            Some(value) => Self {
                row,
                col,
                domain: Domain::singleton(value),
                assignment: Some(value),
                changeable: false,
            },
            None => Self {
                row,
                col,
                domain: Domain::full(size),
                assignment: None,
                changeable: true,
            },
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn assignment(&self) -> Option<usize> {
        self.assignment
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// False for original clues, which no search step may touch.
    pub fn is_changeable(&self) -> bool {
        self.changeable
    }
}

/// The scope a distinctness constraint ranges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Row(usize),
    Column(usize),
    Block(usize),
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Row(i) => write!(f, "row {i}"),
            ConstraintKind::Column(i) => write!(f, "column {i}"),
            ConstraintKind::Block(i) => write!(f, "block {i}"),
        }
    }
}

/// A group of exactly N cells that must hold pairwise-distinct values.
///
/// Members are arena indices, not owned references; the network resolves
/// them on demand, so the variable/constraint graph stays acyclic.
#[derive(Debug, Clone)]
pub struct Constraint {
    kind: ConstraintKind,
    members: Vec<VariableId>,
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn members(&self) -> &[VariableId] {
        &self.members
    }
}

/// Owns every variable and constraint of one puzzle.
///
/// The network is an arena: variables and constraints live in flat
/// vectors and refer to each other by index. Each variable's neighbor
/// set (every other variable sharing at least one constraint with it)
/// is derived once at construction and cached in ascending order, which
/// keeps all downstream iteration deterministic.
///
/// All search-time mutation goes through [`ConstraintNetwork::assign`]
/// and [`ConstraintNetwork::remove_candidate`], both of which snapshot
/// the touched variable onto the trail before writing. There is no
/// mutation path that can skip the trail, so an undo is always able to
/// restore the exact prior state.
#[derive(Debug, Clone)]
pub struct ConstraintNetwork {
    dims: BlockDims,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    neighbors: Vec<Vec<VariableId>>,
}

impl ConstraintNetwork {
    /// Builds the network for a grid, rejecting structurally invalid
    /// input (bad shape, out-of-range values, conflicting clues) before
    /// any search state exists.
    pub fn new(grid: &Grid) -> Result<Self> {
        grid.validate()?;

        let dims = grid.dims();
        let n = dims.size();
        let var_at = |row: usize, col: usize| row * n + col;

        let mut variables = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                variables.push(Variable::from_cell(row, col, grid.get(row, col), n));
            }
        }

        let mut constraints = Vec::with_capacity(3 * n);
        for i in 0..n {
            constraints.push(Constraint {
                kind: ConstraintKind::Row(i),
                members: (0..n).map(|c| var_at(i, c)).collect(),
            });
        }
        for i in 0..n {
            constraints.push(Constraint {
                kind: ConstraintKind::Column(i),
                members: (0..n).map(|r| var_at(r, i)).collect(),
            });
        }
        for b in 0..n {
            constraints.push(Constraint {
                kind: ConstraintKind::Block(b),
                members: grid.block_cells(b).map(|(r, c)| var_at(r, c)).collect(),
            });
        }

        let mut neighbor_bits = vec![BitSet::with_capacity(n * n); n * n];
        for constraint in &constraints {
            for &a in &constraint.members {
                for &b in &constraint.members {
                    if a != b {
                        neighbor_bits[a].insert(b);
                    }
                }
            }
        }
        let neighbors = neighbor_bits
            .iter()
            .map(|bits| bits.iter().collect())
            .collect();

        Ok(Self {
            dims,
            variables,
            constraints,
            neighbors,
        })
    }

    pub fn dims(&self) -> BlockDims {
        self.dims
    }

    /// Side length of the grid (and the number of values per domain).
    pub fn size(&self) -> usize {
        self.dims.size()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Checked variable lookup; [`Error::ForeignVariable`] for a handle
    /// that was not minted by this network.
    pub fn variable(&self, id: VariableId) -> Result<&Variable> {
        self.variables.get(id).ok_or(Error::ForeignVariable(id))
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Arena index for the cell at `(row, col)`.
    pub fn var_at(&self, row: usize, col: usize) -> VariableId {
        row * self.size() + col
    }

    /// The cached neighbor set of a variable, ascending by index.
    pub fn neighbors_of(&self, id: VariableId) -> Result<&[VariableId]> {
        self.neighbors
            .get(id)
            .map(Vec::as_slice)
            .ok_or(Error::ForeignVariable(id))
    }

    /// True iff no constraint holds two assigned variables with the same
    /// value. Pure check: no mutation, no propagation.
    pub fn is_consistent(&self) -> bool {
        self.constraints
            .iter()
            .all(|constraint| self.constraint_is_consistent(constraint))
    }

    fn constraint_is_consistent(&self, constraint: &Constraint) -> bool {
        let mut seen = BitSet::with_capacity(self.size() + 1);
        for &member in &constraint.members {
            if let Some(value) = self.variables[member].assignment {
                if !seen.insert(value) {
                    return false;
                }
            }
        }
        true
    }

    pub fn is_complete(&self) -> bool {
        self.variables.iter().all(Variable::is_assigned)
    }

    pub fn unassigned_count(&self) -> usize {
        self.variables.iter().filter(|v| !v.is_assigned()).count()
    }

    /// Assigns a value to a variable, snapshotting it onto the trail
    /// first so the decision can be undone.
    ///
    /// Clue cells cannot be assigned; a correct search never selects
    /// them, so hitting one is surfaced as an error rather than ignored.
    pub fn assign(&mut self, trail: &mut Trail, id: VariableId, value: usize) -> Result<()> {
        let variable = self.variables.get(id).ok_or(Error::ForeignVariable(id))?;
        if !variable.changeable {
            return Err(Error::ImmutableVariable {
                row: variable.row,
                col: variable.col,
            });
        }
        trail.push(id, variable);
        let variable = &mut self.variables[id];
        variable.assignment = Some(value);
        variable.domain.collapse_to(value);
        Ok(())
    }

    /// Removes a candidate from a variable's domain, snapshotting it
    /// onto the trail first. Returns whether the domain changed.
    ///
    /// Clue cells are left untouched (their domains are not prunable),
    /// reported as an unchanged domain.
    pub fn remove_candidate(
        &mut self,
        trail: &mut Trail,
        id: VariableId,
        value: usize,
    ) -> Result<bool> {
        let variable = self.variables.get(id).ok_or(Error::ForeignVariable(id))?;
        if !variable.changeable {
            return Ok(false);
        }
        trail.push(id, variable);
        Ok(self.variables[id].domain.remove(value))
    }

    /// Reads the solved grid back out of the network.
    pub fn to_grid(&self) -> Result<Grid> {
        let unassigned = self.unassigned_count();
        if unassigned > 0 {
            return Err(Error::IncompleteAssignment { unassigned });
        }
        let mut grid = Grid::empty(self.dims);
        for variable in &self.variables {
            grid.set(variable.row, variable.col, variable.assignment)?;
        }
        Ok(grid)
    }

    pub(crate) fn restore_variable(
        &mut self,
        id: VariableId,
        domain: Domain,
        assignment: Option<usize>,
    ) {
        let variable = &mut self.variables[id];
        variable.domain = domain;
        variable.assignment = assignment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn puzzle_4x4() -> Grid {
        Grid::from_rows(
            BlockDims::new(2, 2).unwrap(),
            &[
                vec![1, 0, 0, 0],
                vec![0, 4, 0, 0],
                vec![0, 0, 4, 0],
                vec![0, 0, 0, 1],
            ],
        )
        .unwrap()
    }

    #[test]
    fn construction_creates_one_variable_per_cell_and_three_constraint_families() {
        let network = ConstraintNetwork::new(&puzzle_4x4()).unwrap();
        assert_eq!(network.variable_count(), 16);
        assert_eq!(network.constraints().len(), 12);

        let rows = network
            .constraints()
            .iter()
            .filter(|c| matches!(c.kind(), ConstraintKind::Row(_)))
            .count();
        assert_eq!(rows, 4);
        for constraint in network.constraints() {
            assert_eq!(constraint.members().len(), 4);
        }
    }

    #[test]
    fn clue_cells_start_assigned_and_unchangeable() {
        let network = ConstraintNetwork::new(&puzzle_4x4()).unwrap();

        let clue = network.variable(network.var_at(0, 0)).unwrap();
        assert_eq!(clue.assignment(), Some(1));
        assert!(!clue.is_changeable());
        assert_eq!(clue.domain().get_singleton_value(), Some(1));

        let open = network.variable(network.var_at(0, 1)).unwrap();
        assert_eq!(open.assignment(), None);
        assert!(open.is_changeable());
        assert_eq!(open.domain().len(), 4);
    }

    #[test]
    fn neighbor_sets_union_row_column_and_block_peers() {
        let network = ConstraintNetwork::new(&puzzle_4x4()).unwrap();

        // In a 4x4 grid each cell has 3 row peers, 3 column peers, and
        // one block peer not already counted.
        for id in 0..network.variable_count() {
            assert_eq!(network.neighbors_of(id).unwrap().len(), 7);
        }

        let neighbors = network.neighbors_of(network.var_at(0, 0)).unwrap();
        let expected: Vec<VariableId> = vec![
            network.var_at(0, 1),
            network.var_at(0, 2),
            network.var_at(0, 3),
            network.var_at(1, 0),
            network.var_at(1, 1),
            network.var_at(2, 0),
            network.var_at(3, 0),
        ];
        assert_eq!(neighbors, expected.as_slice());
    }

    #[test]
    fn classic_grid_has_twenty_neighbors_per_cell() {
        let grid = Grid::empty(BlockDims::new(3, 3).unwrap());
        let network = ConstraintNetwork::new(&grid).unwrap();
        for id in 0..network.variable_count() {
            assert_eq!(network.neighbors_of(id).unwrap().len(), 20);
        }
    }

    #[test]
    fn conflicting_clues_never_build_a_network() {
        let grid = Grid::from_rows(
            BlockDims::new(2, 2).unwrap(),
            &[
                vec![1, 0, 1, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
            ],
        )
        .unwrap();
        assert!(matches!(
            ConstraintNetwork::new(&grid),
            Err(Error::ConflictingClues { value: 1, .. })
        ));
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let network = ConstraintNetwork::new(&puzzle_4x4()).unwrap();
        assert!(matches!(
            network.neighbors_of(99),
            Err(Error::ForeignVariable(99))
        ));
        assert!(matches!(
            network.variable(16),
            Err(Error::ForeignVariable(16))
        ));
    }

    #[test]
    fn assign_collapses_the_domain_and_is_visible_to_consistency() {
        let mut network = ConstraintNetwork::new(&puzzle_4x4()).unwrap();
        let mut trail = Trail::new(network.variable_count());
        trail.place_marker();

        let a = network.var_at(0, 1);
        let b = network.var_at(0, 2);
        network.assign(&mut trail, a, 3).unwrap();
        assert!(network.is_consistent());
        assert_eq!(network.variable(a).unwrap().domain().len(), 1);

        // Same value twice in row 0 must trip the pure check.
        network.assign(&mut trail, b, 3).unwrap();
        assert!(!network.is_consistent());
    }

    #[test]
    fn clue_cells_reject_assignment_and_ignore_pruning() {
        let mut network = ConstraintNetwork::new(&puzzle_4x4()).unwrap();
        let mut trail = Trail::new(network.variable_count());
        trail.place_marker();

        let clue = network.var_at(0, 0);
        assert!(matches!(
            network.assign(&mut trail, clue, 2),
            Err(Error::ImmutableVariable { row: 0, col: 0 })
        ));
        assert_eq!(network.remove_candidate(&mut trail, clue, 1).unwrap(), false);
        assert_eq!(network.variable(clue).unwrap().domain().len(), 1);
    }

    #[test]
    fn to_grid_demands_a_complete_assignment() {
        let network = ConstraintNetwork::new(&puzzle_4x4()).unwrap();
        assert!(matches!(
            network.to_grid(),
            Err(Error::IncompleteAssignment { unassigned: 12 })
        ));
    }

    #[test]
    fn to_grid_round_trips_a_complete_network() {
        let solved = Grid::from_rows(
            BlockDims::new(2, 2).unwrap(),
            &[
                vec![1, 2, 3, 4],
                vec![3, 4, 1, 2],
                vec![2, 1, 4, 3],
                vec![4, 3, 2, 1],
            ],
        )
        .unwrap();
        let network = ConstraintNetwork::new(&solved).unwrap();
        assert!(network.is_complete());
        assert_eq!(network.to_grid().unwrap(), solved);
    }
}
