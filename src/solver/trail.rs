use crate::{
    error::{Error, Result},
    solver::{
        domain::Domain,
        network::{ConstraintNetwork, Variable, VariableId},
    },
};

#[derive(Debug, Clone)]
struct TrailEntry {
    variable: VariableId,
    domain: Domain,
    assignment: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    /// Log length when the marker was placed; undo truncates back to it.
    entries_below: usize,
    serial: usize,
}

/// The undo log the whole search leans on.
///
/// Every mutation of a variable is preceded by a snapshot push; a marker
/// placed before each decision groups the decision's own assignment with
/// everything propagation pruned on its behalf, so one [`Trail::undo`]
/// reverts the entire decision. Markers nest LIFO, matching the search
/// recursion.
///
/// A variable is snapshotted at most once per marker: only the first
/// push since the current marker is recorded, so restoring entries in
/// reverse order lands every variable on its exact pre-marker state.
/// The dedup check is O(1) via a per-variable table of marker serials;
/// serials increase monotonically and are never reused, so entries left
/// over from popped markers can never be mistaken for current ones.
#[derive(Debug)]
pub struct Trail {
    entries: Vec<TrailEntry>,
    markers: Vec<Marker>,
    /// Serial of the marker each variable was last snapshotted under;
    /// 0 means never.
    saved_under: Vec<usize>,
    next_serial: usize,
    push_count: u64,
    undo_count: u64,
}

impl Trail {
    pub fn new(variable_count: usize) -> Self {
        Self {
            entries: Vec::new(),
            markers: Vec::new(),
            saved_under: vec![0; variable_count],
            next_serial: 1,
            push_count: 0,
            undo_count: 0,
        }
    }

    /// Opens a checkpoint for the next decision. O(1).
    pub fn place_marker(&mut self) {
        self.markers.push(Marker {
            entries_below: self.entries.len(),
            serial: self.next_serial,
        });
        self.next_serial += 1;
    }

    /// Records a variable's state ahead of its mutation.
    ///
    /// Must be called strictly before the state changes; the network's
    /// mutation API does this, and it is the only mutation path. A push
    /// with no open marker is kept for the lifetime of the trail (undo
    /// never reaches below the first marker).
    pub fn push(&mut self, id: VariableId, state: &Variable) {
        if let Some(marker) = self.markers.last() {
            if self.saved_under[id] == marker.serial {
                return;
            }
            self.saved_under[id] = marker.serial;
        }
        self.entries.push(TrailEntry {
            variable: id,
            domain: state.domain().clone(),
            assignment: state.assignment(),
        });
        self.push_count += 1;
    }

    /// Reverts every mutation recorded since the most recent marker,
    /// restoring snapshots in reverse push order, then closes the marker.
    pub fn undo(&mut self, network: &mut ConstraintNetwork) -> Result<()> {
        let marker = self.markers.pop().ok_or(Error::NoOpenMarker)?;
        let reverted = self.entries.split_off(marker.entries_below);
        for entry in reverted.into_iter().rev() {
            network.restore_variable(entry.variable, entry.domain, entry.assignment);
        }
        self.undo_count += 1;
        Ok(())
    }

    /// Number of open markers, equal to the current search depth.
    pub fn depth(&self) -> usize {
        self.markers.len()
    }

    /// Number of snapshots currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lifetime count of recorded snapshots (dedup hits not included).
    pub fn push_count(&self) -> u64 {
        self.push_count
    }

    /// Lifetime count of undone markers.
    pub fn undo_count(&self) -> u64 {
        self.undo_count
    }
}
