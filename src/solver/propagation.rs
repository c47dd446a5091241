use bit_set::BitSet;
use tracing::trace;

use crate::{
    error::Result,
    solver::{
        network::{ConstraintNetwork, VariableId},
        stats::SearchStats,
        trail::Trail,
    },
};

/// Everything a propagation pass may touch, scoped to one invocation.
///
/// The context owns no state of its own; it borrows the network, trail,
/// and stats for the duration of a single pass and funnels every write
/// through the network's trail-disciplined mutation API. Working sets a
/// strategy needs (which sources have broadcast, which neighbors were
/// already examined) are built fresh inside each pass, so nothing leaks
/// between calls.
pub struct PropagationContext<'a> {
    network: &'a mut ConstraintNetwork,
    trail: &'a mut Trail,
    stats: &'a mut SearchStats,
}

impl<'a> PropagationContext<'a> {
    pub fn new(
        network: &'a mut ConstraintNetwork,
        trail: &'a mut Trail,
        stats: &'a mut SearchStats,
    ) -> Self {
        Self {
            network,
            trail,
            stats,
        }
    }

    pub fn network(&self) -> &ConstraintNetwork {
        self.network
    }

    pub fn is_consistent(&self) -> bool {
        self.network.is_consistent()
    }

    /// Prunes a candidate from a variable's domain, snapshotting the
    /// variable onto the trail first. Returns whether the domain shrank.
    pub fn remove_candidate(&mut self, id: VariableId, value: usize) -> Result<bool> {
        let removed = self.network.remove_candidate(self.trail, id, value)?;
        if removed {
            self.stats.prunings += 1;
        }
        Ok(removed)
    }

    /// Assigns a value deduced by propagation, snapshotting first.
    pub fn assign(&mut self, id: VariableId, value: usize) -> Result<()> {
        self.network.assign(self.trail, id, value)?;
        self.stats.propagated_assignments += 1;
        Ok(())
    }
}

/// A constraint-propagation strategy, run once after every decision.
///
/// Implementations may prune domains and assign forced values through
/// the [`PropagationContext`], which guarantees the push-before-mutate
/// trail discipline. The return value says whether the network is still
/// consistent; `Ok(false)` makes the engine backtrack without recursing.
pub trait Propagator {
    fn propagate(&self, ctx: &mut PropagationContext<'_>) -> Result<bool>;
}

/// The baseline strategy: no pruning at all, just the pure consistency
/// predicate over every constraint. Cheap per node, blind to dead ends
/// until a duplicate actually lands on the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentsCheck;

impl Propagator for AssignmentsCheck {
    fn propagate(&self, ctx: &mut PropagationContext<'_>) -> Result<bool> {
        Ok(ctx.is_consistent())
    }
}

/// Forward checking: broadcast every assigned variable's value to its
/// neighbors, pruning that value from their domains and failing as soon
/// as a neighbor is left without options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardChecking;

impl Propagator for ForwardChecking {
    fn propagate(&self, ctx: &mut PropagationContext<'_>) -> Result<bool> {
        let mut processed = BitSet::with_capacity(ctx.network().variable_count());
        let sweep = eliminate_assigned(ctx, &mut processed)?;
        if !sweep.consistent {
            return Ok(false);
        }
        Ok(ctx.is_consistent())
    }
}

/// Forward checking plus singles, run to fixpoint.
///
/// On top of the elimination sweep, any unassigned variable whose domain
/// has shrunk to one value is assigned it (naked single), and any value
/// with exactly one remaining placement inside a constraint is assigned
/// there (hidden single). Each deduced assignment is itself broadcast on
/// the next round, so chains of forced moves resolve inside a single
/// pass. Costs more per node than plain forward checking but typically
/// collapses the search tree by orders of magnitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullPropagation;

impl Propagator for FullPropagation {
    fn propagate(&self, ctx: &mut PropagationContext<'_>) -> Result<bool> {
        let mut processed = BitSet::with_capacity(ctx.network().variable_count());
        loop {
            let sweep = eliminate_assigned(ctx, &mut processed)?;
            if !sweep.consistent {
                return Ok(false);
            }
            let mut changed = sweep.changed;

            let naked = assign_naked_singles(ctx)?;
            if !naked.consistent {
                return Ok(false);
            }
            changed |= naked.changed;

            let hidden = assign_hidden_singles(ctx)?;
            if !hidden.consistent {
                return Ok(false);
            }
            changed |= hidden.changed;

            if !changed {
                break;
            }
        }
        Ok(ctx.is_consistent())
    }
}

/// Outcome of one helper sweep within a pass.
struct Sweep {
    consistent: bool,
    changed: bool,
}

/// One elimination sweep over every assigned variable not yet in
/// `processed`. The visited set is fresh per sweep so that values
/// assigned mid-pass still reach neighbors examined by an earlier sweep;
/// `processed` persists for the whole pass so each source broadcasts
/// exactly once.
fn eliminate_assigned(ctx: &mut PropagationContext<'_>, processed: &mut BitSet) -> Result<Sweep> {
    let mut visited = BitSet::with_capacity(ctx.network().variable_count());
    let mut changed = false;

    for source in 0..ctx.network().variable_count() {
        if processed.contains(source) {
            continue;
        }
        let value = match ctx.network().variables()[source].assignment() {
            Some(v) => v,
            None => continue,
        };
        processed.insert(source);

        let neighbors = ctx.network().neighbors_of(source)?.to_vec();
        for neighbor in neighbors {
            if visited.contains(neighbor) {
                continue;
            }
            visited.insert(neighbor);

            let peer = &ctx.network().variables()[neighbor];
            if peer.assignment() == Some(value) {
                return Ok(Sweep {
                    consistent: false,
                    changed,
                });
            }
            // An unassigned neighbor whose sole candidate is this value
            // has nowhere left to go.
            if !peer.is_assigned() && peer.domain().is_singleton() && peer.domain().contains(value)
            {
                return Ok(Sweep {
                    consistent: false,
                    changed,
                });
            }
            if peer.is_changeable() && peer.domain().contains(value) {
                if ctx.remove_candidate(neighbor, value)? {
                    changed = true;
                }
                if ctx.network().variables()[neighbor].domain().is_empty() {
                    return Ok(Sweep {
                        consistent: false,
                        changed,
                    });
                }
            }
        }
    }

    Ok(Sweep {
        consistent: true,
        changed,
    })
}

/// Assigns every unassigned variable whose domain holds exactly one
/// value; an empty domain fails the pass.
fn assign_naked_singles(ctx: &mut PropagationContext<'_>) -> Result<Sweep> {
    let mut changed = false;
    for id in 0..ctx.network().variable_count() {
        let variable = &ctx.network().variables()[id];
        if variable.is_assigned() {
            continue;
        }
        if variable.domain().is_empty() {
            return Ok(Sweep {
                consistent: false,
                changed,
            });
        }
        if let Some(value) = variable.domain().get_singleton_value() {
            trace!(cell = id, value, "naked single");
            ctx.assign(id, value)?;
            changed = true;
        }
    }
    Ok(Sweep {
        consistent: true,
        changed,
    })
}

/// For each constraint and each value not yet assigned inside it, counts
/// the unassigned members that could still take the value: zero means
/// the branch is dead, exactly one forces the assignment.
fn assign_hidden_singles(ctx: &mut PropagationContext<'_>) -> Result<Sweep> {
    let mut changed = false;
    let size = ctx.network().size();

    for cid in 0..ctx.network().constraints().len() {
        let members = ctx.network().constraints()[cid].members().to_vec();
        for value in 1..=size {
            let mut already_assigned = false;
            let mut slots = 0;
            let mut slot = 0;
            for &member in &members {
                let variable = &ctx.network().variables()[member];
                match variable.assignment() {
                    Some(v) if v == value => {
                        already_assigned = true;
                        break;
                    }
                    Some(_) => {}
                    None => {
                        if variable.domain().contains(value) {
                            slots += 1;
                            slot = member;
                        }
                    }
                }
            }
            if already_assigned {
                continue;
            }
            match slots {
                0 => {
                    return Ok(Sweep {
                        consistent: false,
                        changed,
                    })
                }
                1 => {
                    trace!(cell = slot, value, "hidden single");
                    ctx.assign(slot, value)?;
                    changed = true;
                }
                _ => {}
            }
        }
    }

    Ok(Sweep {
        consistent: true,
        changed,
    })
}
