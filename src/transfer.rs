// src/transfer.rs
//! Per-block transfer function derivation: computing `(gen, kill)` from an
//! instruction sequence.

use crate::cfg::InstructionEffects;
use crate::varset::VarSet;

/// The backward transfer function for a single block: `(gen, kill)`.
///
/// * `gen` — variables used in the block before being redefined in it
///   (upward-exposed uses).
/// * `kill` — variables definitely defined somewhere in the block whose
///   prior value is not upward-exposed past the definition.
///
/// By construction, `gen` and `kill` are always disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transfer<V: crate::cfg::Variable> {
    r#gen: VarSet<V>,
    kill: VarSet<V>,
}

impl<V: crate::cfg::Variable> Transfer<V> {
    /// The block's gen set.
    #[must_use]
    pub fn r#gen(&self) -> &VarSet<V> {
        &self.r#gen
    }

    /// The block's kill set.
    #[must_use]
    pub fn kill(&self) -> &VarSet<V> {
        &self.kill
    }

    /// Applies the transfer to a `live_out` set, producing `live_in`:
    /// `gen ∪ (live_out \ kill)`.
    #[must_use]
    pub fn apply(&self, live_out: &VarSet<V>) -> VarSet<V> {
        self.r#gen.union(&live_out.difference(&self.kill))
    }
}

/// Computes `(gen, kill)` for a block by folding its instructions from last
/// to first.
///
/// Given the suffix's accumulated `(gen', kill')` and the current
/// instruction's `(use, def)` sets, the recurrence is:
///
/// ```text
/// gen  = (gen' \ def) ∪ use
/// kill = (kill' ∪ def) \ use
/// ```
///
/// Walking backward, an instruction's uses make their variables
/// upward-exposed and shadow any later kill of the same variable; an
/// instruction's defs kill upward liveness unless a later use in the block
/// already exposed it. The starting value for the empty suffix is
/// `(∅, ∅)`, which makes `gen ∩ kill = ∅` an invariant of the construction
/// rather than something checked after the fact.
pub fn build_transfer<I>(code: &[I]) -> Transfer<I::Variable>
where
    I: InstructionEffects,
{
    let mut r#gen = VarSet::empty();
    let mut kill = VarSet::empty();

    for instr in code.iter().rev() {
        let uses = VarSet::from_sequence(instr.uses());
        let defs = VarSet::from_sequence(instr.defines());

        let new_gen = r#gen.difference(&defs).union(&uses);
        let new_kill = kill.union(&defs).difference(&uses);

        r#gen = new_gen;
        kill = new_kill;
    }

    Transfer { r#gen, kill }
}

/// Instruction-granularity live-in, derived from a block's `live_out`.
///
/// Runs the same recurrence used by [`build_transfer`] one instruction at a
/// time over an arbitrary instruction slice, and returns the live-in set at
/// the first instruction. Not used by [`crate::solver::analyze`] itself —
/// it exists so a downstream consumer (e.g. a register allocator building
/// per-instruction live ranges) can derive instruction-level liveness from
/// a block's `live_out` without re-deriving the recurrence.
pub fn instruction_live_in<I>(code: &[I], live_out: &VarSet<I::Variable>) -> VarSet<I::Variable>
where
    I: InstructionEffects,
{
    let mut live = live_out.clone();
    for instr in code.iter().rev() {
        let uses = VarSet::from_sequence(instr.uses());
        let defs = VarSet::from_sequence(instr.defines());
        live = live.difference(&defs).union(&uses);
    }
    live
}
