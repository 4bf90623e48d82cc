// src/cfg.rs
//! The abstract CFG adapter contract the liveness core consumes.
//!
//! The CFG data structure itself, the instruction representation, and the
//! meaning of "use"/"define" for a particular instruction set are external
//! collaborators: the core never assumes a concrete IR. A host compiler
//! implements [`ControlFlowGraph`] over its own basic-block graph and
//! [`InstructionEffects`] over its own instruction type, and the rest of
//! this crate is generic over both.

use std::fmt::Debug;
use std::hash::Hash;

/// An opaque variable identifier.
///
/// The analysis does not inspect variable structure; it only ever compares,
/// clones, and orders variables. Blanket-implemented for any type that
/// already satisfies the bound, so most hosts need no explicit `impl`.
pub trait Variable: Clone + Eq + Ord + Debug {}
impl<T: Clone + Eq + Ord + Debug> Variable for T {}

/// An opaque basic-block label.
///
/// Labels must be hashable and totally ordered: ordering lets the liveness
/// store use an ordered map (for deterministic debug output), and hashing
/// lets hosts key their own side tables by label without extra wrapping.
pub trait BlockLabel: Clone + Eq + Ord + Hash + Debug {}
impl<T: Clone + Eq + Ord + Hash + Debug> BlockLabel for T {}

/// Read-only view over a host control-flow graph, as needed by the liveness
/// core.
///
/// All three methods are pure and side-effect-free from the analysis's
/// perspective; the core never mutates the host CFG through this trait.
pub trait ControlFlowGraph {
    /// The CFG's basic-block label type.
    type Label: BlockLabel;
    /// The CFG's instruction type. Must know its own use/define effects.
    type Instruction: InstructionEffects;

    /// A depth-first postorder traversal of the CFG starting from the
    /// entry block. Each reachable label appears exactly once; unreachable
    /// labels are omitted entirely (they are not analyzed and queries for
    /// them fail with `UnknownLabel`).
    fn postorder(&self) -> Vec<Self::Label>;

    /// The successors of block `label`, in any order. May contain
    /// duplicates; the core deduplicates them implicitly through set union.
    fn successors(&self, label: &Self::Label) -> Vec<Self::Label>;

    /// The instructions of block `label`, in execution order.
    fn block_code(&self, label: &Self::Label) -> &[Self::Instruction];
}

/// The use/define effects of a single instruction.
///
/// `uses` reports only variables read *before* any of the instruction's own
/// writes take effect (so an instruction that both reads and overwrites the
/// same variable, e.g. `x := x + 1`, reports `x` in `uses`).
pub trait InstructionEffects {
    /// The variable type this instruction set operates over.
    type Variable: Variable;

    /// Variables read by this instruction.
    fn uses(&self) -> Vec<Self::Variable>;

    /// Variables written by this instruction.
    fn defines(&self) -> Vec<Self::Variable>;
}
