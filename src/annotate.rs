// src/annotate.rs
//! Debug-only rendering of a [`LivenessResult`]: a human-readable dump, and
//! a CFG rewrite that prefixes each block with its live-in/live-out as
//! pseudo-comment instructions.
//!
//! Both operations here are gated behind
//! [`Config::debug_annotate`](crate::config::Config::debug_annotate) by
//! convention — the core fixpoint loop never calls into this module, so a
//! host only pays for it when it asks.

use std::fmt;

use crate::cfg::{BlockLabel, ControlFlowGraph, InstructionEffects};
use crate::error::LivenessError;
use crate::store::LivenessResult;

/// Writes `result` into `sink` as a human-readable block-by-block listing:
///
/// ```text
/// L0:
///   live-in:  {a, b}
///   code:     a := b + 1; return a
///   live-out: {a}
/// ```
///
/// Blocks are printed in `cfg.postorder()` order. Block code is delegated
/// to the host's own `Display` impl for its instruction type, one
/// semicolon-separated line per block.
///
/// # Errors
///
/// Returns [`LivenessError::UnknownLabel`] if `result` does not contain a
/// label `cfg.postorder()` reports (i.e. `result` was not produced by
/// analyzing this same `cfg`), or [`LivenessError::InterfaceContract`] if
/// writing to `sink` fails.
pub fn pretty_print<G, W>(
    cfg: &G,
    result: &LivenessResult<G::Label, <G::Instruction as InstructionEffects>::Variable>,
    sink: &mut W,
) -> Result<(), LivenessError>
where
    G: ControlFlowGraph,
    G::Label: fmt::Display,
    G::Instruction: fmt::Display,
    <G::Instruction as InstructionEffects>::Variable: fmt::Display,
    W: fmt::Write,
{
    for label in cfg.postorder() {
        let live_in = result.livein(&label)?;
        let live_out = result.liveout(&label)?;
        let code = cfg
            .block_code(&label)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");

        writeln!(sink, "{label}:").map_err(fmt_err)?;
        writeln!(sink, "  live-in:  {live_in}").map_err(fmt_err)?;
        writeln!(sink, "  code:     {code}").map_err(fmt_err)?;
        writeln!(sink, "  live-out: {live_out}").map_err(fmt_err)?;
    }
    Ok(())
}

/// Host hook for [`annotate`]: turns a live-in or live-out set into one
/// pseudo-comment instruction in the host's own instruction
/// representation, so it can be spliced into a block's code.
pub trait CommentSink<I: InstructionEffects> {
    /// Builds a pseudo-comment instruction carrying `term`.
    fn make_comment(&self, term: &crate::varset::VarSet<I::Variable>) -> I;
}

/// Host hook for [`annotate`]: records a block's rewritten code. A type
/// implementing this trait plays the role of the rewritten CFG (`cfg'`)
/// the core itself has no way to construct, since it does not own the
/// host's CFG representation.
pub trait BlockAnnotate<L: BlockLabel, I> {
    /// Replaces block `label`'s code with `code`.
    fn set_code(&mut self, label: &L, code: Vec<I>);
}

/// Rewrites every block of `cfg` to carry its live-in and live-out sets as
/// two leading pseudo-comment instructions, via the host-provided `sink`
/// (builds the comment instructions) and `target` (receives the rewritten
/// code per block — the host's stand-in for a returned `cfg'`).
///
/// For each block in `cfg.postorder()`, the new code is
/// `[make_comment(live_in), make_comment(live_out), ...original code]`.
///
/// # Errors
///
/// Returns [`LivenessError::UnknownLabel`] if `result` does not contain a
/// label `cfg.postorder()` reports.
pub fn annotate<G, S, A>(
    cfg: &G,
    result: &LivenessResult<G::Label, <G::Instruction as InstructionEffects>::Variable>,
    sink: &S,
    target: &mut A,
) -> Result<(), LivenessError>
where
    G: ControlFlowGraph,
    G::Instruction: Clone,
    S: CommentSink<G::Instruction>,
    A: BlockAnnotate<G::Label, G::Instruction>,
{
    for label in cfg.postorder() {
        let live_in = result.livein(&label)?;
        let live_out = result.liveout(&label)?;

        let original = cfg.block_code(&label);
        let mut code = Vec::with_capacity(original.len() + 2);
        code.push(sink.make_comment(&live_in));
        code.push(sink.make_comment(&live_out));
        code.extend_from_slice(original);

        target.set_code(&label, code);
    }
    Ok(())
}

fn fmt_err(err: fmt::Error) -> LivenessError {
    LivenessError::interface_contract(format!("annotation formatting failed: {err}"))
}
