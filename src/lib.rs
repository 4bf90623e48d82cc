// src/lib.rs
//! # cfg-liveness
//!
//! A backward dataflow liveness analysis engine over a generic control-flow
//! graph (CFG) of basic blocks containing instructions that read and write
//! named variables. Liveness analysis determines, for every program point,
//! the set of variables whose current value may be used on some path before
//! being redefined.
//!
//! This crate owns none of the following: the CFG data structure, the
//! instruction representation, or the meaning of "use"/"define" for a
//! particular instruction set. Those are host concerns, expressed here as
//! the [`ControlFlowGraph`](cfg::ControlFlowGraph) and
//! [`InstructionEffects`](cfg::InstructionEffects) traits.
//!
//! ## Important modules:
//! * `cfg` - the abstract CFG adapter contract the core consumes
//! * `varset` - the ordered variable-set representation
//! * `transfer` - per-block gen/kill derivation
//! * `store` - the liveness store and the frozen analysis result
//! * `solver` - the worklist fixpoint engine (`analyze`)
//! * `annotate` - optional debug pretty-printing and CFG annotation
//! * `config` - analysis configuration (`Config`)
//! * `error` - the crate's error type

pub mod annotate;
pub mod cfg;
pub mod config;
pub mod error;
pub mod solver;
pub mod store;
pub mod transfer;
pub mod varset;

pub use annotate::{annotate, pretty_print, BlockAnnotate, CommentSink};
pub use cfg::{BlockLabel, ControlFlowGraph, InstructionEffects, Variable};
pub use config::Config;
pub use error::LivenessError;
pub use solver::analyze;
pub use store::{BlockEntry, LivenessResult};
pub use transfer::{instruction_live_in, Transfer};
pub use varset::VarSet;
