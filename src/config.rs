// src/config.rs
//! Configuration for the liveness analysis.

use crate::cfg::Variable;
use crate::varset::VarSet;

/// Configuration accepted by [`crate::solver::analyze`].
#[derive(Debug, Clone)]
pub struct Config<V: Variable> {
    exit_live: VarSet<V>,
    collect_max_liveset: bool,
    debug_annotate: bool,
}

impl<V: Variable> Config<V> {
    /// A new, default configuration: empty exit-live set, no instrumentation,
    /// no debug annotation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The variables considered live past the procedure's final returning
    /// block(s).
    #[must_use]
    pub fn exit_live(&self) -> &VarSet<V> {
        &self.exit_live
    }

    /// Sets the variables live at procedure exit, e.g. callee-saved
    /// registers or a return-value slot. Defaults to empty.
    pub fn set_exit_live(&mut self, exit_live: VarSet<V>) -> &mut Self {
        self.exit_live = exit_live;
        self
    }

    /// True if peak live-in set size should be tracked during the fixpoint
    /// iteration and reported on the result.
    #[must_use]
    pub const fn collect_max_liveset(&self) -> bool {
        self.collect_max_liveset
    }

    /// Enables or disables peak live-in set size instrumentation. Read-only
    /// bookkeeping: toggling this never changes the analysis result itself.
    pub fn set_collect_max_liveset(&mut self, yes: bool) -> &mut Self {
        self.collect_max_liveset = yes;
        self
    }

    /// True if [`crate::annotate::pretty_print`] and [`crate::annotate::annotate`]
    /// are enabled for this configuration.
    #[must_use]
    pub const fn debug_annotate(&self) -> bool {
        self.debug_annotate
    }

    /// Enables or disables the debug annotation operations.
    pub fn set_debug_annotate(&mut self, yes: bool) -> &mut Self {
        self.debug_annotate = yes;
        self
    }
}

impl<V: Variable> Default for Config<V> {
    fn default() -> Self {
        Self {
            exit_live: VarSet::empty(),
            collect_max_liveset: false,
            debug_annotate: false,
        }
    }
}
