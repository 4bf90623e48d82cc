// src/store.rs
//! The liveness store: the mapping from block label to its transfer
//! function, running live-in approximation, and successor list, plus the
//! frozen [`LivenessResult`] `analyze` returns.

use std::collections::BTreeMap;

use crate::cfg::{BlockLabel, Variable};
use crate::error::LivenessError;
use crate::transfer::Transfer;
use crate::varset::VarSet;

/// Everything the store tracks for one block: its transfer function, the
/// analysis's current approximation of its live-in set, and the successor
/// labels reported by the CFG adapter at analysis time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntry<L: BlockLabel, V: Variable> {
    transfer: Transfer<V>,
    live_in: VarSet<V>,
    successors: Vec<L>,
}

impl<L: BlockLabel, V: Variable> BlockEntry<L, V> {
    /// Builds a new entry with an empty live-in set (the initial state
    /// every block starts from before the fixpoint loop runs).
    #[must_use]
    pub fn new(transfer: Transfer<V>, successors: Vec<L>) -> Self {
        Self {
            transfer,
            live_in: VarSet::empty(),
            successors,
        }
    }

    /// The block's transfer function.
    #[must_use]
    pub fn transfer(&self) -> &Transfer<V> {
        &self.transfer
    }

    /// The block's current live-in approximation.
    #[must_use]
    pub fn live_in(&self) -> &VarSet<V> {
        &self.live_in
    }

    /// The successor labels reported by the CFG adapter for this block.
    #[must_use]
    pub fn successors(&self) -> &[L] {
        &self.successors
    }

    /// Replaces the live-in approximation. Used only by the fixpoint loop.
    pub(crate) fn set_live_in(&mut self, live_in: VarSet<V>) {
        self.live_in = live_in;
    }
}

/// A mapping from block label to [`BlockEntry`], backed by a `BTreeMap` —
/// ordered maps suit deterministic debug printing, and `Label: Ord` is
/// already required of every label type.
#[derive(Debug, Clone, Default)]
pub struct LivenessStore<L: BlockLabel, V: Variable> {
    entries: BTreeMap<L, BlockEntry<L, V>>,
}

impl<L: BlockLabel, V: Variable> LivenessStore<L, V> {
    /// Builds a store from an iterable of `(label, entry)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessError::InvariantViolation`] if the same label
    /// appears twice (a programming error in the caller, typically the CFG
    /// adapter's `postorder()` producing duplicates), or if any entry's
    /// `successors` names a label absent from the set being initialized —
    /// a CFG adapter whose `successors()` and `postorder()` disagree.
    /// Silently dropping such an edge would violate I2, so it is reported
    /// rather than ignored.
    pub fn init<I>(entries: I) -> Result<Self, LivenessError>
    where
        I: IntoIterator<Item = (L, BlockEntry<L, V>)>,
    {
        let mut map = BTreeMap::new();
        for (label, entry) in entries {
            if map.insert(label.clone(), entry).is_some() {
                return Err(LivenessError::invariant_violation(format!(
                    "duplicate label {label:?} in liveness store initialization"
                )));
            }
        }
        for entry in map.values() {
            for succ in entry.successors() {
                if !map.contains_key(succ) {
                    return Err(LivenessError::invariant_violation(format!(
                        "successor label {succ:?} has no corresponding entry"
                    )));
                }
            }
        }
        Ok(Self { entries: map })
    }

    /// Looks up the entry for `label`.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessError::UnknownLabel`] if `label` is absent —
    /// either it was never analyzed (unreachable) or it indicates a
    /// CFG/analysis mismatch.
    pub fn lookup(&self, label: &L) -> Result<&BlockEntry<L, V>, LivenessError> {
        self.entries
            .get(label)
            .ok_or_else(|| LivenessError::unknown_label(label))
    }

    /// Replaces the entry for `label`.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessError::UnknownLabel`] if `label` is not already
    /// present: `update` can only replace, never introduce, an entry.
    pub fn update(&mut self, label: &L, entry: BlockEntry<L, V>) -> Result<(), LivenessError> {
        if !self.entries.contains_key(label) {
            return Err(LivenessError::unknown_label(label));
        }
        self.entries.insert(label.clone(), entry);
        Ok(())
    }

    /// Iterates over all `(label, entry)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&L, &BlockEntry<L, V>)> {
        self.entries.iter()
    }

    /// Number of blocks tracked by the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the store has no blocks (e.g. an empty CFG was analyzed).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The frozen result of [`crate::solver::analyze`].
///
/// Conceptually immutable: nothing outside this crate can construct or
/// mutate one, and the query API (`livein`/`liveout`) only ever reads from
/// it.
#[derive(Debug, Clone)]
pub struct LivenessResult<L: BlockLabel, V: Variable> {
    pub(crate) store: LivenessStore<L, V>,
    pub(crate) exit_live: VarSet<V>,
    pub(crate) max_liveset: Option<usize>,
}

impl<L: BlockLabel, V: Variable> LivenessResult<L, V> {
    /// The stored live-in set for `label`.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessError::UnknownLabel`] if `label` is not in the
    /// result.
    pub fn livein(&self, label: &L) -> Result<VarSet<V>, LivenessError> {
        Ok(self.store.lookup(label)?.live_in().clone())
    }

    /// The live-out set for `label`, computed lazily as the union of its
    /// successors' live-in sets (or [`Config::exit_live`](crate::config::Config::exit_live)
    /// if it has none). Not cached: callers that need repeated access
    /// should memoize externally. Successor labels are validated against
    /// the store at construction time (see [`LivenessStore::init`]), so a
    /// recorded successor can never itself be missing here.
    ///
    /// # Errors
    ///
    /// Returns [`LivenessError::UnknownLabel`] if `label` is not in the
    /// result.
    pub fn liveout(&self, label: &L) -> Result<VarSet<V>, LivenessError> {
        let entry = self.store.lookup(label)?;
        if entry.successors().is_empty() {
            return Ok(self.exit_live.clone());
        }
        let mut live_out = VarSet::empty();
        for succ in entry.successors() {
            live_out.union_with(&self.store.lookup(succ)?.live_in().clone());
        }
        Ok(live_out)
    }

    /// The maximum live-in set size observed across all blocks and sweeps,
    /// if [`Config::collect_max_liveset`](crate::config::Config::collect_max_liveset)
    /// was enabled for this analysis.
    #[must_use]
    pub const fn max_liveset(&self) -> Option<usize> {
        self.max_liveset
    }

    /// Iterates over all analyzed `(label, entry)` pairs, in label order.
    pub fn entries(&self) -> impl Iterator<Item = (&L, &BlockEntry<L, V>)> {
        self.store.iter()
    }

    /// Number of blocks in the result (the reachable blocks of the
    /// analyzed CFG).
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True for an empty CFG (no reachable blocks).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::Transfer;

    fn entry(successors: Vec<&'static str>) -> BlockEntry<&'static str, i32> {
        BlockEntry::new(Transfer::default(), successors)
    }

    #[test]
    fn init_rejects_duplicate_labels() {
        let result = LivenessStore::init([("L0", entry(vec![])), ("L0", entry(vec![]))]);
        assert!(matches!(
            result,
            Err(LivenessError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn init_rejects_successor_with_no_entry() {
        let result = LivenessStore::init([("L0", entry(vec!["L1"]))]);
        assert!(matches!(
            result,
            Err(LivenessError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn lookup_unknown_label_fails() {
        let store: LivenessStore<&'static str, i32> = LivenessStore::init([]).unwrap();
        let err = store.lookup(&"L0").unwrap_err();
        assert!(matches!(err, LivenessError::UnknownLabel { .. }));
    }

    #[test]
    fn update_unknown_label_fails() {
        let mut store: LivenessStore<&'static str, i32> = LivenessStore::init([]).unwrap();
        let err = store.update(&"L0", entry(vec![])).unwrap_err();
        assert!(matches!(err, LivenessError::UnknownLabel { .. }));
    }

    #[test]
    fn update_replaces_existing_entry() {
        let mut store = LivenessStore::init([("L0", entry(vec![]))]).unwrap();
        let mut replacement = entry(vec![]);
        replacement.live_in = VarSet::from_sequence([1, 2]);
        store.update(&"L0", replacement).unwrap();
        assert_eq!(store.lookup(&"L0").unwrap().live_in().len(), 2);
    }
}
