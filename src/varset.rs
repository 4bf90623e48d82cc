// src/varset.rs
//! The ordered variable-set representation used for gen/kill/live-in/live-out.

use std::collections::BTreeSet;
use std::fmt;

use crate::cfg::Variable;

/// An ordered set of [`Variable`]s.
///
/// Backed by a `BTreeSet`, so iteration order follows the variable's total
/// order and equality is purely structural — two `VarSet`s are equal iff
/// they contain the same elements, regardless of how they were built. This
/// is the sorted-sequence representation the data model calls for; for a
/// dense, small-integer variable universe (e.g. register allocation), a
/// caller can instead key a `Variable` newtype on index and back it with a
/// bitset without changing anything downstream of this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarSet<V: Variable> {
    vars: BTreeSet<V>,
}

impl<V: Variable> VarSet<V> {
    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            vars: BTreeSet::new(),
        }
    }

    /// Builds a `VarSet` from an arbitrary sequence of variables, duplicates
    /// collapsed.
    pub fn from_sequence<I: IntoIterator<Item = V>>(vars: I) -> Self {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    /// True if the set has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Number of elements in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// True if `var` is a member of the set.
    #[must_use]
    pub fn contains(&self, var: &V) -> bool {
        self.vars.contains(var)
    }

    /// Inserts `var`, returning whether it was newly inserted.
    pub fn insert(&mut self, var: V) -> bool {
        self.vars.insert(var)
    }

    /// Removes `var`, returning whether it was present.
    pub fn remove(&mut self, var: &V) -> bool {
        self.vars.remove(var)
    }

    /// Returns the union of `self` and `other` as a new set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            vars: self.vars.union(&other.vars).cloned().collect(),
        }
    }

    /// Unions `other` into `self` in place.
    pub fn union_with(&mut self, other: &Self) {
        for var in &other.vars {
            self.vars.insert(var.clone());
        }
    }

    /// Returns `self \ other` (elements of `self` not in `other`) as a new
    /// set.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            vars: self.vars.difference(&other.vars).cloned().collect(),
        }
    }

    /// Iterates over the set in variable order.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.vars.iter()
    }
}

impl<V: Variable> IntoIterator for VarSet<V> {
    type Item = V;
    type IntoIter = std::collections::btree_set::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.into_iter()
    }
}

impl<'a, V: Variable> IntoIterator for &'a VarSet<V> {
    type Item = &'a V;
    type IntoIter = std::collections::btree_set::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

impl<V: Variable> FromIterator<V> for VarSet<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::from_sequence(iter)
    }
}

impl<V: Variable + fmt::Display> fmt::Display for VarSet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, var) in self.vars.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{var}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_commutative_and_dedups() {
        let a = VarSet::from_sequence([1, 2, 3]);
        let b = VarSet::from_sequence([2, 3, 4]);
        let expected = VarSet::from_sequence([1, 2, 3, 4]);
        assert_eq!(a.union(&b), expected);
        assert_eq!(b.union(&a), expected);
    }

    #[test]
    fn difference_removes_shared_elements() {
        let a = VarSet::from_sequence([1, 2, 3]);
        let b = VarSet::from_sequence([2, 3, 4]);
        assert_eq!(a.difference(&b), VarSet::from_sequence([1]));
    }

    #[test]
    fn duplicates_in_source_sequence_collapse() {
        let set = VarSet::from_sequence([1, 1, 2, 2, 2, 3]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn empty_set_has_no_elements() {
        let set: VarSet<i32> = VarSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
