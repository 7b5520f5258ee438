//! Semantic equality and hashing.
//!
//! Two automata over the same input alphabet are equal when every word
//! yields the same output on both. For acceptors this is language
//! equivalence. The check goes through the canonical form: the minimal
//! automaton of the reachable part, numbered by the depth-first walk from
//! the start state. Minimal automata are unique up to renaming of states and
//! the walk fixes the renaming, so equal behavior means equal tables.
//!
//! The canonical form is computed once per automaton and memoized. Automata
//! over an infinite input alphabet have no canonical form; such a value is
//! only equal to itself (or to a clone of the same handle).

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::alphabet::Letter;
use crate::dfa::{Dfa, State};
use crate::error::Result;
use crate::table::Table;

impl<S: State, I: Letter, O: Letter> Dfa<S, I, O> {
    /// Canonical table: minimal, reachable, numbered in walk order.
    pub fn canonical_table(&self) -> Result<Rc<Table<I, O>>> {
        self.minimal_table()
    }

    /// Returns `true` if both automata produce the same output on every word.
    ///
    /// Unlike `==`, this reports why the comparison was impossible instead
    /// of answering `false`.
    pub fn equivalent<S2: State>(&self, other: &Dfa<S2, I, O>) -> Result<bool> {
        if self.ptr_eq(other) {
            return Ok(true);
        }
        if self.inputs() != other.inputs() {
            return Ok(false);
        }
        Ok(self.canonical_table()? == other.canonical_table()?)
    }
}

impl<S: State, S2: State, I: Letter, O: Letter> PartialEq<Dfa<S2, I, O>> for Dfa<S, I, O> {
    fn eq(&self, other: &Dfa<S2, I, O>) -> bool {
        self.equivalent(other).unwrap_or(false)
    }
}

impl<S: State, I: Letter, O: Letter> Eq for Dfa<S, I, O> {}

impl<S: State, I: Letter, O: Letter> Hash for Dfa<S, I, O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.canonical_table() {
            Ok(table) => table.hash(state),
            Err(_) => self.identity().hash(state),
        }
    }
}
