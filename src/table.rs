//! Dense transition tables.
//!
//! A [`Table`] is the materialized form of an automaton over states `0..N`:
//! one label per state and one successor per `(state, letter)` pair, with the
//! letters kept in ascending order so that a letter's column is found by
//! binary search. Normalized, minimized, decoded and enumerated automata are
//! all backed by a table.

use std::rc::Rc;

use crate::alphabet::{Alphabet, Letter};
use crate::dfa::Dfa;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table<I: Letter, O: Letter> {
    /// Input letters in ascending order (column order).
    letters: Vec<I>,
    /// `labels[s]` is the output of state `s`.
    labels: Vec<O>,
    /// `successors[s][j]` is the successor of `s` on `letters[j]`.
    successors: Vec<Vec<usize>>,
}

impl<I: Letter, O: Letter> Table<I, O> {
    pub fn new(letters: Vec<I>, labels: Vec<O>, successors: Vec<Vec<usize>>) -> Self {
        assert_eq!(labels.len(), successors.len(), "Every state needs a label and a row");
        debug_assert!(letters.windows(2).all(|w| w[0] < w[1]), "Letters must be sorted and distinct");
        debug_assert!(successors
            .iter()
            .all(|row| row.len() == letters.len() && row.iter().all(|&t| t < labels.len())));
        Self {
            letters,
            labels,
            successors,
        }
    }

    pub fn num_states(&self) -> usize {
        self.labels.len()
    }

    pub fn letters(&self) -> &[I] {
        &self.letters
    }

    pub fn labels(&self) -> &[O] {
        &self.labels
    }

    pub fn label(&self, state: usize) -> &O {
        &self.labels[state]
    }

    /// Successor of `state` on the letter in column `column`.
    pub fn successor(&self, state: usize, column: usize) -> usize {
        self.successors[state][column]
    }

    /// Column of `letter`, if the table has one.
    pub fn column(&self, letter: &I) -> Option<usize> {
        self.letters.binary_search(letter).ok()
    }

    /// Renumbers the states reachable from `start` in depth-first discovery order.
    ///
    /// The exploration matches [`Dfa::walk`]: states are popped from a stack
    /// and successors are pushed so that the smallest letter is explored
    /// first. Unreachable states are dropped and `start` becomes state `0`.
    pub fn canonicalize(&self, start: usize) -> Table<I, O> {
        const UNSEEN: usize = usize::MAX;
        let mut index = vec![UNSEEN; self.num_states()];
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(state) = stack.pop() {
            if index[state] != UNSEEN {
                continue;
            }
            index[state] = order.len();
            order.push(state);
            stack.extend(self.successors[state].iter().rev().copied());
        }

        let labels = order.iter().map(|&s| self.labels[s].clone()).collect();
        let successors = order
            .iter()
            .map(|&s| self.successors[s].iter().map(|&t| index[t]).collect())
            .collect();
        Table::new(self.letters.clone(), labels, successors)
    }

    /// Wraps the table into an automaton starting in `start`.
    ///
    /// # Panics
    ///
    /// The resulting transition function panics when asked about a letter
    /// without a column. Alphabet checks in [`Dfa::trace`] and friends reject
    /// such letters before they reach the table.
    pub fn into_dfa(self, start: usize, inputs: Alphabet<I>, outputs: Alphabet<O>) -> Dfa<usize, I, O> {
        assert!(start < self.num_states(), "Start state {} is out of range", start);
        let table = Rc::new(self);
        let rows = Rc::clone(&table);
        Dfa::from_parts(
            start,
            Box::new(move |&s: &usize, letter: &I| match rows.column(letter) {
                Some(column) => rows.successor(s, column),
                None => panic!("Letter {:?} has no column in the transition table", letter),
            }),
            Box::new(move |&s: &usize| table.label(s).clone()),
            inputs,
            outputs,
        )
    }
}
