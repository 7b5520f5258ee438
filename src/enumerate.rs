//! Exhaustive enumeration of small automata.
//!
//! [`enumerate_dfas`] lists every behavior realizable with `n` states for
//! `n = 1, 2, ...`, each exactly once and each through its minimal automaton.
//! Candidates are all transition functions `(state, letter) -> state` with
//! all labelings and start state `0`. A candidate is kept iff it is its own
//! minimization, i.e. every state is reachable, no two states are
//! equivalent and the states are numbered canonically. The number of
//! candidates grows as `n^(n m) k^n` for `m` letters and `k` labels, so only
//! the first few sizes are practical: bound the iterator with
//! [`EnumerateDfas::max_states`] or [`Iterator::take`].
//!
//! ```
//! use dfa_rs::enumerate::enumerate_dfas;
//! use dfa_rs::alphabet::Alphabet;
//!
//! let dfas: Vec<_> = enumerate_dfas([0u8], Alphabet::boolean())
//!     .unwrap()
//!     .max_states(2)
//!     .collect();
//! // Two constant languages, then four two-state ones.
//! assert_eq!(dfas.len(), 6);
//! ```

use log::debug;

use crate::alphabet::{Alphabet, Letter};
use crate::dfa::Dfa;
use crate::error::{DfaError, Result};
use crate::minimize::minimize_table;
use crate::table::Table;

/// Enumerates minimal automata over `inputs` with labels from `outputs`, by
/// increasing number of states.
///
/// Fails with [`DfaError::UnboundedStates`] if either alphabet is infinite.
pub fn enumerate_dfas<I: Letter, O: Letter>(
    inputs: impl Into<Alphabet<I>>,
    outputs: impl Into<Alphabet<O>>,
) -> Result<EnumerateDfas<I, O>> {
    let inputs = inputs.into();
    let outputs = outputs.into();
    let letters = inputs.letters().ok_or(DfaError::UnboundedStates)?;
    let labels = outputs.letters().ok_or(DfaError::UnboundedStates)?;
    Ok(EnumerateDfas {
        inputs,
        outputs,
        letters,
        labels,
        max_states: None,
        cursor: None,
        found: 0,
    })
}

/// Iterator over minimal automata. Created by [`enumerate_dfas()`].
pub struct EnumerateDfas<I: Letter, O: Letter> {
    inputs: Alphabet<I>,
    outputs: Alphabet<O>,
    letters: Vec<I>,
    labels: Vec<O>,
    max_states: Option<usize>,
    cursor: Option<Cursor>,
    /// Number of automata yielded at the current size.
    found: usize,
}

/// Odometer over the candidates of one size.
#[derive(Debug)]
struct Cursor {
    num_states: usize,
    /// Successor digits, row-major by state, each in `0..num_states`.
    successors: Vec<usize>,
    /// Label digits, each an index into the output letters.
    labels: Vec<usize>,
    exhausted: bool,
}

impl Cursor {
    fn new(num_states: usize, num_letters: usize) -> Self {
        Self {
            num_states,
            successors: vec![0; num_states * num_letters],
            labels: vec![0; num_states],
            exhausted: false,
        }
    }

    /// Steps to the next candidate: labels vary fastest.
    fn advance(&mut self, num_labels: usize) {
        if increment(&mut self.labels, num_labels) {
            return;
        }
        if increment(&mut self.successors, self.num_states) {
            return;
        }
        self.exhausted = true;
    }
}

/// Adds one to a little-endian number in base `base`; `false` on wrap-around.
fn increment(digits: &mut [usize], base: usize) -> bool {
    for digit in digits.iter_mut() {
        *digit += 1;
        if *digit < base {
            return true;
        }
        *digit = 0;
    }
    false
}

impl<I: Letter, O: Letter> EnumerateDfas<I, O> {
    /// Stops after the automata with `max_states` states.
    pub fn max_states(mut self, max_states: usize) -> Self {
        self.max_states = Some(max_states);
        self
    }

    /// Whether some minimal automaton has `n` states.
    ///
    /// With at least one letter and two labels there are minimal automata of
    /// every size (counters); otherwise there is only the single-state one.
    fn has_size(&self, n: usize) -> bool {
        match n {
            0 => false,
            1 => !self.labels.is_empty(),
            _ => !self.letters.is_empty() && self.labels.len() >= 2,
        }
    }

    fn candidate(&self, cursor: &Cursor) -> Table<I, O> {
        let m = self.letters.len();
        let labels = cursor.labels.iter().map(|&k| self.labels[k].clone()).collect();
        let successors = (0..cursor.num_states)
            .map(|s| cursor.successors[s * m..(s + 1) * m].to_vec())
            .collect();
        Table::new(self.letters.clone(), labels, successors)
    }
}

impl<I: Letter, O: Letter> Iterator for EnumerateDfas<I, O> {
    type Item = Dfa<usize, I, O>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut cursor = match self.cursor.take() {
                Some(cursor) if !cursor.exhausted => cursor,
                previous => {
                    let n = match &previous {
                        None => 1,
                        Some(c) => {
                            debug!("enumerate: {} minimal automata with {} states", self.found, c.num_states);
                            c.num_states + 1
                        }
                    };
                    if self.max_states.is_some_and(|max| n > max) || !self.has_size(n) {
                        self.cursor = previous;
                        self.found = 0;
                        return None;
                    }
                    self.found = 0;
                    self.cursor = Some(Cursor::new(n, self.letters.len()));
                    continue;
                }
            };

            let table = self.candidate(&cursor);
            cursor.advance(self.labels.len());
            self.cursor = Some(cursor);

            // Cheap filter first: unreachable states or non-canonical numbering.
            if table.canonicalize(0) != table {
                continue;
            }
            if minimize_table(&table, 0) != table {
                continue;
            }
            self.found += 1;
            return Some(table.into_dfa(0, self.inputs.clone(), self.outputs.clone()));
        }
    }
}
