//! Minimization by partition refinement (Hopcroft's algorithm).
//!
//! States are first grouped by label. Then, repeatedly, a splitter block `C`
//! is taken from the worklist and, for every letter `a`, each block is cut
//! into the states that reach `C` on `a` and the states that do not. When a
//! block that is not waiting in the worklist gets cut, only the smaller half
//! is queued, which bounds the work by `O(n m log n)` for `n` states and `m`
//! letters.
//!
//! The stable partition is the language-equivalence relation: the quotient
//! automaton has one state per block and is returned in canonical numbering
//! (see [`Table::canonicalize`]), so minimal automata can be compared and
//! encoded directly.

use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::alphabet::Letter;
use crate::dfa::{Dfa, State};
use crate::error::Result;
use crate::table::Table;

/// Mutable partition of `0..n` into blocks.
struct Partition {
    blocks: Vec<Vec<usize>>,
    block_of: Vec<usize>,
}

impl Partition {
    /// Groups states by label, in order of first appearance.
    fn by_label<O: Letter>(labels: &[O]) -> Self {
        let mut index = HashMap::new();
        let mut blocks: Vec<Vec<usize>> = Vec::new();
        let mut block_of = Vec::with_capacity(labels.len());
        for (state, label) in labels.iter().enumerate() {
            let block = *index.entry(label).or_insert_with(|| {
                blocks.push(Vec::new());
                blocks.len() - 1
            });
            blocks[block].push(state);
            block_of.push(block);
        }
        Self { blocks, block_of }
    }

    fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Moves `states` (all members of `block`) into a fresh block and returns its index.
    fn split_off(&mut self, block: usize, states: &[usize], marked: &[bool]) -> usize {
        let new = self.blocks.len();
        self.blocks[block].retain(|&s| !marked[s]);
        for &s in states {
            self.block_of[s] = new;
        }
        self.blocks.push(states.to_vec());
        new
    }
}

/// Minimizes a table and returns the quotient in canonical numbering.
///
/// Only states reachable from `start` take part; the result starts in state `0`.
pub fn minimize_table<I: Letter, O: Letter>(table: &Table<I, O>, start: usize) -> Table<I, O> {
    let table = table.canonicalize(start);
    let n = table.num_states();
    let m = table.letters().len();

    // predecessors[a][t] = states moving to `t` on letter `a`.
    let mut predecessors = vec![vec![Vec::new(); n]; m];
    for s in 0..n {
        for (a, column) in predecessors.iter_mut().enumerate() {
            column[table.successor(s, a)].push(s);
        }
    }

    let mut partition = Partition::by_label(table.labels());
    let mut worklist: Vec<usize> = (0..partition.len()).collect();
    let mut waiting = vec![true; partition.len()];
    let mut marked = vec![false; n];

    while let Some(splitter) = worklist.pop() {
        waiting[splitter] = false;
        let splitter_states = partition.blocks[splitter].clone();

        for column in &predecessors {
            // X = states whose successor on this letter lies in the splitter.
            let mut touched: HashMap<usize, Vec<usize>> = HashMap::new();
            let mut x = Vec::new();
            for &t in &splitter_states {
                for &s in &column[t] {
                    if !marked[s] {
                        marked[s] = true;
                        x.push(s);
                        touched.entry(partition.block_of[s]).or_default().push(s);
                    }
                }
            }

            let mut candidates: Vec<_> = touched.into_iter().collect();
            candidates.sort_unstable_by_key(|&(block, _)| block);
            for (block, inside) in candidates {
                let size = partition.blocks[block].len();
                if inside.len() == size {
                    continue;
                }
                let outside = size - inside.len();
                let new = partition.split_off(block, &inside, &marked);
                waiting.push(false);
                if waiting[block] {
                    waiting[new] = true;
                    worklist.push(new);
                } else if inside.len() <= outside {
                    waiting[new] = true;
                    worklist.push(new);
                } else {
                    waiting[block] = true;
                    worklist.push(block);
                }
                debug!(
                    "minimize: split block {} into {} + {} states",
                    block,
                    outside,
                    inside.len()
                );
            }

            for s in x {
                marked[s] = false;
            }
        }
    }

    debug!("minimize: {} states collapse into {} blocks", n, partition.len());

    let labels = partition
        .blocks
        .iter()
        .map(|members| table.label(members[0]).clone())
        .collect();
    let successors = partition
        .blocks
        .iter()
        .map(|members| {
            (0..m)
                .map(|a| partition.block_of[table.successor(members[0], a)])
                .collect()
        })
        .collect();
    Table::new(table.letters().to_vec(), labels, successors).canonicalize(partition.block_of[0])
}

impl<S: State, I: Letter, O: Letter> Dfa<S, I, O> {
    /// Minimal table of the reachable part, in canonical numbering. Computed once.
    pub(crate) fn minimal_table(&self) -> Result<Rc<Table<I, O>>> {
        if let Some(table) = self.canonical_cell().get() {
            return Ok(Rc::clone(table));
        }
        let table = Rc::new(minimize_table(&self.to_table()?, 0));
        Ok(Rc::clone(self.canonical_cell().get_or_init(|| table)))
    }

    /// Returns the language-equivalent automaton with the fewest states.
    ///
    /// States of the result are `0..N` in canonical order, with `0` the start
    /// state. Alphabets are kept as declared.
    ///
    /// ```
    /// use dfa_rs::dfa::Dfa;
    ///
    /// // Counts modulo 6 but only cares about parity.
    /// let dfa = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 6, |s: &u8| s % 2 == 0)
    ///     .inputs([0, 1])
    ///     .build();
    /// let minimal = dfa.minimize().unwrap();
    /// assert_eq!(minimal.states().unwrap().len(), 2);
    /// assert_eq!(minimal, dfa);
    /// ```
    pub fn minimize(&self) -> Result<Dfa<usize, I, O>> {
        let table = self.minimal_table()?;
        Ok(Table::clone(&table).into_dfa(0, self.inputs().clone(), self.outputs().clone()))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::alphabet::Alphabet;

    #[test]
    fn test_minimize_table() {
        // States 1 and 2 both accept and loop among each other.
        let table = Table::new(
            vec!['a', 'b'],
            vec![false, true, true],
            vec![vec![1, 2], vec![2, 1], vec![1, 2]],
        );
        let minimal = minimize_table(&table, 0);
        assert_eq!(minimal.num_states(), 2);
        assert_eq!(minimal.labels(), &[false, true]);
        assert_eq!(minimal.successor(0, 0), 1);
        assert_eq!(minimal.successor(1, 0), 1);
        assert_eq!(minimal.successor(1, 1), 1);
    }

    #[test]
    fn test_already_minimal() {
        let dfa = Dfa::builder(0u32, |s: &u32, c: &u32| (s + c) % 4, |s: &u32| *s == 3)
            .inputs([0, 1])
            .build();
        let minimal = dfa.minimize().unwrap();
        assert_eq!(minimal.states().unwrap().len(), 4);
        assert_eq!(minimal.minimize().unwrap().states().unwrap().len(), 4);
    }

    #[test]
    fn test_constant_machine() {
        let dfa = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 7, |_: &u8| true)
            .inputs([0, 1, 2])
            .build();
        let minimal = dfa.minimize().unwrap();
        assert_eq!(minimal.states().unwrap().len(), 1);
        assert!(minimal.label([2, 2, 1]).unwrap());
    }

    #[test]
    fn test_distinguishable_by_suffix() {
        // Labels are equal everywhere except state 3; the chain 0 -> 1 -> 2 -> 3
        // must stay split all the way.
        let table = Table::new(
            vec![0u8],
            vec!['x', 'x', 'x', 'y'],
            vec![vec![1], vec![2], vec![3], vec![3]],
        );
        assert_eq!(minimize_table(&table, 0).num_states(), 4);
        assert_eq!(minimize_table(&table, 2).num_states(), 2);
    }

    #[test]
    fn test_moore_outputs() {
        let dfa = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 6, |s: &u8| s % 3)
            .inputs([1])
            .outputs([0, 1, 2])
            .build();
        let minimal = dfa.minimize().unwrap();
        assert_eq!(minimal.states().unwrap().len(), 3);
        assert_eq!(minimal.transduce([1; 5]).unwrap(), vec![0, 1, 2, 0, 1]);
        assert_eq!(*minimal.outputs(), Alphabet::from([0, 1, 2]));
    }

    #[test]
    fn test_unbounded() {
        let dfa = Dfa::new(0u8, |s: &u8, c: &u8| s ^ c, |s: &u8| *s == 0);
        assert!(dfa.minimize().is_err());
    }
}
