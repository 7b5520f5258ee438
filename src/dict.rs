//! Explicit graph view of an automaton.
//!
//! A [`DfaDict`] maps every reachable state to its label and its outgoing
//! transitions. It is the exchange format for tooling that wants nodes and
//! edges (the DOT renderer in [`crate::dot`] consumes nothing else), and a
//! convenient way to write small automata by hand:
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use dfa_rs::dict::{dfa_to_dict, dict_to_dfa, DfaDict};
//!
//! let dict: DfaDict<u8, u8, bool> = DfaDict::from([
//!     (0, (false, BTreeMap::from([(0, 0), (1, 1)]))),
//!     (1, (true, BTreeMap::from([(0, 1), (1, 0)]))),
//! ]);
//! let dfa = dict_to_dfa(dict.clone(), 0);
//! assert!(dfa.label([1, 0, 0]).unwrap());
//! assert_eq!(dfa_to_dict(&dfa).unwrap(), (dict, 0));
//! ```

use std::collections::BTreeMap;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::alphabet::{Alphabet, Letter};
use crate::dfa::{Dfa, State};
use crate::error::Result;

/// State → (label, letter → successor).
///
/// States are kept in discovery order; comparison ignores that order.
pub type DfaDict<S, I, O> = IndexMap<S, (O, BTreeMap<I, S>)>;

/// Lists the reachable states of `dfa`, keyed by the states themselves.
pub fn dfa_to_dict<S: State, I: Letter, O: Letter>(dfa: &Dfa<S, I, O>) -> Result<(DfaDict<S, I, O>, S)> {
    let letters = dfa.letters()?;
    let dict = dfa
        .states()?
        .iter()
        .map(|state| {
            let successors = letters
                .iter()
                .map(|letter| (letter.clone(), dfa.step(state, letter)))
                .collect();
            (state.clone(), (dfa.state_label(state), successors))
        })
        .collect();
    Ok((dict, dfa.start().clone()))
}

/// Lists the reachable states of `dfa`, reindexed to `0..N` in discovery order.
///
/// The start state is always `0`.
pub fn dfa_to_indexed_dict<S: State, I: Letter, O: Letter>(
    dfa: &Dfa<S, I, O>,
) -> Result<(DfaDict<usize, I, O>, usize)> {
    let table = dfa.to_table()?;
    let dict = (0..table.num_states())
        .map(|state| {
            let successors = table
                .letters()
                .iter()
                .enumerate()
                .map(|(column, letter)| (letter.clone(), table.successor(state, column)))
                .collect();
            (state, (table.label(state).clone(), successors))
        })
        .collect();
    Ok((dict, 0))
}

/// Builds an automaton from its graph view.
///
/// The input alphabet is the set of letters on any edge and the output
/// alphabet is the set of labels.
///
/// # Panics
///
/// The automaton panics when it reaches a state missing from `dict`, or a
/// state without an edge for a declared letter.
pub fn dict_to_dfa<S: State, I: Letter, O: Letter>(dict: DfaDict<S, I, O>, start: S) -> Dfa<S, I, O> {
    let inputs: Alphabet<I> = dict
        .values()
        .flat_map(|(_, successors)| successors.keys().cloned())
        .collect();
    let outputs: Alphabet<O> = dict.values().map(|(label, _)| label.clone()).collect();

    let dict = Rc::new(dict);
    let edges = Rc::clone(&dict);
    Dfa::builder(
        start,
        move |state: &S, letter: &I| match edges.get(state).and_then(|(_, successors)| successors.get(letter)) {
            Some(next) => next.clone(),
            None => panic!("No transition from {:?} on {:?}", state, letter),
        },
        move |state: &S| match dict.get(state) {
            Some((label, _)) => label.clone(),
            None => panic!("Unknown state {:?}", state),
        },
    )
    .inputs(inputs)
    .outputs(outputs)
    .build()
}
