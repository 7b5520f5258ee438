//! The automaton value.
//!
//! A [`Dfa`] is a Moore machine given by a start state, a transition function
//! and a labeling function, together with its input and output alphabets.
//! States are never listed up front: they are whatever values the transition
//! function produces, and they are discovered by reachability on demand.
//!
//! Both functions are memoized, so each distinct `(state, letter)` pair and
//! each distinct state is evaluated at most once per automaton. A `Dfa` is an
//! immutable, cheaply clonable handle; compositions keep handles to their
//! operands and evaluate them lazily.
//!
//! # Examples
//!
//! ```
//! use dfa_rs::dfa::Dfa;
//!
//! // Counts 1s modulo 4 and accepts when the count is 3.
//! let dfa = Dfa::builder(0u32, |s: &u32, c: &u32| (s + c) % 4, |s: &u32| *s == 3)
//!     .inputs([0, 1])
//!     .build();
//!
//! assert!(dfa.label([1, 0, 1, 1]).unwrap());
//! assert_eq!(dfa.transduce([1, 1, 1, 1]).unwrap(), vec![false, false, false, true]);
//! assert_eq!(dfa.states().unwrap().len(), 4);
//! ```

use std::cell::OnceCell;
use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexSet;
use log::debug;
use num_bigint::BigUint;

use crate::alphabet::{Alphabet, Letter};
use crate::error::{DfaError, Result};
use crate::memo::Memo;
use crate::table::Table;

/// A value usable as an automaton state.
pub trait State: Clone + Eq + Hash + Debug + 'static {}

impl<T: Clone + Eq + Hash + Debug + 'static> State for T {}

pub(crate) type TransitionFn<S, I> = Box<dyn Fn(&S, &I) -> S>;
pub(crate) type LabelFn<S, O> = Box<dyn Fn(&S) -> O>;

/// Deterministic finite automaton with outputs (Moore machine).
///
/// `O = bool` gives the classic acceptor. Equality and hashing are semantic
/// (see [`crate::canonical`]): two automata are equal when they produce the
/// same output on every word.
pub struct Dfa<S, I: Letter, O: Letter = bool> {
    inner: Rc<Inner<S, I, O>>,
}

struct Inner<S, I: Letter, O: Letter> {
    start: S,
    transition: TransitionFn<S, I>,
    label: LabelFn<S, O>,
    transitions: Memo<(S, I), S>,
    labels: Memo<S, O>,
    inputs: Alphabet<I>,
    outputs: Alphabet<O>,
    states: OnceCell<IndexSet<S>>,
    canonical: OnceCell<Rc<Table<I, O>>>,
    encoding: OnceCell<BigUint>,
}

impl<S, I: Letter, O: Letter> Clone for Dfa<S, I, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: Debug, I: Letter, O: Letter> Debug for Dfa<S, I, O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dfa")
            .field("start", &self.inner.start)
            .field("inputs", &format_args!("{}", self.inner.inputs))
            .field("outputs", &format_args!("{}", self.inner.outputs))
            .finish()
    }
}

/// Builder for [`Dfa`], used to declare alphabets.
pub struct DfaBuilder<S, I: Letter, O: Letter> {
    start: S,
    transition: TransitionFn<S, I>,
    label: LabelFn<S, O>,
    inputs: Alphabet<I>,
    outputs: Alphabet<O>,
}

impl<S: State, I: Letter, O: Letter> DfaBuilder<S, I, O> {
    /// Input alphabet (default: universal).
    pub fn inputs(mut self, inputs: impl Into<Alphabet<I>>) -> Self {
        self.inputs = inputs.into();
        self
    }

    /// Output alphabet (default: `{false, true}` for `bool`, universal otherwise).
    pub fn outputs(mut self, outputs: impl Into<Alphabet<O>>) -> Self {
        self.outputs = outputs.into();
        self
    }

    pub fn build(self) -> Dfa<S, I, O> {
        Dfa::from_parts(self.start, self.transition, self.label, self.inputs, self.outputs)
    }
}

impl<S: State, I: Letter, O: Letter> Dfa<S, I, O> {
    /// Creates an automaton over the universal input alphabet.
    pub fn new(
        start: S,
        transition: impl Fn(&S, &I) -> S + 'static,
        label: impl Fn(&S) -> O + 'static,
    ) -> Self {
        Self::builder(start, transition, label).build()
    }

    pub fn builder(
        start: S,
        transition: impl Fn(&S, &I) -> S + 'static,
        label: impl Fn(&S) -> O + 'static,
    ) -> DfaBuilder<S, I, O> {
        DfaBuilder {
            start,
            transition: Box::new(transition),
            label: Box::new(label),
            inputs: Alphabet::Universal,
            outputs: O::default_outputs(),
        }
    }

    pub(crate) fn from_parts(
        start: S,
        transition: TransitionFn<S, I>,
        label: LabelFn<S, O>,
        inputs: Alphabet<I>,
        outputs: Alphabet<O>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                start,
                transition,
                label,
                transitions: Memo::new(),
                labels: Memo::new(),
                inputs,
                outputs,
                states: OnceCell::new(),
                canonical: OnceCell::new(),
                encoding: OnceCell::new(),
            }),
        }
    }

    pub fn start(&self) -> &S {
        &self.inner.start
    }

    pub fn inputs(&self) -> &Alphabet<I> {
        &self.inner.inputs
    }

    pub fn outputs(&self) -> &Alphabet<O> {
        &self.inner.outputs
    }

    /// Memo table of the transition function.
    pub fn transition_cache(&self) -> &Memo<(S, I), S> {
        &self.inner.transitions
    }

    /// Memo table of the labeling function.
    pub fn label_cache(&self) -> &Memo<S, O> {
        &self.inner.labels
    }

    /// Returns `true` if both handles refer to the same automaton value.
    pub fn ptr_eq<S2, O2: Letter>(&self, other: &Dfa<S2, I, O2>) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner))
    }

    /// Address of the shared value; stable for the lifetime of the handle.
    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }

    pub(crate) fn canonical_cell(&self) -> &OnceCell<Rc<Table<I, O>>> {
        &self.inner.canonical
    }

    pub(crate) fn encoding_cell(&self) -> &OnceCell<BigUint> {
        &self.inner.encoding
    }

    /// One step of the transition function, without alphabet checks.
    pub fn step(&self, state: &S, letter: &I) -> S {
        let inner = &self.inner;
        inner
            .transitions
            .get_or_insert_with((state.clone(), letter.clone()), |(s, a)| (inner.transition)(s, a))
    }

    /// Label of a state, without output checks.
    pub fn state_label(&self, state: &S) -> O {
        let inner = &self.inner;
        inner.labels.get_or_insert_with(state.clone(), |s| (inner.label)(s))
    }

    pub(crate) fn check_letter(&self, letter: &I) -> Result<()> {
        if self.inner.inputs.contains(letter) {
            Ok(())
        } else {
            Err(DfaError::AlphabetViolation {
                letter: format!("{:?}", letter),
                alphabet: self.inner.inputs.to_string(),
            })
        }
    }

    pub(crate) fn checked_label(&self, state: &S) -> Result<O> {
        let label = self.state_label(state);
        if self.inner.outputs.contains(&label) {
            Ok(label)
        } else {
            Err(DfaError::OutputViolation {
                label: format!("{:?}", label),
                alphabet: self.inner.outputs.to_string(),
            })
        }
    }

    /// Input letters in ascending order; fails on infinite alphabets.
    pub(crate) fn letters(&self) -> Result<Vec<I>> {
        self.inner.inputs.letters().ok_or(DfaError::UnboundedStates)
    }

    /// Starts a stepwise simulation in the start state.
    pub fn run(&self) -> Runner<'_, S, I, O> {
        self.run_from(self.inner.start.clone())
    }

    pub fn run_from(&self, start: S) -> Runner<'_, S, I, O> {
        Runner { dfa: self, state: start }
    }

    /// States visited while reading `word`, including the start state.
    pub fn trace<W>(&self, word: W) -> Trace<'_, S, I, O, W::IntoIter>
    where
        W: IntoIterator<Item = I>,
    {
        self.trace_from(self.inner.start.clone(), word)
    }

    pub fn trace_from<W>(&self, start: S, word: W) -> Trace<'_, S, I, O, W::IntoIter>
    where
        W: IntoIterator<Item = I>,
    {
        Trace {
            runner: self.run_from(start),
            word: word.into_iter(),
            started: false,
            done: false,
        }
    }

    /// The state reached after reading `word`.
    pub fn transition(&self, word: impl IntoIterator<Item = I>) -> Result<S> {
        self.transition_from(self.inner.start.clone(), word)
    }

    pub fn transition_from(&self, start: S, word: impl IntoIterator<Item = I>) -> Result<S> {
        let mut runner = self.run_from(start);
        for letter in word {
            runner.advance(&letter)?;
        }
        Ok(runner.into_state())
    }

    /// The label of the state reached after reading `word`.
    pub fn label(&self, word: impl IntoIterator<Item = I>) -> Result<O> {
        self.label_from(self.inner.start.clone(), word)
    }

    pub fn label_from(&self, start: S, word: impl IntoIterator<Item = I>) -> Result<O> {
        let state = self.transition_from(start, word)?;
        self.checked_label(&state)
    }

    /// Labels of every visited state except the last one.
    ///
    /// The result has exactly one label per letter of `word`.
    pub fn transduce(&self, word: impl IntoIterator<Item = I>) -> Result<Vec<O>> {
        self.transduce_from(self.inner.start.clone(), word)
    }

    pub fn transduce_from(&self, start: S, word: impl IntoIterator<Item = I>) -> Result<Vec<O>> {
        let mut runner = self.run_from(start);
        let mut labels = Vec::new();
        for letter in word {
            labels.push(self.checked_label(runner.current())?);
            runner.advance(&letter)?;
        }
        Ok(labels)
    }

    /// Depth-first exploration of the reachable states.
    ///
    /// Yields every reachable state once, in discovery order, together with
    /// the word that first reached it. Letters are explored in ascending
    /// order, so the order is deterministic. The access words are not
    /// necessarily shortest; see [`crate::search::find_word`] for that.
    pub fn walk(&self) -> Result<Walk<'_, S, I, O>> {
        let letters = self.letters()?;
        Ok(Walk {
            dfa: self,
            letters,
            stack: vec![(self.inner.start.clone(), Vec::new())],
            visited: HashSet::new(),
        })
    }

    /// The reachable states, in [`walk`](Dfa::walk) order. Computed once.
    pub fn states(&self) -> Result<&IndexSet<S>> {
        if let Some(states) = self.inner.states.get() {
            return Ok(states);
        }
        let states: IndexSet<S> = self.walk()?.map(|(state, _)| state).collect();
        debug!("states: discovered {} reachable states", states.len());
        Ok(self.inner.states.get_or_init(|| states))
    }

    /// Materializes the reachable part as a table, numbered in walk order.
    pub(crate) fn to_table(&self) -> Result<Table<I, O>> {
        let letters = self.letters()?;
        let states = self.states()?;
        let mut labels = Vec::with_capacity(states.len());
        let mut successors = Vec::with_capacity(states.len());
        for state in states {
            labels.push(self.state_label(state));
            let row = letters
                .iter()
                .map(|letter| {
                    let next = self.step(state, letter);
                    states
                        .get_index_of(&next)
                        .expect("reachable states are closed under transitions")
                })
                .collect();
            successors.push(row);
        }
        Ok(Table::new(letters, labels, successors))
    }

    /// Re-expresses the automaton over states `0..N` in walk order.
    ///
    /// The result is backed by explicit tables, so it no longer depends on
    /// the original state type or closures.
    pub fn normalize(&self) -> Result<Dfa<usize, I, O>> {
        let table = self.to_table()?;
        Ok(table.into_dfa(0, self.inner.inputs.clone(), self.inner.outputs.clone()))
    }
}

/// Stepwise simulation of an automaton.
///
/// The caller owns the cursor and drives it one letter at a time.
pub struct Runner<'a, S, I: Letter, O: Letter> {
    dfa: &'a Dfa<S, I, O>,
    state: S,
}

impl<S: State, I: Letter, O: Letter> Runner<'_, S, I, O> {
    pub fn current(&self) -> &S {
        &self.state
    }

    pub fn current_label(&self) -> Result<O> {
        self.dfa.checked_label(&self.state)
    }

    /// Reads one letter and returns the new state.
    pub fn advance(&mut self, letter: &I) -> Result<&S> {
        self.dfa.check_letter(letter)?;
        self.state = self.dfa.step(&self.state, letter);
        Ok(&self.state)
    }

    pub fn into_state(self) -> S {
        self.state
    }
}

/// Lazy sequence of states visited while reading a word.
///
/// Yields `len(word) + 1` states. A letter outside the input alphabet yields
/// an error, after which the iterator is exhausted.
pub struct Trace<'a, S, I: Letter, O: Letter, W> {
    runner: Runner<'a, S, I, O>,
    word: W,
    started: bool,
    done: bool,
}

impl<S: State, I: Letter, O: Letter, W: Iterator<Item = I>> Iterator for Trace<'_, S, I, O, W> {
    type Item = Result<S>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(Ok(self.runner.current().clone()));
        }
        let letter = self.word.next()?;
        match self.runner.advance(&letter) {
            Ok(state) => Some(Ok(state.clone())),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Iterator over reachable states and their access words.
///
/// Created by [`Dfa::walk()`].
pub struct Walk<'a, S, I: Letter, O: Letter> {
    dfa: &'a Dfa<S, I, O>,
    letters: Vec<I>,
    stack: Vec<(S, Vec<I>)>,
    visited: HashSet<S>,
}

impl<S: State, I: Letter, O: Letter> Iterator for Walk<'_, S, I, O> {
    type Item = (S, Vec<I>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (state, word) = self.stack.pop()?;
            if !self.visited.insert(state.clone()) {
                continue;
            }
            // Push in reverse so that the smallest letter is explored first.
            for letter in self.letters.iter().rev() {
                let next = self.dfa.step(&state, letter);
                if !self.visited.contains(&next) {
                    let mut next_word = word.clone();
                    next_word.push(letter.clone());
                    self.stack.push((next, next_word));
                }
            }
            return Some((state, word));
        }
    }
}
