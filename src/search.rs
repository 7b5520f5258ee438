//! Searching automata for words.
//!
//! - [`paths`]: every word leading from one state to another, shortest first.
//! - [`words`]: every accepted word, interleaving the accepting states fairly.
//! - [`find_word`]: one shortest accepted word.
//! - [`find_equiv_counterexample`], [`find_subset_counterexample`]: decide
//!   equivalence and inclusion of languages, with a witness when they fail.
//! - [`min_distance_to_accept_by_state`]: how far each state is from acceptance.
//!
//! # Examples
//!
//! ```
//! use dfa_rs::dfa::Dfa;
//! use dfa_rs::search::{find_subset_counterexample, find_word};
//!
//! let mod_4 = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 4, |s: &u8| *s == 3)
//!     .inputs([0, 1])
//!     .build();
//! let odd = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 2, |s: &u8| *s == 1)
//!     .inputs([0, 1])
//!     .build();
//!
//! assert_eq!(find_word(&mod_4).unwrap(), Some(vec![1, 1, 1]));
//! assert_eq!(find_subset_counterexample(&mod_4, &odd).unwrap(), None);
//! assert_eq!(find_subset_counterexample(&odd, &mod_4).unwrap(), Some(vec![1]));
//! ```

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::alphabet::Letter;
use crate::dfa::{Dfa, State};
use crate::error::Result;

/// Enumerates the words leading from `start` to `end`, or every word when
/// `end` is `None`.
///
/// Words come out by increasing length (iterative deepening); words of equal
/// length come out in lexicographic order unless [randomized](Paths::randomize).
/// Branches that can no longer reach `end` are pruned and the search stops
/// once no branch survives, so the iterator is finite whenever the set of
/// matching words is. Use [`Paths::max_length`] to bound it otherwise.
///
/// Fails with [`DfaError::UnboundedStates`] over an infinite input alphabet.
///
/// [`DfaError::UnboundedStates`]: crate::error::DfaError::UnboundedStates
pub fn paths<S: State, I: Letter, O: Letter>(
    dfa: &Dfa<S, I, O>,
    start: S,
    end: Option<S>,
) -> Result<Paths<'_, S, I, O>> {
    let letters = dfa.letters()?;
    let alive = end.as_ref().map(|end| co_reachable(dfa, &start, end, &letters));
    let reachable = alive.as_ref().map_or(true, |alive| alive.contains(&start));
    Ok(Paths {
        dfa,
        letters,
        stack: if reachable {
            vec![StackFrame::root(start.clone())]
        } else {
            Vec::new()
        },
        root: start,
        end,
        alive,
        max_length: None,
        rng: None,
        depth: 0,
        frontier: false,
        done: !reachable,
    })
}

/// States reachable from `start` that can reach `end`.
fn co_reachable<S: State, I: Letter, O: Letter>(dfa: &Dfa<S, I, O>, start: &S, end: &S, letters: &[I]) -> HashSet<S> {
    let mut predecessors: HashMap<S, Vec<S>> = HashMap::new();
    let mut seen = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);
    while let Some(state) = queue.pop_front() {
        for letter in letters {
            let next = dfa.step(&state, letter);
            predecessors.entry(next.clone()).or_default().push(state.clone());
            if seen.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }

    let mut alive = HashSet::new();
    if !seen.contains(end) {
        return alive;
    }
    alive.insert(end.clone());
    let mut queue = VecDeque::from([end.clone()]);
    while let Some(state) = queue.pop_front() {
        for prev in predecessors.get(&state).into_iter().flatten() {
            if alive.insert(prev.clone()) {
                queue.push_back(prev.clone());
            }
        }
    }
    alive
}

/// Frame on the exploration stack.
#[derive(Debug)]
struct StackFrame<S, I> {
    state: S,
    /// Word leading from the root to `state`.
    word: Vec<I>,
}

impl<S, I> StackFrame<S, I> {
    fn root(state: S) -> Self {
        Self { state, word: Vec::new() }
    }
}

/// Iterator over words between two states.
///
/// Created by [`paths()`]. Each round of the iterative deepening walks the
/// tree of words depth-first with an explicit stack and yields the matching
/// words at the depth of the round.
pub struct Paths<'a, S, I: Letter, O: Letter> {
    dfa: &'a Dfa<S, I, O>,
    letters: Vec<I>,
    root: S,
    end: Option<S>,
    /// States that can still reach `end`; `None` when every state matches.
    alive: Option<HashSet<S>>,
    max_length: Option<usize>,
    rng: Option<ChaCha8Rng>,
    /// Word length produced by the current round.
    depth: usize,
    stack: Vec<StackFrame<S, I>>,
    /// Whether the current round reached its depth at all.
    frontier: bool,
    done: bool,
}

impl<S: State, I: Letter, O: Letter> Paths<'_, S, I, O> {
    /// Stops after the words of length `max_length`.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Explores the letters of every branch in a random order drawn from `seed`.
    pub fn randomize(mut self, seed: u64) -> Self {
        self.rng = Some(ChaCha8Rng::seed_from_u64(seed));
        self
    }

    fn is_alive(&self, state: &S) -> bool {
        self.alive.as_ref().map_or(true, |alive| alive.contains(state))
    }
}

impl<S: State, I: Letter, O: Letter> Iterator for Paths<'_, S, I, O> {
    type Item = Vec<I>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            let Some(frame) = self.stack.pop() else {
                // Round over: go one level deeper, unless nothing got this far.
                if !self.frontier || self.max_length.is_some_and(|max| self.depth >= max) {
                    debug!("paths: exhausted after depth {}", self.depth);
                    self.done = true;
                    return None;
                }
                self.depth += 1;
                self.frontier = false;
                self.stack.push(StackFrame::root(self.root.clone()));
                continue;
            };

            if frame.word.len() == self.depth {
                self.frontier = true;
                if self.end.as_ref().map_or(true, |end| *end == frame.state) {
                    return Some(frame.word);
                }
                continue;
            }

            let mut children: Vec<StackFrame<S, I>> = Vec::with_capacity(self.letters.len());
            for letter in &self.letters {
                let state = self.dfa.step(&frame.state, letter);
                if self.is_alive(&state) {
                    let mut word = frame.word.clone();
                    word.push(letter.clone());
                    children.push(StackFrame { state, word });
                }
            }
            if let Some(rng) = &mut self.rng {
                children.shuffle(rng);
            }
            // Reverse, so that the first child is explored first.
            self.stack.extend(children.into_iter().rev());
        }
    }
}

/// Enumerates the accepted words.
///
/// Every accepting state gets its own [`paths`] iterator and the iterators
/// take turns, so a state with infinitely many access words does not starve
/// the others.
pub fn words<S: State, I: Letter>(dfa: &Dfa<S, I, bool>) -> Result<Words<'_, S, I>> {
    let mut sources = VecDeque::new();
    for state in dfa.states()? {
        if dfa.state_label(state) {
            sources.push_back(paths(dfa, dfa.start().clone(), Some(state.clone()))?);
        }
    }
    debug!("words: {} accepting states", sources.len());
    Ok(Words { sources })
}

/// Round-robin iterator over accepted words. Created by [`words()`].
pub struct Words<'a, S, I: Letter> {
    sources: VecDeque<Paths<'a, S, I, bool>>,
}

impl<S: State, I: Letter> Iterator for Words<'_, S, I> {
    type Item = Vec<I>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mut source) = self.sources.pop_front() {
            if let Some(word) = source.next() {
                self.sources.push_back(source);
                return Some(word);
            }
        }
        None
    }
}

/// Returns a shortest accepted word, or `None` if the language is empty.
///
/// Among the shortest words, the lexicographically smallest one is returned.
pub fn find_word<S: State, I: Letter>(dfa: &Dfa<S, I, bool>) -> Result<Option<Vec<I>>> {
    let letters = dfa.letters()?;
    let start = dfa.start().clone();
    let mut parent: HashMap<S, Option<(S, I)>> = HashMap::from([(start.clone(), None)]);
    let mut queue = VecDeque::from([start]);

    while let Some(state) = queue.pop_front() {
        if dfa.state_label(&state) {
            let mut word = Vec::new();
            let mut current = state;
            while let Some(Some((prev, letter))) = parent.get(&current) {
                word.push(letter.clone());
                current = prev.clone();
            }
            word.reverse();
            return Ok(Some(word));
        }
        for letter in &letters {
            let next = dfa.step(&state, letter);
            if !parent.contains_key(&next) {
                parent.insert(next.clone(), Some((state.clone(), letter.clone())));
                queue.push_back(next);
            }
        }
    }
    Ok(None)
}

/// Returns `None` if both acceptors accept the same language, otherwise a
/// shortest word accepted by exactly one of them.
pub fn find_equiv_counterexample<S: State, S2: State, I: Letter>(
    a: &Dfa<S, I, bool>,
    b: &Dfa<S2, I, bool>,
) -> Result<Option<Vec<I>>> {
    find_word(&a.xor(b)?)
}

/// Returns `None` if every word accepted by `smaller` is accepted by
/// `bigger`, otherwise a shortest word accepted by `smaller` only.
pub fn find_subset_counterexample<S: State, S2: State, I: Letter>(
    smaller: &Dfa<S, I, bool>,
    bigger: &Dfa<S2, I, bool>,
) -> Result<Option<Vec<I>>> {
    find_word(&bigger.complement()?.and(smaller)?)
}

/// Length of a shortest word leading from each reachable state to an
/// accepting one; `None` when no accepting state is reachable from it.
///
/// Computed by breadth-first search over reversed transitions, starting from
/// all accepting states at once.
pub fn min_distance_to_accept_by_state<S: State, I: Letter>(
    dfa: &Dfa<S, I, bool>,
) -> Result<IndexMap<S, Option<usize>>> {
    let letters = dfa.letters()?;
    let states = dfa.states()?;

    let mut predecessors = vec![Vec::new(); states.len()];
    for (i, state) in states.iter().enumerate() {
        for letter in &letters {
            if let Some(j) = states.get_index_of(&dfa.step(state, letter)) {
                predecessors[j].push(i);
            }
        }
    }

    let mut distances: Vec<Option<usize>> = vec![None; states.len()];
    let mut queue = VecDeque::new();
    for (i, state) in states.iter().enumerate() {
        if dfa.state_label(state) {
            distances[i] = Some(0);
            queue.push_back(i);
        }
    }
    while let Some(j) = queue.pop_front() {
        let next = distances[j].map(|d| d + 1);
        for &i in &predecessors[j] {
            if distances[i].is_none() {
                distances[i] = next;
                queue.push_back(i);
            }
        }
    }

    Ok(states.iter().cloned().zip(distances).collect())
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::error::DfaError;

    fn mod4() -> Dfa<u8, u8> {
        Dfa::builder(0, |s: &u8, c: &u8| (s + c) % 4, |s: &u8| *s == 3)
            .inputs([0, 1])
            .build()
    }

    fn odd() -> Dfa<u8, u8> {
        Dfa::builder(0, |s: &u8, c: &u8| (s + c) % 2, |s: &u8| *s == 1)
            .inputs([0, 1])
            .build()
    }

    /// Moves one step forward on every letter until the sink 4.
    fn chain() -> Dfa<u8, u8> {
        Dfa::builder(0, |s: &u8, _: &u8| (s + 1).min(4), |s: &u8| *s == 2)
            .inputs([0, 1])
            .build()
    }

    #[test]
    fn test_paths_by_length() {
        let dfa = mod4();
        let words: Vec<_> = paths(&dfa, 0, Some(3)).unwrap().max_length(4).collect();
        assert_eq!(
            words,
            vec![vec![1, 1, 1], vec![0, 1, 1, 1], vec![1, 0, 1, 1], vec![1, 1, 0, 1], vec![1, 1, 1, 0]]
        );
        for word in words {
            assert_eq!(dfa.transition(word).unwrap(), 3);
        }
    }

    #[test]
    fn test_paths_all_words() {
        let dfa = mod4();
        let words: Vec<_> = paths(&dfa, 0, None).unwrap().max_length(2).collect();
        assert_eq!(words.len(), 1 + 2 + 4);
        assert_eq!(words[0], Vec::<u8>::new());
        assert_eq!(words[3], vec![0, 0]);
    }

    #[test]
    fn test_paths_finite() {
        let dfa = chain();
        // No bound is needed: the search stops once no branch can reach state 2.
        let words: Vec<_> = paths(&dfa, 0, Some(2)).unwrap().collect();
        assert_eq!(words, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);

        let words: Vec<_> = paths(&dfa, 3, Some(1)).unwrap().collect();
        assert!(words.is_empty());
    }

    #[test]
    fn test_paths_randomized() {
        let dfa = mod4();
        let plain: Vec<_> = paths(&dfa, 0, Some(3)).unwrap().max_length(5).collect();
        let shuffled: Vec<_> = paths(&dfa, 0, Some(3)).unwrap().max_length(5).randomize(42).collect();
        let again: Vec<_> = paths(&dfa, 0, Some(3)).unwrap().max_length(5).randomize(42).collect();
        assert_eq!(shuffled, again);

        let mut sorted = shuffled.clone();
        sorted.sort_by_key(|word| (word.len(), word.clone()));
        assert_eq!(sorted, plain);
        // Still shortest first.
        assert!(shuffled.windows(2).all(|w| w[0].len() <= w[1].len()));
    }

    #[test]
    fn test_paths_unbounded() {
        let dfa = Dfa::new(0u8, |s: &u8, c: &u8| s ^ c, |s: &u8| *s == 1);
        assert!(matches!(paths(&dfa, 0, None), Err(DfaError::UnboundedStates)));
    }

    #[test]
    fn test_words_round_robin() {
        // 0 -a-> 1 and 0 -b-> 2; both 1 and 2 accept and loop forever.
        let dfa = Dfa::builder(
            0u8,
            |s: &u8, c: &char| match (s, c) {
                (0, 'a') => 1,
                (0, _) => 2,
                (s, _) => *s,
            },
            |s: &u8| *s != 0,
        )
        .inputs(['a', 'b'])
        .build();

        let words: Vec<String> = words(&dfa).unwrap().take(6).map(|w| w.into_iter().collect()).collect();
        assert_eq!(words, vec!["a", "b", "aa", "ba", "ab", "bb"]);
    }

    #[test]
    fn test_words_empty_language() {
        let dfa = Dfa::builder(0u8, |s: &u8, _: &u8| *s, |_: &u8| false)
            .inputs([0, 1])
            .build();
        assert_eq!(words(&dfa).unwrap().next(), None);
    }

    #[test]
    fn test_find_word() {
        assert_eq!(find_word(&mod4()).unwrap(), Some(vec![1, 1, 1]));
        assert_eq!(find_word(&(!&mod4()).unwrap()).unwrap(), Some(vec![]));
        assert_eq!(find_word(&chain()).unwrap(), Some(vec![0, 0]));

        let never = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 3, |_: &u8| false)
            .inputs([0, 1])
            .build();
        assert_eq!(find_word(&never).unwrap(), None);
    }

    #[test]
    fn test_equiv_counterexample() {
        let parity_mod_6 = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 6, |s: &u8| s % 2 == 1)
            .inputs([0, 1])
            .build();
        assert_eq!(find_equiv_counterexample(&odd(), &parity_mod_6).unwrap(), None);

        let word = find_equiv_counterexample(&odd(), &mod4()).unwrap().unwrap();
        assert_ne!(odd().label(word.clone()).unwrap(), mod4().label(word).unwrap());
    }

    #[test]
    fn test_subset_counterexample() {
        assert_eq!(find_subset_counterexample(&mod4(), &odd()).unwrap(), None);

        let word = find_subset_counterexample(&odd(), &mod4()).unwrap().unwrap();
        assert_eq!(word, vec![1]);
        assert!(odd().label(word.clone()).unwrap());
        assert!(!mod4().label(word).unwrap());
    }

    #[test]
    fn test_min_distance() {
        let distances = min_distance_to_accept_by_state(&mod4()).unwrap();
        assert_eq!(distances[&0], Some(3));
        assert_eq!(distances[&1], Some(2));
        assert_eq!(distances[&2], Some(1));
        assert_eq!(distances[&3], Some(0));

        let distances = min_distance_to_accept_by_state(&chain()).unwrap();
        assert_eq!(distances.len(), 5);
        assert_eq!(distances[&0], Some(2));
        assert_eq!(distances[&2], Some(0));
        assert_eq!(distances[&3], None);
        assert_eq!(distances[&4], None);
    }
}
