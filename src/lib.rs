//! # dfa-rs: Deterministic Finite Automata in Rust
//!
//! **`dfa-rs`** models deterministic finite automata, and more generally Moore
//! machines with arbitrary outputs, as immutable values that can be composed,
//! compared and canonicalized.
//!
//! ## What is an automaton here?
//!
//! An automaton is given by a start state, a transition function and a
//! labeling function, plus its input and output alphabets. States are never
//! listed up front: they are whatever values the transition function returns,
//! discovered by reachability when an analysis needs them. An acceptor is the
//! special case of Boolean labels.
//!
//! ## Key Features
//!
//! - **Functions, not tables**: states and letters are any hashable values and
//!   both functions are memoized, so each `(state, letter)` pair is evaluated once.
//! - **Algebra**: parallel and cascade composition for any outputs; AND, OR,
//!   XOR and complement for acceptors (see [`ops`]). Compositions are lazy.
//! - **Semantic equality**: `==` and `Hash` compare behavior, through the
//!   memoized minimal automaton (see [`canonical`]).
//! - **Hopcroft minimization** (see [`minimize`]).
//! - **Canonical integer encoding** of acceptors (see [`encoding`]).
//! - **Search**: shortest accepted words, equivalence and inclusion
//!   counterexamples, fair enumeration of accepted words (see [`search`]).
//!
//! ## Basic Usage
//!
//! ```rust
//! use dfa_rs::dfa::Dfa;
//! use dfa_rs::search::find_equiv_counterexample;
//!
//! // 1. Describe the machine by its functions.
//! let mod_4 = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 4, |s: &u8| *s == 3)
//!     .inputs([0, 1])
//!     .build();
//!
//! // 2. Run it.
//! assert_eq!(mod_4.transduce([1, 1, 1, 1]).unwrap(), vec![false, false, false, true]);
//!
//! // 3. Combine it: accept when the count is 3 mod 4 and odd (the same thing).
//! let odd = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 2, |s: &u8| *s == 1)
//!     .inputs([0, 1])
//!     .build();
//! let both = (&mod_4 & &odd).unwrap();
//!
//! // 4. Compare languages.
//! assert_eq!(both, mod_4);
//! assert_eq!(find_equiv_counterexample(&both, &mod_4).unwrap(), None);
//! assert_eq!(both.minimize().unwrap().states().unwrap().len(), 4);
//! ```
//!
//! ## Core Components
//!
//! - **[`dfa`]**: The [`Dfa`][crate::dfa::Dfa] value, running and state discovery.
//! - **[`alphabet`]**: Explicit, universal and product alphabets.
//! - **[`dict`]**: Explicit graph view, used for interchange and drawing.
//! - **[`dot`]**: Utilities for visualizing automata using Graphviz.
//! - **[`enumerate`]**: Exhaustive enumeration of small minimal automata.

pub mod alphabet;
pub mod canonical;
pub mod dfa;
pub mod dict;
pub mod dot;
pub mod encoding;
pub mod enumerate;
pub mod error;
pub mod memo;
pub mod minimize;
pub mod ops;
pub mod search;
pub mod table;
pub mod utils;
