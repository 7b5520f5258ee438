//! Algebraic composition of automata.
//!
//! Every operator builds a new automaton lazily: the composite state is a pair
//! of operand states and nothing is explored until the result is run or
//! analyzed. The operators are:
//!
//! - [`Dfa::parallel`]: synchronous product over pair letters, producing pair labels.
//! - [`Dfa::and`], [`Dfa::or`], [`Dfa::xor`]: Boolean combination of acceptors
//!   reading the *same* letter (`&`, `|`, `^`).
//! - [`Dfa::complement`]: negated acceptor (`!`).
//! - [`Dfa::cascade`]: the left machine's label drives the right machine (`>>`),
//!   and [`Dfa::feed`] for the reflected wiring (`<<`).
//!
//! The fallible operators return [`Result`], including their operator forms:
//!
//! ```
//! use dfa_rs::dfa::Dfa;
//!
//! let even = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 2, |s: &u8| *s == 0)
//!     .inputs([0, 1])
//!     .build();
//! let odd = (!&even).unwrap();
//!
//! let everything = (&even | &odd).unwrap();
//! assert!(everything.label([1, 0, 1]).unwrap());
//!
//! let nothing = (&even ^ &even).unwrap();
//! assert!(!nothing.label([1, 1]).unwrap());
//! ```

use std::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

use crate::alphabet::{Alphabet, Letter};
use crate::dfa::{Dfa, State};
use crate::error::{DfaError, Result};

impl<S: State, I: Letter, O: Letter> Dfa<S, I, O> {
    /// Synchronous parallel composition.
    ///
    /// Both machines advance on their own component of a pair letter; the
    /// label is the pair of labels. Alphabets are the products of the
    /// operands' alphabets.
    pub fn parallel<S2: State, I2: Letter, O2: Letter>(
        &self,
        other: &Dfa<S2, I2, O2>,
    ) -> Dfa<(S, S2), (I, I2), (O, O2)> {
        let (left, right) = (self.clone(), other.clone());
        let (left_out, right_out) = (self.clone(), other.clone());
        Dfa::from_parts(
            (self.start().clone(), other.start().clone()),
            Box::new(move |(s, t): &(S, S2), (a, b): &(I, I2)| (left.step(s, a), right.step(t, b))),
            Box::new(move |(s, t): &(S, S2)| (left_out.state_label(s), right_out.state_label(t))),
            Alphabet::product(self.inputs().clone(), other.inputs().clone()),
            Alphabet::product(self.outputs().clone(), other.outputs().clone()),
        )
    }

    /// Cascade composition: `self`'s labels are `other`'s letters.
    ///
    /// On every letter, `self` advances normally while `other` reads the label
    /// `self` had *before* the step. The composite is labeled by `other`.
    ///
    /// Fails with [`DfaError::IncompatibleAlphabet`] unless `self.outputs()` is
    /// contained in `other.inputs()`.
    pub fn cascade<S2: State, O2: Letter>(&self, other: &Dfa<S2, O, O2>) -> Result<Dfa<(S, S2), I, O2>> {
        if !self.outputs().is_subset(other.inputs()) {
            return Err(DfaError::IncompatibleAlphabet {
                left: self.outputs().to_string(),
                right: other.inputs().to_string(),
            });
        }

        let (left, right) = (self.clone(), other.clone());
        let right_out = other.clone();
        Ok(Dfa::from_parts(
            (self.start().clone(), other.start().clone()),
            Box::new(move |(s, t): &(S, S2), a: &I| {
                let b = left.state_label(s);
                (left.step(s, a), right.step(t, &b))
            }),
            Box::new(move |(_, t): &(S, S2)| right_out.state_label(t)),
            self.inputs().clone(),
            other.outputs().clone(),
        ))
    }

    /// Cascade composition in the other direction: `other`'s labels drive `self`.
    pub fn feed<S2: State, I2: Letter>(&self, other: &Dfa<S2, I2, I>) -> Result<Dfa<(S2, S), I2, O>> {
        other.cascade(self)
    }
}

impl<S: State, I: Letter> Dfa<S, I, bool> {
    pub(crate) fn ensure_boolean(&self) -> Result<()> {
        if self.outputs().is_boolean() {
            Ok(())
        } else {
            Err(DfaError::NonBooleanOperation {
                outputs: self.outputs().to_string(),
            })
        }
    }

    fn combine<S2: State>(&self, other: &Dfa<S2, I, bool>, op: fn(bool, bool) -> bool) -> Result<Dfa<(S, S2), I, bool>> {
        self.ensure_boolean()?;
        other.ensure_boolean()?;
        if self.inputs() != other.inputs() {
            return Err(DfaError::IncompatibleAlphabet {
                left: self.inputs().to_string(),
                right: other.inputs().to_string(),
            });
        }

        let (left, right) = (self.clone(), other.clone());
        let (left_out, right_out) = (self.clone(), other.clone());
        Ok(Dfa::from_parts(
            (self.start().clone(), other.start().clone()),
            Box::new(move |(s, t): &(S, S2), a: &I| (left.step(s, a), right.step(t, a))),
            Box::new(move |(s, t): &(S, S2)| op(left_out.state_label(s), right_out.state_label(t))),
            self.inputs().clone(),
            Alphabet::boolean(),
        ))
    }

    /// Intersection of languages.
    pub fn and<S2: State>(&self, other: &Dfa<S2, I, bool>) -> Result<Dfa<(S, S2), I, bool>> {
        self.combine(other, |a, b| a && b)
    }

    /// Union of languages.
    pub fn or<S2: State>(&self, other: &Dfa<S2, I, bool>) -> Result<Dfa<(S, S2), I, bool>> {
        self.combine(other, |a, b| a || b)
    }

    /// Symmetric difference of languages.
    pub fn xor<S2: State>(&self, other: &Dfa<S2, I, bool>) -> Result<Dfa<(S, S2), I, bool>> {
        self.combine(other, |a, b| a != b)
    }

    /// Complement of the language; states and transitions are unchanged.
    pub fn complement(&self) -> Result<Dfa<S, I, bool>> {
        self.ensure_boolean()?;
        let (inner, inner_out) = (self.clone(), self.clone());
        Ok(Dfa::from_parts(
            self.start().clone(),
            Box::new(move |s: &S, a: &I| inner.step(s, a)),
            Box::new(move |s: &S| !inner_out.state_label(s)),
            self.inputs().clone(),
            Alphabet::boolean(),
        ))
    }
}

impl<S: State, S2: State, I: Letter> BitAnd<&Dfa<S2, I, bool>> for &Dfa<S, I, bool> {
    type Output = Result<Dfa<(S, S2), I, bool>>;

    fn bitand(self, rhs: &Dfa<S2, I, bool>) -> Self::Output {
        self.and(rhs)
    }
}

impl<S: State, S2: State, I: Letter> BitOr<&Dfa<S2, I, bool>> for &Dfa<S, I, bool> {
    type Output = Result<Dfa<(S, S2), I, bool>>;

    fn bitor(self, rhs: &Dfa<S2, I, bool>) -> Self::Output {
        self.or(rhs)
    }
}

impl<S: State, S2: State, I: Letter> BitXor<&Dfa<S2, I, bool>> for &Dfa<S, I, bool> {
    type Output = Result<Dfa<(S, S2), I, bool>>;

    fn bitxor(self, rhs: &Dfa<S2, I, bool>) -> Self::Output {
        self.xor(rhs)
    }
}

impl<S: State, I: Letter> Not for &Dfa<S, I, bool> {
    type Output = Result<Dfa<S, I, bool>>;

    fn not(self) -> Self::Output {
        self.complement()
    }
}

impl<S: State, S2: State, I: Letter, O: Letter, O2: Letter> Shr<&Dfa<S2, O, O2>> for &Dfa<S, I, O> {
    type Output = Result<Dfa<(S, S2), I, O2>>;

    fn shr(self, rhs: &Dfa<S2, O, O2>) -> Self::Output {
        self.cascade(rhs)
    }
}

impl<S: State, S2: State, I: Letter, I2: Letter, O: Letter> Shl<&Dfa<S2, I2, I>> for &Dfa<S, I, O> {
    type Output = Result<Dfa<(S2, S), I2, O>>;

    fn shl(self, rhs: &Dfa<S2, I2, I>) -> Self::Output {
        self.feed(rhs)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn parity() -> Dfa<u8, u8> {
        Dfa::builder(0, |s: &u8, c: &u8| (s + c) & 1, |s: &u8| *s == 1)
            .inputs([0, 1])
            .build()
    }

    fn mod_n(n: u8, accept: u8) -> Dfa<u8, u8> {
        Dfa::builder(0, move |s: &u8, c: &u8| (s + c) % n, move |s: &u8| *s == accept)
            .inputs([0, 1])
            .build()
    }

    #[test]
    fn test_parallel() {
        let bits = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) & 1, |s: &u8| *s)
            .inputs([0, 1])
            .build();
        let free = Dfa::new(0u8, |s: &u8, c: &u8| (s + c) & 1, |s: &u8| *s);

        let both = bits.parallel(&bits);
        assert_eq!(both.inputs().letters(), Some(vec![(0, 0), (0, 1), (1, 0), (1, 1)]));
        assert_eq!(both.inputs().size(), Some(4));
        assert_eq!(both.inputs().to_string(), "{0, 1} x {0, 1}");
        assert!(Alphabet::product([0], [0]) < *both.inputs());
        assert_eq!(both.label([(0, 0), (1, 0)]).unwrap(), (1, 0));
        assert_eq!(both.states().unwrap().len(), 4);

        let mixed = bits.parallel(&free);
        assert_eq!(mixed.label([(0, 0), (1, 0)]).unwrap(), (1, 0));
        assert!(mixed.inputs().contains(&(1, 7)));
        assert!(!mixed.inputs().contains(&(2, 7)));
        assert_eq!(mixed.inputs().size(), None);
        assert_eq!(mixed.states().unwrap_err(), DfaError::UnboundedStates);
    }

    #[test]
    fn test_parallel_outputs() {
        let both = parity().parallel(&parity());
        assert_eq!(both.outputs().size(), Some(4));
        assert_eq!(both.outputs().to_string(), "{false, true} x {false, true}");
    }

    #[test]
    fn test_cascade() {
        let mod_5 = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 5, |s: &u8| *s)
            .inputs([0, 1])
            .outputs([0, 1, 2, 3, 4])
            .build();
        let eq_0 = Dfa::builder(0u8, |_: &u8, c: &u8| *c, |s: &u8| *s == 0)
            .inputs([0, 1, 2, 3, 4])
            .build();

        let eq_0_mod_5 = (&eq_0 << &mod_5).unwrap();
        assert_eq!(*eq_0_mod_5.inputs(), Alphabet::from([0, 1]));
        assert_eq!(*eq_0_mod_5.outputs(), Alphabet::boolean());
        assert!(eq_0_mod_5.label([0, 0, 0, 0]).unwrap());
        assert!(eq_0_mod_5.label([1, 1, 1, 1, 1, 0]).unwrap());
        assert!(!eq_0_mod_5.label([1, 1, 1, 1, 1]).unwrap());
        assert!(!eq_0_mod_5.label([0, 1, 0, 0, 0]).unwrap());

        let same = (&mod_5 >> &eq_0).unwrap();
        assert_eq!(same, eq_0_mod_5);
    }

    #[test]
    fn test_cascade_incompatible() {
        let mod_5 = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 5, |s: &u8| *s)
            .inputs([0, 1])
            .outputs([0, 1, 2, 3, 4])
            .build();
        let narrow = Dfa::builder(0u8, |_: &u8, c: &u8| *c, |s: &u8| *s == 0)
            .inputs([0, 1])
            .build();
        assert!(matches!(mod_5.cascade(&narrow), Err(DfaError::IncompatibleAlphabet { .. })));
    }

    #[test]
    fn test_boolean_ops() {
        let a = mod_n(3, 0);
        let b = parity();

        let both = (&a & &b).unwrap();
        let either = (&a | &b).unwrap();
        let one = (&a ^ &b).unwrap();
        let not_a = (!&a).unwrap();

        for word in [vec![], vec![1], vec![1, 1], vec![1, 1, 1], vec![1, 0, 1, 1, 1, 1]] {
            let x = a.label(word.clone()).unwrap();
            let y = b.label(word.clone()).unwrap();
            assert_eq!(both.label(word.clone()).unwrap(), x && y);
            assert_eq!(either.label(word.clone()).unwrap(), x || y);
            assert_eq!(one.label(word.clone()).unwrap(), x != y);
            assert_eq!(not_a.label(word).unwrap(), !x);
        }
        assert_eq!(both.states().unwrap().len(), 6);
    }

    #[test]
    fn test_boolean_incompatible_inputs() {
        let a = parity();
        let b = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) & 1, |s: &u8| *s == 1)
            .inputs([0, 1, 2])
            .build();
        assert!(matches!(a.and(&b), Err(DfaError::IncompatibleAlphabet { .. })));
        assert!(matches!(&a ^ &b, Err(DfaError::IncompatibleAlphabet { .. })));
    }

    #[test]
    fn test_non_boolean() {
        let a = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) & 1, |s: &u8| *s == 1)
            .inputs([0, 1])
            .outputs(None::<Vec<bool>>)
            .build();
        assert!(matches!(a.complement(), Err(DfaError::NonBooleanOperation { .. })));
        assert!(matches!(a.or(&parity()), Err(DfaError::NonBooleanOperation { .. })));
    }

    #[test]
    fn test_laws() {
        let a = mod_n(4, 3);
        let b = parity();
        let c = mod_n(3, 1);

        let not_a = (!&a).unwrap();
        let everything = (&a | &not_a).unwrap();
        assert!(everything.states().unwrap().iter().all(|s| everything.state_label(s)));
        let nothing = (&a ^ &a).unwrap();
        assert!(nothing.states().unwrap().iter().all(|s| !nothing.state_label(s)));

        let left = (&(&a & &b).unwrap() & &c).unwrap();
        let right = (&a & &(&b & &c).unwrap()).unwrap();
        assert_eq!(left, right);
    }
}
