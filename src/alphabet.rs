//! Input and output alphabets.
//!
//! An [`Alphabet`] is one of three shapes:
//!
//! - **Explicit**: a finite set of letters.
//! - **Universal**: every letter of the type. This is the top element of the
//!   containment order and the default input alphabet of an automaton whose
//!   alphabet is not yet known.
//! - **Product**: the Cartesian product of two alphabets, used by parallel
//!   composition. Only pair letters `(A, B)` have a product shape.
//!
//! Alphabets are compared by the sets of letters they denote: an explicit set
//! of pairs equals the product that enumerates the same pairs, and `<`/`<=`
//! follow set containment (so the order is partial). Two products are the
//! exception: `A x B < C x D` holds only when `A < C` and `B < D`.
//! [`Alphabet::is_subset`] is plain containment in every case.
//!
//! The product shape is expressed through the [`Letter::Factors`] associated
//! type: pairs carry their two component alphabets, while atomic letters use
//! the uninhabited [`Atomic`] type, which makes the product variant impossible
//! to construct for them.
//!
//! # Examples
//!
//! ```
//! use dfa_rs::alphabet::Alphabet;
//!
//! let bits = Alphabet::from([0, 1]);
//! let pairs = Alphabet::product(bits.clone(), bits.clone());
//!
//! assert!(pairs.contains(&(0, 1)));
//! assert_eq!(pairs.size(), Some(4));
//! assert_eq!(pairs.to_string(), "{0, 1} x {0, 1}");
//! assert!(Alphabet::product([0], [0]) < pairs);
//! assert!(bits < Alphabet::universal());
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// A value usable as an input letter or an output label.
///
/// Implemented for `bool`, `char`, the integer types, `String`,
/// `&'static str`, `()` and pairs of letters. Use [`atomic_letter!`] to
/// implement it for your own types.
///
/// [`atomic_letter!`]: crate::atomic_letter
pub trait Letter: Clone + Ord + Hash + Debug + 'static {
    /// Component alphabets of a product space ([`Atomic`] for non-pairs).
    type Factors: Clone + Debug;

    fn factors_contains(factors: &Self::Factors, letter: &Self) -> bool;
    fn factors_letters(factors: &Self::Factors) -> Option<Vec<Self>>;
    fn factors_size(factors: &Self::Factors) -> Option<usize>;
    fn factors_subset(left: &Self::Factors, right: &Self::Factors) -> bool;
    /// Componentwise order of two product spaces.
    fn factors_cmp(left: &Self::Factors, right: &Self::Factors) -> Option<Ordering>;
    fn factors_hash<H: Hasher>(factors: &Self::Factors, state: &mut H);
    fn factors_fmt(factors: &Self::Factors, f: &mut Formatter<'_>) -> fmt::Result;

    /// Output alphabet used when an automaton does not declare one.
    fn default_outputs() -> Alphabet<Self> {
        Alphabet::Universal
    }
}

/// Factor type of atomic letters. It has no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Atomic {}

impl Atomic {
    pub fn absurd<T>(&self) -> T {
        match *self {}
    }
}

/// Implements [`Letter`] for types that are not products.
///
/// ```
/// use dfa_rs::atomic_letter;
///
/// #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// enum Move {
///     Left,
///     Right,
/// }
///
/// atomic_letter!(Move);
/// ```
#[macro_export]
macro_rules! atomic_letter {
    (@factors) => {
        type Factors = $crate::alphabet::Atomic;

        fn factors_contains(factors: &Self::Factors, _: &Self) -> bool {
            factors.absurd()
        }
        fn factors_letters(factors: &Self::Factors) -> Option<Vec<Self>> {
            factors.absurd()
        }
        fn factors_size(factors: &Self::Factors) -> Option<usize> {
            factors.absurd()
        }
        fn factors_subset(left: &Self::Factors, _: &Self::Factors) -> bool {
            left.absurd()
        }
        fn factors_cmp(left: &Self::Factors, _: &Self::Factors) -> Option<::std::cmp::Ordering> {
            left.absurd()
        }
        fn factors_hash<H: ::std::hash::Hasher>(factors: &Self::Factors, _: &mut H) {
            factors.absurd()
        }
        fn factors_fmt(factors: &Self::Factors, _: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
            factors.absurd()
        }
    };
    ($ty:ty => default_outputs: $outputs:expr) => {
        impl $crate::alphabet::Letter for $ty {
            $crate::atomic_letter!(@factors);

            fn default_outputs() -> $crate::alphabet::Alphabet<Self> {
                $outputs
            }
        }
    };
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::alphabet::Letter for $ty {
            $crate::atomic_letter!(@factors);
        }
    )*};
}

atomic_letter!(char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, String, &'static str, ());
atomic_letter!(bool => default_outputs: Alphabet::boolean());

impl<A: Letter, B: Letter> Letter for (A, B) {
    type Factors = (Alphabet<A>, Alphabet<B>);

    fn factors_contains((left, right): &Self::Factors, (a, b): &Self) -> bool {
        left.contains(a) && right.contains(b)
    }

    fn factors_letters((left, right): &Self::Factors) -> Option<Vec<Self>> {
        let left = left.letters()?;
        let right = right.letters()?;
        let mut letters = Vec::with_capacity(left.len() * right.len());
        for a in &left {
            for b in &right {
                letters.push((a.clone(), b.clone()));
            }
        }
        Some(letters)
    }

    fn factors_size((left, right): &Self::Factors) -> Option<usize> {
        match (left.size(), right.size()) {
            (Some(0), _) | (_, Some(0)) => Some(0),
            (Some(n), Some(m)) => Some(n * m),
            _ => None,
        }
    }

    fn factors_subset(left: &Self::Factors, right: &Self::Factors) -> bool {
        left.0.is_subset(&right.0) && left.1.is_subset(&right.1)
    }

    /// Products are ordered only when both components are: `A x B < C x D`
    /// iff `A < C` and `B < D`.
    fn factors_cmp((a, b): &Self::Factors, (c, d): &Self::Factors) -> Option<Ordering> {
        if a == c && b == d {
            Some(Ordering::Equal)
        } else if a < c && b < d {
            Some(Ordering::Less)
        } else if a > c && b > d {
            Some(Ordering::Greater)
        } else {
            None
        }
    }

    fn factors_hash<H: Hasher>((left, right): &Self::Factors, state: &mut H) {
        left.hash(state);
        right.hash(state);
    }

    fn factors_fmt((left, right): &Self::Factors, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", left, right)
    }
}

/// A set of letters: explicit, universal, or a product of two alphabets.
#[derive(Clone, Debug)]
pub enum Alphabet<L: Letter> {
    Explicit(BTreeSet<L>),
    Universal,
    Product(L::Factors),
}

impl<L: Letter> Alphabet<L> {
    pub fn explicit(letters: impl IntoIterator<Item = L>) -> Self {
        Alphabet::Explicit(letters.into_iter().collect())
    }

    pub fn universal() -> Self {
        Alphabet::Universal
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Alphabet::Universal)
    }

    /// Returns `true` if the alphabet holds finitely many letters.
    pub fn is_finite(&self) -> bool {
        self.size().is_some()
    }

    pub fn contains(&self, letter: &L) -> bool {
        match self {
            Alphabet::Explicit(letters) => letters.contains(letter),
            Alphabet::Universal => true,
            Alphabet::Product(factors) => L::factors_contains(factors, letter),
        }
    }

    /// Returns the letters in ascending order, or `None` if there are infinitely many.
    ///
    /// Products enumerate their pairs lexicographically, which coincides with
    /// the ordering of the pairs themselves.
    pub fn letters(&self) -> Option<Vec<L>> {
        match self {
            Alphabet::Explicit(letters) => Some(letters.iter().cloned().collect()),
            Alphabet::Universal => None,
            Alphabet::Product(factors) => L::factors_letters(factors),
        }
    }

    /// Number of letters, or `None` if infinite.
    pub fn size(&self) -> Option<usize> {
        match self {
            Alphabet::Explicit(letters) => Some(letters.len()),
            Alphabet::Universal => None,
            Alphabet::Product(factors) => L::factors_size(factors),
        }
    }

    /// Returns `true` if every letter of `self` is a letter of `other`.
    pub fn is_subset(&self, other: &Alphabet<L>) -> bool {
        if self.size() == Some(0) {
            return true;
        }
        match (self, other) {
            (_, Alphabet::Universal) => true,
            (Alphabet::Universal, _) => false,
            (Alphabet::Explicit(left), Alphabet::Explicit(right)) => left.is_subset(right),
            (Alphabet::Explicit(left), _) => left.iter().all(|letter| other.contains(letter)),
            (Alphabet::Product(left), Alphabet::Product(right)) => L::factors_subset(left, right),
            (Alphabet::Product(_), Alphabet::Explicit(right)) => match self.letters() {
                Some(letters) => letters.iter().all(|letter| right.contains(letter)),
                None => false,
            },
        }
    }
}

impl<A: Letter, B: Letter> Alphabet<(A, B)> {
    pub fn product(left: impl Into<Alphabet<A>>, right: impl Into<Alphabet<B>>) -> Self {
        Alphabet::Product((left.into(), right.into()))
    }
}

impl Alphabet<bool> {
    /// The alphabet `{false, true}` of acceptors.
    pub fn boolean() -> Self {
        Alphabet::explicit([false, true])
    }

    /// Returns `true` if the alphabet is contained in `{false, true}`.
    pub fn is_boolean(&self) -> bool {
        self.is_subset(&Alphabet::boolean())
    }
}

impl<L: Letter> PartialEq for Alphabet<L> {
    fn eq(&self, other: &Self) -> bool {
        self.is_subset(other) && other.is_subset(self)
    }
}

impl<L: Letter> Eq for Alphabet<L> {}

impl<L: Letter> PartialOrd for Alphabet<L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if let (Alphabet::Product(left), Alphabet::Product(right)) = (self, other) {
            if self == other {
                return Some(Ordering::Equal);
            }
            return L::factors_cmp(left, right);
        }
        match (self.is_subset(other), other.is_subset(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl<L: Letter> Hash for Alphabet<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Finite alphabets hash their letter sets, so an explicit set of pairs
        // and the product enumerating the same pairs collide as they must.
        match self {
            Alphabet::Universal => 1u8.hash(state),
            Alphabet::Product(factors) if !self.is_finite() => {
                2u8.hash(state);
                L::factors_hash(factors, state);
            }
            _ => {
                0u8.hash(state);
                let letters: BTreeSet<L> = self.letters().into_iter().flatten().collect();
                letters.hash(state);
            }
        }
    }
}

impl<L: Letter> Display for Alphabet<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Alphabet::Explicit(letters) => {
                write!(f, "{{")?;
                for (i, letter) in letters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", letter)?;
                }
                write!(f, "}}")
            }
            Alphabet::Universal => write!(f, "Universal"),
            Alphabet::Product(factors) => L::factors_fmt(factors, f),
        }
    }
}

impl<L: Letter> Default for Alphabet<L> {
    fn default() -> Self {
        Alphabet::Universal
    }
}

impl<L: Letter> FromIterator<L> for Alphabet<L> {
    fn from_iter<T: IntoIterator<Item = L>>(iter: T) -> Self {
        Alphabet::explicit(iter)
    }
}

impl<L: Letter> From<BTreeSet<L>> for Alphabet<L> {
    fn from(letters: BTreeSet<L>) -> Self {
        Alphabet::Explicit(letters)
    }
}

impl<L: Letter> From<HashSet<L>> for Alphabet<L> {
    fn from(letters: HashSet<L>) -> Self {
        Alphabet::explicit(letters)
    }
}

impl<L: Letter> From<Vec<L>> for Alphabet<L> {
    fn from(letters: Vec<L>) -> Self {
        Alphabet::explicit(letters)
    }
}

impl<L: Letter, const N: usize> From<[L; N]> for Alphabet<L> {
    fn from(letters: [L; N]) -> Self {
        Alphabet::explicit(letters)
    }
}

/// `None` stands for the universal alphabet.
impl<L: Letter, T: Into<Alphabet<L>>> From<Option<T>> for Alphabet<L> {
    fn from(alphabet: Option<T>) -> Self {
        match alphabet {
            Some(alphabet) => alphabet.into(),
            None => Alphabet::Universal,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use test_log::test;

    use super::*;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_universal() {
        let sup = Alphabet::<i32>::universal();
        let bits = Alphabet::from([0, 1]);

        assert!(sup.contains(&42));
        assert_eq!(sup.size(), None);
        assert_eq!(sup.letters(), None);

        assert!(!(sup < sup));
        assert!(!(sup > sup));
        assert!(sup <= sup);
        assert!(sup >= sup);
        assert_eq!(sup, sup);

        assert_ne!(sup, bits);
        assert_ne!(bits, sup);
        assert!(bits < sup);
        assert!(sup > bits);
        assert!(!(sup < bits));
        assert!(!(bits > sup));
        assert!(bits <= sup);
        assert!(!(bits >= sup));
        assert!(!(sup <= bits));

        assert_eq!(hash_of(&sup), hash_of(&Alphabet::<i32>::universal()));
    }

    #[test]
    fn test_explicit() {
        let abc = Alphabet::from(["a", "b", "c"]);
        let ab = Alphabet::from(vec!["b", "a", "b"]);

        assert_eq!(ab.size(), Some(2));
        assert_eq!(ab.letters(), Some(vec!["a", "b"]));
        assert!(ab < abc);
        assert!(abc > ab);
        assert_eq!(ab.partial_cmp(&Alphabet::from(["c"])), None);
        assert_eq!(ab, Alphabet::from(HashSet::from(["a", "b"])));
        assert_eq!(hash_of(&ab), hash_of(&Alphabet::from(["a", "b"])));
        assert_eq!(ab.to_string(), r#"{"a", "b"}"#);

        let empty = Alphabet::<u8>::explicit([]);
        assert!(empty <= Alphabet::from([1u8]));
        assert!(empty.is_finite());
    }

    #[test]
    fn test_freeze_conversions() {
        let none: Option<Vec<u8>> = None;
        assert!(Alphabet::from(none).is_universal());
        assert_eq!(Alphabet::from(Some(vec![1u8, 2])), Alphabet::from([2u8, 1]));
        assert!(Alphabet::<u8>::default().is_universal());

        let collected: Alphabet<char> = "abca".chars().collect();
        assert_eq!(collected.size(), Some(3));
    }

    #[test]
    fn test_product() {
        let bits = Alphabet::from([0, 1]);
        let pairs = Alphabet::product(bits.clone(), bits.clone());

        assert_eq!(pairs.size(), Some(4));
        assert_eq!(pairs.letters(), Some(vec![(0, 0), (0, 1), (1, 0), (1, 1)]));
        assert!(pairs.contains(&(1, 0)));
        assert!(!pairs.contains(&(2, 0)));
        assert_eq!(pairs, pairs.clone());
        assert!(Alphabet::product([0], [0]) < pairs);
        assert_eq!(pairs.to_string(), "{0, 1} x {0, 1}");

        let explicit = Alphabet::from([(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(explicit, pairs);
        assert_eq!(hash_of(&explicit), hash_of(&pairs));

        // Products are ordered componentwise, and strictly in both components.
        let mixed = Alphabet::product([0], [0, 1]);
        assert!(!(mixed < pairs));
        assert!(!(mixed <= pairs));
        assert!(!(pairs > mixed));
        assert_eq!(mixed.partial_cmp(&pairs), None);
        assert!(mixed.is_subset(&pairs));
        assert!(Alphabet::product([0], [1]) <= pairs);
        assert!(pairs > Alphabet::product([1], [0]));

        let bools = Alphabet::product(Alphabet::boolean(), Alphabet::boolean());
        assert_eq!(bools.to_string(), "{false, true} x {false, true}");
    }

    #[test]
    fn test_product_with_universal_factor() {
        let half = Alphabet::<(i32, &str)>::product([0, 1], None::<Vec<&str>>);

        assert!(half.contains(&(1, "x")));
        assert!(!half.contains(&(2, "x")));
        assert_eq!(half.size(), None);
        assert_eq!(half.letters(), None);
        assert_eq!(half.to_string(), "{0, 1} x Universal");
        assert!(half < Alphabet::universal());
        assert!(Alphabet::from([(0, "a")]) < half);
        assert!(!(half <= Alphabet::from([(0, "a")])));
    }

    #[test]
    fn test_boolean() {
        assert!(Alphabet::boolean().is_boolean());
        assert!(Alphabet::from([true]).is_boolean());
        assert!(!Alphabet::<bool>::universal().is_boolean());
        assert_eq!(bool::default_outputs(), Alphabet::boolean());
        assert!(i32::default_outputs().is_universal());
    }
}
