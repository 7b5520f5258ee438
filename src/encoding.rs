//! Bit-exact integer encoding of acceptors.
//!
//! An acceptor is encoded by first minimizing it and numbering its states
//! canonically (see [`crate::canonical`]), then writing the following fields,
//! most significant bit first:
//!
//! | field              | width               | content                                   |
//! |--------------------|---------------------|-------------------------------------------|
//! | anchor             | 1                   | always `1`                                |
//! | state width `ws`   | unary               | `bit_length(N - 1)`                       |
//! | input width `wi`   | unary               | `bit_length(M - 1)`                       |
//! | states             | `ws`                | `N - 1`                                   |
//! | inputs             | `wi`                | `M - 1`                                   |
//! | specify rejecting  | 1                   | `1` if the set below lists rejecting states |
//! | set size           | `ws`                | `K`                                       |
//! | set                | `K * ws`            | listed state indices, ascending           |
//! | transitions        | `T * (2 ws + wi)`   | `(state, input, next)` triples            |
//!
//! Here `N` is the number of states, `M` the number of input letters (in
//! ascending order, so a letter is written as its index) and a unary number
//! `n` is `n` ones followed by a zero. The listed set is the accepting set
//! unless more than half of the states accept, in which case the rejecting
//! set is listed. Only transitions that leave their state are written, in
//! `(state, input)` order; every omitted transition is a self-loop. The
//! triples run to the end of the integer.
//!
//! The single-state automaton over `{0, 1}` that rejects everything is
//! therefore `0b1_0_10_1_0`, i.e. `42`:
//!
//! ```
//! use dfa_rs::dfa::Dfa;
//! use dfa_rs::encoding::from_int;
//! use num_bigint::BigUint;
//!
//! let never = Dfa::builder((), |_: &(), _: &u8| (), |_: &()| false)
//!     .inputs([0, 1])
//!     .build();
//! let code = never.to_int().unwrap();
//! assert_eq!(code, BigUint::from(42u32));
//!
//! let decoded = from_int(&code, [0u8, 1]).unwrap();
//! assert_eq!(decoded, never);
//! ```

use log::debug;
use num_bigint::BigUint;

use crate::alphabet::{Alphabet, Letter};
use crate::dfa::{Dfa, State};
use crate::error::{DfaError, Result};
use crate::table::Table;
use crate::utils::{bit_length, BitReader, BitWriter};

impl<S: State, I: Letter> Dfa<S, I, bool> {
    /// Encodes the language of the acceptor as an integer. Computed once.
    ///
    /// Language-equivalent acceptors over the same input alphabet encode to
    /// the same integer.
    ///
    /// # Errors
    ///
    /// - [`DfaError::NonBooleanOperation`] if the outputs are not Boolean.
    /// - [`DfaError::UnboundedStates`] if the input alphabet is infinite.
    /// - [`DfaError::EmptyAlphabet`] if the input alphabet is empty.
    pub fn to_int(&self) -> Result<BigUint> {
        if let Some(code) = self.encoding_cell().get() {
            return Ok(code.clone());
        }
        self.ensure_boolean()?;
        let table = self.minimal_table()?;
        let code = encode(&table)?;
        Ok(self.encoding_cell().get_or_init(|| code).clone())
    }
}

/// Encodes a table in canonical numbering with start state `0`.
fn encode<I: Letter>(table: &Table<I, bool>) -> Result<BigUint> {
    let n = table.num_states();
    let m = table.letters().len();
    if m == 0 {
        return Err(DfaError::EmptyAlphabet);
    }
    let state_bits = bit_length(n - 1);
    let input_bits = bit_length(m - 1);

    let accepting: Vec<usize> = (0..n).filter(|&s| *table.label(s)).collect();
    let specify_rejecting = 2 * accepting.len() > n;
    let listed: Vec<usize> = if specify_rejecting {
        (0..n).filter(|&s| !*table.label(s)).collect()
    } else {
        accepting
    };

    let mut w = BitWriter::new();
    w.push_bit(true);
    w.push_unary(state_bits);
    w.push_unary(input_bits);
    w.push_int(n - 1, state_bits);
    w.push_int(m - 1, input_bits);
    w.push_bit(specify_rejecting);
    w.push_int(listed.len(), state_bits);
    for &s in &listed {
        w.push_int(s, state_bits);
    }
    let mut transitions = 0;
    for s in 0..n {
        for a in 0..m {
            let t = table.successor(s, a);
            if t != s {
                w.push_int(s, state_bits);
                w.push_int(a, input_bits);
                w.push_int(t, state_bits);
                transitions += 1;
            }
        }
    }

    debug!(
        "encode: {} states, {} inputs, {} listed (rejecting: {}), {} transitions, {} bits",
        n,
        m,
        listed.len(),
        specify_rejecting,
        transitions,
        w.len()
    );
    Ok(w.finish())
}

/// Header fields, read before the body so that sizes can be checked first.
#[derive(Debug)]
struct Header {
    state_bits: u32,
    input_bits: u32,
    num_states: usize,
    num_inputs: usize,
    specify_rejecting: bool,
}

fn read_header(r: &mut BitReader<'_>) -> Result<Header> {
    if !r.read_bit()? {
        return Err(DfaError::malformed("missing anchor bit"));
    }
    let state_bits = r.read_unary()?;
    let input_bits = r.read_unary()?;
    let n = r.read_int(state_bits)?.checked_add(1).ok_or_else(|| DfaError::malformed("too many states"))?;
    let m = r.read_int(input_bits)?.checked_add(1).ok_or_else(|| DfaError::malformed("too many inputs"))?;
    if bit_length(n - 1) != state_bits || bit_length(m - 1) != input_bits {
        return Err(DfaError::malformed("field widths are not minimal"));
    }
    let specify_rejecting = r.read_bit()?;
    debug!("decode: {} states, {} inputs", n, m);
    Ok(Header {
        state_bits,
        input_bits,
        num_states: n,
        num_inputs: m,
        specify_rejecting,
    })
}

/// Reads the listed states and the transitions into a table over `letters`.
///
/// Transitions are collected sparsely and the dense table is only allocated
/// once the whole body has been validated.
fn read_body<I: Letter>(r: &mut BitReader<'_>, header: &Header, letters: Vec<I>) -> Result<Table<I, bool>> {
    let (n, m) = (header.num_states, header.num_inputs);
    let (state_bits, input_bits) = (header.state_bits, header.input_bits);

    let count = r.read_int(state_bits)?;
    if count > n {
        return Err(DfaError::malformed(format!("{} listed states out of {}", count, n)));
    }
    let listed = (0..count)
        .map(|_| read_index(r, state_bits, n, "listed state"))
        .collect::<Result<Vec<_>>>()?;

    let triple = 2 * state_bits as u64 + input_bits as u64;
    let remaining = r.remaining();
    if triple == 0 {
        if remaining != 0 {
            return Err(DfaError::malformed("trailing bits after header"));
        }
    } else if remaining % triple != 0 {
        return Err(DfaError::malformed("truncated transition list"));
    } else if remaining / triple < (n - 1) as u64 {
        // Every state other than the start needs an incoming transition.
        return Err(DfaError::malformed("too few transitions to reach every state"));
    }

    let mut overrides = Vec::new();
    while r.remaining() > 0 {
        let s = read_index(r, state_bits, n, "source state")?;
        let a = read_index(r, input_bits, m, "input")?;
        let t = read_index(r, state_bits, n, "target state")?;
        overrides.push((s, a, t));
    }

    let mut labels = vec![header.specify_rejecting; n];
    for s in listed {
        labels[s] = !header.specify_rejecting;
    }
    let mut successors = self_loops(n, m)?;
    for (s, a, t) in overrides {
        successors[s][a] = t;
    }
    Ok(Table::new(letters, labels, successors))
}

/// The all-self-loop table, failing instead of aborting when it cannot be allocated.
fn self_loops(n: usize, m: usize) -> Result<Vec<Vec<usize>>> {
    let too_large = || DfaError::malformed(format!("{} x {} transition table is too large", n, m));
    if n.checked_mul(m).is_none() {
        return Err(too_large());
    }
    let mut rows = Vec::new();
    rows.try_reserve_exact(n).map_err(|_| too_large())?;
    for s in 0..n {
        let mut row = Vec::new();
        row.try_reserve_exact(m).map_err(|_| too_large())?;
        row.resize(m, s);
        rows.push(row);
    }
    Ok(rows)
}

fn read_index(r: &mut BitReader<'_>, width: u32, bound: usize, what: &str) -> Result<usize> {
    let index = r.read_int(width)?;
    if index < bound {
        Ok(index)
    } else {
        Err(DfaError::malformed(format!("{} {} is out of range 0..{}", what, index, bound)))
    }
}

/// Decodes an acceptor over `inputs`, whose letters in ascending order are
/// matched with the encoded input indices.
///
/// The result has states `0..N` with start state `0`.
///
/// # Errors
///
/// - [`DfaError::UnboundedStates`] if `inputs` is infinite.
/// - [`DfaError::MalformedEncoding`] if `code` is not a well-formed encoding
///   or its number of inputs differs from the size of `inputs`.
pub fn from_int<I: Letter>(code: &BigUint, inputs: impl Into<Alphabet<I>>) -> Result<Dfa<usize, I, bool>> {
    let inputs = inputs.into();
    let letters = inputs.letters().ok_or(DfaError::UnboundedStates)?;
    let mut r = BitReader::new(code);
    let header = read_header(&mut r)?;
    if header.num_inputs != letters.len() {
        return Err(DfaError::malformed(format!(
            "encoding has {} inputs, alphabet {} has {}",
            header.num_inputs,
            inputs,
            letters.len()
        )));
    }
    let table = read_body(&mut r, &header, letters)?;
    Ok(table.into_dfa(0, inputs, Alphabet::boolean()))
}

/// Decodes an acceptor whose letters are the input indices `0..M`.
pub fn from_int_indexed(code: &BigUint) -> Result<Dfa<usize, usize, bool>> {
    let mut r = BitReader::new(code);
    let header = read_header(&mut r)?;
    let m = header.num_inputs;
    let mut letters = Vec::new();
    letters
        .try_reserve_exact(m)
        .map_err(|_| DfaError::malformed(format!("{} inputs cannot be allocated", m)))?;
    letters.extend(0..m);
    let table = read_body(&mut r, &header, letters)?;
    let inputs = Alphabet::explicit(table.letters().iter().copied());
    Ok(table.into_dfa(0, inputs, Alphabet::boolean()))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::search::find_equiv_counterexample;

    fn mod_n(n: u32, accept: u32) -> Dfa<u32, u32> {
        Dfa::builder(0, move |s: &u32, c: &u32| (s + c) % n, move |s: &u32| *s == accept)
            .inputs([0, 1])
            .build()
    }

    #[test]
    fn test_single_state() {
        let never = Dfa::builder(0u8, |s: &u8, _: &u8| *s, |_: &u8| false)
            .inputs([0, 1])
            .build();
        assert_eq!(never.to_int().unwrap(), BigUint::from(0b1_0_10_1_0u32));

        // Everything accepted: the rejecting set (empty) is listed instead.
        let always = (!&never).unwrap();
        assert_eq!(always.to_int().unwrap(), BigUint::from(0b1_0_10_1_1u32));
    }

    #[test]
    fn test_two_states() {
        // Parity: 0 -1-> 1 -1-> 0, accepting {1}.
        let parity = mod_n(2, 1);
        // 1 | 10 | 10 | 1 | 1 | 0 | 1 | 1 | (0,1,1) | (1,1,0)
        let expected = 0b1_10_10_1_1_0_1_1_011_110u32;
        assert_eq!(parity.to_int().unwrap(), BigUint::from(expected));
    }

    #[test]
    fn test_round_trip() {
        for (n, accept) in [(2, 0), (3, 1), (4, 3), (5, 0), (7, 6)] {
            let dfa = mod_n(n, accept);
            let code = dfa.to_int().unwrap();
            let decoded = from_int(&code, [0u32, 1]).unwrap();
            assert_eq!(decoded.states().unwrap().len(), n as usize);
            assert_eq!(find_equiv_counterexample(&dfa, &decoded).unwrap(), None);
            assert_eq!(decoded.to_int().unwrap(), code);
        }
    }

    #[test]
    fn test_equivalent_machines_share_code() {
        let a = mod_n(2, 1);
        let b = Dfa::builder(0u32, |s: &u32, c: &u32| (s + c) % 6, |s: &u32| s % 2 == 1)
            .inputs([0, 1])
            .build();
        assert_eq!(a.to_int().unwrap(), b.to_int().unwrap());
        assert_ne!(a.to_int().unwrap(), mod_n(3, 1).to_int().unwrap());
    }

    #[test]
    fn test_indexed() {
        let dfa = Dfa::builder(0u8, |s: &u8, c: &char| if *c == 'b' { 1 } else { *s }, |s: &u8| *s == 1)
            .inputs(['a', 'b', 'c'])
            .build();
        let decoded = from_int_indexed(&dfa.to_int().unwrap()).unwrap();
        assert_eq!(*decoded.inputs(), Alphabet::from([0, 1, 2]));
        assert!(decoded.label([0, 1, 2]).unwrap());
        assert!(!decoded.label([0, 2, 2]).unwrap());
    }

    #[test]
    fn test_errors() {
        let empty = Dfa::builder(0u8, |s: &u8, _: &u8| *s, |_: &u8| true)
            .inputs(Vec::<u8>::new())
            .build();
        assert_eq!(empty.to_int(), Err(DfaError::EmptyAlphabet));

        let moore = Dfa::builder(0u8, |s: &u8, _: &u8| *s, |_: &u8| true)
            .inputs([0])
            .outputs(None::<Vec<bool>>)
            .build();
        assert!(matches!(moore.to_int(), Err(DfaError::NonBooleanOperation { .. })));

        let free = Dfa::new(0u8, |s: &u8, _: &u8| *s, |_: &u8| true);
        assert_eq!(free.to_int(), Err(DfaError::UnboundedStates));
    }

    #[test]
    fn test_malformed() {
        let code = mod_n(4, 3).to_int().unwrap();

        // Dropping the last bit truncates the final triple.
        let truncated = &code >> 1u32;
        assert!(matches!(from_int(&truncated, [0u32, 1]), Err(DfaError::MalformedEncoding(_))));

        assert!(matches!(from_int(&BigUint::default(), [0u32, 1]), Err(DfaError::MalformedEncoding(_))));
        assert!(matches!(from_int(&code, [0u32, 1, 2]), Err(DfaError::MalformedEncoding(_))));
        assert_eq!(from_int(&code, None::<Vec<u32>>).unwrap_err(), DfaError::UnboundedStates);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_huge_input_count() {
        // One state over 2^63 + 1 inputs: a short header, but no table fits in memory.
        let mut w = BitWriter::new();
        w.push_bit(true);
        w.push_unary(0);
        w.push_unary(64);
        w.push_int(1 << 63, 64);
        w.push_bit(false);
        let code = w.finish();
        assert_eq!(code.bits(), 132);

        assert!(matches!(from_int(&code, [0u8, 1]), Err(DfaError::MalformedEncoding(_))));
        assert!(matches!(from_int_indexed(&code), Err(DfaError::MalformedEncoding(_))));
    }
}
