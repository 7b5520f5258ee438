//! Bit-level helpers for the integer encoding.

use num_bigint::BigUint;

use crate::error::{DfaError, Result};

/// Number of bits needed to write `n` in binary (`0` for `n = 0`).
///
/// ```text
/// 0 -> 0, 1 -> 1, 2 -> 2, 3 -> 2, 4 -> 3
/// ```
pub fn bit_length(n: usize) -> u32 {
    usize::BITS - n.leading_zeros()
}

/// Appends fields most-significant bit first.
#[derive(Debug, Default)]
pub struct BitWriter {
    bits: Vec<bool>,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Writes `value` in exactly `width` bits.
    pub fn push_int(&mut self, value: usize, width: u32) {
        assert!(bit_length(value) <= width, "{} does not fit in {} bits", value, width);
        for i in (0..width).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
    }

    /// Writes `n` as `n` ones followed by a zero.
    pub fn push_unary(&mut self, n: u32) {
        for _ in 0..n {
            self.bits.push(true);
        }
        self.bits.push(false);
    }

    /// The written bits as an integer; the first bit is the most significant.
    pub fn finish(self) -> BigUint {
        let mut value = BigUint::default();
        for (i, &bit) in self.bits.iter().rev().enumerate() {
            if bit {
                value.set_bit(i as u64, true);
            }
        }
        value
    }
}

/// Reads fields most-significant bit first, failing with
/// [`DfaError::MalformedEncoding`] when the input runs out.
#[derive(Debug)]
pub struct BitReader<'a> {
    value: &'a BigUint,
    /// Number of bits not read yet; the next bit is `value.bit(remaining - 1)`.
    remaining: u64,
}

impl<'a> BitReader<'a> {
    /// Reads `value` starting from its most significant bit.
    pub fn new(value: &'a BigUint) -> Self {
        Self {
            value,
            remaining: value.bits(),
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        if self.remaining == 0 {
            return Err(DfaError::malformed("unexpected end of input"));
        }
        self.remaining -= 1;
        Ok(self.value.bit(self.remaining))
    }

    pub fn read_int(&mut self, width: u32) -> Result<usize> {
        if width > usize::BITS {
            return Err(DfaError::malformed(format!("field width {} exceeds {} bits", width, usize::BITS)));
        }
        let mut value = 0usize;
        for _ in 0..width {
            value = (value << 1) | self.read_bit()? as usize;
        }
        Ok(value)
    }

    pub fn read_unary(&mut self) -> Result<u32> {
        let mut n = 0;
        while self.read_bit()? {
            n += 1;
            if n > usize::BITS {
                return Err(DfaError::malformed(format!("unary field exceeds {} bits", usize::BITS)));
            }
        }
        Ok(n)
    }
}
