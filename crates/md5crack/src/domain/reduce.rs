//! Reduction functions
//!
//! A reduction function maps a digest back into password space. Each rainbow
//! table column uses its own index so that equal digests in different columns
//! reduce to different passwords.

use crate::domain::alphabet::Alphabet;
use crate::domain::chain::Password;
use crate::domain::md5::Digest;
use crate::error::{Error, Result};

/// Reduction function for one table column
#[derive(Clone, Copy, Debug)]
pub struct ReduceFunction<'a, const N: usize> {
    alphabet: &'a Alphabet,
    index: u128,
    /// `alphabet.len()^N`, or `None` when it exceeds 128 bits
    space: Option<u128>,
}

impl<'a, const N: usize> ReduceFunction<'a, N> {
    /// Create the reduction function for column `index`
    ///
    /// Fails when `index` is not smaller than the number of passwords of
    /// length `N`, since larger indices would alias smaller ones.
    pub fn new(alphabet: &'a Alphabet, index: usize) -> Result<Self> {
        let space = alphabet.space(N);
        if let Some(space) = space
            && index as u128 >= space
        {
            return Err(Error::ReductionIndex {
                index,
                alphabet_size: alphabet.len(),
                password_length: N,
            });
        }

        Ok(Self {
            alphabet,
            index: index as u128,
            space,
        })
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Reduce a digest to a password
    ///
    /// The digest is read as a 128-bit integer, offset by the column index,
    /// folded into password space and written out base `alphabet.len()`,
    /// least significant digit first.
    pub fn reduce(&self, digest: &Digest) -> Password<N> {
        let mut encoded = digest.to_u128().wrapping_add(self.index);
        if let Some(space) = self.space {
            encoded %= space;
        }

        let base = self.alphabet.len() as u128;
        let mut password = [0u8; N];
        for c in password.iter_mut() {
            *c = self.alphabet.char_at((encoded % base) as usize);
            encoded /= base;
        }
        Password(password)
    }
}

/// Build the `width` reduction functions of a table, in column order
pub fn make_reduce_functions<const N: usize>(
    alphabet: &Alphabet,
    width: usize,
) -> Result<Vec<ReduceFunction<'_, N>>> {
    (0..width)
        .map(|index| ReduceFunction::new(alphabet, index))
        .collect()
}
