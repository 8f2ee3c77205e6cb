//! Password alphabets
//!
//! An alphabet is an ordered, duplicate-free set of bytes. Most alphabets are
//! derived from a character-class pattern tested against every ASCII character.

use regex::Regex;

use crate::constants::ASCII_RANGE;
use crate::error::{Error, Result};

/// Ordered set of characters passwords are drawn from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet(Vec<u8>);

impl Alphabet {
    /// Create an alphabet from explicit characters
    ///
    /// Repeated characters keep their first position.
    pub fn new(chars: impl AsRef<[u8]>) -> Result<Self> {
        let mut alphabet = Vec::new();
        for &c in chars.as_ref() {
            if !alphabet.contains(&c) {
                alphabet.push(c);
            }
        }

        if alphabet.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        Ok(Self(alphabet))
    }

    /// Derive an alphabet from a pattern matched against each ASCII character
    ///
    /// The whole one-character string must match, so `[a-c]` yields `abc`
    /// and `[[:digit:]]` yields `0123456789`.
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;

        let mut buf = [0u8; 4];
        let chars: Vec<u8> = (0..ASCII_RANGE)
            .filter(|&c| regex.is_match(char::from(c).encode_utf8(&mut buf)))
            .collect();

        Self::new(chars)
    }

    /// Number of characters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed alphabet
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Character at `index`, panicking when out of range
    #[inline]
    pub fn char_at(&self, index: usize) -> u8 {
        self.0[index]
    }

    pub fn contains(&self, c: u8) -> bool {
        self.0.contains(&c)
    }

    /// Number of distinct passwords of `password_length` characters
    ///
    /// `None` when the count does not fit in 128 bits.
    pub fn space(&self, password_length: usize) -> Option<u128> {
        let size = self.0.len() as u128;
        (0..password_length).try_fold(1u128, |acc, _| acc.checked_mul(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_deduplicates_in_order() {
        let alphabet = Alphabet::new("PASSWORD").unwrap();
        assert_eq!(alphabet.as_bytes(), b"PASWORD");
        assert_eq!(alphabet.len(), 7);
    }

    #[test]
    fn test_new_empty() {
        assert!(matches!(Alphabet::new(""), Err(Error::EmptyAlphabet)));
    }

    #[test]
    fn test_from_pattern_digits() {
        let alphabet = Alphabet::from_pattern("[[:digit:]]").unwrap();
        assert_eq!(alphabet.as_bytes(), b"0123456789");
    }

    #[test]
    fn test_from_pattern_binary() {
        let alphabet = Alphabet::from_pattern("[01]").unwrap();
        assert_eq!(alphabet.as_bytes(), b"01");
    }

    #[test]
    fn test_from_pattern_graph() {
        let alphabet = Alphabet::from_pattern("[[:graph:]]").unwrap();
        // '!' (0x21) through '~' (0x7e)
        assert_eq!(alphabet.len(), 94);
        assert_eq!(alphabet.char_at(0), b'!');
        assert_eq!(alphabet.char_at(93), b'~');
        assert!(!alphabet.contains(b' '));
    }

    #[test]
    fn test_from_pattern_is_anchored() {
        // "bc" can never match a single character
        let alphabet = Alphabet::from_pattern("a|bc").unwrap();
        assert_eq!(alphabet.as_bytes(), b"a");
    }

    #[test]
    fn test_from_pattern_empty_alphabet() {
        assert!(matches!(
            Alphabet::from_pattern("[^\\x00-\\x7f]"),
            Err(Error::EmptyAlphabet)
        ));
    }

    #[test]
    fn test_from_pattern_invalid() {
        assert!(matches!(
            Alphabet::from_pattern("[unclosed"),
            Err(Error::AlphabetPattern(_))
        ));
    }

    #[test]
    fn test_space() {
        let alphabet = Alphabet::new("01").unwrap();
        assert_eq!(alphabet.space(0), Some(1));
        assert_eq!(alphabet.space(8), Some(256));

        let wide = Alphabet::from_pattern("[\\x00-\\x7f]").unwrap();
        assert_eq!(wide.len(), 128);
        assert_eq!(wide.space(15), Some(1u128 << 105));
        assert_eq!(wide.space(19), None);
    }
}
