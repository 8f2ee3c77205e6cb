//! Chain operations implementation
//!
//! This module provides the password and chain record types and the
//! hash → reduce walks used for chain generation and verification.

use std::cmp::Ordering;
use std::fmt;

use bytemuck::{Pod, Zeroable};
use rand::Rng;

use crate::domain::alphabet::Alphabet;
use crate::domain::md5::{Digest, Md5};
use crate::domain::reduce::ReduceFunction;

/// Fixed-length password
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Password<const N: usize>(pub [u8; N]);

// SAFETY: a transparent wrapper around a byte array; every bit pattern is valid.
unsafe impl<const N: usize> Zeroable for Password<N> {}
unsafe impl<const N: usize> Pod for Password<N> {}

impl<const N: usize> Password<N> {
    /// Draw `N` uniformly random characters from `alphabet`
    pub fn random<R: Rng>(alphabet: &Alphabet, rng: &mut R) -> Self {
        Self(std::array::from_fn(|_| {
            alphabet.char_at(rng.gen_range(0..alphabet.len()))
        }))
    }

    /// Copy a slice of exactly `N` bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    #[inline]
    pub fn digest(&self, md5: &mut Md5) -> Digest {
        md5.finish(&self.0)
    }
}

impl<const N: usize> AsRef<[u8]> for Password<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> fmt::Display for Password<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl<const N: usize> fmt::Debug for Password<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password({:?})", String::from_utf8_lossy(&self.0))
    }
}

/// Chain record
///
/// File format: (endpoint, startpoint), `N` bytes each, no padding.
/// Sort order: endpoint ascending, which is why the endpoint comes first.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chain<const N: usize> {
    /// Password after every reduction column has been applied
    pub endpoint: Password<N>,
    /// Password the chain was generated from
    pub startpoint: Password<N>,
}

// SAFETY: `repr(C)` over two byte arrays has alignment 1 and no padding.
unsafe impl<const N: usize> Zeroable for Chain<N> {}
unsafe impl<const N: usize> Pod for Chain<N> {}

impl<const N: usize> Chain<N> {
    pub fn new(endpoint: Password<N>, startpoint: Password<N>) -> Self {
        Self {
            endpoint,
            startpoint,
        }
    }
}

/// Anything that can be ordered in a table by its endpoint
///
/// Lets a bare password be compared against chains without building a chain.
pub trait Endpoint<const N: usize> {
    fn endpoint(&self) -> &Password<N>;
}

impl<const N: usize> Endpoint<N> for Chain<N> {
    fn endpoint(&self) -> &Password<N> {
        &self.endpoint
    }
}

impl<const N: usize> Endpoint<N> for Password<N> {
    fn endpoint(&self) -> &Password<N> {
        self
    }
}

/// Table order: strictly less by endpoint
pub fn less<const N: usize>(lhs: &impl Endpoint<N>, rhs: &impl Endpoint<N>) -> bool {
    lhs.endpoint() < rhs.endpoint()
}

/// Table equivalence: neither is less than the other
pub fn equal<const N: usize>(lhs: &impl Endpoint<N>, rhs: &impl Endpoint<N>) -> bool {
    !less(lhs, rhs) && !less(rhs, lhs)
}

/// Three-way comparison derived from [`less`], for sorting
pub fn compare<const N: usize>(lhs: &impl Endpoint<N>, rhs: &impl Endpoint<N>) -> Ordering {
    if less(lhs, rhs) {
        Ordering::Less
    } else if less(rhs, lhs) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Apply `functions` in order to `password`, hashing before each reduction
pub fn walk<const N: usize>(
    password: Password<N>,
    functions: &[ReduceFunction<'_, N>],
) -> Password<N> {
    let mut md5 = Md5::new();
    functions
        .iter()
        .fold(password, |password, f| f.reduce(&password.digest(&mut md5)))
}

/// Walk from a digest instead of a password
///
/// The first function reduces `digest` directly. Returns `None` when
/// `functions` is empty since no password is produced.
pub fn walk_from_digest<const N: usize>(
    digest: &Digest,
    functions: &[ReduceFunction<'_, N>],
) -> Option<Password<N>> {
    let (first, rest) = functions.split_first()?;
    Some(walk(first.reduce(digest), rest))
}

/// Compute a single chain from a given startpoint
pub fn make_chain<const N: usize>(
    startpoint: Password<N>,
    functions: &[ReduceFunction<'_, N>],
) -> Chain<N> {
    Chain {
        endpoint: walk(startpoint, functions),
        startpoint,
    }
}

/// Verify a chain candidate
///
/// Walks from `startpoint` through `functions` (the columns before the
/// hypothesised position) and checks that the password reached hashes to
/// `target`.
///
/// # Returns
/// `Some(password)` if the hash matches, `None` otherwise
pub fn verify_chain<const N: usize>(
    startpoint: Password<N>,
    functions: &[ReduceFunction<'_, N>],
    target: &Digest,
) -> Option<Password<N>> {
    let password = walk(startpoint, functions);
    (password.digest(&mut Md5::new()) == *target).then_some(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::chain_record_size;
    use crate::domain::md5::compute;
    use crate::domain::reduce::make_reduce_functions;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pw<const N: usize>(s: &str) -> Password<N> {
        Password::from_slice(s.as_bytes()).unwrap()
    }

    #[test]
    fn test_chain_size() {
        assert_eq!(std::mem::size_of::<Chain<8>>(), chain_record_size(8));
        assert_eq!(std::mem::size_of::<Chain<15>>(), chain_record_size(15));
        assert_eq!(std::mem::align_of::<Chain<8>>(), 1);
    }

    #[test]
    fn test_chain_bytes_endpoint_first() {
        let chain = Chain::new(pw::<4>("EEEE"), pw::<4>("SSSS"));
        assert_eq!(bytemuck::bytes_of(&chain), b"EEEESSSS");
    }

    #[test]
    fn test_password_from_slice_wrong_length() {
        assert!(Password::<8>::from_slice(b"short").is_none());
        assert_eq!(pw::<5>("short").to_string(), "short");
    }

    #[test]
    fn test_password_random_within_alphabet() {
        let alphabet = Alphabet::new("xyz").unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let password = Password::<10>::random(&alphabet, &mut rng);
            assert!(password.as_bytes().iter().all(|&c| alphabet.contains(c)));
        }
    }

    #[test]
    fn test_compare_two_chains() {
        let c1 = Chain::new(pw::<8>("10000000"), pw::<8>("00000001"));
        let c2 = Chain::new(pw::<8>("10000001"), pw::<8>("00000000"));

        assert!(less(&c1, &c2));
        assert!(!less(&c1, &c1));
        assert!(!less(&c2, &c2));
        assert!(!less(&c2, &c1));
        assert!(equal(&c1, &c1));
        assert!(equal(&c2, &c2));
        assert!(!equal(&c1, &c2));
        assert!(!equal(&c2, &c1));
    }

    #[test]
    fn test_compare_chain_and_password() {
        let c = Chain::new(pw::<8>("10000000"), pw::<8>("00000001"));
        let p = pw::<8>("10000001");

        assert!(less(&c, &p));
        assert!(!less(&c, &c));
        assert!(!less(&p, &c));
        // Only the endpoint takes part in the comparison
        assert!(equal(&c, &pw::<8>("10000000")));
    }

    #[test]
    fn test_compare_follows_less() {
        let c = Chain::new(pw::<4>("bbbb"), pw::<4>("zzzz"));

        assert_eq!(compare(&c, &pw::<4>("cccc")), Ordering::Less);
        assert_eq!(compare(&c, &pw::<4>("aaaa")), Ordering::Greater);
        assert_eq!(compare(&c, &pw::<4>("bbbb")), Ordering::Equal);
    }

    #[test]
    fn test_make_chain_matches_manual_walk() {
        let alphabet = Alphabet::new("01").unwrap();
        let functions = make_reduce_functions::<8>(&alphabet, 32).unwrap();
        let init = pw::<8>("00000000");

        let mut expected = init;
        for f in &functions {
            expected = f.reduce(&compute(expected));
        }

        let chain = make_chain(init, &functions);
        assert_eq!(chain.endpoint, expected);
        assert_eq!(chain.startpoint, init);
        assert_ne!(chain.endpoint, chain.startpoint);
    }

    #[test]
    fn test_make_chain_deterministic() {
        let alphabet = Alphabet::new("abcdefgh").unwrap();
        let functions = make_reduce_functions::<6>(&alphabet, 100).unwrap();
        let init = pw::<6>("abcdef");
        assert_eq!(make_chain(init, &functions), make_chain(init, &functions));
    }

    #[test]
    fn test_make_chain_without_functions() {
        let init = pw::<4>("abcd");
        let chain = make_chain::<4>(init, &[]);
        assert_eq!(chain.endpoint, init);
    }

    #[test]
    fn test_walk_from_digest() {
        let alphabet = Alphabet::new("01").unwrap();
        let functions = make_reduce_functions::<8>(&alphabet, 4).unwrap();
        let digest = compute("abc");

        let expected = functions[3].reduce(&compute(functions[2].reduce(&digest)));
        assert_eq!(walk_from_digest(&digest, &functions[2..]), Some(expected));
        assert_eq!(walk_from_digest::<8>(&digest, &[]), None);
    }

    #[test]
    fn test_verify_chain_at_start() {
        let init = pw::<8>("01010101");
        let target = compute(init);

        assert_eq!(verify_chain::<8>(init, &[], &target), Some(init));
    }

    #[test]
    fn test_verify_chain_later_column() {
        let alphabet = Alphabet::new("01").unwrap();
        let functions = make_reduce_functions::<8>(&alphabet, 16).unwrap();
        let init = pw::<8>("00110011");

        // Manually trace the chain to column 5
        let mut password = init;
        for f in &functions[..5] {
            password = f.reduce(&compute(password));
        }
        let target = compute(password);

        assert_eq!(verify_chain(init, &functions[..5], &target), Some(password));
        assert_eq!(verify_chain(init, &functions[..5], &compute("other")), None);
    }
}
