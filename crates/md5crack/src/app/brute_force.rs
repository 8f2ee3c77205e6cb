//! Parallel brute force enumeration

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::domain::alphabet::Alphabet;
use crate::domain::md5::{Digest, compute};

/// Visit every password up to `max_length` characters
///
/// The empty password is visited first. The remaining passwords are visited
/// depth-first, starting from the shuffled first characters split into one
/// chunk per rayon thread. Each worker seeds its own generator from a counter
/// starting at `seed` and shuffles the characters again at every level.
///
/// Enumeration stops everywhere as soon as `visitor` returns `true`.
///
/// # Returns
/// `true` if the visitor accepted a password
pub fn visit_all_passwords<F>(
    alphabet: &Alphabet,
    max_length: usize,
    seed: u64,
    visitor: F,
) -> bool
where
    F: Fn(&[u8]) -> bool + Sync,
{
    if visitor(&[][..]) {
        return true;
    }
    if max_length == 0 {
        return false;
    }

    let mut first_chars = alphabet.as_bytes().to_vec();
    first_chars.shuffle(&mut StdRng::seed_from_u64(seed));

    let chunk_size = (first_chars.len() / rayon::current_num_threads()).max(1);
    debug!(chunk_size, max_length, "Enumerating passwords");

    let seeds = AtomicU64::new(seed);
    let found = AtomicBool::new(false);

    first_chars.par_chunks(chunk_size).for_each(|chunk| {
        let mut rng = StdRng::seed_from_u64(seeds.fetch_add(1, Ordering::Relaxed));
        let mut prefix = Vec::with_capacity(max_length);

        for &c in chunk {
            if found.load(Ordering::Relaxed) {
                break;
            }
            prefix.push(c);
            visit_from(&mut prefix, alphabet.as_bytes(), max_length, &visitor, &found, &mut rng);
            prefix.pop();
        }
    });

    found.into_inner()
}

fn visit_from<F, R>(
    prefix: &mut Vec<u8>,
    chars: &[u8],
    max_length: usize,
    visitor: &F,
    found: &AtomicBool,
    rng: &mut R,
) where
    F: Fn(&[u8]) -> bool,
    R: Rng,
{
    if visitor(prefix.as_slice()) {
        found.store(true, Ordering::Relaxed);
        return;
    }
    if prefix.len() == max_length {
        return;
    }

    let mut next_chars = chars.to_vec();
    next_chars.shuffle(rng);
    for c in next_chars {
        if found.load(Ordering::Relaxed) {
            break;
        }
        prefix.push(c);
        visit_from(prefix, chars, max_length, visitor, found, rng);
        prefix.pop();
    }
}

/// Find a password of at most `max_length` characters hashing to `target`
pub fn brute_force(
    target: &Digest,
    alphabet: &Alphabet,
    max_length: usize,
    seed: u64,
) -> Option<Vec<u8>> {
    let password = OnceLock::new();

    visit_all_passwords(alphabet, max_length, seed, |candidate| {
        if compute(candidate) != *target {
            return false;
        }
        let _ = password.set(candidate.to_vec());
        true
    });

    password.into_inner()
}
