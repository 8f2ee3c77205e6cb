//! Table sort operations
//!
//! This module provides functions for sorting rainbow table chains by
//! endpoint and compacting duplicate endpoints.

use crate::domain::chain::{Chain, compare, equal, less};
use rayon::prelude::*;

/// Sort chains by endpoint using a parallel unstable sort
pub fn sort_table_parallel<const N: usize>(chains: &mut [Chain<N>]) {
    chains.par_sort_unstable_by(|a, b| compare::<N>(a, b));
}

/// Deduplicate a sorted table in place
///
/// Keeps the first chain of every run of equal endpoints at the front,
/// preserving order, and moves the rest to the tail.
///
/// # Returns
/// The number of chains with distinct endpoints. `chains[count..]` holds the
/// duplicates, which the caller is expected to overwrite.
pub fn deduplicate_table<const N: usize>(chains: &mut [Chain<N>]) -> usize {
    if chains.is_empty() {
        return 0;
    }

    let mut write_idx = 1;
    for read_idx in 1..chains.len() {
        if !equal::<N>(&chains[read_idx], &chains[write_idx - 1]) {
            chains.swap(write_idx, read_idx);
            write_idx += 1;
        }
    }

    write_idx
}

/// Check the table invariant: strictly increasing endpoints
pub fn is_sorted_unique<const N: usize>(chains: &[Chain<N>]) -> bool {
    chains.windows(2).all(|w| less::<N>(&w[0], &w[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::Password;

    fn chain(endpoint: &str, startpoint: &str) -> Chain<4> {
        Chain::new(
            Password::from_slice(endpoint.as_bytes()).unwrap(),
            Password::from_slice(startpoint.as_bytes()).unwrap(),
        )
    }

    // =========================================================================
    // sort_table_parallel tests
    // =========================================================================

    #[test]
    fn test_sort_table_parallel_empty() {
        let mut chains: Vec<Chain<4>> = vec![];
        sort_table_parallel(&mut chains);
        assert!(chains.is_empty());
    }

    #[test]
    fn test_sort_table_parallel_ordering() {
        let mut chains = vec![
            chain("cccc", "0001"),
            chain("aaaa", "0002"),
            chain("bbbb", "0003"),
            chain("abab", "0004"),
        ];

        sort_table_parallel(&mut chains);

        let endpoints: Vec<&[u8]> = chains.iter().map(|c| c.endpoint.as_bytes()).collect();
        assert_eq!(endpoints, vec![b"aaaa", b"abab", b"bbbb", b"cccc"]);
        assert!(is_sorted_unique(&chains));
    }

    #[test]
    fn test_sort_ignores_startpoint() {
        let mut chains = vec![chain("bbbb", "0000"), chain("aaaa", "9999")];
        sort_table_parallel(&mut chains);
        assert_eq!(chains[0].startpoint.as_bytes(), b"9999");
    }

    #[test]
    fn test_sorted_table_searchable_by_password() {
        let mut chains = vec![
            chain("dddd", "0001"),
            chain("bbbb", "0002"),
            chain("cccc", "0003"),
        ];
        sort_table_parallel(&mut chains);

        let target = Password::from_slice(b"cccc").unwrap();
        let i = chains.partition_point(|c| less(c, &target));
        assert_eq!(i, 1);
        assert!(equal(&chains[i], &target));
        assert_eq!(chains[i].startpoint.as_bytes(), b"0003");
    }

    // =========================================================================
    // deduplicate tests
    // =========================================================================

    #[test]
    fn test_deduplicate_empty() {
        let mut chains: Vec<Chain<4>> = vec![];
        assert_eq!(deduplicate_table(&mut chains), 0);
    }

    #[test]
    fn test_deduplicate_single() {
        let mut chains = vec![chain("aaaa", "0000")];
        assert_eq!(deduplicate_table(&mut chains), 1);
    }

    #[test]
    fn test_deduplicate_no_duplicates() {
        let mut chains = vec![
            chain("aaaa", "0000"),
            chain("bbbb", "1111"),
            chain("cccc", "2222"),
        ];
        let before = chains.clone();
        assert_eq!(deduplicate_table(&mut chains), 3);
        assert_eq!(chains, before);
    }

    #[test]
    fn test_deduplicate_moves_duplicates_to_tail() {
        let mut chains = vec![
            chain("aaaa", "0001"),
            chain("aaaa", "0002"),
            chain("bbbb", "0003"),
            chain("bbbb", "0004"),
            chain("bbbb", "0005"),
            chain("cccc", "0006"),
        ];

        let unique = deduplicate_table(&mut chains);

        assert_eq!(unique, 3);
        assert!(is_sorted_unique(&chains[..unique]));
        let heads: Vec<&[u8]> = chains[..unique].iter().map(|c| c.startpoint.as_bytes()).collect();
        assert_eq!(heads, vec![b"0001", b"0003", b"0006"]);
        assert_eq!(chains.len(), 6);
    }

    #[test]
    fn test_is_sorted_unique_rejects_duplicates() {
        let chains = vec![chain("aaaa", "0001"), chain("aaaa", "0002")];
        assert!(!is_sorted_unique(&chains));
        assert!(is_sorted_unique::<4>(&[]));
    }
}
