//! Search workflow implementation
//!
//! This module provides functions for recovering a password from its digest
//! using a sorted rainbow table.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::alphabet::Alphabet;
use crate::domain::chain::{Chain, Password, equal, less, verify_chain, walk_from_digest};
use crate::domain::md5::Digest;
use crate::domain::reduce::{ReduceFunction, make_reduce_functions};
use crate::error::Result;
use crate::infra::table_io::MappedTable;

/// Look up a digest in a sorted rainbow table
///
/// Every chain position is tried in parallel, but the password returned is
/// always the one found at the latest column (lowest position `i`), and for
/// equal positions the first in table order.
///
/// # Arguments
/// * `target` - The digest to invert
/// * `alphabet` - The alphabet the table was built with
/// * `width` - The number of columns the table was built with
/// * `table` - Chains sorted by endpoint
///
/// # Returns
/// `Ok(None)` if no chain verifies against `target`
pub fn lookup<const N: usize>(
    target: &Digest,
    alphabet: &Alphabet,
    width: usize,
    table: &[Chain<N>],
) -> Result<Option<Password<N>>> {
    let functions = make_reduce_functions::<N>(alphabet, width)?;

    let found = (1..=width)
        .into_par_iter()
        .find_map_first(|i| search_position(target, i, &functions, table));

    Ok(found)
}

/// Look up a digest in a rainbow table file
pub fn lookup_file<const N: usize>(
    path: impl AsRef<Path>,
    target: &Digest,
    alphabet: &Alphabet,
    width: usize,
) -> Result<Option<Password<N>>> {
    let table = MappedTable::<N>::open(path)?;
    info!(chains = table.len(), width, "Searching rainbow table");

    let found = lookup(target, alphabet, width, table.as_slice())?;
    if found.is_none() {
        debug!(%target, "Digest not covered by the table");
    }
    Ok(found)
}

/// Search assuming the target sits `i` columns before the end of a chain
fn search_position<const N: usize>(
    target: &Digest,
    i: usize,
    functions: &[ReduceFunction<'_, N>],
    table: &[Chain<N>],
) -> Option<Password<N>> {
    let column = functions.len() - i;

    // Step 1: Walk from the target to the hypothetical endpoint
    let endpoint = walk_from_digest(target, &functions[column..])?;

    // Step 2: Verify every chain ending there
    binary_search_by_endpoint(table, &endpoint)
        .iter()
        .find_map(|chain| verify_chain(chain.startpoint, &functions[..column], target))
}

/// Equal range of chains whose endpoint is `endpoint`
fn binary_search_by_endpoint<'t, const N: usize>(
    table: &'t [Chain<N>],
    endpoint: &Password<N>,
) -> &'t [Chain<N>] {
    let start = table.partition_point(|chain| less::<N>(chain, endpoint));
    let len = table[start..].partition_point(|chain| equal::<N>(chain, endpoint));
    &table[start..start + len]
}
