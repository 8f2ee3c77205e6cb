//! Table generation workflow
//!
//! This module provides functions for generating chains and building
//! duplicate-free rainbow tables, in memory or directly into a file.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::alphabet::Alphabet;
use crate::domain::chain::{Chain, Password, make_chain};
use crate::domain::reduce::{ReduceFunction, make_reduce_functions};
use crate::error::{Error, Result};
use crate::infra::table_io::MappedTableMut;
use crate::infra::table_sort::{deduplicate_table, sort_table_parallel};

/// Fill every slot of `chains` with a chain from a random startpoint
///
/// Each rayon worker seeds its own generator once from a shared counter
/// starting at `seed`. Which slot receives which startpoint depends on
/// scheduling, so the output is not reproducible from `seed` alone.
pub fn gen_chains<const N: usize>(
    chains: &mut [Chain<N>],
    alphabet: &Alphabet,
    seed: u64,
    functions: &[ReduceFunction<'_, N>],
) {
    let seeds = AtomicU64::new(seed);
    chains.par_iter_mut().for_each_init(
        || StdRng::seed_from_u64(seeds.fetch_add(1, Ordering::Relaxed)),
        |rng, chain| *chain = make_chain(Password::random(alphabet, rng), functions),
    );
}

/// Validate the table parameters and build the reduction functions
fn prepare<const N: usize>(
    alphabet: &Alphabet,
    width: usize,
    length: usize,
) -> Result<Vec<ReduceFunction<'_, N>>> {
    let functions = make_reduce_functions::<N>(alphabet, width)?;

    // More chains than passwords can never have distinct endpoints
    if let Some(space) = alphabet.space(N)
        && length as u128 > space
    {
        return Err(Error::TableTooLong { length, space });
    }

    Ok(functions)
}

fn fill_table<const N: usize, R: Rng + ?Sized>(
    alphabet: &Alphabet,
    functions: &[ReduceFunction<'_, N>],
    table: &mut [Chain<N>],
    rng: &mut R,
) {
    info!(
        chains = table.len(),
        width = functions.len(),
        password_length = N,
        "Building rainbow table"
    );

    gen_chains(table, alphabet, rng.next_u64(), functions);

    let mut pass = 1;
    loop {
        sort_table_parallel(table);
        let unique = deduplicate_table(table);
        if unique == table.len() {
            break;
        }

        debug!(
            pass,
            duplicates = table.len() - unique,
            "Regenerating chains with duplicate endpoints"
        );
        gen_chains(&mut table[unique..], alphabet, rng.next_u64(), functions);
        pass += 1;
    }

    info!(passes = pass, "Rainbow table complete");
}

/// Build a rainbow table in place
///
/// Fills `table` with chains, sorts them by endpoint and regenerates chains
/// sharing an endpoint until every endpoint is distinct.
///
/// # Errors
/// Fails before generating anything if the reduction functions cannot be
/// built for `width` columns, or if `table` is longer than the password space.
pub fn build_table<const N: usize, R: Rng + ?Sized>(
    alphabet: &Alphabet,
    width: usize,
    table: &mut [Chain<N>],
    rng: &mut R,
) -> Result<()> {
    let functions = prepare::<N>(alphabet, width, table.len())?;
    fill_table(alphabet, &functions, table, rng);
    Ok(())
}

/// Build a rainbow table of `length` chains directly into a file
///
/// The file is created or truncated, sized to `length` records and filled
/// through a memory map.
pub fn build_table_file<const N: usize, R: Rng + ?Sized>(
    path: impl AsRef<Path>,
    alphabet: &Alphabet,
    width: usize,
    length: usize,
    rng: &mut R,
) -> Result<()> {
    let functions = prepare::<N>(alphabet, width, length)?;

    let mut table = MappedTableMut::<N>::create(path, length)?;
    fill_table(alphabet, &functions, table.as_mut_slice(), rng);
    table.flush()
}
