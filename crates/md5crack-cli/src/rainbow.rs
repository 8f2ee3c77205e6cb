use std::time::Instant;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use md5crack::{build_table_file, lookup_file, with_password_length};

use crate::{Rainbow, RainbowIndex, report};

pub fn rainbow_index(args: RainbowIndex) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, alphabet_size = args.alphabet.len(), "Generating rainbow table");

    let mut rng = StdRng::seed_from_u64(seed);
    let start = Instant::now();

    with_password_length!(args.password_length, N => build_table_file::<N, _>(
        &args.index_file,
        &args.alphabet,
        args.table_width,
        args.table_length,
        &mut rng,
    ))
    .with_context(|| format!("Unable to build the rainbow table '{}'", args.index_file.display()))?;

    info!(elapsed = ?start.elapsed(), "Rainbow table written");
    Ok(())
}

pub fn rainbow(args: Rainbow) -> Result<()> {
    let password = with_password_length!(args.password_length, N => {
        lookup_file::<N>(&args.index_file, &args.hash, &args.alphabet, args.table_width)
            .map(|password| password.map(|p| p.to_vec()))
    })
    .with_context(|| format!("Unable to search the rainbow table '{}'", args.index_file.display()))?;

    report(password);
    Ok(())
}
