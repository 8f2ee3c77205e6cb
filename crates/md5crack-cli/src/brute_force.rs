use std::time::Instant;

use tracing::info;

use crate::{BruteForce, report};

pub fn brute_force(args: BruteForce) {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        alphabet_size = args.alphabet.len(),
        max_length = args.max_password_length,
        "Brute forcing"
    );

    let start = Instant::now();
    let password = md5crack::brute_force(&args.hash, &args.alphabet, args.max_password_length, seed);
    info!(elapsed = ?start.elapsed(), "Search finished");

    report(password);
}
