//! Rainbow table benchmark: chain generation and lookup
//!
//! - Alphabet: lowercase letters
//! - Password length: 6
//! - Chain width: 256

use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use md5crack::{
    Alphabet, Chain, Password, build_table, compute, gen_chains, lookup, make_reduce_functions,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const WIDTH: usize = 256;
const CHAINS: usize = 4096;

fn rainbow_criterion() -> Criterion {
    Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(10))
}

fn alphabet() -> Alphabet {
    Alphabet::from_pattern("[a-z]").unwrap()
}

fn bench_gen_chains(c: &mut Criterion) {
    let alphabet = alphabet();
    let functions = make_reduce_functions::<6>(&alphabet, WIDTH).unwrap();
    let mut chains = vec![Chain::new(Password([0; 6]), Password([0; 6])); CHAINS];

    c.bench_function("gen_chains_4096x256", |b| {
        b.iter(|| gen_chains(black_box(&mut chains), &alphabet, 0, &functions))
    });
}

fn bench_lookup(c: &mut Criterion) {
    let alphabet = alphabet();
    let mut table = vec![Chain::new(Password([0; 6]), Password([0; 6])); CHAINS];
    let mut rng = StdRng::seed_from_u64(0);
    build_table(&alphabet, WIDTH, &mut table, &mut rng).unwrap();

    // A digest no chain verifies against, so every position is searched
    let missing = compute("0000000");

    c.bench_function("lookup_miss_256", |b| {
        b.iter(|| black_box(lookup(black_box(&missing), &alphabet, WIDTH, &table).unwrap()))
    });
}

criterion_group! {
    name = benches;
    config = rainbow_criterion();
    targets = bench_gen_chains, bench_lookup,
}

criterion_main!(benches);
