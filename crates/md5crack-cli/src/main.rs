mod brute_force;
mod dictionary;
mod rainbow;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, value_parser};
use tracing_subscriber::EnvFilter;

use md5crack::constants::{DEFAULT_ALPHABET_PATTERN, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use md5crack::{Alphabet, Digest};

/// Recover passwords from MD5 digests by brute force, dictionary or rainbow table.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Index(Index),
    RainbowIndex(RainbowIndex),
    BruteForce(BruteForce),
    Dictionary(Dictionary),
    Rainbow(Rainbow),
}

/// Build a dictionary index from a password file.
#[derive(Args)]
pub struct Index {
    /// The index file to write.
    #[arg(long)]
    index_file: PathBuf,

    /// The password file, one password per line.
    #[arg(long)]
    password_file: PathBuf,
}

/// Build a rainbow table.
#[derive(Args)]
pub struct RainbowIndex {
    /// The rainbow table file to write.
    #[arg(long)]
    index_file: PathBuf,

    /// Pattern selecting the ASCII characters passwords are made of.
    #[arg(long = "alphabet-regex", value_parser = Alphabet::from_pattern, default_value = DEFAULT_ALPHABET_PATTERN)]
    alphabet: Alphabet,

    /// The length of every password in the table.
    #[arg(long, value_parser = value_parser!(u8).range(MIN_PASSWORD_LENGTH as i64..=MAX_PASSWORD_LENGTH as i64))]
    password_length: u8,

    /// The number of reduction columns per chain.
    #[arg(long)]
    table_width: usize,

    /// The number of chains in the table.
    #[arg(long)]
    table_length: usize,

    /// Seed for the startpoint generator, random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

/// Find a password by trying every candidate up to a maximum length.
#[derive(Args)]
pub struct BruteForce {
    /// The digest to invert, in hexadecimal.
    #[arg(long)]
    hash: Digest,

    /// Pattern selecting the ASCII characters passwords are made of.
    #[arg(long = "alphabet-regex", value_parser = Alphabet::from_pattern, default_value = DEFAULT_ALPHABET_PATTERN)]
    alphabet: Alphabet,

    /// The longest password to try.
    #[arg(long)]
    max_password_length: usize,

    /// Seed for the enumeration order, random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

/// Look up a digest in a dictionary index.
#[derive(Args)]
pub struct Dictionary {
    /// The digest to invert, in hexadecimal.
    #[arg(long)]
    hash: Digest,

    /// The index file built from the password file.
    #[arg(long)]
    index_file: PathBuf,

    /// The password file the index was built from.
    #[arg(long)]
    password_file: PathBuf,
}

/// Look up a digest in a rainbow table.
#[derive(Args)]
pub struct Rainbow {
    /// The digest to invert, in hexadecimal.
    #[arg(long)]
    hash: Digest,

    /// The rainbow table file.
    #[arg(long)]
    index_file: PathBuf,

    /// Pattern selecting the ASCII characters the table was built with.
    #[arg(long = "alphabet-regex", value_parser = Alphabet::from_pattern, default_value = DEFAULT_ALPHABET_PATTERN)]
    alphabet: Alphabet,

    /// The password length the table was built with.
    #[arg(long, value_parser = value_parser!(u8).range(MIN_PASSWORD_LENGTH as i64..=MAX_PASSWORD_LENGTH as i64))]
    password_length: u8,

    /// The number of reduction columns the table was built with.
    #[arg(long)]
    table_width: usize,
}

/// Print a recovered password on stdout, or note the miss on stderr
fn report(password: Option<impl AsRef<[u8]>>) {
    match password {
        Some(password) => println!("{}", String::from_utf8_lossy(password.as_ref())),
        None => tracing::info!("No password found for the given digest"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.commands {
        Commands::Index(args) => dictionary::index(args)?,
        Commands::RainbowIndex(args) => rainbow::rainbow_index(args)?,
        Commands::BruteForce(args) => brute_force::brute_force(args),
        Commands::Dictionary(args) => dictionary::dictionary(args)?,
        Commands::Rainbow(args) => rainbow::rainbow(args)?,
    }

    Ok(())
}
