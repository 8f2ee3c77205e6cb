//! Shared constants
//!
//! Note: MD5 round tables live in domain/md5.rs next to the compression function.

// =============================================================================
// Hash primitive
// =============================================================================

/// MD5 block size in bytes
pub const BLOCK_SIZE: usize = 64;

/// Offset of the bit-length field inside the final padded block
pub const LENGTH_OFFSET: usize = 56;

/// Number of hex characters in a textual digest
pub const DIGEST_HEX_LEN: usize = 32;

// =============================================================================
// Passwords and alphabets
// =============================================================================

/// Smallest password length accepted at the command line
pub const MIN_PASSWORD_LENGTH: u8 = 4;

/// Largest password length accepted at the command line
pub const MAX_PASSWORD_LENGTH: u8 = 15;

/// Number of candidate characters tested against an alphabet pattern
pub const ASCII_RANGE: u8 = 128;

/// Alphabet pattern used when none is given (printable, non-space ASCII)
pub const DEFAULT_ALPHABET_PATTERN: &str = "[[:graph:]]";

// =============================================================================
// File formats
// =============================================================================

/// Byte size of a chain record for a given password length
pub const fn chain_record_size(password_length: usize) -> usize {
    2 * password_length
}

/// Byte size of a dictionary index record (four digest words + u64 offset)
pub const INDEX_RECORD_SIZE: usize = 24;

/// Default delimiter between entries of a password list
pub const PASSWORD_DELIMITER: u8 = b'\n';
