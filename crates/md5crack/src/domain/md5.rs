//! MD5 hash primitive
//!
//! A streaming implementation of RFC 1321. `Md5::add` consumes whole 64-byte
//! blocks, `Md5::finish` pads and closes the computation and leaves the
//! instance ready for the next one.

use std::fmt;
use std::str::FromStr;

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use crate::constants::{BLOCK_SIZE, DIGEST_HEX_LEN, LENGTH_OFFSET};

#[rustfmt::skip]
const SHIFTS: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22,
    5,  9, 14, 20, 5,  9, 14, 20, 5,  9, 14, 20, 5,  9, 14, 20,
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23,
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

// floor(2^32 * |sin(i + 1)|)
#[rustfmt::skip]
const SINES: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

const INIT_STATE: [u32; 4] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476];

/// A 128-bit MD5 digest, stored as the four state words
///
/// Ordering is lexicographic over the words (word 0 first), which is the
/// sort order of the dictionary index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Digest(pub [u32; 4]);

impl Digest {
    /// The digest bytes in their canonical order (each word little-endian)
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        LittleEndian::write_u32_into(&self.0, &mut bytes);
        bytes
    }

    /// Inverse of [`Digest::to_bytes`]
    pub fn from_bytes(bytes: &[u8; 16]) -> Self {
        let mut words = [0u32; 4];
        LittleEndian::read_u32_into(bytes, &mut words);
        Self(words)
    }

    /// The digest as an unsigned 128-bit integer, word 0 least significant
    pub fn to_u128(&self) -> u128 {
        u128::from_le_bytes(self.to_bytes())
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::UpperHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

/// Digest text parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDigestError {
    #[error("Expected MD5 sum of 32 hex characters, found {0} bytes")]
    Length(usize),

    #[error("Invalid hex character {character:?} at position {position}")]
    Character { character: char, position: usize },
}

impl FromStr for Digest {
    type Err = ParseDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(ParseDigestError::Length(s.len()));
        }

        let mut bytes = [0u8; 16];
        for (position, character) in s.char_indices() {
            let nibble = character
                .to_digit(16)
                .ok_or(ParseDigestError::Character { character, position })?;
            let shift = if position % 2 == 0 { 4 } else { 0 };
            bytes[position / 2] |= (nibble as u8) << shift;
        }

        Ok(Self::from_bytes(&bytes))
    }
}

/// Streaming MD5 state
///
/// Cheap to construct; concurrent computations each own one.
#[derive(Clone, Debug)]
pub struct Md5 {
    /// Message length in bits consumed so far
    len: u64,
    state: [u32; 4],
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}

impl Md5 {
    pub fn new() -> Self {
        Self {
            len: 0,
            state: INIT_STATE,
        }
    }

    /// Consume every whole 64-byte block of `data`
    ///
    /// Returns the unconsumed tail, which must be handed back to a later
    /// `add` (prefixed to further data) or to `finish`.
    pub fn add<'a>(&mut self, data: &'a [u8]) -> &'a [u8] {
        let mut blocks = data.chunks_exact(BLOCK_SIZE);
        for block in &mut blocks {
            self.compress(block);
            self.len = self.len.wrapping_add(8 * BLOCK_SIZE as u64);
        }
        blocks.remainder()
    }

    /// Pad, process the final block(s) and return the digest
    ///
    /// The instance is reset to its initial state and can be reused.
    pub fn finish(&mut self, data: &[u8]) -> Digest {
        let rest = self.add(data);
        self.len = self.len.wrapping_add(8 * rest.len() as u64);

        let mut pad = [0u8; BLOCK_SIZE];
        pad[..rest.len()].copy_from_slice(rest);
        pad[rest.len()] = 0x80;

        // No room left for the length field: flush an extra block
        if rest.len() + 1 > LENGTH_OFFSET {
            self.compress(&pad);
            pad = [0u8; BLOCK_SIZE];
        }

        pad[LENGTH_OFFSET..].copy_from_slice(&self.len.to_le_bytes());
        self.compress(&pad);

        self.len = 0;
        Digest(std::mem::replace(&mut self.state, INIT_STATE))
    }

    fn compress(&mut self, block: &[u8]) {
        let mut m = [0u32; 16];
        LittleEndian::read_u32_into(block, &mut m);

        let [mut a, mut b, mut c, mut d] = self.state;

        for i in 0..64 {
            let (f, g) = match i {
                0..=15 => ((b & c) | (!b & d), i),
                16..=31 => ((d & b) | (!d & c), (5 * i + 1) % 16),
                32..=47 => (b ^ c ^ d, (3 * i + 5) % 16),
                _ => (c ^ (b | !d), (7 * i) % 16),
            };

            let f = f
                .wrapping_add(a)
                .wrapping_add(SINES[i])
                .wrapping_add(m[g]);
            a = d;
            d = c;
            c = b;
            b = b.wrapping_add(f.rotate_left(SHIFTS[i]));
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
    }
}

/// Compute the digest of a complete message
#[inline]
pub fn compute(data: impl AsRef<[u8]>) -> Digest {
    Md5::new().finish(data.as_ref())
}
