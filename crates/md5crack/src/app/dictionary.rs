//! Dictionary attack workflow
//!
//! A dictionary index maps the digest of every entry of a delimited password
//! file to the entry's byte offset. Looking up a digest is then a binary search
//! in the index followed by a single read from the password file.

use std::path::Path;

use tracing::{debug, info};

use crate::domain::md5::{Digest, compute};
use crate::error::Result;
use crate::infra::index_io::{
    IndexRecord, MappedIndex, MappedPasswords, save_index, sort_index_file,
};

/// Build the digest index of a password file
///
/// Records are written to `index_path` in file order, then sorted in place
/// through a memory map.
///
/// # Returns
/// The number of indexed passwords
pub fn build_index(
    passwords_path: impl AsRef<Path>,
    index_path: impl AsRef<Path>,
    delimiter: u8,
) -> Result<usize> {
    let passwords = MappedPasswords::open(passwords_path)?;
    let index_path = index_path.as_ref();

    let count = save_index(
        index_path,
        passwords
            .entries(delimiter)
            .map(|(offset, password)| IndexRecord {
                digest: compute(password),
                offset,
            }),
    )?;
    debug!(entries = count, "Hashed password file");

    sort_index_file(index_path)?;

    info!(entries = count, "Dictionary index written");
    Ok(count)
}

/// Look up a digest through a dictionary index
///
/// Returns the first password of the file (by offset) hashing to `target`,
/// or `None` if the password file does not contain one.
pub fn lookup_index(
    passwords_path: impl AsRef<Path>,
    index_path: impl AsRef<Path>,
    target: &Digest,
    delimiter: u8,
) -> Result<Option<Vec<u8>>> {
    let index = MappedIndex::open(index_path)?;
    let Some(record) = index.find(target) else {
        return Ok(None);
    };

    let passwords = MappedPasswords::open(passwords_path)?;
    Ok(passwords
        .entry_at(record.offset, delimiter)
        .map(<[u8]>::to_vec))
}
