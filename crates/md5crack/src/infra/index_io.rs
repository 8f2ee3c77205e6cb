//! Dictionary index file I/O
//!
//! Index file format: a sorted array of 24-byte records, each the four digest
//! words followed by the byte offset of the password in the password file, all
//! little-endian.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use memmap2::{Mmap, MmapMut};
use rayon::prelude::*;

use crate::constants::INDEX_RECORD_SIZE;
use crate::domain::md5::Digest;
use crate::error::{Error, Result};

/// Digest of a password and where the password starts in the password file
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexRecord {
    pub digest: Digest,
    pub offset: u64,
}

impl IndexRecord {
    fn decode(bytes: &[u8]) -> Self {
        let mut words = [0u32; 4];
        LittleEndian::read_u32_into(&bytes[..16], &mut words);
        Self {
            digest: Digest(words),
            offset: LittleEndian::read_u64(&bytes[16..INDEX_RECORD_SIZE]),
        }
    }
}

/// Save index records to a file, in the order given
///
/// Records are streamed through a buffered writer.
///
/// # Returns
/// The number of records written
pub fn save_index(
    path: impl AsRef<Path>,
    records: impl IntoIterator<Item = IndexRecord>,
) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).map_err(Error::io(path))?;
    let mut writer = BufWriter::new(file);

    let mut count = 0;
    for record in records {
        for word in record.digest.0 {
            writer
                .write_u32::<LittleEndian>(word)
                .map_err(Error::io(path))?;
        }
        writer
            .write_u64::<LittleEndian>(record.offset)
            .map_err(Error::io(path))?;
        count += 1;
    }

    writer.flush().map_err(Error::io(path))?;
    Ok(count)
}

fn record_count(path: &Path, size: u64) -> Result<usize> {
    if size % INDEX_RECORD_SIZE as u64 != 0 {
        return Err(Error::InvalidFileSize {
            path: path.to_path_buf(),
            size,
            record_size: INDEX_RECORD_SIZE,
        });
    }
    Ok((size / INDEX_RECORD_SIZE as u64) as usize)
}

/// Sort the records of an index file in place, by digest then offset
pub fn sort_index_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(Error::io(path))?;
    let size = file.metadata().map_err(Error::io(path))?.len();
    if record_count(path, size)? == 0 {
        return Ok(());
    }

    // SAFETY: the index is being built and nothing else maps it.
    let mut mmap = unsafe { MmapMut::map_mut(&file) }.map_err(Error::io(path))?;
    let records: &mut [[u8; INDEX_RECORD_SIZE]] = bytemuck::cast_slice_mut(&mut mmap[..]);
    records.par_sort_unstable_by_key(|bytes| IndexRecord::decode(bytes));

    mmap.flush().map_err(Error::io(path))
}

/// Map a whole file read-only, `None` for an empty file
fn map_file(path: &Path) -> Result<(Option<Mmap>, u64)> {
    let file = File::open(path).map_err(Error::io(path))?;
    let size = file.metadata().map_err(Error::io(path))?.len();
    if size == 0 {
        return Ok((None, 0));
    }
    // SAFETY: index and password files are not modified while mapped.
    let mmap = unsafe { Mmap::map(&file) }.map_err(Error::io(path))?;
    Ok((Some(mmap), size))
}

/// Memory-mapped dictionary index
pub struct MappedIndex {
    mmap: Option<Mmap>,
    len: usize,
}

impl MappedIndex {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (mmap, size) = map_file(path)?;
        let len = record_count(path, size)?;
        Ok(Self { mmap, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get a record by index, `None` if out of bounds
    pub fn get(&self, index: usize) -> Option<IndexRecord> {
        let mmap = self.mmap.as_ref()?;
        let start = index.checked_mul(INDEX_RECORD_SIZE)?;
        let bytes = mmap.get(start..start + INDEX_RECORD_SIZE)?;
        Some(IndexRecord::decode(bytes))
    }

    /// First record carrying `digest`
    pub fn find(&self, digest: &Digest) -> Option<IndexRecord> {
        // Lower bound
        let mut lo = 0;
        let mut hi = self.len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.get(mid) {
                Some(record) if record.digest < *digest => lo = mid + 1,
                _ => hi = mid,
            }
        }

        self.get(lo).filter(|record| record.digest == *digest)
    }
}

/// Memory-mapped delimited password list
pub struct MappedPasswords {
    mmap: Option<Mmap>,
}

impl MappedPasswords {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let (mmap, _) = map_file(path.as_ref())?;
        Ok(Self { mmap })
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.mmap {
            Some(mmap) => &mmap[..],
            None => &[],
        }
    }

    /// Iterate over `(offset, password)` pairs
    ///
    /// A trailing delimiter does not produce an empty final entry.
    pub fn entries(&self, delimiter: u8) -> impl Iterator<Item = (u64, &[u8])> + '_ {
        let bytes = self.as_bytes();
        let body = bytes.strip_suffix(&[delimiter]).unwrap_or(bytes);
        let mut offset = 0u64;
        body.split(move |&c| c == delimiter)
            .filter(move |_| !bytes.is_empty())
            .map(move |entry| {
                let start = offset;
                offset += entry.len() as u64 + 1;
                (start, entry)
            })
    }

    /// Password starting at `offset`, up to the next delimiter or end of file
    pub fn entry_at(&self, offset: u64, delimiter: u8) -> Option<&[u8]> {
        let tail = self.as_bytes().get(usize::try_from(offset).ok()?..)?;
        let end = tail.iter().position(|&c| c == delimiter).unwrap_or(tail.len());
        Some(&tail[..end])
    }
}
