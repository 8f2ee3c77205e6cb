//! Table file I/O operations
//!
//! A table file is a flat array of `Chain<N>` records with no header. Both
//! reading and writing go through memory maps so tables larger than memory
//! can be built and queried.

use std::fs::{File, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut};

use crate::constants::chain_record_size;
use crate::domain::chain::Chain;
use crate::error::{Error, Result};

fn check_file_size(path: &Path, size: u64, record_size: usize) -> Result<usize> {
    if record_size == 0 {
        return Err(Error::PasswordLength(0));
    }
    if size % record_size as u64 != 0 {
        return Err(Error::InvalidFileSize {
            path: path.to_path_buf(),
            size,
            record_size,
        });
    }
    Ok((size / record_size as u64) as usize)
}

/// Byte size of a table file holding `length` chains
///
/// # Errors
///
/// Returns `PasswordLength(0)` for zero-length passwords and `TableSize`
/// when the size does not fit in a `u64`.
pub fn table_file_size<const N: usize>(length: usize) -> Result<u64> {
    let record_size = chain_record_size(N);
    if record_size == 0 {
        return Err(Error::PasswordLength(0));
    }
    length
        .checked_mul(record_size)
        .and_then(|size| u64::try_from(size).ok())
        .ok_or(Error::TableSize {
            length,
            record_size,
        })
}

/// Read-only memory-mapped rainbow table
pub struct MappedTable<const N: usize> {
    mmap: Option<Mmap>,
    len: usize,
    _chain: PhantomData<Chain<N>>,
}

impl<const N: usize> MappedTable<N> {
    /// Open a table file as memory-mapped
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped, or if its
    /// size is not a whole number of chain records.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::io(path))?;
        let size = file.metadata().map_err(Error::io(path))?.len();
        let len = check_file_size(path, size, chain_record_size(N))?;

        // Mapping a zero-length file fails on some platforms
        let mmap = if len == 0 {
            None
        } else {
            // SAFETY: the table is not expected to be modified while it is open.
            Some(unsafe { Mmap::map(&file) }.map_err(Error::io(path))?)
        };

        Ok(Self {
            mmap,
            len,
            _chain: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Zero-copy view of the chains
    ///
    /// `Chain<N>` has alignment 1 so any mapping can be cast.
    pub fn as_slice(&self) -> &[Chain<N>] {
        match &self.mmap {
            Some(mmap) => bytemuck::cast_slice(&mmap[..]),
            None => &[],
        }
    }

    /// Get a chain by index, `None` if out of bounds
    pub fn get(&self, index: usize) -> Option<&Chain<N>> {
        self.as_slice().get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chain<N>> + '_ {
        self.as_slice().iter()
    }
}

/// Writable memory-mapped rainbow table of a fixed length
///
/// The file is created (or truncated) and sized up front, then filled in
/// place through [`MappedTableMut::as_mut_slice`].
pub struct MappedTableMut<const N: usize> {
    mmap: Option<MmapMut>,
    path: PathBuf,
    _chain: PhantomData<Chain<N>>,
}

impl<const N: usize> MappedTableMut<N> {
    /// Create a table file holding `length` zeroed chains
    pub fn create(path: impl AsRef<Path>, length: usize) -> Result<Self> {
        let path = path.as_ref();
        let size = table_file_size::<N>(length)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(Error::io(path))?;

        file.set_len(size).map_err(Error::io(path))?;

        let mmap = if size == 0 {
            None
        } else {
            // SAFETY: the file was just created by us and nothing else maps it.
            Some(unsafe { MmapMut::map_mut(&file) }.map_err(Error::io(path))?)
        };

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            _chain: PhantomData,
        })
    }

    pub fn as_mut_slice(&mut self) -> &mut [Chain<N>] {
        match &mut self.mmap {
            Some(mmap) => bytemuck::cast_slice_mut(&mut mmap[..]),
            None => &mut [],
        }
    }

    /// Flush outstanding changes to disk
    pub fn flush(&self) -> Result<()> {
        match &self.mmap {
            Some(mmap) => mmap.flush().map_err(Error::io(&self.path)),
            None => Ok(()),
        }
    }
}
