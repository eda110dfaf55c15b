//! Read-only navigation over USTAR archives.
//!
//! An archive is a flat run of 512 bytes blocks: each entry header is
//! followed by the blocks holding its data, and the archive ends with an
//! all-zero block. This crate validates that structure, answers existence
//! and type queries, lists directories one level deep and reads byte ranges
//! of regular files, following symbolic links with a bounded hop count.
//!
//! Every operation rewinds the stream before walking it. A stream handle is
//! not synchronized, callers sharing one across threads must serialize
//! access themselves.
//!
//! ```no_run
//! use std::fs::File;
//!
//! let mut file = File::open("archive.tar")?;
//! let headers = rtar_nav::validate_archive(&mut file)?;
//! let mut buf = [0u8; 64];
//! let read = rtar_nav::read_file_range(&mut file, "docs/readme", 0, &mut buf)?;
//! println!("{} headers, read {} bytes, {} left", headers, read.copied, read.remaining);
//! # Ok::<(), rtar_nav::Error>(())
//! ```

pub mod engine;

pub use engine::archive::{
    Archive, FileRead, Listing, Located, Options, ValidationScan, DEFAULT_MAX_LINK_HOPS,
};
pub use engine::error::{Error, Result};
pub use engine::header::{UstarHeader, UstarTypeFlag};

use std::io::{Read, Seek};

/// Validates every header of the archive, see [`Archive::validate`].
pub fn validate_archive<R: Read + Seek>(stream: &mut R) -> Result<usize> {
    Archive::new(stream).validate()
}

/// Tells if an entry named `path` exists.
pub fn entry_exists<R: Read + Seek>(stream: &mut R, path: &str) -> Result<bool> {
    Archive::new(stream).exists(path)
}

/// Tells if `path` is a directory entry.
pub fn entry_is_directory<R: Read + Seek>(stream: &mut R, path: &str) -> Result<bool> {
    Archive::new(stream).is_directory(path)
}

/// Tells if `path` is a regular file entry.
pub fn entry_is_file<R: Read + Seek>(stream: &mut R, path: &str) -> Result<bool> {
    Archive::new(stream).is_file(path)
}

/// Tells if `path` is a symbolic link entry.
pub fn entry_is_symlink<R: Read + Seek>(stream: &mut R, path: &str) -> Result<bool> {
    Archive::new(stream).is_symlink(path)
}

/// Lists at most `capacity` children of the directory at `path`, see [`Archive::list`].
pub fn list_directory<R: Read + Seek>(stream: &mut R, path: &str, capacity: usize) -> Result<Listing> {
    Archive::new(stream).list(path, capacity)
}

/// Reads a range of the file at `path` into `dest`, see [`Archive::read`].
pub fn read_file_range<R: Read + Seek>(
    stream: &mut R,
    path: &str,
    offset: u64,
    dest: &mut [u8],
) -> Result<FileRead> {
    Archive::new(stream).read(path, offset, dest)
}
