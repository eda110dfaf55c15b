use log::debug;
use std::io::{Read, Seek};

use super::links::LinkChain;
use super::{find_entry, Archive};
use crate::engine::error::{Error, Result};
use crate::engine::header::IsTypeTrait;
use crate::engine::walker::Walker;

/// Outcome of a file range read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileRead {
    /// Bytes written into the destination buffer.
    pub copied: usize,
    /// Bytes left between the end of the copied range and the end of the file.
    pub remaining: u64,
}

impl FileRead {
    /// Tells if the read reached the end of the file.
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

impl<R: Read + Seek> Archive<R> {
    /// Reads a range of the regular file at `path` into `dest`.
    ///
    /// Symbolic links are followed up to [`super::Options::max_link_hops`]
    /// times. At most `dest.len()` bytes are copied.
    ///
    /// # Arguments
    /// * `path` - File or symbolic link path.
    /// * `offset` - Offset within the file to start reading from.
    /// * `dest` - Destination buffer.
    ///
    /// # Returns
    /// * `Ok(read)` - Copied byte count and bytes left after the range.
    /// * `Err(Error::NotAFile)` - When `path` does not resolve to a regular file.
    /// * `Err(Error::OffsetOutOfRange)` - When `offset` is at or past the end
    ///   of a non empty file, or past the end of an empty one.
    /// * `Err(Error::Truncated)` - When the file data is cut short.
    pub fn read(&mut self, path: &str, offset: u64, dest: &mut [u8]) -> Result<FileRead> {
        let mut chain = LinkChain::new(path.as_bytes(), self.options.max_link_hops);
        let mut target = path.as_bytes().to_vec();
        loop {
            let mut walker = Walker::rewind(&mut self.stream)?;
            let Some(visited) = find_entry(&mut walker, &target)? else {
                debug!("`{}` not found while resolving `{}`", String::from_utf8_lossy(&target), path);
                return Err(Error::NotAFile(path.to_string()));
            };
            let header = &visited.header;

            if header.is_symbolic_link() {
                if !chain.follow(&header.raw_linkname) {
                    return Err(Error::NotAFile(path.to_string()));
                }
                target = header.raw_linkname.clone();
                continue;
            }
            if !header.is_regular_file() {
                return Err(Error::NotAFile(path.to_string()));
            }

            let size = header.size;
            if offset > size || (offset == size && size > 0) {
                return Err(Error::OffsetOutOfRange { path: path.to_string(), offset, size });
            }
            // bounded by dest.len(), fits in usize
            let copied = (dest.len() as u64).min(size - offset) as usize;
            walker.read_data(&visited, offset, &mut dest[..copied])?;

            let remaining = size - offset - copied as u64;
            debug!("read {} bytes of `{}` at offset {}, {} left", copied, header.name, offset, remaining);
            return Ok(FileRead { copied, remaining });
        }
    }
}
