mod links;
pub mod listing;
pub mod reader;

pub use listing::Listing;
pub use reader::FileRead;

use log::debug;
use std::io::{Read, Seek};

use crate::engine::error::{Error, Result};
use crate::engine::header::{verify_header, UstarHeader, UstarTypeFlag, Verdict};
use crate::engine::walker::{Visited, WalkEnd, Walker};
use crate::engine::BLOCK_SIZE;

/// Default bound on followed symbolic links.
pub const DEFAULT_MAX_LINK_HOPS: usize = 10;

/// How the validator advances between headers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ValidationScan {
    /// Skip each header's data blocks, so only headers are checked.
    #[default]
    Entries,
    /// Check every block until the terminator, data blocks included.
    Blocks,
}

/// Navigation options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// Maximum number of symbolic links followed while resolving a path.
    pub max_link_hops: usize,
    /// Report a stream ending without an all-zero block as an error on validation.
    pub require_terminator: bool,
    /// Validation scan mode.
    pub scan: ValidationScan,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_link_hops: DEFAULT_MAX_LINK_HOPS,
            require_terminator: false,
            scan: ValidationScan::default(),
        }
    }
}

impl Options {
    pub fn with_max_link_hops(mut self, hops: usize) -> Self {
        self.max_link_hops = hops;
        self
    }

    pub fn with_require_terminator(mut self, value: bool) -> Self {
        self.require_terminator = value;
        self
    }

    pub fn with_scan(mut self, scan: ValidationScan) -> Self {
        self.scan = scan;
        self
    }
}

/// An entry found by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub header: UstarHeader,
    /// Offset of the header block.
    pub offset: u64,
}

impl Located {
    /// Offset of the first data block.
    pub fn data_offset(&self) -> u64 {
        self.offset + BLOCK_SIZE
    }
}

/// Read-only USTAR archive navigator.
///
/// Each operation rewinds the stream before walking it, so operations can be
/// chained on the same handle in any order. The handle is not synchronized:
/// callers sharing one stream across threads must serialize access.
pub struct Archive<R: Read + Seek> {
    stream: R,
    options: Options,
}

impl<R: Read + Seek> Archive<R> {
    /// Creates a navigator with default options.
    ///
    /// # Arguments
    /// * `stream` - Seekable byte source holding the archive.
    pub fn new(stream: R) -> Self {
        Self::with_options(stream, Options::default())
    }

    /// Creates a navigator with the given options.
    pub fn with_options(stream: R, options: Options) -> Self {
        Self { stream, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> R {
        self.stream
    }

    /// Checks every header of the archive.
    ///
    /// Headers are checked in order for magic, version and checksum; the first
    /// failure is returned and scanning stops there.
    ///
    /// # Returns
    /// * `Ok(count)` - Number of headers before the end of the archive.
    /// * `Err(Error::BadMagic | Error::BadVersion | Error::BadChecksum)` - On
    ///   the first invalid header.
    /// * `Err(Error::MissingTerminator)` - When the stream ends without an
    ///   end-of-archive block and [`Options::require_terminator`] is set.
    pub fn validate(&mut self) -> Result<usize> {
        let options = self.options;
        let mut walker = Walker::rewind(&mut self.stream)?;
        let mut count = 0;
        while let Some((offset, block)) = walker.next_block()? {
            match verify_header(&block) {
                Verdict::Valid => {},
                Verdict::BadMagic => return Err(Error::BadMagic { index: count, offset }),
                Verdict::BadVersion => return Err(Error::BadVersion { index: count, offset }),
                Verdict::BadChecksum { stored, computed } => {
                    return Err(Error::BadChecksum { index: count, offset, stored, computed })
                }
            }
            if options.scan == ValidationScan::Entries {
                walker.skip_data(UstarHeader::load(&block)?.data_blocks());
            }
            count += 1;
        }

        match walker.end() {
            Some(WalkEnd::EndOfStream(offset)) if options.require_terminator => {
                return Err(Error::MissingTerminator { offset });
            }
            Some(WalkEnd::EndOfStream(offset)) => {
                debug!("archive ends at offset {} without end-of-archive block", offset);
            }
            Some(WalkEnd::Terminator(offset)) => debug!("end-of-archive block at offset {}", offset),
            None => {},
        }
        debug!("archive holds {} valid headers", count);
        Ok(count)
    }

    /// Looks for the first entry named exactly `path`.
    ///
    /// The walk stops at the first name match; when its type differs from
    /// `required` nothing is found.
    ///
    /// # Arguments
    /// * `path` - Entry name, compared as-is.
    /// * `required` - Optional required entry type.
    pub fn find(&mut self, path: &str, required: Option<UstarTypeFlag>) -> Result<Option<Located>> {
        self.find_raw(path.as_bytes(), required)
    }

    pub(crate) fn find_raw(&mut self, path: &[u8], required: Option<UstarTypeFlag>) -> Result<Option<Located>> {
        let mut walker = Walker::rewind(&mut self.stream)?;
        let Some(visited) = find_entry(&mut walker, path)? else {
            return Ok(None);
        };
        match required {
            Some(typeflag) if visited.header.typeflag != typeflag => {
                debug!("`{}` is {:?}, not {:?}", visited.header.name, visited.header.typeflag, typeflag);
                Ok(None)
            }
            _ => Ok(Some(Located { header: visited.header, offset: visited.offset })),
        }
    }

    /// Tells if an entry named `path` exists.
    pub fn exists(&mut self, path: &str) -> Result<bool> {
        Ok(self.find(path, None)?.is_some())
    }

    /// Tells if `path` is a directory entry.
    pub fn is_directory(&mut self, path: &str) -> Result<bool> {
        Ok(self.find(path, Some(UstarTypeFlag::Directory))?.is_some())
    }

    /// Tells if `path` is a regular file entry.
    pub fn is_file(&mut self, path: &str) -> Result<bool> {
        Ok(self.find(path, Some(UstarTypeFlag::RegularFile))?.is_some())
    }

    /// Tells if `path` is a symbolic link entry.
    pub fn is_symlink(&mut self, path: &str) -> Result<bool> {
        Ok(self.find(path, Some(UstarTypeFlag::SymbolicLink))?.is_some())
    }
}

/// Walks until an entry whose name bytes equal `path` is found.
pub(crate) fn find_entry<R: Read + Seek>(walker: &mut Walker<'_, R>, path: &[u8]) -> Result<Option<Visited>> {
    while let Some(visited) = walker.next_entry()? {
        if visited.header.raw_name == path {
            return Ok(Some(visited));
        }
    }
    Ok(None)
}
