use log::trace;
use std::io::{Read, Seek, SeekFrom};

use crate::engine::error::{Error, Result};
use crate::engine::header::{is_terminator, HeaderBlock, UstarHeader};
use crate::engine::{read_block, Block, BlockRead, BLOCK_SIZE};

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum WalkEnd {
    /// An all-zero block was found at the offset.
    Terminator(u64),
    /// The stream ended at the offset, possibly mid block.
    EndOfStream(u64),
}

/// A header visited by the walker.
pub(crate) struct Visited {
    pub header: UstarHeader,
    /// Offset of the header block.
    pub offset: u64,
}

impl Visited {
    /// Offset of the first data block.
    pub fn data_offset(&self) -> u64 {
        self.offset + BLOCK_SIZE
    }
}

/// Sequential header walker.
///
/// Every walk starts from the beginning of the stream. Skipping always moves
/// by whole blocks so the cursor stays aligned on headers.
pub(crate) struct Walker<'s, R: Read + Seek> {
    stream: &'s mut R,
    /// Offset of the next block to read.
    pos: u64,
    /// Data blocks to skip before the next header.
    pending: u64,
    end: Option<WalkEnd>,
}

impl<'s, R: Read + Seek> Walker<'s, R> {
    /// Rewinds the stream and creates a walker.
    pub fn rewind(stream: &'s mut R) -> Result<Self> {
        stream.seek(SeekFrom::Start(0))?;
        Ok(Self { stream, pos: 0, pending: 0, end: None })
    }

    /// How the walk ended, `None` while it is still running.
    pub fn end(&self) -> Option<WalkEnd> {
        self.end
    }

    /// Reads the next raw block, skipping nothing.
    ///
    /// # Returns
    /// * `Ok(Some((offset, block)))` - A non terminator block.
    /// * `Ok(None)` - On the terminator or the end of the stream.
    pub fn next_block(&mut self) -> Result<Option<(u64, Block)>> {
        if self.end.is_some() {
            return Ok(None);
        }
        if self.pending > 0 {
            let skip = self.pending * BLOCK_SIZE;
            self.pos = self.stream.seek(SeekFrom::Start(self.pos + skip))?;
            self.pending = 0;
        }
        let offset = self.pos;
        match read_block(&mut *self.stream)? {
            BlockRead::Full(block) => {
                self.pos += BLOCK_SIZE;
                if is_terminator(&block) {
                    trace!("end-of-archive block at offset {}", offset);
                    self.end = Some(WalkEnd::Terminator(offset));
                    return Ok(None);
                }
                Ok(Some((offset, block)))
            }
            BlockRead::Short(n) => {
                trace!("stream ended at offset {} after {} bytes", offset, n);
                self.end = Some(WalkEnd::EndOfStream(offset + n as u64));
                Ok(None)
            }
        }
    }

    /// Schedules `blocks` data blocks to be skipped before the next block.
    pub fn skip_data(&mut self, blocks: u64) {
        self.pending = blocks;
    }

    /// Reads the next entry header, skipping the data of the previous one.
    pub fn next_entry(&mut self) -> Result<Option<Visited>> {
        let Some((offset, block)) = self.next_block()? else {
            return Ok(None);
        };
        match HeaderBlock::decode(&block)? {
            HeaderBlock::Entry(header) => {
                trace!("header `{}` at offset {} ({} bytes)", header.name, offset, header.size);
                self.skip_data(header.data_blocks());
                Ok(Some(Visited { header, offset }))
            }
            // all-zero blocks are caught by next_block
            HeaderBlock::Terminator => Ok(None),
        }
    }

    /// Copies `dest.len()` bytes of an entry data starting at `offset` bytes
    /// into its data region.
    ///
    /// The walk is over once data has been read.
    pub fn read_data(&mut self, visited: &Visited, offset: u64, dest: &mut [u8]) -> Result<()> {
        let first = visited.data_offset() + offset / BLOCK_SIZE * BLOCK_SIZE;
        self.stream.seek(SeekFrom::Start(first))?;
        self.end = Some(WalkEnd::EndOfStream(first));

        let mut skip = (offset % BLOCK_SIZE) as usize;
        let mut copied = 0;
        let mut block_offset = first;
        while copied < dest.len() {
            let block = match read_block(&mut *self.stream)? {
                BlockRead::Full(block) => block,
                BlockRead::Short(_) => return Err(Error::Truncated { offset: block_offset }),
            };
            let chunk = (block.len() - skip).min(dest.len() - copied);
            dest[copied..copied + chunk].copy_from_slice(&block[skip..skip + chunk]);
            copied += chunk;
            skip = 0;
            block_offset += BLOCK_SIZE;
        }
        Ok(())
    }
}
