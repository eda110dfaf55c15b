pub mod archive;
pub mod error;
pub mod header;
pub(crate) mod walker;

#[cfg(test)]
pub(crate) mod test_helper;

use std::io::{ErrorKind, Read};
use std::io::Result as IoResult;

/// Size of every header and data block.
pub const BLOCK_SIZE: u64 = 512;

/// Raw 512 bytes block.
pub type Block = [u8; BLOCK_SIZE as usize];

/// Outcome of reading a single block from the stream.
pub enum BlockRead {
    /// A complete block.
    Full(Block),
    /// The stream ended early, holds the number of bytes actually read.
    Short(usize),
}

/// Reads one block from the reader, retrying on interrupted reads.
///
/// # Arguments
/// * `reader` - Byte reader.
///
/// # Returns
/// * `Ok(BlockRead::Full(block))` - When 512 bytes were read.
/// * `Ok(BlockRead::Short(n))` - When the stream ended after `n` bytes.
/// * `Err(e)` - If the reader failed.
pub fn read_block(reader: &mut impl Read) -> IoResult<BlockRead> {
    let mut buf = [0u8; BLOCK_SIZE as usize];
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Ok(BlockRead::Short(filled)),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(BlockRead::Full(buf))
}

/// Number of data blocks used by `size` bytes of content.
pub fn data_blocks(size: u64) -> u64 {
    size.div_ceil(BLOCK_SIZE)
}
