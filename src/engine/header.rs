pub mod helper;
pub mod ustar;
mod traits;

pub use traits::IsTypeTrait;
pub use ustar::{UstarHeader, UstarTypeFlag, MAGIC, VERSION};

use crate::engine::error::Result;
use crate::engine::Block;
use helper::parse_octal;

/// Byte range of the checksum field.
const CHKSUM_RANGE: std::ops::Range<usize> = 148..156;

/// A decoded header block.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderBlock {
    /// All-zero end-of-archive block.
    Terminator,
    /// An entry header.
    Entry(UstarHeader),
}

impl HeaderBlock {
    /// Decodes a block without validating magic, version or checksum.
    ///
    /// # Arguments
    /// * `block` - Raw block.
    ///
    /// # Returns
    /// * `Ok(Self)` - The terminator or the decoded entry.
    /// * `Err(e)` - If a numeric field is not octal.
    pub fn decode(block: &Block) -> Result<Self> {
        if is_terminator(block) {
            return Ok(HeaderBlock::Terminator);
        }
        Ok(HeaderBlock::Entry(UstarHeader::load(block)?))
    }
}

/// Outcome of a structural header check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Valid,
    BadMagic,
    BadVersion,
    BadChecksum { stored: u32, computed: u32 },
}

/// Tells if the block is an all-zero end-of-archive block.
pub fn is_terminator(block: &Block) -> bool {
    block.iter().all(|&b| b == 0)
}

/// Sums every byte of the block, counting the checksum field as spaces.
pub fn checksum_of(block: &Block) -> u32 {
    block
        .iter()
        .enumerate()
        .map(|(i, &b)| if CHKSUM_RANGE.contains(&i) { b' ' as u32 } else { b as u32 })
        .sum()
}

/// Checks magic, version and checksum, in that order.
pub fn verify_header(block: &Block) -> Verdict {
    if &block[257..263] != MAGIC {
        return Verdict::BadMagic;
    }
    if &block[263..265] != VERSION {
        return Verdict::BadVersion;
    }
    let computed = checksum_of(block);
    match parse_octal::<u32>("chksum", &block[CHKSUM_RANGE]) {
        Ok(stored) if stored == computed => Verdict::Valid,
        Ok(stored) => Verdict::BadChecksum { stored, computed },
        // a non octal checksum can never match
        Err(_) => Verdict::BadChecksum { stored: 0, computed },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_helper::HeaderSpec;

    #[test]
    fn detects_terminator() {
        let block = [0u8; 512];
        match HeaderBlock::decode(&block) {
            Ok(HeaderBlock::Terminator) => {},
            Ok(other) => panic!("Did not detect terminator: {:?}", other),
            Err(e) => panic!("Failed to decode block: {}", e),
        }
    }

    #[test]
    fn detects_entry() {
        let block = HeaderSpec::dir("a/").block();
        match HeaderBlock::decode(&block) {
            Ok(HeaderBlock::Entry(h)) => assert_eq!("a/", h.name),
            Ok(other) => panic!("Did not detect entry: {:?}", other),
            Err(e) => panic!("Failed to decode block: {}", e),
        }
    }

    #[test]
    fn checksum_ignores_own_field() {
        let mut block = HeaderSpec::file("a", 3).block();
        let expected = checksum_of(&block);
        block[148..156].copy_from_slice(b"77777777");
        assert_eq!(expected, checksum_of(&block));
        assert_eq!(8 * 32, checksum_of(&[0u8; 512]));
    }

    #[test]
    fn verifies_valid_header() {
        let block = HeaderSpec::file("a", 3).block();
        assert_eq!(Verdict::Valid, verify_header(&block));
    }

    #[test]
    fn verifies_bad_magic() {
        let block = HeaderSpec::file("a", 3).magic(*b"ustar ").block();
        assert_eq!(Verdict::BadMagic, verify_header(&block));
    }

    #[test]
    fn verifies_bad_version() {
        let block = HeaderSpec::file("a", 3).version(*b" \0").block();
        assert_eq!(Verdict::BadVersion, verify_header(&block));
    }

    #[test]
    fn magic_wins_over_version() {
        let block = HeaderSpec::file("a", 3).magic(*b"ustax\0").version(*b"01").block();
        assert_eq!(Verdict::BadMagic, verify_header(&block));
    }

    #[test]
    fn verifies_bad_checksum() {
        let mut block = HeaderSpec::file("a", 3).block();
        let computed = checksum_of(&block);
        block[149] = if block[149] == b'1' { b'2' } else { b'1' };
        match verify_header(&block) {
            Verdict::BadChecksum { computed: c, .. } => assert_eq!(computed, c),
            other => panic!("expected a checksum failure, got {:?}", other),
        }

        block[150] = b'x';
        assert!(matches!(verify_header(&block), Verdict::BadChecksum { .. }));
    }
}
