use crate::engine::error::Result;
use crate::engine::{data_blocks, Block};

use super::helper::*;
use super::IsTypeTrait;

/// USTAR magic including its terminator.
pub const MAGIC: &[u8; 6] = b"ustar\0";
/// USTAR version, no terminator.
pub const VERSION: &[u8; 2] = b"00";

/// USTAR header type flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UstarTypeFlag {
    RegularFile,
    HardLink,
    SymbolicLink,
    CharacterSpecial,
    BlockSpecial,
    Directory,
    FIFO,
    ContiguousFile,
    Unknown(u8)
}

impl From<u8> for UstarTypeFlag {
    fn from(value: u8) -> Self {
        match value {
            // '\0' is the pre-POSIX regular file flag
            b'0' | b'\0' => UstarTypeFlag::RegularFile,
            b'1' => UstarTypeFlag::HardLink,
            b'2' => UstarTypeFlag::SymbolicLink,
            b'3' => UstarTypeFlag::CharacterSpecial,
            b'4' => UstarTypeFlag::BlockSpecial,
            b'5' => UstarTypeFlag::Directory,
            b'6' => UstarTypeFlag::FIFO,
            b'7' => UstarTypeFlag::ContiguousFile,
            v => UstarTypeFlag::Unknown(v),
        }
    }
}

impl From<UstarTypeFlag> for u8 {
    fn from(value: UstarTypeFlag) -> Self {
        match value {
            UstarTypeFlag::RegularFile => b'0',
            UstarTypeFlag::HardLink => b'1',
            UstarTypeFlag::SymbolicLink => b'2',
            UstarTypeFlag::CharacterSpecial => b'3',
            UstarTypeFlag::BlockSpecial => b'4',
            UstarTypeFlag::Directory => b'5',
            UstarTypeFlag::FIFO => b'6',
            UstarTypeFlag::ContiguousFile => b'7',
            UstarTypeFlag::Unknown(v) => v,
        }
    }
}

impl IsTypeTrait for UstarTypeFlag {
    fn is_regular_file(&self) -> bool {
        matches!(self, UstarTypeFlag::RegularFile)
    }

    fn is_hard_link(&self) -> bool {
        matches!(self, UstarTypeFlag::HardLink)
    }

    fn is_symbolic_link(&self) -> bool {
        matches!(self, UstarTypeFlag::SymbolicLink)
    }

    fn is_directory(&self) -> bool {
        matches!(self, UstarTypeFlag::Directory)
    }
}

/// Represents a USTAR TAR header (POSIX)
#[derive(Debug, Clone, PartialEq)]
pub struct UstarHeader {
    /// Entry path for display, invalid UTF-8 replaced
    pub name: String,
    /// Entry path bytes up to the first NUL, compared as-is
    pub raw_name: Vec<u8>,
    /// File size in bytes (octal string)
    pub size: u64,
    /// Stored header checksum, `None` when the field is not octal
    pub chksum: Option<u32>,
    /// Type flag
    pub typeflag: UstarTypeFlag,
    /// Name of linked file for display, invalid UTF-8 replaced
    pub linkname: String,
    /// Name of linked file bytes up to the first NUL
    pub raw_linkname: Vec<u8>,
    /// Raw magic bytes
    pub magic: [u8; 6],
    /// Raw version bytes
    pub version: [u8; 2],
}

impl UstarHeader {
    /// Decodes the header fields from a block.
    ///
    /// Magic, version and checksum are extracted but not validated, see
    /// [`super::verify_header`] for that. Only the size is required to be
    /// octal since walking past the entry depends on it.
    ///
    /// # Arguments
    /// * `buf` - Header block.
    ///
    /// # Returns
    /// * `Ok(Self)` - The decoded header.
    /// * `Err(e)` - If the size field is not octal.
    pub fn load(buf: &Block) -> Result<Self> {
        let mut magic = [0u8; 6];
        magic.copy_from_slice(&buf[257..263]);
        let mut version = [0u8; 2];
        version.copy_from_slice(&buf[263..265]);

        Ok(UstarHeader {
            name: get_str(&buf[0..100]),
            raw_name: get_bytes(&buf[0..100]).to_vec(),
            size: parse_octal("size", &buf[124..136])?,
            chksum: parse_octal("chksum", &buf[148..156]).ok(),
            typeflag: buf[156].into(),
            linkname: get_str(&buf[157..257]),
            raw_linkname: get_bytes(&buf[157..257]).to_vec(),
            magic,
            version,
        })
    }

    /// Number of data blocks following this header.
    pub fn data_blocks(&self) -> u64 {
        data_blocks(self.size)
    }
}

impl IsTypeTrait for UstarHeader {
    fn is_regular_file(&self) -> bool {
        self.typeflag.is_regular_file()
    }

    fn is_hard_link(&self) -> bool {
        self.typeflag.is_hard_link()
    }

    fn is_symbolic_link(&self) -> bool {
        self.typeflag.is_symbolic_link()
    }

    fn is_directory(&self) -> bool {
        self.typeflag.is_directory()
    }
}
