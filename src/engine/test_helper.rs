use crate::engine::header::helper::{put_octal, put_str};
use crate::engine::header::{UstarTypeFlag, MAGIC, VERSION};
use crate::engine::{Block, BLOCK_SIZE};

/// Describes a header block to encode.
#[derive(Clone)]
pub struct HeaderSpec {
    name: String,
    typeflag: UstarTypeFlag,
    size: u64,
    mode: u32,
    linkname: String,
    magic: [u8; 6],
    version: [u8; 2],
    raw: Vec<(usize, Vec<u8>)>,
}

impl HeaderSpec {
    fn new(name: &str, typeflag: UstarTypeFlag) -> Self {
        Self {
            name: name.to_string(),
            typeflag,
            size: 0,
            mode: 0o644,
            linkname: String::new(),
            magic: *MAGIC,
            version: *VERSION,
            raw: Vec::new(),
        }
    }

    pub fn file(name: &str, size: u64) -> Self {
        let mut spec = Self::new(name, UstarTypeFlag::RegularFile);
        spec.size = size;
        spec
    }

    pub fn dir(name: &str) -> Self {
        let mut spec = Self::new(name, UstarTypeFlag::Directory);
        spec.mode = 0o755;
        spec
    }

    pub fn symlink(name: &str, target: &str) -> Self {
        let mut spec = Self::new(name, UstarTypeFlag::SymbolicLink);
        spec.linkname = target.to_string();
        spec.mode = 0o777;
        spec
    }

    /// Overwrites header bytes at `start` after the fields are encoded.
    pub fn field(mut self, start: usize, bytes: &[u8]) -> Self {
        self.raw.push((start, bytes.to_vec()));
        self
    }

    pub fn magic(mut self, magic: [u8; 6]) -> Self {
        self.magic = magic;
        self
    }

    pub fn version(mut self, version: [u8; 2]) -> Self {
        self.version = version;
        self
    }

    /// Encodes the header block with a valid checksum.
    pub fn block(&self) -> Block {
        let mut buf = [0u8; BLOCK_SIZE as usize];
        put_str(&mut buf[0..100], &self.name);
        put_octal(&mut buf[100..108], self.mode);
        put_octal(&mut buf[108..116], 1000u32);
        put_octal(&mut buf[116..124], 1000u32);
        put_octal(&mut buf[124..136], self.size);
        put_octal(&mut buf[136..148], 1_600_000_000u64);
        buf[156] = self.typeflag.into();
        put_str(&mut buf[157..257], &self.linkname);
        buf[257..263].copy_from_slice(&self.magic);
        buf[263..265].copy_from_slice(&self.version);
        put_str(&mut buf[265..297], "user");
        put_str(&mut buf[297..329], "group");
        for (start, bytes) in &self.raw {
            buf[*start..*start + bytes.len()].copy_from_slice(bytes);
        }

        for b in &mut buf[148..156] { *b = b' '; }
        let chksum: u32 = buf.iter().map(|&b| b as u32).sum();
        let chksum_str = format!("{:06o}\0 ", chksum);
        buf[148..156].copy_from_slice(chksum_str.as_bytes());
        buf
    }
}

/// In-memory archive assembler.
#[derive(Default)]
pub struct ArchiveBuilder {
    bytes: Vec<u8>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header followed by its zero padded data.
    pub fn entry(mut self, spec: HeaderSpec, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(&spec.block());
        self.bytes.extend_from_slice(data);
        let rem = data.len() as u64 % BLOCK_SIZE;
        if rem > 0 {
            self.bytes.resize(self.bytes.len() + (BLOCK_SIZE - rem) as usize, 0);
        }
        self
    }

    pub fn file(self, name: &str, data: &[u8]) -> Self {
        self.entry(HeaderSpec::file(name, data.len() as u64), data)
    }

    pub fn dir(self, name: &str) -> Self {
        self.entry(HeaderSpec::dir(name), &[])
    }

    pub fn symlink(self, name: &str, target: &str) -> Self {
        self.entry(HeaderSpec::symlink(name, target), &[])
    }

    /// Closes the archive with two zero blocks.
    pub fn finish(mut self) -> Vec<u8> {
        self.bytes.resize(self.bytes.len() + 2 * BLOCK_SIZE as usize, 0);
        self.bytes
    }

    /// Returns the bytes without end-of-archive blocks.
    pub fn unterminated(self) -> Vec<u8> {
        self.bytes
    }
}

/// Deterministic pseudo random payload.
pub fn payload(seed: u64, len: usize) -> Vec<u8> {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill(&mut data[..]);
    data
}

/// Archive used across the navigation tests.
///
/// ```text
/// a/
/// a/x          (5 bytes)
/// a/y          (1000 bytes)
/// a/z/
/// a/z/w        (3 bytes)
/// a/link -> a/x
/// ab           (2 bytes)
/// dir2/
/// dir2/f       (600 bytes)
/// la -> a/
/// lla -> la
/// self -> self
/// ping -> pong
/// pong -> ping
/// dangling -> nowhere
/// ```
pub fn sample_archive() -> Vec<u8> {
    ArchiveBuilder::new()
        .dir("a/")
        .file("a/x", b"hello")
        .file("a/y", &payload(1, 1000))
        .dir("a/z/")
        .file("a/z/w", b"abc")
        .symlink("a/link", "a/x")
        .file("ab", b"zz")
        .dir("dir2/")
        .file("dir2/f", &payload(2, 600))
        .symlink("la", "a/")
        .symlink("lla", "la")
        .symlink("self", "self")
        .symlink("ping", "pong")
        .symlink("pong", "ping")
        .symlink("dangling", "nowhere")
        .finish()
}

/// Number of headers in [`sample_archive`].
pub const SAMPLE_HEADERS: usize = 15;
