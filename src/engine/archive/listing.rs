use log::debug;
use std::io::{Read, Seek};

use super::links::LinkChain;
use super::Archive;
use crate::engine::error::Result;
use crate::engine::header::{IsTypeTrait, UstarTypeFlag};
use crate::engine::walker::Walker;

/// Immediate children of a directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Child names in archive order, at most the requested capacity.
    pub entries: Vec<String>,
    /// Number of children found, including those beyond the capacity.
    pub total: usize,
}

impl Listing {
    /// Tells if at least one child was found.
    pub fn found(&self) -> bool {
        self.total > 0
    }

    /// Tells if children were left out because of the capacity.
    pub fn is_truncated(&self) -> bool {
        self.total > self.entries.len()
    }
}

impl<R: Read + Seek> Archive<R> {
    /// Lists the immediate children of the directory at `path`.
    ///
    /// A symbolic link at `path` is followed first. A path that is not a link
    /// and lacks a trailing `/` gets one, so `dir` never matches `dir2/`.
    /// Children are the entries named `<dir>/<child>` plus directories named
    /// `<dir>/<child>/`; deeper descendants are left out.
    ///
    /// # Arguments
    /// * `path` - Directory or symbolic link path.
    /// * `capacity` - Maximum number of names to collect.
    ///
    /// # Returns
    /// * `Ok(listing)` - Collected names and total count, empty when nothing
    ///   matches or the link chain cannot be resolved.
    pub fn list(&mut self, path: &str, capacity: usize) -> Result<Listing> {
        let Some(mut prefix) = self.resolve_link_path(path)? else {
            return Ok(Listing::default());
        };
        if !prefix.ends_with(b"/") {
            prefix.push(b'/');
        }

        let mut listing = Listing::default();
        let mut walker = Walker::rewind(&mut self.stream)?;
        while let Some(visited) = walker.next_entry()? {
            let Some(rest) = visited.header.raw_name.strip_prefix(prefix.as_slice()) else {
                continue;
            };
            if rest.is_empty() || !is_child(rest, visited.header.is_directory()) {
                continue;
            }
            listing.total += 1;
            if listing.entries.len() < capacity {
                listing.entries.push(visited.header.name);
            }
        }
        debug!(
            "`{}` has {} children, {} listed",
            String::from_utf8_lossy(&prefix),
            listing.total,
            listing.entries.len()
        );
        Ok(listing)
    }

    /// Follows symbolic links starting at `path`.
    ///
    /// # Returns
    /// * `Ok(Some(path))` - The first path in the chain that is not a link.
    /// * `Ok(None)` - When the chain loops or exceeds the hop bound.
    fn resolve_link_path(&mut self, path: &str) -> Result<Option<Vec<u8>>> {
        let mut chain = LinkChain::new(path.as_bytes(), self.options.max_link_hops);
        let mut target = path.as_bytes().to_vec();
        while let Some(link) = self.find_raw(&target, Some(UstarTypeFlag::SymbolicLink))? {
            if !chain.follow(&link.header.raw_linkname) {
                return Ok(None);
            }
            target = link.header.raw_linkname;
        }
        if chain.hops() > 0 {
            debug!("`{}` resolves to {}", path, chain);
        }
        Ok(Some(target))
    }
}

// One level below the prefix: no separator left, or a single trailing one on a directory.
fn is_child(rest: &[u8], is_directory: bool) -> bool {
    match rest.iter().position(|&b| b == b'/') {
        None => true,
        Some(pos) => is_directory && pos == rest.len() - 1,
    }
}
