use indexmap::IndexSet;
use log::warn;
use std::fmt;

/// Bounded record of a symbolic link chain.
///
/// Holds every path visited so far, the starting path included. A chain
/// stops once it would exceed `max_hops` substitutions or revisit a path.
pub(crate) struct LinkChain {
    visited: IndexSet<Vec<u8>>,
    max_hops: usize,
}

impl LinkChain {
    pub fn new(start: &[u8], max_hops: usize) -> Self {
        let mut visited = IndexSet::with_capacity(max_hops + 1);
        visited.insert(start.to_vec());
        Self { visited, max_hops }
    }

    /// Number of links followed so far.
    pub fn hops(&self) -> usize {
        self.visited.len() - 1
    }

    /// Records a hop to `target`.
    ///
    /// # Returns
    /// * `true` - When the chain may continue at `target`.
    /// * `false` - When the hop bound is reached or `target` was already visited.
    pub fn follow(&mut self, target: &[u8]) -> bool {
        if self.hops() >= self.max_hops {
            warn!("symlink chain {} exceeds {} hops", self, self.max_hops);
            return false;
        }
        if !self.visited.insert(target.to_vec()) {
            warn!("symlink chain {} loops back to `{}`", self, String::from_utf8_lossy(target));
            return false;
        }
        true
    }
}

impl fmt::Display for LinkChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.visited.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "`{}`", String::from_utf8_lossy(path))?;
        }
        Ok(())
    }
}
