use crate::error::{DequeError, Result};

/// Tuning knobs of the block-size heuristic.
///
/// A deque starts with `initial_block_size` and rebuilds itself once the
/// element count (end marker included) reaches `initial_threshold`. Every
/// rebuild doubles the threshold and grows the block size towards
/// `⌊√threshold⌋`; the block size never shrinks.
///
/// # Examples
///
/// ```
/// use block_deque::{Config, Deque};
///
/// let config = Config::new().with_initial_threshold(64).with_initial_block_size(8);
/// let mut deque = Deque::with_config(config).unwrap();
/// deque.push_back(1);
/// assert_eq!(deque.block_size(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    pub(crate) initial_threshold: usize,
    pub(crate) initial_block_size: usize,
}

impl Config {
    /// The configuration a plain [`Deque::new`](crate::Deque::new) uses.
    pub const fn new() -> Self {
        Self {
            initial_threshold: 4,
            initial_block_size: 2,
        }
    }

    /// Sets the element count (end marker included) that triggers the first rebuild.
    pub const fn with_initial_threshold(mut self, threshold: usize) -> Self {
        self.initial_threshold = threshold;
        self
    }

    /// Sets the block size used until the first rebuild.
    pub const fn with_initial_block_size(mut self, block_size: usize) -> Self {
        self.initial_block_size = block_size;
        self
    }

    /// The element count (end marker included) that triggers the first rebuild.
    pub fn initial_threshold(&self) -> usize {
        self.initial_threshold
    }

    /// The block size used until the first rebuild, and again after
    /// [`Deque::clear`](crate::Deque::clear).
    pub fn initial_block_size(&self) -> usize {
        self.initial_block_size
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.initial_threshold < 2 {
            return Err(DequeError::InvalidConfig(
                "initial threshold must leave room for one element",
            ));
        }
        if self.initial_block_size == 0 {
            return Err(DequeError::InvalidConfig("block size must be positive"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
