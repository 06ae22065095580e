use std::fmt::{Debug, Formatter};
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::Config;
use crate::deque::chain::{Arena, BlockKey, Loc, Slot};
use crate::deque::cursor::{Cursor, CursorMut};
use crate::deque::position::Position;
use crate::error::{DequeError, Result};
use crate::{Iter, IterMut};

pub mod cursor;
pub mod iterator;
pub mod position;

mod algorithms;
mod chain;
mod rebalance;

/// A double-ended queue stored as a chain of blocks, each block a chain of
/// nodes owning one element.
///
/// Indexed access walks whole blocks from the nearer end of the chain, then
/// nodes from the nearer end of the block, so it takes *O*(√*n*) time.
/// Insertion and erasure at a [`Position`] splice a single node, and take
/// *O*(√*n*) amortized time including the rebalancing.
///
/// The `Deque` contains:
/// - the node and block arenas, with the key of the first block (`root`);
/// - the location of the end marker, cached so that `end()` and `back()`
///   never scan;
/// - `total`, the number of nodes including the end marker;
/// - the rebuild `threshold` and the target `block_size`.
///
/// # Examples
///
/// ```
/// use block_deque::Deque;
///
/// let mut deque = Deque::new();
/// deque.push_back(2);
/// deque.push_back(3);
/// deque.push_front(1);
/// assert_eq!(deque.at(1), Ok(&2));
/// assert_eq!(deque.pop_back(), Ok(3));
/// assert_eq!(Vec::from_iter(deque), vec![1, 2]);
/// ```
pub struct Deque<T> {
    arena: Arena<T>,
    root: BlockKey,
    end: Loc,
    /// the number of nodes, the end marker included
    total: usize,
    threshold: usize,
    block_size: usize,
    config: Config,
    id: DequeId,
    /// bumped whenever every outstanding position becomes stale
    epoch: u64,
}

/// Process-unique identity of a deque, used to reject foreign positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct DequeId(u64);

impl DequeId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// private methods
impl<T> Deque<T> {
    /// A chain made of a single block holding the end marker.
    fn empty_chain() -> (Arena<T>, BlockKey, Loc) {
        let mut arena = Arena::with_capacity(1, 1);
        let end = arena.open_block(None, Slot::End);
        (arena, end.block, end)
    }

    pub(crate) fn position(&self, loc: Loc) -> Position {
        Position {
            owner: self.id,
            epoch: self.epoch,
            generation: self.arena.node(loc.node).generation,
            loc,
        }
    }

    /// Check that `position` was issued by this deque and is still valid,
    /// and return its location.
    pub(crate) fn resolve(&self, position: Position) -> Result<Loc> {
        if position.owner != self.id {
            return Err(DequeError::WrongOwner);
        }
        if position.epoch != self.epoch {
            return Err(DequeError::InvalidIterator);
        }
        match self.arena.get_node(position.loc.node) {
            Some(node)
                if node.block == position.loc.block
                    && node.generation == position.generation =>
            {
                Ok(position.loc)
            }
            _ => Err(DequeError::InvalidIterator),
        }
    }

    pub(crate) fn begin_loc(&self) -> Loc {
        self.arena.head(self.root)
    }

    pub(crate) fn end_loc(&self) -> Loc {
        self.end
    }

    /// Find the node of the element at `index`, where `index < len`.
    ///
    /// Blocks are scanned from whichever end of the chain is nearer to
    /// `index`, then nodes from whichever end of the block is nearer.
    fn locate(&self, index: usize) -> Loc {
        let mut block = self.root;
        // the number of nodes before `block`
        let mut before = 0;
        if 2 * (index + 1) <= self.total {
            loop {
                let current = self.arena.block(block);
                if before + current.len > index {
                    break;
                }
                match current.next {
                    Some(next) => {
                        before += current.len;
                        block = next;
                    }
                    None => break,
                }
            }
        } else {
            block = self.end.block;
            // the number of nodes up to the end of `block`
            let mut through = self.total;
            loop {
                let current = self.arena.block(block);
                if through - current.len <= index {
                    break;
                }
                match current.prev {
                    Some(prev) => {
                        through -= current.len;
                        block = prev;
                    }
                    None => break,
                }
            }
            before = through - self.arena.block(block).len;
        }

        let current = self.arena.block(block);
        let offset = index - before;
        let node = if 2 * offset <= current.len {
            self.arena.walk_forward(current.head, offset)
        } else {
            self.arena.walk_backward(current.tail, current.len - 1 - offset)
        };
        Loc { block, node }
    }

    /// Insert `value` right before `at`, rebalance, and return where the new
    /// element ended up.
    pub(crate) fn insert_at(&mut self, at: Loc, value: T) -> Loc {
        let node = self.arena.splice_before(at, Slot::Value(value));
        self.total += 1;
        let inserted = self.maintain(
            at.block,
            Loc {
                block: at.block,
                node,
            },
        );
        self.rebuild(inserted)
    }

    /// Erase the element at `at`, and return it with the location of its
    /// successor.
    pub(crate) fn erase_at(&mut self, at: Loc) -> Result<(T, Loc)> {
        if self.arena.node(at.node).slot.is_end() {
            return Err(DequeError::BadPosition);
        }
        let successor = self
            .arena
            .next_loc(at)
            .ok_or(DequeError::BadPosition)?;

        let node = self.arena.detach_node(at);
        self.total -= 1;
        if self.arena.block(at.block).len == 0 {
            let block = self.arena.detach_block(at.block);
            if block.prev.is_none() {
                if let Some(next) = block.next {
                    self.root = next;
                }
            }
        }
        // erasures never rebalance; an emptied block is simply dropped
        match node.slot {
            Slot::Value(value) => Ok((value, successor)),
            Slot::End => unreachable!("the end marker is never erased"),
        }
    }
}

impl<T> Deque<T> {
    /// Creates an empty `Deque`.
    ///
    /// # Examples
    /// ```
    /// use block_deque::Deque;
    /// let deque: Deque<u32> = Deque::new();
    /// assert!(deque.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::from_config(Config::new())
    }

    /// Creates an empty `Deque` tuned by `config`, or fails with
    /// [`DequeError::InvalidConfig`].
    ///
    /// # Examples
    /// ```
    /// use block_deque::{Config, Deque, DequeError};
    ///
    /// let deque: Deque<u32> = Deque::with_config(Config::new().with_initial_threshold(16)).unwrap();
    /// assert_eq!(deque.config().initial_threshold(), 16);
    ///
    /// let invalid = Deque::<u32>::with_config(Config::new().with_initial_block_size(0));
    /// assert!(matches!(invalid, Err(DequeError::InvalidConfig(_))));
    /// ```
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: Config) -> Self {
        let (arena, root, end) = Self::empty_chain();
        Self {
            arena,
            root,
            end,
            total: 1,
            threshold: config.initial_threshold,
            block_size: config.initial_block_size,
            config,
            id: DequeId::next(),
            epoch: 0,
        }
    }

    /// The configuration this deque was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current target block size. Blocks are split once they reach
    /// twice this many nodes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The number of blocks in the chain.
    pub fn block_count(&self) -> usize {
        self.arena.block_count()
    }

    /// Returns the number of elements.
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn len(&self) -> usize {
        self.total - 1
    }

    /// Returns `true` if the `Deque` holds no element.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::Deque;
    ///
    /// let mut deque = Deque::new();
    /// assert!(deque.is_empty());
    ///
    /// deque.push_front("foo");
    /// assert!(!deque.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 1
    }

    /// Removes all elements, and goes back to the initial tuning of the
    /// deque's [`Config`]. Every outstanding [`Position`] is invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::Deque;
    ///
    /// let mut deque = Deque::from_iter(0..100);
    /// deque.clear();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.begin(), deque.end());
    /// ```
    pub fn clear(&mut self) {
        let (arena, root, end) = Self::empty_chain();
        log::trace!("clearing {} elements", self.len());
        self.arena = arena;
        self.root = root;
        self.end = end;
        self.total = 1;
        self.threshold = self.config.initial_threshold;
        self.block_size = self.config.initial_block_size;
        self.epoch += 1;
    }

    /// Returns a reference to the first element, or
    /// [`DequeError::EmptyContainer`].
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::{Deque, DequeError};
    ///
    /// let mut deque = Deque::new();
    /// assert_eq!(deque.front(), Err(DequeError::EmptyContainer));
    ///
    /// deque.push_front(1);
    /// assert_eq!(deque.front(), Ok(&1));
    /// ```
    pub fn front(&self) -> Result<&T> {
        self.arena
            .node(self.begin_loc().node)
            .slot
            .value()
            .ok_or(DequeError::EmptyContainer)
    }

    /// Mutable version of [`Deque::front`].
    pub fn front_mut(&mut self) -> Result<&mut T> {
        let node = self.begin_loc().node;
        self.arena
            .node_mut(node)
            .slot
            .value_mut()
            .ok_or(DequeError::EmptyContainer)
    }

    /// Returns a reference to the last element, or
    /// [`DequeError::EmptyContainer`].
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::{Deque, DequeError};
    ///
    /// let mut deque = Deque::new();
    /// assert_eq!(deque.back(), Err(DequeError::EmptyContainer));
    ///
    /// deque.push_back(1);
    /// deque.push_back(2);
    /// assert_eq!(deque.back(), Ok(&2));
    /// ```
    pub fn back(&self) -> Result<&T> {
        let last = self
            .arena
            .prev_loc(self.end)
            .ok_or(DequeError::EmptyContainer)?;
        self.arena
            .node(last.node)
            .slot
            .value()
            .ok_or(DequeError::EmptyContainer)
    }

    /// Mutable version of [`Deque::back`].
    pub fn back_mut(&mut self) -> Result<&mut T> {
        let last = self
            .arena
            .prev_loc(self.end)
            .ok_or(DequeError::EmptyContainer)?;
        self.arena
            .node_mut(last.node)
            .slot
            .value_mut()
            .ok_or(DequeError::EmptyContainer)
    }

    /// Returns a reference to the element at `index`, or
    /// [`DequeError::IndexOutOfBound`] if `index >= len`.
    ///
    /// This operation should compute in *O*(√*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::{Deque, DequeError};
    ///
    /// let deque = Deque::from_iter(0..1000);
    /// assert_eq!(deque.at(999), Ok(&999));
    /// assert_eq!(deque.at(1000), Err(DequeError::IndexOutOfBound { index: 1000, len: 1000 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len();
        if index >= len {
            return Err(DequeError::IndexOutOfBound { index, len });
        }
        let loc = self.locate(index);
        self.arena
            .node(loc.node)
            .slot
            .value()
            .ok_or(DequeError::IndexOutOfBound { index, len })
    }

    /// Mutable version of [`Deque::at`].
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len();
        if index >= len {
            return Err(DequeError::IndexOutOfBound { index, len });
        }
        let loc = self.locate(index);
        self.arena
            .node_mut(loc.node)
            .slot
            .value_mut()
            .ok_or(DequeError::IndexOutOfBound { index, len })
    }

    /// The position of the first element, equal to [`Deque::end`] when the
    /// deque is empty.
    pub fn begin(&self) -> Position {
        self.position(self.begin_loc())
    }

    /// The position one past the last element.
    pub fn end(&self) -> Position {
        self.position(self.end)
    }

    /// Returns a reference to the element at `position`.
    ///
    /// Fails with [`DequeError::InvalidIterator`] at the end position.
    pub fn get(&self, position: Position) -> Result<&T> {
        let loc = self.resolve(position)?;
        self.arena
            .node(loc.node)
            .slot
            .value()
            .ok_or(DequeError::InvalidIterator)
    }

    /// Mutable version of [`Deque::get`].
    pub fn get_mut(&mut self, position: Position) -> Result<&mut T> {
        let loc = self.resolve(position)?;
        self.arena
            .node_mut(loc.node)
            .slot
            .value_mut()
            .ok_or(DequeError::InvalidIterator)
    }

    /// The position `n` elements after `position` (before it if `n` is
    /// negative).
    ///
    /// Fails with [`DequeError::InvalidIterator`] when the move runs off
    /// either end of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::{Deque, DequeError};
    ///
    /// let deque = Deque::from_iter(0..100);
    /// let pos = deque.offset(deque.begin(), 42).unwrap();
    /// assert_eq!(deque.get(pos), Ok(&42));
    /// assert_eq!(deque.offset(pos, -42), Ok(deque.begin()));
    /// assert_eq!(deque.offset(pos, 59), Err(DequeError::InvalidIterator));
    /// ```
    pub fn offset(&self, position: Position, n: isize) -> Result<Position> {
        let loc = self.resolve(position)?;
        let moved = self.offset_loc(loc, n)?;
        Ok(self.position(moved))
    }

    /// The signed distance from `from` to `to`, i.e. the `n` such that
    /// `offset(from, n) == to`.
    ///
    /// Fails with [`DequeError::InvalidIterator`] when the two positions come
    /// from different deques.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::Deque;
    ///
    /// let deque = Deque::from_iter(0..100);
    /// let pos = deque.offset(deque.begin(), 42).unwrap();
    /// assert_eq!(deque.distance(deque.begin(), pos), Ok(42));
    /// assert_eq!(deque.distance(deque.end(), pos), Ok(-58));
    /// ```
    pub fn distance(&self, from: Position, to: Position) -> Result<isize> {
        if from.owner != to.owner {
            return Err(DequeError::InvalidIterator);
        }
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.distance_loc(from, to)
    }

    /// Inserts `value` right before `position`, and returns the position of
    /// the inserted element.
    ///
    /// Fails with [`DequeError::WrongOwner`] if `position` was issued by
    /// another deque.
    ///
    /// This operation should compute in *O*(√*n*) amortized time.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::Deque;
    ///
    /// let mut deque = Deque::from_iter([1, 2, 4]);
    /// let pos = deque.offset(deque.begin(), 2).unwrap();
    /// let pos = deque.insert(pos, 3).unwrap();
    /// assert_eq!(deque.get(pos), Ok(&3));
    /// assert_eq!(Vec::from_iter(deque), vec![1, 2, 3, 4]);
    /// ```
    pub fn insert(&mut self, position: Position, value: T) -> Result<Position> {
        let loc = self.resolve(position)?;
        let inserted = self.insert_at(loc, value);
        Ok(self.position(inserted))
    }

    /// Removes the element at `position`, and returns the position of the
    /// element that followed it ([`Deque::end`] if it was the last one).
    ///
    /// Fails with [`DequeError::WrongOwner`] if `position` was issued by
    /// another deque, and with [`DequeError::BadPosition`] at the end
    /// position.
    ///
    /// This operation should compute in *O*(√*n*) amortized time.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::Deque;
    ///
    /// let mut deque = Deque::from_iter([1, 2, 3, 4, 5]);
    /// let pos = deque.offset(deque.begin(), 2).unwrap();
    /// let next = deque.erase(pos).unwrap();
    /// assert_eq!(deque.get(next), Ok(&4));
    /// assert_eq!(Vec::from_iter(deque), vec![1, 2, 4, 5]);
    /// ```
    pub fn erase(&mut self, position: Position) -> Result<Position> {
        let loc = self.resolve(position)?;
        let (_, successor) = self.erase_at(loc)?;
        Ok(self.position(successor))
    }

    /// Appends an element to the front of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::Deque;
    ///
    /// let mut deque = Deque::new();
    /// deque.push_front(2);
    /// deque.push_front(1);
    /// assert_eq!(deque.front(), Ok(&1));
    /// ```
    pub fn push_front(&mut self, value: T) {
        let begin = self.begin_loc();
        self.insert_at(begin, value);
    }

    /// Appends an element to the back of the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::Deque;
    ///
    /// let mut deque = Deque::new();
    /// deque.push_back(1);
    /// deque.push_back(3);
    /// assert_eq!(deque.back(), Ok(&3));
    /// ```
    pub fn push_back(&mut self, value: T) {
        let end = self.end;
        self.insert_at(end, value);
    }

    /// Removes the first element and returns it, or fails with
    /// [`DequeError::EmptyContainer`].
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::{Deque, DequeError};
    ///
    /// let mut deque = Deque::from_iter([1, 3]);
    /// assert_eq!(deque.pop_front(), Ok(1));
    /// assert_eq!(deque.pop_front(), Ok(3));
    /// assert_eq!(deque.pop_front(), Err(DequeError::EmptyContainer));
    /// ```
    pub fn pop_front(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(DequeError::EmptyContainer);
        }
        let begin = self.begin_loc();
        self.erase_at(begin).map(|(value, _)| value)
    }

    /// Removes the last element and returns it, or fails with
    /// [`DequeError::EmptyContainer`].
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::{Deque, DequeError};
    ///
    /// let mut deque = Deque::from_iter([1, 3]);
    /// assert_eq!(deque.pop_back(), Ok(3));
    /// assert_eq!(deque.pop_back(), Ok(1));
    /// assert_eq!(deque.pop_back(), Err(DequeError::EmptyContainer));
    /// ```
    pub fn pop_back(&mut self) -> Result<T> {
        let last = self
            .arena
            .prev_loc(self.end)
            .ok_or(DequeError::EmptyContainer)?;
        self.erase_at(last).map(|(value, _)| value)
    }

    /// Creates a cursor at the first element (at the end position if the
    /// deque is empty).
    pub fn cursor_start(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.begin_loc())
    }

    /// Creates a cursor at the end position.
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.end)
    }

    /// Creates a cursor at `position`.
    pub fn cursor(&self, position: Position) -> Result<Cursor<'_, T>> {
        let loc = self.resolve(position)?;
        Ok(Cursor::new(self, loc))
    }

    /// Creates an editing cursor at the first element (at the end position
    /// if the deque is empty).
    pub fn cursor_start_mut(&mut self) -> CursorMut<'_, T> {
        let begin = self.begin_loc();
        CursorMut::new(self, begin)
    }

    /// Creates an editing cursor at the end position.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T> {
        let end = self.end;
        CursorMut::new(self, end)
    }

    /// Creates an editing cursor at `position`.
    pub fn cursor_mut(&mut self, position: Position) -> Result<CursorMut<'_, T>> {
        let loc = self.resolve(position)?;
        Ok(CursorMut::new(self, loc))
    }

    /// Provides a forward iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::Deque;
    ///
    /// let deque = Deque::from_iter(0..3);
    /// let mut iter = deque.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next_back(), Some(&2));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Provides a forward iterator with mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::Deque;
    ///
    /// let mut deque = Deque::from_iter(0..3);
    /// deque.iter_mut().for_each(|x| *x += 10);
    /// assert_eq!(Vec::from_iter(deque), vec![10, 11, 12]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }
}

impl<T> Index<usize> for Deque<T> {
    type Output = T;

    /// Panics with [`DequeError::IndexOutOfBound`] if `index >= len`.
    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T> IndexMut<usize> for Deque<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T: Debug> Debug for Deque<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl<T> Deque<T> {
    /// Walk the whole structure and check every link, count and cached
    /// location against each other.
    pub(crate) fn assert_consistent(&self) {
        let arena = &self.arena;
        assert_eq!(arena.block(self.root).prev, None, "root has a predecessor");

        let mut nodes = 0;
        let mut blocks = 0;
        let mut prev_block = None;
        let mut block = Some(self.root);
        while let Some(key) = block {
            let current = arena.block(key);
            assert_eq!(current.prev, prev_block, "broken block back link");
            assert!(current.len > 0, "empty block left in the chain");
            assert!(
                current.len < 2 * self.block_size,
                "block of {} nodes escaped splitting",
                current.len
            );

            let mut count = 0;
            let mut prev_node = None;
            let mut node = Some(current.head);
            while let Some(node_key) = node {
                let entry = arena.node(node_key);
                assert_eq!(entry.prev, prev_node, "broken node back link");
                assert_eq!(entry.block, key, "node claims another block");
                let is_last = entry.next.is_none() && current.next.is_none();
                assert_eq!(entry.slot.is_end(), is_last, "misplaced end marker");
                count += 1;
                prev_node = Some(node_key);
                node = entry.next;
            }
            assert_eq!(prev_node, Some(current.tail), "tail is not the last node");
            assert_eq!(count, current.len, "block length is off");

            nodes += count;
            blocks += 1;
            prev_block = Some(key);
            block = current.next;
        }
        assert_eq!(nodes, self.total);
        assert_eq!(nodes, arena.nodes.len(), "leaked nodes");
        assert_eq!(blocks, arena.block_count(), "leaked blocks");
        assert_eq!(self.end, arena.locate_end(self.root), "stale end location");
    }
}

#[cfg(test)]
mod tests {
    use crate::{Deque, DequeError};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[test]
    fn deque_create() {
        let mut deque = Deque::<i32>::new();
        assert!(deque.is_empty());
        assert_eq!(deque.begin(), deque.end());
        deque.push_back(1);
        assert!(!deque.is_empty());
        assert_eq!(deque.pop_back(), Ok(1));
        assert!(deque.is_empty());
        deque.assert_consistent();
    }

    #[test]
    fn deque_drop() {
        #[derive(Debug)]
        struct DropChecker<'a, T: Copy> {
            value: T,
            dropped: &'a RefCell<Vec<T>>,
        }
        impl<'a, T: Copy> DropChecker<'a, T> {
            fn new(value: T, dropped: &'a RefCell<Vec<T>>) -> Self {
                Self { value, dropped }
            }
        }
        impl<'a, T: Copy> Drop for DropChecker<'a, T> {
            fn drop(&mut self) {
                self.dropped.borrow_mut().push(self.value);
            }
        }
        let dropped = RefCell::new(Vec::<i32>::new());
        let mut deque = Deque::new();
        for value in 0..100 {
            deque.push_back(DropChecker::new(value, &dropped));
        }
        // rebuilds move elements around without dropping them
        assert!(dropped.borrow().is_empty());
        let popped = deque.pop_front().unwrap();
        assert_eq!(popped.value, 0);
        drop(popped);
        drop(deque);
        let mut dropped = dropped.into_inner();
        dropped.sort_unstable();
        assert_eq!(dropped, Vec::from_iter(0..100));
    }

    #[test]
    fn deque_push_and_pop() {
        let mut deque = Deque::new();
        assert_eq!(deque.len(), 0);
        assert_eq!(deque.front(), Err(DequeError::EmptyContainer));
        assert_eq!(deque.back(), Err(DequeError::EmptyContainer));
        assert_eq!(deque.pop_front(), Err(DequeError::EmptyContainer));
        assert_eq!(deque.pop_back(), Err(DequeError::EmptyContainer));

        deque.push_back(1);
        assert_eq!(deque.back(), Ok(&1));
        assert_eq!(deque.pop_front(), Ok(1));
        assert_eq!(deque.pop_back(), Err(DequeError::EmptyContainer));

        deque.push_front(1);
        deque.push_front(2);
        deque.push_back(3);
        assert_eq!(deque.back(), Ok(&3));
        assert_eq!(deque.front(), Ok(&2));
        *deque.front_mut().unwrap() = 20;
        *deque.back_mut().unwrap() = 30;
        assert_eq!(deque.pop_front(), Ok(20));
        assert_eq!(deque.pop_back(), Ok(30));
        assert_eq!(deque.front(), Ok(&1));
        assert_eq!(deque.pop_front(), Ok(1));
        assert!(deque.is_empty());
        deque.assert_consistent();
    }

    #[test]
    fn deque_push_then_pop_front() {
        let mut deque = Deque::new();
        for value in 1..=1000 {
            deque.push_back(value);
        }
        deque.assert_consistent();
        for k in 1..=1000 {
            assert_eq!(deque.pop_front(), Ok(k));
            assert_eq!(deque.len(), 1000 - k as usize);
        }
        assert_eq!(deque.len(), 0);
        deque.assert_consistent();
    }

    #[test]
    fn deque_erase_middle() {
        let mut deque = Deque::from_iter([1, 2, 3, 4, 5]);
        let third = deque.offset(deque.begin(), 2).unwrap();
        let next = deque.erase(third).unwrap();
        assert_eq!(deque.get(next), Ok(&4));
        assert_eq!(Vec::from_iter(deque.iter().copied()), vec![1, 2, 4, 5]);

        let last = deque.offset(deque.end(), -1).unwrap();
        assert_eq!(deque.erase(last), Ok(deque.end()));
        assert_eq!(deque.erase(deque.end()), Err(DequeError::BadPosition));
        deque.assert_consistent();
    }

    #[test]
    fn deque_random_access() {
        let mut deque = Deque::new();
        for value in 0..100_000 {
            deque.push_back(value);
        }
        assert_eq!(deque.at(50_000), Ok(&50_000));
        assert_eq!(deque[99_999], 99_999);
        assert_eq!(deque.at(deque.len() - 1), deque.back());
        assert_eq!(
            deque.at(deque.len()),
            Err(DequeError::IndexOutOfBound {
                index: 100_000,
                len: 100_000
            })
        );
        for index in (0..100_000).step_by(997) {
            assert_eq!(deque.at(index as usize), Ok(&index));
        }
        deque[7] = -7;
        *deque.at_mut(8).unwrap() = -8;
        assert_eq!(deque.at(7), Ok(&-7));
        assert_eq!(deque.at(8), Ok(&-8));
        deque.assert_consistent();
    }

    #[test]
    #[should_panic(expected = "out of bound")]
    fn deque_index_panics() {
        let deque = Deque::from_iter(0..3);
        let _ = deque[3];
    }

    #[test]
    fn deque_clear() {
        let mut deque = Deque::<i32>::new();
        deque.clear();
        assert_eq!(deque.len(), 0);
        assert_eq!(deque.begin(), deque.end());

        deque.extend(0..500);
        let stale = deque.begin();
        deque.clear();
        deque.clear();
        assert_eq!(deque.len(), 0);
        assert_eq!(deque.begin(), deque.end());
        assert_eq!(deque.block_size(), deque.config().initial_block_size());
        assert_eq!(deque.get(stale), Err(DequeError::InvalidIterator));
        deque.assert_consistent();

        deque.push_back(1);
        assert_eq!(Vec::from_iter(deque.iter().copied()), vec![1]);
    }

    #[test]
    fn deque_rejects_foreign_positions() {
        let mut deque = Deque::from_iter(0..10);
        let mut other = Deque::from_iter(0..10);
        let foreign = other.begin();
        assert_eq!(deque.insert(foreign, 1), Err(DequeError::WrongOwner));
        assert_eq!(deque.erase(foreign), Err(DequeError::WrongOwner));
        assert_eq!(deque.get(foreign), Err(DequeError::WrongOwner));
        assert_eq!(deque.get(deque.end()), Err(DequeError::InvalidIterator));
        // nothing was touched
        assert!(deque.iter().copied().eq(0..10));
        assert!(other.iter().copied().eq(0..10));
        assert!(other.erase(foreign).is_ok());
    }

    #[test]
    fn deque_rejects_stale_positions() {
        let mut deque = Deque::new();
        deque.push_back(0);
        let stale = deque.begin();
        // the next pushes reach the threshold and rebuild the chain
        deque.extend(1..10);
        assert_eq!(deque.erase(stale), Err(DequeError::InvalidIterator));
        assert_eq!(deque.insert(stale, 1), Err(DequeError::InvalidIterator));
        assert!(deque.iter().copied().eq(0..10));
    }

    #[test]
    fn deque_rejects_positions_of_erased_elements() {
        let mut deque = Deque::from_iter([1, 2, 3]);
        let first = deque.begin();
        let erased = deque.offset(deque.begin(), 1).unwrap();
        deque.erase(erased).unwrap();
        // the new element takes over the freed node slot
        let second = deque.offset(deque.begin(), 1).unwrap();
        let inserted = deque.insert(second, 9).unwrap();
        assert_eq!(inserted.loc, erased.loc);

        assert_eq!(deque.get(erased), Err(DequeError::InvalidIterator));
        assert_eq!(deque.insert(erased, 0), Err(DequeError::InvalidIterator));
        assert_eq!(deque.erase(erased), Err(DequeError::InvalidIterator));
        assert_eq!(deque.get(inserted), Ok(&9));
        assert_eq!(deque.get(first), Ok(&1));
        assert!(deque.iter().copied().eq([1, 9, 3]));
        deque.assert_consistent();
    }

    #[test]
    fn deque_insert_everywhere() {
        let mut deque = Deque::new();
        let mut model = VecDeque::new();
        for value in 0..300usize {
            let index = (value * 7919) % (model.len() + 1);
            let pos = deque.offset(deque.begin(), index as isize).unwrap();
            let pos = deque.insert(pos, value).unwrap();
            model.insert(index, value);
            assert_eq!(deque.get(pos), Ok(&value));
            assert_eq!(deque.distance(deque.begin(), pos), Ok(index as isize));
        }
        deque.assert_consistent();
        assert!(deque.iter().eq(model.iter()));

        for step in 0..150usize {
            let index = (step * 104_729) % model.len();
            let pos = deque.offset(deque.begin(), index as isize).unwrap();
            let next = deque.erase(pos).unwrap();
            model.remove(index);
            assert_eq!(deque.get(next).ok(), model.get(index));
        }
        deque.assert_consistent();
        assert!(deque.iter().eq(model.iter()));
    }
}
