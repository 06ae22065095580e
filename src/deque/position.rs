//! Positions of a [`Deque`] and the arithmetic on them.
//!
//! Moving a position by `n` first consumes the nodes left in its block,
//! then hops over whole blocks while the remaining offset does not fit in
//! one, and finishes node by node in the destination block. The distance
//! between two positions is found by walking the block chain outwards from
//! one of them, forwards and backwards in lockstep, until the other one's
//! block is met.

use crate::deque::chain::{BlockKey, Loc};
use crate::deque::{Deque, DequeId};
use crate::error::{DequeError, Result};

/// A position inside a [`Deque`]: either an element, or the end position
/// one past the last element.
///
/// A `Position` is a plain handle that does not borrow its deque, so it can
/// be handed back to [`Deque::insert`] or [`Deque::erase`]. It stays valid
/// until the deque is restructured around it: a rebuild, a [`Deque::clear`]
/// or a [`Clone::clone_from`] invalidates every position, a split
/// invalidates the positions of the nodes that moved to the new block, and
/// erasing an element invalidates the positions of that element.
/// Positions returned by `insert`, `erase` and `offset` are always fresh.
///
/// Using a position of another deque fails with [`DequeError::WrongOwner`],
/// and an invalidated one with [`DequeError::InvalidIterator`].
///
/// # Examples
///
/// ```
/// use block_deque::Deque;
///
/// let mut deque = Deque::from_iter([1, 2, 3, 4, 5]);
/// let third = deque.offset(deque.begin(), 2).unwrap();
/// let next = deque.erase(third).unwrap();
/// assert_eq!(deque.get(next), Ok(&4));
/// assert_eq!(deque.distance(deque.begin(), next), Ok(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) owner: DequeId,
    pub(crate) epoch: u64,
    /// generation of the node at `loc` when the position was issued
    pub(crate) generation: u32,
    pub(crate) loc: Loc,
}

impl<T> Deque<T> {
    /// Move `from` by `n` nodes, forwards if `n` is positive.
    pub(crate) fn offset_loc(&self, from: Loc, n: isize) -> Result<Loc> {
        if n >= 0 {
            self.forward(from, n.unsigned_abs())
        } else {
            self.backward(from, n.unsigned_abs())
        }
    }

    fn forward(&self, mut at: Loc, mut steps: usize) -> Result<Loc> {
        while steps > 0 {
            match self.arena.node(at.node).next {
                Some(next) => {
                    at.node = next;
                    steps -= 1;
                }
                None => break,
            }
        }
        if steps == 0 {
            return Ok(at);
        }
        steps -= 1;
        at = self.next_block_head(at.block)?;
        while steps > 0 && steps >= self.arena.block(at.block).len {
            steps -= self.arena.block(at.block).len;
            at = self.next_block_head(at.block)?;
        }
        at.node = self.arena.walk_forward(at.node, steps);
        Ok(at)
    }

    fn backward(&self, mut at: Loc, mut steps: usize) -> Result<Loc> {
        while steps > 0 {
            match self.arena.node(at.node).prev {
                Some(prev) => {
                    at.node = prev;
                    steps -= 1;
                }
                None => break,
            }
        }
        if steps == 0 {
            return Ok(at);
        }
        steps -= 1;
        at = self.prev_block_tail(at.block)?;
        while steps > 0 && steps >= self.arena.block(at.block).len {
            steps -= self.arena.block(at.block).len;
            at = self.prev_block_tail(at.block)?;
        }
        at.node = self.arena.walk_backward(at.node, steps);
        Ok(at)
    }

    fn next_block_head(&self, block: BlockKey) -> Result<Loc> {
        self.arena
            .block(block)
            .next
            .map(|next| self.arena.head(next))
            .ok_or(DequeError::InvalidIterator)
    }

    fn prev_block_tail(&self, block: BlockKey) -> Result<Loc> {
        self.arena
            .block(block)
            .prev
            .map(|prev| self.arena.tail(prev))
            .ok_or(DequeError::InvalidIterator)
    }

    /// The number of nodes before `at`.
    pub(crate) fn index_of(&self, at: Loc) -> usize {
        let mut index = self.arena.offset_in_block(at);
        let mut block = self.arena.block(at.block).prev;
        while let Some(key) = block {
            let current = self.arena.block(key);
            index += current.len;
            block = current.prev;
        }
        index
    }

    /// The signed number of steps from `from` to `to`.
    pub(crate) fn distance_loc(&self, from: Loc, to: Loc) -> Result<isize> {
        let from_offset = self.arena.offset_in_block(from);
        let to_offset = self.arena.offset_in_block(to);
        if from.block == to.block {
            return Ok(to_offset as isize - from_offset as isize);
        }

        let origin = self.arena.block(from.block);
        // nodes from `from` to the end of its block, and before `from` within it
        let mut ahead_count = origin.len - from_offset;
        let mut behind_count = from_offset;
        let mut ahead = origin.next;
        let mut behind = origin.prev;
        while ahead.is_some() || behind.is_some() {
            if let Some(block) = ahead {
                if block == to.block {
                    return Ok((ahead_count + to_offset) as isize);
                }
                let block = self.arena.block(block);
                ahead_count += block.len;
                ahead = block.next;
            }
            if let Some(block) = behind {
                let len = self.arena.block(block).len;
                if block == to.block {
                    return Ok(-((behind_count + len - to_offset) as isize));
                }
                behind_count += len;
                behind = self.arena.block(block).prev;
            }
        }
        Err(DequeError::InvalidIterator)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Config, Deque, DequeError};

    fn scattered(len: i32) -> Deque<i32> {
        // a small block size keeps the chain long
        let config = Config::new()
            .with_initial_threshold(1 << 20)
            .with_initial_block_size(2);
        let mut deque = Deque::with_config(config).unwrap();
        deque.extend(0..len);
        deque
    }

    #[test]
    fn offset_within_and_across_blocks() {
        let deque = scattered(50);
        assert!(deque.block_count() > 10);
        let begin = deque.begin();
        for n in 0..50 {
            let pos = deque.offset(begin, n).unwrap();
            assert_eq!(deque.get(pos), Ok(&(n as i32)));
        }
        assert_eq!(deque.offset(begin, 50), Ok(deque.end()));

        let end = deque.end();
        for n in 1..=50 {
            let pos = deque.offset(end, -n).unwrap();
            assert_eq!(deque.get(pos), Ok(&(50 - n as i32)));
        }
        assert_eq!(deque.offset(end, -50), Ok(begin));
    }

    #[test]
    fn offset_past_either_end_fails() {
        let deque = scattered(20);
        assert_eq!(
            deque.offset(deque.end(), 1),
            Err(DequeError::InvalidIterator)
        );
        assert_eq!(
            deque.offset(deque.begin(), 21),
            Err(DequeError::InvalidIterator)
        );
        assert_eq!(
            deque.offset(deque.begin(), -1),
            Err(DequeError::InvalidIterator)
        );
        assert_eq!(
            deque.offset(deque.end(), -21),
            Err(DequeError::InvalidIterator)
        );

        let empty = Deque::<i32>::new();
        assert_eq!(empty.offset(empty.begin(), 0), Ok(empty.end()));
        assert_eq!(
            empty.offset(empty.begin(), 1),
            Err(DequeError::InvalidIterator)
        );
    }

    #[test]
    fn offset_is_associative() {
        let deque = scattered(40);
        let start = deque.offset(deque.begin(), 7).unwrap();
        for a in -7..=33 {
            for b in [-20isize, -3, 0, 1, 5, 19] {
                let total = a + b;
                if !(-7..=33).contains(&total) {
                    continue;
                }
                let stepwise = deque
                    .offset(deque.offset(start, a).unwrap(), b)
                    .unwrap();
                assert_eq!(stepwise, deque.offset(start, total).unwrap());
            }
        }
    }

    #[test]
    fn distance_matches_offset() {
        let deque = scattered(40);
        let positions: Vec<_> = (0..=40)
            .map(|n| deque.offset(deque.begin(), n).unwrap())
            .collect();
        for (i, &from) in positions.iter().enumerate() {
            for (j, &to) in positions.iter().enumerate() {
                let n = j as isize - i as isize;
                assert_eq!(deque.distance(from, to), Ok(n));
                assert_eq!(deque.offset(from, n), Ok(to));
            }
        }
    }

    #[test]
    fn distance_rejects_foreign_positions() {
        let deque = scattered(5);
        let other = deque.clone();
        assert_eq!(
            deque.distance(deque.begin(), other.end()),
            Err(DequeError::InvalidIterator)
        );
        assert_eq!(
            deque.distance(other.begin(), other.end()),
            Err(DequeError::WrongOwner)
        );
        assert_eq!(other.distance(other.begin(), other.end()), Ok(5));
    }
}
