//! Block-size upkeep of a [`Deque`].
//!
//! Blocks only ever split: an insertion that grows a block to twice the
//! target block size cuts it in half, while erasures never merge blocks and
//! only free a block once it is empty. Unbounded splitting is kept in check
//! by a periodic rebuild that re-chunks the whole sequence once the element
//! count reaches the capacity threshold.

use std::mem;

use crate::deque::chain::{Arena, BlockKey, Loc};
use crate::deque::Deque;

impl<T> Deque<T> {
    /// Rebalance `block` after an insertion, and return where `tracked`
    /// lives afterwards.
    ///
    /// A block holding `2 * block_size` nodes or more is split. Erasures
    /// never call this: shrunk blocks are left as they are.
    pub(crate) fn maintain(&mut self, block: BlockKey, mut tracked: Loc) -> Loc {
        if self.arena.block(block).len >= 2 * self.block_size {
            self.split(block, &mut tracked);
        }
        tracked
    }

    /// Split `block` at its midpoint: the later `len / 2` nodes move into a
    /// new block linked right after it.
    ///
    /// Returns `true` if `tracked` was among the moved nodes, in which case it
    /// is rewritten to name the new block.
    pub(crate) fn split(&mut self, block: BlockKey, tracked: &mut Loc) -> bool {
        let len = self.arena.block(block).len;
        let kept = (len + 1) / 2;
        let Some(fresh) = self.arena.split_block(block, kept) else {
            return false;
        };
        log::trace!(
            "split block of {} nodes into {} + {}",
            len,
            kept,
            len - kept
        );
        if self.arena.block(fresh).next.is_none() {
            self.end = self.arena.tail(fresh);
        }
        let moved = tracked.block == block && self.arena.node(tracked.node).block == fresh;
        if moved {
            tracked.block = fresh;
        }
        moved
    }

    /// Re-chunk the whole chain once the element count reached the capacity
    /// threshold, and return the new location of `tracked`.
    ///
    /// The threshold doubles, the block size grows until `(b + 1)²` exceeds
    /// the threshold (so `b` tracks `⌊√threshold⌋` and never shrinks), and
    /// the nodes are redistributed into fresh blocks of `2 * b - 1` nodes.
    /// Every position issued before is invalidated.
    pub(crate) fn rebuild(&mut self, tracked: Loc) -> Loc {
        if self.total < self.threshold {
            return tracked;
        }
        self.threshold = self.threshold.saturating_mul(2);
        while (self.block_size + 1) * (self.block_size + 1) <= self.threshold {
            self.block_size += 1;
        }
        let chunk = 2 * self.block_size - 1;

        let mut old = mem::replace(
            &mut self.arena,
            Arena::with_capacity(self.total, self.total / chunk + 1),
        );
        let mut remapped = None;
        let mut first: Option<BlockKey> = None;
        let mut last: Option<Loc> = None;
        let mut source = Some(self.root);
        while let Some(block_key) = source {
            let block = old.blocks.remove(block_key.0);
            let mut node_key = Some(block.head);
            while let Some(key) = node_key {
                let node = old.nodes.remove(key.0);
                node_key = node.next;
                let loc = match last {
                    Some(last) if self.arena.block(last.block).len < chunk => Loc {
                        block: last.block,
                        node: self.arena.push_node(last.block, node.slot),
                    },
                    _ => {
                        let opened = self.arena.open_block(last.map(|last| last.block), node.slot);
                        first.get_or_insert(opened.block);
                        opened
                    }
                };
                if key == tracked.node {
                    remapped = Some(loc);
                }
                last = Some(loc);
            }
            source = block.next;
        }
        debug_assert!(old.nodes.is_empty() && old.blocks.is_empty());

        if let (Some(first), Some(last)) = (first, last) {
            self.root = first;
            self.end = last;
        }
        self.epoch += 1;
        log::debug!(
            "rebuilt {} nodes into {} blocks (threshold {}, block size {})",
            self.total,
            self.arena.block_count(),
            self.threshold,
            self.block_size
        );
        remapped.unwrap_or(self.end)
    }
}
