//! Node and block storage of a [`Deque`](crate::Deque).
//!
//! Nodes and blocks live in two slabs owned by the deque, and link to each
//! other by key. A key is held by exactly one link slot at a time (a `prev`,
//! `next`, `head` or `tail` field), and a slab entry is freed in the same
//! step it is unlinked.
//!
//! # Naming Conventions
//!
//! - a *location* ([`Loc`]) is a `(block, node)` pair naming one node;
//! - the *head*/*tail* of a block are its first/last nodes;
//! - the *end marker* is the tail node of the last block, the only node
//!   without a value.

use slab::Slab;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BlockKey(pub(crate) usize);

/// A node together with the block it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Loc {
    pub(crate) block: BlockKey,
    pub(crate) node: NodeKey,
}

/// Payload of a node: an element, or the end marker.
#[derive(Debug, Clone)]
pub(crate) enum Slot<T> {
    Value(T),
    End,
}

pub(crate) struct Node<T> {
    pub(crate) slot: Slot<T>,
    /// the block whose chain this node belongs to
    pub(crate) block: BlockKey,
    /// distinguishes this node from earlier ones stored under the same key
    pub(crate) generation: u32,
    pub(crate) prev: Option<NodeKey>,
    pub(crate) next: Option<NodeKey>,
}

/// A non-empty run of nodes, linked into the top-level chain.
pub(crate) struct Block {
    pub(crate) head: NodeKey,
    pub(crate) tail: NodeKey,
    /// number of nodes in the block, the end marker included
    pub(crate) len: usize,
    pub(crate) prev: Option<BlockKey>,
    pub(crate) next: Option<BlockKey>,
}

pub(crate) struct Arena<T> {
    pub(crate) nodes: Slab<Node<T>>,
    pub(crate) blocks: Slab<Block>,
    /// generation handed to the next node created
    next_generation: u32,
}

impl<T> Slot<T> {
    pub(crate) fn is_end(&self) -> bool {
        matches!(self, Slot::End)
    }

    pub(crate) fn value(&self) -> Option<&T> {
        match self {
            Slot::Value(value) => Some(value),
            Slot::End => None,
        }
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Value(value) => Some(value),
            Slot::End => None,
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(nodes: usize, blocks: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(nodes),
            blocks: Slab::with_capacity(blocks),
            next_generation: 0,
        }
    }

    fn fresh_generation(&mut self) -> u32 {
        let generation = self.next_generation;
        self.next_generation = generation.wrapping_add(1);
        generation
    }

    pub(crate) fn node(&self, key: NodeKey) -> &Node<T> {
        &self.nodes[key.0]
    }

    pub(crate) fn node_mut(&mut self, key: NodeKey) -> &mut Node<T> {
        &mut self.nodes[key.0]
    }

    /// Like [`Arena::node`], but tolerates a key that is not (or no longer) live.
    pub(crate) fn get_node(&self, key: NodeKey) -> Option<&Node<T>> {
        self.nodes.get(key.0)
    }

    pub(crate) fn block(&self, key: BlockKey) -> &Block {
        &self.blocks[key.0]
    }

    pub(crate) fn block_mut(&mut self, key: BlockKey) -> &mut Block {
        &mut self.blocks[key.0]
    }

    pub(crate) fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn head(&self, block: BlockKey) -> Loc {
        Loc {
            block,
            node: self.block(block).head,
        }
    }

    pub(crate) fn tail(&self, block: BlockKey) -> Loc {
        Loc {
            block,
            node: self.block(block).tail,
        }
    }

    /// Open a block holding the single node `slot`, and link it right after
    /// `prev` (or as a detached chain start if `prev` is `None`).
    pub(crate) fn open_block(&mut self, prev: Option<BlockKey>, slot: Slot<T>) -> Loc {
        let block = BlockKey(self.blocks.vacant_key());
        let generation = self.fresh_generation();
        let node = NodeKey(self.nodes.insert(Node {
            slot,
            block,
            generation,
            prev: None,
            next: None,
        }));
        let next = prev.and_then(|prev| self.block(prev).next);
        let inserted = self.blocks.insert(Block {
            head: node,
            tail: node,
            len: 1,
            prev,
            next,
        });
        debug_assert_eq!(inserted, block.0);
        if let Some(prev) = prev {
            self.block_mut(prev).next = Some(block);
        }
        if let Some(next) = next {
            self.block_mut(next).prev = Some(block);
        }
        Loc { block, node }
    }

    /// Append the node `slot` after the tail of `block`.
    pub(crate) fn push_node(&mut self, block: BlockKey, slot: Slot<T>) -> NodeKey {
        let tail = self.block(block).tail;
        let generation = self.fresh_generation();
        let node = NodeKey(self.nodes.insert(Node {
            slot,
            block,
            generation,
            prev: Some(tail),
            next: None,
        }));
        self.node_mut(tail).next = Some(node);
        let block = self.block_mut(block);
        block.tail = node;
        block.len += 1;
        node
    }

    /// Link the node `slot` right before `at`, inside the block of `at`.
    pub(crate) fn splice_before(&mut self, at: Loc, slot: Slot<T>) -> NodeKey {
        let prev = self.node(at.node).prev;
        let generation = self.fresh_generation();
        let node = NodeKey(self.nodes.insert(Node {
            slot,
            block: at.block,
            generation,
            prev,
            next: Some(at.node),
        }));
        self.node_mut(at.node).prev = Some(node);
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(node),
            None => self.block_mut(at.block).head = node,
        }
        self.block_mut(at.block).len += 1;
        node
    }

    /// Unlink the node at `at` from its block and free it.
    ///
    /// A block left with no node is *not* unlinked here, see
    /// [`Arena::detach_block`].
    pub(crate) fn detach_node(&mut self, at: Loc) -> Node<T> {
        let node = self.nodes.remove(at.node.0);
        match (node.prev, node.next) {
            // the sole node of its block
            (None, None) => {}
            (None, Some(next)) => {
                self.node_mut(next).prev = None;
                self.block_mut(at.block).head = next;
            }
            (Some(prev), None) => {
                self.node_mut(prev).next = None;
                self.block_mut(at.block).tail = prev;
            }
            (Some(prev), Some(next)) => {
                self.node_mut(prev).next = Some(next);
                self.node_mut(next).prev = Some(prev);
            }
        }
        self.block_mut(at.block).len -= 1;
        node
    }

    /// Unlink an emptied block from the top-level chain and free it.
    pub(crate) fn detach_block(&mut self, key: BlockKey) -> Block {
        let block = self.blocks.remove(key.0);
        debug_assert_eq!(block.len, 0, "only empty blocks are freed");
        if let Some(prev) = block.prev {
            self.block_mut(prev).next = block.next;
        }
        if let Some(next) = block.next {
            self.block_mut(next).prev = block.prev;
        }
        block
    }

    /// Cut `block` after its first `kept` nodes. The remaining nodes move to
    /// a fresh block linked right after it, which is returned.
    ///
    /// Returns `None` (and leaves the chain alone) when there is nothing
    /// after the cut point.
    pub(crate) fn split_block(&mut self, key: BlockKey, kept: usize) -> Option<BlockKey> {
        let (head, tail, len, next) = {
            let block = self.block(key);
            (block.head, block.tail, block.len, block.next)
        };
        if kept == 0 || kept >= len {
            return None;
        }
        let mid = self.walk_forward(head, kept - 1);
        let first_moved = self.node(mid).next?;
        self.node_mut(mid).next = None;
        self.node_mut(first_moved).prev = None;

        let fresh = BlockKey(self.blocks.insert(Block {
            head: first_moved,
            tail,
            len: len - kept,
            prev: Some(key),
            next,
        }));
        if let Some(next) = next {
            self.block_mut(next).prev = Some(fresh);
        }
        let block = self.block_mut(key);
        block.tail = mid;
        block.len = kept;
        block.next = Some(fresh);

        let mut moved = Some(first_moved);
        while let Some(current) = moved {
            let node = self.node_mut(current);
            node.block = fresh;
            moved = node.next;
        }
        Some(fresh)
    }

    /// Follow `next` links from `from` at most `steps` times, stopping at the
    /// tail of the block.
    pub(crate) fn walk_forward(&self, from: NodeKey, steps: usize) -> NodeKey {
        let mut current = from;
        for _ in 0..steps {
            match self.node(current).next {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Follow `prev` links from `from` at most `steps` times, stopping at the
    /// head of the block.
    pub(crate) fn walk_backward(&self, from: NodeKey, steps: usize) -> NodeKey {
        let mut current = from;
        for _ in 0..steps {
            match self.node(current).prev {
                Some(prev) => current = prev,
                None => break,
            }
        }
        current
    }

    /// Number of nodes before `at` within its block.
    pub(crate) fn offset_in_block(&self, at: Loc) -> usize {
        let mut offset = 0;
        let mut current = self.node(at.node).prev;
        while let Some(prev) = current {
            offset += 1;
            current = self.node(prev).prev;
        }
        offset
    }

    /// The location following `at`, crossing into the next block if needed.
    pub(crate) fn next_loc(&self, at: Loc) -> Option<Loc> {
        match self.node(at.node).next {
            Some(node) => Some(Loc {
                block: at.block,
                node,
            }),
            None => self.block(at.block).next.map(|block| self.head(block)),
        }
    }

    /// The location preceding `at`, crossing into the previous block if needed.
    pub(crate) fn prev_loc(&self, at: Loc) -> Option<Loc> {
        match self.node(at.node).prev {
            Some(node) => Some(Loc {
                block: at.block,
                node,
            }),
            None => self.block(at.block).prev.map(|block| self.tail(block)),
        }
    }

    /// Locate the end marker by walking the chain from `root`.
    pub(crate) fn locate_end(&self, root: BlockKey) -> Loc {
        let mut block = root;
        while let Some(next) = self.block(block).next {
            block = next;
        }
        self.tail(block)
    }
}

impl<T: Clone> Arena<T> {
    /// Copy the chain starting at `root` into a fresh arena, block by block,
    /// and return it with its new root.
    pub(crate) fn deep_copy(&self, root: BlockKey) -> (Self, BlockKey) {
        let mut copy = Arena::with_capacity(self.nodes.len(), self.blocks.len());
        let copied_root = self.copy_block_into(root, None, &mut copy);
        let mut last = copied_root;
        let mut source = self.block(root).next;
        while let Some(block) = source {
            last = self.copy_block_into(block, Some(last), &mut copy);
            source = self.block(block).next;
        }
        (copy, copied_root)
    }

    fn copy_block_into(&self, key: BlockKey, after: Option<BlockKey>, copy: &mut Self) -> BlockKey {
        let head = self.node(self.block(key).head);
        let opened = copy.open_block(after, head.slot.clone());
        let mut source = head.next;
        while let Some(current) = source {
            let node = self.node(current);
            copy.push_node(opened.block, node.slot.clone());
            source = node.next;
        }
        opened.block
    }
}
