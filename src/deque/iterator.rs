use crate::deque::chain::{Arena, Block, Loc, Node, NodeKey};
use crate::deque::Deque;
use slab::Slab;
use std::collections::HashMap;
use std::fmt;
use std::iter::FusedIterator;

/// An iterator over the elements of a `Deque`.
///
/// `front` is the next element to yield from the front, and `back` the
/// position right after the next element to yield from the back. `len`
/// counts the elements left in between.
///
/// # Examples
///
/// ```compile_fail
/// use block_deque::Deque;
///
/// let mut deque = Deque::from_iter([1, 2, 3]);
/// let mut iter = deque.iter();
///
/// // Won't compile, because deque is already borrowed immutably.
/// deque.push_back(4);
/// println!("{:?}", iter.next());
/// ```
pub struct Iter<'a, T: 'a> {
    arena: &'a Arena<T>,
    front: Loc,
    back: Loc,
    len: usize,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(deque: &'a Deque<T>) -> Self {
        Self {
            arena: &deque.arena,
            front: deque.begin_loc(),
            back: deque.end_loc(),
            len: deque.len(),
        }
    }
}

impl<'a, T: 'a> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_tuple("Iter");
        for item in self.clone() {
            f.field(item);
        }
        f.finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let arena: &'a Arena<T> = self.arena;
        let current = self.front;
        // an element is always followed by at least the end marker
        self.front = arena.next_loc(current)?;
        self.len -= 1;
        arena.node(current.node).slot.value()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let arena: &'a Arena<T> = self.arena;
        self.back = arena.prev_loc(self.back)?;
        self.len -= 1;
        arena.node(self.back.node).slot.value()
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

/// A mutable iterator over the elements of a `Deque`.
///
/// The elements are borrowed straight out of the node slab by walking its
/// own iterator from both ends. A node met before its turn in sequence order
/// is parked until it is reached. Nodes laid out in key order, as they are
/// after a rebuild or a run of `push_back`, are never parked. `front` and
/// `back` are the keys of the next nodes to yield from either side.
///
/// # Examples
///
/// `Deque` is not readable after an `IterMut` is created.
/// ```compile_fail
/// use block_deque::Deque;
///
/// let mut deque = Deque::from_iter([1, 2, 3]);
/// let mut iter = deque.iter_mut();
/// println!("{:?}", deque.back());
/// println!("{:?}", iter.next());
/// ```
pub struct IterMut<'a, T: 'a> {
    slots: slab::IterMut<'a, Node<T>>,
    parked: HashMap<NodeKey, &'a mut Node<T>>,
    blocks: &'a Slab<Block>,
    front: NodeKey,
    back: NodeKey,
    len: usize,
}

impl<'a, T: 'a> IterMut<'a, T> {
    pub(crate) fn new(deque: &'a mut Deque<T>) -> Self {
        let front = deque.begin_loc().node;
        // with no element, `back` is never read
        let back = deque
            .arena
            .prev_loc(deque.end_loc())
            .map_or(front, |last| last.node);
        let len = deque.len();
        let Arena { nodes, blocks, .. } = &mut deque.arena;
        Self {
            slots: nodes.iter_mut(),
            parked: HashMap::new(),
            blocks,
            front,
            back,
            len,
        }
    }

    /// Hand out the node stored under `key`, pulling slab entries from the
    /// front (or the back) until it shows up.
    fn take(&mut self, key: NodeKey, from_back: bool) -> Option<&'a mut Node<T>> {
        if let Some(node) = self.parked.remove(&key) {
            return Some(node);
        }
        loop {
            let (index, node) = if from_back {
                self.slots.next_back()?
            } else {
                self.slots.next()?
            };
            if index == key.0 {
                return Some(node);
            }
            self.parked.insert(NodeKey(index), node);
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for IterMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("len", &self.len).finish()
    }
}

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.take(self.front, false)?;
        self.len -= 1;
        if self.len > 0 {
            self.front = match node.next {
                Some(next) => next,
                None => self.blocks[node.block.0]
                    .next
                    .map(|next| self.blocks[next.0].head)?,
            };
        }
        node.slot.value_mut()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.take(self.back, true)?;
        self.len -= 1;
        if self.len > 0 {
            self.back = match node.prev {
                Some(prev) => prev,
                None => self.blocks[node.block.0]
                    .prev
                    .map(|prev| self.blocks[prev.0].tail)?,
            };
        }
        node.slot.value_mut()
    }
}

impl<'a, T: 'a> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T: 'a> FusedIterator for IterMut<'a, T> {}

/// An owning iterator over the elements of a `Deque`.
///
/// This `struct` is created by the [`into_iter`] method on [`Deque`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: Deque::into_iter
pub struct IntoIter<T> {
    deque: Deque<T>,
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.deque).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.deque.pop_front().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.deque.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.deque.pop_back().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for Deque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { deque: self }
    }
}

impl<'a, T> IntoIterator for &'a Deque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Deque<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::new();
        deque.extend(iter);
        deque
    }
}

impl<T, const N: usize> From<[T; N]> for Deque<T> {
    fn from(array: [T; N]) -> Self {
        Self::from_iter(array)
    }
}

impl<T> Extend<T> for Deque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|elt| self.push_back(elt));
    }
}

impl<'a, T: 'a + Copy> Extend<&'a T> for Deque<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}
