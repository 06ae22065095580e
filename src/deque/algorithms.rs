use crate::deque::{Deque, DequeId};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

impl<T: PartialEq> PartialEq for Deque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T: Eq> Eq for Deque<T> {}

impl<T: PartialOrd> PartialOrd for Deque<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord> Ord for Deque<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T: Clone> Clone for Deque<T> {
    /// Copies the block chain node by node, keeping its shape. The copy is a
    /// distinct owner: positions of `self` are foreign to it.
    fn clone(&self) -> Self {
        let (arena, root) = self.arena.deep_copy(self.root);
        let end = arena.locate_end(root);
        Self {
            arena,
            root,
            end,
            total: self.total,
            threshold: self.threshold,
            block_size: self.block_size,
            config: self.config,
            id: DequeId::next(),
            epoch: 0,
        }
    }

    /// Replaces the content with a copy of `source`. `self` keeps its
    /// identity, but every position it issued is invalidated.
    fn clone_from(&mut self, source: &Self) {
        let id = self.id;
        let epoch = self.epoch + 1;
        *self = source.clone();
        self.id = id;
        self.epoch = epoch;
    }
}

impl<T: Hash> Hash for Deque<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T> Deque<T> {
    /// Returns `true` if the `Deque` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use block_deque::Deque;
    ///
    /// let mut deque = Deque::new();
    ///
    /// deque.push_back(0);
    /// deque.push_back(1);
    /// deque.push_back(2);
    ///
    /// assert_eq!(deque.contains(&0), true);
    /// assert_eq!(deque.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|e| e == x)
    }
}
