use crate::deque::chain::Loc;
use crate::deque::position::Position;
use crate::deque::Deque;
use crate::error::{DequeError, Result};
use std::fmt;
use std::ptr;

/// A cursor over a `Deque`.
///
/// A `Cursor` is like an iterator, except that it can freely seek
/// back-and-forth, and jump by whole blocks with [`Cursor::offset`].
///
/// In a deque with length *n*, there are *n* + 1 valid locations for the
/// cursor, indexed by 0, 1, ..., *n*, where *n* is the end position.
///
/// # Examples
///
/// Here is a simple example showing how the cursors work. (The end position
/// of the deque is denoted by `#`).
/// ```
/// use block_deque::Deque;
///
/// // Create a deque: [ A B C D #]
/// let deque = Deque::from_iter(['A', 'B', 'C', 'D']);
///
/// // Create a cursor at start: [|A B C D #] (index = 0)
/// let mut cursor = deque.cursor_start();
/// assert_eq!(cursor.current(), Some(&'A'));
///
/// // Move cursor forward: [ A|B C D #] (index = 1)
/// assert!(cursor.move_next().is_ok());
/// assert_eq!(cursor.current(), Some(&'B'));
///
/// // Jump to the end: [ A B C D|#] (index = 4)
/// assert!(cursor.offset(3).is_ok());
/// assert_eq!(cursor.current(), None);
/// assert_eq!(cursor.index(), 4);
///
/// // Moving past the end is refused: the cursor stays put
/// assert!(cursor.move_next().is_err());
/// assert_eq!(cursor.index(), 4);
/// ```
pub struct Cursor<'a, T: 'a> {
    pub(crate) deque: &'a Deque<T>,
    pub(crate) loc: Loc,
}

impl<'a, T: 'a> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: 'a> Copy for Cursor<'a, T> {}

/// Compare cursors by their position.
///
/// Only cursors over the same deque at the same position are considered
/// equal.
///
/// # Examples
/// ```
/// use block_deque::Deque;
///
/// let deque = Deque::from_iter([1, 2, 3]);
/// let cursor1 = deque.cursor_start();
/// let mut cursor2 = cursor1;
/// assert_eq!(cursor1, cursor2);
///
/// cursor2.move_next().unwrap();
/// assert_ne!(cursor1, cursor2);
///
/// let another_deque = deque.clone();
/// assert_ne!(cursor1, another_deque.cursor_start());
/// ```
impl<'a, T: 'a> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.deque, other.deque) && self.loc == other.loc
    }
}

impl<'a, T: 'a> Eq for Cursor<'a, T> {}

/// A cursor over a `Deque` with editing operations.
///
/// A `CursorMut` holds the deque mutably borrowed, so the deque cannot be
/// read elsewhere while the cursor lives. Use [`CursorMut::view`] to
/// borrow the deque through the cursor.
///
/// # Examples
///
/// ```compile_fail
/// use block_deque::Deque;
///
/// let mut deque = Deque::from_iter([1, 2, 3]);
/// let mut cursor = deque.cursor_start_mut();
/// println!("{:?}", deque.back());
/// println!("{:?}", cursor.current());
/// ```
pub struct CursorMut<'a, T: 'a> {
    pub(crate) deque: &'a mut Deque<T>,
    pub(crate) loc: Loc,
}

macro_rules! impl_cursor {
    ($CURSOR:ident) => {
        impl<'a, T: 'a> $CURSOR<'a, T> {
            /// Returns `true` if the cursor is at the end position.
            pub fn is_end(&self) -> bool {
                self.loc == self.deque.end_loc()
            }

            /// Returns `true` if the `Deque` is empty. See [`Deque::is_empty`].
            pub fn is_empty(&self) -> bool {
                self.deque.is_empty()
            }

            /// The position of the cursor, usable with the deque's own
            /// position API once the cursor is gone.
            pub fn position(&self) -> Position {
                self.deque.position(self.loc)
            }

            /// Returns the index of the cursor, `len` at the end position.
            ///
            /// This operation should compute in *O*(√*n*) time.
            pub fn index(&self) -> usize {
                self.deque.index_of(self.loc)
            }

            /// Move the cursor to the next position, or fail with
            /// [`DequeError::InvalidIterator`] at the end position.
            ///
            /// This operation should compute in *O*(1) time.
            pub fn move_next(&mut self) -> Result<()> {
                self.loc = self
                    .deque
                    .arena
                    .next_loc(self.loc)
                    .ok_or(DequeError::InvalidIterator)?;
                Ok(())
            }

            /// Move the cursor to the previous position, or fail with
            /// [`DequeError::InvalidIterator`] at the first position.
            ///
            /// This operation should compute in *O*(1) time.
            pub fn move_prev(&mut self) -> Result<()> {
                self.loc = self
                    .deque
                    .arena
                    .prev_loc(self.loc)
                    .ok_or(DequeError::InvalidIterator)?;
                Ok(())
            }

            /// Move the cursor by `n` positions, forwards if `n` is positive.
            /// See [`Deque::offset`].
            ///
            /// If the move would run off either end, the cursor stays put.
            ///
            /// This operation should compute in *O*(√*n*) time.
            pub fn offset(&mut self, n: isize) -> Result<()> {
                self.loc = self.deque.offset_loc(self.loc, n)?;
                Ok(())
            }

            /// Move forward the cursor by given steps, staying put on
            /// failure.
            pub fn seek_forward(&mut self, steps: usize) -> Result<()> {
                let steps = isize::try_from(steps).map_err(|_| DequeError::InvalidIterator)?;
                self.offset(steps)
            }

            /// Move backward the cursor by given steps, staying put on
            /// failure.
            pub fn seek_backward(&mut self, steps: usize) -> Result<()> {
                let steps = isize::try_from(steps).map_err(|_| DequeError::InvalidIterator)?;
                self.offset(-steps)
            }

            /// Move the cursor to the element at `index` (the end position
            /// if `index == len`).
            pub fn seek_to(&mut self, index: usize) -> Result<()> {
                let len = self.deque.len();
                self.loc = match index {
                    index if index > len => {
                        return Err(DequeError::IndexOutOfBound { index, len });
                    }
                    index if index == len => self.deque.end_loc(),
                    index => self.deque.locate(index),
                };
                Ok(())
            }

            /// Set the cursor to the first element.
            #[inline]
            pub fn move_to_start(&mut self) {
                self.loc = self.deque.begin_loc();
            }

            /// Set the cursor to the end position.
            #[inline]
            pub fn move_to_end(&mut self) {
                self.loc = self.deque.end_loc();
            }
        }

        impl<'a, T: fmt::Debug + 'a> fmt::Debug for $CURSOR<'a, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($CURSOR))
                    .field("index", &self.index())
                    .field("current", &self.deque.arena.node(self.loc.node).slot.value())
                    .finish()
            }
        }
    };
}

impl_cursor!(Cursor);
impl_cursor!(CursorMut);

impl<'a, T: 'a> Cursor<'a, T> {
    pub(crate) fn new(deque: &'a Deque<T>, loc: Loc) -> Self {
        Self { deque, loc }
    }

    /// The element under the cursor, or `None` at the end position.
    pub fn current(&self) -> Option<&'a T> {
        let deque: &'a Deque<T> = self.deque;
        deque.arena.node(self.loc.node).slot.value()
    }

    /// The signed distance from `other` to this cursor.
    ///
    /// Fails with [`DequeError::InvalidIterator`] for cursors over different
    /// deques.
    ///
    /// # Examples
    /// ```
    /// use block_deque::Deque;
    ///
    /// let deque = Deque::from_iter(0..100);
    /// let start = deque.cursor_start();
    /// let end = deque.cursor_end();
    /// assert_eq!(end.distance_from(&start), Ok(100));
    /// assert_eq!(start.distance_from(&end), Ok(-100));
    /// ```
    pub fn distance_from(&self, other: &Self) -> Result<isize> {
        if !ptr::eq(self.deque, other.deque) {
            return Err(DequeError::InvalidIterator);
        }
        self.deque.distance_loc(other.loc, self.loc)
    }
}

impl<'a, T: 'a> CursorMut<'a, T> {
    pub(crate) fn new(deque: &'a mut Deque<T>, loc: Loc) -> Self {
        Self { deque, loc }
    }

    /// Borrow the deque immutably for as long as the returned reference
    /// lives.
    pub fn view(&self) -> &Deque<T> {
        self.deque
    }

    /// The element under the cursor, or `None` at the end position.
    pub fn current(&self) -> Option<&T> {
        self.deque.arena.node(self.loc.node).slot.value()
    }

    /// Mutable version of [`CursorMut::current`].
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.deque.arena.node_mut(self.loc.node).slot.value_mut()
    }

    /// Insert `value` before the cursor, and move the cursor onto it.
    ///
    /// # Examples
    /// ```
    /// use block_deque::Deque;
    ///
    /// let mut deque = Deque::from_iter([1, 3]);
    /// let mut cursor = deque.cursor_end_mut();
    /// cursor.move_prev().unwrap();
    /// cursor.insert(2);
    /// assert_eq!(cursor.current(), Some(&2));
    /// assert_eq!(cursor.index(), 1);
    /// assert_eq!(Vec::from_iter(deque), vec![1, 2, 3]);
    /// ```
    pub fn insert(&mut self, value: T) {
        self.loc = self.deque.insert_at(self.loc, value);
    }

    /// Remove the element under the cursor, and move the cursor onto its
    /// successor. Fails with [`DequeError::BadPosition`] at the end
    /// position.
    ///
    /// # Examples
    /// ```
    /// use block_deque::{Deque, DequeError};
    ///
    /// let mut deque = Deque::from_iter([1, 2, 3]);
    /// let mut cursor = deque.cursor_start_mut();
    /// assert_eq!(cursor.remove(), Ok(1));
    /// assert_eq!(cursor.current(), Some(&2));
    /// cursor.move_to_end();
    /// assert_eq!(cursor.remove(), Err(DequeError::BadPosition));
    /// ```
    pub fn remove(&mut self) -> Result<T> {
        let (value, successor) = self.deque.erase_at(self.loc)?;
        self.loc = successor;
        Ok(value)
    }

    /// Convert into a read-only cursor at the same position.
    pub fn into_cursor(self) -> Cursor<'a, T> {
        Cursor::new(self.deque, self.loc)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Deque, DequeError};

    #[test]
    fn cursor_walks_every_position() {
        let deque = Deque::from_iter(0..200);
        let mut cursor = deque.cursor_start();
        for value in 0..200 {
            assert_eq!(cursor.index(), value as usize);
            assert_eq!(cursor.current(), Some(&value));
            cursor.move_next().unwrap();
        }
        assert!(cursor.is_end());
        assert_eq!(cursor.move_next(), Err(DequeError::InvalidIterator));

        for value in (0..200).rev() {
            cursor.move_prev().unwrap();
            assert_eq!(cursor.current(), Some(&value));
        }
        assert_eq!(cursor.move_prev(), Err(DequeError::InvalidIterator));
        assert_eq!(cursor, deque.cursor_start());
    }

    #[test]
    fn cursor_seek() {
        let deque = Deque::from_iter(0..500);
        let mut cursor = deque.cursor_start();
        cursor.seek_to(321).unwrap();
        assert_eq!(cursor.current(), Some(&321));
        assert_eq!(
            cursor.seek_to(501),
            Err(DequeError::IndexOutOfBound { index: 501, len: 500 })
        );
        assert_eq!(cursor.index(), 321);

        cursor.seek_forward(100).unwrap();
        assert_eq!(cursor.current(), Some(&421));
        assert!(cursor.seek_forward(80).is_err());
        assert_eq!(cursor.current(), Some(&421));
        cursor.seek_backward(421).unwrap();
        assert_eq!(cursor.current(), Some(&0));
        assert!(cursor.seek_backward(1).is_err());

        cursor.seek_to(500).unwrap();
        assert!(cursor.is_end());
        assert_eq!(cursor.position(), deque.end());
        assert_eq!(cursor.distance_from(&deque.cursor_start()), Ok(500));
    }

    #[test]
    fn cursor_rejects_foreign_distance() {
        let deque = Deque::from_iter(0..5);
        let other = deque.clone();
        assert_eq!(
            deque.cursor_start().distance_from(&other.cursor_end()),
            Err(DequeError::InvalidIterator)
        );
    }

    #[test]
    fn cursor_mut_edits() {
        let mut deque = Deque::new();
        let mut cursor = deque.cursor_start_mut();
        for value in (0..100).rev() {
            cursor.insert(value);
            assert_eq!(cursor.current(), Some(&value));
            assert_eq!(cursor.index(), 0);
        }
        cursor.seek_to(50).unwrap();
        *cursor.current_mut().unwrap() = -50;
        // remove every other element from index 50 onwards
        while !cursor.is_end() {
            cursor.remove().unwrap();
            if cursor.move_next().is_err() {
                break;
            }
        }
        let expected = (0..50).chain((51..100).step_by(2));
        assert!(cursor.view().iter().copied().eq(expected));
        deque.assert_consistent();
    }

    #[test]
    fn cursor_mut_from_position() {
        let mut deque = Deque::from_iter(0..10);
        let pos = deque.offset(deque.begin(), 4).unwrap();
        let mut cursor = deque.cursor_mut(pos).unwrap();
        assert_eq!(cursor.remove(), Ok(4));
        let cursor = cursor.into_cursor();
        assert_eq!(cursor.current(), Some(&5));
        assert_eq!(cursor.index(), 4);

        let other = Deque::<i32>::new();
        assert!(matches!(
            deque.cursor(other.begin()),
            Err(DequeError::WrongOwner)
        ));
    }
}
