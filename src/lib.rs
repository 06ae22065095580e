//! This crate provides a double-ended queue stored as a chain of blocks,
//! where every block is itself a doubly-linked chain of nodes owning one
//! element each.
//!
//! The [`Deque`] gives *O*(√*n*) indexed access, and inserts or erases at any
//! [`Position`] in *O*(√*n*) amortized time, including the rebalancing that
//! keeps blocks close to √*n* nodes.
//!
//! Here is a quick example showing how the deque works.
//!
//! ```
//! use block_deque::Deque;
//!
//! let mut deque = Deque::from_iter([1, 2, 3, 4]);
//!
//! let pos = deque.insert(deque.begin(), 0).unwrap(); // [0, 1, 2, 3, 4]
//! assert_eq!(deque.get(pos), Ok(&0));
//!
//! let pos = deque.offset(pos, 3).unwrap(); // move to the element 3, and erase it
//! let next = deque.erase(pos).unwrap();
//! assert_eq!(deque.get(next), Ok(&4));
//! assert_eq!(deque, Deque::from([0, 1, 2, 4]));
//!
//! assert_eq!(deque.at(2), Ok(&2));
//! assert_eq!(deque.distance(deque.begin(), next), Ok(3));
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the deque is like the following graph:
//! ```text
//!     Block 0                    Block 1                       Block k (last)
//!  ╔═══════════╗             ╔═══════════╗                  ╔═══════════╗
//!  ║   next    ║ ──────────→ ║   next    ║ ──────→ ┄┄ ────→ ║   next    ║ ─→ ∅
//!  ║   prev    ║ ←────────── ║   prev    ║ ←────── ┄┄ ←──── ║   prev    ║
//!  ║ head tail ║             ║ head tail ║                  ║ head tail ║
//!  ║    len    ║             ║    len    ║                  ║    len    ║
//!  ╚═══════════╝             ╚═══════════╝                  ╚═══════════╝
//!    │      │                  │      │                       │      │
//!    ↓      ↓                  ↓      ↓                       ↓      ↓
//!  ┌───┐⇄┌───┐              ┌───┐⇄┌───┐                   ┌───┐⇄┌╌╌╌┐
//!  │ T │ │ T │              │ T │ │ T │                   │ T │ ┊ # ┊
//!  └───┘ └───┘              └───┘ └───┘                   └───┘ └╌╌╌┘
//! ```
//! The `Deque` contains:
//! - the key of the first block (`root`), and the location of the end marker
//!   `#`, which is always the last node of the last block;
//! - the total number of nodes, the end marker included;
//! - the rebuild threshold and the target block size.
//!
//! Nodes and blocks live in two [`slab`] arenas and are linked by keys. Each
//! node also records the key of the block holding it, so a [`Position`] can be
//! checked in constant time.
//!
//! Node links do not cross block boundaries: the `next` link of a block's
//! tail is empty, and moving on from it goes through the block chain.
//!
//! # Rebalancing
//!
//! Blocks only split. An insertion that grows a block to twice the target
//! block size cuts it in two halves. Erasures never merge blocks; a block is
//! dropped only once it is empty. Once the number of nodes reaches the
//! capacity threshold, the whole chain is rebuilt into blocks of about twice
//! the block size, the threshold doubles, and the block size grows to about
//! the square root of the threshold. The starting values come from a
//! [`Config`].
//!
//! # Positions
//!
//! A [`Position`] does not borrow its deque. It stays usable until its
//! element is erased, the block holding it splits, or the deque is rebuilt or
//! cleared. Using a stale or foreign position is reported as a [`DequeError`]
//! rather than undefined behaviour: every node carries a generation, so a
//! position never resolves to a newer element stored in a reused slot.
//!
//! ```
//! use block_deque::{Deque, DequeError};
//!
//! let mut deque = Deque::from_iter(0..10);
//! let other = deque.clone();
//! assert_eq!(deque.erase(other.begin()), Err(DequeError::WrongOwner));
//! assert_eq!(deque.erase(deque.end()), Err(DequeError::BadPosition));
//!
//! let stale = deque.begin();
//! deque.clear();
//! assert_eq!(deque.get(stale), Err(DequeError::InvalidIterator));
//! ```
//!
//! # Iteration
//!
//! Iterating over a deque is by the [`Iter`] and [`IterMut`] iterators. These
//! are double-ended, exact-size and fused.
//!
//! ```
//! use block_deque::Deque;
//!
//! let mut deque = Deque::from_iter([1, 2, 3]);
//! let mut iter = deque.iter();
//! assert_eq!(iter.next(), Some(&1));
//! assert_eq!(iter.next_back(), Some(&3));
//! assert_eq!(iter.next(), Some(&2));
//! assert_eq!(iter.next(), None);
//!
//! deque.iter_mut().for_each(|item| *item *= 2);
//! assert_eq!(Vec::from_iter(deque), vec![2, 4, 6]);
//! ```
//!
//! # Cursors
//!
//! [`Cursor`] and [`CursorMut`] are borrowing views that move forward or
//! backward over the deque. In a deque with length *n*, there are *n* + 1
//! valid locations for a cursor, indexed by 0, 1, ..., *n*, where *n* is the
//! end position. [`CursorMut`] can also [`insert`] and [`remove`] elements
//! where it stands.
//!
//! ```
//! use block_deque::Deque;
//!
//! let mut deque = Deque::from_iter([1, 2, 3, 4]);
//! let mut cursor = deque.cursor_start_mut();
//!
//! cursor.insert(5); // becomes [5, 1, 2, 3, 4], points to 5
//! assert!(cursor.seek_forward(3).is_ok());
//! assert_eq!(cursor.remove(), Ok(3)); // becomes [5, 1, 2, 4], points to 4
//! assert_eq!(cursor.current(), Some(&4));
//!
//! assert_eq!(Vec::from_iter(deque), vec![5, 1, 2, 4]);
//! ```
//!
//! [`insert`]: crate::CursorMut::insert
//! [`remove`]: crate::CursorMut::remove

#[doc(inline)]
pub use config::Config;
#[doc(inline)]
pub use deque::cursor::{Cursor, CursorMut};
#[doc(inline)]
pub use deque::iterator::{IntoIter, Iter, IterMut};
#[doc(inline)]
pub use deque::position::Position;
#[doc(inline)]
pub use deque::Deque;
#[doc(inline)]
pub use error::{DequeError, Result};

pub mod deque;

mod config;
mod error;
