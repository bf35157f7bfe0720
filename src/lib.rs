//! This crate provides a queue of strings, stored in an intrusive cyclic
//! doubly-linked list.
//!
//! The [`Queue`] allows inserting and removing elements at both ends in constant
//! time, and reorders its elements in place: deleting the middle element,
//! deleting duplicates, swapping adjacent pairs, reversing, merging and sorting
//! all work by relinking, without ever copying a value.
//!
//! Here is a quick example showing how the queue works.
//!
//! ```
//! use string_ring::Queue;
//!
//! let mut queue = Queue::new();
//! queue.insert_tail("banana").unwrap();
//! queue.insert_tail("cherry").unwrap();
//! queue.insert_head("apple").unwrap();
//! assert_eq!(Vec::from_iter(&queue), ["apple", "banana", "cherry"]);
//!
//! // Removing hands the element over to the caller.
//! let element = queue.remove_head().unwrap();
//! assert_eq!(element.value(), "apple");
//! element.release();
//!
//! queue.reverse();
//! assert_eq!(Vec::from_iter(&queue), ["cherry", "banana"]);
//!
//! queue.sort();
//! assert_eq!(Vec::from_iter(&queue), ["banana", "cherry"]);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the queue is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                      Sentinel Link  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        └───────────┘
//! │  ║   value   ║ ─→ "..."  ║   value   ║ ─→ "..."                   ↑   ↑
//! │  ╚═══════════╝           ╚═══════════╝                            │   │
//! │      Node 0                  Node 1                               │   │
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║ sentinel  ║ ──────────────────────────────────────────────────────────┘
//! ╟───────────╢
//! ║   (len)   ║
//! ╚═══════════╝
//!     Queue
//! ```
//! The `Queue` contains:
//! - a pointer `sentinel` that points to the sentinel link;
//! - a length field `len`, only with the `length` feature enabled. Without it,
//!   [`Queue::size`] counts the elements by walking the ring.
//!
//! Each element of the queue is allocated on heap, and contains:
//! - the embedded link, made of the `next` pointer to the next element (or the
//!   sentinel if it is the last element) and the `prev` pointer to the previous
//!   element (or the sentinel if it is the first element);
//! - the `value`, a separate heap allocation sized to fit the string exactly,
//!   holding at most [`MAX_VALUE_LEN`] bytes.
//!
//! The sentinel is a bare link, with no value.
//!
//! Initially, the `next` and `prev` pointers of the sentinel point to itself.
//! As elements are inserted, `sentinel.next` points to the first element, and
//! `sentinel.prev` points to the last element of the queue.
//!
//! # Ownership
//!
//! The queue owns every element linked into it. [`Queue::remove_head`] and
//! [`Queue::remove_tail`] unlink an element and hand it out as an [`Element`],
//! which is released when dropped or by [`Element::release`]. An element can
//! thus be released only once, and never while it is still linked.
//!
//! # Algorithms
//!
//! - [`delete_middle`]: release the element at index ⌊*n* / 2⌋;
//! - [`delete_duplicates`]: on a sorted queue, release every element whose
//!   value is not unique;
//! - [`swap_pairs`]: swap every two adjacent elements;
//! - [`reverse`]: reverse the order of the elements;
//! - [`merge`]: merge another sorted queue into this sorted queue;
//! - [`sort`]: a stable merge sort.
//!
//! [`delete_middle`]: crate::Queue::delete_middle
//! [`delete_duplicates`]: crate::Queue::delete_duplicates
//! [`swap_pairs`]: crate::Queue::swap_pairs
//! [`reverse`]: crate::Queue::reverse
//! [`merge`]: crate::Queue::merge
//! [`sort`]: crate::Queue::sort

#[doc(inline)]
pub use error::QueueError;
#[doc(inline)]
pub use queue::element::Element;
#[doc(inline)]
pub use queue::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use queue::{Queue, MAX_VALUE_LEN};

pub mod queue;

mod error;

#[cfg(test)]
mod shadow;
