use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::queue::element::Element;
use crate::queue::{next, prev, value, Link, Queue};

/// An iterator over the values of a `Queue`.
///
/// It uses a pair of nodes `start..end` to represent a half-open subrange
/// of the ring, where `start` is inclusive and `end` is not.
///
/// Though the `Iter` does not hold a reference from the queue,
/// it actually *borrows* (immutably) from the queue, so a phantom
/// marker of `&'a Queue` is added to protect the queue from being
/// written.
///
/// # Examples
///
/// ```compile_fail
/// use string_ring::Queue;
///
/// let mut queue = Queue::from_values(["a", "b"]).unwrap();
/// let mut iter = queue.iter();
///
/// // Won't compile, because queue is already borrowed immutably.
/// queue.insert_tail("c").unwrap();
/// println!("{:?}", iter.next());
/// ```
#[derive(Clone)]
pub struct Iter<'a> {
    start: NonNull<Link>,
    end: NonNull<Link>,
    #[cfg(feature = "length")]
    len: usize,
    _marker: PhantomData<&'a Queue>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(queue: &'a Queue) -> Self {
        Self {
            start: queue.front_node(),
            end: queue.sentinel_node(),
            #[cfg(feature = "length")]
            len: queue.len,
            _marker: PhantomData,
        }
    }
}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    /// Return `*start` and reset the iterating range to `(start.next)..end`,
    /// or return `None` if `start..end` is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a ring,
        // and it is not empty here, so `start` is an element.
        let current = self.start;
        unsafe {
            self.start = next(current);
        }
        #[cfg(feature = "length")]
        {
            self.len -= 1;
        }
        Some(unsafe { value(current) })
    }

    #[cfg(feature = "length")]
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

impl<'a> DoubleEndedIterator for Iter<'a> {
    /// Reset the iterating range to `start..(end.prev)` and return `*end`,
    /// or return `None` if `start..end` is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a ring,
        // and it is not empty here, so `end.prev` is an element.
        unsafe {
            self.end = prev(self.end);
        }
        #[cfg(feature = "length")]
        {
            self.len -= 1;
        }
        Some(unsafe { value(self.end) })
    }
}

#[cfg(feature = "length")]
impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

/// An owning iterator over the elements of a `Queue`, from head to tail.
///
/// This `struct` is created by the [`into_iter`] method on [`Queue`]
/// (provided by the `IntoIterator` trait). Elements not taken out are
/// released together with the queue.
///
/// [`into_iter`]: Queue::into_iter
pub struct IntoIter {
    queue: Queue,
}

impl fmt::Debug for IntoIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("queue", &self.queue)
            .finish()
    }
}

impl Iterator for IntoIter {
    type Item = Element;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.remove_head()
    }

    #[cfg(feature = "length")]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.queue.remove_tail()
    }
}

#[cfg(feature = "length")]
impl ExactSizeIterator for IntoIter {}

impl FusedIterator for IntoIter {}

impl IntoIterator for Queue {
    type Item = Element;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

unsafe impl Send for Iter<'_> {}

unsafe impl Sync for Iter<'_> {}
