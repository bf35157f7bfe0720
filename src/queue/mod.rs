use std::alloc::{self, Layout};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use crate::error::QueueError;
use crate::queue::element::Element;
use crate::Iter;

pub mod element;
pub mod iterator;

mod algorithms;

/// The longest value, in bytes, a queue element can hold. Longer input is
/// truncated on insertion.
pub const MAX_VALUE_LEN: usize = 1024;

/// A queue of strings stored in an intrusive cyclic doubly-linked list.
///
/// The `Queue` owns a sentinel link that anchors the ring. Every element embeds
/// its own link, so linking, unlinking and reordering elements never allocates
/// and never copies a value.
///
/// The `Queue` contains:
/// - a pointer `sentinel` to the heap-allocated sentinel link;
/// - a length field `len`, only with the `length` feature enabled in your
///   `Cargo.toml`:
/// ```text
/// [dependencies]
/// string_ring = { features = ["length"] }
/// ```
///
/// # Naming Conventions
///
/// - `front..=back`: a closed range of element links, both inclusive;
/// - a *ring* is a sentinel together with the links reachable from it, which
///   may be a `Queue` or a transient ring anchored at a stack-allocated
///   sentinel during sorting.
pub struct Queue {
    sentinel: NonNull<Link>,
    #[cfg(feature = "length")]
    /// the number of elements in the queue
    pub(crate) len: usize,
    _marker: PhantomData<Box<Node>>,
}

/// The two-pointer linkage forming a ring. It carries no payload.
#[derive(Debug)]
pub(crate) struct Link {
    pub(crate) next: NonNull<Link>,
    pub(crate) prev: NonNull<Link>,
}

/// An element in memory: the link comes first so that a pointer to the link
/// is also a pointer to the node.
#[repr(C)]
pub(crate) struct Node {
    pub(crate) link: Link,
    pub(crate) value: Box<str>,
}

const _: () = assert!(mem::offset_of!(Node, link) == 0);

impl Link {
    /// A link with dangling pointers. It has to be passed to [`init`] once it
    /// has reached its final address.
    pub(crate) fn unlinked() -> Self {
        Self {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
        }
    }
}

impl Node {
    /// Allocate a detached node holding a copy of `value`.
    ///
    /// The node storage is allocated before the value storage, and released
    /// again if the value cannot be allocated. The links of the returned node
    /// are dangling until it is attached.
    pub(crate) fn new_detached(value: &str) -> Result<NonNull<Link>, QueueError> {
        let layout = Layout::new::<Node>();
        // SAFETY: `Node` is not zero-sized.
        let Some(node) = NonNull::new(unsafe { alloc::alloc(layout) }.cast::<Node>()) else {
            tracing::warn!(size = layout.size(), "element allocation failed");
            return Err(QueueError::OutOfMemory { what: "element" });
        };
        let value = match copy_value(value) {
            Ok(value) => value,
            Err(err) => {
                // SAFETY: `node` was allocated above with `layout` and never initialized.
                unsafe { alloc::dealloc(node.as_ptr().cast(), layout) };
                return Err(err);
            }
        };
        // SAFETY: `node` is valid for writes and properly aligned.
        unsafe {
            ptr::write(
                node.as_ptr(),
                Node {
                    link: Link::unlinked(),
                    value,
                },
            )
        };
        Ok(node.cast())
    }

    /// Release a node created by [`Node::new_detached`], value first.
    ///
    /// It is unsafe because `node` must be detached from any ring, and must not
    /// be used again afterwards.
    pub(crate) unsafe fn release(node: NonNull<Link>) {
        // The node was allocated by the global allocator with `Layout::new::<Node>()`,
        // which is exactly what `Box` expects.
        drop(Box::from_raw(node.cast::<Node>().as_ptr()));
    }
}

/// Copy at most [`MAX_VALUE_LEN`] bytes of `value` into exact-fit storage,
/// cutting back to a char boundary.
fn copy_value(value: &str) -> Result<Box<str>, QueueError> {
    let mut len = value.len().min(MAX_VALUE_LEN);
    while !value.is_char_boundary(len) {
        len -= 1;
    }
    if len < value.len() {
        tracing::debug!(from = value.len(), to = len, "value truncated");
    }
    let mut copy = String::new();
    if copy.try_reserve_exact(len).is_err() {
        tracing::warn!(len, "value allocation failed");
        return Err(QueueError::OutOfMemory { what: "value" });
    }
    copy.push_str(&value[..len]);
    Ok(copy.into_boxed_str())
}

// Raw ring primitives. None of them touches the length of a `Queue`; the
// `Queue` methods below do that.

/// Link `head` to itself, making it an empty ring.
pub(crate) unsafe fn init(mut head: NonNull<Link>) {
    head.as_mut().next = head;
    head.as_mut().prev = head;
}

pub(crate) unsafe fn next(node: NonNull<Link>) -> NonNull<Link> {
    node.as_ref().next
}

pub(crate) unsafe fn prev(node: NonNull<Link>) -> NonNull<Link> {
    node.as_ref().prev
}

pub(crate) unsafe fn connect(mut prev: NonNull<Link>, mut next: NonNull<Link>) {
    prev.as_mut().next = next;
    next.as_mut().prev = prev;
}

/// The value of the element that embeds `node`.
///
/// It is unsafe because `node` must not be a sentinel, and the returned
/// reference must not outlive the element.
pub(crate) unsafe fn value<'a>(node: NonNull<Link>) -> &'a str {
    &node.cast::<Node>().as_ref().value
}

/// Take `node` out of its ring. The links of `node` itself are left stale.
pub(crate) unsafe fn unlink(node: NonNull<Link>) {
    connect(prev(node), next(node));
}

/// Link a detached `node` between the adjacent nodes `prev` and `next`.
pub(crate) unsafe fn attach(prev: NonNull<Link>, next: NonNull<Link>, node: NonNull<Link>) {
    #[cfg(debug_assertions)]
    assert_adjacent(prev, next);
    connect(prev, node);
    connect(node, next);
}

/// Move `node` right after `pos`. `node` and `pos` must be different nodes.
pub(crate) unsafe fn move_after(node: NonNull<Link>, pos: NonNull<Link>) {
    unlink(node);
    attach(pos, next(pos), node);
}

/// Move `node` right before `pos`. `node` and `pos` must be different nodes.
pub(crate) unsafe fn move_before(node: NonNull<Link>, pos: NonNull<Link>) {
    unlink(node);
    attach(prev(pos), pos, node);
}

/// Move every element of the ring at `from` between the adjacent nodes `prev`
/// and `next`, leaving `from` empty.
pub(crate) unsafe fn splice(from: NonNull<Link>, prev: NonNull<Link>, next: NonNull<Link>) {
    if self::next(from) == from {
        return;
    }
    #[cfg(debug_assertions)]
    assert_adjacent(prev, next);
    let (front, back) = (self::next(from), self::prev(from));
    connect(prev, front);
    connect(back, next);
    init(from);
}

// private methods
impl Queue {
    fn from_sentinel(sentinel: NonNull<Link>) -> Self {
        // SAFETY: `sentinel` is a freshly allocated link owned by the new queue.
        unsafe { init(sentinel) };
        Self {
            sentinel,
            #[cfg(feature = "length")]
            len: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) fn sentinel_node(&self) -> NonNull<Link> {
        self.sentinel
    }
    pub(crate) fn front_node(&self) -> NonNull<Link> {
        // SAFETY: `sentinel.next` is always valid (either `sentinel` itself, or the
        // first element in the queue).
        unsafe { next(self.sentinel) }
    }
    pub(crate) fn back_node(&self) -> NonNull<Link> {
        // SAFETY: `sentinel.prev` is always valid (either `sentinel` itself, or the
        // last element in the queue).
        unsafe { prev(self.sentinel) }
    }

    /// Detach a single element `node` from the queue, and hand it out as an
    /// owning [`Element`].
    ///
    /// It is unsafe because it does not check whether `node` is an element of
    /// the queue. If it is not, this function call will make the queue
    /// ill-formed.
    pub(crate) unsafe fn detach_node(&mut self, node: NonNull<Link>) -> Element {
        #[cfg(feature = "length")]
        {
            self.len -= 1;
        }
        unlink(node);
        Element::from_detached(node)
    }

    /// Attach a single detached `node` to the queue, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belong
    /// to the queue, or whether they are adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach_node(
        &mut self,
        prev: NonNull<Link>,
        next: NonNull<Link>,
        node: NonNull<Link>,
    ) {
        attach(prev, next, node);
        #[cfg(feature = "length")]
        {
            self.len += 1;
        }
    }
}

impl Queue {
    /// Create an empty `Queue`, reporting allocation failure of the sentinel
    /// instead of aborting.
    ///
    /// # Examples
    /// ```
    /// use string_ring::Queue;
    ///
    /// let queue = Queue::try_new().unwrap();
    /// assert!(queue.is_empty());
    /// ```
    pub fn try_new() -> Result<Self, QueueError> {
        let layout = Layout::new::<Link>();
        // SAFETY: `Link` is not zero-sized.
        let Some(sentinel) = NonNull::new(unsafe { alloc::alloc(layout) }.cast::<Link>()) else {
            tracing::warn!(size = layout.size(), "sentinel allocation failed");
            return Err(QueueError::OutOfMemory { what: "sentinel" });
        };
        // SAFETY: `sentinel` is valid for writes and properly aligned.
        unsafe { ptr::write(sentinel.as_ptr(), Link::unlinked()) };
        Ok(Self::from_sentinel(sentinel))
    }

    /// Create an empty `Queue`.
    ///
    /// # Examples
    /// ```
    /// use string_ring::Queue;
    /// let queue = Queue::new();
    /// assert_eq!(queue.size(), 0);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::from_sentinel(NonNull::from(Box::leak(Box::new(Link::unlinked()))))
    }

    /// Create a queue holding copies of `values`, in order.
    ///
    /// # Examples
    /// ```
    /// use string_ring::Queue;
    ///
    /// let queue = Queue::from_values(["a", "b"]).unwrap();
    /// assert_eq!(queue.front(), Some("a"));
    /// assert_eq!(queue.back(), Some("b"));
    /// ```
    pub fn from_values<I>(values: I) -> Result<Self, QueueError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut queue = Self::try_new()?;
        for value in values {
            queue.insert_tail(value.as_ref())?;
        }
        Ok(queue)
    }

    /// Returns `true` if the `Queue` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.sentinel_node()
    }

    /// Returns the number of elements, by walking the ring from the sentinel.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time, or *O*(1) with the
    /// `length` feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_head("b").unwrap();
    /// queue.insert_head("a").unwrap();
    /// assert_eq!(queue.size(), 2);
    /// ```
    #[cfg(not(feature = "length"))]
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    #[cfg(feature = "length")]
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    /// Removes and releases all elements, keeping the sentinel.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn clear(&mut self) {
        while let Some(element) = self.remove_head() {
            element.release();
        }
    }

    /// Provides the value at the head, or `None` if the queue is empty.
    #[inline]
    pub fn front(&self) -> Option<&str> {
        self.iter().next()
    }

    /// Provides the value at the tail, or `None` if the queue is empty.
    #[inline]
    pub fn back(&self) -> Option<&str> {
        self.iter().next_back()
    }

    /// Inserts a copy of `value` at the head of the queue.
    ///
    /// At most [`MAX_VALUE_LEN`] bytes are copied. On allocation failure the
    /// queue is left unchanged.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::new();
    ///
    /// queue.insert_head("b").unwrap();
    /// assert_eq!(queue.front(), Some("b"));
    ///
    /// queue.insert_head("a").unwrap();
    /// assert_eq!(queue.front(), Some("a"));
    /// ```
    pub fn insert_head(&mut self, value: &str) -> Result<(), QueueError> {
        let node = Node::new_detached(value)?;
        // SAFETY: the sentinel and the front node are adjacent nodes of the queue.
        unsafe { self.attach_node(self.sentinel_node(), self.front_node(), node) };
        Ok(())
    }

    /// Inserts a copy of `value` at the tail of the queue.
    ///
    /// At most [`MAX_VALUE_LEN`] bytes are copied. On allocation failure the
    /// queue is left unchanged.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("a").unwrap();
    /// queue.insert_tail("b").unwrap();
    /// assert_eq!(queue.back(), Some("b"));
    /// ```
    pub fn insert_tail(&mut self, value: &str) -> Result<(), QueueError> {
        let node = Node::new_detached(value)?;
        // SAFETY: the back node and the sentinel are adjacent nodes of the queue.
        unsafe { self.attach_node(self.back_node(), self.sentinel_node(), node) };
        Ok(())
    }

    /// Unlinks the head element and hands it to the caller, or returns `None`
    /// if the queue is empty. The element is not released.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::new();
    /// assert!(queue.remove_head().is_none());
    ///
    /// queue.insert_tail("a").unwrap();
    /// queue.insert_tail("b").unwrap();
    /// let element = queue.remove_head().unwrap();
    /// assert_eq!(element.value(), "a");
    /// element.release();
    /// ```
    pub fn remove_head(&mut self) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the front node is an element.
        Some(unsafe { self.detach_node(self.front_node()) })
    }

    /// Unlinks the tail element and hands it to the caller, or returns `None`
    /// if the queue is empty. The element is not released.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn remove_tail(&mut self) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the back node is an element.
        Some(unsafe { self.detach_node(self.back_node()) })
    }

    /// Like [`Queue::remove_head`], and also copies the removed value into `buf`
    /// as a NUL-terminated string. See [`Element::copy_to`].
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::from_values(["hello"]).unwrap();
    /// let mut buf = [0xff_u8; 4];
    /// let element = queue.remove_head_into(&mut buf).unwrap();
    /// assert_eq!(&buf, b"hel\0");
    /// assert_eq!(element.value(), "hello");
    /// ```
    pub fn remove_head_into(&mut self, buf: &mut [u8]) -> Option<Element> {
        let element = self.remove_head()?;
        element.copy_to(buf);
        Some(element)
    }

    /// Like [`Queue::remove_tail`], and also copies the removed value into `buf`
    /// as a NUL-terminated string. See [`Element::copy_to`].
    pub fn remove_tail_into(&mut self, buf: &mut [u8]) -> Option<Element> {
        let element = self.remove_tail()?;
        element.copy_to(buf);
        Some(element)
    }

    /// Provides a forward iterator over the values.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let queue = Queue::from_values(["a", "b", "c"]).unwrap();
    ///
    /// let mut iter = queue.iter();
    /// assert_eq!(iter.next(), Some("a"));
    /// assert_eq!(iter.next_back(), Some("c"));
    /// assert_eq!(iter.next(), Some("b"));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Walks the whole ring and checks that every link agrees with its
    /// neighbours: `node.next.prev == node` and `node.prev.next == node`.
    ///
    /// With the `length` feature, the cached length is checked against the
    /// number of elements as well.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn is_well_formed(&self) -> bool {
        match self.checked_len() {
            #[cfg(feature = "length")]
            Some(count) => count == self.len,
            #[cfg(not(feature = "length"))]
            Some(_) => true,
            None => false,
        }
    }

    /// Count the elements by walking the ring, or `None` at the first link
    /// whose neighbours disagree with it.
    fn checked_len(&self) -> Option<usize> {
        let sentinel = self.sentinel_node();
        let mut node = sentinel;
        let mut count = 0;
        // SAFETY: the walk stops at the first link whose neighbour disagrees,
        // so it only follows links that are part of the ring.
        unsafe {
            loop {
                if prev(next(node)) != node || next(prev(node)) != node {
                    return None;
                }
                node = next(node);
                if node == sentinel {
                    return Some(count);
                }
                count += 1;
            }
        }
    }
}

impl Debug for Queue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(debug_assertions)]
fn assert_adjacent(prev: NonNull<Link>, next: NonNull<Link>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the sentinel was allocated by the global allocator with
        // `Layout::new::<Link>()`, and the ring is empty now.
        unsafe { drop(Box::from_raw(self.sentinel.as_ptr())) };
    }
}

unsafe impl Send for Queue {}

unsafe impl Sync for Queue {}
