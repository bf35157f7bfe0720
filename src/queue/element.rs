use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

use crate::queue::{value, Link, Node};

/// An element removed from a [`Queue`](crate::Queue).
///
/// Removing an element transfers its ownership to the caller: the element is
/// detached from any queue and is released exactly once, either explicitly by
/// [`Element::release`] or when it is dropped.
///
/// # Examples
///
/// ```
/// use string_ring::Queue;
///
/// let mut queue = Queue::from_values(["a", "b"]).unwrap();
/// let element = queue.remove_tail().unwrap();
/// assert_eq!(element.value(), "b");
/// assert_eq!(queue.size(), 1);
/// element.release();
/// ```
pub struct Element {
    node: NonNull<Link>,
    _marker: PhantomData<Box<Node>>,
}

impl Element {
    /// It is unsafe because `node` must be an element node that has just been
    /// unlinked from its ring, and no one else may release it.
    pub(crate) unsafe fn from_detached(node: NonNull<Link>) -> Self {
        Self {
            node,
            _marker: PhantomData,
        }
    }

    /// The value held by the element.
    pub fn value(&self) -> &str {
        // SAFETY: `node` is an element node owned by `self`.
        unsafe { value(self.node) }
    }

    /// Copies the value into `buf` as a NUL-terminated string and returns the
    /// number of value bytes copied.
    ///
    /// At most `buf.len() - 1` bytes are copied, so the value may be truncated,
    /// possibly in the middle of a UTF-8 sequence. The rest of `buf` is filled
    /// with zeros, so `buf[buf.len() - 1]` is always `0`. An empty `buf` is left
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::from_values(["abc"]).unwrap();
    /// let element = queue.remove_head().unwrap();
    ///
    /// let mut buf = [0xff_u8; 6];
    /// assert_eq!(element.copy_to(&mut buf), 3);
    /// assert_eq!(&buf, b"abc\0\0\0");
    ///
    /// let mut buf = [0xff_u8; 3];
    /// assert_eq!(element.copy_to(&mut buf), 2);
    /// assert_eq!(&buf, b"ab\0");
    /// ```
    pub fn copy_to(&self, buf: &mut [u8]) -> usize {
        let Some(cap) = buf.len().checked_sub(1) else {
            return 0;
        };
        let bytes = self.value().as_bytes();
        let copied = bytes.len().min(cap);
        buf[..copied].copy_from_slice(&bytes[..copied]);
        buf[copied..].fill(0);
        copied
    }

    /// Releases the value storage, then the element itself.
    #[inline]
    pub fn release(self) {
        drop(self)
    }

    /// Releases the element storage and keeps its value.
    pub fn into_string(self) -> String {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the node is reclaimed exactly once here.
        let node = unsafe { Box::from_raw(this.node.cast::<Node>().as_ptr()) };
        let Node { value, .. } = *node;
        value.into_string()
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        // SAFETY: `node` is detached and owned by `self`.
        unsafe { Node::release(self.node) }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.value()).finish()
    }
}

unsafe impl Send for Element {}

unsafe impl Sync for Element {}
