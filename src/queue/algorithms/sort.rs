use std::cmp::Ordering;
use std::ptr::NonNull;

use crate::queue::{connect, move_after, move_before, next, prev, splice, value, Link, Queue};

impl Queue {
    /// Merges the sorted queue `other` into this sorted queue, keeping the
    /// result sorted. Every element of `other` is relinked into `self`; no
    /// value is copied.
    ///
    /// This merge is stable: an element of `self` stays in front of an equal
    /// element of `other`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* + *m*) time and *O*(1) memory,
    /// or *O*(1) time if `self` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::from_values(["a", "c", "e"]).unwrap();
    /// queue.merge(Queue::from_values(["b", "c", "f"]).unwrap());
    /// assert_eq!(Vec::from_iter(&queue), ["a", "b", "c", "c", "e", "f"]);
    /// ```
    pub fn merge(&mut self, other: Queue) {
        // `other` is dropped right after, so its own counter is left as is.
        #[cfg(feature = "length")]
        {
            self.len += other.len;
        }
        tracing::trace!("merging sorted queues");
        // SAFETY: both sentinels anchor valid, distinct rings.
        unsafe { merge_rings(self.sentinel_node(), other.sentinel_node()) };
        debug_assert!(other.is_empty());
    }

    /// Sorts the queue in ascending lexicographic order.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time, with a
    /// recursion depth of *O*(log(*n*)).
    ///
    /// # Current Implementation
    ///
    /// The current algorithm is a top-down merge sort. The ring is split in
    /// the middle into a second ring anchored at a sentinel on the stack, both
    /// halves are sorted recursively, and the second half is merged back.
    /// There is no extra heap storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::from_values(["pear", "apple", "fig", "banana"]).unwrap();
    ///
    /// queue.sort();
    ///
    /// assert_eq!(Vec::from_iter(&queue), ["apple", "banana", "fig", "pear"]);
    /// ```
    pub fn sort(&mut self) {
        tracing::trace!("sorting queue");
        // SAFETY: the sentinel anchors a valid ring.
        unsafe { sort_ring(self.sentinel_node()) }
    }
}

/// Merge the sorted ring at `right_head` into the sorted ring at `left_head`,
/// leaving `right_head` empty.
unsafe fn merge_rings(left_head: NonNull<Link>, right_head: NonNull<Link>) {
    let mut left = next(left_head);
    if left == left_head {
        splice(right_head, left_head, left_head);
        return;
    }
    let mut right = next(right_head);
    while right != right_head {
        let next_right = next(right);
        // Advance `left` past every value ordered at or before `right`, stopping
        // at the last element of the left ring.
        let mut ordering = value(left).cmp(value(right));
        while ordering != Ordering::Greater && next(left) != left_head {
            left = next(left);
            ordering = value(left).cmp(value(right));
        }
        if ordering == Ordering::Greater {
            move_before(right, left);
        } else {
            move_after(right, left);
        }
        right = next_right;
    }
}

unsafe fn sort_ring(head: NonNull<Link>) {
    let front = next(head);
    if front == head || next(front) == head {
        return;
    }
    let (mut slow, mut fast) = (front, next(front));
    while fast != head && next(fast) != head {
        slow = next(slow);
        fast = next(next(fast));
    }

    // `slow` is the last node of the left half. Everything after it moves to
    // a ring anchored at `right`, which must not move until it is empty again.
    let mut right = Link::unlinked();
    let right = NonNull::from(&mut right);
    connect(right, next(slow));
    connect(prev(head), right);
    connect(slow, head);

    sort_ring(right);
    sort_ring(head);
    merge_rings(head, right);
}
