use std::hash::{Hash, Hasher};
use std::mem;

use crate::queue::{move_after, next, value, Queue};

mod sort;

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl Eq for Queue {}

impl Hash for Queue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut len = 0_usize;
        for value in self {
            value.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

impl Queue {
    /// Returns `true` if the `Queue` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let queue = Queue::from_values(["a", "b"]).unwrap();
    /// assert!(queue.contains("b"));
    /// assert!(!queue.contains("c"));
    /// ```
    pub fn contains(&self, x: &str) -> bool {
        self.iter().any(|e| e == x)
    }

    /// Removes and releases the middle element, the one at index ⌊*n* / 2⌋.
    /// Returns `false` if the queue is empty.
    ///
    /// The middle is found by walking a slow and a fast pointer from the first
    /// element, the fast one taking two steps for each step of the slow one.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::from_values(["a", "b", "c", "d", "e", "f"]).unwrap();
    /// assert!(queue.delete_middle());
    /// assert_eq!(Vec::from_iter(&queue), ["a", "b", "c", "e", "f"]);
    /// ```
    pub fn delete_middle(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        let sentinel = self.sentinel_node();
        let (mut slow, mut fast) = (self.front_node(), self.front_node());
        // SAFETY: every node reached from the sentinel belongs to the ring, and
        // `slow` trails `fast`, so it never reaches the sentinel.
        unsafe {
            while fast != sentinel && next(fast) != sentinel {
                slow = next(slow);
                fast = next(next(fast));
            }
            tracing::trace!(value = value(slow), "deleting middle element");
            self.detach_node(slow).release();
        }
        true
    }

    /// Removes and releases every element whose value occurs more than once,
    /// leaving only the distinct values in their original order. Returns the
    /// number of released elements.
    ///
    /// The queue must already be sorted. Equal values are only recognized
    /// when they are adjacent, so on an unsorted queue only adjacent runs are
    /// removed.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::from_values(["a", "a", "b", "c", "c"]).unwrap();
    /// assert_eq!(queue.delete_duplicates(), 4);
    /// assert_eq!(Vec::from_iter(&queue), ["b"]);
    /// ```
    pub fn delete_duplicates(&mut self) -> usize {
        let sentinel = self.sentinel_node();
        let mut released = 0;
        let mut node = self.front_node();
        // SAFETY: `node` and `after` always point into the ring; an element is
        // only released after it has been detached and is never visited again.
        unsafe {
            while node != sentinel {
                let run_start = released;
                let mut after = next(node);
                while after != sentinel && value(after) == value(node) {
                    let duplicate = after;
                    after = next(after);
                    self.detach_node(duplicate).release();
                    released += 1;
                }
                if released > run_start {
                    self.detach_node(node).release();
                    released += 1;
                }
                node = after;
            }
        }
        tracing::trace!(released, "deleted duplicates");
        released
    }

    /// Exchanges every two adjacent elements by relinking them. With an odd
    /// number of elements, the last one stays in place.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::from_values(["1", "2", "3", "4", "5"]).unwrap();
    /// queue.swap_pairs();
    /// assert_eq!(Vec::from_iter(&queue), ["2", "1", "4", "3", "5"]);
    /// ```
    pub fn swap_pairs(&mut self) {
        let sentinel = self.sentinel_node();
        let mut node = self.front_node();
        // SAFETY: `node` and its successor are distinct elements of the ring
        // whenever the loop body runs.
        unsafe {
            while node != sentinel && next(node) != sentinel {
                move_after(node, next(node));
                node = next(node);
            }
        }
    }

    /// Reverses the order of the elements by exchanging the `next` and `prev`
    /// links of every node, the sentinel included.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use string_ring::Queue;
    ///
    /// let mut queue = Queue::from_values(["a", "b", "c"]).unwrap();
    /// queue.reverse();
    /// assert_eq!(Vec::from_iter(&queue), ["c", "b", "a"]);
    /// ```
    pub fn reverse(&mut self) {
        let sentinel = self.sentinel_node();
        let mut node = sentinel;
        loop {
            // SAFETY: `node` walks the ring in its original order, each node
            // being visited exactly once.
            node = unsafe {
                let link = node.as_mut();
                mem::swap(&mut link.next, &mut link.prev);
                link.prev
            };
            if node == sentinel {
                break;
            }
        }
    }
}
