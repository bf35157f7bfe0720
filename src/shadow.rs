//! A safe double-ended queue of strings built on `GhostCell` and `StaticRc`,
//! used as a reference model for the positional operations of [`Queue`].
//!
//! [`Queue`]: crate::Queue

use ghost_cell::{GhostCell, GhostToken};
use static_rc::StaticRc;
use std::ops::Deref;

pub(crate) struct ShadowQueue<'id> {
    head: Option<Half<'id>>,
    tail: Option<Half<'id>>,
}

/// Each node is shared by two halves: one held by whatever points at it from
/// the front (its predecessor or the queue's `head`), one held from the back.
struct Node<'id> {
    prev: Option<Half<'id>>,
    next: Option<Half<'id>>,
    value: String,
}

type Cell<'id> = GhostCell<'id, Node<'id>>;
type Half<'id> = StaticRc<Cell<'id>, 1, 2>;
type Full<'id> = StaticRc<Cell<'id>, 2, 2>;

fn new_node<'id>(value: &str) -> (Half<'id>, Half<'id>) {
    let node = Node {
        prev: None,
        next: None,
        value: value.to_owned(),
    };
    Full::split(Full::new(GhostCell::new(node)))
}

fn into_value<'id>(front: Half<'id>, back: Half<'id>) -> String {
    let cell = Full::into_box(Full::join(front, back));
    (*cell).into_inner().value
}

impl<'id> ShadowQueue<'id> {
    pub(crate) fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub(crate) fn insert_head(&mut self, value: &str, token: &mut GhostToken<'id>) {
        let (front, back) = new_node(value);
        match self.head.take() {
            Some(old) => {
                old.deref().borrow_mut(token).prev = Some(back);
                front.deref().borrow_mut(token).next = Some(old);
            }
            None => self.tail = Some(back),
        }
        self.head = Some(front);
    }

    pub(crate) fn insert_tail(&mut self, value: &str, token: &mut GhostToken<'id>) {
        let (front, back) = new_node(value);
        match self.tail.take() {
            Some(old) => {
                old.deref().borrow_mut(token).next = Some(front);
                back.deref().borrow_mut(token).prev = Some(old);
            }
            None => self.head = Some(front),
        }
        self.tail = Some(back);
    }

    pub(crate) fn remove_head(&mut self, token: &mut GhostToken<'id>) -> Option<String> {
        let front = self.head.take()?;
        let back = match front.deref().borrow_mut(token).next.take() {
            Some(second) => {
                let back = second.deref().borrow_mut(token).prev.take();
                self.head = Some(second);
                back
            }
            None => self.tail.take(),
        };
        Some(into_value(front, back.expect("head without a back half")))
    }

    pub(crate) fn remove_tail(&mut self, token: &mut GhostToken<'id>) -> Option<String> {
        let back = self.tail.take()?;
        let front = match back.deref().borrow_mut(token).prev.take() {
            Some(second) => {
                let front = second.deref().borrow_mut(token).next.take();
                self.tail = Some(second);
                front
            }
            None => self.head.take(),
        };
        Some(into_value(front.expect("tail without a front half"), back))
    }

    /// Remove every value from head to tail. The halves of a node can only be
    /// joined with the token, so a model must be drained before it is dropped.
    pub(crate) fn drain(&mut self, token: &mut GhostToken<'id>) -> Vec<String> {
        let mut values = Vec::new();
        while let Some(value) = self.remove_head(token) {
            values.push(value);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use crate::shadow::ShadowQueue;
    use crate::{Queue, MAX_VALUE_LEN};
    use ghost_cell::GhostToken;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        InsertHead(String),
        InsertTail(String),
        RemoveHead,
        RemoveTail,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-c]{0,3}".prop_map(Op::InsertHead),
            "[a-c]{0,3}".prop_map(Op::InsertTail),
            Just(Op::RemoveHead),
            Just(Op::RemoveTail),
        ]
    }

    #[test]
    fn shadow_push_pop() {
        GhostToken::new(|mut token| {
            let mut shadow = ShadowQueue::new();
            assert!(shadow.is_empty());
            shadow.insert_tail("a", &mut token);
            shadow.insert_head("b", &mut token);
            assert!(!shadow.is_empty());
            assert_eq!(shadow.remove_tail(&mut token).as_deref(), Some("a"));
            assert_eq!(shadow.remove_head(&mut token).as_deref(), Some("b"));
            assert_eq!(shadow.remove_head(&mut token), None);
            assert!(shadow.is_empty());
        })
    }

    proptest! {
        #[test]
        fn queue_matches_shadow(ops in proptest::collection::vec(op(), 0..64)) {
            GhostToken::new(|mut token| {
                let mut queue = Queue::new();
                let mut shadow = ShadowQueue::new();
                let mut buf = [0_u8; MAX_VALUE_LEN + 1];
                for op in ops {
                    match op {
                        Op::InsertHead(value) => {
                            queue.insert_head(&value).unwrap();
                            shadow.insert_head(&value, &mut token);
                        }
                        Op::InsertTail(value) => {
                            queue.insert_tail(&value).unwrap();
                            shadow.insert_tail(&value, &mut token);
                        }
                        Op::RemoveHead => {
                            let removed = queue.remove_head_into(&mut buf).map(|e| e.into_string());
                            let expected = shadow.remove_head(&mut token);
                            if let Some(value) = &expected {
                                assert_eq!(&buf[..value.len()], value.as_bytes());
                                assert_eq!(buf[value.len()], 0);
                            }
                            assert_eq!(removed, expected);
                        }
                        Op::RemoveTail => {
                            let removed = queue.remove_tail().map(|e| e.into_string());
                            assert_eq!(removed, shadow.remove_tail(&mut token));
                        }
                    }
                    assert!(queue.is_well_formed());
                }
                let remaining: Vec<String> = queue.iter().map(str::to_owned).collect();
                assert_eq!(queue.size(), remaining.len());
                assert_eq!(remaining, shadow.drain(&mut token));
            })
        }
    }
}
