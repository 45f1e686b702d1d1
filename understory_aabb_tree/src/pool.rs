// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage: a contiguous slot pool recycled through an intrusive free list.
//!
//! The pool owns every node uniformly; tree topology is expressed as slot
//! indices, never references, so growth and recycling leave stored indices
//! valid until the slot is explicitly freed.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::types::{Aabb2D, Scalar};

/// Height stored in free slots. Doubles as a poison value: any live-node
/// operation that observes it is holding a stale index.
pub(crate) const FREE_HEIGHT: i32 = -1;

/// Index of a node slot in the pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(u32);

impl NodeIndex {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The pool is capped at u32::MAX slots by design."
    )]
    pub(crate) const fn new(i: usize) -> Self {
        Self(i as u32)
    }

    pub(crate) const fn get(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn raw(self) -> u32 {
        self.0
    }
}

/// A pool slot: a leaf, an internal node, or a free-list entry.
#[derive(Clone, Debug)]
pub(crate) struct Node<T, P> {
    /// The node's (possibly fattened) bounding box.
    pub(crate) aabb: Aabb2D<T>,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) left: Option<NodeIndex>,
    pub(crate) right: Option<NodeIndex>,
    /// Free-list link; meaningful only while the slot is free.
    pub(crate) next: Option<NodeIndex>,
    /// `-1` while free, `0` for leaves, `1 + max(children)` for internal nodes.
    pub(crate) height: i32,
    /// Incremented each time the slot is reissued, so stale handles never
    /// alias a different live proxy.
    pub(crate) generation: u32,
    /// Present only on leaves.
    pub(crate) payload: Option<P>,
}

impl<T: Scalar, P> Node<T, P> {
    fn free_slot(next: Option<NodeIndex>) -> Self {
        Self {
            aabb: Aabb2D::new(T::zero(), T::zero(), T::zero(), T::zero()),
            parent: None,
            left: None,
            right: None,
            next,
            height: FREE_HEIGHT,
            generation: 0,
            payload: None,
        }
    }

    /// A node is a leaf iff it has no left child.
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none()
    }
}

/// Slot pool with O(1) allocate/free and amortized-doubling growth.
#[derive(Clone, Debug)]
pub(crate) struct NodePool<T, P> {
    nodes: Vec<Node<T, P>>,
    free_head: Option<NodeIndex>,
    live: usize,
}

impl<T: Scalar, P> NodePool<T, P> {
    /// Create a pool with `capacity` free slots. The capacity is a sizing
    /// hint, not a limit: an empty free list grows the pool instead of
    /// failing.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut pool = Self {
            nodes: Vec::new(),
            free_head: None,
            live: 0,
        };
        pool.grow(capacity.max(1));
        pool
    }

    /// Append `extra` free slots and thread them onto the free list.
    /// Growth only appends, so existing indices stay valid.
    fn grow(&mut self, extra: usize) {
        let base = self.nodes.len();
        self.nodes.reserve(extra);
        for i in 0..extra {
            let next = if i + 1 < extra {
                Some(NodeIndex::new(base + i + 1))
            } else {
                self.free_head
            };
            self.nodes.push(Node::free_slot(next));
        }
        self.free_head = Some(NodeIndex::new(base));
    }

    /// Pop a slot off the free list, doubling the pool first if it is empty.
    /// The slot comes back reset as a parentless leaf with a fresh generation.
    pub(crate) fn allocate(&mut self) -> NodeIndex {
        if self.free_head.is_none() {
            let extra = self.nodes.len().max(1);
            self.grow(extra);
        }
        let index = self
            .free_head
            .expect("free list is non-empty after growth");
        let node = &mut self.nodes[index.get()];
        debug_assert!(node.height == FREE_HEIGHT, "allocated slot was not free");
        self.free_head = node.next;
        node.next = None;
        node.parent = None;
        node.left = None;
        node.right = None;
        node.height = 0;
        node.payload = None;
        node.generation = node.generation.saturating_add(1);
        self.live += 1;
        index
    }

    /// Return a slot to the free list, poisoning its height.
    ///
    /// Freeing a slot twice without an intervening [`allocate`](Self::allocate)
    /// is a bug in the tree, not a caller error.
    pub(crate) fn free(&mut self, index: NodeIndex) {
        let head = self.free_head;
        let node = &mut self.nodes[index.get()];
        debug_assert!(node.height != FREE_HEIGHT, "double free of node slot");
        node.height = FREE_HEIGHT;
        node.parent = None;
        node.left = None;
        node.right = None;
        node.payload = None;
        node.next = head;
        self.free_head = Some(index);
        self.live -= 1;
    }

    /// Bounds-checked access, for validating externally supplied indices.
    pub(crate) fn get(&self, index: NodeIndex) -> Option<&Node<T, P>> {
        self.nodes.get(index.get())
    }

    /// Number of live (in-tree) slots.
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Total slots, free and live.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of slots reachable from the free-list head.
    ///
    /// Walks the list with a step bound so a corrupted (cyclic) list shows up
    /// as a count mismatch instead of a hang.
    pub(crate) fn free_len(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.free_head;
        while let Some(index) = cursor {
            count += 1;
            if count > self.nodes.len() {
                break;
            }
            cursor = self.nodes[index.get()].next;
        }
        count
    }
}

impl<T, P> Index<NodeIndex> for NodePool<T, P> {
    type Output = Node<T, P>;

    fn index(&self, index: NodeIndex) -> &Node<T, P> {
        &self.nodes[index.get()]
    }
}

impl<T, P> IndexMut<NodeIndex> for NodePool<T, P> {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Node<T, P> {
        &mut self.nodes[index.get()]
    }
}
