// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_aabb_tree --heading-base-level=0

//! Understory AABB Tree: a dynamic bounding-volume hierarchy for moving boxes.
//!
//! Understory AABB Tree is the broad-phase building block of a collision or
//! visibility pipeline: it indexes a changing set of axis-aligned bounding
//! boxes so overlap queries run in roughly logarithmic time instead of
//! scanning every entry.
//!
//! - Insert, update, and remove AABBs with user payloads through stable
//!   generational handles.
//! - Query by intersecting rectangle or by point with lazy, stack-based
//!   traversal.
//! - Boxes are stored fattened by a configurable margin, so small movements
//!   are absorbed without restructuring; queries are conservative (false
//!   positives, never false negatives) and exact tests belong downstream.
//!
//! Internally the tree is a binary hierarchy held in a contiguous node pool
//! with an intrusive free list: topology is integer indices, allocation
//! happens only when the pool's free list empties (amortized doubling), and
//! the whole structure is owned by one [`AabbTree`] value. Insertion picks
//! the cheapest sibling by perimeter cost with branch-and-bound descent, and
//! every insert/remove rebalances with AVL-style rotations chosen by box
//! cost, keeping the height bound tight under adversarial workloads.
//!
//! It is generic over the scalar type `T` and does not depend on any
//! geometry crate. Higher layers can compute world-space AABBs and feed
//! them here.
//!
//! # Example
//!
//! ```rust
//! use understory_aabb_tree::{Aabb2D, AabbTree};
//!
//! // Create a tree with a 0.1-unit fattening margin and add three boxes.
//! let mut tree: AabbTree<f64, u32> = AabbTree::new(16, 0.1);
//! let a = tree.insert(Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1)?;
//! let _b = tree.insert(Aabb2D::new(20.0, 20.0, 30.0, 30.0), 2)?;
//! let _c = tree.insert(Aabb2D::new(5.0, 5.0, 15.0, 15.0), 3)?;
//!
//! // Query a region: ids 1 and 3 overlap, id 2 does not.
//! let mut hits: Vec<u32> = tree
//!     .query_rect(Aabb2D::new(0.0, 0.0, 12.0, 12.0), true)?
//!     .map(|(_, id)| id)
//!     .collect();
//! hits.sort_unstable();
//! assert_eq!(hits, [1, 3]);
//!
//! // A small move stays inside the fat box: no tree surgery.
//! assert!(!tree.update(a, Aabb2D::new(0.05, 0.0, 10.05, 10.0))?);
//! // A large move re-inserts; the handle stays valid.
//! assert!(tree.update(a, Aabb2D::new(200.0, 0.0, 210.0, 10.0))?);
//! assert_eq!(tree.payload(a)?, 1);
//!
//! tree.remove(a)?;
//! # Ok::<(), understory_aabb_tree::TreeError>(())
//! ```
//!
//! ## Concurrency
//!
//! Every operation is synchronous and runs to completion on the calling
//! thread; the tree holds no locks and assumes exclusive access per call.
//! Hosts needing shared access must serialize externally (queries read the
//! node links that mutation rewrites).
//!
//! ## Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates; degenerate
//! boxes (including NaN) are rejected at the public boundary with
//! [`TreeError::DegenerateAabb`]. Cost metrics use widened accumulators
//! (f32→f64, i64→i128) to reduce precision pitfalls.

#![no_std]

extern crate alloc;

pub mod error;
pub mod tree;
pub mod types;

mod pool;

pub use error::{TreeError, TreeResult};
pub use tree::{AabbTree, ProxyId, QueryPoint, QueryRect};
pub use types::{Aabb2D, Scalar, fatten, perimeter, union_aabb};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn insert_update_and_query() {
        let mut tree: AabbTree<f64, u32> = AabbTree::new(16, 0.1);
        let k1 = tree.insert(Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1).unwrap();
        tree.insert(Aabb2D::new(5.0, 5.0, 15.0, 15.0), 2).unwrap();

        let hits: Vec<_> = tree.query_point(6.0, 6.0).collect();
        assert_eq!(hits.len(), 2);

        assert!(tree.update(k1, Aabb2D::new(30.0, 30.0, 40.0, 40.0)).unwrap());
        let hits: Vec<u32> = tree.query_point(6.0, 6.0).map(|(_, id)| id).collect();
        assert_eq!(hits, [2]);
    }

    #[test]
    fn removed_proxies_stop_matching() {
        let mut tree: AabbTree<f64, u32> = AabbTree::new(4, 0.1);
        let k = tree.insert(Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1).unwrap();
        assert_eq!(tree.remove(k), Ok(1));
        assert_eq!(tree.query_point(1.0, 1.0).count(), 0);
        assert_eq!(tree.remove(k), Err(TreeError::InvalidProxy));
    }
}
