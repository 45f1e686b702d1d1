// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_broadphase --heading-base-level=0

//! Understory Broad Phase: a Kurbo-native broad phase for moving entities.
//!
//! Understory Broad Phase is a reusable building block for collision and
//! visibility pipelines in games, editors, and simulations.
//!
//! - Tracks entities by caller-chosen ids with [`kurbo::Rect`] bounds.
//! - Answers rectangle and point overlap queries in roughly logarithmic
//!   time, backed by [`understory_aabb_tree`]'s dynamic AABB tree.
//! - Scopes queries to subsets of entities with collision-group filters
//!   ([`GroupFilter`]).
//!
//! Bounds are stored fattened by a margin, so results are conservative:
//! a superset of the exact overlaps, never missing one. Exact (narrow-phase)
//! tests belong downstream.
//!
//! ## Where this fits
//!
//! A collision pipeline usually separates concerns:
//! - Broad phase: coarse spatial filtering over conservative boxes (this crate).
//! - Narrow phase: exact geometric tests on the surviving candidate pairs.
//! - Response: whatever the application does with contacts.
//!
//! The broad phase owns the id → proxy mapping and the spatial structure;
//! callers own entity geometry and decide when bounds change.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_broadphase::{BroadPhase, GroupFilter};
//!
//! let mut bp: BroadPhase<u32> = BroadPhase::new();
//! bp.insert(1, Rect::new(0.0, 0.0, 10.0, 10.0), GroupFilter::ALL)?;
//! bp.insert(2, Rect::new(20.0, 20.0, 30.0, 30.0), GroupFilter::ALL)?;
//! bp.insert(3, Rect::new(5.0, 5.0, 15.0, 15.0), GroupFilter::ALL)?;
//!
//! let mut hits: Vec<u32> = bp
//!     .query_rect(Rect::new(0.0, 0.0, 12.0, 12.0), GroupFilter::ALL, true)?
//!     .collect();
//! hits.sort_unstable();
//! assert_eq!(hits, [1, 3]);
//!
//! // Small movements are absorbed by the fat box; big ones re-index.
//! let moved = bp.update(1, Rect::new(0.05, 0.0, 10.05, 10.0))?;
//! assert!(!moved);
//!
//! let at_point: Vec<u32> = bp.query_point(Point::new(25.0, 25.0), GroupFilter::ALL).collect();
//! assert_eq!(at_point, [2]);
//!
//! bp.remove(3)?;
//! # Ok::<(), understory_broadphase::TreeError>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod filter;

pub use filter::{Group, GroupFilter};
pub use understory_aabb_tree::{TreeError, TreeResult};

use alloc::collections::BTreeMap;
use core::fmt::Debug;

use kurbo::{Point, Rect};
use understory_aabb_tree::{Aabb2D, AabbTree, ProxyId};

/// Default fattening margin, in world units.
///
/// Tune with [`BroadPhase::with_options`]: a larger margin means fewer
/// re-indexings for jittering entities, at the cost of looser queries.
pub const DEFAULT_MARGIN: f64 = 0.1;

const DEFAULT_CAPACITY: usize = 16;

#[derive(Clone, Copy, Debug)]
struct Proxy {
    id: ProxyId,
    filter: GroupFilter,
}

/// Broad-phase index of movable entities keyed by caller ids.
///
/// Ids are caller-chosen (`Copy + Ord`); each id maps to exactly one live
/// proxy in the underlying tree. Inserting an id that is already present
/// replaces its bounds and filter.
pub struct BroadPhase<E: Copy + Ord + Debug> {
    tree: AabbTree<f64, E>,
    proxies: BTreeMap<E, Proxy>,
}

impl<E: Copy + Ord + Debug> BroadPhase<E> {
    /// Create an empty broad phase with default capacity and margin.
    pub fn new() -> Self {
        Self::with_options(DEFAULT_CAPACITY, DEFAULT_MARGIN)
    }

    /// Create an empty broad phase.
    ///
    /// `initial_capacity` pre-sizes the node pool (a hint, not a limit);
    /// `margin` is the fattening applied on every side of entity bounds.
    pub fn with_options(initial_capacity: usize, margin: f64) -> Self {
        Self {
            tree: AabbTree::new(initial_capacity, margin),
            proxies: BTreeMap::new(),
        }
    }

    /// Track `id` at `bounds`.
    ///
    /// If `id` is already tracked its previous bounds and filter are
    /// replaced. Degenerate bounds are rejected before any change.
    pub fn insert(&mut self, id: E, bounds: Rect, filter: GroupFilter) -> TreeResult<()> {
        let aabb = rect_to_aabb(bounds);
        if aabb.is_degenerate() {
            return Err(TreeError::DegenerateAabb);
        }
        if self.proxies.contains_key(&id) {
            self.remove(id)?;
        }
        let proxy = self.tree.insert(aabb, id)?;
        self.proxies.insert(
            id,
            Proxy {
                id: proxy,
                filter,
            },
        );
        Ok(())
    }

    /// Move `id` to new bounds.
    ///
    /// Returns whether the entity was re-indexed (`false` when the stored
    /// fat box absorbed the move), or [`TreeError::InvalidProxy`] for an
    /// untracked id.
    pub fn update(&mut self, id: E, bounds: Rect) -> TreeResult<bool> {
        let proxy = self.proxies.get(&id).ok_or(TreeError::InvalidProxy)?;
        self.tree.update(proxy.id, rect_to_aabb(bounds))
    }

    /// Stop tracking `id`.
    pub fn remove(&mut self, id: E) -> TreeResult<()> {
        let proxy = *self.proxies.get(&id).ok_or(TreeError::InvalidProxy)?;
        let _ = self.tree.remove(proxy.id)?;
        self.proxies.remove(&id);
        Ok(())
    }

    /// Replace the collision filter of `id`.
    pub fn set_filter(&mut self, id: E, filter: GroupFilter) -> TreeResult<()> {
        let proxy = self.proxies.get_mut(&id).ok_or(TreeError::InvalidProxy)?;
        proxy.filter = filter;
        Ok(())
    }

    /// The collision filter of `id`.
    pub fn filter(&self, id: E) -> TreeResult<GroupFilter> {
        let proxy = self.proxies.get(&id).ok_or(TreeError::InvalidProxy)?;
        Ok(proxy.filter)
    }

    /// Iterate ids whose fat bounds intersect `region` and whose filter
    /// interacts with `filter`.
    ///
    /// With `touch_is_overlap` set, bounds sharing only an edge count as
    /// intersecting. Results are conservative (fat boxes) and unordered.
    pub fn query_rect(
        &self,
        region: Rect,
        filter: GroupFilter,
        touch_is_overlap: bool,
    ) -> TreeResult<impl Iterator<Item = E> + '_> {
        let hits = self
            .tree
            .query_rect(rect_to_aabb(region), touch_is_overlap)?;
        Ok(hits.filter_map(move |(_, id)| {
            let proxy = self.proxies.get(&id)?;
            filter.test(&proxy.filter).then_some(id)
        }))
    }

    /// Iterate ids whose fat bounds contain `point` and whose filter
    /// interacts with `filter`.
    pub fn query_point(&self, point: Point, filter: GroupFilter) -> impl Iterator<Item = E> + '_ {
        self.tree.query_point(point.x, point.y).filter_map(move |(_, id)| {
            let proxy = self.proxies.get(&id)?;
            filter.test(&proxy.filter).then_some(id)
        })
    }

    /// The fattened bounds currently stored for `id`.
    pub fn fat_bounds(&self, id: E) -> TreeResult<Rect> {
        let proxy = self.proxies.get(&id).ok_or(TreeError::InvalidProxy)?;
        let aabb = self.tree.fat_aabb(proxy.id)?;
        Ok(aabb_to_rect(aabb))
    }

    /// Whether `id` is tracked.
    pub fn contains(&self, id: E) -> bool {
        self.proxies.contains_key(&id)
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Whether no entities are tracked.
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Height of the underlying tree (`-1` when empty); an introspection
    /// hook for tests and metrics.
    pub fn height(&self) -> i32 {
        self.tree.height()
    }

    /// Live nodes in the underlying tree (leaves plus internal).
    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    /// The fattening margin applied to entity bounds.
    pub fn margin(&self) -> f64 {
        self.tree.margin()
    }

    /// Stop tracking everything.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.proxies.clear();
    }
}

impl<E: Copy + Ord + Debug> Default for BroadPhase<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Ord + Debug> Debug for BroadPhase<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BroadPhase")
            .field("entities", &self.proxies.len())
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

fn rect_to_aabb(r: Rect) -> Aabb2D<f64> {
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

fn aabb_to_rect(a: Aabb2D<f64>) -> Rect {
    Rect::new(a.min_x, a.min_y, a.max_x, a.max_y)
}
