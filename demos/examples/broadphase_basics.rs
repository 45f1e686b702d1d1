// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad phase basics.
//!
//! Track a few entities, query a region, move one, and query again.
//!
//! Run:
//! - `cargo run -p understory_demos --example broadphase_basics`

use kurbo::{Point, Rect};
use understory_broadphase::{BroadPhase, GroupFilter, TreeError};

fn main() -> Result<(), TreeError> {
    let mut bp: BroadPhase<u32> = BroadPhase::new();

    bp.insert(1, Rect::new(0.0, 0.0, 10.0, 10.0), GroupFilter::ALL)?;
    bp.insert(2, Rect::new(20.0, 20.0, 30.0, 30.0), GroupFilter::ALL)?;
    bp.insert(3, Rect::new(5.0, 5.0, 15.0, 15.0), GroupFilter::ALL)?;

    // Query the lower-left corner of the world.
    let region = Rect::new(0.0, 0.0, 12.0, 12.0);
    let mut hits: Vec<u32> = bp.query_rect(region, GroupFilter::ALL, true)?.collect();
    hits.sort_unstable();
    println!("entities overlapping {region:?}: {hits:?}");
    assert_eq!(hits, [1, 3]);

    // A tiny move is absorbed by the fat box; a big one re-indexes.
    let absorbed = !bp.update(1, Rect::new(0.05, 0.0, 10.05, 10.0))?;
    println!("small move absorbed without re-indexing: {absorbed}");
    let reindexed = bp.update(1, Rect::new(100.0, 100.0, 110.0, 110.0))?;
    println!("large move re-indexed: {reindexed}");

    let mut hits: Vec<u32> = bp.query_rect(region, GroupFilter::ALL, true)?.collect();
    hits.sort_unstable();
    println!("after the move, the same region holds: {hits:?}");
    assert_eq!(hits, [3]);

    // Point lookup at the moved entity's new home.
    let at: Vec<u32> = bp
        .query_point(Point::new(105.0, 105.0), GroupFilter::ALL)
        .collect();
    println!("entities at (105, 105): {at:?}");

    println!(
        "tracked: {}, tree height: {}, live nodes: {}",
        bp.len(),
        bp.height(),
        bp.node_count()
    );
    Ok(())
}
