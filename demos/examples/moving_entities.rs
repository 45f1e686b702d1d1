// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving entities under churn.
//!
//! Simulates a swarm of entities drifting across a world, counting how many
//! frames each entity's move is absorbed by its fat box versus re-indexed,
//! and runs a group-filtered sensor query every frame.
//!
//! Run:
//! - `cargo run -p understory_demos --example moving_entities`

use kurbo::Rect;
use understory_broadphase::{BroadPhase, Group, GroupFilter, TreeError};

const WORLD: f64 = 1000.0;
const ENTITIES: u32 = 200;
const FRAMES: u32 = 120;

fn main() -> Result<(), TreeError> {
    // A generous margin trades looser queries for fewer re-indexings.
    let mut bp: BroadPhase<u32> = BroadPhase::with_options(512, 0.5);

    // Even ids are solid obstacles; odd ids are sensor-only.
    let solid = GroupFilter::new(Group::GROUP_1, Group::ALL);
    let sensor = GroupFilter::new(Group::GROUP_2, Group::GROUP_2);

    let mut positions = Vec::new();
    for i in 0..ENTITIES {
        let x = f64::from(i % 20) * 50.0;
        let y = f64::from(i / 20) * 50.0;
        let filter = if i % 2 == 0 { solid } else { sensor };
        bp.insert(i, Rect::new(x, y, x + 8.0, y + 8.0), filter)?;
        positions.push((x, y));
    }

    let mut absorbed = 0u32;
    let mut reindexed = 0u32;
    for frame in 0..FRAMES {
        for (i, (x, y)) in positions.iter_mut().enumerate() {
            // Drift right, wrapping at the world edge; a few entities dart.
            let step = if i % 17 == 0 { 12.0 } else { 0.08 };
            *x = (*x + step) % WORLD;
            let bounds = Rect::new(*x, *y, *x + 8.0, *y + 8.0);
            if bp.update(i as u32, bounds)? {
                reindexed += 1;
            } else {
                absorbed += 1;
            }
        }

        // A solid-only viewport query, as a culling pass would issue.
        let viewport = Rect::new(0.0, 0.0, 300.0, 300.0);
        let visible_solids = bp
            .query_rect(viewport, GroupFilter::new(Group::ALL, Group::GROUP_1), true)?
            .count();
        if frame % 30 == 0 {
            println!(
                "frame {frame:3}: {visible_solids} solids visible, tree height {}",
                bp.height()
            );
        }
    }

    let total = absorbed + reindexed;
    println!(
        "{total} updates: {absorbed} absorbed by fat boxes, {reindexed} re-indexed"
    );
    Ok(())
}
