// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collision-group filtering for proxies and queries.

use bitflags::bitflags;

bitflags! {
    /// A bit mask of collision groups.
    ///
    /// Each proxy belongs to one or more groups and declares which groups it
    /// interacts with; queries carry the same pair. See [`GroupFilter`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Group: u32 {
        /// Group 1.
        const GROUP_1 = 1 << 0;
        /// Group 2.
        const GROUP_2 = 1 << 1;
        /// Group 3.
        const GROUP_3 = 1 << 2;
        /// Group 4.
        const GROUP_4 = 1 << 3;
        /// Group 5.
        const GROUP_5 = 1 << 4;
        /// Group 6.
        const GROUP_6 = 1 << 5;
        /// Group 7.
        const GROUP_7 = 1 << 6;
        /// Group 8.
        const GROUP_8 = 1 << 7;
        /// Group 9.
        const GROUP_9 = 1 << 8;
        /// Group 10.
        const GROUP_10 = 1 << 9;
        /// Group 11.
        const GROUP_11 = 1 << 10;
        /// Group 12.
        const GROUP_12 = 1 << 11;
        /// Group 13.
        const GROUP_13 = 1 << 12;
        /// Group 14.
        const GROUP_14 = 1 << 13;
        /// Group 15.
        const GROUP_15 = 1 << 14;
        /// Group 16.
        const GROUP_16 = 1 << 15;

        /// All groups.
        const ALL = u32::MAX;
        /// No groups.
        const NONE = 0;
    }
}

/// Pairwise interaction filter in the style of physics collision groups.
///
/// `memberships` is the set of groups the proxy (or query) belongs to;
/// `filter` is the set of groups it interacts with. Two sides interact when
/// each one's `filter` intersects the other's `memberships`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupFilter {
    /// Groups this side belongs to.
    pub memberships: Group,
    /// Groups this side interacts with.
    pub filter: Group,
}

impl GroupFilter {
    /// Interact with everything.
    pub const ALL: Self = Self::new(Group::ALL, Group::ALL);

    /// Interact with nothing.
    pub const NONE: Self = Self::new(Group::NONE, Group::NONE);

    /// Create a filter from memberships and an interaction mask.
    pub const fn new(memberships: Group, filter: Group) -> Self {
        Self {
            memberships,
            filter,
        }
    }

    /// Whether the two sides interact (symmetric).
    pub fn test(&self, other: &Self) -> bool {
        self.filter.intersects(other.memberships) && other.filter.intersects(self.memberships)
    }
}

impl Default for GroupFilter {
    fn default() -> Self {
        Self::ALL
    }
}
