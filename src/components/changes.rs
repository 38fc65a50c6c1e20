//! Change tags produced by mobile state transitions.
//!
//! Setters on [`Mobile`](crate::components::mobile::Mobile) and
//! [`Equipment`](crate::components::equipment::Equipment) return a
//! [`ChangeSet`] naming what actually changed. The caller folds it into the
//! entity's [`PendingChanges`]; once per tick
//! [`flush_mobile_changes`](crate::systems::changes::flush_mobile_changes)
//! turns every pending aspect into one notification and clears the set, so
//! many writes inside a tick coalesce into a single event per aspect.

use std::ops::{BitOr, BitOrAssign};

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// One category of change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Aspect {
    Hits = 0,
    Mana = 1,
    Stamina = 2,
    Attributes = 3,
    Appearance = 4,
    Position = 5,
}

impl Aspect {
    pub const ALL: [Aspect; 6] = [
        Aspect::Hits,
        Aspect::Mana,
        Aspect::Stamina,
        Aspect::Attributes,
        Aspect::Appearance,
        Aspect::Position,
    ];

    fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Set of changed aspects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeSet(u8);

impl ChangeSet {
    pub const EMPTY: ChangeSet = ChangeSet(0);

    pub fn of(aspect: Aspect) -> Self {
        ChangeSet(aspect.mask())
    }

    /// `of(aspect)` when `changed`, otherwise empty.
    pub fn when(changed: bool, aspect: Aspect) -> Self {
        if changed { Self::of(aspect) } else { Self::EMPTY }
    }

    pub fn insert(&mut self, aspect: Aspect) {
        self.0 |= aspect.mask();
    }

    pub fn contains(&self, aspect: Aspect) -> bool {
        self.0 & aspect.mask() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Aspect> + '_ {
        Aspect::ALL.into_iter().filter(|a| self.contains(*a))
    }

    /// Return the current set and leave this one empty.
    pub fn take(&mut self) -> ChangeSet {
        std::mem::take(self)
    }
}

impl From<Aspect> for ChangeSet {
    fn from(aspect: Aspect) -> Self {
        ChangeSet::of(aspect)
    }
}

impl BitOr for ChangeSet {
    type Output = ChangeSet;
    fn bitor(self, rhs: ChangeSet) -> ChangeSet {
        ChangeSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChangeSet {
    fn bitor_assign(&mut self, rhs: ChangeSet) {
        self.0 |= rhs.0;
    }
}

/// Aspects changed on this entity since the last flush.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PendingChanges(pub ChangeSet);

impl PendingChanges {
    pub fn mark(&mut self, changes: ChangeSet) {
        self.0 |= changes;
    }
}
