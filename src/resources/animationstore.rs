//! Animation asset registry.
//!
//! This module provides the engine's view of the animation assets: which body
//! category a graphic belongs to, which groups exist for it, and how many
//! frames each of the five stored directions has. Frame data is loaded lazily:
//! the first lookup of a direction triggers its load.
//!
//! In [`LoadMode::Immediate`] the load completes inside the lookup. In
//! [`LoadMode::Deferred`] the lookup only queues the load and reports the
//! direction as not loaded; [`AnimationStore::complete_pending_loads`] finishes
//! queued loads, which the
//! [`asset_load_system`](crate::systems::animation::asset_load_system) does at
//! the start of every tick.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "graphics": [
//!     { "graphic": 400, "category": "People",
//!       "groups": [ { "group": 0, "frames": [10, 10, 10, 10, 10] } ] }
//!   ]
//! }
//! ```

use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Number of directions stored per group; the other three are mirrors.
pub const DIRECTION_BUCKETS: u8 = 5;

/// Body category of a graphic, deciding which group table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyCategory {
    /// Animals and other small creatures.
    Low,
    /// Monsters and other large creatures.
    Tall,
    /// Humanoids.
    People,
}

/// Group ids of the low-creature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LowGroup {
    Walk = 0,
    Run = 1,
    Stand = 2,
    Eat = 3,
    Attack1 = 5,
    Die1 = 8,
    Fidget1 = 9,
    LieDown = 11,
    Die2 = 12,
}

/// Group ids of the tall-creature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TallGroup {
    Walk = 0,
    Stand = 1,
    Die1 = 2,
    Die2 = 3,
    Attack1 = 4,
    GetHit1 = 13,
    Fidget1 = 17,
    Fly = 19,
    Land = 20,
    DieInFlight = 21,
}

/// Group ids of the people table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PeopleGroup {
    WalkUnarmed = 0,
    WalkArmed = 1,
    RunUnarmed = 2,
    RunArmed = 3,
    Stand = 4,
    Fidget1 = 5,
    Fidget2 = 6,
    StandOneHandedAttack = 7,
    StandTwoHandedAttack = 8,
    AttackOneHanded = 9,
    AttackUnarmed1 = 10,
    AttackUnarmed2 = 11,
    AttackTwoHandedDown = 12,
    AttackTwoHandedWide = 13,
    AttackTwoHandedJab = 14,
    WalkWarMode = 15,
    CastDirected = 16,
    CastArea = 17,
    AttackBow = 18,
    AttackCrossbow = 19,
    GetHit = 20,
    Die1 = 21,
    Die2 = 22,
    OnMountRideSlow = 23,
    OnMountRideFast = 24,
    OnMountStand = 25,
    OnMountAttack = 26,
    OnMountAttackBow = 27,
    OnMountAttackCrossbow = 28,
    OnMountSlapHorse = 29,
    Turn = 30,
    AttackUnarmedAndWalk = 31,
    EmoteBow = 32,
    EmoteSalute = 33,
    Fidget3 = 34,
}

/// Result of a frame lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameData {
    pub frame_count: u8,
    pub loaded: bool,
}

impl FrameData {
    pub const MISSING: FrameData = FrameData {
        frame_count: 0,
        loaded: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Immediate,
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Unloaded,
    Pending,
    Loaded,
}

#[derive(Debug, Clone, Copy)]
struct DirectionFrames {
    frame_count: u8,
    state: LoadState,
}

type DirectionKey = (u16, u8, u8);

/// Structure of the animation table loaded from JSON.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AnimationTableData {
    pub graphics: Vec<GraphicEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GraphicEntry {
    pub graphic: u16,
    #[serde(default)]
    pub category: Option<BodyCategory>,
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GroupEntry {
    pub group: u8,
    /// Frame count of each stored direction bucket.
    pub frames: [u8; DIRECTION_BUCKETS as usize],
}

/// Registry of body categories and per-direction frame data.
#[derive(Resource, Debug, Clone)]
pub struct AnimationStore {
    categories: FxHashMap<u16, BodyCategory>,
    directions: FxHashMap<DirectionKey, DirectionFrames>,
    pending: Vec<DirectionKey>,
    mode: LoadMode,
}

impl Default for AnimationStore {
    fn default() -> Self {
        Self::new(LoadMode::Immediate)
    }
}

impl AnimationStore {
    pub fn new(mode: LoadMode) -> Self {
        Self {
            categories: FxHashMap::default(),
            directions: FxHashMap::default(),
            pending: Vec::new(),
            mode,
        }
    }

    pub fn from_data(data: &AnimationTableData, mode: LoadMode) -> Self {
        let mut store = Self::new(mode);
        for entry in &data.graphics {
            if let Some(category) = entry.category {
                store.set_category(entry.graphic, category);
            }
            for group in &entry.groups {
                store.insert_group(entry.graphic, group.group, group.frames);
            }
        }
        store
    }

    pub fn load_from_file(
        path: impl AsRef<Path>,
        mode: LoadMode,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let file_content = std::fs::read_to_string(path)?;
        let data: AnimationTableData = serde_json::from_str(&file_content)?;
        Ok(Self::from_data(&data, mode))
    }

    pub fn set_category(&mut self, graphic: u16, category: BodyCategory) {
        self.categories.insert(graphic, category);
    }

    /// Register a group with the frame count of each direction bucket. The
    /// frames start unloaded.
    pub fn insert_group(
        &mut self,
        graphic: u16,
        group: u8,
        frames: [u8; DIRECTION_BUCKETS as usize],
    ) {
        for (bucket, frame_count) in frames.into_iter().enumerate() {
            self.directions.insert(
                (graphic, group, bucket as u8),
                DirectionFrames {
                    frame_count,
                    state: LoadState::Unloaded,
                },
            );
        }
    }

    /// Body category of `graphic`. Graphics without an explicit entry fall
    /// back to the id ranges of the asset files: below 200 tall creatures,
    /// below 400 low creatures, people above.
    pub fn classify_graphic(&self, graphic: u16) -> BodyCategory {
        if let Some(category) = self.categories.get(&graphic) {
            return *category;
        }
        match graphic {
            0..200 => BodyCategory::Tall,
            200..400 => BodyCategory::Low,
            _ => BodyCategory::People,
        }
    }

    /// Whether `graphic` has frames for `group` in any direction.
    pub fn group_exists(&self, graphic: u16, group: u8) -> bool {
        (0..DIRECTION_BUCKETS).any(|bucket| {
            self.directions
                .get(&(graphic, group, bucket))
                .is_some_and(|d| d.frame_count > 0)
        })
    }

    pub fn has_fly_variant(&self, graphic: u16) -> bool {
        self.group_exists(graphic, TallGroup::Fly as u8)
    }

    /// Frame data for one direction, triggering its load on first use.
    pub fn frame_data(&mut self, graphic: u16, group: u8, bucket: u8) -> FrameData {
        if bucket >= DIRECTION_BUCKETS {
            return FrameData::MISSING;
        }
        let key = (graphic, group, bucket);
        let Some(direction) = self.directions.get_mut(&key) else {
            debug!("no frames for graphic {} group {} bucket {}", graphic, group, bucket);
            return FrameData::MISSING;
        };

        match (direction.state, self.mode) {
            (LoadState::Loaded, _) => FrameData {
                frame_count: direction.frame_count,
                loaded: true,
            },
            (LoadState::Unloaded, LoadMode::Immediate) => {
                direction.state = LoadState::Loaded;
                FrameData {
                    frame_count: direction.frame_count,
                    loaded: true,
                }
            }
            (LoadState::Unloaded, LoadMode::Deferred) => {
                direction.state = LoadState::Pending;
                self.pending.push(key);
                FrameData::MISSING
            }
            (LoadState::Pending, _) => FrameData::MISSING,
        }
    }

    /// Finish every queued load. Returns how many directions were loaded.
    pub fn complete_pending_loads(&mut self) -> usize {
        let mut completed = 0;
        for key in self.pending.drain(..) {
            if let Some(direction) = self.directions.get_mut(&key) {
                direction.state = LoadState::Loaded;
                completed += 1;
            }
        }
        completed
    }

    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    pub fn is_loaded(&self, graphic: u16, group: u8, bucket: u8) -> bool {
        self.directions
            .get(&(graphic, group, bucket))
            .is_some_and(|d| d.state == LoadState::Loaded)
    }

    /// Map a compass code (0–7) to the stored direction bucket and whether the
    /// frames are drawn mirrored.
    pub fn remap_direction(direction: u8) -> (u8, bool) {
        match direction & 0x07 {
            2 => (1, true),
            4 => (1, false),
            1 => (2, true),
            5 => (2, false),
            0 => (3, true),
            6 => (3, false),
            3 => (0, false),
            _ => (4, false),
        }
    }
}
