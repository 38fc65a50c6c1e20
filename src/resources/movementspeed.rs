//! Movement-speed model.
//!
//! Turns the configured ticks per tile into the duration of one step, picked
//! by whether the mobile is mounted and whether the step is a run.

use bevy_ecs::prelude::Resource;

use crate::resources::engineconfig::EngineConfig;

/// Estimated ticks a mobile needs to cross one tile.
///
/// Mounted mobiles move twice as fast as mobiles on foot; running halves the
/// walking time.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementSpeed {
    pub walk: u64,
    pub run: u64,
    pub mount_walk: u64,
    pub mount_run: u64,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl MovementSpeed {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            walk: config.walk_ticks,
            run: config.run_ticks,
            mount_walk: config.mount_walk_ticks,
            mount_run: config.mount_run_ticks,
        }
    }

    pub fn ticks_per_tile(&self, mounted: bool, running: bool) -> u64 {
        match (mounted, running) {
            (true, true) => self.mount_run,
            (true, false) => self.mount_walk,
            (false, true) => self.run,
            (false, false) => self.walk,
        }
    }
}
