//! World clock resource.
//!
//! Advanced once per tick by
//! [`update_world_time`](crate::systems::time::update_world_time).

use bevy_ecs::prelude::Resource;

/// Simulation clock in world ticks (milliseconds).
///
/// `ticks` only ever grows. Motion and animation timestamps are compared
/// against it.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub ticks: u64,
    pub delta: u64,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            ticks: 0,
            delta: 0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn starting_at(ticks: u64) -> Self {
        WorldTime {
            ticks,
            ..Self::default()
        }
    }
}
