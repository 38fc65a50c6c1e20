//! View center that follows the local player.

use bevy_ecs::prelude::Resource;

/// Tile the world view is centered on.
///
/// The motion system moves it synchronously whenever a step of the
/// [`LocalPlayer`](crate::components::localplayer::LocalPlayer) completes.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewCenter {
    pub x: i32,
    pub y: i32,
    /// Number of recenters so far.
    pub recenters: u64,
}

impl ViewCenter {
    pub fn recenter(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        self.recenters += 1;
    }
}
