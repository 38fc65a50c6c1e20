use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::direction::Direction;

/// Tile coordinates plus signed elevation of a mobile.
///
/// Treated as a value: the motion system replaces it whole when a step
/// completes.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePosition {
    pub x: i32,
    pub y: i32,
    pub z: i8,
}

impl TilePosition {
    pub fn new(x: i32, y: i32, z: i8) -> Self {
        Self { x, y, z }
    }
}

/// Live facing of a mobile.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Facing(pub Direction);
