use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Sub-tile render displacement in pixels.
///
/// Written by the motion system while a step is in flight and zeroed whenever
/// a step is committed or the queue is cleared.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOffset {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl RenderOffset {
    pub const ZERO: RenderOffset = RenderOffset { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn reset(&mut self) {
        *self = Self::ZERO;
    }
}
