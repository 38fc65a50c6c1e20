//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per tick, applying `time_scale` to the provided delta.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the world clock by `dt` ticks.
///
/// `dt` is the unscaled tick delta. The scaled delta is rounded to whole
/// ticks so the clock stays monotonic and integral.
pub fn update_world_time(world: &mut World, dt: u64) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = (dt as f64 * wt.time_scale.max(0.0) as f64).round() as u64;
    wt.ticks += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}
