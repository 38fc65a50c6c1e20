//! Step interpolation and commit.
//!
//! Each tick the [`motion_system`] looks at the front of every non-empty
//! [`MotionQueue`]:
//!
//! 1. A front step facing a different compass direction than the mobile is a
//!    turn in place. It is committed at once and the next front step is
//!    examined in the same tick.
//! 2. Otherwise the step is a translation. Its elapsed time is turned into a
//!    pixel [`RenderOffset`] toward the target tile.
//! 3. Once the elapsed time reaches the step duration the target position and
//!    facing are committed, the offset is zeroed and the step is popped. At
//!    most one translation completes per tick.
//!
//! The step duration is the movement-speed estimate minus a small lead-in so
//! a step arrives slightly before the nominal duration, hiding latency.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::changes::{Aspect, ChangeSet, PendingChanges};
use crate::components::direction::{Compass, Direction};
use crate::components::equipment::Equipment;
use crate::components::localplayer::LocalPlayer;
use crate::components::motionqueue::MotionQueue;
use crate::components::renderoffset::RenderOffset;
use crate::components::tileposition::{Facing, TilePosition};
use crate::resources::engineconfig::EngineConfig;
use crate::resources::movementspeed::MovementSpeed;
use crate::resources::viewcenter::ViewCenter;
use crate::resources::worldtime::WorldTime;

/// Pixel travel of a full tile along a cardinal direction.
pub const CARDINAL_TILE_PIXELS: i32 = 44;
/// Pixel travel per axis of a full tile along a diagonal direction.
pub const DIAGONAL_TILE_PIXELS: i32 = 22;
/// Vertical pixels per unit of elevation.
pub const PIXELS_PER_Z: f32 = 4.0;

/// Clock values one motion update needs.
#[derive(Debug, Clone, Copy)]
pub struct MotionTiming {
    pub now: u64,
    pub lead_in_ticks: u64,
    pub frame_delay: u64,
}

impl MotionTiming {
    pub fn new(now: u64, config: &EngineConfig) -> Self {
        Self {
            now,
            lead_in_ticks: config.lead_in_ticks,
            frame_delay: config.frame_delay,
        }
    }
}

/// What one motion update did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionTick {
    pub changes: ChangeSet,
    /// Target of the translation completed this tick, if any.
    pub arrived_at: Option<TilePosition>,
    /// Number of turn-in-place steps committed this tick.
    pub turns: u32,
}

/// Per-axis screen sign of each compass direction.
fn axis_signs(compass: Compass) -> (f32, f32) {
    match compass {
        Compass::North => (0.0, -1.0),
        Compass::NorthEast => (1.0, -1.0),
        Compass::East => (1.0, 0.0),
        Compass::SouthEast => (1.0, 1.0),
        Compass::South => (0.0, 1.0),
        Compass::SouthWest => (-1.0, 1.0),
        Compass::West => (-1.0, 0.0),
        Compass::NorthWest => (-1.0, -1.0),
    }
}

/// Pixel displacement after `frame_offset` of `frames_per_tile` frames.
///
/// Cardinal directions move one axis at double rate and are bounded by
/// [`CARDINAL_TILE_PIXELS`]; diagonals move both axes and are bounded by
/// [`DIAGONAL_TILE_PIXELS`]. Values truncate toward zero.
pub fn pixel_offset(compass: Compass, frame_offset: f32, frames_per_tile: f32) -> (i32, i32) {
    let bound = if compass.is_cardinal() {
        CARDINAL_TILE_PIXELS
    } else {
        DIAGONAL_TILE_PIXELS
    };
    let per_frame = bound as f32 / frames_per_tile;
    let (sx, sy) = axis_signs(compass);

    let axis = |sign: f32| (frame_offset * per_frame * sign) as i32;
    (
        axis(sx).clamp(-bound, bound),
        axis(sy).clamp(-bound, bound),
    )
}

/// Advance the motion of one mobile by one tick.
pub fn advance_motion(
    timing: MotionTiming,
    speed: &MovementSpeed,
    mounted: bool,
    position: &mut TilePosition,
    facing: &mut Facing,
    queue: &mut MotionQueue,
    offset: &mut RenderOffset,
) -> MotionTick {
    let mut tick = MotionTick::default();

    while let Some(step) = queue.front().copied() {
        if !step.direction.same_compass(facing.0) {
            *position = step.position;
            facing.0 = step.direction;
            offset.reset();
            queue.pop_front();
            queue.last_step_time = timing.now;
            tick.changes.insert(Aspect::Position);
            tick.turns += 1;
            continue;
        }

        let total = speed
            .ticks_per_tile(mounted, step.run)
            .saturating_sub(timing.lead_in_ticks)
            .max(1);
        let elapsed = timing.now.saturating_sub(queue.last_step_time);

        let frame_delay = timing.frame_delay.max(1) as f32;
        let frames_per_tile = total as f32 / frame_delay;
        let frame_offset = elapsed as f32 / frame_delay;

        let (x, y) = match step.direction.compass() {
            Some(compass) => pixel_offset(compass, frame_offset, frames_per_tile),
            None => (0, 0),
        };
        let dz = (step.position.z as i32 - position.z as i32) as f32;
        let z = (dz * frame_offset * (PIXELS_PER_Z / frames_per_tile)) as i32;
        *offset = RenderOffset::new(x, y, z);

        if elapsed >= total {
            *position = step.position;
            facing.0 = step.direction;
            offset.reset();
            queue.pop_front();
            queue.last_step_time = timing.now;
            tick.changes.insert(Aspect::Position);
            tick.arrived_at = Some(step.position);
        }
        break;
    }

    tick
}

/// Interpolate and commit queued steps for every moving mobile.
///
/// Contract
/// - Reads [`WorldTime`], [`EngineConfig`] and [`MovementSpeed`].
/// - Mutates position, facing, queue and offset of moving mobiles.
/// - Marks [`Aspect::Position`] in [`PendingChanges`] on every commit.
/// - Recenters [`ViewCenter`] when a [`LocalPlayer`] step completes.
pub fn motion_system(
    time: Res<WorldTime>,
    config: Res<EngineConfig>,
    speed: Res<MovementSpeed>,
    mut view: ResMut<ViewCenter>,
    mut query: Query<(
        &mut TilePosition,
        &mut Facing,
        &mut MotionQueue,
        &mut RenderOffset,
        &mut PendingChanges,
        &Equipment,
        Has<LocalPlayer>,
    )>,
) {
    let timing = MotionTiming::new(time.ticks, &config);

    for (mut position, mut facing, mut queue, mut offset, mut pending, equipment, is_local) in
        query.iter_mut()
    {
        if queue.is_empty() {
            continue;
        }

        let tick = advance_motion(
            timing,
            &speed,
            equipment.is_mounted(),
            &mut position,
            &mut facing,
            &mut queue,
            &mut offset,
        );
        pending.mark(tick.changes);

        if let Some(arrived) = tick.arrived_at
            && is_local
        {
            debug!("local player arrived at ({}, {})", arrived.x, arrived.y);
            view.recenter(arrived.x, arrived.y);
        }
    }
}

/// Facing used for animation: the queued step's facing while one is pending,
/// else the live facing.
pub fn animation_facing(queue: &MotionQueue, facing: &Facing) -> Direction {
    queue.front().map(|s| s.direction).unwrap_or(facing.0)
}
