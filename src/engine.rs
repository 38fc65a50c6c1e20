//! Engine facade.
//!
//! [`MobileEngine`] owns the ECS [`World`] and the per-tick [`Schedule`]. It is
//! the entry point used by the packet layer: spawn mobiles as they come into
//! view, queue the steps the server confirms, apply state updates, and call
//! [`MobileEngine::advance_one_tick`] once per client frame.
//!
//! # Tick order
//!
//! 1. [`update_world_time`] advances the clock
//! 2. [`asset_load_system`] completes deferred frame loads
//! 3. [`motion_system`] interpolates and commits steps
//! 4. [`animation_frame_system`] advances frames
//! 5. [`flush_mobile_changes`] emits one notification per changed aspect

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};
use serde::Serialize;

use crate::components::changes::{ChangeSet, PendingChanges};
use crate::components::direction::Direction;
use crate::components::equipment::{Equipment, Layer};
use crate::components::localplayer::LocalPlayer;
use crate::components::mobile::{Mobile, Serial};
use crate::components::mobileanimation::MobileAnimation;
use crate::components::motionqueue::{EndState, MotionQueue};
use crate::components::renderoffset::RenderOffset;
use crate::components::tileposition::{Facing, TilePosition};
use crate::events::mobile::log_mobile_changes;
use crate::resources::animationstore::{AnimationStore, LoadMode};
use crate::resources::clientversion::ClientVersion;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::mobileregistry::MobileRegistry;
use crate::resources::movementspeed::MovementSpeed;
use crate::resources::viewcenter::ViewCenter;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::{animation_frame_system, asset_load_system};
use crate::systems::changes::flush_mobile_changes;
use crate::systems::motion::motion_system;
use crate::systems::time::update_world_time;

/// Render-facing view of one mobile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MobileSnapshot {
    pub serial: Serial,
    pub graphic: u16,
    pub position: TilePosition,
    pub direction: Direction,
    pub offset: RenderOffset,
    pub animation_group: Option<u8>,
    pub anim_index: u8,
    pub is_moving: bool,
    pub is_walking: bool,
    pub is_running: bool,
    pub mirrored: bool,
    pub queued_steps: usize,
}

/// World, schedule and the operations the packet layer calls.
pub struct MobileEngine {
    world: World,
    schedule: Schedule,
}

impl Default for MobileEngine {
    fn default() -> Self {
        Self::new(EngineConfig::new())
    }
}

impl MobileEngine {
    /// Build a world from `config`.
    ///
    /// When the configured animation table cannot be loaded the engine starts
    /// with an empty store and logs a warning.
    pub fn new(config: EngineConfig) -> Self {
        let mode = if config.deferred_loading {
            LoadMode::Deferred
        } else {
            LoadMode::Immediate
        };
        let store = match &config.animation_table {
            Some(path) => AnimationStore::load_from_file(path, mode).unwrap_or_else(|e| {
                warn!("Failed to load animation table {}: {}", path.display(), e);
                AnimationStore::new(mode)
            }),
            None => AnimationStore::new(mode),
        };
        Self::with_store(config, store)
    }

    /// Build a world from `config` using an already populated store.
    pub fn with_store(config: EngineConfig, store: AnimationStore) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(MovementSpeed::from_config(&config));
        world.insert_resource(config.client_version);
        world.insert_resource(store);
        world.insert_resource(ViewCenter::default());
        world.insert_resource(MobileRegistry::default());
        info!(
            "mobile engine ready: client {}, frame delay {} ticks",
            config.client_version, config.frame_delay
        );
        world.insert_resource(config);

        world.spawn(Observer::new(log_mobile_changes));
        // Ensure the observer is registered before any system triggers events.
        world.flush();

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                asset_load_system,
                motion_system,
                animation_frame_system,
                flush_mobile_changes,
            )
                .chain(),
        );

        Self { world, schedule }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Current world tick.
    pub fn now(&self) -> u64 {
        self.world.resource::<WorldTime>().ticks
    }

    pub fn config(&self) -> &EngineConfig {
        self.world.resource::<EngineConfig>()
    }

    pub fn view_center(&self) -> ViewCenter {
        *self.world.resource::<ViewCenter>()
    }

    /// Spawn a mobile at `position` facing `direction`.
    ///
    /// A serial that is already registered returns its existing entity.
    pub fn spawn_mobile(
        &mut self,
        serial: Serial,
        graphic: u16,
        position: TilePosition,
        direction: Direction,
    ) -> Entity {
        if let Some(entity) = self.entity_for(serial) {
            debug!("mobile {:#010x} already spawned", serial.0);
            return entity;
        }

        let first_frame_at = self.now() + self.config().frame_delay;
        let entity = self
            .world
            .spawn((
                Mobile::new(serial, graphic),
                position,
                Facing(direction),
                MotionQueue::new(),
                RenderOffset::ZERO,
                MobileAnimation::starting_at(first_frame_at),
                Equipment::new(),
                PendingChanges::default(),
            ))
            .id();
        self.world
            .resource_mut::<MobileRegistry>()
            .insert(serial, entity);
        debug!(
            "spawned mobile {:#010x} graphic {} at ({}, {}, {})",
            serial.0, graphic, position.x, position.y, position.z
        );
        entity
    }

    /// Remove a mobile and everything it owns. Returns `false` for an unknown serial.
    pub fn despawn_mobile(&mut self, serial: Serial) -> bool {
        let Some(entity) = self.world.resource_mut::<MobileRegistry>().remove(serial) else {
            return false;
        };
        self.world.despawn(entity)
    }

    pub fn entity_for(&self, serial: Serial) -> Option<Entity> {
        self.world.resource::<MobileRegistry>().get(serial)
    }

    /// Queue the steps towards a server-confirmed position.
    ///
    /// Returns `false` when the queue cannot take them; the caller retries later.
    pub fn enqueue_step(
        &mut self,
        entity: Entity,
        position: TilePosition,
        direction: Direction,
        run: bool,
    ) -> bool {
        let now = self.now();
        let Ok(mut entity_mut) = self.world.get_entity_mut(entity) else {
            return false;
        };
        let (Some(live_position), Some(facing)) = (
            entity_mut.get::<TilePosition>().copied(),
            entity_mut.get::<Facing>().copied(),
        ) else {
            return false;
        };
        let Some(mut queue) = entity_mut.get_mut::<MotionQueue>() else {
            return false;
        };
        queue.enqueue_step(
            EndState::new(live_position, facing.0),
            position,
            direction,
            run,
            now,
        )
    }

    /// Drop every queued step and zero the render offset.
    pub fn clear_steps(&mut self, entity: Entity) -> bool {
        let Ok(mut entity_mut) = self.world.get_entity_mut(entity) else {
            return false;
        };
        if let Some(mut queue) = entity_mut.get_mut::<MotionQueue>() {
            queue.clear();
        }
        if let Some(mut offset) = entity_mut.get_mut::<RenderOffset>() {
            offset.reset();
        }
        true
    }

    /// Advance the clock by `dt` ticks and run one tick of every system.
    pub fn advance_one_tick(&mut self, dt: u64) {
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Apply a state transition to a mobile. The returned changes are also
    /// queued for the next flush.
    pub fn update_mobile<F>(&mut self, entity: Entity, update: F) -> ChangeSet
    where
        F: FnOnce(&mut Mobile) -> ChangeSet,
    {
        let Ok(mut entity_mut) = self.world.get_entity_mut(entity) else {
            return ChangeSet::EMPTY;
        };
        let Some(mut mobile) = entity_mut.get_mut::<Mobile>() else {
            return ChangeSet::EMPTY;
        };
        let changes = update(&mut *mobile);
        if let Some(mut pending) = entity_mut.get_mut::<PendingChanges>() {
            pending.mark(changes);
        }
        changes
    }

    fn update_equipment<F>(&mut self, entity: Entity, update: F) -> ChangeSet
    where
        F: FnOnce(&mut Equipment) -> ChangeSet,
    {
        let Ok(mut entity_mut) = self.world.get_entity_mut(entity) else {
            return ChangeSet::EMPTY;
        };
        let Some(mut equipment) = entity_mut.get_mut::<Equipment>() else {
            return ChangeSet::EMPTY;
        };
        let changes = update(&mut *equipment);
        if let Some(mut pending) = entity_mut.get_mut::<PendingChanges>() {
            pending.mark(changes);
        }
        changes
    }

    pub fn equip(&mut self, entity: Entity, layer: Layer, item: Serial) -> ChangeSet {
        self.update_equipment(entity, |equipment| equipment.equip(layer, item))
    }

    pub fn unequip(&mut self, entity: Entity, layer: Layer) -> ChangeSet {
        self.update_equipment(entity, |equipment| equipment.unequip(layer))
    }

    /// Make `entity` the only local player and center the view on it.
    pub fn set_local_player(&mut self, entity: Entity) -> bool {
        let Some(position) = self.world.get::<TilePosition>(entity).copied() else {
            return false;
        };

        let previous: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<LocalPlayer>>()
            .iter(&self.world)
            .collect();
        for other in previous {
            self.world.entity_mut(other).remove::<LocalPlayer>();
        }

        self.world.entity_mut(entity).insert(LocalPlayer);
        self.world
            .resource_mut::<ViewCenter>()
            .recenter(position.x, position.y);
        true
    }

    /// Set or clear the explicit animation group shown while standing still.
    pub fn set_animation_override(&mut self, entity: Entity, group: Option<u8>) -> bool {
        let Some(mut animation) = self.world.get_mut::<MobileAnimation>(entity) else {
            return false;
        };
        animation.group_override = group;
        true
    }

    pub fn snapshot(&self, entity: Entity) -> Option<MobileSnapshot> {
        let entity_ref = self.world.get_entity(entity).ok()?;
        let mobile = entity_ref.get::<Mobile>()?;
        let position = entity_ref.get::<TilePosition>()?;
        let facing = entity_ref.get::<Facing>()?;
        let queue = entity_ref.get::<MotionQueue>()?;
        let offset = entity_ref.get::<RenderOffset>()?;
        let animation = entity_ref.get::<MobileAnimation>()?;

        let now = self.now();
        Some(MobileSnapshot {
            serial: mobile.serial(),
            graphic: mobile.graphic(),
            position: *position,
            direction: facing.0,
            offset: *offset,
            animation_group: animation.group,
            anim_index: animation.frame_index,
            is_moving: queue.is_moving(),
            is_walking: queue.is_walking(now, self.config().walking_window),
            is_running: queue
                .front()
                .map(|step| step.run)
                .unwrap_or_else(|| facing.0.is_running()),
            mirrored: animation.mirrored,
            queued_steps: queue.len(),
        })
    }

    /// Snapshots of every live mobile, ordered by serial.
    pub fn snapshots(&self) -> Vec<MobileSnapshot> {
        let mut entities: Vec<(Serial, Entity)> =
            self.world.resource::<MobileRegistry>().iter().collect();
        entities.sort_by_key(|(serial, _)| *serial);
        entities
            .into_iter()
            .filter_map(|(_, entity)| self.snapshot(entity))
            .collect()
    }

    pub fn client_version(&self) -> ClientVersion {
        *self.world.resource::<ClientVersion>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::changes::Aspect;
    use crate::components::direction::Compass;

    fn engine() -> MobileEngine {
        MobileEngine::new(EngineConfig::new())
    }

    #[test]
    fn test_spawn_registers_and_is_idempotent() {
        let mut engine = engine();
        let a = engine.spawn_mobile(
            Serial(1),
            400,
            TilePosition::new(1, 2, 0),
            Direction::new(Compass::North),
        );
        let b = engine.spawn_mobile(
            Serial(1),
            401,
            TilePosition::new(9, 9, 0),
            Direction::new(Compass::South),
        );
        assert_eq!(a, b);
        assert_eq!(engine.entity_for(Serial(1)), Some(a));
        let snapshot = engine.snapshot(a).unwrap();
        assert_eq!(snapshot.graphic, 400);
        assert_eq!(snapshot.position, TilePosition::new(1, 2, 0));
    }

    #[test]
    fn test_despawn_unregisters() {
        let mut engine = engine();
        let entity = engine.spawn_mobile(
            Serial(2),
            400,
            TilePosition::default(),
            Direction::new(Compass::North),
        );
        assert!(engine.despawn_mobile(Serial(2)));
        assert!(engine.entity_for(Serial(2)).is_none());
        assert!(engine.snapshot(entity).is_none());
        assert!(!engine.despawn_mobile(Serial(2)));
    }

    #[test]
    fn test_update_mobile_marks_pending() {
        let mut engine = engine();
        let entity = engine.spawn_mobile(
            Serial(3),
            400,
            TilePosition::default(),
            Direction::new(Compass::North),
        );
        let changes = engine.update_mobile(entity, |m| m.set_hits(10) | m.set_war_mode(true));
        assert!(changes.contains(Aspect::Hits));
        let pending = engine.world().get::<PendingChanges>(entity).unwrap();
        assert_eq!(pending.0, changes);
    }

    #[test]
    fn test_local_player_is_unique() {
        let mut engine = engine();
        let a = engine.spawn_mobile(
            Serial(4),
            400,
            TilePosition::new(5, 6, 0),
            Direction::new(Compass::North),
        );
        let b = engine.spawn_mobile(
            Serial(5),
            400,
            TilePosition::new(7, 8, 0),
            Direction::new(Compass::North),
        );
        assert!(engine.set_local_player(a));
        assert!(engine.set_local_player(b));
        assert!(engine.world().get::<LocalPlayer>(a).is_none());
        assert!(engine.world().get::<LocalPlayer>(b).is_some());
        let view = engine.view_center();
        assert_eq!((view.x, view.y), (7, 8));
    }

    #[test]
    fn test_clear_steps_zeroes_offset() {
        let mut engine = engine();
        let entity = engine.spawn_mobile(
            Serial(6),
            400,
            TilePosition::new(0, 0, 0),
            Direction::new(Compass::East),
        );
        assert!(engine.enqueue_step(
            entity,
            TilePosition::new(1, 0, 0),
            Direction::new(Compass::East),
            false
        ));
        engine.advance_one_tick(100);
        assert!(!engine.snapshot(entity).unwrap().offset.is_zero());
        assert!(engine.clear_steps(entity));
        let snapshot = engine.snapshot(entity).unwrap();
        assert!(snapshot.offset.is_zero());
        assert_eq!(snapshot.queued_steps, 0);
    }
}
