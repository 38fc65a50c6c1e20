//! Serial to entity lookup for live mobiles.
//!
//! Server packets address mobiles by [`Serial`]; systems and the engine work
//! with ECS entities. The registry keeps the mapping for every mobile that is
//! currently spawned.

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;

use crate::components::mobile::Serial;

#[derive(Resource, Debug, Clone, Default)]
pub struct MobileRegistry {
    entities: FxHashMap<Serial, Entity>,
}

impl MobileRegistry {
    pub fn insert(&mut self, serial: Serial, entity: Entity) {
        self.entities.insert(serial, entity);
    }

    pub fn get(&self, serial: Serial) -> Option<Entity> {
        self.entities.get(&serial).copied()
    }

    pub fn remove(&mut self, serial: Serial) -> Option<Entity> {
        self.entities.remove(&serial)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Serial, Entity)> + '_ {
        self.entities.iter().map(|(s, e)| (*s, *e))
    }
}
