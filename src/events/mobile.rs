//! Mobile change notifications.
//!
//! State transitions on a mobile only record which [`Aspect`]s changed. Once
//! per tick [`flush_mobile_changes`](crate::systems::changes::flush_mobile_changes)
//! triggers one [`MobileChangedEvent`] per changed aspect, however many
//! writes touched it during the tick.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<MobileChangedEvent>| {
//!     if trigger.event().aspect == Aspect::Hits {
//!         // refresh the health bar
//!     }
//! });
//! ```
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::changes::Aspect;
use crate::components::mobile::Serial;

/// One aspect of one mobile changed during the last tick.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobileChangedEvent {
    pub entity: Entity,
    pub serial: Serial,
    pub aspect: Aspect,
}

/// Observer that logs every change notification at debug level.
pub fn log_mobile_changes(trigger: On<MobileChangedEvent>) {
    let event = trigger.event();
    debug!(
        "mobile {:#010x} ({:?}) changed {:?}",
        event.serial.0, event.entity, event.aspect
    );
}
