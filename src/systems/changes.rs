//! Change flush.
//!
//! Runs last in the tick so every write made by the engine API and the
//! earlier systems is folded into one notification per aspect.

use bevy_ecs::prelude::*;

use crate::components::changes::PendingChanges;
use crate::components::mobile::Mobile;
use crate::events::mobile::MobileChangedEvent;

/// Trigger one [`MobileChangedEvent`] per pending aspect and clear the set.
pub fn flush_mobile_changes(
    mut commands: Commands,
    mut query: Query<(Entity, &Mobile, &mut PendingChanges)>,
) {
    for (entity, mobile, mut pending) in query.iter_mut() {
        if pending.0.is_empty() {
            continue;
        }
        let changes = pending.0.take();
        for aspect in changes.iter() {
            commands.trigger(MobileChangedEvent {
                entity,
                serial: mobile.serial(),
                aspect,
            });
        }
    }
}
