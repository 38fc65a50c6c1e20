use bevy_ecs::prelude::Component;

/// Marks the mobile controlled by this client. The view recenters on it each
/// time one of its steps completes.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct LocalPlayer;
