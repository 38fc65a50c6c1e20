use bevy_ecs::prelude::Component;

/// Animation playback state of a mobile.
///
/// `group_override` is the explicit group pushed by the server (an attack or
/// emote); while it is set and the mobile stands still the selector keeps it.
/// `group` is the group last chosen by the frame driver.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct MobileAnimation {
    pub group_override: Option<u8>,
    pub group: Option<u8>,
    pub frame_index: u8,
    /// Tick at which the frame index next advances.
    pub next_frame_at: u64,
    /// Direction bucket (0–4) of the last frame lookup.
    pub direction_bucket: u8,
    /// Whether the last frame lookup used a mirrored bucket.
    pub mirrored: bool,
}

impl MobileAnimation {
    /// Playback state whose first frame change happens at `first_frame_at`.
    pub fn starting_at(first_frame_at: u64) -> Self {
        Self {
            next_frame_at: first_frame_at,
            ..Self::default()
        }
    }
}
