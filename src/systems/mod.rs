//! Systems run by the engine schedule, in tick order:
//!
//! - [`animation::asset_load_system`] – completes deferred frame loads
//! - [`motion::motion_system`] – interpolates and commits queued steps
//! - [`animation::animation_frame_system`] – advances animation frames
//! - [`changes::flush_mobile_changes`] – emits change notifications
//!
//! [`time::update_world_time`] advances the clock before the schedule runs.
pub mod animation;
pub mod changes;
pub mod motion;
pub mod time;
