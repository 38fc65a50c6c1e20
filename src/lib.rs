//! Mobile motion library.
//!
//! Client-side movement and animation engine for mobiles (characters and
//! creatures) in a tile-based world. Exposes the ECS components, resources,
//! systems and events for use in integration tests and by the packet layer,
//! plus the [`engine::MobileEngine`] facade that ties them together.

pub mod components;
pub mod engine;
pub mod events;
pub mod resources;
pub mod systems;
