//! ECS components for mobiles.
//!
//! This module groups all component types attached to a mobile entity. Each
//! mobile carries the full set; only [`localplayer::LocalPlayer`] is optional.
//!
//! Submodules overview:
//! - [`changes`] – change tags returned by state transitions and pending per tick
//! - [`direction`] – compass facing with running modifier, and the direction resolver
//! - [`equipment`] – worn items indexed by layer
//! - [`localplayer`] – marker for the mobile this client controls
//! - [`mobile`] – identity, vitals, notoriety, status flags
//! - [`mobileanimation`] – animation group and frame playback state
//! - [`motionqueue`] – bounded FIFO of pending steps
//! - [`renderoffset`] – sub-tile pixel displacement while a step is in flight
//! - [`tileposition`] – tile coordinates and live facing

pub mod changes;
pub mod direction;
pub mod equipment;
pub mod localplayer;
pub mod mobile;
pub mod mobileanimation;
pub mod motionqueue;
pub mod renderoffset;
pub mod tileposition;
