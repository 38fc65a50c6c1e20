//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during a tick: the clock, configuration, the protocol
//! version gate, and the collaborators the motion and animation systems
//! consult. Each submodule documents the semantics and intended usage of its
//! resource(s).
//!
//! Overview
//! - `animationstore` – body categories and lazily loaded frame data per direction
//! - `clientversion` – protocol version deciding poison and flight flag sources
//! - `engineconfig` – timing, speed and protocol settings loaded from INI
//! - `mobileregistry` – serial to entity lookup for live mobiles
//! - `movementspeed` – ticks needed to cross one tile
//! - `viewcenter` – tile the view is centered on, follows the local player
//! - `worldtime` – simulation tick clock
pub mod animationstore;
pub mod clientversion;
pub mod engineconfig;
pub mod mobileregistry;
pub mod movementspeed;
pub mod viewcenter;
pub mod worldtime;
