//! Event types and observers used by the engine.
//!
//! Events decouple the systems that change mobiles from the code that reacts
//! to those changes.
//!
//! Submodules:
//! - [`mobile`] – per-aspect change notifications flushed once per tick
pub mod mobile;
