//! Component definitions for the room scene world.
//!
//! Components are pure data structs attached to entities (props and
//! introduced artifacts) or held as optional room features.
//! They have no behavior - that lives in systems.

mod common;
mod room;

pub use common::*;
pub use room::*;
