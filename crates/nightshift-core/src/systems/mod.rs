//! Systems - logic that operates on the room world and shift state

mod anomalies;
mod scheduler;
mod timers;

pub use anomalies::*;
pub use scheduler::*;
pub use timers::*;
