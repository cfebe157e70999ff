//! Nightshift Core - anomaly engine and shift state machine
//!
//! A player watches a fixed set of rooms through cameras and must report
//! anomalies before too many pile up. This crate owns everything with rules
//! in it; rendering, audio and UI sit outside and talk to the
//! [`ShiftController`](controller::ShiftController) through events and
//! accessors.
//!
//! # Architecture
//!
//! Room props and introduced artifacts are entities in a `hecs` world:
//! - **Components**: pure data on those entities (Prop, Position, Visibility, Artifact)
//! - **Systems**: anomaly apply/restore, the delay queue and the spawn scheduler
//! - **Generation**: the default six-room house
//!
//! # Example
//!
//! ```rust,no_run
//! use nightshift_core::prelude::*;
//!
//! let mut shift = ShiftController::with_default_house(ShiftConfig::default()).unwrap();
//! shift.start_shift().unwrap();
//!
//! while shift.state() == ShiftState::Active {
//!     for event in shift.update(1.0 / 60.0) {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

pub mod catalogue;
pub mod clock;
pub mod components;
pub mod controller;
pub mod generation;
pub mod report;
pub mod session;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::catalogue::{RoomCatalogue, RoomDescriptor, RoomSpec};
    pub use crate::components::*;
    pub use crate::controller::{ReportOutcome, ShiftController, ShiftError, ShiftEvent, ShiftState};
    pub use crate::report::{ShiftOutcome, ShiftReport};
    pub use nightshift_logic::alerts::{AlertLevel, GlitchLevel};
    pub use nightshift_logic::config::ShiftConfig;
    pub use nightshift_logic::kinds::AnomalyKind;
}
