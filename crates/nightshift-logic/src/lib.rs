//! Pure shift logic for Nightshift.
//!
//! This crate holds the rules of a surveillance shift that do not depend on
//! any scene graph, timer source, or random number generator. Functions take
//! plain data (and pre-rolled `[0, 1)` samples where chance is involved) and
//! return results, so the engine crate, the headless harness, and any
//! presentation layer all agree on the numbers.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`alerts`] | Alarm level from the undetected count, per-room glitch level |
//! | [`clock`] | Real-to-simulated time conversion and the 12-hour clock label |
//! | [`config`] | Shift configuration, JSON loading, and validation |
//! | [`constants`] | Default shift figures and the fixed visual mutation values |
//! | [`kinds`] | Anomaly kinds, report parsing, and the per-room kind pool |
//! | [`pacing`] | Progress-dependent spawn delay curve |
//! | [`scoring`] | Per-room tallies and the detection rate |

pub mod alerts;
pub mod clock;
pub mod config;
pub mod constants;
pub mod kinds;
pub mod pacing;
pub mod scoring;
