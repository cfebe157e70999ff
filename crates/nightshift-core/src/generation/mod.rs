//! Procedural generation of the watched house.

mod house;

pub use house::*;
