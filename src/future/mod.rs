//! Composition of futures: wait for all branches, or for the first one.

pub use join::{Branch, Join};
pub use race::{race, race_all, Either, Race, RaceAll};

mod join;
mod race;
