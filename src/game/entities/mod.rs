//! Game entities module.
//!
//! This module organizes player and player registry logic.

pub mod player;

pub use player::*;
