//! City Sim - economic simulation and placement rules for a grid city builder

pub mod city;
pub mod core;
pub mod persistence;
pub mod simulation;
pub mod spatial;
pub mod world;

pub use crate::core::error::{CityError, Result};
pub use crate::world::{BuildingInfo, GameMode, Placement, World};
