//! tagfall: binds on-screen elements to a 2D rigid-body world so they fall,
//! collide and bounce (pixel layout in, poses out, one fixed step per draw)

pub mod types;
pub mod api;
pub mod units;
pub mod config;
pub mod error;
pub mod world;
pub mod boundary;
pub mod tags;
pub mod tree;
pub mod simulation;
pub mod bridge;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::config::BridgeConfig;
pub use crate::error::ConfigError;
pub use crate::world::SimulationWorld;
pub use crate::simulation::Simulation;
pub use crate::bridge::{PhysicsBridge, RunState};
pub use crate::tree::HeadlessTree;
pub use crate::units::UnitConverter;
