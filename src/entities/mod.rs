//! Entity type definitions
//!
//! - [`DemandLine`] - one requirement of a project for an item, with its
//!   allocation and supply source

pub mod demand;

pub use demand::{Delay, DemandLine, LineStatus, SupplyType};
