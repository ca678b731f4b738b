//! mstudy: Material Study reporter
//!
//! Reads a Material Study demand spreadsheet (xlsx or csv) and answers the
//! questions a production planner asks of it: how complete each project is,
//! where an item is allocated, which suppliers are late, and what still
//! blocks a job from being pushed to the floor.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod entities;
pub mod export;
pub mod logging;
