//! CLI command implementations

pub mod utils;

pub mod completions;
pub mod config;
pub mod critical;
pub mod inquiry;
pub mod overview;
pub mod project;
pub mod push;
pub mod readiness;
pub mod suppliers;
