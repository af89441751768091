//! CLI command implementations.

pub mod clean;
pub mod compile;
pub mod doctor;
