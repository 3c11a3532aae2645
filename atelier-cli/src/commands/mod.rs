//! CLI command implementations.

pub mod health;
pub mod queue;
pub mod report;
pub mod review;
pub mod show;
