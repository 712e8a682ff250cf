//! CLI commands module.

pub mod ask;
pub mod health;
pub mod input;
pub mod preview;
pub mod start;
