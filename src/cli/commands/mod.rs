//! CLI command implementations

pub mod list;
pub mod protocol;
pub mod score;
