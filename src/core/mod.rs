//! Core module - fundamental types and utilities

pub mod config;
pub mod identity;
pub mod isoscape;

pub use config::{CatalogError, Config};
pub use identity::{AssessmentId, IdParseError};
pub use isoscape::IsoscapeResponse;
