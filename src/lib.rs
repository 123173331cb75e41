//! COT: Cotton Origin Toolkit
//!
//! Risk scoring and statistical testing-protocol generation for cotton
//! origin compliance, with assessments stored as plain YAML files.

pub mod cli;
pub mod core;
pub mod engine;
pub mod entities;
