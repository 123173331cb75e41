//! Entity type definitions
//!
//! The only entity with identity in this toolkit is the persisted
//! [`Assessment`] record; everything the engine computes is an embedded
//! value object with no identity beyond its fields.

pub mod assessment;

pub use assessment::{Assessment, InputMethod};
