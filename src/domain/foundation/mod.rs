//! Foundation module - Shared domain primitives.
//!
//! Identifiers and the bearer token that the rest of the crate passes around.

mod ids;
mod token;

pub use ids::{DatasetId, ModelId, SessionId};
pub use token::AuthToken;
