//! Domain layer.
//!
//! - `foundation` - identifiers and the bearer token
//! - `session` - the server-side session behind the cookie
//! - `backend` - operations, inputs, records and errors of the model API

pub mod backend;
pub mod foundation;
pub mod session;
