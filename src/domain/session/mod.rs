//! Session module - the server-side record behind the session cookie.

mod aggregate;
mod errors;

pub use aggregate::Session;
pub use errors::SessionError;
