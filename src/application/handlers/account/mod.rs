//! Account handlers: login, registration and logout.
//!
//! These are the only use cases that touch both the model API and the
//! session store. Every other page reads the token the auth gate attached
//! and talks to the backend directly.

mod errors;
mod login;
mod logout;
mod register;

pub use errors::AccountError;
pub use login::{LoginCommand, LoginHandler};
pub use logout::{LogoutCommand, LogoutHandler};
pub use register::{RegisterCommand, RegisterHandler};
